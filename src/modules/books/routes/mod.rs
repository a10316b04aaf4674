//! HTTP handlers for `/book`.
//!
//! Each handler validates, makes exactly one store call and maps the outcome
//! to a status code.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::error::AppError;
use uuid::Uuid;
use validator::Validate;

use super::models::Book;
use super::store::{BookStore, StoreError};
use super::validation::{BookIdQuery, CreateBookRequest, UpdateBookRequest};
use super::LOG_TARGET;

pub type SharedStore = Arc<dyn BookStore>;

/// Routes for the book resource, bound to `store`.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route(
            "/book",
            get(get_book)
                .post(create_book)
                .put(update_book)
                .delete(delete_book),
        )
        .route("/book/all", get(list_books))
        .with_state(store)
}

pub async fn create_book(
    State(store): State<SharedStore>,
    body: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Uuid>), AppError> {
    let Json(request) = body?;
    request.validate()?;

    let book = store
        .create(request.into_new_book())
        .await
        .map_err(|err| AppError::internal_with("failed to create book", err))?;

    tracing::info!(target: LOG_TARGET, book_id = %book.id, "book created");
    Ok((StatusCode::CREATED, Json(book.id)))
}

pub async fn update_book(
    State(store): State<SharedStore>,
    body: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<Json<Uuid>, AppError> {
    let Json(request) = body?;
    request.validate()?;
    let (id, patch) = request
        .into_parts()
        .ok_or_else(|| AppError::validation(Vec::new()))?;

    match store.update(id, patch).await {
        Ok(book) => {
            tracing::info!(target: LOG_TARGET, book_id = %book.id, "book updated");
            Ok(Json(book.id))
        }
        // Reported as a server error for compatibility with existing clients.
        Err(StoreError::NotFound(missing)) => {
            tracing::warn!(target: LOG_TARGET, book_id = %missing, "update of unknown book");
            Err(AppError::internal("failed to update book"))
        }
        Err(err) => Err(AppError::internal_with("failed to update book", err)),
    }
}

pub async fn get_book(
    State(store): State<SharedStore>,
    query: Result<Query<BookIdQuery>, QueryRejection>,
) -> Result<Json<Book>, AppError> {
    let id = lookup_id(query)?;

    store
        .find(id)
        .await
        .map_err(|err| AppError::internal_with("failed to fetch book", err))?
        .map(Json)
        .ok_or_else(|| AppError::not_found("book not found"))
}

pub async fn list_books(State(store): State<SharedStore>) -> Result<Json<Vec<Book>>, AppError> {
    let books = store
        .list()
        .await
        .map_err(|err| AppError::internal_with("failed to list books", err))?;

    Ok(Json(books))
}

pub async fn delete_book(
    State(store): State<SharedStore>,
    query: Result<Query<BookIdQuery>, QueryRejection>,
) -> Result<Json<Uuid>, AppError> {
    let id = lookup_id(query)?;

    match store.delete(id).await {
        Ok(book) => {
            tracing::info!(target: LOG_TARGET, book_id = %book.id, "book deleted");
            Ok(Json(book.id))
        }
        // Same compatibility rule as update.
        Err(StoreError::NotFound(missing)) => {
            tracing::warn!(target: LOG_TARGET, book_id = %missing, "delete of unknown book");
            Err(AppError::internal("failed to delete book"))
        }
        Err(err) => Err(AppError::internal_with("failed to delete book", err)),
    }
}

fn lookup_id(query: Result<Query<BookIdQuery>, QueryRejection>) -> Result<Uuid, AppError> {
    let Query(query) = query?;
    query.validate()?;
    query
        .book_id()
        .ok_or_else(|| AppError::validation(Vec::new()))
}
