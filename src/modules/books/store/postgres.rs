use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BookStore, StoreError};
use crate::modules::books::models::{Book, BookPatch, NewBook};

const COLUMNS: &str = "id, nome_livro, nome_autor, preco";

/// Books table in PostgreSQL. Ids are UUID v7, generated here on insert.
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (id, nome_livro, nome_autor, preco)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: BookPatch) -> Result<Book, StoreError> {
        // NULL parameters keep the current column value.
        let row = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET
                 nome_livro = COALESCE($2, nome_livro),
                 nome_autor = COALESCE($3, nome_autor),
                 preco      = COALESCE($4, preco)
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.price)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(id))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "DELETE FROM books WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(id))
    }
}
