//! Request schemas for the book endpoints.
//!
//! Every schema is checked before the store is touched; a failure turns into a
//! 400 with the message "invalid data".

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::models::{BookPatch, NewBook};

/// Body of `POST /book`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[serde(rename = "nomeLivro")]
    #[validate(length(min = 2, max = 255))]
    pub title: String,
    #[serde(rename = "nomeAutor")]
    #[validate(length(min = 2, max = 255))]
    pub author: String,
    #[serde(rename = "preco")]
    #[validate(range(min = 0.01, max = 1000000.0))]
    pub price: f64,
}

impl CreateBookRequest {
    pub fn into_new_book(self) -> NewBook {
        NewBook {
            title: self.title,
            author: self.author,
            price: self.price,
        }
    }
}

/// Body of `PUT /book`. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookRequest {
    #[validate(custom(function = "validate_book_id"))]
    pub id: String,
    #[serde(rename = "nomeLivro", default)]
    #[validate(length(min = 2, max = 255))]
    pub title: Option<String>,
    #[serde(rename = "nomeAutor", default)]
    #[validate(length(min = 2, max = 255))]
    pub author: Option<String>,
    #[serde(rename = "preco", default)]
    #[validate(range(min = 0.01, max = 1000000.0))]
    pub price: Option<f64>,
}

impl UpdateBookRequest {
    /// Split into the target id and the patch of present fields.
    /// `None` when the id is malformed.
    pub fn into_parts(self) -> Option<(Uuid, BookPatch)> {
        let id = parse_book_id(&self.id)?;
        let patch = BookPatch {
            title: self.title,
            author: self.author,
            price: self.price,
        };
        Some((id, patch))
    }
}

/// Query string of `GET /book` and `DELETE /book`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookIdQuery {
    #[validate(custom(function = "validate_book_id"))]
    pub id: String,
}

impl BookIdQuery {
    pub fn book_id(&self) -> Option<Uuid> {
        parse_book_id(&self.id)
    }
}

/// Parse a book id in its canonical hyphenated form.
pub fn parse_book_id(raw: &str) -> Option<Uuid> {
    // `Uuid::parse_str` also accepts the simple, braced and urn forms.
    if raw.len() != uuid::fmt::Hyphenated::LENGTH {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

fn validate_book_id(raw: &str) -> Result<(), ValidationError> {
    match parse_book_id(raw) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("book_id")),
    }
}
