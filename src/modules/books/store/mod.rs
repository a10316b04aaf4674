//! Persistence collaborator for books.
//!
//! Handlers only see [`BookStore`]; the server picks [`PgBookStore`] when a
//! database is configured and [`MemoryBookStore`] otherwise.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Book, BookPatch, NewBook};

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book; the store assigns its id.
    async fn create(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Apply `patch` to the book with `id`, returning the updated record.
    async fn update(&self, id: Uuid, patch: BookPatch) -> Result<Book, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Book>, StoreError>;

    /// Every book, oldest first.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// Remove the book with `id`, returning what was removed.
    async fn delete(&self, id: Uuid) -> Result<Book, StoreError>;
}
