use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookStore, StoreError};
use crate::modules::books::models::{Book, BookPatch, NewBook};

/// Process-local store used when no database is configured, and by tests.
///
/// Keyed by UUID v7, so iteration order is creation order.
#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<BTreeMap<Uuid, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        let record = Book {
            id: Uuid::now_v7(),
            title: book.title,
            author: book.author,
            price: book.price,
        };
        self.books.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: BookPatch) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        let book = books.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(book);
        Ok(book.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<Book, StoreError> {
        self.books
            .write()
            .await
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }
}
