use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A book as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Assigned by the store on insert, never changed afterwards
    pub id: Uuid,
    #[serde(rename = "nomeLivro")]
    #[sqlx(rename = "nome_livro")]
    pub title: String,
    #[serde(rename = "nomeAutor")]
    #[sqlx(rename = "nome_autor")]
    pub author: String,
    #[serde(rename = "preco")]
    pub price: f64,
}

/// Fields of a book that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: f64,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<f64>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.price.is_none()
    }

    /// Apply the present fields to `book` in place.
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(price) = self.price {
            book.price = price;
        }
    }
}
