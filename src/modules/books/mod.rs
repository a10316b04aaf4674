pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use routes::SharedStore;
use store::BookStore;

pub(crate) const LOG_TARGET: &str = "bookstore::books";

/// The book resource: CRUD routes over an injected [`BookStore`].
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "book"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            persistent = ctx.settings.database.url.is_some(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id         UUID             PRIMARY KEY,
                    nome_livro VARCHAR(255)     NOT NULL CHECK (char_length(nome_livro) >= 2),
                    nome_autor VARCHAR(255)     NOT NULL CHECK (char_length(nome_autor) >= 2),
                    preco      DOUBLE PRECISION NOT NULL CHECK (preco >= 0.01 AND preco <= 1000000)
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn id_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "type": "string", "format": "uuid" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_query = json!({
        "name": "id",
        "in": "query",
        "required": true,
        "schema": { "type": "string", "format": "uuid" }
    });

    json!({
        "paths": {
            "/book": {
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": id_response("Id of the created book"),
                        "400": error_response("Invalid data"),
                        "500": error_response("Internal server error")
                    }
                },
                "put": {
                    "summary": "Update some fields of a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/UpdateBook" }
                            }
                        }
                    },
                    "responses": {
                        "200": id_response("Id of the updated book"),
                        "400": error_response("Invalid data"),
                        "500": error_response("Unknown book or internal server error")
                    }
                },
                "get": {
                    "summary": "Fetch a book by id",
                    "tags": ["Books"],
                    "parameters": [id_query.clone()],
                    "responses": {
                        "200": {
                            "description": "The book",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "400": error_response("Invalid id"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": "Delete a book by id",
                    "tags": ["Books"],
                    "parameters": [id_query],
                    "responses": {
                        "200": id_response("Id of the deleted book"),
                        "400": error_response("Invalid id"),
                        "500": error_response("Unknown book or internal server error")
                    }
                }
            },
            "/book/all": {
                "get": {
                    "summary": "List every book",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "All books, possibly empty",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Internal server error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "nomeLivro": { "type": "string", "minLength": 2, "maxLength": 255 },
                        "nomeAutor": { "type": "string", "minLength": 2, "maxLength": 255 },
                        "preco": { "type": "number", "minimum": 0.01, "maximum": 1000000 }
                    },
                    "required": ["id", "nomeLivro", "nomeAutor", "preco"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "nomeLivro": { "type": "string", "minLength": 2, "maxLength": 255 },
                        "nomeAutor": { "type": "string", "minLength": 2, "maxLength": 255 },
                        "preco": { "type": "number", "minimum": 0.01, "maximum": 1000000 }
                    },
                    "required": ["nomeLivro", "nomeAutor", "preco"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "nomeLivro": { "type": "string", "minLength": 2, "maxLength": 255 },
                        "nomeAutor": { "type": "string", "minLength": 2, "maxLength": 255 },
                        "preco": { "type": "number", "minimum": 0.01, "maximum": 1000000 }
                    },
                    "required": ["id"]
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
