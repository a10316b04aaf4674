//! End-to-end tests of the `/book` endpoints against the in-memory store and
//! a store double that always fails.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use bookstore_app::modules::books::models::{Book, BookPatch, NewBook};
use bookstore_app::modules::books::store::{BookStore, MemoryBookStore, StoreError};
use bookstore_kernel::settings::Settings;

/// Helper: the full app over `store`.
fn test_app(store: Arc<dyn BookStore>) -> axum::Router {
    bookstore_app::app(store, &Settings::default())
}

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn dune() -> Value {
    json!({"nomeLivro": "Dune", "nomeAutor": "Frank Herbert", "preco": 42.5})
}

async fn create(app: &axum::Router, payload: Value) -> String {
    let (status, body) = send(app, Method::POST, "/book", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body {body}");
    body.as_str().expect("id is a JSON string").to_string()
}

// -- Create --------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_id() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let id = create(&app, dune()).await;

    assert!(!id.is_empty());
    assert!(Uuid::parse_str(&id).is_ok());
}

#[tokio::test]
async fn create_accepts_boundary_values() {
    let app = test_app(Arc::new(MemoryBookStore::new()));

    create(&app, json!({"nomeLivro": "Du", "nomeAutor": "Fr", "preco": 0.01})).await;
    create(
        &app,
        json!({
            "nomeLivro": "a".repeat(255),
            "nomeAutor": "b".repeat(255),
            "preco": 1_000_000
        }),
    )
    .await;
}

#[tokio::test]
async fn create_rejects_invalid_payloads_without_touching_store() {
    let store = Arc::new(MemoryBookStore::new());
    let app = test_app(store.clone());

    let invalid = [
        json!({"nomeLivro": "D", "nomeAutor": "Frank Herbert", "preco": 42.5}),
        json!({"nomeLivro": "a".repeat(256), "nomeAutor": "Frank Herbert", "preco": 42.5}),
        json!({"nomeLivro": "Dune", "nomeAutor": "F", "preco": 42.5}),
        json!({"nomeLivro": "Dune", "nomeAutor": "Frank Herbert", "preco": 0}),
        json!({"nomeLivro": "Dune", "nomeAutor": "Frank Herbert", "preco": -3}),
        json!({"nomeLivro": "Dune", "nomeAutor": "Frank Herbert", "preco": 1_000_000.5}),
        json!({"nomeLivro": "Dune", "nomeAutor": "Frank Herbert"}),
        json!({"nomeLivro": "Dune", "nomeAutor": "Frank Herbert", "preco": "42.5"}),
    ];

    for payload in invalid {
        let (status, body) = send(&app, Method::POST, "/book", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body, json!({"message": "invalid data"}));
    }

    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/book")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"nomeLivro\":"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Read ----------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let id = create(&app, dune()).await;

    let (status, body) = send(&app, Method::GET, &format!("/book?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": id, "nomeLivro": "Dune", "nomeAutor": "Frank Herbert", "preco": 42.5})
    );
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/book?id={}", Uuid::now_v7()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "book not found"}));
}

#[tokio::test]
async fn malformed_ids_are_400() {
    let app = test_app(Arc::new(MemoryBookStore::new()));

    for uri in ["/book?id=abc", "/book?id=", "/book"] {
        for method in [Method::GET, Method::DELETE] {
            let (status, body) = send(&app, method.clone(), uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(body, json!({"message": "invalid data"}));
        }
    }
}

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let (status, body) = send(&app, Method::GET, "/book/all", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_returns_every_book() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let first = create(&app, dune()).await;
    let second = create(
        &app,
        json!({"nomeLivro": "Neuromancer", "nomeAutor": "William Gibson", "preco": 19.9}),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/book/all", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, [first.as_str(), second.as_str()]);
}

// -- Update --------------------------------------------------------------------

#[tokio::test]
async fn update_changes_only_present_fields() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let id = create(&app, dune()).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/book",
        Some(json!({"id": id, "preco": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(id));

    let (_, book) = send(&app, Method::GET, &format!("/book?id={id}"), None).await;
    assert_eq!(
        book,
        json!({"id": id, "nomeLivro": "Dune", "nomeAutor": "Frank Herbert", "preco": 10.0})
    );

    send(
        &app,
        Method::PUT,
        "/book",
        Some(json!({"id": id, "nomeLivro": "Dune Messiah", "nomeAutor": "F. Herbert"})),
    )
    .await;
    let (_, book) = send(&app, Method::GET, &format!("/book?id={id}"), None).await;
    assert_eq!(
        book,
        json!({"id": id, "nomeLivro": "Dune Messiah", "nomeAutor": "F. Herbert", "preco": 10.0})
    );
}

#[tokio::test]
async fn update_with_only_id_leaves_book_unchanged() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let id = create(&app, dune()).await;

    let (status, _) = send(&app, Method::PUT, "/book", Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, book) = send(&app, Method::GET, &format!("/book?id={id}"), None).await;
    assert_eq!(book["nomeLivro"], "Dune");
    assert_eq!(book["preco"], 42.5);
}

#[tokio::test]
async fn update_rejects_invalid_input() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let id = create(&app, dune()).await;

    let invalid = [
        json!({"nomeLivro": "Dune"}),
        json!({"id": "not-a-uuid", "nomeLivro": "Dune"}),
        json!({"id": id, "nomeLivro": "D"}),
        json!({"id": id, "preco": 0}),
        json!({"id": id, "preco": 2_000_000}),
    ];

    for payload in invalid {
        let (status, body) = send(&app, Method::PUT, "/book", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body, json!({"message": "invalid data"}));
    }

    let (_, book) = send(&app, Method::GET, &format!("/book?id={id}"), None).await;
    assert_eq!(book["preco"], 42.5);
}

/// Locks in the compatibility behavior: an unknown but well-formed id on
/// update is a 500, not a 404.
#[tokio::test]
async fn update_unknown_id_is_500() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let (status, body) = send(
        &app,
        Method::PUT,
        "/book",
        Some(json!({"id": Uuid::now_v7(), "preco": 10.0})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "failed to update book"}));
}

// -- Delete --------------------------------------------------------------------

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let id = create(&app, dune()).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/book?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(id));

    let (status, _) = send(&app, Method::GET, &format!("/book?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = send(&app, Method::GET, "/book/all", None).await;
    assert_eq!(all, json!([]));
}

/// Same compatibility rule as update.
#[tokio::test]
async fn delete_unknown_id_is_500() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/book?id={}", Uuid::now_v7()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "failed to delete book"}));
}

// -- Store failures ------------------------------------------------------------

/// Store double whose every call fails like a lost database connection.
struct BrokenStore;

#[async_trait]
impl BookStore for BrokenStore {
    async fn create(&self, _book: NewBook) -> Result<Book, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _id: Uuid, _patch: BookPatch) -> Result<Book, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Book>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: Uuid) -> Result<Book, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn store_failures_are_generic_500s() {
    let app = test_app(Arc::new(BrokenStore));
    let id = Uuid::now_v7().to_string();

    let cases = [
        (Method::POST, "/book".to_string(), Some(dune()), "failed to create book"),
        (
            Method::PUT,
            "/book".to_string(),
            Some(json!({"id": id, "preco": 1.0})),
            "failed to update book",
        ),
        (Method::GET, format!("/book?id={id}"), None, "failed to fetch book"),
        (Method::GET, "/book/all".to_string(), None, "failed to list books"),
        (Method::DELETE, format!("/book?id={id}"), None, "failed to delete book"),
    ];

    for (method, uri, body, message) in cases {
        let (status, response) = send(&app, method.clone(), &uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(response, json!({ "message": message }));
    }
}

#[tokio::test]
async fn validation_runs_before_a_broken_store() {
    let app = test_app(Arc::new(BrokenStore));
    let (status, _) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({"nomeLivro": "D", "nomeAutor": "Frank Herbert", "preco": 42.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// -- Ambient routes ------------------------------------------------------------

#[tokio::test]
async fn openapi_lists_book_routes() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let (status, body) = send(&app, Method::GET, "/docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/book"]["post"].is_object());
    assert!(body["paths"]["/book/all"]["get"].is_object());
    assert!(body["components"]["schemas"]["Book"].is_object());
}

#[tokio::test]
async fn root_greets() {
    let app = test_app(Arc::new(MemoryBookStore::new()));
    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Hello World!"));
}
