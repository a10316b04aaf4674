//! Bookstore service library
//!
//! Wires the book module, its store and the HTTP server together. The
//! `bookstore` and `bookstore-cli` binaries are thin wrappers around [`run`].

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use modules::books::store::{BookStore, MemoryBookStore, PgBookStore};

/// Connect the configured store and build the module registry around it.
///
/// With a database URL the pending migrations are applied first; without one
/// the in-memory store is used.
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let Some(pool) = bookstore_db::connect(&settings.database).await? else {
        return Ok(registry(Arc::new(MemoryBookStore::new())));
    };

    let registry = registry(Arc::new(PgBookStore::new(pool.clone())));
    let applied = bookstore_db::run_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "database migrations applied");

    Ok(registry)
}

/// Registry holding every module, bound to `store`
pub fn registry(store: Arc<dyn BookStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Build the full HTTP application around `store`
pub fn app(store: Arc<dyn BookStore>, settings: &Settings) -> axum::Router {
    bookstore_http::build_router(&registry(store), settings)
}

/// Connect, migrate, start modules and serve until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = bootstrap(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookstore_http::start_server(
        &registry,
        &settings,
        bookstore_http::shutdown_signal(),
    )
    .await;

    registry.stop_all().await?;
    served
}
