//! PostgreSQL pool factory and a forward-only runner for module migrations.

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};

use bookstore_kernel::{settings::DatabaseSettings, Migration};

const MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    module     TEXT        NOT NULL,
    id         TEXT        NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (module, id)
)";

/// Open a connection pool, or `None` when no database URL is configured.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Option<PgPool>> {
    let Some(url) = settings.url.as_deref() else {
        tracing::warn!(
            target: "bookstore-db",
            "database url not set; running in-memory only, state will not survive restarts"
        );
        return Ok(None);
    };

    let pool = pool_options(settings)
        .connect(url)
        .await
        .context("failed to connect to PostgreSQL")?;

    tracing::info!(target: "bookstore-db", "connected to PostgreSQL");
    Ok(Some(pool))
}

fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
}

/// Apply every migration not yet recorded in `schema_migrations`.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row. Returns the number of migrations applied by this call.
pub async fn run_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::query(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .context("failed to create schema_migrations table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already: Option<(String,)> =
            sqlx::query_as("SELECT id FROM schema_migrations WHERE module = $1 AND id = $2")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .with_context(|| format!("failed to read migration state for {module}"))?;

        if already.is_some() {
            tracing::debug!(target: "bookstore-db", module = %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await.context("failed to open transaction")?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {module}/{} failed", migration.id))?;
        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration {module}/{}", migration.id))?;
        tx.commit().await.context("failed to commit migration")?;

        tracing::info!(target: "bookstore-db", module = %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
