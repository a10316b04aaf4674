use anyhow::{bail, Context};
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Bookstore service administration
#[derive(Debug, Parser)]
#[command(name = "bookstore-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the resolved configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load bookstore settings")?;

    match cli.command {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
        }
        Command::Migrate => {
            bookstore_telemetry::init(&settings.telemetry)?;
            let Some(pool) = bookstore_db::connect(&settings.database).await? else {
                bail!("no database configured; set DATABASE_URL or BOOKSTORE_DATABASE__URL");
            };
            let registry = bookstore_app::registry(std::sync::Arc::new(
                bookstore_app::modules::books::store::PgBookStore::new(pool.clone()),
            ));
            let applied =
                bookstore_db::run_migrations(&pool, &registry.collect_migrations()).await?;
            tracing::info!(applied, "migrations complete");
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookstore_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "bookstore-cli serving");
            bookstore_app::run(settings).await?;
        }
    }

    Ok(())
}
