use anyhow::Context;
use tracing_subscriber::EnvFilter;

use prize_history_server::config::{self, StoreBackend};
use prize_history_server::database::{schema, DatabaseManager, MemoryStore, PgStore, StoreHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting prize history server in {:?} mode", config.environment);

    let store = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            if config.database.auto_migrate {
                schema::apply(&pool).await.context("failed to apply schema")?;
            }
            StoreHandle::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            StoreHandle::new(MemoryStore::new())
        }
    };

    let app = prize_history_server::app(store, config.history.clone(), &config.security);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Prize History Server running on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
