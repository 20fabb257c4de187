use std::sync::Arc;

use anyhow::Context;
use common::storage::ObjectStore;
use common::storage::s3::{S3Config, S3ObjectStore};
use server::config::AppConfig;
use server::database::{ensure_indexes, init_db};
use server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to the database")?;
    ensure_indexes(&db).await?;

    let s3_config = S3Config::from_env()?;
    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(&s3_config)?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db, config, store);
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
