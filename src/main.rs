use anyhow::{Context, Result};
use dataset_sync::azure::AzureBackends;
use dataset_sync::config::Config;
use dataset_sync::handler::{router, AppState};
use dataset_sync::ingestion::utils::http_client;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    dataset_sync::init_logging();

    info!("Starting dataset sync function handler...");

    let config = Arc::new(Config::from_env()?);
    let catalog = config.load_catalog()?;
    info!("Configuration loaded ({} datasets)", catalog.len());

    let http = http_client(config.http_timeout_secs)?;
    let backends = Arc::new(AzureBackends::new(config.clone()));

    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
        http,
        backends,
    };

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Handler listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
