//! HTTP trigger: one invocation = connect, run the catalog, report

use crate::config::Config;
use crate::ingestion::fetch::DatasetApi;
use crate::ingestion::pipeline::sync_all;
use crate::ingestion::types::{DatasetDescriptor, SecretPair, SyncReport};
use crate::ingestion::write::BlobSink;
use anyhow::Result;
use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::any, routing::get, Json, Router};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const ROUTE: &str = "/api/funcKaggleDataFetch";
pub const SUCCESS_MESSAGE: &str = "Datasets processed successfully.";

/// Everything an invocation needs from the outside world
#[derive(Debug)]
pub struct Connection {
    pub secrets: SecretPair,
    pub sink: BlobSink,
}

/// Resolves credentials and the storage handle for one invocation
#[async_trait]
pub trait Backends: Send + Sync {
    async fn connect(&self) -> Result<Connection>;
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Vec<DatasetDescriptor>>,
    pub http: Client,
    pub backends: Arc<dyn Backends>,
}

#[derive(Serialize, Deserialize)]
struct ApiResponse {
    message: String,
    status: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(ROUTE, any(fetch_datasets))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Dataset sync function is running!".to_string(),
        status: "ok".to_string(),
    })
}

async fn fetch_datasets(State(state): State<AppState>) -> (StatusCode, String) {
    info!("Function started processing a request.");
    respond(
        run_invocation(state.backends.as_ref(), &state.config, &state.http, &state.catalog).await,
    )
}

/// Connect, then attempt every dataset. Only connection failures are errors here;
/// dataset failures are recorded in the report.
pub async fn run_invocation(
    backends: &dyn Backends,
    config: &Config,
    http: &Client,
    catalog: &[DatasetDescriptor],
) -> Result<SyncReport> {
    let Connection { secrets, sink } = backends.connect().await?;

    let api = DatasetApi::new(http.clone(), &config.api_base_url, config.api_auth, secrets);
    let report = sync_all(&api, &sink, catalog).await;

    info!("All datasets processed: {}", report);
    Ok(report)
}

/// Map an invocation result to the HTTP reply
pub fn respond(result: Result<SyncReport>) -> (StatusCode, String) {
    match result {
        Ok(_) => (StatusCode::OK, SUCCESS_MESSAGE.to_string()),
        Err(e) => {
            error!("An unexpected error occurred: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occurred: {:#}", e),
            )
        }
    }
}
