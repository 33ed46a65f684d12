//! One sync pass from the terminal: connect, run the catalog, exit

use anyhow::Result;
use dataset_sync::azure::AzureBackends;
use dataset_sync::config::Config;
use dataset_sync::handler::run_invocation;
use dataset_sync::ingestion::utils::http_client;
use dataset_sync::ingestion::DatasetDescriptor;
use std::env;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    dataset_sync::init_logging();

    info!("Starting dataset sync");

    let config = Arc::new(Config::from_env()?);
    let catalog = config.load_catalog()?;

    // Determine which datasets to run (from command line args or run all)
    let args: Vec<String> = env::args().skip(1).collect();
    let selected = select(catalog, &args);
    if selected.is_empty() {
        warn!("No datasets selected, nothing to do");
        return Ok(());
    }

    let http = http_client(config.http_timeout_secs)?;
    let backends = AzureBackends::new(config.clone());

    match run_invocation(&backends, &config, &http, &selected).await {
        Ok(report) => {
            info!("✓ Sync complete: {}", report);
            Ok(())
        }
        Err(e) => {
            error!("✗ Sync failed: {:#}", e);
            Err(e)
        }
    }
}

/// Keep catalog entries named in `args`; everything when `args` is empty
fn select(catalog: Vec<DatasetDescriptor>, args: &[String]) -> Vec<DatasetDescriptor> {
    if args.is_empty() {
        return catalog;
    }

    for name in args {
        if !catalog.iter().any(|d| &d.dataset == name) {
            warn!("Unknown dataset: {}", name);
        }
    }

    catalog
        .into_iter()
        .filter(|d| args.contains(&d.dataset))
        .collect()
}
