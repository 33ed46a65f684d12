//! Write functions - persist extracted files to blob storage

use anyhow::{Context, Result};
use object_store::azure::{AzureCredentialProvider, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload};
use std::sync::Arc;
use tracing::{debug, info};

/// Handle to one blob container. Reused for every upload of an invocation.
#[derive(Debug, Clone)]
pub struct BlobSink {
    store: Arc<dyn ObjectStore>,
    container: String,
}

impl BlobSink {
    pub fn new(store: Arc<dyn ObjectStore>, container: &str) -> Self {
        BlobSink {
            store,
            container: container.to_string(),
        }
    }

    /// Azure Blob Storage container. `credentials` is asked for a token on every request.
    pub fn azure(
        account_url: &str,
        container: &str,
        credentials: AzureCredentialProvider,
    ) -> Result<Self> {
        let account = storage_account_name(account_url)?;

        let store = MicrosoftAzureBuilder::new()
            .with_account(account.clone())
            .with_container_name(container)
            .with_credentials(credentials)
            .build()
            .with_context(|| {
                format!(
                    "Failed to build blob client for account '{}' container '{}'",
                    account, container
                )
            })?;

        info!(
            "Blob storage ready: account '{}', container '{}'",
            account, container
        );

        Ok(BlobSink::new(Arc::new(store), container))
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Write `data` at `path`, replacing whatever is stored there.
    /// The blob name is `path` verbatim; invalid segments are rejected, not escaped.
    pub async fn upload(&self, path: &str, data: Vec<u8>) -> Result<(), object_store::Error> {
        let size = data.len();
        let location = Path::parse(path)?;

        self.store.put(&location, PutPayload::from(data)).await?;

        debug!("Put {} bytes at {}/{}", size, self.container, path);
        Ok(())
    }
}

/// Account name from a URL like `https://{account}.blob.core.windows.net/`
pub fn storage_account_name(account_url: &str) -> Result<String> {
    let url = reqwest::Url::parse(account_url)
        .with_context(|| format!("Invalid storage account URL '{}'", account_url))?;

    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("Storage account URL '{}' has no host", account_url))?;

    match host.split_once('.') {
        Some((account, _)) if !account.is_empty() => Ok(account.to_string()),
        _ => Err(anyhow::anyhow!(
            "Cannot derive storage account name from '{}'",
            account_url
        )),
    }
}
