//! Azure services: identity, Key Vault and blob storage wiring

pub mod credential;
pub mod secrets;

use crate::config::Config;
use crate::handler::{Backends, Connection};
use crate::ingestion::write::BlobSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use credential::IdentityCredentialProvider;
use secrets::{resolve_secret_pair, KeyVaultSecrets};
use std::sync::Arc;
use tracing::info;

/// Production backends. Every `connect` resolves identity, secrets and the
/// storage handle from scratch.
#[derive(Debug, Clone)]
pub struct AzureBackends {
    config: Arc<Config>,
}

impl AzureBackends {
    pub fn new(config: Arc<Config>) -> Self {
        AzureBackends { config }
    }
}

#[async_trait]
impl Backends for AzureBackends {
    async fn connect(&self) -> Result<Connection> {
        // Environment service principal, workload/managed identity, then Azure CLI
        let credential =
            azure_identity::create_credential().context("Failed to resolve Azure identity")?;

        let vault = KeyVaultSecrets::new(&self.config.key_vault_url, credential.clone())?;
        let secrets = resolve_secret_pair(
            &vault,
            &self.config.username_secret,
            &self.config.key_secret,
        )
        .await?;

        let sink = BlobSink::azure(
            &self.config.storage_account_url,
            &self.config.container,
            Arc::new(IdentityCredentialProvider::new(credential)),
        )?;
        info!("Successfully initialized blob storage client");

        Ok(Connection { secrets, sink })
    }
}
