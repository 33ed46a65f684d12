//! Key Vault secrets for the dataset API credentials

use crate::ingestion::types::SecretPair;
use anyhow::{Context, Result};
use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_security_keyvault::SecretClient;
use std::sync::Arc;
use tracing::info;

/// Anything that can hand out a secret value by name
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String>;
}

/// Secrets read from an Azure Key Vault
pub struct KeyVaultSecrets {
    client: SecretClient,
}

impl KeyVaultSecrets {
    pub fn new(vault_url: &str, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        let client = SecretClient::new(vault_url, credential)
            .with_context(|| format!("Invalid Key Vault URL {}", vault_url))?;
        Ok(KeyVaultSecrets { client })
    }
}

#[async_trait]
impl SecretSource for KeyVaultSecrets {
    async fn get_secret(&self, name: &str) -> Result<String> {
        let secret = self
            .client
            .get(name)
            .await
            .with_context(|| format!("Failed to fetch secret '{}'", name))?;
        Ok(secret.value)
    }
}

/// Fetch username then key. The first failure aborts.
pub async fn resolve_secret_pair(
    source: &dyn SecretSource,
    username_secret: &str,
    key_secret: &str,
) -> Result<SecretPair> {
    let username = source.get_secret(username_secret).await?;
    let key = source.get_secret(key_secret).await?;
    info!("Successfully retrieved dataset API credentials");
    Ok(SecretPair { username, key })
}
