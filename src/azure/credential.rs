//! Storage credentials backed by the Azure identity chain

use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use object_store::azure::AzureCredential;
use object_store::CredentialProvider;
use std::fmt;
use std::sync::Arc;

pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

const STORE: &str = "MicrosoftAzure";

/// Hands object_store a bearer token per request. Expiry and refresh are left
/// to the underlying `TokenCredential`, which caches until shortly before expiry.
pub struct IdentityCredentialProvider {
    credential: Arc<dyn TokenCredential>,
}

impl IdentityCredentialProvider {
    pub fn new(credential: Arc<dyn TokenCredential>) -> Self {
        IdentityCredentialProvider { credential }
    }
}

impl fmt::Debug for IdentityCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCredentialProvider")
            .field("scope", &STORAGE_SCOPE)
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for IdentityCredentialProvider {
    type Credential = AzureCredential;

    async fn get_credential(&self) -> object_store::Result<Arc<AzureCredential>> {
        let token = self
            .credential
            .get_token(&[STORAGE_SCOPE])
            .await
            .map_err(storage_error)?;
        Ok(Arc::new(AzureCredential::BearerToken(
            token.token.secret().to_string(),
        )))
    }
}

fn storage_error(source: azure_core::Error) -> object_store::Error {
    object_store::Error::Generic {
        store: STORE,
        source: Box::new(source),
    }
}
