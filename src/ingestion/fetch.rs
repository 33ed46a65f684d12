//! Fetch functions - download dataset archives from the dataset API

use crate::ingestion::types::{ApiAuth, DatasetDescriptor, DatasetError, SecretPair};
use crate::ingestion::utils::is_zip_content_type;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::info;

/// Client for `{api-base}/datasets/download/{owner}/{dataset}`
#[derive(Debug, Clone)]
pub struct DatasetApi {
    http: Client,
    base_url: String,
    auth: ApiAuth,
    credentials: SecretPair,
}

impl DatasetApi {
    pub fn new(http: Client, base_url: &str, auth: ApiAuth, credentials: SecretPair) -> Self {
        DatasetApi {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            credentials,
        }
    }

    pub fn download_url(&self, descriptor: &DatasetDescriptor) -> String {
        format!(
            "{}/datasets/download/{}/{}",
            self.base_url, descriptor.owner, descriptor.dataset
        )
    }

    /// Download a dataset archive and check it is announced as a ZIP.
    /// Any non-200 status or non-ZIP content type is returned as an error without retrying.
    pub async fn download(&self, descriptor: &DatasetDescriptor) -> Result<Bytes, DatasetError> {
        let url = self.download_url(descriptor);
        info!("Downloading from {}", url);

        let request = self.http.get(&url);
        let request = match self.auth {
            ApiAuth::Basic => {
                request.basic_auth(&self.credentials.username, Some(&self.credentials.key))
            }
            ApiAuth::Bearer => request.bearer_auth(&self.credentials.key),
        };

        let response = request.send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            return Err(DatasetError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_zip_content_type(&content_type) {
            return Err(DatasetError::NotZip(content_type));
        }

        let bytes = response.bytes().await?;
        info!("Downloaded {} bytes", bytes.len());
        Ok(bytes)
    }
}
