//! Utility functions for common operations

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

/// Build the shared HTTP client used for downloads, token requests and Key Vault
pub fn http_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Blob subfolder for a dataset slug
pub fn dataset_subfolder(dataset: &str) -> String {
    dataset.replace(' ', "_")
}

/// Destination blob path for one extracted file
pub fn blob_path(dataset: &str, filename: &str) -> String {
    format!("{}/{}", dataset_subfolder(dataset), filename)
}

/// Whether a Content-Type header value announces a ZIP container
pub fn is_zip_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("zip")
}
