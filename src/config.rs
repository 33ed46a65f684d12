//! Runtime configuration: environment settings plus the dataset catalog

use crate::ingestion::types::{ApiAuth, DatasetDescriptor};
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

/// Catalog used when `DATASETS_CONFIG` is not set
const DEFAULT_CATALOG: &str = include_str!("../datasets.json");

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub key_vault_url: String,
    pub username_secret: String,
    pub key_secret: String,
    pub storage_account_url: String,
    pub container: String,
    pub api_base_url: String,
    pub api_auth: ApiAuth,
    pub datasets_path: Option<String>,
    pub http_timeout_secs: u64,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable lookup; unset variables fall back to defaults
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            key_vault_url: or("KEY_VAULT_URL", "https://keggleapikey.vault.azure.net/"),

            username_secret: or("API_USERNAME_SECRET", "KeggleAPIUsername"),

            key_secret: or("API_KEY_SECRET", "KaggleApiKey"),

            storage_account_url: or(
                "STORAGE_ACCOUNT_URL",
                "https://olympicsstudydatastorage.blob.core.windows.net/",
            ),

            container: or("BLOB_CONTAINER", "raw-data-bronze"),

            api_base_url: or("DATASET_API_BASE", "https://www.kaggle.com/api/v1"),

            api_auth: or("DATASET_API_AUTH", "basic")
                .parse()
                .context("DATASET_API_AUTH must be 'basic' or 'bearer'")?,

            datasets_path: var("DATASETS_CONFIG").filter(|p| !p.trim().is_empty()),

            http_timeout_secs: or("HTTP_TIMEOUT_SECS", "300")
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a valid number")?,

            port: or("FUNCTIONS_CUSTOMHANDLER_PORT", "3001")
                .parse()
                .context("FUNCTIONS_CUSTOMHANDLER_PORT must be a valid port")?,
        })
    }

    /// Load the dataset catalog from `datasets_path`, or the built-in one
    pub fn load_catalog(&self) -> Result<Vec<DatasetDescriptor>> {
        match &self.datasets_path {
            Some(path) => load_catalog_file(Path::new(path)),
            None => parse_catalog(DEFAULT_CATALOG).context("Built-in dataset catalog is invalid"),
        }
    }
}

pub fn load_catalog_file(path: &Path) -> Result<Vec<DatasetDescriptor>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset catalog {:?}", path))?;
    parse_catalog(&contents).with_context(|| format!("Invalid dataset catalog {:?}", path))
}

/// Parse a JSON array of dataset descriptors
pub fn parse_catalog(json: &str) -> Result<Vec<DatasetDescriptor>> {
    let catalog: Vec<DatasetDescriptor> = serde_json::from_str(json)?;

    if catalog.is_empty() {
        return Err(anyhow::anyhow!("Dataset catalog is empty"));
    }

    for (i, descriptor) in catalog.iter().enumerate() {
        if descriptor.owner.trim().is_empty() || descriptor.dataset.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Catalog entry {} needs a non-empty owner and dataset",
                i
            ));
        }
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.key_vault_url, "https://keggleapikey.vault.azure.net/");
        assert_eq!(config.username_secret, "KeggleAPIUsername");
        assert_eq!(config.key_secret, "KaggleApiKey");
        assert_eq!(config.container, "raw-data-bronze");
        assert_eq!(config.api_base_url, "https://www.kaggle.com/api/v1");
        assert_eq!(config.api_auth, ApiAuth::Basic);
        assert_eq!(config.http_timeout_secs, 300);
        assert_eq!(config.port, 3001);
        assert!(config.datasets_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("DATASET_API_AUTH", "bearer"),
            ("BLOB_CONTAINER", "raw"),
            ("HTTP_TIMEOUT_SECS", "30"),
            ("FUNCTIONS_CUSTOMHANDLER_PORT", "7071"),
        ])
        .unwrap();
        assert_eq!(config.api_auth, ApiAuth::Bearer);
        assert_eq!(config.container, "raw");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.port, 7071);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_with(&[("HTTP_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_with(&[("DATASET_API_AUTH", "oauth")]).is_err());
        assert!(config_with(&[("FUNCTIONS_CUSTOMHANDLER_PORT", "99999")]).is_err());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = config_with(&[]).unwrap().load_catalog().unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog[1],
            DatasetDescriptor::new("chadalee", "country-wise-gdp-data", &["world_gdp.csv"])
        );
        assert_eq!(
            catalog[0].filenames,
            vec!["athlete_events.csv", "noc_regions.csv"]
        );
    }

    #[test]
    fn test_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"owner": "someone", "dataset": "my data", "filenames": ["a.csv"]}}]"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = config_with(&[("DATASETS_CONFIG", path.as_str())]).unwrap();
        let catalog = config.load_catalog().unwrap();

        assert_eq!(catalog, vec![DatasetDescriptor::new("someone", "my data", &["a.csv"])]);
    }

    #[test]
    fn test_invalid_catalogs() {
        assert!(parse_catalog("[]").is_err());
        assert!(parse_catalog("{}").is_err());
        assert!(parse_catalog(r#"[{"owner": "", "dataset": "x", "filenames": []}]"#).is_err());
        assert!(load_catalog_file(Path::new("/nonexistent/datasets.json")).is_err());
    }
}
