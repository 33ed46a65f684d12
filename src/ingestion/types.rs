//! Core data types for the sync pipeline
//! Pure data structures with no I/O

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One dataset to mirror: who publishes it, its slug, and the archive
/// members to copy out of it (in upload order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub owner: String,
    pub dataset: String,
    pub filenames: Vec<String>,
}

impl DatasetDescriptor {
    pub fn new(owner: &str, dataset: &str, filenames: &[&str]) -> Self {
        DatasetDescriptor {
            owner: owner.to_string(),
            dataset: dataset.to_string(),
            filenames: filenames.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Dataset API credentials read from the secret store.
/// Held in memory for one invocation only.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPair {
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for SecretPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPair")
            .field("username", &"***")
            .field("key", &"***")
            .finish()
    }
}

/// How the dataset API expects to be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiAuth {
    /// HTTP basic auth with username and key
    #[default]
    Basic,
    /// API key sent as a bearer token
    Bearer,
}

impl std::str::FromStr for ApiAuth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(ApiAuth::Basic),
            "bearer" => Ok(ApiAuth::Bearer),
            other => Err(anyhow::anyhow!(
                "Unknown dataset API auth scheme '{}' (expected 'basic' or 'bearer')",
                other
            )),
        }
    }
}

/// Reasons a single dataset is skipped. None of these abort the invocation.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("response is not a ZIP file (content type '{0}')")]
    NotZip(String),

    #[error("bad ZIP file: {0}")]
    BadZip(#[source] zip::result::ZipError),

    #[error("failed to read '{name}' from archive: {source}")]
    Member {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("upload of '{path}' failed: {source}")]
    Upload {
        path: String,
        #[source]
        source: object_store::Error,
    },
}

/// What happened to one dataset
#[derive(Debug)]
pub enum DatasetOutcome {
    Synced {
        uploaded: Vec<String>,
        missing: Vec<String>,
    },
    Skipped(DatasetError),
}

#[derive(Debug)]
pub struct DatasetResult {
    pub dataset: String,
    pub outcome: DatasetOutcome,
}

/// Aggregate of one pass over the catalog
#[derive(Debug)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<DatasetResult>,
}

impl SyncReport {
    pub fn synced(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, DatasetOutcome::Synced { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.results.len() - self.synced()
    }

    pub fn uploaded(&self) -> usize {
        self.results
            .iter()
            .map(|r| match &r.outcome {
                DatasetOutcome::Synced { uploaded, .. } => uploaded.len(),
                DatasetOutcome::Skipped(_) => 0,
            })
            .sum()
    }

    pub fn missing(&self) -> usize {
        self.results
            .iter()
            .map(|r| match &r.outcome {
                DatasetOutcome::Synced { missing, .. } => missing.len(),
                DatasetOutcome::Skipped(_) => 0,
            })
            .sum()
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elapsed = self.finished_at - self.started_at;
        write!(
            f,
            "datasets: {}, synced: {}, skipped: {}, uploaded: {}, missing: {} ({} ms)",
            self.results.len(),
            self.synced(),
            self.skipped(),
            self.uploaded(),
            self.missing(),
            elapsed.num_milliseconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(results: Vec<DatasetResult>) -> SyncReport {
        let now = Utc::now();
        SyncReport {
            started_at: now,
            finished_at: now,
            results,
        }
    }

    #[test]
    fn test_secret_pair_debug_is_redacted() {
        let secrets = SecretPair {
            username: "someone".to_string(),
            key: "hunter2".to_string(),
        };
        let printed = format!("{:?}", secrets);
        assert!(!printed.contains("someone"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_api_auth_parse() {
        assert_eq!("basic".parse::<ApiAuth>().unwrap(), ApiAuth::Basic);
        assert_eq!(" Bearer ".parse::<ApiAuth>().unwrap(), ApiAuth::Bearer);
        assert!("digest".parse::<ApiAuth>().is_err());
    }

    #[test]
    fn test_report_counts() {
        let report = report(vec![
            DatasetResult {
                dataset: "a".to_string(),
                outcome: DatasetOutcome::Synced {
                    uploaded: vec!["one.csv".to_string(), "two.csv".to_string()],
                    missing: vec!["three.csv".to_string()],
                },
            },
            DatasetResult {
                dataset: "b".to_string(),
                outcome: DatasetOutcome::Skipped(DatasetError::NotZip("text/html".to_string())),
            },
        ]);

        assert_eq!(report.synced(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.uploaded(), 2);
        assert_eq!(report.missing(), 1);
        assert!(report
            .to_string()
            .starts_with("datasets: 2, synced: 1, skipped: 1, uploaded: 2, missing: 1"));
    }
}
