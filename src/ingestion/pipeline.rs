//! Per-dataset pipeline: download, validate, extract, upload

use crate::ingestion::extract::Archive;
use crate::ingestion::fetch::DatasetApi;
use crate::ingestion::types::{
    DatasetDescriptor, DatasetError, DatasetOutcome, DatasetResult, SyncReport,
};
use crate::ingestion::utils::{blob_path, dataset_subfolder};
use crate::ingestion::write::BlobSink;
use chrono::Utc;
use tracing::{debug, error, info, warn};

/// Run every descriptor in order. A failing dataset is logged and skipped;
/// it never stops the ones after it.
pub async fn sync_all(
    api: &DatasetApi,
    sink: &BlobSink,
    catalog: &[DatasetDescriptor],
) -> SyncReport {
    let started_at = Utc::now();
    let mut results = Vec::with_capacity(catalog.len());

    for descriptor in catalog {
        info!(
            "Processing dataset: {} by {}",
            descriptor.dataset, descriptor.owner
        );

        let outcome = match sync_dataset(api, sink, descriptor).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Skipping dataset {}: {}", descriptor.dataset, e);
                DatasetOutcome::Skipped(e)
            }
        };

        results.push(DatasetResult {
            dataset: descriptor.dataset.clone(),
            outcome,
        });
    }

    SyncReport {
        started_at,
        finished_at: Utc::now(),
        results,
    }
}

/// Mirror one dataset. Files uploaded before a failure stay in storage.
pub async fn sync_dataset(
    api: &DatasetApi,
    sink: &BlobSink,
    descriptor: &DatasetDescriptor,
) -> Result<DatasetOutcome, DatasetError> {
    let bytes = api.download(descriptor).await?;
    let mut archive = Archive::open(bytes)?;
    debug!(
        "Archive for '{}' holds {:?}",
        descriptor.dataset,
        archive.member_names()
    );

    let subfolder = dataset_subfolder(&descriptor.dataset);
    let mut uploaded = Vec::new();
    let mut missing = Vec::new();

    for filename in &descriptor.filenames {
        let Some(data) = archive.read(filename)? else {
            warn!(
                "File '{}' not found in dataset '{}'",
                filename, descriptor.dataset
            );
            missing.push(filename.clone());
            continue;
        };

        let path = blob_path(&descriptor.dataset, filename);
        sink.upload(&path, data)
            .await
            .map_err(|source| DatasetError::Upload {
                path: path.clone(),
                source,
            })?;

        info!(
            "Uploaded '{}' to subfolder '{}' in container '{}'",
            filename,
            subfolder,
            sink.container()
        );
        uploaded.push(filename.clone());
    }

    Ok(DatasetOutcome::Synced { uploaded, missing })
}
