//! Acquisition of the ER 1243 export over HTTP
//!
//! The dataset is published on the DREES open data portal under the Licence
//! Ouverte. One checked GET streams the response body to a local CSV file;
//! the bytes on disk are exactly the response body. The export is immutable
//! reference data, so a file that is already present is not fetched again
//! unless `overwrite` is set.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::utils::progress::create_download_progress_bar;

/// CSV export endpoint for the dataset on the DREES portal
pub const DEFAULT_DATASET_URL: &str = "https://data.drees.solidarites-sante.gouv.fr/api/explore/v2.1/catalog/datasets/er_inegalites_maladies_chroniques/exports/csv";

/// Default local path for the downloaded export
pub const DEFAULT_DATASET_PATH: &str = "data/er_inegalites_maladies_chroniques.csv";

/// Errors from fetching the dataset.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Writing the response body to disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server answered with a non-success status.
    #[error("Server returned {status} for {url}")]
    Status {
        /// HTTP status code received
        status: reqwest::StatusCode,
        /// Requested URL
        url: String,
    },
}

/// Configuration for fetching the dataset
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// URL of the CSV export
    pub url: String,
    /// Local destination path
    pub dest: PathBuf,
    /// Re-download even when the destination already exists
    pub overwrite: bool,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            dest: PathBuf::from(DEFAULT_DATASET_PATH),
            overwrite: false,
            timeout: Duration::from_secs(300),
        }
    }
}

impl DownloadConfig {
    /// Configuration for a custom destination path
    #[must_use]
    pub fn with_dest(dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            ..Self::default()
        }
    }
}

/// Outcome of a fetch
#[derive(Debug, Clone, Serialize)]
pub struct DownloadReport {
    /// Where the file lives locally
    pub dest: PathBuf,
    /// Size of the file on disk
    pub bytes_written: u64,
    /// Whether the fetch was skipped because the file was already present
    pub skipped: bool,
    /// When the fetch finished
    pub fetched_at: DateTime<Utc>,
}

/// Fetch the dataset asynchronously
///
/// Performs one GET against the configured URL, fails on a non-success
/// status, and streams the body to the destination (creating parent
/// directories as needed). Progress is reported while streaming.
///
/// # Errors
/// Returns an error on HTTP failure, a non-success status, or when writing
/// the destination fails.
pub async fn fetch_dataset(
    config: &DownloadConfig,
) -> std::result::Result<DownloadReport, DownloadError> {
    if !config.overwrite && config.dest.exists() {
        let existing = tokio::fs::metadata(&config.dest).await?;
        log::info!(
            "Dataset already present at {} ({} bytes), skipping fetch",
            config.dest.display(),
            existing.len()
        );
        return Ok(DownloadReport {
            dest: config.dest.clone(),
            bytes_written: existing.len(),
            skipped: true,
            fetched_at: Utc::now(),
        });
    }

    if let Some(parent) = config.dest.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    log::info!("Fetching {}", config.url);
    let client = reqwest::Client::builder().timeout(config.timeout).build()?;
    let response = client.get(&config.url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            status,
            url: config.url.clone(),
        });
    }

    let pb = create_download_progress_bar(
        response.content_length(),
        file_label(&config.dest).as_deref(),
    );

    let mut file = tokio::fs::File::create(&config.dest).await?;
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        bytes_written += chunk.len() as u64;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;
    pb.finish_and_clear();

    log::info!(
        "Wrote {} bytes to {}",
        bytes_written,
        config.dest.display()
    );

    Ok(DownloadReport {
        dest: config.dest.clone(),
        bytes_written,
        skipped: false,
        fetched_at: Utc::now(),
    })
}

/// Fetch the dataset from synchronous code
///
/// Drives [`fetch_dataset`] on a runtime, reusing the current one when the
/// caller already runs inside tokio.
pub fn fetch_dataset_blocking(
    config: &DownloadConfig,
) -> std::result::Result<DownloadReport, DownloadError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        futures::executor::block_on(fetch_dataset(config))
    } else {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(fetch_dataset(config))
    }
}

/// Dataset citation block
///
/// The export is published under the Etalab open license; reuse requires
/// attribution to DREES.
#[must_use]
pub fn attribution() -> &'static str {
    "Data source: DREES (Direction de la Recherche, des Études, de l'Évaluation et des Statistiques)\n\
     Dataset: ER 1243 - Social Inequalities and Chronic Diseases\n\
     Publication: \"Chronic diseases affect modest people more often and reduce their life expectancy further\"\n\
     License: Open License / Licence Ouverte (Etalab)\n\
     Portal: https://data.drees.solidarites-sante.gouv.fr/"
}

fn file_label(dest: &Path) -> Option<String> {
    dest.file_name().map(|name| name.to_string_lossy().into_owned())
}
