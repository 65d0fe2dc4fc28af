//! High-level dataset loading pipeline
//!
//! One call takes the local CSV through reading, validation, extraction and
//! quality assessment; `ensure_dataset` fetches the file first when it is
//! not on disk yet.

use std::path::Path;
use std::time::Instant;

use crate::algorithm::quality::{DataQualityReport, assess};
use crate::config::CsvReaderConfig;
use crate::download::{DownloadConfig, fetch_dataset_blocking};
use crate::error::Result;
use crate::extract::{Dataset, extract_observations};
use crate::reader::read_csv;
use crate::utils::{log_operation_complete, log_operation_start};

/// Read, validate, clean and assess the dataset at `path`
///
/// # Returns
/// The cleaned dataset together with its quality report
pub fn load_dataset(
    path: &Path,
    config: &CsvReaderConfig,
) -> Result<(Dataset, DataQualityReport)> {
    log_operation_start("Loading dataset", path);
    let start = Instant::now();

    let batches = read_csv(path, config)?;
    let dataset = extract_observations(&batches, config)?;
    let report = assess(&batches, &dataset);

    log_operation_complete("Dataset load", start.elapsed());
    Ok((dataset, report))
}

/// Load the dataset, fetching it from the portal first when missing
pub fn ensure_dataset(
    download: &DownloadConfig,
    config: &CsvReaderConfig,
) -> Result<(Dataset, DataQualityReport)> {
    if !download.dest.exists() {
        log::info!(
            "Dataset not found at {}, fetching from the portal",
            download.dest.display()
        );
        fetch_dataset_blocking(download)?;
    }
    load_dataset(&download.dest, config)
}
