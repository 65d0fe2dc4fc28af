//! Utility functions for working with the dataset files

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::error::{ErReaderError, Result};

pub mod progress;

/// Default number of rows per record batch
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("ER1243_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}

/// Validates that a path exists and is a regular file
///
/// # Arguments
/// * `path` - The file path to check
///
/// # Returns
/// `Ok(())` if the file exists, otherwise an error
///
/// # Errors
/// Returns an error if the file does not exist or is not a file
pub fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() || !path.is_file() {
        return Err(ErReaderError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File does not exist: {}", path.display()),
        )));
    }
    Ok(())
}

/// Find a column's index in a record batch
///
/// # Arguments
/// * `batch` - The record batch to search
/// * `name` - The column name
///
/// # Returns
/// The column index
///
/// # Errors
/// Returns an error if the column cannot be found
pub fn find_column(batch: &RecordBatch, name: &str) -> Result<usize> {
    batch.schema().index_of(name).map_err(|e| {
        ErReaderError::MetadataError(format!("Column {name} not found in record batch: {e}"))
    })
}

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `elapsed` - How long the operation took
pub fn log_operation_complete(operation: &str, elapsed: std::time::Duration) {
    log::info!("{operation} completed in {elapsed:?}");
}
