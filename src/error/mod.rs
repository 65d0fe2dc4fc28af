//! Error handling for the `CsvReader` and the analysis pipeline.

use std::{fmt, io};

use arrow::error::ArrowError;

use crate::download::DownloadError;

/// Specialized error type for the ER 1243 reader
#[derive(Debug)]
pub enum ErReaderError {
    /// Error opening or reading a file
    IoError(io::Error),
    /// Error decoding CSV data into Arrow batches
    ArrowError(ArrowError),
    /// Error with schema compatibility
    SchemaError(String),
    /// Error with file or column metadata
    MetadataError(String),
    /// Error parsing a cell value into its documented type
    ParseError(String),
    /// Error fetching the dataset over HTTP
    DownloadError(DownloadError),
    /// Contextual error from a lower layer
    Other(anyhow::Error),
}

impl From<io::Error> for ErReaderError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error)
    }
}

impl From<ArrowError> for ErReaderError {
    fn from(error: ArrowError) -> Self {
        Self::ArrowError(error)
    }
}

impl From<DownloadError> for ErReaderError {
    fn from(error: DownloadError) -> Self {
        Self::DownloadError(error)
    }
}

impl From<anyhow::Error> for ErReaderError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error)
    }
}

impl fmt::Display for ErReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::ArrowError(e) => write!(f, "Arrow error: {e}"),
            Self::SchemaError(msg) => write!(f, "Schema error: {msg}"),
            Self::MetadataError(msg) => write!(f, "Metadata error: {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::DownloadError(e) => write!(f, "Download error: {e}"),
            Self::Other(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ErReaderError {}

/// Result type for ER 1243 reader operations
pub type Result<T> = std::result::Result<T, ErReaderError>;
