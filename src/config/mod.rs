//! Configuration for `CsvReader`.

use crate::utils::{DEFAULT_BATCH_SIZE, get_batch_size};

/// Configuration for the `CsvReader`
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// Field delimiter (the ER 1243 export is semicolon separated)
    pub delimiter: u8,
    /// Whether the first line is a header row
    pub has_header: bool,
    /// Number of rows per record batch
    pub batch_size: usize,
    /// Maximum number of records inspected during schema inference
    pub max_inference_records: usize,
    /// Whether to perform schema validation against the data dictionary
    pub validate_schema: bool,
    /// Whether to fail on schema incompatibility
    pub fail_on_schema_incompatibility: bool,
    /// Enable lenient adaptation of string-encoded numerics during extraction
    pub adapt_types: bool,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b';',
            has_header: true,
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
            max_inference_records: 1000,
            validate_schema: true,
            fail_on_schema_incompatibility: true,
            adapt_types: true,
        }
    }
}
