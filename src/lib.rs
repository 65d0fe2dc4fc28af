//! A Rust library for downloading and reading the DREES ER 1243 chronic
//! disease inequality dataset, with schema validation, filtering, and
//! inequality analysis.

pub mod algorithm;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod filter;
pub mod loader;
pub mod models;
pub mod reader;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::CsvReaderConfig;
pub use error::{ErReaderError, Result};
pub use reader::{CsvBatchIterator, CsvReader, read_csv};
pub use schema::{SchemaCompatibilityReport, SchemaIssue, check_schema, er1243_schema};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Domain model
pub use extract::{Dataset, extract_observations};
pub use models::{GroupingVariable, RateObservation, RateType};

// Filtering capabilities
pub use filter::{Expr, LiteralValue};
pub use filter::{evaluate_expr, filter_batches, filter_record_batch};

// Acquisition
pub use download::{
    DEFAULT_DATASET_PATH, DEFAULT_DATASET_URL, DownloadConfig, DownloadError, DownloadReport,
    attribution, fetch_dataset, fetch_dataset_blocking,
};

// Pipeline entry points
pub use loader::{ensure_dataset, load_dataset};

// Analysis
pub use algorithm::{
    DataQualityReport, DiseaseInequality, GroupedRate, IncomeGradient, InequalitySeverity,
    RegionalSpread, income_gradient, inequality_ratio, rank_by_inequality, regional_spread,
    top_diseases,
};
