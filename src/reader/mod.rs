//! Module for reading the ER 1243 CSV with schema validation.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::config::CsvReaderConfig;
use crate::error::{ErReaderError, Result};
use crate::schema::{SchemaCompatibilityReport, check_schema};
use crate::utils::{log_operation_complete, log_operation_start, validate_file};

/// A struct for reading the semicolon-separated ER 1243 export with schema
/// validation
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    config: CsvReaderConfig,
}

impl CsvReader {
    /// Creates a new `CsvReader`
    #[must_use]
    pub fn new(config: CsvReaderConfig) -> Self {
        Self { config }
    }

    /// The reader's configuration
    #[must_use]
    pub fn config(&self) -> &CsvReaderConfig {
        &self.config
    }

    /// Infer the file's schema from a bounded sample of records
    ///
    /// # Returns
    /// The inferred schema and the number of records inspected
    pub fn infer_schema(&self, path: &Path) -> Result<(Schema, usize)> {
        validate_file(path)?;
        let file = File::open(path)?;
        let format = Format::default()
            .with_header(self.config.has_header)
            .with_delimiter(self.config.delimiter);
        let (schema, inspected) =
            format.infer_schema(file, Some(self.config.max_inference_records))?;
        Ok((schema, inspected))
    }

    /// Check the file's schema against the data dictionary
    pub fn validate(&self, path: &Path) -> Result<SchemaCompatibilityReport> {
        let (schema, _) = self.infer_schema(path)?;
        Ok(check_schema(&schema))
    }

    /// Open the file and return a streaming batch iterator
    ///
    /// Schema validation runs first when configured; incompatibilities either
    /// abort or are logged as warnings, depending on
    /// `fail_on_schema_incompatibility`.
    pub fn open(&self, path: &Path) -> Result<CsvBatchIterator> {
        let (inferred, inspected) = self.infer_schema(path)?;
        log::debug!(
            "Inferred {} columns from {} records of {}",
            inferred.fields().len(),
            inspected,
            path.display()
        );

        if self.config.validate_schema {
            let report = check_schema(&inferred);
            for issue in &report.issues {
                log::warn!(
                    "Schema issue in {}: {}: {}",
                    path.display(),
                    issue.column,
                    issue.description
                );
            }
            if !report.compatible && self.config.fail_on_schema_incompatibility {
                return Err(ErReaderError::SchemaError(format!(
                    "{} is incompatible with the ER 1243 data dictionary ({} issues)",
                    path.display(),
                    report.issues.len()
                )));
            }
        }

        let file = File::open(path)?;
        let reader = csv::ReaderBuilder::new(Arc::new(decodable_schema(&inferred)))
            .with_header(self.config.has_header)
            .with_delimiter(self.config.delimiter)
            .with_batch_size(self.config.batch_size)
            .build(file)?;

        Ok(CsvBatchIterator { inner: reader })
    }

    /// Read the whole file into record batches
    pub fn read(&self, path: &Path) -> Result<Vec<RecordBatch>> {
        log_operation_start("Reading CSV file", path);
        let start = Instant::now();

        let batches = self.open(path)?.collect::<Result<Vec<_>>>()?;

        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        log::info!("Read {} rows in {} batches", rows, batches.len());
        log_operation_complete("CSV read", start.elapsed());
        Ok(batches)
    }
}

/// Iterator over record batches from a CSV file
pub struct CsvBatchIterator {
    inner: csv::Reader<File>,
}

impl Iterator for CsvBatchIterator {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|batch| batch.map_err(Into::into))
    }
}

/// Read a CSV file into record batches with the given configuration
pub fn read_csv(path: &Path, config: &CsvReaderConfig) -> Result<Vec<RecordBatch>> {
    CsvReader::new(config.clone()).read(path)
}

/// Replace `Null` column types with `Utf8` so the decoder accepts them
///
/// Inference yields `Null` for columns of a header-only file; the decoder
/// never sees a value for them, but it rejects the type upfront.
fn decodable_schema(inferred: &Schema) -> Schema {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|field| {
            if field.data_type() == &DataType::Null {
                Field::new(field.name(), DataType::Utf8, true)
            } else {
                field.as_ref().clone()
            }
        })
        .collect();
    Schema::new(fields)
}
