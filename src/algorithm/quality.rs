//! Data quality assessment
//!
//! The provider's data is immutable reference data: problems are counted
//! and reported, never repaired. The report covers the raw file (missing
//! cells, duplicate rows, required columns) and the cleaned observations
//! (confidence interval consistency, grouping value domains).

use std::collections::BTreeMap;
use std::fmt;

use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::Result;
use crate::extract::{Dataset, cell_string};
use crate::schema::required_columns;

/// Quality metrics for one read of the dataset
#[derive(Debug, Clone, Serialize)]
pub struct DataQualityReport {
    /// Rows in the raw file
    pub total_records: usize,
    /// Columns in the raw file
    pub total_columns: usize,
    /// Missing cells per column (nulls, empty strings and `nan` markers)
    pub missing_by_column: BTreeMap<String, usize>,
    /// Exact duplicate rows
    pub duplicate_rows: usize,
    /// Required columns absent from the file
    pub missing_required_columns: Vec<String>,
    /// Rows discarded during cleaning (missing disease or indicator type)
    pub dropped_rows: usize,
    /// Observations violating lower bound <= rate <= upper bound
    pub ci_violations: usize,
    /// Observations whose grouping value is outside its variable's domain
    pub out_of_domain_values: usize,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
}

impl DataQualityReport {
    /// Serialize the report to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize quality report: {e}").into())
    }

    /// Whether the file is structurally usable for analysis
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.missing_required_columns.is_empty()
    }
}

impl fmt::Display for DataQualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data Quality Report:")?;
        writeln!(f, "  Total Records: {}", self.total_records)?;
        writeln!(f, "  Total Columns: {}", self.total_columns)?;
        writeln!(f, "  Duplicate Rows: {}", self.duplicate_rows)?;
        writeln!(f, "  Dropped During Cleaning: {}", self.dropped_rows)?;
        writeln!(f, "  CI Violations: {}", self.ci_violations)?;
        writeln!(f, "  Out-of-Domain Values: {}", self.out_of_domain_values)?;
        if self.missing_required_columns.is_empty() {
            writeln!(f, "  Required Columns: all present")?;
        } else {
            writeln!(
                f,
                "  Missing Required Columns: {}",
                self.missing_required_columns.join(", ")
            )?;
        }
        let with_missing: Vec<String> = self
            .missing_by_column
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(column, count)| format!("{column} ({count})"))
            .collect();
        if with_missing.is_empty() {
            writeln!(f, "  Missing Cells: none")?;
        } else {
            writeln!(f, "  Missing Cells: {}", with_missing.join(", "))?;
        }
        Ok(())
    }
}

/// Assess raw batches and the cleaned dataset extracted from them
#[must_use]
pub fn assess(batches: &[RecordBatch], dataset: &Dataset) -> DataQualityReport {
    let total_records: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let total_columns = batches.first().map_or(0, RecordBatch::num_columns);

    let mut missing_by_column = BTreeMap::new();
    if let Some(first) = batches.first() {
        for (idx, field) in first.schema().fields().iter().enumerate() {
            let missing = batches
                .iter()
                .map(|batch| missing_in_column(batch, idx))
                .sum();
            missing_by_column.insert(field.name().clone(), missing);
        }
    }

    let missing_required_columns = match batches.first() {
        Some(first) => {
            let schema = first.schema();
            required_columns()
                .iter()
                .filter(|name| schema.index_of(name).is_err())
                .map(ToString::to_string)
                .collect()
        }
        None => required_columns().iter().map(ToString::to_string).collect(),
    };

    let ci_violations = dataset.iter().filter(|obs| !obs.ci_consistent()).count();
    let out_of_domain_values = dataset
        .iter()
        .filter(|obs| obs.grouping_value_in_domain() == Some(false))
        .count();

    let report = DataQualityReport {
        total_records,
        total_columns,
        missing_by_column,
        duplicate_rows: count_duplicate_rows(batches),
        missing_required_columns,
        dropped_rows: dataset.dropped_rows(),
        ci_violations,
        out_of_domain_values,
        generated_at: Utc::now(),
    };

    if report.ci_violations > 0 {
        log::warn!(
            "{} observations violate the confidence interval invariant",
            report.ci_violations
        );
    }
    report
}

fn missing_in_column(batch: &RecordBatch, idx: usize) -> usize {
    (0..batch.num_rows())
        .filter(|row| match cell_string(batch, idx, *row) {
            None => true,
            Some(value) => {
                let value = value.trim();
                value.is_empty() || value.eq_ignore_ascii_case("nan")
            }
        })
        .count()
}

fn count_duplicate_rows(batches: &[RecordBatch]) -> usize {
    let mut seen = FxHashSet::default();
    let mut duplicates = 0;
    for batch in batches {
        for row in 0..batch.num_rows() {
            let key: Vec<Option<String>> = (0..batch.num_columns())
                .map(|idx| cell_string(batch, idx, row))
                .collect();
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
    }
    duplicates
}
