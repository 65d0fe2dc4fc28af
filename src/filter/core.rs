//! Core filtering functionality for record batches
//!
//! Defines the common trait and functions for filtering Arrow record
//! batches, shared by the expression layer and ad-hoc masks.

use anyhow::Context;

use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::filter as arrow_filter;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::filter::expr::{Expr, evaluate_expr};

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
///
/// # Returns
/// A new record batch with only rows where mask is true
///
/// # Errors
/// Returns an error if filtering fails
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(anyhow::anyhow!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )
        .into());
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<arrow::error::Result<_>>()
        .with_context(|| "Failed to apply boolean filter to columns")?;

    RecordBatch::try_new(batch.schema(), filtered_columns)
        .with_context(|| "Failed to create filtered record batch")
        .map_err(Into::into)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> std::collections::HashSet<String>;
}

impl BatchFilter for Expr {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = evaluate_expr(batch, self)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> std::collections::HashSet<String> {
        Expr::required_columns(self)
    }
}

/// Filter a sequence of record batches with an expression
///
/// Batches left empty by the filter are dropped from the result.
pub fn filter_batches(batches: &[RecordBatch], expr: &Expr) -> Result<Vec<RecordBatch>> {
    let mut filtered = Vec::with_capacity(batches.len());
    for batch in batches {
        let result = BatchFilter::filter(expr, batch)?;
        if result.num_rows() > 0 {
            filtered.push(result);
        }
    }
    Ok(filtered)
}
