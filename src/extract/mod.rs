//! Batch-to-model extraction and cleaning
//!
//! Adapts raw CSV record batches into typed [`RateObservation`]s. The export
//! string-encodes most numerics (sometimes with French decimal commas), so
//! the accessors here accept whatever type CSV inference produced for a
//! column and parse leniently. Cleaning follows the published analysis:
//! rows missing the disease label or the indicator type are dropped, and
//! literal `nan` grouping values are treated as missing.

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::record_batch::RecordBatch;
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use rayon::prelude::*;

use crate::config::CsvReaderConfig;
use crate::error::{ErReaderError, Result};
use crate::models::{GroupingVariable, RateObservation, RateType};
use crate::schema::columns;
use crate::utils::progress::create_rows_progress_bar;

/// A cleaned, in-memory view of the dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<RateObservation>,
    dropped_rows: usize,
}

impl Dataset {
    /// Create a dataset from cleaned observations
    #[must_use]
    pub fn new(observations: Vec<RateObservation>, dropped_rows: usize) -> Self {
        Self {
            observations,
            dropped_rows,
        }
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset holds no observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Rows discarded during cleaning (missing disease or indicator type)
    #[must_use]
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// All observations
    #[must_use]
    pub fn observations(&self) -> &[RateObservation] {
        &self.observations
    }

    /// Iterate over all observations
    pub fn iter(&self) -> impl Iterator<Item = &RateObservation> {
        self.observations.iter()
    }

    /// Consume the dataset, returning the observations
    #[must_use]
    pub fn into_observations(self) -> Vec<RateObservation> {
        self.observations
    }

    /// Sorted unique disease names
    #[must_use]
    pub fn diseases(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|obs| obs.disease.clone())
            .unique()
            .sorted()
            .collect()
    }

    /// Observations for one disease
    pub fn of_disease<'a>(&'a self, disease: &'a str) -> impl Iterator<Item = &'a RateObservation> {
        self.observations
            .iter()
            .filter(move |obs| obs.disease == disease)
    }

    /// Observations of one indicator type
    pub fn of_rate_type(&self, rate_type: RateType) -> impl Iterator<Item = &RateObservation> {
        self.observations
            .iter()
            .filter(move |obs| obs.rate_type == rate_type)
    }

    /// Observations stratified by one grouping variable
    pub fn of_grouping(
        &self,
        variable: GroupingVariable,
    ) -> impl Iterator<Item = &RateObservation> {
        self.observations
            .iter()
            .filter(move |obs| obs.is_grouped_by(variable))
    }
}

impl From<Vec<RateObservation>> for Dataset {
    fn from(observations: Vec<RateObservation>) -> Self {
        Self::new(observations, 0)
    }
}

/// Extract cleaned observations from raw CSV record batches
///
/// Batches are processed in parallel. The critical columns (`varTauxLib`,
/// `type`) must exist in the batch schema; every other documented column is
/// optional and missing ones leave the corresponding fields empty.
///
/// # Errors
/// Returns a metadata error when a critical column is absent.
pub fn extract_observations(batches: &[RecordBatch], config: &CsvReaderConfig) -> Result<Dataset> {
    let adapt = config.adapt_types;
    let pb = create_rows_progress_bar(batches.len() as u64, Some("Extracting observations"));
    let per_batch = batches
        .par_iter()
        .progress_with(pb)
        .map(|batch| extract_batch(batch, adapt))
        .collect::<Result<Vec<_>>>()?;

    let mut observations = Vec::with_capacity(per_batch.iter().map(|(obs, _)| obs.len()).sum());
    let mut dropped = 0;
    for (obs, batch_dropped) in per_batch {
        observations.extend(obs);
        dropped += batch_dropped;
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} rows missing disease label or indicator type");
    }
    log::info!("Extracted {} observations", observations.len());

    Ok(Dataset::new(observations, dropped))
}

fn extract_batch(batch: &RecordBatch, adapt: bool) -> Result<(Vec<RateObservation>, usize)> {
    let cols = ColumnIndexes::resolve(batch)?;
    let mut observations = Vec::with_capacity(batch.num_rows());
    let mut dropped = 0;

    for row in 0..batch.num_rows() {
        let disease = cell_string(batch, cols.disease, row).filter(|s| !s.trim().is_empty());
        let rate_type = cell_string(batch, cols.rate_type, row)
            .as_deref()
            .and_then(RateType::parse);

        let (Some(disease), Some(rate_type)) = (disease, rate_type) else {
            dropped += 1;
            continue;
        };

        let mut obs = RateObservation::new(disease, rate_type);
        obs.grouping_variable = cols.grouping_variable.and_then(|i| category_at(batch, i, row));
        obs.grouping_value = cols.grouping_value.and_then(|i| category_at(batch, i, row));
        obs.partition_variable = cols
            .partition_variable
            .and_then(|i| category_at(batch, i, row));
        obs.partition_value = cols.partition_value.and_then(|i| category_at(batch, i, row));
        obs.year = cols.year.and_then(|i| int_at(batch, i, row, adapt));
        obs.group_weight = cols.group_weight.and_then(|i| float_at(batch, i, row, adapt));
        obs.total_weight = cols.total_weight.and_then(|i| float_at(batch, i, row, adapt));
        obs.crude_rate = cols.crude_rate.and_then(|i| float_at(batch, i, row, adapt));
        obs.direct_rate = cols.direct_rate.and_then(|i| float_at(batch, i, row, adapt));
        obs.indirect_rate = cols.indirect_rate.and_then(|i| float_at(batch, i, row, adapt));
        obs.direct_rate_lower = cols
            .direct_rate_lower
            .and_then(|i| float_at(batch, i, row, adapt));
        obs.direct_rate_upper = cols
            .direct_rate_upper
            .and_then(|i| float_at(batch, i, row, adapt));
        obs.indirect_rate_lower = cols
            .indirect_rate_lower
            .and_then(|i| float_at(batch, i, row, adapt));
        obs.indirect_rate_upper = cols
            .indirect_rate_upper
            .and_then(|i| float_at(batch, i, row, adapt));

        observations.push(obs);
    }

    Ok((observations, dropped))
}

/// Column positions for one batch schema
struct ColumnIndexes {
    disease: usize,
    rate_type: usize,
    grouping_variable: Option<usize>,
    grouping_value: Option<usize>,
    partition_variable: Option<usize>,
    partition_value: Option<usize>,
    year: Option<usize>,
    group_weight: Option<usize>,
    total_weight: Option<usize>,
    crude_rate: Option<usize>,
    direct_rate: Option<usize>,
    indirect_rate: Option<usize>,
    direct_rate_lower: Option<usize>,
    direct_rate_upper: Option<usize>,
    indirect_rate_lower: Option<usize>,
    indirect_rate_upper: Option<usize>,
}

impl ColumnIndexes {
    fn resolve(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let required = |name: &str| {
            schema.index_of(name).map_err(|_| {
                ErReaderError::MetadataError(format!("Column {name} not found in record batch"))
            })
        };
        let optional = |name: &str| schema.index_of(name).ok();

        Ok(Self {
            disease: required(columns::DISEASE)?,
            rate_type: required(columns::RATE_TYPE)?,
            grouping_variable: optional(columns::GROUPING_VARIABLE),
            grouping_value: optional(columns::GROUPING_VALUE),
            partition_variable: optional(columns::PARTITION_VARIABLE),
            partition_value: optional(columns::PARTITION_VALUE),
            year: optional(columns::YEAR),
            group_weight: optional(columns::GROUP_WEIGHT),
            total_weight: optional(columns::TOTAL_WEIGHT),
            crude_rate: optional(columns::CRUDE_RATE),
            direct_rate: optional(columns::DIRECT_RATE),
            indirect_rate: optional(columns::INDIRECT_RATE),
            direct_rate_lower: optional(columns::DIRECT_RATE_LOWER),
            direct_rate_upper: optional(columns::DIRECT_RATE_UPPER),
            indirect_rate_lower: optional(columns::INDIRECT_RATE_LOWER),
            indirect_rate_upper: optional(columns::INDIRECT_RATE_UPPER),
        })
    }
}

/// Parse a string-encoded rate or weight, tolerating French decimal commas
///
/// Empty strings and the literal `nan`/`na` markers count as missing.
#[must_use]
pub fn parse_rate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("na")
    {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// Read a cell as a string, whatever the inferred column type
pub(crate) fn cell_string(batch: &RecordBatch, idx: usize, row: usize) -> Option<String> {
    let array = batch.column(idx);
    if array.is_null(row) {
        return None;
    }
    let any = array.as_any();
    if let Some(strings) = any.downcast_ref::<StringArray>() {
        Some(strings.value(row).to_string())
    } else if let Some(strings) = any.downcast_ref::<LargeStringArray>() {
        Some(strings.value(row).to_string())
    } else if let Some(ints) = any.downcast_ref::<Int64Array>() {
        Some(ints.value(row).to_string())
    } else if let Some(ints) = any.downcast_ref::<Int32Array>() {
        Some(ints.value(row).to_string())
    } else if let Some(floats) = any.downcast_ref::<Float64Array>() {
        Some(format_numeric(floats.value(row)))
    } else if let Some(floats) = any.downcast_ref::<Float32Array>() {
        Some(format_numeric(f64::from(floats.value(row))))
    } else {
        None
    }
}

/// Categorical cell accessor: missing markers become `None`
fn category_at(batch: &RecordBatch, idx: usize, row: usize) -> Option<String> {
    cell_string(batch, idx, row)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
}

/// Numeric cell accessor with lenient string parsing
fn float_at(batch: &RecordBatch, idx: usize, row: usize, adapt: bool) -> Option<f64> {
    let array = batch.column(idx);
    if array.is_null(row) {
        return None;
    }
    let any = array.as_any();
    if let Some(floats) = any.downcast_ref::<Float64Array>() {
        Some(floats.value(row))
    } else if let Some(floats) = any.downcast_ref::<Float32Array>() {
        Some(f64::from(floats.value(row)))
    } else if let Some(ints) = any.downcast_ref::<Int64Array>() {
        Some(ints.value(row) as f64)
    } else if let Some(ints) = any.downcast_ref::<Int32Array>() {
        Some(f64::from(ints.value(row)))
    } else if adapt {
        cell_string(batch, idx, row).as_deref().and_then(parse_rate)
    } else {
        None
    }
}

/// Lenient numeric accessor for the filter layer
pub(crate) fn numeric_at(batch: &RecordBatch, idx: usize, row: usize) -> Option<f64> {
    float_at(batch, idx, row, true)
}

/// Integer cell accessor (observation year)
fn int_at(batch: &RecordBatch, idx: usize, row: usize, adapt: bool) -> Option<i64> {
    let array = batch.column(idx);
    if array.is_null(row) {
        return None;
    }
    let any = array.as_any();
    if let Some(ints) = any.downcast_ref::<Int64Array>() {
        Some(ints.value(row))
    } else if let Some(ints) = any.downcast_ref::<Int32Array>() {
        Some(i64::from(ints.value(row)))
    } else if let Some(floats) = any.downcast_ref::<Float64Array>() {
        Some(floats.value(row) as i64)
    } else if adapt {
        float_at(batch, idx, row, adapt).map(|v| v as i64)
    } else {
        None
    }
}

fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
