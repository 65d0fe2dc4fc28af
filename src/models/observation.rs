//! Typed observation record
//!
//! One `RateObservation` is one statistical observation: a chronic-disease
//! indicator, stratified by a grouping variable, with a standardized rate
//! and its 95% confidence interval. Records are immutable reference data
//! produced by the provider; cleaning builds new values in memory and never
//! rewrites the source file.

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::types::{GroupingVariable, RateType};
use crate::schema::er1243_schema;

/// One cleaned record of the ER 1243 dataset
///
/// Field names serialize to the documented CSV column names, so normalized
/// observations round-trip through Arrow record batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    /// Disease name (French label)
    #[serde(rename = "varTauxLib")]
    pub disease: String,

    /// Indicator type
    #[serde(rename = "type", with = "rate_type_serde")]
    pub rate_type: RateType,

    /// Grouping variable code, as found in the file
    #[serde(rename = "varGroupage", default)]
    pub grouping_variable: Option<String>,

    /// Value of the grouping variable
    #[serde(rename = "valGroupage", default)]
    pub grouping_value: Option<String>,

    /// Partition variable code (optional sub-grouping)
    #[serde(rename = "varPartition", default)]
    pub partition_variable: Option<String>,

    /// Value of the partition variable
    #[serde(rename = "valPartition", default)]
    pub partition_value: Option<String>,

    /// Observation year
    #[serde(rename = "annee", default)]
    pub year: Option<i64>,

    /// Weighted population count for the group
    #[serde(rename = "poids1", default)]
    pub group_weight: Option<f64>,

    /// Total weighted population
    #[serde(rename = "poidsTot", default)]
    pub total_weight: Option<f64>,

    /// Non-standardized rate (%)
    #[serde(rename = "txNonStand", default)]
    pub crude_rate: Option<f64>,

    /// Directly standardized rate (%)
    #[serde(rename = "txStandDir", default)]
    pub direct_rate: Option<f64>,

    /// Indirectly standardized rate (%)
    #[serde(rename = "txStandIndir", default)]
    pub indirect_rate: Option<f64>,

    /// Direct rate, lower bound of the 95% CI
    #[serde(rename = "txStandDirModBB", default)]
    pub direct_rate_lower: Option<f64>,

    /// Direct rate, upper bound of the 95% CI
    #[serde(rename = "txStandDirModBH", default)]
    pub direct_rate_upper: Option<f64>,

    /// Indirect rate, lower bound of the 95% CI
    #[serde(rename = "txStandIndirModBB", default)]
    pub indirect_rate_lower: Option<f64>,

    /// Indirect rate, upper bound of the 95% CI
    #[serde(rename = "txStandIndirModBH", default)]
    pub indirect_rate_upper: Option<f64>,
}

impl RateObservation {
    /// Create a minimal observation with only the critical pair set
    #[must_use]
    pub fn new(disease: impl Into<String>, rate_type: RateType) -> Self {
        Self {
            disease: disease.into(),
            rate_type,
            grouping_variable: None,
            grouping_value: None,
            partition_variable: None,
            partition_value: None,
            year: None,
            group_weight: None,
            total_weight: None,
            crude_rate: None,
            direct_rate: None,
            indirect_rate: None,
            direct_rate_lower: None,
            direct_rate_upper: None,
            indirect_rate_lower: None,
            indirect_rate_upper: None,
        }
    }

    /// The grouping variable, when the code is one of the documented six
    #[must_use]
    pub fn grouping(&self) -> Option<GroupingVariable> {
        self.grouping_variable
            .as_deref()
            .and_then(GroupingVariable::from_code)
    }

    /// Whether the observation is stratified by the given variable
    #[must_use]
    pub fn is_grouped_by(&self, variable: GroupingVariable) -> bool {
        self.grouping() == Some(variable)
    }

    /// Check the confidence interval invariant: lower bound <= rate <= upper bound
    ///
    /// Applies to whichever of the direct and indirect triples is fully
    /// present; missing values make a triple vacuously consistent.
    #[must_use]
    pub fn ci_consistent(&self) -> bool {
        triple_consistent(
            self.direct_rate,
            self.direct_rate_lower,
            self.direct_rate_upper,
        ) && triple_consistent(
            self.indirect_rate,
            self.indirect_rate_lower,
            self.indirect_rate_upper,
        )
    }

    /// Whether the grouping value belongs to its variable's value set
    ///
    /// `None` when the observation has no recognized grouping variable or no
    /// grouping value to check.
    #[must_use]
    pub fn grouping_value_in_domain(&self) -> Option<bool> {
        let variable = self.grouping()?;
        let value = self.grouping_value.as_deref()?;
        Some(variable.value_in_domain(value))
    }

    /// Convert normalized observations to an Arrow `RecordBatch`
    pub fn to_record_batch(observations: &[Self]) -> Result<RecordBatch> {
        let fields = er1243_schema().fields().to_vec();
        serde_arrow::to_record_batch(&fields, &observations)
            .map_err(|e| anyhow::anyhow!("Failed to serialize observations: {e}").into())
    }

    /// Convert directly from a normalized `RecordBatch`
    ///
    /// Expects the batch to carry the data dictionary's column names and
    /// types (e.g. one produced by [`RateObservation::to_record_batch`]).
    /// Raw CSV batches go through `extract` instead, which adapts lenient
    /// types.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        serde_arrow::from_record_batch::<Vec<Self>>(batch)
            .map_err(|e| anyhow::anyhow!("Failed to deserialize observations: {e}").into())
    }
}

fn triple_consistent(rate: Option<f64>, lower: Option<f64>, upper: Option<f64>) -> bool {
    match (rate, lower, upper) {
        (Some(rate), Some(lower), Some(upper)) => lower <= rate && rate <= upper,
        _ => true,
    }
}

mod rate_type_serde {
    //! Serialize `RateType` as the dataset's plain string

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::models::types::RateType;

    pub fn serialize<S: Serializer>(value: &RateType, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RateType, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RateType::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("unknown indicator type: {raw}")))
    }
}
