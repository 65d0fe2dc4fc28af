//! Social inequality statistics
//!
//! The headline measure is the inequality ratio: the rate among the poorest
//! income decile (D1) divided by the rate among the richest (D10). A ratio
//! of 2.0 means the poorest tenth of the population carries twice the
//! disease burden of the richest tenth.

use std::cmp::Ordering;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::algorithm::tables::{GroupedRate, rates_by_income};
use crate::extract::Dataset;
use crate::models::RateType;

const POOREST_DECILE: &str = "1";
const RICHEST_DECILE: &str = "10";

/// Severity band for an inequality ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InequalitySeverity {
    /// Ratio below 1.5
    Low,
    /// Ratio in 1.5..2.5
    Moderate,
    /// Ratio of 2.5 and above
    High,
}

impl InequalitySeverity {
    /// Classify a D1/D10 ratio
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 2.5 {
            Self::High
        } else if ratio >= 1.5 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low inequality",
            Self::Moderate => "Moderate inequality",
            Self::High => "High inequality",
        }
    }
}

/// Income-gradient summary for one disease
#[derive(Debug, Clone, Serialize)]
pub struct IncomeGradient {
    /// Disease name
    pub disease: String,
    /// Indicator type
    pub rate_type: RateType,
    /// Mean rate in the poorest decile (%)
    pub poorest_rate: f64,
    /// Mean rate in the richest decile (%)
    pub richest_rate: f64,
    /// D1/D10 ratio; `None` when the richest-decile rate is zero
    pub ratio: Option<f64>,
    /// Percentage-point difference between D1 and D10
    pub absolute_gap: f64,
    /// Mean rate over all deciles (%)
    pub mean_rate: f64,
    /// Severity band of the ratio, when defined
    pub severity: Option<InequalitySeverity>,
    /// Weighted population of the poorest decile
    pub poorest_weight: Option<f64>,
    /// Weighted population of the richest decile
    pub richest_weight: Option<f64>,
}

/// One disease's inequality ratio
#[derive(Debug, Clone, Serialize)]
pub struct DiseaseInequality {
    /// Disease name
    pub disease: String,
    /// D1/D10 ratio
    pub ratio: f64,
}

/// Spread of a disease's rate across regions
#[derive(Debug, Clone, Serialize)]
pub struct RegionalSpread {
    /// Highest regional mean rate (%)
    pub max_rate: f64,
    /// Lowest regional mean rate (%)
    pub min_rate: f64,
    /// Mean over regional rates (%)
    pub mean_rate: f64,
    /// Sample coefficient of variation; `None` with fewer than two regions
    /// or a zero mean
    pub coefficient_of_variation: Option<f64>,
    /// Number of regions observed
    pub regions: usize,
}

/// Inequality ratio for one disease: D1 rate / D10 rate
///
/// `None` when either decile is missing from the table or the richest
/// decile's rate is not positive.
#[must_use]
pub fn inequality_ratio(
    income_table: &[GroupedRate],
    disease: &str,
    rate_type: RateType,
) -> Option<f64> {
    let poorest = decile_rate(income_table, disease, rate_type, POOREST_DECILE)?;
    let richest = decile_rate(income_table, disease, rate_type, RICHEST_DECILE)?;
    (richest.mean_rate > 0.0).then(|| poorest.mean_rate / richest.mean_rate)
}

/// Full income-gradient summary for one disease
///
/// `None` when either extreme decile is missing from the table.
#[must_use]
pub fn income_gradient(
    income_table: &[GroupedRate],
    disease: &str,
    rate_type: RateType,
) -> Option<IncomeGradient> {
    let poorest = decile_rate(income_table, disease, rate_type, POOREST_DECILE)?;
    let richest = decile_rate(income_table, disease, rate_type, RICHEST_DECILE)?;

    let deciles: Vec<&GroupedRate> = income_table
        .iter()
        .filter(|row| row.disease == disease && row.rate_type == rate_type)
        .collect();
    let mean_rate = deciles.iter().map(|row| row.mean_rate).sum::<f64>() / deciles.len() as f64;

    let ratio = (richest.mean_rate > 0.0).then(|| poorest.mean_rate / richest.mean_rate);

    Some(IncomeGradient {
        disease: disease.to_string(),
        rate_type,
        poorest_rate: poorest.mean_rate,
        richest_rate: richest.mean_rate,
        ratio,
        absolute_gap: poorest.mean_rate - richest.mean_rate,
        mean_rate,
        severity: ratio.map(InequalitySeverity::from_ratio),
        poorest_weight: (poorest.weight > 0.0).then_some(poorest.weight),
        richest_weight: (richest.weight > 0.0).then_some(richest.weight),
    })
}

/// Every disease's inequality ratio, strongest first
///
/// Ratios are computed in parallel; diseases without both extreme deciles
/// are omitted.
#[must_use]
pub fn rank_by_inequality(dataset: &Dataset, rate_type: RateType) -> Vec<DiseaseInequality> {
    let income_table = rates_by_income(dataset);
    let diseases = dataset.diseases();

    let mut ranked: Vec<DiseaseInequality> = diseases
        .par_iter()
        .filter_map(|disease| {
            inequality_ratio(&income_table, disease, rate_type).map(|ratio| DiseaseInequality {
                disease: disease.clone(),
                ratio,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(Ordering::Equal));
    ranked
}

/// Top N diseases by mean directly standardized rate
#[must_use]
pub fn top_diseases(dataset: &Dataset, n: usize, rate_type: RateType) -> Vec<(String, f64)> {
    let mut sums: FxHashMap<&str, (f64, usize)> = FxHashMap::default();
    for obs in dataset.of_rate_type(rate_type) {
        if let Some(rate) = obs.direct_rate {
            let entry = sums.entry(obs.disease.as_str()).or_insert((0.0, 0));
            entry.0 += rate;
            entry.1 += 1;
        }
    }

    let mut rates: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(disease, (sum, count))| (disease.to_string(), sum / count as f64))
        .collect();
    rates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    rates.truncate(n);
    rates
}

/// Spread of one disease's rate across regions
///
/// `None` when the region table has no row for the disease.
#[must_use]
pub fn regional_spread(
    region_table: &[GroupedRate],
    disease: &str,
    rate_type: RateType,
) -> Option<RegionalSpread> {
    let rates: Vec<f64> = region_table
        .iter()
        .filter(|row| row.disease == disease && row.rate_type == rate_type)
        .map(|row| row.mean_rate)
        .collect();
    if rates.is_empty() {
        return None;
    }

    let max_rate = rates.iter().copied().fold(f64::MIN, f64::max);
    let min_rate = rates.iter().copied().fold(f64::MAX, f64::min);
    let mean_rate = rates.iter().sum::<f64>() / rates.len() as f64;

    let coefficient_of_variation = if rates.len() >= 2 && mean_rate > 0.0 {
        let variance = rates
            .iter()
            .map(|rate| (rate - mean_rate).powi(2))
            .sum::<f64>()
            / (rates.len() - 1) as f64;
        Some(variance.sqrt() / mean_rate)
    } else {
        None
    };

    Some(RegionalSpread {
        max_rate,
        min_rate,
        mean_rate,
        coefficient_of_variation,
        regions: rates.len(),
    })
}

/// Generate a readable summary of an income gradient
#[must_use]
pub fn format_gradient_summary(gradient: &IncomeGradient) -> String {
    let mut summary = String::new();
    summary.push_str("Income Gradient Summary:\n");
    summary.push_str(&format!("  Disease: {}\n", gradient.disease));
    summary.push_str(&format!("  Indicator: {}\n", gradient.rate_type));
    summary.push_str(&format!(
        "  Poorest 10% (D1): {:.2}%\n",
        gradient.poorest_rate
    ));
    summary.push_str(&format!(
        "  Richest 10% (D10): {:.2}%\n",
        gradient.richest_rate
    ));
    match gradient.ratio {
        Some(ratio) => summary.push_str(&format!("  Inequality Ratio: {ratio:.2}x\n")),
        None => summary.push_str("  Inequality Ratio: undefined (D10 rate is zero)\n"),
    }
    summary.push_str(&format!(
        "  Absolute Gap: {:.2} percentage points\n",
        gradient.absolute_gap
    ));
    summary.push_str(&format!("  Mean over deciles: {:.2}%\n", gradient.mean_rate));
    if let Some(severity) = gradient.severity {
        summary.push_str(&format!("  Assessment: {}\n", severity.label()));
    }
    summary
}

fn decile_rate<'a>(
    income_table: &'a [GroupedRate],
    disease: &str,
    rate_type: RateType,
    decile: &str,
) -> Option<&'a GroupedRate> {
    income_table.iter().find(|row| {
        row.disease == disease && row.rate_type == rate_type && row.group_value == decile
    })
}
