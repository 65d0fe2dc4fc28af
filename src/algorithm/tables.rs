//! Analysis-ready rate tables
//!
//! Aggregates cleaned observations into one row per (grouping value,
//! disease, indicator type): the mean directly standardized rate, the mean
//! CI bounds when present, and the summed group weight. Rows without a
//! direct rate contribute nothing and groups with no rate at all are
//! omitted.

use std::cmp::Ordering;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::extract::Dataset;
use crate::models::{GroupingVariable, RateObservation, RateType};

/// One aggregated row of a rate table
#[derive(Debug, Clone, Serialize)]
pub struct GroupedRate {
    /// Grouping value (decile number, region code, diploma code, ...)
    pub group_value: String,
    /// Disease name
    pub disease: String,
    /// Indicator type
    pub rate_type: RateType,
    /// Mean directly standardized rate (%)
    pub mean_rate: f64,
    /// Mean lower bound of the 95% CI, when any observation carries one
    pub mean_lower: Option<f64>,
    /// Mean upper bound of the 95% CI, when any observation carries one
    pub mean_upper: Option<f64>,
    /// Summed weighted population of the contributing observations
    pub weight: f64,
    /// Number of contributing observations
    pub observations: usize,
}

/// A demographic table row, keyed by its stratification dimension
#[derive(Debug, Clone, Serialize)]
pub struct DemographicRate {
    /// Sex or age band
    pub variable: GroupingVariable,
    /// The aggregated row
    pub rate: GroupedRate,
}

/// One aggregated row of the time series table
#[derive(Debug, Clone, Serialize)]
pub struct YearlyRate {
    /// Observation year
    pub year: i64,
    /// Disease name
    pub disease: String,
    /// Indicator type
    pub rate_type: RateType,
    /// Mean directly standardized rate (%)
    pub mean_rate: f64,
    /// Summed weighted population
    pub weight: f64,
    /// Number of contributing observations
    pub observations: usize,
}

/// Income-decile table, in decile order (1 = poorest .. 10 = richest)
///
/// Grouping values that are not a valid decile are excluded.
#[must_use]
pub fn rates_by_income(dataset: &Dataset) -> Vec<GroupedRate> {
    let rows = group_rates(
        dataset
            .of_grouping(GroupingVariable::IncomeDecile)
            .filter(|obs| {
                obs.grouping_value
                    .as_deref()
                    .is_some_and(|v| GroupingVariable::IncomeDecile.value_in_domain(v))
            }),
    );
    rows.into_iter()
        .sorted_by_key(|row| {
            (
                row.group_value.trim().parse::<u8>().unwrap_or(u8::MAX),
                row.disease.clone(),
            )
        })
        .collect()
}

/// Region table, highest mean rate first
#[must_use]
pub fn rates_by_region(dataset: &Dataset) -> Vec<GroupedRate> {
    categorical_rates(dataset, GroupingVariable::Region)
}

/// Education-level table, highest mean rate first
#[must_use]
pub fn rates_by_education(dataset: &Dataset) -> Vec<GroupedRate> {
    categorical_rates(dataset, GroupingVariable::EducationLevel)
}

/// Socio-professional group table, highest mean rate first
#[must_use]
pub fn rates_by_socioprofessional(dataset: &Dataset) -> Vec<GroupedRate> {
    categorical_rates(dataset, GroupingVariable::SocioProfessionalGroup)
}

/// Sex and age-band breakdown
#[must_use]
pub fn rates_by_demographics(dataset: &Dataset) -> Vec<DemographicRate> {
    let mut rows = Vec::new();
    for variable in [GroupingVariable::Sex, GroupingVariable::AgeBand] {
        for rate in group_rates(dataset.of_grouping(variable)) {
            rows.push(DemographicRate { variable, rate });
        }
    }
    rows.sort_by(|a, b| {
        a.rate
            .disease
            .cmp(&b.rate.disease)
            .then_with(|| a.variable.code().cmp(b.variable.code()))
            .then_with(|| a.rate.group_value.cmp(&b.rate.group_value))
    });
    rows
}

/// Time series table over the observation year, ascending
///
/// Empty when the export carries no year column.
#[must_use]
pub fn rates_by_year(dataset: &Dataset) -> Vec<YearlyRate> {
    let mut groups: FxHashMap<(i64, String, RateType), Accum> = FxHashMap::default();
    for obs in dataset.iter() {
        let Some(year) = obs.year else { continue };
        let accum = groups
            .entry((year, obs.disease.clone(), obs.rate_type))
            .or_default();
        accum.add(obs);
    }

    let mut rows: Vec<YearlyRate> = groups
        .into_iter()
        .filter(|(_, accum)| accum.rate_n > 0)
        .map(|((year, disease, rate_type), accum)| YearlyRate {
            year,
            disease,
            rate_type,
            mean_rate: accum.mean_rate(),
            weight: accum.weight,
            observations: accum.observations,
        })
        .collect();
    rows.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.disease.cmp(&b.disease)));
    rows
}

fn categorical_rates(dataset: &Dataset, variable: GroupingVariable) -> Vec<GroupedRate> {
    let mut rows = group_rates(dataset.of_grouping(variable));
    rows.sort_by(|a, b| {
        b.mean_rate
            .partial_cmp(&a.mean_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.disease.cmp(&b.disease))
    });
    rows
}

/// Aggregate observations into one row per (grouping value, disease, type)
fn group_rates<'a, I>(observations: I) -> Vec<GroupedRate>
where
    I: Iterator<Item = &'a RateObservation>,
{
    let mut groups: FxHashMap<(String, String, RateType), Accum> = FxHashMap::default();
    for obs in observations {
        let Some(value) = obs.grouping_value.as_deref() else {
            continue;
        };
        let accum = groups
            .entry((value.trim().to_string(), obs.disease.clone(), obs.rate_type))
            .or_default();
        accum.add(obs);
    }

    groups
        .into_iter()
        .filter(|(_, accum)| accum.rate_n > 0)
        .map(|((group_value, disease, rate_type), accum)| GroupedRate {
            group_value,
            disease,
            rate_type,
            mean_rate: accum.mean_rate(),
            mean_lower: accum.mean_lower(),
            mean_upper: accum.mean_upper(),
            weight: accum.weight,
            observations: accum.observations,
        })
        .collect()
}

#[derive(Debug, Default)]
struct Accum {
    rate_sum: f64,
    rate_n: usize,
    lower_sum: f64,
    lower_n: usize,
    upper_sum: f64,
    upper_n: usize,
    weight: f64,
    observations: usize,
}

impl Accum {
    fn add(&mut self, obs: &RateObservation) {
        self.observations += 1;
        if let Some(rate) = obs.direct_rate {
            self.rate_sum += rate;
            self.rate_n += 1;
        }
        if let Some(lower) = obs.direct_rate_lower {
            self.lower_sum += lower;
            self.lower_n += 1;
        }
        if let Some(upper) = obs.direct_rate_upper {
            self.upper_sum += upper;
            self.upper_n += 1;
        }
        if let Some(weight) = obs.group_weight {
            self.weight += weight;
        }
    }

    fn mean_rate(&self) -> f64 {
        self.rate_sum / self.rate_n as f64
    }

    fn mean_lower(&self) -> Option<f64> {
        (self.lower_n > 0).then(|| self.lower_sum / self.lower_n as f64)
    }

    fn mean_upper(&self) -> Option<f64> {
        (self.upper_n > 0).then(|| self.upper_sum / self.upper_n as f64)
    }
}
