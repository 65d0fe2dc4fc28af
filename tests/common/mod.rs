//! Shared fixtures for the test suite

use std::path::{Path, PathBuf};

use er_reader::extract::Dataset;
use er_reader::models::{GroupingVariable, RateObservation, RateType};

/// A small ER 1243 extract: two diseases, several stratification dimensions,
/// one row without a disease label and one with an unknown indicator type.
///
/// `txNonStand` carries French decimal commas (the column infers as text),
/// `txStandDir` is machine-formatted, and the partition columns are fully
/// empty.
pub const SAMPLE_CSV: &str = "\
varTauxLib;type;varGroupage;valGroupage;varPartition;valPartition;annee;poids1;poidsTot;txNonStand;txStandDir;txStandIndir;txStandDirModBB;txStandDirModBH;txStandIndirModBB;txStandIndirModBH
Diabète;prevalence;FISC_NIVVIEM_E2015_S_moy_10;1;;;2017;1200.5;60000;8,4;8.1;8.0;7.6;8.6;7.5;8.5
Diabète;prevalence;FISC_NIVVIEM_E2015_S_moy_10;10;;;2017;900.25;60000;3,1;2.7;2.6;2.2;3.2;2.1;3.1
Diabète;prevalence;FISC_REG_S;11;;;2017;5000;60000;6,0;6.2;6.1;5.7;6.7;5.6;6.6
Diabète;prevalence;FISC_REG_S;44;;;2017;4100;60000;5,5;5.4;5.3;4.9;5.9;4.8;5.8
Diabète;prevalence;SEXE;1;;;2017;30000;60000;6,8;6.9;6.8;6.4;7.4;6.3;7.3
Diabète;prevalence;SEXE;2;;;2017;30000;60000;5,2;5.3;5.2;4.8;5.8;4.7;5.7
;prevalence;SEXE;1;;;2017;;;;;;;;;
Asthme;availability;SEXE;1;;;2017;;;;;;;;;
Asthme;incidence;FISC_NIVVIEM_E2015_S_moy_10;1;;;2017;1100;60000;2,2;2.1;2.0;1.8;2.4;1.7;2.3
Asthme;incidence;FISC_NIVVIEM_E2015_S_moy_10;10;;;2017;950;60000;1,4;1.5;1.4;1.2;1.8;1.1;1.7
";

/// Rows in [`SAMPLE_CSV`], including the two unusable ones
pub const SAMPLE_ROWS: usize = 10;

/// Rows of [`SAMPLE_CSV`] that survive cleaning
pub const SAMPLE_CLEAN_ROWS: usize = 8;

/// Write the sample CSV into a directory and return its path
pub fn write_sample_csv(dir: &Path) -> PathBuf {
    let path = dir.join("er_sample.csv");
    std::fs::write(&path, SAMPLE_CSV).expect("failed to write sample CSV");
    path
}

/// An observation stratified by income decile, with a CI of rate +/- 0.5
pub fn income_obs(
    disease: &str,
    rate_type: RateType,
    decile: u8,
    rate: f64,
    weight: f64,
) -> RateObservation {
    let mut obs = RateObservation::new(disease, rate_type);
    obs.grouping_variable = Some(GroupingVariable::IncomeDecile.code().to_string());
    obs.grouping_value = Some(decile.to_string());
    obs.direct_rate = Some(rate);
    obs.direct_rate_lower = Some(rate - 0.5);
    obs.direct_rate_upper = Some(rate + 0.5);
    obs.group_weight = Some(weight);
    obs
}

/// An observation stratified by region
pub fn region_obs(disease: &str, rate_type: RateType, region: &str, rate: f64) -> RateObservation {
    let mut obs = RateObservation::new(disease, rate_type);
    obs.grouping_variable = Some(GroupingVariable::Region.code().to_string());
    obs.grouping_value = Some(region.to_string());
    obs.direct_rate = Some(rate);
    obs
}

/// An observation stratified by an arbitrary grouping variable
pub fn grouped_obs(
    disease: &str,
    rate_type: RateType,
    variable: GroupingVariable,
    value: &str,
    rate: f64,
) -> RateObservation {
    let mut obs = RateObservation::new(disease, rate_type);
    obs.grouping_variable = Some(variable.code().to_string());
    obs.grouping_value = Some(value.to_string());
    obs.direct_rate = Some(rate);
    obs
}

/// A dataset with a full income gradient for one disease
///
/// Rates fall linearly from 8.0 in D1 to 3.5 in D10, giving a D1/D10
/// inequality ratio well above 2.
pub fn gradient_dataset(disease: &str) -> Dataset {
    let observations: Vec<_> = (1..=10u8)
        .map(|decile| {
            let rate = 8.5 - 0.5 * f64::from(decile);
            income_obs(disease, RateType::Prevalence, decile, rate, 1000.0)
        })
        .collect();
    Dataset::from(observations)
}
