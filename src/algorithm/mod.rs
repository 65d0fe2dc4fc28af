//! Analysis algorithms over the cleaned dataset
//!
//! Grouped rate tables per stratification dimension, social inequality
//! statistics, and data quality assessment.

pub mod inequality;
pub mod quality;
pub mod tables;

pub use inequality::{
    DiseaseInequality, IncomeGradient, InequalitySeverity, RegionalSpread,
    format_gradient_summary, income_gradient, inequality_ratio, rank_by_inequality,
    regional_spread, top_diseases,
};
pub use quality::{DataQualityReport, assess};
pub use tables::{
    DemographicRate, GroupedRate, YearlyRate, rates_by_demographics, rates_by_education,
    rates_by_income, rates_by_region, rates_by_socioprofessional, rates_by_year,
};
