//! Core enumerations for the ER 1243 domain
//!
//! The dataset stratifies each disease indicator by one grouping variable.
//! Codes and value domains follow the DREES documentation; display labels
//! are the English ones used in the published analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Indicator type of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    /// Existing cases in the population
    Prevalence,
    /// New cases over the observation period
    Incidence,
}

impl RateType {
    /// The dataset string for this indicator type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prevalence => "prevalence",
            Self::Incidence => "incidence",
        }
    }

    /// Parse the dataset string for an indicator type
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prevalence" => Some(Self::Prevalence),
            "incidence" => Some(Self::Incidence),
            _ => None,
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stratification dimension of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupingVariable {
    /// `SEXE`: 1 = male, 2 = female
    Sex,
    /// `classeAge10`: age band in 10-year intervals
    AgeBand,
    /// `FISC_REG_S`: region code
    Region,
    /// `FISC_NIVVIEM_E2015_S_moy_10`: income decile, 1 = poorest
    IncomeDecile,
    /// `EAR_GS_S`: socio-professional group
    SocioProfessionalGroup,
    /// `EAR_DIPLR_S`: education level
    EducationLevel,
}

impl GroupingVariable {
    /// All grouping variables, in documentation order
    pub const ALL: [Self; 6] = [
        Self::Sex,
        Self::AgeBand,
        Self::Region,
        Self::IncomeDecile,
        Self::SocioProfessionalGroup,
        Self::EducationLevel,
    ];

    /// The dataset code for this grouping variable
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sex => "SEXE",
            Self::AgeBand => "classeAge10",
            Self::Region => "FISC_REG_S",
            Self::IncomeDecile => "FISC_NIVVIEM_E2015_S_moy_10",
            Self::SocioProfessionalGroup => "EAR_GS_S",
            Self::EducationLevel => "EAR_DIPLR_S",
        }
    }

    /// Resolve a dataset code to a grouping variable
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }

    /// Human-readable label for this grouping variable
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sex => "Gender",
            Self::AgeBand => "Age Group (10-year)",
            Self::Region => "Region",
            Self::IncomeDecile => "Income Decile",
            Self::SocioProfessionalGroup => "Socio-Professional Group",
            Self::EducationLevel => "Education Level",
        }
    }

    /// Whether a grouping value belongs to this variable's value set
    ///
    /// Sex and income decile have closed domains in the documentation. The
    /// other dimensions are open-coded (region numbers, diploma codes), so
    /// any non-empty value is accepted.
    #[must_use]
    pub fn value_in_domain(self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Sex => matches!(value, "1" | "2"),
            Self::IncomeDecile => value
                .parse::<u8>()
                .is_ok_and(|decile| (1..=10).contains(&decile)),
            _ => !value.is_empty(),
        }
    }

    /// Human-readable label for a grouping value
    ///
    /// Sex and income decile values get descriptive labels; open-coded
    /// values are returned unchanged.
    #[must_use]
    pub fn value_label(self, value: &str) -> String {
        match self {
            Self::Sex => match value.trim() {
                "1" => "Male".to_string(),
                "2" => "Female".to_string(),
                other => other.to_string(),
            },
            Self::IncomeDecile => match value.trim() {
                "1" => "D1 (Poorest)".to_string(),
                "10" => "D10 (Richest)".to_string(),
                other => format!("D{other}"),
            },
            _ => value.to_string(),
        }
    }
}

impl fmt::Display for GroupingVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
