//! The ER 1243 data dictionary as an Arrow schema, with compatibility checking.
//!
//! The published file is a semicolon-separated CSV. Column names follow the
//! DREES documentation (camelCase French). Numeric columns are frequently
//! string-encoded in the export, so compatibility checking accepts any type
//! the extraction layer knows how to adapt.

use arrow::datatypes::{DataType, Field, Schema};

/// Column names documented for the ER 1243 export
pub mod columns {
    /// Disease name (French label)
    pub const DISEASE: &str = "varTauxLib";
    /// Indicator type: `prevalence` or `incidence`
    pub const RATE_TYPE: &str = "type";
    /// Grouping variable code
    pub const GROUPING_VARIABLE: &str = "varGroupage";
    /// Value of the grouping variable
    pub const GROUPING_VALUE: &str = "valGroupage";
    /// Optional partition variable (sub-grouping)
    pub const PARTITION_VARIABLE: &str = "varPartition";
    /// Value of the partition variable
    pub const PARTITION_VALUE: &str = "valPartition";
    /// Observation year
    pub const YEAR: &str = "annee";
    /// Weighted population count for the group
    pub const GROUP_WEIGHT: &str = "poids1";
    /// Total weighted population
    pub const TOTAL_WEIGHT: &str = "poidsTot";
    /// Non-standardized rate (%)
    pub const CRUDE_RATE: &str = "txNonStand";
    /// Directly standardized rate (%)
    pub const DIRECT_RATE: &str = "txStandDir";
    /// Indirectly standardized rate (%)
    pub const INDIRECT_RATE: &str = "txStandIndir";
    /// Direct rate, lower bound of the 95% CI
    pub const DIRECT_RATE_LOWER: &str = "txStandDirModBB";
    /// Direct rate, upper bound of the 95% CI
    pub const DIRECT_RATE_UPPER: &str = "txStandDirModBH";
    /// Indirect rate, lower bound of the 95% CI
    pub const INDIRECT_RATE_LOWER: &str = "txStandIndirModBB";
    /// Indirect rate, upper bound of the 95% CI
    pub const INDIRECT_RATE_UPPER: &str = "txStandIndirModBH";
}

/// Get the Arrow schema for the documented ER 1243 columns
///
/// Only `varTauxLib` and `type` are required to be non-null; every row must
/// carry a disease label and an indicator type to be usable.
#[must_use]
pub fn er1243_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::DISEASE, DataType::Utf8, false),
        Field::new(columns::RATE_TYPE, DataType::Utf8, false),
        Field::new(columns::GROUPING_VARIABLE, DataType::Utf8, true),
        Field::new(columns::GROUPING_VALUE, DataType::Utf8, true),
        Field::new(columns::PARTITION_VARIABLE, DataType::Utf8, true),
        Field::new(columns::PARTITION_VALUE, DataType::Utf8, true),
        Field::new(columns::YEAR, DataType::Int64, true),
        Field::new(columns::GROUP_WEIGHT, DataType::Float64, true),
        Field::new(columns::TOTAL_WEIGHT, DataType::Float64, true),
        Field::new(columns::CRUDE_RATE, DataType::Float64, true),
        Field::new(columns::DIRECT_RATE, DataType::Float64, true),
        Field::new(columns::INDIRECT_RATE, DataType::Float64, true),
        Field::new(columns::DIRECT_RATE_LOWER, DataType::Float64, true),
        Field::new(columns::DIRECT_RATE_UPPER, DataType::Float64, true),
        Field::new(columns::INDIRECT_RATE_LOWER, DataType::Float64, true),
        Field::new(columns::INDIRECT_RATE_UPPER, DataType::Float64, true),
    ])
}

/// The minimal column set the analysis tables need
#[must_use]
pub fn required_columns() -> [&'static str; 5] {
    [
        columns::DISEASE,
        columns::RATE_TYPE,
        columns::GROUPING_VARIABLE,
        columns::GROUPING_VALUE,
        columns::DIRECT_RATE,
    ]
}

/// A struct that represents the compatibility between a file schema and the
/// data dictionary
#[derive(Debug)]
pub struct SchemaCompatibilityReport {
    /// Whether the file can be read and analyzed
    pub compatible: bool,
    /// List of incompatibility issues, if any
    pub issues: Vec<SchemaIssue>,
}

/// A schema compatibility issue
#[derive(Debug)]
pub struct SchemaIssue {
    /// The column the issue concerns
    pub column: String,
    /// Description of the incompatibility
    pub description: String,
}

/// Checks whether a file schema can serve where the expected schema is needed
///
/// Every expected column must be present with a type the extraction layer can
/// adapt. Extra columns in the file are ignored.
#[must_use]
pub fn schemas_compatible(expected: &Schema, actual: &Schema) -> bool {
    expected.fields().iter().all(|field| {
        actual
            .field_with_name(field.name())
            .is_ok_and(|found| type_usable(found.data_type()))
    })
}

/// Checks a file schema against the ER 1243 data dictionary
///
/// Missing required columns and unusable column types make the report
/// incompatible. Missing optional columns are listed as issues but do not
/// prevent reading; the corresponding observation fields stay empty.
#[must_use]
pub fn check_schema(actual: &Schema) -> SchemaCompatibilityReport {
    let expected = er1243_schema();
    let required = required_columns();
    let mut report = SchemaCompatibilityReport {
        compatible: true,
        issues: vec![],
    };

    for field in expected.fields() {
        let name = field.name();
        match actual.field_with_name(name) {
            Ok(found) => {
                if !type_usable(found.data_type()) {
                    report.compatible = false;
                    report.issues.push(SchemaIssue {
                        column: name.clone(),
                        description: format!(
                            "unusable type {:?}, expected something adaptable to {:?}",
                            found.data_type(),
                            field.data_type()
                        ),
                    });
                }
            }
            Err(_) if required.contains(&name.as_str()) => {
                report.compatible = false;
                report.issues.push(SchemaIssue {
                    column: name.clone(),
                    description: "required column is missing".to_string(),
                });
            }
            Err(_) => {
                report.issues.push(SchemaIssue {
                    column: name.clone(),
                    description: "documented column is absent".to_string(),
                });
            }
        }
    }

    report
}

/// Whether the extraction layer can adapt a column of this type
///
/// CSV inference yields Utf8, Int64 or Float64 depending on the sample;
/// string-encoded numerics (including French decimal commas) are parsed
/// during extraction, so all of these are acceptable. `Null` appears for
/// files with a header but no rows.
#[must_use]
pub fn type_usable(actual: &DataType) -> bool {
    matches!(
        actual,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
            | DataType::Null
    )
}
