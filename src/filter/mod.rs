//! Filtering framework for the dataset
//!
//! Expression filtering plus helpers for the domain's common predicates.

pub mod core;
pub mod expr;

pub use self::core::{BatchFilter, filter_batches, filter_record_batch};
pub use self::expr::{Expr, LiteralValue, evaluate_expr};

use crate::models::{GroupingVariable, RateType};
use crate::schema::columns;

/// Predicate: observations for one disease
#[must_use]
pub fn disease_is(disease: &str) -> Expr {
    Expr::Eq(
        columns::DISEASE.to_string(),
        LiteralValue::String(disease.to_string()),
    )
}

/// Predicate: observations of one indicator type
#[must_use]
pub fn rate_type_is(rate_type: RateType) -> Expr {
    Expr::Eq(
        columns::RATE_TYPE.to_string(),
        LiteralValue::String(rate_type.as_str().to_string()),
    )
}

/// Predicate: observations stratified by one grouping variable
#[must_use]
pub fn grouped_by(variable: GroupingVariable) -> Expr {
    Expr::Eq(
        columns::GROUPING_VARIABLE.to_string(),
        LiteralValue::String(variable.code().to_string()),
    )
}
