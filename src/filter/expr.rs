//! Expression-based filtering for ER 1243 record batches
//!
//! This module provides an expression-based filtering system that allows
//! filtering Arrow record batches based on column values.

use std::collections::HashSet;

use arrow::array::{Array, BooleanArray};
use arrow::compute::{and, not, or};
use arrow::record_batch::RecordBatch;

use crate::error::{ErReaderError, Result};
use crate::extract::cell_string;
use crate::utils::find_column;

/// Represents a filter expression for querying the dataset
#[derive(Debug, Clone)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, LiteralValue),

    /// Column not equals a literal value
    NotEq(String, LiteralValue),

    /// Column is greater than a literal value
    Gt(String, LiteralValue),

    /// Column is greater than or equal to a literal value
    GtEq(String, LiteralValue),

    /// Column is less than a literal value
    Lt(String, LiteralValue),

    /// Column is less than or equal to a literal value
    LtEq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is not in a set of values
    NotIn(String, Vec<LiteralValue>),

    /// Column is null
    IsNull(String),

    /// Column is not null
    IsNotNull(String),

    /// Column value contains a substring
    Contains(String, String),

    /// Column value starts with a prefix
    StartsWith(String, String),

    /// Column value ends with a suffix
    EndsWith(String, String),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,

    /// Always evaluates to false
    AlwaysFalse,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone)]
pub enum LiteralValue {
    /// Boolean value
    Boolean(bool),

    /// Integer value
    Int(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),

    /// Null value
    Null,
}

impl Expr {
    /// Combine this expression with another using AND
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut exprs) => {
                exprs.push(other);
                Self::And(exprs)
            }
            expr => Self::And(vec![expr, other]),
        }
    }

    /// Combine this expression with another using OR
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut exprs) => {
                exprs.push(other);
                Self::Or(exprs)
            }
            expr => Self::Or(vec![expr, other]),
        }
    }

    /// Negate this expression
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// The set of column names this expression reads
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, out: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _)
            | Self::NotEq(col, _)
            | Self::Gt(col, _)
            | Self::GtEq(col, _)
            | Self::Lt(col, _)
            | Self::LtEq(col, _)
            | Self::In(col, _)
            | Self::NotIn(col, _)
            | Self::IsNull(col)
            | Self::IsNotNull(col)
            | Self::Contains(col, _)
            | Self::StartsWith(col, _)
            | Self::EndsWith(col, _) => {
                out.insert(col.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_columns(out);
                }
            }
            Self::Not(expr) => expr.collect_columns(out),
            Self::AlwaysTrue | Self::AlwaysFalse => {}
        }
    }
}

/// Evaluate an expression against a record batch, producing a row mask
///
/// Null cells never match a comparison; they only satisfy `IsNull`.
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    let num_rows = batch.num_rows();
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; num_rows])),
        Expr::AlwaysFalse => Ok(BooleanArray::from(vec![false; num_rows])),

        Expr::And(exprs) => {
            let mut mask = BooleanArray::from(vec![true; num_rows]);
            for expr in exprs {
                let rhs = evaluate_expr(batch, expr)?;
                mask = and(&mask, &rhs)?;
            }
            Ok(mask)
        }
        Expr::Or(exprs) => {
            let mut mask = BooleanArray::from(vec![false; num_rows]);
            for expr in exprs {
                let rhs = evaluate_expr(batch, expr)?;
                mask = or(&mask, &rhs)?;
            }
            Ok(mask)
        }
        Expr::Not(inner) => {
            let mask = evaluate_expr(batch, inner)?;
            Ok(not(&mask)?)
        }

        Expr::Eq(col, lit) => compare_column(batch, col, lit, CmpOp::Eq),
        Expr::NotEq(col, lit) => compare_column(batch, col, lit, CmpOp::NotEq),
        Expr::Gt(col, lit) => compare_column(batch, col, lit, CmpOp::Gt),
        Expr::GtEq(col, lit) => compare_column(batch, col, lit, CmpOp::GtEq),
        Expr::Lt(col, lit) => compare_column(batch, col, lit, CmpOp::Lt),
        Expr::LtEq(col, lit) => compare_column(batch, col, lit, CmpOp::LtEq),

        Expr::In(col, lits) => membership(batch, col, lits, false),
        Expr::NotIn(col, lits) => membership(batch, col, lits, true),

        Expr::IsNull(col) => {
            let idx = find_column(batch, col)?;
            let array = batch.column(idx);
            Ok(BooleanArray::from(
                (0..num_rows).map(|row| array.is_null(row)).collect::<Vec<_>>(),
            ))
        }
        Expr::IsNotNull(col) => {
            let idx = find_column(batch, col)?;
            let array = batch.column(idx);
            Ok(BooleanArray::from(
                (0..num_rows)
                    .map(|row| !array.is_null(row))
                    .collect::<Vec<_>>(),
            ))
        }

        Expr::Contains(col, needle) => {
            string_predicate(batch, col, |value| value.contains(needle.as_str()))
        }
        Expr::StartsWith(col, prefix) => {
            string_predicate(batch, col, |value| value.starts_with(prefix.as_str()))
        }
        Expr::EndsWith(col, suffix) => {
            string_predicate(batch, col, |value| value.ends_with(suffix.as_str()))
        }
    }
}

#[derive(Clone, Copy)]
enum CmpOp {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl CmpOp {
    fn apply<T: PartialOrd>(self, left: &T, right: &T) -> bool {
        match self {
            Self::Eq => left == right,
            Self::NotEq => left != right,
            Self::Gt => left > right,
            Self::GtEq => left >= right,
            Self::Lt => left < right,
            Self::LtEq => left <= right,
        }
    }
}

fn compare_column(
    batch: &RecordBatch,
    col: &str,
    lit: &LiteralValue,
    op: CmpOp,
) -> Result<BooleanArray> {
    let idx = find_column(batch, col)?;
    let array = batch.column(idx);
    let num_rows = batch.num_rows();

    let mask: Vec<bool> = match lit {
        LiteralValue::Null => match op {
            // Eq against null is null-ness, NotEq its complement
            CmpOp::Eq => (0..num_rows).map(|row| array.is_null(row)).collect(),
            CmpOp::NotEq => (0..num_rows).map(|row| !array.is_null(row)).collect(),
            _ => vec![false; num_rows],
        },
        LiteralValue::String(expected) => (0..num_rows)
            .map(|row| {
                cell_string(batch, idx, row)
                    .is_some_and(|value| op.apply(&value.as_str(), &expected.as_str()))
            })
            .collect(),
        LiteralValue::Int(expected) => {
            let expected = *expected as f64;
            (0..num_rows)
                .map(|row| {
                    numeric_cell(batch, idx, row).is_some_and(|value| op.apply(&value, &expected))
                })
                .collect()
        }
        LiteralValue::Float(expected) => (0..num_rows)
            .map(|row| {
                numeric_cell(batch, idx, row).is_some_and(|value| op.apply(&value, expected))
            })
            .collect(),
        LiteralValue::Boolean(expected) => {
            let booleans = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| {
                    ErReaderError::SchemaError(format!("Column {col} is not a boolean column"))
                })?;
            (0..num_rows)
                .map(|row| {
                    !booleans.is_null(row) && op.apply(&booleans.value(row), expected)
                })
                .collect()
        }
    };

    Ok(BooleanArray::from(mask))
}

fn membership(
    batch: &RecordBatch,
    col: &str,
    lits: &[LiteralValue],
    negate: bool,
) -> Result<BooleanArray> {
    let idx = find_column(batch, col)?;
    let array = batch.column(idx);
    let num_rows = batch.num_rows();

    let strings: HashSet<&str> = lits
        .iter()
        .filter_map(|lit| match lit {
            LiteralValue::String(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    let numerics: Vec<f64> = lits
        .iter()
        .filter_map(|lit| match lit {
            LiteralValue::Int(i) => Some(*i as f64),
            LiteralValue::Float(f) => Some(*f),
            _ => None,
        })
        .collect();

    let mask: Vec<bool> = (0..num_rows)
        .map(|row| {
            if array.is_null(row) {
                // Nulls are outside every membership set, negated or not
                return false;
            }
            let matched = numeric_cell(batch, idx, row)
                .map(|value| numerics.iter().any(|n| *n == value))
                .unwrap_or(false)
                || cell_string(batch, idx, row)
                    .is_some_and(|value| strings.contains(value.as_str()));
            matched != negate
        })
        .collect();

    Ok(BooleanArray::from(mask))
}

fn string_predicate<F: Fn(&str) -> bool>(
    batch: &RecordBatch,
    col: &str,
    predicate: F,
) -> Result<BooleanArray> {
    let idx = find_column(batch, col)?;
    let num_rows = batch.num_rows();
    let mask: Vec<bool> = (0..num_rows)
        .map(|row| cell_string(batch, idx, row).is_some_and(|value| predicate(&value)))
        .collect();
    Ok(BooleanArray::from(mask))
}

fn numeric_cell(batch: &RecordBatch, idx: usize, row: usize) -> Option<f64> {
    crate::extract::numeric_at(batch, idx, row)
}
