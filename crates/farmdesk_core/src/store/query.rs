//! Query validation and in-process evaluation helpers.
//!
//! # Responsibility
//! - Reject column names that are not plain identifiers.
//! - Evaluate conditions, ordering and projection over in-memory records.
//!
//! # Invariants
//! - Values of different JSON kinds never satisfy a comparison.
//! - Sorting is stable; ties keep the input order.

use super::{
    Condition, FetchQuery, Operator, OrderBy, Record, RecordId, SortDirection, StoreError,
    StoreResult, ID_COLUMN,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

static COLUMN_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid column name regex"));

/// Returns an error unless `column` is a plain identifier.
pub fn validate_column(column: &str) -> StoreResult<()> {
    if COLUMN_NAME_RE.is_match(column) {
        Ok(())
    } else {
        Err(StoreError::InvalidQuery(format!(
            "unsupported column name `{column}`"
        )))
    }
}

/// Validates every column referenced by `query`.
pub fn validate_query(query: &FetchQuery) -> StoreResult<()> {
    for field in &query.fields {
        validate_column(field)?;
    }
    for condition in &query.conditions {
        validate_column(&condition.column)?;
        if matches!(condition.value, Value::Array(_) | Value::Object(_)) {
            return Err(StoreError::InvalidQuery(format!(
                "condition on `{}` must compare against a scalar",
                condition.column
            )));
        }
    }
    for order in &query.order_by {
        validate_column(&order.column)?;
    }
    Ok(())
}

/// Returns whether `record` satisfies every condition.
pub fn matches_all(record: &Record, conditions: &[Condition]) -> bool {
    conditions.iter().all(|condition| matches_condition(record, condition))
}

fn matches_condition(record: &Record, condition: &Condition) -> bool {
    let actual = record.get(&condition.column).unwrap_or(&Value::Null);
    if condition.value.is_null() {
        return match condition.operator {
            Operator::EqualTo => actual.is_null(),
            Operator::NotEqualTo => !actual.is_null(),
            _ => false,
        };
    }

    let Some(ordering) = compare_scalars(actual, &condition.value) else {
        return false;
    };
    match condition.operator {
        Operator::EqualTo => ordering == Ordering::Equal,
        Operator::NotEqualTo => ordering != Ordering::Equal,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::LessThanOrEqualTo => ordering != Ordering::Greater,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::GreaterThanOrEqualTo => ordering != Ordering::Less,
    }
}

fn compare_scalars(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) | Value::Object(_) => 4,
    }
}

fn sort_key_cmp(left: &Value, right: &Value) -> Ordering {
    compare_scalars(left, right).unwrap_or_else(|| kind_rank(left).cmp(&kind_rank(right)))
}

/// Sorts records by the given keys, nulls first in ascending order.
pub fn sort_records(records: &mut [Record], order_by: &[OrderBy]) {
    if order_by.is_empty() {
        return;
    }
    records.sort_by(|left, right| {
        for order in order_by {
            let a = left.get(&order.column).unwrap_or(&Value::Null);
            let b = right.get(&order.column).unwrap_or(&Value::Null);
            let ordering = match order.direction {
                SortDirection::Asc => sort_key_cmp(a, b),
                SortDirection::Desc => sort_key_cmp(b, a),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Keeps only `fields` (plus `Id`) from a stored payload.
///
/// An empty `fields` list keeps every column.
pub fn project(id: RecordId, data: &Record, fields: &[String]) -> Record {
    let mut projected = Record::new();
    projected.insert(ID_COLUMN.to_string(), Value::from(id));
    if fields.is_empty() {
        for (column, value) in data {
            if column != ID_COLUMN {
                projected.insert(column.clone(), value.clone());
            }
        }
        return projected;
    }
    for field in fields {
        if field == ID_COLUMN {
            continue;
        }
        projected.insert(
            field.clone(),
            data.get(field).cloned().unwrap_or(Value::Null),
        );
    }
    projected
}
