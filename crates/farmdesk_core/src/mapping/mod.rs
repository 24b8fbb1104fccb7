//! Typed converters between domain entities and store records.
//!
//! # Responsibility
//! - Name every store column once, per table.
//! - Decode store records into entities and encode create/patch inputs.
//!
//! # Invariants
//! - Patch encoders only emit columns whose patch value is `Some`.
//! - Coordinates decode defensively, and unknown enum text falls back to the
//!   column default. Every other malformed column is rejected as invalid data.

use crate::model::dates::{format_store_date, parse_store_date};
use crate::model::validation::Validate;
use crate::store::{OrderBy, Record, RecordId, ID_COLUMN};
use chrono::NaiveDate;
use log::warn;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod field;
pub mod finance;
pub mod inventory;
pub mod task;

/// Columns shared by every table.
pub mod common {
    pub const NAME: &str = "Name";
    pub const TAGS: &str = "Tags";
    pub const OWNER: &str = "Owner";
}

pub type MappingResult<T> = Result<T, MappingError>;

/// A stored column that cannot be decoded into its typed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingError {
    pub table: &'static str,
    pub column: &'static str,
    pub message: String,
}

impl MappingError {
    pub fn new(table: &'static str, column: &'static str, message: impl Into<String>) -> Self {
        Self {
            table,
            column,
            message: message.into(),
        }
    }
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.table, self.column, self.message)
    }
}

impl Error for MappingError {}

/// Binds an entity type to its store table and column conventions.
pub trait TableMapping: Sized {
    type New: Validate;
    type Patch: Validate;

    /// Store table name.
    const TABLE: &'static str;
    /// Human-readable entity label used in logs and errors.
    const LABEL: &'static str;
    /// Columns requested on every read.
    const COLUMNS: &'static [&'static str];

    /// Ordering applied by `list`.
    fn default_order() -> Vec<OrderBy>;

    fn from_record(record: &Record) -> MappingResult<Self>;

    /// Encodes a create input. `today` is the caller's calendar date.
    fn new_to_record(input: &Self::New, today: NaiveDate) -> Record;

    /// Encodes only the columns present in `patch`.
    fn patch_to_record(patch: &Self::Patch, today: NaiveDate) -> Record;
}

/// Reads column values out of one record of `table`.
pub(crate) struct RecordReader<'a> {
    table: &'static str,
    record: &'a Record,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(table: &'static str, record: &'a Record) -> Self {
        Self { table, record }
    }

    fn value(&self, column: &str) -> Option<&'a Value> {
        self.record.get(column).filter(|value| !value.is_null())
    }

    fn error(&self, column: &'static str, message: impl Into<String>) -> MappingError {
        MappingError::new(self.table, column, message)
    }

    pub(crate) fn id(&self) -> MappingResult<RecordId> {
        self.value(ID_COLUMN)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.error(ID_COLUMN, "missing integral record id"))
    }

    /// Text column; numbers are rendered as text, null or missing is `None`.
    pub(crate) fn text(&self, column: &'static str) -> MappingResult<Option<String>> {
        match self.value(column) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(other) => Err(self.error(column, format!("expected text, got {other}"))),
        }
    }

    pub(crate) fn text_or_empty(&self, column: &'static str) -> MappingResult<String> {
        Ok(self.text(column)?.unwrap_or_default())
    }

    /// Numeric column; numeric text is accepted.
    pub(crate) fn number(&self, column: &'static str) -> MappingResult<Option<f64>> {
        match self.value(column) {
            None => Ok(None),
            Some(Value::Number(number)) => number
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.error(column, "number out of range")),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.error(column, format!("expected number, got `{text}`"))),
            Some(other) => Err(self.error(column, format!("expected number, got {other}"))),
        }
    }

    /// Numeric column where missing means zero.
    pub(crate) fn number_or_zero(&self, column: &'static str) -> MappingResult<f64> {
        Ok(self.number(column)?.unwrap_or_default())
    }

    /// Lookup reference: an integer, numeric text, or an object carrying `Id`.
    pub(crate) fn lookup_id(&self, column: &'static str) -> MappingResult<Option<RecordId>> {
        match self.value(column) {
            None => Ok(None),
            Some(Value::Number(number)) => number
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.error(column, format!("expected integral id, got {number}"))),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => text
                .trim()
                .parse::<RecordId>()
                .map(Some)
                .map_err(|_| self.error(column, format!("expected id, got `{text}`"))),
            Some(Value::Object(lookup)) => match lookup.get(ID_COLUMN) {
                Some(Value::Number(number)) => Ok(number.as_i64()),
                _ => Err(self.error(column, "lookup object has no integral Id")),
            },
            Some(other) => Err(self.error(column, format!("expected id, got {other}"))),
        }
    }

    /// Date column; unparseable text decodes to `None`.
    pub(crate) fn date(&self, column: &'static str) -> Option<NaiveDate> {
        self.value(column)
            .and_then(Value::as_str)
            .and_then(parse_store_date)
    }

    /// Enum column; missing or unknown text means `default`.
    ///
    /// Unknown values are logged so one stray row cannot fail a whole page.
    pub(crate) fn choice<T>(
        &self,
        column: &'static str,
        parse: fn(&str) -> Option<T>,
        default: T,
    ) -> MappingResult<T> {
        let Some(text) = self.text(column)? else {
            return Ok(default);
        };
        Ok(parse(&text).unwrap_or_else(|| {
            warn!(
                "event=record_decode module=mapping status=fallback table={} column={} value={:?}",
                self.table, column, text
            );
            default
        }))
    }

    /// Coordinate list; never fails.
    pub(crate) fn coordinates(&self, column: &'static str) -> Vec<f64> {
        match self.value(column) {
            Some(Value::String(text)) => parse_coordinates(text),
            Some(Value::Array(items)) => numeric_list(items).unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Parses coordinates stored as JSON text; anything malformed yields `[]`.
pub fn parse_coordinates(text: &str) -> Vec<f64> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => numeric_list(&items).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Serializes coordinates to the JSON text kept in the store.
pub fn encode_coordinates(coordinates: &[f64]) -> String {
    Value::from(coordinates.to_vec()).to_string()
}

fn numeric_list(items: &[Value]) -> Option<Vec<f64>> {
    items.iter().map(Value::as_f64).collect()
}

/// Builds a store record column by column.
#[derive(Debug, Default)]
pub(crate) struct RecordWriter {
    record: Record,
}

impl RecordWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.record.insert(column.to_string(), value.into());
        self
    }

    pub(crate) fn put_opt<T: Into<Value>>(&mut self, column: &str, value: Option<T>) -> &mut Self {
        self.put(column, value.map_or(Value::Null, Into::into))
    }

    pub(crate) fn put_date(&mut self, column: &str, value: Option<NaiveDate>) -> &mut Self {
        self.put_opt(column, value.map(format_store_date))
    }

    /// Writes `value` only when the patch carries it.
    pub(crate) fn patch<T: Into<Value>>(&mut self, column: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.put(column, value);
        }
        self
    }

    /// Writes a clearable column when the patch carries it; `Some(None)` clears.
    pub(crate) fn patch_opt<T: Into<Value>>(
        &mut self,
        column: &str,
        value: Option<Option<T>>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.put_opt(column, value);
        }
        self
    }

    pub(crate) fn patch_date(&mut self, column: &str, value: Option<Option<NaiveDate>>) -> &mut Self {
        if let Some(value) = value {
            self.put_date(column, value);
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Record {
        std::mem::take(&mut self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::{encode_coordinates, parse_coordinates, RecordReader};
    use crate::model::task::TaskStatus;
    use crate::store::Record;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn coordinates_round_trip_through_json_text() {
        let coordinates = vec![40.7128, -74.006, 40.713, -74.0055];
        assert_eq!(parse_coordinates(&encode_coordinates(&coordinates)), coordinates);
        assert_eq!(encode_coordinates(&[]), "[]");
    }

    #[test]
    fn malformed_coordinates_degrade_to_empty() {
        assert!(parse_coordinates("not json").is_empty());
        assert!(parse_coordinates("{\"lat\": 1}").is_empty());
        assert!(parse_coordinates("[1, \"two\"]").is_empty());
        assert!(parse_coordinates("").is_empty());
    }

    #[test]
    fn lookup_ids_accept_numbers_text_and_objects() {
        let row = record(json!({
            "a": 7,
            "b": "12",
            "c": { "Id": 3, "Name": "North" },
            "d": null,
            "e": "x"
        }));
        let reader = RecordReader::new("t", &row);
        assert_eq!(reader.lookup_id("a").unwrap(), Some(7));
        assert_eq!(reader.lookup_id("b").unwrap(), Some(12));
        assert_eq!(reader.lookup_id("c").unwrap(), Some(3));
        assert_eq!(reader.lookup_id("d").unwrap(), None);
        assert_eq!(reader.lookup_id("missing").unwrap(), None);
        assert!(reader.lookup_id("e").is_err());
    }

    #[test]
    fn numbers_accept_numeric_text() {
        let row = record(json!({ "a": "2.5", "b": 4, "c": "abc" }));
        let reader = RecordReader::new("t", &row);
        assert_eq!(reader.number("a").unwrap(), Some(2.5));
        assert_eq!(reader.number("b").unwrap(), Some(4.0));
        assert!(reader.number("c").is_err());
        assert_eq!(reader.number_or_zero("missing").unwrap(), 0.0);
    }

    #[test]
    fn unknown_choice_falls_back_to_default() {
        let row = record(json!({ "a": "Active", "b": "completed", "c": 3 }));
        let reader = RecordReader::new("t", &row);
        let status =
            |column: &'static str| reader.choice(column, TaskStatus::parse, TaskStatus::Overdue);
        assert_eq!(status("a").unwrap(), TaskStatus::Overdue);
        assert_eq!(status("b").unwrap(), TaskStatus::Completed);
        assert_eq!(status("c").unwrap(), TaskStatus::Overdue);
        assert_eq!(status("missing").unwrap(), TaskStatus::Overdue);
    }
}
