//! Record store contracts and implementations.
//!
//! # Responsibility
//! - Define the table-addressed CRUD protocol every domain service talks to.
//! - Provide a durable SQLite store and an in-process memory store.
//!
//! # Invariants
//! - Record ids are assigned by the store, never by callers.
//! - Batch writes report one `RecordOutcome` per input, in input order.
//! - A store-level `Err` means the whole call failed; per-record failures are
//!   reported as `RecordOutcome::Failure` instead.

use crate::db::DbError;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory_store;
pub mod query;
pub mod sqlite_store;

/// Store-assigned numeric identity shared by every entity.
pub type RecordId = i64;

/// Raw store record: column name to JSON value.
pub type Record = Map<String, Value>;

/// Column holding the store-assigned id in every returned record.
pub const ID_COLUMN: &str = "Id";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a whole record store call.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Query referenced an unusable column or value.
    InvalidQuery(String),
    /// Persisted payload could not be decoded.
    InvalidData(String),
    /// Store cannot serve requests (for example a poisoned lock).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidQuery(message) => write!(f, "invalid record query: {message}"),
            Self::InvalidData(message) => write!(f, "invalid stored record: {message}"),
            Self::Unavailable(message) => write!(f, "record store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Comparison operators accepted in `Condition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
}

/// One `column <op> value` predicate. Conditions in a query are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Read options for `fetch_records`.
///
/// An empty `fields` list returns every stored column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchQuery {
    pub fields: Vec<String>,
    pub conditions: Vec<Condition>,
    pub order_by: Vec<OrderBy>,
}

impl FetchQuery {
    /// Builds a query projecting the given columns.
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|field| (*field).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }
}

/// Per-record result of a batch write.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Stored record after the write, including `Id`.
    Success(Record),
    Failure { message: String },
}

impl RecordOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Table-addressed record store protocol.
pub trait RecordStore: Send + Sync {
    fn fetch_records(&self, table: &str, query: &FetchQuery) -> StoreResult<Vec<Record>>;
    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>>;
    fn create_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>>;
    /// Merges each record into the stored row named by its `Id` column.
    fn update_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>>;
    fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<Vec<RecordOutcome>>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn fetch_records(&self, table: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        (**self).fetch_records(table, query)
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        (**self).get_record_by_id(table, id, fields)
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        (**self).create_records(table, records)
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        (**self).update_records(table, records)
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<Vec<RecordOutcome>> {
        (**self).delete_records(table, ids)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn fetch_records(&self, table: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        (**self).fetch_records(table, query)
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        (**self).get_record_by_id(table, id, fields)
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        (**self).create_records(table, records)
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        (**self).update_records(table, records)
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<Vec<RecordOutcome>> {
        (**self).delete_records(table, ids)
    }
}

/// Reads the store-assigned id from a record, if present and integral.
pub fn record_id(record: &Record) -> Option<RecordId> {
    record.get(ID_COLUMN).and_then(Value::as_i64)
}
