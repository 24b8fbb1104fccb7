//! Generic entity service over the record store protocol.
//!
//! # Responsibility
//! - Provide `list/get_by_id/create/update/delete` for every mapped entity.
//! - Validate inputs before any store call.
//! - Turn per-record batch failures into `ServiceError::RecordRejected`.
//!
//! # Invariants
//! - `update` sends only the columns present in the patch, plus `Id`.
//! - Store failures are logged once here and propagated unchanged.

use super::{Clock, SystemClock};
use crate::mapping::{MappingError, TableMapping};
use crate::model::validation::{Validate, ValidationErrors};
use crate::store::{
    record_id, FetchQuery, Record, RecordId, RecordOutcome, RecordStore, StoreError, ID_COLUMN,
};
use log::{debug, error, info};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced by domain services.
#[derive(Debug)]
pub enum ServiceError {
    /// The store call failed as a whole; carries the store's message.
    Store {
        table: &'static str,
        source: StoreError,
    },
    /// Input failed field-level checks; nothing was sent to the store.
    Validation(ValidationErrors),
    /// The store answered but refused one or more records of the batch.
    RecordRejected {
        table: &'static str,
        operation: &'static str,
        message: String,
    },
    /// A stored record could not be decoded.
    InvalidData(MappingError),
    /// A textual id was not a positive integer.
    InvalidId(String),
    /// The store reported success without returning the written record.
    MissingResult {
        table: &'static str,
        operation: &'static str,
    },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store { source, .. } => write!(f, "{source}"),
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::RecordRejected {
                table,
                operation,
                message,
            } => write!(f, "failed to {operation} record in {table}: {message}"),
            Self::InvalidData(err) => write!(f, "invalid stored record {err}"),
            Self::InvalidId(value) => write!(f, "invalid record id `{value}`"),
            Self::MissingResult { table, operation } => {
                write!(f, "store returned no record for {operation} in {table}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store { source, .. } => Some(source),
            Self::Validation(errors) => Some(errors),
            Self::InvalidData(err) => Some(err),
            Self::RecordRejected { .. } | Self::InvalidId(_) | Self::MissingResult { .. } => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<MappingError> for ServiceError {
    fn from(value: MappingError) -> Self {
        Self::InvalidData(value)
    }
}

/// Parses a textual id the way form inputs and route params arrive.
///
/// # Errors
/// - Returns `ServiceError::InvalidId` unless the text is a positive integer.
pub fn parse_record_id(value: &str) -> ServiceResult<RecordId> {
    match value.trim().parse::<RecordId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::InvalidId(value.to_string())),
    }
}

/// CRUD service for one mapped entity type.
pub struct RecordService<S, E> {
    store: S,
    clock: Arc<dyn Clock>,
    _entity: PhantomData<fn() -> E>,
}

impl<S: RecordStore, E: TableMapping> RecordService<S, E> {
    /// Creates a service using the provided store and the system clock.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            _entity: PhantomData,
        }
    }

    /// Replaces the clock used to stamp write dates.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Lists every record of the table in its default order.
    pub fn list(&self) -> ServiceResult<Vec<E>> {
        let mut query = Self::base_query();
        query.order_by = E::default_order();
        self.fetch(&query)
    }

    /// Gets one record by id; `None` when the store has no such record.
    pub fn get_by_id(&self, id: RecordId) -> ServiceResult<Option<E>> {
        let fields: Vec<String> = E::COLUMNS.iter().map(|c| (*c).to_string()).collect();
        let record = self
            .store
            .get_record_by_id(E::TABLE, id, &fields)
            .map_err(|err| self.store_failure("get", err))?;
        match record {
            Some(record) => Ok(Some(E::from_record(&record)?)),
            None => Ok(None),
        }
    }

    /// Validates and creates one record, returning the stored entity.
    pub fn create(&self, input: &E::New) -> ServiceResult<E> {
        input.validate()?;
        let record = E::new_to_record(input, self.clock.today());
        let started_at = Instant::now();
        let outcomes = self
            .store
            .create_records(E::TABLE, vec![record])
            .map_err(|err| self.store_failure("create", err))?;
        let created = self.single_result("create", outcomes)?;
        info!(
            "event=record_write module=service status=ok op=create table={} id={} duration_ms={}",
            E::TABLE,
            record_id(&created).unwrap_or_default(),
            started_at.elapsed().as_millis()
        );
        Ok(E::from_record(&created)?)
    }

    /// Applies the columns present in `patch` to record `id`.
    pub fn update(&self, id: RecordId, patch: &E::Patch) -> ServiceResult<E> {
        patch.validate()?;
        let mut record = E::patch_to_record(patch, self.clock.today());
        record.insert(ID_COLUMN.to_string(), Value::from(id));
        let started_at = Instant::now();
        let outcomes = self
            .store
            .update_records(E::TABLE, vec![record])
            .map_err(|err| self.store_failure("update", err))?;
        let updated = self.single_result("update", outcomes)?;
        info!(
            "event=record_write module=service status=ok op=update table={} id={} duration_ms={}",
            E::TABLE,
            id,
            started_at.elapsed().as_millis()
        );
        Ok(E::from_record(&updated)?)
    }

    /// Deletes record `id`; `Ok(true)` once the store confirms.
    pub fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        let outcomes = self
            .store
            .delete_records(E::TABLE, &[id])
            .map_err(|err| self.store_failure("delete", err))?;
        self.reject_failures("delete", &outcomes)?;
        info!(
            "event=record_write module=service status=ok op=delete table={} id={}",
            E::TABLE,
            id
        );
        Ok(true)
    }

    /// Query projecting the entity columns, with no filter or order.
    pub(crate) fn base_query() -> FetchQuery {
        FetchQuery::with_fields(E::COLUMNS)
    }

    /// Runs `query` against the entity table and decodes every row.
    pub(crate) fn fetch(&self, query: &FetchQuery) -> ServiceResult<Vec<E>> {
        let started_at = Instant::now();
        let records = self
            .store
            .fetch_records(E::TABLE, query)
            .map_err(|err| self.store_failure("fetch", err))?;
        debug!(
            "event=record_fetch module=service status=ok table={} rows={} duration_ms={}",
            E::TABLE,
            records.len(),
            started_at.elapsed().as_millis()
        );
        records
            .iter()
            .map(|record| E::from_record(record).map_err(ServiceError::from))
            .collect()
    }

    fn store_failure(&self, operation: &'static str, err: StoreError) -> ServiceError {
        error!(
            "event=record_{} module=service status=error table={} label={} error={}",
            operation,
            E::TABLE,
            E::LABEL,
            err
        );
        ServiceError::Store {
            table: E::TABLE,
            source: err,
        }
    }

    fn reject_failures(
        &self,
        operation: &'static str,
        outcomes: &[RecordOutcome],
    ) -> ServiceResult<()> {
        let messages: Vec<&str> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RecordOutcome::Failure { message } => Some(message.as_str()),
                RecordOutcome::Success(_) => None,
            })
            .collect();
        if messages.is_empty() {
            return Ok(());
        }

        error!(
            "event=record_write module=service status=error op={} table={} failed_records={}",
            operation,
            E::TABLE,
            messages.len()
        );
        Err(ServiceError::RecordRejected {
            table: E::TABLE,
            operation,
            message: messages.join("; "),
        })
    }

    fn single_result(
        &self,
        operation: &'static str,
        outcomes: Vec<RecordOutcome>,
    ) -> ServiceResult<Record> {
        self.reject_failures(operation, &outcomes)?;
        outcomes
            .into_iter()
            .find_map(|outcome| match outcome {
                RecordOutcome::Success(record) => Some(record),
                RecordOutcome::Failure { .. } => None,
            })
            .ok_or(ServiceError::MissingResult {
                table: E::TABLE,
                operation,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_record_id, ServiceError};

    #[test]
    fn parse_record_id_accepts_padded_positive_integers() {
        assert_eq!(parse_record_id(" 42 ").unwrap(), 42);
        assert!(matches!(
            parse_record_id("0"),
            Err(ServiceError::InvalidId(_))
        ));
        assert!(matches!(
            parse_record_id("12abc"),
            Err(ServiceError::InvalidId(_))
        ));
    }
}
