//! In-process record store.
//!
//! # Responsibility
//! - Serve the record store protocol from memory for tests and offline use.
//!
//! # Invariants
//! - New ids are `max(existing id in table) + 1`, starting at 1.
//! - Rows iterate in ascending id order before any `order_by` is applied.

use super::query::{matches_all, project, sort_records, validate_column, validate_query};
use super::{
    record_id, FetchQuery, Record, RecordId, RecordOutcome, RecordStore, StoreError, StoreResult,
    ID_COLUMN,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

type Table = BTreeMap<RecordId, Record>;

/// Memory-backed record store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `rows` into `table` as-is; each row must carry an integral `Id`.
    ///
    /// Used to seed fixtures with known ids.
    pub fn seed(&self, table: &str, rows: Vec<Record>) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let target = tables.entry(table.to_string()).or_default();
        for mut row in rows {
            let id = record_id(&row).ok_or_else(|| {
                StoreError::InvalidData(format!("seed row for `{table}` has no integral Id"))
            })?;
            row.remove(ID_COLUMN);
            target.insert(id, row);
        }
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Table>>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn next_id(table: &Table) -> RecordId {
    table.keys().next_back().map_or(1, |max| max + 1)
}

fn validate_columns(record: &Record) -> StoreResult<()> {
    for column in record.keys() {
        validate_column(column)?;
    }
    Ok(())
}

impl RecordStore for MemoryRecordStore {
    fn fetch_records(&self, table: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        validate_query(query)?;
        let tables = self.lock()?;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Record> = rows
            .iter()
            .map(|(id, data)| project(*id, data, &[]))
            .filter(|row| matches_all(row, &query.conditions))
            .collect();
        sort_records(&mut matched, &query.order_by);

        Ok(matched
            .into_iter()
            .map(|row| {
                let id = record_id(&row).unwrap_or_default();
                project(id, &row, &query.fields)
            })
            .collect())
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        for field in fields {
            validate_column(field)?;
        }
        let tables = self.lock()?;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.get(&id))
            .map(|data| project(id, data, fields)))
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        for record in &records {
            validate_columns(record)?;
        }
        let mut tables = self.lock()?;
        let rows = tables.entry(table.to_string()).or_default();
        let mut outcomes = Vec::with_capacity(records.len());
        for mut record in records {
            record.remove(ID_COLUMN);
            let id = next_id(rows);
            outcomes.push(RecordOutcome::Success(project(id, &record, &[])));
            rows.insert(id, record);
        }
        Ok(outcomes)
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        for record in &records {
            validate_columns(record)?;
        }
        let mut tables = self.lock()?;
        let rows = tables.entry(table.to_string()).or_default();
        let mut outcomes = Vec::with_capacity(records.len());
        for mut changes in records {
            let Some(id) = record_id(&changes) else {
                outcomes.push(RecordOutcome::failure("record Id is required for update"));
                continue;
            };
            changes.remove(ID_COLUMN);
            match rows.get_mut(&id) {
                Some(stored) => {
                    stored.extend(changes);
                    outcomes.push(RecordOutcome::Success(project(id, stored, &[])));
                }
                None => outcomes.push(RecordOutcome::failure(format!("record not found: {id}"))),
            }
        }
        Ok(outcomes)
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<Vec<RecordOutcome>> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.to_string()).or_default();
        Ok(ids
            .iter()
            .map(|id| match rows.remove(id) {
                Some(data) => RecordOutcome::Success(project(*id, &data, &[])),
                None => RecordOutcome::failure(format!("record not found: {id}")),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRecordStore;
    use crate::store::{FetchQuery, Record, RecordOutcome, RecordStore};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn ids_continue_from_highest_existing_id() {
        let store = MemoryRecordStore::new();
        store
            .seed("task_c", vec![record(json!({ "Id": 4, "title_c": "seeded" }))])
            .unwrap();

        let outcomes = store
            .create_records("task_c", vec![record(json!({ "title_c": "new" }))])
            .unwrap();
        match &outcomes[0] {
            RecordOutcome::Success(created) => assert_eq!(created["Id"], json!(5)),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn update_of_missing_row_reports_failure_without_error() {
        let store = MemoryRecordStore::new();
        let outcomes = store
            .update_records("task_c", vec![record(json!({ "Id": 9, "title_c": "x" }))])
            .unwrap();
        assert!(!outcomes[0].is_success());
    }

    #[test]
    fn tables_are_isolated() {
        let store = MemoryRecordStore::new();
        store
            .create_records("field_c", vec![record(json!({ "Name": "North" }))])
            .unwrap();
        let tasks = store
            .fetch_records("task_c", &FetchQuery::default())
            .unwrap();
        assert!(tasks.is_empty());
    }
}
