//! SQLite-backed record store.
//!
//! # Responsibility
//! - Persist records of every logical table in the shared `records` table.
//! - Push conditions and ordering down to SQL via `json_extract`.
//!
//! # Invariants
//! - The connection must be migrated before the store accepts it.
//! - Batch writes run in one transaction; per-record failures do not roll back
//!   the other records of the batch.
//! - Comparisons only match values of the same JSON kind, matching the
//!   in-memory store.

use super::query::{project, validate_column, validate_query};
use super::{
    record_id, Condition, FetchQuery, Operator, Record, RecordId, RecordOutcome, RecordStore,
    SortDirection, StoreError, StoreResult, ID_COLUMN,
};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Record store over a single migrated SQLite connection.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Returns `StoreError::Unavailable` when the schema is behind this binary.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let version = current_user_version(&conn)?;
        if version < latest_version() {
            return Err(StoreError::Unavailable(format!(
                "schema version {version} is behind required {}",
                latest_version()
            )));
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl RecordStore for SqliteRecordStore {
    fn fetch_records(&self, table: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        validate_query(query)?;

        let mut sql = String::from("SELECT id, data FROM records WHERE table_name = ?");
        let mut bind_values = vec![SqlValue::Text(table.to_string())];

        for condition in &query.conditions {
            push_condition(&mut sql, &mut bind_values, condition)?;
        }

        sql.push_str(" ORDER BY ");
        for order in &query.order_by {
            let direction = match order.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            if order.column == ID_COLUMN {
                sql.push_str(&format!("id {direction}, "));
            } else {
                sql.push_str(&format!("json_extract(data, ?) {direction}, "));
                bind_values.push(SqlValue::Text(json_path(&order.column)));
            }
        }
        sql.push_str("id ASC");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let id: RecordId = row.get(0)?;
            let data: String = row.get(1)?;
            records.push(project(id, &parse_data(id, &data)?, &query.fields));
        }

        Ok(records)
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
        let conn = self.lock()?;
        match load_data(&conn, table, id)? {
            Some(data) => Ok(Some(project(id, &data, fields))),
            None => Ok(None),
        }
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        for record in &records {
            validate_record_columns(record)?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut outcomes = Vec::with_capacity(records.len());
        for mut record in records {
            record.remove(ID_COLUMN);
            tx.execute(
                "INSERT INTO records (table_name, data) VALUES (?1, ?2);",
                params![table, encode_data(&record)?],
            )?;
            let id = tx.last_insert_rowid();
            outcomes.push(RecordOutcome::Success(project(id, &record, &[])));
        }
        tx.commit()?;

        Ok(outcomes)
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        for record in &records {
            validate_record_columns(record)?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut outcomes = Vec::with_capacity(records.len());
        for mut changes in records {
            let Some(id) = record_id(&changes) else {
                outcomes.push(RecordOutcome::failure("record Id is required for update"));
                continue;
            };
            changes.remove(ID_COLUMN);

            let Some(mut stored) = load_data(&tx, table, id)? else {
                outcomes.push(RecordOutcome::failure(format!("record not found: {id}")));
                continue;
            };
            stored.extend(changes);
            write_data(&tx, id, &stored)?;
            outcomes.push(RecordOutcome::Success(project(id, &stored, &[])));
        }
        tx.commit()?;

        Ok(outcomes)
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<Vec<RecordOutcome>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            match load_data(&tx, table, *id)? {
                Some(data) => {
                    tx.execute(
                        "DELETE FROM records WHERE id = ?1 AND table_name = ?2;",
                        params![id, table],
                    )?;
                    outcomes.push(RecordOutcome::Success(project(*id, &data, &[])));
                }
                None => outcomes.push(RecordOutcome::failure(format!("record not found: {id}"))),
            }
        }
        tx.commit()?;

        Ok(outcomes)
    }
}

fn push_condition(
    sql: &mut String,
    bind_values: &mut Vec<SqlValue>,
    condition: &Condition,
) -> StoreResult<()> {
    let is_id = condition.column == ID_COLUMN;
    let operand = if is_id { "id" } else { "json_extract(data, ?)" };

    if condition.value.is_null() {
        let test = match condition.operator {
            Operator::EqualTo => "IS NULL",
            Operator::NotEqualTo => "IS NOT NULL",
            _ => {
                return Err(StoreError::InvalidQuery(format!(
                    "only equality comparisons accept null on `{}`",
                    condition.column
                )))
            }
        };
        sql.push_str(&format!(" AND {operand} {test}"));
        if !is_id {
            bind_values.push(SqlValue::Text(json_path(&condition.column)));
        }
        return Ok(());
    }

    let (kinds, value) = match &condition.value {
        Value::Number(number) => (
            "('integer', 'real')",
            match number.as_i64() {
                Some(integer) => SqlValue::Integer(integer),
                None => SqlValue::Real(number.as_f64().unwrap_or_default()),
            },
        ),
        Value::String(text) => ("('text')", SqlValue::Text(text.clone())),
        Value::Bool(flag) => ("('true', 'false')", SqlValue::Integer(i64::from(*flag))),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(StoreError::InvalidQuery(format!(
                "condition on `{}` must compare against a scalar",
                condition.column
            )))
        }
    };

    let op = match condition.operator {
        Operator::EqualTo => "=",
        Operator::NotEqualTo => "<>",
        Operator::LessThan => "<",
        Operator::LessThanOrEqualTo => "<=",
        Operator::GreaterThan => ">",
        Operator::GreaterThanOrEqualTo => ">=",
    };

    if is_id {
        sql.push_str(&format!(" AND id {op} ?"));
        bind_values.push(value);
    } else {
        let path = json_path(&condition.column);
        sql.push_str(&format!(
            " AND json_type(data, ?) IN {kinds} AND json_extract(data, ?) {op} ?"
        ));
        bind_values.push(SqlValue::Text(path.clone()));
        bind_values.push(SqlValue::Text(path));
        bind_values.push(value);
    }
    Ok(())
}

fn json_path(column: &str) -> String {
    format!("$.{column}")
}

fn validate_record_columns(record: &Record) -> StoreResult<()> {
    for column in record.keys() {
        validate_column(column)?;
    }
    Ok(())
}

fn load_data(conn: &Connection, table: &str, id: RecordId) -> StoreResult<Option<Record>> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM records WHERE id = ?1 AND table_name = ?2;",
            params![id, table],
            |row| row.get(0),
        )
        .optional()?;
    data.map(|text| parse_data(id, &text)).transpose()
}

fn write_data(tx: &Transaction<'_>, id: RecordId, data: &Record) -> StoreResult<()> {
    tx.execute(
        "UPDATE records
         SET
            data = ?1,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?2;",
        params![encode_data(data)?, id],
    )?;
    Ok(())
}

fn encode_data(data: &Record) -> StoreResult<String> {
    serde_json::to_string(data)
        .map_err(|err| StoreError::InvalidData(format!("cannot encode record payload: {err}")))
}

fn parse_data(id: RecordId, text: &str) -> StoreResult<Record> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::InvalidData(format!(
            "record {id} payload is not a JSON object"
        ))),
        Err(err) => Err(StoreError::InvalidData(format!(
            "record {id} payload is not valid JSON: {err}"
        ))),
    }
}
