//! Conversion between SQLite rows and typed records.

use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Column as _, Executor, Row};
use tracing::debug;

use super::query_builder::Statement;
use super::schema::{Column, Table};
use crate::domain::errors::{DomainError, DomainResult, FieldError};
use crate::domain::models::{Record, Value, ValueKind};

fn decode_failure(column: &Column, found: impl Into<String>) -> DomainError {
    DomainError::TypeMismatch {
        column: column.name.to_string(),
        expected: column.kind.as_str(),
        found: found.into(),
    }
}

fn read_column(row: &SqliteRow, index: usize, column: &Column) -> DomainResult<Value> {
    if column.kind == ValueKind::Integer {
        let value: Option<i64> = row
            .try_get(index)
            .map_err(|e| decode_failure(column, e.to_string()))?;
        return Ok(value.into());
    }

    let raw: Option<String> = row
        .try_get(index)
        .map_err(|e| decode_failure(column, e.to_string()))?;
    match raw {
        None => Ok(Value::Null),
        Some(text) => Value::Text(text.clone())
            .coerce(column.kind)
            .ok_or_else(|| decode_failure(column, format!("'{text}'"))),
    }
}

/// Convert a result row of `table` into a typed record.
///
/// Each column is decoded according to its declared schema kind; a stored
/// value that cannot be read as that kind is a `TypeMismatch`.
pub fn row_to_record(table: Table, row: &SqliteRow) -> DomainResult<Record> {
    let mut record = Record::new();
    for (index, sql_column) in row.columns().iter().enumerate() {
        let column = table.require(sql_column.name())?;
        record.insert(column.name, read_column(row, index, column)?);
    }
    Ok(record)
}

/// Coerce caller-supplied values to their column kinds, collecting failures.
///
/// Unknown and storage-generated columns fail outright with `InvalidColumn`. Values that cannot be
/// coerced are dropped from the returned record and reported as field errors,
/// so callers can combine them with their own validation.
pub fn coerce_record(table: Table, record: &Record) -> DomainResult<(Record, Vec<FieldError>)> {
    let mut coerced = Record::new();
    let mut errors = Vec::new();
    for (name, value) in record.iter() {
        let column = table.require_writable(name)?;
        match value.coerce(column.kind) {
            Some(value) => coerced.insert(column.name, value),
            None => errors.push(FieldError::new(
                column.name,
                format!("must be a valid {}", column.kind),
            )),
        }
    }
    Ok((coerced, errors))
}

/// Coerce every value of `record` for writing into `table`.
///
/// Fails with `TypeMismatch` on the first value that cannot be coerced.
pub fn record_to_row(table: Table, record: &Record) -> DomainResult<Record> {
    let mut row = Record::new();
    for (name, value) in record.iter() {
        let column = table.require_writable(name)?;
        let coerced = value
            .coerce(column.kind)
            .ok_or_else(|| decode_failure(column, value.type_name()))?;
        row.insert(column.name, coerced);
    }
    Ok(row)
}

/// Run a SELECT and map every row of `table`.
pub async fn fetch_records<'c, E>(
    executor: E,
    table: Table,
    statement: &Statement,
) -> DomainResult<Vec<Record>>
where
    E: Executor<'c, Database = Sqlite>,
{
    debug!(sql = %statement.sql, args = statement.args.len(), "select");
    let rows = statement.query().fetch_all(executor).await?;
    rows.iter().map(|row| row_to_record(table, row)).collect()
}

/// Exactly one record, or `NotFound` / `Ambiguous`.
pub fn expect_single(mut records: Vec<Record>, entity: &'static str, id: i64) -> DomainResult<Record> {
    match records.len() {
        0 => Err(DomainError::NotFound { entity, id }),
        1 => Ok(records.remove(0)),
        count => Err(DomainError::Ambiguous { entity, id, count }),
    }
}
