//! Parameterized statement construction.
//!
//! Statement text is assembled only from identifiers in [`Table`] schemas;
//! every caller-supplied value travels as a bound argument behind a `?`
//! placeholder. Builders record the first problem they hit and report it from
//! `build()`, so a rejected column never yields a statement.

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

use super::schema::{Column, Table};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Record, Value};

/// Statement text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Statement text with `?` placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub args: Vec<Value>,
}

impl Statement {
    /// Number of `?` placeholders in the text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// A sqlx query with every argument bound in order.
    pub fn query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        self.args
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| bind_value(query, value))
    }
}

/// Bind one value. Integers bind natively; everything else binds as its
/// canonical storage text.
pub fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Integer(n) => query.bind(*n),
        other => query.bind(other.to_storage_text()),
    }
}

/// The two statement shapes a caller can ask for by descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `SELECT *` filtered on the record's columns.
    Select,
    /// `INSERT` of the record's columns.
    Insert,
}

/// Build a statement from a descriptor: SELECT filters on every column of
/// `record`, INSERT writes every column of `record`.
pub fn build(kind: StatementKind, table: Table, record: &Record) -> DomainResult<Statement> {
    match kind {
        StatementKind::Select => SelectBuilder::new(table).filters(record).build(),
        StatementKind::Insert => InsertBuilder::new(table).values(record).build(),
    }
}

fn check_value(column: &Column, value: &Value) -> DomainResult<()> {
    match value.kind() {
        None => Ok(()),
        Some(kind) if kind == column.kind => Ok(()),
        Some(_) => Err(DomainError::TypeMismatch {
            column: column.name.to_string(),
            expected: column.kind.as_str(),
            found: value.type_name().to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
enum Condition {
    Eq(&'static str),
    IsNull(&'static str),
    InSubquery(&'static str, String),
}

impl Condition {
    fn render(&self) -> String {
        match self {
            Self::Eq(col) => format!("{col} = ?"),
            Self::IsNull(col) => format!("{col} IS NULL"),
            Self::InSubquery(col, sql) => format!("{col} IN ({sql})"),
        }
    }
}

fn render_where(conditions: &[Condition]) -> String {
    if conditions.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = conditions.iter().map(Condition::render).collect();
    format!(" WHERE {}", parts.join(" AND "))
}

/// SELECT with equality filters.
#[derive(Debug)]
pub struct SelectBuilder {
    table: Table,
    columns: Vec<&'static str>,
    conditions: Vec<Condition>,
    args: Vec<Value>,
    order_by: Option<&'static str>,
    error: Option<DomainError>,
}

impl SelectBuilder {
    /// Select every row of `table`, all columns, in key order.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            conditions: Vec::new(),
            args: Vec::new(),
            order_by: None,
            error: None,
        }
    }

    fn fail(&mut self, err: DomainError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Restrict the selected columns. Defaults to every schema column.
    #[must_use]
    pub fn columns(mut self, names: &[&str]) -> Self {
        for name in names {
            match self.table.require(name) {
                Ok(column) => self.columns.push(column.name),
                Err(err) => self.fail(err),
            }
        }
        self
    }

    /// `column = ?`, or `column IS NULL` for a null value.
    #[must_use]
    pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let column = match self.table.require(column) {
            Ok(column) => column,
            Err(err) => {
                self.fail(err);
                return self;
            }
        };
        if let Err(err) = check_value(column, &value) {
            self.fail(err);
            return self;
        }
        if value.is_null() {
            self.conditions.push(Condition::IsNull(column.name));
        } else {
            self.conditions.push(Condition::Eq(column.name));
            self.args.push(value);
        }
        self
    }

    /// One equality filter per record entry.
    #[must_use]
    pub fn filters(self, record: &Record) -> Self {
        record
            .iter()
            .fold(self, |builder, (column, value)| builder.filter(column, value.clone()))
    }

    /// `column IN (subquery)`. The subquery's arguments follow any already bound.
    #[must_use]
    pub fn filter_in(mut self, column: &str, subquery: Statement) -> Self {
        match self.table.require(column) {
            Ok(column) => {
                self.conditions
                    .push(Condition::InSubquery(column.name, subquery.sql));
                self.args.extend(subquery.args);
            }
            Err(err) => self.fail(err),
        }
        self
    }

    /// Order by `column` instead of the primary key.
    #[must_use]
    pub fn order_by(mut self, column: &str) -> Self {
        match self.table.require(column) {
            Ok(column) => self.order_by = Some(column.name),
            Err(err) => self.fail(err),
        }
        self
    }

    /// Render the statement, or the first error recorded while building.
    pub fn build(self) -> DomainResult<Statement> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let columns = if self.columns.is_empty() {
            self.table
                .columns()
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            self.columns.join(", ")
        };
        let sql = format!(
            "SELECT {columns} FROM {}{} ORDER BY {}",
            self.table.name(),
            render_where(&self.conditions),
            self.order_by.unwrap_or_else(|| self.table.primary_key()),
        );
        Ok(Statement {
            sql,
            args: self.args,
        })
    }
}

/// INSERT of one row.
#[derive(Debug)]
pub struct InsertBuilder {
    table: Table,
    columns: Vec<&'static str>,
    args: Vec<Value>,
    or_ignore: bool,
    error: Option<DomainError>,
}

impl InsertBuilder {
    /// Insert into `table`; at least one value is required.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            args: Vec::new(),
            or_ignore: false,
            error: None,
        }
    }

    /// Skip the row silently when it collides with an existing key.
    #[must_use]
    pub fn or_ignore(mut self) -> Self {
        self.or_ignore = true;
        self
    }

    /// Set one column. Unknown and storage-generated columns are
    /// recorded as `InvalidColumn`; values are checked against the column kind.
    #[must_use]
    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let value = value.into();
        let result = self
            .table
            .require_writable(column)
            .and_then(|column| check_value(column, &value).map(|()| column));
        match result {
            Ok(column) => {
                self.columns.push(column.name);
                self.args.push(value);
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Set every column of `record`.
    #[must_use]
    pub fn values(self, record: &Record) -> Self {
        record
            .iter()
            .fold(self, |builder, (column, value)| builder.value(column, value.clone()))
    }

    /// Render the INSERT, or the first recorded error.
    pub fn build(self) -> DomainResult<Statement> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let verb = if self.or_ignore {
            "INSERT OR IGNORE INTO"
        } else {
            "INSERT INTO"
        };
        let sql = if self.columns.is_empty() {
            format!("{verb} {} DEFAULT VALUES", self.table.name())
        } else {
            let placeholders = vec!["?"; self.columns.len()].join(", ");
            format!(
                "{verb} {} ({}) VALUES ({placeholders})",
                self.table.name(),
                self.columns.join(", "),
            )
        };
        Ok(Statement {
            sql,
            args: self.args,
        })
    }
}

/// UPDATE with SET assignments and equality filters; both are mandatory.
#[derive(Debug)]
pub struct UpdateBuilder {
    table: Table,
    assignments: Vec<&'static str>,
    conditions: Vec<Condition>,
    set_args: Vec<Value>,
    where_args: Vec<Value>,
    error: Option<DomainError>,
}

impl UpdateBuilder {
    /// Update rows of `table`. Both a SET and a WHERE clause are required.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            conditions: Vec::new(),
            set_args: Vec::new(),
            where_args: Vec::new(),
            error: None,
        }
    }

    fn resolve(&mut self, column: &str, value: &Value) -> Option<&'static Column> {
        if self.error.is_some() {
            return None;
        }
        match self
            .table
            .require(column)
            .and_then(|column| check_value(column, value).map(|()| column))
        {
            Ok(column) => Some(column),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    /// Assign a column.
    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Some(column) = self.resolve(column, &value) {
            self.assignments.push(column.name);
            self.set_args.push(value);
        }
        self
    }

    /// Restrict the update to rows where `column = value`.
    #[must_use]
    pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Some(column) = self.resolve(column, &value) {
            if value.is_null() {
                self.conditions.push(Condition::IsNull(column.name));
            } else {
                self.conditions.push(Condition::Eq(column.name));
                self.where_args.push(value);
            }
        }
        self
    }

    /// Render the UPDATE, or the first recorded error.
    pub fn build(self) -> DomainResult<Statement> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.assignments.is_empty() {
            return Err(DomainError::StorageError(format!(
                "UPDATE on {} has no assignments",
                self.table.name()
            )));
        }
        if self.conditions.is_empty() {
            return Err(DomainError::StorageError(format!(
                "UPDATE on {} has no filter",
                self.table.name()
            )));
        }
        let set = self
            .assignments
            .iter()
            .map(|col| format!("{col} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {set}{}",
            self.table.name(),
            render_where(&self.conditions),
        );
        let mut args = self.set_args;
        args.extend(self.where_args);
        Ok(Statement { sql, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_select_uses_placeholders_and_primary_key_order() {
        let stmt = SelectBuilder::new(Table::Property)
            .filter("agent_id", 7_i64)
            .build()
            .unwrap();
        assert!(stmt.sql.starts_with("SELECT property_id, agent_id, property_type"));
        assert!(stmt.sql.ends_with("FROM properties WHERE agent_id = ? ORDER BY property_id"));
        assert_eq!(stmt.args, vec![Value::Integer(7)]);
        assert_eq!(stmt.placeholder_count(), stmt.args.len());
    }

    #[test]
    fn test_select_null_filter_binds_nothing() {
        let stmt = SelectBuilder::new(Table::Transaction)
            .columns(&["transaction_id"])
            .filter("paid_at", Value::Null)
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT transaction_id FROM transactions WHERE paid_at IS NULL ORDER BY transaction_id"
        );
        assert!(stmt.args.is_empty());
    }

    #[test]
    fn test_filter_in_appends_subquery_args() {
        let linked = SelectBuilder::new(Table::ClientAgent)
            .columns(&["client_id"])
            .filter("agent_id", 3_i64)
            .build()
            .unwrap();
        let stmt = SelectBuilder::new(Table::Client)
            .filter_in("client_id", linked)
            .build()
            .unwrap();
        assert!(stmt.sql.contains(
            "WHERE client_id IN (SELECT client_id FROM client_agents WHERE agent_id = ? ORDER BY client_id)"
        ));
        assert_eq!(stmt.args, vec![Value::Integer(3)]);
    }

    #[test]
    fn test_unknown_column_produces_no_statement() {
        let result = SelectBuilder::new(Table::Agent)
            .filter("agent_id", 1_i64)
            .filter("1=1 OR agent_id", 1_i64)
            .build();
        assert!(matches!(
            result,
            Err(DomainError::InvalidColumn { table: "agents", .. })
        ));

        let record = Record::new().with("agent_id", 1_i64).with("bogus", "x");
        assert!(matches!(
            build(StatementKind::Insert, Table::Property, &record),
            Err(DomainError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_insert_lists_columns_and_values_in_order() {
        let record = Record::new()
            .with("agent_id", 2_i64)
            .with("amount", Decimal::new(150_000, 2))
            .with("transaction_type", "SALE");
        let stmt = build(StatementKind::Insert, Table::Transaction, &record).unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO transactions (agent_id, amount, transaction_type) VALUES (?, ?, ?)"
        );
        assert_eq!(stmt.args.len(), 3);
        assert_eq!(stmt.args[1], Value::Decimal(Decimal::new(150_000, 2)));
    }

    #[test]
    fn test_insert_rejects_generated_key() {
        let result = InsertBuilder::new(Table::Agent)
            .value("agent_id", 5_i64)
            .build();
        assert!(matches!(result, Err(DomainError::InvalidColumn { .. })));
    }

    #[test]
    fn test_insert_or_ignore_and_default_values() {
        let stmt = InsertBuilder::new(Table::ClientAgent)
            .or_ignore()
            .value("client_id", 1_i64)
            .value("agent_id", 2_i64)
            .build()
            .unwrap();
        assert!(stmt.sql.starts_with("INSERT OR IGNORE INTO client_agents"));

        let empty = InsertBuilder::new(Table::Office).build().unwrap();
        assert_eq!(empty.sql, "INSERT INTO offices DEFAULT VALUES");
    }

    #[test]
    fn test_value_of_wrong_kind_is_type_mismatch() {
        let result = SelectBuilder::new(Table::Property)
            .filter("agent_id", "seven")
            .build();
        match result {
            Err(DomainError::TypeMismatch { column, expected, found }) => {
                assert_eq!(column, "agent_id");
                assert_eq!(expected, "integer");
                assert_eq!(found, "text");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_update_requires_set_and_filter() {
        assert!(UpdateBuilder::new(Table::Transaction)
            .filter("transaction_id", 1_i64)
            .build()
            .is_err());
        assert!(UpdateBuilder::new(Table::Transaction)
            .set("transaction_type", "SALE")
            .build()
            .is_err());

        let stmt = UpdateBuilder::new(Table::Transaction)
            .filter("transaction_id", 9_i64)
            .set("transaction_type", "RENTAL")
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE transactions SET transaction_type = ? WHERE transaction_id = ?"
        );
        assert_eq!(
            stmt.args,
            vec![Value::Text("RENTAL".into()), Value::Integer(9)]
        );
    }

    #[test]
    fn test_values_never_reach_statement_text() {
        let hostile = "O'Brien'); DROP TABLE agents; --";
        let stmt = InsertBuilder::new(Table::Client)
            .value("last_name", hostile)
            .build()
            .unwrap();
        assert!(!stmt.sql.contains("O'Brien"));
        assert!(!stmt.sql.contains("DROP"));
        assert_eq!(stmt.args, vec![Value::Text(hostile.to_string())]);
    }
}
