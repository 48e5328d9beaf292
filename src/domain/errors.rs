//! Domain errors for the brokerage data-access layer.

use std::fmt;

use thiserror::Error;

/// A single problem with one caller-supplied field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Column or argument name.
    pub field: String,
    /// What is wrong with it, e.g. "is required".
    pub message: String,
}

impl FieldError {
    /// Problem `message` with `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// A required field that was absent or blank.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Format field errors as `a is required; b must be >= 0`.
fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned by every repository and service operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A column name outside the table's allow-list. Always a programming error.
    #[error("Invalid column '{column}' for table {table}")]
    InvalidColumn {
        /// Table the lookup was made against.
        table: &'static str,
        /// The rejected name, verbatim.
        column: String,
    },

    /// Bad or missing caller input, one entry per offending field.
    #[error("Validation failed: {}", format_field_errors(.0))]
    ValidationError(Vec<FieldError>),

    /// A stored value did not have the column's declared type.
    #[error("Type mismatch for column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Column holding the value.
        column: String,
        /// Declared kind of the column.
        expected: &'static str,
        /// The offending value or its type.
        found: String,
    },

    /// No row with this id.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name, e.g. `Agent`.
        entity: &'static str,
        /// Id that was looked up.
        id: i64,
    },

    /// A lookup by id matched more than one row.
    #[error("{entity} {id} matched {count} rows")]
    Ambiguous {
        /// Entity name, e.g. `Agent`.
        entity: &'static str,
        /// Id that was looked up.
        id: i64,
        /// Rows that matched.
        count: usize,
    },

    /// Transient infrastructure failure; safe to retry with backoff.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Any other storage failure; not retried.
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// A single-field `ValidationError`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError(vec![FieldError::new(field, message)])
    }

    /// Only transient storage failures may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Field errors carried by a `ValidationError`, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationError(errors) => errors,
            _ => &[],
        }
    }
}

// SQLite primary result codes that mean "try again later".
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

fn is_busy_code(code: &str) -> bool {
    code.parse::<i32>()
        .map(|extended| matches!(extended & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_) => DomainError::StorageUnavailable(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| is_busy_code(&c)) => {
                DomainError::StorageUnavailable(err.to_string())
            }
            _ => DomainError::StorageError(err.to_string()),
        }
    }
}
