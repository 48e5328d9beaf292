//! Domain layer for brokerage
//!
//! Core models, errors and the repository ports.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, FieldError};
