//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that storage adapters implement:
//! - AgentRepository: agent-facing reads and writes
//! - ClientRepository: client-facing reads and writes
//!
//! No statement text or storage detail crosses these traits.

pub mod agent_repository;
pub mod client_repository;

pub use agent_repository::AgentRepository;
pub use client_repository::{ClientRepository, PropertyFilter};
