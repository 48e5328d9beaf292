//! Application services over the repository ports.

pub mod agent_service;
pub mod client_service;
pub mod retry;

pub use agent_service::AgentService;
pub use client_service::ClientService;
pub use retry::RetryPolicy;
