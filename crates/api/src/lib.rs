//! # Helpdesk Worker
//!
//! Process layer: wires configuration, the tenant registry and the request
//! handler together, and exposes them to callers.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Inbound JSON-over-HTTP adapter
//! - Operator signal handling and graceful shutdown
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - The only crate that owns a runtime and a listening socket

pub mod context;
pub mod lifecycle;
pub mod transport;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use transport::{router, RpcRequest, RpcResponse};
