//! # Helpdesk Core
//!
//! Request pipeline logic - no HTTP or configuration code.
//!
//! This crate contains:
//! - The per-tenant FIFO scheduler
//! - List parameter schemas
//! - Port interfaces (traits) implemented by infrastructure
//! - The request handler service
//!
//! ## Architecture Principles
//! - Only depends on `helpdesk-common` and `helpdesk-domain`
//! - All external capabilities via traits
//! - Pure, testable business logic

pub mod ports;
pub mod scheduler;
pub mod schema;
pub mod service;

pub use ports::{ListSource, RequestHandler, TenantDirectory, TenantLane};
pub use scheduler::{DrainHandle, TenantScheduler, Ticket};
pub use schema::{list_schema, validate_list_params};
pub use service::HelpdeskService;
