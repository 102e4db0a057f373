//! # Helpdesk Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Request signing for both API revisions
//! - The HTTP client and the per-tenant bound client
//! - The paginating fetch-all client
//! - The tenant registry built from configuration
//! - Configuration file loading
//!
//! ## Architecture
//! - Implements traits defined in `helpdesk-core`
//! - Contains all "impure" code (network, filesystem, clock)

pub mod api;
pub mod config;
pub mod http;
pub mod registry;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorCategory, HelpdeskClient, PagingClient};
pub use http::{HttpClient, RequestHook};
pub use registry::{TenantRegistry, TenantStatus};
