//! # Helpdesk Domain
//!
//! Domain types shared by every helpdesk worker crate.
//!
//! This crate contains:
//! - The worker error type and Result alias
//! - Configuration structures
//! - Revision, credential, endpoint and search-parameter types
//! - Wire-level constants (header names, defaults)
//!
//! ## Architecture
//! - No dependencies on other helpdesk crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
