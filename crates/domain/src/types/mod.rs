//! Domain types and models

pub mod listing;
pub mod tenant;

// Re-export for convenience
pub use listing::{ListEndpoint, SearchParams};
pub use tenant::{Credentials, Revision};
