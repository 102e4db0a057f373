//! Helpdesk API client
//!
//! Signs every request for the tenant's API revision, walks paginated
//! listings to completion and sanitizes response bodies.
//!
//! # Architecture
//!
//! - `auth`: pure signer plus the request hook that applies it
//! - `client`: one bound client per tenant, one page per call
//! - `paging`: fetch-all over a [`PageSource`]
//! - No retries: a failed page fails the whole fetch-all

pub mod auth;
pub mod client;
pub mod errors;
pub mod json;
pub mod paging;

pub use auth::{sign, NonceSource, Signature, SigningHook};
pub use client::{HelpdeskClient, Page};
pub use errors::{ApiError, ApiErrorCategory};
pub use paging::{next_cursor, PageSource, PagingClient, PagingConfig};
