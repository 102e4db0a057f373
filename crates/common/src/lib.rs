//! Common utilities shared across helpdesk worker crates.
//!
//! # Modules
//! - `validation`: declarative field validation with value coercion, used
//!   for inbound request parameters

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod validation;
