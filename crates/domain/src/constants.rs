//! Worker constants
//!
//! Centralized location for wire-level names and defaults shared by the
//! worker crates.

// API revision roots
pub const REVISION_V1_ROOT: &str = "/api/v1";
pub const REVISION_V2_ROOT: &str = "/api/v2";

// Revision 2 authentication headers
pub const HEADER_V2_NONCE: &str = "bfx-nonce";
pub const HEADER_V2_APIKEY: &str = "bfx-apikey";
pub const HEADER_V2_SIGNATURE: &str = "bfx-signature";

// Revision 1 authentication headers
pub const HEADER_V1_PAYLOAD: &str = "x-bfx-payload";
pub const HEADER_V1_APIKEY: &str = "x-bfx-apikey";
pub const HEADER_V1_SIGNATURE: &str = "x-bfx-signature";

// Pagination
pub const HEADER_PAGINATION_LIMIT: &str = "pagination-limit";
pub const HEADER_PAGINATION_COUNT: &str = "pagination-count";
pub const PARAM_OFFSET: &str = "offset";
pub const PARAM_LIMIT: &str = "limit";

// Defaults
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PAGINATION_BACKOFF_MS: u64 = 250;
pub const DEFAULT_MAX_PAGES: usize = 10_000;
pub const DEFAULT_BIND: &str = "127.0.0.1:1337";
pub const DEFAULT_SERVICE_PREFIX: &str = "rest:ext:helpdesk";
pub const DEFAULT_USER_AGENT: &str = concat!("helpdesk-worker/", env!("CARGO_PKG_VERSION"));

// Messages
pub const WORKER_UNAVAILABLE: &str = "Worker unavailable";
