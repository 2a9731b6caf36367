pub mod claims;
pub mod error;
pub mod settings;
pub mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of rows returned by a single list or search request.
pub const FETCH_LIMIT_MAX: i64 = 50;
pub const FETCH_LIMIT_DEFAULT: i64 = 20;
