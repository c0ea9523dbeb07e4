//! Query resolution and search URL construction.
//!
//! This module provides:
//! - Per-call search options and keyword handling
//! - Resolution of options and session configuration into a query spec
//! - Host-qualified URLs with page advance and retreat

mod error;
mod options;
mod search_url;
mod spec;

pub use error::QueryError;
pub use options::{Keywords, SearchOptions, Vertical};
pub use search_url::{SearchUrl, SEARCH_PATH};
pub use spec::QuerySpec;
