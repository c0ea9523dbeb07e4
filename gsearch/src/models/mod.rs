//! Result model types.
//!
//! This module provides:
//! - Immutable result values with sitelinks and keyword matches
//! - The per-request aggregate response

mod response;
mod result;

pub use response::SearchResponse;
pub use result::{KeywordMatch, SearchResult, SitelinkResult};
