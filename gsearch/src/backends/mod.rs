//! Concrete fetch engine and result parser.
//!
//! This module provides:
//! - An HTTPS fetch engine with proxy, timeout and address family support
//! - An HTML result parser driven by configurable CSS selectors

mod html;
mod http;

pub use html::{HtmlResultParser, ResultSelectors, SelectorError};
pub use http::{HttpFetchEngine, DEFAULT_USER_AGENT};
