//! # gsearch
//!
//! A session-oriented Google search client.
//!
//! gsearch sits in front of two pluggable collaborators, a fetch engine that
//! retrieves raw result pages and a result parser that turns them into
//! entries, and provides:
//!
//! - **Query resolution**: independent search options become one request URL
//!   on the right country host
//! - **Connection management**: one connection per session, reconnected in
//!   place when the target host changes
//! - **Pagination**: a page cursor with forward and backward movement
//! - **A single error taxonomy**: connection, search, parse and rate-limit
//!   failures, with the lower-layer cause preserved
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gsearch::prelude::*;
//!
//! let mut session = SearchSession::with_defaults(SessionConfig::new().with_tld("co.uk"))?;
//! let response = session.search("rust async", &SearchOptions::new().with_num(5)).await?;
//! for result in &response {
//!     println!("{} - {}", result.title(), result.url());
//! }
//! let more = session.next_page().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod observability;
pub mod query;
pub mod session;
pub mod testing;

#[cfg(feature = "backends")]
pub mod backends;

pub use config::SessionConfig;
pub use errors::{Result, SessionError};
pub use models::{SearchResponse, SearchResult};
pub use query::SearchOptions;
#[cfg(feature = "backends")]
pub use session::{search, search_news, search_videos};
pub use session::{search_news_with, search_videos_with, search_with, SearchSession};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AddressFamily, SessionConfig};
    pub use crate::engine::{
        ConnectOptions, EngineConnection, EngineError, FetchEngine, ParsedEntry, ParsedPage,
        ParsedSitelink, ResultParser,
    };
    pub use crate::errors::{
        ConnectionError, ErrorKind, ParseError, RateLimitError, SearchError, SessionError,
    };
    pub use crate::models::{KeywordMatch, SearchResponse, SearchResult, SitelinkResult};
    pub use crate::query::{Keywords, QuerySpec, SearchOptions, SearchUrl, Vertical};
    pub use crate::session::SearchSession;

    #[cfg(feature = "backends")]
    pub use crate::backends::{HtmlResultParser, HttpFetchEngine};
}
