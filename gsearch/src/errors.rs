//! Error types for gsearch.
//!
//! Every failure a caller can observe is one of four kinds, all carried by
//! [`SessionError`]. Failures coming from the fetch engine or the result
//! parser are kept as the wrapped cause and are reachable through
//! [`std::error::Error::source`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Boxed cause stored inside the error kinds.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SessionError>;

/// The root error type for search session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The network or connection layer failed.
    #[error("{0}")]
    Connection(#[from] ConnectionError),

    /// The request/response cycle failed for a reason other than the connection.
    #[error("{0}")]
    Search(#[from] SearchError),

    /// The result parser failed on the fetched content.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The upstream rate-limited or challenged the request.
    #[error("{0}")]
    RateLimit(#[from] RateLimitError),
}

/// Discriminant of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// See [`ConnectionError`].
    Connection,
    /// See [`SearchError`].
    Search,
    /// See [`ParseError`].
    Parse,
    /// See [`RateLimitError`].
    RateLimit,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connection => "ConnectionError",
            Self::Search => "SearchError",
            Self::Parse => "ParseError",
            Self::RateLimit => "RateLimitError",
        };
        f.write_str(name)
    }
}

impl SessionError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) => ErrorKind::Connection,
            Self::Search(_) => ErrorKind::Search,
            Self::Parse(_) => ErrorKind::Parse,
            Self::RateLimit(_) => ErrorKind::RateLimit,
        }
    }

    /// Returns the message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(e) => &e.message,
            Self::Search(e) => &e.message,
            Self::Parse(e) => &e.message,
            Self::RateLimit(e) => &e.message,
        }
    }

    /// Whether this is a connection failure.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Whether this is a search failure.
    #[must_use]
    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }

    /// Whether this is a parse failure.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind().to_string()));
        map.insert("message".to_string(), serde_json::json!(self.message()));
        if let Some(cause) = std::error::Error::source(self).and_then(std::error::Error::source) {
            map.insert("cause".to_string(), serde_json::json!(cause.to_string()));
        }
        map
    }
}

/// The underlying network/connection layer failed (DNS, TCP/TLS, proxy, timeout).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConnectionError {
    /// The error message.
    pub message: String,
    #[source]
    cause: Option<BoxError>,
}

impl ConnectionError {
    /// Creates a new connection error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Attaches the lower-layer failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// The request/response cycle failed, or a pagination/option request was invalid.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SearchError {
    /// The error message.
    pub message: String,
    #[source]
    cause: Option<BoxError>,
}

impl SearchError {
    /// Creates a new search error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Attaches the lower-layer failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Pagination was requested before any search ran.
    #[must_use]
    pub fn no_previous_search() -> Self {
        Self::new("No previous search to paginate from. Call search() first.")
    }

    /// Retreat was requested on the first page.
    #[must_use]
    pub fn at_first_page() -> Self {
        Self::new("Already at the first page.")
    }
}

/// The result parser rejected or failed on the fetched content.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    #[source]
    cause: Option<BoxError>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Attaches the lower-layer failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Rate limiting or a challenge page was detected.
///
/// Nothing in the session raises this today; it is part of the public
/// taxonomy so engines and callers can agree on it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RateLimitError {
    /// The error message.
    pub message: String,
    #[source]
    cause: Option<BoxError>,
}

impl RateLimitError {
    /// Creates a new rate limit error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Attaches the lower-layer failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}
