//! Protocol traits for the fetch engine and result parser.
//!
//! These traits are the seams between the search session and the
//! components that talk to the network or understand result markup.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::config::{AddressFamily, SessionConfig};
use crate::models::KeywordMatch;
use crate::query::Vertical;

/// Transport settings handed to the engine when connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// HTTPS proxy.
    pub proxy: Option<String>,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// Address family preference.
    pub address_family: AddressFamily,
    /// Disables TCP and TLS tweaks.
    pub disable_tweaks: bool,
}

impl ConnectOptions {
    /// Takes the transport settings from a session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            proxy: config.proxy.clone(),
            timeout: config.timeout(),
            address_family: config.address_family,
            disable_tweaks: config.disable_tweaks,
        }
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

/// Failure reported by a fetch engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Could not reach the host.
    #[error("failed to connect to {host}: {reason}")]
    Connect {
        /// Target host.
        host: String,
        /// Underlying reason.
        reason: String,
    },

    /// The request timed out.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The proxy was rejected or unreachable.
    #[error("proxy error: {0}")]
    Proxy(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status {
        /// Status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The body could not be read or decoded.
    #[error("invalid response body: {0}")]
    Body(String),
}

impl EngineError {
    /// Whether the failure belongs to the transport or HTTP layer.
    ///
    /// Only an unreadable body falls outside it.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::Timeout(_) | Self::Proxy(_) | Self::Status { .. }
        )
    }
}

/// Establishes connections to a host.
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// Opens a connection to `host`.
    async fn connect(
        &self,
        host: &str,
        options: &ConnectOptions,
    ) -> Result<Box<dyn EngineConnection>, EngineError>;
}

/// One live connection owned by the connection manager.
#[async_trait]
pub trait EngineConnection: Send {
    /// Host this connection targets.
    fn host(&self) -> &str;

    /// Fetches `path` (path and query) and returns the decoded body.
    async fn fetch(&mut self, path: &str) -> Result<String, EngineError>;

    /// Re-establishes the connection, optionally to a different host.
    async fn reconnect(&mut self, host: Option<&str>) -> Result<(), EngineError>;

    /// Releases the connection.
    fn close(&mut self);
}

/// Sitelink as reported by a parser; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSitelink {
    /// Title.
    pub title: Option<String>,
    /// URL.
    pub url: Option<String>,
    /// Abstract.
    pub abstract_text: Option<String>,
}

/// Result entry as reported by a parser; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Title.
    pub title: Option<String>,
    /// URL.
    pub url: Option<String>,
    /// Abstract.
    pub abstract_text: Option<String>,
    /// Metadata.
    pub metadata: Option<String>,
    /// Sitelinks.
    pub sitelinks: Option<Vec<ParsedSitelink>>,
    /// Keyword matches.
    pub matches: Option<Vec<KeywordMatch>>,
}

impl ParsedEntry {
    /// Entry with the three core fields set.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            abstract_text: Some(abstract_text.into()),
            ..Self::default()
        }
    }
}

/// Everything a parser extracts from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Entries in page order.
    pub entries: Vec<ParsedEntry>,
    /// Whether the upstream rewrote the query.
    pub autocorrected: bool,
    /// The rewritten query.
    pub showing_results_for: Option<String>,
    /// Whether similar results were omitted.
    pub filtered: bool,
}

impl ParsedPage {
    /// Page holding `entries` and no flags.
    #[must_use]
    pub fn with_entries(entries: Vec<ParsedEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }
}

/// Turns raw result markup into entries.
#[cfg_attr(test, mockall::automock)]
pub trait ResultParser: Send + Sync {
    /// Parses `html` fetched for `vertical`.
    fn parse(&self, html: &str, vertical: Vertical) -> anyhow::Result<ParsedPage>;
}
