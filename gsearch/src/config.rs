//! Session configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host used when no country TLD is configured.
pub const DEFAULT_HOST: &str = "www.google.com";

/// Address family preference for outgoing connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFamily {
    /// No preference.
    #[default]
    Any,
    /// Only connect over IPv4.
    Ipv4Only,
    /// Only connect over IPv6.
    Ipv6Only,
}

/// Configuration fixed at session creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Country-specific TLD, e.g. `in` or `co.uk`.
    #[serde(default)]
    pub tld: Option<String>,
    /// Display language, e.g. `en`.
    #[serde(default)]
    pub language: Option<String>,
    /// Country code for geolocation-based search.
    #[serde(default)]
    pub geolocation: Option<String>,
    /// HTTPS proxy, `host:port` or a full URL.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Connection timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Address family preference.
    #[serde(default)]
    pub address_family: AddressFamily,
    /// Disables TCP and TLS tweaks in the fetch engine.
    #[serde(default)]
    pub disable_tweaks: bool,
}

fn default_timeout() -> u64 {
    45
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tld: None,
            language: None,
            geolocation: None,
            proxy: None,
            timeout_seconds: default_timeout(),
            address_family: AddressFamily::Any,
            disable_tweaks: false,
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Sets the country TLD.
    #[must_use]
    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = Some(tld.into());
        self
    }

    /// Sets the display language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the geolocation country code.
    #[must_use]
    pub fn with_geolocation(mut self, geolocation: impl Into<String>) -> Self {
        self.geolocation = Some(geolocation.into());
        self
    }

    /// Sets the proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the address family preference.
    #[must_use]
    pub fn with_address_family(mut self, family: AddressFamily) -> Self {
        self.address_family = family;
        self
    }

    /// Disables transport tweaks.
    #[must_use]
    pub fn without_tweaks(mut self) -> Self {
        self.disable_tweaks = true;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Host derived from the configured TLD.
    #[must_use]
    pub fn host(&self) -> String {
        host_for_tld(self.tld.as_deref())
    }
}

/// Returns `www.google.<tld>`, or [`DEFAULT_HOST`] without a TLD.
#[must_use]
pub fn host_for_tld(tld: Option<&str>) -> String {
    match tld.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tld) => format!("www.google.{}", tld.trim_start_matches('.')),
        None => DEFAULT_HOST.to_string(),
    }
}
