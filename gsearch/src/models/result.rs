//! Single search result value types.

use serde::{Deserialize, Serialize};

use crate::engine::{ParsedEntry, ParsedSitelink};

/// A secondary link nested under a primary result.
///
/// Field order is alphabetical so the JSON encoding has sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SitelinkResult {
    #[serde(rename = "abstract")]
    abstract_text: String,
    title: String,
    url: String,
}

impl SitelinkResult {
    /// Creates a new sitelink.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            abstract_text: abstract_text.into(),
            title: title.into(),
            url: url.into(),
        }
    }

    /// The sitelink title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The sitelink URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The sitelink abstract.
    #[must_use]
    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }
}

impl From<ParsedSitelink> for SitelinkResult {
    fn from(link: ParsedSitelink) -> Self {
        Self::new(
            link.title.unwrap_or_default(),
            link.url.unwrap_or_default(),
            link.abstract_text.unwrap_or_default(),
        )
    }
}

/// A keyword match inside a result abstract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Character offset of the phrase in the abstract.
    pub offset: usize,
    /// The matched phrase.
    pub phrase: String,
}

impl KeywordMatch {
    /// Creates a new keyword match.
    #[must_use]
    pub fn new(phrase: impl Into<String>, offset: usize) -> Self {
        Self {
            offset,
            phrase: phrase.into(),
        }
    }
}

/// A single search result.
///
/// Values are immutable once built: fields are read through accessors and
/// the `with_*` methods consume `self` and return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "abstract")]
    abstract_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    matches: Vec<KeywordMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sitelinks: Vec<SitelinkResult>,
    title: String,
    url: String,
}

impl SearchResult {
    /// Creates a result with no optional fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            abstract_text: abstract_text.into(),
            matches: Vec::new(),
            metadata: None,
            sitelinks: Vec::new(),
            title: title.into(),
            url: url.into(),
        }
    }

    /// Sets the metadata. Empty text is stored as absent.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        let metadata = metadata.into();
        self.metadata = (!metadata.is_empty()).then_some(metadata);
        self
    }

    /// Sets the sitelinks.
    #[must_use]
    pub fn with_sitelinks(mut self, sitelinks: Vec<SitelinkResult>) -> Self {
        self.sitelinks = sitelinks;
        self
    }

    /// Sets the keyword matches.
    #[must_use]
    pub fn with_matches(mut self, matches: Vec<KeywordMatch>) -> Self {
        self.matches = matches;
        self
    }

    /// Builds a result from parser output, filling absent fields with defaults.
    #[must_use]
    pub fn from_parsed(entry: ParsedEntry) -> Self {
        let result = Self::new(
            entry.title.unwrap_or_default(),
            entry.url.unwrap_or_default(),
            entry.abstract_text.unwrap_or_default(),
        )
        .with_sitelinks(
            entry
                .sitelinks
                .unwrap_or_default()
                .into_iter()
                .map(SitelinkResult::from)
                .collect(),
        )
        .with_matches(entry.matches.unwrap_or_default());

        match entry.metadata {
            Some(metadata) => result.with_metadata(metadata),
            None => result,
        }
    }

    /// The result title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The result URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The result snippet.
    #[must_use]
    pub fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    /// Extra metadata, e.g. publisher and time for news results.
    #[must_use]
    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    /// Sub-links of this result.
    #[must_use]
    pub fn sitelinks(&self) -> &[SitelinkResult] {
        &self.sitelinks
    }

    /// Keyword matches in the abstract.
    #[must_use]
    pub fn matches(&self) -> &[KeywordMatch] {
        &self.matches
    }

    /// Host of the result URL with its port when one is given, empty when
    /// the URL does not parse.
    #[must_use]
    pub fn domain(&self) -> String {
        let Ok(url) = url::Url::parse(&self.url) else {
            return String::new();
        };
        match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        }
    }

    /// JSON object for this result; optional keys only when non-empty.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
