//! Per-call search options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The search vertical a request targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    /// Regular web results.
    #[default]
    Web,
    /// News results.
    News,
    /// Video results.
    Videos,
}

impl Vertical {
    /// Value of the `tbm` URL parameter, if the vertical needs one.
    #[must_use]
    pub fn tbm(self) -> Option<&'static str> {
        match self {
            Self::Web => None,
            Self::News => Some("nws"),
            Self::Videos => Some("vid"),
        }
    }

    /// Picks the vertical from the option flags. News wins over videos.
    #[must_use]
    pub fn from_flags(news: bool, videos: bool) -> Self {
        if news {
            Self::News
        } else if videos {
            Self::Videos
        } else {
            Self::Web
        }
    }
}

impl fmt::Display for Vertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Web => "web",
            Self::News => "news",
            Self::Videos => "videos",
        };
        f.write_str(name)
    }
}

/// Search keywords as ordered tokens.
///
/// Text input is split on whitespace; token lists are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Keywords(Vec<String>);

impl Keywords {
    /// The tokens.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Tokens joined by single spaces.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }

    /// Consumes the keywords and returns the tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Keywords {
    fn from(text: &str) -> Self {
        Self(text.split_whitespace().map(String::from).collect())
    }
}

impl From<String> for Keywords {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<&String> for Keywords {
    fn from(text: &String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<Vec<String>> for Keywords {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl From<Vec<&str>> for Keywords {
    fn from(tokens: Vec<&str>) -> Self {
        Self(tokens.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Keywords {
    fn from(tokens: &[&str]) -> Self {
        Self(tokens.iter().map(|t| (*t).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keywords {
    fn from(tokens: [&str; N]) -> Self {
        Self::from(&tokens[..])
    }
}

/// Options for a single search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Number of results per page.
    #[serde(default = "default_num")]
    pub num: usize,
    /// Result offset.
    #[serde(default)]
    pub start: usize,
    /// Disable automatic spelling correction.
    #[serde(default)]
    pub exact: bool,
    /// Time limit such as `h5`, `d5`, `w5`, `m5` or `y5`.
    #[serde(default)]
    pub duration: Option<String>,
    /// Start of a date range, `MM/DD/YYYY`.
    #[serde(default)]
    pub date_from: Option<String>,
    /// End of a date range, `MM/DD/YYYY`.
    #[serde(default)]
    pub date_to: Option<String>,
    /// Restrict results to these domains.
    #[serde(default)]
    pub sites: Vec<String>,
    /// Exclude these domains.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Show results that would otherwise be filtered as similar.
    #[serde(default)]
    pub unfilter: bool,
    /// Search the news vertical.
    #[serde(default)]
    pub news: bool,
    /// Search the videos vertical.
    #[serde(default)]
    pub videos: bool,
    /// Overrides the session's country TLD for this call.
    #[serde(default)]
    pub tld: Option<String>,
}

fn default_num() -> usize {
    10
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num: default_num(),
            start: 0,
            exact: false,
            duration: None,
            date_from: None,
            date_to: None,
            sites: Vec::new(),
            exclude: Vec::new(),
            unfilter: false,
            news: false,
            videos: false,
            tld: None,
        }
    }
}

impl SearchOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of results per page.
    #[must_use]
    pub fn with_num(mut self, num: usize) -> Self {
        self.num = num;
        self
    }

    /// Sets the result offset.
    #[must_use]
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Disables spelling correction.
    #[must_use]
    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Sets the time limit.
    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Sets the start of the date range.
    #[must_use]
    pub fn with_date_from(mut self, date: impl Into<String>) -> Self {
        self.date_from = Some(date.into());
        self
    }

    /// Sets the end of the date range.
    #[must_use]
    pub fn with_date_to(mut self, date: impl Into<String>) -> Self {
        self.date_to = Some(date.into());
        self
    }

    /// Adds a domain to search within.
    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.sites.push(site.into());
        self
    }

    /// Adds a domain to exclude.
    #[must_use]
    pub fn with_exclude(mut self, site: impl Into<String>) -> Self {
        self.exclude.push(site.into());
        self
    }

    /// Shows similar results that are filtered by default.
    #[must_use]
    pub fn unfiltered(mut self) -> Self {
        self.unfilter = true;
        self
    }

    /// Targets the news vertical.
    #[must_use]
    pub fn news(mut self) -> Self {
        self.news = true;
        self
    }

    /// Targets the videos vertical.
    #[must_use]
    pub fn videos(mut self) -> Self {
        self.videos = true;
        self
    }

    /// Overrides the country TLD for this call.
    #[must_use]
    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = Some(tld.into());
        self
    }

    /// Vertical selected by the flags.
    #[must_use]
    pub fn vertical(&self) -> Vertical {
        Vertical::from_flags(self.news, self.videos)
    }
}
