//! Resolved request parameters.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use super::error::QueryError;
use super::options::{Keywords, SearchOptions, Vertical};
use crate::config::{host_for_tld, SessionConfig};

#[allow(clippy::expect_used)]
static DURATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[hdwmy]\d*$").expect("duration pattern compiles"));

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Request parameters after merging session configuration and call options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Ordered keyword tokens.
    pub keywords: Vec<String>,
    /// Results per page.
    pub num: usize,
    /// Result offset.
    pub start: usize,
    /// Display language.
    pub language: Option<String>,
    /// Geolocation country code.
    pub geolocation: Option<String>,
    /// Country TLD.
    pub tld: Option<String>,
    /// Disable spelling correction.
    pub exact: bool,
    /// Time limit token.
    pub duration: Option<String>,
    /// Date range start.
    pub date_from: Option<String>,
    /// Date range end.
    pub date_to: Option<String>,
    /// Domains to search within.
    pub sites: Vec<String>,
    /// Domains to exclude.
    pub exclude: Vec<String>,
    /// Show filtered similar results.
    pub unfilter: bool,
    /// Target vertical.
    pub vertical: Vertical,
}

impl QuerySpec {
    /// Merges keywords, session configuration and call options.
    ///
    /// The per-call TLD wins over the configured one. Malformed duration or
    /// date options are rejected.
    pub fn resolve(
        keywords: impl Into<Keywords>,
        config: &SessionConfig,
        options: &SearchOptions,
    ) -> Result<Self, QueryError> {
        if options.news && options.videos {
            warn!(
                chosen = %Vertical::News,
                "both news and videos requested, using news"
            );
        }

        let duration = non_empty(options.duration.as_deref());
        if let Some(duration) = duration.as_deref() {
            validate_duration(duration)?;
        }
        let date_from = non_empty(options.date_from.as_deref());
        if let Some(date) = date_from.as_deref() {
            validate_date("date_from", date)?;
        }
        let date_to = non_empty(options.date_to.as_deref());
        if let Some(date) = date_to.as_deref() {
            validate_date("date_to", date)?;
        }

        Ok(Self {
            keywords: keywords.into().into_tokens(),
            num: options.num,
            start: options.start,
            language: config.language.clone(),
            geolocation: config.geolocation.clone(),
            tld: options.tld.clone().or_else(|| config.tld.clone()),
            exact: options.exact,
            duration,
            date_from,
            date_to,
            sites: options.sites.clone(),
            exclude: options.exclude.clone(),
            unfilter: options.unfilter,
            vertical: options.vertical(),
        })
    }

    /// Host the request goes to.
    #[must_use]
    pub fn host(&self) -> String {
        host_for_tld(self.tld.as_deref())
    }

    /// Zero-based page index, `start / num`, or 0 when `num` is 0.
    #[must_use]
    pub fn page(&self) -> usize {
        if self.num > 0 {
            self.start / self.num
        } else {
            0
        }
    }

    /// Keywords joined by spaces.
    #[must_use]
    pub fn query_text(&self) -> String {
        self.keywords.join(" ")
    }

    /// Whether a date range bound is set.
    #[must_use]
    pub fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

fn validate_duration(duration: &str) -> Result<(), QueryError> {
    if DURATION_PATTERN.is_match(duration) {
        Ok(())
    } else {
        Err(QueryError::invalid(
            "duration",
            duration,
            "expected h, d, w, m or y followed by an optional count",
        ))
    }
}

fn validate_date(option: &'static str, date: &str) -> Result<(), QueryError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| QueryError::invalid(option, date, "expected a MM/DD/YYYY date"))
}
