//! Aggregate response of one fetch cycle.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::result::SearchResult;

/// Results of one search request together with the request context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Normalized results, in parser order.
    pub results: Vec<SearchResult>,
    /// The keyword string used.
    pub query: String,
    /// Full URL that was fetched.
    pub url: String,
    /// Whether the upstream rewrote the query.
    pub autocorrected: bool,
    /// Corrected query, present only when autocorrected.
    pub showing_results_for: Option<String>,
    /// Whether the upstream omitted similar results.
    pub filtered: bool,
    /// Zero-based page index.
    pub page: usize,
}

impl SearchResponse {
    /// Creates a response with no flags set.
    #[must_use]
    pub fn new(
        results: Vec<SearchResult>,
        query: impl Into<String>,
        url: impl Into<String>,
        page: usize,
    ) -> Self {
        Self {
            results,
            query: query.into(),
            url: url.into(),
            page,
            ..Self::default()
        }
    }

    /// Marks the response as autocorrected to `corrected`.
    #[must_use]
    pub fn with_autocorrect(mut self, corrected: impl Into<String>) -> Self {
        self.autocorrected = true;
        self.showing_results_for = Some(corrected.into());
        self
    }

    /// Sets the filtered flag.
    #[must_use]
    pub fn with_filtered(mut self, filtered: bool) -> Self {
        self.filtered = filtered;
        self
    }

    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether there are no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether there is at least one result.
    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.is_empty()
    }

    /// Result at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    /// Iterates the results in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }

    /// Consumes the response and returns the results.
    #[must_use]
    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }

    /// Serializes the results as a pretty-printed JSON array with sorted keys.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.results)
    }
}

impl Index<usize> for SearchResponse {
    type Output = SearchResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.results[index]
    }
}

impl IntoIterator for SearchResponse {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchResponse {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
