//! Host-qualified search URL with page movement.

use std::fmt;
use url::form_urlencoded;

use super::error::QueryError;
use super::options::Vertical;
use super::spec::QuerySpec;

/// Path of the search endpoint.
pub const SEARCH_PATH: &str = "/search";

/// A request URL derived from a [`QuerySpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUrl {
    spec: QuerySpec,
    host: String,
}

impl SearchUrl {
    /// Builds the URL for a resolved spec.
    #[must_use]
    pub fn new(spec: QuerySpec) -> Self {
        let host = spec.host();
        Self { spec, host }
    }

    /// Target host, e.g. `www.google.co.uk`.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Vertical used for parsing.
    #[must_use]
    pub fn vertical(&self) -> Vertical {
        self.spec.vertical
    }

    /// The underlying parameters.
    #[must_use]
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Current result offset.
    #[must_use]
    pub fn start(&self) -> usize {
        self.spec.start
    }

    /// Zero-based page index.
    #[must_use]
    pub fn page(&self) -> usize {
        self.spec.page()
    }

    /// Keywords joined by spaces.
    #[must_use]
    pub fn query_text(&self) -> String {
        self.spec.query_text()
    }

    /// Moves one page forward. The offset is unchanged on overflow.
    pub fn next_page(&mut self) -> Result<(), QueryError> {
        self.spec.start = self
            .spec
            .start
            .checked_add(self.spec.num)
            .ok_or(QueryError::OffsetOverflow {
                start: self.spec.start,
                num: self.spec.num,
            })?;
        Ok(())
    }

    /// Moves one page back, never below offset 0.
    pub fn prev_page(&mut self) -> Result<(), QueryError> {
        if self.spec.start == 0 {
            return Err(QueryError::PageOutOfRange);
        }
        self.spec.start = self.spec.start.saturating_sub(self.spec.num);
        Ok(())
    }

    /// Query parameters in emission order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let spec = &self.spec;
        let mut pairs = vec![("q", self.q())];

        if spec.start > 0 {
            pairs.push(("start", spec.start.to_string()));
        }
        pairs.push(("num", spec.num.to_string()));
        if let Some(language) = &spec.language {
            pairs.push(("hl", language.clone()));
        }
        if let Some(geolocation) = &spec.geolocation {
            pairs.push(("gl", geolocation.clone()));
        }
        if spec.exact {
            pairs.push(("nfpr", "1".to_string()));
        }
        if spec.has_date_range() {
            pairs.push((
                "tbs",
                format!(
                    "cdr:1,cd_min:{},cd_max:{}",
                    spec.date_from.as_deref().unwrap_or_default(),
                    spec.date_to.as_deref().unwrap_or_default()
                ),
            ));
        } else if let Some(duration) = &spec.duration {
            pairs.push(("tbs", format!("qdr:{duration}")));
        }
        if spec.unfilter {
            pairs.push(("filter", "0".to_string()));
        }
        if let Some(tbm) = spec.vertical.tbm() {
            pairs.push(("tbm", tbm.to_string()));
        }
        pairs
    }

    /// Path and query, e.g. `/search?q=rust&num=10`.
    #[must_use]
    pub fn relative(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish();
        format!("{SEARCH_PATH}?{query}")
    }

    /// Absolute `https` URL.
    #[must_use]
    pub fn full(&self) -> String {
        format!("https://{}{}", self.host, self.relative())
    }

    fn q(&self) -> String {
        let mut q = self.spec.query_text();
        if !self.spec.sites.is_empty() {
            q.push_str(" site:");
            q.push_str(&self.spec.sites.join(" OR site:"));
        }
        for site in &self.spec.exclude {
            q.push_str(" -site:");
            q.push_str(site);
        }
        q
    }
}

impl fmt::Display for SearchUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::query::SearchOptions;
    use pretty_assertions::assert_eq;

    fn url_for(keywords: &str, config: &SessionConfig, options: &SearchOptions) -> SearchUrl {
        SearchUrl::new(QuerySpec::resolve(keywords, config, options).unwrap())
    }

    fn param_names(url: &SearchUrl) -> Vec<&'static str> {
        url.query_pairs().into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_minimal_url() {
        let url = url_for("rust lang", &SessionConfig::default(), &SearchOptions::default());
        assert_eq!(url.relative(), "/search?q=rust+lang&num=10");
        assert_eq!(url.full(), "https://www.google.com/search?q=rust+lang&num=10");
        assert_eq!(url.to_string(), url.full());
    }

    #[test]
    fn test_omitted_options_emit_nothing() {
        let url = url_for("rust", &SessionConfig::default(), &SearchOptions::default());
        assert_eq!(param_names(&url), vec!["q", "num"]);
    }

    #[test]
    fn test_all_params_in_order() {
        let config = SessionConfig::new().with_language("en").with_geolocation("us");
        let options = SearchOptions::new()
            .with_start(20)
            .exact()
            .with_duration("w2")
            .unfiltered()
            .videos();
        let url = url_for("cats", &config, &options);
        assert_eq!(
            param_names(&url),
            vec!["q", "start", "num", "hl", "gl", "nfpr", "tbs", "filter", "tbm"]
        );
        assert_eq!(
            url.relative(),
            "/search?q=cats&start=20&num=10&hl=en&gl=us&nfpr=1&tbs=qdr%3Aw2&filter=0&tbm=vid"
        );
    }

    #[test]
    fn test_sites_and_exclusions_in_q() {
        let options = SearchOptions::new()
            .with_site("docs.rs")
            .with_site("crates.io")
            .with_exclude("reddit.com");
        let url = url_for("serde", &SessionConfig::default(), &options);
        let (_, q) = &url.query_pairs()[0];
        assert_eq!(q, "serde site:docs.rs OR site:crates.io -site:reddit.com");
    }

    #[test]
    fn test_date_range_takes_precedence() {
        let options = SearchOptions::new()
            .with_duration("d")
            .with_date_from("01/01/2024");
        let url = url_for("x", &SessionConfig::default(), &options);
        let tbs = url
            .query_pairs()
            .into_iter()
            .find(|(k, _)| *k == "tbs")
            .map(|(_, v)| v);
        assert_eq!(tbs.as_deref(), Some("cdr:1,cd_min:01/01/2024,cd_max:"));
    }

    #[test]
    fn test_news_vertical() {
        let url = url_for("x", &SessionConfig::default(), &SearchOptions::new().news());
        assert_eq!(url.vertical(), Vertical::News);
        assert!(url.relative().ends_with("&tbm=nws"));
    }

    #[test]
    fn test_country_host() {
        let url = url_for("x", &SessionConfig::new().with_tld("in"), &SearchOptions::default());
        assert_eq!(url.host(), "www.google.in");
        assert!(url.full().starts_with("https://www.google.in/search?"));
    }

    #[test]
    fn test_next_and_prev_page() {
        let mut url = url_for("x", &SessionConfig::default(), &SearchOptions::default());
        assert_eq!(url.page(), 0);

        url.next_page().unwrap();
        assert_eq!(url.start(), 10);
        assert_eq!(url.page(), 1);

        url.prev_page().unwrap();
        assert_eq!(url.start(), 0);
        assert_eq!(url.prev_page(), Err(QueryError::PageOutOfRange));
        assert_eq!(url.start(), 0);
    }

    #[test]
    fn test_next_page_overflow_keeps_offset() {
        let start = usize::MAX - 3;
        let mut url = url_for("x", &SessionConfig::default(), &SearchOptions::new().with_start(start));

        assert_eq!(
            url.next_page(),
            Err(QueryError::OffsetOverflow { start, num: 10 })
        );
        assert_eq!(url.start(), start);
    }

    #[test]
    fn test_prev_page_clamps_partial_offset() {
        let mut url = url_for("x", &SessionConfig::default(), &SearchOptions::new().with_start(5));
        url.prev_page().unwrap();
        assert_eq!(url.start(), 0);
    }
}
