//! The search session.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::engine::{ConnectOptions, ConnectionManager, FetchEngine, FetchError, ResultParser};
use crate::errors::{ParseError, Result, SearchError, SessionError};
use crate::models::{SearchResponse, SearchResult};
use crate::observability::SpanTimer;
use crate::query::{Keywords, QuerySpec, SearchOptions, SearchUrl};

/// A stateful search client holding one connection and a page cursor.
///
/// Operations run one at a time through `&mut self`. The connection is
/// opened on first use and released by [`close`](Self::close) or on drop.
pub struct SearchSession {
    config: SessionConfig,
    connection: ConnectionManager,
    parser: Arc<dyn ResultParser>,
    last_url: Option<SearchUrl>,
    last_query: Option<String>,
    current_page: usize,
}

impl SearchSession {
    /// Creates a disconnected session with injected collaborators.
    #[must_use]
    pub fn new(
        config: SessionConfig,
        engine: Arc<dyn FetchEngine>,
        parser: Arc<dyn ResultParser>,
    ) -> Self {
        let connection =
            ConnectionManager::new(engine, config.host(), ConnectOptions::from_config(&config));
        Self {
            config,
            connection,
            parser,
            last_url: None,
            last_query: None,
            current_page: 0,
        }
    }

    /// Creates a session and opens its connection.
    pub async fn open(
        config: SessionConfig,
        engine: Arc<dyn FetchEngine>,
        parser: Arc<dyn ResultParser>,
    ) -> Result<Self> {
        let mut session = Self::new(config, engine, parser);
        session.connect().await?;
        Ok(session)
    }

    /// Creates a session backed by the HTTP engine and HTML parser.
    #[cfg(feature = "backends")]
    pub fn with_defaults(config: SessionConfig) -> Result<Self> {
        use crate::backends::{HtmlResultParser, HttpFetchEngine};

        let parser = HtmlResultParser::new().map_err(|e| {
            SearchError::new(format!("failed to build result parser: {e}")).with_cause(e)
        })?;
        Ok(Self::new(config, Arc::new(HttpFetchEngine::new()), Arc::new(parser)))
    }

    /// Opens the connection. No-op when already connected.
    pub async fn connect(&mut self) -> Result<()> {
        self.connection.connect().await?;
        Ok(())
    }

    /// Releases the connection. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.connection.close();
    }

    /// Runs a search and resets the page cursor to its offset.
    pub async fn search(
        &mut self,
        keywords: impl Into<Keywords> + Send,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let spec = QuerySpec::resolve(keywords, &self.config, options).map_err(|e| {
            SessionError::from(SearchError::new(format!("invalid search options: {e}")).with_cause(e))
        })?;
        let url = SearchUrl::new(spec);
        let page = url.page();

        let response = self.execute(&url, page).await?;
        self.commit(url, page);
        Ok(response)
    }

    /// Runs a search on the news vertical.
    pub async fn search_news(
        &mut self,
        keywords: impl Into<Keywords> + Send,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let mut options = options.clone();
        options.news = true;
        options.videos = false;
        self.search(keywords, &options).await
    }

    /// Runs a search on the videos vertical.
    pub async fn search_videos(
        &mut self,
        keywords: impl Into<Keywords> + Send,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let mut options = options.clone();
        options.news = false;
        options.videos = true;
        self.search(keywords, &options).await
    }

    /// Fetches the page after the last one.
    pub async fn next_page(&mut self) -> Result<SearchResponse> {
        let mut url = self.last_url.clone().ok_or_else(SearchError::no_previous_search)?;
        url.next_page().map_err(|e| {
            SearchError::new(format!("cannot advance past the last page: {e}")).with_cause(e)
        })?;
        let page = self.current_page.saturating_add(1);

        let response = self.execute(&url, page).await?;
        self.commit(url, page);
        Ok(response)
    }

    /// Fetches the page before the last one.
    pub async fn prev_page(&mut self) -> Result<SearchResponse> {
        let mut url = self.last_url.clone().ok_or_else(SearchError::no_previous_search)?;
        if self.current_page == 0 {
            return Err(SearchError::at_first_page().into());
        }
        url.prev_page()
            .map_err(|e| SearchError::at_first_page().with_cause(e))?;
        let page = self.current_page - 1;

        let response = self.execute(&url, page).await?;
        self.commit(url, page);
        Ok(response)
    }

    /// Runs a search and returns the results as a JSON array.
    pub async fn search_json(
        &mut self,
        keywords: impl Into<Keywords> + Send,
        options: &SearchOptions,
    ) -> Result<String> {
        let response = self.search(keywords, options).await?;
        response.to_json().map_err(|e| {
            SearchError::new(format!("failed to serialize results: {e}"))
                .with_cause(e)
                .into()
        })
    }

    /// Whether a connection is held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Host the connection targets.
    #[must_use]
    pub fn host(&self) -> &str {
        self.connection.host()
    }

    /// Zero-based index of the last fetched page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Keyword string of the last successful search.
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// URL of the last successful fetch.
    #[must_use]
    pub fn last_url(&self) -> Option<&SearchUrl> {
        self.last_url.as_ref()
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Identity that survives reconnects.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.connection.session_id()
    }

    /// Number of in-place reconnects so far.
    #[must_use]
    pub fn reconnect_count(&self) -> usize {
        self.connection.reconnect_count()
    }

    async fn execute(&mut self, url: &SearchUrl, page: usize) -> Result<SearchResponse> {
        info!(
            session_id = %self.connection.session_id(),
            host = url.host(),
            vertical = %url.vertical(),
            page,
            "searching"
        );

        self.connection.connect().await?;
        if url.host() != self.connection.host() {
            self.connection.reconnect(Some(url.host())).await?;
        }

        let timer = SpanTimer::start("fetch");
        let html = self
            .connection
            .fetch(&url.relative())
            .await
            .map_err(|e| match e {
                FetchError::Connection(e) => SessionError::from(e),
                FetchError::Engine(e) => {
                    SearchError::new(format!("search request failed: {e}"))
                        .with_cause(e)
                        .into()
                }
            })?;
        timer.finish();

        let timer = SpanTimer::start("parse");
        let parsed = self.parser.parse(&html, url.vertical()).map_err(|e| {
            ParseError::new(format!("failed to parse search results: {e}")).with_cause(e)
        })?;
        timer.finish();

        let results: Vec<SearchResult> = parsed
            .entries
            .into_iter()
            .map(SearchResult::from_parsed)
            .collect();
        debug!(count = results.len(), page, "results parsed");

        let mut response = SearchResponse::new(results, url.query_text(), url.full(), page)
            .with_filtered(parsed.filtered);
        if parsed.autocorrected {
            response.autocorrected = true;
            response.showing_results_for = parsed.showing_results_for;
        }
        Ok(response)
    }

    fn commit(&mut self, url: SearchUrl, page: usize) {
        self.last_query = Some(url.query_text());
        self.last_url = Some(url);
        self.current_page = page;
    }
}

impl fmt::Display for SearchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_connected() {
            "connected"
        } else {
            "disconnected"
        };
        write!(
            f,
            "<SearchSession [{state}] tld={}>",
            self.config.tld.as_deref().unwrap_or("None")
        )
    }
}

impl fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.close();
    }
}
