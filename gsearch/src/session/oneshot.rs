//! One-call search helpers.
//!
//! Each helper opens a session, runs a single request, closes the session
//! whatever the outcome, and returns only the results.

use std::sync::Arc;

use super::client::SearchSession;
use crate::config::SessionConfig;
use crate::engine::{FetchEngine, ResultParser};
use crate::errors::Result;
use crate::models::{SearchResponse, SearchResult};
use crate::query::{Keywords, SearchOptions, Vertical};

async fn run_once(
    mut session: SearchSession,
    keywords: Keywords,
    options: &SearchOptions,
    vertical: Vertical,
) -> Result<Vec<SearchResult>> {
    let outcome = match vertical {
        Vertical::Web => session.search(keywords, options).await,
        Vertical::News => session.search_news(keywords, options).await,
        Vertical::Videos => session.search_videos(keywords, options).await,
    };
    session.close();
    outcome.map(SearchResponse::into_results)
}

/// Web search with injected collaborators.
pub async fn search_with(
    engine: Arc<dyn FetchEngine>,
    parser: Arc<dyn ResultParser>,
    config: SessionConfig,
    keywords: impl Into<Keywords>,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>> {
    let session = SearchSession::new(config, engine, parser);
    run_once(session, keywords.into(), options, options.vertical()).await
}

/// News search with injected collaborators.
pub async fn search_news_with(
    engine: Arc<dyn FetchEngine>,
    parser: Arc<dyn ResultParser>,
    config: SessionConfig,
    keywords: impl Into<Keywords>,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>> {
    let session = SearchSession::new(config, engine, parser);
    run_once(session, keywords.into(), options, Vertical::News).await
}

/// Video search with injected collaborators.
pub async fn search_videos_with(
    engine: Arc<dyn FetchEngine>,
    parser: Arc<dyn ResultParser>,
    config: SessionConfig,
    keywords: impl Into<Keywords>,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>> {
    let session = SearchSession::new(config, engine, parser);
    run_once(session, keywords.into(), options, Vertical::Videos).await
}

/// Web search over HTTP with the default HTML parser.
#[cfg(feature = "backends")]
pub async fn search(
    config: SessionConfig,
    keywords: impl Into<Keywords>,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>> {
    let session = SearchSession::with_defaults(config)?;
    run_once(session, keywords.into(), options, options.vertical()).await
}

/// News search over HTTP with the default HTML parser.
#[cfg(feature = "backends")]
pub async fn search_news(
    config: SessionConfig,
    keywords: impl Into<Keywords>,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>> {
    let session = SearchSession::with_defaults(config)?;
    run_once(session, keywords.into(), options, Vertical::News).await
}

/// Video search over HTTP with the default HTML parser.
#[cfg(feature = "backends")]
pub async fn search_videos(
    config: SessionConfig,
    keywords: impl Into<Keywords>,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>> {
    let session = SearchSession::with_defaults(config)?;
    run_once(session, keywords.into(), options, Vertical::Videos).await
}
