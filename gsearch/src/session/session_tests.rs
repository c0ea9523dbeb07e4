//! Tests for the search session and the one-call helpers.

#[cfg(test)]
mod tests {
    use crate::config::SessionConfig;
    use crate::engine::{EngineError, MockResultParser, ParsedEntry, ParsedPage, ResultParser};
    use crate::errors::ErrorKind;
    use crate::query::{SearchOptions, Vertical};
    use crate::session::{search_news_with, search_with, SearchSession};
    use crate::testing::{MockFetchEngine, StaticParser};
    use pretty_assertions::assert_eq;
    use std::error::Error as _;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn page_of(titles: &[&str]) -> ParsedPage {
        ParsedPage::with_entries(
            titles
                .iter()
                .map(|t| ParsedEntry::new(*t, format!("https://example.com/{t}"), format!("about {t}")))
                .collect(),
        )
    }

    fn session(engine: &MockFetchEngine, parser: Arc<dyn ResultParser>) -> SearchSession {
        SearchSession::new(SessionConfig::default(), Arc::new(engine.clone()), parser)
    }

    #[test]
    fn test_pagination_before_search_fails() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        let err = tokio_test::block_on(session.next_page()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Search);
        assert!(err.message().contains("No previous search"));

        let err = tokio_test::block_on(session.prev_page()).unwrap_err();
        assert!(err.is_search());
        assert!(err.message().contains("No previous search"));
        assert_eq!(engine.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_search_returns_normalized_response() {
        let engine = MockFetchEngine::new().with_body("<html>page</html>");
        let parser = Arc::new(StaticParser::new(page_of(&["alpha", "beta"])));
        let mut session = session(&engine, parser.clone());

        let response = session.search("rust lang", &SearchOptions::default()).await.unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(response[0].title(), "alpha");
        assert_eq!(response.query, "rust lang");
        assert_eq!(response.url, "https://www.google.com/search?q=rust+lang&num=10");
        assert_eq!(response.page, 0);
        assert!(!response.autocorrected);
        assert!(response.showing_results_for.is_none());

        assert!(session.is_connected());
        assert_eq!(session.last_query(), Some("rust lang"));
        assert_eq!(parser.inputs(), vec!["<html>page</html>".to_string()]);
        assert_eq!(parser.verticals(), vec![Vertical::Web]);
    }

    #[tokio::test]
    async fn test_page_index_from_start() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        let options = SearchOptions::new().with_num(20).with_start(40);
        let response = session.search("x", &options).await.unwrap();
        assert_eq!(response.page, 2);
        assert_eq!(session.current_page(), 2);
    }

    #[tokio::test]
    async fn test_next_page_yields_separate_results() {
        let engine = MockFetchEngine::new();
        let parser = Arc::new(StaticParser::default());
        parser.push_page(page_of(&["first"]));
        parser.push_page(page_of(&["second"]));
        let mut session = session(&engine, parser);

        let first = session.search("rust", &SearchOptions::default()).await.unwrap();
        let second = session.next_page().await.unwrap();

        assert_eq!(second.page, 1);
        assert_eq!(session.current_page(), 1);
        assert_ne!(first.results, second.results);
        assert_eq!(
            engine.fetched_paths(),
            vec![
                "/search?q=rust&num=10".to_string(),
                "/search?q=rust&start=10&num=10".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_prev_page_never_goes_below_zero() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        assert_ok!(session.search("rust", &SearchOptions::default()).await);
        let err = assert_err!(session.prev_page().await);
        assert!(err.is_search());
        assert_eq!(err.message(), "Already at the first page.");
        assert_eq!(session.current_page(), 0);

        assert_ok!(session.next_page().await);
        let back = session.prev_page().await.unwrap();
        assert_eq!(back.page, 0);
        assert_eq!(session.last_url().map(|u| u.start()), Some(0));

        assert_err!(session.prev_page().await);
        assert_eq!(session.current_page(), 0);
    }

    #[tokio::test]
    async fn test_prev_page_on_partial_first_page_fails() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        assert_ok!(session.search("rust", &SearchOptions::new().with_start(5)).await);
        assert_eq!(session.current_page(), 0);
        assert_err!(session.prev_page().await);
    }

    #[tokio::test]
    async fn test_country_tld_resolves_host() {
        let engine = MockFetchEngine::new();
        let mut session = SearchSession::new(
            SessionConfig::new().with_tld("in"),
            Arc::new(engine.clone()),
            Arc::new(StaticParser::default()),
        );
        assert_eq!(session.host(), "www.google.in");

        let response = session.search("cricket", &SearchOptions::default()).await.unwrap();
        assert!(response.url.starts_with("https://www.google.in/search?"));
        assert_eq!(engine.connected_hosts(), vec!["www.google.in".to_string()]);
        assert_eq!(engine.reconnect_count(), 0);
    }

    #[tokio::test]
    async fn test_host_change_reconnects_once_in_place() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));
        let id = session.session_id();

        assert_ok!(session.search("x", &SearchOptions::default()).await);
        assert_ok!(session.search("x", &SearchOptions::new().with_tld("in")).await);
        assert_ok!(session.next_page().await);

        assert_eq!(engine.connect_count(), 1);
        assert_eq!(engine.reconnect_count(), 1);
        assert_eq!(session.reconnect_count(), 1);
        assert_eq!(session.session_id(), id);
        assert_eq!(session.host(), "www.google.in");
        assert_eq!(
            engine.fetched_urls()[1],
            "https://www.google.in/search?q=x&num=10"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_surfaces_as_connection_error() {
        let engine = MockFetchEngine::new().failing_connect("no route to host");
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        let err = session.search("x", &SearchOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.message().contains("no route to host"));
        assert!(session.last_url().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_during_fetch_is_connection_error() {
        let engine = MockFetchEngine::new();
        engine.push_fetch_error(EngineError::Proxy("407 from proxy".to_string()));
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        let err = session.search("x", &SearchOptions::default()).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_bad_status_is_connection_error_with_cause() {
        let engine = MockFetchEngine::new();
        engine.push_fetch_error(EngineError::Status {
            status: 503,
            url: "/search".to_string(),
        });
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        let err = session.search("x", &SearchOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.message().contains("connection to www.google.com failed"));

        let cause = err.source().and_then(|e| e.source()).unwrap();
        assert_eq!(cause.to_string(), "HTTP 503 for /search");
        assert!(session.last_url().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_body_is_search_error_with_cause() {
        let engine = MockFetchEngine::new();
        engine.push_fetch_error(EngineError::Body("stream ended early".to_string()));
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        let err = session.search("x", &SearchOptions::default()).await.unwrap_err();
        assert!(err.is_search());
        assert!(err.message().starts_with("search request failed"));

        let cause = err.source().and_then(|e| e.source()).unwrap();
        assert_eq!(cause.to_string(), "invalid response body: stream ended early");
    }

    #[tokio::test]
    async fn test_failed_reconnect_disconnects_and_next_search_connects_fresh() {
        let engine = MockFetchEngine::new().failing_reconnect(EngineError::Connect {
            host: "www.google.in".to_string(),
            reason: "refused".to_string(),
        });
        let mut session = session(&engine, Arc::new(StaticParser::default()));
        let in_options = SearchOptions::new().with_tld("in");

        assert_ok!(session.search("x", &SearchOptions::default()).await);
        let err = session.search("x", &in_options).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.message().contains("refused"));
        assert!(!session.is_connected());
        assert_eq!(session.host(), "www.google.in");
        assert_eq!(session.reconnect_count(), 0);
        assert_eq!(session.last_url().map(|u| u.host()), Some("www.google.com"));

        assert_ok!(session.search("x", &in_options).await);
        assert!(session.is_connected());
        assert_eq!(
            engine.connected_hosts(),
            vec!["www.google.com".to_string(), "www.google.in".to_string()]
        );
        assert_eq!(
            engine.fetched_urls(),
            vec![
                "https://www.google.com/search?q=x&num=10".to_string(),
                "https://www.google.in/search?q=x&num=10".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_parser_failure_is_parse_error() {
        let mut parser = MockResultParser::new();
        parser
            .expect_parse()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("no result container")));

        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(parser));

        let err = session.search("x", &SearchOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.message().contains("no result container"));
        assert!(session.last_query().is_none());
    }

    #[tokio::test]
    async fn test_failed_page_keeps_cursor() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        assert_ok!(session.search("x", &SearchOptions::default()).await);
        engine.push_fetch_error(EngineError::Body("truncated".to_string()));
        assert_err!(session.next_page().await);

        assert_eq!(session.current_page(), 0);
        assert_eq!(session.last_url().map(|u| u.start()), Some(0));
    }

    #[tokio::test]
    async fn test_next_page_past_last_offset_is_search_error() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));
        let start = usize::MAX - 3;

        assert_ok!(session.search("x", &SearchOptions::new().with_start(start)).await);
        let page = session.current_page();

        let err = session.next_page().await.unwrap_err();
        assert!(err.is_search());
        assert!(err.message().contains("cannot advance past the last page"));
        assert_eq!(session.current_page(), page);
        assert_eq!(session.last_url().map(|u| u.start()), Some(start));
        assert_eq!(engine.fetched_paths().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_option_is_search_error() {
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::default()));

        let options = SearchOptions::new().with_duration("fortnight");
        let err = session.search("x", &options).await.unwrap_err();
        assert!(err.is_search());
        assert_eq!(engine.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_vertical_is_passed_to_parser() {
        let mut parser = MockResultParser::new();
        parser
            .expect_parse()
            .withf(|_, vertical| *vertical == Vertical::News)
            .times(1)
            .returning(|_, _| Ok(ParsedPage::default()));
        parser
            .expect_parse()
            .withf(|_, vertical| *vertical == Vertical::Videos)
            .times(1)
            .returning(|_, _| Ok(ParsedPage::default()));

        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(parser));

        let news = session.search_news("elections", &SearchOptions::default()).await.unwrap();
        assert!(news.url.ends_with("&tbm=nws"));
        let videos = session.search_videos("cats", &SearchOptions::new().news()).await.unwrap();
        assert!(videos.url.ends_with("&tbm=vid"));
    }

    #[tokio::test]
    async fn test_autocorrect_and_filtered_flags() {
        let page = ParsedPage {
            autocorrected: true,
            showing_results_for: Some("rust".to_string()),
            filtered: true,
            ..page_of(&["a"])
        };
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::new(page)));

        let response = session.search("rsut", &SearchOptions::default()).await.unwrap();
        assert!(response.autocorrected);
        assert_eq!(response.showing_results_for.as_deref(), Some("rust"));
        assert!(response.filtered);
    }

    #[tokio::test]
    async fn test_corrected_query_ignored_without_autocorrect() {
        let page = ParsedPage {
            showing_results_for: Some("stale".to_string()),
            ..ParsedPage::default()
        };
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::new(page)));

        let response = session.search("x", &SearchOptions::default()).await.unwrap();
        assert!(!response.autocorrected);
        assert!(response.showing_results_for.is_none());
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_search_json() {
        let mut page = page_of(&["alpha", "beta", "gamma"]);
        page.entries.push(ParsedEntry::new(
            "Café Zürich",
            "https://example.com/café",
            "crème brûlée",
        ));
        let engine = MockFetchEngine::new();
        let mut session = session(&engine, Arc::new(StaticParser::new(page)));

        let json = session.search_json("x", &SearchOptions::default()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        for item in items {
            let keys: Vec<_> = item.as_object().unwrap().keys().cloned().collect();
            assert_eq!(keys, vec!["abstract", "title", "url"]);
        }

        assert_eq!(items[3]["title"], "Café Zürich");
        assert_eq!(items[3]["abstract"], "crème brûlée");
        assert!(json.contains("\"Café Zürich\""));
        assert!(json.starts_with("[\n  {\n    \"abstract\""));
    }

    #[tokio::test]
    async fn test_open_close_and_display() {
        let engine = MockFetchEngine::new();
        let mut session = SearchSession::open(
            SessionConfig::new().with_tld("de"),
            Arc::new(engine.clone()),
            Arc::new(StaticParser::default()),
        )
        .await
        .unwrap();

        assert_eq!(session.to_string(), "<SearchSession [connected] tld=de>");
        session.close();
        session.close();
        assert_eq!(session.to_string(), "<SearchSession [disconnected] tld=de>");
        assert_eq!(engine.close_count(), 1);
    }

    #[test]
    fn test_display_without_tld() {
        let session = session(&MockFetchEngine::new(), Arc::new(StaticParser::default()));
        assert_eq!(format!("{session:?}"), "<SearchSession [disconnected] tld=None>");
    }

    #[tokio::test]
    async fn test_drop_releases_connection() {
        let engine = MockFetchEngine::new();
        {
            let mut session = session(&engine, Arc::new(StaticParser::default()));
            assert_ok!(session.connect().await);
        }
        assert_eq!(engine.close_count(), 1);
    }

    #[tokio::test]
    async fn test_oneshot_closes_session() {
        let engine = MockFetchEngine::new();
        let parser = Arc::new(StaticParser::new(page_of(&["a", "b"])));

        let results = search_with(
            Arc::new(engine.clone()),
            parser.clone(),
            SessionConfig::default(),
            "x",
            &SearchOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(engine.close_count(), 1);

        let results = search_news_with(
            Arc::new(engine.clone()),
            parser.clone(),
            SessionConfig::default(),
            vec!["world", "news"],
            &SearchOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(parser.verticals(), vec![Vertical::Web, Vertical::News]);
        assert_eq!(engine.close_count(), 2);
    }

    #[tokio::test]
    async fn test_oneshot_closes_session_on_error() {
        let engine = MockFetchEngine::new();
        let result = search_with(
            Arc::new(engine.clone()),
            Arc::new(StaticParser::failing("bad markup")),
            SessionConfig::default(),
            "x",
            &SearchOptions::default(),
        )
        .await;

        assert!(result.unwrap_err().is_parse());
        assert_eq!(engine.close_count(), 1);
    }
}
