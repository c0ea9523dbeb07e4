//! Scriptable in-memory collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::engine::{
    ConnectOptions, EngineConnection, EngineError, FetchEngine, ParsedPage, ResultParser,
};
use crate::query::Vertical;

#[derive(Debug, Default)]
struct EngineState {
    default_body: Mutex<String>,
    bodies: Mutex<VecDeque<String>>,
    fetch_errors: Mutex<VecDeque<EngineError>>,
    connect_error: Mutex<Option<EngineError>>,
    reconnect_error: Mutex<Option<EngineError>>,
    connected_hosts: Mutex<Vec<String>>,
    reconnect_hosts: Mutex<Vec<Option<String>>>,
    fetched: Mutex<Vec<(String, String)>>,
    closes: Mutex<usize>,
}

/// A fetch engine that serves canned bodies and records every call.
///
/// Connections it hands out share its state, so counts stay visible to the
/// test after the engine is moved into a session.
#[derive(Debug, Clone, Default)]
pub struct MockFetchEngine {
    state: Arc<EngineState>,
}

impl MockFetchEngine {
    /// Creates an engine that answers every fetch with an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body returned when no queued body is left.
    #[must_use]
    pub fn with_body(self, body: impl Into<String>) -> Self {
        *self.state.default_body.lock() = body.into();
        self
    }

    /// Makes every connect attempt fail.
    #[must_use]
    pub fn failing_connect(self, reason: impl Into<String>) -> Self {
        *self.state.connect_error.lock() = Some(EngineError::Connect {
            host: String::new(),
            reason: reason.into(),
        });
        self
    }

    /// Makes every reconnect fail with `error`.
    #[must_use]
    pub fn failing_reconnect(self, error: EngineError) -> Self {
        *self.state.reconnect_error.lock() = Some(error);
        self
    }

    /// Queues a body for the next fetch.
    pub fn push_body(&self, body: impl Into<String>) {
        self.state.bodies.lock().push_back(body.into());
    }

    /// Queues a failure for the next fetch.
    pub fn push_fetch_error(&self, error: EngineError) {
        self.state.fetch_errors.lock().push_back(error);
    }

    /// Number of connections opened.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.state.connected_hosts.lock().len()
    }

    /// Hosts passed to `connect`, in order.
    #[must_use]
    pub fn connected_hosts(&self) -> Vec<String> {
        self.state.connected_hosts.lock().clone()
    }

    /// Number of in-place reconnects.
    #[must_use]
    pub fn reconnect_count(&self) -> usize {
        self.state.reconnect_hosts.lock().len()
    }

    /// Hosts passed to `reconnect`, in order.
    #[must_use]
    pub fn reconnect_hosts(&self) -> Vec<Option<String>> {
        self.state.reconnect_hosts.lock().clone()
    }

    /// Paths fetched, in order.
    #[must_use]
    pub fn fetched_paths(&self) -> Vec<String> {
        self.state.fetched.lock().iter().map(|(_, path)| path.clone()).collect()
    }

    /// Absolute URLs fetched, in order.
    #[must_use]
    pub fn fetched_urls(&self) -> Vec<String> {
        self.state
            .fetched
            .lock()
            .iter()
            .map(|(host, path)| format!("https://{host}{path}"))
            .collect()
    }

    /// Number of connections closed.
    #[must_use]
    pub fn close_count(&self) -> usize {
        *self.state.closes.lock()
    }
}

#[async_trait]
impl FetchEngine for MockFetchEngine {
    async fn connect(
        &self,
        host: &str,
        _options: &ConnectOptions,
    ) -> Result<Box<dyn EngineConnection>, EngineError> {
        if let Some(error) = self.state.connect_error.lock().clone() {
            return Err(match error {
                EngineError::Connect { reason, .. } => EngineError::Connect {
                    host: host.to_string(),
                    reason,
                },
                other => other,
            });
        }

        self.state.connected_hosts.lock().push(host.to_string());
        Ok(Box::new(MockConnection {
            host: host.to_string(),
            state: Arc::clone(&self.state),
        }))
    }
}

#[derive(Debug)]
struct MockConnection {
    host: String,
    state: Arc<EngineState>,
}

#[async_trait]
impl EngineConnection for MockConnection {
    fn host(&self) -> &str {
        &self.host
    }

    async fn fetch(&mut self, path: &str) -> Result<String, EngineError> {
        if let Some(error) = self.state.fetch_errors.lock().pop_front() {
            return Err(error);
        }
        self.state
            .fetched
            .lock()
            .push((self.host.clone(), path.to_string()));

        let queued = self.state.bodies.lock().pop_front();
        Ok(queued.unwrap_or_else(|| self.state.default_body.lock().clone()))
    }

    async fn reconnect(&mut self, host: Option<&str>) -> Result<(), EngineError> {
        self.state.reconnect_hosts.lock().push(host.map(String::from));
        if let Some(error) = self.state.reconnect_error.lock().clone() {
            return Err(error);
        }
        if let Some(host) = host {
            self.host = host.to_string();
        }
        Ok(())
    }

    fn close(&mut self) {
        *self.state.closes.lock() += 1;
    }
}

/// A parser that returns queued pages and records what it was asked.
#[derive(Debug, Default)]
pub struct StaticParser {
    default_page: Mutex<ParsedPage>,
    pages: Mutex<VecDeque<ParsedPage>>,
    error: Mutex<Option<String>>,
    calls: Mutex<Vec<(String, Vertical)>>,
}

impl StaticParser {
    /// Creates a parser that returns `page` when nothing is queued.
    #[must_use]
    pub fn new(page: ParsedPage) -> Self {
        Self {
            default_page: Mutex::new(page),
            ..Self::default()
        }
    }

    /// Creates a parser that fails every call with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Mutex::new(Some(message.into())),
            ..Self::default()
        }
    }

    /// Queues a page for the next call.
    pub fn push_page(&self, page: ParsedPage) {
        self.pages.lock().push_back(page);
    }

    /// Number of parse calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Verticals passed to each call.
    #[must_use]
    pub fn verticals(&self) -> Vec<Vertical> {
        self.calls.lock().iter().map(|(_, v)| *v).collect()
    }

    /// Markup passed to each call.
    #[must_use]
    pub fn inputs(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(html, _)| html.clone()).collect()
    }
}

impl ResultParser for StaticParser {
    fn parse(&self, html: &str, vertical: Vertical) -> anyhow::Result<ParsedPage> {
        self.calls.lock().push((html.to_string(), vertical));
        if let Some(message) = self.error.lock().clone() {
            anyhow::bail!(message);
        }
        let queued = self.pages.lock().pop_front();
        Ok(queued.unwrap_or_else(|| self.default_page.lock().clone()))
    }
}
