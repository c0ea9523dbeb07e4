//! Lifecycle of the single connection a session holds.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::protocols::{ConnectOptions, EngineConnection, EngineError, FetchEngine};
use crate::errors::ConnectionError;

/// Failure of [`ConnectionManager::fetch`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The transport failed or the server refused the request.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The engine answered but the response was unusable.
    #[error(transparent)]
    Engine(EngineError),
}

/// Owns zero or one engine connection to one host.
///
/// The session identity is assigned once and survives reconnects.
pub struct ConnectionManager {
    engine: Arc<dyn FetchEngine>,
    options: ConnectOptions,
    host: String,
    connection: Option<Box<dyn EngineConnection>>,
    session_id: Uuid,
    reconnects: usize,
}

impl ConnectionManager {
    /// Creates a disconnected manager for `host`.
    #[must_use]
    pub fn new(engine: Arc<dyn FetchEngine>, host: impl Into<String>, options: ConnectOptions) -> Self {
        Self {
            engine,
            options,
            host: host.into(),
            connection: None,
            session_id: Uuid::new_v4(),
            reconnects: 0,
        }
    }

    /// Current target host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether a connection is held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Identity of this logical session.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Number of in-place reconnects performed.
    #[must_use]
    pub fn reconnect_count(&self) -> usize {
        self.reconnects
    }

    /// Transport settings.
    #[must_use]
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Opens the connection. No-op when already connected.
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.connection.is_some() {
            return Ok(());
        }

        debug!(session_id = %self.session_id, host = %self.host, "connecting");
        let connection = self
            .engine
            .connect(&self.host, &self.options)
            .await
            .map_err(|e| connection_error(&format!("could not open connection to {}", self.host), e))?;

        info!(session_id = %self.session_id, host = %self.host, "connected");
        self.connection = Some(connection);
        Ok(())
    }

    /// Fetches `relative` (path and query), connecting first if needed.
    pub async fn fetch(&mut self, relative: &str) -> Result<String, FetchError> {
        self.connect().await?;
        let Some(connection) = self.connection.as_mut() else {
            return Err(ConnectionError::new(format!("no connection to {}", self.host)).into());
        };

        debug!(session_id = %self.session_id, host = %self.host, path = relative, "fetching");
        match connection.fetch(relative).await {
            Ok(body) => Ok(body),
            Err(e) if e.is_connection() => {
                warn!(session_id = %self.session_id, host = %self.host, error = %e, "transport failure");
                Err(connection_error(&format!("connection to {} failed", self.host), e).into())
            }
            Err(e) => Err(FetchError::Engine(e)),
        }
    }

    /// Re-establishes the connection in place, optionally to `new_host`.
    ///
    /// When nothing is connected yet the host is recorded and a fresh
    /// connection is opened. A failed reconnect leaves the manager
    /// disconnected.
    pub async fn reconnect(&mut self, new_host: Option<&str>) -> Result<(), ConnectionError> {
        if let Some(host) = new_host {
            self.host = host.to_string();
        }

        let Some(connection) = self.connection.as_mut() else {
            return self.connect().await;
        };

        info!(
            session_id = %self.session_id,
            from = connection.host(),
            to = %self.host,
            "reconnecting"
        );
        if let Err(e) = connection.reconnect(new_host).await {
            if let Some(mut broken) = self.connection.take() {
                broken.close();
            }
            return Err(connection_error(&format!("failed to reconnect to {}", self.host), e));
        }

        self.reconnects += 1;
        Ok(())
    }

    /// Releases the connection. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
            debug!(session_id = %self.session_id, host = %self.host, "connection closed");
        }
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("host", &self.host)
            .field("connected", &self.is_connected())
            .field("session_id", &self.session_id)
            .field("reconnects", &self.reconnects)
            .finish_non_exhaustive()
    }
}

fn connection_error(context: &str, cause: EngineError) -> ConnectionError {
    ConnectionError::new(format!("{context}: {cause}")).with_cause(cause)
}
