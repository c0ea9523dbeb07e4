//! HTTPS fetch engine built on reqwest.

use async_trait::async_trait;
use reqwest::Client;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;

use crate::config::AddressFamily;
use crate::engine::{ConnectOptions, EngineConnection, EngineError, FetchEngine};

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Fetch engine that speaks HTTPS through a pooled reqwest client.
///
/// reqwest opens sockets lazily, so transport failures surface from the
/// first fetch rather than from `connect`.
#[derive(Debug, Clone)]
pub struct HttpFetchEngine {
    user_agent: String,
    accept_language: Option<String>,
}

impl HttpFetchEngine {
    /// Creates an engine with the default user agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: None,
        }
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the `Accept-Language` header.
    #[must_use]
    pub fn with_accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = Some(language.into());
        self
    }

    fn build_client(&self, host: &str, options: &ConnectOptions) -> Result<Client, EngineError> {
        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(options.timeout)
            .connect_timeout(options.timeout);

        if let Some(proxy) = &options.proxy {
            let proxy_url = if proxy.contains("://") {
                proxy.clone()
            } else {
                format!("http://{proxy}")
            };
            let proxy = reqwest::Proxy::https(&proxy_url)
                .map_err(|e| EngineError::Proxy(format!("{proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        builder = match options.address_family {
            AddressFamily::Any => builder,
            AddressFamily::Ipv4Only => builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            AddressFamily::Ipv6Only => builder.local_address(IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
        };

        if !options.disable_tweaks {
            builder = builder
                .tcp_nodelay(true)
                .min_tls_version(reqwest::tls::Version::TLS_1_2);
        }

        builder.build().map_err(|e| EngineError::Connect {
            host: host.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Default for HttpFetchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchEngine for HttpFetchEngine {
    async fn connect(
        &self,
        host: &str,
        options: &ConnectOptions,
    ) -> Result<Box<dyn EngineConnection>, EngineError> {
        let client = self.build_client(host, options)?;
        debug!(host, proxy = ?options.proxy, family = ?options.address_family, "http client ready");
        Ok(Box::new(HttpConnection {
            engine: self.clone(),
            options: options.clone(),
            host: host.to_string(),
            client: Some(client),
        }))
    }
}

struct HttpConnection {
    engine: HttpFetchEngine,
    options: ConnectOptions,
    host: String,
    client: Option<Client>,
}

impl HttpConnection {
    fn classify(&self, url: &str, error: &reqwest::Error) -> EngineError {
        if error.is_timeout() {
            EngineError::Timeout(self.options.timeout)
        } else if error.is_connect() {
            EngineError::Connect {
                host: self.host.clone(),
                reason: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            EngineError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else {
            EngineError::Body(error.to_string())
        }
    }
}

#[async_trait]
impl EngineConnection for HttpConnection {
    fn host(&self) -> &str {
        &self.host
    }

    async fn fetch(&mut self, path: &str) -> Result<String, EngineError> {
        let Some(client) = &self.client else {
            return Err(EngineError::Connect {
                host: self.host.clone(),
                reason: "connection closed".to_string(),
            });
        };

        let url = format!("https://{}{}", self.host, path);
        let mut request = client.get(&url);
        if let Some(language) = &self.engine.accept_language {
            request = request.header(reqwest::header::ACCEPT_LANGUAGE, language);
        }

        let response = request.send().await.map_err(|e| self.classify(&url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .text()
            .await
            .map_err(|e| EngineError::Body(e.to_string()))
    }

    async fn reconnect(&mut self, host: Option<&str>) -> Result<(), EngineError> {
        let host = host.unwrap_or(self.host.as_str()).to_string();
        let client = self.engine.build_client(&host, &self.options)?;
        self.client = Some(client);
        self.host = host;
        Ok(())
    }

    fn close(&mut self) {
        self.client = None;
    }
}
