//! HTTP transport abstraction and the default `reqwest` implementation.

use crate::error::BoxError;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A fully built outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// Accept, Content-Type and the token header.
    pub headers: HeaderMap,
    /// JSON encoded payload, if any.
    pub body: Option<Vec<u8>>,
}

/// Raw response handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Full response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response from a status and body.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs one HTTP round trip.
///
/// Implementations own connection reuse, TLS, redirects and timeouts. A
/// [`Client`](crate::Client) is safe to share between tasks exactly when its
/// transport is.
pub trait Transport: Send + Sync {
    /// Send `request` and return the response, whatever its status.
    ///
    /// Only failures to get a response at all should be reported as errors.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = std::result::Result<HttpResponse, BoxError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = std::result::Result<HttpResponse, BoxError>> + Send {
        (**self).execute(request)
    }
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a builder for configuring the transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Create a transport with default settings.
    pub fn new() -> Result<Self> {
        ReqwestTransportBuilder::new().build()
    }

    /// Wrap an existing `reqwest` client, e.g. to share its connection pool.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, BoxError> {
        let mut builder = self
            .http
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

const USER_AGENT_VALUE: &str = concat!("postmark-client/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct ReqwestTransportBuilder {
    proxy: Option<String>,
    timeout: Option<Duration>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No proxy
    /// - No timeout
    /// - `danger_accept_invalid_certs = false`
    /// - `postmark-client/<version>` user agent
    pub fn new() -> Self {
        Self {
            proxy: None,
            timeout: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080" or "socks5://127.0.0.1:1080").
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set a total timeout for each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .user_agent(self.user_agent);

        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| Error::Transport(e.into()))?;
            builder = builder.proxy(proxy);
        }

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|e| Error::Transport(e.into()))?;

        Ok(ReqwestTransport { http })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = ReqwestTransportBuilder::new();
        assert!(builder.proxy.is_none());
        assert!(builder.timeout.is_none());
        assert!(!builder.danger_accept_invalid_certs);
        assert!(builder.user_agent.starts_with("postmark-client/"));
    }

    #[test]
    fn builder_chain() {
        let builder = ReqwestTransport::builder()
            .proxy("http://127.0.0.1:8080")
            .timeout(Duration::from_secs(5))
            .user_agent("my-app/1.0");
        assert_eq!(builder.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(builder.timeout, Some(Duration::from_secs(5)));
        assert_eq!(builder.user_agent, "my-app/1.0");
    }
}
