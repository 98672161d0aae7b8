//! HTTP transport capability
//!
//! Components talk to the server through the [`HttpTransport`] trait;
//! [`ReqwestTransport`] is the production implementation. Tests substitute a
//! mock or a scripted transport.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// HTTP method of an outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// One outbound server call
///
/// Immutable once constructed; consumed exactly once by the dispatch loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: String,
    body: Option<Value>,
}

impl Request {
    /// New request with an optional JSON body
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            url: url.into(),
            body,
        }
    }

    /// Body-less GET
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url, None)
    }

    /// POST with a JSON body
    #[must_use]
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, url, Some(body))
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Copy of this request with the auth ticket attached as the `alf_ticket`
    /// query parameter. An empty ticket leaves the request unchanged.
    #[must_use]
    pub fn with_ticket(&self, ticket: &str) -> Self {
        if ticket.is_empty() {
            return self.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        Self {
            method: self.method,
            url: format!("{}{}alf_ticket={}", self.url, separator, ticket),
            body: self.body.clone(),
        }
    }
}

/// Response to an outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: u16,
    body: Value,
}

impl HttpResponse {
    /// New response; an empty body is represented as `Value::Null`
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// 2xx status
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The server rejected our credentials or ticket
    #[inline]
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Transport-level failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection could not be established or broke mid-request
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request timed out
    #[error("request timed out")]
    Timeout,

    /// The response body was not valid JSON
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

/// Capability to execute one HTTP request
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute the request, blocking only the calling task
    async fn execute(&self, request: &Request) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// New transport with the given per-request timeout
    ///
    /// # Errors
    /// `TransportError::Connection` if the underlying client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &Request) -> Result<HttpResponse, TransportError> {
        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url());
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| TransportError::MalformedBody(e.to_string()))?
        };
        Ok(HttpResponse::new(status, body))
    }
}
