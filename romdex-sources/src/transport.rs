//! The HTTP seam between adapters and the network.
//!
//! Adapters build fully-formed [`SourceRequest`]s (URL, query or body, auth
//! headers); a [`Transport`] only executes them. Tests drive adapters end to
//! end by substituting a transport that replays canned payloads.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One prepared request to a catalog service.
///
/// A request with a body is sent as a POST, otherwise as a GET. Query
/// parameters are kept as pairs so the transport handles percent-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl SourceRequest {
    pub fn get(url: impl Into<String>) -> Self {
        SourceRequest {
            url: url.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        SourceRequest {
            url: url.into(),
            query: Vec::new(),
            body: Some(body.into()),
            headers: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Executes one prepared request and hands back the raw response body.
///
/// One request, one response. Retry policy, pooling, and caching are the
/// caller's business; quota and error texts ride in the body and are
/// interpreted by the adapter, so non-success statuses are not errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &SourceRequest) -> Result<Vec<u8>, ScrapeError>;
}

/// Production transport over a shared `reqwest` client.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &SourceRequest) -> Result<Vec<u8>, ScrapeError> {
        let mut builder = match &request.body {
            Some(body) => self.http.post(&request.url).body(body.clone()),
            None => self.http.get(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
