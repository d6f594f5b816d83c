/**
 * Upstream HTTP Client
 *
 * Request descriptors and the thin reqwest wrapper that executes them.
 *
 * A [`RequestDescriptor`] is a pure value built from a base origin, a path,
 * an auth scheme and the credentials. Nothing is sent until the runner hands
 * it to [`BooqableClient::send`], which makes descriptors cheap to enumerate
 * and easy to assert on in tests.
 *
 * # Response Bodies
 *
 * Upstream bodies are read as text once. An empty body parses as `{}`, a
 * body that is not JSON is wrapped as `{"raw": <text>}` so callers can always
 * scan an object.
 */

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Value};
use thiserror::Error;

use super::candidates::{AuthScheme, Credentials};

/// Characters of a response body kept in attempt traces
pub const SAMPLE_LEN: usize = 160;

/// Errors raised while executing a single request
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// One fully specified upstream call
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub base: String,
    pub path: String,
    pub auth: AuthScheme,
    /// Non-secret query parameters
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    credentials: Credentials,
}

impl RequestDescriptor {
    pub fn new(
        method: Method,
        base: &str,
        path: impl Into<String>,
        auth: AuthScheme,
        credentials: &Credentials,
    ) -> Self {
        Self {
            method,
            base: base.trim_end_matches('/').to_string(),
            path: path.into(),
            auth,
            query: Vec::new(),
            body: None,
            credentials: credentials.clone(),
        }
    }

    pub fn get(base: &str, path: impl Into<String>, auth: AuthScheme, credentials: &Credentials) -> Self {
        Self::new(Method::GET, base, path, auth, credentials)
    }

    pub fn post(
        base: &str,
        path: impl Into<String>,
        auth: AuthScheme,
        credentials: &Credentials,
        body: Value,
    ) -> Self {
        Self::new(Method::POST, base, path, auth, credentials).with_body(body)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Base and path joined, without any query string
    pub fn url(&self) -> String {
        let sep = if self.path.starts_with('/') { "" } else { "/" };
        format!("{}{}{}", self.base, sep, self.path)
    }

    /// The final URL including query parameters and query-string credentials
    pub fn full_url(&self) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.url()).map_err(|_| ClientError::InvalidUrl(self.url()))?;
        let auth_param = match self.auth {
            AuthScheme::QueryToken => Some("token"),
            AuthScheme::QueryApiKey => Some("api_key"),
            _ => None,
        };
        if !self.query.is_empty() || auth_param.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
            if let Some(param) = auth_param {
                pairs.append_pair(param, self.credentials.api_key());
            }
        }
        Ok(url)
    }

    /// Header carrying the credential, if the scheme uses one
    pub fn auth_header(&self) -> Option<(&'static str, String)> {
        let key = self.credentials.api_key();
        match self.auth {
            AuthScheme::Bearer => Some(("authorization", format!("Bearer {}", key))),
            AuthScheme::Token => Some(("authorization", format!("Token {}", key))),
            AuthScheme::TokenKv => Some(("authorization", format!("Token token={}", key))),
            AuthScheme::ApiKeyHeader => Some(("X-API-KEY", key.to_string())),
            AuthScheme::QueryToken | AuthScheme::QueryApiKey => None,
        }
    }
}

/// A received upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub text: String,
    pub json: Value,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, text: String) -> Self {
        let json = parse_body(&text);
        Self { status, text, json }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Leading characters of the body for attempt traces
    pub fn sample(&self) -> String {
        self.text.chars().take(SAMPLE_LEN).collect()
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

/// reqwest client with the configured per-call timeout
#[derive(Debug, Clone)]
pub struct BooqableClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl BooqableClient {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, timeout })
    }

    /// Execute a descriptor, bounded by the per-call timeout and `remaining`
    pub async fn send(
        &self,
        request: &RequestDescriptor,
        remaining: Duration,
    ) -> Result<UpstreamResponse, ClientError> {
        let url = request.full_url()?;
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .timeout(self.timeout.min(remaining))
            .header(CONTENT_TYPE, "application/json");
        if let Some((name, value)) = request.auth_header() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok(UpstreamResponse::new(status, text))
    }
}
