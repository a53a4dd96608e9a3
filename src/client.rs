//! HTTP plumbing shared by the login, listing and download steps.
//!
//! The service expects the same three headers on every request and takes the
//! session token as a literal suffix of the request path, so both concerns
//! live here instead of at each call site.

use crate::config::ResolvedConfig;
use crate::constants::{CONTENT_TYPE, ORIGIN, USER_AGENT};
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Client for the LGO API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct LgoClient {
    http: Client,
    base_url: String,
}

impl LgoClient {
    /// Creates a client from the resolved configuration.
    pub fn new(config: &ResolvedConfig) -> AppResult<Self> {
        config.validate()?;
        Self::with_base_url(&config.base_url, config.timeout())
    }

    /// Creates a client for an explicit base URL and request timeout.
    ///
    /// `timeout` bounds each request from connect until the body is fully read.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `base_url + path + token`.
    ///
    /// The token is concatenated without any separator; that is the URL
    /// scheme the service uses, not a query parameter.
    pub fn endpoint(&self, path: &str, session: Option<&Session>) -> String {
        let token = session.map(Session::token).unwrap_or_default();
        format!("{}{path}{token}", self.base_url)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Sends an authenticated GET and fails on any non-2xx status.
    pub(crate) async fn get(
        &self,
        path: &str,
        session: &Session,
        context: &str,
    ) -> AppResult<Response> {
        debug!(path = path, "Sending GET request");
        let response = self
            .http
            .get(self.endpoint(path, Some(session)))
            .send()
            .await
            .map_err(|e| {
                AppError::Network(format!("{context} failed: {}", e.without_url()))
            })?;

        ensure_success(response, context)
    }
}

/// Turns a non-2xx response into a protocol error carrying the status text.
pub(crate) fn ensure_success(response: Response, context: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::protocol(context, status))
    }
}

/// Reads the full body and decodes it as JSON.
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> AppResult<T> {
    let body = response.bytes().await.map_err(|e| {
        AppError::Network(format!(
            "{context}: failed to read body: {}",
            e.without_url()
        ))
    })?;

    serde_json::from_slice(&body)
        .map_err(|e| AppError::Parse(format!("{context}: invalid response body: {e}")))
}
