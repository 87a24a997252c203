//! HTTP client for the Scrappey API.
//!
//! Every operation is a single `POST <base_url>?key=<api_key>` carrying a
//! JSON command envelope. The client holds no session state and never
//! retries; an application-level `error` field in an otherwise well-formed
//! reply is surfaced through [`ScrappeyResponse::is_error`], not as an
//! `Err`.

use crate::error::{Result, ScrappeyError};
use crate::options::{Command, Envelope, RequestOptions, SessionOptions};
use crate::types::{ScrappeyResponse, SessionActive, SessionList};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://publisher.scrappey.com/api/v1";

/// Default request timeout. Remote browser automation is slow; the server
/// may hold a request for minutes while solving challenges.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Environment variable consulted by [`ScrappeyClient::from_env`].
pub const API_KEY_ENV: &str = "SCRAPPEY_API_KEY";

/// Client for the Scrappey web scraping API.
///
/// Cheap to clone; clones share one connection pool. Immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct ScrappeyClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Builder for [`ScrappeyClient`], for overriding the endpoint or timeout.
#[derive(Debug, Clone)]
pub struct ScrappeyClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ScrappeyClientBuilder {
    /// Override the API endpoint (e.g. for a mock server in tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the transport-level request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ScrappeyClient> {
        if self.api_key.is_empty() {
            return Err(ScrappeyError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ScrappeyError::ClientBuild)?;

        Ok(ScrappeyClient {
            api_key: self.api_key,
            base_url: self.base_url,
            client,
        })
    }
}

impl ScrappeyClient {
    /// Create a client with the production endpoint and default timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Start building a client with a custom endpoint or timeout.
    pub fn builder(api_key: impl Into<String>) -> ScrappeyClientBuilder {
        ScrappeyClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client from the `SCRAPPEY_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ScrappeyError::Config(format!("{} not set", API_KEY_ENV)))?;
        Self::new(api_key)
    }

    /// The configured endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a command envelope and decode the standard response.
    ///
    /// Exactly one outbound POST per call; nothing is retried or cached.
    /// The envelope must contain a `cmd` key.
    pub async fn request(&self, envelope: &Envelope) -> Result<ScrappeyResponse> {
        let response: ScrappeyResponse = self.send(envelope).await?;
        if let Some(error) = response.error() {
            warn!(error = %error, "Scrappey returned an application-level error");
        }
        Ok(response)
    }

    /// Send a command envelope and return the raw JSON reply.
    ///
    /// For caller-extensible commands whose reply does not fit
    /// [`ScrappeyResponse`].
    pub async fn request_raw(&self, envelope: &Envelope) -> Result<Value> {
        self.send(envelope).await
    }

    /// Fetch a URL: `{"cmd": "request.get", "url": ...}` merged with
    /// `options` (options win on collision).
    pub async fn get(&self, url: &str, options: &RequestOptions) -> Result<ScrappeyResponse> {
        let mut envelope = Command::Get.envelope();
        envelope.insert("url".to_string(), Value::String(url.to_string()));
        options.apply_to(&mut envelope)?;
        self.request(&envelope).await
    }

    /// POST to a URL. `post_data` may be a form-encoded string or any
    /// serializable structure; the remote side interprets it per the
    /// request's content-type header.
    pub async fn post<T: Serialize>(
        &self,
        url: &str,
        post_data: T,
        options: &RequestOptions,
    ) -> Result<ScrappeyResponse> {
        self.request_with_body(Command::Post, url, post_data, options)
            .await
    }

    /// PUT to a URL, same shape as [`ScrappeyClient::post`].
    pub async fn put<T: Serialize>(
        &self,
        url: &str,
        post_data: T,
        options: &RequestOptions,
    ) -> Result<ScrappeyResponse> {
        self.request_with_body(Command::Put, url, post_data, options)
            .await
    }

    /// PATCH a URL, same shape as [`ScrappeyClient::post`].
    pub async fn patch<T: Serialize>(
        &self,
        url: &str,
        post_data: T,
        options: &RequestOptions,
    ) -> Result<ScrappeyResponse> {
        self.request_with_body(Command::Patch, url, post_data, options)
            .await
    }

    /// DELETE a URL.
    pub async fn delete(&self, url: &str, options: &RequestOptions) -> Result<ScrappeyResponse> {
        let mut envelope = Command::Delete.envelope();
        envelope.insert("url".to_string(), Value::String(url.to_string()));
        options.apply_to(&mut envelope)?;
        self.request(&envelope).await
    }

    /// Create a browser session. The returned
    /// [`ScrappeyResponse::session`] identifies the remote tab; persist it
    /// and pass it to later calls to reuse cookies and state.
    pub async fn create_session(&self, options: &SessionOptions) -> Result<ScrappeyResponse> {
        let mut envelope = Command::SessionCreate.envelope();
        options.apply_to(&mut envelope)?;
        self.request(&envelope).await
    }

    /// Destroy a session. The server owns session lifetime otherwise
    /// (idle sessions expire on their own).
    pub async fn destroy_session(&self, session: &str) -> Result<ScrappeyResponse> {
        let mut envelope = Command::SessionDestroy.envelope();
        envelope.insert("session".to_string(), Value::String(session.to_string()));
        self.request(&envelope).await
    }

    /// List active sessions for a user. Check [`SessionList::is_error`]
    /// before trusting the list.
    pub async fn list_sessions(&self, user_id: u64) -> Result<SessionList> {
        let mut envelope = Command::SessionList.envelope();
        envelope.insert("userId".to_string(), Value::from(user_id));
        let sessions: SessionList = self.send(&envelope).await?;
        if let Some(error) = sessions.error() {
            warn!(error = %error, "Scrappey returned an application-level error");
        }
        Ok(sessions)
    }

    /// Check whether a session is still alive on the server. Check
    /// [`SessionActive::is_error`] before trusting the flag.
    pub async fn is_session_active(&self, session: &str) -> Result<SessionActive> {
        let mut envelope = Command::SessionActive.envelope();
        envelope.insert("session".to_string(), Value::String(session.to_string()));
        let active: SessionActive = self.send(&envelope).await?;
        if let Some(error) = active.error() {
            warn!(error = %error, "Scrappey returned an application-level error");
        }
        Ok(active)
    }

    async fn request_with_body<T: Serialize>(
        &self,
        command: Command,
        url: &str,
        post_data: T,
        options: &RequestOptions,
    ) -> Result<ScrappeyResponse> {
        let post_data = serde_json::to_value(post_data).map_err(ScrappeyError::Encoding)?;

        let mut envelope = command.envelope();
        envelope.insert("url".to_string(), Value::String(url.to_string()));
        envelope.insert("postData".to_string(), post_data);
        options.apply_to(&mut envelope)?;
        self.request(&envelope).await
    }

    async fn send<T: DeserializeOwned>(&self, envelope: &Envelope) -> Result<T> {
        let cmd = envelope
            .get("cmd")
            .and_then(Value::as_str)
            .filter(|cmd| !cmd.is_empty())
            .ok_or(ScrappeyError::MissingCommand)?
            .to_string();

        let body = serde_json::to_vec(envelope).map_err(ScrappeyError::Encoding)?;

        debug!(cmd = %cmd, bytes = body.len(), "sending request to Scrappey");

        let mut request = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        // A per-request timeout option also governs the transport, so a
        // caller asking the remote side for more than the client default
        // is not cut off locally first.
        if let Some(millis) = envelope.get("timeout").and_then(Value::as_u64) {
            request = request.timeout(Duration::from_millis(millis));
        }

        let response = request
            .send()
            .await
            .map_err(ScrappeyError::Transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ScrappeyError::Transport)?;

        debug!(cmd = %cmd, status = %status, bytes = body.len(), "received response from Scrappey");

        serde_json::from_str(&body).map_err(ScrappeyError::Decoding)
    }
}
