//! HTTP helpers for the identity service JSON API with consistent timeouts and
//! error handling. Feature clients use these helpers to avoid duplicating
//! request setup. The helpers never store tokens; they attach the bearer token
//! a caller hands them and rely on the shared cookie jar for the refresh
//! credential.

use super::{config::AppConfig, errors::AppError};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, Instrument, info_span};

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// JSON client bound to one base URL. Clones share the connection pool and
/// the cookie jar that carries the refresh credential.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client for the accounts collection of the configured API.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.accounts_url(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches JSON, attaching the bearer token when one is held.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, AppError> {
        let response = self.send(Method::GET, path, None::<&()>, token).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, AppError> {
        let response = self.send(Method::POST, path, Some(body), token).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and ignores any response body.
    pub async fn post_json_empty<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<(), AppError> {
        let response = self.send(Method::POST, path, Some(body), token).await?;
        handle_empty_response(response).await
    }

    /// Replaces a record and parses the updated representation.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, AppError> {
        let response = self.send(Method::PUT, path, Some(body), token).await?;
        handle_json_response(response).await
    }

    /// Deletes a record and ignores any response body.
    pub async fn delete(&self, path: &str, token: Option<&SecretString>) -> Result<(), AppError> {
        let response = self.send(Method::DELETE, path, None::<&()>, token).await?;
        handle_empty_response(response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&SecretString>,
    ) -> Result<Response, AppError> {
        let url = build_url(&self.base_url, path);
        let span = info_span!("accounts.request", http.method = %method, url = %url);

        let mut builder: RequestBuilder = self.client.request(method, &url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        debug!(status = response.status().as_u16(), "identity service responded");

        Ok(response)
    }
}

/// Builds a URL from an explicit base URL and the provided path.
pub(crate) fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');

    if path.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        format!("/{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Maps transport errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with the service message.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let text = response
        .text()
        .await
        .map_err(|err| AppError::Parse(format!("Failed to read response: {err}")))?;
    let text = if text.trim().is_empty() { "null" } else { text.as_str() };

    serde_json::from_str(text)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

/// Handles empty responses and returns HTTP errors when needed.
async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::from_status(status.as_u16(), error_message(status, &body))
}

/// Prefers the service's `{ message }`, then the sanitized body, then the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed.")
            .to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
