//! Client for the AirShop REST backend.
//!
//! One [`ApiClient`] serves both the public storefront endpoints and the
//! admin endpoints. Endpoint groups live in their own modules and are reached
//! through accessor methods:
//!
//! - [`ApiClient::auth`] - login, token verification, logout
//! - [`ApiClient::products`] - catalog reads (cached) and admin writes
//! - [`ApiClient::orders`] - order submission, lookup and management
//! - [`ApiClient::payment`] - gateway payment creation, status, refunds
//! - [`ApiClient::settings`] - site settings
//!
//! # Authentication
//!
//! When the [`CredentialSession`] holds a token it is sent as
//! `Authorization: Bearer <token>`. A 401 clears the stored credentials.
//!
//! Requests are never retried.

mod auth;
mod orders;
mod payment;
mod products;
mod settings;
mod types;

pub use auth::AuthApi;
pub use orders::OrdersApi;
pub use payment::PaymentApi;
pub use products::ProductsApi;
pub use settings::SettingsApi;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::session::CredentialSession;
use crate::storage::StorageError;
use products::CacheValue;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The stored token was rejected. Credentials have been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// 401 on a request made without a token (e.g. wrong password).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The payment gateway answered with `success: false`.
    #[error("Payment gateway declined: {0}")]
    Declined(String),

    /// Storing or clearing credentials failed.
    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Server faults and transport failures. Client-side problems such as
    /// bad credentials or a missing order are not reported.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) | Self::Storage(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::SessionExpired
            | Self::Unauthorized(_)
            | Self::RateLimited(_)
            | Self::NotFound(_)
            | Self::Declined(_) => false,
        }
    }
}

/// REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool, product cache and
/// credential session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    session: CredentialSession,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a client for the backend at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, session: CredentialSession) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                session,
                cache,
            }),
        })
    }

    /// Authentication endpoints.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Product endpoints.
    #[must_use]
    pub const fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    /// Order endpoints.
    #[must_use]
    pub const fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(self)
    }

    /// Payment endpoints.
    #[must_use]
    pub const fn payment(&self) -> PaymentApi<'_> {
        PaymentApi::new(self)
    }

    /// Site settings endpoints.
    #[must_use]
    pub const fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    /// Credential session used for the bearer token.
    #[must_use]
    pub fn session(&self) -> &CredentialSession {
        &self.inner.session
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    pub(crate) fn cache(&self) -> &Cache<String, CacheValue> {
        &self.inner.cache
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.client.get(self.url(path))).await
    }

    /// Execute a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        self.send(self.inner.client.get(self.url(path)).query(query))
            .await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.inner.client.post(self.url(path)).json(body))
            .await
    }

    /// Execute a POST request without a body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.client.post(self.url(path))).await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.inner.client.put(self.url(path)).json(body))
            .await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.client.delete(self.url(path))).await
    }

    /// Attach the bearer token, send, and decode.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let token = self.inner.session.token();
        let request = match &token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        self.handle_response(response, token.is_some()).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        sent_token: bool,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response, sent_token).await)
    }

    /// Map an error response to [`ApiError`].
    async fn parse_error(&self, response: reqwest::Response, sent_token: bool) -> ApiError {
        let status = response.status().as_u16();

        // Check for rate limiting
        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ApiError::RateLimited(retry_after);
        }

        let message = error_message(response).await;

        if status == 401 {
            if let Err(e) = self.inner.session.clear() {
                warn!(error = %e, "Failed to clear credentials after 401");
            }
            if sent_token {
                info!("Stored token rejected, credentials cleared");
                return ApiError::SessionExpired;
            }
            return ApiError::Unauthorized(message);
        }

        if status == 404 {
            return ApiError::NotFound(message);
        }

        if status >= 500 {
            error!(status, message = %message, "API request failed");
        } else {
            debug!(status, message = %message, "API request rejected");
        }
        ApiError::Api { status, message }
    }
}

/// Pull the backend's `{"error": ...}` message out of an error body, falling
/// back to the raw text.
async fn error_message(response: reqwest::Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            error: Some(message),
            ..
        })
        | Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ if text.trim().is_empty() => "Unknown error".to_string(),
        _ => text,
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}
