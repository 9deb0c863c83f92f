//! Authenticated access to the Oura cloud API.
//!
//! Two credential modes exist side by side:
//!
//! - user-scoped resources under `/v2/usercollection` are read with the
//!   user's OAuth access token (`Authorization: Bearer ...`), refreshed
//!   shortly before it expires;
//! - webhook subscription management under `/v2/webhook` is authenticated
//!   with the app credentials (`x-client-id` / `x-client-secret`) and never
//!   carries a bearer token.

use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    auth::{AuthClient, AuthError},
    configuration::AppCredentials,
    token::{TokenStore, TokenStoreError},
};

pub const AUTHORIZE_URL: &str = "https://cloud.ouraring.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://api.ouraring.com/oauth/token";
pub const API_BASE: &str = "https://api.ouraring.com/v2/usercollection";
pub const WEBHOOK_BASE: &str = "https://api.ouraring.com/v2/webhook";
pub const REDIRECT_URI: &str = "http://localhost:8081/callback";
pub const CALLBACK_ADDR: &str = "127.0.0.1:8081";

pub const USER_AGENT: &str = concat!("oura-cli/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Error emitted by the request dispatcher
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authenticated - run 'oura auth' first")]
    NotAuthenticated,
    #[error("token refresh failed - run 'oura auth' again: {0}")]
    RefreshFailed(String),
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("failed to encode query: {0}")]
    QueryEncoding(#[from] serde_urlencoded::ser::Error),
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Remote and local addresses used by the client and the authorization flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub api_base: String,
    pub webhook_base: String,
    pub redirect_uri: String,
    pub callback_addr: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            api_base: API_BASE.to_string(),
            webhook_base: WEBHOOK_BASE.to_string(),
            redirect_uri: REDIRECT_URI.to_string(),
            callback_addr: CALLBACK_ADDR.to_string(),
        }
    }
}

/// Read access to user-collection resources.
///
/// Handlers depend on this seam rather than on [`OuraClient`] so they can be
/// exercised against canned responses.
#[async_trait]
pub trait UserCollection: Send + Sync {
    /// GETs `path` below the user-collection base and returns the raw body.
    async fn api_get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ApiError>;
}

/// Access to webhook-subscription endpoints.
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// Sends a request below the webhook base, returning the body and status.
    async fn webhook_do(
        &self,
        method: Method,
        path: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<(Vec<u8>, StatusCode), ApiError>;
}

/// The request dispatcher for the Oura API.
pub struct OuraClient {
    http: reqwest::Client,
    credentials: AppCredentials,
    endpoints: Endpoints,
    store: TokenStore,
}

impl OuraClient {
    pub fn new(
        credentials: AppCredentials,
        endpoints: Endpoints,
        store: TokenStore,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            credentials,
            endpoints,
            store,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns a usable access token, refreshing it first when it is about to expire.
    pub async fn access_token(&self) -> Result<String, ApiError> {
        let token = self.store.load()?.ok_or(ApiError::NotAuthenticated)?;

        if !token.needs_refresh(Utc::now()) {
            return Ok(token.access_token);
        }

        debug!("Access token expires at {}, refreshing", token.expires_at);
        let refreshed = AuthClient::new(&self.credentials, &self.endpoints)
            .map_err(|e| ApiError::RefreshFailed(e.to_string()))?
            .refresh(&token.refresh_token)
            .await
            .map_err(|e| ApiError::RefreshFailed(e.to_string()))?;
        self.store
            .save(&refreshed)
            .map_err(|e| ApiError::RefreshFailed(e.to_string()))?;

        Ok(refreshed.access_token)
    }

    fn user_collection_url(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let mut url = format!("{}{}", self.endpoints.api_base, path);
        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query)?;
            url.push('?');
            url.push_str(&encoded);
        }
        Ok(url)
    }
}

#[async_trait]
impl UserCollection for OuraClient {
    async fn api_get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ApiError> {
        let token = self.access_token().await?;
        let url = self.user_collection_url(path, query)?;

        trace!("GET {}", url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("GET {} -> {}", path, status);

        if status != StatusCode::OK {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl WebhookApi for OuraClient {
    async fn webhook_do(
        &self,
        method: Method,
        path: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<(Vec<u8>, StatusCode), ApiError> {
        let url = format!("{}{}", self.endpoints.webhook_base, path);
        trace!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("x-client-id", &self.credentials.client_id)
            .header("x-client-secret", &self.credentials.client_secret);
        if let Some(payload) = payload {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&payload)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("{} {} -> {}", method, path, status);

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }
        Ok((body.to_vec(), status))
    }
}

/// Serializes a webhook request body.
pub fn webhook_payload<T: Serialize>(body: &T) -> Result<serde_json::Value, ApiError> {
    Ok(serde_json::to_value(body)?)
}

/// Bytes left as-is inside one path segment: unreserved characters plus the
/// sub-delimiters, `:` and `@`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Escapes one path segment (`%20` for spaces, `%2F` for slashes).
pub fn escape_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
