use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::{
    client::{Endpoints, HTTP_TIMEOUT_SECONDS, USER_AGENT},
    configuration::AppCredentials,
    token::{StoredToken, TokenStoreError},
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },
    #[error("failed to build authorization URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to start callback listener on {addr}: {cause}")]
    ListenerFailed {
        addr: String,
        cause: std::io::Error,
    },
    #[error("callback listener failed: {0}")]
    ServerFailed(std::io::Error),
    #[error("state mismatch")]
    StateMismatch,
    #[error("no code in callback")]
    MissingCode,
    #[error("Auth timeout")]
    Timeout,
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

/// Successful response body of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

impl TokenResponse {
    pub fn into_stored(self) -> StoredToken {
        StoredToken::issued_at(
            self.access_token,
            self.refresh_token,
            self.expires_in,
            Utc::now(),
        )
    }
}

/// Client for the OAuth2 token endpoint.
///
/// Both grants this CLI uses (authorization code and refresh token) post a
/// form body carrying the app credentials.
pub struct AuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl AuthClient {
    pub fn new(credentials: &AppCredentials, endpoints: &Endpoints) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            token_url: endpoints.token_url.clone(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
        })
    }

    /// Trades an authorization code for a token pair.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<StoredToken, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        self.request_token(&params).await
    }

    /// Mints a new token pair from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<StoredToken, AuthError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<StoredToken, AuthError> {
        tracing::debug!(
            "Requesting token ({}) from {}",
            params
                .iter()
                .find(|(key, _)| *key == "grant_type")
                .map(|(_, value)| *value)
                .unwrap_or("unknown"),
            &self.token_url
        );

        let response = self.http.post(&self.token_url).form(params).send().await?;
        let status = response.status();
        tracing::debug!("Token endpoint response status: {}", status);

        if status.is_success() {
            let body = response.bytes().await?;
            let token: TokenResponse = serde_json::from_slice(&body)?;
            Ok(token.into_stored())
        } else {
            let body = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to read token error response body: {}", e);
                    String::new()
                }
            };
            Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body: describe_token_error(&body),
            })
        }
    }
}

/// Turns an OAuth error body into a readable message, falling back to the raw body.
fn describe_token_error(body: &str) -> String {
    let Ok(error_json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let Some(error) = error_json.get("error").and_then(|v| v.as_str()) else {
        return body.trim().to_string();
    };

    let description = error_json
        .get("error_description")
        .and_then(|v| v.as_str())
        .map(|d| format!(" - {}", d))
        .unwrap_or_default();

    match error {
        "invalid_client" => format!(
            "Invalid client credentials{}. Please check client_id and client_secret in config.json.",
            description
        ),
        "invalid_grant" => format!(
            "Invalid grant{}. The authorization code or refresh token is invalid or expired.",
            description
        ),
        _ => format!("{}{}", error, description),
    }
}
