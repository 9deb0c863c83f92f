//! Persistent storage for the OAuth token pair.
//!
//! The token file lives next to `config.json` and holds the current access
//! token, its refresh token, and the wall-clock instant after which the
//! access token is no longer accepted. Writes go through a temporary file in
//! the same directory that is renamed over `token.json`, so a reader never
//! observes a half-written file. There is no locking between processes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, trace};

use crate::configuration::{configuration_directory, ConfigurationError};

pub const DEFAULT_TOKEN_FILE_NAME: &str = "token.json";

/// How long before `expires_at` an access token is already treated as stale.
pub const REFRESH_MARGIN_MINUTES: i64 = 5;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error("failed to read token file {}: {cause}", .path.display())]
    FailedToRead {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("failed to parse token file {}: {cause}", .path.display())]
    FailedToParse {
        path: PathBuf,
        cause: serde_json::Error,
    },
    #[error("failed to write token file {}: {cause}", .path.display())]
    FailedToWrite {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("failed to serialize token: {0}")]
    FailedToSerialize(#[from] serde_json::Error),
}

/// The access/refresh token pair as persisted in `token.json`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredToken")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl StoredToken {
    /// Builds a token that expires `expires_in` seconds after `now`.
    pub fn issued_at(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: now + Duration::seconds(expires_in),
        }
    }

    /// True when `now` plus the refresh margin is past `expires_at`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::minutes(REFRESH_MARGIN_MINUTES) > self.expires_at
    }
}

/// File-backed token storage at a fixed path.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at `~/.config/oura/token.json`.
    pub fn default_location() -> Result<Self, TokenStoreError> {
        let mut path = configuration_directory()?;
        path.push(DEFAULT_TOKEN_FILE_NAME);
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored token; `Ok(None)` when no token file exists yet.
    pub fn load(&self) -> Result<Option<StoredToken>, TokenStoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(cause) if cause.kind() == ErrorKind::NotFound => {
                trace!("No token file at {}", self.path.display());
                return Ok(None);
            }
            Err(cause) => {
                return Err(TokenStoreError::FailedToRead {
                    path: self.path.clone(),
                    cause,
                })
            }
        };

        let token = serde_json::from_str(&data).map_err(|cause| TokenStoreError::FailedToParse {
            path: self.path.clone(),
            cause,
        })?;
        Ok(Some(token))
    }

    /// Replaces the stored token. The file is created with owner-only permissions.
    pub fn save(&self, token: &StoredToken) -> Result<(), TokenStoreError> {
        let json = serde_json::to_string_pretty(token)?;
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let write_error = |cause: std::io::Error| TokenStoreError::FailedToWrite {
            path: self.path.clone(),
            cause,
        };

        // NamedTempFile is created with mode 0600 on unix.
        let mut file = NamedTempFile::new_in(&directory).map_err(write_error)?;
        file.write_all(json.as_bytes()).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(&self.path)
            .map_err(|persist| write_error(persist.error))?;

        debug!(
            "Saved token to {} (expires at {})",
            self.path.display(),
            token.expires_at.to_rfc3339()
        );
        Ok(())
    }
}
