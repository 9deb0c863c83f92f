//! Application credentials and the per-user configuration directory.
//!
//! The CLI identifies itself to the Oura cloud with a `client_id` /
//! `client_secret` pair that the user registers with Oura and stores in
//! `~/.config/oura/config.json`. The same directory holds the token file
//! managed by [`crate::token::TokenStore`].

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_APPLICATION_ID: &str = "oura";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.json";

const CONFIGURATION_TEMPLATE: &str = "{\n  \"client_id\": \"your-id\",\n  \"client_secret\": \"your-secret\"\n}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to create configuration directory {}: {cause}", .path.display())]
    FailedToCreateDirectory {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("missing config: {}\nCreate it with:\n{}", .path.display(), CONFIGURATION_TEMPLATE)]
    MissingFile { path: PathBuf },
    #[error("failed to read config {}: {cause}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("invalid config {}: {cause}\nExpected:\n{}", .path.display(), CONFIGURATION_TEMPLATE)]
    InvalidFile {
        path: PathBuf,
        cause: serde_json::Error,
    },
    #[error("missing value for property {name:?} in {}", .path.display())]
    MissingRequiredPropertyValue { name: String, path: PathBuf },
}

/// Returns `~/.config/oura`, creating it with owner-only permissions if needed.
pub fn configuration_directory() -> Result<PathBuf, ConfigurationError> {
    let mut directory = home_dir().ok_or(ConfigurationError::FailedToFindConfigurationDirectory)?;
    directory.push(".config");
    directory.push(DEFAULT_APPLICATION_ID);
    ensure_private_directory(&directory)?;
    Ok(directory)
}

pub(crate) fn ensure_private_directory(directory: &Path) -> Result<(), ConfigurationError> {
    if directory.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder
        .create(directory)
        .map_err(|cause| ConfigurationError::FailedToCreateDirectory {
            path: directory.to_path_buf(),
            cause,
        })
}

/// The identifier + secret pair registered for this CLI with the Oura cloud.
///
/// Read once at startup and passed by reference to the authorization flow
/// and the request dispatcher.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl AppCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        let mut path = configuration_directory()?;
        path.push(DEFAULT_CONFIGURATION_FILE_NAME);
        Ok(path)
    }

    pub fn load_default() -> Result<AppCredentials, ConfigurationError> {
        let path = Self::get_default_configuration_file_path()?;
        debug!("Loading app credentials from {}...", path.display());
        Self::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<AppCredentials, ConfigurationError> {
        let data = fs::read_to_string(path).map_err(|cause| match cause.kind() {
            ErrorKind::NotFound => ConfigurationError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => ConfigurationError::UnreadableFile {
                path: path.to_path_buf(),
                cause,
            },
        })?;

        let credentials: AppCredentials =
            serde_json::from_str(&data).map_err(|cause| ConfigurationError::InvalidFile {
                path: path.to_path_buf(),
                cause,
            })?;

        for (name, value) in [
            ("client_id", &credentials.client_id),
            ("client_secret", &credentials.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingRequiredPropertyValue {
                    name: name.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(credentials)
    }
}
