use thiserror::Error;

use crate::{
    args::ArgsError, auth::AuthError, client::ApiError, configuration::ConfigurationError,
    token::TokenStoreError,
};

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// The invocation does not match any usage of the command; the text is
    /// printed instead of an `Error:` line.
    #[error("{0}")]
    Usage(&'static str),
    #[error(transparent)]
    Args(#[from] ArgsError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A webhook flag value outside its enumerated set
    #[error("invalid {name}: {value:?} (try: oura webhook types)")]
    InvalidEnum { name: &'static str, value: String },
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("{0}")]
    MissingArgument(String),
    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),
    #[error("failed to parse response: {0}")]
    ResponseFormat(serde_json::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
