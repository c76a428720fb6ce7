//! Error types for the Eucaby mobile core
//!
//! `EucabyError` is the crate-wide error. The login exchange has its own
//! `LoginError` so that callers can tell which stage failed: the popup, the
//! Facebook profile request or the Eucaby token request. Each stage error
//! carries the upstream payload untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EucabyError>;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum EucabyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Eucaby API returned {status}: {body}")]
    Api { status: u16, body: Value },

    #[error(transparent)]
    Login(#[from] LoginError),
}

/// Key/value storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Failure of a `login()` call, by stage
#[derive(Debug, Error)]
pub enum LoginError {
    /// The Facebook popup reported an error or was closed
    #[error(transparent)]
    Popup(#[from] PopupAuthError),

    /// The Facebook profile request failed
    #[error(transparent)]
    Profile(#[from] ProfileFetchError),

    /// The Eucaby token endpoint rejected the exchange
    #[error(transparent)]
    Backend(#[from] BackendAuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error parameters delivered on the OAuth redirect
///
/// Serializes to the same object Facebook put on the redirect, e.g.
/// `{"error": "access_denied"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error, uniffi::Record)]
#[error("Facebook authorization failed: {error}")]
pub struct PopupAuthError {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl PopupAuthError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_reason: None,
            error_description: None,
        }
    }

    /// The popup was closed before a redirect arrived
    pub fn user_cancelled() -> Self {
        Self {
            error: "user_cancelled".to_string(),
            error_reason: Some("user_cancelled".to_string()),
            error_description: Some("User cancelled login process".to_string()),
        }
    }

    /// The redirect carried neither a token nor an error
    pub fn invalid_callback() -> Self {
        Self {
            error: "invalid_callback".to_string(),
            error_reason: None,
            error_description: Some("Redirect did not contain access_token or error".to_string()),
        }
    }
}

/// Opaque failure payload from the Facebook profile request
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Facebook profile request failed: {0}")]
pub struct ProfileFetchError(pub Value);

impl ProfileFetchError {
    pub fn payload(&self) -> &Value {
        &self.0
    }
}

impl From<&str> for ProfileFetchError {
    fn from(message: &str) -> Self {
        Self(Value::String(message.to_string()))
    }
}

/// Rejection from the Eucaby token endpoint
///
/// `status` is `None` when no response was received at all.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Eucaby token request failed ({}): {body}", status_label(.status))]
pub struct BackendAuthError {
    pub status: Option<u16>,
    pub body: Value,
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}
