//! Eucaby token pair
//!
//! Issued by `POST /oauth/token` in exchange for a Facebook token. Only the
//! two token strings are persisted; the rest is informational.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct EucabyAuth {
    pub access_token: String,

    pub refresh_token: String,

    /// Lifetime of `access_token` in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// Space separated, e.g. "profile history location"
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Anything else the backend sent along with the tokens
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Debug for EucabyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EucabyAuth")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Shorten a token for log output
pub(crate) fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if visible.len() == token.len() {
        "***".to_string()
    } else {
        format!("{visible}***")
    }
}
