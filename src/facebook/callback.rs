// Eucaby - location sharing for mobile
// Copyright (C) 2025 Eucaby contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! OAuth redirect handling
//!
//! When Facebook finishes the implicit-grant dialog it redirects the popup to
//! the configured redirect URL. The token or the error is carried either in
//! the fragment or in the query, depending on the platform:
//!
//! ```text
//! oauthcallback.html?#access_token=some_token
//! oauthcallback.html?access_token=some_token#
//! oauthcallback.html?error=access_denied&error_reason=user_denied#
//! ```
//!
//! The popup shell passes whatever it captured to `OAuthCallback::deliver()`,
//! which settles the `PendingAuthorization` awaited by the login.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::PopupAuthError;

/// Outcome of parsing a redirect target
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum OAuthRedirect {
    /// Facebook granted a token
    Token { access_token: String },

    /// Facebook reported an error (user denied, bad app id, ...)
    Denied { reason: PopupAuthError },

    /// Neither `access_token` nor `error` present
    Unrecognized,
}

/// Parse a redirect target, relative or absolute
///
/// Both the query and the fragment are searched. A non-empty `access_token`
/// wins over an `error` parameter.
pub fn parse_redirect(target: &str) -> OAuthRedirect {
    let (before_fragment, fragment) = match target.split_once('#') {
        Some((head, fragment)) => (head, fragment),
        None => (target, ""),
    };
    let query = before_fragment
        .split_once('?')
        .map(|(_, query)| query)
        .unwrap_or("");

    let mut access_token = None;
    let mut error = None;
    let mut error_reason = None;
    let mut error_description = None;

    for segment in [query, fragment] {
        for (key, value) in form_urlencoded::parse(segment.as_bytes()) {
            match key.as_ref() {
                "access_token" if !value.is_empty() => access_token = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_reason" => error_reason = Some(value.into_owned()),
                "error_description" => error_description = Some(value.into_owned()),
                _ => {}
            }
        }
    }

    if let Some(access_token) = access_token {
        return OAuthRedirect::Token { access_token };
    }

    match error {
        Some(error) => OAuthRedirect::Denied {
            reason: PopupAuthError {
                error,
                error_reason,
                error_description,
            },
        },
        None => OAuthRedirect::Unrecognized,
    }
}

type Settlement = Result<String, PopupAuthError>;

/// Handle through which the popup reports the redirect
///
/// Cloning is cheap; every clone settles the same pending authorization and
/// only the first settlement counts. Dropping every clone without settling
/// fails the authorization with `user_cancelled`.
#[derive(Debug, Clone)]
pub struct OAuthCallback {
    slot: Arc<Mutex<Option<oneshot::Sender<Settlement>>>>,
}

/// Receiving side of an in-flight authorization
#[derive(Debug)]
pub struct PendingAuthorization {
    receiver: oneshot::Receiver<Settlement>,
}

impl OAuthCallback {
    pub fn channel() -> (OAuthCallback, PendingAuthorization) {
        let (sender, receiver) = oneshot::channel();
        let callback = OAuthCallback {
            slot: Arc::new(Mutex::new(Some(sender))),
        };
        (callback, PendingAuthorization { receiver })
    }

    /// Settle with a captured redirect target
    ///
    /// Returns true if this call settled the authorization.
    pub fn deliver(&self, target: &str) -> bool {
        let settlement = match parse_redirect(target) {
            OAuthRedirect::Token { access_token } => Ok(access_token),
            OAuthRedirect::Denied { reason } => Err(reason),
            OAuthRedirect::Unrecognized => {
                warn!("OAuth redirect carried neither access_token nor error");
                Err(PopupAuthError::invalid_callback())
            }
        };
        self.settle(settlement)
    }

    /// Settle as cancelled, e.g. when the user closes the popup
    pub fn cancel(&self) -> bool {
        self.settle(Err(PopupAuthError::user_cancelled()))
    }

    pub fn is_settled(&self) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    fn settle(&self, settlement: Settlement) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match sender {
            Some(sender) => {
                debug!(success = settlement.is_ok(), "Settling OAuth authorization");
                sender.send(settlement).is_ok()
            }
            None => {
                warn!("OAuth authorization already settled, ignoring redirect");
                false
            }
        }
    }
}

impl PendingAuthorization {
    /// Wait for the popup to report back
    pub async fn wait(self) -> Result<String, PopupAuthError> {
        match self.receiver.await {
            Ok(settlement) => settlement,
            Err(_) => Err(PopupAuthError::user_cancelled()),
        }
    }
}
