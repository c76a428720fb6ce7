//! Popup launcher seam
//!
//! Implemented by the platform shell (in-app browser on Android and iOS) or
//! by the desktop CLI. The launcher shows `authorize_url` and, once the
//! dialog redirects, hands the redirect target to the callback.

use async_trait::async_trait;
use url::Url;

use super::callback::OAuthCallback;
use crate::error::PopupAuthError;

#[async_trait]
pub trait PopupLauncher: Send + Sync {
    /// Open the Facebook dialog
    ///
    /// May return before the redirect arrives as long as `callback` (or a
    /// clone) is kept alive until then. An `Err` means the popup could not be
    /// opened at all.
    async fn open(&self, authorize_url: Url, callback: OAuthCallback) -> Result<(), PopupAuthError>;
}
