uniffi::setup_scaffolding!();

// Core modules
pub mod error;
pub mod config;
pub mod api;
pub mod facebook;
pub mod storage;

// Re-export commonly used types for convenience
pub use error::{EucabyError, LoginError, Result};
pub use api::{EucabyApi, EucabyAuth};
pub use facebook::OAuthRedirect;

/// Parse an OAuth redirect captured by the platform webview
///
/// Lets the shells decide whether to close the popup before handing the
/// redirect to the login.
#[uniffi::export]
pub fn parse_oauth_redirect(url: String) -> OAuthRedirect {
    facebook::parse_redirect(&url)
}
