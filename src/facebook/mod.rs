//! Facebook login via the OAuth implicit grant
//!
//! `FacebookLogin` builds the dialog URL, drives the popup through a
//! `PopupLauncher` and waits for the redirect. The Facebook token lives in the
//! shared store under `fbtoken`.

pub mod callback;
pub mod graph;
pub mod popup;
pub mod profile;

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::config::FacebookConfig;
use crate::error::{PopupAuthError, StorageError};
use crate::storage::{KeyValueStore, FB_TOKEN_KEY};

pub use callback::{parse_redirect, OAuthCallback, OAuthRedirect, PendingAuthorization};
pub use graph::{GraphClient, ProfileFetcher};
pub use popup::PopupLauncher;
pub use profile::FacebookProfile;

pub struct FacebookLogin {
    config: FacebookConfig,
    launcher: Arc<dyn PopupLauncher>,
    store: Arc<dyn KeyValueStore>,
}

impl FacebookLogin {
    pub fn new(
        config: FacebookConfig,
        launcher: Arc<dyn PopupLauncher>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            launcher,
            store,
        }
    }

    pub fn config(&self) -> &FacebookConfig {
        &self.config
    }

    /// Dialog URL requesting a token in the redirect
    pub fn authorize_url(&self) -> Url {
        let mut url = self.config.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.app_id)
            .append_pair("redirect_uri", self.config.redirect_url.as_str())
            .append_pair("response_type", "token")
            .append_pair("scope", &self.config.scope.join(","));
        url
    }

    /// Run the popup and wait for its redirect
    ///
    /// Returns the Facebook access token. Does not touch storage.
    pub async fn login(&self) -> Result<String, PopupAuthError> {
        let (callback, pending) = OAuthCallback::channel();
        info!("Opening Facebook login dialog");
        self.launcher.open(self.authorize_url(), callback).await?;
        pending.wait().await
    }

    /// Stored Facebook token, if any
    pub async fn token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(FB_TOKEN_KEY).await
    }

    pub async fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(self.token().await?.is_some())
    }

    /// Forget the Facebook token
    pub async fn logout(&self) -> Result<(), StorageError> {
        self.store.remove(FB_TOKEN_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Delivers a fixed redirect and records the URL it was opened with
    struct FixedRedirect {
        redirect: &'static str,
        opened: Mutex<Option<Url>>,
    }

    #[async_trait]
    impl PopupLauncher for FixedRedirect {
        async fn open(&self, authorize_url: Url, callback: OAuthCallback) -> Result<(), PopupAuthError> {
            *self.opened.lock().unwrap() = Some(authorize_url);
            let redirect = self.redirect;
            tokio::spawn(async move {
                callback.deliver(redirect);
            });
            Ok(())
        }
    }

    fn login_with(redirect: &'static str) -> (FacebookLogin, Arc<FixedRedirect>, Arc<MemoryStore>) {
        let launcher = Arc::new(FixedRedirect {
            redirect,
            opened: Mutex::new(None),
        });
        let store = Arc::new(MemoryStore::new());
        let config = FacebookConfig::new("4242").unwrap();
        let login = FacebookLogin::new(config, launcher.clone(), store.clone());
        (login, launcher, store)
    }

    #[test]
    fn authorize_url_requests_token() {
        let (login, _, _) = login_with("");
        let url = login.authorize_url();
        assert_eq!(url.host_str(), Some("www.facebook.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "4242".into())));
        assert!(pairs.contains(&("response_type".into(), "token".into())));
        assert!(pairs.contains(&("scope".into(), "email,user_friends".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "https://www.facebook.com/connect/login_success.html".into()
        )));
    }

    #[tokio::test]
    async fn login_resolves_after_asynchronous_redirect() {
        let (login, launcher, store) = login_with("oauthcallback.html?#access_token=some_token");
        assert_eq!(login.login().await.unwrap(), "some_token");
        assert!(launcher.opened.lock().unwrap().is_some());
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_forgets_token() {
        let (login, _, store) = login_with("");
        store.set(FB_TOKEN_KEY, "some_token").await.unwrap();
        assert!(login.is_logged_in().await.unwrap());

        login.logout().await.unwrap();
        assert!(!login.is_logged_in().await.unwrap());
    }
}
