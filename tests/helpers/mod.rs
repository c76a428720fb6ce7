//! Test helpers for login flow tests
//!
//! Scripted popups and profile fetchers, fixtures matching what Facebook and
//! the Eucaby backend return, and a constructor wiring them to a mock server.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eucaby_core::config::ClientConfig;
use eucaby_core::error::{PopupAuthError, ProfileFetchError};
use eucaby_core::facebook::{FacebookProfile, OAuthCallback, PopupLauncher, ProfileFetcher};
use eucaby_core::storage::MemoryStore;
use eucaby_core::EucabyApi;
use serde_json::{json, Value};
use url::Url;

pub const SUCCESS_REDIRECT: &str = "oauthcallback.html?#access_token=some_token";
pub const ERROR_REDIRECT: &str = "oauthcallback.html?error=some_error#";

/// Profile as returned by the Graph API
pub fn fb_profile_json() -> Value {
    json!({
        "first_name": "Test", "last_name": "User", "verified": true,
        "name": "Test User", "locale": "en_US", "gender": "male",
        "email": "test@example.com", "id": 123,
        "link": "https://www.facebook.com/app_scoped_user_id/12345/",
        "timezone": -8, "updated_time": "2014-12-06T21:31:50+0000"
    })
}

pub fn fb_profile() -> FacebookProfile {
    serde_json::from_value(fb_profile_json()).expect("valid profile fixture")
}

/// Token pair as returned by `POST /oauth/token`
pub fn ec_auth_json() -> Value {
    json!({
        "access_token": "AABBCC",
        "expires_in": 2592000,
        "refresh_token": "ABCABC",
        "scope": "profile history location",
        "token_type": "Bearer"
    })
}

/// Popup that immediately reports a fixed redirect
pub struct ScriptedPopup {
    redirect: Option<String>,
    opened: Mutex<Vec<Url>>,
}

impl ScriptedPopup {
    pub fn redirecting_to(redirect: &str) -> Arc<Self> {
        Arc::new(Self {
            redirect: Some(redirect.to_string()),
            opened: Mutex::new(Vec::new()),
        })
    }

    /// Popup closed by the user without a redirect
    pub fn closed() -> Arc<Self> {
        Arc::new(Self {
            redirect: None,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl PopupLauncher for ScriptedPopup {
    async fn open(&self, authorize_url: Url, callback: OAuthCallback) -> Result<(), PopupAuthError> {
        self.opened.lock().unwrap().push(authorize_url);
        if let Some(redirect) = &self.redirect {
            callback.deliver(redirect);
        }
        Ok(())
    }
}

/// Profile fetcher with a canned answer that records the tokens it saw
pub struct StubProfiles {
    answer: Result<FacebookProfile, ProfileFetchError>,
    calls: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl StubProfiles {
    pub fn returning(profile: FacebookProfile) -> Arc<Self> {
        Self::with_answer(Ok(profile))
    }

    pub fn failing(payload: Value) -> Arc<Self> {
        Self::with_answer(Err(ProfileFetchError(payload)))
    }

    fn with_answer(answer: Result<FacebookProfile, ProfileFetchError>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileFetcher for StubProfiles {
    async fn fetch_profile(&self, access_token: &str) -> Result<FacebookProfile, ProfileFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(access_token.to_string());
        self.answer.clone()
    }
}

/// `EucabyApi` against `endpoint` with an in-memory store
pub fn api_for(
    endpoint: &str,
    popup: Arc<ScriptedPopup>,
    profiles: Arc<StubProfiles>,
) -> (EucabyApi, Arc<MemoryStore>) {
    let config = ClientConfig::new("4242")
        .and_then(|config| config.with_api_endpoint(endpoint))
        .expect("valid test config");
    let store = Arc::new(MemoryStore::new());
    let api = EucabyApi::init(&config, popup, profiles, store.clone()).expect("client builds");
    (api, store)
}
