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


//! Login orchestration
//!
//! # Login Flow
//! 1. Facebook dialog via the popup launcher
//!    - failure: `LoginError::Popup` with the redirect's error parameters
//! 2. Store the Facebook token under `fbtoken`
//! 3. Fetch the Facebook profile
//!    - failure: `LoginError::Profile`, `fbtoken` stays stored
//! 4. `POST /oauth/token` with the profile id and Facebook token
//!    - failure: `LoginError::Backend`, `fbtoken` stays stored
//!    - success: store `ec_access_token` and `ec_refresh_token`, drop
//!      `fbtoken`
//!
//! Nothing is rolled back on failure. A stored `fbtoken` lets the caller see
//! that the Facebook step already succeeded.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::auth::{mask_token, EucabyAuth};
use super::client::EucabyClient;
use crate::config::ClientConfig;
use crate::error::{EucabyError, LoginError, Result, StorageError};
use crate::facebook::{FacebookLogin, PopupLauncher, ProfileFetcher};
use crate::storage::{namespaced, KeyValueStore, ACCESS_TOKEN, FB_TOKEN_KEY, REFRESH_TOKEN};

/// Entry point used by the mobile shells
pub struct EucabyApi {
    client: EucabyClient,
    facebook: FacebookLogin,
    profiles: Arc<dyn ProfileFetcher>,
    store: Arc<dyn KeyValueStore>,
}

impl EucabyApi {
    /// Wire the login against a session-wide store
    pub fn init(
        config: &ClientConfig,
        launcher: Arc<dyn PopupLauncher>,
        profiles: Arc<dyn ProfileFetcher>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let client = EucabyClient::new(config)?;
        let facebook = FacebookLogin::new(config.facebook.clone(), launcher, store.clone());
        Ok(Self::from_parts(client, facebook, profiles, store))
    }

    pub fn from_parts(
        client: EucabyClient,
        facebook: FacebookLogin,
        profiles: Arc<dyn ProfileFetcher>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            client,
            facebook,
            profiles,
            store,
        }
    }

    pub fn client(&self) -> &EucabyClient {
        &self.client
    }

    pub fn facebook(&self) -> &FacebookLogin {
        &self.facebook
    }

    /// Log in with Facebook and obtain an Eucaby token pair
    pub async fn login(&self) -> std::result::Result<EucabyAuth, LoginError> {
        let facebook_token = self.facebook.login().await.map_err(|e| {
            warn!("Facebook login failed: {}", e.error);
            e
        })?;
        info!(token = %mask_token(&facebook_token), "Facebook login succeeded");

        self.store.set(FB_TOKEN_KEY, &facebook_token).await?;

        let profile = self.profiles.fetch_profile(&facebook_token).await.map_err(|e| {
            warn!("Facebook profile request failed");
            e
        })?;
        info!(user_id = %profile.id, "Fetched Facebook profile");

        let auth = self.client.request_token(&profile, &facebook_token).await?;

        self.store
            .set(&namespaced(ACCESS_TOKEN), &auth.access_token)
            .await?;
        self.store
            .set(&namespaced(REFRESH_TOKEN), &auth.refresh_token)
            .await?;
        self.store.remove(FB_TOKEN_KEY).await?;

        info!(user_id = %profile.id, "Eucaby login complete");
        Ok(auth)
    }

    pub async fn access_token(&self) -> std::result::Result<Option<String>, StorageError> {
        self.store.get(&namespaced(ACCESS_TOKEN)).await
    }

    pub async fn refresh_token(&self) -> std::result::Result<Option<String>, StorageError> {
        self.store.get(&namespaced(REFRESH_TOKEN)).await
    }

    pub async fn is_logged_in(&self) -> std::result::Result<bool, StorageError> {
        Ok(self.access_token().await?.is_some())
    }

    /// Authenticated GET against the Eucaby API
    pub async fn request(&self, path: &str) -> Result<Value> {
        let token = self
            .access_token()
            .await?
            .ok_or(EucabyError::NotAuthenticated)?;
        self.client.get(path, &token).await
    }
}
