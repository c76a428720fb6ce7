//! Facebook Graph API access
//!
//! Only the profile lookup is needed by the login. Failures are passed on as
//! an opaque payload: the Graph error object when Facebook answered, the
//! transport error text when it did not.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::profile::{FacebookProfile, PROFILE_FIELDS};
use crate::config::ClientConfig;
use crate::error::{ProfileFetchError, Result};

#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, access_token: &str) -> std::result::Result<FacebookProfile, ProfileFetchError>;
}

/// reqwest-based Graph API client
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: Client,
    graph_url: Url,
}

impl GraphClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(http, config.facebook.graph_url.clone()))
    }

    pub fn with_client(http: Client, graph_url: Url) -> Self {
        Self { http, graph_url }
    }

    fn me_url(&self) -> String {
        format!("{}/me", self.graph_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl ProfileFetcher for GraphClient {
    async fn fetch_profile(&self, access_token: &str) -> std::result::Result<FacebookProfile, ProfileFetchError> {
        debug!("Requesting Facebook profile");
        let response = self
            .http
            .get(self.me_url())
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| {
                warn!("Facebook profile request failed: {}", e);
                ProfileFetchError(Value::String(e.to_string()))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProfileFetchError(Value::String(e.to_string())))?;

        if !status.is_success() {
            warn!("Facebook API returned error status: {}", status);
            let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ProfileFetchError(payload));
        }

        serde_json::from_str::<FacebookProfile>(&text)
            .map_err(|e| ProfileFetchError(Value::String(format!("Failed to parse profile: {e}"))))
    }
}
