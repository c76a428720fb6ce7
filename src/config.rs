//! Client configuration
//!
//! Endpoints and Facebook application settings. Defaults point at the
//! development backend; `ClientConfig::from_env()` overrides them from
//! `EUCABY_*` environment variables.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{EucabyError, Result};

pub const DEFAULT_API_ENDPOINT: &str = "http://api.eucaby-dev.appspot.com";
pub const FACEBOOK_AUTHORIZE_URL: &str = "https://www.facebook.com/dialog/oauth";
pub const FACEBOOK_GRAPH_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_REDIRECT_URL: &str = "https://www.facebook.com/connect/login_success.html";
pub const DEFAULT_FACEBOOK_SCOPE: &str = "email,user_friends";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Facebook application settings used to build the authorization URL
#[derive(Debug, Clone)]
pub struct FacebookConfig {
    pub app_id: String,
    pub redirect_url: Url,
    pub scope: Vec<String>,
    pub authorize_url: Url,
    pub graph_url: Url,
}

impl FacebookConfig {
    pub fn new(app_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            app_id: app_id.into(),
            redirect_url: Url::parse(DEFAULT_REDIRECT_URL)?,
            scope: parse_scope(DEFAULT_FACEBOOK_SCOPE),
            authorize_url: Url::parse(FACEBOOK_AUTHORIZE_URL)?,
            graph_url: Url::parse(FACEBOOK_GRAPH_URL)?,
        })
    }
}

/// Configuration for `EucabyApi`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Eucaby API, without trailing path
    pub api_endpoint: Url,

    /// Timeout applied to every HTTP request
    pub timeout: Duration,

    pub facebook: FacebookConfig,
}

impl ClientConfig {
    pub fn new(facebook_app_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_endpoint: Url::parse(DEFAULT_API_ENDPOINT)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            facebook: FacebookConfig::new(facebook_app_id)?,
        })
    }

    /// Load configuration from the environment
    ///
    /// `EUCABY_FACEBOOK_APP_ID` is required. `EUCABY_API_ENDPOINT`,
    /// `EUCABY_OAUTH_REDIRECT_URL`, `EUCABY_FACEBOOK_SCOPE` and
    /// `EUCABY_HTTP_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        let app_id = env::var("EUCABY_FACEBOOK_APP_ID")
            .map_err(|_| EucabyError::Config("EUCABY_FACEBOOK_APP_ID must be set".to_string()))?;
        let mut config = Self::new(app_id)?;

        if let Ok(endpoint) = env::var("EUCABY_API_ENDPOINT") {
            config = config.with_api_endpoint(&endpoint)?;
        }
        if let Ok(redirect) = env::var("EUCABY_OAUTH_REDIRECT_URL") {
            config.facebook.redirect_url = Url::parse(&redirect)?;
        }
        if let Ok(scope) = env::var("EUCABY_FACEBOOK_SCOPE") {
            config.facebook.scope = parse_scope(&scope);
        }
        if let Ok(secs) = env::var("EUCABY_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                EucabyError::Config(format!("EUCABY_HTTP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)?;
        if url.cannot_be_a_base() {
            return Err(EucabyError::Config(format!("API endpoint is not a base URL: {endpoint}")));
        }
        self.api_endpoint = url;
        Ok(self)
    }

    pub fn with_graph_url(mut self, graph_url: &str) -> Result<Self> {
        self.facebook.graph_url = Url::parse(graph_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Split a comma or whitespace separated scope list
fn parse_scope(scope: &str) -> Vec<String> {
    scope
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
