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


//! Eucaby API HTTP client
//!
//! # API Endpoints
//!
//! ## Token exchange
//! **POST** `/oauth/token`
//!
//! Form body:
//! ```text
//! service=facebook&grant_type=password&username=<facebook id>&password=<facebook token>
//! ```
//!
//! Response (200):
//! ```json
//! {
//!   "access_token": "AABBCC",
//!   "expires_in": 2592000,
//!   "refresh_token": "ABCABC",
//!   "scope": "profile history location",
//!   "token_type": "Bearer"
//! }
//! ```
//!
//! Any other status carries a JSON error object, e.g. `{"error": "Server error"}`.
//!
//! ## Authenticated requests
//! **GET** `/<path>` with `Authorization: Bearer <access_token>`

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::auth::{mask_token, EucabyAuth};
use crate::config::ClientConfig;
use crate::error::{BackendAuthError, EucabyError, Result};
use crate::facebook::FacebookProfile;

/// Service name the backend expects for Facebook-issued credentials
const FACEBOOK_SERVICE: &str = "facebook";
const PASSWORD_GRANT: &str = "password";

#[derive(Debug, Clone)]
pub struct EucabyClient {
    http: Client,
    endpoint: String,
}

impl EucabyClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("eucaby-core/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, config.api_endpoint.as_str()))
    }

    pub fn with_client(http: Client, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Exchange a Facebook token for an Eucaby token pair
    pub async fn request_token(
        &self,
        profile: &FacebookProfile,
        facebook_token: &str,
    ) -> std::result::Result<EucabyAuth, BackendAuthError> {
        debug!(
            username = %profile.id,
            token = %mask_token(facebook_token),
            "Requesting Eucaby token"
        );

        let form = [
            ("service", FACEBOOK_SERVICE),
            ("grant_type", PASSWORD_GRANT),
            ("username", profile.id.as_str()),
            ("password", facebook_token),
        ];

        let response = self
            .http
            .post(self.url("/oauth/token"))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!("Token request failed: {}", e);
                BackendAuthError {
                    status: None,
                    body: Value::String(e.to_string()),
                }
            })?;

        let status = response.status();
        let body = read_body(response).await.map_err(|e| BackendAuthError {
            status: Some(status.as_u16()),
            body: Value::String(e.to_string()),
        })?;

        if !status.is_success() {
            warn!("Token endpoint returned error status: {}", status);
            return Err(BackendAuthError {
                status: Some(status.as_u16()),
                body,
            });
        }

        serde_json::from_value::<EucabyAuth>(body.clone()).map_err(|e| {
            warn!("Token response did not decode: {}", e);
            BackendAuthError {
                status: Some(status.as_u16()),
                body,
            }
        })
    }

    /// Authenticated GET returning the JSON body
    pub async fn get(&self, path: &str, access_token: &str) -> Result<Value> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        let body = read_body(response).await?;
        if !status.is_success() {
            return Err(EucabyError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// JSON body, or the raw text when it is not JSON
async fn read_body(response: Response) -> std::result::Result<Value, reqwest::Error> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn profile() -> FacebookProfile {
        serde_json::from_value(json!({"id": 123, "name": "Test User"})).unwrap()
    }

    fn client(server: &MockServer) -> EucabyClient {
        EucabyClient::with_client(Client::new(), &format!("{}/", server.uri()))
    }

    #[tokio::test]
    async fn posts_facebook_credentials_as_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("service=facebook"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("username=123"))
            .and(body_string_contains("password=some_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "AABBCC",
                "expires_in": 2592000,
                "refresh_token": "ABCABC",
                "scope": "profile history location",
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = client(&server).request_token(&profile(), "some_token").await.unwrap();
        assert_eq!(auth.access_token, "AABBCC");
        assert_eq!(auth.refresh_token, "ABCABC");
    }

    #[tokio::test]
    async fn error_body_is_returned_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Server error"})))
            .mount(&server)
            .await;

        let err = client(&server).request_token(&profile(), "some_token").await.unwrap_err();
        assert_eq!(err.status, Some(500));
        assert_eq!(err.body, json!({"error": "Server error"}));
    }

    #[tokio::test]
    async fn undecodable_success_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client(&server).request_token(&profile(), "some_token").await.unwrap_err();
        assert_eq!(err.status, Some(200));
        assert_eq!(err.body, json!("<html>maintenance</html>"));
    }

    #[tokio::test]
    async fn unreachable_backend_has_no_status() {
        let client = EucabyClient::with_client(Client::new(), "http://127.0.0.1:9");
        let err = client.request_token(&profile(), "some_token").await.unwrap_err();
        assert_eq!(err.status, None);
    }

    #[tokio::test]
    async fn get_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("authorization", "Bearer AABBCC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"username": "123"}})))
            .mount(&server)
            .await;

        let body = client(&server).get("me", "AABBCC").await.unwrap();
        assert_eq!(body["data"]["username"], "123");
    }

    #[tokio::test]
    async fn get_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid token"})))
            .mount(&server)
            .await;

        let err = client(&server).get("/me", "expired").await.unwrap_err();
        match err {
            EucabyError::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body["message"], "Invalid token");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
