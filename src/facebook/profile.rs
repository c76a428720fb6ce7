//! Facebook user profile as returned by `GET /me`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fields requested from the Graph API
pub const PROFILE_FIELDS: &str =
    "id,first_name,last_name,name,email,gender,locale,link,timezone,updated_time,verified";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookProfile {
    /// App-scoped user id. The Graph API sends a string, older SDKs a number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Absent for accounts registered with a phone number
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub link: Option<String>,

    /// Offset from UTC in hours
    #[serde(default)]
    pub timezone: Option<f64>,

    #[serde(default)]
    pub updated_time: Option<String>,

    #[serde(default)]
    pub verified: Option<bool>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for id, got {other}"
        ))),
    }
}
