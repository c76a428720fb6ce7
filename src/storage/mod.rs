//! Key/value storage for login tokens
//!
//! The mobile shells hand the core a store that lives for the whole
//! application session. `MemoryStore` backs tests and short-lived sessions,
//! `SqliteStore` persists across restarts.
//!
//! # Keys
//! - `fbtoken` - Facebook access token, raw key shared with the Facebook login
//! - `ec_access_token`, `ec_refresh_token` - Eucaby token pair, namespaced

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StorageError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Facebook token key (not namespaced)
pub const FB_TOKEN_KEY: &str = "fbtoken";

/// Prefix applied to every Eucaby key
pub const NAMESPACE: &str = "ec_";

pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";

/// Namespaced storage key for an Eucaby value
pub fn namespaced(key: &str) -> String {
    format!("{NAMESPACE}{key}")
}

/// Async string key/value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
