//! Eucaby API client and login
//!
//! `EucabyApi` runs the Facebook-to-Eucaby token exchange and keeps the
//! resulting pair in storage. `EucabyClient` is the HTTP layer underneath.

pub mod auth;
pub mod client;
pub mod login;

// Re-export commonly used types
pub use auth::EucabyAuth;
pub use client::EucabyClient;
pub use login::EucabyApi;
