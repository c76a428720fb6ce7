//! Desktop driver for the Eucaby login
//!
//! ```bash
//! EUCABY_FACEBOOK_APP_ID=... cargo run --features cli --bin eucaby-cli -- login --db eucaby.db
//! ```
//!
//! There is no webview on the desktop: the dialog URL is printed, and the
//! redirect URL from the browser's address bar is pasted back.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use eucaby_core::config::ClientConfig;
use eucaby_core::error::PopupAuthError;
use eucaby_core::facebook::{parse_redirect, GraphClient, OAuthCallback, OAuthRedirect, PopupLauncher};
use eucaby_core::storage::SqliteStore;
use eucaby_core::EucabyApi;

#[derive(Parser)]
#[command(name = "eucaby-cli", about = "Eucaby login from the terminal")]
struct Cli {
    /// Key/value database holding the tokens
    #[arg(long, default_value = "eucaby.db", global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full Facebook to Eucaby login
    Login,
    /// Print the Facebook dialog URL
    AuthorizeUrl,
    /// Parse a redirect URL and show what it carries
    ParseRedirect { url: String },
    /// Show which tokens are stored
    Status,
    /// Authenticated GET against the Eucaby API
    Get { path: String },
}

/// Popup that asks the user to open the dialog and paste the redirect
struct TerminalPopup;

#[async_trait]
impl PopupLauncher for TerminalPopup {
    async fn open(&self, authorize_url: Url, callback: OAuthCallback) -> Result<(), PopupAuthError> {
        println!("\nOpen this URL in a browser and log in:\n\n  {authorize_url}\n");
        let line = tokio::task::spawn_blocking(|| prompt("Paste the redirect URL: "))
            .await
            .map_err(|_| PopupAuthError::user_cancelled())?
            .map_err(|_| PopupAuthError::user_cancelled())?;

        if line.is_empty() {
            callback.cancel();
        } else {
            callback.deliver(&line);
        }
        Ok(())
    }
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::ParseRedirect { url } => match parse_redirect(&url) {
            OAuthRedirect::Token { access_token } => println!("access_token: {access_token}"),
            OAuthRedirect::Denied { reason } => println!("{}", serde_json::to_string_pretty(&reason)?),
            OAuthRedirect::Unrecognized => println!("no access_token or error in redirect"),
        },
        Command::Login => {
            let api = build_api(&cli.db).await?;
            let auth = api.login().await?;
            info!("Logged in");
            if let Some(token_type) = &auth.token_type {
                println!("token_type: {token_type}");
            }
            if let Some(scope) = &auth.scope {
                println!("scope:      {scope}");
            }
            if let Some(expires_in) = auth.expires_in {
                println!("expires_in: {expires_in}s");
            }
        }
        Command::AuthorizeUrl => {
            let api = build_api(&cli.db).await?;
            println!("{}", api.facebook().authorize_url());
        }
        Command::Status => {
            let api = build_api(&cli.db).await?;
            println!("logged in: {}", api.is_logged_in().await?);
            println!("facebook token pending: {}", api.facebook().is_logged_in().await?);
        }
        Command::Get { path } => {
            let api = build_api(&cli.db).await?;
            let body = api.request(&path).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

async fn build_api(db: &Path) -> Result<EucabyApi> {
    let config = ClientConfig::from_env().context("loading configuration")?;
    let store = Arc::new(
        SqliteStore::open(db)
            .await
            .with_context(|| format!("opening {}", db.display()))?,
    );
    let profiles = Arc::new(GraphClient::new(&config)?);
    Ok(EucabyApi::init(&config, Arc::new(TerminalPopup), profiles, store)?)
}
