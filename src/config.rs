//! Configuration management for AI Mood DJ.
//!
//! This module loads configuration from environment variables and an optional
//! `.env` file, and resolves it once at start-up into a [`Settings`] value that
//! is handed to every component. Nothing in the crate reads the environment
//! after start-up.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_LOCAL_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";

/// Environment variable distinguishing hosted from local execution.
pub const DEPLOYMENT_SIGNAL: &str = "MOOD_DJ_DEPLOYMENT";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `mood-dj` directory if it doesn't exist and loads variables from
/// `mood-dj/.env` below the platform-specific local data directory. A missing
/// file is not an error: hosted deployments usually inject the variables
/// directly.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/mood-dj/.env`
/// - macOS: `~/Library/Application Support/mood-dj/.env`
/// - Windows: `%LOCALAPPDATA%/mood-dj/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
///
/// # Example
///
/// ```
/// use mood_dj::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mood-dj/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Where the application is running, which decides the OAuth redirect target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    /// Loopback execution on the user's machine.
    Local,
    /// Public deployment behind a callback address registered with Google.
    Hosted,
}

impl DeploymentMode {
    /// Resolves the mode from the value of [`DEPLOYMENT_SIGNAL`].
    ///
    /// Only `hosted` (any case, surrounding whitespace ignored) selects
    /// [`DeploymentMode::Hosted`]; an absent or different value means local.
    pub fn from_signal(signal: Option<&str>) -> Self {
        match signal {
            Some(value) if value.trim().eq_ignore_ascii_case("hosted") => DeploymentMode::Hosted,
            _ => DeploymentMode::Local,
        }
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub deployment: DeploymentMode,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub local_redirect_uri: String,
    pub hosted_redirect_uri: Option<String>,
    pub youtube_api_url: String,
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub server_address: String,
}

impl Settings {
    /// Resolves settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_lookup`].
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolves settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing variable when
    /// `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` or `GEMINI_API_KEY` is unset,
    /// or when the hosted mode is selected without `GOOGLE_REDIRECT_URI_HOSTED`.
    ///
    /// # Example
    ///
    /// ```
    /// let settings = Settings::from_lookup(|name| vars.get(name).cloned())?;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| value(name).ok_or_else(|| format!("{} must be set", name));
        let or_default = |name: &str, default: &str| value(name).unwrap_or_else(|| default.to_string());

        let deployment = DeploymentMode::from_signal(value(DEPLOYMENT_SIGNAL).as_deref());
        let hosted_redirect_uri = value("GOOGLE_REDIRECT_URI_HOSTED");
        if deployment == DeploymentMode::Hosted && hosted_redirect_uri.is_none() {
            return Err("GOOGLE_REDIRECT_URI_HOSTED must be set for hosted deployments".to_string());
        }

        Ok(Settings {
            deployment,
            google_client_id: required("GOOGLE_CLIENT_ID")?,
            google_client_secret: required("GOOGLE_CLIENT_SECRET")?,
            google_auth_url: or_default("GOOGLE_AUTH_URL", DEFAULT_AUTH_URL),
            google_token_url: or_default("GOOGLE_TOKEN_URL", DEFAULT_TOKEN_URL),
            local_redirect_uri: or_default("GOOGLE_REDIRECT_URI_LOCAL", DEFAULT_LOCAL_REDIRECT_URI),
            hosted_redirect_uri,
            youtube_api_url: or_default("YOUTUBE_API_URL", DEFAULT_YOUTUBE_API_URL),
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_api_url: or_default("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            gemini_model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        })
    }

    /// Returns the OAuth redirect URI for the resolved deployment mode.
    ///
    /// The hosted URI is guaranteed present when the mode is hosted, so the
    /// local URI is only a fallback for hand-built settings.
    pub fn redirect_uri(&self) -> &str {
        match (self.deployment, &self.hosted_redirect_uri) {
            (DeploymentMode::Hosted, Some(uri)) => uri,
            _ => &self.local_redirect_uri,
        }
    }
}
