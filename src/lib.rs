//! AI Mood DJ Library
//!
//! This library turns a free-text mood description into a private YouTube
//! playlist. A user connects their Google account through the OAuth 2.0
//! authorization-code flow, a Gemini model translates the mood into a search
//! query and a playlist title, and the YouTube Data API is used to search for
//! music videos, create the playlist and fill it in relevance order.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the web surface
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `dj` - Mood interpretation and playlist building pipeline
//! - `error` - Error types for remote calls, authorization and playlist builds
//! - `google` - OAuth, YouTube and Gemini clients
//! - `management` - Session-scoped state and credential refresh
//! - `server` - Axum router and application state
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use mood_dj::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> mood_dj::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(server::AppState::new(settings)).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod dj;
pub mod error;
pub mod google;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;

/// Boxed error result used by binary-level helpers such as the server loop.
///
/// Library operations return their own error enums from [`error`]; this alias
/// only collects them at the outermost layer.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Logs a progress line with a blue `o` marker.
///
/// # Example
///
/// ```
/// info!("Searching YouTube for '{}'", query);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Logs a completed step with a green check mark.
///
/// # Example
///
/// ```
/// success!("Playlist created: {}", url);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Logs a fatal start-up error in red and exits with status 1.
///
/// Request handlers never call this; a failed user action is reported back to
/// the user and the server keeps running.
///
/// # Example
///
/// ```
/// error!("Invalid configuration: {}", e);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Logs a recoverable problem with a yellow `!` marker, e.g. a mood
/// interpretation that fell back to its default.
///
/// # Example
///
/// ```
/// warning!("Error creating playlist title: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
