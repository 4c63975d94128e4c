use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::{DeploymentMode, Settings},
    dj, error,
    error::BuildError,
    info,
    server::{AppState, start_api_server},
    success,
    types::Credentials,
    utils, warning,
};

const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Authorizes in the browser through the loopback callback, then builds a
/// playlist for `mood` and prints the result.
pub async fn generate(settings: Settings, mood: String) {
    if mood.trim().is_empty() {
        error!("Please describe your mood.");
    }
    if settings.deployment == DeploymentMode::Hosted {
        warning!(
            "Hosted deployment selected, Google will redirect to {} instead of this machine",
            settings.redirect_uri()
        );
    }

    let app = AppState::new(settings);
    let server_state = app.clone();
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let session_id = app.sessions.create().await;
    let auth_url = match app.auth.get_authorization_url(&session_id).await {
        Ok(url) => url,
        Err(e) => error!("{}", e),
    };

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let pb = spinner("Waiting for authorization in the browser...");
    let credentials = wait_for_credentials(&app, &session_id).await;
    pb.finish_and_clear();

    let Some(credentials) = credentials else {
        error!("Authentication failed or timed out.");
    };
    success!("Successfully connected to YouTube!");

    let pb = spinner("AI is interpreting your mood and building the playlist...");
    let (result, _) = dj::build_playlist(&app.dj, &mood, credentials).await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            info!("Searched YouTube for '{}'", outcome.search_query);
            println!("{}", Table::new(utils::video_table_rows(&outcome.videos)));
            success!(
                "Playlist '{}' created! Listen on YouTube: {}",
                outcome.playlist.title,
                outcome.url
            );
        }
        Err(BuildError::PartialInsert {
            playlist_url,
            succeeded,
            failed,
            underlying_error,
            ..
        }) => {
            warning!(
                "Only {} of {} videos were added ({}), the playlist is at {}",
                succeeded,
                succeeded + failed,
                underlying_error,
                playlist_url
            );
        }
        Err(e) => error!("{}", e),
    }
}

/// Polls the session until the callback stored credentials or the timeout hit.
async fn wait_for_credentials(app: &AppState, session_id: &str) -> Option<Credentials> {
    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        if let Some(credentials) = app.auth.current_credentials(session_id).await {
            return Some(credentials);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
