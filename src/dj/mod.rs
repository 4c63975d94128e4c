//! # Mood DJ Pipeline
//!
//! Connects mood text to a filled playlist:
//!
//! ```text
//! mood text ──► MoodInterpreter ──► (search query, playlist title)
//!                                        │
//!                 VideoHost::search ◄────┘
//!                        │
//!        VideoHost::create_playlist ──► insert each hit, in order
//! ```
//!
//! [`interpreter`] never fails and degrades to defaults derived from the mood
//! text. [`playlist`] aborts on search or creation failures and reports
//! partially filled playlists as [`BuildError::PartialInsert`].

pub mod interpreter;
pub mod playlist;

use std::sync::Arc;

use reqwest::Client;

pub use interpreter::MoodInterpreter;
pub use playlist::PlaylistBuilder;

use crate::{
    error::BuildError,
    google::{gemini::TextGenerator, oauth::TokenEndpoint, youtube::YouTubeClient},
    management::CredentialManager,
    types::{Credentials, PlaylistOutcome},
};

/// Shared clients needed to run the pipeline for any session.
#[derive(Clone)]
pub struct DjServices {
    pub http: Client,
    pub youtube_api_url: String,
    pub generator: Arc<dyn TextGenerator>,
    pub token_endpoint: Arc<dyn TokenEndpoint>,
}

/// Builds a playlist on behalf of the user owning `credentials`.
///
/// Returns the build result together with the credentials as they are after
/// the run, which differ from the input when the access token was refreshed.
pub async fn build_playlist(
    services: &DjServices,
    mood_text: &str,
    credentials: Credentials,
) -> (Result<PlaylistOutcome, BuildError>, Credentials) {
    let youtube = Arc::new(YouTubeClient::new(
        services.http.clone(),
        services.youtube_api_url.clone(),
        CredentialManager::new(credentials, Arc::clone(&services.token_endpoint)),
    ));

    let builder = PlaylistBuilder::new(
        MoodInterpreter::new(Arc::clone(&services.generator)),
        youtube.clone(),
    );
    let result = builder.build(mood_text).await;

    (result, youtube.credentials().await)
}
