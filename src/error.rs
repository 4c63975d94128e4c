//! Error types shared across the crate.
//!
//! Remote calls fail with [`ApiError`]. The authorization flow and the
//! playlist pipeline wrap it in [`AuthError`] and [`BuildError`], whose
//! `Display` output is shown to the user as-is.

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {service}: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No authorization request is pending for this session. Please connect your account again.")]
    StateMissing,
    #[error("The authorization response does not belong to the pending request.")]
    StateMismatch,
    #[error("Google rejected the authorization code: {0}")]
    ExchangeFailed(ApiError),
    #[error("Invalid authorization endpoint: {0}")]
    InvalidAuthUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Please describe your mood.")]
    EmptyMood,
    #[error("No tracks found for \"{mood}\" (searched for \"{query}\"). Try a different description.")]
    NoResults { mood: String, query: String },
    #[error("YouTube search failed: {0}")]
    SearchFailed(ApiError),
    #[error("Creating the playlist failed: {0}")]
    PlaylistCreateFailed(ApiError),
    #[error(
        "Added {succeeded} of {total} videos to {playlist_url}, {failed} failed: {underlying_error}",
        total = .succeeded + .failed
    )]
    PartialInsert {
        playlist_id: String,
        playlist_url: String,
        succeeded: usize,
        failed: usize,
        underlying_error: String,
    },
}
