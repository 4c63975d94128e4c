use std::sync::Arc;

use crate::{
    error::BuildError,
    google::youtube::{MUSIC_CATEGORY_ID, VideoHost},
    info, success,
    types::{PlaylistOutcome, Privacy, VideoResult, VideoSearch},
    utils, warning,
};

use super::MoodInterpreter;

pub const MAX_RESULTS: u32 = 20;
pub const PLAYLIST_DESCRIPTION: &str = "Created by AI Mood DJ";

/// Runs the mood-to-playlist pipeline against a video host.
pub struct PlaylistBuilder {
    interpreter: MoodInterpreter,
    host: Arc<dyn VideoHost>,
}

impl PlaylistBuilder {
    pub fn new(interpreter: MoodInterpreter, host: Arc<dyn VideoHost>) -> Self {
        Self { interpreter, host }
    }

    /// Builds a private playlist for the mood.
    ///
    /// The mood is interpreted, up to [`MAX_RESULTS`] music videos are
    /// searched, a playlist is created and every hit is inserted one after the
    /// other in search order. Insertion continues past individual failures;
    /// videos already inserted stay in the playlist.
    ///
    /// Surrounding whitespace is trimmed off `mood_text` first, so the
    /// interpreter's fallbacks and [`BuildError::NoResults`] see the trimmed text.
    ///
    /// # Errors
    ///
    /// - [`BuildError::EmptyMood`] - blank mood text, nothing is called
    /// - [`BuildError::NoResults`] - the search found nothing, no playlist is created
    /// - [`BuildError::SearchFailed`], [`BuildError::PlaylistCreateFailed`]
    /// - [`BuildError::PartialInsert`] - the playlist exists but some inserts
    ///   failed; carries both counts and the first failure
    pub async fn build(&self, mood_text: &str) -> Result<PlaylistOutcome, BuildError> {
        let mood_text = mood_text.trim();
        if mood_text.is_empty() {
            return Err(BuildError::EmptyMood);
        }

        let interpretation = self.interpreter.interpret(mood_text).await;
        info!("Searching YouTube for '{}'", interpretation.search_query);

        let search = VideoSearch {
            query: interpretation.search_query.clone(),
            category_id: MUSIC_CATEGORY_ID.to_string(),
            max_results: MAX_RESULTS,
        };
        let videos = self
            .host
            .search(&search)
            .await
            .map_err(BuildError::SearchFailed)?;

        if videos.is_empty() {
            return Err(BuildError::NoResults {
                mood: mood_text.to_string(),
                query: interpretation.search_query,
            });
        }

        info!(
            "Found {} tracks, creating playlist '{}'",
            videos.len(),
            interpretation.playlist_title
        );
        let playlist = self
            .host
            .create_playlist(
                &interpretation.playlist_title,
                PLAYLIST_DESCRIPTION,
                Privacy::Private,
            )
            .await
            .map_err(BuildError::PlaylistCreateFailed)?;
        let url = utils::playlist_url(&playlist.playlist_id);

        let mut inserted: Vec<VideoResult> = Vec::with_capacity(videos.len());
        let mut failed = 0;
        let mut first_error: Option<String> = None;

        for video in videos {
            match self
                .host
                .insert_playlist_item(&playlist.playlist_id, &video.video_id)
                .await
            {
                Ok(()) => inserted.push(video),
                Err(e) => {
                    warning!("Failed to add video {} to playlist: {}", video.video_id, e);
                    failed += 1;
                    first_error.get_or_insert_with(|| e.to_string());
                }
            }
        }

        if let Some(underlying_error) = first_error {
            return Err(BuildError::PartialInsert {
                playlist_id: playlist.playlist_id,
                playlist_url: url,
                succeeded: inserted.len(),
                failed,
                underlying_error,
            });
        }

        success!("Playlist '{}' created: {}", playlist.title, url);
        Ok(PlaylistOutcome {
            playlist,
            search_query: interpretation.search_query,
            url,
            videos: inserted,
        })
    }
}
