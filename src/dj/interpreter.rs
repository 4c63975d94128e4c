use std::sync::Arc;

use crate::{google::gemini::TextGenerator, types::MoodInterpretation, utils, warning};

pub fn search_query_prompt(mood_text: &str) -> String {
    format!(
        "You turn a listener's mood into a short YouTube music search query.\n\
         Name genres, moods or keywords that fit; answer with the query only.\n\
         Example: a listener who feels 'sad but hopeful' could get 'ambient post-rock uplifting music'.\n\
         Example: 'ready to party on a Friday night' could get 'upbeat dance pop energetic official music video'.\n\
         \n\
         Mood: \"{mood_text}\"\n\
         \n\
         Search query:"
    )
}

pub fn playlist_title_prompt(mood_text: &str) -> String {
    format!(
        "Write one short, catchy title for a YouTube playlist that matches this mood: '{mood_text}'. \
         Answer with the title only."
    )
}

/// Translates mood text into a search query and a playlist title.
///
/// Neither operation fails: when the text-generation service errors or
/// returns nothing, a default derived from the mood text is used instead and
/// the failure is logged.
#[derive(Clone)]
pub struct MoodInterpreter {
    generator: Arc<dyn TextGenerator>,
}

impl MoodInterpreter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Trimmed search query, or the mood text unchanged on failure.
    pub async fn derive_search_query(&self, mood_text: &str) -> String {
        match self.generator.generate(&search_query_prompt(mood_text)).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warning!("Mood interpretation returned no text, searching for the mood itself");
                mood_text.to_string()
            }
            Err(e) => {
                warning!("Error interpreting mood with AI: {}", e);
                mood_text.to_string()
            }
        }
    }

    /// Playlist title without quotation marks, or `"{mood_text} Mix"` on failure.
    pub async fn derive_playlist_title(&self, mood_text: &str) -> String {
        match self.generator.generate(&playlist_title_prompt(mood_text)).await {
            Ok(text) => {
                let title = utils::strip_quotes(&text);
                if title.is_empty() {
                    warning!("Title generation returned no text, using the default title");
                    fallback_title(mood_text)
                } else {
                    title
                }
            }
            Err(e) => {
                warning!("Error creating playlist title: {}", e);
                fallback_title(mood_text)
            }
        }
    }

    /// Runs both derivations concurrently.
    pub async fn interpret(&self, mood_text: &str) -> MoodInterpretation {
        let (search_query, playlist_title) = tokio::join!(
            self.derive_search_query(mood_text),
            self.derive_playlist_title(mood_text)
        );

        MoodInterpretation {
            search_query,
            playlist_title,
        }
    }
}

pub fn fallback_title(mood_text: &str) -> String {
    format!("{} Mix", mood_text)
}
