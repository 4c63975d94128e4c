use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{VideoResult, VideoTableRow};

pub const PLAYLIST_URL_BASE: &str = "https://www.youtube.com/playlist?list=";

/// Random alphanumeric string used for session ids and `state` tokens.
pub fn generate_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    generate_token(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("{}{}", PLAYLIST_URL_BASE, playlist_id)
}

/// Removes straight and typographic double quotes, then trims.
pub fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\u{201C}' | '\u{201D}'))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn video_table_rows(videos: &[VideoResult]) -> Vec<VideoTableRow> {
    videos
        .iter()
        .enumerate()
        .map(|(i, video)| VideoTableRow {
            position: i + 1,
            title: video.title.clone(),
            channel: video.channel.clone(),
        })
        .collect()
}
