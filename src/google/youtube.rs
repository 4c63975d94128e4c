use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    error::ApiError,
    management::CredentialManager,
    types::{
        CreatePlaylistRequest, CreatePlaylistResponse, Credentials, InsertPlaylistItemRequest,
        Playlist, PlaylistItemSnippet, PlaylistSnippet, PlaylistStatus, Privacy, ResourceId,
        SearchListResponse, SearchResult, VideoResult, VideoSearch,
    },
};

use super::{ensure_success, read_json};

/// YouTube's "Music" video category.
pub const MUSIC_CATEGORY_ID: &str = "10";

const SERVICE: &str = "YouTube";

/// The video-hosting operations the playlist pipeline consumes.
#[async_trait]
pub trait VideoHost: Send + Sync {
    /// Video hits for the query, in the relevance order returned by the service.
    async fn search(&self, search: &VideoSearch) -> Result<Vec<VideoResult>, ApiError>;

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<Playlist, ApiError>;

    /// Appends a video to the end of the playlist.
    async fn insert_playlist_item(&self, playlist_id: &str, video_id: &str) -> Result<(), ApiError>;
}

/// YouTube Data API v3 client acting on behalf of one user.
///
/// The access token is refreshed on demand before each request; read the
/// possibly renewed credentials back with [`YouTubeClient::credentials`].
pub struct YouTubeClient {
    http: Client,
    api_url: String,
    credentials: Mutex<CredentialManager>,
}

impl YouTubeClient {
    pub fn new(http: Client, api_url: impl Into<String>, credentials: CredentialManager) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            credentials: Mutex::new(credentials),
        }
    }

    pub async fn credentials(&self) -> Credentials {
        self.credentials.lock().await.current_credentials().clone()
    }

    async fn access_token(&self) -> Result<String, ApiError> {
        self.credentials.lock().await.get_valid_token().await
    }
}

#[async_trait]
impl VideoHost for YouTubeClient {
    async fn search(&self, search: &VideoSearch) -> Result<Vec<VideoResult>, ApiError> {
        let token = self.access_token().await?;
        let max_results = search.max_results.to_string();
        let response = self
            .http
            .get(format!("{}/search", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("part", "snippet"),
                ("q", search.query.as_str()),
                ("type", "video"),
                ("videoCategoryId", search.category_id.as_str()),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await?;

        let list: SearchListResponse = read_json(SERVICE, response).await?;
        Ok(list.items.into_iter().filter_map(to_video_result).collect())
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<Playlist, ApiError> {
        let token = self.access_token().await?;
        let body = CreatePlaylistRequest {
            snippet: PlaylistSnippet {
                title: title.to_string(),
                description: description.to_string(),
            },
            status: PlaylistStatus {
                privacy_status: privacy.as_str().to_string(),
            },
        };

        let response = self
            .http
            .post(format!("{}/playlists", self.api_url))
            .bearer_auth(token)
            .query(&[("part", "snippet,status")])
            .json(&body)
            .send()
            .await?;

        let created: CreatePlaylistResponse = read_json(SERVICE, response).await?;
        Ok(Playlist {
            playlist_id: created.id,
            title: title.to_string(),
            description: description.to_string(),
            privacy,
        })
    }

    async fn insert_playlist_item(&self, playlist_id: &str, video_id: &str) -> Result<(), ApiError> {
        let token = self.access_token().await?;
        let body = InsertPlaylistItemRequest {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        };

        let response = self
            .http
            .post(format!("{}/playlistItems", self.api_url))
            .bearer_auth(token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await?;

        ensure_success(SERVICE, response).await?;
        Ok(())
    }
}

/// Hits without a video id (channels, playlists) are dropped.
pub fn to_video_result(item: SearchResult) -> Option<VideoResult> {
    let video_id = item.id.video_id?;
    let snippet = item.snippet;

    let thumbnail_ref = snippet
        .as_ref()
        .and_then(|s| s.thumbnails.as_ref())
        .and_then(|t| t.medium.as_ref().or(t.default.as_ref()).or(t.high.as_ref()))
        .map(|t| t.url.clone());

    let (title, channel) = match snippet {
        Some(s) => (s.title, s.channel_title),
        None => (String::new(), String::new()),
    };

    Some(VideoResult {
        video_id,
        title,
        channel,
        thumbnail_ref,
    })
}
