#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use mood_dj::{
    config::Settings,
    dj::interpreter::{playlist_title_prompt, search_query_prompt},
    error::ApiError,
    google::{
        gemini::TextGenerator,
        oauth::{TokenEndpoint, YOUTUBE_SCOPE},
        youtube::VideoHost,
    },
    types::{Credentials, Playlist, Privacy, TokenResponse, VideoResult, VideoSearch},
};

pub const LOCAL_REDIRECT: &str = "http://127.0.0.1:8080/callback";
pub const HOSTED_REDIRECT: &str = "https://mood-dj.example.com/callback";
pub const TOKEN_URL: &str = "https://oauth2.example.com/token";

pub fn test_settings(hosted: bool) -> Settings {
    let mut vars: HashMap<&str, &str> = HashMap::from([
        ("GOOGLE_CLIENT_ID", "client-id"),
        ("GOOGLE_CLIENT_SECRET", "client-secret"),
        ("GEMINI_API_KEY", "gemini-key"),
        ("GOOGLE_REDIRECT_URI_LOCAL", LOCAL_REDIRECT),
        ("GOOGLE_REDIRECT_URI_HOSTED", HOSTED_REDIRECT),
        ("GOOGLE_TOKEN_URL", TOKEN_URL),
    ]);
    if hosted {
        vars.insert("MOOD_DJ_DEPLOYMENT", "hosted");
    }
    Settings::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap()
}

/// Credentials as issued by the fake token endpoint, expiring at `expires_at`.
pub fn issued_credentials(expires_at: i64) -> Credentials {
    Credentials {
        access_token: "access-1".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        token_uri: TOKEN_URL.to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        scopes: vec![YOUTUBE_SCOPE.to_string()],
        expires_at,
    }
}

pub fn video(id: &str) -> VideoResult {
    VideoResult {
        video_id: id.to_string(),
        title: format!("Title {}", id),
        channel: format!("Channel {}", id),
        thumbnail_ref: None,
    }
}

pub fn videos(count: usize) -> Vec<VideoResult> {
    (1..=count).map(|i| video(&format!("v{}", i))).collect()
}

// Text generation

pub struct FakeGenerator {
    replies: HashMap<String, String>,
    fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn failing() -> Self {
        Self {
            replies: HashMap::new(),
            fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answers the query and title prompts for one mood.
    pub fn for_mood(mood: &str, query: &str, title: &str) -> Self {
        Self {
            replies: HashMap::from([
                (search_query_prompt(mood), query.to_string()),
                (playlist_title_prompt(mood), title.to_string()),
            ]),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ApiError::Status {
                service: "Gemini",
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.replies
            .get(prompt)
            .cloned()
            .ok_or_else(|| ApiError::Malformed {
                service: "Gemini",
                message: "unexpected prompt".to_string(),
            })
    }
}

// Video hosting

#[derive(Default)]
pub struct FakeHost {
    results: Vec<VideoResult>,
    fail_search: bool,
    fail_create: bool,
    /// 1-based insert call numbers that fail.
    failing_inserts: HashSet<usize>,
    pub searches: Mutex<Vec<VideoSearch>>,
    pub created: Mutex<Vec<Playlist>>,
    pub insert_calls: Mutex<Vec<(String, String)>>,
    pub playlist_items: Mutex<HashMap<String, Vec<String>>>,
}

impl FakeHost {
    pub fn with_results(results: Vec<VideoResult>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub fn failing_search() -> Self {
        Self {
            fail_search: true,
            ..Self::default()
        }
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_insert(mut self, call_number: usize) -> Self {
        self.failing_inserts.insert(call_number);
        self
    }

    pub fn items(&self, playlist_id: &str) -> Vec<String> {
        self.playlist_items
            .lock()
            .unwrap()
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn create_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn insert_count(&self) -> usize {
        self.insert_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoHost for FakeHost {
    async fn search(&self, search: &VideoSearch) -> Result<Vec<VideoResult>, ApiError> {
        self.searches.lock().unwrap().push(search.clone());
        if self.fail_search {
            return Err(ApiError::Status {
                service: "YouTube",
                status: 403,
                body: "quotaExceeded".to_string(),
            });
        }
        Ok(self.results.clone())
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<Playlist, ApiError> {
        if self.fail_create {
            return Err(ApiError::Status {
                service: "YouTube",
                status: 401,
                body: "unauthorized".to_string(),
            });
        }
        let mut created = self.created.lock().unwrap();
        let playlist = Playlist {
            playlist_id: format!("PL{}", created.len() + 1),
            title: title.to_string(),
            description: description.to_string(),
            privacy,
        };
        created.push(playlist.clone());
        Ok(playlist)
    }

    async fn insert_playlist_item(&self, playlist_id: &str, video_id: &str) -> Result<(), ApiError> {
        let call_number = {
            let mut calls = self.insert_calls.lock().unwrap();
            calls.push((playlist_id.to_string(), video_id.to_string()));
            calls.len()
        };
        if self.failing_inserts.contains(&call_number) {
            return Err(ApiError::Status {
                service: "YouTube",
                status: 500,
                body: "backendError".to_string(),
            });
        }
        self.playlist_items
            .lock()
            .unwrap()
            .entry(playlist_id.to_string())
            .or_default()
            .push(video_id.to_string());
        Ok(())
    }
}

// Token endpoint

pub struct FakeTokenEndpoint {
    reject: bool,
    reject_refresh: bool,
    pub exchanges: Mutex<Vec<(String, String, String)>>,
    pub refreshes: Mutex<Vec<String>>,
}

impl FakeTokenEndpoint {
    pub fn accepting() -> Self {
        Self {
            reject: false,
            reject_refresh: false,
            exchanges: Mutex::new(Vec::new()),
            refreshes: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::accepting()
        }
    }

    pub fn rejecting_refresh() -> Self {
        Self {
            reject_refresh: true,
            ..Self::accepting()
        }
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.lock().unwrap().len()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenEndpoint for FakeTokenEndpoint {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, ApiError> {
        self.exchanges.lock().unwrap().push((
            code.to_string(),
            code_verifier.to_string(),
            redirect_uri.to_string(),
        ));
        if self.reject {
            return Err(ApiError::Status {
                service: "Google token endpoint",
                status: 400,
                body: "invalid_grant".to_string(),
            });
        }
        Ok(TokenResponse {
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_in: Some(3599),
            scope: Some("https://www.googleapis.com/auth/youtube.force-ssl".to_string()),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        self.refreshes.lock().unwrap().push(refresh_token.to_string());
        if self.reject_refresh {
            return Err(ApiError::Status {
                service: "Google token endpoint",
                status: 400,
                body: "invalid_grant".to_string(),
            });
        }
        Ok(TokenResponse {
            access_token: format!("access-{}", self.refresh_count() + 1),
            refresh_token: None,
            expires_in: Some(3599),
            scope: None,
        })
    }

    fn token_uri(&self) -> &str {
        TOKEN_URL
    }
}
