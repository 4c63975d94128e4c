use axum::{
    Extension, Router,
    routing::{get, post},
};
use reqwest::Client;
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    Res, api,
    config::Settings,
    dj::DjServices,
    google::{
        gemini::{GeminiClient, TextGenerator},
        oauth::{AuthSessionManager, GoogleTokenEndpoint, TokenEndpoint},
    },
    info,
    management::SessionStore,
};

/// Everything a request handler needs, shared by all sessions.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: SessionStore,
    pub auth: Arc<AuthSessionManager>,
    pub dj: DjServices,
}

impl AppState {
    /// State backed by the real Google and Gemini endpoints.
    pub fn new(settings: Settings) -> Self {
        let http = Client::new();
        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(http.clone(), &settings));
        let token_endpoint: Arc<dyn TokenEndpoint> =
            Arc::new(GoogleTokenEndpoint::new(http.clone(), &settings));
        Self::with_services(settings, http, generator, token_endpoint)
    }

    pub fn with_services(
        settings: Settings,
        http: Client,
        generator: Arc<dyn TextGenerator>,
        token_endpoint: Arc<dyn TokenEndpoint>,
    ) -> Self {
        let sessions = SessionStore::new();
        let auth = AuthSessionManager::new(&settings, sessions.clone(), Arc::clone(&token_endpoint));
        let dj = DjServices {
            http,
            youtube_api_url: settings.youtube_api_url.clone(),
            generator,
            token_endpoint,
        };

        Self {
            settings: Arc::new(settings),
            sessions,
            auth: Arc::new(auth),
            dj,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/generate", post(api::generate))
        .route("/logout", get(api::logout))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let addr = SocketAddr::from_str(&state.settings.server_address)
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
