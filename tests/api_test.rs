mod common;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Form, Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::Response,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use common::{FakeGenerator, FakeTokenEndpoint, issued_credentials, test_settings};
use mood_dj::{
    api::{self, CallbackParams, MoodForm, session::SESSION_COOKIE},
    dj,
    error::{AuthError, BuildError},
    server::AppState,
};
use reqwest::{Client, Url};
use serde_json::{Value, json};

const MOOD: &str = "a chill, rainy Sunday afternoon";

fn app_with(endpoint: Arc<FakeTokenEndpoint>, generator: FakeGenerator) -> AppState {
    AppState::with_services(
        test_settings(false),
        Client::new(),
        Arc::new(generator),
        endpoint,
    )
}

fn app(endpoint: Arc<FakeTokenEndpoint>) -> AppState {
    app_with(endpoint, FakeGenerator::failing())
}

/// Cookie jar as extracted from a request carrying the session cookie.
fn jar_for(session_id: &str) -> CookieJar {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        format!("{}={}", SESSION_COOKIE, session_id).parse().unwrap(),
    );
    CookieJar::from_headers(&headers)
}

fn callback_params(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> CallbackParams {
    CallbackParams {
        code: code.map(str::to_string),
        state: state.map(str::to_string),
        error: error.map(str::to_string),
    }
}

fn state_of(url: &str) -> String {
    Url::parse(url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// Home and login

#[tokio::test]
async fn test_home_without_cookie_creates_no_session() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));

    for _ in 0..1000 {
        let page = api::home(Extension(app.clone()), CookieJar::new()).await;
        assert!(page.0.contains("Step 1: Connect to YouTube"));
    }

    assert_eq!(app.sessions.len().await, 0);
}

#[tokio::test]
async fn test_home_shows_mood_form_once_connected() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));
    let session_id = app.sessions.create().await;
    app.sessions
        .store_credentials(&session_id, issued_credentials(i64::MAX))
        .await;

    let page = api::home(Extension(app.clone()), jar_for(&session_id)).await;

    assert!(page.0.contains("Step 2: Create your playlist"));
}

#[tokio::test]
async fn test_login_creates_session_and_redirects_to_google() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));

    let response = api::login(Extension(app.clone()), CookieJar::new()).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(cookies[0].contains("HttpOnly"));
    assert!(cookies[0].contains("SameSite=Lax"));
    assert!(cookies[0].contains("Path=/"));

    let session_id = Cookie::parse(cookies[0].clone()).unwrap().value().to_string();
    assert_eq!(app.sessions.len().await, 1);
    assert!(app.sessions.has_pending_request(&session_id).await);
    assert_eq!(
        app.sessions.session_for_state(&state_of(&location(&response))).await,
        Some(session_id)
    );
}

#[tokio::test]
async fn test_login_reuses_live_session_and_replaces_stale_cookie() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));
    let session_id = app.sessions.create().await;

    let response = api::login(Extension(app.clone()), jar_for(&session_id)).await;
    assert!(set_cookies(&response).is_empty());
    assert!(app.sessions.has_pending_request(&session_id).await);

    let response = api::login(Extension(app.clone()), jar_for("ended-long-ago")).await;
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(!cookies[0].contains("ended-long-ago"));
    assert!(!app.sessions.contains("ended-long-ago").await);
    assert_eq!(app.sessions.len().await, 2);
}

// Callback

#[tokio::test]
async fn test_callback_authenticates_cookie_session() {
    let endpoint = Arc::new(FakeTokenEndpoint::accepting());
    let app = app(endpoint.clone());
    let session_id = app.sessions.create().await;
    let state = state_of(&app.auth.get_authorization_url(&session_id).await.unwrap());

    let response = api::callback(
        Query(callback_params(Some("auth-code"), Some(&state), None)),
        Extension(app.clone()),
        jar_for(&session_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(
        app.auth.current_credentials(&session_id).await.unwrap().access_token,
        "access-1"
    );
    assert_eq!(endpoint.exchange_count(), 1);
}

#[tokio::test]
async fn test_callback_with_stale_cookie_falls_back_to_state() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));
    // The CLI flow registers its session without a browser cookie
    let cli_session = app.sessions.create().await;
    let state = state_of(&app.auth.get_authorization_url(&cli_session).await.unwrap());

    let response = api::callback(
        Query(callback_params(Some("auth-code"), Some(&state), None)),
        Extension(app.clone()),
        jar_for("left-over-from-an-earlier-server"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.auth.current_credentials(&cli_session).await.is_some());
}

#[tokio::test]
async fn test_callback_with_idle_cookie_session_falls_back_to_state() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));
    let browser_session = app.sessions.create().await;
    let cli_session = app.sessions.create().await;
    let state = state_of(&app.auth.get_authorization_url(&cli_session).await.unwrap());

    api::callback(
        Query(callback_params(Some("auth-code"), Some(&state), None)),
        Extension(app.clone()),
        jar_for(&browser_session),
    )
    .await;

    assert!(app.auth.current_credentials(&cli_session).await.is_some());
    assert!(app.auth.current_credentials(&browser_session).await.is_none());
}

#[tokio::test]
async fn test_callback_without_state_is_rejected() {
    let endpoint = Arc::new(FakeTokenEndpoint::accepting());
    let app = app(endpoint.clone());
    let session_id = app.sessions.create().await;
    app.auth.get_authorization_url(&session_id).await.unwrap();

    let response = api::callback(
        Query(callback_params(Some("auth-code"), None, None)),
        Extension(app.clone()),
        jar_for(&session_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(&AuthError::StateMissing.to_string()));
    assert_eq!(endpoint.exchange_count(), 0);
    assert!(app.sessions.has_pending_request(&session_id).await);
}

#[tokio::test]
async fn test_callback_with_unknown_state_is_rejected() {
    let endpoint = Arc::new(FakeTokenEndpoint::accepting());
    let app = app(endpoint.clone());

    let response = api::callback(
        Query(callback_params(Some("auth-code"), Some("made-up"), None)),
        Extension(app.clone()),
        CookieJar::new(),
    )
    .await;

    assert!(body_text(response).await.contains(&AuthError::StateMissing.to_string()));
    assert_eq!(endpoint.exchange_count(), 0);
    assert_eq!(app.sessions.len().await, 0);
}

#[tokio::test]
async fn test_callback_reports_denied_authorization() {
    let endpoint = Arc::new(FakeTokenEndpoint::accepting());
    let app = app(endpoint.clone());
    let session_id = app.sessions.create().await;
    let state = state_of(&app.auth.get_authorization_url(&session_id).await.unwrap());

    let response = api::callback(
        Query(callback_params(None, Some(&state), Some("access_denied"))),
        Extension(app.clone()),
        jar_for(&session_id),
    )
    .await;

    let body = body_text(response).await;
    assert!(body.contains("Authorization was not granted: access_denied"));
    assert!(body.contains("href=\"/login\""));
    assert_eq!(endpoint.exchange_count(), 0);
}

#[tokio::test]
async fn test_callback_reports_rejected_code() {
    let app = app(Arc::new(FakeTokenEndpoint::rejecting()));
    let session_id = app.sessions.create().await;
    let state = state_of(&app.auth.get_authorization_url(&session_id).await.unwrap());

    let response = api::callback(
        Query(callback_params(Some("bad-code"), Some(&state), None)),
        Extension(app.clone()),
        jar_for(&session_id),
    )
    .await;

    assert!(body_text(response).await.contains("Google rejected the authorization code"));
    assert!(app.auth.current_credentials(&session_id).await.is_none());
}

// Logout

#[tokio::test]
async fn test_logout_ends_session_and_clears_cookie() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));
    let session_id = app.sessions.create().await;
    app.sessions
        .store_credentials(&session_id, issued_credentials(i64::MAX))
        .await;

    let response = api::logout(Extension(app.clone()), jar_for(&session_id)).await;

    assert_eq!(location(&response), "/");
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with(&format!("{}=;", SESSION_COOKIE)));
    assert!(cookies[0].contains("Max-Age=0"));

    assert!(app.auth.current_credentials(&session_id).await.is_none());
    assert!(app.sessions.is_empty().await);
}

// Generate

#[tokio::test]
async fn test_generate_without_session_redirects_home() {
    let app = app(Arc::new(FakeTokenEndpoint::accepting()));

    let response = api::generate(
        Extension(app.clone()),
        CookieJar::new(),
        Form(MoodForm {
            mood: MOOD.to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_generate_reports_failed_refresh_as_search_failure() {
    let endpoint = Arc::new(FakeTokenEndpoint::rejecting_refresh());
    let app = app(endpoint.clone());
    let session_id = app.sessions.create().await;
    let expired = issued_credentials(0);
    app.sessions.store_credentials(&session_id, expired.clone()).await;

    let response = api::generate(
        Extension(app.clone()),
        jar_for(&session_id),
        Form(MoodForm {
            mood: MOOD.to_string(),
        }),
    )
    .await;

    assert!(body_text(response).await.contains("YouTube search failed"));
    assert_eq!(endpoint.refresh_count(), 1);
    assert_eq!(app.sessions.credentials(&session_id).await, Some(expired));
}

/// Stand-in for the YouTube Data API that records the bearer token of every call.
async fn fake_youtube(tokens: Arc<Mutex<Vec<String>>>) -> String {
    fn record(tokens: &Mutex<Vec<String>>, headers: &HeaderMap) {
        if let Some(value) = headers.get(header::AUTHORIZATION) {
            tokens.lock().unwrap().push(value.to_str().unwrap().to_string());
        }
    }

    let router = Router::new()
        .route(
            "/search",
            get(
                |Extension(tokens): Extension<Arc<Mutex<Vec<String>>>>,
                 Query(query): Query<HashMap<String, String>>,
                 headers: HeaderMap| async move {
                    record(&tokens, &headers);
                    assert_eq!(query["videoCategoryId"], "10");
                    assert_eq!(query["maxResults"], "20");
                    Json(json!({
                        "items": [
                            {"id": {"videoId": "v1"}, "snippet": {"title": "Rain Jazz", "channelTitle": "Lofi Girl"}},
                            {"id": {"videoId": "v2"}, "snippet": {"title": "Slow Piano", "channelTitle": "Keys"}}
                        ]
                    }))
                },
            ),
        )
        .route(
            "/playlists",
            post(
                |Extension(tokens): Extension<Arc<Mutex<Vec<String>>>>,
                 headers: HeaderMap,
                 Json(body): Json<Value>| async move {
                    record(&tokens, &headers);
                    assert_eq!(body["status"]["privacyStatus"], "private");
                    Json(json!({"id": "PL9"}))
                },
            ),
        )
        .route(
            "/playlistItems",
            post(
                |Extension(tokens): Extension<Arc<Mutex<Vec<String>>>>, headers: HeaderMap| async move {
                    record(&tokens, &headers);
                    Json(json!({"id": "item"}))
                },
            ),
        )
        .layer(Extension(tokens));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_generate_stores_refreshed_credentials() {
    let tokens = Arc::new(Mutex::new(Vec::new()));
    let youtube_url = fake_youtube(tokens.clone()).await;

    let endpoint = Arc::new(FakeTokenEndpoint::accepting());
    let mut settings = test_settings(false);
    settings.youtube_api_url = youtube_url;
    let app = AppState::with_services(
        settings,
        Client::new(),
        Arc::new(FakeGenerator::for_mood(MOOD, "lofi chill rain jazz", "Rainy Day Lo-fi")),
        endpoint.clone(),
    );
    let session_id = app.sessions.create().await;
    app.sessions
        .store_credentials(&session_id, issued_credentials(0))
        .await;

    let response = api::generate(
        Extension(app.clone()),
        jar_for(&session_id),
        Form(MoodForm {
            mood: MOOD.to_string(),
        }),
    )
    .await;

    let body = body_text(response).await;
    assert!(body.contains("Rainy Day Lo-fi"));
    assert!(body.contains("https://www.youtube.com/playlist?list=PL9"));
    assert!(body.contains("Rain Jazz"));

    // One refresh up front, then every call uses the renewed token
    assert_eq!(endpoint.refresh_count(), 1);
    let tokens = tokens.lock().unwrap().clone();
    assert_eq!(tokens.len(), 4);
    assert!(tokens.iter().all(|t| t == "Bearer access-2"));

    let stored = app.sessions.credentials(&session_id).await.unwrap();
    assert_eq!(stored.access_token, "access-2");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
    assert!(stored.expires_at > 0);
}

#[tokio::test]
async fn test_build_playlist_returns_input_credentials_when_refresh_fails() {
    let endpoint = Arc::new(FakeTokenEndpoint::rejecting_refresh());
    let app = app(endpoint.clone());
    let expired = issued_credentials(0);

    let (result, credentials) = dj::build_playlist(&app.dj, MOOD, expired.clone()).await;

    assert!(matches!(result, Err(BuildError::SearchFailed(_))));
    assert_eq!(credentials, expired);
}
