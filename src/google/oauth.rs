use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::{
    config::Settings,
    error::{ApiError, AuthError},
    management::{self, SessionStore},
    types::{AuthRequestState, Credentials, TokenResponse},
    utils,
};

use super::read_json;

pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";
pub const STATE_LENGTH: usize = 30;

/// Google's OAuth 2.0 token endpoint.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchanges an authorization code for a token set.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, ApiError>;

    /// Obtains a fresh access token with a refresh token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError>;

    /// Address of the endpoint, recorded in the issued credentials.
    fn token_uri(&self) -> &str;
}

pub struct GoogleTokenEndpoint {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl GoogleTokenEndpoint {
    pub fn new(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            token_url: settings.google_token_url.clone(),
            client_id: settings.google_client_id.clone(),
            client_secret: settings.google_client_secret.clone(),
        }
    }
}

#[async_trait]
impl TokenEndpoint for GoogleTokenEndpoint {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, ApiError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("redirect_uri", redirect_uri),
                ("code_verifier", code_verifier),
            ])
            .send()
            .await?;

        read_json("Google token endpoint", response).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .send()
            .await?;

        read_json("Google token endpoint", response).await
    }

    fn token_uri(&self) -> &str {
        &self.token_url
    }
}

/// Drives the OAuth authorization-code flow for every session in a store.
///
/// A session moves from unauthenticated to awaiting the callback when
/// [`get_authorization_url`](Self::get_authorization_url) stores a pending
/// request, and to authenticated when
/// [`handle_callback`](Self::handle_callback) exchanges the returned code.
/// Requesting a new URL while a callback is outstanding replaces the earlier
/// request, so only one authorization attempt per session can complete.
pub struct AuthSessionManager {
    client_id: String,
    client_secret: String,
    auth_url: String,
    redirect_uri: String,
    sessions: SessionStore,
    endpoint: Arc<dyn TokenEndpoint>,
}

impl AuthSessionManager {
    /// Creates a manager for the redirect URI selected by the deployment mode.
    pub fn new(settings: &Settings, sessions: SessionStore, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self {
            client_id: settings.google_client_id.clone(),
            client_secret: settings.google_client_secret.clone(),
            auth_url: settings.google_auth_url.clone(),
            redirect_uri: settings.redirect_uri().to_string(),
            sessions,
            endpoint,
        }
    }

    /// Builds the Google authorization URL for a session.
    ///
    /// Generates a fresh anti-forgery `state` token and PKCE verifier, stores
    /// them as the session's pending request (replacing any earlier one) and
    /// returns the URL the user has to visit.
    ///
    /// # Query Parameters
    ///
    /// - `scope` - YouTube management over SSL
    /// - `access_type=offline` - so Google issues a refresh token and the
    ///   access token can be renewed while a playlist is being filled
    /// - `include_granted_scopes=true` - incremental authorization
    /// - `redirect_uri` - loopback or hosted callback, per deployment mode
    /// - `state`, `code_challenge`, `code_challenge_method=S256`
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidAuthUrl`] when the configured authorization
    /// endpoint is not a valid URL.
    ///
    /// # Example
    ///
    /// ```
    /// let url = auth_manager.get_authorization_url(&session_id).await?;
    /// webbrowser::open(&url)?;
    /// ```
    pub async fn get_authorization_url(&self, session_id: &str) -> Result<String, AuthError> {
        let state = utils::generate_token(STATE_LENGTH);
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);

        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", YOUTUBE_SCOPE),
                ("access_type", "offline"),
                ("include_granted_scopes", "true"),
                ("state", state.as_str()),
                ("code_challenge", code_challenge.as_str()),
                ("code_challenge_method", "S256"),
            ],
        )
        .map_err(|e| AuthError::InvalidAuthUrl(e.to_string()))?;

        self.sessions
            .store_auth_request(
                session_id,
                AuthRequestState {
                    state,
                    code_verifier,
                },
            )
            .await;

        Ok(url.into())
    }

    /// Completes the flow with the code delivered to the redirect callback.
    ///
    /// The pending request is consumed before the exchange, so a state token
    /// can be redeemed at most once even when the exchange fails.
    ///
    /// # Errors
    ///
    /// - [`AuthError::StateMissing`] - no request is pending for the session
    /// - [`AuthError::StateMismatch`] - `returned_state` differs from the pending one
    /// - [`AuthError::ExchangeFailed`] - Google rejected the code
    pub async fn handle_callback(
        &self,
        session_id: &str,
        code: &str,
        returned_state: Option<&str>,
    ) -> Result<Credentials, AuthError> {
        let pending = self
            .sessions
            .consume_auth_request(session_id, returned_state)
            .await?;

        let response = self
            .endpoint
            .exchange_code(code, &pending.code_verifier, &self.redirect_uri)
            .await
            .map_err(AuthError::ExchangeFailed)?;

        let credentials = self.credentials_from(response);
        self.sessions
            .store_credentials(session_id, credentials.clone())
            .await;

        Ok(credentials)
    }

    /// Credentials stored for the session, if it has completed the flow.
    pub async fn current_credentials(&self, session_id: &str) -> Option<Credentials> {
        self.sessions.credentials(session_id).await
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn endpoint(&self) -> Arc<dyn TokenEndpoint> {
        Arc::clone(&self.endpoint)
    }

    fn credentials_from(&self, response: TokenResponse) -> Credentials {
        let scopes = response
            .scope
            .as_deref()
            .unwrap_or(YOUTUBE_SCOPE)
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Credentials {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            token_uri: self.endpoint.token_uri().to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scopes,
            expires_at: management::expires_at(response.expires_in),
        }
    }
}
