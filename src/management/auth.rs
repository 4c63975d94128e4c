use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::ApiError,
    google::oauth::TokenEndpoint,
    types::{Credentials, TokenResponse},
};

/// Access tokens are refreshed this many seconds before they expire.
pub const REFRESH_MARGIN_SECS: i64 = 240;

pub struct CredentialManager {
    credentials: Credentials,
    endpoint: Arc<dyn TokenEndpoint>,
}

impl CredentialManager {
    pub fn new(credentials: Credentials, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        CredentialManager {
            credentials,
            endpoint,
        }
    }

    /// Returns an access token, refreshing it first when it is about to expire.
    ///
    /// Without a refresh token the current access token is returned as is and
    /// the API call that uses it reports the failure.
    pub async fn get_valid_token(&mut self) -> Result<String, ApiError> {
        if self.is_expired() {
            if let Some(refresh_token) = self.credentials.refresh_token.clone() {
                let response = self.endpoint.refresh(&refresh_token).await?;
                apply_refresh(&mut self.credentials, response);
            }
        }

        Ok(self.credentials.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.credentials.expires_at - REFRESH_MARGIN_SECS
    }

    pub fn current_credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn into_credentials(self) -> Credentials {
        self.credentials
    }
}

/// Replaces the access token; the refresh token survives unless Google rotated it.
pub fn apply_refresh(credentials: &mut Credentials, response: TokenResponse) {
    credentials.access_token = response.access_token;
    if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
        credentials.refresh_token = Some(refresh_token);
    }
    if let Some(scope) = response.scope {
        credentials.scopes = scope.split_whitespace().map(str::to_string).collect();
    }
    credentials.expires_at = expires_at(response.expires_in);
}

/// Absolute expiry for a token issued now; Google's default lifetime is an hour.
pub fn expires_at(expires_in: Option<i64>) -> i64 {
    Utc::now().timestamp() + expires_in.unwrap_or(3600)
}
