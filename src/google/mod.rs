//! # Google Integration Module
//!
//! Clients for the three Google services the application talks to:
//!
//! - [`oauth`] - OAuth 2.0 authorization-code flow against Google's identity
//!   provider, including the per-session [`oauth::AuthSessionManager`]
//! - [`youtube`] - YouTube Data API v3: music video search, playlist creation
//!   and playlist item insertion
//! - [`gemini`] - Gemini `generateContent` text generation
//!
//! Each service sits behind a trait ([`oauth::TokenEndpoint`],
//! [`youtube::VideoHost`], [`gemini::TextGenerator`]) so the pipeline can run
//! against in-memory implementations.
//!
//! No call is retried and no timeout is configured beyond reqwest's defaults;
//! a failed request surfaces immediately as an [`ApiError`].

pub mod gemini;
pub mod oauth;
pub mod youtube;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

async fn ensure_success(service: &'static str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, ApiError> {
    ensure_success(service, response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ApiError::Malformed {
            service,
            message: e.to_string(),
        })
}
