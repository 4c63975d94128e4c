use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::Settings,
    error::ApiError,
    types::{Content, GenerateContentRequest, GenerateContentResponse, Part},
};

use super::read_json;

const SERVICE: &str = "Gemini";

/// A text-generation service: one prompt in, opaque text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

pub struct GeminiClient {
    http: Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            api_url: settings.gemini_api_url.clone(),
            model: settings.gemini_model.clone(),
            api_key: settings.gemini_api_key.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.api_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let generated: GenerateContentResponse = read_json(SERVICE, response).await?;
        response_text(generated)
    }
}

/// Concatenated text of the first candidate.
pub fn response_text(response: GenerateContentResponse) -> Result<String, ApiError> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| ApiError::Malformed {
            service: SERVICE,
            message: "response contains no candidates".to_string(),
        })?;

    Ok(content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join(""))
}
