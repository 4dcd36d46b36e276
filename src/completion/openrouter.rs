//! Reqwest-backed adapter for an OpenAI-compatible chat-completions endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, CompletionError};
use crate::config::CompletionConfig;

/// Header carrying the calling site's URL.
pub const REFERER_HEADER: &str = "HTTP-Referer";
/// Header carrying the calling site's display name.
pub const TITLE_HEADER: &str = "X-Title";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Completion client that posts to `{base_url}/chat/completions`.
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    site_url: String,
    site_title: String,
}

impl OpenRouterClient {
    /// Build a client from configuration. No request timeout is set beyond reqwest's default.
    pub fn new(config: &CompletionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            site_url: config.site_url.clone(),
            site_title: config.site_title.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let request = ChatCompletionRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model, prompt_len = prompt.len(), "Requesting completion");

        let response = self
            .client
            .post(self.endpoint.as_str())
            .bearer_auth(api_key)
            .header(REFERER_HEADER, self.site_url.as_str())
            .header(TITLE_HEADER, self.site_title.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status { status, body });
        }

        parse_completion(&body)
    }
}

fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let decoded: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Decode(e.to_string()))?;

    decoded
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(CompletionError::EmptyResponse)
}
