//! OpenRouterClient -- concrete [`TextGenerator`] implementation.
//!
//! Sends a single-turn chat-completion request to the OpenRouter API and
//! extracts the first choice's reply text. The API key is wrapped in
//! [`secrecy::SecretString`] and never appears in Debug output or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use parlance_core::generation::TextGenerator;
use parlance_types::generation::GenerationError;

/// Default text-completion model.
pub const DEFAULT_TEXT_MODEL: &str = "google/gemma-3n-e2b-it:free";

/// OpenRouter text-completion provider.
///
/// The credential is optional at construction: a client built without one
/// fails every call with [`GenerationError::MissingCredential`] before any
/// network I/O.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client.
    pub fn new(api_key: Option<SecretString>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120)) // bounded: the provider has no server-side cap
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://openrouter.ai".to_string(),
            model: model.into(),
        }
    }

    /// The configured completion model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Tolerant response shape: every level may be missing, in which case the
/// extracted reply degrades to an empty string.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Reply text from the first choice, or empty when the shape lacks it.
fn extract_reply(response: ChatCompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default()
}

impl TextGenerator for OpenRouterClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_ref().ok_or(GenerationError::MissingCredential {
            provider: "openrouter",
        })?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };
        let url = format!("{}/api/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Deserialization(e.to_string()))?;

        Ok(extract_reply(completion))
    }
}
