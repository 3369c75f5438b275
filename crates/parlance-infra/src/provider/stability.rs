//! StabilityClient -- concrete [`ImageGenerator`] implementation.
//!
//! Sends a text-to-image request to the Stability AI generation API with
//! fixed synthesis parameters and extracts the first returned artifact as a
//! ready-to-render data URI. The API key is wrapped in
//! [`secrecy::SecretString`] and never appears in Debug output or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use parlance_core::generation::ImageGenerator;
use parlance_types::generation::GenerationError;

/// Default image-synthesis model (SDXL).
pub const DEFAULT_IMAGE_MODEL: &str = "stable-diffusion-xl-1024-v1-0";

// Fixed synthesis parameters: square SDXL output, single sample.
const CFG_SCALE: u32 = 7;
const IMAGE_SIZE: u32 = 1024;
const SAMPLES: u32 = 1;
const STEPS: u32 = 30;

/// Stability AI image-synthesis provider.
///
/// The credential is optional at construction: a client built without one
/// fails every call with [`GenerationError::MissingCredential`] before any
/// network I/O.
pub struct StabilityClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl StabilityClient {
    /// Create a new Stability client.
    pub fn new(api_key: Option<SecretString>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120)) // bounded: the provider has no server-side cap
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.stability.ai".to_string(),
            model: model.into(),
        }
    }

    /// The default image model for this client.
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
struct TextToImageRequest<'a> {
    text_prompts: Vec<TextPrompt<'a>>,
    cfg_scale: u32,
    height: u32,
    width: u32,
    samples: u32,
    steps: u32,
}

#[derive(Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Deserialize)]
struct Artifact {
    #[serde(default)]
    base64: Option<String>,
}

/// First artifact as a data URI, or `MalformedResponse` when absent.
fn extract_image(response: TextToImageResponse) -> Result<String, GenerationError> {
    response
        .artifacts
        .into_iter()
        .next()
        .and_then(|artifact| artifact.base64)
        .map(|b64| format!("data:image/png;base64,{b64}"))
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response contained no image artifact".to_string())
        })
}

impl ImageGenerator for StabilityClient {
    async fn generate_image(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_ref().ok_or(GenerationError::MissingCredential {
            provider: "stability",
        })?;

        let body = TextToImageRequest {
            text_prompts: vec![TextPrompt { text: prompt }],
            cfg_scale: CFG_SCALE,
            height: IMAGE_SIZE,
            width: IMAGE_SIZE,
            samples: SAMPLES,
            steps: STEPS,
        };
        let model = model.unwrap_or(&self.model);
        let url = format!("{}/v1/generation/{model}/text-to-image", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .header("Accept", "application/json")
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

        let generated: TextToImageResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Deserialization(e.to_string()))?;

        extract_image(generated)
    }
}
