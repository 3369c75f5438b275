//! Configuration loader for Parlance.
//!
//! Reads `config.toml` from the data directory (`~/.parlance/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to
//! defaults when the file is missing or malformed. Provider credentials are
//! resolved from the environment, never from the config file.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::provider::openrouter::{DEFAULT_TEXT_MODEL, OpenRouterClient};
use crate::provider::stability::{DEFAULT_IMAGE_MODEL, StabilityClient};

/// Environment variable holding the OpenRouter API key.
pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Environment variable holding the Stability AI API key.
pub const STABILITY_API_KEY_VAR: &str = "STABILITY_API_KEY";

/// Top-level configuration for the Parlance core.
///
/// Loaded from `{data_dir}/config.toml`. All fields have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text-completion model sent to OpenRouter.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Image-synthesis model sent to Stability AI.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Database URL; `None` resolves to the default under the data dir.
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            text_model: default_text_model(),
            image_model: default_image_model(),
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Build the text-completion client with the env-resolved credential.
    pub fn text_client(&self) -> OpenRouterClient {
        OpenRouterClient::new(
            credential_from_env(OPENROUTER_API_KEY_VAR),
            self.text_model.clone(),
        )
    }

    /// Build the image-synthesis client with the env-resolved credential.
    pub fn image_client(&self) -> StabilityClient {
        StabilityClient::new(
            credential_from_env(STABILITY_API_KEY_VAR),
            self.image_model.clone(),
        )
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// The data directory: `PARLANCE_DATA_DIR`, falling back to `~/.parlance`.
pub fn data_dir() -> PathBuf {
    std::env::var("PARLANCE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".parlance")
        })
}

/// Resolve a provider credential from the environment.
///
/// Empty values count as absent, so an `X=""` export does not masquerade as
/// a provisioned key.
pub fn credential_from_env(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}
