//! Generation backend trait definitions.
//!
//! One trait per capability, each backed by a distinct external provider
//! with its own request/response shape and failure modes. Uses native async
//! fn in traits (RPITIT, Rust 2024 edition). Implementations live in
//! parlance-infra (e.g., `OpenRouterClient`, `StabilityClient`).

use parlance_types::generation::GenerationError;

/// Text-completion backend.
pub trait TextGenerator: Send + Sync {
    /// Send the prompt to the provider and extract a single reply string
    /// from the first returned choice.
    ///
    /// Returns an empty string when the provider's response shape lacks the
    /// reply field; the caller substitutes its placeholder. A single
    /// best-effort attempt -- no retry, no backoff.
    fn generate_text(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}

/// Image-synthesis backend.
pub trait ImageGenerator: Send + Sync {
    /// Send the prompt to the provider and extract one base64-encoded image
    /// from the response as a ready-to-render data URI.
    ///
    /// `model` overrides the provider's default image model when present.
    /// A single best-effort attempt -- no retry, no backoff.
    fn generate_image(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
