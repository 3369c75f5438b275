//! Generation request/response types for Parlance.
//!
//! The two backend capabilities (text completion, image synthesis) are
//! modeled as a tagged variant with a fixed case per capability, each
//! carrying its own request shape. Call sites match exhaustively, so adding
//! a capability is a compile-time event, not a string comparison.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A generation request for one of the two backend capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "lowercase")]
pub enum GenerationRequest {
    /// Text completion of a single user prompt.
    Text { prompt: String },

    /// Image synthesis from a text description.
    ///
    /// `model` overrides the provider's default image model when present.
    Image {
        prompt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
}

impl GenerationRequest {
    /// The prompt carried by either capability.
    pub fn prompt(&self) -> &str {
        match self {
            GenerationRequest::Text { prompt } => prompt,
            GenerationRequest::Image { prompt, .. } => prompt,
        }
    }
}

/// The successful result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutput {
    /// The provider's reply text. Empty when the provider's response shape
    /// lacked the expected field; callers substitute a placeholder.
    Text(String),

    /// One synthesized image as a ready-to-render data URI.
    Image(String),
}

/// Errors from generation-provider operations.
///
/// Every call is a single best-effort attempt; none of these variants is
/// retried by the dispatcher.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider credential was never provisioned. Checked before any
    /// network I/O; a configuration failure, not a retryable one.
    #[error("missing API credential for {provider}")]
    MissingCredential { provider: &'static str },

    /// The provider returned a non-success HTTP status.
    #[error("provider error: HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider was unreachable.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider's response body could not be decoded.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The response decoded but lacked a required field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
