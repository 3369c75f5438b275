//! HTTP provider clients for the two generation capabilities.

pub mod openrouter;
pub mod stability;

pub use openrouter::OpenRouterClient;
pub use stability::StabilityClient;
