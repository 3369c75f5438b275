//! Uniform dispatch over the two generation capabilities.
//!
//! The dispatcher owns one backend per capability and routes a
//! [`GenerationRequest`] to the matching one via exhaustive matching on the
//! request variant.

use parlance_types::generation::{GenerationError, GenerationOutput, GenerationRequest};

use super::provider::{ImageGenerator, TextGenerator};

/// Routes generation requests to the capability-specific backend.
///
/// Holds exactly one text and one image backend. Each dispatch is a single
/// best-effort call; failure handling (the synthetic in-chat error message)
/// belongs to the session state manager, not here.
pub struct GenerationDispatcher<T: TextGenerator, I: ImageGenerator> {
    text: T,
    image: I,
}

impl<T: TextGenerator, I: ImageGenerator> GenerationDispatcher<T, I> {
    /// Create a dispatcher over the given backends.
    pub fn new(text: T, image: I) -> Self {
        Self { text, image }
    }

    /// Access the text backend.
    pub fn text(&self) -> &T {
        &self.text
    }

    /// Access the image backend.
    pub fn image(&self) -> &I {
        &self.image
    }

    /// Dispatch a request to the backend for its capability.
    #[tracing::instrument(skip(self, request), fields(capability = request_capability(request)))]
    pub async fn dispatch(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        match request {
            GenerationRequest::Text { prompt } => {
                let text = self.text.generate_text(prompt).await?;
                Ok(GenerationOutput::Text(text))
            }
            GenerationRequest::Image { prompt, model } => {
                let data_uri = self.image.generate_image(prompt, model.as_deref()).await?;
                Ok(GenerationOutput::Image(data_uri))
            }
        }
    }
}

fn request_capability(request: &GenerationRequest) -> &'static str {
    match request {
        GenerationRequest::Text { .. } => "text",
        GenerationRequest::Image { .. } => "image",
    }
}
