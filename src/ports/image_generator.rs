//! Image generator port for the hosted text-to-image provider.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::CardError;

/// Model requested from the provider.
pub const DEFAULT_MODEL: &str = "dall-e-3";
/// Fixed square resolution for card artwork.
pub const CARD_IMAGE_SIZE: &str = "1024x1024";
/// Standard quality tier.
pub const CARD_IMAGE_QUALITY: &str = "standard";

/// A request to generate one image from a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Provider model identifier (e.g., `"dall-e-3"`).
    pub model: String,
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Pixel size (`"1024x1024"`).
    pub size: String,
    /// Quality tier (`"standard"`).
    pub quality: String,
    /// Number of images; always 1 for cards.
    pub count: u32,
}

impl GenerationRequest {
    /// Build the fixed card request (one square standard image) for a prompt.
    #[must_use]
    pub fn card(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            size: CARD_IMAGE_SIZE.to_string(),
            quality: CARD_IMAGE_QUALITY.to_string(),
            count: 1,
        }
    }
}

/// Provider response pointing at the generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Time-limited URL of the raw image bytes.
    pub url: String,
    /// Prompt as rewritten by the provider, when reported.
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerationResponse, CardError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Submit the request and return the retrieval URL.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_request_is_single_square_standard() {
        let request = GenerationRequest::card(DEFAULT_MODEL, "a cake");
        assert_eq!(request.model, "dall-e-3");
        assert_eq!(request.size, "1024x1024");
        assert_eq!(request.quality, "standard");
        assert_eq!(request.count, 1);
        assert_eq!(request.prompt, "a cake");
    }

    #[test]
    fn response_without_revised_prompt() {
        let parsed: GenerationResponse =
            serde_json::from_str(r#"{"url": "https://example.com/a.png"}"#).unwrap();
        assert_eq!(parsed.url, "https://example.com/a.png");
        assert!(parsed.revised_prompt.is_none());
    }
}
