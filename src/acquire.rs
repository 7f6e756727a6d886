//! Image acquisition: generate, download, decode.

use image::{DynamicImage, GenericImageView};

use crate::context::ServiceContext;
use crate::error::CardError;
use crate::ports::GenerationRequest;

/// A decoded bitmap ready for page composition.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Decoded pixels.
    pub bitmap: DynamicImage,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl GeneratedImage {
    /// Wrap a bitmap, capturing its dimensions.
    #[must_use]
    pub fn new(bitmap: DynamicImage) -> Self {
        let (width, height) = bitmap.dimensions();
        Self { bitmap, width, height }
    }
}

/// Runs the generate → fetch → decode stages against a service context.
pub struct ImageAcquirer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ImageAcquirer<'a> {
    /// Create an acquirer borrowing the given ports.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Acquire a decoded image for `prompt`. No stage is retried.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Generation`], [`CardError::Download`] or
    /// [`CardError::Decode`] for the stage that failed.
    pub async fn acquire(&self, prompt: &str) -> Result<GeneratedImage, CardError> {
        let request = GenerationRequest::card(&self.ctx.model, prompt);
        let generated = self.ctx.generator.generate(&request).await?;
        tracing::info!(model = %request.model, "image generated");
        let host = reqwest::Url::parse(&generated.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        tracing::debug!(%host, "downloading image");

        let fetched = self.ctx.fetcher.fetch(&generated.url).await?;
        let image = decode_image(&fetched.data)?;
        tracing::info!(width = image.width, height = image.height, "image decoded");
        Ok(image)
    }
}

/// Decode raw bytes into a bitmap, sniffing the format from its magic bytes.
///
/// # Errors
///
/// Returns [`CardError::Decode`] if the bytes are not a supported image.
pub fn decode_image(data: &[u8]) -> Result<GeneratedImage, CardError> {
    image::load_from_memory(data)
        .map(GeneratedImage::new)
        .map_err(|e| CardError::Decode(format!("Failed to decode image: {e}")))
}
