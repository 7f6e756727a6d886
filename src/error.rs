//! Unified error type for cardgen.

use thiserror::Error;

/// Errors that can occur while building a card.
///
/// Each pipeline stage owns one variant; ambient failures (config, I/O,
/// credentials) have their own.
#[derive(Debug, Error)]
pub enum CardError {
    /// A required attribute is missing or blank.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The image provider refused or failed the generation request.
    #[error("Generation error ({status}): {message}")]
    Generation {
        /// HTTP status code reported by the provider (0 when not from HTTP).
        status: u16,
        /// Provider-supplied detail.
        message: String,
    },

    /// Fetching the generated image bytes failed.
    #[error("Download error: {0}")]
    Download(String),

    /// The downloaded bytes are not a decodable image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The PDF (or an archived image) could not be written.
    #[error("Write error: {0}")]
    Write(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// No API key configured for the provider.
    #[error("No API key for the image provider. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },
}

impl CardError {
    /// Whether the failure came from the external provider or download path.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Generation { .. } | Self::Download(_) | Self::Decode(_))
    }
}
