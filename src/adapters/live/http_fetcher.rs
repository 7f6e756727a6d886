//! Live adapter that downloads generated images over plain HTTP.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::build_client;
use crate::error::CardError;
use crate::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};

/// Fetches image bytes with a plain GET request.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a fetcher with an optional request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Option<std::time::Duration>) -> Result<Self, CardError> {
        Ok(Self { client: build_client(timeout)? })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| CardError::Download(format!("GET failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(CardError::Download(format!("GET returned HTTP {}", status.as_u16())));
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let data = response
                .bytes()
                .await
                .map_err(|e| CardError::Download(format!("Failed to read body: {e}")))?
                .to_vec();

            tracing::debug!(bytes = data.len(), content_type = ?content_type, "downloaded image");
            Ok(FetchedImage { data, content_type })
        })
    }
}
