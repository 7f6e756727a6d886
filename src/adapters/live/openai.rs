//! Live adapter for the `OpenAI` Images API.

use reqwest::Client;
use serde::Deserialize;

use super::build_client;
use crate::config::ProviderOptions;
use crate::error::CardError;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, GenerationResponse, ImageGenerator,
};

/// Public API root; tests point the generator elsewhere.
pub const OPENAI_API_BASE: &str = "https://api.openai.com";

const GENERATIONS_PATH: &str = "/v1/images/generations";

/// Live `OpenAI` image generator that requests URL-form results.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OpenAiGenerator {
    /// Create a generator from explicit provider options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(options: &ProviderOptions) -> Result<Self, CardError> {
        Ok(Self {
            client: build_client(options.timeout)?,
            api_key: options.api_key.clone(),
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Override the API root (e.g. a proxy or a test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl ImageGenerator for OpenAiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let body = serde_json::json!({
                "model": request.model,
                "prompt": request.prompt,
                "n": request.count,
                "size": request.size,
                "quality": request.quality,
                "response_format": "url",
            });

            let response = self
                .client
                .post(format!("{}{GENERATIONS_PATH}", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await
                .map_err(|e| CardError::Generation {
                    status: 0,
                    message: format!("Request failed: {e}"),
                })?;

            let status = response.status();
            let response_text = response.text().await.map_err(|e| CardError::Generation {
                status: status.as_u16(),
                message: format!("Failed to read response: {e}"),
            })?;

            if !status.is_success() {
                return Err(CardError::Generation {
                    status: status.as_u16(),
                    message: provider_detail(&response_text),
                });
            }

            let parsed: OpenAiResponse = serde_json::from_str(&response_text).map_err(|e| {
                CardError::Generation {
                    status: status.as_u16(),
                    message: format!("Failed to parse response: {e}"),
                }
            })?;

            let Some(item) = parsed.data.into_iter().next() else {
                return Err(CardError::Generation {
                    status: status.as_u16(),
                    message: format!("No images in response. Body: {}", truncate(&response_text)),
                });
            };
            let Some(url) = item.url else {
                return Err(CardError::Generation {
                    status: status.as_u16(),
                    message: "Response image has no URL".to_string(),
                });
            };

            tracing::debug!(status = status.as_u16(), "provider returned image url");
            Ok(GenerationResponse { url, revised_prompt: item.revised_prompt })
        })
    }
}

/// Prefer the provider's `error.message`, falling back to the raw body.
fn provider_detail(body: &str) -> String {
    serde_json::from_str::<OpenAiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| truncate(body))
}

fn truncate(text: &str) -> String {
    if text.len() > 500 {
        let cut = (0..=500).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &text[..cut])
    } else {
        text.to_string()
    }
}

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiErrorBody {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::image_generator::DEFAULT_MODEL;

    fn generator(base_url: &str) -> OpenAiGenerator {
        let options = ProviderOptions { api_key: "test-key".into(), timeout: None };
        OpenAiGenerator::new(&options).unwrap().with_base_url(base_url)
    }

    #[tokio::test]
    async fn returns_url_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATIONS_PATH)
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "dall-e-3",
                "n": 1,
                "size": "1024x1024",
                "quality": "standard",
                "response_format": "url",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "created": 1,
                    "data": [{"url": "https://img.example/abc.png", "revised_prompt": "a cake"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = generator(&server.url())
            .generate(&GenerationRequest::card(DEFAULT_MODEL, "a cake"))
            .await
            .unwrap();
        assert_eq!(response.url, "https://img.example/abc.png");
        assert_eq!(response.revised_prompt.as_deref(), Some("a cake"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejection_is_generation_error_with_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATIONS_PATH)
            .with_status(400)
            .with_body(
                r#"{"error": {"message": "Your request was rejected by the safety system."}}"#,
            )
            .create_async()
            .await;

        let err = generator(&server.url())
            .generate(&GenerationRequest::card(DEFAULT_MODEL, "x"))
            .await
            .unwrap_err();
        match err {
            CardError::Generation { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("safety system"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_data_is_generation_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATIONS_PATH)
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let err = generator(&server.url())
            .generate(&GenerationRequest::card(DEFAULT_MODEL, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, CardError::Generation { status: 200, .. }));
    }

    #[test]
    fn debug_redacts_key() {
        let printed = format!("{:?}", generator("http://localhost"));
        assert!(!printed.contains("test-key"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn truncate_long_bodies() {
        let long = "x".repeat(600);
        assert_eq!(truncate(&long).len(), 503);
        assert_eq!(truncate("short"), "short");
    }
}
