//! Web form front end: `GET /` renders the form, `POST /` returns the PDF.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::compose::Layout;
use crate::context::ServiceContext;
use crate::error::CardError;
use crate::model::{split_interests, Attributes};
use crate::output::{request_output_path, DEFAULT_CARD_FILE};
use crate::pipeline::{generate_card, CardOptions};

const FORM_PAGE: &str = include_str!("form.html");

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Provider ports.
    pub ctx: Arc<ServiceContext>,
    /// Directory each request's PDF is staged in until it is served.
    pub output_dir: PathBuf,
    /// Optional archive directory for decoded images.
    pub archive_dir: Option<PathBuf>,
    /// Scratch directory for the composer.
    pub scratch_dir: PathBuf,
}

/// Raw form fields as submitted by the browser.
#[derive(Debug, Default, Deserialize)]
pub struct CardForm {
    /// Recipient age (required).
    #[serde(default)]
    pub age: String,
    /// Gender clause.
    #[serde(default)]
    pub gender: String,
    /// Comma-separated interests.
    #[serde(default)]
    pub interests: String,
    /// Art style.
    #[serde(default)]
    pub style: String,
    /// Color scheme.
    #[serde(default)]
    pub color_scheme: String,
    /// Recipient name for the greeting.
    #[serde(default)]
    pub name: String,
}

impl CardForm {
    /// Normalize form fields: trim, drop blanks, split interests on commas.
    #[must_use]
    pub fn into_attributes(self) -> Attributes {
        fn present(value: String) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        Attributes {
            age: self.age.trim().to_string(),
            gender: present(self.gender),
            interests: split_interests(&self.interests),
            style: present(self.style),
            color_scheme: present(self.color_scheme),
            name: present(self.name),
        }
    }
}

/// Wraps [`CardError`] for conversion into an HTTP response.
pub struct ApiError(CardError);

impl From<CardError> for ApiError {
    fn from(err: CardError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            CardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), error = %self.0, "card request failed");
        let message = match &self.0 {
            CardError::MissingApiKey { .. } | CardError::Config(_) | CardError::Io(_) => {
                "The card service is not configured correctly.".to_string()
            }
            other => other.to_string(),
        };
        (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
    }
}

/// Build the router serving the form and the card endpoint.
pub fn build_router(state: AppState) -> Router {
    Router::new().route("/", get(show_form).post(create_card)).with_state(state)
}

/// Bind `addr`, returning the actual address (useful with port 0) and the
/// serving future.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn bind(
    router: Router,
    addr: SocketAddr,
) -> Result<(SocketAddr, impl std::future::Future<Output = std::io::Result<()>>), CardError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    Ok((local, async move { axum::serve(listener, router).await }))
}

async fn show_form() -> Html<&'static str> {
    Html(FORM_PAGE)
}

async fn create_card(
    State(state): State<AppState>,
    Form(form): Form<CardForm>,
) -> Result<Response, ApiError> {
    let attributes = form.into_attributes();
    tokio::fs::create_dir_all(&state.output_dir).await.map_err(CardError::Io)?;

    let options = CardOptions {
        layout: Layout::Split,
        output: request_output_path(&state.output_dir),
        archive_dir: state.archive_dir.clone(),
        scratch_dir: state.scratch_dir.clone(),
    };
    tracing::info!(output = %options.output.display(), "card requested");

    let path = generate_card(&state.ctx, &attributes, &options).await?;
    let bytes = tokio::fs::read(&path).await;
    // The response carries the card; nothing is kept on disk per request.
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove served card");
    }
    let bytes = bytes.map_err(CardError::Io)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{DEFAULT_CARD_FILE}\"")),
        ],
        bytes,
    )
        .into_response())
}
