//! End-to-end card pipeline: prompt → image → PDF.

use std::path::PathBuf;

use crate::acquire::ImageAcquirer;
use crate::compose::{Composer, Layout};
use crate::context::ServiceContext;
use crate::error::CardError;
use crate::model::Attributes;
use crate::output::archive_image;
use crate::prompt::build_prompt;

/// Where and how a single card is produced.
#[derive(Debug, Clone)]
pub struct CardOptions {
    /// Page arrangement.
    pub layout: Layout,
    /// Destination PDF path.
    pub output: PathBuf,
    /// When set, the decoded image is also saved here as a timestamped PNG.
    pub archive_dir: Option<PathBuf>,
    /// Directory for the composer's temporary file.
    pub scratch_dir: PathBuf,
}

impl CardOptions {
    /// Options for `output` with the given layout, no archive, system temp dir.
    #[must_use]
    pub fn new(layout: Layout, output: impl Into<PathBuf>) -> Self {
        Self {
            layout,
            output: output.into(),
            archive_dir: None,
            scratch_dir: std::env::temp_dir(),
        }
    }
}

/// Generate one card and return the path it was written to.
///
/// Stages run strictly in order; the first failure aborts the rest and no
/// PDF is written.
///
/// # Errors
///
/// Returns the [`CardError`] of the failing stage, unmodified.
pub async fn generate_card(
    ctx: &ServiceContext,
    attributes: &Attributes,
    options: &CardOptions,
) -> Result<PathBuf, CardError> {
    let prompt = build_prompt(attributes)?;
    tracing::debug!(chars = prompt.len(), %prompt, "prompt built");

    let image = ImageAcquirer::new(ctx).acquire(&prompt).await?;

    let composer = Composer::new(options.scratch_dir.clone());
    let archive_dir = options.archive_dir.clone();
    let output = options.output.clone();
    let layout = options.layout;
    let greeting = attributes.greeting_name().map(String::from);

    // PNG and JPEG encoding plus file writes stay off the async workers.
    tokio::task::spawn_blocking(move || {
        if let Some(dir) = &archive_dir {
            archive_image(&image, dir)?;
        }
        composer.compose(&image, &output, layout, greeting.as_deref()).map(|()| output)
    })
    .await
    .map_err(|e| CardError::Write(format!("Compose task failed: {e}")))?
}
