//! Card composition: lay a decoded image (and optional greeting) onto a page
//! and write it as a single-page PDF.

pub mod font;
pub mod layout;
mod pdf;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;

use crate::acquire::GeneratedImage;
use crate::error::CardError;
use font::GREETING_SIZE;
use layout::{centered_plan, split_plan};
use pdf::{write_single_page, JpegImage, PagePainter};

const JPEG_QUALITY: u8 = 92;

/// Which page arrangement to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Landscape letter: stretched image on the left, greeting on the right.
    #[default]
    Split,
    /// Portrait letter: aspect-preserved image centered in the top half.
    Centered,
}

/// The greeting drawn on split-layout cards.
#[must_use]
pub fn greeting_text(name: &str) -> String {
    format!("Happy Birthday {name}!")
}

/// Writes card PDFs, staging the encoded image in a scratch directory.
#[derive(Debug, Clone)]
pub struct Composer {
    scratch_dir: PathBuf,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl Composer {
    /// Create a composer that stages temporary files in `scratch_dir`.
    #[must_use]
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self { scratch_dir: scratch_dir.into() }
    }

    /// Compose with the given layout. `greeting_name` only applies to [`Layout::Split`].
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Write`] if staging, encoding or writing fails.
    pub fn compose(
        &self,
        image: &GeneratedImage,
        output: &Path,
        layout: Layout,
        greeting_name: Option<&str>,
    ) -> Result<(), CardError> {
        match layout {
            Layout::Split => self.split(image, output, greeting_name),
            Layout::Centered => self.centered(image, output),
        }
    }

    /// Landscape card: image stretched over the left half, a separator at the
    /// midpoint, and "Happy Birthday {name}!" centered on the right half.
    /// Without a name the right half stays blank.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Write`] if staging, encoding or writing fails.
    pub fn split(
        &self,
        image: &GeneratedImage,
        output: &Path,
        greeting_name: Option<&str>,
    ) -> Result<(), CardError> {
        let plan = split_plan();

        let mut painter = PagePainter::default();
        painter.image(plan.image);
        painter.line((plan.separator_x, 0.0), (plan.separator_x, plan.page.height));
        if let Some(name) = greeting_name.filter(|n| !n.trim().is_empty()) {
            painter.centered_text(
                &greeting_text(name),
                GREETING_SIZE,
                plan.greeting_center_x,
                plan.greeting_baseline,
            );
        }

        self.write(image, plan.page, painter, "Birthday Card", output)
    }

    /// Portrait page with the image scaled to fit the top half and centered.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Write`] if staging, encoding or writing fails.
    pub fn centered(&self, image: &GeneratedImage, output: &Path) -> Result<(), CardError> {
        let plan = centered_plan(image.width, image.height);

        let mut painter = PagePainter::default();
        painter.image(plan.image);

        self.write(image, plan.page, painter, "Generated Image", output)
    }

    fn write(
        &self,
        image: &GeneratedImage,
        page: layout::PageSize,
        painter: PagePainter,
        title: &str,
        output: &Path,
    ) -> Result<(), CardError> {
        self.write_with(image, page, painter, title, output, BufWriter::new)
    }

    fn write_with<W: Write>(
        &self,
        image: &GeneratedImage,
        page: layout::PageSize,
        painter: PagePainter,
        title: &str,
        output: &Path,
        wrap: impl FnOnce(File) -> W,
    ) -> Result<(), CardError> {
        // Deleted on drop, on every return path below.
        let mut scratch = tempfile::Builder::new()
            .prefix("cardgen-")
            .suffix(".jpg")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| {
                CardError::Write(format!(
                    "Failed to create temporary file in {}: {e}",
                    self.scratch_dir.display()
                ))
            })?;

        let rgb = image.bitmap.to_rgb8();
        {
            let mut writer = BufWriter::new(scratch.as_file_mut());
            JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(|e| CardError::Write(format!("Failed to encode image: {e}")))?;
            writer
                .flush()
                .map_err(|e| CardError::Write(format!("Failed to stage image: {e}")))?;
        }

        let data = std::fs::read(scratch.path())
            .map_err(|e| CardError::Write(format!("Failed to read staged image: {e}")))?;
        let jpeg = JpegImage { width: rgb.width(), height: rgb.height(), data };

        write_single_page(page, jpeg, painter, title, output, wrap)?;
        tracing::info!(path = %output.display(), "card written");
        Ok(())
    }
}
