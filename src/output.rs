//! Output file naming and image archiving.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};

use crate::acquire::GeneratedImage;
use crate::error::CardError;

/// Default output file for personalized split-layout cards.
pub const DEFAULT_CARD_FILE: &str = "birthday_card.pdf";
/// Default output file for generic centered-layout PDFs.
pub const DEFAULT_IMAGE_FILE: &str = "generated_image.pdf";

const ARCHIVE_TIMESTAMP: &str = "%Y-%m-%d-%H-%M-%S";

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(0);

/// Timestamped archive filename: `YYYY-MM-DD-HH-MM-SS.png`.
#[must_use]
pub fn archive_filename(at: &DateTime<Local>) -> String {
    format!("{}.png", at.format(ARCHIVE_TIMESTAMP))
}

/// Save a decoded image as PNG under `dir` with a timestamp-based name.
///
/// Creates `dir` if needed. A name already taken within the same second gets
/// a `-1`, `-2`, ... suffix; names are claimed with create-new so concurrent
/// callers never share a file.
///
/// # Errors
///
/// Returns [`CardError::Write`] if the directory or file cannot be written.
pub fn archive_image(image: &GeneratedImage, dir: &Path) -> Result<PathBuf, CardError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| CardError::Write(format!("Failed to create {}: {e}", dir.display())))?;

    let (path, file) = create_unique(dir, &archive_filename(&Local::now()))?;
    let mut writer = BufWriter::new(file);
    let written = image
        .bitmap
        .write_to(&mut writer, image::ImageFormat::Png)
        .map_err(|e| e.to_string())
        .and_then(|()| writer.flush().map_err(|e| e.to_string()));
    if let Err(e) = written {
        drop(writer);
        let _ = std::fs::remove_file(&path);
        return Err(CardError::Write(format!("Failed to archive {}: {e}", path.display())));
    }

    tracing::debug!(path = %path.display(), "archived source image");
    Ok(path)
}

/// Fresh per-request PDF path inside `dir`: `card-<timestamp>-<seq>.pdf`.
#[must_use]
pub fn request_output_path(dir: &Path) -> PathBuf {
    let seq = REQUEST_SEQ.fetch_add(1, Ordering::Relaxed);
    let stamp = Local::now().format(ARCHIVE_TIMESTAMP);
    dir.join(format!("card-{stamp}-{seq}.pdf"))
}

/// Claim `file_name` in `dir`, or the first free `-N` variant of it.
fn create_unique(dir: &Path, file_name: &str) -> Result<(PathBuf, File), CardError> {
    let (stem, ext) = file_name.rsplit_once('.').unwrap_or((file_name, ""));
    let mut suffix = 0u32;
    loop {
        let path = if suffix == 0 {
            dir.join(file_name)
        } else {
            dir.join(format!("{stem}-{suffix}.{ext}"))
        };
        match File::create_new(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => {
                return Err(CardError::Write(format!(
                    "Failed to create {}: {e}",
                    path.display()
                )))
            }
        }
    }
}
