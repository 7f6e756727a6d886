//! On-disk cassette format.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A port call that can be recorded and replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    /// `ImageGenerator::generate`.
    Generate,
    /// `ImageFetcher::fetch`.
    Fetch,
}

impl Call {
    /// Port name as written in cassettes.
    #[must_use]
    pub fn port(self) -> &'static str {
        match self {
            Self::Generate => "image_generator",
            Self::Fetch => "image_fetcher",
        }
    }

    /// Method name as written in cassettes.
    #[must_use]
    pub fn method(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Fetch => "fetch",
        }
    }

    /// Look up the call recorded under `port`/`method`.
    #[must_use]
    pub fn from_parts(port: &str, method: &str) -> Option<Self> {
        [Self::Generate, Self::Fetch].into_iter().find(|c| c.port() == port && c.method() == method)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.port(), self.method())
    }
}

/// Failure reading or writing a cassette file.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The file could not be read.
    #[error("Failed to read cassette file {path}: {source}")]
    Read {
        /// Cassette path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid cassette.
    #[error("Failed to parse cassette file {path}: {source}")]
    Parse {
        /// Cassette path.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },

    /// The cassette could not be serialized or written.
    #[error("Failed to write cassette file {path}: {message}")]
    Write {
        /// Cassette path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}

/// A recorded session of port interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in the order they happened.
    pub interactions: Vec<Interaction>,
}

/// Failure stored under `Err` in an interaction output.
///
/// Only the stage detail is kept, so replay can rebuild the same error
/// variant without re-parsing its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedError {
    /// Provider HTTP status, for generation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Stage detail without the error-kind prefix.
    pub message: String,
}

/// One call across a port boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Global sequence number within the cassette.
    pub seq: u64,
    /// Port name (`"image_generator"`, `"image_fetcher"`).
    pub port: String,
    /// Method name on the port.
    pub method: String,
    /// Serialized call input.
    pub input: serde_json::Value,
    /// Serialized result using the `{"Ok": ..}` / `{"Err": {..}}` convention.
    pub output: serde_json::Value,
}

impl Cassette {
    /// Read and parse a cassette YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Read`] or [`CassetteError::Parse`].
    pub fn load(path: &Path) -> Result<Self, CassetteError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CassetteError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| CassetteError::Parse { path: path.to_path_buf(), source })
    }

    /// Write the cassette as YAML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Write`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), CassetteError> {
        let write_err =
            |message: String| CassetteError::Write { path: path.to_path_buf(), message };

        let yaml = serde_yaml::to_string(self).map_err(|e| write_err(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        std::fs::write(path, yaml).map_err(|e| write_err(e.to_string()))
    }
}
