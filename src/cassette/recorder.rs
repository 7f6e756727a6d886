//! Collects port calls and writes them out as a cassette.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Call, Cassette, CassetteError, Interaction};

/// Accumulates interactions in call order.
///
/// Nothing touches disk until [`finish`](Self::finish).
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Start a recording destined for `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            cassette: Cassette {
                name: name.into(),
                recorded_at: Utc::now(),
                commit: commit.into(),
                interactions: Vec::new(),
            },
        }
    }

    /// Append one call with its serialized input and result.
    pub fn record(&mut self, call: Call, input: serde_json::Value, output: serde_json::Value) {
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: call.port().to_string(),
            method: call.method().to_string(),
            input,
            output,
        });
    }

    /// Write the cassette and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Write`] if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, CassetteError> {
        self.cassette.save(&self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            interactions = self.cassette.interactions.len(),
            "cassette written"
        );
        Ok(self.path)
    }
}
