//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::http_fetcher::HttpImageFetcher;
use crate::adapters::live::openai::OpenAiGenerator;
use crate::adapters::recording::image_fetcher::RecordingImageFetcher;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_fetcher::ReplayingImageFetcher;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::CardError;
use crate::ports::{ImageFetcher, ImageGenerator};

/// Environment variable naming a cassette to replay.
pub const REPLAY_ENV: &str = "CARDGEN_REPLAY";
/// Environment variable enabling recording (`1` or `true`).
pub const RECORD_ENV: &str = "CARDGEN_REC";

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
    /// Image download port.
    pub fetcher: Box<dyn ImageFetcher>,
    /// Model requested from the generator.
    pub model: String,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| e.to_string())
    }
}

impl ServiceContext {
    /// Assemble a context from arbitrary port implementations.
    #[must_use]
    pub fn new(
        generator: Box<dyn ImageGenerator>,
        fetcher: Box<dyn ImageFetcher>,
        model: impl Into<String>,
    ) -> Self {
        Self { generator, fetcher, model: model.into() }
    }

    /// Create a live context talking to the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured or a client cannot be built.
    pub fn live(config: &Config) -> Result<Self, CardError> {
        let options = config.provider_options()?;
        let generator =
            OpenAiGenerator::new(&options)?.with_base_url(config.provider.base_url.clone());
        let fetcher = HttpImageFetcher::new(options.timeout)?;
        Ok(Self::new(Box::new(generator), Box::new(fetcher), config.provider.model.clone()))
    }

    /// Create a recording context that wraps the live adapters with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), CardError> {
        let live_ctx = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".cardgen/cassettes")
            .join(&timestamp)
            .join("provider.cassette.yaml");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-provider"),
            get_commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live_ctx.generator, Arc::clone(&recorder));
        let fetcher = RecordingImageFetcher::new(live_ctx.fetcher, Arc::clone(&recorder));

        let ctx = Self::new(Box::new(generator), Box::new(fetcher), live_ctx.model);
        Ok((ctx, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path, config: &Config) -> Result<Self, CardError> {
        let replayer = CassetteReplayer::open(path)
            .map_err(|e| CardError::Config(format!("Failed to load cassette: {e}")))?;
        let replayer = Arc::new(Mutex::new(replayer));
        Ok(Self::new(
            Box::new(ReplayingImageGenerator::new(Arc::clone(&replayer))),
            Box::new(ReplayingImageFetcher::new(replayer)),
            config.provider.model.clone(),
        ))
    }

    /// Pick replay, recording or live mode from `CARDGEN_REPLAY` / `CARDGEN_REC`.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected context cannot be created.
    pub fn from_env(config: &Config) -> Result<(Self, Option<RecordingSession>), CardError> {
        if let Ok(cassette_path) = std::env::var(REPLAY_ENV) {
            tracing::info!(cassette = %cassette_path, "replaying provider interactions");
            return Ok((Self::replaying(Path::new(&cassette_path), config)?, None));
        }

        let is_recording = std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1");
        if is_recording {
            tracing::info!("recording provider interactions");
            let (ctx, session) = Self::recording(config)?;
            return Ok((ctx, Some(session)));
        }

        Ok((Self::live(config)?, None))
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaying_missing_cassette_is_config_error() {
        let result = ServiceContext::replaying(Path::new("/nonexistent.yaml"), &Config::default());
        assert!(matches!(result, Err(CardError::Config(_))));
    }

    #[test]
    fn live_uses_configured_model() {
        let mut config = Config::default();
        config.provider.api_key = Some("k".into());
        config.provider.model = "dall-e-2".into();
        let ctx = ServiceContext::live(&config).unwrap();
        assert_eq!(ctx.model, "dall-e-2");
    }
}
