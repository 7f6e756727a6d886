//! Configuration file loading with environment variable overrides.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::live::openai::OPENAI_API_BASE;
use crate::error::CardError;
use crate::ports::image_generator::DEFAULT_MODEL;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Image provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Local artifact locations.
    #[serde(default)]
    pub output: OutputConfig,

    /// Web form server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Image provider settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key; the `OPENAI_API_KEY` environment variable takes precedence.
    pub api_key: Option<String>,
    /// Network timeout in seconds; the HTTP client default applies when unset.
    pub timeout_secs: Option<u64>,
    /// API root URL.
    pub base_url: String,
    /// Image model identifier.
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_secs: None,
            base_url: OPENAI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Local artifact locations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for timestamped copies of downloaded images.
    pub archive_dir: Option<PathBuf>,
    /// Directory for the composer's temporary files.
    pub scratch_dir: Option<PathBuf>,
}

/// Web form server settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: SocketAddr,
    /// Directory generated PDFs are written to.
    pub output_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: SocketAddr::from(([0, 0, 0, 0], 5000)), output_dir: PathBuf::from("cards") }
    }
}

/// Explicit construction-time options for the live provider client.
#[derive(Clone)]
pub struct ProviderOptions {
    /// Authentication token.
    pub api_key: String,
    /// Network timeout; `None` keeps the client default.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the provider API key, preferring the environment variable.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.provider.api_key.clone())
    }

    /// Resolve the explicit provider options.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::MissingApiKey`] if no key is configured.
    pub fn provider_options(&self) -> Result<ProviderOptions, CardError> {
        let api_key =
            self.api_key().ok_or(CardError::MissingApiKey { env_var: API_KEY_ENV.into() })?;
        Ok(ProviderOptions {
            api_key,
            timeout: self.provider.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Scratch directory for temporary files, defaulting to the system temp dir.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.output.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `CARDGEN_CONFIG` environment variable
/// 3. `~/.config/cardgen/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("CARDGEN_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/cardgen/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/cardgen/config.toml")
    } else {
        PathBuf::from("cardgen.toml")
    }
}
