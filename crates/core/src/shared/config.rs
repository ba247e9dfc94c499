use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{DEFAULT_API_BASE_URL, MODEL_FALLBACK_URL};

pub const ENV_API_BASE_URL: &str = "FACE_CAPTURE_API_BASE_URL";
pub const ENV_MODELS_PATH: &str = "FACE_CAPTURE_MODELS_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the detection model is looked up.
///
/// `primary` is a local directory (or file) holding a pre-downloaded bundle;
/// `fallback` is a base URL tried once when the primary fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelLocations {
    pub primary: String,
    pub fallback: String,
}

impl Default for ModelLocations {
    fn default() -> Self {
        Self {
            primary: default_model_dir().to_string_lossy().into_owned(),
            fallback: MODEL_FALLBACK_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub api_base_url: String,
    pub models: ModelLocations,
    pub mirror: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            models: ModelLocations::default(),
            mirror: false,
        }
    }
}

impl CaptureConfig {
    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Applies `FACE_CAPTURE_*` environment overrides.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(path) = lookup(ENV_MODELS_PATH).filter(|v| !v.is_empty()) {
            self.models.primary = path;
        }
        self
    }
}

/// Platform-specific directory for the pre-downloaded model bundle.
///
/// - macOS: `~/Library/Application Support/FaceCapture/models/`
/// - Linux: `$XDG_CACHE_HOME/FaceCapture/models/` or `~/.cache/FaceCapture/models/`
/// - Windows: `%LOCALAPPDATA%/FaceCapture/models/`
///
/// Falls back to `./models` when no such directory exists.
pub fn default_model_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join("FaceCapture").join("models"))
        .unwrap_or_else(|| PathBuf::from("models"))
}
