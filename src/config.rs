//! Configuration management for dialogue synthesis

use crate::audio::WavFileSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default Gemini TTS model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default Gemini API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Dialogue file shipped with the crate
pub const BUNDLED_DIALOGUES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_dialogues.json");

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API configuration
    pub api: ApiConfig,
    /// WAV output parameters
    pub audio: WavFileSpec,
    /// Dialogue source configuration
    pub dialogues: DialogueConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // API config
        if let Some(api_key) = var(API_KEY_ENV) {
            if !api_key.trim().is_empty() {
                config.api.api_key = Some(ApiKey::new(api_key.trim()));
            }
        }
        if let Some(model) = var("GEMINI_TTS_MODEL") {
            config.api.model = model;
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            config.api.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = var("GEMINI_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                config.api.timeout_secs = t;
            }
        }

        // Audio config
        if let Some(channels) = var("TTS_CHANNELS") {
            if let Ok(c) = channels.parse() {
                config.audio.channels = c;
            }
        }
        if let Some(rate) = var("TTS_SAMPLE_RATE") {
            if let Ok(r) = rate.parse() {
                config.audio.sample_rate_hz = r;
            }
        }
        if let Some(width) = var("TTS_SAMPLE_WIDTH") {
            if let Ok(w) = width.parse() {
                config.audio.sample_width_bytes = w;
            }
        }

        // Dialogue source
        if let Some(path) = var("DIALOGUES_PATH") {
            config.dialogues.path = PathBuf::from(path);
        }

        config
    }
}

/// Provider credential. Debug output never shows the key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key; `None` makes every synthesis call fail
    pub api_key: Option<ApiKey>,
    /// Model id (flash or pro preview TTS)
    pub model: String,
    /// Base URL of the Generative Language API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

/// Dialogue source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// JSON file with sample dialogues
    pub path: PathBuf,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(BUNDLED_DIALOGUES),
        }
    }
}
