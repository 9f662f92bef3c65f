//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::generate::Length;

/// Environment variable that overrides [`GeminiConfig::api_key`].
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// GeminiConfig
// ---------------------------------------------------------------------------

/// Connection settings for the external generative-model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Model-access credential. `None` (or an empty string) means the
    /// orchestrator answers every request with a `Configuration` error.
    pub api_key: Option<String>,
    /// Versioned API root, e.g. `https://generativelanguage.googleapis.com/v1`.
    pub base_url: String,
    /// Model identifier placed in the request path.
    pub model: String,
    /// Client-side request timeout. `None` leaves it to the transport.
    pub timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1".into(),
            model: "gemini-1.5-flash".into(),
            timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    /// The configured credential, treating an empty or blank key as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Voice input / output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// GGML model file name looked up in the models directory.
    pub whisper_model: String,
    /// Text-to-speech program (espeak-compatible command line).
    pub tts_program: String,
    /// Hard cap on a single listening session.
    pub max_listen_secs: u64,
    /// Trailing silence that ends a listening session once speech was heard.
    pub end_silence_ms: u64,
    /// RMS amplitude above which a frame counts as speech.
    pub vad_threshold: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            whisper_model: "ggml-base.bin".into(),
            tts_program: "espeak-ng".into(),
            max_listen_secs: 10,
            end_silence_ms: 1_500,
            vad_threshold: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionDefaults
// ---------------------------------------------------------------------------

/// Initial values of the editable session input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub theme: String,
    pub language: String,
    pub line_count: u32,
    pub length: Length,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            theme: "Love".into(),
            language: "Hindi".into(),
            line_count: 4,
            length: Length::Medium,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Where "Download" writes text files. `None` uses the platform download
    /// directory.
    pub export_dir: Option<PathBuf>,
    /// Initial inner window size in logical pixels.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            export_dir: None,
            window_size: (560.0, 760.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use shayari_studio::config::AppConfig;
///
/// // Load (returns Default when file is missing), then let the environment
/// // supply the credential.
/// let mut config = AppConfig::load().unwrap();
/// config.apply_env();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model service connection.
    pub gemini: GeminiConfig,
    /// Voice input / output.
    pub speech: SpeechConfig,
    /// Initial session input.
    pub session: SessionDefaults,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Let `GEMINI_API_KEY` override the file credential when it is set and
    /// non-empty.
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
