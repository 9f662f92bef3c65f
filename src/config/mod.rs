//! Configuration module for Shayari Studio.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the model
//! service, speech engines, session defaults and window, `AppPaths` for
//! cross-platform data directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, GeminiConfig, SessionDefaults, SpeechConfig, UiConfig, API_KEY_ENV,
};
