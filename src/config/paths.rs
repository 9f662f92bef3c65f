//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\shayari-studio\
//!   macOS:   ~/Library/Application Support/shayari-studio/
//!   Linux:   ~/.config/shayari-studio/
//!
//! Data dir (favorites store, Whisper models):
//!   Windows: %LOCALAPPDATA%\shayari-studio\
//!   macOS:   ~/Library/Application Support/shayari-studio/
//!   Linux:   ~/.local/share/shayari-studio/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory backing the key-value store (one JSON file per key).
    pub store_dir: PathBuf,
    /// Directory for downloaded GGML Whisper model files.
    pub models_dir: PathBuf,
    /// Default target for exported `.txt` files.
    pub export_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "shayari-studio";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let export_dir = dirs::download_dir()
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            store_dir: data_dir.join("store"),
            models_dir: data_dir.join("models"),
            export_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.models_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths.store_dir.ends_with("store"));
    }
}
