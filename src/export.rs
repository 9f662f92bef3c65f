//! Getting a result out of the app: plain-text download and clipboard copy.
//!
//! The clipboard helper opens a short-lived [`arboard::Clipboard`] per call;
//! the handle is not `Send` everywhere and is cheap to create.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// There is no result text to export.
    #[error("nothing to export")]
    NothingToExport,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("clipboard unavailable: {0}")]
    ClipboardAccess(String),

    #[error("failed to set clipboard text: {0}")]
    ClipboardSet(String),
}

/// File name for a downloaded result.
///
/// ```
/// use shayari_studio::export::export_file_name;
///
/// assert_eq!(export_file_name("Old Age"), "shayari_old_age.txt");
/// assert_eq!(export_file_name("  Rainy   Day "), "shayari_rainy_day.txt");
/// assert_eq!(export_file_name("Love/Hate"), "shayari_love_hate.txt");
/// ```
pub fn export_file_name(theme: &str) -> String {
    // Characters that are not valid in a file name count as word breaks.
    let cleaned: String = theme
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let slug = cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    format!("shayari_{slug}.txt")
}

/// Write `text` to `dir/shayari_<theme>.txt`, creating `dir` if needed.
///
/// An existing file of the same name is overwritten.
pub fn save_text_file(dir: &Path, theme: &str, text: &str) -> Result<PathBuf, ExportError> {
    if text.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let path = dir.join(export_file_name(theme));
    let write_err = |source| ExportError::Write {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(write_err)?;
    fs::write(&path, text).map_err(write_err)?;

    log::info!("exported result to {}", path.display());
    Ok(path)
}

/// Replace the system clipboard contents with `text`.
pub fn copy_to_clipboard(text: &str) -> Result<(), ExportError> {
    if text.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let mut clipboard =
        Clipboard::new().map_err(|e| ExportError::ClipboardAccess(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ExportError::ClipboardSet(e.to_string()))
}
