//! Whisper transcription for voice input.
//!
//! [`Transcriber`] wraps a `whisper_rs::WhisperContext` loaded once at
//! startup. A fresh `WhisperState` is created per call, so one transcriber
//! can be shared behind an `Arc` by successive listening sessions.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// 0.5 s at 16 kHz. Whisper output on shorter clips is mostly noise.
pub const MIN_AUDIO_SAMPLES: usize = 8_000;

#[derive(Debug, Clone, Error)]
pub enum TranscribeError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Audio too short (minimum 0.5 s)")]
    AudioTooShort,
}

pub struct Transcriber {
    ctx: WhisperContext,
    n_threads: i32,
}

impl std::fmt::Debug for Transcriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcriber")
            .field("n_threads", &self.n_threads)
            .finish_non_exhaustive()
    }
}

// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs; the model
// weights are read-only after loading.
unsafe impl Send for Transcriber {}
unsafe impl Sync for Transcriber {}

impl Transcriber {
    /// Load a GGML model file.
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, TranscribeError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(TranscribeError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            TranscribeError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| TranscribeError::ContextInit(e.to_string()))?;

        Ok(Self {
            ctx,
            n_threads: optimal_threads(),
        })
    }

    /// Transcribe 16 kHz mono audio spoken in `language` (ISO-639-1).
    pub fn transcribe(&self, audio: &[f32], language: &str) -> Result<String, TranscribeError> {
        if audio.len() < MIN_AUDIO_SAMPLES {
            return Err(TranscribeError::AudioTooShort);
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(language));
        params.set_n_threads(self.n_threads);
        params.set_print_progress(false);
        params.set_print_realtime(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| TranscribeError::ContextInit(e.to_string()))?;

        state
            .full(params, audio)
            .map_err(|e| TranscribeError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| TranscribeError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| TranscribeError::Transcription(format!("segment {i}: {e}")))?;
            text.push_str(&segment);
        }

        Ok(text.trim().to_string())
    }
}

/// CPU threads for inference, capped at 8.
fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_model_returns_model_not_found() {
        let result = Transcriber::load("/nonexistent/ggml-base.bin");
        assert!(
            matches!(result, Err(TranscribeError::ModelNotFound(_))),
            "expected ModelNotFound, got: {result:?}"
        );
    }

    #[test]
    fn model_not_found_names_the_path() {
        let e = TranscribeError::ModelNotFound("/some/path.bin".into());
        assert!(e.to_string().contains("/some/path.bin"));
    }

    #[test]
    fn thread_count_is_bounded() {
        let t = optimal_threads();
        assert!((1..=8).contains(&t));
    }
}
