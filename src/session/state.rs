//! Session state machines and the editable input tuple.
//!
//! ```text
//! GenerationState:  Idle ──submit──▶ Pending ──outcome / cancel──▶ Idle
//!
//! SpeechState:      Idle ──start_listening──▶ Listening ──RecognitionEnd──▶ Idle
//!                   Idle ──speak──▶ Speaking  ──UtteranceEnded / stop──▶ Idle
//! ```
//!
//! Listening and Speaking are mutually exclusive; the controller stops one
//! before entering the other.

use crate::config::SessionDefaults;
use crate::generate::{GenerationRequest, Length};

// ---------------------------------------------------------------------------
// GenerationState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    /// Exactly one request is in flight.
    Pending,
}

impl GenerationState {
    /// ```
    /// use shayari_studio::session::GenerationState;
    ///
    /// assert!(GenerationState::Pending.is_busy());
    /// assert!(!GenerationState::Idle.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, GenerationState::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationState::Idle => "Idle",
            GenerationState::Pending => "Generating…",
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechState {
    #[default]
    Idle,
    /// The recognizer is capturing a theme.
    Listening,
    /// The synthesizer is reading the result aloud.
    Speaking,
}

impl SpeechState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, SpeechState::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeechState::Idle => "Idle",
            SpeechState::Listening => "Listening…",
            SpeechState::Speaking => "Speaking…",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionInput
// ---------------------------------------------------------------------------

/// The live parameters the user edits. Read at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInput {
    pub theme: String,
    pub language: String,
    pub custom_input: String,
    pub line_count: u32,
    pub length: Length,
}

impl SessionInput {
    /// Snapshot the current values as a request.
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            theme: self.theme.clone(),
            language: self.language.clone(),
            custom_input: self.custom_input.clone(),
            line_count: i64::from(self.line_count),
            length: self.length.clone(),
        }
    }
}

impl From<&SessionDefaults> for SessionInput {
    fn from(defaults: &SessionDefaults) -> Self {
        Self {
            theme: defaults.theme.clone(),
            language: defaults.language.clone(),
            custom_input: String::new(),
            line_count: defaults.line_count,
            length: defaults.length.clone(),
        }
    }
}

impl Default for SessionInput {
    fn default() -> Self {
        Self::from(&SessionDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_machines_start_idle() {
        assert_eq!(GenerationState::default(), GenerationState::Idle);
        assert_eq!(SpeechState::default(), SpeechState::Idle);
        assert!(!SpeechState::Idle.is_busy());
        assert!(SpeechState::Listening.is_busy());
        assert!(SpeechState::Speaking.is_busy());
    }

    #[test]
    fn default_input_matches_session_defaults() {
        let input = SessionInput::default();
        assert_eq!(input.theme, "Love");
        assert_eq!(input.language, "Hindi");
        assert_eq!(input.custom_input, "");
        assert_eq!(input.line_count, 4);
        assert_eq!(input.length, Length::Medium);
    }

    #[test]
    fn request_snapshot_copies_every_field() {
        let input = SessionInput {
            theme: "Rain".into(),
            language: "Urdu".into(),
            custom_input: "baarish".into(),
            line_count: 8,
            length: Length::Long,
        };
        let req = input.to_request();
        assert_eq!(req.theme, "Rain");
        assert_eq!(req.language, "Urdu");
        assert_eq!(req.custom_input, "baarish");
        assert_eq!(req.line_count, 8);
        assert_eq!(req.length, Length::Long);
    }
}
