//! Speech input / output engines.
//!
//! # Architecture
//!
//! ```text
//!  SessionController ──start/stop/set_language──▶ Recognizer  (WhisperRecognizer)
//!                    ──speak/cancel────────────▶ Synthesizer (CommandSynthesizer)
//!         ▲
//!         └──────── SpeechEvent (tokio mpsc) ◀── both engines, from their own threads
//! ```
//!
//! Engines are fire-and-forget: calls return immediately and completion is
//! reported only through [`SpeechEvent`]s on the channel handed to the engine
//! at construction.

pub mod audio;
pub mod recognizer;
pub mod synthesizer;
pub mod whisper;

pub use recognizer::WhisperRecognizer;
pub use synthesizer::CommandSynthesizer;
pub use whisper::{TranscribeError, Transcriber};

use thiserror::Error;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Identifies one `speak` call so late callbacks can be matched.
pub type UtteranceId = u64;

/// Callbacks emitted by the engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// The recognizer produced a transcript.
    RecognitionResult(String),
    /// The recognizer stopped (completion, error, or explicit stop).
    RecognitionEnd,
    /// Audio output for the utterance began.
    UtteranceStarted(UtteranceId),
    /// Audio output for the utterance finished or was cancelled.
    UtteranceEnded(UtteranceId),
}

/// Sending half given to each engine.
pub type SpeechEventSender = mpsc::UnboundedSender<SpeechEvent>;

/// Receiving half owned by the session controller.
pub type SpeechEventReceiver = mpsc::UnboundedReceiver<SpeechEvent>;

pub fn speech_channel() -> (SpeechEventSender, SpeechEventReceiver) {
    mpsc::unbounded_channel()
}

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SpeechError {
    /// No recognition engine exists in this environment.
    #[error("Speech recognition is not supported on this system.")]
    Unavailable,

    /// The engine exists but refused the call.
    #[error("speech engine failed: {0}")]
    Engine(String),
}

// ---------------------------------------------------------------------------
// Engine traits
// ---------------------------------------------------------------------------

/// A speech-to-text engine producing at most one transcript per `start`.
pub trait Recognizer: Send {
    /// BCP-47 tag used for the next `start`.
    fn set_language(&mut self, tag: &str);
    fn start(&mut self) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

/// A text-to-speech engine playing one utterance at a time.
pub trait Synthesizer: Send {
    fn speak(&mut self, utterance: Utterance) -> Result<(), SpeechError>;
    /// Stop any utterance in progress. Safe to call when idle.
    fn cancel(&mut self);
}

/// Text to be spoken plus the voice language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub lang: &'static str,
}

// ---------------------------------------------------------------------------
// language_tag
// ---------------------------------------------------------------------------

/// Map a language name to the tag given to both engines.
///
/// ```
/// use shayari_studio::speech::language_tag;
///
/// assert_eq!(language_tag("Urdu"), "ur");
/// assert_eq!(language_tag("Tamil"), "hi-IN");
/// ```
pub fn language_tag(language: &str) -> &'static str {
    match language {
        "Hindi" => "hi-IN",
        "Urdu" => "ur",
        "English" => "en-US",
        _ => "hi-IN",
    }
}

/// Primary subtag of a language tag (`"hi-IN"` → `"hi"`).
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
