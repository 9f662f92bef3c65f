//! [`SessionController`]: the single owner of session-local state.
//!
//! All mutation happens on the owner's thread. Generation outcomes and
//! speech-engine callbacks arrive on channels and take effect only when the
//! owner calls [`SessionController::poll`] (once per UI frame) or
//! [`SessionController::apply`] with an event from
//! [`SessionController::next_event`].
//!
//! # Flow
//!
//! ```text
//! submit() ──spawn──▶ Generator::generate ──SessionEvent::Generated{id}──▶ apply()
//!                                                     (ignored unless id is pending)
//! speak() / start_listening() ──▶ engines ──SpeechEvent──▶ apply()
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::export::{self, ExportError};
use crate::generate::{GenerationOutcome, Generator};
use crate::speech::{
    language_tag, Recognizer, SpeechError, SpeechEvent, SpeechEventReceiver, Synthesizer,
    Utterance, UtteranceId,
};

use super::favorites::FavoritesList;
use super::state::{GenerationState, SessionInput, SpeechState};

/// Identifies one `submit` call.
pub type RequestId = u64;

/// Message shown when `speak` is used without a synthesizer.
pub const NO_SYNTHESIZER_NOTICE: &str = "Speech output is not available on this system.";

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Everything that can change the session from outside a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A generation call resolved.
    Generated {
        id: RequestId,
        outcome: GenerationOutcome,
    },
    /// A speech engine callback.
    Speech(SpeechEvent),
}

struct PendingRequest {
    id: RequestId,
    cancel: CancellationToken,
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

pub struct SessionController {
    input: SessionInput,

    pending: Option<PendingRequest>,
    next_request_id: RequestId,
    result: Option<String>,
    error: Option<String>,

    favorites: FavoritesList,

    speech: SpeechState,
    current_utterance: Option<UtteranceId>,
    next_utterance_id: UtteranceId,
    notice: Option<String>,

    generator: Arc<dyn Generator>,
    runtime: Handle,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    speech_rx: SpeechEventReceiver,

    recognizer: Option<Box<dyn Recognizer>>,
    synthesizer: Option<Box<dyn Synthesizer>>,
}

impl SessionController {
    /// A controller with default input and no speech engines.
    ///
    /// `runtime` runs generation calls; `speech_events` is the receiving end
    /// of the channel the engines were built with.
    pub fn new(
        generator: Arc<dyn Generator>,
        runtime: Handle,
        favorites: FavoritesList,
        speech_events: SpeechEventReceiver,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            input: SessionInput::default(),
            pending: None,
            next_request_id: 1,
            result: None,
            error: None,
            favorites,
            speech: SpeechState::Idle,
            current_utterance: None,
            next_utterance_id: 1,
            notice: None,
            generator,
            runtime,
            events_tx,
            events_rx,
            speech_rx: speech_events,
            recognizer: None,
            synthesizer: None,
        }
    }

    pub fn with_input(mut self, input: SessionInput) -> Self {
        self.input = input;
        self
    }

    /// `None` means no recognition engine exists; `start_listening` then
    /// only raises a notice.
    pub fn with_recognizer(mut self, recognizer: Option<Box<dyn Recognizer>>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Option<Box<dyn Synthesizer>>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    // ---- input -------------------------------------------------------------

    pub fn input(&self) -> &SessionInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut SessionInput {
        &mut self.input
    }

    // ---- generation --------------------------------------------------------

    /// Dispatch one generation request built from the current input.
    ///
    /// Returns `false` (and does nothing) while a request is pending.
    pub fn submit(&mut self) -> bool {
        if self.pending.is_some() {
            log::debug!("session: submit ignored, request already pending");
            return false;
        }

        let id = self.next_request_id;
        self.next_request_id += 1;
        let cancel = CancellationToken::new();
        let request = self.input.to_request();

        self.error = None;
        self.pending = Some(PendingRequest {
            id,
            cancel: cancel.clone(),
        });
        log::debug!("session: Idle -> Pending (request {id})");

        let generator = Arc::clone(&self.generator);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let outcome = generator.generate(request, cancel).await;
            // Receiver gone means the session was torn down.
            let _ = tx.send(SessionEvent::Generated { id, outcome });
        });
        true
    }

    /// Abandon the pending request. Result and error are left untouched.
    pub fn cancel_generation(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.cancel.cancel();
                log::debug!("session: Pending -> Idle (request {} cancelled)", pending.id);
                true
            }
            None => false,
        }
    }

    pub fn generation_state(&self) -> GenerationState {
        if self.pending.is_some() {
            GenerationState::Pending
        } else {
            GenerationState::Idle
        }
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn finish_generation(&mut self, id: RequestId, outcome: GenerationOutcome) {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            log::debug!("session: ignoring outcome of stale request {id}");
            return;
        }
        self.pending = None;

        match outcome {
            GenerationOutcome::Text(text) => {
                log::debug!("session: Pending -> Idle (request {id} succeeded)");
                self.result = Some(text);
                self.error = None;
            }
            GenerationOutcome::Error { kind, message } => {
                log::debug!("session: Pending -> Idle (request {id} failed: {})", kind.label());
                self.result = None;
                self.error = Some(message);
            }
        }
    }

    // ---- favorites ---------------------------------------------------------

    pub fn favorites(&self) -> &[String] {
        self.favorites.entries()
    }

    /// Add the current result to favorites unless empty or already saved.
    pub fn save_current(&mut self) -> bool {
        match self.result.as_deref() {
            Some(text) => self.favorites.add(text),
            None => false,
        }
    }

    /// Whether the current result is already among the favorites.
    pub fn is_saved(&self) -> bool {
        self.result
            .as_deref()
            .is_some_and(|text| self.favorites.contains(text))
    }

    pub fn remove_favorite(&mut self, index: usize) -> Option<String> {
        self.favorites.remove(index)
    }

    // ---- speech output -----------------------------------------------------

    pub fn speech_state(&self) -> SpeechState {
        self.speech
    }

    pub fn can_listen(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Read the current result aloud, replacing any utterance in progress.
    ///
    /// The state becomes `Speaking` when the engine reports the start.
    pub fn speak(&mut self) {
        let Some(text) = self.result.clone().filter(|t| !t.is_empty()) else {
            return;
        };

        if self.speech == SpeechState::Listening {
            self.halt_listening();
        }

        let Some(synth) = self.synthesizer.as_mut() else {
            self.notice = Some(NO_SYNTHESIZER_NOTICE.into());
            return;
        };
        synth.cancel();
        if self.speech == SpeechState::Speaking {
            self.speech = SpeechState::Idle;
        }

        let id = self.next_utterance_id;
        self.next_utterance_id += 1;
        let utterance = Utterance {
            id,
            text,
            lang: language_tag(&self.input.language),
        };

        match synth.speak(utterance) {
            Ok(()) => self.current_utterance = Some(id),
            Err(e) => {
                log::warn!("session: speak failed: {e}");
                self.current_utterance = None;
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Cancel any utterance and return to Idle without waiting for the
    /// engine's end callback.
    pub fn stop_speaking(&mut self) {
        if let Some(synth) = self.synthesizer.as_mut() {
            synth.cancel();
        }
        self.current_utterance = None;
        if self.speech == SpeechState::Speaking {
            log::debug!("session: Speaking -> Idle (stopped)");
            self.speech = SpeechState::Idle;
        }
    }

    // ---- speech input ------------------------------------------------------

    /// Start capturing a spoken theme.
    ///
    /// Without a recognizer this only raises a notice. Returns whether the
    /// session entered `Listening`.
    pub fn start_listening(&mut self) -> bool {
        if self.speech == SpeechState::Listening {
            return false;
        }
        let Some(recognizer) = self.recognizer.as_mut() else {
            self.notice = Some(SpeechError::Unavailable.to_string());
            return false;
        };

        if self.current_utterance.is_some() || self.speech == SpeechState::Speaking {
            if let Some(synth) = self.synthesizer.as_mut() {
                synth.cancel();
            }
            self.current_utterance = None;
            self.speech = SpeechState::Idle;
        }

        recognizer.set_language(language_tag(&self.input.language));
        match recognizer.start() {
            Ok(()) => {
                log::debug!("session: Idle -> Listening");
                self.speech = SpeechState::Listening;
                true
            }
            Err(e) => {
                log::warn!("session: failed to start listening: {e}");
                self.notice = Some(e.to_string());
                false
            }
        }
    }

    /// Ask the recognizer to finish. The state returns to Idle on its end
    /// callback.
    pub fn stop_listening(&mut self) {
        if self.speech != SpeechState::Listening {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
    }

    fn halt_listening(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        log::debug!("session: Listening -> Idle (superseded by speech output)");
        self.speech = SpeechState::Idle;
    }

    fn on_speech(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::RecognitionResult(text) => {
                // A halted session may still deliver what it heard.
                if self.speech != SpeechState::Listening {
                    log::debug!("session: dropped transcript from a halted voice session");
                    return;
                }
                log::debug!("session: theme set from voice input");
                self.input.theme = text;
            }
            SpeechEvent::RecognitionEnd => {
                if self.speech == SpeechState::Listening {
                    log::debug!("session: Listening -> Idle");
                    self.speech = SpeechState::Idle;
                }
            }
            SpeechEvent::UtteranceStarted(id) => {
                if self.current_utterance == Some(id) {
                    log::debug!("session: Idle -> Speaking (utterance {id})");
                    self.speech = SpeechState::Speaking;
                }
            }
            SpeechEvent::UtteranceEnded(id) => {
                if self.current_utterance == Some(id) {
                    self.current_utterance = None;
                    if self.speech == SpeechState::Speaking {
                        log::debug!("session: Speaking -> Idle (utterance {id})");
                        self.speech = SpeechState::Idle;
                    }
                }
            }
        }
    }

    // ---- notices / export --------------------------------------------------

    /// One-shot user-facing message, cleared by reading it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn copy_result(&self) -> Result<(), ExportError> {
        export::copy_to_clipboard(self.result.as_deref().unwrap_or_default())
    }

    /// Write the current result to `dir`, named after the current theme.
    pub fn export_result(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let text = self.result.as_deref().unwrap_or_default();
        export::save_text_file(dir, &self.input.theme, text)
    }

    // ---- event loop --------------------------------------------------------

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Generated { id, outcome } => self.finish_generation(id, outcome),
            SessionEvent::Speech(event) => self.on_speech(event),
        }
    }

    /// Apply every event that has already arrived. Never blocks.
    ///
    /// Returns `true` if anything was applied.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied = true;
        }
        while let Ok(event) = self.speech_rx.try_recv() {
            self.apply(SessionEvent::Speech(event));
            applied = true;
        }
        applied
    }

    /// Wait for the next event without applying it.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        tokio::select! {
            Some(event) = self.events_rx.recv() => Some(event),
            Some(event) = self.speech_rx.recv() => Some(SessionEvent::Speech(event)),
            else => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
