//! Whisper-backed [`Recognizer`].
//!
//! Each `start()` spawns one listening thread:
//!
//! ```text
//! open Microphone → collect 16 kHz audio
//!   until: stop() | trailing silence after speech | max_listen elapsed
//! → trim_silence → Transcriber::transcribe
//! → RecognitionResult(text)  (only when non-empty)
//! → RecognitionEnd           (always)
//! ```
//!
//! There is no auto-restart; the next session needs another `start()`.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::config::SpeechConfig;

use super::audio::{trim_silence, Endpointer, Microphone};
use super::whisper::{TranscribeError, Transcriber};
use super::{primary_subtag, Recognizer, SpeechError, SpeechEvent, SpeechEventSender};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct ListenSession {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct WhisperRecognizer {
    transcriber: Arc<Transcriber>,
    events: SpeechEventSender,
    language: String,
    max_listen: Duration,
    end_silence_ms: u64,
    vad_threshold: f32,
    session: Option<ListenSession>,
}

impl WhisperRecognizer {
    /// Load the Whisper model named in `config` from `models_dir`.
    ///
    /// Fails with [`TranscribeError::ModelNotFound`] when the model file is
    /// absent; callers treat that as "no recognition engine".
    pub fn load(
        models_dir: &Path,
        config: &SpeechConfig,
        events: SpeechEventSender,
    ) -> Result<Self, TranscribeError> {
        let transcriber = Transcriber::load(models_dir.join(&config.whisper_model))?;
        Ok(Self {
            transcriber: Arc::new(transcriber),
            events,
            language: "hi-IN".into(),
            max_listen: Duration::from_secs(config.max_listen_secs),
            end_silence_ms: config.end_silence_ms,
            vad_threshold: config.vad_threshold,
            session: None,
        })
    }

    fn is_listening(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.handle.is_finished())
    }
}

impl Recognizer for WhisperRecognizer {
    fn set_language(&mut self, tag: &str) {
        self.language = tag.to_string();
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        if self.is_listening() {
            return Err(SpeechError::Engine("recognition already started".into()));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let job = ListenJob {
            transcriber: Arc::clone(&self.transcriber),
            events: self.events.clone(),
            language: primary_subtag(&self.language).to_string(),
            max_listen: self.max_listen,
            endpointer: Endpointer::new(self.vad_threshold, self.end_silence_ms),
            vad_threshold: self.vad_threshold,
            stop: Arc::clone(&stop),
        };

        let handle = std::thread::Builder::new()
            .name("voice-input".into())
            .spawn(move || job.run())
            .map_err(|e| SpeechError::Engine(e.to_string()))?;

        self.session = Some(ListenSession { stop, handle });
        Ok(())
    }

    /// Ask the listening thread to finish. Audio heard so far is still
    /// transcribed, and `RecognitionEnd` follows as usual.
    fn stop(&mut self) {
        if let Some(session) = &self.session {
            session.stop.store(true, Ordering::SeqCst);
        }
    }
}

impl Drop for WhisperRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// ListenJob
// ---------------------------------------------------------------------------

struct ListenJob {
    transcriber: Arc<Transcriber>,
    events: SpeechEventSender,
    language: String,
    max_listen: Duration,
    endpointer: Endpointer,
    vad_threshold: f32,
    stop: Arc<AtomicBool>,
}

impl ListenJob {
    fn run(mut self) {
        match self.capture() {
            Ok(audio) => self.transcribe(&audio),
            Err(message) => log::error!("voice input: {message}"),
        }
        let _ = self.events.send(SpeechEvent::RecognitionEnd);
    }

    fn capture(&mut self) -> Result<Vec<f32>, String> {
        let microphone = Microphone::open().map_err(|e| e.to_string())?;
        let (tx, rx) = mpsc::channel::<Vec<f32>>();
        let stream = microphone.start(tx).map_err(|e| e.to_string())?;

        log::debug!("voice input: listening ({})", self.language);
        let started = Instant::now();
        let mut audio = Vec::new();

        while !self.stop.load(Ordering::SeqCst) && started.elapsed() < self.max_listen {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(chunk) => {
                    let ended = self.endpointer.feed(&chunk);
                    audio.extend_from_slice(&chunk);
                    if ended {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        drop(stream);
        Ok(audio)
    }

    fn transcribe(&self, audio: &[f32]) {
        if !self.endpointer.heard_speech() {
            log::debug!("voice input: no speech detected");
            return;
        }

        let voiced = trim_silence(audio, self.vad_threshold);
        match self.transcriber.transcribe(voiced, &self.language) {
            Ok(text) if !text.is_empty() => {
                let _ = self.events.send(SpeechEvent::RecognitionResult(text));
            }
            Ok(_) => log::debug!("voice input: empty transcript"),
            Err(e) => log::warn!("voice input: {e}"),
        }
    }
}
