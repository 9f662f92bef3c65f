//! [`Synthesizer`] backed by an espeak-compatible command-line program.
//!
//! `speak` spawns `<program> -v <voice> <text>` and reports
//! `UtteranceStarted` once the process is running. A watcher thread reports
//! `UtteranceEnded` when the process exits, whether it finished or was
//! killed by `cancel`.

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::{Synthesizer, SpeechError, SpeechEvent, SpeechEventSender, Utterance};

const WAIT_INTERVAL: Duration = Duration::from_millis(50);

pub struct CommandSynthesizer {
    program: String,
    events: SpeechEventSender,
    current: Option<Arc<Mutex<Child>>>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, events: SpeechEventSender) -> Self {
        Self {
            program: program.into(),
            events,
            current: None,
        }
    }

    fn command(&self, utterance: &Utterance) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-v")
            .arg(voice_for_tag(utterance.lang))
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Synthesizer for CommandSynthesizer {
    fn speak(&mut self, utterance: Utterance) -> Result<(), SpeechError> {
        self.cancel();

        let child = self
            .command(&utterance)
            .spawn()
            .map_err(|e| SpeechError::Engine(format!("{}: {e}", self.program)))?;

        let child = Arc::new(Mutex::new(child));
        let id = utterance.id;
        let events = self.events.clone();
        let watched = Arc::clone(&child);

        let _ = events.send(SpeechEvent::UtteranceStarted(id));
        thread::Builder::new()
            .name("voice-output".into())
            .spawn(move || {
                wait_for_exit(&watched);
                let _ = events.send(SpeechEvent::UtteranceEnded(id));
            })
            .map_err(|e| SpeechError::Engine(e.to_string()))?;

        self.current = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(child) = self.current.take() {
            if let Ok(mut child) = child.lock() {
                // Already exited is fine.
                let _ = child.kill();
            }
        }
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn wait_for_exit(child: &Mutex<Child>) {
    loop {
        match child.lock() {
            Ok(mut guard) => match guard.try_wait() {
                Ok(None) => {}
                Ok(Some(_)) | Err(_) => return,
            },
            Err(_) => return,
        }
        thread::sleep(WAIT_INTERVAL);
    }
}

/// espeak voice name for a language tag.
///
/// ```
/// use shayari_studio::speech::synthesizer::voice_for_tag;
///
/// assert_eq!(voice_for_tag("hi-IN"), "hi");
/// assert_eq!(voice_for_tag("en-US"), "en-us");
/// ```
pub fn voice_for_tag(tag: &str) -> String {
    match tag {
        "en-US" => "en-us".into(),
        other => super::primary_subtag(other).to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::speech_channel;

    #[test]
    fn voices_per_tag() {
        assert_eq!(voice_for_tag("hi-IN"), "hi");
        assert_eq!(voice_for_tag("ur"), "ur");
        assert_eq!(voice_for_tag("en-US"), "en-us");
    }

    #[test]
    fn missing_program_is_engine_error_and_emits_nothing() {
        let (tx, mut rx) = speech_channel();
        let mut synth = CommandSynthesizer::new("/nonexistent/tts-program", tx);
        let err = synth
            .speak(Utterance {
                id: 1,
                text: "hello".into(),
                lang: "en-US",
            })
            .unwrap_err();
        assert!(matches!(err, SpeechError::Engine(_)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancel_when_idle_is_harmless() {
        let (tx, _rx) = speech_channel();
        let mut synth = CommandSynthesizer::new("espeak-ng", tx);
        synth.cancel();
        synth.cancel();
    }
}
