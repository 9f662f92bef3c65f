//! Microphone capture and end-of-speech detection for voice input.
//!
//! * [`Microphone`] wraps the cpal default input device.
//! * [`to_mono_16k`] downmixes and resamples a cpal buffer for Whisper.
//! * [`Endpointer`] decides when the speaker has finished.
//! * [`trim_silence`] drops leading/trailing quiet frames before transcription.

use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

/// Whisper's input rate.
pub const TARGET_RATE: u32 = 16_000;

/// 30 ms at 16 kHz.
const FRAME_SAMPLES: usize = 480;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// Microphone
// ---------------------------------------------------------------------------

/// The default input device and its preferred stream format.
///
/// `cpal::Stream` is not `Send` on every platform, so open the microphone on
/// the thread that will own the stream.
pub struct Microphone {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl Microphone {
    /// Open the system default input device.
    pub fn open() -> Result<Self, CaptureError> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;

        Ok(Self {
            device,
            config: supported.into(),
            sample_rate,
            channels,
        })
    }

    /// Start streaming 16 kHz mono buffers to `tx`.
    ///
    /// The returned stream keeps capturing until it is dropped.
    pub fn start(&self, tx: mpsc::Sender<Vec<f32>>) -> Result<cpal::Stream, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Receiver gone means the session ended; drop the buffer.
                let _ = tx.send(to_mono_16k(data, channels, sample_rate));
            },
            |err: cpal::StreamError| {
                log::error!("microphone stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(stream)
    }
}

// ---------------------------------------------------------------------------
// to_mono_16k
// ---------------------------------------------------------------------------

/// Average interleaved channels to mono, then resample to 16 kHz by linear
/// interpolation.
///
/// ```
/// use shayari_studio::speech::audio::to_mono_16k;
///
/// let stereo_48k = vec![0.5_f32; 960]; // 480 frames, 10 ms
/// let out = to_mono_16k(&stereo_48k, 2, 48_000);
/// assert_eq!(out.len(), 160);
/// ```
pub fn to_mono_16k(samples: &[f32], channels: u16, source_rate: u32) -> Vec<f32> {
    let mono: Vec<f32> = match channels {
        0 => return Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    };

    if source_rate == TARGET_RATE || mono.is_empty() || source_rate == 0 {
        return mono;
    }

    let ratio = TARGET_RATE as f64 / source_rate as f64;
    let output_len = (mono.len() as f64 * ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let pos = i as f64 / ratio;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            match (mono.get(idx), mono.get(idx + 1)) {
                (Some(a), Some(b)) => a * (1.0 - frac) + b * frac,
                (Some(a), None) => *a,
                _ => 0.0,
            }
        })
        .collect()
}

fn is_voice(frame: &[f32], threshold: f32) -> bool {
    if frame.is_empty() {
        return false;
    }
    let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
    mean_sq.sqrt() > threshold
}

// ---------------------------------------------------------------------------
// Endpointer
// ---------------------------------------------------------------------------

/// Tracks trailing silence in a 16 kHz stream.
///
/// The utterance is complete once speech has been heard and then
/// `end_silence_samples` of consecutive quiet audio follow.
#[derive(Debug)]
pub struct Endpointer {
    threshold: f32,
    end_silence_samples: usize,
    heard_speech: bool,
    silent_run: usize,
    pending: Vec<f32>,
}

impl Endpointer {
    pub fn new(threshold: f32, end_silence_ms: u64) -> Self {
        Self {
            threshold,
            end_silence_samples: (end_silence_ms as usize * TARGET_RATE as usize) / 1000,
            heard_speech: false,
            silent_run: 0,
            pending: Vec::with_capacity(FRAME_SAMPLES),
        }
    }

    /// Feed more audio; returns `true` once the utterance has ended.
    pub fn feed(&mut self, samples: &[f32]) -> bool {
        self.pending.extend_from_slice(samples);

        let whole = self.pending.len() - self.pending.len() % FRAME_SAMPLES;
        for frame in self.pending[..whole].chunks_exact(FRAME_SAMPLES) {
            if is_voice(frame, self.threshold) {
                self.heard_speech = true;
                self.silent_run = 0;
            } else if self.heard_speech {
                self.silent_run += FRAME_SAMPLES;
            }
        }
        self.pending.drain(..whole);

        self.is_done()
    }

    pub fn heard_speech(&self) -> bool {
        self.heard_speech
    }

    fn is_done(&self) -> bool {
        self.heard_speech && self.silent_run >= self.end_silence_samples
    }
}

// ---------------------------------------------------------------------------
// trim_silence
// ---------------------------------------------------------------------------

/// Slice of `audio` between the first and last voiced 30 ms frame.
///
/// Returns an empty slice when nothing exceeds `threshold`.
pub fn trim_silence(audio: &[f32], threshold: f32) -> &[f32] {
    let frames: Vec<&[f32]> = audio.chunks(FRAME_SAMPLES).collect();

    let Some(first) = frames.iter().position(|f| is_voice(f, threshold)) else {
        return &audio[0..0];
    };
    let last = frames
        .iter()
        .rposition(|f| is_voice(f, threshold))
        .unwrap_or(first);

    let start = first * FRAME_SAMPLES;
    let end = ((last + 1) * FRAME_SAMPLES).min(audio.len());
    &audio[start..end]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(silent_pre: usize, voice: usize, silent_post: usize) -> Vec<f32> {
        let mut v = vec![0.0_f32; silent_pre];
        v.extend(vec![0.5_f32; voice]);
        v.extend(vec![0.0_f32; silent_post]);
        v
    }

    #[test]
    fn mono_16k_passthrough() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        assert_eq!(to_mono_16k(&input, 1, 16_000), input);
    }

    #[test]
    fn stereo_is_averaged() {
        let out = to_mono_16k(&[1.0, -1.0, 0.5, 0.5], 2, 16_000);
        assert_eq!(out.len(), 2);
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn upsampling_doubles_length() {
        let out = to_mono_16k(&vec![0.25_f32; 80], 1, 8_000);
        assert_eq!(out.len(), 160);
        assert!(out.iter().all(|s| (s - 0.25).abs() < 1e-5));
    }

    #[test]
    fn zero_channels_yield_nothing() {
        assert!(to_mono_16k(&[1.0, 2.0], 0, 48_000).is_empty());
    }

    #[test]
    fn endpointer_waits_for_speech_before_counting_silence() {
        let mut ep = Endpointer::new(0.01, 300);
        // a full second of silence before anyone speaks never ends the utterance
        assert!(!ep.feed(&vec![0.0; 16_000]));
        assert!(!ep.heard_speech());
    }

    #[test]
    fn endpointer_ends_after_trailing_silence() {
        let mut ep = Endpointer::new(0.01, 300);
        assert!(!ep.feed(&vec![0.5; FRAME_SAMPLES * 4]));
        assert!(ep.heard_speech());
        // 300 ms = 4800 samples = 10 frames
        assert!(!ep.feed(&vec![0.0; FRAME_SAMPLES * 9]));
        assert!(ep.feed(&vec![0.0; FRAME_SAMPLES]));
    }

    #[test]
    fn endpointer_resets_silence_on_new_speech() {
        let mut ep = Endpointer::new(0.01, 300);
        ep.feed(&vec![0.5; FRAME_SAMPLES]);
        ep.feed(&vec![0.0; FRAME_SAMPLES * 8]);
        ep.feed(&vec![0.5; FRAME_SAMPLES]);
        assert!(!ep.feed(&vec![0.0; FRAME_SAMPLES * 8]));
    }

    #[test]
    fn endpointer_buffers_partial_frames() {
        let mut ep = Endpointer::new(0.01, 0);
        ep.feed(&vec![0.5; FRAME_SAMPLES / 2]);
        assert!(!ep.heard_speech());
        ep.feed(&vec![0.5; FRAME_SAMPLES / 2]);
        assert!(ep.heard_speech());
    }

    #[test]
    fn trim_keeps_voiced_middle() {
        let audio = signal(FRAME_SAMPLES, FRAME_SAMPLES, FRAME_SAMPLES);
        assert_eq!(trim_silence(&audio, 0.01).len(), FRAME_SAMPLES);
    }

    #[test]
    fn trim_of_silence_is_empty() {
        assert!(trim_silence(&vec![0.0; 1440], 0.01).is_empty());
        assert!(trim_silence(&[], 0.01).is_empty());
    }
}
