//! Shayari Studio: prompt orchestration for an LLM poem generator plus the
//! desktop session that drives it.
//!
//! * [`generate`] turns user parameters into a Gemini request and classifies
//!   the answer.
//! * [`session`] owns the client state: generation lifecycle, favorites and
//!   speech modes.
//! * [`speech`] holds the voice input / output engines.
//! * [`app`] is the egui window.

pub mod app;
pub mod config;
pub mod export;
pub mod generate;
pub mod session;
pub mod speech;
