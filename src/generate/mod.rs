//! Generation-request orchestration.
//!
//! This module provides:
//! * [`GenerationRequest`] / [`Length`]: the inbound parameters.
//! * [`PromptBuilder`]: deterministic prompt composition.
//! * [`Generator`]: async trait implemented by every generation backend.
//! * [`PromptOrchestrator`]: the Gemini-backed implementation.
//! * [`GenerationOutcome`] / [`ErrorKind`]: the typed result.
//! * [`GenerateResponse`]: the `{shayari}` / `{error}` client contract.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use shayari_studio::config::AppConfig;
//! use shayari_studio::generate::{GenerateResponse, GenerationRequest, Generator, PromptOrchestrator};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = AppConfig::default();
//!     config.apply_env();
//!
//!     let orchestrator = PromptOrchestrator::from_config(&config.gemini);
//!     let outcome = orchestrator
//!         .generate(GenerationRequest::new("Love"), CancellationToken::new())
//!         .await;
//!
//!     let response = GenerateResponse::from(outcome);
//!     println!("{} {:?}", response.status, response.body);
//! }
//! ```

pub mod gemini;
pub mod orchestrator;
pub mod outcome;
pub mod prompt;
pub mod request;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use orchestrator::{GenerateError, Generator, PromptOrchestrator, MISSING_KEY_MESSAGE};
pub use outcome::{ErrorKind, GenerateResponse, GenerationOutcome, ResponseBody};
pub use prompt::PromptBuilder;
pub use request::{GenerationRequest, Length, LANGUAGES, LINE_COUNTS, THEMES};
