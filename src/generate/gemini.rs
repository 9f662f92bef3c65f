//! Wire types for the Gemini `generateContent` endpoint and response
//! classification.
//!
//! [`classify`] is a pure function from `(status, body)` to an outcome so the
//! whole error taxonomy can be exercised without a network.

use serde::{Deserialize, Serialize};

use super::orchestrator::GenerateError;
use super::outcome::{ErrorKind, GenerationOutcome};

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.7;
/// Top-k sampling cut-off.
pub const TOP_K: u32 = 40;
/// Nucleus sampling mass.
pub const TOP_P: f32 = 0.95;

/// Used when the service (or the transport) gives us nothing better.
pub const FALLBACK_MESSAGE: &str = "Failed to generate shayari";
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "Unexpected response format from API";

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A single-turn request carrying `prompt` and the fixed sampling
    /// parameters.
    pub fn new(prompt: String, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Request problems (bad key, quota) are the caller's to fix; everything else
/// is logged as an error.
fn upstream_log_level(kind: &ErrorKind) -> log::Level {
    if kind.is_client_fault() {
        log::Level::Warn
    } else {
        log::Level::Error
    }
}

/// Turn a raw transport response into an outcome.
///
/// Returns `Err` only when a success body cannot be decoded at all; the
/// orchestrator maps that to [`ErrorKind::Internal`].
pub fn classify(status: u16, body: &[u8]) -> Result<GenerationOutcome, GenerateError> {
    if !(200..300).contains(&status) {
        let message = upstream_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        let kind = ErrorKind::Upstream { status };
        log::log!(
            upstream_log_level(&kind),
            "model service returned {status}: {message}"
        );
        return Ok(GenerationOutcome::error(kind, message));
    }

    let response: GenerateContentResponse =
        serde_json::from_slice(body).map_err(|e| GenerateError::Parse(e.to_string()))?;

    let first_text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text);

    if let Some(text) = first_text {
        return Ok(GenerationOutcome::Text(text));
    }

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Ok(GenerationOutcome::error(
            ErrorKind::ContentBlocked,
            format!("Content blocked: {reason}"),
        ));
    }

    log::warn!(
        "unexpected model response: {}",
        String::from_utf8_lossy(body)
    );
    Ok(GenerationOutcome::error(
        ErrorKind::UnexpectedFormat,
        UNEXPECTED_FORMAT_MESSAGE,
    ))
}

/// `error.message` from an error payload, if the body has one.
fn upstream_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
