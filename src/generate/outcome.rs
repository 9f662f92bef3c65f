//! Generation outcome and its client-facing wire form.
//!
//! A [`GenerationOutcome`] is either the model's text or a typed error, never
//! both. [`GenerateResponse`] is what crosses the boundary to the client:
//! `{ "shayari": … }` or `{ "error": … }` plus an HTTP-style status.

use serde::{Deserialize, Serialize};

/// Status used for a request abandoned by the caller (client closed request).
pub const STATUS_CANCELLED: u16 = 499;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Classification of a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The model-access credential is missing. No network call was made.
    Configuration,
    /// The model service answered with a non-success status.
    Upstream { status: u16 },
    /// The model service refused the prompt on content-safety grounds.
    ContentBlocked,
    /// Success status, but a payload shape we do not recognise.
    UnexpectedFormat,
    /// Transport failure or undecodable payload.
    Internal,
    /// The caller's cancellation token fired before a response arrived.
    Cancelled,
}

impl ErrorKind {
    /// HTTP-style status conveyed to the client for this kind.
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::Configuration | ErrorKind::UnexpectedFormat | ErrorKind::Internal => 500,
            ErrorKind::Upstream { status } => *status,
            ErrorKind::ContentBlocked => 400,
            ErrorKind::Cancelled => STATUS_CANCELLED,
        }
    }

    /// `true` when the upstream status is in the 4xx range.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, ErrorKind::Upstream { status } if (400..500).contains(status))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Upstream { .. } => "upstream",
            ErrorKind::ContentBlocked => "content-blocked",
            ErrorKind::UnexpectedFormat => "unexpected-format",
            ErrorKind::Internal => "internal",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationOutcome
// ---------------------------------------------------------------------------

/// The single result of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The model's first text fragment, untouched.
    Text(String),
    /// A classified failure with a user-displayable message.
    Error { kind: ErrorKind, message: String },
}

impl GenerationOutcome {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Error { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Text(_) => None,
            Self::Error { kind, .. } => Some(*kind),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Text(_) => 200,
            Self::Error { kind, .. } => kind.status(),
        }
    }
}

// ---------------------------------------------------------------------------
// GenerateResponse
// ---------------------------------------------------------------------------

/// JSON body sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Shayari { shayari: String },
    Error { error: String },
}

/// Status + body pair returned across the client boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        let status = outcome.status();
        let body = match outcome {
            GenerationOutcome::Text(shayari) => ResponseBody::Shayari { shayari },
            GenerationOutcome::Error { message, .. } => ResponseBody::Error { error: message },
        };
        Self { status, body }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
