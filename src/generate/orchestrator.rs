//! The [`Generator`] trait and its [`PromptOrchestrator`] implementation.
//!
//! `PromptOrchestrator` is stateless between calls: it checks the credential,
//! composes the prompt, makes exactly one `generateContent` call and
//! classifies whatever comes back. Every failure is turned into a
//! [`GenerationOutcome`]; nothing escapes as a panic or `Err`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::GeminiConfig;

use super::gemini::{self, GenerateContentRequest, FALLBACK_MESSAGE};
use super::outcome::{ErrorKind, GenerationOutcome};
use super::prompt::PromptBuilder;
use super::request::GenerationRequest;

/// Message returned when no credential is configured.
pub const MISSING_KEY_MESSAGE: &str = "API key is not configured";

/// Header carrying the credential. The key never appears in the URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ---------------------------------------------------------------------------
// GenerateError
// ---------------------------------------------------------------------------

/// Failures inside a single dispatch. Always converted to an
/// [`ErrorKind::Internal`] outcome before leaving the orchestrator.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The configured client timeout elapsed.
    #[error("model request timed out")]
    Timeout,

    /// A success body could not be decoded as JSON.
    #[error("failed to parse model response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GenerateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerateError::Timeout
        } else {
            GenerateError::Request(e.without_url().to_string())
        }
    }
}

impl From<GenerateError> for GenerationOutcome {
    fn from(e: GenerateError) -> Self {
        let message = e.to_string();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        GenerationOutcome::error(ErrorKind::Internal, message)
    }
}

// ---------------------------------------------------------------------------
// Generator trait
// ---------------------------------------------------------------------------

/// Anything that can turn a [`GenerationRequest`] into an outcome.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn Generator>` with spawned tasks. `cancel` may fire at any time;
/// implementations should resolve promptly with [`ErrorKind::Cancelled`].
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> GenerationOutcome;
}

// ---------------------------------------------------------------------------
// PromptOrchestrator
// ---------------------------------------------------------------------------

/// Calls the Gemini `generateContent` endpoint described by [`GeminiConfig`].
pub struct PromptOrchestrator {
    client: reqwest::Client,
    config: GeminiConfig,
    prompt_builder: PromptBuilder,
}

impl PromptOrchestrator {
    /// Build an orchestrator from application config.
    ///
    /// A timeout is only installed on the HTTP client when
    /// `config.timeout_secs` is set. A default client is used if the builder
    /// fails.
    pub fn from_config(config: &GeminiConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// Full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Steps 2–6: budget, prompt, one POST, classification.
    async fn dispatch(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<GenerationOutcome, GenerateError> {
        let budget = request.length.token_budget();
        let prompt = self.prompt_builder.compose(request);
        let body = GenerateContentRequest::new(prompt, budget);

        log::debug!(
            "generate: theme={:?} language={:?} lines={} budget={budget}",
            request.theme,
            request.language,
            request.line_count
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        gemini::classify(status, &bytes)
    }
}

#[async_trait]
impl Generator for PromptOrchestrator {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> GenerationOutcome {
        let Some(api_key) = self.config.credential() else {
            log::error!("generate: no API key configured");
            return GenerationOutcome::error(ErrorKind::Configuration, MISSING_KEY_MESSAGE);
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("generate: cancelled by caller");
                GenerationOutcome::error(ErrorKind::Cancelled, "Generation cancelled")
            }
            result = self.dispatch(&request, api_key) => match result {
                Ok(outcome) => {
                    if outcome.is_success() {
                        log::debug!("generate: shayari received");
                    }
                    outcome
                }
                Err(e) => {
                    log::error!("generate: {e}");
                    e.into()
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.map(str::to_string),
            base_url: "http://127.0.0.1:9/v1/".into(),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let orc = PromptOrchestrator::from_config(&make_config(Some("k")));
        assert_eq!(
            orc.endpoint(),
            "http://127.0.0.1:9/v1/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let orc = PromptOrchestrator::from_config(&make_config(None));
        let outcome = orc
            .generate(GenerationRequest::new("Love"), CancellationToken::new())
            .await;
        assert_eq!(
            outcome,
            GenerationOutcome::error(ErrorKind::Configuration, MISSING_KEY_MESSAGE)
        );
        assert_eq!(outcome.status(), 500);
    }

    #[tokio::test]
    async fn empty_key_is_configuration_error() {
        let orc = PromptOrchestrator::from_config(&make_config(Some("")));
        let outcome = orc
            .generate(GenerationRequest::new("Love"), CancellationToken::new())
            .await;
        assert_eq!(outcome.kind(), Some(ErrorKind::Configuration));
    }

    #[tokio::test]
    async fn pre_cancelled_token_resolves_as_cancelled() {
        let orc = PromptOrchestrator::from_config(&make_config(Some("k")));
        let token = CancellationToken::new();
        token.cancel();
        let outcome = orc.generate(GenerationRequest::new("Love"), token).await;
        assert_eq!(outcome.kind(), Some(ErrorKind::Cancelled));
    }

    #[test]
    fn generate_error_becomes_internal_outcome() {
        let outcome: GenerationOutcome = GenerateError::Request("connection refused".into()).into();
        assert_eq!(outcome.kind(), Some(ErrorKind::Internal));
        assert_eq!(outcome.status(), 500);
        match outcome {
            GenerationOutcome::Error { message, .. } => {
                assert!(message.contains("connection refused"))
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_message_omits_the_key() {
        let orc = PromptOrchestrator::from_config(&GeminiConfig {
            api_key: Some("SECRET123".into()),
            base_url: "http://127.0.0.1:1/v1".into(),
            ..GeminiConfig::default()
        });
        let outcome = orc
            .generate(GenerationRequest::new("Love"), CancellationToken::new())
            .await;
        assert_eq!(outcome.kind(), Some(ErrorKind::Internal));
        match outcome {
            GenerationOutcome::Error { message, .. } => {
                assert!(message.starts_with("HTTP request failed"), "{message}");
                assert!(!message.contains("SECRET123"), "{message}");
                assert!(!message.contains("127.0.0.1"), "{message}");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn orchestrator_is_object_safe() {
        let orc: Box<dyn Generator> =
            Box::new(PromptOrchestrator::from_config(&make_config(None)));
        drop(orc);
    }
}
