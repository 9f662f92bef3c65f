use serde_json::json;
use shayari_studio::config::GeminiConfig;
use shayari_studio::generate::{
    ErrorKind, GenerateResponse, GenerationOutcome, GenerationRequest, Generator, Length,
    PromptOrchestrator, ResponseBody,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1/models/gemini-1.5-flash:generateContent";

fn orchestrator(server: &MockServer) -> PromptOrchestrator {
    PromptOrchestrator::from_config(&GeminiConfig {
        api_key: Some("test-key".into()),
        base_url: format!("{}/v1", server.uri()),
        ..GeminiConfig::default()
    })
}

fn candidate(text: &str) -> serde_json::Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

async fn generate(orc: &PromptOrchestrator, request: GenerationRequest) -> GenerationOutcome {
    orc.generate(request, CancellationToken::new()).await
}

#[tokio::test]
async fn success_returns_first_fragment_with_status_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("dil ki baat")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = generate(&orchestrator(&server), GenerationRequest::new("Love")).await;
    assert_eq!(outcome, GenerationOutcome::Text("dil ki baat".into()));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), None);

    let response = GenerateResponse::from(outcome);
    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        ResponseBody::Shayari {
            shayari: "dil ki baat".into()
        }
    );
}

#[tokio::test]
async fn short_request_sends_prompt_and_budget() {
    let server = MockServer::start().await;
    let expected_prompt = "Generate a beautiful and meaningful shayari in Urdu on the theme of \"Rain\". \
        The shayari should have approximately 2 lines. \
        The shayari should be poetic, emotional, and resonate with readers. \n    Please provide only the shayari text without any additional explanation or commentary.";

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": expected_prompt }] }],
            "generationConfig": { "topK": 40, "maxOutputTokens": 512 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("boond")))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest {
        theme: "Rain".into(),
        language: "Urdu".into(),
        custom_input: "   ".into(),
        line_count: 2,
        length: Length::Short,
    };
    let outcome = generate(&orchestrator(&server), request).await;
    assert_eq!(outcome.text(), Some("boond"));
}

#[tokio::test]
async fn custom_input_and_unknown_length_use_medium_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": { "maxOutputTokens": 1024 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("chaand")))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = GenerationRequest::new("Moon");
    request.custom_input = "chaandni raat".into();
    request.length = Length::parse("Epic");
    let outcome = generate(&orchestrator(&server), request).await;
    assert!(outcome.is_success());

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains(
        "Include these words, sentences, or facts in the shayari: \"chaandni raat\". "
    ));
}

#[tokio::test]
async fn upstream_error_message_and_status_are_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({ "error": { "message": "Quota exceeded" } })),
        )
        .mount(&server)
        .await;

    let outcome = generate(&orchestrator(&server), GenerationRequest::new("Love")).await;
    assert_eq!(
        outcome,
        GenerationOutcome::error(ErrorKind::Upstream { status: 429 }, "Quota exceeded")
    );
    assert_eq!(outcome.status(), 429);
}

#[tokio::test]
async fn upstream_failure_without_body_uses_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let response = GenerateResponse::from(
        generate(&orchestrator(&server), GenerationRequest::new("Love")).await,
    );
    assert_eq!(response.status, 503);
    assert_eq!(
        response.body,
        ResponseBody::Error {
            error: "Failed to generate shayari".into()
        }
    );
}

#[tokio::test]
async fn blocked_prompt_is_400_without_shayari() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
        )
        .mount(&server)
        .await;

    let response = GenerateResponse::from(
        generate(&orchestrator(&server), GenerationRequest::new("War")).await,
    );
    assert_eq!(response.status, 400);
    let json = serde_json::to_value(&response.body).unwrap();
    assert_eq!(json, json!({ "error": "Content blocked: SAFETY" }));
}

#[tokio::test]
async fn unrecognised_success_payload_is_unexpected_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let outcome = generate(&orchestrator(&server), GenerationRequest::new("Love")).await;
    assert_eq!(
        outcome,
        GenerationOutcome::error(
            ErrorKind::UnexpectedFormat,
            "Unexpected response format from API"
        )
    );
    assert_eq!(outcome.status(), 500);
}

#[tokio::test]
async fn undecodable_success_body_is_internal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let outcome = generate(&orchestrator(&server), GenerationRequest::new("Love")).await;
    assert_eq!(outcome.kind(), Some(ErrorKind::Internal));
    assert_eq!(outcome.status(), 500);
}

#[tokio::test]
async fn missing_key_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("never")))
        .expect(0)
        .mount(&server)
        .await;

    let orc = PromptOrchestrator::from_config(&GeminiConfig {
        api_key: None,
        base_url: format!("{}/v1", server.uri()),
        ..GeminiConfig::default()
    });
    let response = GenerateResponse::from(generate(&orc, GenerationRequest::new("Love")).await);
    assert_eq!(response.status, 500);
    assert_eq!(
        response.body,
        ResponseBody::Error {
            error: "API key is not configured".into()
        }
    );
}

#[tokio::test]
async fn cancellation_wins_over_a_slow_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate("too late"))
                .set_delay(std::time::Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let orc = orchestrator(&server);
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let outcome = orc.generate(GenerationRequest::new("Love"), token).await;
    assert_eq!(outcome.kind(), Some(ErrorKind::Cancelled));
    assert_eq!(GenerateResponse::from(outcome).status, 499);
}
