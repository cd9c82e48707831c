//! Integration tests for the chat-completions client against a mock backend.

mod common;

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::completion_body;
use kommit::LlmError;
use kommit::init::Scopes;
use kommit::llm::auth::{KOMMIT_API_KEY_VAR, OPENAI_API_KEY_VAR};
use kommit::llm::{OpenAiClient, ResponseSchema};

fn client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(format!("{}/v1", server.uri())).with_api_key("sk-test")
}

#[tokio::test]
async fn test_generate_sends_deterministic_decoding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "top_p": 1.0,
            "presence_penalty": 0.0,
            "frequency_penalty": 0.0,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an AI that generates Conventional Git commit messages."
                },
                { "role": "user", "content": "the prompt" }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("fix(cli): handle empty diff\n", 1000, 100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let completion = client(&server)
        .generate("the prompt", "gpt-4o-mini")
        .await
        .unwrap();

    assert_eq!(completion.output, "fix(cli): handle empty diff");
    assert_eq!(completion.usage.prompt_tokens, 1000);
    // 1000 * 0.15e-6 + 100 * 0.60e-6
    assert!((completion.cost - 0.00021).abs() < 1e-12);
}

#[tokio::test]
async fn test_plain_request_has_no_response_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("chore: x", 1, 1)))
        .mount(&server)
        .await;

    client(&server).generate("p", "gpt-4o").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("response_format").is_none());
}

#[tokio::test]
async fn test_generate_structured_parses_schema_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "names",
                    "description": "A list of module or package names.",
                    "strict": true
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"scopes": ["cli", "ledger"]}"#,
            200,
            20,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let schema = ResponseSchema::of::<Scopes>("names", "A list of module or package names.");
    let completion = client(&server)
        .generate_structured::<Scopes>("p", "o3-mini", &schema)
        .await
        .unwrap();

    assert_eq!(completion.output.scopes, vec!["cli", "ledger"]);
    assert!(completion.cost > 0.0);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let system = body["messages"][0]["content"].as_str().unwrap();
    assert!(system.ends_with("Return your response as a valid JSON object."));
}

#[tokio::test]
async fn test_generate_structured_malformed_json() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Anything {
        value: u32,
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("not json at all", 10, 5)),
        )
        .mount(&server)
        .await;

    let schema = ResponseSchema::of::<Scopes>("names", "names");
    let result = client(&server)
        .generate_structured::<Anything>("p", "gpt-4o-mini", &schema)
        .await;

    match result {
        Err(LlmError::MalformedResponse { raw, .. }) => assert_eq!(raw, "not json at all"),
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_backend_error_is_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).generate("p", "gpt-4o-mini").await;

    match result {
        Err(LlmError::GenerationFailed(cause)) => {
            assert!(cause.contains("500"), "{cause}");
            assert!(cause.contains("upstream exploded"), "{cause}");
        }
        other => panic!("expected GenerationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [],
            "usage": { "prompt_tokens": 1, "completion_tokens": 0 }
        })))
        .mount(&server)
        .await;

    let result = client(&server).generate("p", "gpt-4o-mini").await;
    assert!(matches!(result, Err(LlmError::GenerationFailed(_))));
}

#[tokio::test]
async fn test_null_usage_costs_nothing() {
    let server = MockServer::start().await;
    let mut body = completion_body("docs: fix typo", 0, 0);
    body["usage"] = json!(null);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let completion = client(&server).generate("p", "gpt-4o-mini").await.unwrap();

    assert_eq!(completion.output, "docs: fix typo");
    assert_eq!(completion.usage.prompt_tokens, 0);
    assert_eq!(completion.cost, 0.0);
}

#[tokio::test]
async fn test_null_cached_tokens_bill_as_uncached() {
    let server = MockServer::start().await;
    let mut body = completion_body("docs: fix typo", 1000, 0);
    body["usage"]["prompt_tokens_details"]["cached_tokens"] = json!(null);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let completion = client(&server).generate("p", "gpt-4o-mini").await.unwrap();

    assert_eq!(completion.usage.cached_tokens(), 0);
    // 1000 * 0.15e-6
    assert!((completion.cost - 0.00015).abs() < 1e-12);
}

#[tokio::test]
async fn test_timeout_is_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("fix: late", 1, 1))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client(&server)
        .with_timeout(Duration::from_millis(200))
        .generate("p", "gpt-4o-mini")
        .await;

    assert!(matches!(result, Err(LlmError::GenerationFailed(_))));
}

#[test]
#[serial_test::serial]
fn test_missing_credentials_never_reach_the_network() {
    temp_env::with_vars_unset([KOMMIT_API_KEY_VAR, OPENAI_API_KEY_VAR], || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;

            let client = OpenAiClient::new(server.uri());
            assert!(matches!(
                client.ensure_credentials(),
                Err(LlmError::CredentialMissing)
            ));
            let result = client.generate("p", "gpt-4o-mini").await;
            assert!(matches!(result, Err(LlmError::CredentialMissing)));
        });
    });
}

#[test]
#[serial_test::serial]
fn test_environment_key_is_sent_as_bearer() {
    temp_env::with_vars(
        [
            (KOMMIT_API_KEY_VAR, Some("sk-kommit")),
            (OPENAI_API_KEY_VAR, Some("sk-openai")),
        ],
        || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                let server = MockServer::start().await;
                Mock::given(method("POST"))
                    .and(header("authorization", "Bearer sk-kommit"))
                    .respond_with(
                        ResponseTemplate::new(200).set_body_json(completion_body("fix: a", 1, 1)),
                    )
                    .expect(1)
                    .mount(&server)
                    .await;

                OpenAiClient::new(server.uri())
                    .generate("p", "gpt-4o-mini")
                    .await
                    .unwrap();
            });
        },
    );
}
