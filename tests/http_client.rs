use fncall::api::{ChatRequest, ChatTransport, HttpChatClient, RetryPolicy};
use fncall::capabilities::CapabilityRegistry;
use fncall::credentials::ApiKey;
use fncall::error::FncallError;
use fncall::models::Message;
use fncall::orchestrator::{run, OrchestratorContext};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout: Duration) -> HttpChatClient {
    let key = ApiKey::new("test-key").unwrap();
    HttpChatClient::new(
        &key,
        &format!("{}/v1/chat/completions", server.uri()),
        timeout,
    )
    .unwrap()
}

fn first_request() -> ChatRequest {
    ChatRequest::new("gpt-4o", vec![Message::user("What time is it?")])
        .with_functions(CapabilityRegistry::builtin().to_function_specs())
}

#[tokio::test]
async fn test_request_shape_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [{ "role": "user", "content": "What time is it?" }],
            "function_call": "auto"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Noon." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let response = client.complete(&first_request()).await.unwrap();

    assert_eq!(response["choices"][0]["message"]["content"], "Noon.");
}

#[tokio::test]
async fn test_function_specs_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "functions": [
                {
                    "name": "get_current_datetime",
                    "description": "Returns the current date and time.",
                    "parameters": { "type": "object", "properties": {} }
                },
                {
                    "name": "generate_todo_list",
                    "description": "Generates a list of tasks for a given topic."
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "ok" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    client.complete(&first_request()).await.unwrap();
}

#[tokio::test]
async fn test_error_status_becomes_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let result = client.complete(&first_request()).await;

    match result {
        Err(FncallError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let result = client.complete(&first_request()).await;

    assert!(matches!(result, Err(FncallError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_millis(200));
    let result = client.complete(&first_request()).await;

    assert!(matches!(result, Err(FncallError::Timeout)));
}

#[tokio::test]
async fn test_full_exchange_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("\"role\":\"function\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Here are three things to learn about markets."
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "function_call": {
                        "name": "generate_todo_list",
                        "arguments": "{\"topic\": \"stock markets\", \"num_items\": 3}"
                    }
                }
            }]
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let registry = CapabilityRegistry::builtin();
    let context = OrchestratorContext {
        transport: &client,
        registry: &registry,
        model: "gpt-4o".to_string(),
        max_call_depth: 1,
        retry: RetryPolicy::no_retry(),
        verbose: false,
    };

    let outcome = run(&context, "Can I have a to-do list to learn about markets?")
        .await
        .unwrap();

    assert_eq!(
        outcome.answer,
        "Here are three things to learn about markets."
    );
    assert_eq!(
        outcome.calls[0].result["items"],
        json!([
            "Task 1 for stock markets",
            "Task 2 for stock markets",
            "Task 3 for stock markets"
        ])
    );
}
