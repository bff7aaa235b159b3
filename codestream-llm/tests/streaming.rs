use futures::StreamExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use codestream_llm::{AnthropicClient, CompletionRequest, LlmError, OpenAiCompatClient, TokenStreamProvider};

fn request(model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        system_prompt: "You are terse.".to_string(),
        prompt: "say hi".to_string(),
        temperature: 0.7,
        max_tokens: 64,
    }
}

async fn collect(stream: codestream_llm::TokenStream) -> Vec<Result<String, LlmError>> {
    stream.collect().await
}

#[tokio::test]
async fn chat_completions_stream_yields_deltas_until_done() {
    let server = MockServer::start().await;

    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{}}]}\n\n",
        "data: [DONE]\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.3-70b",
            "stream": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = OpenAiCompatClient::cerebras("test-key".to_string(), Some(server.uri()));
    let stream = client
        .request_stream(request("llama-3.3-70b"))
        .await
        .expect("stream opens");

    let chunks: Vec<String> = collect(stream)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("no stream errors");
    assert_eq!(chunks, vec!["Hel".to_string(), "lo".to_string()]);
}

#[tokio::test]
async fn chat_completions_rejection_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = OpenAiCompatClient::groq("bad-key".to_string(), Some(server.uri()));
    let stream = client
        .request_stream(request("openai/gpt-oss-20b"))
        .await
        .expect("stream opens lazily");

    let mut results = collect(stream).await;
    assert_eq!(results.len(), 1);
    match results.remove(0) {
        Err(LlmError::Api {
            provider,
            status,
            message,
        }) => {
            assert_eq!(provider, "groq");
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn anthropic_stream_yields_text_deltas_until_message_stop() {
    let server = MockServer::start().await;

    let body = concat!(
        "event: message_start\n",
        "data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_1\"}}\n\n",
        "event: content_block_start\n",
        "data: {\"type\":\"content_block_start\",\"index\":0}\n\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hi\"}}\n\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\" there\"}}\n\n",
        "event: content_block_stop\n",
        "data: {\"type\":\"content_block_stop\",\"index\":0}\n\n",
        "event: message_stop\n",
        "data: {\"type\":\"message_stop\"}\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = AnthropicClient::new("test-key".to_string(), Some(server.uri()));
    let stream = client
        .request_stream(request("claude-x"))
        .await
        .expect("stream opens");

    let chunks: Vec<String> = collect(stream)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("no stream errors");
    assert_eq!(chunks, vec!["Hi".to_string(), " there".to_string()]);
}

#[tokio::test]
async fn anthropic_error_event_terminates_the_stream() {
    let server = MockServer::start().await;

    let body = concat!(
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"par\"}}\n\n",
        "event: error\n",
        "data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = AnthropicClient::new("test-key".to_string(), Some(server.uri()));
    let stream = client
        .request_stream(request("claude-x"))
        .await
        .expect("stream opens");

    let mut results = collect(stream).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results.remove(0).expect("first delta"), "par");
    match results.remove(0) {
        Err(LlmError::Provider { provider, message }) => {
            assert_eq!(provider, "anthropic");
            assert_eq!(message, "Overloaded");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}
