use std::convert::Infallible;

use axum::{
    extract::State,
    http::header,
    response::{sse::Event, IntoResponse, Response, Sse},
};
use futures::{Stream, StreamExt};
use tracing::{error, info};
use uuid::Uuid;

use codestream_llm::CompletionRequest;

use super::types::GenerateRequest;
use crate::error::{ApiJson, ErrorResponse};
use crate::events::StreamEvent;
use crate::http::ServerState;
use crate::prompt::{compose_system_prompt, MAX_COMPLETION_TOKENS};
use crate::relay::{relay_stream, RelayRequest};

/// Handle a generation request: validate, resolve the provider, compose the
/// system prompt, then relay the token stream as server-sent events.
pub async fn handle_generate(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<GenerateRequest>,
) -> Result<Response, ErrorResponse> {
    let request_id = Uuid::new_v4();

    let prompt = match payload.prompt.as_deref() {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => {
            return Err(ErrorResponse::invalid_request(
                "prompt is required".to_string(),
            ))
        }
    };

    info!(
        "[{}] POST /api/generate model={} isEdit={}",
        request_id, payload.model, payload.is_edit
    );

    let (provider, model) = state
        .providers
        .resolve(&payload.model)
        .map_err(|e| ErrorResponse::internal_error(e.to_string()))?;

    let completion = CompletionRequest {
        model,
        system_prompt: compose_system_prompt(
            payload.system_prompt.as_deref(),
            payload.file_contents.as_deref(),
        ),
        prompt: prompt.clone(),
        temperature: payload.temperature,
        max_tokens: MAX_COMPLETION_TOKENS,
    };

    let relay = RelayRequest {
        provider,
        completion,
        original_prompt: prompt,
        is_edit: payload.is_edit,
        request_id: request_id.to_string(),
    };

    let frames = event_frames(relay_stream(relay, state.conversation.clone()));

    Ok((
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(frames),
    )
        .into_response())
}

/// Serialize relay events into SSE `data:` frames. An event that fails to
/// serialize is logged and skipped, never fatal to the stream.
fn event_frames(
    events: impl Stream<Item = StreamEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    events.filter_map(|event| async move {
        match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(e) => {
                error!("Failed to serialize stream event: {}", e);
                None
            }
        }
    })
}
