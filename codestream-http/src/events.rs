use serde::{Deserialize, Serialize};

/// One frame of the generation event stream, emitted to the client as a
/// `data: <JSON>` SSE line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Raw model output, one event per upstream chunk, in arrival order.
    Text { content: String },

    /// A package declaration discovered in the generated text. Emitted once
    /// per unique name per request.
    Package { name: String, message: String },

    /// Terminal event on success. `response` is the exact concatenation of
    /// every `Text` content; `packages` is the final set in discovery order.
    Complete {
        response: String,
        packages: Vec<String>,
        message: String,
    },

    /// Terminal event on failure; carries the underlying error text.
    Error { error: String },
}
