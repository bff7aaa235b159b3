use serde::{Deserialize, Serialize};

use crate::prompt::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The user prompt. Required; a missing or empty prompt is rejected.
    pub prompt: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_contents: Option<String>,
    #[serde(default)]
    pub is_edit: bool,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_their_defaults() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{ "prompt": "build a todo app" }"#).unwrap();
        assert_eq!(request.prompt.as_deref(), Some("build a todo app"));
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert!(!request.is_edit);
        assert!(request.system_prompt.is_none());
        assert!(request.file_contents.is_none());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{
                "prompt": "p",
                "model": "openai/gpt-4",
                "systemPrompt": "s",
                "fileContents": "f",
                "isEdit": true,
                "temperature": 0.2
            }"#,
        )
        .unwrap();
        assert_eq!(request.model, "openai/gpt-4");
        assert_eq!(request.system_prompt.as_deref(), Some("s"));
        assert_eq!(request.file_contents.as_deref(), Some("f"));
        assert!(request.is_edit);
        assert_eq!(request.temperature, 0.2);
    }
}
