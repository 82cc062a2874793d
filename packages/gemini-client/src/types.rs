//! Request and response types for the Gemini REST API.

use serde::{Deserialize, Serialize};

/// Request body for the `generateContent` endpoint.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerateRequest {
    /// Conversation turns; a single-turn prompt is one user content.
    pub contents: Vec<Content>,

    /// Optional generation parameters.
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    /// Build a single-turn request from a prompt string.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            generation_config: None,
        }
    }

    /// Set generation parameters.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// One content block (a conversation turn).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// One text part within a content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Generation parameters.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Raw response from the `generateContent` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponseRaw {
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,

    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u32,

    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: u32,

    #[serde(rename = "totalTokenCount", default)]
    pub total_token_count: u32,
}

/// Simplified response returned to callers.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// Concatenated text of the first candidate's parts.
    pub text: String,

    /// Token usage, when reported.
    pub usage: Option<UsageMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest::from_prompt("Hello");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hi there"}]}, "finishReason": "STOP"}
            ],
            "usageMetadata": {"promptTokenCount": 1, "candidatesTokenCount": 2, "totalTokenCount": 3}
        }"#;

        let response: GenerateResponseRaw = serde_json::from_str(raw).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(
            response.candidates[0].content.as_ref().unwrap().parts[0].text,
            "Hi there"
        );
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 3);
    }
}
