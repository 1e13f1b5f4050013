//! Wire types for the `generateContent` endpoint.
//!
//! Request: `{"contents":[{"parts":[{"text": ...}]}]}`.
//! Response: the answer lives in `candidates[0].content.parts[*].text`.

use crate::error::GeminiError;
use serde::{Deserialize, Serialize};

/// Request body sent to the API.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// Wrap a single prompt as one content block with one text part.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

/// A block of parts; used on both sides of the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// One text fragment. Non-text parts deserialize with `text: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Parsed success payload: the first candidate's parts, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDocument {
    parts: Vec<String>,
}

impl ResponseDocument {
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// Parse a success body. Anything without `candidates[0].content.parts`
    /// is a [`GeminiError::MalformedResponse`].
    pub fn from_body(body: &str) -> Result<Self, GeminiError> {
        let response: GenerateResponse =
            serde_json::from_str(body).map_err(|_| GeminiError::MalformedResponse)?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(GeminiError::MalformedResponse)?;

        let parts = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text.unwrap_or_default())
            .collect();

        Ok(Self::new(parts))
    }

    /// The full answer.
    pub fn text(&self) -> String {
        self.parts.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req = GenerateRequest::from_prompt("hello");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_parts_concatenated_in_order() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello, "}, {"inlineData": {}}, {"text": "world"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 7}
        }"#;
        let doc = ResponseDocument::from_body(body).unwrap();
        assert_eq!(doc.text(), "Hello, world");
    }

    #[test]
    fn test_missing_shape_is_malformed() {
        for body in [
            "not json",
            "{}",
            r#"{"candidates": []}"#,
            r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
            r#"{"candidates": [{"content": {}}]}"#,
        ] {
            assert!(
                matches!(
                    ResponseDocument::from_body(body),
                    Err(GeminiError::MalformedResponse)
                ),
                "body should be malformed: {body}"
            );
        }
    }
}
