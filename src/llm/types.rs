use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    /// Inline data, function calls and anything else the model may return.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Decodes a raw `generateContent` response body.
    pub fn from_body(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Text of the first candidate, joining its text parts.
    pub fn into_text(self) -> Result<String> {
        let candidates = match self.candidates {
            Some(candidates) if !candidates.is_empty() => candidates,
            _ => {
                let reason = self
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .map(|r| format!("Prompt blocked: {}", r))
                    .unwrap_or_else(|| "No candidates returned".to_string());
                return Err(ReportError::Generation(reason));
            }
        };

        let candidate = &candidates[0];
        let parts = candidate
            .content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        let text: String = parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::Other(_) => None,
            })
            .collect();

        if text.is_empty() {
            let reason = match &candidate.finish_reason {
                Some(finish) => format!("Model returned no text (finish reason: {})", finish),
                None => "Model returned non-text content".to_string(),
            };
            return Err(ReportError::Generation(reason));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text("hello")],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.4),
                max_output_tokens: None,
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json["generationConfig"]["temperature"].is_number());
        assert!(json["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_text_from_response() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Jane demonstrates "}, {"text": "moderate potential."}]},
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.into_text().unwrap(),
            "Jane demonstrates moderate potential."
        );
    }

    #[test]
    fn test_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        match response.into_text() {
            Err(ReportError::Generation(msg)) => assert_eq!(msg, "Prompt blocked: SAFETY"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_candidate_without_text() {
        let body = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            GenerateContentResponse::from_body("<html>Bad Gateway</html>"),
            Err(ReportError::Serialization(_))
        ));

        let body = r#"{"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}"#;
        let response = GenerateContentResponse::from_body(body).unwrap();
        assert_eq!(response.into_text().unwrap(), "ok");
    }
}
