//! [`Response`] types for the [Gemini API] `generateContent` method.
//!
//! [Gemini API]: <https://ai.google.dev/api/generate-content>

use serde::{Deserialize, Serialize};

use crate::request::Content;

/// Successful response from `generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Generated candidates. Empty if the prompt was blocked.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback on the prompt, set when it was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    /// Token usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    /// Exact model version that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl Response {
    /// Text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let text = self.candidates.first()?.content.as_ref()?.text();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Describe why the response carries no text. Used for error messages.
    pub fn why_empty(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked: {reason}");
        }

        match self.candidates.first() {
            None => "no candidates in response".to_string(),
            Some(Candidate {
                finish_reason: Some(reason),
                ..
            }) => format!("no text in response (finish reason: {reason})"),
            Some(_) => "no text in response".to_string(),
        }
    }
}

/// A generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Why generation stopped, for example `STOP`, `MAX_TOKENS` or `SAFETY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Feedback on the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set if the prompt was blocked, for example `SAFETY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token usage statistics from the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u64,
    /// Tokens across all candidates.
    #[serde(default)]
    pub candidates_token_count: u64,
    /// Total tokens.
    #[serde(default)]
    pub total_token_count: u64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // Trimmed from a real `generateContent` response.
    pub const RESPONSE_JSON: &str = r#"{
  "candidates": [
    {
      "content": {
        "parts": [
          { "text": "Chicken Biryani\n\n" },
          { "text": "Serves 4." }
        ],
        "role": "model"
      },
      "finishReason": "STOP",
      "avgLogprobs": -0.21
    }
  ],
  "usageMetadata": {
    "promptTokenCount": 120,
    "candidatesTokenCount": 812,
    "totalTokenCount": 932
  },
  "modelVersion": "gemini-1.5-flash-latest"
}"#;

    pub const BLOCKED_JSON: &str = r#"{
  "promptFeedback": { "blockReason": "SAFETY" },
  "usageMetadata": { "promptTokenCount": 9, "totalTokenCount": 9 }
}"#;

    #[test]
    fn test_response_deserialize() {
        let response: Response = serde_json::from_str(RESPONSE_JSON).unwrap();

        assert_eq!(response.candidates.len(), 1);
        assert_eq!(
            response.candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );
        assert_eq!(
            response.usage_metadata,
            Some(UsageMetadata {
                prompt_token_count: 120,
                candidates_token_count: 812,
                total_token_count: 932,
            })
        );
        assert_eq!(
            response.model_version.as_deref(),
            Some("gemini-1.5-flash-latest")
        );
        assert_eq!(
            response.text().as_deref(),
            Some("Chicken Biryani\n\nServes 4.")
        );
    }

    #[test]
    fn test_blocked_response() {
        let response: Response = serde_json::from_str(BLOCKED_JSON).unwrap();

        assert!(response.text().is_none());
        assert_eq!(response.why_empty(), "prompt blocked: SAFETY");
    }

    #[test]
    fn test_why_empty() {
        assert_eq!(Response::default().why_empty(), "no candidates in response");

        let response = Response {
            candidates: vec![Candidate {
                content: None,
                finish_reason: Some("MAX_TOKENS".into()),
            }],
            ..Default::default()
        };
        assert!(response.text().is_none());
        assert_eq!(
            response.why_empty(),
            "no text in response (finish reason: MAX_TOKENS)"
        );
    }
}
