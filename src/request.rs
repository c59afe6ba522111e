//! [Gemini API] `generateContent` [`Request`] types.
//!
//! [Gemini API]: <https://ai.google.dev/api/generate-content>

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Conversation so far. For a single prompt this is one [`User`]
    /// [`Content`].
    ///
    /// [`User`]: Role::User
    pub contents: Vec<Content>,
}

impl Request {
    /// A request consisting of a single user prompt.
    pub fn new<S>(prompt: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            contents: vec![Content::user(prompt)],
        }
    }
}

/// Role of the [`Content`] author.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// From the user.
    #[display("user")]
    User,
    /// From the model.
    #[display("model")]
    Model,
}

/// A turn of the conversation, made of [`Part`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Who is providing the content. The API omits this in some responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Single-part text content from the user.
    pub fn user<S>(text: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            role: Some(Role::User),
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of all parts. Non-text parts are skipped.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(|p| p.text.as_deref()).collect()
    }
}

/// A [`Content`] part. Only text is used here; other part kinds (inline data,
/// function calls) deserialize with `text` set to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Text of the part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// A text part.
    pub fn text<S>(text: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            text: Some(text.into()),
        }
    }
}
