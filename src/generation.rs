//! [`GenerationResult`] and its [`Outcome`].

use chrono::{Local, NaiveDateTime};
use derive_more::derive::IsVariant;

use crate::prompt::{Ingredients, Preferences};

/// Result of a single generation attempt.
///
/// Both payloads are non-empty: see [`Outcome::success`] and
/// [`Outcome::failure`].
#[derive(Debug, Clone, PartialEq, Eq, IsVariant, derive_more::Display)]
pub enum Outcome {
    /// The model answered. `text` is exactly what it returned.
    #[display("{text}")]
    Success {
        #[allow(missing_docs)]
        text: String,
    },
    /// Generation failed. `message` describes why.
    #[display("Error: {message}")]
    Failure {
        #[allow(missing_docs)]
        message: String,
    },
}

impl Outcome {
    /// Message used when the model returns nothing.
    pub const EMPTY_RESPONSE: &'static str = "empty response from model";
    /// Message used when an error describes itself as nothing.
    pub const UNKNOWN_ERROR: &'static str = "unknown error";

    /// A [`Success`] with `text`, or a [`Failure`] if `text` is empty.
    ///
    /// [`Success`]: Outcome::Success
    /// [`Failure`]: Outcome::Failure
    pub fn success<S>(text: S) -> Self
    where
        S: Into<String>,
    {
        let text = text.into();
        if text.is_empty() {
            Self::failure(Self::EMPTY_RESPONSE)
        } else {
            Self::Success { text }
        }
    }

    /// A [`Failure`] with `message`, or [`UNKNOWN_ERROR`] if it is empty.
    ///
    /// [`Failure`]: Outcome::Failure
    /// [`UNKNOWN_ERROR`]: Outcome::UNKNOWN_ERROR
    pub fn failure<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        let message = message.into();
        Self::Failure {
            message: if message.is_empty() {
                Self::UNKNOWN_ERROR.to_string()
            } else {
                message
            },
        }
    }

    /// Generated text, if successful.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }
}

impl<E> From<Result<String, E>> for Outcome
where
    E: std::fmt::Display,
{
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(text) => Self::success(text),
            Err(error) => Self::failure(error.to_string()),
        }
    }
}

/// A generation [`Outcome`] together with the inputs that produced it.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    timestamp: NaiveDateTime,
    ingredients: Ingredients,
    preferences: Preferences,
    outcome: Outcome,
}

impl GenerationResult {
    /// Create a result stamped with the current local time.
    pub fn new(
        ingredients: Ingredients,
        preferences: Preferences,
        outcome: Outcome,
    ) -> Self {
        Self::at(Local::now().naive_local(), ingredients, preferences, outcome)
    }

    /// Create a result with an explicit timestamp.
    pub fn at(
        timestamp: NaiveDateTime,
        ingredients: Ingredients,
        preferences: Preferences,
        outcome: Outcome,
    ) -> Self {
        Self {
            timestamp,
            ingredients,
            preferences,
            outcome,
        }
    }

    /// When the result was created (local time).
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Ingredients the prompt was built from.
    pub fn ingredients(&self) -> &Ingredients {
        &self.ingredients
    }

    /// Preferences the prompt was built from.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Generation outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}
