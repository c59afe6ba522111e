//! [`Model`] to use for inference.

use std::str::FromStr;

/// Gemini model to use for inference.
///
/// The API addresses models as `models/<id>`; the prefix is accepted when
/// parsing and stripped, so `models/gemini-1.5-flash` and `gemini-1.5-flash`
/// are the same model.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Gemini 1.5 Flash (latest). This is the default model.
    #[default]
    Gemini15FlashLatest,
    /// Gemini 1.5 Flash
    Gemini15Flash,
    /// Gemini 2.0 Flash
    Gemini20Flash,
    /// Any other model id, without the `models/` prefix.
    Custom(String),
}

impl Model {
    /// Prefix the API uses for model resource names.
    pub const PREFIX: &'static str = "models/";

    /// Candidates tried, in order, when no models are configured.
    pub const DEFAULT_CANDIDATES: [Model; 3] = [
        Model::Gemini15FlashLatest,
        Model::Gemini15Flash,
        Model::Gemini20Flash,
    ];

    /// Model id as used in request URLs (no `models/` prefix).
    pub fn id(&self) -> &str {
        match self {
            Self::Gemini15FlashLatest => "gemini-1.5-flash-latest",
            Self::Gemini15Flash => "gemini-1.5-flash",
            Self::Gemini20Flash => "gemini-2.0-flash",
            Self::Custom(id) => id,
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Error for an empty model id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("model id is empty")]
pub struct EmptyModel;

impl FromStr for Model {
    type Err = EmptyModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let id = s.strip_prefix(Self::PREFIX).unwrap_or(s);

        Ok(match id {
            "" => return Err(EmptyModel),
            "gemini-1.5-flash-latest" => Self::Gemini15FlashLatest,
            "gemini-1.5-flash" => Self::Gemini15Flash,
            "gemini-2.0-flash" => Self::Gemini20Flash,
            other => Self::Custom(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known() {
        assert_eq!(
            "gemini-1.5-flash-latest".parse::<Model>().unwrap(),
            Model::Gemini15FlashLatest
        );
        assert_eq!(
            "models/gemini-1.5-flash".parse::<Model>().unwrap(),
            Model::Gemini15Flash
        );
    }

    #[test]
    fn test_parse_custom() {
        let model: Model = " models/gemini-exp-1206 ".parse().unwrap();
        assert_eq!(model, Model::Custom("gemini-exp-1206".into()));
        assert_eq!(model.id(), "gemini-exp-1206");
        assert_eq!(model.to_string(), "gemini-exp-1206");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!("".parse::<Model>().unwrap_err(), EmptyModel);
        assert_eq!("models/".parse::<Model>().unwrap_err(), EmptyModel);
    }

    #[test]
    fn test_default_is_first_candidate() {
        assert_eq!(Model::default(), Model::DEFAULT_CANDIDATES[0]);
    }
}
