//! [`Config`] for the [`Client`] and the [`Store`].
//!
//! [`Client`]: crate::Client
//! [`Store`]: crate::Store

use std::{path::PathBuf, time::Duration};

use crate::{key, model, Key, Model};

/// Result type for configuration. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors. These are fatal: no session can start without a
/// valid configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The environment variable holding the API key is not set.
    #[error("`{var}` environment variable not set")]
    MissingKey {
        /// Name of the variable.
        var: String,
    },
    /// The API key is malformed.
    #[error("invalid API key in `{var}`: {source}")]
    InvalidKey {
        /// Name of the variable.
        var: String,
        /// What is wrong with it.
        source: key::InvalidKey,
    },
    /// A model id is malformed.
    #[error("invalid model in `{var}`: {source}")]
    InvalidModel {
        /// Where the model came from.
        var: String,
        /// What is wrong with it.
        source: model::EmptyModel,
    },
    /// A numeric setting could not be parsed.
    #[error("invalid value `{value}` for `{var}`")]
    InvalidNumber {
        /// Where the value came from.
        var: String,
        /// The offending value.
        value: String,
    },
    /// No model candidates are configured.
    #[error("no model candidates configured")]
    NoModels,
}

/// Everything the client and store need, passed explicitly at construction.
#[derive(Debug)]
pub struct Config {
    /// API key.
    pub key: Key,
    /// Model candidates, tried in order once by [`Client::connect`].
    ///
    /// [`Client::connect`]: crate::Client::connect
    pub models: Vec<Model>,
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Timeout for each HTTP request.
    pub timeout: Duration,
    /// Directory generated recipes are saved to.
    pub output_dir: PathBuf,
    /// Responses with a larger body are rejected.
    pub max_response_bytes: usize,
}

impl Config {
    /// Default environment variable for the API key.
    pub const DEFAULT_KEY_VAR: &'static str = "GEMINI_API_KEY";
    /// Comma-separated model candidates.
    pub const MODELS_VAR: &'static str = "SOUSCHEF_MODELS";
    /// Output directory.
    pub const OUTPUT_DIR_VAR: &'static str = "SOUSCHEF_OUTPUT_DIR";
    /// API base URL.
    pub const BASE_URL_VAR: &'static str = "SOUSCHEF_BASE_URL";
    /// Request timeout in seconds.
    pub const TIMEOUT_VAR: &'static str = "SOUSCHEF_TIMEOUT";

    /// Default API base URL.
    pub const DEFAULT_BASE_URL: &'static str =
        "https://generativelanguage.googleapis.com/v1beta";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
    /// Default output directory.
    pub const DEFAULT_OUTPUT_DIR: &'static str = "generated_recipes";
    /// Default response size limit (1 MiB).
    pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1 << 20;

    /// Create a configuration with defaults for everything but the key.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            models: Model::DEFAULT_CANDIDATES.to_vec(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            output_dir: PathBuf::from(Self::DEFAULT_OUTPUT_DIR),
            max_response_bytes: Self::DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    /// Load from the process environment, reading the key from
    /// [`DEFAULT_KEY_VAR`].
    ///
    /// [`DEFAULT_KEY_VAR`]: Self::DEFAULT_KEY_VAR
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(Self::DEFAULT_KEY_VAR)
    }

    /// Load from the process environment, reading the key from `key_var`.
    pub fn from_env_var(key_var: &str) -> Result<Self> {
        Self::from_lookup(key_var, |var| std::env::var(var).ok())
    }

    /// Load using `lookup` to read variables. The key is read from `key_var`;
    /// the `SOUSCHEF_*` variables override the defaults when set and
    /// non-empty.
    pub fn from_lookup<F>(key_var: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(key_var).ok_or_else(|| Error::MissingKey {
            var: key_var.to_string(),
        })?;
        let key = Key::try_from(raw).map_err(|source| Error::InvalidKey {
            var: key_var.to_string(),
            source,
        })?;

        let mut config = Self::new(key);
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(models) = get(Self::MODELS_VAR) {
            config = config.models(
                models
                    .split(',')
                    .map(|m| {
                        m.parse().map_err(|source| Error::InvalidModel {
                            var: Self::MODELS_VAR.to_string(),
                            source,
                        })
                    })
                    .collect::<Result<Vec<Model>>>()?,
            )?;
        }
        if let Some(dir) = get(Self::OUTPUT_DIR_VAR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = get(Self::BASE_URL_VAR) {
            config = config.base_url(url);
        }
        if let Some(secs) = get(Self::TIMEOUT_VAR) {
            let secs: u64 =
                secs.trim().parse().map_err(|_| Error::InvalidNumber {
                    var: Self::TIMEOUT_VAR.to_string(),
                    value: secs.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace the model candidates. Fails if `models` is empty.
    pub fn models<Ms>(mut self, models: Ms) -> Result<Self>
    where
        Ms: IntoIterator<Item = Model>,
    {
        let mut deduped: Vec<Model> = Vec::new();
        for model in models {
            if !deduped.contains(&model) {
                deduped.push(model);
            }
        }

        if deduped.is_empty() {
            return Err(Error::NoModels);
        }

        self.models = deduped;
        Ok(self)
    }

    /// Set the base URL. A trailing slash is removed.
    pub fn base_url<S>(mut self, url: S) -> Self
    where
        S: Into<String>,
    {
        let url = url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the output directory.
    pub fn output_dir<P>(mut self, dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.output_dir = dir.into();
        self
    }

    /// Set the response size limit.
    pub fn max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }
}
