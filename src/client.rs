//! [`Client`] for the Gemini `generateContent` API and related types.

use std::{future::Future, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{generation::Outcome, request::Request, Config, Key, Model};

/// Result type for the client. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Something that turns a prompt into generated text.
///
/// [`request`] may fail in any way it likes; [`generate`] folds every failure
/// into an [`Outcome::Failure`] so callers never see an error.
///
/// [`request`]: Generate::request
/// [`generate`]: Generate::generate
pub trait Generate: Sync {
    /// Error type of [`Self::request`].
    type Error: std::fmt::Display + Send;

    /// Send `prompt` and return the generated text.
    fn request(
        &self,
        prompt: &str,
    ) -> impl Future<Output = std::result::Result<String, Self::Error>> + Send;

    /// Send `prompt` and return the [`Outcome`]. Never fails.
    fn generate(&self, prompt: &str) -> impl Future<Output = Outcome> + Send {
        async move { Outcome::from(self.request(prompt).await) }
    }
}

/// Client for the Gemini API.
///
/// See [`Self::connect`] for creating a client with a verified model and
/// [`Generate::generate`] to get started.
#[derive(Clone)]
pub struct Client {
    /// Inner [`reqwest::Client`]. The API [`Key`] is **set automatically on
    /// requests**, so it is not necessary to set it on a custom client.
    pub inner: reqwest::Client,
    /// API [`Key`]. It can be set to a new [`Key`] to change the key used for
    /// requests.
    pub key: Arc<Key>,
    /// [`Model`] used for generation.
    pub model: Model,
    /// API base URL, without a trailing slash.
    pub base_url: Arc<str>,
    /// Responses with a larger body are rejected with
    /// [`Error::ResponseTooLarge`].
    pub max_response_bytes: usize,
}

static_assertions::assert_impl_all!(Client: Clone, Send, Sync);

impl Client {
    /// Our user agent.
    pub const USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));
    /// Header carrying the API key.
    pub const API_KEY_HEADER: &'static str = "x-goog-api-key";

    /// Create a new client using the first model candidate, without checking
    /// that the API accepts it. See [`Self::connect`].
    pub fn new(config: Config) -> Result<Self> {
        let model = config
            .models
            .first()
            .cloned()
            .ok_or(Error::NoUsableModel { tried: Vec::new() })?;

        #[cfg(feature = "log")]
        {
            log::info!(concat!(
                "Creating ",
                env!("CARGO_PKG_NAME"),
                " client..."
            ));
            log::debug!(concat!("Crate version: ", env!("CARGO_PKG_VERSION")));
            log::debug!("Base URL: {}", config.base_url);
            log::debug!("Timeout: {:?}", config.timeout);
        }

        // Headers for all requests.
        let mut headers = reqwest::header::HeaderMap::new();

        // Content type needs to be set to JSON.
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(Self::USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner,
            key: Arc::new(config.key),
            model,
            base_url: config.base_url.into(),
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Create a new client and select the first model candidate the API
    /// accepts. Candidates are tried once, in order; this is not a retry
    /// policy.
    ///
    /// Returns [`Error::NoUsableModel`] if every candidate is rejected. Any
    /// other failure (network, bad key) is returned as soon as it happens.
    pub async fn connect(config: Config) -> Result<Self> {
        let candidates = config.models.clone();
        let mut client = Self::new(config)?;

        for model in candidates.iter() {
            if client.probe(model).await? {
                #[cfg(feature = "log")]
                log::info!("Using model `{}`", model);

                client.model = model.clone();
                return Ok(client);
            }

            #[cfg(feature = "log")]
            log::warn!("Model `{}` was rejected", model);
        }

        Err(Error::NoUsableModel { tried: candidates })
    }

    /// Check whether the API knows `model`. A `404` means it does not; other
    /// error statuses (for example a bad key) are returned as errors.
    pub async fn probe(&self, model: &Model) -> Result<bool> {
        let url = format!("{}/models/{}", self.base_url, model.id());
        let response = self.get(&url).await?;
        let status = response.status();

        if status.is_success() {
            Ok(true)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            let body = self.read_body(response).await?;
            Err(Error::from_status(status, &body))
        }
    }

    /// Create a [`reqwest::RequestBuilder`] with the API key set as a sensitive
    /// header value.
    pub fn request_raw<U>(
        &self,
        method: reqwest::Method,
        url: U,
    ) -> Result<reqwest::RequestBuilder>
    where
        U: reqwest::IntoUrl,
    {
        #[cfg(feature = "log")]
        {
            log::debug!("{} request to {}", method, url.as_str());
        }

        let mut val = reqwest::header::HeaderValue::from_str(self.key.read())?;
        val.set_sensitive(true);

        Ok(self
            .inner
            .request(method, url)
            .header(Self::API_KEY_HEADER, val))
    }

    /// Send a GET request with the API key set as a sensitive header value.
    pub async fn get<U>(&self, url: U) -> Result<reqwest::Response>
    where
        U: reqwest::IntoUrl,
    {
        Ok(self.request_raw(reqwest::Method::GET, url)?.send().await?)
    }

    /// Send a POST request with the API key set as a sensitive header value.
    pub async fn post<U, B>(&self, url: U, body: &B) -> Result<reqwest::Response>
    where
        U: reqwest::IntoUrl,
        B: Serialize,
    {
        let req = self.request_raw(reqwest::Method::POST, url)?;

        #[cfg(feature = "log")]
        {
            if let Ok(json) = serde_json::to_string_pretty(body) {
                log::debug!("Sending body:\n{}", json);
            } else {
                log::warn!("Could not serialize body. Request will fail.");
            }
        }

        Ok(req.json(body).send().await?)
    }

    /// Send `prompt` to `generateContent` and return the text of the first
    /// candidate, verbatim.
    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.model.id()
        );

        let response = self.post(&url, &Request::new(prompt)).await?;
        let status = response.status();
        let body = self.read_body(response).await?;

        if !status.is_success() {
            return Err(Error::from_status(status, &body));
        }

        let response: crate::Response = serde_json::from_slice(&body)?;

        #[cfg(feature = "log")]
        {
            if let Some(usage) = &response.usage_metadata {
                log::debug!(
                    "Tokens: {} prompt, {} generated",
                    usage.prompt_token_count,
                    usage.candidates_token_count
                );
            }
        }

        response.text().ok_or_else(|| Error::UnexpectedResponse {
            message: response.why_empty(),
        })
    }

    /// Read a response body, failing once it exceeds
    /// [`Self::max_response_bytes`].
    async fn read_body(&self, mut response: reqwest::Response) -> Result<Vec<u8>> {
        let limit = self.max_response_bytes;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(Error::ResponseTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(Error::ResponseTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

impl Generate for Client {
    type Error = Error;

    async fn request(&self, prompt: &str) -> Result<String> {
        let result = self.generate_content(prompt).await;

        #[cfg(feature = "log")]
        {
            if let Err(error) = &result {
                log::warn!("Generation failed: {}", error);
            }
        }

        result
    }
}

/// [`Client`] error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP error, including timeouts and connection failures.
    #[error("HTTP error: {0}")]
    HTTP(#[from] reqwest::Error),
    /// The API key cannot be used as a header value.
    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    /// Data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Error reported by the API.
    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),
    /// Error status without a parsable error body.
    #[error("Unexpected status {status}: {body}")]
    #[allow(missing_docs)]
    Status { status: u16, body: String },
    /// The response body exceeded [`Client::max_response_bytes`].
    #[error("Response larger than {limit} bytes")]
    #[allow(missing_docs)]
    ResponseTooLarge { limit: usize },
    /// The API answered but there is no text to show, for example because
    /// the prompt was blocked.
    #[error("Unexpected response: {message}")]
    #[allow(missing_docs)]
    UnexpectedResponse { message: String },
    /// Every model candidate was rejected.
    #[error("No usable model (tried: {})", join_models(.tried))]
    #[allow(missing_docs)]
    NoUsableModel { tried: Vec<Model> },
}

impl Error {
    /// Returns true if the error is fixed by changing the configuration (key,
    /// model list) rather than by trying again later.
    pub fn is_configuration(&self) -> bool {
        const AUTH: [u16; 3] = [400, 401, 403];

        match self {
            Self::Header(_) | Self::NoUsableModel { .. } => true,
            Self::Gemini(e) => AUTH.contains(&e.code),
            Self::Status { status, .. } => AUTH.contains(status),
            Self::HTTP(_)
            | Self::Parse(_)
            | Self::ResponseTooLarge { .. }
            | Self::UnexpectedResponse { .. } => false,
        }
    }

    /// Build an error from a non-success status and its body.
    fn from_status(status: reqwest::StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<GeminiErrorWrapper>(body) {
            Ok(wrapper) => wrapper.error.into(),
            Err(_) => Self::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }
}

fn join_models(models: &[Model]) -> String {
    if models.is_empty() {
        return "none".to_string();
    }

    models
        .iter()
        .map(Model::id)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error reported by the Gemini API.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[error("{status} ({code}): {message}")]
pub struct GeminiError {
    /// HTTP status code.
    pub code: u16,
    /// Human-readable description.
    pub message: String,
    /// Canonical status, for example `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: String,
}

// The API wraps errors in an `error` object.
#[derive(Deserialize)]
pub(crate) struct GeminiErrorWrapper {
    pub(crate) error: GeminiError,
}
