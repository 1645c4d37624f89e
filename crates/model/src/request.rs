use mime::Mime;
use serde::{Deserialize, Serialize};

/// The MIME type the model is asked to answer with.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `text/plain`
    #[default]
    Plain,
    /// `application/json`
    Json,
}

impl ResponseFormat {
    /// Returns the MIME type of this format.
    #[inline]
    pub fn mime(&self) -> Mime {
        match self {
            ResponseFormat::Plain => mime::TEXT_PLAIN,
            ResponseFormat::Json => mime::APPLICATION_JSON,
        }
    }
}

/// A completion request.
///
/// One request maps to exactly one completion call. When `use_search` is
/// set, a grounded search call for the same prompt is issued first and its
/// formatted result is sent as context preceding the prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    /// The model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// Sampling temperature. Passed through as is.
    pub temperature: f64,
    /// The user prompt.
    pub prompt: String,
    /// The requested response format.
    pub response_format: ResponseFormat,
    /// Whether to seed the request with grounded search context.
    pub use_search: bool,
}

impl CompletionRequest {
    /// Creates a plain-text request without search, at temperature `0.7`.
    #[inline]
    pub fn new<M: Into<String>, P: Into<String>>(model: M, prompt: P) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            prompt: prompt.into(),
            response_format: ResponseFormat::Plain,
            use_search: false,
        }
    }

    /// Sets the sampling temperature.
    #[inline]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the response format.
    #[inline]
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Enables or disables grounded search context.
    #[inline]
    pub fn with_search(mut self, use_search: bool) -> Self {
        self.use_search = use_search;
        self
    }
}
