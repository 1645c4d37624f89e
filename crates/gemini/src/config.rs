use std::path::{Path, PathBuf};

const DEFAULT_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_SEARCH_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Builder for [`GeminiConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeminiConfigBuilder {
    base_url: Option<String>,
    search_model: Option<String>,
    dump_dir: Option<PathBuf>,
}

impl GeminiConfigBuilder {
    /// Creates a builder with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the model used for grounded search requests.
    #[inline]
    pub fn with_search_model<S: Into<String>>(mut self, model: S) -> Self {
        self.search_model = Some(model.into());
        self
    }

    /// Sets a directory where request and response bodies are dumped.
    #[inline]
    pub fn with_dump_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> GeminiConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        GeminiConfig {
            base_url: base_url.trim_end_matches('/').to_owned(),
            search_model: self
                .search_model
                .unwrap_or_else(|| DEFAULT_SEARCH_MODEL.to_string()),
            dump_dir: self.dump_dir,
        }
    }
}

/// Configuration shared by the Gemini clients.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeminiConfig {
    pub(crate) base_url: String,
    pub(crate) search_model: String,
    pub(crate) dump_dir: Option<PathBuf>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfigBuilder::new().build()
    }
}

impl GeminiConfig {
    /// Returns the model used for grounded search requests.
    #[inline]
    pub fn search_model(&self) -> &str {
        &self.search_model
    }

    /// `{base}/models/{model}:generateContent?key={key}`
    pub(crate) fn generate_content_url(
        &self,
        model: &str,
        api_key: &str,
    ) -> String {
        format!(
            "{}/models/{model}:generateContent?key={api_key}",
            self.base_url
        )
    }

    #[inline]
    pub(crate) fn dump_dir(&self) -> Option<&Path> {
        self.dump_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::default();
        assert_eq!(config.search_model(), "gemini-2.5-flash-preview-04-17");
        assert_eq!(config.dump_dir(), None);
        assert_eq!(
            config.generate_content_url("gemini-1.5-flash", "k"),
            "https://generativelanguage.googleapis.com/v1beta/models/\
             gemini-1.5-flash:generateContent?key=k"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let config = GeminiConfigBuilder::new()
            .with_base_url("http://localhost:8080/v1/")
            .with_search_model("gemini-2.0-flash")
            .build();
        assert_eq!(
            config.generate_content_url(config.search_model(), "k"),
            "http://localhost:8080/v1/models/gemini-2.0-flash:generateContent?key=k"
        );
    }
}
