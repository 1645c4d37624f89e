use std::sync::Arc;

use grounded_agents_model::{
    CredentialProvider, Error, GroundedAnswer, Transport,
};
use tracing::Instrument;

use crate::proto::create_search_request;
use crate::{Endpoint, GeminiConfig, SEARCH_DUMP};

/// Asks a search-enabled model and renders the answer together with the
/// web sources it was grounded on.
///
/// The rendered text is the answer, followed by a blank line, a
/// `# Referências` header and one `- ` line per source when the response
/// carries grounding chunks. Without grounding metadata the text is just
/// the answer.
pub struct GroundedSearchFormatter<T> {
    pub(crate) endpoint: Arc<Endpoint<T>>,
}

impl<T> Clone for GroundedSearchFormatter<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            endpoint: Arc::clone(&self.endpoint),
        }
    }
}

impl<T: Transport> GroundedSearchFormatter<T> {
    /// Creates a formatter from its collaborators.
    pub fn new<C: CredentialProvider + 'static>(
        transport: T,
        credential: C,
        config: GeminiConfig,
    ) -> Self {
        let endpoint = Endpoint {
            transport,
            credential: Box::new(credential),
            config,
        };
        Self {
            endpoint: Arc::new(endpoint),
        }
    }

    /// Sends `prompt` to the search model and returns the answer with its
    /// citations.
    pub async fn search(&self, prompt: &str) -> Result<GroundedAnswer, Error> {
        self.fetch(prompt)
            .instrument(debug_span!("grounded search"))
            .await
            .inspect_err(|err| error!("grounded search failed: {err}"))
    }

    /// Like [`search`](Self::search), but returns the rendered text.
    #[inline]
    pub async fn search_and_format(&self, prompt: &str) -> Result<String, Error> {
        self.search(prompt).await.map(|answer| answer.to_string())
    }

    pub(crate) async fn fetch(
        &self,
        prompt: &str,
    ) -> Result<GroundedAnswer, Error> {
        let endpoint = &self.endpoint;
        let body = create_search_request(prompt);
        let resp = endpoint
            .generate_content(endpoint.config.search_model(), &body, &SEARCH_DUMP)
            .await?;
        let answer = resp.into_grounded_answer()?;
        debug!("got a grounded answer with {} citations", answer.citations.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use grounded_agents_model::{ErrorKind, StaticCredential};
    use grounded_agents_test_transport::{PresetReply, TestTransport};
    use serde_json::{Value, json};

    use super::*;

    fn formatter(transport: &TestTransport) -> GroundedSearchFormatter<TestTransport> {
        GroundedSearchFormatter::new(
            transport.clone(),
            StaticCredential::new("test-key"),
            GeminiConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_search_and_format() {
        let transport = TestTransport::default();
        transport.add_reply(PresetReply::json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "O dólar está a R$ 5,00."}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.com", "title": "Example"}},
                        {"web": {"uri": "https://example.org", "title": ""}}
                    ]
                }
            }]
        })));

        let text = formatter(&transport)
            .search_and_format("Quais os valores do dólar e do euro agora?")
            .await
            .unwrap();
        assert_eq!(
            text,
            "O dólar está a R$ 5,00.\n\n# Referências\n\
             - [Example](https://example.com)\n\
             - https://example.org\n"
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://generativelanguage.googleapis.com/v1beta/models/\
             gemini-2.5-flash-preview-04-17:generateContent?key=test-key"
        );
        let body: Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["tools"], json!([{"googleSearch": {}}]));
        assert_eq!(body["generationConfig"], json!({"response_mime_type": "text/plain"}));
    }

    #[tokio::test]
    async fn test_without_grounding_metadata() {
        let transport = TestTransport::default();
        transport.add_reply(PresetReply::json(json!({
            "candidates": [{"content": {"parts": [{"text": "Só o texto."}]}}]
        })));
        let text = formatter(&transport)
            .search_and_format("test")
            .await
            .unwrap();
        assert_eq!(text, "Só o texto.");
    }

    #[tokio::test]
    async fn test_empty_chunks() {
        let transport = TestTransport::default();
        transport.add_reply(PresetReply::json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Sem fontes."}]},
                "groundingMetadata": {"groundingChunks": []}
            }]
        })));
        let text = formatter(&transport)
            .search_and_format("test")
            .await
            .unwrap();
        assert_eq!(text, "Sem fontes.");
    }

    #[tokio::test]
    async fn test_missing_candidates() {
        let transport = TestTransport::default();
        transport.add_reply(PresetReply::json(json!({"candidates": []})));
        transport.add_reply(PresetReply::json(json!({})));

        let formatter = formatter(&transport);
        for _ in 0..2 {
            let err = formatter.search_and_format("test").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ResponseShape);
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let transport = TestTransport::default();
        transport.add_reply(PresetReply::Failure(ErrorKind::Transport));
        let err = formatter(&transport).search("test").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let transport = TestTransport::default();
        let formatter = GroundedSearchFormatter::new(
            transport.clone(),
            StaticCredential::new(""),
            GeminiConfig::default(),
        );
        let err = formatter.search("test").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Credential);
        assert!(transport.requests().is_empty());
    }
}
