use grounded_agents_model::{
    CompletionRequest, CredentialProvider, Error, Transport,
};
use tracing::Instrument;

use crate::proto::create_completion_request;
use crate::{COMPLETION_DUMP, GeminiConfig, GroundedSearchFormatter};

/// Sends completion requests and returns the generated text.
///
/// With [`CompletionRequest::use_search`] set, the prompt is first sent to
/// the [`GroundedSearchFormatter`] built from the same parts, and its
/// rendered answer goes in as a turn preceding the prompt. The search call
/// always completes before the completion request is built.
pub struct CompletionClient<T> {
    search: GroundedSearchFormatter<T>,
}

impl<T> Clone for CompletionClient<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
        }
    }
}

impl<T: Transport> CompletionClient<T> {
    /// Creates a client from its collaborators.
    #[inline]
    pub fn new<C: CredentialProvider + 'static>(
        transport: T,
        credential: C,
        config: GeminiConfig,
    ) -> Self {
        Self {
            search: GroundedSearchFormatter::new(transport, credential, config),
        }
    }

    /// Returns the search formatter sharing this client's transport,
    /// credential and configuration.
    #[inline]
    pub fn search_formatter(&self) -> &GroundedSearchFormatter<T> {
        &self.search
    }

    /// Sends the request and returns
    /// `candidates[0].content.parts[0].text` of the response.
    ///
    /// Nothing is retried. A failing search call aborts the whole
    /// operation before the completion request is sent.
    pub async fn complete(&self, req: &CompletionRequest) -> Result<String, Error> {
        async {
            let search_context = if req.use_search {
                Some(self.search.fetch(&req.prompt).await?.to_string())
            } else {
                None
            };

            let body = create_completion_request(req, search_context);
            let resp = self
                .search
                .endpoint
                .generate_content(&req.model, &body, &COMPLETION_DUMP)
                .await?;
            resp.first_text().map(ToOwned::to_owned)
        }
        .instrument(debug_span!("completion", model = %req.model))
        .await
        .inspect_err(|err| error!("completion failed: {err}"))
    }
}
