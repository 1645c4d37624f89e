//! Clients for the Gemini `generateContent` API.
//!
//! [`GroundedSearchFormatter`] asks a search-enabled model and renders the
//! answer with its web sources. [`CompletionClient`] sends a plain
//! completion request, optionally seeded with such a grounded answer.
//!
//! Both are generic over the [`Transport`] and take any
//! [`CredentialProvider`], so the HTTP layer and the API key source can be
//! swapped out (see [`HttpTransport`] for the production transport).

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod completion;
mod config;
mod dump;
mod proto;
mod search;
mod transport;

use grounded_agents_model::{CredentialProvider, Error, PostRequest, Transport};

pub use completion::CompletionClient;
pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use search::GroundedSearchFormatter;
pub use transport::HttpTransport;

use proto::{GenerateContentRequest, GenerateContentResponse};

/// Names of the dump files written for one kind of call.
struct DumpFiles {
    request: Option<&'static str>,
    response: &'static str,
}

const COMPLETION_DUMP: DumpFiles = DumpFiles {
    request: Some("requestBody.json"),
    response: "responseBody.json",
};

const SEARCH_DUMP: DumpFiles = DumpFiles {
    request: None,
    response: "searchResponseBody.json",
};

/// State shared by the clients built from the same parts.
struct Endpoint<T> {
    transport: T,
    credential: Box<dyn CredentialProvider>,
    config: GeminiConfig,
}

impl<T: Transport> Endpoint<T> {
    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
        dump_files: &DumpFiles,
    ) -> Result<GenerateContentResponse, Error> {
        let api_key = self.credential.api_key()?;
        let body = serde_json::to_string(body).map_err(|err| {
            Error::response_shape()
                .with_reason(format!("failed to encode request: {err}"))
        })?;
        let dump_dir = self.config.dump_dir();
        if let Some(file_name) = dump_files.request {
            dump::write_body(dump_dir, file_name, &body).await;
        }

        debug!("sending request to {model}");
        trace!("request body: {body}");
        let resp_body = self
            .transport
            .post_json(PostRequest {
                url: self.config.generate_content_url(model, &api_key),
                body,
            })
            .await?;
        trace!("response body: {resp_body}");
        dump::write_body(dump_dir, dump_files.response, &resp_body).await;

        GenerateContentResponse::from_body(&resp_body)
    }
}
