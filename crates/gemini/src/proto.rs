use grounded_agents_model::{
    Citation, CompletionRequest, Error, GroundedAnswer, ResponseFormat,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Part,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub response_mime_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GoogleSearch {}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tool {
    #[serde(rename = "googleSearch")]
    pub google_search: GoogleSearch,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    /// Only read by [`GenerateContentResponse::citations`], parsed there.
    #[serde(rename = "groundingMetadata")]
    pub grounding_metadata: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct GroundingMetadata {
    #[serde(rename = "groundingChunks")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

// -----------
// Conversions
// -----------

#[inline]
fn user_turn(text: String) -> Content {
    Content {
        role: "user",
        parts: Part { text },
    }
}

/// Builds the body of a completion request. The search context, if any,
/// goes in its own turn before the prompt.
pub fn create_completion_request(
    req: &CompletionRequest,
    search_context: Option<String>,
) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(2);
    if let Some(context) = search_context {
        contents.push(user_turn(context));
    }
    contents.push(user_turn(req.prompt.clone()));

    GenerateContentRequest {
        contents,
        generation_config: GenerationConfig {
            temperature: Some(req.temperature),
            response_mime_type: req.response_format.mime().to_string(),
        },
        tools: vec![],
    }
}

/// Builds the body of a grounded search request.
pub fn create_search_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![user_turn(prompt.to_owned())],
        generation_config: GenerationConfig {
            temperature: None,
            response_mime_type: ResponseFormat::Plain.mime().to_string(),
        },
        tools: vec![Tool {
            google_search: GoogleSearch {},
        }],
    }
}

#[inline]
fn missing(path: &str) -> Error {
    Error::response_shape().with_reason(format!("missing `{path}`"))
}

impl GenerateContentResponse {
    /// Parses a raw response body.
    pub fn from_body(body: &str) -> Result<Self, Error> {
        serde_json::from_str(body).map_err(|err| {
            Error::response_shape().with_reason(format!("{err}"))
        })
    }

    fn first_candidate(&self) -> Result<&Candidate, Error> {
        self.candidates
            .as_deref()
            .ok_or_else(|| missing("candidates"))?
            .first()
            .ok_or_else(|| missing("candidates[0]"))
    }

    /// Returns `candidates[0].content.parts[0].text`.
    pub fn first_text(&self) -> Result<&str, Error> {
        let parts = self
            .first_candidate()?
            .content
            .as_ref()
            .ok_or_else(|| missing("candidates[0].content"))?
            .parts
            .as_deref()
            .ok_or_else(|| missing("candidates[0].content.parts"))?;
        parts
            .first()
            .ok_or_else(|| missing("candidates[0].content.parts[0]"))?
            .text
            .as_deref()
            .ok_or_else(|| missing("candidates[0].content.parts[0].text"))
    }

    /// Returns the web sources of the first candidate, in order.
    ///
    /// A candidate without grounding metadata has no citations. A chunk
    /// without a web source or URI is a shape error.
    pub fn citations(&self) -> Result<Vec<Citation>, Error> {
        let Some(metadata) = &self.first_candidate()?.grounding_metadata else {
            return Ok(vec![]);
        };
        let metadata = GroundingMetadata::deserialize(metadata).map_err(|err| {
            Error::response_shape()
                .with_reason(format!("candidates[0].groundingMetadata: {err}"))
        })?;
        let Some(chunks) = metadata.grounding_chunks else {
            return Ok(vec![]);
        };

        chunks
            .into_iter()
            .enumerate()
            .map(|(idx, chunk)| -> Result<Citation, Error> {
                let path = format!(
                    "candidates[0].groundingMetadata.groundingChunks[{idx}].web"
                );
                let web = chunk.web.ok_or_else(|| missing(&path))?;
                let uri = web
                    .uri
                    .filter(|uri| !uri.is_empty())
                    .ok_or_else(|| missing(&format!("{path}.uri")))?;
                Ok(Citation {
                    title: web.title,
                    uri,
                })
            })
            .collect()
    }

    /// Extracts the answer text and its citations.
    pub fn into_grounded_answer(self) -> Result<GroundedAnswer, Error> {
        Ok(GroundedAnswer {
            answer_text: self.first_text()?.to_owned(),
            citations: self.citations()?,
        })
    }
}
