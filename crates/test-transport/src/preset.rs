use grounded_agents_model::ErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scripted reply of the [`TestTransport`](crate::TestTransport).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// The request succeeds with this raw body.
    #[serde(rename = "body")]
    Body(String),
    /// The request fails with an error of this kind.
    #[serde(rename = "failure")]
    Failure(ErrorKind),
}

impl PresetReply {
    /// Creates a successful reply with a JSON body.
    #[inline]
    pub fn json(value: Value) -> Self {
        Self::Body(value.to_string())
    }
}
