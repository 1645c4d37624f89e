use crate::error::Error;

/// A JSON `POST` to be performed by a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PostRequest {
    /// The full endpoint URL, including the query string.
    pub url: String,
    /// The serialized JSON body.
    pub body: String,
}

/// A type that performs HTTP requests on behalf of the clients.
///
/// Implementations send `body` with `Content-Type: application/json` and
/// resolve to the raw response body. Connection failures, timeouts and
/// non-success statuses are reported as [`ErrorKind::Transport`].
///
/// Like a model provider, a transport should behave like a stateless
/// object: every call is independent and may run concurrently with others.
///
/// [`ErrorKind::Transport`]: crate::ErrorKind::Transport
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response body.
    fn post_json(
        &self,
        req: PostRequest,
    ) -> impl Future<Output = Result<String, Error>> + Send + 'static;
}
