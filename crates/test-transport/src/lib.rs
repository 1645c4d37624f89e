//! A scripted fake transport for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::future::ready;
use std::sync::{Arc, Mutex, MutexGuard};

use grounded_agents_model::{Error, ErrorKind, PostRequest, Transport};

pub use preset::*;

#[derive(Default)]
struct State {
    script: VecDeque<PresetReply>,
    requests: Vec<PostRequest>,
}

/// A fake transport that replies from a script and records every request.
///
/// Replies are consumed in the order they were added, one per request.
/// When the script runs out, requests fail with a transport error. Clones
/// share the same script and request log, so a test can keep one handle
/// while a client owns another.
///
/// # Note
///
/// No network is involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestTransport {
    state: Arc<Mutex<State>>,
}

impl TestTransport {
    #[inline]
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Appends a reply to the script.
    #[inline]
    pub fn add_reply(&self, reply: PresetReply) {
        self.lock().script.push_back(reply);
    }

    /// Returns all requests received so far, oldest first.
    #[inline]
    pub fn requests(&self) -> Vec<PostRequest> {
        self.lock().requests.clone()
    }
}

impl Transport for TestTransport {
    fn post_json(
        &self,
        req: PostRequest,
    ) -> impl Future<Output = Result<String, Error>> + Send + 'static {
        let mut state = self.lock();
        state.requests.push(req);
        let result = match state.script.pop_front() {
            Some(PresetReply::Body(body)) => Ok(body),
            Some(PresetReply::Failure(kind)) => Err(error_of_kind(kind)),
            None => Err(Error::transport().with_reason("no enough replies")),
        };
        ready(result)
    }
}

fn error_of_kind(kind: ErrorKind) -> Error {
    let err = match kind {
        ErrorKind::Credential => Error::credential(),
        ErrorKind::Transport => Error::transport(),
        ErrorKind::ResponseShape => Error::response_shape(),
    };
    err.with_reason("scripted failure")
}
