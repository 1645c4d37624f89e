use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No API key could be obtained. Raised before any network attempt.
    Credential,
    /// Connection failure, timeout, or a non-success HTTP status.
    Transport,
    /// The response body is not valid JSON, or the expected fields are
    /// missing or have the wrong type.
    ResponseShape,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Credential => write!(f, "Credential unavailable"),
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::ResponseShape => write!(f, "Unexpected response shape"),
        }
    }
}

/// Describes a failed call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `Credential` kind.
    #[inline]
    pub fn credential() -> Self {
        Self {
            kind: ErrorKind::Credential,
            reason: None,
        }
    }

    /// Creates a new error with the `Transport` kind.
    #[inline]
    pub fn transport() -> Self {
        Self {
            kind: ErrorKind::Transport,
            reason: None,
        }
    }

    /// Creates a new error with the `ResponseShape` kind.
    #[inline]
    pub fn response_shape() -> Self {
        Self {
            kind: ErrorKind::ResponseShape,
            reason: None,
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {reason}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {}
