use std::fmt::{self, Debug, Formatter};

use crate::error::Error;

/// A source of API keys.
///
/// Clients ask for the key right before each call. A provider that
/// cannot supply one returns [`ErrorKind::Credential`], and the call
/// fails without touching the network.
///
/// [`ErrorKind::Credential`]: crate::ErrorKind::Credential
pub trait CredentialProvider: Send + Sync {
    /// Returns the API key.
    fn api_key(&self) -> Result<String, Error>;
}

/// A provider that always returns the same key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StaticCredential(String);

impl StaticCredential {
    /// Creates a provider for the given key.
    #[inline]
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self(api_key.into())
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Result<String, Error> {
        if self.0.is_empty() {
            return Err(Error::credential().with_reason("empty API key"));
        }
        Ok(self.0.clone())
    }
}

impl Debug for StaticCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticCredential")
            .field(&"<deducted>")
            .finish()
    }
}
