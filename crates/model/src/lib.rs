//! Provider-independent types for prompting generative-text APIs.
//!
//! This crate describes what a completion call looks like (requests,
//! grounded answers, citations, errors) and the two collaborators every
//! client needs: a [`CredentialProvider`] for the API key and a
//! [`Transport`] for the HTTP round trip.
//!
//! Apart from rendering a [`GroundedAnswer`], types in this crate don't
//! define any behavior. Concrete clients live in their own crates.

#![deny(missing_docs)]

mod answer;
mod credential;
mod error;
mod request;
mod transport;

pub use answer::*;
pub use credential::*;
pub use error::*;
pub use request::*;
pub use transport::*;
