//! Error types for `did-viewer`.
use serde_json::Error as SerdeJSONError;
use thiserror::Error;

/// Error type for DID resolution through a remote resolver.
///
/// A resolution failure never invalidates previously displayed data; the
/// [popover](crate::popover::Popover) reports it through its error hook and
/// returns to the closed state.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolutionError {
    /// Empty DID input
    #[error("DID may not be empty")]
    EmptyDid,
    /// Missing `@context` in a DID document
    #[error("Missing context")]
    MissingContext,
    /// Unrecognized first `@context` value in a DID document
    #[error("Invalid context")]
    InvalidContext,
    /// Missing document ID
    #[error("Missing document ID")]
    MissingDocumentId,
    /// DID or resource not found
    #[error("Not found")]
    NotFound,
    /// Unable to resolve DID
    #[error("Unable to resolve: {0}")]
    UnableToResolve(String),
    /// Error from `serde_json` crate
    #[error(transparent)]
    SerdeJSON(#[from] SerdeJSONError),
    /// Error from `reqwest` crate
    #[cfg(feature = "http")]
    #[error(transparent)]
    HTTP(#[from] reqwest::Error),
}

/// Error type for projecting or rendering a resolved DID document.
///
/// Contained at the component boundary by
/// [`render_contained`](crate::view::render_contained); must not reach the
/// embedding application.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    /// Resolution result contains no DID document
    #[error("Missing DID document")]
    MissingDocument,
    /// Malformed linked resource entry
    #[error("Malformed linked resource: {0}")]
    MalformedResource(String),
    /// Error raised by an embedding application's renderer
    #[error("Renderer error: {0}")]
    Renderer(String),
}

impl From<ResolutionError> for String {
    fn from(err: ResolutionError) -> String {
        err.to_string()
    }
}
