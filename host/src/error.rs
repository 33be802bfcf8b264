//! Errors that make a session impossible to start.
//!
//! Content provider failures never show up here: they are recovered by the
//! initializer with the fallback list and placeholder images.
use pairmatch::DeckError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionInitError {
    #[error("the content provider failed and the fallback character list cannot be used")]
    FallbackUnusable(#[source] DeckError),
}
