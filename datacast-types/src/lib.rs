//! Core type definitions for datacast.
//!
//! This crate defines the plain types every other datacast crate shares:
//! - Type names, morph aliases and row identifiers
//! - The [`Payload`] mapping that Data objects serialize to
//!
//! Behaviour (registration, resolution, hydration) lives in `datacast-morph`.

mod ids;
mod payload;

pub use ids::{Alias, RowId, TypeName};
pub use payload::{DEFAULT_TAG_KEY, Payload, into_payload, json_kind};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}
