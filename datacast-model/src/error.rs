//! Error types for Data objects.

use crate::validate::ValidationErrors;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while hydrating, extracting or validating a Data object.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Payload could not be turned into an instance.
    ///
    /// `path` is the dotted location of the offending value
    /// (`anchor.y`, `points[2].x`), `None` when the payload as a whole is at
    /// fault.
    #[error("cannot hydrate {type_name}{}: {message}", at_path(.path))]
    Hydration {
        type_name: String,
        path: Option<String>,
        message: String,
    },

    /// Instance did not serialize to a mapping.
    #[error("cannot extract {type_name}: {message}")]
    Extraction { type_name: String, message: String },

    /// Instance failed its validation rules.
    #[error("{type_name} failed validation: {errors}")]
    Validation {
        type_name: String,
        errors: ValidationErrors,
    },
}

impl ModelError {
    /// Wraps a path-tracked serde error.
    ///
    /// serde reports a missing field from the enclosing struct, so the
    /// tracked path stops one level short and the field named in the message
    /// is appended to it.
    pub fn hydration(type_name: &str, err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let tracked = (err.path().iter().next().is_some()).then(|| err.path().to_string());
        let message = err.into_inner().to_string();
        let path = match (tracked, named_field(&message)) {
            (Some(parent), Some(NamedField::Missing(field))) => Some(format!("{parent}.{field}")),
            (Some(parent), Some(NamedField::Unknown(field)))
                if parent != field && !parent.ends_with(&format!(".{field}")) =>
            {
                Some(format!("{parent}.{field}"))
            }
            (Some(parent), _) => Some(parent),
            (None, field) => field.map(NamedField::into_name),
        };
        Self::Hydration {
            type_name: type_name.to_string(),
            path,
            message,
        }
    }
}

fn at_path(path: &Option<String>) -> String {
    path.as_deref().map(|p| format!(" at `{p}`")).unwrap_or_default()
}

enum NamedField {
    Missing(String),
    Unknown(String),
}

impl NamedField {
    fn into_name(self) -> String {
        match self {
            Self::Missing(name) | Self::Unknown(name) => name,
        }
    }
}

/// serde names the field in messages like "missing field `radius`".
fn named_field(message: &str) -> Option<NamedField> {
    let quoted = |marker: &str| -> Option<String> {
        let start = message.find(marker)? + marker.len();
        let len = message[start..].find('`')?;
        Some(message[start..start + len].to_string())
    };
    quoted("missing field `")
        .map(NamedField::Missing)
        .or_else(|| quoted("unknown field `").map(NamedField::Unknown))
}
