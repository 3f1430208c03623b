//! Error types for morph resolution and codecs.

use datacast_crypto::EncryptorError;
use datacast_model::{ModelError, ValidationErrors};
use datacast_types::TypeName;
use thiserror::Error;

/// Result type for morph operations.
pub type MorphResult<T> = Result<T, MorphError>;

/// Errors raised by the registry, resolver and codecs.
///
/// None of these are retried internally: the same input always fails the
/// same way.
#[derive(Debug, Error)]
pub enum MorphError {
    /// Invalid registry state or a registry call that would create one.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No resolver matched and the payload carries no tag.
    #[error("cannot determine a concrete type for {base}: no resolver matched and no `{tag_key}` tag present")]
    AmbiguousType { base: TypeName, tag_key: String },

    /// Tag (or resolver result) names nothing registered under the base.
    #[error("unknown subtype {tag:?} for {base}")]
    UnknownSubtype { base: TypeName, tag: String },

    /// Payload could not be turned into an instance of the resolved type.
    #[error("cannot hydrate {type_name}{}: {message}", at_path(.path))]
    Hydration {
        type_name: TypeName,
        path: Option<String>,
        message: String,
    },

    /// Instance could not be turned into a payload.
    #[error("cannot extract {type_name}: {message}")]
    Extraction { type_name: TypeName, message: String },

    /// Hydrated instance failed its validation rules.
    #[error("{type_name} failed validation: {errors}")]
    Validation {
        type_name: TypeName,
        errors: ValidationErrors,
    },

    /// Stored ciphertext is malformed or sealed under a foreign key.
    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Declarative settings could not be parsed.
    #[error("invalid morph settings: {0}")]
    Settings(#[from] toml::de::Error),
}

impl MorphError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Prefixes the hydration path, e.g. with a collection index.
    pub(crate) fn within(self, prefix: &str) -> Self {
        match self {
            Self::Hydration {
                type_name,
                path,
                message,
            } => Self::Hydration {
                type_name,
                path: Some(match path {
                    Some(path) => format!("{prefix}.{path}"),
                    None => prefix.to_string(),
                }),
                message,
            },
            other => other,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }

    pub fn is_hydration(&self) -> bool {
        matches!(self, Self::Hydration { .. })
    }
}

fn at_path(path: &Option<String>) -> String {
    path.as_deref().map(|p| format!(" at `{p}`")).unwrap_or_default()
}

impl From<ModelError> for MorphError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Hydration {
                type_name,
                path,
                message,
            } => Self::Hydration {
                type_name: TypeName::new(type_name),
                path,
                message,
            },
            ModelError::Extraction { type_name, message } => Self::Extraction {
                type_name: TypeName::new(type_name),
                message,
            },
            ModelError::Validation { type_name, errors } => Self::Validation {
                type_name: TypeName::new(type_name),
                errors,
            },
        }
    }
}

impl From<EncryptorError> for MorphError {
    fn from(err: EncryptorError) -> Self {
        match err {
            EncryptorError::Decryption(message) => Self::Decryption(message),
            EncryptorError::Encryption(message) => Self::Encryption(message),
        }
    }
}
