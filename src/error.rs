//! Error type shared by the decoder, validators, loader and builders.
//!
//! Every kind is fatal to the compilation run that hits it. The one locally
//! recovered case (an image reference the standards builder cannot split) is
//! handled inside that builder and never surfaces here.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed authoring document or a missing/conflicting variant key.
    #[error("decode error: {0}")]
    Decode(String),

    /// A single entry broke a field or vocabulary rule.
    #[error("entry '{entry}' field '{field}': {message}")]
    Validation {
        entry: String,
        field: String,
        message: String,
    },

    /// A built catalog failed its JSON Schema; every violation is listed.
    #[error("catalog failed schema validation:\n{}", .errors.join("\n"))]
    CatalogValidation { errors: Vec<String> },

    #[error("unsupported image reference '{reference}': {reason}")]
    UnsupportedReference { reference: String, reason: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure while loading one spec file; wraps the underlying kind.
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<RegistryError>,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to load schema {location}: {message}")]
    Schema { location: String, message: String },
}

impl RegistryError {
    pub(crate) fn validation(
        entry: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::Validation {
            entry: entry.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::Io {
            path: path.into(),
            source,
        }
    }
}
