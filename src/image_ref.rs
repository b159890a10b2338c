//! Container image reference decomposition.
//!
//! Splits references like `ghcr.io/org/server:v1.2` into the registry base
//! URL, repository identifier, and version used by package descriptors in the
//! standards catalog. Registries with an explicit port are rejected instead
//! of being mis-split on the port colon.

use crate::error::{RegistryError, Result};

/// Registry assumed when the reference names none.
pub const DEFAULT_REGISTRY_URL: &str = "https://docker.io";

/// Version assumed when the reference has neither tag nor digest.
pub const DEFAULT_VERSION: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry base URL with scheme, e.g. `https://ghcr.io`.
    pub registry_base_url: String,
    /// Repository path inside the registry, e.g. `mcp/git`.
    pub identifier: String,
    /// Tag or digest; `latest` when neither is present.
    pub version: String,
}

/// Parse an image reference string.
///
/// - `mcp/git` → `https://docker.io`, `mcp/git`, `latest`
/// - `ghcr.io/org/img:v1` → `https://ghcr.io`, `org/img`, `v1`
/// - `img@sha256:abc` → `https://docker.io`, `img`, `sha256:abc`
/// - `localhost:5000/img` → error
pub fn parse_image_reference(reference: &str) -> Result<ImageReference> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(unsupported(reference, "empty image reference"));
    }

    if let Some((first, _)) = trimmed.split_once('/') {
        if first.contains(':') {
            return Err(unsupported(
                reference,
                &format!("registry with port not supported: {first}"),
            ));
        }
    }

    let (path, version) = match trimmed.split_once('@') {
        Some((path, digest)) => (path, digest.to_string()),
        None => split_tag(trimmed),
    };

    if path.is_empty() {
        return Err(unsupported(reference, "missing image name"));
    }

    let (registry_base_url, identifier) = split_registry(path);
    Ok(ImageReference {
        registry_base_url,
        identifier,
        version,
    })
}

/// Tag colon only counts after the last path separator.
fn split_tag(reference: &str) -> (&str, String) {
    let name_start = reference.rfind('/').map(|idx| idx + 1).unwrap_or(0);
    match reference[name_start..].rfind(':') {
        Some(colon) => {
            let split = name_start + colon;
            (&reference[..split], reference[split + 1..].to_string())
        }
        None => (reference, DEFAULT_VERSION.to_string()),
    }
}

fn split_registry(path: &str) -> (String, String) {
    match path.split_once('/') {
        Some((first, rest)) if first.contains('.') => (format!("https://{first}"), rest.to_string()),
        _ => (DEFAULT_REGISTRY_URL.to_string(), path.to_string()),
    }
}

fn unsupported(reference: &str, reason: &str) -> RegistryError {
    RegistryError::UnsupportedReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}
