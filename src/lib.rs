//! Registry compiler for MCP server descriptors.
//!
//! The crate turns a directory of `spec.yaml` documents into the two catalog
//! formats consumed downstream: the native ToolHive registry (`registry.json`)
//! and the MCP registry server format (`official-registry.json`). The flow is
//! load (decode + validate each entry), build, schema-validate, write. The
//! `thv run` argument builder lives alongside and works on single entries.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod command;
pub mod config;
pub mod entry;
pub mod error;
pub mod image_ref;
pub mod loader;
pub mod native;
pub mod official;
mod output;
pub mod schema_loader;
pub mod validation;

pub use command::{CommandBuilder, PLACEHOLDER_VALUE, build_run_command};
pub use config::RegistryConfig;
pub use entry::{
    BaseServerMetadata, Entry, EnvVar, Example, Header, ImageMetadata, OAuthConfig,
    PermissionProfile, RemoteServerMetadata, ServerEntry, Status, Tier, Transport, decode_entry,
};
pub use error::{RegistryError, Result};
pub use image_ref::{ImageReference, parse_image_reference};
pub use loader::{RegistryLoader, SPEC_FILE_NAME};
pub use native::{NativeCatalog, NativeCatalogBuilder};
pub use official::{OfficialRegistry, OfficialRegistryBuilder};
pub use schema_loader::{CompiledSchema, SchemaSource, load_json_schema};
pub use validation::{validate_catalog, validate_catalog_value, validate_entry};

/// Environment variable pointing at the project root.
pub const ROOT_ENV: &str = "TOOLHIVE_REGISTRY_ROOT";

/// Returns true when `candidate` has the schema directory and registry tree.
fn is_project_root(candidate: &Path) -> bool {
    candidate.join(config::OFFICIAL_SCHEMA_PATH).is_file()
        && candidate.join(config::DEFAULT_REGISTRY_DIR).is_dir()
}

fn root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_project_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_project_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the project root.
///
/// Honors `TOOLHIVE_REGISTRY_ROOT` when it points at a real checkout, then
/// climbs up from the current directory, then tries the crate's own manifest
/// directory. Returns `None` when nothing matches; callers fall back to the
/// current directory.
pub fn find_project_root() -> Option<PathBuf> {
    if let Ok(hint) = env::var(ROOT_ENV) {
        if let Some(root) = root_from_hint(&hint) {
            return Some(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Some(root);
        }
    }

    root_from_hint(env!("CARGO_MANIFEST_DIR"))
}
