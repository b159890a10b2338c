//! Paths and schema locations for one compilation run.
//!
//! Defaults hang off the project root (`registry/`, `build/`, `schemas/`);
//! the CLI overrides individual pieces from flags or environment variables.

use crate::native::NATIVE_SCHEMA_URL;
use crate::official::OFFICIAL_SCHEMA_URL;
use crate::schema_loader::SchemaSource;
use std::path::{Path, PathBuf};

pub const DEFAULT_REGISTRY_DIR: &str = "registry";
pub const DEFAULT_OUTPUT_DIR: &str = "build";
pub const OFFICIAL_SCHEMA_PATH: &str = "schemas/registry.schema.json";
pub const NATIVE_SCHEMA_PATH: &str = "schemas/toolhive-registry.schema.json";
pub const NATIVE_OUTPUT_FILE: &str = "registry.json";
pub const OFFICIAL_OUTPUT_FILE: &str = "official-registry.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Directory holding one subdirectory per entry.
    pub registry_dir: PathBuf,
    /// Directory the catalogs are written into.
    pub output_dir: PathBuf,
    pub native_schema: SchemaSource,
    pub official_schema: SchemaSource,
}

impl RegistryConfig {
    /// Conventional layout under `root`.
    pub fn from_root(root: &Path) -> Self {
        Self {
            registry_dir: root.join(DEFAULT_REGISTRY_DIR),
            output_dir: root.join(DEFAULT_OUTPUT_DIR),
            native_schema: SchemaSource::new(root.join(NATIVE_SCHEMA_PATH), NATIVE_SCHEMA_URL),
            official_schema: SchemaSource::new(
                root.join(OFFICIAL_SCHEMA_PATH),
                OFFICIAL_SCHEMA_URL,
            ),
        }
    }

    pub fn with_registry_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.registry_dir = dir;
        }
        self
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.output_dir = dir;
        }
        self
    }

    pub fn with_official_schema(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.official_schema.local_path = path;
        }
        self
    }

    pub fn with_native_schema(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.native_schema.local_path = path;
        }
        self
    }

    pub fn native_output_path(&self) -> PathBuf {
        self.output_dir.join(NATIVE_OUTPUT_FILE)
    }

    pub fn official_output_path(&self) -> PathBuf {
        self.output_dir.join(OFFICIAL_OUTPUT_FILE)
    }
}
