//! Shared JSON Schema loader for whole-catalog validation.
//!
//! Both catalog writers validate their serialized output before it touches
//! disk. The schema comes from a local file when one exists and from a fixed
//! remote URL otherwise; either way it is compiled once and every violation is
//! reported, not just the first.

use crate::error::{RegistryError, Result};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a schema document lives: a preferred local path and a remote fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaSource {
    pub local_path: PathBuf,
    pub remote_url: String,
}

impl SchemaSource {
    pub fn new(local_path: impl Into<PathBuf>, remote_url: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_url: remote_url.into(),
        }
    }

    /// Human-readable location that will actually be read.
    pub fn location(&self) -> String {
        if self.local_path.is_file() {
            self.local_path.display().to_string()
        } else {
            self.remote_url.clone()
        }
    }
}

/// A compiled schema plus the raw document it came from.
pub struct CompiledSchema {
    pub location: String,
    pub compiled: JSONSchema,
    pub raw: Value,
}

impl CompiledSchema {
    /// Validate `instance`, collecting every violation as `pointer: message`.
    pub fn violations(&self, instance: &Value) -> Vec<String> {
        match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| {
                    let pointer = err.instance_path.to_string();
                    let pointer = if pointer.is_empty() { "/".to_string() } else { pointer };
                    format!("{pointer}: {err}")
                })
                .collect(),
        }
    }

    /// Validate `instance`, folding all violations into one error.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        let errors = self.violations(instance);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::CatalogValidation { errors })
        }
    }
}

/// Load and compile the schema named by `source`.
pub fn load_json_schema(source: &SchemaSource) -> Result<CompiledSchema> {
    let (location, raw) = if source.local_path.is_file() {
        let location = source.local_path.display().to_string();
        (location, read_local_schema(&source.local_path)?)
    } else {
        debug!(
            local = %source.local_path.display(),
            remote = %source.remote_url,
            "local schema missing, fetching remote copy"
        );
        (source.remote_url.clone(), fetch_remote_schema(&source.remote_url)?)
    };
    compile_schema(location, raw)
}

/// Compile an already-parsed schema document.
pub fn compile_schema(location: impl Into<String>, raw: Value) -> Result<CompiledSchema> {
    let location = location.into();
    let compiled = JSONSchema::compile(&raw).map_err(|err| RegistryError::Schema {
        location: location.clone(),
        message: format!("compiling schema: {err}"),
    })?;
    Ok(CompiledSchema {
        location,
        compiled,
        raw,
    })
}

fn read_local_schema(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|err| RegistryError::io(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| RegistryError::Schema {
        location: path.display().to_string(),
        message: format!("parsing schema: {err}"),
    })
}

fn fetch_remote_schema(url: &str) -> Result<Value> {
    let schema_error = |message: String| RegistryError::Schema {
        location: url.to_string(),
        message,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .map_err(|err| schema_error(format!("fetching schema: {err}")))?;
    let body = response
        .text()
        .map_err(|err| schema_error(format!("reading schema body: {err}")))?;
    serde_json::from_str(&body).map_err(|err| schema_error(format!("parsing schema: {err}")))
}
