//! Catalog file emission shared by both builders.

use crate::error::{RegistryError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Create parent directories and write `value` as indented JSON.
pub(crate) fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|err| RegistryError::io(dir, err))?;
    }
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    fs::write(path, data).map_err(|err| RegistryError::io(path, err))
}
