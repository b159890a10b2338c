//! Discovers `spec.yaml` documents and assembles the validated entry set.
//!
//! The registry directory holds one subdirectory per entry. Only immediate
//! children are considered; hidden and nested directories are never entered.
//! Every candidate is decoded and validated before it joins the set, so the
//! builders can assume a clean input.

use crate::entry::Entry;
use crate::error::{RegistryError, Result};
use crate::validation::validate_entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fixed file name of the authoring document inside each entry directory.
pub const SPEC_FILE_NAME: &str = "spec.yaml";

/// Loads registry entries from a directory tree.
#[derive(Debug)]
pub struct RegistryLoader {
    registry_path: PathBuf,
    entries: BTreeMap<String, Entry>,
    sources: BTreeMap<String, PathBuf>,
}

impl RegistryLoader {
    pub fn new(registry_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.into(),
            entries: BTreeMap::new(),
            sources: BTreeMap::new(),
        }
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    /// Load every entry directly under the registry directory.
    ///
    /// Fails on the first unreadable, undecodable or invalid spec. A resolved
    /// name that collides with an earlier entry replaces it; the collision is
    /// logged.
    pub fn load_all(&mut self) -> Result<()> {
        for dir in self.candidate_dirs()? {
            let spec_path = dir.join(SPEC_FILE_NAME);
            if !spec_path.is_file() {
                continue;
            }
            let Some(dir_name) = dir.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            let mut entry = self
                .load_entry_with_name(&spec_path, dir_name)
                .map_err(|err| RegistryError::Load {
                    path: spec_path.clone(),
                    source: Box::new(err),
                })?;

            let declared = entry.name();
            let name = if !declared.is_empty() && declared != dir_name {
                declared.to_string()
            } else {
                entry.set_name(dir_name);
                dir_name.to_string()
            };

            debug!(entry = %name, kind = entry.kind(), path = %spec_path.display(), "loaded entry");
            self.store(name, entry, spec_path);
        }
        Ok(())
    }

    /// Decode one spec file without validating it.
    pub fn load_entry(&self, path: &Path) -> Result<Entry> {
        let data = fs::read(path).map_err(|err| RegistryError::io(path, err))?;
        Entry::from_yaml_slice(&data)
    }

    /// Decode one spec file and validate it under `name`.
    ///
    /// An explicit non-empty `name:` in the document takes precedence over
    /// `name` for validation, matching how `load_all` resolves keys.
    pub fn load_entry_with_name(&self, path: &Path, name: &str) -> Result<Entry> {
        let entry = self.load_entry(path)?;
        let resolved = if entry.name().is_empty() {
            name
        } else {
            entry.name()
        };
        validate_entry(&entry, resolved)?;
        Ok(entry)
    }

    /// Add an already-decoded entry under `name`.
    pub fn insert(&mut self, name: impl Into<String>, mut entry: Entry) {
        let name = name.into();
        if entry.name().is_empty() {
            entry.set_name(name.clone());
        }
        self.store(name, entry, self.registry_path.clone());
    }

    fn store(&mut self, name: String, entry: Entry, source: PathBuf) {
        if let Some(previous) = self.sources.insert(name.clone(), source.clone()) {
            warn!(
                entry = %name,
                previous = %previous.display(),
                replacement = %source.display(),
                "duplicate entry name; later entry replaces earlier one"
            );
        }
        self.entries.insert(name, entry);
    }

    /// All loaded entries keyed by canonical name.
    pub fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }

    /// Entries in ascending canonical-name order.
    pub fn sorted_entries(&self) -> Vec<(&str, &Entry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Immediate, non-hidden subdirectories in lexical order.
    fn candidate_dirs(&self) -> Result<Vec<PathBuf>> {
        let root = &self.registry_path;
        let read_dir = fs::read_dir(root).map_err(|err| RegistryError::io(root, err))?;
        let mut dirs = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|err| RegistryError::io(root, err))?;
            let path = dir_entry.path();
            if !path.is_dir() {
                continue;
            }
            let hidden = dir_entry
                .file_name()
                .to_str()
                .map(|name| name.starts_with('.'))
                .unwrap_or(true);
            if hidden {
                continue;
            }
            dirs.push(path);
        }
        dirs.sort();
        Ok(dirs)
    }
}
