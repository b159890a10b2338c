//! Native (ToolHive) catalog builder.
//!
//! Produces `registry.json`: two name-keyed maps, one for image-backed and one
//! for remote-backed servers. The map key is the canonical name, so records
//! carry no `name` of their own. Tier and status defaults are filled in and
//! every list field is emitted, empty or not, so repeated builds diff cleanly.

use crate::entry::{ImageMetadata, RemoteServerMetadata, ServerEntry, Status, Tier};
use crate::error::Result;
use crate::loader::RegistryLoader;
use crate::output::write_pretty_json;
use crate::schema_loader::SchemaSource;
use crate::validation::validate_catalog;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const NATIVE_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/stacklok/toolhive/main/pkg/registry/data/schema.json";
pub const NATIVE_REGISTRY_VERSION: &str = "1.0.0";

/// The native catalog document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NativeCatalog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub last_updated: String,
    pub servers: BTreeMap<String, ImageMetadata>,
    #[serde(default)]
    pub remote_servers: BTreeMap<String, RemoteServerMetadata>,
}

pub struct NativeCatalogBuilder<'a> {
    loader: &'a RegistryLoader,
}

impl<'a> NativeCatalogBuilder<'a> {
    pub fn new(loader: &'a RegistryLoader) -> Self {
        Self { loader }
    }

    /// Build the catalog stamped with the current time.
    pub fn build(&self) -> NativeCatalog {
        self.build_at(Utc::now())
    }

    /// Build the catalog stamped with `timestamp`.
    pub fn build_at(&self, timestamp: DateTime<Utc>) -> NativeCatalog {
        let mut servers = BTreeMap::new();
        let mut remote_servers = BTreeMap::new();

        for (name, entry) in self.loader.sorted_entries() {
            match &entry.server {
                ServerEntry::Image(image) => {
                    servers.insert(name.to_string(), normalize_image(image));
                }
                ServerEntry::Remote(remote) => {
                    remote_servers.insert(name.to_string(), normalize_remote(remote));
                }
            }
        }

        NativeCatalog {
            schema: NATIVE_SCHEMA_URL.to_string(),
            version: NATIVE_REGISTRY_VERSION.to_string(),
            last_updated: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            servers,
            remote_servers,
        }
    }

    /// Build and check the catalog against the native schema.
    pub fn validate_against_schema(&self, schema: &SchemaSource) -> Result<NativeCatalog> {
        let catalog = self.build();
        validate_catalog(&catalog, schema)?;
        Ok(catalog)
    }

    /// Build, validate, and write the catalog as pretty JSON.
    pub fn write_json(&self, path: &Path, schema: &SchemaSource) -> Result<NativeCatalog> {
        let catalog = self.validate_against_schema(schema)?;
        write_pretty_json(path, &catalog)?;
        info!(
            path = %path.display(),
            servers = catalog.servers.len(),
            remote_servers = catalog.remote_servers.len(),
            "wrote native registry"
        );
        Ok(catalog)
    }
}

fn normalize_image(image: &ImageMetadata) -> ImageMetadata {
    let mut result = image.clone();
    result.base.name.clear();
    result.base.tier.get_or_insert(Tier::Community);
    result.base.status.get_or_insert(Status::Active);
    result
}

fn normalize_remote(remote: &RemoteServerMetadata) -> RemoteServerMetadata {
    let mut result = remote.clone();
    result.base.name.clear();
    result.base.tier.get_or_insert(Tier::Community);
    result.base.status.get_or_insert(Status::Active);
    result
}
