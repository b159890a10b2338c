//! Standards catalog builder (MCP registry server format).
//!
//! Every entry becomes one `ServerJson`, sorted by name. Image entries get a
//! single OCI package whose coordinates come from [`parse_image_reference`];
//! remote entries get a single remote endpoint. ToolHive-specific data rides
//! along in the publisher-provided `_meta` block keyed by the image reference
//! or URL, and a registry-managed block with fresh ids and timestamps is
//! attached on every build.

pub mod types;

pub use types::{
    Group, KeyValueInput, OFFICIAL_KEY, OfficialRegistry, PUBLISHER_PROVIDED_KEY, Package,
    RegistryData, RegistryExtensions, RegistryMeta, Remote, Repository, ServerJson, ServerMeta,
    ServerStatus, VersionDetail,
};

use crate::entry::{Entry, ImageMetadata, RemoteServerMetadata, ServerEntry, Status};
use crate::error::Result;
use crate::image_ref::parse_image_reference;
use crate::loader::RegistryLoader;
use crate::output::write_pretty_json;
use crate::schema_loader::SchemaSource;
use crate::validation::{validate_catalog, validate_entry};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

pub const OFFICIAL_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/stacklok/toolhive-registry/main/schemas/registry.schema.json";
pub const OFFICIAL_REGISTRY_VERSION: &str = "1.0.0";
/// Version reported for every server; per-server history is not tracked.
pub const SERVER_VERSION: &str = "1.0.0";
/// Repository reported for remote servers that declare none.
pub const PLACEHOLDER_REPOSITORY_URL: &str = "https://github.com/stacklok/toolhive-registry";
pub const REPOSITORY_SOURCE: &str = "github";
pub const OCI_REGISTRY_TYPE: &str = "oci";
/// Namespace inside the publisher-provided block.
pub const TOOLHIVE_EXTENSION_KEY: &str = "toolhive";

pub struct OfficialRegistryBuilder<'a> {
    loader: &'a RegistryLoader,
}

impl<'a> OfficialRegistryBuilder<'a> {
    pub fn new(loader: &'a RegistryLoader) -> Self {
        Self { loader }
    }

    /// Re-run per-entry validation over the whole loaded set.
    pub fn validate_entries(&self) -> Result<()> {
        for (name, entry) in self.loader.sorted_entries() {
            validate_entry(entry, name)?;
        }
        Ok(())
    }

    pub fn build(&self) -> Result<OfficialRegistry> {
        self.build_at(Utc::now())
    }

    pub fn build_at(&self, now: DateTime<Utc>) -> Result<OfficialRegistry> {
        let servers = self
            .loader
            .sorted_entries()
            .into_iter()
            .map(|(name, entry)| transform_entry(name, entry, now))
            .collect::<Result<Vec<_>>>()?;

        Ok(OfficialRegistry {
            schema: OFFICIAL_SCHEMA_URL.to_string(),
            version: OFFICIAL_REGISTRY_VERSION.to_string(),
            meta: RegistryMeta {
                last_updated: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            data: RegistryData {
                servers,
                groups: Vec::new(),
            },
        })
    }

    /// Build and check the catalog against the standards schema.
    pub fn validate_against_schema(&self, schema: &SchemaSource) -> Result<OfficialRegistry> {
        let registry = self.build()?;
        validate_catalog(&registry, schema)?;
        Ok(registry)
    }

    /// Validate entries, build, validate the catalog, then write it.
    pub fn write_json(&self, path: &Path, schema: &SchemaSource) -> Result<OfficialRegistry> {
        self.validate_entries()?;
        let registry = self.validate_against_schema(schema)?;
        write_pretty_json(path, &registry)?;
        info!(
            path = %path.display(),
            servers = registry.data.servers.len(),
            "wrote official registry"
        );
        Ok(registry)
    }
}

fn transform_entry(name: &str, entry: &Entry, now: DateTime<Utc>) -> Result<ServerJson> {
    let (packages, remotes) = match &entry.server {
        ServerEntry::Image(image) => (vec![create_package(image)], Vec::new()),
        ServerEntry::Remote(remote) => (Vec::new(), vec![create_remote(remote)]),
    };

    Ok(ServerJson {
        name: name.to_string(),
        description: entry.description().to_string(),
        status: convert_status(entry.base().status.as_ref()),
        repository: create_repository(entry),
        version_detail: VersionDetail {
            version: SERVER_VERSION.to_string(),
        },
        packages,
        remotes,
        meta: Some(ServerMeta {
            publisher_provided: create_publisher_extensions(entry)?,
            official: Some(create_registry_extensions(now)),
        }),
    })
}

fn convert_status(status: Option<&Status>) -> ServerStatus {
    match status {
        Some(Status::Deprecated) => ServerStatus::Deprecated,
        _ => ServerStatus::Active,
    }
}

fn create_repository(entry: &Entry) -> Repository {
    let declared = entry.base().repository_url.trim();
    let url = if !declared.is_empty() {
        declared
    } else if entry.is_remote() {
        PLACEHOLDER_REPOSITORY_URL
    } else {
        return Repository::default();
    };
    Repository {
        url: url.to_string(),
        source: REPOSITORY_SOURCE.to_string(),
        id: String::new(),
    }
}

fn create_package(image: &ImageMetadata) -> Package {
    let environment_variables = image
        .env_vars
        .iter()
        .map(|env| KeyValueInput {
            name: env.name.clone(),
            description: env.description.clone(),
            is_required: env.required,
            is_secret: env.secret,
            default: env.default.clone(),
        })
        .collect();

    let (registry_base_url, identifier, version) = match parse_image_reference(&image.image) {
        Ok(parsed) => (parsed.registry_base_url, parsed.identifier, parsed.version),
        Err(err) => {
            warn!(image = %image.image, error = %err, "falling back to raw image reference");
            (String::new(), image.image.clone(), String::new())
        }
    };

    Package {
        registry_type: OCI_REGISTRY_TYPE.to_string(),
        registry_base_url,
        identifier,
        version,
        environment_variables,
    }
}

fn create_remote(remote: &RemoteServerMetadata) -> Remote {
    let headers = remote
        .headers
        .iter()
        .map(|header| KeyValueInput {
            name: header.name.clone(),
            description: header.description.clone(),
            is_required: header.required,
            is_secret: header.secret,
            default: None,
        })
        .collect();

    Remote {
        transport_type: remote
            .base
            .transport
            .as_ref()
            .map(|transport| transport.as_str().to_string())
            .unwrap_or_default(),
        url: remote.url.clone(),
        headers,
    }
}

fn create_registry_extensions(now: DateTime<Utc>) -> RegistryExtensions {
    RegistryExtensions {
        id: Uuid::new_v4().to_string(),
        published_at: now,
        updated_at: now,
        is_latest: true,
        release_date: now.format("%Y-%m-%d").to_string(),
    }
}

/// `{"toolhive": {<image-or-url>: {...}}}`
fn create_publisher_extensions(entry: &Entry) -> Result<Map<String, Value>> {
    let mut by_locator = Map::new();
    by_locator.insert(
        entry.locator().to_string(),
        Value::Object(create_toolhive_extensions(entry)?),
    );
    let mut publisher = Map::new();
    publisher.insert(TOOLHIVE_EXTENSION_KEY.to_string(), Value::Object(by_locator));
    Ok(publisher)
}

fn create_toolhive_extensions(entry: &Entry) -> Result<Map<String, Value>> {
    let mut ext = Extensions::default();
    let base = entry.base();

    ext.put(
        "transport",
        base.transport.as_ref().map(|t| t.as_str()).unwrap_or_default(),
    )?;
    if !base.tools.is_empty() {
        ext.put("tools", &base.tools)?;
    }
    ext.put("tier", &entry.tier())?;
    if !base.tags.is_empty() {
        ext.put("tags", &base.tags)?;
    }
    if let Some(metadata) = &base.metadata {
        ext.put("metadata", metadata)?;
    }

    match &entry.server {
        ServerEntry::Image(image) => {
            if let Some(permissions) = &image.permissions {
                ext.put("permissions", permissions)?;
            }
            if !image.args.is_empty() {
                ext.put("args", &image.args)?;
            }
            if let Some(provenance) = &image.provenance {
                ext.put("provenance", provenance)?;
            }
        }
        ServerEntry::Remote(remote) => {
            if let Some(oauth) = &remote.oauth_config {
                ext.put("oauth_config", oauth)?;
            }
            if !remote.custom_metadata.is_empty() {
                ext.put("custom_metadata", &remote.custom_metadata)?;
            }
        }
    }

    if !entry.examples.is_empty() {
        ext.put("examples", &entry.examples)?;
    }
    if let Some(license) = &entry.license {
        ext.put("license", license)?;
    }

    Ok(ext.0)
}

#[derive(Default)]
struct Extensions(Map<String, Value>);

impl Extensions {
    fn put<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        self.0.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }
}
