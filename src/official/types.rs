//! Serde model of the MCP registry server format.
//!
//! Only the subset this registry emits is modelled. Optional fields are
//! skipped when empty so the output stays close to what upstream tooling
//! writes itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PUBLISHER_PROVIDED_KEY: &str = "io.modelcontextprotocol.registry/publisher-provided";
pub const OFFICIAL_KEY: &str = "io.modelcontextprotocol.registry/official";

fn is_false(value: &bool) -> bool {
    !*value
}

/// Top-level standards catalog document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfficialRegistry {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub meta: RegistryMeta,
    pub data: RegistryData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryMeta {
    /// RFC 3339 build time.
    pub last_updated: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryData {
    pub servers: Vec<ServerJson>,
    pub groups: Vec<Group>,
}

/// Reserved; always emitted as an empty list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Active,
    Deprecated,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerJson {
    pub name: String,
    pub description: String,
    pub status: ServerStatus,
    pub repository: Repository,
    pub version_detail: VersionDetail,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<Package>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<Remote>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ServerMeta>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDetail {
    pub version: String,
}

/// Installable package; this registry only emits OCI images.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub registry_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub registry_base_url: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<KeyValueInput>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub transport_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<KeyValueInput>,
}

/// Named user input (environment variable or header).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_secret: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerMeta {
    #[serde(
        rename = "io.modelcontextprotocol.registry/publisher-provided",
        default,
        skip_serializing_if = "Map::is_empty"
    )]
    pub publisher_provided: Map<String, Value>,
    #[serde(
        rename = "io.modelcontextprotocol.registry/official",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub official: Option<RegistryExtensions>,
}

/// Registry-managed metadata. Generated on every build, never read back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryExtensions {
    pub id: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_latest: bool,
    pub release_date: String,
}
