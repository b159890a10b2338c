//! Typed records for one registry entry.
//!
//! Field names follow the ToolHive registry JSON so the same structs serve the
//! authoring YAML (decode) and the native catalog (encode). List fields always
//! serialize, even when empty, so the native output never mixes absent and
//! empty values.

use crate::entry::identity::{Status, Tier, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Fields shared by image-backed and remote-backed servers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseServerMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Popularity statistics gathered for a server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub pulls: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_updated: String,
}

/// Container-image-backed server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(flatten)]
    pub base: BaseServerMetadata,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionProfile>,
    #[serde(default)]
    pub env_vars: Vec<EnvVar>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub docker_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

/// Remote-URL-backed server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteServerMetadata {
    #[serde(flatten)]
    pub base: BaseServerMetadata,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_config: Option<OAuthConfig>,
    #[serde(default)]
    pub env_vars: Vec<EnvVar>,
    /// Allow-listed free-form authoring keys (homepage, license, author).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_metadata: BTreeMap<String, Value>,
}

/// Environment variable a server reads at start-up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub secret: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// HTTP header a remote server expects from clients.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub secret: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

/// OAuth client configuration for a remote server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issuer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub authorize_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub use_pkce: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub oauth_params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_port: Option<u16>,
}

/// Filesystem and network permissions requested by an image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionProfile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkPermissions>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPermissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound: Option<OutboundNetwork>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundNetwork {
    #[serde(default)]
    pub insecure_allow_all: bool,
    #[serde(default)]
    pub allow_host: Vec<String>,
    #[serde(default)]
    pub allow_port: Vec<u16>,
}

/// Supply-chain provenance for an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sigstore_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository_uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository_ref: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signer_identity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub runner_environment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert_issuer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<Attestation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    pub predicate_type: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub predicate: Value,
}

/// Usage example attached to an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sample: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_lists_serialize_as_arrays() {
        let image = ImageMetadata {
            image: "mcp/fetch".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&image).unwrap();
        assert_eq!(value["tools"], json!([]));
        assert_eq!(value["tags"], json!([]));
        assert_eq!(value["env_vars"], json!([]));
        assert_eq!(value["args"], json!([]));
        assert!(value.get("name").is_none(), "empty name is omitted");
        assert!(value.get("permissions").is_none());
    }

    #[test]
    fn flattened_base_reads_from_top_level() {
        let image: ImageMetadata = serde_yaml::from_str(
            "name: fetch\ndescription: Fetches URLs\ntransport: stdio\nimage: mcp/fetch:latest\ntools: [fetch]\n",
        )
        .unwrap();
        assert_eq!(image.base.name, "fetch");
        assert_eq!(image.base.transport, Some(Transport::Stdio));
        assert_eq!(image.base.tools, vec!["fetch".to_string()]);
        assert_eq!(image.image, "mcp/fetch:latest");
    }
}
