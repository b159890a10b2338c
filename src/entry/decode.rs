//! Two-pass decoder for `spec.yaml` documents.
//!
//! Pass one decodes the strict variant record (image or remote) chosen by key
//! presence. Pass two decodes a permissive overlay against the same mapping
//! and merges it in. Keeping the passes separate means an overlay problem can
//! never hide a missing required field of the variant, and documents that omit
//! every overlay key decode exactly like the bare variant.

use crate::entry::identity::{Status, Tier, Transport, blank_to_none};
use crate::entry::model::{
    BaseServerMetadata, EnvVar, Example, Header, ImageMetadata, OAuthConfig, RemoteServerMetadata,
};
use crate::entry::{Entry, ServerEntry};
use crate::error::{RegistryError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Free-form keys copied into a remote entry's `custom_metadata`.
pub const CUSTOM_METADATA_KEYS: &[&str] = &["homepage", "license", "author"];

const IMAGE_KEY: &str = "image";
const URL_KEY: &str = "url";

/// Authoring-only fields that sit alongside either variant.
#[derive(Debug, Default, Deserialize)]
struct EntryExtensions {
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    oauth: Option<SimplifiedOAuth>,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    env_vars: Vec<EnvVar>,
}

/// Flat OAuth block as authors write it; `use_pkce` stays tri-state so an
/// omitted flag can default to true.
#[derive(Debug, Default, Deserialize)]
struct SimplifiedOAuth {
    #[serde(default)]
    issuer: String,
    #[serde(default)]
    authorize_url: String,
    #[serde(default)]
    token_url: String,
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    scopes: Vec<String>,
    #[serde(default)]
    use_pkce: Option<bool>,
    #[serde(default)]
    oauth_params: BTreeMap<String, String>,
    #[serde(default)]
    callback_port: Option<u16>,
}

impl SimplifiedOAuth {
    fn expand(self) -> OAuthConfig {
        OAuthConfig {
            issuer: self.issuer,
            authorize_url: self.authorize_url,
            token_url: self.token_url,
            client_id: self.client_id,
            scopes: self.scopes,
            use_pkce: self.use_pkce.unwrap_or(true),
            oauth_params: self.oauth_params,
            callback_port: self.callback_port,
        }
    }
}

/// Decode one authoring document into an [`Entry`].
///
/// The document must carry exactly one of `image` or `url`.
pub fn decode_entry(document: &Mapping) -> Result<Entry> {
    let has_image = document.contains_key(IMAGE_KEY);
    let has_url = document.contains_key(URL_KEY);

    let server = match (has_image, has_url) {
        (true, true) => {
            return Err(RegistryError::Decode(
                "entry cannot have both 'image' and 'url' fields".to_string(),
            ));
        }
        (false, false) => {
            return Err(RegistryError::Decode(
                "entry must have either 'image' or 'url' field".to_string(),
            ));
        }
        (true, false) => {
            let mut image: ImageMetadata = decode_pass(document, "image entry")?;
            normalize_base(&mut image.base);
            ServerEntry::Image(image)
        }
        (false, true) => {
            let mut remote: RemoteServerMetadata = decode_pass(document, "remote entry")?;
            normalize_base(&mut remote.base);
            ServerEntry::Remote(remote)
        }
    };

    let extensions: EntryExtensions = decode_pass(document, "entry extensions")?;
    Ok(merge_extensions(server, extensions, document))
}

fn decode_pass<T: DeserializeOwned>(document: &Mapping, what: &str) -> Result<T> {
    serde_yaml::from_value(Value::Mapping(document.clone()))
        .map_err(|err| RegistryError::Decode(format!("{what}: {err}")))
}

fn normalize_base(base: &mut BaseServerMetadata) {
    base.tier = blank_to_none(base.tier.take(), Tier::as_str);
    base.status = blank_to_none(base.status.take(), Status::as_str);
    base.transport = blank_to_none(base.transport.take(), Transport::as_str);
}

fn merge_extensions(
    mut server: ServerEntry,
    extensions: EntryExtensions,
    document: &Mapping,
) -> Entry {
    if let ServerEntry::Remote(remote) = &mut server {
        if let Some(oauth) = extensions.oauth {
            remote.oauth_config = Some(oauth.expand());
        }
        if !extensions.headers.is_empty() {
            remote.headers = extensions.headers;
        }
        if !extensions.env_vars.is_empty() {
            remote.env_vars = extensions.env_vars;
        }
        remote.custom_metadata.extend(extract_custom_metadata(document));
    }

    Entry {
        server,
        examples: extensions.examples,
        license: extensions.license.filter(|license| !license.trim().is_empty()),
    }
}

fn extract_custom_metadata(document: &Mapping) -> BTreeMap<String, serde_json::Value> {
    CUSTOM_METADATA_KEYS
        .iter()
        .filter_map(|key| {
            let raw = document.get(*key)?;
            // Values that cannot be expressed as JSON (non-string map keys)
            // are dropped rather than failing the whole entry.
            let json = serde_json::to_value(raw).ok()?;
            Some((key.to_string(), json))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(text: &str) -> Result<Entry> {
        Entry::from_yaml_str(text)
    }

    #[test]
    fn image_key_selects_image_variant() {
        let entry = decode(
            r#"
description: Git tools
image: docker.io/mcp/git:latest
transport: stdio
env_vars:
  - name: GIT_TOKEN
    description: token
    required: true
    secret: true
examples:
  - name: log
    description: show log
    sample: git log
license: MIT
"#,
        )
        .unwrap();
        let image = entry.as_image().expect("image variant");
        assert_eq!(image.image, "docker.io/mcp/git:latest");
        assert_eq!(image.env_vars.len(), 1);
        assert!(image.env_vars[0].secret);
        assert_eq!(entry.examples.len(), 1);
        assert_eq!(entry.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn both_discriminators_are_rejected() {
        let err = decode("image: foo\nurl: https://example.com\n").unwrap_err();
        assert!(err.to_string().contains("both 'image' and 'url'"));
    }

    #[test]
    fn missing_discriminator_is_rejected() {
        let err = decode("description: nothing here\n").unwrap_err();
        assert!(err.to_string().contains("either 'image' or 'url'"));
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let err = decode("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, RegistryError::Decode(_)));
    }

    #[test]
    fn oauth_block_defaults_pkce_to_true() {
        let entry = decode(
            r#"
url: https://api.example.com/mcp
transport: streamable-http
description: remote
oauth:
  issuer: https://auth.example.com
  client_id: abc
  scopes: [read, write]
  callback_port: 8765
"#,
        )
        .unwrap();
        let oauth = entry
            .as_remote()
            .and_then(|remote| remote.oauth_config.as_ref())
            .expect("oauth config");
        assert!(oauth.use_pkce);
        assert_eq!(oauth.scopes, vec!["read", "write"]);
        assert_eq!(oauth.callback_port, Some(8765));
    }

    #[test]
    fn explicit_pkce_false_is_kept() {
        let entry = decode(
            "url: https://x.example.com\ndescription: r\ntransport: sse\noauth:\n  issuer: https://i\n  use_pkce: false\n",
        )
        .unwrap();
        let oauth = entry.as_remote().unwrap().oauth_config.as_ref().unwrap();
        assert!(!oauth.use_pkce);
    }

    #[test]
    fn remote_headers_and_custom_metadata_are_attached() {
        let entry = decode(
            r#"
url: https://example.com/mcp
description: remote
transport: sse
homepage: https://example.com
author: Example Corp
license: Apache-2.0
unrelated: ignored
headers:
  - name: Authorization
    description: Bearer token
    required: true
    secret: true
"#,
        )
        .unwrap();
        let remote = entry.as_remote().unwrap();
        assert_eq!(remote.headers.len(), 1);
        assert!(remote.headers[0].required);
        assert_eq!(
            remote.custom_metadata.get("homepage"),
            Some(&json!("https://example.com"))
        );
        assert_eq!(
            remote.custom_metadata.get("author"),
            Some(&json!("Example Corp"))
        );
        assert_eq!(
            remote.custom_metadata.get("license"),
            Some(&json!("Apache-2.0"))
        );
        assert!(!remote.custom_metadata.contains_key("unrelated"));
        assert_eq!(entry.license.as_deref(), Some("Apache-2.0"));
    }

    #[test]
    fn image_entries_ignore_remote_only_overlay() {
        let entry = decode(
            "image: mcp/time\ndescription: t\ntransport: stdio\nhomepage: https://x\noauth:\n  issuer: https://i\n",
        )
        .unwrap();
        assert!(entry.is_image());
        // No custom metadata or oauth slot exists on the image variant.
        assert_eq!(entry.locator(), "mcp/time");
    }

    #[test]
    fn blank_vocabulary_values_become_absent() {
        let entry = decode("image: mcp/time\ndescription: t\ntransport: stdio\ntier: \"\"\nstatus: \"\"\n")
            .unwrap();
        assert_eq!(entry.base().tier, None);
        assert_eq!(entry.base().status, None);
        assert_eq!(entry.tier(), Tier::Community);
        assert_eq!(entry.status(), Status::Active);
    }

    #[test]
    fn variant_type_errors_surface_before_overlay() {
        let err = decode("image: mcp/time\ntools: not-a-list\n").unwrap_err();
        assert!(err.to_string().contains("image entry"), "{err}");
    }

    #[test]
    fn overlay_type_errors_are_reported() {
        let err = decode("image: mcp/time\nexamples: 42\n").unwrap_err();
        assert!(err.to_string().contains("entry extensions"), "{err}");
    }
}
