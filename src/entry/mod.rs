//! Registry entry types and the two-pass YAML decoder.
//!
//! An [`Entry`] wraps exactly one [`ServerEntry`] variant (image or remote)
//! plus the extension fields common to both. The variant is chosen once, at
//! decode time, from which discriminator key the document carries.

pub mod decode;
pub mod identity;
pub mod model;

pub use decode::{CUSTOM_METADATA_KEYS, decode_entry};
pub use identity::{Status, Tier, Transport};
pub use model::{
    Attestation, BaseServerMetadata, EnvVar, Example, Header, ImageMetadata, Metadata,
    NetworkPermissions, OAuthConfig, OutboundNetwork, PermissionProfile, Provenance,
    RemoteServerMetadata,
};

/// One of the two mutually exclusive server shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerEntry {
    Image(ImageMetadata),
    Remote(RemoteServerMetadata),
}

/// A decoded registry entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub server: ServerEntry,
    pub examples: Vec<Example>,
    pub license: Option<String>,
}

impl Entry {
    pub fn image(metadata: ImageMetadata) -> Self {
        Self {
            server: ServerEntry::Image(metadata),
            examples: Vec::new(),
            license: None,
        }
    }

    pub fn remote(metadata: RemoteServerMetadata) -> Self {
        Self {
            server: ServerEntry::Remote(metadata),
            examples: Vec::new(),
            license: None,
        }
    }

    pub fn base(&self) -> &BaseServerMetadata {
        match &self.server {
            ServerEntry::Image(image) => &image.base,
            ServerEntry::Remote(remote) => &remote.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseServerMetadata {
        match &mut self.server {
            ServerEntry::Image(image) => &mut image.base,
            ServerEntry::Remote(remote) => &mut remote.base,
        }
    }

    pub fn as_image(&self) -> Option<&ImageMetadata> {
        match &self.server {
            ServerEntry::Image(image) => Some(image),
            ServerEntry::Remote(_) => None,
        }
    }

    pub fn as_remote(&self) -> Option<&RemoteServerMetadata> {
        match &self.server {
            ServerEntry::Remote(remote) => Some(remote),
            ServerEntry::Image(_) => None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.as_image().is_some()
    }

    pub fn is_remote(&self) -> bool {
        self.as_remote().is_some()
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.base_mut().name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.base().description
    }

    pub fn transport(&self) -> Option<&Transport> {
        self.base().transport.as_ref()
    }

    pub fn tools(&self) -> &[String] {
        &self.base().tools
    }

    /// Declared tier, or `Community` when the author left it out.
    pub fn tier(&self) -> Tier {
        self.base().tier.clone().unwrap_or_default()
    }

    /// Declared status, or `Active` when the author left it out.
    pub fn status(&self) -> Status {
        self.base().status.clone().unwrap_or_default()
    }

    /// The image reference or endpoint URL, whichever variant applies.
    pub fn locator(&self) -> &str {
        match &self.server {
            ServerEntry::Image(image) => &image.image,
            ServerEntry::Remote(remote) => &remote.url,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.server {
            ServerEntry::Image(_) => "image",
            ServerEntry::Remote(_) => "remote",
        }
    }

    /// Decode an entry from YAML text.
    pub fn from_yaml_str(text: &str) -> crate::Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        decode_value(value)
    }

    /// Decode an entry from raw YAML bytes.
    pub fn from_yaml_slice(bytes: &[u8]) -> crate::Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_slice(bytes)?;
        decode_value(value)
    }
}

fn decode_value(value: serde_yaml::Value) -> crate::Result<Entry> {
    match value {
        serde_yaml::Value::Mapping(mapping) => decode_entry(&mapping),
        _ => Err(crate::RegistryError::Decode(
            "entry document must be a mapping".to_string(),
        )),
    }
}
