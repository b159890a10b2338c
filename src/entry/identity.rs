use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Support tier of a registry entry.
///
/// Unknown values decode into `Other` so the validator, not the decoder, is
/// the place that rejects them with entry context.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Tier {
    Official,
    #[default]
    Community,
    Other(String),
}

/// Lifecycle status of a registry entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Status {
    #[default]
    Active,
    Deprecated,
    Other(String),
}

/// MCP transport the server speaks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transport {
    Stdio,
    Sse,
    StreamableHttp,
    Other(String),
}

impl Tier {
    pub const ALLOWED: &'static [&'static str] = &["Official", "Community"];

    pub fn as_str(&self) -> &str {
        match self {
            Tier::Official => "Official",
            Tier::Community => "Community",
            Tier::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "Official" => Tier::Official,
            "Community" => Tier::Community,
            other => Tier::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Tier::Other(_))
    }
}

impl Status {
    pub const ALLOWED: &'static [&'static str] = &["Active", "Deprecated"];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Active => "Active",
            Status::Deprecated => "Deprecated",
            Status::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "Active" => Status::Active,
            "Deprecated" => Status::Deprecated,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Other(_))
    }
}

impl Transport {
    pub const ALLOWED: &'static [&'static str] = &["stdio", "sse", "streamable-http"];

    pub fn as_str(&self) -> &str {
        match self {
            Transport::Stdio => "stdio",
            Transport::Sse => "sse",
            Transport::StreamableHttp => "streamable-http",
            Transport::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "stdio" => Transport::Stdio,
            "sse" => Transport::Sse,
            "streamable-http" => Transport::StreamableHttp,
            other => Transport::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Transport::Other(_))
    }
}

macro_rules! string_vocabulary_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                Ok(Self::from_str(&value))
            }
        }
    };
}

string_vocabulary_serde!(Tier);
string_vocabulary_serde!(Status);
string_vocabulary_serde!(Transport);

/// Treat an empty authored value the same as an omitted one.
pub(crate) fn blank_to_none<T>(value: Option<T>, as_str: impl Fn(&T) -> &str) -> Option<T> {
    value.filter(|v| !as_str(v).trim().is_empty())
}
