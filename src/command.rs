//! `thv run` argument derivation for a single entry.
//!
//! Used when a server has to be started briefly (for example to discover its
//! tools). Required and secret environment variables get a placeholder value
//! so the server can boot without real credentials. Nothing here validates
//! the entry; callers pass entries that already went through the loader.

use crate::entry::{Entry, ServerEntry};
use std::collections::BTreeSet;

/// Value injected for required or secret variables without a default.
pub const PLACEHOLDER_VALUE: &str = "placeholder";
/// Separator after which arguments belong to the server, not the launcher.
pub const SERVER_ARGS_SEPARATOR: &str = "--";

/// Accumulates launcher arguments in order.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    args: Vec<String>,
}

impl CommandBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            args: vec![command.to_string()],
        }
    }

    /// Append `flag value`; skipped when `value` is empty.
    pub fn add_flag(&mut self, flag: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.args.push(flag.to_string());
            self.args.push(value.to_string());
        }
        self
    }

    /// Append `flag` only when `value` is true.
    pub fn add_bool_flag(&mut self, flag: &str, value: bool) -> &mut Self {
        if value {
            self.args.push(flag.to_string());
        }
        self
    }

    /// Append `-e NAME=value`; skipped when `value` is empty.
    pub fn add_env_var(&mut self, name: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.args.push("-e".to_string());
            self.args.push(format!("{name}={value}"));
        }
        self
    }

    pub fn add_positional(&mut self, value: &str) -> &mut Self {
        self.args.push(value.to_string());
        self
    }

    pub fn build(self) -> Vec<String> {
        self.args
    }
}

/// Build the `thv run` arguments for `entry`.
///
/// `temp_name` names the workload; `image` is the resolved image to launch.
pub fn build_run_command(entry: &Entry, temp_name: &str, image: &str) -> Vec<String> {
    let mut builder = CommandBuilder::new("run");
    builder.add_flag("--name", temp_name);

    let image_entry = match &entry.server {
        ServerEntry::Image(metadata) => Some(metadata),
        ServerEntry::Remote(_) => None,
    };

    if let Some(metadata) = image_entry {
        let transport = metadata
            .base
            .transport
            .as_ref()
            .map(|transport| transport.as_str())
            .unwrap_or_default();
        builder.add_flag("--transport", transport);

        let mut injected = BTreeSet::new();
        for env in &metadata.env_vars {
            if injected.contains(env.name.as_str()) {
                continue;
            }
            // Authored default, then required, then secret.
            let value = match env.default.as_deref() {
                Some(default) if !default.is_empty() => Some(default),
                _ if env.required || env.secret => Some(PLACEHOLDER_VALUE),
                _ => None,
            };
            if let Some(value) = value {
                builder.add_env_var(&env.name, value);
                injected.insert(env.name.as_str());
            }
        }

        let wants_network = metadata
            .permissions
            .as_ref()
            .is_some_and(|permissions| permissions.network.is_some());
        if wants_network {
            builder.add_flag("--permission-profile", "network");
        }
    }

    builder.add_positional(image);

    if let Some(metadata) = image_entry {
        if !metadata.args.is_empty() {
            builder.add_positional(SERVER_ARGS_SEPARATOR);
            for arg in metadata.args.iter().filter(|arg| !arg.is_empty()) {
                builder.add_positional(arg);
            }
        }
    }

    builder.build()
}
