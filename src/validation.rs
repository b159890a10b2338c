//! Per-entry rule checks and whole-catalog schema validation.
//!
//! Entry checks run while the loader assembles the entry set and again before
//! the standards catalog is written; they stop at the first broken rule and
//! name the entry and field. Catalog checks run on the serialized output and
//! aggregate every schema violation.

use crate::entry::{Entry, EnvVar, Header, OAuthConfig, ServerEntry, Transport};
use crate::error::{RegistryError, Result};
use crate::schema_loader::{SchemaSource, load_json_schema};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Check one decoded entry under its resolved canonical name.
pub fn validate_entry(entry: &Entry, name: &str) -> Result<()> {
    let fail = |field: &str, message: String| Err(RegistryError::validation(name, field, message));

    validate_name(name)?;

    let base = entry.base();
    if base.description.trim().is_empty() {
        return fail("description", "must not be empty".to_string());
    }

    match &base.transport {
        None => return fail("transport", "is required".to_string()),
        Some(transport) if !transport.is_known() => {
            return fail(
                "transport",
                format!(
                    "'{}' is not one of {:?}",
                    transport.as_str(),
                    Transport::ALLOWED
                ),
            );
        }
        Some(Transport::Stdio) if entry.is_remote() => {
            return fail(
                "transport",
                "remote servers must use 'sse' or 'streamable-http'".to_string(),
            );
        }
        Some(_) => {}
    }

    if let Some(tier) = &base.tier {
        if !tier.is_known() {
            return fail(
                "tier",
                format!("'{}' is not one of {:?}", tier.as_str(), crate::Tier::ALLOWED),
            );
        }
    }
    if let Some(status) = &base.status {
        if !status.is_known() {
            return fail(
                "status",
                format!(
                    "'{}' is not one of {:?}",
                    status.as_str(),
                    crate::Status::ALLOWED
                ),
            );
        }
    }

    check_string_list(name, "tools", &base.tools)?;
    check_string_list(name, "tags", &base.tags)?;

    match &entry.server {
        ServerEntry::Image(image) => {
            if image.image.trim().is_empty() {
                return fail("image", "must not be empty".to_string());
            }
            check_env_vars(name, &image.env_vars)?;
        }
        ServerEntry::Remote(remote) => {
            let url = remote.url.trim();
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return fail(
                    "url",
                    format!("'{}' must be an http(s) URL", remote.url),
                );
            }
            check_env_vars(name, &remote.env_vars)?;
            check_headers(name, &remote.headers)?;
            if let Some(oauth) = &remote.oauth_config {
                check_oauth(name, oauth)?;
            }
        }
    }

    for (idx, example) in entry.examples.iter().enumerate() {
        if example.name.trim().is_empty() {
            return fail(&format!("examples[{idx}].name"), "must not be empty".to_string());
        }
    }

    Ok(())
}

/// Canonical names double as map keys and directory names.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RegistryError::validation(name, "name", "must not be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(RegistryError::validation(
            name,
            "name",
            format!("must match ^[A-Za-z0-9_.-]+$, got {name}"),
        ));
    }
    Ok(())
}

fn check_string_list(entry: &str, field: &str, values: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for value in values {
        if value.trim().is_empty() {
            return Err(RegistryError::validation(
                entry,
                field,
                "must not contain empty entries",
            ));
        }
        if !seen.insert(value.as_str()) {
            return Err(RegistryError::validation(
                entry,
                field,
                format!("duplicate value '{value}'"),
            ));
        }
    }
    Ok(())
}

fn check_env_vars(entry: &str, env_vars: &[EnvVar]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for env in env_vars {
        if env.name.trim().is_empty() {
            return Err(RegistryError::validation(
                entry,
                "env_vars",
                "variable name must not be empty",
            ));
        }
        let field = format!("env_vars.{}", env.name);
        if !seen.insert(env.name.as_str()) {
            return Err(RegistryError::validation(entry, field, "declared more than once"));
        }
        if env.secret && env.default.is_some() {
            return Err(RegistryError::validation(
                entry,
                field,
                "secret variables must not declare a default",
            ));
        }
    }
    Ok(())
}

fn check_headers(entry: &str, headers: &[Header]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for header in headers {
        if header.name.trim().is_empty() {
            return Err(RegistryError::validation(
                entry,
                "headers",
                "header name must not be empty",
            ));
        }
        let field = format!("headers.{}", header.name);
        // HTTP header names are case-insensitive.
        if !seen.insert(header.name.to_ascii_lowercase()) {
            return Err(RegistryError::validation(entry, field, "declared more than once"));
        }
        if let Some(default) = &header.default {
            if !header.choices.is_empty() && !header.choices.contains(default) {
                return Err(RegistryError::validation(
                    entry,
                    field,
                    format!("default '{default}' is not one of the declared choices"),
                ));
            }
        }
    }
    Ok(())
}

fn check_oauth(entry: &str, oauth: &OAuthConfig) -> Result<()> {
    let has_endpoints = !oauth.authorize_url.is_empty() && !oauth.token_url.is_empty();
    if oauth.issuer.is_empty() && !has_endpoints {
        return Err(RegistryError::validation(
            entry,
            "oauth",
            "requires an issuer or both authorize_url and token_url",
        ));
    }
    let mut seen = BTreeSet::new();
    for scope in &oauth.scopes {
        if !seen.insert(scope.as_str()) {
            return Err(RegistryError::validation(
                entry,
                "oauth.scopes",
                format!("duplicate scope '{scope}'"),
            ));
        }
    }
    Ok(())
}

/// Serialize `catalog` and validate it against the schema at `source`.
pub fn validate_catalog<T: Serialize>(catalog: &T, source: &SchemaSource) -> Result<()> {
    let value = serde_json::to_value(catalog)?;
    validate_catalog_value(&value, source)
}

/// Validate an already-serialized catalog against the schema at `source`.
pub fn validate_catalog_value(value: &Value, source: &SchemaSource) -> Result<()> {
    let schema = load_json_schema(source)?;
    schema.validate(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{BaseServerMetadata, ImageMetadata, RemoteServerMetadata, Tier};

    fn image_entry() -> Entry {
        Entry::image(ImageMetadata {
            base: BaseServerMetadata {
                description: "Git tools".to_string(),
                transport: Some(Transport::Stdio),
                ..Default::default()
            },
            image: "mcp/git:latest".to_string(),
            ..Default::default()
        })
    }

    fn remote_entry() -> Entry {
        Entry::remote(RemoteServerMetadata {
            base: BaseServerMetadata {
                description: "Remote".to_string(),
                transport: Some(Transport::StreamableHttp),
                ..Default::default()
            },
            url: "https://example.com/mcp".to_string(),
            ..Default::default()
        })
    }

    fn field_of(err: RegistryError) -> String {
        match err {
            RegistryError::Validation { field, .. } => field,
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn minimal_entries_pass() {
        validate_entry(&image_entry(), "git").unwrap();
        validate_entry(&remote_entry(), "remote").unwrap();
    }

    #[test]
    fn missing_description_names_field() {
        let mut entry = image_entry();
        entry.base_mut().description.clear();
        let err = validate_entry(&entry, "git").unwrap_err();
        assert!(err.to_string().contains("'git'"));
        assert_eq!(field_of(err), "description");
    }

    #[test]
    fn unknown_vocabulary_values_fail() {
        let mut entry = image_entry();
        entry.base_mut().tier = Some(Tier::Other("Gold".to_string()));
        assert_eq!(field_of(validate_entry(&entry, "git").unwrap_err()), "tier");

        let mut entry = image_entry();
        entry.base_mut().transport = Some(Transport::Other("ws".to_string()));
        assert_eq!(
            field_of(validate_entry(&entry, "git").unwrap_err()),
            "transport"
        );

        let mut entry = image_entry();
        entry.base_mut().transport = None;
        assert_eq!(
            field_of(validate_entry(&entry, "git").unwrap_err()),
            "transport"
        );
    }

    #[test]
    fn remote_rejects_stdio_and_bad_urls() {
        let mut entry = remote_entry();
        entry.base_mut().transport = Some(Transport::Stdio);
        assert_eq!(
            field_of(validate_entry(&entry, "remote").unwrap_err()),
            "transport"
        );

        let mut entry = remote_entry();
        if let ServerEntry::Remote(remote) = &mut entry.server {
            remote.url = "ftp://example.com".to_string();
        }
        assert_eq!(field_of(validate_entry(&entry, "remote").unwrap_err()), "url");
    }

    #[test]
    fn secret_env_var_with_default_is_rejected() {
        let mut entry = image_entry();
        if let ServerEntry::Image(image) = &mut entry.server {
            image.env_vars.push(EnvVar {
                name: "TOKEN".to_string(),
                secret: true,
                default: Some("abc".to_string()),
                ..Default::default()
            });
        }
        assert_eq!(
            field_of(validate_entry(&entry, "git").unwrap_err()),
            "env_vars.TOKEN"
        );
    }

    #[test]
    fn duplicate_env_vars_and_headers_are_rejected() {
        let mut entry = remote_entry();
        if let ServerEntry::Remote(remote) = &mut entry.server {
            remote.headers = vec![
                Header {
                    name: "Authorization".to_string(),
                    ..Default::default()
                },
                Header {
                    name: "authorization".to_string(),
                    ..Default::default()
                },
            ];
        }
        assert_eq!(
            field_of(validate_entry(&entry, "remote").unwrap_err()),
            "headers.authorization"
        );
    }

    #[test]
    fn header_default_must_be_a_choice() {
        let mut entry = remote_entry();
        if let ServerEntry::Remote(remote) = &mut entry.server {
            remote.headers = vec![Header {
                name: "X-Region".to_string(),
                default: Some("mars".to_string()),
                choices: vec!["us".to_string(), "eu".to_string()],
                ..Default::default()
            }];
        }
        assert_eq!(
            field_of(validate_entry(&entry, "remote").unwrap_err()),
            "headers.X-Region"
        );
    }

    #[test]
    fn oauth_requires_issuer_or_endpoints_and_unique_scopes() {
        let mut entry = remote_entry();
        if let ServerEntry::Remote(remote) = &mut entry.server {
            remote.oauth_config = Some(OAuthConfig {
                client_id: "abc".to_string(),
                ..Default::default()
            });
        }
        assert_eq!(field_of(validate_entry(&entry, "remote").unwrap_err()), "oauth");

        if let ServerEntry::Remote(remote) = &mut entry.server {
            remote.oauth_config = Some(OAuthConfig {
                issuer: "https://auth.example.com".to_string(),
                scopes: vec!["read".to_string(), "read".to_string()],
                ..Default::default()
            });
        }
        assert_eq!(
            field_of(validate_entry(&entry, "remote").unwrap_err()),
            "oauth.scopes"
        );
    }

    #[test]
    fn names_must_use_safe_characters() {
        assert!(validate_name("github-mcp_server.v2").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("has space").is_err());
        assert!(validate_name("slash/name").is_err());
    }

    #[test]
    fn empty_and_duplicate_tools_are_rejected() {
        let mut entry = image_entry();
        entry.base_mut().tools = vec!["a".to_string(), "a".to_string()];
        assert_eq!(field_of(validate_entry(&entry, "git").unwrap_err()), "tools");
        entry.base_mut().tools = vec![" ".to_string()];
        assert_eq!(field_of(validate_entry(&entry, "git").unwrap_err()), "tools");
    }
}
