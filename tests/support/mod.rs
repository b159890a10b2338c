#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use toolhive_registry::{RegistryConfig, SPEC_FILE_NAME, find_project_root};

pub fn repo_root() -> PathBuf {
    find_project_root().expect("tests require repository root")
}

pub fn registry_builder() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_registry-builder"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Scratch project: a temp registry tree plus the repository's schemas.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("failed to allocate fixture dir")?;
        fs::create_dir_all(dir.path().join("registry"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn registry_dir(&self) -> PathBuf {
        self.root().join("registry")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("build")
    }

    /// Write `registry/<dir_name>/spec.yaml`.
    pub fn write_entry(&self, dir_name: &str, yaml: &str) -> Result<PathBuf> {
        let entry_dir = self.registry_dir().join(dir_name);
        fs::create_dir_all(&entry_dir)
            .with_context(|| format!("failed to create {}", entry_dir.display()))?;
        let path = entry_dir.join(SPEC_FILE_NAME);
        fs::write(&path, yaml).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Config rooted at the fixture but validating against the checked-in schemas.
    pub fn config(&self) -> RegistryConfig {
        let schemas = RegistryConfig::from_root(&repo_root());
        RegistryConfig {
            native_schema: schemas.native_schema,
            official_schema: schemas.official_schema,
            ..RegistryConfig::from_root(self.root())
        }
    }
}

pub const GIT_ENTRY: &str = "\
name: git
description: Git tools
image: mcp/git:latest
transport: stdio
";

pub const AUTH_REMOTE_ENTRY: &str = "\
description: Hosted API
url: https://api.example.com/mcp
transport: streamable-http
headers:
  - name: Authorization
    description: Bearer token
    required: true
    secret: true
";
