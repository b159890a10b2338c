//! Command-line entry point for compiling the registry.
//!
//! `build` writes the native and/or official catalogs, `validate` runs every
//! check without writing, `list` prints the loaded entries, and `run-args`
//! prints the `thv run` invocation for one entry, one argument per line.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use toolhive_registry::{
    NativeCatalogBuilder, OfficialRegistryBuilder, RegistryConfig, RegistryLoader,
    build_run_command, find_project_root,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

#[derive(Parser)]
#[command(name = "registry-builder", version, about)]
struct Cli {
    /// Directory containing one subdirectory per registry entry.
    #[arg(long, global = true, env = "TOOLHIVE_REGISTRY_DIR")]
    registry_dir: Option<PathBuf>,

    /// Directory the catalogs are written into.
    #[arg(long, global = true, env = "TOOLHIVE_REGISTRY_OUTPUT")]
    output_dir: Option<PathBuf>,

    /// Local copy of the official registry JSON Schema.
    #[arg(long, global = true, env = "TOOLHIVE_REGISTRY_SCHEMA")]
    schema: Option<PathBuf>,

    /// Local copy of the native registry JSON Schema.
    #[arg(long, global = true)]
    native_schema: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load, validate and write the catalogs
    Build {
        #[arg(long, value_enum, default_value_t = Format::All)]
        format: Format,
    },
    /// Load the entries and validate both catalogs without writing
    Validate,
    /// List loaded entries in name order
    List,
    /// Print the `thv run` arguments for one entry
    RunArgs {
        /// Canonical entry name
        name: String,
        /// Workload name passed to --name
        #[arg(long)]
        temp_name: Option<String>,
        /// Image to launch; defaults to the entry's own image
        #[arg(long)]
        image: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Toolhive,
    Official,
    All,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<RegistryConfig> {
    let root = match find_project_root() {
        Some(root) => root,
        None => std::env::current_dir().context("resolving current directory")?,
    };
    Ok(RegistryConfig::from_root(&root)
        .with_registry_dir(cli.registry_dir.clone())
        .with_output_dir(cli.output_dir.clone())
        .with_official_schema(cli.schema.clone())
        .with_native_schema(cli.native_schema.clone()))
}

fn load(config: &RegistryConfig) -> Result<RegistryLoader> {
    let mut loader = RegistryLoader::new(&config.registry_dir);
    loader
        .load_all()
        .with_context(|| format!("loading entries from {}", config.registry_dir.display()))?;
    Ok(loader)
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let loader = load(&config)?;

    match cli.command {
        Command::Build { format } => {
            if matches!(format, Format::Toolhive | Format::All) {
                let path = config.native_output_path();
                NativeCatalogBuilder::new(&loader)
                    .write_json(&path, &config.native_schema)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {} ({} entries)", path.display(), loader.len());
            }
            if matches!(format, Format::Official | Format::All) {
                let path = config.official_output_path();
                OfficialRegistryBuilder::new(&loader)
                    .write_json(&path, &config.official_schema)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {} ({} entries)", path.display(), loader.len());
            }
        }
        Command::Validate => {
            NativeCatalogBuilder::new(&loader)
                .validate_against_schema(&config.native_schema)
                .context("native registry")?;
            let official = OfficialRegistryBuilder::new(&loader);
            official.validate_entries().context("official registry entries")?;
            official
                .validate_against_schema(&config.official_schema)
                .context("official registry")?;
            println!("{} entries valid", loader.len());
        }
        Command::List => {
            for (name, entry) in loader.sorted_entries() {
                println!("{name}\t{}\t{}", entry.kind(), entry.tier().as_str());
            }
        }
        Command::RunArgs {
            name,
            temp_name,
            image,
        } => {
            let entry = loader
                .get(&name)
                .ok_or_else(|| anyhow!("no registry entry named '{name}'"))?;
            let temp_name = temp_name.unwrap_or_else(|| format!("{name}-discovery"));
            let image = image.unwrap_or_else(|| entry.locator().to_string());
            for arg in build_run_command(entry, &temp_name, &image) {
                println!("{arg}");
            }
        }
    }

    Ok(())
}
