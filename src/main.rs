//! sbom-catalog: inspect tar archives through the catalog resolver.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sbom_catalog::cli::{self, FindQuery};
use sbom_catalog::config::{load_or_default, CatalogConfig, Compression};
use std::io::{self, Write as _};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-catalog")]
#[command(version)]
#[command(about = "Inspect tar and tar.gz archives the way catalogers see them", long_about = None)]
#[command(after_help = "EXAMPLES:
    # List every entry as stored
    sbom-catalog ls image.tar

    # Find files by glob, following links one hop
    sbom-catalog find image.tar --glob '**/*.so*'

    # Print a file reached through a symlink
    sbom-catalog cat rootfs.tar.gz etc/os-release")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Archive compression (auto, gzip, none); overrides the config file
    #[arg(long, global = true)]
    compression: Option<Compression>,

    /// Filesystem id stamped on every location; overrides the config file
    #[arg(long, global = true)]
    filesystem_id: Option<String>,

    /// Use whatever was indexed before a malformed entry instead of failing
    #[arg(long, global = true)]
    allow_partial: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every indexed entry without resolving links
    Ls {
        /// Path to the archive
        archive: PathBuf,
    },

    /// Find regular files by path, glob, or MIME type
    Find {
        /// Path to the archive
        archive: PathBuf,

        /// Exact path (links are followed one hop)
        #[arg(long = "path")]
        paths: Vec<String>,

        /// Glob pattern (`**` spans directories)
        #[arg(long = "glob")]
        globs: Vec<String>,

        /// MIME type sniffed from content
        #[arg(long = "mime")]
        mime_types: Vec<String>,

        /// Print locations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a file's content to stdout
    Cat {
        /// Path to the archive
        archive: PathBuf,
        /// Path inside the archive
        path: String,
    },

    /// Print an entry's metadata as JSON
    Stat {
        /// Path to the archive
        archive: PathBuf,
        /// Path inside the archive
        path: String,
    },

    /// Print every entry's coordinates with its identity
    Ids {
        /// Path to the archive
        archive: PathBuf,
    },

    /// Print the JSON schema of the configuration file
    Schema,

    /// Print an example configuration file with every default spelled out
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Ls { archive } => {
            let resolver = cli::open_archive(&archive, &config, cli.allow_partial)?;
            cli::run_ls(&resolver, &mut out)?;
        }
        Commands::Find {
            archive,
            paths,
            globs,
            mime_types,
            json,
        } => {
            let resolver = cli::open_archive(&archive, &config, cli.allow_partial)?;
            let query = FindQuery {
                paths,
                globs,
                mime_types,
            };
            cli::run_find(&resolver, &query, json, &mut out)?;
        }
        Commands::Cat { archive, path } => {
            let resolver = cli::open_archive(&archive, &config, cli.allow_partial)?;
            cli::run_cat(&resolver, &path, &mut out)?;
        }
        Commands::Stat { archive, path } => {
            let resolver = cli::open_archive(&archive, &config, cli.allow_partial)?;
            cli::run_stat(&resolver, &path, &mut out)?;
        }
        Commands::Ids { archive } => {
            let resolver = cli::open_archive(&archive, &config, cli.allow_partial)?;
            cli::run_ids(&resolver, &mut out)?;
        }
        Commands::Schema => {
            writeln!(out, "{}", sbom_catalog::config::generate_json_schema())?;
        }
        Commands::InitConfig => {
            write!(out, "{}", sbom_catalog::config::generate_example_config())?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Load the config file, then layer CLI overrides on top.
fn resolve_config(cli: &Cli) -> Result<CatalogConfig> {
    let (mut config, loaded_from) = load_or_default(cli.config.as_deref());
    if let Some(path) = loaded_from {
        tracing::debug!("using config {}", path.display());
    }
    if let Some(compression) = cli.compression {
        config.archive.compression = compression;
    }
    if let Some(id) = &cli.filesystem_id {
        config.archive.filesystem_id.clone_from(id);
    }
    Ok(config.validated()?)
}
