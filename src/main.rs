use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

mod config;
mod error;
mod metadata;
mod ripper;
mod setup;

use config::Settings;

/// CD ripping orchestrator around XLD and friends.
#[derive(Parser, Debug)]
#[command(name = "rip-cd")]
#[command(about = "Rip CDs with rich metadata, verification, and archival logs")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.rip-cd.yaml, or $RIPCD_CONFIG_PATH)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the workspace base directory
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Show what would happen without touching the drive or the filesystem
    #[arg(long, global = true)]
    dry_run: bool,

    /// Informational output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Debug output (implies --verbose)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rip a CD described by a metadata file
    Rip {
        /// Metadata YAML file for the disc in the drive
        metadata_file: PathBuf,
    },
    /// Validate a metadata file without ripping
    Validate {
        metadata_file: PathBuf,
    },
    /// Generate starter files
    Generate {
        #[command(subcommand)]
        what: GenerateTarget,
    },
    /// Check for and install the external tools this program drives
    Setup,
}

#[derive(Subcommand, Debug)]
enum GenerateTarget {
    /// Metadata template in the workspace metadata directory
    Template {
        #[arg(long)]
        overwrite: bool,
    },
    /// JSON schema for editor integration
    Schema {
        #[arg(long)]
        overwrite: bool,
    },
    /// Commented default config at ~/.rip-cd.yaml
    Config {
        #[arg(long)]
        overwrite: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_target(false)
        .init();

    // `generate config` must work before any config exists.
    if let Commands::Generate {
        what: GenerateTarget::Config { overwrite },
    } = &cli.command
    {
        let path = config::write_default_config(*overwrite)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let config_file = match &cli.config {
        Some(path) => Some(path.clone()),
        None => config::resolve_config_path(),
    };
    if let Some(path) = &config_file {
        info!("using config file: {}", path.display());
    } else {
        info!("no config file found, using built-in defaults");
    }
    let cfg = Settings::load(config_file.as_deref(), cli.workspace.as_deref())?;

    match cli.command {
        Commands::Rip { metadata_file } => {
            if cli.dry_run {
                ripper::dry_run(&cfg, &metadata_file)?;
            } else {
                let result = ripper::rip(&cfg, &metadata_file)?;
                println!(
                    "Done. {} file(s) in {}",
                    result.files.len(),
                    result.output_dir.display()
                );
            }
        }
        Commands::Validate { metadata_file } => {
            metadata::validate(&cfg, &metadata_file)?;
            println!("{} is valid", metadata_file.display());
        }
        Commands::Generate { what } => match what {
            GenerateTarget::Template { overwrite } => {
                let path = metadata::generate_template(&cfg, overwrite)?;
                println!("wrote {}", path.display());
            }
            GenerateTarget::Schema { overwrite } => {
                let path = metadata::generate_schema(&cfg, overwrite)?;
                println!("wrote {}", path.display());
            }
            GenerateTarget::Config { .. } => unreachable!("handled before config load"),
        },
        Commands::Setup => setup::run(cli.dry_run)?,
    }

    Ok(())
}
