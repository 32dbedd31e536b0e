//! schemeta CLI
//!
//! Converts TiDB/MySQL DDL files to schema metadata JSON and back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use schemeta::prelude::*;

/// Canonical schema metadata from TiDB/MySQL DDL.
#[derive(Parser)]
#[command(name = "schemeta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, env = "SCHEMETA_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a DDL file into metadata JSON.
    Parse {
        /// DDL file to read.
        ddl: PathBuf,

        /// Pretty-print the JSON.
        #[arg(short, long)]
        pretty: bool,

        /// Write the JSON here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render metadata JSON back to DDL.
    Render {
        /// Metadata JSON file to read.
        metadata: PathBuf,

        /// Write the DDL here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a DDL file survives parse, render and parse again.
    Check {
        /// DDL file to read.
        ddl: PathBuf,
    },
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn emit(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Parse {
            ddl,
            pretty,
            output,
        } => {
            let extraction = extract(&read(&ddl)?)
                .with_context(|| format!("Failed to parse {}", ddl.display()))?;
            if let Some(error) = &extraction.error {
                warn!(
                    tables = extraction.state.table_count(),
                    "Stopped with a partial schema"
                );
                bail!("{}: {error}", ddl.display());
            }
            let metadata = extraction.metadata();
            let mut json = if pretty {
                metadata.to_json_pretty()?
            } else {
                metadata.to_json()?
            };
            json.push('\n');
            emit(&json, output.as_deref())?;
        }

        Commands::Render { metadata, output } => {
            let parsed = DatabaseSchemaMetadata::from_json(&read(&metadata)?)
                .with_context(|| format!("Invalid metadata in {}", metadata.display()))?;
            emit(&render_metadata(&parsed), output.as_deref())?;
        }

        Commands::Check { ddl } => {
            let first = parse_to_metadata(&read(&ddl)?)
                .with_context(|| format!("Failed to parse {}", ddl.display()))?;
            let rendered = render_metadata(&first);
            let second = parse_to_metadata(&rendered).context("Failed to re-parse rendered DDL")?;
            // Rendered DDL carries no database qualifier.
            if first.schemas != second.schemas {
                bail!("{}: schema changed after render and re-parse", ddl.display());
            }
            let tables: usize = first.schemas.iter().map(|s| s.tables.len()).sum();
            info!("{}: {} tables, stable", ddl.display(), tables);
        }
    }

    Ok(())
}
