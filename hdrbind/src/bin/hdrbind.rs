//! CLI entry point for hdrbind.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// hdrbind — scaffold pybind11 bindings and Python stubs from C++ headers.
#[derive(Parser, Debug)]
#[command(name = "hdrbind", version, about)]
struct Cli {
    /// Path to the hdrbind.toml configuration file.
    #[arg(default_value = "hdrbind.toml")]
    config: PathBuf,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the marker scaffolding only, without running the engine.
    #[arg(long)]
    scaffold_only: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hdrbind=info")),
        )
        .init();

    let cli = Cli::parse();
    let summary = if cli.scaffold_only {
        hdrbind::run_scaffold_only(&cli.config, cli.output.as_deref())
    } else {
        hdrbind::run(&cli.config, cli.output.as_deref())
    }
    .with_context(|| format!("generating bindings from {}", cli.config.display()))?;

    println!("Generated bindings for {} headers", summary.headers);
    Ok(())
}
