// cdnsim — interactive CDN simulator
//
// Loads a topology file, then reads commands from stdin until `exit` or end of input.

mod config;
mod render;
mod shell;

use anyhow::Result;
use cdnsim_core::CdnSimulator;
use clap::Parser;
use colored::*;
use render::OutputMode;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cdnsim")]
#[command(about = "CDN Simulator — shortest-path routing, edge caching and backbone planning", long_about = None)]
#[command(version)]
struct Cli {
    /// Topology file loaded before the shell starts
    #[arg(short, long, default_value = "config.txt")]
    config: PathBuf,
    /// Print every outcome as one JSON object per line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let mut sim = CdnSimulator::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match config::load_config(&cli.config, &mut sim) {
        Ok(report) => {
            render::load_report(&mut out, mode, &cli.config.display().to_string(), &report)?
        }
        Err(e) => tracing::error!("{:#}. Starting with an empty network.", e),
    }

    if mode == OutputMode::Human {
        writeln!(out)?;
        writeln!(out, "{}", "CDN Simulator. Type 'help' for commands.".bold())?;
    }

    shell::run(&mut sim, io::stdin().lock(), &mut out, mode)
}
