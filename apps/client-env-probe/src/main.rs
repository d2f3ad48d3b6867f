//! Client Environment Probe
//!
//! Collects the client environment record from a host and prints it as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Probe the local machine
//! client-env-probe --pretty
//!
//! # Replay a recorded browser host
//! client-env-probe --snapshot ipad.yaml device
//!
//! # Record the local machine as a snapshot for later replay
//! client-env-probe capture > host.json
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_env_info::{EnvInfoCollector, HostEnvironment, HostSnapshot, NativeHost};
use serde::Serialize;

use crate::config::{AppConfig, CliOverrides};

/// Client Environment Probe - normalized device, OS, browser and hardware info
#[derive(Parser)]
#[command(name = "client-env-probe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host snapshot (YAML or JSON) to replay instead of the local machine
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Print the merged device and hardware record
    All,
    /// Print only the device record
    Device,
    /// Print only the hardware record
    Hardware,
    /// Record the host as a snapshot that `--snapshot` can replay
    Capture,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (ENVPROBE__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        snapshot: cli.snapshot.clone(),
        pretty: cli.pretty,
    });

    logging::init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let host = build_host(config.host.snapshot.as_deref())?;
    let pretty = config.output.pretty;

    match cli.command.unwrap_or(Commands::All) {
        Commands::All => {
            let collector = EnvInfoCollector::with_config(host, config.collector);
            print_json(&collector.collect_all().await, pretty)
        }
        Commands::Device => {
            let collector = EnvInfoCollector::with_config(host, config.collector);
            print_json(&collector.collect_device_info(), pretty)
        }
        Commands::Hardware => {
            let collector = EnvInfoCollector::with_config(host, config.collector);
            print_json(&collector.collect_hardware_info().await, pretty)
        }
        Commands::Capture => {
            let snapshot = HostSnapshot::capture(host.as_ref(), &config.collector).await;
            print_json(&snapshot, pretty)
        }
    }
}

/// Replay a snapshot file when given, otherwise probe the local machine
fn build_host(snapshot: Option<&Path>) -> Result<Arc<dyn HostEnvironment>> {
    let Some(path) = snapshot else {
        tracing::info!("Probing the local machine");
        return Ok(Arc::new(NativeHost::new()));
    };

    tracing::info!(path = %path.display(), "Replaying host snapshot");
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: HostSnapshot = serde_saphyr::from_str(&raw)
        .with_context(|| format!("invalid snapshot {}", path.display()))?;
    Ok(Arc::new(snapshot))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
