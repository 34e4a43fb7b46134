//! Command-line interface
//!
//! `fcpa-cv [serve] [--host] [--port] [--seed] [--config]` runs the HTTP
//! service (the default); `fcpa-cv convert INPUT` converts one file.
//!
//! Settings resolve CLI → environment variable → TOML config → default.
//! clap covers the first two tiers through `env = ...`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fcpa_common::config::TomlConfig;
use tracing::info;

use crate::api::convert::parse_sample_rate;
use crate::{convert_text, load_seed};

/// FCP5 XML to Ardour session converter
#[derive(Debug, Parser)]
#[command(name = "fcpa-cv", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

impl Cli {
    /// Subcommand to run; `serve` when none is given
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP conversion service
    Serve(ServeArgs),
    /// Convert one FCP5 file and exit
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "FCPA_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FCPA_PORT")]
    pub port: Option<u16>,

    /// Seed Ardour session (defaults to the embedded empty session)
    #[arg(long, env = "FCPA_SEED")]
    pub seed: Option<PathBuf>,

    /// Config file (defaults to ~/.config/fcpa/config.toml)
    #[arg(long, env = "FCPA_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// FCP5 XML project to convert
    pub input: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Session sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<String>,

    /// Seed Ardour session (defaults to the embedded empty session)
    #[arg(long, env = "FCPA_SEED")]
    pub seed: Option<PathBuf>,

    /// Config file (defaults to ~/.config/fcpa/config.toml)
    #[arg(long, env = "FCPA_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Command {
    /// Config file named on the command line or in the environment
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Serve(args) => args.config.as_deref(),
            Command::Convert(args) => args.config.as_deref(),
        }
    }
}

/// Apply CLI overrides on top of the file config
pub fn apply_serve_overrides(config: &mut TomlConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(seed) = &args.seed {
        config.seed_path = Some(seed.clone());
    }
}

/// Run `convert`: read, convert, write to the output file or stdout
pub fn run_convert(args: &ConvertArgs, config: &TomlConfig) -> Result<()> {
    let seed_path = args.seed.as_deref().or(config.seed_path.as_deref());
    let seed = load_seed(seed_path).context("Failed to load seed session")?;

    let sample_rate = match &args.sample_rate {
        Some(text) => parse_sample_rate(text).map_err(|e| anyhow::anyhow!("{}", e))?,
        None => config.default_sample_rate,
    };

    let project = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let (session, report) = convert_text(&seed, &project, sample_rate)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, session)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} ({} routes, {} regions)", path.display(), report.routes, report.regions);
        }
        None => print!("{}", session),
    }
    Ok(())
}
