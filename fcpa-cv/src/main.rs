//! fcpa-cv - FCP5 XML to Ardour session conversion service
//!
//! Serves `POST /` (multipart upload → session text) plus status routes, or
//! converts a single file with `fcpa-cv convert`.

use anyhow::{Context, Result};
use clap::Parser;
use fcpa_common::config::TomlConfig;
use tracing::info;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use fcpa_cv::api::BuildInfo;
use fcpa_cv::cli::{self, Cli, Command};
use fcpa_cv::{build_router, load_seed, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let command = Cli::parse().into_command();
    let mut config = TomlConfig::resolve(command.config_path()).context("Failed to load config")?;

    init_tracing(&config.logging.level);

    info!("Starting FCPA converter (fcpa-cv) {}", BuildInfo::current());

    match command {
        Command::Convert(args) => cli::run_convert(&args, &config),
        Command::Serve(args) => {
            cli::apply_serve_overrides(&mut config, &args);
            serve(config).await
        }
    }
}

/// Log to stderr so `convert` can write the session to stdout
fn init_tracing(level: &str) {
    let directive: Directive = level
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

async fn serve(config: TomlConfig) -> Result<()> {
    let seed = load_seed(config.seed_path.as_deref()).context("Failed to load seed session")?;
    let state = AppState::from_config(&config, seed);
    info!("Seed session: {}", state.seed_origin);

    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_host(), config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("fcpa-cv listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
