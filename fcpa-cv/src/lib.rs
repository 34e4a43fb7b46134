//! fcpa-cv library - FCP5 to Ardour conversion service
//!
//! Shared by the HTTP server and the one-shot `convert` command.

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use fcpa_common::ardour::EMBEDDED_SEED;
use fcpa_common::config::{DEFAULT_MAX_UPLOAD_BYTES, TomlConfig};
use fcpa_common::timecode::DEFAULT_SAMPLE_RATE;
use fcpa_common::{ConversionReport, Fcp5Project, SessionDocument};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod error;

/// `seed_origin` of the session embedded in the library
pub const EMBEDDED_SEED_ORIGIN: &str = "embedded";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Seed session text, parsed afresh for every conversion
    pub seed: Arc<str>,
    /// Where the seed came from: `embedded` or its file path
    pub seed_origin: Arc<str>,
    /// Sample rate used when a request names none
    pub default_sample_rate: u32,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(seed: impl Into<Arc<str>>, default_sample_rate: u32, max_upload_bytes: usize) -> Self {
        Self {
            seed: seed.into(),
            seed_origin: EMBEDDED_SEED_ORIGIN.into(),
            default_sample_rate,
            max_upload_bytes,
        }
    }

    /// Record where the seed text was read from
    pub fn with_seed_origin(mut self, origin: impl Into<Arc<str>>) -> Self {
        self.seed_origin = origin.into();
        self
    }

    /// State from a loaded config and seed text
    pub fn from_config(config: &TomlConfig, seed: String) -> Self {
        let state = Self::new(seed, config.default_sample_rate, config.max_upload_bytes);
        match &config.seed_path {
            Some(path) => state.with_seed_origin(path.display().to_string()),
            None => state,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EMBEDDED_SEED, DEFAULT_SAMPLE_RATE, DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    let limit = state.max_upload_bytes;
    Router::new()
        .route("/", post(api::convert_project))
        .merge(api::status_routes())
        .with_state(state)
        // The multipart extractor's own 2 MB default is replaced by the
        // configured limit
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Read the seed session text, checking that it loads
///
/// `None` selects the empty session embedded in the library.
pub fn load_seed(path: Option<&Path>) -> fcpa_common::Result<String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            fcpa_common::Error::Seed(format!("Failed to read seed {}: {}", path.display(), e))
        })?,
        None => EMBEDDED_SEED.to_string(),
    };
    SessionDocument::load(&text)?;
    Ok(text)
}

/// Convert FCP5 project text into serialized Ardour session text
pub fn convert_text(
    seed: &str,
    project: &str,
    sample_rate: u32,
) -> fcpa_common::Result<(String, ConversionReport)> {
    let project = Fcp5Project::parse(project)?;
    let mut session = SessionDocument::load(seed)?;
    session.set_sample_rate(sample_rate as f64)?;
    let (session, report) = fcpa_common::convert_with_report(&project, session)?;
    Ok((session.to_string(), report))
}
