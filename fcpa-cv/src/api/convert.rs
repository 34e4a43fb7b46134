//! Conversion endpoint
//!
//! `POST /` takes a multipart form with the FCP5 project in field `xml` and
//! an optional `sample-rate` field (also accepted as a query parameter). The
//! response body is the Ardour session text.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::{convert_text, AppState};
use fcpa_common::timecode::validate_sample_rate;

const PROJECT_FIELD: &str = "xml";
const SAMPLE_RATE_FIELD: &str = "sample-rate";

/// Query string of `POST /`
#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    #[serde(rename = "sample-rate")]
    pub sample_rate: Option<String>,
}

/// POST /
pub async fn convert_project(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut project: Option<String> = None;
    let mut sample_rate_field: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(PROJECT_FIELD) => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                project = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
            Some(SAMPLE_RATE_FIELD) => {
                sample_rate_field = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let project = project.ok_or_else(|| ApiError::BadRequest("Missing input file".to_string()))?;
    let sample_rate = match sample_rate_field.or(query.sample_rate) {
        Some(text) => parse_sample_rate(&text)?,
        None => state.default_sample_rate,
    };

    let seed = state.seed.clone();
    let (session, report) =
        tokio::task::spawn_blocking(move || convert_text(&seed, &project, sample_rate))
            .await
            .map_err(|e| ApiError::Internal(format!("Conversion task failed: {}", e)))??;

    info!(
        "Converted upload: {} routes, {} regions at {} Hz",
        report.routes, report.regions, sample_rate
    );
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        session,
    )
        .into_response())
}

/// Parse a requested sample rate, answering 400 for anything out of domain
pub fn parse_sample_rate(text: &str) -> ApiResult<u32> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid sample rate: {:?}", text)))?;
    validate_sample_rate(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_rate() {
        assert_eq!(parse_sample_rate("44100").unwrap(), 44_100);
        assert_eq!(parse_sample_rate(" 96000 ").unwrap(), 96_000);
        for bad in ["", "abc", "0", "-48000", "22050", "48000.5", "2000000"] {
            let err = parse_sample_rate(bad).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{:?}", bad);
        }
    }
}
