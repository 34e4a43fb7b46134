//! FCP5 → Ardour conversion
//!
//! Walks the first sequence of a project and reproduces its audio tracks in
//! a seed session: one route per (possibly merged) track, one region per
//! clip, one source per file channel.

use tracing::{debug, info};

use crate::ardour::SessionDocument;
use crate::fcp5::{Fcp5Project, TrackView};
use crate::{Error, Result};

/// Summary of one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Name of the converted sequence; `None` when the project had none
    pub sequence: Option<String>,
    pub routes: usize,
    pub regions: usize,
    /// Mono track pairs merged into stereo routes
    pub stereo_pairs: usize,
    /// Sequences after the first, which are not converted
    pub ignored_sequences: usize,
}

/// Convert `project` into `session`, returning the populated session
pub fn convert(project: &Fcp5Project<'_>, session: SessionDocument) -> Result<SessionDocument> {
    convert_with_report(project, session).map(|(session, _)| session)
}

/// Like [`convert`], also returning a [`ConversionReport`]
pub fn convert_with_report(
    project: &Fcp5Project<'_>,
    mut session: SessionDocument,
) -> Result<(SessionDocument, ConversionReport)> {
    let sequences = project.sequences();
    let mut report = ConversionReport::default();

    let Some(sequence) = sequences.first() else {
        info!("Project has no sequences, returning seed session unchanged");
        return Ok((session, report));
    };
    report.ignored_sequences = sequences.len() - 1;
    report.sequence = Some(sequence.name().to_string());

    let candidate = format!("{}.1", sequence.name());
    for track in sequence.tracks()? {
        let route = session.make_route(&candidate, track.channels());
        let playlist = session.playlist(route, None);
        if matches!(track, TrackView::Stereo { .. }) {
            report.stereo_pairs += 1;
        }

        for clip in track.clips() {
            session.set_frame_rate(clip.timebase() as f64).map_err(|e| match e {
                Error::Validation(msg) => {
                    Error::Validation(format!("Clip {:?}: {}", clip.name(), msg))
                }
                other => other,
            })?;

            let (origin, channels) = clip.source();
            let sources: Vec<_> = channels
                .iter()
                .map(|&channel| session.source(origin, channel))
                .collect();

            let region = session.make_region(
                playlist,
                clip.name(),
                clip.start(),
                clip.length(),
                clip.position(),
                &sources,
            );
            if !clip.envelope().is_empty() {
                session.set_envelope(region, clip.envelope());
            }
            report.regions += 1;
        }
        debug!("Converted track into route {:?}", session[route].name);
        report.routes += 1;
    }

    info!(
        "Converted sequence {:?}: {} routes ({} stereo), {} regions, {} sequences ignored",
        sequence.name(),
        report.routes,
        report.stereo_pairs,
        report.regions,
        report.ignored_sequences
    );
    Ok((session, report))
}
