//! Audio clips read from FCP5 `clipitem` elements

use roxmltree::Node;
use tracing::warn;

use super::envelope::extract_envelope;
use super::project::Fcp5Project;
use super::{child, child_text};
use crate::automation::Envelope;
use crate::timecode::Timecode;
use crate::{Error, Result};

/// One mono clip on an audio track
///
/// Timing is kept as timecodes at the clip's own timebase:
/// `start` is the source in-point, `position` the timeline start and
/// `length` the timeline duration.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub name: String,
    /// Integer frames per second from `<rate><timebase>`
    pub timebase: u32,
    pub start: Timecode,
    pub length: Timecode,
    pub position: Timecode,
    /// Resolved path of the clip's media file
    pub origin: String,
    /// Zero-based channel within the media file
    pub channel: u32,
    pub envelope: Envelope,
}

impl AudioClip {
    /// Read a `clipitem`; `None` when its media file cannot be resolved
    ///
    /// `fallback_timebase` is the sequence rate, used when the clip has no
    /// rate of its own.
    pub(crate) fn from_node(
        project: &Fcp5Project<'_>,
        node: Node<'_, '_>,
        fallback_timebase: Option<u32>,
    ) -> Result<Option<Self>> {
        let name = child_text(node, "name").unwrap_or_default().to_string();

        let timebase = match rate_timebase(node)? {
            Some(tb) => tb,
            None => fallback_timebase.ok_or_else(|| {
                Error::InvalidInput(format!("Clip {:?} has no frame rate", name))
            })?,
        };

        let in_point = frames_field(node, "in", &name)?;
        let start = frames_field(node, "start", &name)?;
        let end = frames_field(node, "end", &name)?;
        let length = end.saturating_sub(start);

        let Some(origin) = clip_origin(project, node) else {
            warn!("Clip {:?} references an unknown file, skipping", name);
            return Ok(None);
        };

        let trackindex = match child(node, "sourcetrack").and_then(|s| child_text(s, "trackindex")) {
            Some(text) => parse_number::<i64>(text, "trackindex", &name)?,
            None => 1,
        };
        let channel = u32::try_from(trackindex.saturating_sub(1).max(0)).unwrap_or(u32::MAX);

        let envelope = extract_envelope(node, timebase)?;

        Ok(Some(Self {
            timebase,
            start: Timecode::from_frames(in_point, timebase),
            length: Timecode::from_frames(length, timebase),
            position: Timecode::from_frames(start, timebase),
            origin,
            channel,
            envelope,
            name,
        }))
    }
}

/// Two mono clips presented as one stereo clip
///
/// Name, timing, frame rate and envelope come from the left clip.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualStereoClip {
    pub left: AudioClip,
    pub right: AudioClip,
}

/// A clip as handed to the converter
#[derive(Debug, Clone, PartialEq)]
pub enum ClipView {
    Mono(AudioClip),
    Stereo(VirtualStereoClip),
}

impl ClipView {
    fn lead(&self) -> &AudioClip {
        match self {
            ClipView::Mono(clip) => clip,
            ClipView::Stereo(pair) => &pair.left,
        }
    }

    pub fn name(&self) -> &str {
        &self.lead().name
    }

    pub fn timebase(&self) -> u32 {
        self.lead().timebase
    }

    pub fn start(&self) -> Timecode {
        self.lead().start
    }

    pub fn length(&self) -> Timecode {
        self.lead().length
    }

    pub fn position(&self) -> Timecode {
        self.lead().position
    }

    pub fn envelope(&self) -> &Envelope {
        &self.lead().envelope
    }

    /// Origin path and the file channels this clip plays, in slot order
    pub fn source(&self) -> (&str, Vec<u32>) {
        match self {
            ClipView::Mono(clip) => (&clip.origin, vec![clip.channel]),
            ClipView::Stereo(pair) => (&pair.left.origin, vec![pair.left.channel, pair.right.channel]),
        }
    }
}

// ============================================================================
// Field Parsing
// ============================================================================

/// Integer timebase of the element's `<rate>`, if it has one
pub(crate) fn rate_timebase(node: Node<'_, '_>) -> Result<Option<u32>> {
    match child(node, "rate").and_then(|r| child_text(r, "timebase")) {
        Some(text) => Ok(Some(parse_number(text, "timebase", "rate")?)),
        None => Ok(None),
    }
}

/// Frame count field; exporters write `-1` as a placeholder, read as 0
fn frames_field(node: Node<'_, '_>, field: &str, clip: &str) -> Result<u64> {
    let text = child_text(node, field)
        .ok_or_else(|| Error::InvalidInput(format!("Clip {:?} has no <{}>", clip, field)))?;
    let value: i64 = parse_number(text, field, clip)?;
    if value < 0 {
        warn!("Clip {:?} has negative <{}> ({}), using 0", clip, field, value);
        return Ok(0);
    }
    Ok(value as u64)
}

pub(crate) fn parse_number<T: std::str::FromStr>(text: &str, field: &str, context: &str) -> Result<T> {
    text.trim().parse().map_err(|_| {
        Error::InvalidInput(format!(
            "Non-numeric <{}> in {:?}: {:?}",
            field, context, text
        ))
    })
}

/// Resolve the clip's own `<file id>`, then its `masterclipid`
fn clip_origin(project: &Fcp5Project<'_>, node: Node<'_, '_>) -> Option<String> {
    let by_file = child(node, "file")
        .and_then(|f| f.attribute("id"))
        .and_then(|id| project.file_origin(id));
    let by_master = || child_text(node, "masterclipid").and_then(|id| project.file_origin(id));
    by_file.or_else(by_master).map(str::to_string)
}
