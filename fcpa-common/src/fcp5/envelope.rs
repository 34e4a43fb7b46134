//! Gain envelope extraction from the FCP "Audio Levels" filter

use roxmltree::Node;
use tracing::warn;

use super::clip::parse_number;
use super::{child, child_text, children};
use crate::automation::Envelope;
use crate::timecode::Timecode;
use crate::Result;

const LEVELS_EFFECT_ID: &str = "audiolevels";
const LEVELS_EFFECT_NAME: &str = "Audio Levels";
const LEVEL_PARAMETER_ID: &str = "level";

/// Keyframes of the clip's level parameter as `(timecode, gain)` points
///
/// Keyframe times are frame offsets at `timebase`; negative times clamp to
/// frame 0. A keyframe is kept only if its frame is strictly after the last
/// kept keyframe, so the result is strictly increasing. Clips without the
/// filter yield an empty envelope.
pub fn extract_envelope(clip: Node<'_, '_>, timebase: u32) -> Result<Envelope> {
    let mut envelope = Envelope::new();
    let Some(parameter) = level_parameter(clip) else {
        return Ok(envelope);
    };

    let context = child_text(clip, "name").unwrap_or_default();
    let mut last_kept: Option<u64> = None;
    for keyframe in children(parameter, "keyframe") {
        let (Some(when), Some(value)) = (child_text(keyframe, "when"), child_text(keyframe, "value"))
        else {
            warn!("Incomplete level keyframe in clip {:?}, ignoring", context);
            continue;
        };
        let when: i64 = parse_number(when, "when", context)?;
        let gain: f64 = parse_number(value, "value", context)?;

        let frames = u64::try_from(when).unwrap_or_else(|_| {
            warn!("Level keyframe at {} in clip {:?} clamped to 0", when, context);
            0
        });
        if let Some(last) = last_kept.filter(|&last| frames <= last) {
            warn!(
                "Dropping level keyframe at {} in clip {:?}: not after {}",
                when, context, last
            );
            continue;
        }
        last_kept = Some(frames);

        envelope.push(Timecode::from_frames(frames, timebase), gain);
    }
    Ok(envelope)
}

/// The `level` parameter of the first audio-levels effect on the clip
fn level_parameter<'a, 'input>(clip: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    children(clip, "filter")
        .filter_map(|filter| child(filter, "effect"))
        .find(|effect| {
            child_text(*effect, "effectid") == Some(LEVELS_EFFECT_ID)
                || child_text(*effect, "name") == Some(LEVELS_EFFECT_NAME)
        })
        .and_then(|effect| {
            children(effect, "parameter")
                .find(|p| child_text(*p, "parameterid") == Some(LEVEL_PARAMETER_ID))
        })
}
