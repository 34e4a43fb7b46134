//! Stereo pairing of adjacent mono tracks
//!
//! Editors often carry a stereo recording as two mono tracks, one per
//! channel, with identical edits. [`pair_tracks`] scans the tracks left to
//! right and merges each such neighbour pair into one stereo track. Pairing
//! is greedy and never merges more than two tracks.

use tracing::debug;

use super::clip::AudioClip;
use super::sequence::{AudioTrack, TrackView};

/// Merge matching neighbour tracks in a single forward scan
pub fn pair_tracks(tracks: Vec<AudioTrack>) -> Vec<TrackView> {
    let mut merged = Vec::with_capacity(tracks.len());
    let mut iter = tracks.into_iter().peekable();

    while let Some(left) = iter.next() {
        if let Some(right) = iter.next_if(|right| tracks_pair(&left, right)) {
            debug!(
                "Merging audio tracks {} and {} into a stereo track",
                left.index + 1,
                right.index + 1
            );
            merged.push(TrackView::Stereo { left, right });
        } else {
            merged.push(TrackView::Mono(left));
        }
    }
    merged
}

/// Whether two mono tracks carry the left and right halves of the same clips
pub fn tracks_pair(left: &AudioTrack, right: &AudioTrack) -> bool {
    left.clips.len() == right.clips.len()
        && left
            .clips
            .iter()
            .zip(&right.clips)
            .all(|(l, r)| clips_pair(l, r))
}

/// Whether two clips are the left and right channel of one stereo clip
pub fn clips_pair(left: &AudioClip, right: &AudioClip) -> bool {
    left.start == right.start
        && left.length == right.length
        && left.position == right.position
        && left.envelope == right.envelope
        && left.origin == right.origin
        && left.channel == 0
        && right.channel == 1
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod tests;
