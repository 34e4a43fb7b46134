//! Sequences and their audio tracks

use roxmltree::Node;
use tracing::debug;

use super::clip::{rate_timebase, AudioClip, ClipView, VirtualStereoClip};
use super::pairing::pair_tracks;
use super::project::Fcp5Project;
use super::{child, child_text, children};
use crate::Result;

/// View of one `<sequence>` element
#[derive(Clone, Copy)]
pub struct Sequence<'a, 'input> {
    project: &'a Fcp5Project<'input>,
    node: Node<'a, 'input>,
}

impl<'a, 'input> Sequence<'a, 'input> {
    pub(crate) fn new(project: &'a Fcp5Project<'input>, node: Node<'a, 'input>) -> Self {
        Self { project, node }
    }

    pub fn id(&self) -> Option<&'a str> {
        self.node.attribute("id")
    }

    pub fn name(&self) -> &'a str {
        child_text(self.node, "name").unwrap_or_default()
    }

    /// Audio tracks (`media/audio/track`) in document order, one channel each
    pub fn audio_tracks(&self) -> Result<Vec<AudioTrack>> {
        let fallback = rate_timebase(self.node)?;
        let Some(audio) = child(self.node, "media").and_then(|m| child(m, "audio")) else {
            return Ok(Vec::new());
        };

        let mut tracks = Vec::new();
        for (index, track) in children(audio, "track").enumerate() {
            let mut clips = Vec::new();
            for item in children(track, "clipitem") {
                if let Some(clip) = AudioClip::from_node(self.project, item, fallback)? {
                    clips.push(clip);
                }
            }
            debug!(
                "Sequence {:?} audio track {}: {} clips",
                self.name(),
                index + 1,
                clips.len()
            );
            tracks.push(AudioTrack { index, clips });
        }
        Ok(tracks)
    }

    /// Audio tracks with stereo pairs merged
    pub fn tracks(&self) -> Result<Vec<TrackView>> {
        Ok(pair_tracks(self.audio_tracks()?))
    }
}

/// A mono audio track
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    /// Zero-based position among the sequence's audio tracks
    pub index: usize,
    pub clips: Vec<AudioClip>,
}

/// A track as handed to the converter
#[derive(Debug, Clone, PartialEq)]
pub enum TrackView {
    Mono(AudioTrack),
    /// Adjacent tracks merged into one stereo track
    Stereo { left: AudioTrack, right: AudioTrack },
}

impl TrackView {
    pub fn channels(&self) -> usize {
        match self {
            TrackView::Mono(_) => 1,
            TrackView::Stereo { .. } => 2,
        }
    }

    pub fn clips(&self) -> Vec<ClipView> {
        match self {
            TrackView::Mono(track) => track.clips.iter().cloned().map(ClipView::Mono).collect(),
            TrackView::Stereo { left, right } => left
                .clips
                .iter()
                .zip(&right.clips)
                .map(|(l, r)| {
                    ClipView::Stereo(VirtualStereoClip {
                        left: l.clone(),
                        right: r.clone(),
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fcp5::fixtures;

    #[test]
    fn test_reads_tracks_in_order() {
        let text = fixtures::stereo_pair_and_mono();
        let project = Fcp5Project::parse(&text).unwrap();
        let seq = project.first_sequence().unwrap();
        assert_eq!(seq.id(), Some("seq-1"));
        assert_eq!(seq.name(), "Seq");

        let tracks = seq.audio_tracks().unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks.iter().map(|t| t.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(tracks[1].clips[0].channel, 1);
    }

    #[test]
    fn test_video_tracks_ignored() {
        let text = fixtures::project(&[fixtures::sequence("s", "S", &[])]);
        let project = Fcp5Project::parse(&text).unwrap();
        assert!(project.first_sequence().unwrap().audio_tracks().unwrap().is_empty());
    }

    #[test]
    fn test_merged_view() {
        let text = fixtures::stereo_pair_and_mono();
        let project = Fcp5Project::parse(&text).unwrap();
        let tracks = project.first_sequence().unwrap().tracks().unwrap();
        assert_eq!(tracks.iter().map(TrackView::channels).collect::<Vec<_>>(), vec![2, 1]);

        let clips = tracks[0].clips();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].source(), ("/media/take.wav", vec![0, 1]));
    }
}
