//! Unit tests for stereo pairing

use super::*;
use crate::automation::Envelope;
use crate::timecode::Timecode;

fn clip(channel: u32) -> AudioClip {
    let mut envelope = Envelope::new();
    envelope.push(Timecode::new(0, 0, 0, 0), 1.0);
    envelope.push(Timecode::new(0, 0, 1, 0), 0.5);
    AudioClip {
        name: "take".to_string(),
        timebase: 30,
        start: Timecode::new(0, 0, 1, 0),
        length: Timecode::new(0, 0, 2, 0),
        position: Timecode::new(0, 0, 0, 0),
        origin: "/media/take.wav".to_string(),
        channel,
        envelope,
    }
}

fn track(index: usize, clips: Vec<AudioClip>) -> AudioTrack {
    AudioTrack { index, clips }
}

fn channel_counts(views: &[TrackView]) -> Vec<usize> {
    views.iter().map(TrackView::channels).collect()
}

#[test]
fn test_matching_tracks_merge() {
    let views = pair_tracks(vec![track(0, vec![clip(0)]), track(1, vec![clip(1)])]);
    assert_eq!(channel_counts(&views), vec![2]);
    match &views[0] {
        TrackView::Stereo { left, right } => {
            assert_eq!(left.index, 0);
            assert_eq!(right.index, 1);
        }
        other => panic!("expected stereo, got {:?}", other),
    }
}

#[test]
fn test_single_property_change_prevents_pairing() {
    let alterations: [(&str, fn(&mut AudioClip)); 6] = [
        ("start", |c: &mut AudioClip| c.start = Timecode::new(0, 0, 1, 1)),
        ("length", |c: &mut AudioClip| c.length = Timecode::new(0, 0, 2, 1)),
        ("position", |c: &mut AudioClip| c.position = Timecode::new(0, 0, 0, 1)),
        ("origin", |c: &mut AudioClip| c.origin = "/media/other.wav".to_string()),
        ("channel", |c: &mut AudioClip| c.channel = 0),
        ("envelope", |c: &mut AudioClip| {
            c.envelope.push(Timecode::new(0, 0, 2, 0), 0.25)
        }),
    ];

    for (property, alter) in alterations {
        let mut right = clip(1);
        alter(&mut right);
        let views = pair_tracks(vec![track(0, vec![clip(0)]), track(1, vec![right])]);
        assert_eq!(channel_counts(&views), vec![1, 1], "{}", property);
    }
}

#[test]
fn test_name_and_timebase_do_not_matter() {
    let mut right = clip(1);
    right.name = "take (R)".to_string();
    right.timebase = 25;
    let views = pair_tracks(vec![track(0, vec![clip(0)]), track(1, vec![right])]);
    assert_eq!(channel_counts(&views), vec![2]);
}

#[test]
fn test_left_must_be_channel_zero() {
    let views = pair_tracks(vec![track(0, vec![clip(1)]), track(1, vec![clip(1)])]);
    assert_eq!(channel_counts(&views), vec![1, 1]);
}

#[test]
fn test_clip_count_mismatch_prevents_pairing() {
    let views = pair_tracks(vec![
        track(0, vec![clip(0), clip(0)]),
        track(1, vec![clip(1)]),
    ]);
    assert_eq!(channel_counts(&views), vec![1, 1]);
}

#[test]
fn test_greedy_scan_never_merges_three() {
    // 0+1 pair; 2 is left over even though it would pair with 1
    let views = pair_tracks(vec![
        track(0, vec![clip(0)]),
        track(1, vec![clip(1)]),
        track(2, vec![clip(1)]),
    ]);
    assert_eq!(channel_counts(&views), vec![2, 1]);
}

#[test]
fn test_failed_pair_retries_from_next_track() {
    let views = pair_tracks(vec![
        track(0, vec![clip(1)]),
        track(1, vec![clip(0)]),
        track(2, vec![clip(1)]),
    ]);
    assert_eq!(channel_counts(&views), vec![1, 2]);
}

#[test]
fn test_only_the_altered_pair_is_split() {
    let mut broken = clip(1);
    broken.length = Timecode::new(0, 0, 3, 0);
    let views = pair_tracks(vec![
        track(0, vec![clip(0)]),
        track(1, vec![clip(1)]),
        track(2, vec![clip(0)]),
        track(3, vec![broken]),
    ]);
    assert_eq!(channel_counts(&views), vec![2, 1, 1]);
}

#[test]
fn test_empty_tracks_pair_vacuously() {
    let views = pair_tracks(vec![track(0, vec![]), track(1, vec![])]);
    assert_eq!(channel_counts(&views), vec![2]);
    assert!(views[0].clips().is_empty());
}

#[test]
fn test_single_track_stays_mono() {
    let views = pair_tracks(vec![track(0, vec![clip(0)])]);
    assert_eq!(channel_counts(&views), vec![1]);
    assert!(pair_tracks(Vec::new()).is_empty());
}
