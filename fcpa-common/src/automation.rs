//! Gain automation envelopes
//!
//! An envelope is a list of `(time, gain)` points. Points read from a
//! timeline carry timecodes; the session converts them to samples when the
//! envelope is attached to a region.

use crate::timecode::TimePoint;

/// One automation keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    pub time: TimePoint,
    /// Linear gain factor (1.0 = unity)
    pub gain: f64,
}

/// Ordered gain keyframes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    points: Vec<EnvelopePoint>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: impl Into<TimePoint>, gain: f64) {
        self.points.push(EnvelopePoint {
            time: time.into(),
            gain,
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvelopePoint> {
        self.points.iter()
    }

    pub fn points(&self) -> &[EnvelopePoint] {
        &self.points
    }
}

impl FromIterator<EnvelopePoint> for Envelope {
    fn from_iter<I: IntoIterator<Item = EnvelopePoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
