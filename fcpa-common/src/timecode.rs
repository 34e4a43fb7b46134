//! Timecode arithmetic for sample-accurate session timing
//!
//! FCP5 stores clip timing as integer frame counts at the clip's timebase.
//! Ardour stores region timing as sample counts at the session sample rate.
//! This module bridges the two through a human-readable [`Timecode`]:
//!
//! ```text
//! FCP5 frames ──Timecode::from_frames()──→ HH:MM:SS.FF
//!                                              │
//!                  timecode_to_samples(frame rate, sample rate)
//!                                              ↓
//!                                     Ardour sample count
//! ```
//!
//! # Frame rates
//!
//! Broadcast frame rates are a closed set ([`FrameRate`]) so every
//! conversion can be carried out with exact rational arithmetic. Each rate
//! has a named Ardour `timecode-format` tag. The tag table is not a perfect
//! bijection:
//!
//! | Tag              | Rate   | Reverse tag for the rate |
//! |------------------|--------|--------------------------|
//! | `timecode_23976` | 23.976 | `timecode_23976`         |
//! | `timecode_24`    | 24     | `timecode_24`            |
//! | `timecode_24975` | 24     | (forward only)           |
//! | `timecode_24976` | 24.975 | `timecode_24976`         |
//! | `timecode_25`    | 25     | `timecode_25`            |
//! | `timecode_2997`  | 29.97  | `timecode_2997`          |
//! | `timecode_30`    | 30     | `timecode_30`            |
//! | `timecode_5994`  | 59.94  | `timecode_5994`          |
//! | `timecode_60`    | 60     | `timecode_60`            |
//!
//! The 24.975 rows follow the convention of existing session files and are
//! kept as-is.
//!
//! # Sample conversion
//!
//! ```text
//! frames_total = (hours × 3600 + minutes × 60 + seconds) × rate + frames
//! samples      = sample_rate × frames_total ÷ rate
//! ```
//!
//! The whole-second part is exact for every rate. The frame part is rounded
//! to the nearest sample (half rounds up).
//!
//! # Examples
//!
//! ```rust
//! use fcpa_common::timecode::{timecode_to_samples, FrameRate, Timecode};
//!
//! let tc: Timecode = "00:00:01.15".parse().unwrap();
//! assert_eq!(timecode_to_samples(tc, FrameRate::Fps30, 48000), 72_000);
//!
//! // Colon and dot frame separators are equivalent
//! let same: Timecode = "00:00:01:15".parse().unwrap();
//! assert_eq!(tc, same);
//! assert_eq!(tc, Timecode::new(0, 0, 1, 15));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Sample rate used when neither the seed session nor the caller sets one
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Highest sample rate accepted by [`validate_sample_rate`]
pub const MAX_SAMPLE_RATE: u32 = 1_000_000;

/// Sample rate families; a valid rate is a multiple of one of them
pub const SAMPLE_RATE_BASES: [u32; 2] = [44_100, 48_000];

const FPS_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Frame Rates
// ============================================================================

/// Broadcast frame rates understood by the session model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRate {
    Fps23_976,
    Fps24,
    Fps24_975,
    Fps25,
    Fps29_97,
    Fps30,
    Fps59_94,
    Fps60,
}

/// Forward table: Ardour `timecode-format` tag → frame rate
///
/// `timecode_24975` is accepted as a rounding of 24.
pub const TIMECODE_FORMATS: [(&str, FrameRate); 9] = [
    ("timecode_23976", FrameRate::Fps23_976),
    ("timecode_24", FrameRate::Fps24),
    ("timecode_24975", FrameRate::Fps24),
    ("timecode_24976", FrameRate::Fps24_975),
    ("timecode_25", FrameRate::Fps25),
    ("timecode_2997", FrameRate::Fps29_97),
    ("timecode_30", FrameRate::Fps30),
    ("timecode_5994", FrameRate::Fps59_94),
    ("timecode_60", FrameRate::Fps60),
];

impl FrameRate {
    /// Every supported rate, slowest first
    pub const ALL: [FrameRate; 8] = [
        FrameRate::Fps23_976,
        FrameRate::Fps24,
        FrameRate::Fps24_975,
        FrameRate::Fps25,
        FrameRate::Fps29_97,
        FrameRate::Fps30,
        FrameRate::Fps59_94,
        FrameRate::Fps60,
    ];

    /// Exact rate as `(numerator, denominator)` frames per second
    pub fn ratio(self) -> (u64, u64) {
        match self {
            FrameRate::Fps23_976 => (23_976, 1000),
            FrameRate::Fps24 => (24, 1),
            FrameRate::Fps24_975 => (24_975, 1000),
            FrameRate::Fps25 => (25, 1),
            FrameRate::Fps29_97 => (2997, 100),
            FrameRate::Fps30 => (30, 1),
            FrameRate::Fps59_94 => (5994, 100),
            FrameRate::Fps60 => (60, 1),
        }
    }

    /// Rate as a floating point number of frames per second
    pub fn fps(self) -> f64 {
        let (num, den) = self.ratio();
        num as f64 / den as f64
    }

    /// Look up a numeric rate, failing for anything outside the table
    pub fn from_fps(fps: f64) -> Result<FrameRate> {
        FrameRate::ALL
            .into_iter()
            .find(|rate| (rate.fps() - fps).abs() < FPS_TOLERANCE)
            .ok_or_else(|| Error::Validation(format!("Unsupported frame rate: {}", fps)))
    }

    /// Forward lookup of an Ardour `timecode-format` tag
    pub fn from_tag(tag: &str) -> Option<FrameRate> {
        TIMECODE_FORMATS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, rate)| *rate)
    }

    /// Reverse lookup: the tag written for this rate
    ///
    /// 24.975 is written as `timecode_24976`.
    pub fn tag(self) -> &'static str {
        match self {
            FrameRate::Fps23_976 => "timecode_23976",
            FrameRate::Fps24 => "timecode_24",
            FrameRate::Fps24_975 => "timecode_24976",
            FrameRate::Fps25 => "timecode_25",
            FrameRate::Fps29_97 => "timecode_2997",
            FrameRate::Fps30 => "timecode_30",
            FrameRate::Fps59_94 => "timecode_5994",
            FrameRate::Fps60 => "timecode_60",
        }
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fps())
    }
}

// ============================================================================
// Timecode
// ============================================================================

/// `HH:MM:SS.FF` position relative to a frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Timecode {
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            frames,
        }
    }

    /// Split a raw frame count at an integer timebase into a timecode
    ///
    /// A zero timebase yields the zero timecode. Counts past `u32::MAX`
    /// hours saturate at the last frame of that hour.
    ///
    /// ```rust
    /// use fcpa_common::timecode::Timecode;
    ///
    /// assert_eq!(Timecode::from_frames(45, 30).to_string(), "00:00:01.15");
    /// assert_eq!(Timecode::from_frames(108_000 + 1, 30).to_string(), "01:00:00.01");
    /// ```
    pub fn from_frames(total_frames: u64, timebase: u32) -> Self {
        if timebase == 0 {
            return Self::default();
        }
        let fps = timebase as u64;
        let Ok(hours) = u32::try_from(total_frames / (3600 * fps)) else {
            return Self::new(u32::MAX, 59, 59, timebase - 1);
        };
        let rest = total_frames % (3600 * fps);
        let minutes = rest / (60 * fps);
        let rest = rest % (60 * fps);

        Self {
            hours,
            minutes: minutes as u32,
            seconds: (rest / fps) as u32,
            frames: (rest % fps) as u32,
        }
    }

    /// Whole seconds before the frame component
    pub fn whole_seconds(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

impl FromStr for Timecode {
    type Err = Error;

    /// Parse `HH:MM:SS:FF` or `HH:MM:SS.FF`
    ///
    /// Hours take two or more digits; the other fields exactly two. Signs
    /// and whitespace are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("Malformed timecode: {:?}", s));

        let (clock, frames) = match s.rfind(['.', ':']) {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => return Err(invalid()),
        };
        let mut fields = clock.split(':');
        let (hours, minutes, seconds) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(h), Some(m), Some(sec), None) => (h, m, sec),
            _ => return Err(invalid()),
        };

        let digits = |field: &str, min_len: usize, max_len: usize| -> Result<u32> {
            if field.len() < min_len
                || field.len() > max_len
                || !field.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(invalid());
            }
            field.parse::<u32>().map_err(|_| invalid())
        };

        Ok(Timecode {
            hours: digits(hours, 2, 9)?,
            minutes: digits(minutes, 2, 2)?,
            seconds: digits(seconds, 2, 2)?,
            frames: digits(frames, 2, 2)?,
        })
    }
}

// ============================================================================
// Time Points
// ============================================================================

/// A session-model time argument: a ready sample count or a timecode still
/// to be converted at the session's current rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePoint {
    Samples(u64),
    Timecode(Timecode),
}

impl From<u64> for TimePoint {
    fn from(samples: u64) -> Self {
        TimePoint::Samples(samples)
    }
}

impl From<Timecode> for TimePoint {
    fn from(tc: Timecode) -> Self {
        TimePoint::Timecode(tc)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePoint::Samples(n) => write!(f, "{}", n),
            TimePoint::Timecode(tc) => write!(f, "{}", tc),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Convert a timecode to a sample count
///
/// Computes `sample_rate × frames_total ÷ rate` exactly, rounding the
/// frame component to the nearest sample.
///
/// ```rust
/// use fcpa_common::timecode::{timecode_to_samples, FrameRate, Timecode};
///
/// assert_eq!(timecode_to_samples(Timecode::new(0, 0, 0, 15), FrameRate::Fps30, 48000), 24_000);
/// assert_eq!(timecode_to_samples(Timecode::new(0, 0, 1, 0), FrameRate::Fps29_97, 48000), 48_000);
/// ```
pub fn timecode_to_samples(tc: Timecode, frame_rate: FrameRate, sample_rate: u32) -> u64 {
    let (num, den) = frame_rate.ratio();
    let sample_rate = sample_rate as u64;

    let whole = tc.whole_seconds() * sample_rate;
    let partial = (2 * sample_rate * tc.frames as u64 * den + num) / (2 * num);
    whole + partial
}

/// Validate a requested session sample rate
///
/// Accepts integral values in `(0, 1_000_000]` that are a multiple of
/// 44100 or 48000.
///
/// ```rust
/// use fcpa_common::timecode::validate_sample_rate;
///
/// assert_eq!(validate_sample_rate(96000.0).unwrap(), 96_000);
/// assert!(validate_sample_rate(22050.0).is_err());
/// ```
pub fn validate_sample_rate(value: f64) -> Result<u32> {
    let reject = |reason: &str| Error::Validation(format!("Invalid sample rate {}: {}", value, reason));

    if !value.is_finite() || value.fract() != 0.0 {
        return Err(reject("must be an integer"));
    }
    if value <= 0.0 || value > MAX_SAMPLE_RATE as f64 {
        return Err(reject("out of range"));
    }
    let rate = value as u32;
    if !SAMPLE_RATE_BASES.iter().any(|base| rate % base == 0) {
        return Err(reject("not a multiple of 44100 or 48000"));
    }
    Ok(rate)
}

// ============================================================================
// Tests Module
// ============================================================================

#[cfg(test)]
#[path = "timecode_tests.rs"]
mod tests;
