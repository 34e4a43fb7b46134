//! # FCPA Common Library
//!
//! Conversion engine shared by the FCPA service and CLI:
//! - Timecode arithmetic and the broadcast frame-rate table
//! - Owned XML tree used for the destination session
//! - Ardour session document model (ids, names, sources, playlists, regions)
//! - FCP5 (`xmeml` version 5) timeline reader with stereo pairing
//! - Conversion orchestrator
//! - Configuration loading

pub mod ardour;
pub mod automation;
pub mod config;
pub mod convert;
pub mod error;
pub mod fcp5;
pub mod timecode;
pub mod xml;

pub use ardour::SessionDocument;
pub use automation::Envelope;
pub use convert::{convert, convert_with_report, ConversionReport};
pub use error::{Error, Result};
pub use fcp5::Fcp5Project;
pub use timecode::{FrameRate, TimePoint, Timecode};
