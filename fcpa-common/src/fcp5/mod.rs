//! Final Cut Pro 5 (`xmeml` version 5) timeline reader
//!
//! The reader exposes a project's sequences, their audio tracks and the
//! clips on each track, resolving clip files to origin paths and extracting
//! gain envelopes. Adjacent mono tracks that carry the two halves of a
//! stereo recording can be merged into one stereo track view.
//!
//! ```text
//! <xmeml version="5">
//!   <sequence id="...">
//!     <name>...</name>
//!     <rate><timebase>30</timebase></rate>
//!     <media>
//!       <audio>
//!         <track>
//!           <clipitem>
//!             <name/> <rate/> <in/> <out/> <start/> <end/>
//!             <masterclipid/> <file id="..."><pathurl/></file>
//!             <sourcetrack><trackindex/></sourcetrack>
//!             <filter><effect>audiolevels ...</effect></filter>
//!           </clipitem>
//! ```

pub mod clip;
pub mod envelope;
pub mod pairing;
pub mod paths;
pub mod project;
pub mod sequence;

pub use clip::{AudioClip, ClipView, VirtualStereoClip};
pub use pairing::pair_tracks;
pub use project::Fcp5Project;
pub use sequence::{AudioTrack, Sequence, TrackView};

use roxmltree::Node;

/// First child element with the given tag name
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Child elements with the given tag name, in document order
pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Trimmed text of the named child
pub(crate) fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name).and_then(|c| c.text()).map(str::trim)
}

#[cfg(test)]
pub(crate) mod fixtures;
