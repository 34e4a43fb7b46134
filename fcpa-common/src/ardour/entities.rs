//! Typed session entities and the handles that address them
//!
//! Entities live in arenas owned by [`SessionDocument`](super::SessionDocument);
//! handles are plain indices, valid only for the document that issued them.

use std::collections::HashMap;

/// Index of a [`Route`] in its session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteHandle(pub(crate) usize);

/// Index of a [`Playlist`] in its session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaylistHandle(pub(crate) usize);

/// Index of a [`Source`] in its session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle(pub(crate) usize);

/// Index of a [`Region`] in its session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionHandle(pub(crate) usize);

/// Ids of the objects Ardour nests inside a track route
#[derive(Debug, Clone)]
pub struct RouteIoIds {
    pub input: String,
    pub output: String,
    pub diskstream: String,
}

/// A track strip in the session
#[derive(Debug, Clone)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub channels: usize,
    pub io: RouteIoIds,
    /// Playlists in creation order
    pub playlists: Vec<PlaylistHandle>,
    pub(crate) playlists_by_name: HashMap<String, PlaylistHandle>,
}

impl Route {
    pub(crate) fn new(id: String, name: String, channels: usize, io: RouteIoIds) -> Self {
        Self {
            id,
            name,
            channels,
            io,
            playlists: Vec::new(),
            playlists_by_name: HashMap::new(),
        }
    }

    /// Name of the playlist created when none is given
    pub fn default_playlist_name(&self) -> String {
        format!("{}.1", self.name)
    }

    pub fn playlist_named(&self, name: &str) -> Option<PlaylistHandle> {
        self.playlists_by_name.get(name).copied()
    }
}

/// Ordered regions belonging to one route
#[derive(Debug, Clone)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub route: RouteHandle,
    pub regions: Vec<RegionHandle>,
}

/// One channel of an external audio file
#[derive(Debug, Clone)]
pub struct Source {
    pub id: String,
    pub origin: String,
    pub channel: u32,
    /// Basename of `origin`
    pub name: String,
    /// Already present in the seed document (not written again)
    pub(crate) seeded: bool,
}

impl Source {
    /// Registry key: `origin + "." + channel`
    pub fn key(origin: &str, channel: u32) -> String {
        format!("{}.{}", origin, channel)
    }
}

/// A time-positioned slice of one or more sources
///
/// All times are sample counts at the session sample rate.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: String,
    pub name: String,
    /// Offset into the sources
    pub start: u64,
    pub length: u64,
    /// Position on the playlist timeline
    pub position: u64,
    /// Bound source per channel slot
    pub sources: Vec<SourceHandle>,
    /// Gain envelope as `(sample offset, gain)` points
    pub envelope: Option<Vec<(u64, f64)>>,
}

impl Region {
    pub fn channels(&self) -> usize {
        self.sources.len()
    }
}
