//! Ardour session document
//!
//! [`SessionDocument`] wraps a seed session (an empty Ardour project supplying
//! the default containers) and adds typed routes, playlists, sources and
//! regions to it. Everything the seed already contains is preserved; ids and
//! route names found there are reserved so nothing created later collides.
//!
//! # Rates
//!
//! The document carries one sample rate and one frame rate. Timecode
//! arguments to [`SessionDocument::make_region`] are converted with the rates
//! current at call time, so a caller that switches frame rate between clips
//! gets each clip converted at the rate it set last.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::path::Path;

use tracing::debug;

use super::entities::{
    Playlist, PlaylistHandle, Region, RegionHandle, Route, RouteHandle, RouteIoIds, Source,
    SourceHandle,
};
use super::ids::IdAllocator;
use super::naming::RouteNamer;
use super::templates::{self, RouteContext};
use crate::automation::Envelope;
use crate::timecode::{
    self, timecode_to_samples, FrameRate, TimePoint, Timecode, DEFAULT_SAMPLE_RATE,
};
use crate::xml::{self, Element};
use crate::{Error, Result};

/// Empty Ardour session used when no seed file is configured
pub const EMBEDDED_SEED: &str = include_str!("../../assets/empty.ardour");

/// Frame rate assumed when the seed has no `timecode-format` option
pub const DEFAULT_FRAME_RATE: FrameRate = FrameRate::Fps30;

const TIMECODE_FORMAT_OPTION: &str = "timecode-format";
const MASTER_BUS: &str = "Master";

/// Destination session under construction
#[derive(Debug, Clone)]
pub struct SessionDocument {
    tree: Element,
    ids: IdAllocator,
    route_names: RouteNamer,
    sample_rate: u32,
    frame_rate: FrameRate,
    master: Option<String>,
    routes: Vec<Route>,
    playlists: Vec<Playlist>,
    sources: Vec<Source>,
    source_keys: HashMap<String, SourceHandle>,
    regions: Vec<Region>,
}

impl SessionDocument {
    /// Load a seed session from its XML text
    pub fn load(seed: &str) -> Result<Self> {
        let tree =
            xml::parse(seed).map_err(|e| Error::Seed(format!("Seed session is not valid XML: {}", e)))?;
        if tree.name != "Session" {
            return Err(Error::Seed(format!(
                "Seed root element must be <Session>, found <{}>",
                tree.name
            )));
        }

        let mut ids = IdAllocator::new();
        for id in tree.descendants().filter_map(|e| e.attr("id")) {
            ids.register(id);
        }

        let sample_rate = match tree.attr("sample-rate") {
            Some(text) => {
                let value: f64 = text
                    .trim()
                    .parse()
                    .map_err(|_| Error::Seed(format!("Seed sample-rate is not a number: {:?}", text)))?;
                timecode::validate_sample_rate(value).map_err(|e| Error::Seed(e.to_string()))?
            }
            None => DEFAULT_SAMPLE_RATE,
        };

        let frame_rate = match timecode_format_option(&tree) {
            Some(tag) => FrameRate::from_tag(tag)
                .ok_or_else(|| Error::Seed(format!("Unknown seed timecode format: {:?}", tag)))?,
            None => DEFAULT_FRAME_RATE,
        };

        let mut route_names = RouteNamer::new();
        let mut master = None;
        if let Some(routes) = tree.child("Routes") {
            for name in routes.elements().filter_map(|r| r.attr("name")) {
                route_names.reserve(name);
                if name == MASTER_BUS {
                    master = Some(name.to_string());
                }
            }
        }

        let mut doc = Self {
            tree,
            ids,
            route_names,
            sample_rate,
            frame_rate,
            master,
            routes: Vec::new(),
            playlists: Vec::new(),
            sources: Vec::new(),
            source_keys: HashMap::new(),
            regions: Vec::new(),
        };
        doc.discover_seed_sources();

        debug!(
            "Loaded seed session: {} ids, sample rate {}, frame rate {}",
            doc.ids.len(),
            doc.sample_rate,
            doc.frame_rate
        );
        Ok(doc)
    }

    /// Load the session embedded in the library
    pub fn load_embedded() -> Result<Self> {
        Self::load(EMBEDDED_SEED)
    }

    /// Load a seed session from a file
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::load(&text)
    }

    /// Register seed sources so `source()` returns them instead of duplicates
    fn discover_seed_sources(&mut self) {
        let found: Vec<(String, String, u32)> = match self.tree.child("Sources") {
            Some(sources) => sources
                .elements()
                .filter_map(|s| {
                    let id = s.attr("id")?;
                    let origin = s.attr("origin")?;
                    let channel = s.attr("channel").unwrap_or("0").parse().ok()?;
                    Some((id.to_string(), origin.to_string(), channel))
                })
                .collect(),
            None => Vec::new(),
        };

        for (id, origin, channel) in found {
            let key = Source::key(&origin, channel);
            if self.source_keys.contains_key(&key) {
                continue;
            }
            let handle = SourceHandle(self.sources.len());
            self.sources.push(Source {
                id,
                name: basename(&origin),
                origin,
                channel,
                seeded: true,
            });
            self.source_keys.insert(key, handle);
        }
    }

    // ========================================================================
    // Identity and Naming
    // ========================================================================

    /// Issue a fresh session-unique id
    pub fn new_id(&mut self) -> String {
        self.ids.new_id()
    }

    /// Reserve a unique route name derived from `candidate`
    pub fn make_route_name(&mut self, candidate: &str) -> String {
        self.route_names.make_route_name(candidate)
    }

    // ========================================================================
    // Factories
    // ========================================================================

    /// Create an audio track route named after `candidate`
    pub fn make_route(&mut self, candidate: &str, channels: usize) -> RouteHandle {
        let name = self.make_route_name(candidate);
        let id = self.new_id();
        let io = RouteIoIds {
            input: self.new_id(),
            output: self.new_id(),
            diskstream: self.new_id(),
        };
        debug!("Created route {:?} (id {}, {} channels)", name, id, channels);

        let handle = RouteHandle(self.routes.len());
        self.routes.push(Route::new(id, name, channels, io));
        handle
    }

    /// Find or create a playlist on `route`; `None` means the default name
    pub fn playlist(&mut self, route: RouteHandle, name: Option<&str>) -> PlaylistHandle {
        let name = match name {
            Some(name) => name.to_string(),
            None => self[route].default_playlist_name(),
        };
        if let Some(existing) = self[route].playlist_named(&name) {
            return existing;
        }

        let id = self.new_id();
        debug!("Created playlist {:?} (id {})", name, id);
        let handle = PlaylistHandle(self.playlists.len());
        self.playlists.push(Playlist {
            id,
            name: name.clone(),
            route,
            regions: Vec::new(),
        });

        let owner = &mut self.routes[route.0];
        owner.playlists.push(handle);
        owner.playlists_by_name.insert(name, handle);
        handle
    }

    /// Find or create the source for one channel of `origin`
    pub fn source(&mut self, origin: &str, channel: u32) -> SourceHandle {
        let key = Source::key(origin, channel);
        if let Some(existing) = self.source_keys.get(&key) {
            return *existing;
        }

        let id = self.new_id();
        debug!("Created source {} (id {})", key, id);
        let handle = SourceHandle(self.sources.len());
        self.sources.push(Source {
            id,
            origin: origin.to_string(),
            channel,
            name: basename(origin),
            seeded: false,
        });
        self.source_keys.insert(key, handle);
        handle
    }

    /// Append a region to `playlist`, one channel slot per source
    pub fn make_region(
        &mut self,
        playlist: PlaylistHandle,
        name: &str,
        start: impl Into<TimePoint>,
        length: impl Into<TimePoint>,
        position: impl Into<TimePoint>,
        sources: &[SourceHandle],
    ) -> RegionHandle {
        let region = Region {
            id: self.new_id(),
            name: name.to_string(),
            start: self.to_samples(start.into()),
            length: self.to_samples(length.into()),
            position: self.to_samples(position.into()),
            sources: sources.to_vec(),
            envelope: None,
        };
        debug!(
            "Created region {:?} (id {}) start={} length={} position={}",
            region.name, region.id, region.start, region.length, region.position
        );

        let handle = RegionHandle(self.regions.len());
        self.regions.push(region);
        self.playlists[playlist.0].regions.push(handle);
        handle
    }

    /// Attach a gain envelope, converting its times at the current rates
    pub fn set_envelope(&mut self, region: RegionHandle, envelope: &Envelope) {
        let points: Vec<(u64, f64)> = envelope
            .iter()
            .map(|p| (self.to_samples(p.time), p.gain))
            .collect();
        self.regions[region.0].envelope = Some(points);
    }

    // ========================================================================
    // Rates and Conversion
    // ========================================================================

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Set the sample rate; out-of-domain values leave it unchanged
    pub fn set_sample_rate(&mut self, value: f64) -> Result<()> {
        self.sample_rate = timecode::validate_sample_rate(value)?;
        Ok(())
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Set the frame rate from a numeric rate in the broadcast table
    pub fn set_frame_rate(&mut self, fps: f64) -> Result<()> {
        self.frame_rate = FrameRate::from_fps(fps)?;
        Ok(())
    }

    /// Ardour tag for the current frame rate
    pub fn timecode_format(&self) -> &'static str {
        self.frame_rate.tag()
    }

    pub fn timecode_to_samples(&self, tc: Timecode) -> u64 {
        timecode_to_samples(tc, self.frame_rate, self.sample_rate)
    }

    pub fn to_samples(&self, time: TimePoint) -> u64 {
        match time {
            TimePoint::Samples(n) => n,
            TimePoint::Timecode(tc) => self.timecode_to_samples(tc),
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Routes created on this document, in creation order
    pub fn routes(&self) -> impl Iterator<Item = (RouteHandle, &Route)> {
        self.routes.iter().enumerate().map(|(i, r)| (RouteHandle(i), r))
    }

    /// Sources known to this document, seed sources first
    pub fn sources(&self) -> impl Iterator<Item = (SourceHandle, &Source)> {
        self.sources.iter().enumerate().map(|(i, s)| (SourceHandle(i), s))
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Whether `id` has been issued or discovered
    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Seed tree with every created entity attached
    pub fn to_element(&self) -> Element {
        let mut root = self.tree.clone();
        root.set_attr("sample-rate", self.sample_rate);

        let counter = root
            .attr("id-counter")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            .max(self.ids.next_free());
        root.set_attr("id-counter", counter);

        set_timecode_format_option(&mut root, self.frame_rate.tag());

        let sources = root.ensure_child("Sources");
        for source in self.sources.iter().filter(|s| !s.seeded) {
            sources.push(templates::source_fragment(source));
        }

        let routes = root.ensure_child("Routes");
        // New tracks are ordered after every route the seed already has
        let seeded_routes = routes.elements().filter(|e| e.name == "Route").count();
        for (index, route) in self.routes.iter().enumerate() {
            let default_playlist = route.default_playlist_name();
            let playlist = route
                .playlists
                .first()
                .map(|h| self.playlists[h.0].name.as_str())
                .unwrap_or(&default_playlist);
            let ctx = RouteContext {
                order: seeded_routes + index,
                playlist,
                master: self.master.as_deref(),
            };
            routes.push(templates::route_fragment(route, ctx));
        }

        let playlists = root.ensure_child("Playlists");
        for playlist in &self.playlists {
            let regions = playlist
                .regions
                .iter()
                .map(|h| {
                    let region = &self.regions[h.0];
                    let source_ids: Vec<&str> = region
                        .sources
                        .iter()
                        .map(|s| self.sources[s.0].id.as_str())
                        .collect();
                    templates::region_fragment(region, &source_ids)
                })
                .collect();
            playlists.push(templates::playlist_fragment(
                playlist,
                &self.routes[playlist.route.0],
                regions,
            ));
        }

        root
    }
}

impl fmt::Display for SessionDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = xml::to_document_string(&self.to_element()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Index<RouteHandle> for SessionDocument {
    type Output = Route;

    fn index(&self, handle: RouteHandle) -> &Route {
        &self.routes[handle.0]
    }
}

impl Index<PlaylistHandle> for SessionDocument {
    type Output = Playlist;

    fn index(&self, handle: PlaylistHandle) -> &Playlist {
        &self.playlists[handle.0]
    }
}

impl Index<SourceHandle> for SessionDocument {
    type Output = Source;

    fn index(&self, handle: SourceHandle) -> &Source {
        &self.sources[handle.0]
    }
}

impl Index<RegionHandle> for SessionDocument {
    type Output = Region;

    fn index(&self, handle: RegionHandle) -> &Region {
        &self.regions[handle.0]
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Last path component of `origin`, or `origin` itself when it has none
pub fn basename(origin: &str) -> String {
    Path::new(origin)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| origin.to_string())
}

fn timecode_format_option(root: &Element) -> Option<&str> {
    root.child("Config")?
        .elements()
        .find(|o| o.name == "Option" && o.attr("name") == Some(TIMECODE_FORMAT_OPTION))?
        .attr("value")
}

fn set_timecode_format_option(root: &mut Element, tag: &str) {
    let config = root.ensure_child("Config");
    let found = config
        .elements_mut()
        .find(|o| o.name == "Option" && o.attr("name") == Some(TIMECODE_FORMAT_OPTION));
    match found {
        Some(option) => option.set_attr("value", tag),
        None => config.push(
            Element::new("Option")
                .with_attr("name", TIMECODE_FORMAT_OPTION)
                .with_attr("value", tag),
        ),
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
