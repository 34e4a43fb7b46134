//! Ardour XML fragment templates
//!
//! Each function renders one detached element for a typed entity. The
//! session attaches the fragments under `Sources`, `Routes` and `Playlists`
//! when it is serialized. Attribute sets follow what Ardour 5 writes for a
//! freshly created audio track; values not modelled here take Ardour's
//! defaults.

use super::entities::{Playlist, Region, Route, Source};
use crate::xml::Element;

/// Session-wide values a route fragment needs
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    /// Position of the route in the editor
    pub order: usize,
    /// Name of the default playlist
    pub playlist: &'a str,
    /// Bus the track outputs are wired to
    pub master: Option<&'a str>,
}

/// Output ports per track; mono tracks still feed a stereo panner
const MIN_OUTPUT_PORTS: usize = 2;

pub fn source_fragment(source: &Source) -> Element {
    Element::new("Source")
        .with_attr("name", &source.name)
        .with_attr("type", "audio")
        .with_attr("flags", "")
        .with_attr("id", &source.id)
        .with_attr("captured-for", "")
        .with_attr("channel", source.channel)
        .with_attr("origin", &source.origin)
        .with_attr("gain", 1)
}

pub fn route_fragment(route: &Route, ctx: RouteContext<'_>) -> Element {
    let mut input = io_element(&route.name, &route.io.input, "Input");
    for n in 1..=route.channels {
        input.push(
            Element::new("Port")
                .with_attr("type", "audio")
                .with_attr("name", format!("{}/audio_in {}", route.name, n)),
        );
    }

    let mut output = io_element(&route.name, &route.io.output, "Output");
    for n in 1..=route.channels.max(MIN_OUTPUT_PORTS) {
        let mut port = Element::new("Port")
            .with_attr("type", "audio")
            .with_attr("name", format!("{}/audio_out {}", route.name, n));
        if let Some(master) = ctx.master {
            port.push(Element::new("Connection").with_attr("other", format!("{}/audio_in {}", master, n)));
        }
        output.push(port);
    }

    Element::new("Route")
        .with_attr("version", 3001)
        .with_attr("id", &route.id)
        .with_attr("name", &route.name)
        .with_attr("default-type", "audio")
        .with_attr("strict-io", 1)
        .with_attr("active", 1)
        .with_attr("denormal-protection", 0)
        .with_attr("meter-point", "MeterPostFader")
        .with_attr("disk-io-point", "DiskIOPreFader")
        .with_attr("meter-type", "MeterPeak")
        .with_attr("saved-meter-point", "MeterPostFader")
        .with_attr("mode", "Normal")
        .with_child(
            Element::new("PresentationInfo")
                .with_attr("order", ctx.order)
                .with_attr("flags", "AudioTrack,OrderSet"),
        )
        .with_child(input)
        .with_child(output)
        .with_child(
            Element::new("Diskstream")
                .with_attr("flags", "Recordable")
                .with_attr("playlist", ctx.playlist)
                .with_attr("name", &route.name)
                .with_attr("id", &route.io.diskstream)
                .with_attr("speed", 1)
                .with_attr("capture-alignment", "Automatic")
                .with_attr("record-safe", 0)
                .with_attr("channels", route.channels),
        )
}

fn io_element(name: &str, id: &str, direction: &str) -> Element {
    Element::new("IO")
        .with_attr("name", name)
        .with_attr("id", id)
        .with_attr("direction", direction)
        .with_attr("default-type", "audio")
        .with_attr("user-latency", 0)
}

/// Playlist element wrapping already rendered region fragments
pub fn playlist_fragment(playlist: &Playlist, route: &Route, regions: Vec<Element>) -> Element {
    let mut element = Element::new("Playlist")
        .with_attr("id", &playlist.id)
        .with_attr("name", &playlist.name)
        .with_attr("type", "audio")
        .with_attr("orig-track-id", &route.id)
        .with_attr("shared-with-ids", "")
        .with_attr("frozen", 0)
        .with_attr("combine-ops", 0);
    for region in regions {
        element.push(region);
    }
    element
}

/// Region element; `source_ids` are the bound sources' ids in channel order
pub fn region_fragment(region: &Region, source_ids: &[&str]) -> Element {
    let mut element = Element::new("Region")
        .with_attr("name", &region.name)
        .with_attr("muted", 0)
        .with_attr("opaque", 1)
        .with_attr("locked", 0)
        .with_attr("video-locked", 0)
        .with_attr("automatic", 0)
        .with_attr("whole-file", 0)
        .with_attr("import", 0)
        .with_attr("external", 0)
        .with_attr("sync-marked", 0)
        .with_attr("left-of-split", 0)
        .with_attr("right-of-split", 0)
        .with_attr("hidden", 0)
        .with_attr("position-locked", 0)
        .with_attr("valid-transients", 0)
        .with_attr("start", region.start)
        .with_attr("length", region.length)
        .with_attr("position", region.position)
        .with_attr("beat", 0)
        .with_attr("sync-position", 0)
        .with_attr("ancestral-start", 0)
        .with_attr("ancestral-length", 0)
        .with_attr("stretch", 1)
        .with_attr("shift", 1)
        .with_attr("positional-lock-style", "AudioTime")
        .with_attr("layering-index", 0)
        .with_attr("envelope-active", u8::from(region.envelope.is_some()))
        .with_attr("default-fade-in", 0)
        .with_attr("default-fade-out", 0)
        .with_attr("fade-in-active", 1)
        .with_attr("fade-out-active", 1)
        .with_attr("scale-amplitude", 1)
        .with_attr("id", &region.id)
        .with_attr("type", "audio")
        .with_attr("first-edit", "nothing");

    for (slot, id) in source_ids.iter().enumerate() {
        element.set_attr(format!("source-{}", slot), id);
        element.set_attr(format!("master-source-{}", slot), id);
    }
    element.set_attr("channels", source_ids.len());

    element.push(envelope_fragment(region.envelope.as_deref()));
    element
}

/// `Envelope` child of a region; `None` renders Ardour's default envelope
pub fn envelope_fragment(points: Option<&[(u64, f64)]>) -> Element {
    match points {
        None => Element::new("Envelope").with_attr("default", "yes"),
        Some(points) => {
            let events: String = points
                .iter()
                .map(|(when, gain)| format!("{} {}\n", when, gain))
                .collect();
            Element::new("Envelope").with_child(Element::new("events").with_text(events))
        }
    }
}
