//! Ardour session model
//!
//! Typed routes, playlists, sources and regions layered over a seed session,
//! with the id allocator and route namer that keep them unique.

pub mod entities;
pub mod ids;
pub mod naming;
pub mod session;
pub mod templates;

pub use entities::{
    Playlist, PlaylistHandle, Region, RegionHandle, Route, RouteHandle, RouteIoIds, Source,
    SourceHandle,
};
pub use ids::IdAllocator;
pub use naming::RouteNamer;
pub use session::{SessionDocument, EMBEDDED_SEED};
