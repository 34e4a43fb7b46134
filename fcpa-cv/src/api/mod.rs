//! HTTP API handlers for fcpa-cv

pub mod convert;
pub mod status;

pub use convert::convert_project;
pub use status::{status_routes, BuildInfo};
