//! Core building blocks: the scan loader, axis normalization, load and
//! pipeline options, and the stage composition consumed by the `api` module.
pub mod axes;
pub mod loader;
pub mod params;
pub mod pipeline;
