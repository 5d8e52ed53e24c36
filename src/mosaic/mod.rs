//! Mosaic composition: reference ingest and the per-tile query/paste loop
//! driving the core indexes.

pub mod compose;
pub mod tiles;

pub use compose::{compose_ordered, compose_spatial};
pub use tiles::{load_reference_tiles, luma_key, mean_rgb, mean_rgb_region};
