#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_precision_loss)]
#![forbid(unsafe_code)]

//! # Tessera: photomosaic assembly over nearest-color indexes
//!
//! `tessera` matches a large collection of reference images to small numeric
//! color descriptors and, for each tile of a target image, finds a reference
//! whose average color is close. Two independently usable index structures
//! carry the lookup:
//! - [`KdTree`]: a kd-tree over full RGB descriptors with axis-cycling
//!   median splits and a branch-and-bound nearest query.
//! - [`RbTree`]: a red-black tree over a scalar luma projection with a
//!   cheaper single-path descent lookup.
//!
//! Both are built once from the full reference set and are read-only
//! afterwards, so per-tile queries parallelize freely. The `mosaic` module
//! supplies the surrounding pipeline: reference ingest, tile means and the
//! compose loop.

pub mod core;
pub mod mosaic;

// Re-export key types for easier use by library consumers
pub use crate::core::common::{Descriptor, Record, TesseraError};
pub use crate::core::config::{IndexKind, MosaicConfig};
pub use crate::core::indexing::{KdTree, RbTree};

/// Core result type for the library
pub type Result<T> = std::result::Result<T, TesseraError>;
