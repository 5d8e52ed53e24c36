//! Spatial partition index: axis-cycling kd-tree over color descriptors.

mod tree;

pub use tree::KdTree;
