//! The two nearest-color index variants.
//!
//! [`KdTree`] and [`RbTree`] implement the same conceptual contract — build
//! from (descriptor, payload) records, answer nearest-descriptor lookups —
//! with different guarantees. The kd-tree's branch-and-bound query is a
//! multi-dimensional nearest-neighbor approximation; the red-black tree's
//! single-path descent is strictly weaker. The two contracts are deliberately
//! kept separate rather than unified behind one trait.

pub mod kdtree;
pub mod rbtree;

pub use kdtree::KdTree;
pub use rbtree::RbTree;
