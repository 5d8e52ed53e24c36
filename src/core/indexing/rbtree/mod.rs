//! Ordered scalar index: self-balancing red-black tree keyed by a scalar
//! color projection.

mod node;
mod tree;

pub use tree::RbTree;
