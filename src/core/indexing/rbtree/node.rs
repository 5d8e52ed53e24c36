/// Arena index of a tree node.
pub(crate) type NodeId = usize;

/// Node color for the balancing invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Node of the ordered scalar index.
///
/// Children and the parent back-link are arena indices into the tree's node
/// vector. Only the arena owns node storage, so the parent link is purely
/// navigational and can never form an ownership cycle.
#[derive(Debug)]
pub(crate) struct RbNode<P> {
    pub key: f64,
    pub color: Color,
    pub payload: P,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<P> RbNode<P> {
    /// Creates a freshly attached leaf. New nodes start Red; the fix-up pass
    /// restores the color invariants afterwards.
    pub fn new_leaf(key: f64, payload: P, parent: Option<NodeId>) -> Self {
        Self { key, color: Color::Red, payload, left: None, right: None, parent }
    }
}
