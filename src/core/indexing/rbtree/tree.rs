use super::node::{Color, NodeId, RbNode};
use crate::core::common::TesseraError;

/// Single-key nearest-color index: a red-black tree ordered by a scalar
/// projection of each record's descriptor.
///
/// Unlike the spatial index this structure grows incrementally: records are
/// inserted one at a time with immediate rebalancing. Lookup is a single
/// root-to-leaf descent and therefore a cheaper but strictly weaker
/// approximation of nearest neighbor than the spatial index's
/// branch-and-bound query.
#[derive(Debug)]
pub struct RbTree<P> {
    nodes: Vec<RbNode<P>>,
    root: Option<NodeId>,
}

impl<P> Default for RbTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RbTree<P> {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new(), root: None }
    }

    /// Inserts a record keyed by `key`, rebalancing immediately.
    ///
    /// Equal keys route right, so duplicates are kept and remain reachable.
    pub fn insert(&mut self, key: f64, payload: P) {
        let id = self.nodes.len();
        match self.root {
            None => {
                self.nodes.push(RbNode::new_leaf(key, payload, None));
                self.root = Some(id);
            }
            Some(root) => {
                self.nodes.push(RbNode::new_leaf(key, payload, None));
                let mut current = root;
                loop {
                    if key < self.nodes[current].key {
                        match self.nodes[current].left {
                            Some(child) => current = child,
                            None => {
                                self.nodes[current].left = Some(id);
                                break;
                            }
                        }
                    } else {
                        match self.nodes[current].right {
                            Some(child) => current = child,
                            None => {
                                self.nodes[current].right = Some(id);
                                break;
                            }
                        }
                    }
                }
                self.nodes[id].parent = Some(current);
                self.fix_violations(id);
            }
        }
        // The root is forced Black unconditionally after every insert.
        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }

    /// Returns the payload of the node whose key is closest to `key` among
    /// the nodes on a single root-to-leaf descent path.
    ///
    /// The descent never backtracks: it tracks the best `|key - node.key|`
    /// seen so far while moving left or right as an ordinary search would.
    /// The result is the closest key on that path, which is not necessarily
    /// the globally closest key in the tree.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::EmptyIndex` if the index holds no records.
    pub fn find_closest(&self, key: f64) -> Result<&P, TesseraError> {
        let mut current = self.root.ok_or(TesseraError::EmptyIndex)?;
        let mut best = current;
        let mut best_distance = f64::INFINITY;
        loop {
            let distance = (key - self.nodes[current].key).abs();
            if distance < best_distance {
                best = current;
                best_distance = distance;
            }
            let next = if key < self.nodes[current].key {
                self.nodes[current].left
            } else {
                self.nodes[current].right
            };
            match next {
                Some(child) => current = child,
                None => break,
            }
        }
        Ok(&self.nodes[best].payload)
    }

    /// Number of records stored in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Restores the color invariants after attaching the Red leaf `id`.
    ///
    /// Terminates at the root or under a Black parent. A Red uncle is a pure
    /// recolor that pushes the violation up to the grandparent; a Black or
    /// absent uncle resolves one of the four rotation shapes.
    fn fix_violations(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id].parent else {
            return;
        };
        if self.nodes[parent].color == Color::Black {
            return;
        }
        // A Red parent is never the root (the root is forced Black), so the
        // grandparent exists.
        let Some(grandparent) = self.nodes[parent].parent else {
            return;
        };

        if let Some(uncle) = self.uncle(id) {
            if self.nodes[uncle].color == Color::Red {
                self.nodes[parent].color = Color::Black;
                self.nodes[uncle].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
                self.fix_violations(grandparent);
                return;
            }
        }

        match (self.is_left_child(parent), self.is_left_child(id)) {
            // Inner shapes: rotate the parent to fold the node outward, then
            // hoist the node over the grandparent.
            (true, false) => {
                self.rotate_left(parent);
                self.rotate_right(grandparent);
                self.nodes[id].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
            }
            (false, true) => {
                self.rotate_right(parent);
                self.rotate_left(grandparent);
                self.nodes[id].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
            }
            // Outer shapes: a single rotation over the grandparent.
            (true, true) => {
                self.rotate_right(grandparent);
                self.nodes[parent].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
            }
            (false, false) => {
                self.rotate_left(grandparent);
                self.nodes[parent].color = Color::Black;
                self.nodes[grandparent].color = Color::Red;
            }
        }
    }

    /// Left rotation around `id`, hoisting its right child. A no-op when the
    /// right child is absent.
    fn rotate_left(&mut self, id: NodeId) {
        let Some(child) = self.nodes[id].right else {
            return;
        };
        let inner = self.nodes[child].left;
        self.nodes[id].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }
        let parent = self.nodes[id].parent;
        self.nodes[child].parent = parent;
        match parent {
            None => self.root = Some(child),
            Some(parent) => {
                if self.nodes[parent].left == Some(id) {
                    self.nodes[parent].left = Some(child);
                } else {
                    self.nodes[parent].right = Some(child);
                }
            }
        }
        self.nodes[child].left = Some(id);
        self.nodes[id].parent = Some(child);
    }

    /// Right rotation around `id`, hoisting its left child. A no-op when the
    /// left child is absent.
    fn rotate_right(&mut self, id: NodeId) {
        let Some(child) = self.nodes[id].left else {
            return;
        };
        let inner = self.nodes[child].right;
        self.nodes[id].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }
        let parent = self.nodes[id].parent;
        self.nodes[child].parent = parent;
        match parent {
            None => self.root = Some(child),
            Some(parent) => {
                if self.nodes[parent].left == Some(id) {
                    self.nodes[parent].left = Some(child);
                } else {
                    self.nodes[parent].right = Some(child);
                }
            }
        }
        self.nodes[child].right = Some(id);
        self.nodes[id].parent = Some(child);
    }

    fn is_left_child(&self, id: NodeId) -> bool {
        self.nodes[id].parent.is_some_and(|parent| self.nodes[parent].left == Some(id))
    }

    fn uncle(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id].parent?;
        let grandparent = self.nodes[parent].parent?;
        if self.nodes[grandparent].left == Some(parent) {
            self.nodes[grandparent].right
        } else {
            self.nodes[grandparent].left
        }
    }
}
