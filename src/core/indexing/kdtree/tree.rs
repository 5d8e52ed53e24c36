use crate::core::common::{Record, TesseraError};
use crate::core::vector::similarity::euclidean_distance_unchecked;
use log::debug;

/// Node of the spatial partition tree.
///
/// A node exclusively owns both subtrees; dropping a node drops everything
/// beneath it, so teardown is a plain post-order drop.
#[derive(Debug)]
struct KdNode<P> {
    record: Record<P>,
    left: Option<Box<KdNode<P>>>,
    right: Option<Box<KdNode<P>>>,
}

/// Multi-dimensional nearest-color index: a kd-tree built once over the full
/// reference set with axis-cycling median splits.
///
/// The tree is bulk-constructed by [`KdTree::build`] and read-only for the
/// rest of its lifetime. Queries take `&self` and never touch node state, so
/// independent queries may run concurrently from multiple threads.
#[derive(Debug)]
pub struct KdTree<P> {
    root: Option<Box<KdNode<P>>>,
    dim: usize,
    len: usize,
}

impl<P> KdTree<P> {
    /// Builds the index from the full record set.
    ///
    /// Every descriptor must have exactly `dim` coordinates; a malformed
    /// record fails the whole build up front rather than surfacing later at
    /// query time.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::Index` if `dim` is zero and
    /// `TesseraError::DimensionMismatch` for a descriptor of the wrong length.
    pub fn build(records: Vec<Record<P>>, dim: usize) -> Result<Self, TesseraError> {
        if dim == 0 {
            return Err(TesseraError::Index("index dimensionality must be nonzero".into()));
        }
        for record in &records {
            if record.descriptor.len() != dim {
                return Err(TesseraError::DimensionMismatch {
                    expected: dim,
                    actual: record.descriptor.len(),
                });
            }
        }
        let len = records.len();
        let root = Self::build_subtree(records, 0, dim);
        Ok(Self { root, dim, len })
    }

    /// Recursive construction: select the split axis from the depth, move the
    /// axis-median record into the node, route the rest by comparing against
    /// the median's axis value.
    fn build_subtree(mut records: Vec<Record<P>>, depth: usize, dim: usize) -> Option<Box<KdNode<P>>> {
        if records.is_empty() {
            return None;
        }
        // Select axis based on depth so that the axis cycles through all
        // valid coordinates.
        let axis = depth % dim;
        let mid = records.len() / 2;
        // Linear-time selection (the nth_element analogue), not a full sort;
        // a sort here would break the O(n log n) build bound.
        records.select_nth_unstable_by(mid, |a, b| a.descriptor[axis].total_cmp(&b.descriptor[axis]));
        let median = records.swap_remove(mid);
        let split = median.descriptor[axis];

        // Routing is by axis value, not position, so the element swapped into
        // the median slot lands on the correct side.
        let mut left = Vec::new();
        let mut right = Vec::new();
        for record in records {
            if record.descriptor[axis] < split {
                left.push(record);
            } else {
                right.push(record);
            }
        }
        Some(Box::new(KdNode {
            record: median,
            left: Self::build_subtree(left, depth + 1, dim),
            right: Self::build_subtree(right, depth + 1, dim),
        }))
    }

    /// Returns the payload of a record whose descriptor is near `descriptor`.
    ///
    /// Branch-and-bound descent with a pruning heuristic: the far subtree is
    /// skipped only when the query's distance to the current node's own
    /// record exceeds the best distance found so far. This is deliberately
    /// not the textbook hyperplane test and may visit more or fewer branches
    /// than an exact kd-tree would; the result is near, not guaranteed
    /// globally nearest.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::EmptyIndex` if the index holds no records and
    /// `TesseraError::DimensionMismatch` for a query descriptor of the wrong
    /// length.
    pub fn query(&self, descriptor: &[f64]) -> Result<&P, TesseraError> {
        if descriptor.len() != self.dim {
            return Err(TesseraError::DimensionMismatch {
                expected: self.dim,
                actual: descriptor.len(),
            });
        }
        let root = self.root.as_deref().ok_or(TesseraError::EmptyIndex)?;
        let best = Self::nearest(root, descriptor, 0, self.dim);
        Ok(&best.record.payload)
    }

    fn nearest<'a>(node: &'a KdNode<P>, query: &[f64], depth: usize, dim: usize) -> &'a KdNode<P> {
        let axis = depth % dim;
        let (near, far) = if query[axis] < node.record.descriptor[axis] {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };

        // Descend the near side first, then let the node itself compete with
        // the subtree candidate on full Euclidean distance.
        let mut best = match near {
            Some(child) => {
                let candidate = Self::nearest(child, query, depth + 1, dim);
                let candidate_distance =
                    euclidean_distance_unchecked(&candidate.record.descriptor, query);
                let node_distance = euclidean_distance_unchecked(&node.record.descriptor, query);
                if node_distance < candidate_distance {
                    node
                } else {
                    candidate
                }
            }
            None => node,
        };

        let best_distance = euclidean_distance_unchecked(&best.record.descriptor, query);
        if euclidean_distance_unchecked(query, &node.record.descriptor) > best_distance {
            return best;
        }
        if let Some(child) = far {
            let other = Self::nearest(child, query, depth + 1, dim);
            if euclidean_distance_unchecked(&other.record.descriptor, query) < best_distance {
                best = other;
            }
        }
        best
    }

    /// Releases every node in the tree.
    ///
    /// Releasing an index that holds no nodes is a benign no-op, reported at
    /// debug level rather than as an error.
    pub fn clear(&mut self) {
        if self.root.is_none() {
            debug!("clear called on an empty spatial index");
            return;
        }
        self.root = None;
        self.len = 0;
    }

    /// Number of records stored in the index.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimensionality agreed at build time.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn records_from(points: &[(&[f64], &'static str)]) -> Vec<Record<&'static str>> {
        points.iter().map(|(d, p)| Record::new(d.to_vec(), *p)).collect()
    }

    /// Walks the whole tree asserting the axis-cycling ordering invariant:
    /// at depth k with axis = k % dim, left descriptors are strictly below
    /// the node's axis value and right descriptors at or above it.
    fn assert_ordering<P>(node: &KdNode<P>, depth: usize, dim: usize) {
        let axis = depth % dim;
        let split = node.record.descriptor[axis];
        if let Some(left) = node.left.as_deref() {
            assert_subtree_bound(left, axis, split, true);
            assert_ordering(left, depth + 1, dim);
        }
        if let Some(right) = node.right.as_deref() {
            assert_subtree_bound(right, axis, split, false);
            assert_ordering(right, depth + 1, dim);
        }
    }

    fn assert_subtree_bound<P>(node: &KdNode<P>, axis: usize, split: f64, below: bool) {
        if below {
            assert!(
                node.record.descriptor[axis] < split,
                "left subtree violates split on axis {}",
                axis
            );
        } else {
            assert!(
                node.record.descriptor[axis] >= split,
                "right subtree violates split on axis {}",
                axis
            );
        }
        if let Some(left) = node.left.as_deref() {
            assert_subtree_bound(left, axis, split, below);
        }
        if let Some(right) = node.right.as_deref() {
            assert_subtree_bound(right, axis, split, below);
        }
    }

    #[test]
    fn scenario_midpoint_query_returns_closest_record() {
        let records = records_from(&[
            (&[0.0, 0.0, 0.0], "A"),
            (&[10.0, 10.0, 10.0], "B"),
            (&[5.0, 5.0, 5.0], "C"),
        ]);
        let tree = KdTree::build(records, 3).unwrap();
        assert_eq!(*tree.query(&[4.0, 4.0, 4.0]).unwrap(), "C");
    }

    #[test]
    fn single_record_always_wins() {
        let records = records_from(&[(&[100.0, 50.0, 25.0], "only")]);
        let tree = KdTree::build(records, 3).unwrap();
        assert_eq!(*tree.query(&[0.0, 0.0, 0.0]).unwrap(), "only");
        assert_eq!(*tree.query(&[255.0, 255.0, 255.0]).unwrap(), "only");
    }

    #[test]
    fn empty_build_then_query_fails_with_empty_index() {
        let tree = KdTree::<&str>::build(Vec::new(), 3).unwrap();
        assert!(tree.is_empty());
        assert!(matches!(tree.query(&[0.0, 0.0, 0.0]), Err(TesseraError::EmptyIndex)));
    }

    #[test]
    fn malformed_record_fails_at_build_time() {
        let records = vec![
            Record::new(vec![1.0, 2.0, 3.0], "ok"),
            Record::new(vec![1.0, 2.0], "short"),
        ];
        match KdTree::build(records, 3) {
            Err(TesseraError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn query_with_wrong_dimension_is_rejected() {
        let tree = KdTree::build(records_from(&[(&[1.0, 2.0, 3.0], "A")]), 3).unwrap();
        assert!(matches!(
            tree.query(&[1.0, 2.0]),
            Err(TesseraError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            KdTree::<&str>::build(Vec::new(), 0),
            Err(TesseraError::Index(_))
        ));
    }

    #[test]
    fn ordering_invariant_holds_on_random_builds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let records: Vec<Record<usize>> = (0..200)
                .map(|i| {
                    let descriptor =
                        (0..3).map(|_| rng.gen_range(0.0..255.0)).collect::<Vec<f64>>();
                    Record::new(descriptor, i)
                })
                .collect();
            let tree = KdTree::build(records, 3).unwrap();
            assert_eq!(tree.len(), 200);
            let root = tree.root.as_deref().unwrap();
            assert_ordering(root, 0, 3);
        }
    }

    #[test]
    fn rebuilding_from_the_same_records_answers_identically() {
        let mut rng = StdRng::seed_from_u64(11);
        let records: Vec<Record<usize>> = (0..128)
            .map(|i| {
                let descriptor = (0..3).map(|_| rng.gen_range(0.0..255.0)).collect::<Vec<f64>>();
                Record::new(descriptor, i)
            })
            .collect();
        let first = KdTree::build(records.clone(), 3).unwrap();
        let second = KdTree::build(records, 3).unwrap();
        for _ in 0..64 {
            let query: Vec<f64> = (0..3).map(|_| rng.gen_range(0.0..255.0)).collect();
            assert_eq!(first.query(&query).unwrap(), second.query(&query).unwrap());
        }
    }

    #[test]
    fn clear_drops_all_nodes_and_is_benign_when_repeated() {
        let mut tree = KdTree::build(records_from(&[(&[1.0, 1.0, 1.0], "A")]), 3).unwrap();
        assert_eq!(tree.len(), 1);
        tree.clear();
        assert!(tree.is_empty());
        assert!(matches!(tree.query(&[1.0, 1.0, 1.0]), Err(TesseraError::EmptyIndex)));
        // Second clear is the benign no-node case.
        tree.clear();
        assert!(tree.is_empty());
    }

    #[test]
    fn duplicate_axis_values_route_right_and_stay_reachable() {
        let records = records_from(&[
            (&[5.0, 1.0, 0.0], "a"),
            (&[5.0, 2.0, 0.0], "b"),
            (&[5.0, 3.0, 0.0], "c"),
        ]);
        let tree = KdTree::build(records, 3).unwrap();
        let root = tree.root.as_deref().unwrap();
        assert_ordering(root, 0, 3);
        assert_eq!(*tree.query(&[5.0, 2.0, 0.0]).unwrap(), "b");
    }
}
