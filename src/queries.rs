//! Query implementations for [`KdTree`].
//!
//! All traversals run on explicit stacks. Range, radius and kNN searches carry the
//! bounding box of each subtree on the stack, starting from the infinite box at the
//! root and shrinking it at every split: the left child's box ends at the pivot
//! along the split dimension, the right child's box starts there.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::bounds::Bounds;
use crate::build::{NodeId, Tree};
use crate::error::KdTreeError;
use crate::geometry::{distance, points_equal};
use crate::kdtree::KdTree;

/// A stored point together with one of its values.
#[derive(Debug, PartialEq)]
pub struct Entry<'a, V> {
    /// Coordinates of the item
    pub point: &'a [f64],
    /// Value appended with those coordinates
    pub value: &'a V,
}

/// One kNN result: an item and its distance to the query point.
#[derive(Debug, PartialEq)]
pub struct Neighbor<'a, V> {
    /// Coordinates of the item
    pub point: &'a [f64],
    /// Value appended with those coordinates
    pub value: &'a V,
    /// Euclidean distance from the query point
    pub distance: f64,
}

/// Result of [`KdTree::find_closest`]: the nearest stored position and every value
/// stored there.
#[derive(Debug, PartialEq)]
pub struct Closest<'a, V> {
    /// Coordinates of the nearest stored point
    pub point: &'a [f64],
    /// All values sharing those coordinates, at least one
    pub values: Vec<&'a V>,
    /// Euclidean distance from the query point
    pub distance: f64,
}

/// kNN candidate node, ordered by distance so the heap top is the farthest.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance: f64,
    node: NodeId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.node.cmp(&other.node))
    }
}

impl<V> KdTree<V> {
    /// Returns every value stored at exactly `query`, in unspecified order.
    ///
    /// Coordinates must match exactly, component by component. An empty vector
    /// means nothing is stored there.
    ///
    /// # Errors
    /// - [`KdTreeError::NotBuilt`] if points were appended since the last build.
    /// - [`KdTreeError::DimensionMismatch`] or [`KdTreeError::NanCoordinate`] for a
    ///   malformed query.
    pub fn find(&self, query: &[f64]) -> Result<Vec<&V>, KdTreeError> {
        self.check_query(query)?;
        let Some(tree) = self.tree()? else {
            return Ok(Vec::new());
        };

        let mut next = Some(Tree::ROOT);
        while let Some(id) = next {
            let node = &tree.nodes[id];
            let rep = self.points.get(tree.representative(node));
            if points_equal(query, rep) {
                return Ok(self.values_at(tree, id));
            }
            next = match node.split_dim {
                None => None,
                Some(dim) if query[dim] < rep[dim] => node.left,
                Some(_) => node.right,
            };
        }
        Ok(Vec::new())
    }

    /// Finds the stored point nearest to `query` and all values stored there.
    ///
    /// Returns `None` only when the tree holds no items. When several distinct
    /// points are equally near, one of them is returned.
    ///
    /// # Errors
    /// - [`KdTreeError::NotBuilt`] if points were appended since the last build.
    /// - [`KdTreeError::DimensionMismatch`] or [`KdTreeError::NanCoordinate`] for a
    ///   malformed query.
    ///
    /// # Example
    /// ```
    /// use kdquery::KdTree;
    /// let mut tree = KdTree::new(2)?;
    /// tree.append(&[0.0, 0.0], 'a')?;
    /// tree.append(&[3.0, 4.0], 'b')?;
    /// tree.build();
    ///
    /// let closest = tree.find_closest(&[2.0, 3.0])?.expect("tree is not empty");
    /// assert_eq!(closest.point, &[3.0, 4.0]);
    /// assert_eq!(closest.values, vec![&'b']);
    /// # Ok::<(), kdquery::KdTreeError>(())
    /// ```
    pub fn find_closest(&self, query: &[f64]) -> Result<Option<Closest<'_, V>>, KdTreeError> {
        self.check_query(query)?;
        let Some(tree) = self.tree()? else {
            return Ok(None);
        };

        let mut best: Option<NodeId> = None;
        let mut best_dist = f64::INFINITY;
        let mut visited = 0usize;
        // (lower bound on the distance to anything in the subtree, subtree root)
        let mut stack: Vec<(f64, NodeId)> = vec![(0.0, Tree::ROOT)];

        while let Some((bound, id)) = stack.pop() {
            if bound > best_dist {
                continue;
            }
            visited += 1;

            let node = &tree.nodes[id];
            let rep = self.points.get(tree.representative(node));
            let d = distance(query, rep);
            // An infinite distance must be real, not an overflow of the squares
            debug_assert!(
                d.is_finite()
                    || query
                        .iter()
                        .zip(rep)
                        .any(|(q, p)| (q - p).abs() * (query.len() as f64).sqrt() >= f64::MAX / 2.0),
                "distance is infinite only when it exceeds f64::MAX"
            );
            if d <= best_dist {
                best_dist = d;
                best = Some(id);
            }

            let Some(dim) = node.split_dim else {
                continue;
            };
            let far_bound = bound.max((query[dim] - rep[dim]).abs());
            let (near, far) = if query[dim] < rep[dim] {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };
            // Near side goes on top so it is searched first
            if let Some(far) = far {
                stack.push((far_bound, far));
            }
            if let Some(near) = near {
                stack.push((bound, near));
            }
        }

        trace!(visited, distance = best_dist, "find_closest");
        debug_assert!(best.is_some(), "non-empty tree always has a closest point");
        Ok(best.map(|id| Closest {
            point: self.points.get(tree.representative(&tree.nodes[id])),
            values: self.values_at(tree, id),
            distance: best_dist,
        }))
    }

    /// Finds the `k` items nearest to `query`, closest first.
    ///
    /// Items sharing coordinates are kept or dropped together, so when duplicates sit
    /// at the k-th distance the result holds more than `k` items. Fewer than `k` come
    /// back only when the tree holds fewer items.
    ///
    /// # Errors
    /// Same as [`knn_within`](Self::knn_within).
    ///
    /// # Example
    /// ```
    /// use kdquery::KdTree;
    /// let mut tree = KdTree::new(1)?;
    /// for (x, name) in [(0.0, "zero"), (1.0, "one"), (5.0, "five"), (9.0, "nine")] {
    ///     tree.append(&[x], name)?;
    /// }
    /// tree.build();
    ///
    /// let names: Vec<_> = tree.knn(2, &[4.0])?.iter().map(|n| *n.value).collect();
    /// assert_eq!(names, vec!["five", "one"]);
    /// # Ok::<(), kdquery::KdTreeError>(())
    /// ```
    pub fn knn(&self, k: usize, query: &[f64]) -> Result<Vec<Neighbor<'_, V>>, KdTreeError> {
        self.knn_within(k, query, f64::INFINITY)
    }

    /// Like [`knn`](Self::knn), but only considers items strictly closer than
    /// `max_radius`. An infinite `max_radius` places no limit at all, so items at
    /// infinite distance (from a query with infinite components) still qualify.
    ///
    /// # Errors
    /// - [`KdTreeError::NotBuilt`] if points were appended since the last build.
    /// - [`KdTreeError::DimensionMismatch`] or [`KdTreeError::NanCoordinate`] for a
    ///   malformed query.
    /// - [`KdTreeError::InvalidRadius`] if `max_radius` is negative or NaN.
    pub fn knn_within(
        &self,
        k: usize,
        query: &[f64],
        max_radius: f64,
    ) -> Result<Vec<Neighbor<'_, V>>, KdTreeError> {
        self.check_query(query)?;
        check_radius(max_radius)?;
        let Some(tree) = self.tree()? else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut candidates: BinaryHeap<Candidate> = BinaryHeap::new();
        // Individual items held by `candidates`, not nodes
        let mut held = 0usize;
        let mut radius = max_radius;
        let mut visited = 0usize;
        let mut stack = vec![(Bounds::infinite(self.dimensions()), Tree::ROOT)];
        // Without a radius, items at infinite distance still count until k are held
        let unbounded = max_radius.is_infinite();
        let admits = |dist: f64, limit: f64, count: usize| dist < limit || (unbounded && count < k);

        while let Some((bounds, id)) = stack.pop() {
            if !admits(bounds.distance_to_point(query), radius, held) {
                continue;
            }
            visited += 1;

            let node = &tree.nodes[id];
            let rep = self.points.get(tree.representative(node));
            let d = distance(query, rep);
            if admits(d, radius, held) {
                candidates.push(Candidate { distance: d, node: id });
                held += node.count;
                while let Some(top) = candidates.peek() {
                    let top_count = tree.nodes[top.node].count;
                    if held - top_count < k {
                        break;
                    }
                    held -= top_count;
                    let _ = candidates.pop();
                }
                if held >= k {
                    if let Some(top) = candidates.peek() {
                        radius = top.distance;
                    }
                }
            }

            let Some(dim) = node.split_dim else {
                continue;
            };
            if let Some(right) = node.right {
                let child = bounds.with_lower(dim, rep[dim]);
                if admits(child.distance_to_point(query), radius, held) {
                    stack.push((child, right));
                }
            }
            if let Some(left) = node.left {
                let child = bounds.with_upper(dim, rep[dim]);
                if admits(child.distance_to_point(query), radius, held) {
                    stack.push((child, left));
                }
            }
        }

        let mut results = Vec::with_capacity(held);
        for candidate in candidates.into_sorted_vec() {
            let node = &tree.nodes[candidate.node];
            for &item in tree.items(node) {
                results.push(Neighbor {
                    point: self.points.get(item),
                    value: &self.values[item],
                    distance: candidate.distance,
                });
            }
        }
        trace!(k, visited, results = results.len(), "knn");
        Ok(results)
    }

    /// Returns every item inside the box `[lower, upper]`, boundaries included.
    ///
    /// Order is unspecified. An inverted box (some `lower[i] > upper[i]`) matches
    /// nothing.
    ///
    /// # Errors
    /// - [`KdTreeError::NotBuilt`] if points were appended since the last build.
    /// - [`KdTreeError::DimensionMismatch`] or [`KdTreeError::NanCoordinate`] if
    ///   either corner is malformed.
    ///
    /// # Example
    /// ```
    /// use kdquery::KdTree;
    /// let mut tree = KdTree::new(2)?;
    /// tree.append(&[0.0, 0.0], 1)?;
    /// tree.append(&[2.0, 2.0], 2)?;
    /// tree.append(&[5.0, 1.0], 3)?;
    /// tree.build();
    ///
    /// let hits = tree.all_points_in_range(&[0.0, 0.0], &[2.0, 2.0])?;
    /// assert_eq!(hits.len(), 2);
    /// # Ok::<(), kdquery::KdTreeError>(())
    /// ```
    pub fn all_points_in_range(
        &self,
        lower: &[f64],
        upper: &[f64],
    ) -> Result<Vec<Entry<'_, V>>, KdTreeError> {
        let mut ids = Vec::new();
        self.query_range(lower, upper, &mut ids)?;
        Ok(ids.into_iter().map(|id| self.entry(id)).collect())
    }

    /// Same as [`all_points_in_range`](Self::all_points_in_range) but returns only
    /// the values.
    ///
    /// # Errors
    /// Same as [`all_points_in_range`](Self::all_points_in_range).
    pub fn all_values_in_range(&self, lower: &[f64], upper: &[f64]) -> Result<Vec<&V>, KdTreeError> {
        let mut ids = Vec::new();
        self.query_range(lower, upper, &mut ids)?;
        Ok(ids.into_iter().map(|id| &self.values[id]).collect())
    }

    /// Returns every item within Euclidean distance `radius` of `query`, boundary
    /// included, in unspecified order.
    ///
    /// # Errors
    /// - [`KdTreeError::NotBuilt`] if points were appended since the last build.
    /// - [`KdTreeError::DimensionMismatch`] or [`KdTreeError::NanCoordinate`] for a
    ///   malformed query.
    /// - [`KdTreeError::InvalidRadius`] if `radius` is negative or NaN.
    pub fn all_points_in_radius(
        &self,
        query: &[f64],
        radius: f64,
    ) -> Result<Vec<Entry<'_, V>>, KdTreeError> {
        self.check_query(query)?;
        check_radius(radius)?;
        let Some(tree) = self.tree()? else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::new();
        let mut stack = vec![(Bounds::infinite(self.dimensions()), Tree::ROOT)];
        while let Some((bounds, id)) = stack.pop() {
            if bounds.distance_to_point(query) > radius {
                continue;
            }
            let node = &tree.nodes[id];
            let rep = self.points.get(tree.representative(node));
            if distance(query, rep) <= radius {
                ids.extend_from_slice(tree.items(node));
            }
            let Some(dim) = node.split_dim else {
                continue;
            };
            if let Some(left) = node.left {
                stack.push((bounds.with_upper(dim, rep[dim]), left));
            }
            if let Some(right) = node.right {
                stack.push((bounds.with_lower(dim, rep[dim]), right));
            }
        }

        trace!(radius, results = ids.len(), "all_points_in_radius");
        Ok(ids.into_iter().map(|id| self.entry(id)).collect())
    }

    /// Collects the ids of all items inside `[lower, upper]` into `results`.
    fn query_range(
        &self,
        lower: &[f64],
        upper: &[f64],
        results: &mut Vec<usize>,
    ) -> Result<(), KdTreeError> {
        self.check_query(lower)?;
        self.check_query(upper)?;
        let Some(tree) = self.tree()? else {
            return Ok(());
        };

        let query = Bounds::from_corners(lower, upper);
        let mut stack = vec![(Bounds::infinite(self.dimensions()), Tree::ROOT)];
        while let Some((bounds, id)) = stack.pop() {
            if !bounds.overlaps(&query) {
                continue;
            }
            let node = &tree.nodes[id];
            let rep = self.points.get(tree.representative(node));
            if query.contains_point(rep) {
                results.extend_from_slice(tree.items(node));
            }
            let Some(dim) = node.split_dim else {
                continue;
            };
            if let Some(left) = node.left {
                stack.push((bounds.with_upper(dim, rep[dim]), left));
            }
            if let Some(right) = node.right {
                stack.push((bounds.with_lower(dim, rep[dim]), right));
            }
        }

        trace!(results = results.len(), "range query");
        Ok(())
    }

    fn values_at(&self, tree: &Tree, id: NodeId) -> Vec<&V> {
        tree.items(&tree.nodes[id])
            .iter()
            .map(|&item| &self.values[item])
            .collect()
    }

    fn entry(&self, id: usize) -> Entry<'_, V> {
        Entry {
            point: self.points.get(id),
            value: &self.values[id],
        }
    }
}

fn check_radius(radius: f64) -> Result<(), KdTreeError> {
    if radius.is_nan() || radius < 0.0 {
        return Err(KdTreeError::InvalidRadius(radius));
    }
    Ok(())
}
