//! Tree construction.
//!
//! Nodes live in a flat arena (`Tree::nodes`) and refer to their children by index;
//! the node at index 0 is the root. Each node owns a contiguous run of
//! `Tree::item_ids` holding every item whose coordinates equal the node's pivot.
//!
//! The build recurses on an explicit work stack instead of the call stack: the
//! partition is not balanced, so adversarial inputs (e.g. exponentially spaced
//! points on a line) produce a tree whose depth is linear in the item count.

use crate::bounds::Bounds;
use crate::geometry::points_equal;
use crate::kdtree::Points;

/// Index of a node in `Tree::nodes`
pub(crate) type NodeId = usize;

#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// Split dimension, `None` for a leaf
    pub(crate) split_dim: Option<usize>,
    /// Start of this node's run in `Tree::item_ids`; the first item is the pivot
    pub(crate) first: usize,
    /// Number of items at this node (always at least 1)
    pub(crate) count: usize,
    /// Items strictly below the pivot along `split_dim`
    pub(crate) left: Option<NodeId>,
    /// Items at or above the pivot along `split_dim`, pivot duplicates excluded
    pub(crate) right: Option<NodeId>,
}

/// Immutable kd-tree over a non-empty set of items.
#[derive(Clone, Debug)]
pub(crate) struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) item_ids: Vec<usize>,
    /// Number of nodes on the longest root-to-leaf path
    pub(crate) depth: usize,
}

impl Tree {
    pub(crate) const ROOT: NodeId = 0;

    /// Item ids stored at `node`.
    #[inline]
    pub(crate) fn items(&self, node: &Node) -> &[usize] {
        &self.item_ids[node.first..node.first + node.count]
    }

    /// Item id whose coordinates stand for every item at `node`.
    #[inline]
    pub(crate) fn representative(&self, node: &Node) -> usize {
        self.item_ids[node.first]
    }
}

/// Where a freshly built node hangs in the tree
#[derive(Clone, Copy, Debug)]
enum Slot {
    Root,
    Left(NodeId),
    Right(NodeId),
}

#[derive(Debug)]
struct Task {
    ids: Vec<usize>,
    slot: Slot,
    depth: usize,
}

/// Outcome of splitting one set of items around a pivot
#[derive(Debug)]
struct Partition {
    split_dim: Option<usize>,
    same: Vec<usize>,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Builds a tree covering exactly `ids`, or `None` when `ids` is empty.
pub(crate) fn build_tree(points: &Points, ids: Vec<usize>) -> Option<Tree> {
    if ids.is_empty() {
        return None;
    }

    let mut tree = Tree {
        nodes: Vec::with_capacity(ids.len()),
        item_ids: Vec::with_capacity(ids.len()),
        depth: 0,
    };
    let mut stack = vec![Task {
        ids,
        slot: Slot::Root,
        depth: 1,
    }];

    while let Some(task) = stack.pop() {
        let Partition {
            split_dim,
            same,
            left,
            right,
        } = partition(points, task.ids);

        let id = tree.nodes.len();
        tree.nodes.push(Node {
            split_dim,
            first: tree.item_ids.len(),
            count: same.len(),
            left: None,
            right: None,
        });
        tree.item_ids.extend(same);
        tree.depth = tree.depth.max(task.depth);

        match task.slot {
            Slot::Root => debug_assert_eq!(id, Tree::ROOT, "root must be the first node built"),
            Slot::Left(parent) => tree.nodes[parent].left = Some(id),
            Slot::Right(parent) => tree.nodes[parent].right = Some(id),
        }

        if !right.is_empty() {
            stack.push(Task {
                ids: right,
                slot: Slot::Right(id),
                depth: task.depth + 1,
            });
        }
        if !left.is_empty() {
            stack.push(Task {
                ids: left,
                slot: Slot::Left(id),
                depth: task.depth + 1,
            });
        }
    }

    Some(tree)
}

fn partition(points: &Points, ids: Vec<usize>) -> Partition {
    let mut bounds = Bounds::empty(points.dimensions());
    for &id in &ids {
        bounds.grow(points.get(id));
    }

    if ids.len() == 1 || bounds.is_degenerate() {
        return Partition {
            split_dim: None,
            same: ids,
            left: Vec::new(),
            right: Vec::new(),
        };
    }

    let dim = bounds.widest_dimension();
    // Halved separately so two huge finite bounds cannot overflow
    let mid = 0.5 * bounds.lower[dim] + 0.5 * bounds.upper[dim];
    let pivot = pick_pivot(points, &ids, dim, mid);
    let pivot_point = points.get(pivot);

    let mut same = vec![pivot];
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &id in &ids {
        if id == pivot {
            continue;
        }
        let p = points.get(id);
        if points_equal(p, pivot_point) {
            same.push(id);
        } else if p[dim] < pivot_point[dim] {
            left.push(id);
        } else {
            right.push(id);
        }
    }

    Partition {
        split_dim: Some(dim),
        same,
        left,
        right,
    }
}

/// The item closest to `mid` along `dim`; the first one wins ties.
fn pick_pivot(points: &Points, ids: &[usize], dim: usize, mid: f64) -> usize {
    let mut best = ids[0];
    let mut best_dist = (points.get(best)[dim] - mid).abs();
    for &id in &ids[1..] {
        let d = (points.get(id)[dim] - mid).abs();
        if d < best_dist {
            best = id;
            best_dist = d;
        }
    }
    best
}
