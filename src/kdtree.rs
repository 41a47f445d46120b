//! Item storage and the build lifecycle of [`KdTree`].

use tracing::{debug, trace};

use crate::build::{Tree, build_tree};
use crate::error::KdTreeError;

/// Flat coordinate storage: item `i` occupies `data[i * K..(i + 1) * K]`.
#[derive(Clone, Debug)]
pub(crate) struct Points {
    data: Vec<f64>,
    dimensions: usize,
}

impl Points {
    pub(crate) fn with_capacity(dimensions: usize, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(dimensions * capacity),
            dimensions,
        }
    }

    #[inline]
    pub(crate) fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len() / self.dimensions
    }

    #[inline]
    pub(crate) fn get(&self, id: usize) -> &[f64] {
        &self.data[id * self.dimensions..(id + 1) * self.dimensions]
    }

    pub(crate) fn push(&mut self, coords: &[f64]) {
        debug_assert_eq!(coords.len(), self.dimensions, "point has wrong dimensionality");
        self.data.extend_from_slice(coords);
    }
}

/// Where the tree is in its append/build cycle.
#[derive(Clone, Debug)]
pub(crate) enum TreeState {
    /// No items stored; queries answer with empty results
    Empty,
    /// Items were appended since the last build; queries fail
    Stale,
    /// Tree is current with the stored items
    Built(Tree),
}

/// In-memory kd-tree mapping N-dimensional points to values.
///
/// Points are appended with [`append`](Self::append) and become queryable after
/// [`build`](Self::build). Any append invalidates the built tree, and every query
/// then fails with [`KdTreeError::NotBuilt`] until `build()` is called again.
/// Several items may share identical coordinates; queries report all of them.
///
/// The tree never inspects values. Use `Rc<T>` or `Arc<T>` as `V` to share values
/// whose lifetime is managed elsewhere.
///
/// # Example
/// ```
/// use kdquery::KdTree;
///
/// let mut tree = KdTree::new(2)?;
/// tree.append(&[0.0, 0.0], "a")?;
/// tree.append(&[1.0, 1.0], "b")?;
/// tree.append(&[1.0, 1.0], "c")?;
/// tree.build();
///
/// let mut found = tree.find(&[1.0, 1.0])?;
/// found.sort();
/// assert_eq!(found, vec![&"b", &"c"]);
///
/// let closest = tree.find_closest(&[0.9, 0.9])?.expect("tree is not empty");
/// assert_eq!(closest.point, &[1.0, 1.0]);
/// # Ok::<(), kdquery::KdTreeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct KdTree<V> {
    pub(crate) points: Points,
    pub(crate) values: Vec<V>,
    pub(crate) state: TreeState,
}

impl<V> KdTree<V> {
    /// Creates an empty tree over `dimensions`-dimensional points.
    ///
    /// # Errors
    /// [`KdTreeError::ZeroDimensions`] if `dimensions` is 0.
    pub fn new(dimensions: usize) -> Result<Self, KdTreeError> {
        Self::with_capacity(dimensions, 0)
    }

    /// Creates an empty tree with room for `capacity` items before reallocating.
    ///
    /// # Errors
    /// [`KdTreeError::ZeroDimensions`] if `dimensions` is 0.
    ///
    /// # Example
    /// ```
    /// use kdquery::KdTree;
    /// let tree: KdTree<u32> = KdTree::with_capacity(3, 1000)?;
    /// assert_eq!(tree.dimensions(), 3);
    /// assert!(tree.is_empty());
    /// # Ok::<(), kdquery::KdTreeError>(())
    /// ```
    pub fn with_capacity(dimensions: usize, capacity: usize) -> Result<Self, KdTreeError> {
        if dimensions == 0 {
            return Err(KdTreeError::ZeroDimensions);
        }
        Ok(Self {
            points: Points::with_capacity(dimensions, capacity),
            values: Vec::with_capacity(capacity),
            state: TreeState::Empty,
        })
    }

    /// Dimensionality K of every point in this tree
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.points.dimensions()
    }

    /// Number of stored items, duplicates included
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no items are stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether queries can run right now.
    ///
    /// True after [`build`](Self::build) and for a tree that never held any items;
    /// false after any [`append`](Self::append) that has not been followed by a build.
    pub fn is_built(&self) -> bool {
        !matches!(self.state, TreeState::Stale)
    }

    /// Adds a point with its value and returns the new item's id.
    ///
    /// Ids are dense and assigned in append order starting at 0. The built tree, if
    /// any, is discarded.
    ///
    /// # Errors
    /// - [`KdTreeError::DimensionMismatch`] if `coords.len()` is not K.
    /// - [`KdTreeError::NonFiniteCoordinate`] if a component is NaN or infinite.
    ///
    /// On error the tree is left untouched.
    pub fn append(&mut self, coords: &[f64], value: V) -> Result<usize, KdTreeError> {
        self.check_dimensions(coords)?;
        if let Some(axis) = coords.iter().position(|c| !c.is_finite()) {
            return Err(KdTreeError::NonFiniteCoordinate { axis });
        }

        if matches!(self.state, TreeState::Built(_)) {
            trace!(items = self.len(), "append invalidates built kd-tree");
        }
        self.points.push(coords);
        self.values.push(value);
        self.state = TreeState::Stale;
        Ok(self.values.len() - 1)
    }

    /// Builds the tree over all stored items so queries can run.
    ///
    /// Does nothing when the tree is already built or holds no items. The build is a
    /// full rebuild: its cost does not depend on how many items were appended since
    /// the previous build.
    pub fn build(&mut self) {
        if !matches!(self.state, TreeState::Stale) {
            trace!("kd-tree already built");
            return;
        }

        let ids = (0..self.points.len()).collect();
        self.state = match build_tree(&self.points, ids) {
            Some(tree) => {
                debug!(
                    items = self.values.len(),
                    nodes = tree.nodes.len(),
                    depth = tree.depth,
                    "built kd-tree"
                );
                TreeState::Built(tree)
            }
            None => TreeState::Empty,
        };
    }

    /// Coordinates of item `id`, or `None` if no such item exists.
    pub fn point(&self, id: usize) -> Option<&[f64]> {
        (id < self.len()).then(|| self.points.get(id))
    }

    /// Value of item `id`, or `None` if no such item exists.
    pub fn value(&self, id: usize) -> Option<&V> {
        self.values.get(id)
    }

    /// Number of tree nodes, i.e. distinct point positions, in the built tree.
    ///
    /// Zero while the tree is empty or not built.
    pub fn node_count(&self) -> usize {
        match &self.state {
            TreeState::Built(tree) => tree.nodes.len(),
            TreeState::Empty | TreeState::Stale => 0,
        }
    }

    /// Length of the longest root-to-leaf path of the built tree.
    ///
    /// Zero while the tree is empty or not built.
    pub fn depth(&self) -> usize {
        match &self.state {
            TreeState::Built(tree) => tree.depth,
            TreeState::Empty | TreeState::Stale => 0,
        }
    }

    /// The current tree for querying: `None` if no items are stored.
    pub(crate) fn tree(&self) -> Result<Option<&Tree>, KdTreeError> {
        match &self.state {
            TreeState::Built(tree) => Ok(Some(tree)),
            TreeState::Empty => Ok(None),
            TreeState::Stale => Err(KdTreeError::NotBuilt),
        }
    }

    pub(crate) fn check_dimensions(&self, coords: &[f64]) -> Result<(), KdTreeError> {
        if coords.len() != self.dimensions() {
            return Err(KdTreeError::DimensionMismatch {
                expected: self.dimensions(),
                found: coords.len(),
            });
        }
        Ok(())
    }

    /// Validates a query argument: K components, none of them NaN.
    pub(crate) fn check_query(&self, coords: &[f64]) -> Result<(), KdTreeError> {
        self.check_dimensions(coords)?;
        if let Some(axis) = coords.iter().position(|c| c.is_nan()) {
            return Err(KdTreeError::NanCoordinate { axis });
        }
        Ok(())
    }
}
