//! # kdquery - N-dimensional kd-tree
//!
//! An in-memory spatial index mapping N-dimensional points to values, with exact,
//! nearest-neighbor, k-nearest-neighbor, box range and radius queries.
//!
//! ## Features
//!
//! - **Any dimensionality**: the dimension count K is chosen per tree at runtime
//! - **Duplicate points**: several values may share a point; queries return all of them
//! - **Opaque values**: the tree stores any `V` and only ever hands out `&V`
//! - **Static optimization**: build once, query many times; appending invalidates the tree
//!
//! ## Quick Start
//!
//! ```rust
//! use kdquery::prelude::*;
//!
//! // Create a 2-dimensional tree
//! let mut tree = KdTree::new(2)?;
//!
//! tree.append(&[0.0, 0.0], "a")?;
//! tree.append(&[1.0, 1.0], "b")?;
//! tree.append(&[1.0, 1.0], "c")?;
//!
//! // Build the index (required before querying)
//! tree.build();
//!
//! // Nearest point and every value stored there
//! let closest = tree.find_closest(&[0.9, 0.9])?.expect("tree is not empty");
//! assert_eq!(closest.point, &[1.0, 1.0]);
//! assert_eq!(closest.values.len(), 2);
//!
//! // k nearest items, closest first
//! let nearest = tree.knn(1, &[0.1, 0.1])?;
//! assert_eq!(*nearest[0].value, "a");
//!
//! // Everything inside a box, boundaries included
//! let values = tree.all_values_in_range(&[0.0, 0.0], &[1.0, 1.0])?;
//! assert_eq!(values.len(), 3);
//!
//! // Appending invalidates the tree until the next build
//! tree.append(&[5.0, 5.0], "d")?;
//! assert_eq!(tree.find(&[5.0, 5.0]), Err(KdTreeError::NotBuilt));
//! # Ok::<(), KdTreeError>(())
//! ```
//!
//! ## How It Works
//!
//! Each tree node holds a real data point (the pivot) plus every item sharing its
//! coordinates. A node splits its items along the widest dimension of their bounding
//! box, choosing the item nearest the middle of that extent as pivot: items strictly
//! below the pivot go left, everything else goes right. Queries walk the tree with
//! explicit stacks and prune subtrees by their bounding box or by the distance to the
//! splitting plane.
//!
//! The tree is not thread-safe in the sense of interior synchronization: share it
//! across threads only behind your own lock, or build it once and share `&KdTree`.

pub mod bounds;
mod build;
pub mod error;
pub mod geometry;
pub mod kdtree;
pub mod prelude;
pub mod queries;

pub use bounds::Bounds;
pub use error::KdTreeError;
pub use kdtree::KdTree;
pub use queries::{Closest, Entry, Neighbor};
