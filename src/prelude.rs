//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use kdquery::prelude::*;
//! ```

pub use crate::{Bounds, Closest, Entry, KdTree, KdTreeError, Neighbor};
