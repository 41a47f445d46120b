//! N-dimensional axis-aligned bounding boxes.

use std::fmt;

use crate::geometry::{self, arg_max, norm, set_max, set_min};

/// Axis-aligned box: one `[lower, upper]` interval per dimension.
///
/// Two special boxes exist besides boxes around real data:
/// - [`Bounds::empty`] has `lower = +inf`, `upper = -inf`; growing it by a point
///   yields the degenerate box around that point.
/// - [`Bounds::infinite`] has `lower = -inf`, `upper = +inf`; it overlaps everything
///   and is the starting box of every tree traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Component-wise lower corner
    pub lower: Vec<f64>,
    /// Component-wise upper corner
    pub upper: Vec<f64>,
}

impl Bounds {
    /// Creates the empty box, the identity for [`grow`](Self::grow).
    pub fn empty(dimensions: usize) -> Self {
        Self {
            lower: vec![f64::INFINITY; dimensions],
            upper: vec![f64::NEG_INFINITY; dimensions],
        }
    }

    /// Creates the box covering all of space.
    pub fn infinite(dimensions: usize) -> Self {
        Self {
            lower: vec![f64::NEG_INFINITY; dimensions],
            upper: vec![f64::INFINITY; dimensions],
        }
    }

    /// Creates a box from its two corners.
    ///
    /// # Panics
    /// In debug builds, if the corners have different lengths.
    pub fn from_corners(lower: &[f64], upper: &[f64]) -> Self {
        debug_assert_eq!(lower.len(), upper.len(), "box corners differ in dimensionality");
        Self {
            lower: lower.to_vec(),
            upper: upper.to_vec(),
        }
    }

    /// Number of dimensions of this box.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.lower.len()
    }

    /// Grows this box in place so it includes `point`.
    pub fn grow(&mut self, point: &[f64]) {
        set_min(&mut self.lower, point);
        set_max(&mut self.upper, point);
    }

    /// Returns a copy of this box grown to include `point`.
    #[must_use]
    pub fn including(&self, point: &[f64]) -> Self {
        Self {
            lower: geometry::min(&self.lower, point),
            upper: geometry::max(&self.upper, point),
        }
    }

    /// Dimension along which the box is widest; ties go to the lowest dimension.
    pub fn widest_dimension(&self) -> usize {
        arg_max(&geometry::sub(&self.upper, &self.lower))
    }

    /// Whether the box has collapsed to a single point.
    pub fn is_degenerate(&self) -> bool {
        geometry::points_equal(&self.lower, &self.upper)
    }

    /// Box/box overlap test. Touching boxes overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        debug_assert_eq!(self.dimensions(), other.dimensions(), "overlaps: dimensionality mismatch");
        (0..self.dimensions())
            .all(|i| self.lower[i] <= other.upper[i] && self.upper[i] >= other.lower[i])
    }

    /// Box/point overlap test: the point counts as a zero-sized box.
    pub fn contains_point(&self, point: &[f64]) -> bool {
        debug_assert_eq!(self.dimensions(), point.len(), "contains_point: dimensionality mismatch");
        point
            .iter()
            .enumerate()
            .all(|(i, &p)| self.lower[i] <= p && self.upper[i] >= p)
    }

    /// Smallest Euclidean distance from `point` to any point inside this box.
    ///
    /// Zero when the point is inside. Per axis the gap is taken to the nearer face,
    /// so an infinite component inside an unbounded axis contributes nothing.
    /// Never larger than [`distance`](crate::geometry::distance) from `point` to
    /// any point in the box.
    pub fn distance_to_point(&self, point: &[f64]) -> f64 {
        debug_assert_eq!(self.dimensions(), point.len(), "distance_to_point: dimensionality mismatch");
        norm(point.iter().enumerate().map(|(i, &p)| {
            if p < self.lower[i] {
                self.lower[i] - p
            } else if p > self.upper[i] {
                p - self.upper[i]
            } else {
                0.0
            }
        }))
    }

    /// Copy of this box with the upper bound along `dim` clamped to `value`.
    #[must_use]
    pub fn with_upper(&self, dim: usize, value: f64) -> Self {
        let mut res = self.clone();
        res.upper[dim] = res.upper[dim].min(value);
        res
    }

    /// Copy of this box with the lower bound along `dim` clamped to `value`.
    #[must_use]
    pub fn with_lower(&self, dim: usize, value: f64) -> Self {
        let mut res = self.clone();
        res.lower[dim] = res.lower[dim].max(value);
        res
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        geometry::fmt_coords(f, &self.lower)?;
        write!(f, ",")?;
        geometry::fmt_coords(f, &self.upper)?;
        write!(f, "}}")
    }
}
