//! Component-wise primitives over N-dimensional coordinate vectors.
//!
//! Coordinates are plain `&[f64]` slices; the tree stores them in one flat buffer
//! and hands out sub-slices. Every binary operation requires both operands to have
//! the same length. A mismatch here is a bug in the caller, so it is only checked
//! with `debug_assert_eq!`; the public [`KdTree`](crate::KdTree) API validates
//! dimensionality before anything reaches this module.

/// Sets `a` to the component-wise minimum of `a` and `b`.
#[inline]
pub fn set_min(a: &mut [f64], b: &[f64]) {
    debug_assert_eq!(a.len(), b.len(), "set_min: dimensionality mismatch");
    for (x, &y) in a.iter_mut().zip(b) {
        *x = x.min(y);
    }
}

/// Sets `a` to the component-wise maximum of `a` and `b`.
#[inline]
pub fn set_max(a: &mut [f64], b: &[f64]) {
    debug_assert_eq!(a.len(), b.len(), "set_max: dimensionality mismatch");
    for (x, &y) in a.iter_mut().zip(b) {
        *x = x.max(y);
    }
}

/// Returns the component-wise minimum of `a` and `b`.
pub fn min(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut res = a.to_vec();
    set_min(&mut res, b);
    res
}

/// Returns the component-wise maximum of `a` and `b`.
pub fn max(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut res = a.to_vec();
    set_max(&mut res, b);
    res
}

/// Returns the difference vector `a - b`.
pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len(), "sub: dimensionality mismatch");
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Dot product of two vectors.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "dot: dimensionality mismatch");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// 2^-600 and 2^600; multiplying by a power of two is exact
const DOWNSCALE: f64 = f64::from_bits(423 << 52);
const UPSCALE: f64 = f64::from_bits(1623 << 52);

/// Squared Euclidean distance between two points.
///
/// Equivalent to `dot(&sub(a, b), &sub(a, b))` without the temporary. Overflows to
/// infinity once a difference exceeds about 1.3e154; use [`distance`] to compare.
#[inline]
pub fn distance_squared(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "distance: dimensionality mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean length of the vector whose components `components` yields.
///
/// Squares are summed directly while that stays finite. Otherwise every component
/// is scaled down by 2^600 first, so the result is infinite only when the length
/// itself does not fit in an `f64`.
pub fn norm<I>(components: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let sum: f64 = components.clone().map(|c| c * c).sum();
    if sum.is_finite() {
        return sum.sqrt();
    }
    let scaled: f64 = components
        .map(|c| {
            let s = c * DOWNSCALE;
            s * s
        })
        .sum();
    scaled.sqrt() * UPSCALE
}

/// Euclidean (L2) distance between two points.
///
/// Finite whenever every coordinate difference and the distance itself are
/// representable, even when the squared distance is not.
#[inline]
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "distance: dimensionality mismatch");
    norm(a.iter().zip(b).map(|(x, y)| x - y))
}

/// Index of the largest component; ties go to the first occurrence.
///
/// Returns 0 for an empty slice.
pub fn arg_max(a: &[f64]) -> usize {
    let mut res = 0;
    for (i, &v) in a.iter().enumerate().skip(1) {
        if v > a[res] {
            res = i;
        }
    }
    res
}

/// Exact component-wise equality, no epsilon.
#[inline]
pub fn points_equal(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "points_equal: dimensionality mismatch");
    a.iter().zip(b).all(|(x, y)| x == y)
}

/// Writes `(x,y,z)` style text for a coordinate vector.
pub(crate) fn fmt_coords(f: &mut std::fmt::Formatter<'_>, coords: &[f64]) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_min_max_in_place() {
        let mut lo = vec![1.0, 5.0, -2.0];
        let mut hi = lo.clone();
        set_min(&mut lo, &[0.0, 6.0, -3.0]);
        set_max(&mut hi, &[0.0, 6.0, -3.0]);
        assert_eq!(lo, vec![0.0, 5.0, -3.0]);
        assert_eq!(hi, vec![1.0, 6.0, -2.0]);
    }

    #[test]
    fn test_value_returning_min_max() {
        let a = [1.0, 4.0];
        let b = [2.0, 3.0];
        assert_eq!(min(&a, &b), vec![1.0, 3.0]);
        assert_eq!(max(&a, &b), vec![2.0, 4.0]);
        // Operands are untouched
        assert_eq!(a, [1.0, 4.0]);
    }

    #[test]
    fn test_grow_from_infinity_is_identity() {
        let mut lo = vec![f64::INFINITY; 2];
        set_min(&mut lo, &[3.0, -7.0]);
        assert_eq!(lo, vec![3.0, -7.0]);
    }

    #[test]
    fn test_sub_and_dot() {
        let d = sub(&[3.0, 4.0, 1.0], &[1.0, 1.0, 1.0]);
        assert_eq!(d, vec![2.0, 3.0, 0.0]);
        assert_eq!(dot(&d, &d), 13.0);
        assert_eq!(dot(&[1.0, 2.0], &[3.0, -4.0]), -5.0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(distance_squared(&[1.0, 1.0, 1.0], &[2.0, 2.0, 2.0]), 3.0);
        assert_eq!(distance(&[2.5], &[2.5]), 0.0);
        let d = sub(&[0.0, 0.0], &[3.0, 4.0]);
        assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), dot(&d, &d).sqrt());
    }

    #[test]
    fn test_distance_beyond_squared_overflow() {
        assert_eq!(distance_squared(&[1e200], &[-1e200]), f64::INFINITY);
        assert_eq!(distance(&[1e200], &[-1e200]), 1e200 * 2.0);
        assert_eq!(distance(&[0.0, -1e300], &[0.0, 1e300]), 1e300 * 2.0);

        let d = distance(&[0.0, 0.0], &[3e200, 4e200]);
        assert!((d - 5e200).abs() / 5e200 < 1e-15, "3-4-5 triangle at 1e200 gave {d}");
        // Larger magnitude still orders correctly
        assert!(distance(&[0.0], &[2e200]) < distance(&[0.0], &[3e200]));
    }

    #[test]
    fn test_distance_infinite_only_when_unrepresentable() {
        assert_eq!(distance(&[f64::MAX], &[-f64::MAX]), f64::INFINITY);
        assert_eq!(distance(&[f64::INFINITY, 0.0], &[1.0, 1.0]), f64::INFINITY);
        assert_eq!(distance(&[f64::MAX, 0.0], &[0.0, 0.0]), f64::MAX);
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm([3.0, 4.0].into_iter()), 5.0);
        assert_eq!(norm([-3.0, -4.0].into_iter()), 5.0);
        assert_eq!(norm(std::iter::empty()), 0.0);
        assert_eq!(norm([1e300, 0.0].into_iter()), 1e300);
    }

    #[test]
    fn test_arg_max_first_occurrence_wins() {
        assert_eq!(arg_max(&[1.0, 3.0, 2.0]), 1);
        assert_eq!(arg_max(&[2.0, 5.0, 5.0]), 1);
        assert_eq!(arg_max(&[4.0, 4.0]), 0);
        assert_eq!(arg_max(&[7.0]), 0);
    }

    #[test]
    fn test_points_equal_is_exact() {
        assert!(points_equal(&[1.0, 2.0], &[1.0, 2.0]));
        assert!(!points_equal(&[1.0, 2.0], &[1.0, 2.0 + 1e-12]));
        assert!(points_equal(&[0.0], &[-0.0]));
    }
}
