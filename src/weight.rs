//! Weighted bin cell.

use bytemuck::{Pod, Zeroable};
use std::ops::AddAssign;

/// Per-bin accumulator for weighted fills.
///
/// Holds the sum of weights `w` and the sum of squared weights `w2`, from
/// which a histogram derives the bin value and its variance.
///
/// The layout is two native-endian `f64`s, so a slice of cells can be viewed
/// as bytes with [`bytemuck::cast_slice`].
///
/// # Examples
///
/// ```rust
/// use dinamico::weight::Weight;
///
/// let mut cell = Weight::default();
/// cell.add_weight(2.0);
/// cell.add_weight(0.5);
/// assert_eq!(cell.w, 2.5);
/// assert_eq!(cell.w2, 4.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Weight {
    /// Sum of weights.
    pub w: f64,
    /// Sum of squared weights.
    pub w2: f64,
}

impl Weight {
    /// Creates a cell with explicit sums.
    pub const fn new(w: f64, w2: f64) -> Self {
        Self { w, w2 }
    }

    /// Converts an unweighted count into a weighted cell.
    ///
    /// Every unweighted increment counts as a fill with weight 1, so both
    /// sums equal the count. This is the only place where that rule lives.
    ///
    /// ```rust
    /// use dinamico::weight::Weight;
    ///
    /// assert_eq!(Weight::from_count(7.0), Weight::new(7.0, 7.0));
    /// ```
    #[inline]
    pub const fn from_count(count: f64) -> Self {
        Self {
            w: count,
            w2: count,
        }
    }

    /// Adds one fill with weight `weight`.
    #[inline]
    pub fn add_weight(&mut self, weight: f64) {
        self.w += weight;
        self.w2 += weight * weight;
    }
}

impl AddAssign for Weight {
    #[inline]
    fn add_assign(&mut self, rhs: Weight) {
        self.w += rhs.w;
        self.w2 += rhs.w2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let cell = Weight::default();
        assert_eq!(cell.w, 0.0);
        assert_eq!(cell.w2, 0.0);
        assert_eq!(cell, Weight::zeroed());
    }

    #[test]
    fn test_add_weight() {
        let mut cell = Weight::default();
        cell.add_weight(3.0);
        assert_eq!(cell, Weight::new(3.0, 9.0));
        cell.add_weight(-1.0);
        assert_eq!(cell, Weight::new(2.0, 10.0));
    }

    #[test]
    fn test_from_count() {
        assert_eq!(Weight::from_count(0.0), Weight::default());
        assert_eq!(Weight::from_count(256.0), Weight::new(256.0, 256.0));
    }

    #[test]
    fn test_add_assign() {
        let mut a = Weight::new(1.0, 2.0);
        a += Weight::new(0.5, 0.25);
        assert_eq!(a, Weight::new(1.5, 2.25));
    }

    #[test]
    fn test_byte_view() {
        let cells = [Weight::new(1.0, 1.0), Weight::new(2.0, 4.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&cells);
        assert_eq!(bytes.len(), 32);
        let back: &[Weight] = bytemuck::cast_slice(bytes);
        assert_eq!(back, &cells);
    }
}
