//! Dynamic histogram storage with adaptive-precision bins.
//!
//! [`DynamicStorage`] is the per-bin backend a histogram fills. It starts
//! with no allocation at all, switches to 8-bit counts on the first fill, and
//! widens the whole array whenever a bin would overflow. Weighted fills
//! switch it to `(sum of weights, sum of squared weights)` cells.
//!
//! # Example
//!
//! ```rust
//! use dinamico::storage::DynamicStorage;
//! use dinamico::representation::Representation;
//!
//! let mut storage = DynamicStorage::new(3);
//! for _ in 0..255 {
//!     storage.increase(0);
//! }
//! assert_eq!(storage.representation(), Representation::U8);
//!
//! storage.increase(0);
//! assert_eq!(storage.value(0), 256.0);
//! assert_eq!(storage.representation(), Representation::U16);
//!
//! storage.increase_weighted(1, 2.5);
//! assert_eq!(storage.representation(), Representation::Weighted);
//! assert_eq!(storage.value(1), 2.5);
//! assert_eq!(storage.variance(1), 6.25);
//! assert_eq!(storage.variance(0), 256.0);
//! ```

use std::fmt::{self, Debug};
use std::ops::AddAssign;

use crate::buffer::{Buffer, RawCells};
use crate::error::{Result, StorageError};
use crate::fixed::{FixedStorage, Integral};
use crate::representation::Representation;

/// Adaptive-precision counter array.
///
/// Cloning is deep. [`take`](DynamicStorage::take) moves the bins out and
/// leaves the source empty with size 0.
///
/// Bin indexes must be below [`size`](DynamicStorage::size). Out-of-range
/// indexes are a caller error: they panic once storage is allocated and are
/// silently read as zero while the storage is still `Empty`.
#[derive(Default)]
pub struct DynamicStorage {
    buffer: Buffer,
}

impl DynamicStorage {
    /// Creates an empty storage with `size` bins. Nothing is allocated until
    /// the first fill.
    pub const fn new(size: usize) -> Self {
        Self {
            buffer: Buffer::new(size),
        }
    }

    /// Imports the bins of a fixed-width counter array.
    ///
    /// The representation is the narrowest one holding the element type
    /// exactly, regardless of the actual values. Negative bins of signed
    /// element types are clamped to zero.
    pub fn from_fixed<S>(fixed: &S) -> Self
    where
        S: FixedStorage + ?Sized,
    {
        Self {
            buffer: <S::Element as Integral>::to_buffer(fixed.data()),
        }
    }

    /// Imports the bins of a fixed-width counter array, rejecting negative
    /// counts from signed element types.
    pub fn try_from_fixed<S>(fixed: &S) -> Result<Self>
    where
        S: FixedStorage + ?Sized,
    {
        Ok(Self {
            buffer: <S::Element as Integral>::try_to_buffer(fixed.data())?,
        })
    }

    /// Replaces size and contents with those of a fixed-width counter array.
    pub fn assign_from<S>(&mut self, fixed: &S)
    where
        S: FixedStorage + ?Sized,
    {
        self.buffer = <S::Element as Integral>::to_buffer(fixed.data());
    }

    /// Number of bins.
    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    /// Byte width of one bin in the current representation.
    #[inline]
    pub fn depth(&self) -> usize {
        self.representation().depth()
    }

    /// Current representation shared by every bin.
    #[inline]
    pub fn representation(&self) -> Representation {
        self.buffer.representation()
    }

    /// Borrowed view of the bins in their current representation.
    ///
    /// The view is tied to a shared borrow of the storage, so it cannot be
    /// held across [`increase`](Self::increase) or a merge, both of which
    /// may reallocate.
    #[inline]
    pub fn cells(&self) -> RawCells<'_> {
        self.buffer.cells()
    }

    /// Native-endian bytes of the bins, `None` when they are `BigInt`.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.buffer.cells().as_bytes()
    }

    /// Adds one unweighted count to bin `index`.
    #[inline]
    pub fn increase(&mut self, index: usize) {
        self.buffer.add_count(index, 1);
    }

    /// Adds a fill of weight `weight` to bin `index`.
    ///
    /// The first weighted fill converts every bin to weighted cells; prior
    /// counts `c` become `(w = c, w2 = c)`.
    #[inline]
    pub fn increase_weighted(&mut self, index: usize, weight: f64) {
        self.buffer.add_weight(index, weight);
    }

    /// Switches every bin to weighted cells without adding anything.
    pub fn convert_to_weighted(&mut self) {
        self.buffer.convert_to_weighted();
    }

    /// Content of bin `index`: the count, or the sum of weights.
    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        self.buffer.value(index)
    }

    /// Variance estimate of bin `index`: the count for unweighted bins, the
    /// sum of squared weights for weighted ones.
    #[inline]
    pub fn variance(&self, index: usize) -> f64 {
        self.buffer.variance(index)
    }

    /// Adds `other` bin by bin.
    ///
    /// Both storages must have the same size; this is only checked in debug
    /// builds. Use [`try_merge`](Self::try_merge) for a checked version.
    ///
    /// The destination may end up wider than both operands: when any single
    /// bin overflows, the whole destination is promoted.
    pub fn merge(&mut self, other: &DynamicStorage) {
        debug_assert_eq!(self.size(), other.size(), "merging storages of different size");
        match other.cells() {
            RawCells::Empty => {}
            RawCells::U8(src) => self.merge_counts(src.iter().map(|&c| u64::from(c))),
            RawCells::U16(src) => self.merge_counts(src.iter().map(|&c| u64::from(c))),
            RawCells::U32(src) => self.merge_counts(src.iter().map(|&c| u64::from(c))),
            RawCells::U64(src) => self.merge_counts(src.iter().copied()),
            RawCells::BigInt(src) => {
                for (index, count) in src.iter().enumerate() {
                    self.buffer.add_big(index, count);
                }
            }
            RawCells::Weighted(src) => {
                self.buffer.convert_to_weighted();
                for (index, &cell) in src.iter().enumerate() {
                    self.buffer.add_cell(index, cell);
                }
            }
        }
    }

    /// Like [`merge`](Self::merge), but fails instead of misbehaving when
    /// the sizes differ.
    pub fn try_merge(&mut self, other: &DynamicStorage) -> Result<()> {
        if self.size() != other.size() {
            return Err(StorageError::SizeMismatch {
                left: self.size(),
                right: other.size(),
            });
        }
        self.merge(other);
        Ok(())
    }

    fn merge_counts(&mut self, counts: impl Iterator<Item = u64>) {
        for (index, count) in counts.enumerate() {
            self.buffer.add_count(index, count);
        }
    }

    /// Moves the bins out, leaving this storage empty with size 0.
    pub fn take(&mut self) -> DynamicStorage {
        Self {
            buffer: self.buffer.take(),
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn from_buffer(buffer: Buffer) -> Self {
        Self { buffer }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}

impl Clone for DynamicStorage {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
        }
    }

    /// Reuses the existing bins when size and representation already match.
    fn clone_from(&mut self, source: &Self) {
        self.buffer.clone_from(&source.buffer);
    }
}

impl AddAssign<&DynamicStorage> for DynamicStorage {
    #[inline]
    fn add_assign(&mut self, rhs: &DynamicStorage) {
        self.merge(rhs);
    }
}

impl<T: Integral> From<&[T]> for DynamicStorage {
    fn from(values: &[T]) -> Self {
        Self::from_fixed(values)
    }
}

impl<T: Integral> From<Vec<T>> for DynamicStorage {
    fn from(values: Vec<T>) -> Self {
        Self::from_fixed(&values)
    }
}

impl PartialEq for DynamicStorage {
    /// Storages are equal when they have the same size and every bin has
    /// the same value and variance, whatever their representations.
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size()
            && (0..self.size()).all(|i| {
                self.value(i) == other.value(i) && self.variance(i) == other.variance(i)
            })
    }
}

impl Debug for DynamicStorage {
    /// Formats the storage showing non-zero bins only.
    ///
    /// Output format: `representation[size]{ [bin]:value ... }`, with
    /// weighted bins shown as `[bin]:value±variance`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{{", self.representation(), self.size())?;
        if self.representation() != Representation::Empty {
            let weighted = self.representation() == Representation::Weighted;
            for i in 0..self.size() {
                let (value, variance) = (self.value(i), self.variance(i));
                if value == 0.0 && variance == 0.0 {
                    continue;
                }
                if weighted {
                    write!(f, " [{i}]:{value}±{variance}")?;
                } else {
                    write!(f, " [{i}]:{value}")?;
                }
            }
        }
        write!(f, " }}")
    }
}
