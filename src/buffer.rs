//! Adaptive buffer: one contiguous array of bins in a single representation.
//!
//! [`Buffer`] owns the bins of a storage. The active representation is the
//! variant of a closed enum, each variant holding its own `Vec`, so there is
//! never more than one live array and every bin always shares the same
//! element type.
//!
//! # Promotion
//!
//! Unweighted adds go through [`Buffer::add_count`]. When the add does not
//! fit the current width, the whole buffer is widened one step along the
//! [`Representation`] chain and the add is retried:
//!
//! ```text
//!   add_count(i, n)
//!        │
//!        ▼
//!   ┌──────────────┐   fits    ┌──────────────┐
//!   │ checked add  │ ────────► │     done     │
//!   └──────────────┘           └──────────────┘
//!        │ overflow
//!        ▼
//!   ┌──────────────┐
//!   │   widen()    │ ──► retry (BigInt and Weighted always fit)
//!   └──────────────┘
//! ```
//!
//! The new array is always built before the old one is dropped, so an
//! allocation failure leaves the prior contents untouched.

use num_bigint::BigUint;
use num_traits::{CheckedAdd, FromPrimitive, ToPrimitive, Zero};
use tracing::{debug, trace};

use crate::representation::Representation;
use crate::weight::Weight;

/// Owned bin arrays, one variant per representation.
#[derive(Debug, Default)]
pub(crate) enum Cells {
    #[default]
    Empty,
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    BigInt(Vec<BigUint>),
    Weighted(Vec<Weight>),
}

impl Cells {
    /// Zero-filled array of `size` elements in `representation`.
    pub(crate) fn zeroed(representation: Representation, size: usize) -> Self {
        match representation {
            Representation::Empty => Cells::Empty,
            Representation::U8 => Cells::U8(vec![0; size]),
            Representation::U16 => Cells::U16(vec![0; size]),
            Representation::U32 => Cells::U32(vec![0; size]),
            Representation::U64 => Cells::U64(vec![0; size]),
            Representation::BigInt => Cells::BigInt(vec![BigUint::zero(); size]),
            Representation::Weighted => Cells::Weighted(vec![Weight::default(); size]),
        }
    }

    pub(crate) fn representation(&self) -> Representation {
        match self {
            Cells::Empty => Representation::Empty,
            Cells::U8(_) => Representation::U8,
            Cells::U16(_) => Representation::U16,
            Cells::U32(_) => Representation::U32,
            Cells::U64(_) => Representation::U64,
            Cells::BigInt(_) => Representation::BigInt,
            Cells::Weighted(_) => Representation::Weighted,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.view().len()
    }

    fn view(&self) -> RawCells<'_> {
        match self {
            Cells::Empty => RawCells::Empty,
            Cells::U8(c) => RawCells::U8(c),
            Cells::U16(c) => RawCells::U16(c),
            Cells::U32(c) => RawCells::U32(c),
            Cells::U64(c) => RawCells::U64(c),
            Cells::BigInt(c) => RawCells::BigInt(c),
            Cells::Weighted(c) => RawCells::Weighted(c),
        }
    }
}

impl Clone for Cells {
    fn clone(&self) -> Self {
        match self {
            Cells::Empty => Cells::Empty,
            Cells::U8(c) => Cells::U8(c.clone()),
            Cells::U16(c) => Cells::U16(c.clone()),
            Cells::U32(c) => Cells::U32(c.clone()),
            Cells::U64(c) => Cells::U64(c.clone()),
            Cells::BigInt(c) => Cells::BigInt(c.clone()),
            Cells::Weighted(c) => Cells::Weighted(c.clone()),
        }
    }

    /// Reuses the existing allocation when both sides share a representation.
    fn clone_from(&mut self, source: &Self) {
        match (self, source) {
            (Cells::U8(dst), Cells::U8(src)) => dst.clone_from(src),
            (Cells::U16(dst), Cells::U16(src)) => dst.clone_from(src),
            (Cells::U32(dst), Cells::U32(src)) => dst.clone_from(src),
            (Cells::U64(dst), Cells::U64(src)) => dst.clone_from(src),
            (Cells::BigInt(dst), Cells::BigInt(src)) => dst.clone_from(src),
            (Cells::Weighted(dst), Cells::Weighted(src)) => dst.clone_from(src),
            (dst, src) => *dst = src.clone(),
        }
    }
}

/// Borrowed view of a buffer's bins in their current representation.
///
/// The view borrows the buffer, so it cannot outlive the next mutating
/// call: any promotion reallocates the bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawCells<'a> {
    /// No storage allocated.
    Empty,
    /// 8-bit counts.
    U8(&'a [u8]),
    /// 16-bit counts.
    U16(&'a [u16]),
    /// 32-bit counts.
    U32(&'a [u32]),
    /// 64-bit counts.
    U64(&'a [u64]),
    /// Arbitrary-precision counts.
    BigInt(&'a [BigUint]),
    /// Weighted cells.
    Weighted(&'a [Weight]),
}

impl<'a> RawCells<'a> {
    /// Representation of the viewed bins.
    pub fn representation(&self) -> Representation {
        match self {
            RawCells::Empty => Representation::Empty,
            RawCells::U8(_) => Representation::U8,
            RawCells::U16(_) => Representation::U16,
            RawCells::U32(_) => Representation::U32,
            RawCells::U64(_) => Representation::U64,
            RawCells::BigInt(_) => Representation::BigInt,
            RawCells::Weighted(_) => Representation::Weighted,
        }
    }

    /// Number of allocated elements (`0` for `Empty`).
    pub fn len(&self) -> usize {
        match self {
            RawCells::Empty => 0,
            RawCells::U8(c) => c.len(),
            RawCells::U16(c) => c.len(),
            RawCells::U32(c) => c.len(),
            RawCells::U64(c) => c.len(),
            RawCells::BigInt(c) => c.len(),
            RawCells::Weighted(c) => c.len(),
        }
    }

    /// Returns `true` if no element is allocated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native-endian byte view of the elements.
    ///
    /// Returns `None` for `BigInt`, whose digits live in separate heap
    /// allocations. `Empty` yields an empty slice.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            RawCells::Empty => Some(&[]),
            RawCells::U8(c) => Some(c),
            RawCells::U16(c) => Some(bytemuck::cast_slice(c)),
            RawCells::U32(c) => Some(bytemuck::cast_slice(c)),
            RawCells::U64(c) => Some(bytemuck::cast_slice(c)),
            RawCells::BigInt(_) => None,
            RawCells::Weighted(c) => Some(bytemuck::cast_slice(c)),
        }
    }
}

/// Adds `count` to `cell` if the result fits in `T`.
#[inline]
fn add_within<T>(cell: &mut T, count: u64) -> bool
where
    T: CheckedAdd + FromPrimitive,
{
    match T::from_u64(count).and_then(|count| cell.checked_add(&count)) {
        Some(sum) => {
            *cell = sum;
            true
        }
        None => false,
    }
}

/// Closest `f64` to an arbitrary-precision count.
#[inline]
pub(crate) fn big_to_f64(count: &BigUint) -> f64 {
    count.to_f64().unwrap_or(f64::INFINITY)
}

fn to_weighted(counts: impl Iterator<Item = f64>) -> Vec<Weight> {
    counts.map(Weight::from_count).collect()
}

/// A fixed-size array of bins sharing one adaptive representation.
///
/// A new buffer starts `Empty`: nothing is allocated and every bin reads as
/// zero. The first add allocates `U8` storage.
///
/// Indexes passed to the accessors must be below [`size`](Buffer::size);
/// out-of-range indexes panic on allocated buffers.
///
/// # Examples
///
/// ```rust
/// use dinamico::buffer::Buffer;
/// use dinamico::representation::Representation;
///
/// let mut buffer = Buffer::new(2);
/// assert_eq!(buffer.representation(), Representation::Empty);
///
/// buffer.add_count(0, 300);
/// assert_eq!(buffer.representation(), Representation::U16);
/// assert_eq!(buffer.value(0), 300.0);
/// ```
#[derive(Debug, Default)]
pub struct Buffer {
    size: usize,
    cells: Cells,
}

impl Buffer {
    /// Creates an `Empty` buffer with `size` bins.
    pub const fn new(size: usize) -> Self {
        Self {
            size,
            cells: Cells::Empty,
        }
    }

    pub(crate) fn from_cells(cells: Cells) -> Self {
        Self {
            size: cells.len(),
            cells,
        }
    }

    /// Number of bins.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current representation of every bin.
    #[inline]
    pub fn representation(&self) -> Representation {
        self.cells.representation()
    }

    /// Borrowed view of the current bins.
    #[inline]
    pub fn cells(&self) -> RawCells<'_> {
        self.cells.view()
    }

    /// Replaces the bins with a zero-filled array in `representation`.
    pub fn allocate(&mut self, representation: Representation) {
        trace!(%representation, size = self.size, "allocating counter storage");
        self.cells = Cells::zeroed(representation, self.size);
    }

    /// Widens every bin to the next representation in the chain.
    ///
    /// An `Empty` buffer is allocated as zero-filled `U8`. Calling this on a
    /// terminal representation (`BigInt`, `Weighted`) leaves the buffer
    /// unchanged.
    pub fn widen(&mut self) {
        let from = self.representation();
        let widened = match &self.cells {
            Cells::Empty => Cells::zeroed(Representation::U8, self.size),
            Cells::U8(c) => Cells::U16(c.iter().map(|&v| u16::from(v)).collect()),
            Cells::U16(c) => Cells::U32(c.iter().map(|&v| u32::from(v)).collect()),
            Cells::U32(c) => Cells::U64(c.iter().map(|&v| u64::from(v)).collect()),
            Cells::U64(c) => Cells::BigInt(c.iter().map(|&v| BigUint::from(v)).collect()),
            Cells::BigInt(_) | Cells::Weighted(_) => {
                debug_assert!(false, "cannot widen terminal representation {from}");
                return;
            }
        };
        debug!(%from, to = %widened.representation(), size = self.size, "widened counter storage");
        self.cells = widened;
    }

    /// Switches the buffer to weighted cells.
    ///
    /// Each existing count `c` becomes [`Weight::from_count`]`(c)`. An
    /// `Empty` buffer gets zero-filled weighted cells. Already weighted
    /// buffers are left untouched.
    pub fn convert_to_weighted(&mut self) {
        let weighted = match &self.cells {
            Cells::Weighted(_) => return,
            Cells::Empty => vec![Weight::default(); self.size],
            Cells::U8(c) => to_weighted(c.iter().map(|&v| f64::from(v))),
            Cells::U16(c) => to_weighted(c.iter().map(|&v| f64::from(v))),
            Cells::U32(c) => to_weighted(c.iter().map(|&v| f64::from(v))),
            Cells::U64(c) => to_weighted(c.iter().map(|&v| v as f64)),
            Cells::BigInt(c) => to_weighted(c.iter().map(big_to_f64)),
        };
        debug!(from = %self.representation(), size = self.size, "converted counter storage to weighted");
        self.cells = Cells::Weighted(weighted);
    }

    /// Adds an unweighted `count` to bin `index`, widening as needed.
    ///
    /// A weighted buffer treats the count as `count` fills of weight 1.
    pub fn add_count(&mut self, index: usize, count: u64) {
        loop {
            let added = match &mut self.cells {
                Cells::Empty => false,
                Cells::U8(c) => add_within(&mut c[index], count),
                Cells::U16(c) => add_within(&mut c[index], count),
                Cells::U32(c) => add_within(&mut c[index], count),
                Cells::U64(c) => add_within(&mut c[index], count),
                Cells::BigInt(c) => {
                    c[index] += count;
                    true
                }
                Cells::Weighted(c) => {
                    c[index] += Weight::from_count(count as f64);
                    true
                }
            };
            if added {
                return;
            }
            self.widen();
        }
    }

    /// Adds an arbitrary-precision `count` to bin `index`.
    pub fn add_big(&mut self, index: usize, count: &BigUint) {
        if let Some(small) = count.to_u64() {
            self.add_count(index, small);
            return;
        }
        // Larger than any fixed width: only BigInt or Weighted can take it.
        loop {
            let added = match &mut self.cells {
                Cells::BigInt(c) => {
                    c[index] += count;
                    true
                }
                Cells::Weighted(c) => {
                    c[index] += Weight::from_count(big_to_f64(count));
                    true
                }
                _ => false,
            };
            if added {
                return;
            }
            self.widen();
        }
    }

    /// Adds a fill of weight `weight` to bin `index`, converting to weighted
    /// cells first.
    pub fn add_weight(&mut self, index: usize, weight: f64) {
        self.convert_to_weighted();
        if let Cells::Weighted(c) = &mut self.cells {
            c[index].add_weight(weight);
        }
    }

    /// Adds a whole weighted cell to bin `index`, converting to weighted
    /// cells first.
    pub fn add_cell(&mut self, index: usize, cell: Weight) {
        self.convert_to_weighted();
        if let Cells::Weighted(c) = &mut self.cells {
            c[index] += cell;
        }
    }

    /// Count (or sum of weights) of bin `index` as `f64`.
    pub fn value(&self, index: usize) -> f64 {
        match &self.cells {
            Cells::Weighted(c) => c[index].w,
            _ => self.count(index),
        }
    }

    /// Variance estimate of bin `index` as `f64`.
    ///
    /// Unweighted counts are Poisson, so their variance is the count itself.
    pub fn variance(&self, index: usize) -> f64 {
        match &self.cells {
            Cells::Weighted(c) => c[index].w2,
            _ => self.count(index),
        }
    }

    #[inline]
    fn count(&self, index: usize) -> f64 {
        match &self.cells {
            Cells::Empty => 0.0,
            Cells::U8(c) => f64::from(c[index]),
            Cells::U16(c) => f64::from(c[index]),
            Cells::U32(c) => f64::from(c[index]),
            Cells::U64(c) => c[index] as f64,
            Cells::BigInt(c) => big_to_f64(&c[index]),
            Cells::Weighted(c) => c[index].w,
        }
    }

    /// Moves the bins out, leaving this buffer `Empty` with size 0.
    pub fn take(&mut self) -> Buffer {
        std::mem::take(self)
    }
}

impl Clone for Buffer {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            cells: self.cells.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.size = source.size;
        self.cells.clone_from(&source.cells);
    }
}
