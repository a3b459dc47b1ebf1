//! Import from fixed-width counter arrays.
//!
//! A histogram may start out on a static storage with a known integer type
//! and later switch to a [`DynamicStorage`](crate::storage::DynamicStorage).
//! Anything implementing [`FixedStorage`] can be imported: the bins are
//! copied into the narrowest representation that holds the element type
//! exactly.
//!
//! | Element type | Representation |
//! |--------------|----------------|
//! | `u8`         | `U8`           |
//! | `u16`        | `U16`          |
//! | `u32`        | `U32`          |
//! | `u64`        | `U64`          |
//! | `usize`      | `U32` or `U64`, by pointer width |
//! | `i8` .. `i64`, `isize` | same-width unsigned representation |
//!
//! Signed bins cannot hold a negative count. The infallible import clamps
//! negative bins to zero; [`DynamicStorage::try_from_fixed`] rejects them
//! with [`StorageError::NegativeCount`] instead.
//!
//! [`DynamicStorage::try_from_fixed`]: crate::storage::DynamicStorage::try_from_fixed
//!
//! ```rust
//! use dinamico::storage::DynamicStorage;
//! use dinamico::representation::Representation;
//!
//! let counts: Vec<u16> = vec![1, 2, 3];
//! let storage = DynamicStorage::from_fixed(&counts);
//! assert_eq!(storage.size(), 3);
//! assert_eq!(storage.representation(), Representation::U16);
//! assert_eq!(storage.value(2), 3.0);
//! ```

use crate::buffer::{Buffer, Cells};
use crate::error::{Result, StorageError};
use crate::representation::Representation;

mod sealed {
    pub trait Sealed {}
}

/// Integer element types a fixed storage may hold.
///
/// This trait is sealed: the set of representations is closed.
pub trait Integral: Copy + sealed::Sealed {
    /// Narrowest representation holding every non-negative value of `Self`.
    const REPRESENTATION: Representation;

    /// Copies `values` into a buffer in [`Self::REPRESENTATION`], clamping
    /// negative values to zero.
    fn to_buffer(values: &[Self]) -> Buffer;

    /// Copies `values` into a buffer in [`Self::REPRESENTATION`], failing on
    /// the first negative value.
    fn try_to_buffer(values: &[Self]) -> Result<Buffer> {
        Ok(Self::to_buffer(values))
    }
}

macro_rules! impl_integral {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Integral for $ty {
                const REPRESENTATION: Representation = Representation::$variant;

                #[inline]
                fn to_buffer(values: &[Self]) -> Buffer {
                    Buffer::from_cells(Cells::$variant(values.to_vec()))
                }
            }
        )*
    };
}

impl_integral!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl sealed::Sealed for usize {}

impl Integral for usize {
    #[cfg(target_pointer_width = "32")]
    const REPRESENTATION: Representation = Representation::U32;
    #[cfg(not(target_pointer_width = "32"))]
    const REPRESENTATION: Representation = Representation::U64;

    fn to_buffer(values: &[Self]) -> Buffer {
        #[cfg(target_pointer_width = "32")]
        let cells = Cells::U32(values.iter().map(|&v| v as u32).collect());
        #[cfg(not(target_pointer_width = "32"))]
        let cells = Cells::U64(values.iter().map(|&v| v as u64).collect());
        Buffer::from_cells(cells)
    }
}

macro_rules! impl_signed_integral {
    ($($ty:ty => $unsigned:ty, $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Integral for $ty {
                const REPRESENTATION: Representation = Representation::$variant;

                fn to_buffer(values: &[Self]) -> Buffer {
                    let cells = values
                        .iter()
                        .map(|&v| <$unsigned>::try_from(v).unwrap_or(0))
                        .collect();
                    Buffer::from_cells(Cells::$variant(cells))
                }

                fn try_to_buffer(values: &[Self]) -> Result<Buffer> {
                    let cells = values
                        .iter()
                        .enumerate()
                        .map(|(index, &v)| {
                            <$unsigned>::try_from(v).map_err(|_| StorageError::NegativeCount {
                                index,
                                value: i64::from(v),
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Buffer::from_cells(Cells::$variant(cells)))
                }
            }
        )*
    };
}

impl_signed_integral!(i8 => u8, U8, i16 => u16, U16, i32 => u32, U32, i64 => u64, U64);

#[cfg(target_pointer_width = "32")]
type SignedWord = i32;
#[cfg(not(target_pointer_width = "32"))]
type SignedWord = i64;

impl sealed::Sealed for isize {}

impl Integral for isize {
    const REPRESENTATION: Representation = SignedWord::REPRESENTATION;

    fn to_buffer(values: &[Self]) -> Buffer {
        let words: Vec<SignedWord> = values.iter().map(|&v| v as SignedWord).collect();
        SignedWord::to_buffer(&words)
    }

    fn try_to_buffer(values: &[Self]) -> Result<Buffer> {
        let words: Vec<SignedWord> = values.iter().map(|&v| v as SignedWord).collect();
        SignedWord::try_to_buffer(&words)
    }
}

/// A fixed-width counter array that can be imported into a dynamic storage.
pub trait FixedStorage {
    /// Element type of every bin.
    type Element: Integral;

    /// Number of bins.
    fn size(&self) -> usize {
        self.data().len()
    }

    /// The bins, in index order.
    fn data(&self) -> &[Self::Element];
}

impl<T: Integral> FixedStorage for [T] {
    type Element = T;

    fn data(&self) -> &[T] {
        self
    }
}

impl<T: Integral, const N: usize> FixedStorage for [T; N] {
    type Element = T;

    fn data(&self) -> &[T] {
        self
    }
}

impl<T: Integral> FixedStorage for Vec<T> {
    type Element = T;

    fn data(&self) -> &[T] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_per_type() {
        assert_eq!(u8::REPRESENTATION, Representation::U8);
        assert_eq!(u16::REPRESENTATION, Representation::U16);
        assert_eq!(u32::REPRESENTATION, Representation::U32);
        assert_eq!(u64::REPRESENTATION, Representation::U64);
        assert_eq!(usize::REPRESENTATION.depth(), std::mem::size_of::<usize>());
    }

    #[test]
    fn test_to_buffer() {
        let buffer = u32::to_buffer(&[4, 5]);
        assert_eq!(buffer.representation(), Representation::U32);
        assert_eq!(buffer.size(), 2);
        assert_eq!(buffer.value(1), 5.0);

        let buffer = usize::to_buffer(&[1, 2, 3]);
        assert_eq!(buffer.representation(), usize::REPRESENTATION);
        assert_eq!(buffer.size(), 3);
        assert_eq!(buffer.value(0), 1.0);
    }

    #[test]
    fn test_signed_same_width() {
        assert_eq!(i8::REPRESENTATION, Representation::U8);
        assert_eq!(i16::REPRESENTATION, Representation::U16);
        assert_eq!(i32::REPRESENTATION, Representation::U32);
        assert_eq!(i64::REPRESENTATION, Representation::U64);
        assert_eq!(isize::REPRESENTATION.depth(), std::mem::size_of::<isize>());

        let buffer = i32::to_buffer(&[3, 0, 70_000]);
        assert_eq!(buffer.representation(), Representation::U32);
        assert_eq!(buffer.value(2), 70_000.0);

        let buffer = isize::to_buffer(&[5, 6]);
        assert_eq!(buffer.representation(), isize::REPRESENTATION);
        assert_eq!(buffer.value(1), 6.0);
    }

    #[test]
    fn test_signed_negative_clamped() {
        let buffer = i16::to_buffer(&[-4, 9, i16::MIN]);
        assert_eq!(buffer.value(0), 0.0);
        assert_eq!(buffer.value(1), 9.0);
        assert_eq!(buffer.value(2), 0.0);
    }

    #[test]
    fn test_signed_negative_rejected() {
        assert!(matches!(
            i8::try_to_buffer(&[1, 2, -3]),
            Err(StorageError::NegativeCount { index: 2, value: -3 })
        ));
        assert!(matches!(
            isize::try_to_buffer(&[-1]),
            Err(StorageError::NegativeCount { index: 0, value: -1 })
        ));
        let buffer = i64::try_to_buffer(&[i64::MAX]).unwrap();
        assert_eq!(buffer.representation(), Representation::U64);
        assert_eq!(buffer.value(0), i64::MAX as f64);
    }

    #[test]
    fn test_unsigned_try_to_buffer() {
        let buffer = u8::try_to_buffer(&[255]).unwrap();
        assert_eq!(buffer.value(0), 255.0);
    }

    #[test]
    fn test_fixed_storage_impls() {
        let array = [1u8, 2, 3];
        assert_eq!(FixedStorage::size(&array), 3);
        assert_eq!(array.data(), &[1, 2, 3]);

        let vec = vec![7u64; 4];
        assert_eq!(FixedStorage::size(&vec), 4);

        let slice: &[u16] = &[9, 8];
        assert_eq!(FixedStorage::size(slice), 2);
        assert_eq!(FixedStorage::data(slice), &[9, 8]);
    }
}
