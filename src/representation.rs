//! The chain of element representations a storage can be in.
//!
//! Every [`DynamicStorage`](crate::storage::DynamicStorage) keeps all of its
//! bins in a single representation. Unweighted counting walks the chain
//! forward one step each time an add would overflow the current width:
//!
//! ```text
//!   Empty ──► U8 ──► U16 ──► U32 ──► U64 ──► BigInt
//!     │        │       │       │       │        │
//!     └────────┴───────┴───────┴───────┴────────┴──► Weighted
//! ```
//!
//! `BigInt` never overflows, and `Weighted` is only reached through a
//! weighted increment or an explicit conversion. Both are terminal.

use num_bigint::BigUint;
use std::fmt::{self, Display};

use crate::weight::Weight;

/// The element type currently used to store every bin of a storage.
///
/// The declaration order is the unweighted promotion order, so the derived
/// `Ord` can be used to compare widths (`Weighted` sorts last).
///
/// # Examples
///
/// ```rust
/// use dinamico::representation::Representation;
///
/// assert_eq!(Representation::U8.next(), Some(Representation::U16));
/// assert_eq!(Representation::BigInt.next(), None);
/// assert_eq!(Representation::U32.depth(), 4);
/// assert!(Representation::U8 < Representation::U64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Representation {
    /// No storage allocated; every bin reads as zero.
    #[default]
    Empty,
    /// 8-bit unsigned counts.
    U8,
    /// 16-bit unsigned counts.
    U16,
    /// 32-bit unsigned counts.
    U32,
    /// 64-bit unsigned counts.
    U64,
    /// Arbitrary-precision unsigned counts.
    BigInt,
    /// Sum of weights and sum of squared weights per bin.
    Weighted,
}

impl Representation {
    /// All representations, in promotion order.
    pub const ALL: [Representation; 7] = [
        Representation::Empty,
        Representation::U8,
        Representation::U16,
        Representation::U32,
        Representation::U64,
        Representation::BigInt,
        Representation::Weighted,
    ];

    /// Byte width of one element in this representation.
    ///
    /// `Empty` has no elements and reports `0`. `BigInt` reports the size of
    /// the in-place handle, not the size of its heap digits.
    pub const fn depth(self) -> usize {
        match self {
            Representation::Empty => 0,
            Representation::U8 => std::mem::size_of::<u8>(),
            Representation::U16 => std::mem::size_of::<u16>(),
            Representation::U32 => std::mem::size_of::<u32>(),
            Representation::U64 => std::mem::size_of::<u64>(),
            Representation::BigInt => std::mem::size_of::<BigUint>(),
            Representation::Weighted => std::mem::size_of::<Weight>(),
        }
    }

    /// Successor in the unweighted promotion path.
    ///
    /// Returns `None` for the terminal representations `BigInt` and
    /// `Weighted`.
    pub const fn next(self) -> Option<Representation> {
        match self {
            Representation::Empty => Some(Representation::U8),
            Representation::U8 => Some(Representation::U16),
            Representation::U16 => Some(Representation::U32),
            Representation::U32 => Some(Representation::U64),
            Representation::U64 => Some(Representation::BigInt),
            Representation::BigInt | Representation::Weighted => None,
        }
    }

    /// Largest count a bin can hold before the representation must widen.
    ///
    /// `None` means unbounded (`BigInt`, `Weighted`). `Empty` holds nothing
    /// and reports `Some(0)`.
    pub const fn max_count(self) -> Option<u64> {
        match self {
            Representation::Empty => Some(0),
            Representation::U8 => Some(u8::MAX as u64),
            Representation::U16 => Some(u16::MAX as u64),
            Representation::U32 => Some(u32::MAX as u64),
            Representation::U64 => Some(u64::MAX),
            Representation::BigInt | Representation::Weighted => None,
        }
    }

    /// Returns `true` if this representation is never promoted further.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Returns `true` for the plain integer representations.
    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Representation::U8
                | Representation::U16
                | Representation::U32
                | Representation::U64
                | Representation::BigInt
        )
    }

    /// Short lowercase name, as used in logs and `Display`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Representation::Empty => "empty",
            Representation::U8 => "u8",
            Representation::U16 => "u16",
            Representation::U32 => "u32",
            Representation::U64 => "u64",
            Representation::BigInt => "bigint",
            Representation::Weighted => "weighted",
        }
    }
}

impl Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
