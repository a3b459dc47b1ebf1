//! Error type for the checked storage operations.
//!
//! The hot-path operations (`increase`, `value`, `+=`) never fail: overflow
//! is resolved by promotion and index/size preconditions are the caller's
//! contract. [`StorageError`] is only returned by the checked variants and by
//! snapshot reconstruction.
//!
//! # Example
//!
//! ```rust
//! use dinamico::error::StorageError;
//! use dinamico::storage::DynamicStorage;
//!
//! let mut a = DynamicStorage::new(3);
//! let b = DynamicStorage::new(4);
//! assert!(matches!(
//!     a.try_merge(&b),
//!     Err(StorageError::SizeMismatch { left: 3, right: 4 })
//! ));
//! ```

use thiserror::Error;

use crate::representation::Representation;

/// Errors reported by checked storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Two storages with different bin counts were merged.
    #[error("size mismatch: {left} bins vs {right} bins")]
    SizeMismatch {
        /// Bins in the destination.
        left: usize,
        /// Bins in the source.
        right: usize,
    },

    /// A signed fixed-width bin holds a negative count.
    #[error("bin {index} holds negative count {value}")]
    NegativeCount {
        /// Index of the offending bin.
        index: usize,
        /// The negative value.
        value: i64,
    },

    /// A snapshot payload does not hold one element per bin.
    #[error("snapshot for {representation} expects payload length {expected}, got {actual}")]
    SnapshotLength {
        /// Declared representation.
        representation: Representation,
        /// Expected payload length (bytes, or digit strings for `BigInt`).
        expected: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// A snapshot payload kind does not match its declared representation.
    #[error("snapshot payload does not match representation {representation}")]
    SnapshotRepresentation {
        /// Declared representation.
        representation: Representation,
    },
}

/// Result type for checked storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StorageError::SizeMismatch { left: 2, right: 5 };
        assert_eq!(err.to_string(), "size mismatch: 2 bins vs 5 bins");

        let err = StorageError::NegativeCount { index: 1, value: -7 };
        assert_eq!(err.to_string(), "bin 1 holds negative count -7");

        let err = StorageError::SnapshotLength {
            representation: Representation::U16,
            expected: 8,
            actual: 7,
        };
        assert_eq!(err.to_string(), "snapshot for u16 expects payload length 8, got 7");

        let err = StorageError::SnapshotRepresentation {
            representation: Representation::BigInt,
        };
        assert_eq!(
            err.to_string(),
            "snapshot payload does not match representation bigint"
        );
    }
}
