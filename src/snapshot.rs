//! Serializable image of a storage.
//!
//! A [`StorageSnapshot`] carries exactly what an external serializer needs
//! to rebuild an equivalent [`DynamicStorage`]: the bin count, the
//! representation tag and the raw element bytes.
//!
//! # Feature Flag
//!
//! This module requires the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! dinamico = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Payload
//!
//! | Representation | Payload |
//! |----------------|---------|
//! | `Empty` | nothing |
//! | `U8` .. `U64`, `Weighted` | `data`: native-endian element bytes, `size * depth` long |
//! | `BigInt` | `digits`: one little-endian byte string per bin |
//!
//! # Examples
//!
//! ```rust,ignore
//! use dinamico::snapshot::StorageSnapshot;
//! use dinamico::storage::DynamicStorage;
//!
//! let mut storage = DynamicStorage::new(2);
//! storage.increase(1);
//!
//! let snapshot = StorageSnapshot::from_storage(&storage);
//! let json = serde_json::to_string(&snapshot).unwrap();
//!
//! let restored: StorageSnapshot = serde_json::from_str(&json).unwrap();
//! assert_eq!(DynamicStorage::try_from(restored).unwrap(), storage);
//! ```

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::buffer::{Buffer, Cells, RawCells};
use crate::error::{Result, StorageError};
use crate::representation::Representation;
use crate::storage::DynamicStorage;

/// Point-in-time image of a [`DynamicStorage`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSnapshot {
    /// Number of bins.
    pub size: usize,
    /// Representation of every bin.
    pub representation: Representation,
    /// Element bytes for fixed-width and weighted representations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    /// Per-bin little-endian digits for the `BigInt` representation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub digits: Vec<Vec<u8>>,
}

impl StorageSnapshot {
    /// Captures the current bins of `storage`.
    pub fn from_storage(storage: &DynamicStorage) -> Self {
        let cells = storage.buffer().cells();
        let (data, digits) = match cells {
            RawCells::BigInt(c) => (Vec::new(), c.iter().map(BigUint::to_bytes_le).collect()),
            other => (other.as_bytes().unwrap_or_default().to_vec(), Vec::new()),
        };
        Self {
            size: storage.size(),
            representation: cells.representation(),
            data,
            digits,
        }
    }

    /// Rebuilds the storage this snapshot was taken from.
    pub fn restore(&self) -> Result<DynamicStorage> {
        let representation = self.representation;
        let mismatch = || StorageError::SnapshotRepresentation { representation };

        let buffer = match representation {
            Representation::Empty => {
                if !self.data.is_empty() || !self.digits.is_empty() {
                    return Err(mismatch());
                }
                Buffer::new(self.size)
            }
            Representation::BigInt => {
                if !self.data.is_empty() {
                    return Err(mismatch());
                }
                self.check_length(self.digits.len(), self.size)?;
                let digits = self.digits.iter().map(|d| BigUint::from_bytes_le(d));
                Buffer::from_cells(Cells::BigInt(digits.collect()))
            }
            _ => {
                if !self.digits.is_empty() {
                    return Err(mismatch());
                }
                let expected = self.size.checked_mul(representation.depth()).ok_or(
                    StorageError::SnapshotLength {
                        representation,
                        expected: usize::MAX,
                        actual: self.data.len(),
                    },
                )?;
                self.check_length(self.data.len(), expected)?;
                let bytes = self.data.as_slice();
                let cells = match representation {
                    Representation::U8 => Cells::U8(bytes.to_vec()),
                    Representation::U16 => Cells::U16(bytemuck::pod_collect_to_vec(bytes)),
                    Representation::U32 => Cells::U32(bytemuck::pod_collect_to_vec(bytes)),
                    Representation::U64 => Cells::U64(bytemuck::pod_collect_to_vec(bytes)),
                    Representation::Weighted => Cells::Weighted(bytemuck::pod_collect_to_vec(bytes)),
                    Representation::Empty | Representation::BigInt => return Err(mismatch()),
                };
                Buffer::from_cells(cells)
            }
        };
        self.check_length(buffer.size(), self.size)?;
        Ok(DynamicStorage::from_buffer(buffer))
    }

    fn check_length(&self, actual: usize, expected: usize) -> Result<()> {
        if actual != expected {
            return Err(StorageError::SnapshotLength {
                representation: self.representation,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl From<&DynamicStorage> for StorageSnapshot {
    fn from(storage: &DynamicStorage) -> Self {
        Self::from_storage(storage)
    }
}

impl TryFrom<StorageSnapshot> for DynamicStorage {
    type Error = StorageError;

    fn try_from(snapshot: StorageSnapshot) -> Result<Self> {
        snapshot.restore()
    }
}

impl TryFrom<&StorageSnapshot> for DynamicStorage {
    type Error = StorageError;

    fn try_from(snapshot: &StorageSnapshot) -> Result<Self> {
        snapshot.restore()
    }
}
