//! # Dinamico - Adaptive-Precision Histogram Storage
//!
//! A Rust library providing the per-bin storage backend of a histogram: an
//! array of counters that starts as small as possible and grows its element
//! type only when a bin would overflow.
//!
//! ## The Problem
//!
//! A histogram with many bins spends most of its memory on counters. Fixing
//! the counter type up front is always a bad trade: `u64` bins waste 8x the
//! memory of `u8` bins for sparse fills, while `u8` bins silently wrap on the
//! 256th entry. Weighted fills need yet another layout, with a sum of weights
//! and a sum of squared weights per bin to estimate variances.
//!
//! ## The Solution: Whole-Buffer Promotion
//!
//! [`DynamicStorage`](storage::DynamicStorage) keeps every bin in the same
//! [`Representation`](representation::Representation) and promotes the whole
//! array one step along a fixed chain when an add would overflow:
//!
//! ```text
//! ┌───────┐   ┌────┐   ┌─────┐   ┌─────┐   ┌─────┐   ┌────────┐
//! │ Empty │──►│ u8 │──►│ u16 │──►│ u32 │──►│ u64 │──►│ BigInt │
//! └───────┘   └────┘   └─────┘   └─────┘   └─────┘   └────────┘
//!     │          │        │         │         │           │
//!     └──────────┴────────┴─────────┴─────────┴───────────┴──► Weighted
//! ```
//!
//! ### Design Principles
//!
//! 1. **No allocation until the first fill**: an `Empty` storage reads as
//!    zero everywhere.
//!
//! 2. **One representation per storage**: bins never mix element types, so
//!    the array stays contiguous and can be viewed as raw bytes.
//!
//! 3. **Overflow is never an error**: it is resolved by promotion, ending in
//!    an arbitrary-precision integer that cannot overflow.
//!
//! 4. **Weighted mode is terminal**: after the first weighted fill every bin
//!    holds `(sum of weights, sum of squared weights)`; prior counts `c`
//!    become `(c, c)`.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`representation`] | The promotion chain and per-representation widths |
//! | [`weight`] | The weighted bin cell |
//! | [`buffer`] | The adaptive bin array and its promotion logic |
//! | [`storage`] | The public counter storage: fill, read, merge |
//! | [`fixed`] | Import from fixed-width counter arrays |
//! | [`error`] | Errors of the checked operations |
//! | `snapshot` | Serializable storage image (feature `serde`) |
//!
//! ## Quick Start
//!
//! ```rust
//! use dinamico::storage::DynamicStorage;
//!
//! let mut storage = DynamicStorage::new(10);
//! storage.increase(3);
//! storage.increase(3);
//! assert_eq!(storage.value(3), 2.0);
//! assert_eq!(storage.variance(3), 2.0);
//!
//! let mut other = DynamicStorage::new(10);
//! other.increase_weighted(3, 0.5);
//!
//! storage += &other;
//! assert_eq!(storage.value(3), 2.5);
//! assert_eq!(storage.variance(3), 2.25);
//! ```
//!
//! ## Thread Safety
//!
//! Storages are plain single-owner values: `Send + Sync`, but every mutating
//! call takes `&mut self`. Views returned by
//! [`cells`](storage::DynamicStorage::cells) and
//! [`as_bytes`](storage::DynamicStorage::as_bytes) borrow the storage and are
//! invalidated by the borrow checker before any call that may reallocate.
//!
//! ## Logging
//!
//! Promotions and weighted conversions are reported through [`tracing`] at
//! `debug` level, allocations at `trace` level. The library never installs a
//! subscriber.

pub mod buffer;
pub mod error;
pub mod fixed;
pub mod representation;
pub mod storage;
pub mod weight;

#[cfg(feature = "serde")]
pub mod snapshot;
