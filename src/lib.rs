//! # Surfilter
//!
//! A Succinct Range Filter (SuRF): a space-efficient, probabilistic membership
//! structure for byte-string keys that answers point *and* range queries.
//!
//! The filter is built once from a set of keys and is immutable afterwards.
//! Internally the keys are truncated to their shortest distinguishing prefixes
//! and stored as a Fast Succinct Trie in the LOUDS-DENSE encoding: three
//! bitmaps navigated with rank/select. A negative answer is always correct; a
//! positive answer may be a false positive introduced by truncation.
//!
//! ## Quick Start
//!
//! ```
//! use surfilter::{Options, Surf};
//!
//! let keys: Vec<Vec<u8>> = ["far", "fast", "toy"]
//!     .iter()
//!     .map(|k| k.as_bytes().to_vec())
//!     .collect();
//! let surf = Surf::build(&keys, Options::default()).unwrap();
//!
//! // Stored keys are always found.
//! assert!(surf.lookup(b"fast").unwrap());
//!
//! // Keys outside the set are (almost always) rejected.
//! assert!(!surf.lookup(b"john").unwrap());
//!
//! // Range queries: is some stored key within [low, high]?
//! assert!(surf.range_lookup(b"e", b"g").unwrap());
//! assert!(!surf.range_lookup(b"u", b"z").unwrap());
//! ```
//!
//! ## Features
//!
//! - `std` (default) - std error trait integration; disable for no_std + alloc
//! - `serde` - serialization/deserialization support for the filter types

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod binary;
mod bitmap;
pub mod bitmask;
mod cursor;
mod dense;
mod error;
pub mod keys;
mod surf;

pub use bitmap::Bitmap;
pub use cursor::Cursor;
pub use error::Error;
pub use keys::Key;
pub use surf::Surf;

/// Configuration for building a [`Surf`] filter.
///
/// All fields are independent; [`Options::default`] matches the reference
/// parameters of the SuRF paper.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    /// Target size ratio between the sparse and dense trie encodings.
    ///
    /// With a sparse encoding present, `r` governs the level at which the
    /// trie switches from the dense to the sparse representation: lowering it
    /// encodes more levels densely, trading space for speed. The current
    /// encoding is dense-only, so the value is stored on the filter but has
    /// no effect yet.
    pub r: u32,

    /// Number of additional bits per terminal storing part of a key hash.
    ///
    /// Each hash bit halves the false-positive rate of point queries; hash
    /// bits do not help range queries. Stored but not yet consumed.
    pub hash_bits: u32,

    /// Number of additional bits per terminal storing part of the key suffix
    /// that truncation removed.
    ///
    /// Real bits lower the false-positive rate of both point and range
    /// queries; under uniformly distributed keys each bit halves it. Stored
    /// but not yet consumed.
    pub real_bits: u32,

    /// Total bit budget for the three trie bitmaps.
    ///
    /// The budget is divided by 513 (256 label bits + 256 has-child bits +
    /// 1 prefix-key bit per node) to derive the maximum node count. Building
    /// a key set that needs more nodes fails with [`Error::BudgetExceeded`].
    pub memory_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            r: 64,
            hash_bits: 4,
            real_bits: 4,
            memory_limit: 80_000_000,
        }
    }
}
