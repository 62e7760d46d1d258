//! Error and navigation-signal types.
//!
//! Two kinds of condition share this enum. *Navigation signals*
//! ([`Error::NoSuchEdge`], [`Error::IsLeaf`], [`Error::EndOfTrie`]) are
//! ordinary control flow of trie traversal, surfaced as errors so callers can
//! branch on them explicitly; they carry a stable identity and are matched by
//! the query layer. Everything else is an invariant violation or a build
//! failure and should be propagated.

use core::fmt;

/// Errors produced by filter construction, bitmap access, and trie traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The current node has no outgoing edge with this label.
    NoSuchEdge {
        /// The requested edge label
        edge: u8,
    },

    /// The edge exists but terminates a key; there is no child node to
    /// descend into.
    IsLeaf {
        /// The requested edge label
        edge: u8,
    },

    /// Traversal moved past the last key of the trie.
    EndOfTrie,

    /// Bit index outside the bitmap's fixed capacity.
    IndexOutOfBounds {
        /// The requested bit index
        index: usize,
        /// The bitmap's capacity in bits
        capacity: usize,
    },

    /// Rank queried at an index outside the bitmap's current length.
    RankOutOfBounds {
        /// The requested bit index
        index: usize,
        /// The bitmap's length in bits
        length: usize,
    },

    /// Select queried with an ordinal outside `(0, length]`.
    SelectOutOfBounds {
        /// The requested 1-based ordinal
        n: usize,
        /// The bitmap's length in bits
        length: usize,
    },

    /// Select ran off the bitmap: fewer than `n` bits of the requested value
    /// exist.
    NotEnoughBits {
        /// The bit value that was searched for
        value: bool,
        /// The requested 1-based ordinal
        n: usize,
    },

    /// The key set needs more trie nodes than the configured memory budget
    /// allows.
    BudgetExceeded {
        /// The configured budget in bits
        limit_bits: usize,
    },

    /// An empty key was passed to the builder; empty keys are not
    /// representable in the trie.
    EmptyKey,

    /// A serialized filter failed validation.
    InvalidFormat {
        /// Description of the offending field
        context: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchEdge { edge } => {
                write!(f, "cannot move to non-existent edge {edge:#04x}")
            }
            Error::IsLeaf { edge } => {
                write!(f, "cannot move into leaf edge {edge:#04x}")
            }
            Error::EndOfTrie => {
                write!(f, "reached end of trie")
            }
            Error::IndexOutOfBounds { index, capacity } => {
                write!(f, "bit index {index} outside capacity {capacity}")
            }
            Error::RankOutOfBounds { index, length } => {
                write!(f, "rank index {index} outside length {length}")
            }
            Error::SelectOutOfBounds { n, length } => {
                write!(f, "select ordinal {n} outside (0, {length}]")
            }
            Error::NotEnoughBits { value, n } => {
                write!(
                    f,
                    "bitmap contains fewer than {n} bits of value {}",
                    *value as u8
                )
            }
            Error::BudgetExceeded { limit_bits } => {
                write!(f, "key set exceeds the {limit_bits}-bit memory budget")
            }
            Error::EmptyKey => {
                write!(f, "empty keys cannot be stored")
            }
            Error::InvalidFormat { context } => {
                write!(f, "invalid serialized filter: {context}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
