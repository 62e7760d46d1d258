//! The SuRF filter façade.

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::cursor::Cursor;
use crate::dense::Builder;
use crate::error::Error;
use crate::keys::{truncate, Key};
use crate::Options;

/// An immutable succinct range filter over a set of byte-string keys.
///
/// Built once with [`Surf::build`] and queried read-only thereafter. All
/// queries are free of false negatives; a positive answer may be a false
/// positive because keys are truncated to their shortest distinguishing
/// prefixes before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Surf {
    /// Sparse/dense encoding size ratio, stored as configured
    pub(crate) r: u32,
    /// Per-terminal hash bits, stored as configured
    pub(crate) hash_bits: u32,
    /// Per-terminal key-suffix bits, stored as configured
    pub(crate) real_bits: u32,

    /// D-Labels bitmap of the LOUDS-DENSE encoding
    pub(crate) labels: Bitmap,
    /// D-HasChild bitmap of the LOUDS-DENSE encoding
    pub(crate) has_child: Bitmap,
    /// D-IsPrefixKey bitmap of the LOUDS-DENSE encoding
    pub(crate) is_prefix_key: Bitmap,
}

impl Surf {
    /// Build a filter from `keys`.
    ///
    /// The keys are copied, sorted, and deduplicated; order and duplication
    /// in the input do not matter. Empty keys are not representable and fail
    /// with [`Error::EmptyKey`]; a key set needing more trie nodes than
    /// `options.memory_limit` affords fails with [`Error::BudgetExceeded`].
    pub fn build(keys: &[Key], options: Options) -> Result<Self, Error> {
        if keys.iter().any(|k| k.is_empty()) {
            return Err(Error::EmptyKey);
        }

        let mut keys = keys.to_vec();
        keys.sort_unstable();
        keys.dedup();

        let keys = truncate(&keys);

        let mut builder = Builder::new(options.memory_limit);
        builder.build(&keys)?;
        let (labels, has_child, is_prefix_key) = builder.into_bitmaps();

        Ok(Surf {
            r: options.r,
            hash_bits: options.hash_bits,
            real_bits: options.real_bits,
            labels,
            has_child,
            is_prefix_key,
        })
    }

    /// A fresh cursor positioned at the trie root.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.labels, &self.has_child, &self.is_prefix_key)
    }

    /// Check membership of `key`.
    ///
    /// Never returns a false negative; may return a false positive for keys
    /// sharing a distinguishing prefix with a stored key.
    pub fn lookup(&self, key: &[u8]) -> Result<bool, Error> {
        let (exists, _, _) = self.descend(key)?;
        Ok(exists)
    }

    /// Find `key` or, failing that, the smallest stored key greater than it.
    ///
    /// Returns the (possibly truncated) stored key on a match, the successor
    /// otherwise, and `None` when no stored key is greater or equal.
    pub fn lookup_or_greater(&self, key: &[u8]) -> Result<Option<Key>, Error> {
        Ok(self.lookup_or_greater_inner(key)?.map(|(key, _)| key))
    }

    /// Check whether some stored key lies within `[low, high]`, boundaries
    /// included.
    pub fn range_lookup(&self, low: &[u8], high: &[u8]) -> Result<bool, Error> {
        match self.lookup_or_greater_inner(low)? {
            Some((key, _)) => Ok(key.as_slice() <= high),
            None => Ok(false),
        }
    }

    /// Approximate count of stored keys within `[low, high]`, boundaries
    /// included.
    ///
    /// Exact except at the two boundaries, where truncation may cause an
    /// overcount of up to two.
    pub fn count(&self, low: &[u8], high: &[u8]) -> Result<usize, Error> {
        let Some((mut current, mut cursor)) = self.lookup_or_greater_inner(low)? else {
            return Ok(0);
        };

        let mut count = 0;
        while current.as_slice() <= high {
            count += 1;

            match cursor.next_key() {
                Ok(key) => current = key,
                Err(Error::EndOfTrie) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(count)
    }

    /// Sparse/dense size ratio this filter was configured with.
    pub fn r(&self) -> u32 {
        self.r
    }

    /// Hash-suffix bit count this filter was configured with.
    pub fn hash_bits(&self) -> u32 {
        self.hash_bits
    }

    /// Real-suffix bit count this filter was configured with.
    pub fn real_bits(&self) -> u32 {
        self.real_bits
    }

    /// Walk `key` byte-by-byte from the root.
    ///
    /// Returns whether the key matched, the stored key that matched it (a
    /// prefix of `key` when the match ended on a leaf edge), and the cursor
    /// in its final position: on a match, positioned such that
    /// [`Cursor::advance_past_current`] followed by [`Cursor::next_key`]
    /// yields strictly greater keys; on a miss, positioned at the first edge
    /// where the mismatch became clear, so `next_key` yields the successor.
    fn descend(&self, key: &[u8]) -> Result<(bool, Key, Cursor<'_>), Error> {
        let mut cursor = self.cursor();

        for (i, &byte) in key.iter().enumerate() {
            match cursor.go_to_child(byte) {
                Ok(()) => {}
                Err(Error::NoSuchEdge { .. }) => {
                    // No edge with this value, so the key cannot be stored
                    return Ok((false, Vec::new(), cursor));
                }
                Err(Error::IsLeaf { .. }) => {
                    // The edge terminates a stored key that is a prefix of
                    // (or equal to) the queried one: a match, possibly a
                    // false positive
                    return Ok((true, key[..=i].to_vec(), cursor));
                }
                Err(e) => return Err(e),
            }
        }

        // Every byte consumed and we stand on a node; the key is stored iff
        // some key ended exactly here
        if cursor.at_prefix_key()? {
            Ok((true, key.to_vec(), cursor))
        } else {
            Ok((false, Vec::new(), cursor))
        }
    }

    fn lookup_or_greater_inner(&self, key: &[u8]) -> Result<Option<(Key, Cursor<'_>)>, Error> {
        let (exists, matched, mut cursor) = self.descend(key)?;

        if exists {
            // The cursor points at the exact match; skip it so that
            // next_key continues with strictly greater keys
            cursor.advance_past_current();
            return Ok(Some((matched, cursor)));
        }

        match cursor.next_key() {
            Ok(greater) => Ok(Some((greater, cursor))),
            Err(Error::EndOfTrie) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
