//! Binary serialization of a filter.
//!
//! The format is a fixed header followed by the three bitmap payloads:
//!
//! ```text
//! magic      u32 LE  ("SURF")
//! version    u32 LE
//! r          u32 LE
//! hash_bits  u32 LE
//! real_bits  u32 LE
//! 3 x bitmap:
//!     capacity  u64 LE  (bits)
//!     length    u64 LE  (bits, a multiple of 64)
//!     words     length / 64 x u64 LE
//! ```
//!
//! Within each word, bit 0 of the logical bitmap is the most-significant
//! bit, as everywhere else in the crate.

#[cfg(not(test))]
use alloc::vec::Vec;

use bytemuck::cast_slice;

use crate::bitmap::Bitmap;
use crate::error::Error;
use crate::surf::Surf;

/// File magic: "SURF" read as a little-endian u32.
pub const MAGIC: u32 = u32::from_le_bytes(*b"SURF");

/// Current format version.
pub const VERSION: u32 = 1;

impl Surf {
    /// Serialize the filter to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let bitmaps = [&self.labels, &self.has_child, &self.is_prefix_key];

        let payload_words: usize = bitmaps.iter().map(|b| b.words().len()).sum();
        let mut out = Vec::with_capacity(20 + bitmaps.len() * 16 + payload_words * 8);

        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&self.r.to_le_bytes());
        out.extend_from_slice(&self.hash_bits.to_le_bytes());
        out.extend_from_slice(&self.real_bits.to_le_bytes());

        for bitmap in bitmaps {
            out.extend_from_slice(&(bitmap.capacity() as u64).to_le_bytes());
            out.extend_from_slice(&(bitmap.len() as u64).to_le_bytes());
            out.extend_from_slice(cast_slice(bitmap.words()));
        }

        out
    }

    /// Deserialize a filter from bytes produced by [`Surf::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader { bytes, pos: 0 };

        if reader.read_u32("magic")? != MAGIC {
            return Err(Error::InvalidFormat { context: "magic" });
        }
        if reader.read_u32("version")? != VERSION {
            return Err(Error::InvalidFormat { context: "version" });
        }

        let r = reader.read_u32("r")?;
        let hash_bits = reader.read_u32("hash_bits")?;
        let real_bits = reader.read_u32("real_bits")?;

        let labels = reader.read_bitmap("labels")?;
        let has_child = reader.read_bitmap("has_child")?;
        let is_prefix_key = reader.read_bitmap("is_prefix_key")?;

        if !reader.is_done() {
            return Err(Error::InvalidFormat {
                context: "trailing bytes",
            });
        }

        if labels.len() != has_child.len() {
            return Err(Error::InvalidFormat {
                context: "labels/has_child length mismatch",
            });
        }

        Ok(Surf {
            r,
            hash_bits,
            real_bits,
            labels,
            has_child,
            is_prefix_key,
        })
    }
}

/// Little-endian field reader over a byte slice.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize, context: &'static str) -> Result<&[u8], Error> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(Error::InvalidFormat { context })?;

        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self, context: &'static str) -> Result<u32, Error> {
        let bytes = self.take(4, context)?;
        Ok(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    fn read_u64(&mut self, context: &'static str) -> Result<u64, Error> {
        let bytes = self.take(8, context)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("8-byte slice")))
    }

    fn read_bitmap(&mut self, context: &'static str) -> Result<Bitmap, Error> {
        let capacity = self.read_u64(context)? as usize;
        let length = self.read_u64(context)? as usize;

        if length % 64 != 0 || length > capacity.next_multiple_of(64) {
            return Err(Error::InvalidFormat { context });
        }

        let word_count = length / 64;
        let payload = self.take(word_count * 8, context)?;

        let mut words = Vec::with_capacity(capacity.div_ceil(64));
        for chunk in payload.chunks_exact(8) {
            words.push(u64::from_le_bytes(chunk.try_into().expect("8-byte chunk")));
        }

        Ok(Bitmap::from_raw_parts(words, length, capacity))
    }

    fn is_done(&self) -> bool {
        self.pos == self.bytes.len()
    }
}
