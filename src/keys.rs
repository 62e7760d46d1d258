//! Key ordering and prefix truncation.
//!
//! Keys are plain byte strings compared lexicographically: byte-by-byte, with
//! the shorter key ordered first when one is a prefix of the other. That is
//! exactly the `Ord` of `[u8]`, so no bespoke comparator exists here; the
//! reliance is pinned by tests below.

#[cfg(not(test))]
use alloc::vec::Vec;

/// A key stored in the trie.
pub type Key = Vec<u8>;

/// Find the first byte index at which two keys differ.
///
/// Returns `(true, index)` when they differ. When the shorter key is a
/// prefix of the longer, the first byte past the shared prefix is considered
/// the differing one, so the index equals the shorter key's length. Equal
/// keys return `(false, 0)`.
pub fn first_difference_at(a: &[u8], b: &[u8]) -> (bool, usize) {
    let shared = a.len().min(b.len());

    for i in 0..shared {
        if a[i] != b[i] {
            return (true, i);
        }
    }

    if a.len() == b.len() {
        (false, 0)
    } else {
        (true, shared)
    }
}

/// Truncate each key to the shortest prefix that still distinguishes it from
/// both of its neighbors.
///
/// The input must be sorted and free of duplicates; the output preserves
/// order and count, and every output is a prefix of its input. For example,
/// `["far", "fast", "john"]` truncates to `["far", "fas", "j"]`.
///
/// When a key is a prefix of its neighbor it stays whole: the trie records
/// it as a prefix-key node rather than a leaf edge.
pub fn truncate(keys: &[Key]) -> Vec<Key> {
    let mut out = Vec::with_capacity(keys.len());

    for (i, key) in keys.iter().enumerate() {
        // The shortest usable prefix must include the first byte at which
        // the key differs from the preceding key, and likewise for the
        // following key. The larger of the two indices wins.
        let difference_before = match i.checked_sub(1).map(|p| &keys[p]) {
            Some(prev) => match first_difference_at(key, prev) {
                (true, at) => at,
                (false, _) => key.len(),
            },
            None => 0,
        };

        let difference_after = match keys.get(i + 1) {
            Some(next) => match first_difference_at(key, next) {
                (true, at) => at,
                (false, _) => key.len(),
            },
            None => 0,
        };

        let n = difference_before.max(difference_after);

        // Include the differing byte itself. When this key is the shorter
        // one of a prefix pair, the differing index already equals its
        // length and there is nothing more to include.
        let n = if n < key.len() { n + 1 } else { n };

        out.push(key[..n].to_vec());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Key {
        s.as_bytes().to_vec()
    }

    #[test]
    fn test_slice_ord_is_lexicographic() {
        // Byte-wise comparison, lesser byte first
        assert!(key("far") < key("fat"));
        assert!(key("a") < key("b"));
        assert!([0x00u8].as_slice() < [0xFFu8].as_slice());

        // On a shared prefix, the shorter key is lesser
        assert!(key("fa") < key("far"));
        assert!(key("") < key("a"));
        assert!(!(key("far") < key("far")));
    }

    #[test]
    fn test_first_difference_at() {
        assert_eq!(first_difference_at(b"far", b"fat"), (true, 2));
        assert_eq!(first_difference_at(b"abc", b"xyz"), (true, 0));
        assert_eq!(first_difference_at(b"far", b"far"), (false, 0));

        // Prefix pairs differ at the shorter one's length
        assert_eq!(first_difference_at(b"fa", b"far"), (true, 2));
        assert_eq!(first_difference_at(b"far", b"fa"), (true, 2));
        assert_eq!(first_difference_at(b"", b"x"), (true, 0));
    }

    #[test]
    fn test_truncate_simple() {
        let keys = vec![key("far"), key("fast"), key("john")];
        let expected = vec![key("far"), key("fas"), key("j")];
        assert_eq!(truncate(&keys), expected);
    }

    #[test]
    fn test_truncate_paper_set() {
        let keys = vec![
            key("f"),
            key("farther"),
            key("fas"),
            key("fasten"),
            key("fat"),
            key("splice"),
            key("topper"),
            key("toy"),
            key("tries"),
            key("tripper"),
            key("trying"),
        ];
        let expected = vec![
            key("f"),
            key("far"),
            key("fas"),
            key("fast"),
            key("fat"),
            key("s"),
            key("top"),
            key("toy"),
            key("trie"),
            key("trip"),
            key("try"),
        ];
        assert_eq!(truncate(&keys), expected);
    }

    #[test]
    fn test_truncate_single_key() {
        // A lone key has no neighbors to distinguish from
        let keys = vec![key("lonesome")];
        assert_eq!(truncate(&keys), vec![key("l")]);
    }

    #[test]
    fn test_truncate_empty() {
        assert_eq!(truncate(&[]), Vec::<Key>::new());
    }

    #[test]
    fn test_truncate_prefix_pair_keeps_shorter_whole() {
        let keys = vec![key("f"), key("far")];
        // "f" is a full prefix of "far": it cannot be shortened further and
        // stays whole; "far" needs one byte past the shared prefix.
        assert_eq!(truncate(&keys), vec![key("f"), key("fa")]);
    }

    #[test]
    fn test_truncate_outputs_are_prefixes() {
        let keys = vec![
            vec![0x00, 0x01, 0xFF],
            vec![0x00, 0x02],
            vec![0x10],
            vec![0x10, 0x00, 0x00, 0x00],
        ];
        let truncated = truncate(&keys);

        assert_eq!(truncated.len(), keys.len());
        for (t, k) in truncated.iter().zip(&keys) {
            assert!(k.starts_with(t), "{:?} is not a prefix of {:?}", t, k);
        }
        for pair in truncated.windows(2) {
            assert!(pair[0] < pair[1], "order not preserved: {:?}", pair);
        }
    }

    #[test]
    fn test_truncate_deep_common_prefix() {
        // Keys differing only in the last byte keep almost all of it
        let keys = vec![key("aaaaaaaaaa"), key("aaaaaaaaab")];
        assert_eq!(truncate(&keys), vec![key("aaaaaaaaaa"), key("aaaaaaaaab")]);
    }
}
