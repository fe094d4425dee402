//! 64-bit label set identities, bit-for-bit compatible with the
//! fingerprints of the Prometheus `common/model` package.
//!
//! Stored data and storage keys depend on the exact values, so the
//! algorithm is frozen: FNV-1a over the labels sorted by name, each
//! name and value followed by a `0xff` separator byte. The reference
//! vectors in the tests below are the contract; any change that alters
//! them breaks compatibility with existing data.

use smallvec::SmallVec;
use std::fmt;

use crate::parsing::prometheus::remote_write_models::Label;

// FNV-1a 64 bit parameters, see http://isthe.com/chongo/tech/comp/fnv/
const OFFSET64: u64 = 0xcbf29ce484222325;
const PRIME64: u64 = 0x100000001b3;

// Separates names from values in the hash input. 0xff never occurs in
// valid UTF-8, so ("ab","c") and ("a","bc") cannot collide through
// concatenation.
const SEPARATOR_BYTE: u8 = 0xff;

/// Identity of a time series, derived from its label set.
///
/// Two label sets containing the same (name, value) pairs produce the
/// same fingerprint no matter how the pairs are ordered, which makes it
/// usable as a storage and deduplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint of the empty label set, the FNV-1a offset basis.
    pub const EMPTY: Fingerprint = Fingerprint(OFFSET64);

    /// Computes the fingerprint of a label set.
    ///
    /// The caller's slice is left untouched; ordering is imposed on a
    /// scratch view of references, kept off the heap for the usual
    /// handful of labels.
    pub fn of(labels: &[Label]) -> Self {
        if labels.is_empty() {
            return Self::EMPTY;
        }

        let mut sorted: SmallVec<[&Label; 8]> = labels.iter().collect();
        // Label names are unique within a set, so an unstable sort
        // cannot reorder equal keys.
        sorted.sort_unstable_by(|a, b| a.name.cmp(&b.name));

        let mut sum = OFFSET64;
        for label in sorted {
            sum = hash_add(sum, &label.name);
            sum = hash_add_byte(sum, SEPARATOR_BYTE);
            sum = hash_add(sum, &label.value);
            sum = hash_add_byte(sum, SEPARATOR_BYTE);
        }
        Fingerprint(sum)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

fn hash_add(mut h: u64, s: &str) -> u64 {
    for &b in s.as_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(PRIME64);
    }
    h
}

fn hash_add_byte(mut h: u64, b: u8) -> u64 {
    h ^= u64::from(b);
    h.wrapping_mul(PRIME64)
}
