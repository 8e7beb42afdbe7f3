//! Bloom filter for probabilistic set membership
//!
//! A Bloom filter is a space-efficient probabilistic data structure that tests
//! whether an element is a member of a set. False positives are possible, but
//! false negatives are not.

use crate::hash::{probe_digest, Canonical};
use crate::math;
use crate::traits::{ConfigError, MembershipSketch, Sketch};

#[cfg(feature = "std")]
use std::{boxed::Box, string::String, string::ToString, vec, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, string::ToString, vec, vec::Vec};

/// Bloom filter for set membership testing
///
/// The filter holds a fixed array of `m` bits and derives `k` positions per
/// item by hashing the item's canonical form with `k` decimal salts. Bits
/// only transition from unset to set; there is no removal and the array never
/// resizes.
///
/// # Example
///
/// ```
/// use streamsketch::membership::BloomFilter;
///
/// let mut bloom = BloomFilter::new(1000, 3).unwrap();
///
/// bloom.insert("apple");
/// bloom.insert("banana");
///
/// assert!(bloom.contains("apple"));   // definitely inserted
/// assert!(bloom.contains("banana"));  // definitely inserted
/// assert!(!bloom.contains("cherry")); // probably false (might be false positive)
/// ```
///
/// # False Positive Rate
///
/// The false positive rate rises as more distinct items are added and
/// approaches certainty once the bit array saturates. A saturated filter
/// answering `true` for an unseen item is expected behavior, not a bug.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array, word-packed
    bits: Box<[u64]>,
    /// Number of bits (m)
    num_bits: usize,
    /// Number of hash probes (k)
    num_hashes: usize,
    /// Number of items inserted
    count: u64,
    /// Decimal salt per probe ("0", "1", ...)
    salts: Box<[String]>,
}

impl BloomFilter {
    /// Create a Bloom filter with explicit parameters
    ///
    /// # Arguments
    ///
    /// * `num_bits` - Number of bits in the filter (m)
    /// * `num_hashes` - Number of hash probes per item (k)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBits`] or [`ConfigError::ZeroHashes`] when
    /// either parameter is zero.
    pub fn new(num_bits: usize, num_hashes: usize) -> Result<Self, ConfigError> {
        if num_bits == 0 {
            return Err(ConfigError::ZeroBits);
        }
        if num_hashes == 0 {
            return Err(ConfigError::ZeroHashes);
        }

        let num_words = (num_bits + 63) / 64;
        let salts: Vec<String> = (0..num_hashes).map(|i| i.to_string()).collect();

        Ok(Self {
            bits: vec![0u64; num_words].into_boxed_slice(),
            num_bits,
            num_hashes,
            count: 0,
            salts: salts.into_boxed_slice(),
        })
    }

    /// Create a Bloom filter sized for an expected capacity and target
    /// false positive rate
    ///
    /// Computes the optimal bit count `m = -n * ln(p) / ln(2)^2` and probe
    /// count `k = (m/n) * ln(2)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] when `expected_items` is zero,
    /// or [`ConfigError::RateOutOfRange`] when the rate is not in (0, 1).
    pub fn with_capacity(
        expected_items: usize,
        false_positive_rate: f64,
    ) -> Result<Self, ConfigError> {
        if expected_items == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(ConfigError::RateOutOfRange {
                found: false_positive_rate,
            });
        }

        let ln2_squared = core::f64::consts::LN_2 * core::f64::consts::LN_2;
        let num_bits =
            math::ceil(-(expected_items as f64) * math::ln(false_positive_rate) / ln2_squared)
                as usize;
        let num_bits = num_bits.max(64);

        let num_hashes =
            math::ceil((num_bits as f64 / expected_items as f64) * core::f64::consts::LN_2)
                as usize;
        let num_hashes = num_hashes.clamp(1, 32);

        Self::new(num_bits, num_hashes)
    }

    /// Insert an item into the filter
    ///
    /// Idempotent with respect to the bit array: re-inserting an item sets
    /// no additional bits.
    pub fn insert<T: Canonical + ?Sized>(&mut self, item: &T) {
        self.count += 1;

        let canonical = item.canonical();
        for salt in self.salts.iter() {
            let bit_idx = self.position(&canonical, salt);
            self.bits[bit_idx / 64] |= 1u64 << (bit_idx % 64);
        }
    }

    /// Check if an item might be in the filter
    ///
    /// Returns `true` if the item might be in the set (possibly a false
    /// positive), or `false` if the item is definitely not in the set.
    pub fn contains<T: Canonical + ?Sized>(&self, item: &T) -> bool {
        let canonical = item.canonical();
        self.salts.iter().all(|salt| {
            let bit_idx = self.position(&canonical, salt);
            self.bits[bit_idx / 64] & (1u64 << (bit_idx % 64)) != 0
        })
    }

    /// Bit position for one salted probe
    #[inline]
    fn position(&self, canonical: &str, salt: &str) -> usize {
        (probe_digest(canonical, salt) % self.num_bits as u64) as usize
    }

    /// Get the number of bits in the filter
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the number of hash probes per item
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Get the number of bits set to 1
    pub fn bits_set(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Estimate the current false positive rate
    ///
    /// This is based on the actual fill ratio of the filter.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill_ratio = self.bits_set() as f64 / self.num_bits as f64;
        math::powi(fill_ratio, self.num_hashes as i32)
    }

    /// Estimate the number of distinct items in the filter
    ///
    /// Uses the fill ratio: `n ≈ -m/k * ln(1 - X/m)` where X is the number
    /// of set bits.
    pub fn estimated_count(&self) -> f64 {
        let bits_set = self.bits_set() as f64;
        let m = self.num_bits as f64;
        let k = self.num_hashes as f64;

        if bits_set >= m {
            return f64::INFINITY;
        }

        -(m / k) * math::ln(1.0 - bits_set / m)
    }
}

impl Sketch for BloomFilter {
    type Item = str;

    fn update(&mut self, item: &str) {
        self.insert(item);
    }

    fn size_bytes(&self) -> usize {
        self.bits.len() * 8 + self.salts.iter().map(|s| s.len()).sum::<usize>() + 32
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl MembershipSketch for BloomFilter {
    fn contains(&self, item: &str) -> bool {
        self.contains(item)
    }

    fn false_positive_rate(&self) -> f64 {
        self.estimated_false_positive_rate()
    }

    fn len(&self) -> usize {
        self.count as usize
    }
}
