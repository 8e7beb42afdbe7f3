//! Hash derivation and input canonicalization
//!
//! Both sketch families derive positions from the same two-step scheme: an
//! input value is first normalized to its canonical string form, then the
//! canonical bytes are hashed into a uniformly distributed 64-bit digest.
//! Normalization is a single shared utility so that hashing and report keys
//! agree: two raw values with the same canonical form always collide, across
//! runs.
//!
//! The digest comes from xxh3 (64-bit). It is a uniformity source only, not
//! a security primitive.

use xxhash_rust::xxh3::{xxh3_64, Xxh3};

use core::fmt::Write as _;

#[cfg(feature = "std")]
use std::{borrow::Cow, string::String};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, string::String};

/// Conversion of an input value to its canonical string form
///
/// The conversion is total and pure: every value maps to exactly one string,
/// and a missing value (`None`) maps to the empty string. Sketches hash the
/// canonical form, and deduplication reports key on it, so two different
/// representations of the same value are treated as one item.
pub trait Canonical {
    /// Append the canonical form to `out`
    fn write_canonical(&self, out: &mut String);

    /// The canonical string form
    ///
    /// Borrows when the value already is a string.
    fn canonical(&self) -> Cow<'_, str> {
        let mut s = String::new();
        self.write_canonical(&mut s);
        Cow::Owned(s)
    }
}

impl Canonical for str {
    fn write_canonical(&self, out: &mut String) {
        out.push_str(self);
    }

    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Canonical for String {
    fn write_canonical(&self, out: &mut String) {
        out.push_str(self);
    }

    fn canonical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<T: Canonical + ?Sized> Canonical for &T {
    fn write_canonical(&self, out: &mut String) {
        (**self).write_canonical(out);
    }

    fn canonical(&self) -> Cow<'_, str> {
        (**self).canonical()
    }
}

/// A missing value canonicalizes to the empty string
impl<T: Canonical> Canonical for Option<T> {
    fn write_canonical(&self, out: &mut String) {
        if let Some(value) = self {
            value.write_canonical(out);
        }
    }
}

macro_rules! canonical_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Canonical for $ty {
                fn write_canonical(&self, out: &mut String) {
                    let _ = write!(out, "{}", self);
                }
            }
        )*
    };
}

canonical_via_display!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char
);

// Log streams are commonly keyed by address
canonical_via_display!(core::net::IpAddr, core::net::Ipv4Addr, core::net::Ipv6Addr);

/// 64-bit digest of a canonical string
///
/// Used by the cardinality estimator: one call per item, no salt.
#[inline]
pub fn item_digest(canonical: &str) -> u64 {
    xxh3_64(canonical.as_bytes())
}

/// 64-bit digest of a canonical string followed by a decimal salt
///
/// Equivalent to hashing the concatenation `canonical + salt`. The salt
/// decorrelates multiple probes into one structure; the membership filter
/// calls this once per probe with salts `"0"`, `"1"`, ... `"k-1"`.
#[inline]
pub fn probe_digest(canonical: &str, salt: &str) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.update(canonical.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.digest()
}

/// Split a digest into a register index and a rho-value field
///
/// The top `precision` bits select the register, the remaining
/// `64 - precision` bits form the value `w` whose leading-zero run is
/// measured.
#[inline]
pub fn split_digest(digest: u64, precision: u8) -> (usize, u64) {
    let value_bits = 64 - precision as u32;
    let index = (digest >> value_bits) as usize;
    let w = digest & (u64::MAX >> precision);
    (index, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_canonical_borrows() {
        let c = "hello".canonical();
        assert!(matches!(c, Cow::Borrowed("hello")));
    }

    #[test]
    fn test_none_is_empty_string() {
        assert_eq!(None::<&str>.canonical(), "");
        assert_eq!(None::<u64>.canonical(), "");
        assert_eq!(Some("x").canonical(), "x");
    }

    #[test]
    fn test_missing_representations_collide() {
        // None and the empty string must hash identically
        let a = item_digest(&None::<&str>.canonical());
        let b = item_digest(&"".canonical());
        assert_eq!(a, b);
    }

    #[test]
    fn test_numbers_canonicalize_as_decimal() {
        assert_eq!(42u64.canonical(), "42");
        assert_eq!((-7i32).canonical(), "-7");
        assert_eq!(true.canonical(), "true");
    }

    #[test]
    fn test_ip_canonical_form() {
        let ip: core::net::Ipv4Addr = "192.168.0.1".parse().unwrap();
        assert_eq!(ip.canonical(), "192.168.0.1");
        // Same digest as the string form seen in a log line
        assert_eq!(item_digest(&ip.canonical()), item_digest("192.168.0.1"));
    }

    #[test]
    fn test_probe_digest_is_concatenation() {
        // Salting appends the decimal digits before hashing
        assert_eq!(probe_digest("abc", "0"), item_digest("abc0"));
        assert_eq!(probe_digest("abc", "12"), item_digest("abc12"));
        // Distinct salts give decorrelated digests
        assert_ne!(probe_digest("abc", "0"), probe_digest("abc", "1"));
    }

    #[test]
    fn test_digest_deterministic() {
        assert_eq!(item_digest("payload"), item_digest("payload"));
        assert_eq!(probe_digest("payload", "3"), probe_digest("payload", "3"));
    }

    #[test]
    fn test_split_digest_slicing() {
        // Top 14 bits index, low 50 bits value
        let digest = (0x2ABCu64 << 50) | 0x3FF;
        let (index, w) = split_digest(digest, 14);
        assert_eq!(index, 0x2ABC);
        assert_eq!(w, 0x3FF);

        // Index occupies exactly 2^p values
        let (index, w) = split_digest(u64::MAX, 4);
        assert_eq!(index, 15);
        assert_eq!(w, u64::MAX >> 4);
    }
}
