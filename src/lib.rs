//! # Streamsketch
//!
//! Probabilistic sketches for summarizing data streams in sub-linear memory.
//!
//! Streamsketch provides two approximate data structures for streams too large
//! to hold in an exact set: a membership filter answering "have I seen this
//! before", and a cardinality estimator answering "how many distinct values
//! have I seen". Both use a fixed amount of memory chosen at construction,
//! regardless of stream length.
//!
//! ## Features
//!
//! - **Membership Testing**: Bloom filter with no false negatives
//! - **Cardinality Estimation**: HyperLogLog with small- and large-range
//!   bias correction
//! - **Canonical Hashing**: one shared value-to-string normalization used
//!   both for hashing and for report keys, reproducible across runs
//! - **Bounded Memory**: fixed-size internal arrays, never resized
//!
//! ## Quick Start
//!
//! ```rust
//! use streamsketch::prelude::*;
//!
//! // Track seen passwords
//! let mut filter = BloomFilter::new(10_000, 3).unwrap();
//! filter.insert("password123");
//! assert!(filter.contains("password123"));
//!
//! // Count distinct visitors
//! let mut hll = HyperLogLog::new(14).unwrap();
//! for user_id in ["alice", "bob", "charlie", "alice"] {
//!     hll.insert(user_id);
//! }
//! println!("Distinct users: ~{}", hll.estimate());
//! ```
//!
//! ## Deduplication
//!
//! The filter supports a single-pass check-then-add classification over a
//! candidate stream:
//!
//! ```rust
//! use streamsketch::membership::{dedup, BloomFilter, Classification};
//!
//! let mut filter = BloomFilter::new(1000, 3).unwrap();
//! filter.insert("admin123");
//!
//! let report = dedup::classify(&mut filter, ["admin123", "guest"]);
//! assert_eq!(report["admin123"], Classification::Duplicate);
//! assert_eq!(report["guest"], Classification::Unique);
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families (pick what you need):
//! - `membership` (default): Bloom filter and dedup classification
//! - `cardinality` (default): HyperLogLog for distinct counting
//! - `full`: Enable all algorithm families
//!
//! Platform features:
//! - `std` (default): Standard library support; without it the crate is
//!   `no_std` + `alloc` and math routes through `libm`

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Hashing and core traits always available
pub mod hash;
pub mod math;
pub mod traits;

#[cfg(feature = "cardinality")]
#[cfg_attr(docsrs, doc(cfg(feature = "cardinality")))]
pub mod cardinality;

#[cfg(feature = "membership")]
#[cfg_attr(docsrs, doc(cfg(feature = "membership")))]
pub mod membership;

pub mod prelude {
    pub use crate::hash::Canonical;
    pub use crate::traits::*;

    #[cfg(feature = "cardinality")]
    pub use crate::cardinality::HyperLogLog;

    #[cfg(feature = "membership")]
    pub use crate::membership::{BloomFilter, Classification};
}

#[cfg(feature = "cardinality")]
pub use cardinality::HyperLogLog;

#[cfg(feature = "membership")]
pub use membership::BloomFilter;
