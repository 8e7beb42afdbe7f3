//! Membership testing data structures
//!
//! This module provides probabilistic data structures for testing set
//! membership, plus a single-pass duplicate classification built on top of
//! them. These structures trade a small probability of false positives for
//! significant space savings compared to exact set representations.
//!
//! # Example
//!
//! ```
//! use streamsketch::membership::BloomFilter;
//!
//! let mut bloom = BloomFilter::new(1000, 3).unwrap();
//! bloom.insert("hello");
//! assert!(bloom.contains("hello"));
//! ```

mod bloom;
pub mod dedup;

pub use bloom::BloomFilter;
pub use dedup::Classification;
