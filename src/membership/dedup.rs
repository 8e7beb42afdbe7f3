//! Single-pass duplicate classification over a candidate stream
//!
//! Each candidate is checked against a [`BloomFilter`] and, if unseen, added
//! to it. The produced report maps each item's canonical string form to its
//! classification. Because the filter can produce false positives (but never
//! false negatives), an item may be classified as a duplicate it is not, but
//! a true duplicate is never classified as unique.

use crate::hash::Canonical;
use crate::membership::BloomFilter;

#[cfg(feature = "std")]
use std::{collections::BTreeMap, string::String};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, string::String};

/// Outcome of a membership-based duplicate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Seen for the first time (and now added to the filter)
    Unique,
    /// Possibly seen before (subject to the filter's false positive rate)
    Duplicate,
}

impl core::fmt::Display for Classification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Classification::Unique => write!(f, "unique"),
            Classification::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Classify a stream of candidates against a filter, adding unique ones
///
/// Items are processed in order; each check-then-add step completes before
/// the next item is examined, so a repeated candidate later in the stream is
/// classified as a duplicate. The report is keyed by canonical string form:
/// if two raw items normalize to the same string, the later classification
/// overwrites the earlier entry.
///
/// # Example
///
/// ```
/// use streamsketch::membership::{dedup, BloomFilter, Classification};
///
/// let mut filter = BloomFilter::new(1000, 3).unwrap();
/// filter.insert("password123");
///
/// let report = dedup::classify(&mut filter, ["password123", "newpassword"]);
/// assert_eq!(report["password123"], Classification::Duplicate);
/// assert_eq!(report["newpassword"], Classification::Unique);
/// ```
pub fn classify<T, I>(filter: &mut BloomFilter, items: I) -> BTreeMap<String, Classification>
where
    T: Canonical,
    I: IntoIterator<Item = T>,
{
    let mut report = BTreeMap::new();

    for item in items {
        let canonical = item.canonical().into_owned();

        let classification = if filter.contains(canonical.as_str()) {
            Classification::Duplicate
        } else {
            filter.insert(canonical.as_str());
            Classification::Unique
        };

        report.insert(canonical, classification);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_check_scenario() {
        let mut filter = BloomFilter::new(1000, 3).unwrap();

        for password in ["password123", "admin123", "qwerty123"] {
            filter.insert(password);
        }

        let report = classify(
            &mut filter,
            ["password123", "newpassword", "admin123", "guest"],
        );

        assert_eq!(report["password123"], Classification::Duplicate);
        assert_eq!(report["admin123"], Classification::Duplicate);
        assert_eq!(report["newpassword"], Classification::Unique);
        assert_eq!(report["guest"], Classification::Unique);

        // Unique items were added during the pass
        assert!(filter.contains("newpassword"));
        assert!(filter.contains("guest"));
    }

    #[test]
    fn test_repeat_within_stream_is_duplicate() {
        let mut filter = BloomFilter::new(1000, 3).unwrap();

        let report = classify(&mut filter, ["guest", "guest"]);

        // Last write wins on the shared key; second pass saw it present
        assert_eq!(report.len(), 1);
        assert_eq!(report["guest"], Classification::Duplicate);
    }

    #[test]
    fn test_report_keyed_by_canonical_form() {
        let mut filter = BloomFilter::new(1000, 3).unwrap();

        // A raw number and its string form normalize to the same key
        let items = [123u64.canonical().into_owned(), "123".canonical().into_owned()];
        let report = classify(&mut filter, items);

        assert_eq!(report.len(), 1);
        assert_eq!(report["123"], Classification::Duplicate);
    }

    #[test]
    fn test_missing_value_keys_empty_string() {
        let mut filter = BloomFilter::new(1000, 3).unwrap();

        let report = classify(&mut filter, [None::<&str>]);

        assert_eq!(report[""], Classification::Unique);
        assert!(filter.contains(""));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Classification::Unique.to_string(), "unique");
        assert_eq!(Classification::Duplicate.to_string(), "duplicate");
    }
}
