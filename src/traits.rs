//! Core traits for streaming sketches
//!
//! All sketches implement the base [`Sketch`] trait, with specialized traits
//! for the algorithm families (cardinality, membership).

use core::fmt::Debug;

/// Error from invalid sketch construction parameters
///
/// Returned synchronously by constructors; a sketch is never observable in a
/// partially constructed state.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Bit count must be positive
    ZeroBits,
    /// Hash probe count must be positive
    ZeroHashes,
    /// Expected item capacity must be positive
    ZeroCapacity,
    /// False positive rate must be in (0, 1)
    RateOutOfRange { found: f64 },
    /// Precision must be in [4, 16]
    PrecisionOutOfRange { found: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroBits => write!(f, "bit count must be positive"),
            ConfigError::ZeroHashes => write!(f, "hash count must be positive"),
            ConfigError::ZeroCapacity => write!(f, "expected item count must be positive"),
            ConfigError::RateOutOfRange { found } => {
                write!(f, "false positive rate must be in (0, 1), found {}", found)
            }
            ConfigError::PrecisionOutOfRange { found } => {
                write!(f, "precision must be in [4, 16], found {}", found)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Error bounds for a sketch estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBounds {
    /// Lower bound of the estimate
    pub lower: f64,
    /// Point estimate
    pub estimate: f64,
    /// Upper bound of the estimate
    pub upper: f64,
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence: f64,
}

impl ErrorBounds {
    /// Create new error bounds
    pub fn new(lower: f64, estimate: f64, upper: f64, confidence: f64) -> Self {
        Self {
            lower,
            estimate,
            upper,
            confidence,
        }
    }

    /// Check if a value falls within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Relative width (width / estimate)
    pub fn relative_width(&self) -> f64 {
        if self.estimate == 0.0 {
            0.0
        } else {
            self.width() / self.estimate
        }
    }
}

/// Core trait for all streaming sketches
///
/// A sketch is an opaque accumulator: it holds no reference to previously
/// seen items, never shrinks, and its memory footprint is fixed at
/// construction.
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    fn update(&mut self, item: &Self::Item);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed (including repeats)
    fn count(&self) -> u64;

    /// Check if sketch has seen no items
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Cardinality (distinct count) estimation sketches
pub trait CardinalitySketch: Sketch {
    /// Estimate number of distinct items seen
    fn estimate(&self) -> f64;

    /// Get error bounds at given confidence level (0.0 to 1.0)
    fn error_bounds(&self, confidence: f64) -> ErrorBounds;

    /// Relative standard error (RSE) of the estimate
    ///
    /// RSE = standard_error / true_value ≈ 1.04 / sqrt(m) for HLL
    fn relative_error(&self) -> f64;

    /// Estimate with default 95% confidence bounds
    fn estimate_with_bounds(&self) -> ErrorBounds {
        self.error_bounds(0.95)
    }
}

/// Membership testing sketches (Bloom filters, etc.)
pub trait MembershipSketch: Sketch {
    /// Test if item might be in set
    ///
    /// - `true` means item might be present (possible false positive)
    /// - `false` means item is definitely not present
    fn contains(&self, item: &Self::Item) -> bool;

    /// Theoretical false positive rate given current state
    fn false_positive_rate(&self) -> f64;

    /// Number of items added
    fn len(&self) -> usize;

    /// Check if filter is empty
    fn is_filter_empty(&self) -> bool {
        self.len() == 0
    }
}
