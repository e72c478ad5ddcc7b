//! Core data types for Bramble property-based testing.

use std::fmt;

/// Complexity budget for a single generation.
///
/// The runner grows it from 0 toward the configured size limit
/// (conventionally 100), so later iterations draw larger numbers and
/// longer collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Size(pub usize);

impl Size {
    /// Create a new size value.
    pub fn new(value: usize) -> Self {
        Size(value)
    }

    /// Get the inner size value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Scale size by a factor.
    pub fn scale(&self, factor: f64) -> Self {
        Size((self.0 as f64 * factor) as usize)
    }

    /// Clamp size to a maximum value.
    pub fn clamp(&self, max: usize) -> Self {
        Size(self.0.min(max))
    }
}

impl From<usize> for Size {
    fn from(value: usize) -> Self {
        Size(value)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({})", self.0)
    }
}

/// How values are distributed across a [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Draw uniformly across the whole range, independent of size.
    Uniform,
    /// Widen the effective range linearly with size around the origin.
    Linear,
    /// Widen the effective range as `(size/100)^2` around the origin,
    /// reaching the full range at size 100.
    Exponential,
    /// Always produce the origin (or `min` when no origin is set).
    Constant,
}

/// A numeric range with an optional shrink origin and a distribution shape.
///
/// The origin is the "simplest" value in the range and the target that
/// shrinking moves toward. When unset, integer generators use 0 clamped
/// into the range and float generators use 0.0 clamped into the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
    pub origin: Option<T>,
    pub distribution: Distribution,
}

impl<T> Range<T>
where
    T: Copy + PartialOrd + fmt::Debug,
{
    /// Create a uniform range over `[min, max]`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn new(min: T, max: T) -> Self {
        Self::with_distribution(min, max, Distribution::Uniform)
    }

    /// Create a range whose effective width grows linearly with size.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn linear(min: T, max: T) -> Self {
        Self::with_distribution(min, max, Distribution::Linear)
    }

    /// Create a range whose effective width grows exponentially with size.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn exponential(min: T, max: T) -> Self {
        Self::with_distribution(min, max, Distribution::Exponential)
    }

    /// Create a degenerate range that always produces `value`.
    pub fn constant(value: T) -> Self {
        Range {
            min: value,
            max: value,
            origin: Some(value),
            distribution: Distribution::Constant,
        }
    }

    fn with_distribution(min: T, max: T, distribution: Distribution) -> Self {
        assert!(min <= max, "Range: min {min:?} must not exceed max {max:?}");
        Range {
            min,
            max,
            origin: None,
            distribution,
        }
    }

    /// Set the shrink origin.
    ///
    /// # Panics
    ///
    /// Panics if `origin` lies outside `[min, max]`.
    pub fn with_origin(mut self, origin: T) -> Self {
        assert!(
            self.min <= origin && origin <= self.max,
            "Range: origin {origin:?} must lie within [{:?}, {:?}]",
            self.min,
            self.max
        );
        self.origin = Some(origin);
        self
    }
}

/// Configuration for property testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of tests to run.
    pub test_limit: usize,

    /// Maximum number of shrinks to attempt.
    pub shrink_limit: usize,

    /// Maximum size parameter to use.
    pub size_limit: usize,

    /// Maximum number of discards before giving up.
    pub discard_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            test_limit: 100,
            shrink_limit: 1000,
            size_limit: 100,
            discard_limit: 100,
        }
    }
}

impl Config {
    /// Create a new config with the given number of tests.
    pub fn with_tests(mut self, tests: usize) -> Self {
        self.test_limit = tests;
        self
    }

    /// Create a new config with the given shrink limit.
    pub fn with_shrinks(mut self, shrinks: usize) -> Self {
        self.shrink_limit = shrinks;
        self
    }

    /// Create a new config with the given size limit.
    pub fn with_size_limit(mut self, size: usize) -> Self {
        self.size_limit = size;
        self
    }

    /// Create a new config with the given discard limit.
    pub fn with_discard_limit(mut self, discards: usize) -> Self {
        self.discard_limit = discards;
        self
    }
}
