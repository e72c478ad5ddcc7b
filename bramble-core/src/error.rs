//! Error and result types for Bramble property-based testing.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::data::Size;
use crate::seed::Seed;

/// Main error type for Bramble property testing.
#[derive(Error, Debug)]
pub enum BrambleError {
    /// Property test failed with a counterexample.
    #[error(
        "property failed: {counterexample} after {tests_run} tests and {shrink_steps} shrinks \
         (reproduce with {seed} at {size})"
    )]
    PropertyFailed {
        counterexample: String,
        tests_run: usize,
        shrink_steps: usize,
        seed: Seed,
        size: Size,
    },

    /// The runner gave up before completing its test budget.
    #[error("gave up: {reason}")]
    GaveUp { reason: String },

    /// A filtered generator exhausted its attempt budget.
    #[error("generation discarded after {attempts} failed filter attempts")]
    Discarded { attempts: usize },

    /// No registered strategy could handle a schema.
    #[error("no strategy can handle schema: {schema}")]
    NoStrategy { schema: String },

    /// Invalid generator construction.
    #[error("invalid generator: {message}")]
    InvalidGenerator { message: String },
}

/// Result type for Bramble operations.
pub type Result<T> = std::result::Result<T, BrambleError>;

/// Everything needed to reproduce a single test iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase<T> {
    /// The generated value.
    pub value: T,
    /// The size the generator was invoked with.
    pub size: Size,
    /// The seed the generator was invoked with.
    pub seed: Seed,
}

/// Counters and classification labels accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestStats {
    /// Number of test iterations that completed (pass or fail).
    pub tests_run: usize,
    /// Number of generations discarded by filters.
    pub tests_discarded: usize,
    /// Number of accepted shrink steps.
    pub shrink_steps: usize,
    /// Label frequency table from classifiers.
    pub labels: BTreeMap<String, usize>,
}

/// Outcome of a property test.
///
/// Results are immutable value types; reproducing a failure requires only
/// the counterexample's `(seed, size)` pair.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult<T> {
    /// Every iteration passed.
    Pass { stats: TestStats },

    /// A counterexample was found.
    Fail {
        stats: TestStats,
        /// The failing case as originally generated, before shrinking.
        original: TestCase<T>,
        /// The minimal failing case after shrinking.
        counterexample: TestCase<T>,
        /// Every accepted shrink step, in order.
        shrink_path: Vec<TestCase<T>>,
    },

    /// The run was abandoned, e.g. because too many cases were discarded.
    GaveUp { stats: TestStats, reason: String },
}

impl<T> TestResult<T> {
    /// The stats of this result, whatever its variant.
    pub fn stats(&self) -> &TestStats {
        match self {
            TestResult::Pass { stats }
            | TestResult::Fail { stats, .. }
            | TestResult::GaveUp { stats, .. } => stats,
        }
    }

    /// True when the result is a pass.
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

impl<T> fmt::Display for TestResult<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass { stats } => {
                write!(f, "  ✓ property passed {} tests.", stats.tests_run)?;

                if !stats.labels.is_empty() {
                    writeln!(f)?;
                    writeln!(f)?;
                    writeln!(f, "  Test data distribution:")?;
                    for (label, count) in &stats.labels {
                        let percentage = (*count as f64 / stats.tests_run as f64) * 100.0;
                        writeln!(f, "    {percentage:>3.0}% {label}")?;
                    }
                }

                Ok(())
            }
            TestResult::Fail {
                stats,
                original,
                counterexample,
                shrink_path,
            } => {
                writeln!(
                    f,
                    "  ✗ property failed after {} tests and {} shrinks.",
                    stats.tests_run, stats.shrink_steps
                )?;

                if !shrink_path.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "    Shrinking progression:")?;
                    writeln!(f, "      │ Original: {:?}", original.value)?;
                    for (step, case) in shrink_path.iter().enumerate() {
                        writeln!(f, "      │ Step {}: {:?}", step + 1, case.value)?;
                    }
                    writeln!(f)?;
                }

                writeln!(
                    f,
                    "    Minimal counterexample: {:?}",
                    counterexample.value
                )?;
                write!(
                    f,
                    "    Reproduce with {} at {}",
                    counterexample.seed, counterexample.size
                )
            }
            TestResult::GaveUp { stats, reason } => {
                write!(
                    f,
                    "  ⚐ property gave up after {} tests and {} discards: {}",
                    stats.tests_run, stats.tests_discarded, reason
                )
            }
        }
    }
}
