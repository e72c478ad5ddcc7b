//! Property definitions and the test runner.
//!
//! A property couples a generator with a boolean predicate. The runner
//! threads a seed through the iterations, splitting once per test so every
//! iteration is independently replayable, and on failure descends the
//! shrink tree greedily: always the first child that still fails, rescanning
//! from the new node, until no child fails or the shrink limit is reached.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use crate::data::{Config, Size};
use crate::error::{BrambleError, Result, TestCase, TestResult, TestStats};
use crate::gen::Gen;
use crate::seed::Seed;
use crate::tree::Tree;

/// A property that can be tested with generated inputs.
pub struct Property<T> {
    generator: Gen<T>,
    predicate: Rc<dyn Fn(&T) -> bool>,
    classifiers: Vec<(String, Rc<dyn Fn(&T) -> bool>)>,
    variable_name: Option<String>,
    examples: Vec<T>,
}

/// Outcome of one predicate invocation. A panicking predicate counts as a
/// failure in the main loop and as "not a better counterexample" while
/// shrinking.
enum Verdict {
    Pass,
    Fail,
    Panicked,
}

fn evaluate<T>(predicate: &Rc<dyn Fn(&T) -> bool>, value: &T) -> Verdict {
    match catch_unwind(AssertUnwindSafe(|| predicate(value))) {
        Ok(true) => Verdict::Pass,
        Ok(false) => Verdict::Fail,
        Err(_) => Verdict::Panicked,
    }
}

impl<T> Property<T>
where
    T: Clone + 'static,
{
    /// Create a property that checks a boolean condition.
    pub fn for_all<F>(generator: Gen<T>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Property {
            generator,
            predicate: Rc::new(condition),
            classifiers: Vec::new(),
            variable_name: None,
            examples: Vec::new(),
        }
    }

    /// Create a property that checks a boolean condition with a named
    /// variable for diagnostics.
    pub fn for_all_named<F>(generator: Gen<T>, variable_name: &str, condition: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let mut property = Property::for_all(generator, condition);
        property.variable_name = Some(variable_name.to_string());
        property
    }

    /// Count how many generated values satisfy `condition` under `label`.
    ///
    /// Every matching classifier contributes to the label histogram in the
    /// result's stats.
    pub fn classify<F>(mut self, label: &str, condition: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.classifiers
            .push((label.to_string(), Rc::new(condition)));
        self
    }

    /// Try an explicit example before any generated values.
    ///
    /// Examples do not consume the test budget and are not shrunk.
    pub fn with_example(mut self, example: T) -> Self {
        self.examples.push(example);
        self
    }

    /// Run this property with the given configuration and seed.
    ///
    /// For a fixed config and seed the result is fully reproducible,
    /// including the counterexample, shrink path and label histogram.
    pub fn run(&self, config: &Config, seed: Seed) -> TestResult<T> {
        let mut stats = TestStats::default();
        let mut seed = seed;

        for example in &self.examples {
            match evaluate(&self.predicate, example) {
                Verdict::Pass => continue,
                Verdict::Fail | Verdict::Panicked => {
                    let case = TestCase {
                        value: example.clone(),
                        size: Size::new(0),
                        seed,
                    };
                    return TestResult::Fail {
                        stats,
                        original: case.clone(),
                        counterexample: case,
                        shrink_path: Vec::new(),
                    };
                }
            }
        }

        while stats.tests_run < config.test_limit {
            let size = Size::new(stats.tests_run * config.size_limit / config.test_limit);
            let (test_seed, next_seed) = seed.split();
            seed = next_seed;

            let tree = match self.generator.generate(size, test_seed) {
                Ok(tree) => tree,
                Err(BrambleError::Discarded { .. }) => {
                    stats.tests_discarded += 1;
                    if stats.tests_discarded >= config.discard_limit {
                        let reason = format!(
                            "{} discards exceeded the limit of {}",
                            stats.tests_discarded, config.discard_limit
                        );
                        return TestResult::GaveUp { stats, reason };
                    }
                    continue;
                }
                Err(error) => {
                    let reason = format!("generator failed: {error}");
                    return TestResult::GaveUp { stats, reason };
                }
            };

            stats.tests_run += 1;
            for (label, classifier) in &self.classifiers {
                if classifier(&tree.value) {
                    *stats.labels.entry(label.clone()).or_insert(0) += 1;
                }
            }

            match evaluate(&self.predicate, &tree.value) {
                Verdict::Pass => continue,
                Verdict::Fail | Verdict::Panicked => {
                    return self.shrink(tree, size, test_seed, stats, config);
                }
            }
        }

        TestResult::Pass { stats }
    }

    /// Re-run a single captured test case.
    ///
    /// Generates at exactly the given size and seed (the pair reported in a
    /// failure) and shrinks on failure, reproducing the original
    /// counterexample bit-for-bit.
    pub fn recheck(&self, config: &Config, size: Size, seed: Seed) -> TestResult<T> {
        let mut stats = TestStats::default();

        let tree = match self.generator.generate(size, seed) {
            Ok(tree) => tree,
            Err(BrambleError::Discarded { .. }) => {
                stats.tests_discarded += 1;
                return TestResult::GaveUp {
                    stats,
                    reason: "generation discarded during recheck".to_string(),
                };
            }
            Err(error) => {
                let reason = format!("generator failed: {error}");
                return TestResult::GaveUp { stats, reason };
            }
        };

        stats.tests_run = 1;
        match evaluate(&self.predicate, &tree.value) {
            Verdict::Pass => TestResult::Pass { stats },
            Verdict::Fail | Verdict::Panicked => self.shrink(tree, size, seed, stats, config),
        }
    }

    /// Greedy depth-first descent to a minimal counterexample.
    fn shrink(
        &self,
        tree: Tree<T>,
        size: Size,
        seed: Seed,
        mut stats: TestStats,
        config: &Config,
    ) -> TestResult<T> {
        let original = TestCase {
            value: tree.value.clone(),
            size,
            seed,
        };
        let mut current = tree;
        let mut shrink_path = Vec::new();

        while stats.shrink_steps < config.shrink_limit {
            let mut advanced = false;
            for child in current.children() {
                match evaluate(&self.predicate, &child.value) {
                    Verdict::Fail => {
                        shrink_path.push(TestCase {
                            value: child.value.clone(),
                            size,
                            seed,
                        });
                        current = child;
                        stats.shrink_steps += 1;
                        advanced = true;
                        break;
                    }
                    Verdict::Pass | Verdict::Panicked => continue,
                }
            }
            if !advanced {
                break;
            }
        }

        let counterexample = TestCase {
            value: current.value.clone(),
            size,
            seed,
        };
        TestResult::Fail {
            stats,
            original,
            counterexample,
            shrink_path,
        }
    }
}

impl<T> Property<T>
where
    T: Clone + std::fmt::Debug + 'static,
{
    /// Run the property and raise on any non-pass outcome.
    ///
    /// The error message carries the counterexample, the shrink count and
    /// the `(seed, size)` pair needed to reproduce it.
    pub fn check(&self, config: &Config, seed: Seed) -> Result<()> {
        match self.run(config, seed) {
            TestResult::Pass { .. } => Ok(()),
            TestResult::Fail {
                stats,
                counterexample,
                ..
            } => {
                let rendered = match &self.variable_name {
                    Some(name) => format!("{name} = {:?}", counterexample.value),
                    None => format!("{:?}", counterexample.value),
                };
                Err(BrambleError::PropertyFailed {
                    counterexample: rendered,
                    tests_run: stats.tests_run,
                    shrink_steps: stats.shrink_steps,
                    seed: counterexample.seed,
                    size: counterexample.size,
                })
            }
            TestResult::GaveUp { reason, .. } => Err(BrambleError::GaveUp { reason }),
        }
    }
}

/// Create a property that checks a boolean condition.
pub fn for_all<T, F>(generator: Gen<T>, condition: F) -> Property<T>
where
    T: Clone + 'static,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all(generator, condition)
}

/// Create a property that checks a boolean condition with a named variable.
pub fn for_all_named<T, F>(generator: Gen<T>, variable_name: &str, condition: F) -> Property<T>
where
    T: Clone + 'static,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all_named(generator, variable_name, condition)
}
