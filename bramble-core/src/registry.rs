//! Strategy registry: the interface a schema-import layer targets.
//!
//! The core knows nothing about any particular schema language. A caller
//! brings its own schema type `S` and registers [`Strategy`] values that
//! turn schemas into generators over dynamic values. The registry only
//! routes: overrides first, then strategies in descending priority order,
//! then an optional graceful fallback.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{BrambleError, Result};
use crate::gen::Gen;

/// A rule for converting a schema description into a generator.
pub trait Strategy<S> {
    /// Identifier used in diagnostics.
    fn name(&self) -> &str;

    /// Strategies with higher priority are tried first.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this strategy knows how to build a generator for `schema`.
    fn can_handle(&self, schema: &S) -> bool;

    /// Build the generator. Only called when [`Strategy::can_handle`]
    /// returned true.
    fn build(&self, schema: &S) -> Result<Gen<Value>>;
}

/// An ordered collection of strategies with per-schema overrides.
pub struct Registry<S> {
    strategies: Vec<Rc<dyn Strategy<S>>>,
    overrides: Vec<(S, Gen<Value>)>,
    fallback: Option<Rc<dyn Fn(&S) -> Gen<Value>>>,
}

impl<S> Registry<S>
where
    S: PartialEq + fmt::Debug,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry {
            strategies: Vec::new(),
            overrides: Vec::new(),
            fallback: None,
        }
    }

    /// Register a strategy, keeping the collection ordered by descending
    /// priority. Registration order breaks ties.
    pub fn register<St>(&mut self, strategy: St)
    where
        St: Strategy<S> + 'static,
    {
        let strategy: Rc<dyn Strategy<S>> = Rc::new(strategy);
        let position = self
            .strategies
            .iter()
            .position(|existing| existing.priority() < strategy.priority())
            .unwrap_or(self.strategies.len());
        self.strategies.insert(position, strategy);
    }

    /// Give a specific schema a fixed generator, bypassing every strategy.
    /// A later override for an equal schema replaces the earlier one.
    pub fn set_override(&mut self, schema: S, generator: Gen<Value>) {
        match self
            .overrides
            .iter_mut()
            .find(|(existing, _)| *existing == schema)
        {
            Some(entry) => entry.1 = generator,
            None => self.overrides.push((schema, generator)),
        }
    }

    /// Install a graceful fallback used when no strategy matches, instead
    /// of failing with `NoStrategy`. The supplier should produce a
    /// type-appropriate constant (`""`, `0`, `false`, `[]`, `{}`, `null`).
    pub fn with_graceful_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&S) -> Gen<Value> + 'static,
    {
        self.fallback = Some(Rc::new(fallback));
        self
    }

    /// Build a generator for `schema`.
    ///
    /// Resolution order: overrides, then strategies by descending priority,
    /// then the graceful fallback. Fails with `NoStrategy` when nothing
    /// matches and no fallback is installed.
    pub fn build(&self, schema: &S) -> Result<Gen<Value>> {
        if let Some((_, generator)) = self
            .overrides
            .iter()
            .find(|(candidate, _)| candidate == schema)
        {
            return Ok(generator.clone());
        }

        for strategy in &self.strategies {
            if strategy.can_handle(schema) {
                return strategy.build(schema);
            }
        }

        if let Some(fallback) = &self.fallback {
            return Ok(fallback(schema));
        }

        Err(BrambleError::NoStrategy {
            schema: format!("{schema:?}"),
        })
    }
}

impl<S> Default for Registry<S>
where
    S: PartialEq + fmt::Debug,
{
    fn default() -> Self {
        Registry::new()
    }
}
