//! Generator combinators for property-based testing.
//!
//! A [`Gen`] is an explicit, first-class value: a pure function from
//! `(Size, Seed)` to a shrink tree. Combinators compose generators and
//! their shrink trees together, so shrinking never has to be written
//! separately. Generators are cheap to clone and referentially
//! transparent: the same size and seed always produce structurally
//! identical trees.

use std::rc::Rc;

use crate::data::{Distribution, Range, Size};
use crate::error::{BrambleError, Result};
use crate::seed::Seed;
use crate::tree::Tree;

pub mod json;

/// Attempts a filtered generator makes before signalling a discard.
const FILTER_ATTEMPTS: usize = 100;

/// Float shrinking stops once the distance to the origin drops below this.
const FLOAT_SHRINK_RADIUS: f64 = 1e-9;

/// A generator for test data of type `T`.
///
/// Generators are explicit, first-class values that can be composed
/// using combinator functions. This is a key difference from
/// type-directed approaches like QuickCheck.
pub struct Gen<T> {
    run: Rc<dyn Fn(Size, Seed) -> Result<Tree<T>>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T> std::fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gen").finish_non_exhaustive()
    }
}

impl<T> Gen<T> {
    /// Create a new generator from a function.
    ///
    /// The function must be pure: identical inputs must yield structurally
    /// identical trees. `Err(Discarded)` is the in-band signal that a
    /// filtered generator ran out of attempts.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Size, Seed) -> Result<Tree<T>> + 'static,
    {
        Gen { run: Rc::new(f) }
    }

    /// Generate a value using the given size and seed.
    pub fn generate(&self, size: Size, seed: Seed) -> Result<Tree<T>> {
        (self.run)(size, seed)
    }

    /// Create a generator that always produces the same value, with no shrinks.
    pub fn constant(value: T) -> Self
    where
        T: Clone + 'static,
    {
        Gen::new(move |_size, _seed| Ok(Tree::singleton(value.clone())))
    }

    /// Access the current size budget while constructing a generator.
    pub fn sized<F>(f: F) -> Self
    where
        F: Fn(Size) -> Gen<T> + 'static,
    {
        Gen::new(move |size, seed| f(size).generate(size, seed))
    }
}

impl<T> Gen<T>
where
    T: Clone + 'static,
{
    /// Map a function over the generated values.
    ///
    /// The shrinks of a mapped value are the mapped shrinks of the
    /// underlying value.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + 'static,
        U: 'static,
    {
        let f = Rc::new(f);
        Gen::new(move |size, seed| {
            let f = Rc::clone(&f);
            Ok(self
                .generate(size, seed)?
                .map(move |value| f(value.clone())))
        })
    }

    /// Bind/flatmap for dependent generation.
    ///
    /// The seed is split so the outer and inner generators draw from
    /// independent substreams. Shrinks of the inner result are explored
    /// before shrinks of the outer value re-run through `f`.
    pub fn bind<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + 'static,
        U: Clone + 'static,
    {
        let f = Rc::new(f);
        Gen::new(move |size, seed| {
            let (outer_seed, inner_seed) = seed.split();
            let outer = self.generate(size, outer_seed)?;
            let f = Rc::clone(&f);
            outer.bind_fallible(Rc::new(move |value: &T| {
                f(value.clone()).generate(size, inner_seed)
            }))
        })
    }

    /// Filter generated values by a predicate.
    ///
    /// Retries with fresh substreams until the root value satisfies the
    /// predicate, then prunes the shrink tree so every shrink candidate
    /// satisfies it too. Signals a discard after the attempt budget is
    /// exhausted; the runner counts discards against its discard limit.
    pub fn filter<F>(self, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        Gen::new(move |size, seed| {
            let mut seed = seed;
            for _ in 0..FILTER_ATTEMPTS {
                let (attempt_seed, rest) = seed.split();
                seed = rest;
                let tree = self.generate(size, attempt_seed)?;
                let predicate = Rc::clone(&predicate);
                if let Some(filtered) = tree.filter(move |value| predicate(value)) {
                    return Ok(filtered);
                }
            }
            Err(BrambleError::Discarded {
                attempts: FILTER_ATTEMPTS,
            })
        })
    }

    /// Choose uniformly between generators.
    ///
    /// Shrink candidates are the chosen generator's own shrinks followed by
    /// the other alternatives' root values at the same size and seed.
    ///
    /// # Panics
    ///
    /// Panics if `generators` is empty.
    pub fn one_of(generators: Vec<Gen<T>>) -> Gen<T> {
        assert!(
            !generators.is_empty(),
            "one_of: at least one generator is required"
        );
        Gen::new(move |size, seed| {
            let (choice_seed, value_seed) = seed.split();
            let (index, _) = choice_seed.next_bounded(generators.len() as u64);
            let chosen = generators[index as usize].generate(size, value_seed)?;

            let alternatives: Vec<Gen<T>> = generators
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index as usize)
                .map(|(_, generator)| generator.clone())
                .collect();

            let value = chosen.value.clone();
            Ok(Tree::lazy(value, move || {
                let mut shrinks = chosen.children();
                for alternative in &alternatives {
                    if let Ok(tree) = alternative.generate(size, value_seed) {
                        shrinks.push(Tree::singleton(tree.value.clone()));
                    }
                }
                shrinks
            }))
        })
    }

    /// Choose between generators with the given weights.
    ///
    /// # Panics
    ///
    /// Panics if `choices` is empty or the total weight is zero.
    pub fn frequency(choices: Vec<(u64, Gen<T>)>) -> Gen<T> {
        assert!(
            !choices.is_empty(),
            "frequency: at least one choice is required"
        );
        let total: u64 = choices.iter().map(|(weight, _)| *weight).sum();
        assert!(total > 0, "frequency: total weight must be positive");
        Gen::new(move |size, seed| {
            let (choice_seed, value_seed) = seed.split();
            let (mut draw, _) = choice_seed.next_bounded(total);
            for (weight, generator) in &choices {
                if draw < *weight {
                    return generator.generate(size, value_seed);
                }
                draw -= weight;
            }
            unreachable!("frequency: draw exceeded total weight")
        })
    }

    /// Choose uniformly from a fixed set of values, shrinking toward the
    /// first one listed.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn element_of(values: Vec<T>) -> Gen<T> {
        assert!(
            !values.is_empty(),
            "element_of: at least one value is required"
        );
        Gen::new(move |_size, seed| {
            let (index, _) = seed.next_bounded(values.len() as u64);
            let values = values.clone();
            Ok(Tree::unfold(index as i64, |&i| towards_i64(0, i))
                .map(move |&i| values[i as usize].clone()))
        })
    }

    /// Generate `None` with a probability that shrinks as size grows
    /// (`max(0.05, 0.5 − size·0.004)`), otherwise `Some` of this generator.
    ///
    /// `Some(v)` shrinks to `None` first, then through the inner shrinks;
    /// `None` shrinks to a `Some` drawn at the same size.
    pub fn optional(self) -> Gen<Option<T>> {
        Gen::new(move |size, seed| {
            let (choice_seed, value_seed) = seed.split();
            let none_probability = (0.5 - size.get() as f64 * 0.004).max(0.05);
            let (roll, _) = choice_seed.next_float();

            if roll < none_probability {
                let inner = self.clone();
                Ok(Tree::lazy(None, move || {
                    match inner.generate(size, value_seed) {
                        Ok(tree) => vec![tree.map(|value| Some(value.clone()))],
                        Err(_) => Vec::new(),
                    }
                }))
            } else {
                let some_tree = self
                    .generate(size, value_seed)?
                    .map(|value| Some(value.clone()));
                let value = some_tree.value.clone();
                Ok(Tree::lazy(value, move || {
                    let mut shrinks = vec![Tree::singleton(None)];
                    shrinks.extend(some_tree.children());
                    shrinks
                }))
            }
        })
    }

    /// Generate a vector whose length is drawn from `[0, size]`.
    pub fn vec_of(element: Gen<T>) -> Gen<Vec<T>> {
        Self::vec_sized(element, 0, None)
    }

    /// Generate a vector whose length is drawn from
    /// `[min_len, min(max_len, size)]` (never below `min_len`).
    ///
    /// # Panics
    ///
    /// Panics if `min_len > max_len`.
    pub fn vec_range(element: Gen<T>, min_len: usize, max_len: usize) -> Gen<Vec<T>> {
        assert!(
            min_len <= max_len,
            "vec_range: min_len {min_len} must not exceed max_len {max_len}"
        );
        Self::vec_sized(element, min_len, Some(max_len))
    }

    /// Generate a vector of exactly `len` elements, independent of size.
    /// Only the elements shrink, never the length.
    pub fn vec_len(element: Gen<T>, len: usize) -> Gen<Vec<T>> {
        Gen::new(move |size, seed| {
            let elements = generate_elements(&element, len, size, seed)?;
            Ok(vec_tree(elements, len))
        })
    }

    fn vec_sized(element: Gen<T>, min_len: usize, max_len: Option<usize>) -> Gen<Vec<T>> {
        Gen::new(move |size, seed| {
            let cap = match max_len {
                Some(max) => max.min(size.get()),
                None => size.get(),
            };
            let upper = cap.max(min_len);
            let (len_seed, element_seed) = seed.split();
            let (extra, _) = len_seed.next_bounded((upper - min_len + 1) as u64);
            let count = min_len + extra as usize;
            let elements = generate_elements(&element, count, size, element_seed)?;
            Ok(vec_tree(elements, min_len))
        })
    }
}

impl Gen<bool> {
    /// Generate a boolean; the single shrink is the opposite value.
    pub fn bool() -> Gen<bool> {
        Gen::new(|_size, seed| {
            let (value, _) = seed.next_bool();
            Ok(Tree::with_children(value, vec![Tree::singleton(!value)]))
        })
    }
}

impl Gen<i64> {
    /// Generate an integer from a range, honouring its distribution.
    ///
    /// Shrinking moves toward the range's origin (0 clamped into the range
    /// when unset): first the origin itself, then successive midpoints,
    /// ending in a one-by-one descent. Every shrink candidate stays within
    /// the range.
    pub fn int(range: Range<i64>) -> Gen<i64> {
        Gen::new(move |size, seed| {
            let (origin, value) = match range.distribution {
                Distribution::Constant => {
                    let origin = range.origin.unwrap_or(range.min);
                    (origin, origin)
                }
                _ => {
                    let origin = range.origin.unwrap_or(0).clamp(range.min, range.max);
                    let (low, high) = scaled_bounds(&range, origin, size);
                    let (value, _) = draw_i64(seed, low, high);
                    (origin, value)
                }
            };
            Ok(Tree::unfold(value, move |&v| towards_i64(origin, v)))
        })
    }

    /// Generate an integer uniformly from `[min, max]`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn int_range(min: i64, max: i64) -> Gen<i64> {
        Gen::int(Range::new(min, max))
    }

    /// Generate a timestamp in milliseconds, linearly interpolated across
    /// `[min, max]` and shrinking toward `min`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn date_range(min: i64, max: i64) -> Gen<i64> {
        assert!(
            min <= max,
            "date_range: min {min} must not exceed max {max}"
        );
        Gen::new(move |_size, seed| {
            let span = (max as i128 - min as i128 + 1) as f64;
            let (fraction, _) = seed.next_float();
            let offset = ((fraction * span) as i128).min(max as i128 - min as i128);
            let value = (min as i128 + offset) as i64;
            Ok(Tree::unfold(value, move |&v| towards_i64(min, v)))
        })
    }
}

impl Gen<f64> {
    /// Generate a float from a range, honouring its distribution.
    ///
    /// Shrinking halves toward the range's origin (0.0 clamped into the
    /// range when unset) and stops within a radius of 1e-9.
    pub fn float(range: Range<f64>) -> Gen<f64> {
        Gen::new(move |size, seed| {
            let (origin, value) = match range.distribution {
                Distribution::Constant => {
                    let origin = range.origin.unwrap_or(range.min);
                    (origin, origin)
                }
                _ => {
                    let origin = range.origin.unwrap_or(0.0).clamp(range.min, range.max);
                    let factor = distribution_factor(range.distribution, size);
                    let low = origin - (origin - range.min) * factor;
                    let high = origin + (range.max - origin) * factor;
                    let (fraction, _) = seed.next_float();
                    (origin, low + fraction * (high - low))
                }
            };
            Ok(Tree::unfold(value, move |&v| towards_f64(origin, v)))
        })
    }

    /// Generate a float uniformly from `[min, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn f64_range(min: f64, max: f64) -> Gen<f64> {
        Gen::float(Range::new(min, max))
    }
}

impl Gen<char> {
    /// Generate a printable ASCII character, shrinking toward `'a'`.
    pub fn ascii_printable() -> Gen<char> {
        Gen::new(|_size, seed| {
            let (offset, _) = seed.next_bounded(0x7F - 0x20);
            let value = 0x20 + offset as i64;
            Ok(Tree::unfold(value, |&c| towards_i64('a' as i64, c))
                .map(|&c| (c as u8) as char))
        })
    }

    /// Generate an ASCII letter, shrinking toward `'a'`.
    pub fn ascii_alpha() -> Gen<char> {
        charset_gen(b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ")
    }

    /// Generate an ASCII letter or digit, shrinking toward `'a'`.
    pub fn ascii_alphanumeric() -> Gen<char> {
        charset_gen(b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789")
    }
}

impl Gen<String> {
    /// Generate a printable ASCII string whose length is drawn from
    /// `[0, size]`.
    ///
    /// Shrinking removes characters first, then shrinks the remaining
    /// characters toward `'a'`.
    pub fn string() -> Gen<String> {
        Gen::vec_of(Gen::ascii_printable()).map(|chars| chars.into_iter().collect())
    }

    /// Generate a printable ASCII string of exactly `len` characters.
    pub fn string_len(len: usize) -> Gen<String> {
        Gen::vec_len(Gen::ascii_printable(), len).map(|chars| chars.into_iter().collect())
    }

    /// Generate a printable ASCII string whose length is drawn from
    /// `[min_len, min(max_len, size)]`.
    ///
    /// # Panics
    ///
    /// Panics if `min_len > max_len`.
    pub fn string_range(min_len: usize, max_len: usize) -> Gen<String> {
        Gen::vec_range(Gen::ascii_printable(), min_len, max_len)
            .map(|chars| chars.into_iter().collect())
    }

    /// Generate a string of ASCII letters whose length is drawn from
    /// `[0, size]`.
    pub fn ascii_alpha() -> Gen<String> {
        Gen::vec_of(Gen::<char>::ascii_alpha()).map(|chars| chars.into_iter().collect())
    }
}

impl<A, B> Gen<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    /// Generate a pair; each component shrinks independently.
    pub fn tuple_of(first: Gen<A>, second: Gen<B>) -> Gen<(A, B)> {
        Gen::new(move |size, seed| {
            let (first_seed, second_seed) = seed.split();
            let a = first.generate(size, first_seed)?;
            let b = second.generate(size, second_seed)?;
            Ok(zip_trees(&a, &b))
        })
    }
}

impl<A, B, C> Gen<(A, B, C)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    /// Generate a triple; each component shrinks independently.
    pub fn triple_of(first: Gen<A>, second: Gen<B>, third: Gen<C>) -> Gen<(A, B, C)> {
        let pair = Gen::tuple_of(first, second);
        Gen::new(move |size, seed| {
            let (pair_seed, third_seed) = seed.split();
            let ab = pair.generate(size, pair_seed)?;
            let c = third.generate(size, third_seed)?;
            Ok(zip_trees(&ab, &c).map(|((a, b), c)| (a.clone(), b.clone(), c.clone())))
        })
    }
}

fn charset_gen(charset: &'static [u8]) -> Gen<char> {
    Gen::new(move |_size, seed| {
        let (index, _) = seed.next_bounded(charset.len() as u64);
        Ok(Tree::unfold(index as i64, |&i| towards_i64(0, i))
            .map(move |&i| charset[i as usize] as char))
    })
}

/// Generate `count` element trees, splitting the seed once per element.
fn generate_elements<T>(element: &Gen<T>, count: usize, size: Size, seed: Seed) -> Result<Vec<Tree<T>>>
where
    T: Clone + 'static,
{
    let mut elements = Vec::with_capacity(count);
    let mut seed = seed;
    for _ in 0..count {
        let (element_seed, rest) = seed.split();
        seed = rest;
        elements.push(element.generate(size, element_seed)?);
    }
    Ok(elements)
}

/// Shrink tree for a vector: length reductions in halving steps toward the
/// minimum length come first, then element-wise shrinks.
fn vec_tree<T>(elements: Vec<Tree<T>>, min_len: usize) -> Tree<Vec<T>>
where
    T: Clone + 'static,
{
    let value: Vec<T> = elements.iter().map(|tree| tree.value.clone()).collect();
    Tree::lazy(value, move || {
        let mut shrinks = Vec::new();
        for target in towards_i64(min_len as i64, elements.len() as i64) {
            shrinks.push(vec_tree(elements[..target as usize].to_vec(), min_len));
        }
        for (index, element) in elements.iter().enumerate() {
            for child in element.children() {
                let mut replaced = elements.clone();
                replaced[index] = child;
                shrinks.push(vec_tree(replaced, min_len));
            }
        }
        shrinks
    })
}

fn zip_trees<A, B>(a: &Tree<A>, b: &Tree<B>) -> Tree<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let value = (a.value.clone(), b.value.clone());
    let a = a.clone();
    let b = b.clone();
    Tree::lazy(value, move || {
        let mut shrinks: Vec<Tree<(A, B)>> = a
            .children()
            .iter()
            .map(|child| zip_trees(child, &b))
            .collect();
        shrinks.extend(b.children().iter().map(|child| zip_trees(&a, child)));
        shrinks
    })
}

/// Canonical integer shrink sequence toward an origin: the origin itself,
/// then successive midpoints, ending in a one-by-one descent.
fn towards_i64(origin: i64, value: i64) -> Vec<i64> {
    if origin == value {
        return Vec::new();
    }
    let mut candidates = vec![origin];
    let mut diff = (value as i128 - origin as i128) / 2;
    while diff != 0 {
        candidates.push((value as i128 - diff) as i64);
        diff /= 2;
    }
    candidates
}

/// Float shrink sequence: the origin, then halving steps, stopping at the
/// shrink radius. Candidates indistinguishable from the value are dropped.
fn towards_f64(origin: f64, value: f64) -> Vec<f64> {
    if value == origin {
        return Vec::new();
    }
    let mut candidates = vec![origin];
    let mut diff = (value - origin) / 2.0;
    while diff.abs() >= FLOAT_SHRINK_RADIUS {
        let candidate = value - diff;
        if candidate != value && candidate != origin {
            candidates.push(candidate);
        }
        diff /= 2.0;
    }
    candidates
}

fn distribution_factor(distribution: Distribution, size: Size) -> f64 {
    match distribution {
        Distribution::Uniform => 1.0,
        Distribution::Linear => (size.get() as f64 / 100.0).min(1.0),
        Distribution::Exponential => {
            let fraction = (size.get() as f64 / 100.0).min(1.0);
            fraction * fraction
        }
        Distribution::Constant => 0.0,
    }
}

/// Effective integer bounds after applying the distribution's size scaling.
fn scaled_bounds(range: &Range<i64>, origin: i64, size: Size) -> (i64, i64) {
    let factor = distribution_factor(range.distribution, size);
    if factor >= 1.0 {
        return (range.min, range.max);
    }
    let low_span = (origin as i128 - range.min as i128) as f64;
    let high_span = (range.max as i128 - origin as i128) as f64;
    let low = origin as i128 - (low_span * factor) as i128;
    let high = origin as i128 + (high_span * factor) as i128;
    (
        low.max(range.min as i128) as i64,
        high.min(range.max as i128) as i64,
    )
}

/// Uniform draw from `[low, high]` inclusive.
fn draw_i64(seed: Seed, low: i64, high: i64) -> (i64, Seed) {
    if low == i64::MIN && high == i64::MAX {
        let (value, next) = seed.next_u64();
        return (value as i64, next);
    }
    let span = (high as i128 - low as i128 + 1) as u64;
    let (offset, next) = seed.next_bounded(span);
    ((low as i128 + offset as i128) as i64, next)
}
