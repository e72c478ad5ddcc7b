//! Generators for dynamic JSON-like values.
//!
//! This is the schema-facing generator surface: where the typed
//! combinators in the parent module compose `Gen<T>` for concrete `T`,
//! this module composes `Gen<serde_json::Value>` so heterogeneous
//! objects, unions and registry-built generators share one value type.

use serde_json::{Map, Number, Value};

use crate::data::Range;
use crate::gen::Gen;
use crate::tree::Tree;

/// Always produce the given literal value, with no shrinks.
pub fn literal(value: Value) -> Gen<Value> {
    Gen::constant(value)
}

/// Always produce `null`.
pub fn null() -> Gen<Value> {
    Gen::constant(Value::Null)
}

/// Generate a boolean value.
pub fn boolean() -> Gen<Value> {
    Gen::bool().map(Value::Bool)
}

/// Generate an integer value from a range.
pub fn integer(range: Range<i64>) -> Gen<Value> {
    Gen::int(range).map(|n| Value::Number(n.into()))
}

/// Generate a float value from a range.
pub fn number(range: Range<f64>) -> Gen<Value> {
    Gen::float(range).map(|x| Number::from_f64(x).map_or(Value::Null, Value::Number))
}

/// Generate a printable ASCII string value.
pub fn string() -> Gen<Value> {
    Gen::<String>::string().map(Value::String)
}

/// Generate a timestamp value in epoch milliseconds, shrinking toward
/// the start of the range.
pub fn date(range: Range<i64>) -> Gen<Value> {
    Gen::date_range(range.min, range.max).map(|ms| Value::Number(ms.into()))
}

/// Choose uniformly from a fixed set of values, shrinking toward the
/// first one listed.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn enum_of(values: Vec<Value>) -> Gen<Value> {
    Gen::element_of(values)
}

/// Generate an array whose length is drawn from `[0, size]`.
pub fn array(element: Gen<Value>) -> Gen<Value> {
    Gen::vec_of(element).map(Value::Array)
}

/// Generate an array whose length is drawn from
/// `[min_len, min(max_len, size)]`.
///
/// # Panics
///
/// Panics if `min_len > max_len`.
pub fn array_range(element: Gen<Value>, min_len: usize, max_len: usize) -> Gen<Value> {
    Gen::vec_range(element, min_len, max_len).map(Value::Array)
}

/// Generate an array of exactly `len` elements; only the elements shrink.
pub fn array_len(element: Gen<Value>, len: usize) -> Gen<Value> {
    Gen::vec_len(element, len).map(Value::Array)
}

/// Generate a fixed-arity array, one generator per position. Positions
/// shrink independently; the arity never changes.
pub fn tuple(elements: Vec<Gen<Value>>) -> Gen<Value> {
    Gen::new(move |size, seed| {
        let mut seed = seed;
        let mut trees = Vec::with_capacity(elements.len());
        for element in &elements {
            let (element_seed, rest) = seed.split();
            seed = rest;
            trees.push(element.generate(size, element_seed)?);
        }
        Ok(tuple_tree(trees))
    })
}

/// Generate an object, one generator per field. Fields shrink
/// independently; keys never change.
pub fn object(fields: Vec<(String, Gen<Value>)>) -> Gen<Value> {
    Gen::new(move |size, seed| {
        let mut seed = seed;
        let mut trees = Vec::with_capacity(fields.len());
        for (name, generator) in &fields {
            let (field_seed, rest) = seed.split();
            seed = rest;
            trees.push((name.clone(), generator.generate(size, field_seed)?));
        }
        Ok(object_tree(trees))
    })
}

/// Generate `null` with a probability that shrinks as size grows
/// (`max(0.05, 0.5 − size·0.004)`), otherwise the inner value.
///
/// A non-null value shrinks to `null` first, then through the inner
/// shrinks; `null` shrinks to an inner value drawn at the same size.
pub fn nullable(inner: Gen<Value>) -> Gen<Value> {
    Gen::new(move |size, seed| {
        let (choice_seed, value_seed) = seed.split();
        let null_probability = (0.5 - size.get() as f64 * 0.004).max(0.05);
        let (roll, _) = choice_seed.next_float();

        if roll < null_probability {
            let inner = inner.clone();
            Ok(Tree::lazy(Value::Null, move || {
                match inner.generate(size, value_seed) {
                    Ok(tree) => vec![tree],
                    Err(_) => Vec::new(),
                }
            }))
        } else {
            let tree = inner.generate(size, value_seed)?;
            let value = tree.value.clone();
            Ok(Tree::lazy(value, move || {
                let mut shrinks = vec![Tree::singleton(Value::Null)];
                shrinks.extend(tree.children());
                shrinks
            }))
        }
    })
}

/// Choose uniformly between variants; the other variants' root values
/// become extra shrink candidates.
///
/// # Panics
///
/// Panics if `variants` is empty.
pub fn union(variants: Vec<Gen<Value>>) -> Gen<Value> {
    Gen::one_of(variants)
}

/// Choose between variants with the given weights.
///
/// # Panics
///
/// Panics if `variants` is empty or the total weight is zero.
pub fn weighted_union(variants: Vec<(u64, Gen<Value>)>) -> Gen<Value> {
    Gen::frequency(variants)
}

/// Choose a variant uniformly by tag and verify that the generated
/// object carries the tag at the discriminator key. Shrink candidates
/// are pruned to those carrying the tag.
///
/// # Panics
///
/// Panics at construction if `variants` is empty, and at generation
/// time (a programming error in the variant generator) if a produced
/// value lacks the discriminator key or carries the wrong tag.
pub fn discriminated_union(key: &str, variants: Vec<(String, Gen<Value>)>) -> Gen<Value> {
    assert!(
        !variants.is_empty(),
        "discriminated_union: at least one variant is required"
    );
    let key = key.to_string();
    Gen::new(move |size, seed| {
        let (choice_seed, value_seed) = seed.split();
        let (index, _) = choice_seed.next_bounded(variants.len() as u64);
        let (tag, generator) = &variants[index as usize];
        let tree = generator.generate(size, value_seed)?;

        let filter_key = key.clone();
        let expected = Value::String(tag.clone());
        match tree.filter(move |value| value.get(filter_key.as_str()) == Some(&expected)) {
            Some(filtered) => Ok(filtered),
            None => panic!(
                "discriminated_union: variant {tag:?} produced {:?}, \
                 which does not carry {key:?} = {tag:?}",
                tree.value
            ),
        }
    })
}

fn tuple_tree(elements: Vec<Tree<Value>>) -> Tree<Value> {
    let value = Value::Array(elements.iter().map(|tree| tree.value.clone()).collect());
    Tree::lazy(value, move || {
        let mut shrinks = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            for child in element.children() {
                let mut replaced = elements.clone();
                replaced[index] = child;
                shrinks.push(tuple_tree(replaced));
            }
        }
        shrinks
    })
}

fn object_tree(fields: Vec<(String, Tree<Value>)>) -> Tree<Value> {
    let mut map = Map::new();
    for (name, tree) in &fields {
        map.insert(name.clone(), tree.value.clone());
    }
    Tree::lazy(Value::Object(map), move || {
        let mut shrinks = Vec::new();
        for (index, (_, tree)) in fields.iter().enumerate() {
            for child in tree.children() {
                let mut replaced = fields.clone();
                replaced[index].1 = child;
                shrinks.push(object_tree(replaced));
            }
        }
        shrinks
    })
}
