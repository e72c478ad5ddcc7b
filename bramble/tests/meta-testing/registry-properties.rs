//! Strategy registry properties
//!
//! These exercise the schema-to-generator bridge end to end: a toy schema
//! language, strategies with priorities, overrides, graceful fallback, and
//! property runs over registry-built generators.

use bramble::*;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
enum Schema {
    Bool,
    Int { min: i64, max: i64 },
    Text,
    Tagged(Vec<String>),
    Binary,
}

struct PrimitiveStrategy;

impl Strategy<Schema> for PrimitiveStrategy {
    fn name(&self) -> &str {
        "primitives"
    }

    fn can_handle(&self, schema: &Schema) -> bool {
        matches!(schema, Schema::Bool | Schema::Int { .. } | Schema::Text)
    }

    fn build(&self, schema: &Schema) -> Result<Gen<Value>> {
        match schema {
            Schema::Bool => Ok(json::boolean()),
            Schema::Int { min, max } => Ok(json::integer(Range::new(*min, *max))),
            Schema::Text => Ok(json::string()),
            other => Err(BrambleError::InvalidGenerator {
                message: format!("primitives strategy cannot build {other:?}"),
            }),
        }
    }
}

struct TaggedStrategy;

impl Strategy<Schema> for TaggedStrategy {
    fn name(&self) -> &str {
        "tagged"
    }

    fn priority(&self) -> i32 {
        5
    }

    fn can_handle(&self, schema: &Schema) -> bool {
        matches!(schema, Schema::Tagged(_))
    }

    fn build(&self, schema: &Schema) -> Result<Gen<Value>> {
        match schema {
            Schema::Tagged(tags) => {
                let variants = tags
                    .iter()
                    .map(|tag| {
                        let object = json::object(vec![
                            ("kind".to_string(), json::literal(json!(tag))),
                            ("weight".to_string(), json::integer(Range::new(0, 50))),
                        ]);
                        (tag.clone(), object)
                    })
                    .collect();
                Ok(json::discriminated_union("kind", variants))
            }
            other => Err(BrambleError::InvalidGenerator {
                message: format!("tagged strategy cannot build {other:?}"),
            }),
        }
    }
}

fn registry() -> Registry<Schema> {
    let mut registry = Registry::new();
    registry.register(PrimitiveStrategy);
    registry.register(TaggedStrategy);
    registry
}

/// Property: registry-built generators drive ordinary property runs
pub fn test_registry_builds_usable_generators() {
    let generator = registry().build(&Schema::Int { min: 0, max: 40 }).unwrap();

    let prop = for_all(generator, |value: &Value| {
        value.as_i64().is_some_and(|n| (0..=40).contains(&n))
    });
    match prop.run(&Config::default(), Seed::from_u64(60)) {
        TestResult::Pass { .. } => println!("✓ Registry-built generator property passed"),
        result => panic!("Registry-built generator property failed: {result}"),
    }
}

/// Property: tagged schemas generate objects carrying their discriminator
pub fn test_registry_discriminated_union() {
    let schema = Schema::Tagged(vec!["alpha".to_string(), "beta".to_string()]);
    let generator = registry().build(&schema).unwrap();

    let prop = for_all(generator, |value: &Value| {
        matches!(value["kind"].as_str(), Some("alpha") | Some("beta"))
    });
    match prop.run(&Config::default(), Seed::from_u64(61)) {
        TestResult::Pass { .. } => println!("✓ Registry discriminated union property passed"),
        result => panic!("Registry discriminated union property failed: {result}"),
    }
}

/// Property: overrides pin a schema to a fixed generator
pub fn test_registry_overrides() {
    let mut registry = registry();
    registry.set_override(Schema::Text, json::literal(json!("pinned")));

    let generator = registry.build(&Schema::Text).unwrap();
    let prop = for_all(generator, |value: &Value| value == &json!("pinned"));
    match prop.run(&Config::default().with_tests(20), Seed::from_u64(62)) {
        TestResult::Pass { .. } => println!("✓ Registry override property passed"),
        result => panic!("Registry override property failed: {result}"),
    }
}

/// Property: unknown schemas fail without a fallback and succeed with one
pub fn test_registry_fallback() {
    match registry().build(&Schema::Binary) {
        Err(BrambleError::NoStrategy { schema }) => assert!(schema.contains("Binary")),
        other => panic!("expected NoStrategy, got {other:?}"),
    }

    let graceful = {
        let mut registry = Registry::new().with_graceful_fallback(|_schema: &Schema| json::null());
        registry.register(PrimitiveStrategy);
        registry
    };
    let generator = graceful.build(&Schema::Binary).unwrap();
    let tree = generator
        .generate(Size::new(10), Seed::from_u64(63))
        .unwrap();
    assert_eq!(tree.value, Value::Null);
    println!("✓ Registry fallback property passed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_registry_property_tests() {
        test_registry_builds_usable_generators();
        test_registry_discriminated_union();
        test_registry_overrides();
        test_registry_fallback();
    }
}
