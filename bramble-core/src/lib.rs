//! Core functionality for Bramble property-based testing.
//!
//! This crate provides the fundamental building blocks for property-based
//! testing with Bramble: a splittable deterministic PRNG, generators with
//! integrated shrink trees, and the property runner.

pub mod data;
pub mod error;
pub mod gen;
pub mod property;
pub mod registry;
pub mod seed;
pub mod tree;

// Re-export the main types
pub use data::*;
pub use error::*;
pub use gen::*;
pub use property::*;
pub use registry::*;
pub use seed::*;
pub use tree::*;
