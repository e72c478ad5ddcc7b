//! Bramble property-based testing library.
//!
//! This is the main entry point for the Bramble library, providing
//! a convenient API for property-based testing in Rust.

pub use bramble_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use bramble_derive::*;
