//! Rounder Core - structure-preserving numeric transformation of nested values
//!
//! This crate locates every number embedded in an arbitrarily nested value and
//! applies a configured transformation (round, ceiling, floor, significant
//! digits, or an arbitrary function), returning a structurally identical value
//! with transformed numeric leaves. It is a formatting/normalization utility:
//! rounding floating-point noise before printing, serializing, or comparing
//! structured test fixtures.
//!
//! # Main Components
//!
//! - **Value Model**: a closed union of structural shapes ([`Value`], [`Shape`])
//! - **Leaf Transforms**: the numeric functions applied at the leaves ([`Rounding`])
//! - **Engine**: single-pass recursive traversal with explicit failure policy
//!   ([`Transformer`], [`OnLeafError`])
//! - **Builder**: reusable configured transformations ([`Rounder`])
//! - **JSON Interop**: the same transforms over `serde_json::Value` trees
//!
//! # Example
//!
//! ```
//! use rounder_core::{round_object, Value};
//!
//! let mut v = Value::map(vec![
//!     (Value::text("number"), Value::float(12.323)),
//!     (Value::text("string"), Value::text("whatever")),
//!     (Value::text("list"), Value::list(vec![Value::float(122.45), Value::float(0.01)])),
//! ]);
//! round_object(&mut v, Some(2)).unwrap();
//! assert_eq!(v, Value::map(vec![
//!     (Value::text("number"), Value::float(12.32)),
//!     (Value::text("string"), Value::text("whatever")),
//!     (Value::text("list"), Value::list(vec![Value::float(122.45), Value::float(0.01)])),
//! ]));
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod json;
pub mod number;
pub mod rounding;
pub mod value;
pub mod visit;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use builder::Rounder;
pub use engine::{OnLeafError, Transformer, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use json::{round_json, transform_json};
pub use number::{Number, Rational};
pub use rounding::{signif, Rounding, DEFAULT_SIGNIF_DIGITS};
pub use value::{NumericBuffer, ObjectValue, Opaque, RecordValue, Shape, Value};
pub use visit::TransformNumbers;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Round every numeric leaf to `digits` decimal places, in place.
///
/// `None` rounds to the nearest integer and produces integer leaves. The
/// value is mutated through the borrow; for copy-on-write semantics use
/// [`round_object_copied`].
pub fn round_object(value: &mut Value, digits: Option<i32>) -> Result<()> {
    Rounder::decimals(digits).apply(value)
}

/// Ceiling-round every numeric leaf to an integer, in place.
pub fn ceil_object(value: &mut Value) -> Result<()> {
    Rounder::ceil().apply(value)
}

/// Floor-round every numeric leaf to an integer, in place.
pub fn floor_object(value: &mut Value) -> Result<()> {
    Rounder::floor().apply(value)
}

/// Round every numeric leaf to `digits` significant decimal digits, in place.
///
/// The conventional digit count is [`DEFAULT_SIGNIF_DIGITS`].
pub fn signif_object(value: &mut Value, digits: u32) -> Result<()> {
    Rounder::signif(digits).apply(value)
}

/// Apply an arbitrary numeric function to every leaf, in place.
pub fn map_object<F>(map_function: F, value: &mut Value) -> Result<()>
where
    F: Fn(Number) -> anyhow::Result<Number> + Send + Sync + 'static,
{
    Rounder::map(map_function).apply(value)
}

/// Copy-on-write variant of [`round_object`]: the original is untouched.
pub fn round_object_copied(value: &Value, digits: Option<i32>) -> Result<Value> {
    Rounder::decimals(digits).apply_copied(value)
}

/// Copy-on-write variant of [`ceil_object`].
pub fn ceil_object_copied(value: &Value) -> Result<Value> {
    Rounder::ceil().apply_copied(value)
}

/// Copy-on-write variant of [`floor_object`].
pub fn floor_object_copied(value: &Value) -> Result<Value> {
    Rounder::floor().apply_copied(value)
}

/// Copy-on-write variant of [`signif_object`].
pub fn signif_object_copied(value: &Value, digits: u32) -> Result<Value> {
    Rounder::signif(digits).apply_copied(value)
}

/// Copy-on-write variant of [`map_object`].
pub fn map_object_copied<F>(map_function: F, value: &Value) -> Result<Value>
where
    F: Fn(Number) -> anyhow::Result<Number> + Send + Sync + 'static,
{
    Rounder::map(map_function).apply_copied(value)
}
