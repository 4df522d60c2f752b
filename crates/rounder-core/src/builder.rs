//! Fluent configuration surface for transformations
//!
//! A [`Rounder`] bundles a leaf transform with traversal options and offers
//! the three application modes: borrow-and-mutate, copy-on-write, and direct
//! JSON-tree transformation.
//!
//! Copyright (c) 2025 Rounder Team
//! Licensed under the Apache-2.0 license

use crate::engine::{OnLeafError, Transformer, DEFAULT_MAX_DEPTH};
use crate::error::Result;
use crate::json;
use crate::number::Number;
use crate::rounding::Rounding;
use crate::value::Value;

/// A configured, reusable transformation.
///
/// ```
/// use rounder_core::{Rounder, Value};
///
/// let mut v = Value::list(vec![Value::float(1.2345), Value::text("pi")]);
/// Rounder::decimals(Some(2)).apply(&mut v).unwrap();
/// assert_eq!(v, Value::list(vec![Value::float(1.23), Value::text("pi")]));
/// ```
#[derive(Debug, Clone)]
pub struct Rounder {
    op: Rounding,
    on_leaf_error: OnLeafError,
    max_depth: usize,
}

impl Rounder {
    fn with_op(op: Rounding) -> Self {
        Self {
            op,
            on_leaf_error: OnLeafError::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Decimal-place rounding; `None` rounds to the nearest integer.
    pub fn decimals(digits: Option<i32>) -> Self {
        Self::with_op(Rounding::decimals(digits))
    }

    /// Ceiling-round every numeric leaf to an integer.
    pub fn ceil() -> Self {
        Self::with_op(Rounding::ceil())
    }

    /// Floor-round every numeric leaf to an integer.
    pub fn floor() -> Self {
        Self::with_op(Rounding::floor())
    }

    /// Round every numeric leaf to `digits` significant decimal digits.
    pub fn signif(digits: u32) -> Self {
        Self::with_op(Rounding::signif(digits))
    }

    /// Apply an arbitrary numeric function to every leaf.
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Number) -> anyhow::Result<Number> + Send + Sync + 'static,
    {
        Self::with_op(Rounding::custom(f))
    }

    /// Use a pre-built [`Rounding`] directly.
    pub fn from_rounding(op: Rounding) -> Self {
        Self::with_op(op)
    }

    /// Set the failure-isolation policy (default: keep the original value).
    pub fn on_leaf_error(mut self, policy: OnLeafError) -> Self {
        self.on_leaf_error = policy;
        self
    }

    /// Set the nesting-depth guard (default: [`DEFAULT_MAX_DEPTH`]).
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn rounding(&self) -> &Rounding {
        &self.op
    }

    fn transformer(&self) -> Transformer<'_> {
        Transformer::new(&self.op)
            .with_policy(self.on_leaf_error)
            .with_max_depth(self.max_depth)
    }

    /// Borrow-and-mutate mode: transform the caller's value in place.
    pub fn apply(&self, value: &mut Value) -> Result<()> {
        self.transformer().transform(value)
    }

    /// Copy-on-write mode: deep-clone first, transform the clone, return it.
    ///
    /// Fails with [`Error::Unclonable`](crate::Error::Unclonable) before any
    /// transformation if the value graph holds an opaque resource; the
    /// caller's original is untouched either way.
    pub fn apply_copied(&self, value: &Value) -> Result<Value> {
        let mut clone = value.deep_clone()?;
        self.apply(&mut clone)?;
        Ok(clone)
    }

    /// Transform a `serde_json::Value` tree in place.
    ///
    /// Honors the same `max_depth` guard as [`apply`](Self::apply).
    pub fn apply_json(&self, value: &mut serde_json::Value) -> Result<()> {
        json::transform_json_bounded(value, &self.op, self.on_leaf_error, self.max_depth)
    }
}
