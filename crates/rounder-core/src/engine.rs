//! The structural dispatcher: one depth-first pass over a value tree
//!
//! [`Transformer`] walks a [`Value`] left to right, applying a configured
//! [`Rounding`] at every numeric leaf while preserving container shape, order
//! and length. Failure isolation is an explicit policy: by default a failing
//! leaf keeps its original value and the walk continues; strict callers can
//! opt into failing the whole call instead.
//!
//! Copyright (c) 2025 Rounder Team
//! Licensed under the Apache-2.0 license

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::number::Number;
use crate::rounding::Rounding;
use crate::value::{dedup_values, NumericBuffer, Value};

/// Default limit on nesting depth before the traversal gives up.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Policy for errors scoped to a single node of the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnLeafError {
    /// Keep the node's original value, log a warning, continue the walk.
    #[default]
    KeepOriginal,
    /// Abort the whole call on the first failing node.
    Fail,
}

impl std::fmt::Display for OnLeafError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnLeafError::KeepOriginal => write!(f, "KeepOriginal"),
            OnLeafError::Fail => write!(f, "Fail"),
        }
    }
}

/// Single-pass recursive transformer over a [`Value`] tree.
#[derive(Debug)]
pub struct Transformer<'a> {
    op: &'a Rounding,
    on_leaf_error: OnLeafError,
    max_depth: usize,
}

impl<'a> Transformer<'a> {
    pub fn new(op: &'a Rounding) -> Self {
        Self {
            op,
            on_leaf_error: OnLeafError::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_policy(mut self, policy: OnLeafError) -> Self {
        self.on_leaf_error = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Transform the tree in place.
    ///
    /// A node-level failure at the root itself always propagates: a direct
    /// call on a bare scalar has no surrounding structure to fall back to.
    pub fn transform(&self, value: &mut Value) -> Result<()> {
        self.walk(value, 0)
    }

    fn walk(&self, value: &mut Value, depth: usize) -> Result<()> {
        if depth >= self.max_depth {
            return Err(Error::DepthExceeded {
                limit: self.max_depth,
            });
        }
        match value {
            // Explicit base cases: text is never decomposed, null and opaque
            // resources pass through untouched.
            Value::Null | Value::Text(_) | Value::Opaque(_) => Ok(()),
            Value::Number(n) => {
                *n = self.op.apply(*n)?;
                Ok(())
            }
            Value::Complex(c) => {
                // Real and imaginary parts are independent real leaves; the
                // leaf transform itself never sees a complex value.
                let re = self.op.apply(Number::Float(c.re))?;
                let im = self.op.apply(Number::Float(c.im))?;
                *c = Complex64::new(re.to_f64(), im.to_f64());
                Ok(())
            }
            Value::Object(obj) => {
                for (_, attr) in obj.attrs.iter_mut() {
                    self.child(attr, depth + 1)?;
                }
                Ok(())
            }
            Value::List(items) | Value::Tuple(items) => {
                for item in items.iter_mut() {
                    self.child(item, depth + 1)?;
                }
                Ok(())
            }
            Value::Record(rec) => {
                for (_, field) in rec.fields.iter_mut() {
                    self.child(field, depth + 1)?;
                }
                Ok(())
            }
            Value::Set(items) | Value::FrozenSet(items) => {
                for item in items.iter_mut() {
                    self.child(item, depth + 1)?;
                }
                // Transformed elements may now coincide; set semantics
                // collapse them, first occurrence wins.
                *items = dedup_values(std::mem::take(items));
                Ok(())
            }
            Value::Map(pairs) => {
                // Values only; keys and their order stay untouched.
                for (_, v) in pairs.iter_mut() {
                    self.child(v, depth + 1)?;
                }
                Ok(())
            }
            Value::Deque(items) => {
                for item in items.iter_mut() {
                    self.child(item, depth + 1)?;
                }
                Ok(())
            }
            Value::Buffer(buf) => self.transform_buffer(buf),
        }
    }

    /// Recurse into a child node, applying the failure-isolation policy.
    fn child(&self, value: &mut Value, depth: usize) -> Result<()> {
        match self.walk(value, depth) {
            Err(e) if e.is_node_level() && self.on_leaf_error == OnLeafError::KeepOriginal => {
                log::warn!(
                    "leaf transform failed at a {} node, keeping original value: {}",
                    value.shape(),
                    e
                );
                Ok(())
            }
            other => other,
        }
    }

    /// Decode, transform, and re-encode a homogeneous buffer, keeping its
    /// declared element type.
    fn transform_buffer(&self, buf: &mut NumericBuffer) -> Result<()> {
        match buf {
            NumericBuffer::U8(xs) => {
                for x in xs.iter_mut() {
                    if let Some(n) = self.buffer_elem(Number::Int(*x as i64))? {
                        *x = n.to_i64().clamp(0, u8::MAX as i64) as u8;
                    }
                }
            }
            NumericBuffer::I16(xs) => {
                for x in xs.iter_mut() {
                    if let Some(n) = self.buffer_elem(Number::Int(*x as i64))? {
                        *x = n.to_i64().clamp(i16::MIN as i64, i16::MAX as i64) as i16;
                    }
                }
            }
            NumericBuffer::I32(xs) => {
                for x in xs.iter_mut() {
                    if let Some(n) = self.buffer_elem(Number::Int(*x as i64))? {
                        *x = n.to_i64().clamp(i32::MIN as i64, i32::MAX as i64) as i32;
                    }
                }
            }
            NumericBuffer::I64(xs) => {
                for x in xs.iter_mut() {
                    if let Some(n) = self.buffer_elem(Number::Int(*x))? {
                        *x = n.to_i64();
                    }
                }
            }
            NumericBuffer::F32(xs) => {
                for x in xs.iter_mut() {
                    if let Some(n) = self.buffer_elem(Number::Float(*x as f64))? {
                        *x = n.to_f64() as f32;
                    }
                }
            }
            NumericBuffer::F64(xs) => {
                for x in xs.iter_mut() {
                    if let Some(n) = self.buffer_elem(Number::Float(*x))? {
                        *x = n.to_f64();
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply the leaf transform to one buffer element. `None` means the
    /// element failed and keeps its original value under the default policy.
    fn buffer_elem(&self, n: Number) -> Result<Option<Number>> {
        match self.op.apply(n) {
            Ok(out) => Ok(Some(out)),
            Err(e) if e.is_node_level() && self.on_leaf_error == OnLeafError::KeepOriginal => {
                log::warn!(
                    "leaf transform failed on a buffer element, keeping original value: {}",
                    e
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Shape;

    fn rounded(mut v: Value, digits: Option<i32>) -> Value {
        Transformer::new(&Rounding::decimals(digits))
            .transform(&mut v)
            .unwrap();
        v
    }

    #[test]
    fn test_scalar_leaves() {
        assert_eq!(rounded(Value::float(12.12), Some(1)), Value::float(12.1));
        assert_eq!(rounded(Value::boolean(true), Some(2)), Value::int(1));
        assert_eq!(rounded(Value::int(7), None), Value::int(7));
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(rounded(Value::text("3.14159"), Some(2)), Value::text("3.14159"));
    }

    #[test]
    fn test_list_in_order() {
        let v = rounded(
            Value::list(vec![Value::float(122.45), Value::float(0.01)]),
            Some(1),
        );
        assert_eq!(v, Value::list(vec![Value::float(122.5), Value::float(0.0)]));
    }

    #[test]
    fn test_mixed_list_preserves_non_numeric_elements() {
        let v = rounded(
            Value::list(vec![Value::text("Shout"), Value::text("Bamalama")]),
            None,
        );
        assert_eq!(
            v,
            Value::list(vec![Value::text("Shout"), Value::text("Bamalama")])
        );
    }

    #[test]
    fn test_complex_parts_transformed_independently() {
        let v = rounded(Value::complex(1.234, -5.678), Some(1));
        assert_eq!(v, Value::complex(1.2, -5.7));
    }

    #[test]
    fn test_map_keys_untouched() {
        let v = rounded(
            Value::map(vec![(Value::float(1.55), Value::float(1.55))]),
            Some(1),
        );
        assert_eq!(v, Value::map(vec![(Value::float(1.55), Value::float(1.6))]));
    }

    #[test]
    fn test_record_fields_in_order() {
        let v = rounded(
            Value::record(
                "Point",
                vec![
                    ("x".to_string(), Value::float(1.26)),
                    ("y".to_string(), Value::float(3.44)),
                ],
            ),
            Some(1),
        );
        assert_eq!(
            v,
            Value::record(
                "Point",
                vec![
                    ("x".to_string(), Value::float(1.3)),
                    ("y".to_string(), Value::float(3.4)),
                ],
            )
        );
    }

    #[test]
    fn test_set_collapse_after_rounding() {
        let v = rounded(Value::set(vec![Value::float(0.1), Value::float(0.11)]), Some(1));
        assert_eq!(v, Value::Set(vec![Value::float(0.1)]));
        assert_eq!(v.shape(), Shape::Set);
    }

    #[test]
    fn test_frozen_set_stays_frozen() {
        let v = rounded(
            Value::frozen_set(vec![Value::float(0.1), Value::float(0.11)]),
            Some(1),
        );
        assert_eq!(v.shape(), Shape::FrozenSet);
    }

    #[test]
    fn test_buffer_keeps_type_code() {
        let mut v = Value::Buffer(NumericBuffer::F32(vec![1.26, 2.53]));
        Transformer::new(&Rounding::decimals(Some(1)))
            .transform(&mut v)
            .unwrap();
        match v {
            Value::Buffer(buf) => {
                assert_eq!(buf.type_code(), 'f');
                assert_eq!(buf, NumericBuffer::F32(vec![1.3, 2.5]));
            }
            other => panic!("expected buffer, got {:?}", other),
        }
    }

    #[test]
    fn test_object_attrs_transformed_in_place() {
        let mut v = Value::object(
            "Config",
            vec![
                ("threshold".to_string(), Value::float(0.987)),
                ("name".to_string(), Value::text("model")),
            ],
        );
        Transformer::new(&Rounding::decimals(Some(1)))
            .transform(&mut v)
            .unwrap();
        assert_eq!(
            v,
            Value::object(
                "Config",
                vec![
                    ("threshold".to_string(), Value::float(1.0)),
                    ("name".to_string(), Value::text("model")),
                ],
            )
        );
    }

    #[test]
    fn test_keep_original_policy_isolates_failures() {
        let sqrt = Rounding::custom(|n| {
            let x = n.to_f64();
            if x < 0.0 {
                anyhow::bail!("negative input");
            }
            Ok(Number::Float(x.sqrt()))
        });
        let mut v = Value::list(vec![Value::float(4.0), Value::float(-1.0), Value::float(9.0)]);
        Transformer::new(&sqrt).transform(&mut v).unwrap();
        // Only the failing node keeps its original value.
        assert_eq!(
            v,
            Value::list(vec![Value::float(2.0), Value::float(-1.0), Value::float(3.0)])
        );
    }

    #[test]
    fn test_fail_policy_aborts() {
        let bad = Rounding::custom(|_| anyhow::bail!("boom"));
        let mut v = Value::list(vec![Value::float(1.0)]);
        let err = Transformer::new(&bad)
            .with_policy(OnLeafError::Fail)
            .transform(&mut v)
            .unwrap_err();
        assert!(err.is_node_level());
    }

    #[test]
    fn test_root_scalar_failure_always_propagates() {
        let bad = Rounding::custom(|_| anyhow::bail!("boom"));
        let mut v = Value::float(1.0);
        // Default policy is KeepOriginal, but the root has no parent node to
        // isolate it.
        assert!(Transformer::new(&bad).transform(&mut v).is_err());
    }

    #[test]
    fn test_depth_guard() {
        let mut v = Value::float(0.0);
        for _ in 0..40 {
            v = Value::list(vec![v]);
        }
        let err = Transformer::new(&Rounding::ceil())
            .with_max_depth(10)
            .transform(&mut v)
            .unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 10 }));
    }

    mod props {
        use super::*;
        use crate::proptest_strategies::value_strategy;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_transform_keeps_root_shape(mut v in value_strategy()) {
                let before = v.shape();
                Transformer::new(&Rounding::decimals(Some(2)))
                    .transform(&mut v)
                    .unwrap();
                prop_assert_eq!(v.shape(), before);
            }

            #[test]
            fn prop_map_identity_is_noop(v in value_strategy()) {
                let mut mapped = v.clone();
                Transformer::new(&Rounding::custom(Ok))
                    .transform(&mut mapped)
                    .unwrap();
                prop_assert_eq!(mapped, v);
            }
        }
    }

    #[test]
    fn test_deeply_nested_within_limit() {
        let mut v = Value::float(1.26);
        for _ in 0..100 {
            v = Value::list(vec![v]);
        }
        Transformer::new(&Rounding::decimals(Some(1)))
            .transform(&mut v)
            .unwrap();
        let mut cur = &v;
        while let Value::List(items) = cur {
            cur = &items[0];
        }
        assert_eq!(*cur, Value::float(1.3));
    }
}
