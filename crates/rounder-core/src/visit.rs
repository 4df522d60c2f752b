//! Capability trait for user-defined types
//!
//! Instead of runtime attribute reflection, types opt into numeric
//! transformation by implementing [`TransformNumbers`]. Implementations are
//! provided for the plain numeric types, complex numbers, common std
//! containers, and [`Value`] itself, so a derive-free manual impl is usually
//! a couple of lines delegating to fields.
//!
//! ```
//! use rounder_core::{Rounding, TransformNumbers};
//!
//! struct Sample {
//!     mean: f64,
//!     readings: Vec<f64>,
//! }
//!
//! impl TransformNumbers for Sample {
//!     fn transform_numbers(&mut self, op: &Rounding) -> rounder_core::Result<()> {
//!         self.mean.transform_numbers(op)?;
//!         self.readings.transform_numbers(op)
//!     }
//! }
//!
//! let mut s = Sample { mean: 1.2345, readings: vec![2.3456, 7.8] };
//! s.transform_numbers(&Rounding::decimals(Some(2))).unwrap();
//! assert_eq!(s.mean, 1.23);
//! assert_eq!(s.readings, vec![2.35, 7.8]);
//! ```
//!
//! Copyright (c) 2025 Rounder Team
//! Licensed under the Apache-2.0 license

use std::collections::{BTreeMap, HashMap, VecDeque};

use num_complex::Complex64;

use crate::engine::Transformer;
use crate::error::Result;
use crate::number::Number;
use crate::rounding::Rounding;
use crate::value::Value;

/// Types whose embedded numbers can be rewritten in place.
pub trait TransformNumbers {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()>;
}

impl TransformNumbers for f64 {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        *self = op.apply(Number::Float(*self))?.to_f64();
        Ok(())
    }
}

impl TransformNumbers for f32 {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        *self = op.apply(Number::Float(*self as f64))?.to_f64() as f32;
        Ok(())
    }
}

impl TransformNumbers for i64 {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        *self = op.apply(Number::Int(*self))?.to_i64();
        Ok(())
    }
}

impl TransformNumbers for i32 {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        let out = op.apply(Number::Int(*self as i64))?.to_i64();
        *self = out.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        Ok(())
    }
}

impl TransformNumbers for Complex64 {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        let re = op.apply(Number::Float(self.re))?;
        let im = op.apply(Number::Float(self.im))?;
        *self = Complex64::new(re.to_f64(), im.to_f64());
        Ok(())
    }
}

impl TransformNumbers for Value {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        Transformer::new(op).transform(self)
    }
}

impl<T: TransformNumbers> TransformNumbers for Vec<T> {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        for item in self.iter_mut() {
            item.transform_numbers(op)?;
        }
        Ok(())
    }
}

impl<T: TransformNumbers> TransformNumbers for VecDeque<T> {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        for item in self.iter_mut() {
            item.transform_numbers(op)?;
        }
        Ok(())
    }
}

impl<T: TransformNumbers, const N: usize> TransformNumbers for [T; N] {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        for item in self.iter_mut() {
            item.transform_numbers(op)?;
        }
        Ok(())
    }
}

impl<T: TransformNumbers> TransformNumbers for Option<T> {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        if let Some(item) = self {
            item.transform_numbers(op)?;
        }
        Ok(())
    }
}

impl<T: TransformNumbers> TransformNumbers for Box<T> {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        self.as_mut().transform_numbers(op)
    }
}

// Mappings transform values only, mirroring the engine's contract that keys
// are never touched.
impl<K, V: TransformNumbers, S> TransformNumbers for HashMap<K, V, S> {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        for v in self.values_mut() {
            v.transform_numbers(op)?;
        }
        Ok(())
    }
}

impl<K, V: TransformNumbers> TransformNumbers for BTreeMap<K, V> {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        for v in self.values_mut() {
            v.transform_numbers(op)?;
        }
        Ok(())
    }
}

impl<A: TransformNumbers, B: TransformNumbers> TransformNumbers for (A, B) {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        self.0.transform_numbers(op)?;
        self.1.transform_numbers(op)
    }
}

impl<A: TransformNumbers, B: TransformNumbers, C: TransformNumbers> TransformNumbers for (A, B, C) {
    fn transform_numbers(&mut self, op: &Rounding) -> Result<()> {
        self.0.transform_numbers(op)?;
        self.1.transform_numbers(op)?;
        self.2.transform_numbers(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_impls() {
        let mut x = 12.345f64;
        x.transform_numbers(&Rounding::decimals(Some(1))).unwrap();
        assert_eq!(x, 12.3);

        let mut i = 1234i64;
        i.transform_numbers(&Rounding::decimals(Some(-2))).unwrap();
        assert_eq!(i, 1200);
    }

    #[test]
    fn test_container_impls() {
        let mut m: HashMap<String, Vec<f64>> = HashMap::new();
        m.insert("xs".to_string(), vec![1.26, 2.53]);
        m.transform_numbers(&Rounding::decimals(Some(1))).unwrap();
        assert_eq!(m["xs"], vec![1.3, 2.5]);

        let mut pair = (1.99f64, vec![0.04f64]);
        pair.transform_numbers(&Rounding::ceil()).unwrap();
        assert_eq!(pair, (2.0, vec![1.0]));
    }

    #[test]
    fn test_complex_impl() {
        let mut c = Complex64::new(1.234, -5.678);
        c.transform_numbers(&Rounding::decimals(Some(1))).unwrap();
        assert_eq!(c, Complex64::new(1.2, -5.7));
    }

    #[test]
    fn test_value_impl_delegates_to_engine() {
        let mut v = Value::tuple(vec![Value::float(2.5), Value::text("x")]);
        v.transform_numbers(&Rounding::floor()).unwrap();
        assert_eq!(v, Value::tuple(vec![Value::int(2), Value::text("x")]));
    }
}
