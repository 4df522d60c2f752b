//! Leaf transforms: the numeric functions applied at the bottom of a traversal
//!
//! A [`Rounding`] is one configured scalar-to-scalar transform. The engine
//! unwraps containers and complex numbers before calling it, so every
//! transform here only ever sees a plain [`Number`].
//!
//! Copyright (c) 2025 Rounder Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::number::{round_half_even, Number};

/// Default significant-digit count used by the significant-digit entry point.
pub const DEFAULT_SIGNIF_DIGITS: u32 = 3;

/// Signature for caller-supplied leaf transforms.
pub type CustomFn = dyn Fn(Number) -> anyhow::Result<Number> + Send + Sync;

/// A configured numeric leaf transform.
#[derive(Clone)]
pub enum Rounding {
    /// Round to `digits` decimal places, half to even. `None` means round to
    /// the nearest integer and produce an integer result.
    Decimals { digits: Option<i32> },
    /// Smallest integer >= x.
    Ceil,
    /// Largest integer <= x.
    Floor,
    /// Round to `digits` significant decimal digits.
    Signif { digits: u32 },
    /// Arbitrary caller-supplied function.
    Custom(Arc<CustomFn>),
}

impl fmt::Debug for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::Decimals { digits } => write!(f, "Decimals {{ digits: {:?} }}", digits),
            Rounding::Ceil => write!(f, "Ceil"),
            Rounding::Floor => write!(f, "Floor"),
            Rounding::Signif { digits } => write!(f, "Signif {{ digits: {} }}", digits),
            Rounding::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl Rounding {
    /// Decimal-place rounding; `None` rounds to the nearest integer.
    pub fn decimals(digits: Option<i32>) -> Self {
        Rounding::Decimals { digits }
    }

    pub fn ceil() -> Self {
        Rounding::Ceil
    }

    pub fn floor() -> Self {
        Rounding::Floor
    }

    pub fn signif(digits: u32) -> Self {
        Rounding::Signif { digits }
    }

    /// Wrap an arbitrary numeric function. A failure inside the function
    /// surfaces as [`Error::LeafTransform`] with the cause attached.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Number) -> anyhow::Result<Number> + Send + Sync + 'static,
    {
        Rounding::Custom(Arc::new(f))
    }

    /// Apply this transform to one numeric scalar.
    pub fn apply(&self, n: Number) -> Result<Number> {
        match self {
            Rounding::Decimals { digits } => apply_decimals(n, *digits),
            Rounding::Ceil => apply_int_op(n, IntOp::Ceil),
            Rounding::Floor => apply_int_op(n, IntOp::Floor),
            Rounding::Signif { digits } => apply_signif(n, *digits),
            Rounding::Custom(f) => f(n).map_err(|source| Error::LeafTransform { source }),
        }
    }
}

/// Round `x` to `digits` significant decimal digits.
///
/// Computes the decimal order of magnitude `d = ceil(log10(|x|))`, scales by
/// `10^(digits - d)`, rounds half to even, and rescales. Zero is returned
/// unchanged (its order of magnitude is undefined); NaN and infinities are
/// rejected as non-numeric.
pub fn signif(x: f64, digits: u32) -> Result<f64> {
    if x == 0.0 {
        return Ok(x);
    }
    if !x.is_finite() {
        return Err(Error::NonNumeric {
            value: x.to_string(),
        });
    }
    let d = x.abs().log10().ceil() as i32;
    let power = digits as i32 - d;
    let magnitude = 10f64.powi(power);
    Ok((x * magnitude).round_ties_even() / magnitude)
}

fn apply_decimals(n: Number, digits: Option<i32>) -> Result<Number> {
    match (n, digits) {
        // Booleans are numeric: rounding one yields its integer value,
        // whatever the digit count.
        (Number::Bool(b), _) => Ok(Number::Int(b as i64)),
        (Number::Int(i), None) => Ok(Number::Int(i)),
        (Number::Int(i), Some(d)) => {
            if d >= 0 {
                Ok(Number::Int(i))
            } else {
                Ok(Number::Int(round_int_to_pow10(i, d.unsigned_abs())))
            }
        }
        (Number::Float(x), None) => float_to_int(x.round_ties_even(), x),
        (Number::Float(x), Some(d)) => {
            if !x.is_finite() {
                // Rounding NaN to a digit count keeps NaN; only the
                // integer-producing form rejects non-finite input.
                return Ok(Number::Float(x));
            }
            Ok(Number::Float(round_f64_dp(x, d)))
        }
        (Number::Rational(r), None) => Ok(Number::Int(r.round_int())),
        (Number::Rational(r), Some(d)) => Ok(Number::Rational(r.round_dp(d))),
    }
}

enum IntOp {
    Ceil,
    Floor,
}

fn apply_int_op(n: Number, op: IntOp) -> Result<Number> {
    match n {
        Number::Bool(b) => Ok(Number::Int(b as i64)),
        Number::Int(i) => Ok(Number::Int(i)),
        Number::Float(x) => {
            let r = match op {
                IntOp::Ceil => x.ceil(),
                IntOp::Floor => x.floor(),
            };
            float_to_int(r, x)
        }
        Number::Rational(r) => Ok(Number::Int(match op {
            IntOp::Ceil => r.ceil_int(),
            IntOp::Floor => r.floor_int(),
        })),
    }
}

fn apply_signif(n: Number, digits: u32) -> Result<Number> {
    // Zero short-circuits before any type handling: log10 is undefined there.
    if n.is_zero() {
        return Ok(n);
    }
    Ok(Number::Float(signif(n.to_f64(), digits)?))
}

/// Convert an already-rounded float into an integer leaf, rejecting values
/// with no i64 representation. `original` is only used for the error message.
fn float_to_int(rounded: f64, original: f64) -> Result<Number> {
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(Error::NonNumeric {
            value: original.to_string(),
        });
    }
    Ok(Number::Int(rounded as i64))
}

/// Round a finite float to `digits` decimal places, half to even.
///
/// For non-negative digit counts this goes through decimal formatting rather
/// than power-of-ten scaling: scaling can turn values like 12.345 into exact
/// binary ties and round them the wrong way, while formatting rounds the true
/// decimal expansion of the stored value.
fn round_f64_dp(x: f64, digits: i32) -> f64 {
    if digits >= 0 {
        let precision = digits.min(340) as usize;
        format!("{:.*}", precision, x).parse().unwrap_or(x)
    } else {
        let m = 10f64.powi(digits);
        (x * m).round_ties_even() / m
    }
}

/// Half-to-even rounding of an integer to a multiple of 10^pow.
fn round_int_to_pow10(i: i64, pow: u32) -> i64 {
    // 10^20 already exceeds twice the i64 range, so everything rounds to zero.
    if pow > 19 {
        return 0;
    }
    let p = 10i128.pow(pow);
    let q = round_half_even(i as i128, p);
    (q * p).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
