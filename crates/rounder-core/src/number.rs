//! Numeric scalar tower for Rounder
//!
//! A [`Number`] is one numeric leaf of a value tree: integer, float, boolean
//! (booleans are numeric here and are transformed like any other number), or
//! rational. Complex numbers are not scalars - the engine unwraps them into
//! real and imaginary parts before any leaf transform runs.

use std::fmt;

/// A single numeric leaf value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    Bool(bool),
    Rational(Rational),
}

impl Number {
    /// Lossy view of the scalar as an f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
            Number::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Number::Rational(r) => r.to_f64(),
        }
    }

    /// Truncating view of the scalar as an i64 (saturating for huge floats).
    pub fn to_i64(self) -> i64 {
        match self {
            Number::Int(i) => i,
            Number::Float(x) => x as i64,
            Number::Bool(b) => b as i64,
            Number::Rational(r) => r.num() / r.den(),
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(x) => x == 0.0,
            Number::Bool(b) => !b,
            Number::Rational(r) => r.num() == 0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
            Number::Bool(b) => write!(f, "{}", b),
            Number::Rational(r) => write!(f, "{}", r),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl From<bool> for Number {
    fn from(b: bool) -> Self {
        Number::Bool(b)
    }
}

impl From<Rational> for Number {
    fn from(r: Rational) -> Self {
        Number::Rational(r)
    }
}

/// An exact rational number, always reduced, with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// Build a reduced rational. Panics if `den` is zero.
    ///
    /// Normalization runs in i128 so `i64::MIN` components cannot overflow
    /// when the sign moves to the numerator; a reduced component still out
    /// of i64 range saturates, like [`round_dp`](Self::round_dp) does.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "rational denominator must be non-zero");
        if num == 0 {
            return Self { num: 0, den: 1 };
        }
        let mut n = num as i128;
        let mut d = den as i128;
        if d < 0 {
            n = -n;
            d = -d;
        }
        let g = gcd(n.unsigned_abs(), d.unsigned_abs()) as i128;
        Self {
            num: clamp_i64(n / g),
            den: clamp_i64(d / g),
        }
    }

    pub fn num(self) -> i64 {
        self.num
    }

    pub fn den(self) -> i64 {
        self.den
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Largest integer <= self.
    pub fn floor_int(self) -> i64 {
        self.num.div_euclid(self.den)
    }

    /// Smallest integer >= self.
    pub fn ceil_int(self) -> i64 {
        let floor = self.num.div_euclid(self.den);
        if self.num.rem_euclid(self.den) != 0 {
            floor + 1
        } else {
            floor
        }
    }

    /// Nearest integer, ties to even.
    pub fn round_int(self) -> i64 {
        round_half_even(self.num as i128, self.den as i128) as i64
    }

    /// Round to `digits` decimal places (half to even). Negative digits round
    /// to tens, hundreds, and so on.
    pub fn round_dp(self, digits: i32) -> Rational {
        // Compute round(self * 10^digits) / 10^digits in i128 to keep
        // intermediate products exact.
        let scale = pow10_i128(digits.unsigned_abs());
        let (num, den) = if digits >= 0 {
            (self.num as i128 * scale, self.den as i128)
        } else {
            (self.num as i128, self.den as i128 * scale)
        };
        let q = round_half_even(num, den);
        let (res_num, res_den) = if digits >= 0 {
            (q, scale)
        } else {
            (q.saturating_mul(scale), 1)
        };
        Rational::new(clamp_i64(res_num), clamp_i64(res_den))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

fn pow10_i128(exp: u32) -> i128 {
    // i128 holds 10^38; anything past that saturates, which only affects
    // digit counts no real input reaches.
    10i128.checked_pow(exp.min(38)).unwrap_or(i128::MAX)
}

fn clamp_i64(x: i128) -> i64 {
    x.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Nearest integer to num/den with ties going to the even neighbor.
/// `den` must be positive.
pub(crate) fn round_half_even(num: i128, den: i128) -> i128 {
    let floor = num.div_euclid(den);
    let rem = num.rem_euclid(den);
    match (2 * rem).cmp(&den) {
        std::cmp::Ordering::Less => floor,
        std::cmp::Ordering::Greater => floor + 1,
        std::cmp::Ordering::Equal => {
            if floor % 2 == 0 {
                floor
            } else {
                floor + 1
            }
        }
    }
}
