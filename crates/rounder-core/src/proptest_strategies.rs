//! Property-based testing strategies for generating value trees
//!
//! This module provides proptest strategies for generating random but valid
//! [`Value`] instances for property testing.

#![cfg(test)]

use proptest::collection::vec;
use proptest::prelude::*;

use crate::number::{Number, Rational};
use crate::value::{NumericBuffer, Value};

/// Strategy for generating numeric scalars.
pub fn number_strategy() -> impl Strategy<Value = Number> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(Number::Int),
        (-1.0e6..1.0e6).prop_map(Number::Float),
        any::<bool>().prop_map(Number::Bool),
        ((-1000i64..1000), (1i64..1000)).prop_map(|(n, d)| Number::Rational(Rational::new(n, d))),
    ]
}

/// Strategy for generating leaf values (no containers).
pub fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        number_strategy().prop_map(Value::Number),
        ((-1.0e3..1.0e3), (-1.0e3..1.0e3)).prop_map(|(re, im)| Value::complex(re, im)),
        "[a-z0-9 ]{0,12}".prop_map(Value::text),
        vec(-1.0e3..1.0e3f64, 0..6).prop_map(|xs| Value::Buffer(NumericBuffer::F64(xs))),
    ]
}

/// Strategy for generating nested value trees of bounded depth.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::list),
            vec(inner.clone(), 0..6).prop_map(Value::tuple),
            vec(inner.clone(), 0..6).prop_map(Value::set),
            vec(inner.clone(), 0..6).prop_map(Value::deque),
            vec(("[a-z]{1,8}", inner.clone()), 0..6)
                .prop_map(|fields| Value::object("Generated", fields)),
            vec(("[a-z]{1,8}".prop_map(Value::text), inner), 0..6).prop_map(Value::map),
        ]
    })
}
