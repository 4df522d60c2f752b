//! End-to-end tests for the transformation engine
//!
//! These exercise the public entry points over realistic nested structures:
//! shape preservation, mutation vs copy semantics, failure isolation, and the
//! JSON interop surface.

use serde_json::json;

use rounder_core::{
    ceil_object, floor_object, map_object, round_json, round_object, round_object_copied,
    signif_object, Error, Number, NumericBuffer, OnLeafError, Rounder, Shape, Value,
};

fn nested_fixture() -> Value {
    // {'a': [1.2345, {'b': (2.3456, 7.8)}]}
    Value::map(vec![(
        Value::text("a"),
        Value::list(vec![
            Value::float(1.2345),
            Value::map(vec![(
                Value::text("b"),
                Value::tuple(vec![Value::float(2.3456), Value::float(7.8)]),
            )]),
        ]),
    )])
}

#[test]
fn test_nested_structure_rounding() {
    let mut v = nested_fixture();
    round_object(&mut v, Some(2)).unwrap();
    assert_eq!(
        v,
        Value::map(vec![(
            Value::text("a"),
            Value::list(vec![
                Value::float(1.23),
                Value::map(vec![(
                    Value::text("b"),
                    Value::tuple(vec![Value::float(2.35), Value::float(7.8)]),
                )]),
            ]),
        )])
    );
}

#[test]
fn test_shape_preservation_across_transforms() {
    let shapes = vec![
        Value::list(vec![Value::float(1.5)]),
        Value::tuple(vec![Value::float(1.5)]),
        Value::set(vec![Value::float(1.5)]),
        Value::frozen_set(vec![Value::float(1.5)]),
        Value::map(vec![(Value::text("k"), Value::float(1.5))]),
        Value::deque(vec![Value::float(1.5)]),
        Value::Buffer(NumericBuffer::F64(vec![1.5])),
        Value::complex(1.5, 2.5),
        Value::record("R", vec![("x".to_string(), Value::float(1.5))]),
        Value::object("O", vec![("x".to_string(), Value::float(1.5))]),
    ];
    for mut v in shapes {
        let before = v.shape();
        ceil_object(&mut v).unwrap();
        assert_eq!(v.shape(), before);
    }
}

#[test]
fn test_order_and_length_preserved() {
    let mut v = Value::list(
        (0..50)
            .map(|i| Value::float(i as f64 + 0.5))
            .collect::<Vec<_>>(),
    );
    floor_object(&mut v).unwrap();
    let items = v.as_list().unwrap();
    assert_eq!(items.len(), 50);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(*item, Value::int(i as i64));
    }
}

#[test]
fn test_ceil_floor_idempotent_over_structures() {
    let mut once = nested_fixture();
    ceil_object(&mut once).unwrap();
    let mut twice = once.deep_clone().unwrap();
    ceil_object(&mut twice).unwrap();
    assert_eq!(once, twice);

    let mut once = nested_fixture();
    floor_object(&mut once).unwrap();
    let mut twice = once.deep_clone().unwrap();
    floor_object(&mut twice).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_text_is_never_decomposed() {
    let mut v = Value::text("3.14159");
    round_object(&mut v, Some(2)).unwrap();
    assert_eq!(v.as_text(), Some("3.14159"));
}

#[test]
fn test_boolean_treated_as_numeric() {
    let mut v = Value::boolean(true);
    round_object(&mut v, Some(2)).unwrap();
    // Documented output type: rounding a boolean yields an integer leaf.
    assert_eq!(v, Value::int(1));
}

#[test]
fn test_signif_zero_special_case_for_any_digit_count() {
    for digits in [0, 1, 3, 10] {
        let mut v = Value::float(0.0);
        signif_object(&mut v, digits).unwrap();
        assert_eq!(v, Value::float(0.0));
    }
}

#[test]
fn test_mutation_mode_affects_caller_value() {
    let mut x = Value::list(vec![Value::float(1.2345)]);
    round_object(&mut x, Some(1)).unwrap();
    assert_eq!(x, Value::list(vec![Value::float(1.2)]));
}

#[test]
fn test_copy_mode_leaves_caller_value_unchanged() {
    let x = Value::list(vec![Value::float(1.2345)]);
    let rounded = round_object_copied(&x, Some(1)).unwrap();
    assert_eq!(x, Value::list(vec![Value::float(1.2345)]));
    assert_eq!(rounded, Value::list(vec![Value::float(1.2)]));
}

#[test]
fn test_copy_mode_fails_fast_on_unclonable_values() {
    let x = Value::map(vec![
        (Value::text("n"), Value::float(1.5)),
        (Value::text("handle"), Value::opaque("file", ())),
    ]);
    let err = round_object_copied(&x, None).unwrap_err();
    assert!(matches!(err, Error::Unclonable { ref type_name } if type_name == "file"));
    // No partial transformation happened.
    match &x {
        Value::Map(pairs) => assert_eq!(pairs[0].1, Value::float(1.5)),
        other => panic!("expected map, got {:?}", other),
    }
}

#[test]
fn test_opaque_values_pass_through_in_mutation_mode() {
    let mut v = Value::list(vec![Value::float(2.5), Value::opaque("socket", 7u32)]);
    round_object(&mut v, None).unwrap();
    let items = v.as_list().unwrap();
    assert_eq!(items[0], Value::int(2));
    assert_eq!(items[1].shape(), Shape::Opaque);
}

#[test]
fn test_set_collapse_is_accepted_behavior() {
    let mut v = Value::set(vec![Value::float(0.1), Value::float(0.11)]);
    round_object(&mut v, Some(1)).unwrap();
    assert_eq!(v, Value::Set(vec![Value::float(0.1)]));
}

#[test]
fn test_buffer_roundtrip_preserves_element_type() {
    let mut v = Value::Buffer(NumericBuffer::I32(vec![1234, 5678]));
    round_object(&mut v, Some(-2)).unwrap();
    assert_eq!(v, Value::Buffer(NumericBuffer::I32(vec![1200, 5700])));
}

#[test]
fn test_strict_policy_via_builder() {
    let failing = Rounder::map(|n| {
        if n.to_f64() < 0.0 {
            anyhow::bail!("negative");
        }
        Ok(n)
    })
    .on_leaf_error(OnLeafError::Fail);

    let mut v = Value::list(vec![Value::float(1.0), Value::float(-1.0)]);
    assert!(failing.apply(&mut v).is_err());
}

#[test]
fn test_map_object_with_signif_composition() {
    // map each number to signif(sqrt(x), 3)
    let mut v = Value::map(vec![
        (Value::text("number"), Value::float(12.323)),
        (Value::text("string"), Value::text("whatever")),
        (
            Value::text("list"),
            Value::list(vec![Value::float(122.45), Value::float(0.01)]),
        ),
    ]);
    map_object(
        |n| {
            let r = rounder_core::signif(n.to_f64().sqrt(), 3)?;
            Ok(Number::Float(r))
        },
        &mut v,
    )
    .unwrap();
    assert_eq!(
        v,
        Value::map(vec![
            (Value::text("number"), Value::float(3.51)),
            (Value::text("string"), Value::text("whatever")),
            (
                Value::text("list"),
                Value::list(vec![Value::float(11.1), Value::float(0.1)]),
            ),
        ])
    );
}

#[test]
fn test_round_json_fixture_normalization() {
    let mut fixture = json!({
        "metrics": {"precision": 0.87654321, "recall": 0.91234567},
        "counts": [3, 4.999999999],
        "model": "fixture-v1"
    });
    round_json(&mut fixture, Some(3)).unwrap();
    assert_eq!(
        fixture,
        json!({
            "metrics": {"precision": 0.877, "recall": 0.912},
            "counts": [3, 5.0],
            "model": "fixture-v1"
        })
    );
}
