//! serde_json interop
//!
//! Two surfaces: conversions between [`Value`] and `serde_json::Value`, and a
//! direct in-place transformer for JSON trees so callers normalizing API
//! payloads or test fixtures do not have to convert at all.
//!
//! JSON booleans are a distinct type in serde_json's model, so the direct
//! JSON walker leaves them alone; converting into [`Value`] maps them onto
//! the numeric tower, where they are transformed like any other number.
//!
//! Copyright (c) 2025 Rounder Team
//! Licensed under the Apache-2.0 license

use serde_json::Value as JsonValue;

use crate::engine::{OnLeafError, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::number::Number;
use crate::rounding::Rounding;
use crate::value::Value;

/// Round every number in a JSON tree to `digits` decimal places, in place.
///
/// ```
/// use serde_json::json;
///
/// let mut v = json!({"score": 0.98765, "tags": ["a", 1.23456]});
/// rounder_core::round_json(&mut v, Some(2)).unwrap();
/// assert_eq!(v, json!({"score": 0.99, "tags": ["a", 1.23]}));
/// ```
pub fn round_json(value: &mut JsonValue, digits: Option<i32>) -> Result<()> {
    transform_json(value, &Rounding::decimals(digits), OnLeafError::KeepOriginal)
}

/// Apply a leaf transform to every number in a JSON tree, in place.
///
/// Recursion is bounded at [`DEFAULT_MAX_DEPTH`]; trees nested deeper return
/// [`Error::DepthExceeded`] before touching anything below the limit.
pub fn transform_json(
    value: &mut JsonValue,
    op: &Rounding,
    on_leaf_error: OnLeafError,
) -> Result<()> {
    transform_json_bounded(value, op, on_leaf_error, DEFAULT_MAX_DEPTH)
}

pub(crate) fn transform_json_bounded(
    value: &mut JsonValue,
    op: &Rounding,
    on_leaf_error: OnLeafError,
    max_depth: usize,
) -> Result<()> {
    walk_json(value, op, on_leaf_error, 0, max_depth)
}

fn walk_json(
    value: &mut JsonValue,
    op: &Rounding,
    on_leaf_error: OnLeafError,
    depth: usize,
    max_depth: usize,
) -> Result<()> {
    if depth >= max_depth {
        return Err(Error::DepthExceeded { limit: max_depth });
    }
    match value {
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::String(_) => Ok(()),
        JsonValue::Number(_) => transform_json_number(value, op, on_leaf_error),
        JsonValue::Array(items) => {
            for item in items.iter_mut() {
                walk_json(item, op, on_leaf_error, depth + 1, max_depth)?;
            }
            Ok(())
        }
        JsonValue::Object(map) => {
            for (_, v) in map.iter_mut() {
                walk_json(v, op, on_leaf_error, depth + 1, max_depth)?;
            }
            Ok(())
        }
    }
}

fn transform_json_number(
    value: &mut JsonValue,
    op: &Rounding,
    on_leaf_error: OnLeafError,
) -> Result<()> {
    let n = match value {
        JsonValue::Number(n) => n,
        _ => return Ok(()),
    };
    let leaf = if let Some(i) = n.as_i64() {
        Number::Int(i)
    } else if let Some(x) = n.as_f64() {
        // Covers u64 beyond i64 range too; such values only round at
        // f64 precision.
        Number::Float(x)
    } else {
        return Ok(());
    };
    match op.apply(leaf) {
        Ok(Number::Int(i)) => {
            *value = JsonValue::Number(i.into());
            Ok(())
        }
        Ok(out) => {
            // Non-finite results have no JSON representation; keep the
            // original number in that case.
            if let Some(num) = serde_json::Number::from_f64(out.to_f64()) {
                *value = JsonValue::Number(num);
            }
            Ok(())
        }
        Err(e) if e.is_node_level() && on_leaf_error == OnLeafError::KeepOriginal => {
            log::warn!("leaf transform failed on a JSON number, keeping original: {}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::int(i)
                } else {
                    Value::float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Value::Text(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<&Value> for JsonValue {
    type Error = Error;

    fn try_from(v: &Value) -> Result<JsonValue> {
        match v {
            Value::Null => Ok(JsonValue::Null),
            Value::Number(Number::Bool(b)) => Ok(JsonValue::Bool(*b)),
            Value::Number(Number::Int(i)) => Ok(JsonValue::Number((*i).into())),
            Value::Number(Number::Float(x)) => {
                serde_json::Number::from_f64(*x)
                    .map(JsonValue::Number)
                    .ok_or_else(|| Error::Unsupported {
                        message: format!("non-finite number {} has no JSON representation", x),
                    })
            }
            Value::Number(Number::Rational(r)) => Err(Error::Unsupported {
                message: format!("rational number {} has no exact JSON representation", r),
            }),
            Value::Text(s) => Ok(JsonValue::String(s.clone())),
            Value::List(items) | Value::Tuple(items) => {
                items.iter().map(JsonValue::try_from).collect::<Result<Vec<_>>>()
                    .map(JsonValue::Array)
            }
            Value::Deque(items) => {
                items.iter().map(JsonValue::try_from).collect::<Result<Vec<_>>>()
                    .map(JsonValue::Array)
            }
            Value::Map(pairs) => {
                let mut out = serde_json::Map::with_capacity(pairs.len());
                for (k, v) in pairs {
                    let key = match k {
                        Value::Text(s) => s.clone(),
                        other => {
                            return Err(Error::Unsupported {
                                message: format!(
                                    "JSON object keys must be text, got {}",
                                    other.shape()
                                ),
                            })
                        }
                    };
                    out.insert(key, JsonValue::try_from(v)?);
                }
                Ok(JsonValue::Object(out))
            }
            Value::Record(rec) => {
                let mut out = serde_json::Map::with_capacity(rec.fields.len());
                for (name, v) in &rec.fields {
                    out.insert(name.clone(), JsonValue::try_from(v)?);
                }
                Ok(JsonValue::Object(out))
            }
            Value::Object(obj) => {
                let mut out = serde_json::Map::with_capacity(obj.attrs.len());
                for (name, v) in &obj.attrs {
                    out.insert(name.clone(), JsonValue::try_from(v)?);
                }
                Ok(JsonValue::Object(out))
            }
            other => Err(Error::Unsupported {
                message: format!("{} values have no JSON representation", other.shape()),
            }),
        }
    }
}
