//! The closed value model for Rounder
//!
//! [`Value`] is a tagged union of every structural shape the engine knows how
//! to traverse. Classification is total by construction: each variant maps to
//! exactly one [`Shape`], which removes the overlapping-type-check hazards of
//! reflection-based dispatch (complex numbers are not "just numbers", strings
//! are not "just sequences" - they are their own variants).

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::number::{Number, Rational};

/// A generic nested value: numeric leaves inside arbitrarily nested containers.
///
/// `Clone` copies the tree but shares [`Opaque`] handles; [`Value::deep_clone`]
/// is the strict deep copy that refuses to copy opaque resources at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Empty/absent value, returned unchanged by every transform.
    Null,
    /// Numeric scalar leaf (integer, float, boolean, rational).
    Number(Number),
    /// Complex number, transformed as two independent real leaves.
    Complex(Complex64),
    /// Text, returned unchanged - never decomposed into characters.
    Text(String),
    /// Ordered mutable sequence, transformed in place.
    List(Vec<Value>),
    /// Fixed tuple, rebuilt element-wise in order.
    Tuple(Vec<Value>),
    /// Tuple with named fields; names and field order are preserved.
    Record(RecordValue),
    /// Unordered mutable collection; duplicates collapse after transformation.
    Set(Vec<Value>),
    /// Unordered immutable collection; same collapse semantics as `Set`.
    FrozenSet(Vec<Value>),
    /// Key-value mapping with arbitrary keys and stable insertion order.
    /// Keys are never transformed.
    Map(Vec<(Value, Value)>),
    /// Fixed-width homogeneous numeric buffer with a declared element type.
    Buffer(NumericBuffer),
    /// Double-ended queue, transformed element by element.
    Deque(VecDeque<Value>),
    /// Generic object with a mutable attribute table.
    Object(ObjectValue),
    /// Unrecognized host resource: traversal leaves it alone, deep-clone fails.
    Opaque(Opaque),
}

/// Structural category of a [`Value`], used to pick a traversal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Null,
    Number,
    Complex,
    Text,
    List,
    Tuple,
    Record,
    Set,
    FrozenSet,
    Map,
    Buffer,
    Deque,
    Object,
    Opaque,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Null => "null",
            Shape::Number => "number",
            Shape::Complex => "complex",
            Shape::Text => "text",
            Shape::List => "list",
            Shape::Tuple => "tuple",
            Shape::Record => "record",
            Shape::Set => "set",
            Shape::FrozenSet => "frozenset",
            Shape::Map => "map",
            Shape::Buffer => "buffer",
            Shape::Deque => "deque",
            Shape::Object => "object",
            Shape::Opaque => "opaque",
        };
        write!(f, "{}", name)
    }
}

/// A record: named-field tuple with a type name and ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

/// A generic object: type name plus a mutable, ordered attribute table.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub type_name: String,
    pub attrs: Vec<(String, Value)>,
}

/// An opaque host resource carried through a value tree.
///
/// Traversal returns it unchanged; [`Value::deep_clone`] fails on it, which
/// is what makes copy mode's "unclonable object" error reachable.
#[derive(Clone)]
pub struct Opaque {
    name: String,
    handle: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(name: impl Into<String>, resource: T) -> Self {
        Self {
            name: name.into(),
            handle: Arc::new(resource),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.name)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }
}

/// Element storage for a fixed-width numeric buffer. The variant is the
/// declared element type code and is preserved across transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericBuffer {
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl NumericBuffer {
    /// Single-character element type code, matching C-style buffer codes.
    pub fn type_code(&self) -> char {
        match self {
            NumericBuffer::U8(_) => 'B',
            NumericBuffer::I16(_) => 'h',
            NumericBuffer::I32(_) => 'l',
            NumericBuffer::I64(_) => 'q',
            NumericBuffer::F32(_) => 'f',
            NumericBuffer::F64(_) => 'd',
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumericBuffer::U8(v) => v.len(),
            NumericBuffer::I16(v) => v.len(),
            NumericBuffer::I32(v) => v.len(),
            NumericBuffer::I64(v) => v.len(),
            NumericBuffer::F32(v) => v.len(),
            NumericBuffer::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value {
    /// Total classification of this value into its structural shape.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Null => Shape::Null,
            Value::Number(_) => Shape::Number,
            Value::Complex(_) => Shape::Complex,
            Value::Text(_) => Shape::Text,
            Value::List(_) => Shape::List,
            Value::Tuple(_) => Shape::Tuple,
            Value::Record(_) => Shape::Record,
            Value::Set(_) => Shape::Set,
            Value::FrozenSet(_) => Shape::FrozenSet,
            Value::Map(_) => Shape::Map,
            Value::Buffer(_) => Shape::Buffer,
            Value::Deque(_) => Shape::Deque,
            Value::Object(_) => Shape::Object,
            Value::Opaque(_) => Shape::Opaque,
        }
    }

    pub fn int(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }

    pub fn float(x: f64) -> Self {
        Value::Number(Number::Float(x))
    }

    pub fn boolean(b: bool) -> Self {
        Value::Number(Number::Bool(b))
    }

    pub fn rational(num: i64, den: i64) -> Self {
        Value::Number(Number::Rational(Rational::new(num, den)))
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(Complex64::new(re, im))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }

    /// Build a set, deduplicating while preserving first occurrences.
    pub fn set(items: Vec<Value>) -> Self {
        Value::Set(dedup_values(items))
    }

    /// Build a frozen set, deduplicating while preserving first occurrences.
    pub fn frozen_set(items: Vec<Value>) -> Self {
        Value::FrozenSet(dedup_values(items))
    }

    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs)
    }

    pub fn deque(items: Vec<Value>) -> Self {
        Value::Deque(items.into())
    }

    pub fn record(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Value::Record(RecordValue {
            type_name: type_name.into(),
            fields,
        })
    }

    pub fn object(type_name: impl Into<String>, attrs: Vec<(String, Value)>) -> Self {
        Value::Object(ObjectValue {
            type_name: type_name.into(),
            attrs,
        })
    }

    pub fn opaque<T: Any + Send + Sync>(name: impl Into<String>, resource: T) -> Self {
        Value::Opaque(Opaque::new(name, resource))
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::to_f64)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Deep copy of the whole value graph.
    ///
    /// This is the "clone or fail" operation copy mode relies on: it fails
    /// with [`Error::Unclonable`] if any node is [`Value::Opaque`], and in
    /// that case nothing has been transformed.
    pub fn deep_clone(&self) -> Result<Value> {
        match self {
            Value::Null => Ok(Value::Null),
            Value::Number(n) => Ok(Value::Number(*n)),
            Value::Complex(c) => Ok(Value::Complex(*c)),
            Value::Text(s) => Ok(Value::Text(s.clone())),
            Value::List(items) => Ok(Value::List(deep_clone_vec(items)?)),
            Value::Tuple(items) => Ok(Value::Tuple(deep_clone_vec(items)?)),
            Value::Record(rec) => Ok(Value::Record(RecordValue {
                type_name: rec.type_name.clone(),
                fields: deep_clone_fields(&rec.fields)?,
            })),
            Value::Set(items) => Ok(Value::Set(deep_clone_vec(items)?)),
            Value::FrozenSet(items) => Ok(Value::FrozenSet(deep_clone_vec(items)?)),
            Value::Map(pairs) => {
                let mut out = Vec::with_capacity(pairs.len());
                for (k, v) in pairs {
                    out.push((k.deep_clone()?, v.deep_clone()?));
                }
                Ok(Value::Map(out))
            }
            Value::Buffer(buf) => Ok(Value::Buffer(buf.clone())),
            Value::Deque(items) => {
                let mut out = VecDeque::with_capacity(items.len());
                for item in items {
                    out.push_back(item.deep_clone()?);
                }
                Ok(Value::Deque(out))
            }
            Value::Object(obj) => Ok(Value::Object(ObjectValue {
                type_name: obj.type_name.clone(),
                attrs: deep_clone_fields(&obj.attrs)?,
            })),
            Value::Opaque(o) => Err(Error::Unclonable {
                type_name: o.name().to_string(),
            }),
        }
    }
}

fn deep_clone_vec(items: &[Value]) -> Result<Vec<Value>> {
    items.iter().map(Value::deep_clone).collect()
}

fn deep_clone_fields(fields: &[(String, Value)]) -> Result<Vec<(String, Value)>> {
    fields
        .iter()
        .map(|(name, v)| Ok((name.clone(), v.deep_clone()?)))
        .collect()
}

/// Drop duplicates, keeping the first occurrence of each element.
pub(crate) fn dedup_values(items: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Complex64> for Value {
    fn from(c: Complex64) -> Self {
        Value::Complex(c)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
