//! # Value Model
//!
//! The finite set of primitive kinds a schema may declare, and the scalar
//! values stored in validated leaves.
//!
//! Raw input is a `serde_json::Value` tree. Kind checks are exact: a JSON
//! integer is not a float and a JSON float is not an integer, so `1` is
//! rejected where a float is declared and `1.0` is rejected where an
//! integer is declared.

use std::fmt;

use serde_json::Value;

/// A primitive kind baked into the schema descriptor format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
}

impl PrimitiveKind {
    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Float => "float",
            Self::String => "str",
            Self::Bool => "bool",
        }
    }

    /// Returns true if `raw` is an instance of this kind.
    pub fn matches(self, raw: &Value) -> bool {
        self.scalar(raw).is_some()
    }

    /// Extract a scalar of this kind from `raw`, if `raw` is one.
    pub fn scalar(self, raw: &Value) -> Option<Scalar> {
        match (self, raw) {
            (Self::Integer, Value::Number(n)) if !n.is_f64() => n.as_i64().map(Scalar::Int),
            (Self::Float, Value::Number(n)) if n.is_f64() => n.as_f64().map(Scalar::Float),
            (Self::String, Value::String(s)) => Some(Scalar::Str(s.clone())),
            (Self::Bool, Value::Bool(b)) => Some(Scalar::Bool(*b)),
            _ => None,
        }
    }

    /// The numeric kind this primitive corresponds to, if any.
    pub fn numeric(self) -> Option<NumericKind> {
        match self {
            Self::Integer => Some(NumericKind::Integer),
            Self::Float => Some(NumericKind::Float),
            Self::String | Self::Bool => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the runtime type of a raw value, for error messages.
pub fn raw_type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// The subset of primitive kinds a numeric leaf may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// Integer samples; interpolated values are truncated toward zero.
    Integer,
    /// Float samples.
    Float,
}

impl NumericKind {
    /// The primitive kind this numeric kind narrows.
    pub fn primitive(self) -> PrimitiveKind {
        match self {
            Self::Integer => PrimitiveKind::Integer,
            Self::Float => PrimitiveKind::Float,
        }
    }

    /// Extract a number of exactly this kind from `raw`.
    pub fn extract(self, raw: &Value) -> Option<Numeric> {
        match self.primitive().scalar(raw)? {
            Scalar::Int(i) => Some(Numeric::Int(i)),
            Scalar::Float(f) => Some(Numeric::Float(f)),
            _ => None,
        }
    }

    /// Cast an interpolated sample to this kind.
    pub fn cast(self, sample: f64) -> Numeric {
        match self {
            // `as` saturates at the i64 bounds and truncates toward zero.
            Self::Integer => Numeric::Int(sample.trunc() as i64),
            Self::Float => Numeric::Float(sample),
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.primitive().fmt(f)
    }
}

/// A single number held by a numeric leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// Integer sample.
    Int(i64),
    /// Float sample.
    Float(f64),
}

impl Numeric {
    /// The sample widened to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// The kind of this sample.
    pub fn kind(self) -> NumericKind {
        match self {
            Self::Int(_) => NumericKind::Integer,
            Self::Float(_) => NumericKind::Float,
        }
    }

    /// Encode as a raw JSON number. Returns `None` for non-finite floats,
    /// which JSON cannot represent.
    pub fn to_json(self) -> Option<Value> {
        match self {
            Self::Int(i) => Some(Value::from(i)),
            Self::Float(f) => serde_json::Number::from_f64(f).map(Value::Number),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// The value of a numeric leaf after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    /// A bare scalar.
    Scalar(Numeric),
    /// An explicit array or an interpolated range.
    Samples(Vec<Numeric>),
}

impl NumberValue {
    /// Every number held, as a slice. A scalar yields a slice of length one.
    pub fn samples(&self) -> &[Numeric] {
        match self {
            Self::Scalar(n) => std::slice::from_ref(n),
            Self::Samples(items) => items,
        }
    }

    /// The scalar, if this is not a sequence.
    pub fn scalar(&self) -> Option<Numeric> {
        match self {
            Self::Scalar(n) => Some(*n),
            Self::Samples(_) => None,
        }
    }
}

/// A validated scalar stored in a primitive field, terminal leaf, or
/// string-selection leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// JSON `null`, accepted by primitive record fields regardless of kind.
    Null,
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
    /// Boolean.
    Bool(bool),
}

impl Scalar {
    /// Returns true for [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value as `f64`, for integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as `i64`, for integers only.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as `&str`, for strings only.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as `bool`, for booleans only.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}
