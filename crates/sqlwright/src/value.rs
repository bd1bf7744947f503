//! Literal values and predicate operands.
//!
//! [`Value`] is a scalar literal that can be quoted into SQL text.
//! [`Operand`] is the right-hand side of a predicate, tagged at the call
//! site so a literal string can never be mistaken for a parameter
//! reference or a raw expression.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A literal value quotable by a [`Dialect`](crate::Dialect).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL.
    #[default]
    Null,
    /// Boolean, rendered as the backend-appropriate literal.
    Bool(bool),
    /// Signed integer, passed through unquoted.
    Int(i64),
    /// Floating point, passed through unquoted (non-finite renders NULL).
    Float(f64),
    /// Text, escaped and delimited.
    Text(String),
    /// Timestamp, rendered as a quoted `YYYY-MM-DD HH:MM:SS`.
    DateTime(DateTime<Utc>),
    /// Calendar date, rendered as a quoted `YYYY-MM-DD`.
    Date(NaiveDate),
    /// UUID, rendered as its quoted hyphenated form.
    Uuid(Uuid),
    /// JSON document, rendered as its quoted compact serialization.
    Json(serde_json::Value),
}

impl Value {
    /// Check for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer accessor.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float accessor (integers widen).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Text accessor.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean accessor.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render as a row-index key, when the value has a natural text form.
    pub(crate) fn as_key(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            Value::Uuid(u) => Some(u.to_string()),
            _ => None,
        }
    }

    /// Blank check used by the `filter` builder variants: NULL or
    /// whitespace-only text.
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Int(i64::from(value))
            }
        }
    )*};
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// The right-hand side of a predicate or assignment.
///
/// The variant is decided at the call site, so the compiler never has to
/// guess whether a string is a literal, a placeholder name, or SQL text.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A literal run through the dialect quoter.
    Value(Value),
    /// A named placeholder, left bare in the compiled text and resolved
    /// by the parameter binder.
    Param(String),
    /// A raw SQL fragment spliced verbatim.
    Expr(String),
    /// An ordered list, used by `IN` and `BETWEEN`.
    List(Vec<Operand>),
}

impl Operand {
    /// Reference a named parameter.
    pub fn param(name: impl Into<String>) -> Self {
        Operand::Param(name.into())
    }

    /// Splice a raw SQL fragment.
    pub fn expr(sql: impl Into<String>) -> Self {
        Operand::Expr(sql.into())
    }

    /// The SQL NULL literal.
    pub fn null() -> Self {
        Operand::Value(Value::Null)
    }

    /// Build a list operand from mixed items.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        Operand::List(items.into_iter().map(Into::into).collect())
    }

    /// Blank check used by the `filter` builder variants.
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Operand::Value(value) => value.is_blank(),
            Operand::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

macro_rules! operand_from_value {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Operand {
            fn from(value: $ty) -> Self {
                Operand::Value(Value::from(value))
            }
        }
    )*};
}

operand_from_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    DateTime<Utc>,
    NaiveDate,
    Uuid,
    serde_json::Value,
);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        Operand::Value(value.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::List(values.into_iter().map(|v| Operand::Value(v.into())).collect())
    }
}
