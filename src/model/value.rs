//! Universal value type carried by entity properties, and the shapes
//! incoming strings can be coerced into.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Property value.
///
/// Covers every native shape a record field can expose:
/// - Scalars: Bool, Int, Uint, Float, String, Duration
/// - Containers: List, Map
///
/// On the wire every value travels as a string, see [`Value::to_wire_string`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    /// Signed nanoseconds.
    Duration(i64),
    List(Vec<Value>),
    /// Entries in insertion order. Keys are unique.
    Map(Vec<(Value, Value)>),
}

/// Target shape of a string coercion.
///
/// Integer and float variants carry their bit width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Text,
    Bool,
    Int(u32),
    Uint(u32),
    Float(u32),
    Duration,
    Seq(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Optional(Box<Shape>),
    /// Open slot: coerces into whatever the slot currently holds.
    Dynamic,
    /// A native type with no coercion rule.
    Opaque(String),
}

// ============================================================================
// Shape
// ============================================================================

impl Shape {
    pub fn seq(elem: Shape) -> Self { Shape::Seq(Box::new(elem)) }
    pub fn map(key: Shape, value: Shape) -> Self { Shape::Map(Box::new(key), Box::new(value)) }
    pub fn optional(inner: Shape) -> Self { Shape::Optional(Box::new(inner)) }

    /// The value a freshly allocated slot of this shape holds.
    pub fn zero(&self) -> Value {
        match self {
            Shape::Text => Value::String(String::new()),
            Shape::Bool => Value::Bool(false),
            Shape::Int(_) => Value::Int(0),
            Shape::Uint(_) => Value::Uint(0),
            Shape::Float(_) => Value::Float(0.0),
            Shape::Duration => Value::Duration(0),
            Shape::Seq(_) => Value::List(Vec::new()),
            Shape::Map(_, _) => Value::Map(Vec::new()),
            Shape::Optional(_) | Shape::Dynamic | Shape::Opaque(_) => Value::Null,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Text => write!(f, "text"),
            Shape::Bool => write!(f, "bool"),
            Shape::Int(bits) => write!(f, "i{bits}"),
            Shape::Uint(bits) => write!(f, "u{bits}"),
            Shape::Float(bits) => write!(f, "f{bits}"),
            Shape::Duration => write!(f, "duration"),
            Shape::Seq(elem) => write!(f, "[{elem}]"),
            Shape::Map(k, v) => write!(f, "{{{k}: {v}}}"),
            Shape::Optional(inner) => write!(f, "{inner}?"),
            Shape::Dynamic => write!(f, "dynamic"),
            Shape::Opaque(name) => write!(f, "{name}"),
        }
    }
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Uint(_) => "UNSIGNED",
            Value::Float(_) => "FLOAT",
            Value::String(_) => "STRING",
            Value::Duration(_) => "DURATION",
            Value::List(_) => "LIST",
            Value::Map(_) => "MAP",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    /// Shape of the concrete value held, `None` for `Null`.
    ///
    /// Empty containers default their element shapes to text, the wire type.
    pub fn shape(&self) -> Option<Shape> {
        let shape = match self {
            Value::Null => return None,
            Value::Bool(_) => Shape::Bool,
            Value::Int(_) => Shape::Int(64),
            Value::Uint(_) => Shape::Uint(64),
            Value::Float(_) => Shape::Float(64),
            Value::String(_) => Shape::Text,
            Value::Duration(_) => Shape::Duration,
            Value::List(items) => Shape::seq(
                items.iter().find_map(Value::shape).unwrap_or(Shape::Text),
            ),
            Value::Map(entries) => {
                let key = entries.iter().find_map(|(k, _)| k.shape()).unwrap_or(Shape::Text);
                let value = entries.iter().find_map(|(_, v)| v.shape()).unwrap_or(Shape::Text);
                Shape::map(key, value)
            }
        };
        Some(shape)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempt to extract as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Attempt to extract as u64
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            Value::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Attempt to extract as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Uint(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Attempt to extract as &str
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a map entry by key.
    pub fn map_get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// String form used on the wire.
    ///
    /// Durations are written as fractional seconds (`5400s`, `1.5s`) so the
    /// coercion grammar reads them back unchanged.
    pub fn to_wire_string(&self) -> String {
        self.to_string()
    }
}

/// Format signed nanoseconds as `<seconds>[.<fraction>]s`.
pub(crate) fn format_duration(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_owned();
    }
    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();
    let secs = abs / 1_000_000_000;
    let frac = abs % 1_000_000_000;
    if frac == 0 {
        format!("{sign}{secs}s")
    } else {
        let digits = format!("{frac:09}");
        format!("{sign}{secs}.{}s", digits.trim_end_matches('0'))
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<u32> for Value { fn from(v: u32) -> Self { Value::Uint(v as u64) } }
impl From<u64> for Value { fn from(v: u64) -> Self { Value::Uint(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

// ============================================================================
// Display (wire form)
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Duration(nanos) => f.write_str(&format_duration(*nanos)),
            Value::List(l) => {
                for (i, v) in l.iter().enumerate() {
                    if i > 0 { write!(f, ",")?; }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
            Value::Map(m) => {
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { write!(f, ",")?; }
                    write!(f, "{k}:{v}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from("hello"), Value::String("hello".into()));
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(7u64), Value::Uint(7));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(Value::Null.to_wire_string(), "");
        assert_eq!(Value::Float(0.5).to_wire_string(), "0.5");
        assert_eq!(Value::from(vec!["a", "b"]).to_wire_string(), "a,b");
        let map = Value::Map(vec![(Value::from("a"), Value::from("1"))]);
        assert_eq!(map.to_wire_string(), "a:1");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(5_400_000_000_000), "5400s");
        assert_eq!(format_duration(-1_500_000_000), "-1.5s");
        assert_eq!(format_duration(300), "0.0000003s");
    }

    #[test]
    fn test_shape_inference() {
        assert_eq!(Value::Null.shape(), None);
        assert_eq!(Value::Int(3).shape(), Some(Shape::Int(64)));
        assert_eq!(Value::List(vec![]).shape(), Some(Shape::seq(Shape::Text)));
        assert_eq!(
            Value::Map(vec![(Value::from("k"), Value::Uint(1))]).shape(),
            Some(Shape::map(Shape::Text, Shape::Uint(64))),
        );
    }

    #[test]
    fn test_shape_zero() {
        assert_eq!(Shape::Bool.zero(), Value::Bool(false));
        assert_eq!(Shape::optional(Shape::Text).zero(), Value::Null);
        assert_eq!(Shape::seq(Shape::Int(8)).zero(), Value::List(vec![]));
    }
}
