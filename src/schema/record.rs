//! Native record access: the `Record` trait walked by the codec, and the
//! `FieldValue` conversions between native field types and `Value`.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::model::{EntityState, Shape, Value};
use crate::{Error, Result};

use super::Schema;

/// A native record the codec can flatten and repopulate.
///
/// Field names passed to the accessors are the `FieldDef::name`s of the
/// record's schema. Implementations are plain `match` blocks over the
/// field name.
pub trait Record {
    fn schema(&self) -> &'static Schema;

    /// Current value of a leaf field.
    fn get(&self, field: &str) -> Option<Value>;

    /// Replace the value of a leaf field.
    fn set(&mut self, field: &str, value: Value) -> Result<()>;

    /// A nested or base record field. `None` for an absent optional record,
    /// which is then skipped.
    fn record(&self, _field: &str) -> Option<&dyn Record> {
        None
    }

    /// Mutable access to a nested record field. Optional records should be
    /// allocated here so they can be populated.
    fn record_mut(&mut self, _field: &str) -> Option<&mut dyn Record> {
        None
    }

    /// Set display attributes (link, bookmark, labels, icon, extra
    /// properties) after the record's own fields were marshaled.
    fn decorate(&self, _entity: &mut EntityState) {}
}

/// Error for a field name the record does not know.
pub fn unknown_field(record: &dyn Record, field: &str) -> Error {
    Error::UnknownField {
        record: record.schema().type_name.clone(),
        field: field.to_owned(),
    }
}

/// Conversion between a native field type and `Value`.
pub trait FieldValue: Sized {
    /// Coercion target for this type.
    fn shape() -> Shape;
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: impl Into<String>, got: &Value) -> Error {
    Error::TypeError { expected: expected.into(), got: got.type_name().to_owned() }
}

// ============================================================================
// Scalars
// ============================================================================

impl FieldValue for String {
    fn shape() -> Shape { Shape::Text }
    fn to_value(&self) -> Value { Value::String(self.clone()) }
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("STRING", &other)),
        }
    }
}

impl FieldValue for bool {
    fn shape() -> Shape { Shape::Bool }
    fn to_value(&self) -> Value { Value::Bool(*self) }
    fn from_value(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch("BOOLEAN", &value))
    }
}

macro_rules! signed_field_value {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn shape() -> Shape { Shape::Int(<$t>::BITS) }
            fn to_value(&self) -> Value { Value::Int(*self as i64) }
            fn from_value(value: Value) -> Result<Self> {
                value
                    .as_int()
                    .and_then(|i| <$t>::try_from(i).ok())
                    .ok_or_else(|| mismatch(stringify!($t), &value))
            }
        }
    )*};
}

macro_rules! unsigned_field_value {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn shape() -> Shape { Shape::Uint(<$t>::BITS) }
            fn to_value(&self) -> Value { Value::Uint(*self as u64) }
            fn from_value(value: Value) -> Result<Self> {
                value
                    .as_uint()
                    .and_then(|u| <$t>::try_from(u).ok())
                    .ok_or_else(|| mismatch(stringify!($t), &value))
            }
        }
    )*};
}

signed_field_value!(i8, i16, i32, i64, isize);
unsigned_field_value!(u8, u16, u32, u64, usize);

impl FieldValue for f64 {
    fn shape() -> Shape { Shape::Float(64) }
    fn to_value(&self) -> Value { Value::Float(*self) }
    fn from_value(value: Value) -> Result<Self> {
        value.as_float().ok_or_else(|| mismatch("FLOAT", &value))
    }
}

impl FieldValue for f32 {
    fn shape() -> Shape { Shape::Float(32) }
    fn to_value(&self) -> Value { Value::Float(*self as f64) }
    fn from_value(value: Value) -> Result<Self> {
        value.as_float().map(|f| f as f32).ok_or_else(|| mismatch("FLOAT", &value))
    }
}

impl FieldValue for chrono::TimeDelta {
    fn shape() -> Shape { Shape::Duration }
    fn to_value(&self) -> Value {
        let saturated = if *self < chrono::TimeDelta::zero() { i64::MIN } else { i64::MAX };
        Value::Duration(self.num_nanoseconds().unwrap_or(saturated))
    }
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Duration(nanos) => Ok(chrono::TimeDelta::nanoseconds(nanos)),
            other => Err(mismatch("DURATION", &other)),
        }
    }
}

impl FieldValue for std::time::Duration {
    fn shape() -> Shape { Shape::Duration }
    fn to_value(&self) -> Value {
        Value::Duration(i64::try_from(self.as_nanos()).unwrap_or(i64::MAX))
    }
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Duration(nanos) if nanos >= 0 => Ok(std::time::Duration::from_nanos(nanos as u64)),
            other => Err(mismatch("non-negative DURATION", &other)),
        }
    }
}

/// Open slot: holds whatever was last stored in it.
impl FieldValue for Value {
    fn shape() -> Shape { Shape::Dynamic }
    fn to_value(&self) -> Value { self.clone() }
    fn from_value(value: Value) -> Result<Self> { Ok(value) }
}

// ============================================================================
// Containers
// ============================================================================

impl<T: FieldValue> FieldValue for Vec<T> {
    fn shape() -> Shape { Shape::seq(T::shape()) }
    fn to_value(&self) -> Value { Value::List(self.iter().map(T::to_value).collect()) }
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("LIST", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn shape() -> Shape { Shape::optional(T::shape()) }
    fn to_value(&self) -> Value {
        self.as_ref().map(T::to_value).unwrap_or(Value::Null)
    }
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

fn map_entries(value: Value) -> Result<Vec<(Value, Value)>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Map(entries) => Ok(entries),
        other => Err(mismatch("MAP", &other)),
    }
}

/// Entries are emitted sorted by their wire key so that marshaling is
/// deterministic.
impl<K, V> FieldValue for HashMap<K, V>
where
    K: FieldValue + Eq + Hash,
    V: FieldValue,
{
    fn shape() -> Shape { Shape::map(K::shape(), V::shape()) }
    fn to_value(&self) -> Value {
        let mut entries: Vec<(Value, Value)> =
            self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect();
        entries.sort_by_cached_key(|(k, _)| k.to_wire_string());
        Value::Map(entries)
    }
    fn from_value(value: Value) -> Result<Self> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| -> Result<(K, V)> { Ok((K::from_value(k)?, V::from_value(v)?)) })
            .collect()
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: FieldValue + Ord,
    V: FieldValue,
{
    fn shape() -> Shape { Shape::map(K::shape(), V::shape()) }
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
    fn from_value(value: Value) -> Result<Self> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| -> Result<(K, V)> { Ok((K::from_value(k)?, V::from_value(v)?)) })
            .collect()
    }
}
