//! Type coercion: converts a wire string into a value of a target shape.

use std::num::IntErrorKind;

use crate::model::{Shape, Value};
use crate::{Error, Result};

/// Coerce `raw` into `slot` according to `shape`.
///
/// Scalars replace the slot. A sequence gains exactly one element per call
/// and a mapping one entry (`key:value`, split on the first `:`, see
/// [`coerce_entry`] for entries already split), so callers
/// holding several raw occurrences of one key call this once per occurrence.
/// Optional slots are allocated before recursing; an empty dynamic slot is
/// left alone.
pub fn coerce(raw: &str, shape: &Shape, slot: &mut Value) -> Result<()> {
    match shape {
        Shape::Duration => *slot = Value::Duration(parse_duration(raw)?),
        Shape::Text => *slot = Value::String(raw.to_owned()),
        Shape::Bool => *slot = Value::Bool(parse_bool(raw)?),
        Shape::Int(bits) => *slot = Value::Int(parse_int(raw, *bits)?),
        Shape::Uint(bits) => *slot = Value::Uint(parse_uint(raw, *bits)?),
        Shape::Float(bits) => *slot = Value::Float(parse_float(raw, *bits)?),
        Shape::Seq(elem) => {
            let mut item = elem.zero();
            coerce(raw, elem, &mut item)?;
            match slot {
                Value::List(items) => items.push(item),
                _ => *slot = Value::List(vec![item]),
            }
        }
        Shape::Map(_, _) => {
            let (raw_key, raw_value) = raw.split_once(':').unwrap_or((raw, ""));
            coerce_entry(raw_key, raw_value, shape, slot)?;
        }
        Shape::Optional(inner) => {
            if slot.is_null() {
                *slot = inner.zero();
            }
            coerce(raw, inner, slot)?;
        }
        Shape::Dynamic => {
            if let Some(current) = slot.shape() {
                coerce(raw, &current, slot)?;
            }
        }
        Shape::Opaque(name) => return Err(Error::UnsupportedShape(name.clone())),
    }
    Ok(())
}

/// Coerce one already split mapping entry into `slot`, replacing the value
/// of an equal key.
///
/// Shapes that are not mappings receive the entry joined as `key:value`.
pub fn coerce_entry(raw_key: &str, raw_value: &str, shape: &Shape, slot: &mut Value) -> Result<()> {
    match shape {
        Shape::Map(key_shape, value_shape) => {
            let mut key = key_shape.zero();
            coerce(raw_key, key_shape, &mut key)?;
            let mut value = value_shape.zero();
            coerce(raw_value, value_shape, &mut value)?;

            if !matches!(slot, Value::Map(_)) {
                *slot = Value::Map(Vec::new());
            }
            if let Value::Map(entries) = slot {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
            }
            Ok(())
        }
        Shape::Optional(inner) => {
            if slot.is_null() {
                *slot = inner.zero();
            }
            coerce_entry(raw_key, raw_value, inner, slot)
        }
        Shape::Dynamic => match slot.shape() {
            Some(current) => coerce_entry(raw_key, raw_value, &current, slot),
            None => Ok(()),
        },
        _ => coerce(&format!("{raw_key}:{raw_value}"), shape, slot),
    }
}

// ============================================================================
// Scalars
// ============================================================================

/// Empty means present, hence `true`.
pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw {
        "" => Ok(true),
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(Error::parse(raw, &Shape::Bool, "not a boolean")),
    }
}

pub fn parse_int(raw: &str, bits: u32) -> Result<i64> {
    let target = Shape::Int(bits);
    let parsed: i64 = raw.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Error::range(raw, &target),
        _ => Error::parse(raw, &target, e.to_string()),
    })?;
    let (min, max) = match bits {
        0 | 64.. => (i64::MIN, i64::MAX),
        bits => (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1),
    };
    if parsed < min || parsed > max {
        return Err(Error::range(raw, &target));
    }
    Ok(parsed)
}

pub fn parse_uint(raw: &str, bits: u32) -> Result<u64> {
    let target = Shape::Uint(bits);
    let parsed: u64 = raw.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => Error::range(raw, &target),
        _ => Error::parse(raw, &target, e.to_string()),
    })?;
    let max = match bits {
        0 | 64.. => u64::MAX,
        bits => (1u64 << bits) - 1,
    };
    if parsed > max {
        return Err(Error::range(raw, &target));
    }
    Ok(parsed)
}

/// Finite input that overflows the width is a range error; spelled-out
/// infinities are accepted.
pub fn parse_float(raw: &str, bits: u32) -> Result<f64> {
    let target = Shape::Float(bits);
    let parsed = if bits == 32 {
        raw.parse::<f32>().map(f64::from)
    } else {
        raw.parse::<f64>()
    };
    let value = parsed.map_err(|e| Error::parse(raw, &target, e.to_string()))?;
    if value.is_infinite() && !raw.to_ascii_lowercase().contains("inf") {
        return Err(Error::range(raw, &target));
    }
    Ok(value)
}

// ============================================================================
// Durations
// ============================================================================

const NANOS_PER_SECOND: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3_600 * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Parse a compound duration such as `1h30m`, `-1.5h` or `300ms` into
/// signed nanoseconds.
///
/// Grammar: an optional sign, then either `0` or one or more decimal
/// magnitudes each followed by a unit (`ns`, `us`, `µs`, `ms`, `s`, `m`, `h`).
/// Fraction digits beyond nanosecond precision are truncated.
pub fn parse_duration(raw: &str) -> Result<i64> {
    let target = Shape::Duration;
    let malformed = |why: String| Error::parse(raw, &target, why);
    let overflow = || Error::range(raw, &target);

    let (negative, mut rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(malformed("empty duration".into()));
    }

    let limit = i64::MAX as u128 + 1;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after) = rest.split_at(int_len);
        let (frac_part, after) = match after.strip_prefix('.') {
            Some(tail) => tail.split_at(tail.bytes().take_while(u8::is_ascii_digit).count()),
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed(format!("expected a number at {rest:?}")));
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_len);
        let scale = match unit {
            "" => return Err(malformed("missing unit".into())),
            unit => unit_nanos(unit).ok_or_else(|| malformed(format!("unknown unit {unit:?}")))?,
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut amount = whole.checked_mul(scale).ok_or_else(overflow)?;
        if amount > limit {
            return Err(overflow());
        }
        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| malformed("bad fraction".into()))?;
            let fraction = numerator * scale / 10u128.pow(digits.len() as u32);
            amount = amount.checked_add(fraction).ok_or_else(overflow)?;
        }

        total = total.checked_add(amount).ok_or_else(overflow)?;
        if total > limit {
            return Err(overflow());
        }
        rest = tail;
    }

    if negative {
        Ok(if total == limit { i64::MIN } else { -(total as i64) })
    } else {
        i64::try_from(total).map_err(|_| overflow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerced(raw: &str, shape: Shape) -> Result<Value> {
        let mut slot = shape.zero();
        coerce(raw, &shape, &mut slot)?;
        Ok(slot)
    }

    #[test]
    fn test_text_verbatim() {
        assert_eq!(coerced(" a:b ", Shape::Text).unwrap(), Value::from(" a:b "));
    }

    #[test]
    fn test_bool_presence_flag() {
        assert_eq!(coerced("", Shape::Bool).unwrap(), Value::Bool(true));
        assert_eq!(coerced("false", Shape::Bool).unwrap(), Value::Bool(false));
        assert_eq!(coerced("T", Shape::Bool).unwrap(), Value::Bool(true));
        assert!(matches!(coerced("yes", Shape::Bool), Err(Error::ParseError { .. })));
    }

    #[test]
    fn test_integer_range() {
        assert!(matches!(coerced("99999", Shape::Int(8)), Err(Error::RangeError { .. })));
        assert!(matches!(coerced("-129", Shape::Int(8)), Err(Error::RangeError { .. })));
        assert_eq!(coerced("-128", Shape::Int(8)).unwrap(), Value::Int(-128));
        assert!(matches!(
            coerced("99999999999999999999", Shape::Int(64)),
            Err(Error::RangeError { .. })
        ));
        assert!(matches!(coerced("12a", Shape::Int(32)), Err(Error::ParseError { .. })));
        assert!(matches!(coerced("", Shape::Int(32)), Err(Error::ParseError { .. })));
    }

    #[test]
    fn test_unsigned() {
        assert_eq!(coerced("255", Shape::Uint(8)).unwrap(), Value::Uint(255));
        assert!(matches!(coerced("256", Shape::Uint(8)), Err(Error::RangeError { .. })));
        assert!(matches!(coerced("-1", Shape::Uint(16)), Err(Error::ParseError { .. })));
        assert_eq!(coerced("18446744073709551615", Shape::Uint(64)).unwrap(), Value::Uint(u64::MAX));
    }

    #[test]
    fn test_float() {
        assert_eq!(coerced("2.5", Shape::Float(64)).unwrap(), Value::Float(2.5));
        assert_eq!(coerced("-inf", Shape::Float(64)).unwrap(), Value::Float(f64::NEG_INFINITY));
        assert!(matches!(coerced("1e40", Shape::Float(32)), Err(Error::RangeError { .. })));
        assert!(matches!(coerced("two", Shape::Float(64)), Err(Error::ParseError { .. })));
    }

    #[test]
    fn test_duration_grammar() {
        assert_eq!(parse_duration("1h30m").unwrap(), 5_400 * 1_000_000_000);
        assert_eq!(parse_duration("300ms").unwrap(), 300_000_000);
        assert_eq!(parse_duration("-1.5h").unwrap(), -5_400 * 1_000_000_000);
        assert_eq!(parse_duration("1.5µs").unwrap(), 1_500);
        assert_eq!(parse_duration("2us3ns").unwrap(), 2_003);
        assert_eq!(parse_duration(".5s").unwrap(), 500_000_000);
        assert_eq!(parse_duration("0").unwrap(), 0);
        assert_eq!(parse_duration("0.0000003s").unwrap(), 300);
    }

    #[test]
    fn test_duration_malformed() {
        for bad in ["", "-", "1", "h", "1x", "1.h.", "1h 30m", "++1s"] {
            assert!(
                matches!(parse_duration(bad), Err(Error::ParseError { .. })),
                "{bad:?} should not parse"
            );
        }
        assert!(matches!(parse_duration("9999999999h"), Err(Error::RangeError { .. })));
        // Whole part just below the u128 ceiling once scaled, fraction on top.
        assert!(matches!(
            parse_duration("94522879700260684295381835.999999999999999999h"),
            Err(Error::RangeError { .. })
        ));
        assert!(matches!(parse_duration("2562047h47m16.854775808s"), Err(Error::RangeError { .. })));
        assert_eq!(parse_duration("-2562047h47m16.854775808s").unwrap(), i64::MIN);
    }

    #[test]
    fn test_entry_keeps_colons_in_key() {
        let shape = Shape::map(Shape::Text, Shape::Text);
        let mut slot = Value::Null;
        coerce_entry("a:b", "c", &shape, &mut slot).unwrap();
        coerce_entry("a:b", "d:e", &shape, &mut slot).unwrap();
        assert_eq!(slot, Value::Map(vec![(Value::from("a:b"), Value::from("d:e"))]));

        let optional = Shape::optional(Shape::map(Shape::Text, Shape::Int(8)));
        let mut slot = Value::Null;
        coerce_entry("x:y", "7", &optional, &mut slot).unwrap();
        assert_eq!(slot.map_get(&Value::from("x:y")), Some(&Value::Int(7)));

        let mut seq = Value::Null;
        coerce_entry("k", "v", &Shape::seq(Shape::Text), &mut seq).unwrap();
        assert_eq!(seq, Value::List(vec![Value::from("k:v")]));
    }

    #[test]
    fn test_sequence_appends_one_element() {
        let shape = Shape::seq(Shape::Int(32));
        let mut slot = Value::Null;
        coerce("1", &shape, &mut slot).unwrap();
        coerce("2", &shape, &mut slot).unwrap();
        assert_eq!(slot, Value::List(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_map_accumulates_and_overwrites() {
        let shape = Shape::map(Shape::Text, Shape::Text);
        let mut slot = Value::Null;
        coerce("a:1", &shape, &mut slot).unwrap();
        coerce("b:2", &shape, &mut slot).unwrap();
        coerce("a:3:4", &shape, &mut slot).unwrap();
        coerce("c", &shape, &mut slot).unwrap();
        assert_eq!(slot.map_get(&Value::from("a")), Some(&Value::from("3:4")));
        assert_eq!(slot.map_get(&Value::from("b")), Some(&Value::from("2")));
        assert_eq!(slot.map_get(&Value::from("c")), Some(&Value::from("")));
    }

    #[test]
    fn test_map_key_coercion_error_propagates() {
        let shape = Shape::map(Shape::Int(8), Shape::Text);
        let mut slot = Value::Null;
        assert!(matches!(coerce("1000:x", &shape, &mut slot), Err(Error::RangeError { .. })));
        assert_eq!(slot, Value::Null);
    }

    #[test]
    fn test_optional_allocates() {
        assert_eq!(coerced("7", Shape::optional(Shape::Uint(8))).unwrap(), Value::Uint(7));
    }

    #[test]
    fn test_dynamic() {
        let mut empty = Value::Null;
        coerce("42", &Shape::Dynamic, &mut empty).unwrap();
        assert_eq!(empty, Value::Null);

        let mut held = Value::Int(0);
        coerce("42", &Shape::Dynamic, &mut held).unwrap();
        assert_eq!(held, Value::Int(42));
    }

    #[test]
    fn test_opaque_is_unsupported() {
        let err = coerced("x", Shape::Opaque("Socket".into())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape(name) if name == "Socket"));
    }
}
