//! Type coercer: converts one raw string into a primitive field.
//!
//! Empty input is read as the zero literal of the target (`0`, `false`,
//! `0.0`) instead of being rejected. Optional primitives are allocated on
//! first set and coerced through their pointee.

use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use thiserror::Error;

use crate::error::ConversionError;
use crate::field::{Category, Field, Scalar, View};

/// Failure of the coercer.
#[derive(Debug, Error)]
pub enum CoerceError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("unsupported type: {0}")]
    Unsupported(Category),
}

/// Coerce `raw` into `field`.
pub fn coerce(field: &mut dyn Field, raw: &str) -> Result<(), CoerceError> {
    let category = field.category();
    match field.view() {
        View::Scalar(scalar) => Ok(set_scalar(scalar, raw)?),
        View::Optional(optional) => coerce(optional.ensure_present(), raw),
        _ => Err(CoerceError::Unsupported(category)),
    }
}

fn set_scalar(scalar: Scalar<'_>, raw: &str) -> Result<(), ConversionError> {
    match scalar {
        Scalar::I8(v) => *v = parse_int(raw)?,
        Scalar::I16(v) => *v = parse_int(raw)?,
        Scalar::I32(v) => *v = parse_int(raw)?,
        Scalar::I64(v) => *v = parse_int(raw)?,
        Scalar::Isize(v) => *v = parse_int(raw)?,
        Scalar::U8(v) => *v = parse_uint(raw)?,
        Scalar::U16(v) => *v = parse_uint(raw)?,
        Scalar::U32(v) => *v = parse_uint(raw)?,
        Scalar::U64(v) => *v = parse_uint(raw)?,
        Scalar::Usize(v) => *v = parse_uint(raw)?,
        Scalar::F32(v) => *v = parse_float(raw, f32::is_finite)?,
        Scalar::F64(v) => *v = parse_float(raw, f64::is_finite)?,
        Scalar::Bool(v) => *v = parse_bool(if raw.is_empty() { "false" } else { raw })?,
        Scalar::Str(v) => {
            v.clear();
            v.push_str(raw);
        }
    }
    Ok(())
}

fn parse_int<T>(raw: &str) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseIntError>,
{
    let raw = if raw.is_empty() { "0" } else { raw };
    raw.parse().map_err(|source| ConversionError::Int {
        value: raw.to_string(),
        source,
    })
}

// Unsigned values take no sign at all.
fn parse_uint<T>(raw: &str) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseIntError>,
{
    if raw.starts_with('+') {
        return Err(ConversionError::UnsignedSign {
            value: raw.to_string(),
        });
    }
    parse_int(raw)
}

fn parse_float<T>(raw: &str, is_finite: fn(T) -> bool) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseFloatError> + Copy,
{
    let raw = if raw.is_empty() { "0.0" } else { raw };
    let value: T = raw.parse().map_err(|source| ConversionError::Float {
        value: raw.to_string(),
        source,
    })?;

    if !is_finite(value) && !spells_non_finite(raw) {
        return Err(ConversionError::FloatRange {
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// True when the literal itself names infinity or NaN.
fn spells_non_finite(raw: &str) -> bool {
    let unsigned = raw.trim_start_matches(['+', '-']).to_ascii_lowercase();
    matches!(unsigned.as_str(), "inf" | "infinity" | "nan")
}

/// Parse a boolean.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<bool, ConversionError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConversionError::Bool {
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_integers_by_width() {
        let mut small = 0i8;
        coerce(&mut small, "-128").unwrap();
        assert_eq!(small, -128);

        let mut wide = 0u64;
        coerce(&mut wide, "18446744073709551615").unwrap();
        assert_eq!(wide, u64::MAX);

        let mut signed = 0isize;
        coerce(&mut signed, "+42").unwrap();
        assert_eq!(signed, 42);
    }

    #[test]
    fn test_integer_out_of_range() {
        let mut small = 3u8;
        let err = coerce(&mut small, "256").unwrap_err();
        assert!(matches!(
            err,
            CoerceError::Conversion(ConversionError::Int { ref value, .. }) if value == "256"
        ));
        assert_eq!(small, 3);

        let mut unsigned = 0u32;
        assert!(coerce(&mut unsigned, "-1").is_err());
    }

    #[test]
    fn test_unsigned_rejects_plus_sign() {
        let mut unsigned = 7u32;
        let err = coerce(&mut unsigned, "+5").unwrap_err();
        assert!(matches!(
            err,
            CoerceError::Conversion(ConversionError::UnsignedSign { ref value }) if value == "+5"
        ));
        assert_eq!(unsigned, 7);

        let mut signed = 0i32;
        coerce(&mut signed, "+5").unwrap();
        assert_eq!(signed, 5);
    }

    #[test]
    fn test_float_out_of_range() {
        let mut single = 1.0f32;
        let err = coerce(&mut single, "1e39").unwrap_err();
        assert!(matches!(
            err,
            CoerceError::Conversion(ConversionError::FloatRange { ref value }) if value == "1e39"
        ));
        assert_eq!(single, 1.0);

        let mut double = 1.0f64;
        assert!(matches!(
            coerce(&mut double, "1e400"),
            Err(CoerceError::Conversion(ConversionError::FloatRange { .. }))
        ));
        assert_eq!(double, 1.0);

        // 1e39 fits in a double
        coerce(&mut double, "1e39").unwrap();
        assert_eq!(double, 1e39);
    }

    #[test]
    fn test_spelled_infinity_and_nan() {
        let mut double = 0f64;
        coerce(&mut double, "-Infinity").unwrap();
        assert_eq!(double, f64::NEG_INFINITY);

        let mut single = 0f32;
        coerce(&mut single, "NaN").unwrap();
        assert!(single.is_nan());
    }

    #[test]
    fn test_empty_is_zero() {
        let mut int = 9i32;
        coerce(&mut int, "").unwrap();
        assert_eq!(int, 0);

        let mut float = 1.5f64;
        coerce(&mut float, "").unwrap();
        assert_eq!(float, 0.0);

        let mut flag = true;
        coerce(&mut flag, "").unwrap();
        assert!(!flag);

        let mut text = "old".to_string();
        coerce(&mut text, "").unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_bool_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool(raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool(raw).unwrap(), "{raw}");
        }
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("tRUE").is_err());
    }

    #[test]
    fn test_floats() {
        let mut single = 0f32;
        coerce(&mut single, "2.5").unwrap();
        assert_eq!(single, 2.5);

        let mut double = 0f64;
        coerce(&mut double, "1e3").unwrap();
        assert_eq!(double, 1000.0);

        assert!(coerce(&mut double, "1,5").is_err());
    }

    #[test]
    fn test_optional_is_allocated() {
        let mut count: Option<u16> = None;
        coerce(&mut count, "12").unwrap();
        assert_eq!(count, Some(12));

        let mut nested: Option<Option<bool>> = None;
        coerce(&mut nested, "T").unwrap();
        assert_eq!(nested, Some(Some(true)));
    }

    #[test]
    fn test_unsupported_categories() {
        let mut map: HashMap<String, String> = HashMap::new();
        assert!(matches!(
            coerce(&mut map, "a"),
            Err(CoerceError::Unsupported(Category::Map))
        ));

        let mut list: Vec<i32> = Vec::new();
        assert!(matches!(
            coerce(&mut list, "1"),
            Err(CoerceError::Unsupported(Category::Sequence))
        ));

        let mut pointer: Option<[u8; 2]> = None;
        assert!(matches!(
            coerce(&mut pointer, "1"),
            Err(CoerceError::Unsupported(Category::Array))
        ));
        assert!(pointer.is_some());
    }
}
