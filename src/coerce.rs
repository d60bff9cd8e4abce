//! Best-effort conversions from untyped parameter values.
//!
//! Every function here is total: failure is reported as `None` (or an empty
//! collection) and the extractor decides which fallback to use.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use serde_json::Value as JsonValue;

use crate::value::{Params, Value};

// Larger exponents are refused before any rescaling allocates digits
const MAX_EXPONENT: u64 = 4096;

/// Returns `true` when `text` reads as a decimal number.
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent, surrounded by optional whitespace. Rejects hex, `inf`, `nan` and
/// empty input.
///
/// # Examples
///
/// ```
/// use request_params::coerce::is_numeric;
///
/// assert!(is_numeric("42"));
/// assert!(is_numeric(" -1.5e3 "));
/// assert!(!is_numeric("0x1A"));
/// assert!(!is_numeric("12abc"));
/// ```
pub fn is_numeric(text: &str) -> bool {
    parse_number(text).is_some()
}

/// Parses numeric text as an exact decimal.
///
/// # Examples
///
/// ```
/// use request_params::coerce::parse_number;
///
/// assert_eq!(parse_number(" 1.005 ").map(|n| n.to_string()).as_deref(), Some("1.005"));
/// assert!(parse_number("1,5").is_none());
/// ```
pub fn parse_number(text: &str) -> Option<BigDecimal> {
    let text = text.trim();
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    let n = BigDecimal::from_str(text).ok()?;
    let (_, exponent) = n.as_bigint_and_exponent();
    (exponent.unsigned_abs() <= MAX_EXPONENT).then_some(n)
}

/// Parses integer text, truncating numeric text with a fraction or exponent.
fn int_from_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(i);
    }
    parse_number(trimmed).and_then(|n| {
        n.with_scale_round(0, RoundingMode::Down)
            .to_plain_string()
            .parse::<i64>()
            .ok()
    })
}

fn int_from_float(n: f64) -> Option<i64> {
    // i64::MAX is not exactly representable; 2^63 is the first value out of range
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.is_finite() && n >= -LIMIT && n < LIMIT {
        Some(n.trunc() as i64)
    } else {
        None
    }
}

/// Coerces a value to an integer.
///
/// Strings are trimmed and parsed; numeric text with a fraction is truncated
/// toward zero. Booleans map to `1`/`0`. Collections and null do not coerce.
///
/// # Examples
///
/// ```
/// use request_params::{coerce::to_int, Value};
///
/// assert_eq!(to_int(&Value::from(" 41 ")), Some(41));
/// assert_eq!(to_int(&Value::from("7.9")), Some(7));
/// assert_eq!(to_int(&Value::from("abc")), None);
/// ```
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Decimal(d) => int_from_float(*d),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => int_from_text(s),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Coerces default-literal text to an integer.
pub fn text_to_int(text: &str) -> Option<i64> {
    int_from_text(text)
}

/// Formats a number with exactly two fraction digits.
///
/// Halves round away from zero and zero never carries a sign.
///
/// # Examples
///
/// ```
/// use request_params::coerce::{format_decimal, parse_number};
///
/// let n = parse_number("0.285").unwrap();
/// assert_eq!(format_decimal(&n), "0.29");
/// ```
pub fn format_decimal(n: &BigDecimal) -> String {
    n.with_scale_round(2, RoundingMode::HalfUp).to_plain_string()
}

/// Coerces a value to decimal text with two fraction digits.
///
/// Native floats are read through their shortest decimal form, so `2.675`
/// rounds as written rather than as its binary approximation. Booleans map to
/// `1.00`/`0.00`.
///
/// # Examples
///
/// ```
/// use request_params::{coerce::to_decimal_string, Value};
///
/// assert_eq!(to_decimal_string(&Value::from("19.5")).as_deref(), Some("19.50"));
/// assert_eq!(to_decimal_string(&Value::Int(3)).as_deref(), Some("3.00"));
/// assert_eq!(to_decimal_string(&Value::from("n/a")), None);
/// ```
pub fn to_decimal_string(value: &Value) -> Option<String> {
    match value {
        Value::Int(i) => Some(format_decimal(&BigDecimal::from(*i))),
        Value::Bool(b) => Some(format_decimal(&BigDecimal::from(i64::from(*b)))),
        Value::Decimal(d) if d.is_finite() => text_to_decimal_string(&d.to_string()),
        Value::String(s) => text_to_decimal_string(s),
        Value::Null | Value::Decimal(_) | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Coerces default-literal text to decimal text with two fraction digits.
pub fn text_to_decimal_string(text: &str) -> Option<String> {
    parse_number(text).map(|n| format_decimal(&n))
}

/// Renders a scalar as text; collections and null yield `None`.
///
/// Integers and decimals use their shortest decimal form, booleans the words
/// `true` and `false`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Decimal(d) => Some(d.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Decodes JSON text delimited by `[...]` or `{...}` into a collection.
///
/// The outer delimiters decide the expected shape: an array for brackets, an
/// object for braces. Malformed JSON, or JSON whose shape does not match the
/// delimiters, yields an empty collection of the expected shape. Text with
/// neither delimiter pair yields `None`.
///
/// # Examples
///
/// ```
/// use request_params::{coerce::decode_collection, Value};
///
/// let tags = decode_collection("[1,2,3]").unwrap();
/// assert_eq!(tags, Value::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
///
/// assert_eq!(decode_collection("[oops"), None);
/// assert_eq!(decode_collection("[oops]"), Some(Value::Sequence(Vec::new())));
/// ```
pub fn decode_collection(text: &str) -> Option<Value> {
    if text.starts_with('{') && text.ends_with('}') {
        let map = match serde_json::from_str::<JsonValue>(text) {
            Ok(JsonValue::Object(map)) => map
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect::<Params>(),
            _ => Params::new(),
        };
        return Some(Value::Mapping(map));
    }

    if text.starts_with('[') && text.ends_with(']') {
        let items = match serde_json::from_str::<JsonValue>(text) {
            Ok(JsonValue::Array(items)) => items.into_iter().map(Value::from).collect(),
            _ => Vec::new(),
        };
        return Some(Value::Sequence(items));
    }

    None
}
