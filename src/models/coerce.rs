//! Loose value coercion for request payloads and console input.
//!
//! Clients send prices and quantities either as JSON numbers or as numeric
//! strings, and `bought` as anything truthy. These helpers accept the same
//! inputs a browser-side form would, and reject everything that does not
//! describe a finite number.

use serde_json::{Number, Value};

/// Largest integer a float can hold without losing precision (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Coerces a JSON value to a finite float.
///
/// Accepts numbers and strings whose trimmed content parses as a finite
/// float. Returns `None` for everything else, including empty strings.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_number_str(s),
        _ => None,
    }
}

/// Coerces a JSON value to an integer.
///
/// The value must pass [`coerce_number`]; the integer is then the leading
/// integer of its decimal text, so `"1e3"` yields 1 and `5.7` yields 5.
/// Floats at or above `1e21` or below `1e-6` in magnitude are written in
/// exponent form and yield their first digit. Returns `None` when no digit
/// leads the text or the result overflows `i64`.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    coerce_number(value)?;
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(leading_int_of_float)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn leading_int_of_float(f: f64) -> Option<i64> {
    let magnitude = f.abs();
    if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
        truncate(f)
    } else {
        parse_leading_int(&format!("{f:e}"))
    }
}

/// Parses a trimmed string as a finite float.
pub fn parse_number_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parses the leading integer of a string.
///
/// Leading whitespace and a single sign are allowed; parsing stops at the
/// first non-digit, so `"12abc"` yields 12. Returns `None` when no digit
/// follows the optional sign or the value overflows `i64`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Returns the truthiness of an optional JSON value.
///
/// `false`, `0`, `""`, `null` and an absent value are falsy; arrays and
/// objects are truthy even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Encodes a float as a JSON number.
///
/// Integral values inside the safe-integer range are emitted without a
/// fractional part, so a price of `5.0` is written as `5`.
pub fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        if let Some(i) = truncate(f) {
            return Value::Number(Number::from(i));
        }
    }
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

/// Renders a JSON value the way string interpolation shows it to users.
///
/// Strings are verbatim, objects print as `[object Object]`, and arrays
/// join their elements with `,` (nulls inside an array print as nothing).
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(f: f64) -> Option<i64> {
    let t = f.trunc();
    // i64::MAX is not representable as f64; the bound below is 2^63.
    if t >= -(i64::MAX as f64) && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}
