use serde_json::Value;

/// Identifier assigned to records by the external store.
pub type RecordId = i64;

/// Identifies the household member owning transactions and category settings.
pub type UserId = i64;

/// Replaces NaN and infinite values with zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Coerces a loosely-typed JSON amount into a finite number.
///
/// Numbers pass through, numeric strings are parsed after trimming, and anything
/// else (null, booleans, garbage strings, arrays) becomes `0`.
pub fn coerce_amount(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    finite_or_zero(raw)
}

/// Rounds to one decimal place, the precision used for displayed percentages.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
