//! Like counter codec.
//!
//! The counter is persisted as a decimal string. Arithmetic only ever
//! happens on the parsed integer.

use serde_json::Value;

/// Persisted value of a fresh counter.
pub const ZERO_LIKES: &str = "0";

/// Parse a persisted like counter.
///
/// Reads the leading run of decimal digits after optional whitespace and
/// an optional `+`, so `"12.0"` and `"12 likes"` both read as 12. No
/// leading digits (including a negative counter) is an error.
pub fn parse_likes(raw: &str) -> Result<u64, std::num::ParseIntError> {
    let rest = raw.trim_start();
    let rest = rest.strip_prefix('+').unwrap_or(rest);
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<u64>()
}

/// Serialize a like counter to its persisted form.
pub fn format_likes(likes: u64) -> String {
    likes.to_string()
}

/// Read a like counter from an untyped attribute.
///
/// Accepts the canonical string form as well as a bare JSON number.
pub fn likes_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => parse_likes(s).ok(),
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        _ => None,
    }
}
