//! The verification code and the loose comparison used to check candidates against it.
//!
//! Candidates arrive as arbitrary JSON. A candidate matches when it coerces to the
//! same number as the code, following the coercion rules of a loose (`==`) equality
//! between a number and an arbitrary value:
//!
//! * numbers compare numerically,
//! * strings are trimmed and parsed as a decimal, `0x`/`0o`/`0b` literal or `Infinity`
//!   (the empty string is `0`),
//! * booleans are `1` and `0`,
//! * arrays are joined with `,` and then treated as a string,
//! * `null` and objects never match.
//!
//! So `"231524"`, `231524`, `" 231524 "`, `"231524.0"` and `[231524]` all match the
//! code `231524`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::ToSchema;

/// The numeric one-time passcode held by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct VerificationCode(u64);

impl VerificationCode {
    /// Create a new verification code from its numeric value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The numeric value of this code.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Whether `candidate` loosely equals this code. See the module docs for the rules.
    pub fn loosely_matches(&self, candidate: &Value) -> bool {
        match coerce_to_number(candidate) {
            Some(number) => number == self.0 as f64,
            None => false,
        }
    }

    /// Shorthand for [`Self::loosely_matches`] with a string candidate.
    pub fn loosely_matches_str(&self, candidate: &str) -> bool {
        string_to_number(candidate).map_or(false, |number| number == self.0 as f64)
    }
}

impl From<u64> for VerificationCode {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coerce a JSON value to a number. `None` stands for both "not comparable" and NaN.
fn coerce_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => string_to_number(s),
        Value::Array(_) => string_to_number(&to_primitive_string(value)),
    }
}

fn to_primitive_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_primitive_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Whitespace and line terminators as numeric string conversion trims them:
/// tab, vertical tab, form feed, BOM, the `Zs` space separators and
/// LF, CR, LS and PS. Notably not U+0085.
fn is_numeric_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn string_to_number(s: &str) -> Option<f64> {
    let s = s.trim_matches(is_numeric_whitespace);

    if s.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u128::from_str_radix(digits, radix)
                .ok()
                .filter(|_| !digits.starts_with(['+', '-']))
                .map(|n| n as f64);
        }
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // `f64::from_str` also takes "inf" and "nan", which are not numeric literals here.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    s.parse::<f64>().ok()
}
