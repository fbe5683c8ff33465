//! Loosely-typed numeric input.
//!
//! Clients send numbers as JSON numbers or as strings (`"50"`, `"50 INR"`).
//! [`LooseInt`] accepts any JSON value and reads it with integer-prefix
//! semantics: optional leading whitespace, an optional sign, then digits.
//! Fractions are truncated toward zero.
//!
//! Callers pick the fallback explicitly: [`LooseInt::or_zero`] for the
//! permissive fields (commission, stars) and [`LooseInt::to_int`] where an
//! unparseable value must be rejected (amounts).

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseInt {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LooseInt {
    /// Integer value, or `None` when nothing numeric can be read.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            LooseInt::Int(v) => Some(*v),
            LooseInt::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            LooseInt::Float(_) => None,
            LooseInt::Text(s) => parse_int_prefix(s),
            LooseInt::Other(_) => None,
        }
    }

    /// Permissive read: absent or non-numeric input becomes 0.
    pub fn or_zero(value: Option<&LooseInt>) -> i64 {
        value.and_then(LooseInt::to_int).unwrap_or(0)
    }
}

impl From<i64> for LooseInt {
    fn from(value: i64) -> Self {
        LooseInt::Int(value)
    }
}

impl From<&str> for LooseInt {
    fn from(value: &str) -> Self {
        LooseInt::Text(value.to_string())
    }
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
