//! Cell values held by blocks.
//!
//! Ingestion does not know column types up front. Each raw field is parsed as a
//! finite `f32` when possible and otherwise kept verbatim as text, so a single
//! column may hold both kinds when the source is dirty.

use std::fmt;
use std::io::Write;

use crate::constants::{FLOAT_BYTES, VARCHAR_BYTES};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f32),
    Text(String),
}

impl Value {
    /// Parse a raw field. Surrounding whitespace is ignored.
    ///
    /// Spellings of non-finite floats (`NaN`, `inf`) stay text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f32>() {
            Ok(v) if v.is_finite() => Value::Float(v),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    /// Fixed accounting cost of this value inside a block.
    #[inline]
    pub fn byte_size(&self) -> usize {
        match self {
            Value::Float(_) => FLOAT_BYTES,
            Value::Text(_) => VARCHAR_BYTES,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(widen_f32(*v)),
            Value::Text(_) => None,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Equality against a query literal.
    ///
    /// Numeric on both sides compares numerically, so `"85"` matches a stored
    /// `85.0`. Anything else compares the rendered text exactly.
    pub fn matches_literal(&self, literal: &str) -> bool {
        match (self, Value::parse(literal)) {
            (Value::Float(a), Value::Float(b)) => *a == b,
            (Value::Text(a), _) => a == literal,
            (Value::Float(_), Value::Text(_)) => self.to_string() == literal,
        }
    }
}

/// Widen a stored `f32` through its shortest round-trip decimal, so a cell
/// read as `80.1` is `80.1` in double precision rather than `80.09999847`.
///
/// Monotone: `a <= b` implies `widen_f32(a) <= widen_f32(b)`.
pub fn widen_f32(v: f32) -> f64 {
    // Longest `f32` rendering is the smallest negative subnormal, 48 bytes.
    let mut buf = [0u8; 64];
    let mut cursor: &mut [u8] = &mut buf;
    if write!(cursor, "{v}").is_err() {
        return f64::from(v);
    }
    let written = 64 - cursor.len();
    std::str::from_utf8(&buf[..written])
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .unwrap_or_else(|| f64::from(v))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}
