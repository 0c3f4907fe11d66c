//! Field values stored in composite index keys
//!
//! Values carry a deterministic total order: Null < Bool < numbers < String.
//! Integers and floats share one numeric order. When an integer and a float
//! hold the same number the integer sorts first. Floats are stored as
//! order-preserving bits, so NaN sorts by its sign outside the finite range.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// A single field value as seen by the index and the range engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Missing or JSON null (sorts first)
    Null,
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value (stored as bits for total ordering)
    Float(u64),
    /// String value
    String(String),
}

/// Result of stepping a value to its immediate neighbour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueStep {
    /// The adjacent value in the requested direction
    Value(FieldValue),
    /// No value exists in that direction (nothing sorts below Null)
    Exhausted,
    /// A neighbour exists but cannot be represented exactly
    Inexact,
}

impl FieldValue {
    /// Create a value from a boolean
    pub fn from_bool(v: bool) -> Self {
        FieldValue::Bool(v)
    }

    /// Create a value from an integer
    pub fn from_int(v: i64) -> Self {
        FieldValue::Int(v)
    }

    /// Create a value from a float
    ///
    /// Uses bit representation for total ordering.
    pub fn from_float(v: f64) -> Self {
        FieldValue::Float(ordered_bits(v))
    }

    /// Create a value from a string
    pub fn from_string(v: impl Into<String>) -> Self {
        FieldValue::String(v.into())
    }

    /// Create a value from a JSON value.
    ///
    /// Arrays and objects are not indexable and yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(FieldValue::Null),
            Value::Bool(b) => Some(FieldValue::from_bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::from_int(i))
                } else {
                    n.as_f64().map(FieldValue::from_float)
                }
            }
            Value::String(s) => Some(FieldValue::from_string(s.as_str())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Converts back to JSON (floats are decoded from their ordered bits).
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(_) => self
                .as_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::String(s) => Value::String(s.clone()),
        }
    }

    /// Decodes a float value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(ordered) => Some(decode_bits(*ordered)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the smallest value strictly greater than `self`.
    ///
    /// Stepping past the last value of a type lands on the first value of the
    /// next type, so the neighbour is exact across the whole total order.
    pub fn successor(&self) -> ValueStep {
        match self {
            FieldValue::Null => ValueStep::Value(FieldValue::Bool(false)),
            FieldValue::Bool(false) => ValueStep::Value(FieldValue::Bool(true)),
            // The lowest number is the most negative NaN.
            FieldValue::Bool(true) => ValueStep::Value(FieldValue::Float(0)),
            FieldValue::Int(i) => numeric_step(
                i.checked_add(1).map(FieldValue::Int),
                float_beside(*i, true),
                true,
            )
            .unwrap_or_else(|| ValueStep::Value(FieldValue::String(String::new()))),
            FieldValue::Float(bits) => numeric_step(
                int_beside(decode_bits(*bits), true).map(FieldValue::Int),
                bits.checked_add(1).map(FieldValue::Float),
                true,
            )
            .unwrap_or_else(|| ValueStep::Value(FieldValue::String(String::new()))),
            // Appending the lowest code point gives the immediate successor.
            FieldValue::String(s) => {
                let mut next = String::with_capacity(s.len() + 1);
                next.push_str(s);
                next.push('\0');
                ValueStep::Value(FieldValue::String(next))
            }
        }
    }

    /// Returns the largest value strictly smaller than `self`.
    ///
    /// Strings not ending in NUL have no representable predecessor.
    pub fn predecessor(&self) -> ValueStep {
        match self {
            FieldValue::Null => ValueStep::Exhausted,
            FieldValue::Bool(false) => ValueStep::Value(FieldValue::Null),
            FieldValue::Bool(true) => ValueStep::Value(FieldValue::Bool(false)),
            FieldValue::Int(i) => numeric_step(
                i.checked_sub(1).map(FieldValue::Int),
                float_beside(*i, false),
                false,
            )
            .unwrap_or(ValueStep::Value(FieldValue::Bool(true))),
            FieldValue::Float(bits) => numeric_step(
                int_beside(decode_bits(*bits), false).map(FieldValue::Int),
                bits.checked_sub(1).map(FieldValue::Float),
                false,
            )
            .unwrap_or(ValueStep::Value(FieldValue::Bool(true))),
            FieldValue::String(s) => {
                if s.is_empty() {
                    ValueStep::Value(FieldValue::Float(u64::MAX))
                } else if let Some(stripped) = s.strip_suffix('\0') {
                    ValueStep::Value(FieldValue::String(stripped.to_string()))
                } else {
                    ValueStep::Inexact
                }
            }
        }
    }

    /// Steps toward larger values when `upward`, smaller values otherwise.
    pub fn step(&self, upward: bool) -> ValueStep {
        if upward {
            self.successor()
        } else {
            self.predecessor()
        }
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.cmp(b),
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Int(i), FieldValue::Float(f)) => {
                cmp_int_float(*i, decode_bits(*f)).then(Ordering::Less)
            }
            (FieldValue::Float(f), FieldValue::Int(i)) => cmp_int_float(*i, decode_bits(*f))
                .reverse()
                .then(Ordering::Greater),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FieldValue {
    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Int(_) | FieldValue::Float(_) => 2,
            FieldValue::String(_) => 3,
        }
    }
}

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn ordered_bits(v: f64) -> u64 {
    let bits = v.to_bits();
    if (bits >> 63) == 1 {
        !bits
    } else {
        bits ^ (1 << 63)
    }
}

fn decode_bits(ordered: u64) -> f64 {
    let bits = if (ordered >> 63) == 1 {
        ordered ^ (1 << 63)
    } else {
        !ordered
    };
    f64::from_bits(bits)
}

/// Exact numeric comparison of an integer against a float.
///
/// NaN sorts by its sign: below every integer when negative, above when positive.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        ord => ord,
    }
}

/// Nearest integer strictly above (or below) a float in the value order.
fn int_beside(f: f64, upward: bool) -> Option<i64> {
    if f.is_nan() {
        return match (f.is_sign_negative(), upward) {
            (true, true) => Some(i64::MIN),
            (false, false) => Some(i64::MAX),
            _ => None,
        };
    }
    if f >= TWO_POW_63 {
        return if upward { None } else { Some(i64::MAX) };
    }
    if f < -TWO_POW_63 {
        return if upward { Some(i64::MIN) } else { None };
    }
    // An integer equal to `f` sorts below it.
    let floor = f.floor() as i64;
    if upward {
        floor.checked_add(1)
    } else {
        Some(floor)
    }
}

/// Nearest float strictly above (or below) an integer in the value order.
fn float_beside(i: i64, upward: bool) -> Option<FieldValue> {
    let target = FieldValue::Int(i);
    let mut bits = ordered_bits(i as f64);
    if upward {
        while FieldValue::Float(bits) < target {
            bits = bits.checked_add(1)?;
        }
        while bits > 0 && FieldValue::Float(bits - 1) > target {
            bits -= 1;
        }
    } else {
        while FieldValue::Float(bits) > target {
            bits = bits.checked_sub(1)?;
        }
        while bits < u64::MAX && FieldValue::Float(bits + 1) < target {
            bits += 1;
        }
    }
    Some(FieldValue::Float(bits))
}

/// Picks the closer of an integer and a float neighbour.
fn numeric_step(
    int: Option<FieldValue>,
    float: Option<FieldValue>,
    upward: bool,
) -> Option<ValueStep> {
    let next = match (int, float) {
        (Some(a), Some(b)) => {
            if (a < b) == upward {
                a
            } else {
                b
            }
        }
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return None,
    };
    Some(ValueStep::Value(next))
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(_) => write!(f, "{}", self.as_f64().unwrap_or(f64::NAN)),
            FieldValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::from_float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}
