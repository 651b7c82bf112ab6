//! Value enum for dynamic row fields

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A dynamic value stored in a [`Row`](super::Row) field.
///
/// Values deserialize straight from JSON scalars: `null`, booleans, integers
/// that fit an `i64`, other numbers as `f64`, and strings. Arrays and objects
/// have no variant of their own; [`From<serde_json::Value>`] keeps them as
/// their JSON text.
///
/// # Ordering
///
/// [`Value::sort_cmp`] is a total order, so it is safe to hand to a stable
/// sort. Values of different kinds order by kind
/// (`Null < Bool < number < Text`); integers and floats compare by numeric
/// value; `NaN` sorts after every other number; text compares by code point.
///
/// # Example
///
/// ```
/// use datatable::Value;
///
/// let amount = Value::from(5);
/// let name = Value::from("Bob");
/// assert!(amount.sort_cmp(&name).is_lt());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Values a cell renders as empty: null, `false`, zero, `NaN` and the
    /// empty string.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(n) => *n == 0,
            Value::Float(f) => *f == 0.0 || f.is_nan(),
            Value::Text(s) => s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of `Int` and `Float` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as text. Null is the empty string.
    pub fn display_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Text(s) => s.clone(),
        }
    }

    /// Text a search keyword is matched against. Null never matches.
    pub fn search_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.display_text()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }

    /// Total order used for sorting.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => cmp_float(*a, *b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f == 0.0 {
        // Both zeros print as "0".
        "0".to_string()
    } else {
        f.to_string()
    }
}

fn cmp_float(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer with a float.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63; every finite float at or beyond it is out of i64 range.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() || f >= BOUND {
        return Ordering::Less;
    }
    if f < -BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => {
            let frac = f - whole;
            if frac > 0.0 {
                Ordering::Less
            } else if frac < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        other => other,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Text(nested.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_values() {
        for value in [
            Value::Null,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::Float(-0.0),
            Value::Float(f64::NAN),
            Value::from(""),
        ] {
            assert!(value.is_falsy(), "{value:?} should be falsy");
        }
        assert!(!Value::from("0").is_falsy());
        assert!(!Value::Int(-1).is_falsy());
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Value::Float(5.0).display_text(), "5");
        assert_eq!(Value::Float(2.5).display_text(), "2.5");
        assert_eq!(Value::Float(-0.0).display_text(), "0");
        assert_eq!(Value::Float(f64::NEG_INFINITY).display_text(), "-Infinity");
        assert_eq!(Value::Bool(true).display_text(), "true");
        assert_eq!(Value::Null.display_text(), "");
    }

    #[test]
    fn test_kind_order() {
        let ordered = [
            Value::Null,
            Value::Bool(false),
            Value::Bool(true),
            Value::Int(-3),
            Value::Float(2.5),
            Value::Int(3),
            Value::Float(f64::NAN),
            Value::from("Al"),
            Value::from("Bob"),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(pair[0].sort_cmp(&pair[1]), Ordering::Less, "{pair:?}");
            assert_eq!(pair[1].sort_cmp(&pair[0]), Ordering::Greater, "{pair:?}");
        }
    }

    #[test]
    fn test_int_float_exact() {
        assert_eq!(cmp_int_float(3, 3.0), Ordering::Equal);
        assert_eq!(cmp_int_float(3, 3.5), Ordering::Less);
        assert_eq!(cmp_int_float(-3, -3.5), Ordering::Greater);
        assert_eq!(cmp_int_float(i64::MAX, 9_223_372_036_854_775_808.0), Ordering::Less);
        assert_eq!(cmp_int_float(i64::MIN, -9_223_372_036_854_775_808.0), Ordering::Equal);
        assert_eq!(cmp_int_float(i64::MIN, f64::NEG_INFINITY), Ordering::Greater);
        assert_eq!(cmp_int_float(0, -0.0), Ordering::Equal);
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(cmp_float(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(cmp_float(0.0, -0.0), Ordering::Equal);
    }

    #[test]
    fn test_json_conversion() {
        let value: Value = serde_json::json!(5).into();
        assert_eq!(value, Value::Int(5));
        let value: Value = serde_json::json!(5.5).into();
        assert_eq!(value, Value::Float(5.5));
        let value: Value = serde_json::json!([1, 2]).into();
        assert_eq!(value, Value::from("[1,2]"));
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 7, 7.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(7),
                Value::Float(7.5),
                Value::from("x"),
            ]
        );
    }
}
