//! Typed values produced by coercion.
//!
//! A [`Value`] is what ends up in a [`ParseResult`](crate::ParseResult): the
//! coerced form of a raw token, a default, or an accumulated sequence of
//! either. Values serialize untagged so results print as plain JSON/YAML.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Display format used for dates in messages and JSON conversion.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A coerced option or argument value.
///
/// # Examples
///
/// ```
/// use argspec_core::Value;
///
/// let v = Value::from(vec![1, 2, 3]);
/// assert_eq!(v.as_list().map(|l| l.len()), Some(3));
/// assert_eq!(Value::from("x").as_str(), Some("x"));
/// assert_eq!(Value::Int(4).as_float(), Some(4.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag value.
    Bool(bool),
    /// Integral number (coerced from text with no fractional part).
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free-form or enumerated text.
    String(String),
    /// Calendar date and time.
    Date(NaiveDateTime),
    /// Accumulated `key=value` pairs.
    Map(BTreeMap<String, String>),
    /// Ordered sequence from a list or repeatable option/argument.
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the numeric value, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness as seen by cross-field validators: `false`, zero, empty
    /// text and empty collections are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Date(_) => true,
            Self::Map(_) | Self::List(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format(DATE_DISPLAY_FORMAT)),
            Self::Map(map) => {
                let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{k}={v}")).collect();
                f.write_str(&pairs.join(","))
            }
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(x) => serde_json::Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.format(DATE_DISPLAY_FORMAT).to_string()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Self::Date(d)
    }
}

impl From<BTreeMap<String, String>> for Value {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_collections() {
        let list = Value::from(vec!["a", "b"]);
        assert_eq!(list.to_string(), "a,b");

        let mut map = BTreeMap::new();
        map.insert("k".to_string(), "v".to_string());
        assert_eq!(Value::Map(map).to_string(), "k=v");
    }

    #[test]
    fn test_serializes_untagged() {
        let v = Value::from(vec![Value::Int(1), Value::from("x"), Value::Bool(true)]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"[1,"x",true]"#);
    }

    #[test]
    fn test_json_conversion_formats_dates() {
        let date = NaiveDateTime::parse_from_str("2024-01-15 10:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let json = serde_json::Value::from(&Value::Date(date));
        assert_eq!(json, serde_json::json!("2024-01-15T10:30:00"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Int(15).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::List(Vec::new()).is_truthy());
    }
}
