//! The structured parse result.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::Value;

/// Mapping from result key to coerced value.
///
/// Option values live under the option's name (or alias when it has no
/// name), positional arguments under their variable name, the matched
/// command under the configured command key and extra tokens under the
/// configured extra-arguments key.
///
/// # Examples
///
/// ```
/// use argspec_core::{OptionKind, OptionSpec, Parser};
///
/// let mut parser = Parser::new();
/// parser.option(OptionSpec::new("int", OptionKind::Int).with_alias('i')).unwrap();
///
/// let result = parser.parse(["-i", "4"]).unwrap();
/// assert_eq!(result.get_int("int"), Some(4));
/// assert!(!result.flag("help"));
/// assert_eq!(result.to_json()["int"], 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParseResult {
    values: BTreeMap<String, Value>,
    #[serde(skip)]
    command: Option<String>,
}

impl ParseResult {
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub(crate) fn set_command(&mut self, key: &str, name: &str) {
        self.command = Some(name.to_string());
        self.insert(key, Value::String(name.to_string()));
    }

    /// Returns the matched command name, if any.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    pub fn get_date(&self, key: &str) -> Option<&NaiveDateTime> {
        self.get(key).and_then(Value::as_date)
    }

    pub fn get_map(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.get(key).and_then(Value::as_map)
    }

    pub fn get_list(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_list)
    }

    /// Returns `true` if `key` holds a `true` flag.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns `true` if `key` is present and truthy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(Value::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Converts the result into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }

    /// Consumes the result, returning the underlying map.
    pub fn into_values(self) -> BTreeMap<String, Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_stored_under_key() {
        let mut result = ParseResult::default();
        result.set_command("cmd", "add");
        assert_eq!(result.command(), Some("add"));
        assert_eq!(result.get_str("cmd"), Some("add"));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut result = ParseResult::default();
        result.insert("int", Value::Int(4));
        result.insert("help", Value::Bool(false));
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"help":false,"int":4}"#);
    }
}
