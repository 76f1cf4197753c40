//! Value coercion.
//!
//! Converts raw tokens into [`Value`]s according to an option's
//! [`OptionKind`], and runs the per-option pipeline: `parse_fn` → kind
//! coercion → `map_fn` → `validate_fn` → `check_fn`. List options split
//! their token on the delimiter and push every piece through the same
//! pipeline.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{ParseError, Result};
use crate::{OptionKind, OptionSpec, Value};

static KEY_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([^=]*?) *= *(.*)$").expect("static regex must compile"));

/// Layouts tried when a date option has no format, after RFC 3339.
const FALLBACK_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

impl OptionKind {
    /// Coerces one raw token.
    ///
    /// `raw` is `None` when no token was supplied; only flags accept that,
    /// and flags reject any supplied value. `owner` names the option in
    /// error messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{ErrorKind, OptionKind, Value};
    ///
    /// assert_eq!(OptionKind::Int.coerce(Some("20"), "int").unwrap(), Value::Int(20));
    /// assert_eq!(
    ///     OptionKind::Int.coerce(Some("2.5"), "int").unwrap_err().kind(),
    ///     ErrorKind::InvalidValue,
    /// );
    /// assert_eq!(OptionKind::Flag.coerce(None, "flag").unwrap(), Value::Bool(true));
    /// ```
    pub fn coerce(&self, raw: Option<&str>, owner: &str) -> Result<Value> {
        let Some(text) = raw else {
            return match self {
                Self::Flag => Ok(Value::Bool(true)),
                _ => Err(ParseError::invalid_value(format!(
                    "Option {owner} requires a value."
                ))),
            };
        };

        match self {
            Self::Flag => Err(ParseError::invalid_value(format!(
                "Option {owner} does not take a value (got {text})."
            ))),
            Self::String => Ok(Value::String(text.to_string())),
            Self::Int => coerce_int(text, owner),
            Self::Float => coerce_float(text, owner),
            Self::Choice(choices) => {
                if choices.iter().any(|c| c == text) {
                    Ok(Value::String(text.to_string()))
                } else {
                    Err(ParseError::invalid_value(format!(
                        "Value ({text}) for option {owner} is not one of the allowed values [{}].",
                        choices.join(", ")
                    )))
                }
            }
            Self::KeyValue => coerce_key_value(text, owner),
            Self::Date { format, strict } => coerce_date(text, format.as_deref(), *strict, owner),
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| !f.is_nan())
}

fn coerce_int(text: &str, owner: &str) -> Result<Value> {
    let not_int =
        || ParseError::invalid_value(format!("Value ({text}) for option {owner} is not an integer."));

    let f = parse_number(text).ok_or_else(not_int)?;
    if !f.is_finite() || f.fract() != 0.0 || f.abs() >= i64::MAX as f64 {
        return Err(not_int());
    }
    Ok(Value::Int(f as i64))
}

fn coerce_float(text: &str, owner: &str) -> Result<Value> {
    parse_number(text)
        .filter(|f| f.is_finite())
        .map(Value::Float)
        .ok_or_else(|| {
            ParseError::invalid_value(format!("Value ({text}) for option {owner} is not a float."))
        })
}

fn coerce_key_value(text: &str, owner: &str) -> Result<Value> {
    let invalid =
        || ParseError::invalid_value(format!("Value ({text}) for option {owner} is not a key value"));

    let caps = KEY_VALUE_RE.captures(text).ok_or_else(invalid)?;
    let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let value = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    if key.is_empty() {
        return Err(invalid());
    }

    let mut map = BTreeMap::new();
    map.insert(key.to_string(), value.to_string());
    Ok(Value::Map(map))
}

fn coerce_date(text: &str, format: Option<&str>, strict: bool, owner: &str) -> Result<Value> {
    let input = if strict { text } else { text.trim() };

    let parsed = match format {
        Some(format) => {
            let explicit = parse_with_format(input, format);
            if explicit.is_none() && !strict {
                parse_default_layouts(input)
            } else {
                explicit
            }
        }
        None => parse_default_layouts(input),
    };

    parsed.map(Value::Date).ok_or_else(|| {
        ParseError::invalid_value(format!(
            "Value ({text}) for option {owner} is not a valid date."
        ))
    })
}

fn parse_with_format(input: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, format).ok().or_else(|| {
        NaiveDate::parse_from_str(input, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

fn parse_default_layouts(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    FALLBACK_DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(input, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl OptionSpec {
    /// Runs the full pipeline for one piece of text (or no text, for flags).
    pub fn coerce_one(&self, raw: Option<&str>) -> Result<Value> {
        let key = self.key();
        let prepared = match (raw, &self.parse_fn) {
            (Some(text), Some(parse)) => Some(parse(text)),
            (Some(text), None) => Some(text.to_string()),
            (None, _) => None,
        };

        let mut value = self.kind.coerce(prepared.as_deref(), &key)?;
        if let Some(map) = &self.map_fn {
            value = map(value);
        }

        if let Some(validate) = &self.validate_fn {
            if !validate(&value) {
                let message = self.validate_message.clone().unwrap_or_else(|| {
                    format!("Value ({value}) is invalid for option {key}")
                });
                return Err(ParseError::invalid_value(message));
            }
        }
        if let Some(check) = &self.check_fn {
            check(&value).map_err(ParseError::invalid_value)?;
        }

        Ok(value)
    }

    /// Coerces one occurrence of the option, splitting list values.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{OptionKind, OptionSpec, Value};
    ///
    /// let list = OptionSpec::new("list", OptionKind::Int).as_list();
    /// let values = list.coerce_occurrence(Some("4, 5, 6")).unwrap();
    /// assert_eq!(values, vec![Value::Int(4), Value::Int(5), Value::Int(6)]);
    /// ```
    pub fn coerce_occurrence(&self, raw: Option<&str>) -> Result<Vec<Value>> {
        match (self.list, raw) {
            (true, Some(text)) => text
                .split(self.delimiter.as_str())
                .map(|piece| self.coerce_one(Some(piece)))
                .collect(),
            _ => self.coerce_one(raw).map(|v| vec![v]),
        }
    }
}

impl OptionSpec {
    /// Normalizes a default value to the shape parsing would produce.
    ///
    /// Text runs through the same pipeline as a command-line token. Values
    /// that already have the kind's type are kept. Accumulating options get
    /// a list, key/value options a merged map.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidValue`](crate::ErrorKind::InvalidValue) when a piece
    /// fails coercion or the default has the wrong shape.
    pub fn coerce_default(&self, default: &Value) -> Result<Value> {
        let key = self.key();
        if matches!(self.kind, OptionKind::Flag) {
            return match default {
                Value::Bool(_) => Ok(default.clone()),
                _ => Err(ParseError::invalid_value(format!(
                    "Default for flag option {key} must be true or false"
                ))),
            };
        }

        let pieces = match default {
            Value::List(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };

        let mut values = Vec::new();
        for piece in pieces {
            match (piece, &self.kind) {
                (Value::List(_), _) => {
                    return Err(ParseError::invalid_value(format!(
                        "Default for option {key} cannot nest lists"
                    )));
                }
                (Value::Int(_), OptionKind::Int)
                | (Value::Float(_), OptionKind::Float)
                | (Value::Date(_), OptionKind::Date { .. })
                | (Value::Map(_), OptionKind::KeyValue) => values.push(piece.clone()),
                (Value::String(text), _) => {
                    values.extend(self.coerce_occurrence(Some(text.as_str()))?);
                }
                (other, _) => {
                    let text = other.to_string();
                    values.extend(self.coerce_occurrence(Some(text.as_str()))?);
                }
            }
        }

        if matches!(self.kind, OptionKind::KeyValue) {
            let mut merged = BTreeMap::new();
            for value in values {
                if let Value::Map(pairs) = value {
                    merged.extend(pairs);
                }
            }
            return Ok(Value::Map(merged));
        }

        if self.accumulates() {
            return Ok(Value::List(values));
        }

        match <[Value; 1]>::try_from(values) {
            Ok([value]) => Ok(value),
            Err(_) => Err(ParseError::invalid_value(format!(
                "Default for option {key} must be a single value"
            ))),
        }
    }
}
