//! Schema type definitions.
//!
//! This module defines the declarative pieces a [`Parser`](crate::Parser) is
//! built from: options ([`OptionSpec`]), positional arguments
//! ([`ArgumentSpec`]), commands ([`CommandSpec`]), extra help sections and
//! cross-field validators. Specs are plain values assembled with builder
//! methods; they carry no runtime state, so a parser can be reused for any
//! number of parse passes.

use std::fmt;
use std::sync::Arc;

use crate::{ParseResult, Value};

/// Transform applied to the raw text before kind coercion.
pub type ParseFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Transform applied to a value after kind coercion.
pub type MapFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
/// Predicate on a coerced value; `false` rejects it.
pub type ValidateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Check on a coerced value; `Err` rejects it with its own message.
pub type CheckFn = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;
/// Check on the fully assembled result; `Err` carries the failure message.
pub type ResultCheckFn = Arc<dyn Fn(&ParseResult) -> Result<(), String> + Send + Sync>;

/// Default list delimiter.
pub const DEFAULT_DELIMITER: &str = ",";

/// Declared kind of an option's value.
///
/// Coercion dispatches on this tag (see [`OptionKind::coerce`]).
///
/// # Examples
///
/// ```
/// use argspec_core::OptionKind;
///
/// assert!(!OptionKind::Flag.takes_value());
/// assert!(OptionKind::Int.takes_value());
/// assert_eq!(OptionKind::choice(["json", "yaml"]).type_name(), "options");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionKind {
    /// Any text, kept as is.
    #[default]
    String,
    /// Numeric text with no fractional part.
    Int,
    /// Numeric text.
    Float,
    /// Boolean flag; consumes no token.
    Flag,
    /// One of a fixed set of strings.
    Choice(Vec<String>),
    /// `key=value` pairs merged into one mapping.
    KeyValue,
    /// Date/time text, optionally with a chrono format string.
    Date {
        format: Option<String>,
        strict: bool,
    },
}

impl OptionKind {
    /// Builds a [`Choice`](OptionKind::Choice) kind.
    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(choices.into_iter().map(Into::into).collect())
    }

    /// Builds a [`Date`](OptionKind::Date) kind with an explicit format.
    pub fn date_with_format(format: &str, strict: bool) -> Self {
        Self::Date {
            format: Some(format.to_string()),
            strict,
        }
    }

    /// Builds a [`Date`](OptionKind::Date) kind that accepts the common
    /// ISO-like layouts.
    pub fn date() -> Self {
        Self::Date {
            format: None,
            strict: false,
        }
    }

    /// Returns `true` if an option of this kind consumes a value token.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Flag)
    }

    /// Returns the schema-document spelling of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Flag => "boolean",
            Self::Choice(_) => "options",
            Self::KeyValue => "keyValue",
            Self::Date { .. } => "date",
        }
    }
}

/// Schema for an option (`--name` / `-a`).
///
/// # Examples
///
/// ```
/// use argspec_core::{OptionKind, OptionSpec};
///
/// let list = OptionSpec::new("list", OptionKind::Int)
///     .with_alias('l')
///     .as_list()
///     .with_delimiter("|");
/// assert_eq!(list.key(), "list");
/// assert!(list.list);
/// assert_eq!(list.delimiter, "|");
///
/// let short = OptionSpec::alias_only('x', OptionKind::Flag);
/// assert_eq!(short.key(), "x");
/// ```
#[derive(Clone)]
pub struct OptionSpec {
    /// Long form, used as `--name` and as the result key.
    pub name: Option<String>,
    /// Single-character short form, used as `-a`.
    pub alias: Option<char>,
    pub kind: OptionKind,
    pub description: Option<String>,
    /// Help grouping; options without one are listed under their command or
    /// the default group.
    pub group: Option<String>,
    /// Placeholder shown in help text (`--int <val>`).
    pub variable_name: Option<String>,
    pub required: bool,
    /// Accept repeated occurrences, collecting every value.
    pub multiple: bool,
    /// Split each value on [`delimiter`](Self::delimiter).
    pub list: bool,
    pub delimiter: String,
    pub default_value: Option<Value>,
    /// Restricts the option to one command.
    pub command: Option<String>,
    pub parse_fn: Option<ParseFn>,
    pub map_fn: Option<MapFn>,
    pub validate_fn: Option<ValidateFn>,
    /// Message reported when `validate_fn` rejects a value.
    pub validate_message: Option<String>,
    /// Runs after `validate_fn`.
    pub check_fn: Option<CheckFn>,
}

impl OptionSpec {
    /// Creates an option with a long name.
    pub fn new(name: &str, kind: OptionKind) -> Self {
        Self::from_parts(Some(name), None, kind)
    }

    /// Creates a boolean flag with a long name.
    pub fn flag(name: &str) -> Self {
        Self::new(name, OptionKind::Flag)
    }

    /// Creates an option that only has a short form.
    pub fn alias_only(alias: char, kind: OptionKind) -> Self {
        Self::from_parts(None, Some(alias), kind)
    }

    /// Creates an option from optional identity parts.
    ///
    /// Registration rejects specs where both parts are missing.
    pub fn from_parts(name: Option<&str>, alias: Option<char>, kind: OptionKind) -> Self {
        Self {
            name: name.map(String::from),
            alias,
            kind,
            description: None,
            group: None,
            variable_name: None,
            required: false,
            multiple: false,
            list: false,
            delimiter: DEFAULT_DELIMITER.to_string(),
            default_value: None,
            command: None,
            parse_fn: None,
            map_fn: None,
            validate_fn: None,
            validate_message: None,
            check_fn: None,
        }
    }

    pub fn with_alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_variable_name(mut self, variable_name: &str) -> Self {
        self.variable_name = Some(variable_name.to_string());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks as allowing multiple occurrences.
    pub fn allow_multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Marks as taking a delimiter-separated list.
    pub fn as_list(mut self) -> Self {
        self.list = true;
        self
    }

    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Restricts the option to the named command.
    pub fn for_command(mut self, command: &str) -> Self {
        self.command = Some(command.to_string());
        self
    }

    /// Sets a text transform run before coercion.
    pub fn with_parser(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.parse_fn = Some(Arc::new(f));
        self
    }

    /// Sets a value transform run after coercion.
    pub fn with_mapper(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.map_fn = Some(Arc::new(f));
        self
    }

    /// Sets a predicate every coerced value must satisfy.
    pub fn with_validator(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validate_fn = Some(Arc::new(f));
        self
    }

    pub fn with_validate_message(mut self, message: &str) -> Self {
        self.validate_message = Some(message.to_string());
        self
    }

    /// Sets a check that explains its own rejections.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{OptionKind, OptionSpec};
    ///
    /// let port = OptionSpec::new("port", OptionKind::Int).with_check(|v| match v.as_int() {
    ///     Some(n) if n > 65535 => Err(format!("port {n} is out of range")),
    ///     _ => Ok(()),
    /// });
    /// let err = port.coerce_one(Some("70000")).unwrap_err();
    /// assert_eq!(err.message(), "port 70000 is out of range");
    /// ```
    pub fn with_check(
        mut self,
        f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.check_fn = Some(Arc::new(f));
        self
    }

    /// Returns the result key: the long name, falling back to the alias.
    pub fn key(&self) -> String {
        match (&self.name, self.alias) {
            (Some(name), _) => name.clone(),
            (None, Some(alias)) => alias.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Returns `true` if the option consumes a value token.
    pub fn takes_value(&self) -> bool {
        self.kind.takes_value()
    }

    /// Returns `true` if repeated values accumulate instead of conflicting.
    pub fn accumulates(&self) -> bool {
        self.multiple || self.list
    }

    /// Returns `true` if the option may be used with `command`.
    pub fn applies_to(&self, command: Option<&str>) -> bool {
        match &self.command {
            None => true,
            Some(bound) => command == Some(bound.as_str()),
        }
    }

    /// Returns the help placeholder, defaulting to the kind's name.
    pub fn placeholder(&self) -> &str {
        self.variable_name
            .as_deref()
            .unwrap_or_else(|| self.kind.type_name())
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("multiple", &self.multiple)
            .field("list", &self.list)
            .field("delimiter", &self.delimiter)
            .field("default_value", &self.default_value)
            .field("command", &self.command)
            .field("group", &self.group)
            .field("has_parse_fn", &self.parse_fn.is_some())
            .field("has_map_fn", &self.map_fn.is_some())
            .field("has_validate_fn", &self.validate_fn.is_some())
            .field("has_check_fn", &self.check_fn.is_some())
            .finish_non_exhaustive()
    }
}

/// Schema for a positional argument.
///
/// # Examples
///
/// ```
/// use argspec_core::ArgumentSpec;
///
/// let first = ArgumentSpec::new("first").required();
/// assert_eq!(first.variable_name, "first");
///
/// let rest = ArgumentSpec::new("other").allow_multiple().with_variable_name("files");
/// assert!(rest.multiple);
/// assert_eq!(rest.variable_name, "files");
/// ```
#[derive(Clone)]
pub struct ArgumentSpec {
    pub name: String,
    /// Result key and help placeholder.
    pub variable_name: String,
    pub description: Option<String>,
    pub required: bool,
    /// Capture every remaining token.
    pub multiple: bool,
    pub default_value: Option<Value>,
    /// Restricts the argument to one command.
    pub command: Option<String>,
    pub validate_fn: Option<ValidateFn>,
    pub check_fn: Option<CheckFn>,
}

impl ArgumentSpec {
    /// Creates an optional, single-token argument.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variable_name: name.to_string(),
            description: None,
            required: false,
            multiple: false,
            default_value: None,
            command: None,
            validate_fn: None,
            check_fn: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow_multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_variable_name(mut self, variable_name: &str) -> Self {
        self.variable_name = variable_name.to_string();
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn for_command(mut self, command: &str) -> Self {
        self.command = Some(command.to_string());
        self
    }

    pub fn with_validator(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validate_fn = Some(Arc::new(f));
        self
    }

    pub fn with_check(
        mut self,
        f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.check_fn = Some(Arc::new(f));
        self
    }

    /// Returns `true` if the argument binds when `command` was matched.
    pub fn applies_to(&self, command: Option<&str>) -> bool {
        match &self.command {
            None => true,
            Some(bound) => command == Some(bound.as_str()),
        }
    }

    /// Returns `true` if this argument and `other` can both bind in the same
    /// parse pass.
    pub fn shares_scope_with(&self, other: &ArgumentSpec) -> bool {
        match (&self.command, &other.command) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl fmt::Debug for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSpec")
            .field("name", &self.name)
            .field("variable_name", &self.variable_name)
            .field("required", &self.required)
            .field("multiple", &self.multiple)
            .field("default_value", &self.default_value)
            .field("command", &self.command)
            .field("has_validate_fn", &self.validate_fn.is_some())
            .field("has_check_fn", &self.check_fn.is_some())
            .finish_non_exhaustive()
    }
}

/// Schema for a command token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub description: Option<String>,
}

impl CommandSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Extra titled block appended to help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub name: String,
    pub text: String,
}

/// Validator run against the complete result.
#[derive(Clone)]
pub struct ResultValidator {
    pub func: ResultCheckFn,
}

impl ResultValidator {
    /// Runs the validator; `Err` holds the message the parse fails with.
    pub fn check(&self, result: &ParseResult) -> Result<(), String> {
        (self.func)(result)
    }
}

impl fmt::Debug for ResultValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_key_prefers_name() {
        let opt = OptionSpec::new("string", OptionKind::String).with_alias('s');
        assert_eq!(opt.key(), "string");
        assert_eq!(opt.placeholder(), "string");

        let short = OptionSpec::alias_only('q', OptionKind::Flag);
        assert_eq!(short.key(), "q");
        assert_eq!(short.placeholder(), "boolean");
    }

    #[test]
    fn test_option_applies_to_command() {
        let opt = OptionSpec::new("option", OptionKind::String).for_command("command1");
        assert!(opt.applies_to(Some("command1")));
        assert!(!opt.applies_to(Some("command2")));
        assert!(!opt.applies_to(None));
        assert!(OptionSpec::flag("x").applies_to(None));
    }

    #[test]
    fn test_argument_scope() {
        let unbound = ArgumentSpec::new("first");
        let add = ArgumentSpec::new("addArg").for_command("add");
        let remove = ArgumentSpec::new("rmArg").for_command("remove");

        assert!(unbound.shares_scope_with(&add));
        assert!(add.shares_scope_with(&add.clone()));
        assert!(!add.shares_scope_with(&remove));
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let opt = OptionSpec::new("v", OptionKind::Int).with_validator(|v| v.as_int() == Some(1));
        let debug = format!("{opt:?}");
        assert!(debug.contains("has_validate_fn: true"));
        assert!(debug.contains("has_check_fn: false"));

        let arg = ArgumentSpec::new("a").with_check(|_| Err("no".to_string()));
        assert!(format!("{arg:?}").contains("has_check_fn: true"));
    }
}
