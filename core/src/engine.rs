//! Tokenizer and parse engine.
//!
//! A single left-to-right pass over the argument vector. Recognised options
//! are coerced immediately into a fresh [`OptionSlots`] runtime state and
//! recorded as [`OptionMatch`]es; the first command token is resolved; and
//! everything else is collected as positional tokens. After the pass,
//! defaults are applied and required/command-scoping rules are enforced.

use tracing::{debug, trace};

use crate::error::{ErrorKind, ParseError, Result};
use crate::{OptionKind, OptionSpec, Parser, Value};

/// Runtime value slots for one parse pass.
///
/// Created fresh for every pass (see [`Parser::reset_state`]), so nothing
/// leaks between passes over the same parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSlots {
    values: Vec<Option<Value>>,
    set: Vec<bool>,
}

impl OptionSlots {
    /// Creates unset slots for `count` options.
    pub fn new(count: usize) -> Self {
        Self {
            values: vec![None; count],
            set: vec![false; count],
        }
    }

    /// Returns the current value of option `index` (explicit or default).
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Returns `true` if option `index` was given on the command line.
    pub fn is_set(&self, index: usize) -> bool {
        self.set.get(index).copied().unwrap_or(false)
    }

    /// Stores one occurrence of option `index`.
    ///
    /// The whole occurrence is coerced before anything is stored, so a
    /// failing list element leaves the slot untouched.
    fn apply(&mut self, index: usize, spec: &OptionSpec, raw: Option<&str>) -> Result<()> {
        if self.is_set(index) && !spec.accumulates() {
            return Err(ParseError::duplicate_value(format!(
                "Duplicate value for option {}",
                spec.key()
            )));
        }

        let values = spec.coerce_occurrence(raw)?;
        let slot = &mut self.values[index];
        for value in values {
            store(slot, spec, value);
        }
        self.set[index] = true;
        Ok(())
    }

    fn apply_default(&mut self, index: usize, value: &Value) {
        self.values[index] = Some(value.clone());
    }
}

fn store(slot: &mut Option<Value>, spec: &OptionSpec, value: Value) {
    match (slot.as_mut(), value) {
        (Some(Value::Map(existing)), Value::Map(pairs))
            if matches!(spec.kind, OptionKind::KeyValue) =>
        {
            existing.extend(pairs);
        }
        (_, Value::Map(pairs)) if matches!(spec.kind, OptionKind::KeyValue) => {
            *slot = Some(Value::Map(pairs));
        }
        (Some(Value::List(items)), value) if spec.accumulates() => items.push(value),
        (_, value) if spec.accumulates() => *slot = Some(Value::List(vec![value])),
        (_, value) => *slot = Some(value),
    }
}

/// One recognised option occurrence, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionMatch {
    /// Index into [`Parser::options`].
    pub option: usize,
    /// Raw value text, `None` for flags.
    pub raw: Option<String>,
    /// Position of the token that named the option.
    pub position: usize,
}

/// Outcome of the token walk.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    /// Every recognised option, in order.
    pub matches: Vec<OptionMatch>,
    /// Index into [`Parser::commands`] of the matched command.
    pub command: Option<usize>,
    /// Positional tokens, in order.
    pub positionals: Vec<String>,
    /// Option values after defaults were applied.
    pub slots: OptionSlots,
}

struct Walker<'a> {
    parser: &'a Parser,
    argv: &'a [String],
    slots: OptionSlots,
    matches: Vec<OptionMatch>,
    command: Option<usize>,
    positionals: Vec<String>,
}

impl<'a> Walker<'a> {
    fn new(parser: &'a Parser, argv: &'a [String]) -> Self {
        Self {
            parser,
            argv,
            slots: parser.reset_state(),
            matches: Vec::new(),
            command: None,
            positionals: Vec::new(),
        }
    }

    fn walk(&mut self) -> Result<()> {
        let argv = self.argv;
        let mut i = 0;
        while i < argv.len() {
            let token = &argv[i];
            if let Some(long) = token.strip_prefix("--") {
                i += self.long_option(long, i)?;
            } else if let Some(cluster) = token.strip_prefix('-') {
                i += self.short_options(cluster, i)?;
            } else if self.command.is_none() && !self.parser.commands().is_empty() {
                self.match_command(token)?;
                i += 1;
            } else if self.parser.parse_config().allow_trailing_options {
                self.positionals.push(token.clone());
                i += 1;
            } else {
                trace!(position = i, "positional token ends option scanning");
                self.positionals.extend(argv[i..].iter().cloned());
                break;
            }
        }
        Ok(())
    }

    /// Handles `--name`; returns how many tokens were consumed.
    fn long_option(&mut self, name: &str, position: usize) -> Result<usize> {
        let index = self
            .parser
            .options()
            .iter()
            .position(|o| o.name.as_deref() == Some(name))
            .ok_or_else(|| ParseError::unknown_option(format!("Option {name} not found.")))?;

        if self.parser.options()[index].takes_value() {
            self.value_from_next(index, position)
        } else {
            self.apply(index, None, position)?;
            Ok(1)
        }
    }

    /// Handles `-a`, `-avalue` and `-abc`; returns how many tokens were consumed.
    fn short_options(&mut self, cluster: &str, position: usize) -> Result<usize> {
        let mut chars = cluster.chars();
        let Some(first) = chars.next() else {
            return Err(ParseError::unknown_option("Option - not found."));
        };
        let index = self.find_alias(first)?;

        if self.parser.options()[index].takes_value() {
            let rest = chars.as_str();
            if rest.is_empty() {
                return self.value_from_next(index, position);
            }
            self.apply(index, Some(rest), position)?;
            return Ok(1);
        }

        self.apply(index, None, position)?;
        for alias in chars {
            let index = self.find_alias(alias)?;
            if self.parser.options()[index].takes_value() {
                return Err(ParseError::invalid_option(format!(
                    "Option -{alias} requires an argument."
                )));
            }
            self.apply(index, None, position)?;
        }
        Ok(1)
    }

    fn find_alias(&self, alias: char) -> Result<usize> {
        self.parser
            .options()
            .iter()
            .position(|o| o.alias == Some(alias))
            .ok_or_else(|| ParseError::unknown_option(format!("Option -{alias} not found.")))
    }

    /// Consumes the token after `position` as the value of option `index`.
    ///
    /// An option with a default tolerates a missing value, and tolerates an
    /// option-looking next token it cannot coerce; in both cases the next
    /// token is left for the walk and the default stands.
    fn value_from_next(&mut self, index: usize, position: usize) -> Result<usize> {
        let parser = self.parser;
        let argv = self.argv;
        let spec = &parser.options()[index];
        let has_default = spec.default_value.is_some();

        let Some(next) = argv.get(position + 1) else {
            if has_default {
                debug!(option = %spec.key(), "no value given; keeping default");
                return Ok(1);
            }
            return Err(ParseError::invalid_value(format!(
                "Option {} requires a value.",
                spec.key()
            )));
        };

        match self.apply(index, Some(next), position) {
            Ok(()) => Ok(2),
            Err(err)
                if err.kind() == ErrorKind::InvalidValue
                    && has_default
                    && next.starts_with('-') =>
            {
                debug!(
                    option = %spec.key(),
                    token = %next,
                    error = %err,
                    "next token looks like an option; keeping default"
                );
                Ok(1)
            }
            Err(err) => Err(err),
        }
    }

    fn apply(&mut self, index: usize, raw: Option<&str>, position: usize) -> Result<()> {
        let parser = self.parser;
        let spec = &parser.options()[index];
        self.slots.apply(index, spec, raw)?;
        trace!(option = %spec.key(), position, "matched option");
        self.matches.push(OptionMatch {
            option: index,
            raw: raw.map(String::from),
            position,
        });
        Ok(())
    }

    fn match_command(&mut self, token: &str) -> Result<()> {
        let index = self
            .parser
            .commands()
            .iter()
            .position(|c| c.name == token)
            .ok_or_else(|| ParseError::invalid_option(format!("Unknown command {token}")))?;
        debug!(command = %token, "matched command");
        self.command = Some(index);
        Ok(())
    }

    /// Applies defaults and enforces required and command-scoping rules.
    fn finish(mut self) -> Result<Scan> {
        let parser = self.parser;
        let command = self.command.map(|i| parser.commands()[i].name.as_str());

        for (index, spec) in parser.options().iter().enumerate() {
            if let Some(default) = &spec.default_value {
                if self.slots.value(index).is_none() && spec.applies_to(command) {
                    self.slots.apply_default(index, default);
                }
            }
        }

        for (index, spec) in parser.options().iter().enumerate() {
            if spec.applies_to(command) {
                if spec.required && self.slots.value(index).is_none() {
                    return Err(ParseError::invalid_value(format!(
                        "Option {} is required.",
                        spec.key()
                    )));
                }
            } else if self.slots.is_set(index) {
                let bound = spec.command.as_deref().unwrap_or_default();
                return Err(ParseError::invalid_option(format!(
                    "Option {} is only for the {bound} command.",
                    spec.key()
                )));
            }
        }

        if command.is_none()
            && parser.parse_config().command_required
            && !parser.commands().is_empty()
        {
            return Err(ParseError::invalid_value("A command is required."));
        }

        Ok(Scan {
            matches: self.matches,
            command: self.command,
            positionals: self.positionals,
            slots: self.slots,
        })
    }
}

/// Walks `argv` against `parser`'s schema.
pub(crate) fn scan(parser: &Parser, argv: &[String]) -> Result<Scan> {
    let mut walker = Walker::new(parser, argv);
    walker.walk()?;
    walker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandSpec, ParseConfig};

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn parser_with(options: Vec<OptionSpec>) -> Parser {
        let mut parser = Parser::new();
        for option in options {
            parser.option(option).unwrap();
        }
        parser
    }

    #[test]
    fn test_matches_are_recorded_in_order() {
        let parser = parser_with(vec![
            OptionSpec::new("int", OptionKind::Int).with_alias('i'),
            OptionSpec::flag("flag").with_alias('f'),
        ]);
        let scan = scan(&parser, &argv(&["-f", "--int", "3"])).unwrap();

        let order: Vec<(usize, Option<&str>)> = scan
            .matches
            .iter()
            .map(|m| (m.option, m.raw.as_deref()))
            .collect();
        assert_eq!(order, vec![(2, None), (1, Some("3"))]);
        assert_eq!(scan.matches[1].position, 1);
    }

    #[test]
    fn test_positional_stops_scanning() {
        let parser = parser_with(vec![OptionSpec::new("int", OptionKind::Int)]);
        let scan = scan(&parser, &argv(&["test", "--int", "4"])).unwrap();
        assert_eq!(scan.positionals, argv(&["test", "--int", "4"]));
        assert!(scan.matches.is_empty());
    }

    #[test]
    fn test_trailing_options_keep_scanning() {
        let mut parser = parser_with(vec![OptionSpec::new("int", OptionKind::Int)]);
        parser.set_config(ParseConfig {
            allow_trailing_options: true,
            ..ParseConfig::default()
        });
        let scan = scan(&parser, &argv(&["a", "--int", "4", "b"])).unwrap();
        assert_eq!(scan.positionals, argv(&["a", "b"]));
        assert_eq!(scan.slots.value(1), Some(&Value::Int(4)));
    }

    #[test]
    fn test_cluster_rejects_value_option() {
        let parser = parser_with(vec![
            OptionSpec::flag("flag").with_alias('f'),
            OptionSpec::new("string", OptionKind::String).with_alias('s'),
        ]);
        let err = scan(&parser, &argv(&["-fs"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
        assert_eq!(err.message(), "Option -s requires an argument.");
    }

    #[test]
    fn test_unknown_alias_in_cluster() {
        let parser = parser_with(vec![OptionSpec::flag("flag").with_alias('f')]);
        let err = scan(&parser, &argv(&["-fz"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOption);
    }

    #[test]
    fn test_bare_dashes_are_unknown() {
        let parser = Parser::new();
        for token in ["-", "--"] {
            let err = scan(&parser, &argv(&[token])).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownOption, "token {token:?}");
        }
    }

    #[test]
    fn test_command_matched_once() {
        let mut parser = Parser::new();
        parser.command(CommandSpec::new("add")).unwrap();
        parser.command(CommandSpec::new("remove")).unwrap();

        let scan = scan(&parser, &argv(&["add", "remove"])).unwrap();
        assert_eq!(scan.command, Some(0));
        assert_eq!(scan.positionals, argv(&["remove"]));
    }

    #[test]
    fn test_missing_value_without_default() {
        let parser = parser_with(vec![OptionSpec::new("string", OptionKind::String)]);
        let err = scan(&parser, &argv(&["--string"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_missing_value_with_default() {
        let parser = parser_with(vec![
            OptionSpec::new("level", OptionKind::Int).with_default(3),
        ]);
        let scan = scan(&parser, &argv(&["--level"])).unwrap();
        assert_eq!(scan.slots.value(1), Some(&Value::Int(3)));
        assert!(!scan.slots.is_set(1));
    }

    #[test]
    fn test_failed_value_does_not_touch_slot() {
        let mut slots = OptionSlots::new(1);
        let spec = OptionSpec::new("list", OptionKind::Int).as_list();
        assert!(slots.apply(0, &spec, Some("1,x")).is_err());
        assert_eq!(slots.value(0), None);
        assert!(!slots.is_set(0));
    }
}
