//! Registration-time schema validation.
//!
//! Every registration call on [`Parser`](crate::Parser) runs the matching
//! check here before anything is stored, so a parser never holds a schema
//! that violates these rules:
//!
//! - options have a name or an alias, names and aliases are unique, names
//!   and aliases are well formed;
//! - `multiple` and `list` are not combined, flags are not lists, choice
//!   sets are not empty, list delimiters are not empty;
//! - command names are well formed and unique;
//! - positional arguments have unique result keys, nothing follows a
//!   multiple argument, and no required argument follows an optional one
//!   within the same command scope;
//! - option keys, argument keys and the configured command and extra
//!   arguments keys never share a slot in the result.
//!
//! All failures are [`ErrorKind::InvalidOption`](crate::ErrorKind::InvalidOption).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ParseError, Result};
use crate::{ArgumentSpec, CommandSpec, OptionKind, OptionSpec, ParseConfig};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^-\s]\S*$").expect("static regex must compile"));

pub(crate) fn validate_option(
    existing: &[OptionSpec],
    arguments: &[ArgumentSpec],
    spec: &OptionSpec,
) -> Result<()> {
    if spec.name.is_none() && spec.alias.is_none() {
        return Err(ParseError::invalid_option(
            "name or alias is required for options",
        ));
    }

    let key = spec.key();
    if let Some(name) = &spec.name {
        if !NAME_RE.is_match(name) {
            return Err(ParseError::invalid_option(format!(
                "Invalid option name '{name}'"
            )));
        }
        if existing.iter().any(|o| o.name.as_deref() == Some(name)) {
            return Err(ParseError::invalid_option(format!(
                "Duplicate option name '{name}'"
            )));
        }
    }

    if arguments.iter().any(|a| a.variable_name == key) {
        return Err(ParseError::invalid_option(format!(
            "Option {key} uses the result key of an argument"
        )));
    }

    if let Some(alias) = spec.alias {
        if alias == '-' || alias.is_whitespace() {
            return Err(ParseError::invalid_option(format!(
                "Invalid alias '{alias}' for option {key}"
            )));
        }
        if existing.iter().any(|o| o.alias == Some(alias)) {
            return Err(ParseError::invalid_option(format!(
                "Duplicate option alias '-{alias}'"
            )));
        }
    }

    if spec.multiple && spec.list {
        return Err(ParseError::invalid_option(format!(
            "Option {key} cannot be both multiple and a list"
        )));
    }

    if spec.list {
        if matches!(spec.kind, OptionKind::Flag) {
            return Err(ParseError::invalid_option(format!(
                "Flag option {key} cannot take a list"
            )));
        }
        if spec.delimiter.is_empty() {
            return Err(ParseError::invalid_option(format!(
                "Option {key} has an empty list delimiter"
            )));
        }
    }

    if let OptionKind::Choice(choices) = &spec.kind {
        if choices.is_empty() {
            return Err(ParseError::invalid_option(format!(
                "Option {key} has no allowed values"
            )));
        }
    }

    Ok(())
}

pub(crate) fn validate_command(existing: &[CommandSpec], spec: &CommandSpec) -> Result<()> {
    if !NAME_RE.is_match(&spec.name) {
        return Err(ParseError::invalid_option(format!(
            "Invalid command name '{}'",
            spec.name
        )));
    }
    if existing.iter().any(|c| c.name == spec.name) {
        return Err(ParseError::invalid_option(format!(
            "Duplicate command '{}'",
            spec.name
        )));
    }
    Ok(())
}

pub(crate) fn validate_argument(
    existing: &[ArgumentSpec],
    options: &[OptionSpec],
    config: &ParseConfig,
    spec: &ArgumentSpec,
) -> Result<()> {
    if spec.name.trim().is_empty() || spec.variable_name.trim().is_empty() {
        return Err(ParseError::invalid_option("name is required for arguments"));
    }

    let key = spec.variable_name.as_str();
    if options.iter().any(|o| o.key() == key) {
        return Err(ParseError::invalid_option(format!(
            "Argument {} uses the result key of option {key}",
            spec.name
        )));
    }
    if key == config.command_result_key || key == config.extra_arguments_result_key {
        return Err(ParseError::invalid_option(format!(
            "Argument {} uses the reserved result key '{key}'",
            spec.name
        )));
    }

    if existing.iter().any(|a| a.variable_name == spec.variable_name) {
        return Err(ParseError::invalid_option(format!(
            "Duplicate argument '{}'",
            spec.variable_name
        )));
    }

    for earlier in existing.iter().filter(|a| a.shares_scope_with(spec)) {
        if earlier.multiple {
            return Err(ParseError::invalid_option(
                "No arguments are allowed after a multiple argument",
            ));
        }
        if !earlier.required && spec.required {
            return Err(ParseError::invalid_option(
                "No required arguments are allowed after an optional argument",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_option_requires_identity() {
        let spec = OptionSpec::from_parts(None, None, OptionKind::String);
        let err = validate_option(&[], &[], &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_option_rejects_duplicates() {
        let existing = vec![OptionSpec::new("string", OptionKind::String).with_alias('s')];

        let same_name = OptionSpec::new("string", OptionKind::Int);
        assert!(validate_option(&existing, &[], &same_name).is_err());

        let same_alias = OptionSpec::new("other", OptionKind::Int).with_alias('s');
        assert!(validate_option(&existing, &[], &same_alias).is_err());

        let fine = OptionSpec::new("other", OptionKind::Int).with_alias('o');
        assert!(validate_option(&existing, &[], &fine).is_ok());
    }

    #[test]
    fn test_option_rejects_bad_names() {
        for name in ["", "--long", "two words"] {
            let spec = OptionSpec::new(name, OptionKind::String);
            assert!(validate_option(&[], &[], &spec).is_err(), "name {name:?}");
        }
        let spec = OptionSpec::alias_only('-', OptionKind::Flag);
        assert!(validate_option(&[], &[], &spec).is_err());
    }

    #[test]
    fn test_multiple_and_list_are_exclusive() {
        let spec = OptionSpec::new("x", OptionKind::String)
            .allow_multiple()
            .as_list();
        let err = validate_option(&[], &[], &spec).unwrap_err();
        assert_eq!(err.message(), "Option x cannot be both multiple and a list");
    }

    #[test]
    fn test_flag_list_and_empty_choices_rejected() {
        assert!(validate_option(&[], &[], &OptionSpec::flag("f").as_list()).is_err());
        let empty = OptionSpec::new("c", OptionKind::Choice(Vec::new()));
        assert!(validate_option(&[], &[], &empty).is_err());
    }

    #[test]
    fn test_command_rejects_duplicates() {
        let existing = vec![CommandSpec::new("add")];
        assert!(validate_command(&existing, &CommandSpec::new("add")).is_err());
        assert!(validate_command(&existing, &CommandSpec::new("-x")).is_err());
        assert!(validate_command(&existing, &CommandSpec::new("remove")).is_ok());
    }

    #[test]
    fn test_argument_after_multiple_rejected() {
        let config = ParseConfig::default();
        let existing = vec![ArgumentSpec::new("rest").allow_multiple()];
        let more = ArgumentSpec::new("more").required();
        let err = validate_argument(&existing, &[], &config, &more).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_required_after_optional_rejected() {
        let config = ParseConfig::default();
        let existing = vec![ArgumentSpec::new("opt")];
        let req = ArgumentSpec::new("req").required();
        assert!(validate_argument(&existing, &[], &config, &req).is_err());
        assert!(validate_argument(&existing, &[], &config, &ArgumentSpec::new("opt2")).is_ok());
    }

    #[test]
    fn test_commands_scope_ordering() {
        let config = ParseConfig::default();
        let existing = vec![
            ArgumentSpec::new("first").required(),
            ArgumentSpec::new("addArg").for_command("add"),
        ];
        let remove_req = ArgumentSpec::new("rmArg").for_command("remove").required();
        assert!(validate_argument(&existing, &[], &config, &remove_req).is_ok());

        let add_req = ArgumentSpec::new("addReq").for_command("add").required();
        assert!(validate_argument(&existing, &[], &config, &add_req).is_err());

        let rest = ArgumentSpec::new("other").allow_multiple();
        assert!(validate_argument(&existing, &[], &config, &rest).is_ok());
    }

    #[test]
    fn test_argument_key_collisions_rejected() {
        let config = ParseConfig::default();
        let options = vec![OptionSpec::new("file", OptionKind::String)];

        let file = ArgumentSpec::new("file");
        let err = validate_argument(&[], &options, &config, &file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);

        for reserved in ["command", "arguments"] {
            let spec = ArgumentSpec::new(reserved);
            assert!(validate_argument(&[], &options, &config, &spec).is_err(), "{reserved}");
        }

        let renamed = ArgumentSpec::new("file").with_variable_name("path");
        assert!(validate_argument(&[], &options, &config, &renamed).is_ok());
    }

    #[test]
    fn test_reserved_keys_follow_config() {
        let config = ParseConfig {
            command_result_key: "verb".to_string(),
            ..ParseConfig::default()
        };
        assert!(validate_argument(&[], &[], &config, &ArgumentSpec::new("verb")).is_err());
        assert!(validate_argument(&[], &[], &config, &ArgumentSpec::new("command")).is_ok());
    }

    #[test]
    fn test_option_key_collides_with_argument() {
        let arguments = vec![ArgumentSpec::new("target")];
        let spec = OptionSpec::new("target", OptionKind::String);
        let err = validate_option(&[], &arguments, &spec).unwrap_err();
        assert_eq!(err.message(), "Option target uses the result key of an argument");

        let alias_only = OptionSpec::alias_only('t', OptionKind::String);
        assert!(validate_option(&[], &arguments, &alias_only).is_ok());
    }
}
