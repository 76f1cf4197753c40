//! Result assembly: option values, command, positional bindings and
//! cross-field validation.

use std::collections::VecDeque;

use tracing::debug;

use crate::engine::Scan;
use crate::error::{ParseError, Result};
use crate::{OptionKind, ParseResult, Parser, Value};

pub(crate) fn assemble(parser: &Parser, scan: Scan) -> Result<ParseResult> {
    let config = parser.parse_config();
    let command = scan.command.map(|i| parser.commands()[i].name.as_str());
    let mut result = ParseResult::default();

    for (index, spec) in parser.options().iter().enumerate() {
        match scan.slots.value(index) {
            Some(value) => result.insert(spec.key(), value.clone()),
            None if matches!(spec.kind, OptionKind::Flag) && spec.applies_to(command) => {
                result.insert(spec.key(), Value::Bool(false));
            }
            None => {}
        }
    }

    if let Some(name) = command {
        result.set_command(&config.command_result_key, name);
    }

    let mut tokens: VecDeque<String> = scan.positionals.into();
    for spec in parser.arguments().iter().filter(|a| a.applies_to(command)) {
        let value = if tokens.is_empty() {
            if let Some(default) = &spec.default_value {
                Some(default.clone())
            } else if spec.required {
                return Err(ParseError::invalid_value(format!(
                    "No argument given for argument {}",
                    spec.name
                )));
            } else if spec.multiple {
                Some(Value::List(Vec::new()))
            } else {
                None
            }
        } else if spec.multiple {
            Some(Value::List(tokens.drain(..).map(Value::String).collect()))
        } else {
            tokens.pop_front().map(Value::String)
        };

        let Some(value) = value else {
            continue;
        };
        if let Some(validate) = &spec.validate_fn {
            if !validate(&value) {
                return Err(ParseError::invalid_value(format!(
                    "Invalid value ({value}) for argument {}",
                    spec.name
                )));
            }
        }
        if let Some(check) = &spec.check_fn {
            check(&value).map_err(ParseError::invalid_value)?;
        }
        result.insert(spec.variable_name.clone(), value);
    }

    if !tokens.is_empty() {
        if !config.allow_extra_arguments {
            let extra: Vec<String> = tokens.into_iter().collect();
            return Err(ParseError::invalid_value(format!(
                "Extra arguments ({}) found.",
                extra.join(",")
            )));
        }
        debug!(count = tokens.len(), "collecting extra arguments");
        result.insert(
            config.extra_arguments_result_key.clone(),
            Value::List(tokens.into_iter().map(Value::String).collect()),
        );
    }

    for validator in parser.validators() {
        validator.check(&result).map_err(ParseError::invalid_value)?;
    }

    Ok(result)
}
