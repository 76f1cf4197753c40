//! Declarative schema documents.
//!
//! A [`SchemaDocument`] describes a whole parser as data so it can live in a
//! YAML or JSON file. [`SchemaDocument::build`] registers every element
//! through the regular [`Parser`] calls, so documents are held to the same
//! validation rules as code. Callbacks cannot be expressed in a document.
//!
//! # Example YAML
//!
//! ```yaml
//! name: deploy
//! version: 1.2.0
//! description: Ship a build to an environment
//! config:
//!   allow_trailing_options: true
//! options:
//!   - name: env
//!     alias: e
//!     type: options
//!     choices: [staging, production]
//!     required: true
//!   - name: tag
//!     type: keyValue
//!     multiple: true
//! commands:
//!   - name: push
//!     description: Upload the build
//! arguments:
//!   - name: artifact
//!     required: true
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParseError, Result};
use crate::{
    ArgumentSpec, CommandSpec, OptionKind, OptionSpec, ParseConfig, Parser, Value,
    types::DEFAULT_DELIMITER,
};

/// A parser described as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaDocument {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Program version; registers `--version`/`-v` when present.
    pub version: Option<String>,
    /// Fixed usage text replacing the generated lines.
    pub usage: Option<String>,
    pub config: ParseConfig,
    pub options: Vec<OptionDocument>,
    pub commands: Vec<CommandDocument>,
    pub arguments: Vec<ArgumentDocument>,
    pub sections: Vec<SectionDocument>,
}

/// An option entry in a [`SchemaDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, alias = "variableName")]
    pub variable_name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub list: bool,
    #[serde(default, alias = "deliminator")]
    pub delimiter: Option<String>,
    /// Default value, written as it would appear on the command line.
    #[serde(default, alias = "defaultValue")]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub command: Option<String>,
    /// Allowed values for `options`/`choice` kinds.
    #[serde(default, alias = "options")]
    pub choices: Vec<String>,
    /// chrono format string for `date` kinds.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default, alias = "validateMessage")]
    pub validate_message: Option<String>,
}

/// A command entry in a [`SchemaDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A positional argument entry in a [`SchemaDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDocument {
    pub name: String,
    #[serde(default, alias = "variableName")]
    pub variable_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, alias = "defaultValue")]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub command: Option<String>,
}

/// An extra help section in a [`SchemaDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDocument {
    pub name: String,
    pub text: String,
}

impl SchemaDocument {
    /// Builds a parser from this document.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOption`](crate::ErrorKind::InvalidOption) for unknown
    /// types, malformed aliases and any registration rule violation, and
    /// [`InvalidValue`](crate::ErrorKind::InvalidValue) for defaults that do
    /// not coerce.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::SchemaDocument;
    ///
    /// let doc: SchemaDocument = serde_json::from_str(r#"{
    ///     "name": "demo",
    ///     "options": [{ "name": "count", "alias": "c", "type": "int", "default": 3 }]
    /// }"#).unwrap();
    ///
    /// let parser = doc.build().unwrap();
    /// assert_eq!(parser.parse(["-c", "5"]).unwrap().get_int("count"), Some(5));
    /// assert_eq!(parser.parse(Vec::<String>::new()).unwrap().get_int("count"), Some(3));
    /// ```
    pub fn build(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser.set_config(self.config.clone());

        if let Some(name) = &self.name {
            parser.set_name(name);
        }
        if let Some(description) = &self.description {
            parser.set_description(description);
        }
        if let Some(usage) = &self.usage {
            parser.set_usage(usage);
        }
        if let Some(version) = &self.version {
            parser.set_version(version)?;
        }

        for option in &self.options {
            parser.option(option.to_spec()?)?;
        }
        for command in &self.commands {
            let mut spec = CommandSpec::new(&command.name);
            spec.description = command.description.clone();
            parser.command(spec)?;
        }
        for argument in &self.arguments {
            parser.argument(argument.to_spec()?)?;
        }
        for section in &self.sections {
            parser.help_section(&section.name, &section.text);
        }

        debug!(
            options = parser.options().len(),
            commands = parser.commands().len(),
            arguments = parser.arguments().len(),
            "built parser from schema document"
        );
        Ok(parser)
    }
}

impl OptionDocument {
    fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.alias.clone())
            .unwrap_or_default()
    }

    fn to_kind(&self) -> Result<OptionKind> {
        let kind = match self.kind.as_str() {
            "string" => OptionKind::String,
            "int" => OptionKind::Int,
            "float" | "number" => OptionKind::Float,
            "boolean" | "bool" | "flag" => OptionKind::Flag,
            "options" | "choice" => OptionKind::Choice(self.choices.clone()),
            "keyValue" => OptionKind::KeyValue,
            "date" => OptionKind::Date {
                format: self.format.clone(),
                strict: self.strict,
            },
            other => {
                return Err(ParseError::invalid_option(format!(
                    "Invalid type ({other}) for option {}",
                    self.label()
                )));
            }
        };
        Ok(kind)
    }

    fn to_alias(&self) -> Result<Option<char>> {
        let Some(alias) = &self.alias else {
            return Ok(None);
        };
        let mut chars = alias.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Some(c)),
            _ => Err(ParseError::invalid_option(format!(
                "Alias '{alias}' for option {} must be a single character",
                self.label()
            ))),
        }
    }

    /// Converts this entry into an [`OptionSpec`], coercing its default.
    pub fn to_spec(&self) -> Result<OptionSpec> {
        let mut spec =
            OptionSpec::from_parts(self.name.as_deref(), self.to_alias()?, self.to_kind()?);
        spec.description = self.description.clone();
        spec.group = self.group.clone();
        spec.variable_name = self.variable_name.clone();
        spec.required = self.required;
        spec.multiple = self.multiple;
        spec.list = self.list;
        spec.delimiter = self
            .delimiter
            .clone()
            .unwrap_or_else(|| DEFAULT_DELIMITER.to_string());
        spec.command = self.command.clone();
        spec.validate_message = self.validate_message.clone();

        if let Some(default) = &self.default {
            spec.default_value = Some(option_default(&spec, default)?);
        }
        Ok(spec)
    }
}

impl ArgumentDocument {
    /// Converts this entry into an [`ArgumentSpec`].
    pub fn to_spec(&self) -> Result<ArgumentSpec> {
        let mut spec = ArgumentSpec::new(&self.name);
        if let Some(variable_name) = &self.variable_name {
            spec.variable_name = variable_name.clone();
        }
        spec.description = self.description.clone();
        spec.required = self.required;
        spec.multiple = self.multiple;
        spec.command = self.command.clone();

        if let Some(default) = &self.default {
            spec.default_value = Some(match default {
                serde_json::Value::Array(items) => Value::List(
                    items
                        .iter()
                        .map(|item| scalar_text(item).map(Value::String))
                        .collect::<Result<_>>()?,
                ),
                other => Value::String(scalar_text(other)?),
            });
        }
        Ok(spec)
    }
}

/// Converts a document default into the raw form
/// [`OptionSpec::coerce_default`] takes.
///
/// Lists and repeatable options take either an array (one element per
/// value) or a single delimiter-joined string.
fn option_default(spec: &OptionSpec, default: &serde_json::Value) -> Result<Value> {
    let raw = match default {
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Array(items) => Value::List(
            items
                .iter()
                .map(|item| scalar_text(item).map(Value::String))
                .collect::<Result<_>>()?,
        ),
        other => Value::String(scalar_text(other)?),
    };
    spec.coerce_default(&raw)
}

fn scalar_text(value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(ParseError::invalid_value(format!(
            "Unsupported default value {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn from_yaml(yaml: &str) -> SchemaDocument {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_build_full_document() {
        let doc = from_yaml(
            r#"
name: deploy
version: 1.2.0
config:
  allow_trailing_options: true
options:
  - name: env
    alias: e
    type: options
    choices: [staging, production]
    required: true
  - name: tag
    type: keyValue
    multiple: true
commands:
  - name: push
arguments:
  - name: artifact
    required: true
sections:
  - name: Author
    text: Release team
"#,
        );
        let parser = doc.build().unwrap();
        assert_eq!(parser.name(), Some("deploy"));
        assert_eq!(parser.version(), Some("1.2.0"));
        assert_eq!(parser.sections().len(), 1);

        let result = parser
            .parse(["push", "build.tar", "-e", "staging", "--tag", "a=1", "--tag", "b=2"])
            .unwrap();
        assert_eq!(result.get_str("env"), Some("staging"));
        assert_eq!(result.get_str("artifact"), Some("build.tar"));
        assert_eq!(result.get_map("tag").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_type_spellings() {
        for (name, expected) in [
            ("number", "float"),
            ("bool", "boolean"),
            ("flag", "boolean"),
            ("choice", "options"),
        ] {
            let doc = OptionDocument {
                choices: vec!["a".to_string()],
                ..option_doc("x", name)
            };
            assert_eq!(doc.to_spec().unwrap().kind.type_name(), expected);
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = option_doc("x", "moment").to_spec().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
        assert_eq!(err.message(), "Invalid type (moment) for option x");
    }

    #[test]
    fn test_alias_must_be_one_char() {
        let doc = OptionDocument {
            alias: Some("ab".to_string()),
            ..option_doc("x", "string")
        };
        assert_eq!(doc.to_spec().unwrap_err().kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_defaults_are_coerced() {
        let doc = OptionDocument {
            list: true,
            default: Some(serde_json::json!("1,2,3")),
            ..option_doc("list", "int")
        };
        assert_eq!(
            doc.to_spec().unwrap().default_value,
            Some(Value::from(vec![1, 2, 3]))
        );

        let doc = OptionDocument {
            default: Some(serde_json::json!("abc")),
            ..option_doc("n", "int")
        };
        assert_eq!(doc.to_spec().unwrap_err().kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_flag_default_must_be_bool() {
        let doc = OptionDocument {
            default: Some(serde_json::json!(true)),
            ..option_doc("f", "flag")
        };
        assert_eq!(doc.to_spec().unwrap().default_value, Some(Value::Bool(true)));

        let doc = OptionDocument {
            default: Some(serde_json::json!("yes")),
            ..option_doc("f", "flag")
        };
        assert!(doc.to_spec().is_err());
    }

    #[test]
    fn test_argument_ordering_enforced() {
        let doc = from_yaml(
            r#"
arguments:
  - name: rest
    multiple: true
  - name: last
"#,
        );
        assert_eq!(doc.build().unwrap_err().kind(), ErrorKind::InvalidOption);
    }

    fn option_doc(name: &str, kind: &str) -> OptionDocument {
        OptionDocument {
            name: Some(name.to_string()),
            alias: None,
            kind: kind.to_string(),
            description: None,
            group: None,
            variable_name: None,
            required: false,
            multiple: false,
            list: false,
            delimiter: None,
            default: None,
            command: None,
            choices: Vec::new(),
            format: None,
            strict: false,
            validate_message: None,
        }
    }
}
