//! The parser: schema registry plus the parse entry points.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{self, OptionSlots, Scan};
use crate::error::Result;
use crate::types::ResultValidator;
use crate::validate::{validate_argument, validate_command, validate_option};
use crate::{
    ArgumentSpec, CommandSpec, HelpSection, OptionSpec, ParseConfig, ParseResult, assemble,
};

/// Message used by cross-field validators registered without one.
pub const DEFAULT_VALIDATOR_MESSAGE: &str = "Options are invalid.";

/// Name of the help flag every parser starts with.
pub const HELP_OPTION_NAME: &str = "help";

/// Declarative command-line parser.
///
/// Registration methods take `&mut self` and validate the schema as it
/// grows; parsing takes `&self` and builds all runtime state per call, so the
/// same parser can be used for any number of parse passes.
///
/// # Examples
///
/// ```
/// use argspec_core::*;
///
/// let mut parser = Parser::new();
/// parser
///     .option(OptionSpec::new("string", OptionKind::String).with_alias('s'))?
///     .option(OptionSpec::new("list", OptionKind::Int).as_list())?
///     .command(CommandSpec::new("add"))?
///     .argument(ArgumentSpec::new("file").required())?;
///
/// let result = parser.parse(["-stest", "--list", "1,2,3", "add", "notes.txt"])?;
/// assert_eq!(result.get_str("string"), Some("test"));
/// assert_eq!(result.get("list"), Some(&Value::from(vec![1, 2, 3])));
/// assert_eq!(result.command(), Some("add"));
/// assert_eq!(result.get_str("file"), Some("notes.txt"));
/// # Ok::<(), ParseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    name: Option<String>,
    description: Option<String>,
    version: Option<String>,
    version_key: Option<String>,
    usage: Option<String>,
    options: Vec<OptionSpec>,
    arguments: Vec<ArgumentSpec>,
    commands: Vec<CommandSpec>,
    validators: Vec<ResultValidator>,
    sections: Vec<HelpSection>,
    config: ParseConfig,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Creates a parser with only the `--help`/`-h` flag registered.
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            version: None,
            version_key: None,
            usage: None,
            options: vec![help_option()],
            arguments: Vec::new(),
            commands: Vec::new(),
            validators: Vec::new(),
            sections: Vec::new(),
            config: ParseConfig::default(),
        }
    }

    /// Returns the parser to the state [`Parser::new`] produces.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    /// Returns fresh, unset runtime state for one parse pass.
    pub fn reset_state(&self) -> OptionSlots {
        OptionSlots::new(self.options.len())
    }

    pub fn set_config(&mut self, config: ParseConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn config_mut(&mut self) -> &mut ParseConfig {
        &mut self.config
    }

    /// Sets the program name shown in usage lines.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn set_description(&mut self, description: &str) -> &mut Self {
        self.description = Some(description.to_string());
        self
    }

    /// Replaces the generated usage lines with fixed text.
    pub fn set_usage(&mut self, text: &str) -> &mut Self {
        self.usage = Some(text.to_string());
        self
    }

    /// Sets the program version and registers `--version`/`-v`.
    ///
    /// # Errors
    ///
    /// Fails if `version` or `v` is already taken.
    pub fn set_version(&mut self, version: &str) -> Result<&mut Self> {
        self.set_version_option(
            OptionSpec::flag("version")
                .with_alias('v')
                .with_description("Prints version"),
            version,
        )
    }

    /// Sets the program version with a custom version option.
    pub fn set_version_option(&mut self, spec: OptionSpec, version: &str) -> Result<&mut Self> {
        let spec = if spec.description.is_none() {
            spec.with_description("Prints version")
        } else {
            spec
        };
        let key = spec.key();
        self.option(spec)?;
        self.version = Some(version.to_string());
        self.version_key = Some(key);
        Ok(self)
    }

    /// Adds a titled block to the help output.
    pub fn help_section(&mut self, name: &str, text: &str) -> &mut Self {
        self.sections.push(HelpSection {
            name: name.to_string(),
            text: text.to_string(),
        });
        self
    }

    /// Registers an option.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOption`](crate::ErrorKind::InvalidOption) for a
    /// malformed or conflicting spec, and
    /// [`InvalidValue`](crate::ErrorKind::InvalidValue) when its default
    /// does not coerce (see [`OptionSpec::coerce_default`]).
    pub fn option(&mut self, mut spec: OptionSpec) -> Result<&mut Self> {
        validate_option(&self.options, &self.arguments, &spec)?;
        if let Some(default) = spec.default_value.take() {
            spec.default_value = Some(spec.coerce_default(&default)?);
        }
        debug!(option = %spec.key(), kind = spec.kind.type_name(), "registered option");
        self.options.push(spec);
        Ok(self)
    }

    /// Registers a positional argument.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOption`](crate::ErrorKind::InvalidOption) when the
    /// argument breaks the ordering rules or reuses a result key held by
    /// another argument, an option, or the configured command and extra
    /// arguments keys.
    pub fn argument(&mut self, spec: ArgumentSpec) -> Result<&mut Self> {
        validate_argument(&self.arguments, &self.options, &self.config, &spec)?;
        debug!(argument = %spec.name, "registered argument");
        self.arguments.push(spec);
        Ok(self)
    }

    /// Registers a command.
    pub fn command(&mut self, spec: CommandSpec) -> Result<&mut Self> {
        validate_command(&self.commands, &spec)?;
        debug!(command = %spec.name, "registered command");
        self.commands.push(spec);
        Ok(self)
    }

    /// Registers a validator run against the whole result.
    ///
    /// Validators run in registration order after positional binding; the
    /// first to return `false` fails the parse with `message` (or
    /// [`DEFAULT_VALIDATOR_MESSAGE`]).
    pub fn validate(
        &mut self,
        f: impl Fn(&ParseResult) -> bool + Send + Sync + 'static,
        message: Option<&str>,
    ) -> &mut Self {
        let message = message.unwrap_or(DEFAULT_VALIDATOR_MESSAGE).to_string();
        self.validate_with(move |result| {
            if f(result) {
                Ok(())
            } else {
                Err(message.clone())
            }
        })
    }

    /// Registers a validator that supplies its own failure message.
    pub fn validate_with(
        &mut self,
        f: impl Fn(&ParseResult) -> std::result::Result<(), String> + Send + Sync + 'static,
    ) -> &mut Self {
        self.validators.push(ResultValidator { func: Arc::new(f) });
        self
    }

    /// Walks `args` without assembling a result.
    ///
    /// Exposes the ordered option matches and the command/positional split.
    pub fn scan<I, S>(&self, args: I) -> Result<Scan>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = args.into_iter().map(Into::into).collect();
        engine::scan(self, &argv)
    }

    /// Parses `args` (without the program name).
    ///
    /// # Errors
    ///
    /// Any [`ParseError`](crate::ParseError); the pass stops at the first
    /// failure.
    pub fn parse<I, S>(&self, args: I) -> Result<ParseResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(tokens = argv.len(), "parsing arguments");
        let scan = engine::scan(self, &argv)?;
        assemble::assemble(self, scan)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Result key of the option that requests the version, if one is registered.
    pub fn version_key(&self) -> Option<&str> {
        self.version_key.as_deref()
    }

    pub fn usage_override(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn sections(&self) -> &[HelpSection] {
        &self.sections
    }

    pub fn validators(&self) -> &[ResultValidator] {
        &self.validators
    }

    pub fn parse_config(&self) -> &ParseConfig {
        &self.config
    }
}

fn help_option() -> OptionSpec {
    OptionSpec::flag(HELP_OPTION_NAME)
        .with_alias('h')
        .with_description("Prints help message")
}
