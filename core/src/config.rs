//! Per-parser configuration.
//!
//! Every field has a default, so a partial `config:` block in a schema
//! document only overrides what it names.
//!
//! # Example YAML
//!
//! ```yaml
//! allow_trailing_options: true
//! allow_extra_arguments: false
//! command_result_key: command
//! extra_arguments_result_key: arguments
//! command_required: false
//! ```

use serde::{Deserialize, Serialize};

/// Default result key for the matched command.
pub const DEFAULT_COMMAND_KEY: &str = "command";
/// Default result key for extra positional tokens.
pub const DEFAULT_EXTRA_ARGUMENTS_KEY: &str = "arguments";

/// Parse behaviour switches.
///
/// # Examples
///
/// ```
/// use argspec_core::ParseConfig;
///
/// let config = ParseConfig::default();
/// assert!(!config.allow_trailing_options);
/// assert_eq!(config.command_result_key, "command");
///
/// let camel: ParseConfig = serde_json::from_str(r#"{"allowExtraArguments": true}"#).unwrap();
/// assert!(camel.allow_extra_arguments);
/// assert_eq!(camel.extra_arguments_result_key, "arguments");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Keep recognising options after the first positional token.
    #[serde(alias = "allowTrailingOptions")]
    pub allow_trailing_options: bool,
    /// Collect positional tokens beyond the declared arguments instead of
    /// failing.
    #[serde(alias = "allowExtraArguments")]
    pub allow_extra_arguments: bool,
    /// Result key holding the matched command name.
    #[serde(alias = "commandVariableName")]
    pub command_result_key: String,
    /// Result key holding extra positional tokens.
    #[serde(alias = "argumentsVariableName")]
    pub extra_arguments_result_key: String,
    /// Fail when commands are registered but none was given.
    #[serde(alias = "commandRequired")]
    pub command_required: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            allow_trailing_options: false,
            allow_extra_arguments: false,
            command_result_key: DEFAULT_COMMAND_KEY.to_string(),
            extra_arguments_result_key: DEFAULT_EXTRA_ARGUMENTS_KEY.to_string(),
            command_required: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ParseConfig = serde_yaml::from_str("allow_trailing_options: true\n").unwrap();
        assert!(config.allow_trailing_options);
        assert!(!config.allow_extra_arguments);
        assert_eq!(config.command_result_key, DEFAULT_COMMAND_KEY);
    }

    #[test]
    fn test_camel_case_aliases() {
        let config: ParseConfig =
            serde_yaml::from_str("commandVariableName: cmd\nargumentsVariableName: rest\n")
                .unwrap();
        assert_eq!(config.command_result_key, "cmd");
        assert_eq!(config.extra_arguments_result_key, "rest");
    }
}
