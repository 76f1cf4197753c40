//! Error types for schema registration and argument parsing.
//!
//! Every failure in this crate is a [`ParseError`]: a closed [`ErrorKind`]
//! discriminator plus a human-readable message. Errors abort the current
//! registration call or parse pass; there are never partial results.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Failure category carried by every [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A token references an option name or alias that is not registered.
    UnknownOption,
    /// Structural misuse of the schema or of the argument grammar.
    InvalidOption,
    /// A value failed coercion or validation, or something required is missing.
    InvalidValue,
    /// A non-repeatable option was given more than once.
    DuplicateValue,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnknownOption => "unknown option",
            Self::InvalidOption => "invalid option",
            Self::InvalidValue => "invalid value",
            Self::DuplicateValue => "duplicate value",
        };
        f.write_str(name)
    }
}

/// Error returned by registration and parse calls.
///
/// # Examples
///
/// ```
/// use argspec_core::{ErrorKind, ParseError};
///
/// let err = ParseError::unknown_option("Option --nope not found.");
/// assert_eq!(err.kind(), ErrorKind::UnknownOption);
/// assert_eq!(err.to_string(), "Option --nope not found.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
}

impl ParseError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_option(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownOption, message)
    }

    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOption, message)
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }

    pub fn duplicate_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateValue, message)
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message_only() {
        let err = ParseError::invalid_value("Option int is required.");
        assert_eq!(err.to_string(), "Option int is required.");
        assert_eq!(err.kind().to_string(), "invalid value");
    }

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(
            ParseError::invalid_option("x").kind(),
            ErrorKind::InvalidOption
        );
        assert_eq!(
            ParseError::duplicate_value("x").kind(),
            ErrorKind::DuplicateValue
        );
    }
}
