//! Error type for the `argspec` binary.

use std::path::PathBuf;

use argspec_core::ParseError;
use thiserror::Error;

/// Exit status for arguments rejected by a schema.
pub const EXIT_REJECTED: i32 = 2;

/// Exit status for every other failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum CliError {
    /// Writing to stdout or stderr failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}' as JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse '{}' as YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but does not describe a valid parser.
    #[error("invalid schema '{}': {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Result serialization failed.
    #[error("failed to serialize result: {0}")]
    Output(String),

    /// The arguments did not satisfy the schema. The error block has already
    /// been written to stderr.
    #[error("{0}")]
    Rejected(ParseError),

    #[error("{0} schema file(s) failed validation")]
    InvalidSchemas(usize),

    #[error("no schema files found in {}", .0.display())]
    NoSchemas(PathBuf),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Rejected(_) => EXIT_REJECTED,
            _ => EXIT_FAILURE,
        }
    }

    /// Returns `false` when the failure was already reported.
    pub fn needs_report(&self) -> bool {
        !matches!(self, CliError::Rejected(_))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
