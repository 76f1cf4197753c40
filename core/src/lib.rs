//! Declarative command-line argument parsing.
//!
//! This crate turns a schema into a typed result for an argument vector:
//!
//! - [`OptionSpec`] describes an option (`--name` / `-a`) with a value
//!   [`OptionKind`], list/multiple behaviour, defaults and callbacks.
//! - [`ArgumentSpec`] describes a positional argument.
//! - [`CommandSpec`] describes a command token that selects which options and
//!   arguments apply.
//! - [`Parser`] holds the schema, validates it as it is registered, and
//!   produces a [`ParseResult`] per [`Parser::parse`] call.
//! - [`SchemaDocument`] describes a whole parser as YAML or JSON data.
//!
//! Every failure is a [`ParseError`] tagged with an [`ErrorKind`]. The crate
//! never prints; rendering help and errors is left to the caller.
//!
//! # Example
//!
//! ```
//! use argspec_core::*;
//!
//! let mut parser = Parser::new();
//! parser
//!     .option(OptionSpec::new("int", OptionKind::Int).with_alias('i').with_default(1))?
//!     .option(OptionSpec::flag("verbose").with_alias('v'))?
//!     .option(OptionSpec::new("define", OptionKind::KeyValue).with_alias('D').allow_multiple())?
//!     .argument(ArgumentSpec::new("files").allow_multiple())?;
//!
//! let result = parser.parse(["-v", "-DA=1", "-D", "B = 2", "--int", "42", "a.txt", "b.txt"])?;
//!
//! assert_eq!(result.get_int("int"), Some(42));
//! assert!(result.flag("verbose"));
//! assert_eq!(result.get_map("define").and_then(|m| m.get("B")).map(String::as_str), Some("2"));
//! assert_eq!(result.get_list("files").map(<[Value]>::len), Some(2));
//! # Ok::<(), ParseError>(())
//! ```

mod assemble;
mod coerce;
mod config;
mod document;
mod engine;
mod error;
mod parser;
mod result;
mod types;
mod validate;
mod value;

pub use config::*;
pub use document::{
    ArgumentDocument, CommandDocument, OptionDocument, SchemaDocument, SectionDocument,
};
pub use engine::{OptionMatch, OptionSlots, Scan};
pub use error::{ErrorKind, ParseError, Result};
pub use parser::{DEFAULT_VALIDATOR_MESSAGE, HELP_OPTION_NAME, Parser};
pub use result::ParseResult;
pub use types::*;
pub use value::{DATE_DISPLAY_FORMAT, Value};
