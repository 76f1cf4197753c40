//! Help output and process glue for [`argspec_core`] parsers.
//!
//! - [`render_help`] / [`write_help`] produce the full help text: description,
//!   usage lines, commands, grouped options and extra sections, wrapped at 80
//!   columns.
//! - [`render_usage`] produces only the `Usage:` block.
//! - [`process`] parses arguments and answers `--version`, `--help` and parse
//!   failures the way command-line programs usually do.
//!
//! # Example
//!
//! ```
//! use argspec_core::{CommandSpec, OptionKind, OptionSpec, Parser};
//! use argspec_help::{Processed, process};
//!
//! let mut parser = Parser::new();
//! parser.set_name("notes");
//! parser.command(CommandSpec::new("add").with_description("Adds a note")).unwrap();
//! parser.option(OptionSpec::new("tag", OptionKind::String).with_alias('t')).unwrap();
//!
//! let (mut out, mut err) = (Vec::new(), Vec::new());
//! let outcome = process(&parser, ["--bogus"], &mut out, &mut err).unwrap();
//!
//! assert!(matches!(outcome, Processed::Failed(_)));
//! let err = String::from_utf8(err).unwrap();
//! assert!(err.starts_with("Error:\n  Option bogus not found.\n\nUsage:\n"));
//! assert!(err.contains("Commands:\n  add  Adds a note\n"));
//! ```

mod layout;
mod process;
mod render;

pub use layout::{MAX_WIDTH, wrap};
pub use process::{Processed, process, process_env};
pub use render::{option_text, render_help, render_usage, usage_lines, write_help};
