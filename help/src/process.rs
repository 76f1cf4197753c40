//! Parse-and-respond glue for programs.

use std::io::{self, Write};

use argspec_core::{HELP_OPTION_NAME, ParseError, ParseResult, Parser};
use tracing::debug;

use crate::render::write_help;

/// What [`process`] did with the arguments.
#[derive(Debug)]
pub enum Processed {
    /// Parsing succeeded and no help or version was requested.
    Parsed(ParseResult),
    /// Help was requested and written to the output sink.
    Help,
    /// The version was requested and written to the output sink.
    Version,
    /// Parsing failed; the error and help were written to the error sink.
    Failed(ParseError),
}

impl Processed {
    /// Returns the parse result when the program should go on running.
    pub fn into_result(self) -> Option<ParseResult> {
        match self {
            Processed::Parsed(result) => Some(result),
            _ => None,
        }
    }
}

/// Parses `args` and handles the standard outcomes.
///
/// - version requested: writes the version and a newline to `out`;
/// - help requested: writes the help text to `out`;
/// - parse failure: writes `Error:`, the indented message, a blank line and
///   the help text to `err`.
///
/// The version check wins over help when both are given.
///
/// # Errors
///
/// Only I/O errors from the sinks; parse failures are reported through
/// [`Processed::Failed`].
///
/// # Examples
///
/// ```
/// use argspec_core::Parser;
/// use argspec_help::{Processed, process};
///
/// let mut parser = Parser::new();
/// parser.set_version("1.4.0").unwrap();
///
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let outcome = process(&parser, ["--version"], &mut out, &mut err).unwrap();
/// assert!(matches!(outcome, Processed::Version));
/// assert_eq!(out, b"1.4.0\n");
/// ```
pub fn process<I, S, W, E>(
    parser: &Parser,
    args: I,
    out: &mut W,
    err: &mut E,
) -> io::Result<Processed>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    let result = match parser.parse(args) {
        Ok(result) => result,
        Err(error) => {
            debug!(kind = %error.kind(), %error, "parse failed");
            write!(err, "Error:\n  {}\n\n", error.message())?;
            write_help(parser, err)?;
            return Ok(Processed::Failed(error));
        }
    };

    if let (Some(key), Some(version)) = (parser.version_key(), parser.version()) {
        if result.flag(key) {
            writeln!(out, "{version}")?;
            return Ok(Processed::Version);
        }
    }

    if result.flag(HELP_OPTION_NAME) {
        write_help(parser, out)?;
        return Ok(Processed::Help);
    }

    Ok(Processed::Parsed(result))
}

/// Runs [`process`] on the program's own arguments with stdout and stderr.
pub fn process_env(parser: &Parser) -> io::Result<Processed> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    process(
        parser,
        std::env::args().skip(1),
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
}
