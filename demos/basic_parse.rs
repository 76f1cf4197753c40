//! Basic parsing example.
//!
//! Builds a parser in code and parses the program's own arguments.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argspec-demos --example basic_parse -- -v --list 1,2,3 -DA=1 a.txt b.txt
//! cargo run -p argspec-demos --example basic_parse -- --help
//! ```

use argspec_core::{ArgumentSpec, OptionKind, OptionSpec, ParseError, Parser, Value};
use argspec_help::process_env;

fn build() -> Result<Parser, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_name("basic_parse")
        .set_description("Shows how options, lists and positional arguments are parsed.");
    parser
        .set_version(env!("CARGO_PKG_VERSION"))?
        .option(
            OptionSpec::flag("verbose")
                .with_alias('V')
                .allow_multiple()
                .with_description("More output; repeat for even more"),
        )?
        .option(
            OptionSpec::new("list", OptionKind::Int)
                .with_alias('l')
                .as_list()
                .with_description("Comma-separated numbers"),
        )?
        .option(
            OptionSpec::new("define", OptionKind::KeyValue)
                .with_alias('D')
                .allow_multiple()
                .with_variable_name("key=value")
                .with_description("Define a variable"),
        )?
        .option(
            OptionSpec::new("level", OptionKind::Int)
                .with_default(1)
                .with_validator(|v| v.as_int().is_some_and(|n| (0..=9).contains(&n)))
                .with_validate_message("level must be between 0 and 9"),
        )?
        .argument(ArgumentSpec::new("files").allow_multiple())?;
    Ok(parser)
}

fn main() {
    let parser = match build() {
        Ok(parser) => parser,
        Err(err) => {
            eprintln!("invalid parser: {err}");
            std::process::exit(1);
        }
    };

    let result = match process_env(&parser) {
        Ok(outcome) => outcome.into_result(),
        Err(err) => {
            eprintln!("I/O error: {err}");
            std::process::exit(1);
        }
    };
    let Some(result) = result else {
        return;
    };

    let verbosity = result.get_list("verbose").map_or(0, <[Value]>::len);
    println!("verbosity: {verbosity}");
    println!("level:     {}", result.get_int("level").unwrap_or_default());
    if let Some(list) = result.get_list("list") {
        let sum: i64 = list.iter().filter_map(Value::as_int).sum();
        println!("list sum:  {sum}");
    }
    if let Some(defines) = result.get_map("define") {
        for (key, value) in defines {
            println!("define:    {key} = {value}");
        }
    }
    for file in result.get_list("files").unwrap_or_default() {
        println!("file:      {file}");
    }
}
