//! Commands example.
//!
//! A small to-do tool with `add`, `done` and `list` commands, command-bound
//! options and arguments, and a cross-field validator.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argspec-demos --example commands -- add "water plants" --due 2024-06-01
//! cargo run -p argspec-demos --example commands -- done 3
//! cargo run -p argspec-demos --example commands -- list --limit 5 --all
//! ```

use argspec_core::{ArgumentSpec, CommandSpec, OptionKind, OptionSpec, ParseError, Parser};
use argspec_help::process_env;

fn build() -> Result<Parser, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_name("todo")
        .set_description("Keeps a to-do list.")
        .help_section("Examples", "todo add \"water plants\" --due 2024-06-01\ntodo done 3");
    parser.config_mut().command_required = true;
    parser.config_mut().allow_trailing_options = true;

    parser
        .command(CommandSpec::new("add").with_description("Adds an item"))?
        .command(CommandSpec::new("done").with_description("Marks an item as done"))?
        .command(CommandSpec::new("list").with_description("Lists items"))?
        .option(
            OptionSpec::new("due", OptionKind::date())
                .for_command("add")
                .with_description("Due date"),
        )?
        .option(
            OptionSpec::new("limit", OptionKind::Int)
                .for_command("list")
                .with_description("Show at most this many items"),
        )?
        .option(
            OptionSpec::flag("all")
                .with_alias('a')
                .for_command("list")
                .with_description("Include finished items"),
        )?
        .argument(ArgumentSpec::new("text").for_command("add").required())?
        .argument(
            ArgumentSpec::new("id")
                .for_command("done")
                .required()
                .with_check(|v| match v.as_str().map(str::parse::<u32>) {
                    Some(Ok(_)) => Ok(()),
                    _ => Err(format!("item id must be a number, got {v}")),
                }),
        )?;

    parser.validate(
        |r| r.get_int("limit").is_none_or(|n| n > 0),
        Some("--limit must be positive"),
    );
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

    match process_env(&parser) {
        Ok(outcome) => {
            if let Some(result) = outcome.into_result() {
                println!("{:#}", result.to_json());
            }
        }
        Err(err) => {
            eprintln!("I/O error: {err}");
            std::process::exit(1);
        }
    }
}
