use argspec_core::{ArgumentSpec, CommandSpec, OptionKind, OptionSpec, Parser};
use argspec_help::{MAX_WIDTH, Processed, process, render_help};

fn notes_parser() -> Parser {
    let mut parser = Parser::new();
    parser
        .set_name("notes")
        .set_description("Keeps short notes in a file.")
        .help_section("Author", "Someone");
    parser
        .set_version("1.0.0")
        .unwrap()
        .command(CommandSpec::new("add").with_description("Adds a note"))
        .unwrap()
        .command(CommandSpec::new("list").with_description("Lists notes"))
        .unwrap()
        .option(
            OptionSpec::new("tag", OptionKind::String)
                .with_alias('t')
                .with_description("Tag to apply"),
        )
        .unwrap()
        .option(
            OptionSpec::new("limit", OptionKind::Int)
                .for_command("list")
                .with_description("Maximum notes shown"),
        )
        .unwrap()
        .argument(ArgumentSpec::new("text").for_command("add").required())
        .unwrap();
    parser
}

fn run(parser: &Parser, args: &[&str]) -> (Processed, String, String) {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = process(parser, args.iter().copied(), &mut out, &mut err).unwrap();
    (
        outcome,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_full_help_layout() {
    let expected = concat!(
        "Keeps short notes in a file.\n",
        "\n",
        "Usage:\n",
        "  notes [options]\n",
        "  notes add [options] <text>\n",
        "  notes list [options]\n",
        "\n",
        "Commands:\n",
        "  add   Adds a note\n",
        "  list  Lists notes\n",
        "\n",
        "Options:\n",
        "  -h, --help          Prints help message\n",
        "  -v, --version       Prints version\n",
        "  -t, --tag <string>  Tag to apply\n",
        "\n",
        "list Options:\n",
        "  --limit <int>  Maximum notes shown\n",
        "\n",
        "Author:\n",
        "  Someone\n",
    );
    assert_eq!(render_help(&notes_parser()), expected);
}

#[test]
fn test_help_lines_fit_width() {
    let mut parser = Parser::new();
    parser
        .set_name("wide")
        .set_description(&"A long description that keeps going. ".repeat(8));
    parser
        .option(
            OptionSpec::new("option-with-a-long-name", OptionKind::String)
                .with_description(&"explains the option at length ".repeat(6)),
        )
        .unwrap();

    for line in render_help(&parser).lines() {
        assert!(line.chars().count() <= MAX_WIDTH, "line too long: {line:?}");
    }
}

#[test]
fn test_variable_name_placeholder() {
    let mut parser = Parser::new();
    parser
        .option(
            OptionSpec::new("define", OptionKind::KeyValue)
                .with_alias('D')
                .with_variable_name("key=value")
                .required(),
        )
        .unwrap();
    let help = render_help(&parser);
    assert!(help.contains("Usage:\n  (--define|-D) <key=value> [options]\n"));
    assert!(help.contains("-D, --define <key=value>"));
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

#[test]
fn test_process_returns_result() {
    let (outcome, out, err) = run(&notes_parser(), &["add", "-t", "work", "call bob"]);
    let result = outcome.into_result().unwrap();
    assert_eq!(result.command(), Some("add"));
    assert_eq!(result.get_str("text"), Some("call bob"));
    assert!(out.is_empty());
    assert!(err.is_empty());
}

#[test]
fn test_process_help() {
    let parser = notes_parser();
    let (outcome, out, err) = run(&parser, &["-h"]);
    assert!(matches!(outcome, Processed::Help));
    assert_eq!(out, render_help(&parser));
    assert!(err.is_empty());
}

#[test]
fn test_process_version_wins_over_help() {
    let (outcome, out, _) = run(&notes_parser(), &["-hv"]);
    assert!(matches!(outcome, Processed::Version));
    assert_eq!(out, "1.0.0\n");
}

#[test]
fn test_process_error_block() {
    let parser = notes_parser();
    let (outcome, out, err) = run(&parser, &["list", "--limit", "many"]);

    let Processed::Failed(error) = outcome else {
        panic!("expected a failure");
    };
    assert_eq!(
        error.message(),
        "Value (many) for option limit is not an integer."
    );
    assert!(out.is_empty());
    assert_eq!(
        err,
        format!(
            "Error:\n  {}\n\n{}",
            error.message(),
            render_help(&parser)
        )
    );
}
