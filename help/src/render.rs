//! Help and usage rendering.
//!
//! Help text is made of blocks separated by blank lines: the description,
//! `Usage:`, `Commands:`, one block per option group and one per extra help
//! section. Everything is wrapped to [`MAX_WIDTH`] columns.

use std::io::{self, Write};

use argspec_core::{ArgumentSpec, OptionSpec, Parser};

use crate::layout::{MAX_WIDTH, hanging, indented, two_columns};

/// Which options and arguments a usage line covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope<'a> {
    /// Everything, with a `<command>` placeholder when commands exist.
    Any,
    /// Only what applies without a command.
    Unbound,
    /// What applies to one command.
    Command(&'a str),
}

impl Scope<'_> {
    fn includes(&self, bound: Option<&str>) -> bool {
        match self {
            Scope::Any => true,
            Scope::Unbound => bound.is_none(),
            Scope::Command(name) => bound.is_none_or(|b| b == *name),
        }
    }
}

/// Renders the complete help text.
///
/// # Examples
///
/// ```
/// use argspec_core::{OptionKind, OptionSpec, Parser};
/// use argspec_help::render_help;
///
/// let mut parser = Parser::new();
/// parser.set_name("tool");
/// parser.option(OptionSpec::new("int", OptionKind::Int).with_alias('i')).unwrap();
///
/// let help = render_help(&parser);
/// assert!(help.starts_with("Usage:\n  tool [options]\n"));
/// assert!(help.contains("-i, --int <int>"));
/// ```
pub fn render_help(parser: &Parser) -> String {
    let mut blocks = Vec::new();

    if let Some(description) = parser.description() {
        blocks.push(indented(description, 0, MAX_WIDTH));
    }
    blocks.push(render_usage(parser));
    if !parser.commands().is_empty() {
        blocks.push(commands_block(parser));
    }
    blocks.extend(option_blocks(parser));
    for section in parser.sections() {
        blocks.push(format!(
            "{}:\n{}",
            section.name,
            indented(&section.text, 2, MAX_WIDTH)
        ));
    }

    blocks.join("\n")
}

/// Writes [`render_help`] output to `out`.
pub fn write_help<W: Write + ?Sized>(parser: &Parser, out: &mut W) -> io::Result<()> {
    out.write_all(render_help(parser).as_bytes())
}

/// Renders the `Usage:` block.
///
/// A fixed usage text set with [`Parser::set_usage`] replaces the generated
/// lines. Otherwise there is one line per command when any required option
/// or any argument is bound to a command, and a single line when not.
pub fn render_usage(parser: &Parser) -> String {
    let mut out = String::from("Usage:\n");

    if let Some(text) = parser.usage_override() {
        out.push_str(&indented(text, 2, MAX_WIDTH));
        return out;
    }

    let name = parser.name().unwrap_or_default();
    for line in usage_lines(parser) {
        let head = if name.is_empty() {
            String::from(" ")
        } else {
            format!("  {name}")
        };
        out.push_str(&hanging(&head, &line, MAX_WIDTH));
    }
    out
}

/// Returns the generated usage lines without the program name.
pub fn usage_lines(parser: &Parser) -> Vec<String> {
    let command_specific = parser
        .options()
        .iter()
        .any(|o| o.required && o.command.is_some())
        || parser.arguments().iter().any(|a| a.command.is_some());

    if !command_specific {
        return vec![usage_line(parser, Scope::Any)];
    }

    let mut lines = Vec::new();
    let unbound = usage_line(parser, Scope::Unbound);
    if !unbound.is_empty() {
        lines.push(unbound);
    }
    for command in parser.commands() {
        lines.push(usage_line(parser, Scope::Command(&command.name)));
    }
    lines
}

fn usage_line(parser: &Parser, scope: Scope<'_>) -> String {
    let mut parts = Vec::new();
    match scope {
        Scope::Any if !parser.commands().is_empty() => parts.push("<command>".to_string()),
        Scope::Command(name) => parts.push(name.to_string()),
        _ => {}
    }

    let mut more = false;
    for option in parser
        .options()
        .iter()
        .filter(|o| scope.includes(o.command.as_deref()))
    {
        if option.required {
            parts.push(required_option_usage(option));
        } else {
            more = true;
        }
    }
    if more {
        parts.push("[options]".to_string());
    }

    parts.extend(
        parser
            .arguments()
            .iter()
            .filter(|a| scope.includes(a.command.as_deref()))
            .map(argument_usage),
    );
    parts.join(" ")
}

fn required_option_usage(option: &OptionSpec) -> String {
    let mut text = match (&option.name, option.alias) {
        (Some(name), Some(alias)) => format!("(--{name}|-{alias})"),
        (Some(name), None) => format!("--{name}"),
        (None, Some(alias)) => format!("-{alias}"),
        (None, None) => String::new(),
    };
    if option.takes_value() {
        text.push_str(&format!(" <{}>", option.placeholder()));
    }
    text
}

fn argument_usage(argument: &ArgumentSpec) -> String {
    let var = &argument.variable_name;
    match (argument.required, argument.multiple) {
        (true, false) => format!("<{var}>"),
        (true, true) => format!("<{var}>..."),
        (false, false) => format!("[<{var}>]"),
        (false, true) => format!("[<{var}>...]"),
    }
}

/// Returns the option's left-column text, e.g. `-i, --int <int>`.
pub fn option_text(option: &OptionSpec) -> String {
    let mut text = match (&option.name, option.alias) {
        (Some(name), Some(alias)) => format!("-{alias}, --{name}"),
        (Some(name), None) => format!("--{name}"),
        (None, Some(alias)) => format!("-{alias}"),
        (None, None) => String::new(),
    };
    if option.takes_value() {
        text.push_str(&format!(" <{}>", option.placeholder()));
    }
    text
}

fn commands_block(parser: &Parser) -> String {
    let rows: Vec<(String, String)> = parser
        .commands()
        .iter()
        .map(|c| (c.name.clone(), c.description.clone().unwrap_or_default()))
        .collect();
    format!("Commands:\n{}", two_columns(&rows, 2, MAX_WIDTH))
}

/// Groups options by explicit group, then bound command, in order of first
/// appearance.
fn option_blocks(parser: &Parser) -> Vec<String> {
    let mut groups: Vec<(&str, Vec<&OptionSpec>)> = Vec::new();
    for option in parser.options() {
        let group = option
            .group
            .as_deref()
            .or(option.command.as_deref())
            .unwrap_or_default();
        match groups.iter_mut().find(|(name, _)| *name == group) {
            Some((_, members)) => members.push(option),
            None => groups.push((group, vec![option])),
        }
    }

    groups
        .into_iter()
        .map(|(name, members)| {
            let rows: Vec<(String, String)> = members
                .iter()
                .map(|o| (option_text(o), o.description.clone().unwrap_or_default()))
                .collect();
            let header = if name.is_empty() {
                "Options:".to_string()
            } else {
                format!("{name} Options:")
            };
            format!("{header}\n{}", two_columns(&rows, 2, MAX_WIDTH))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argspec_core::{CommandSpec, OptionKind};

    #[test]
    fn test_option_text() {
        let opt = OptionSpec::new("int", OptionKind::Int).with_alias('i');
        assert_eq!(option_text(&opt), "-i, --int <int>");

        let opt = OptionSpec::flag("all");
        assert_eq!(option_text(&opt), "--all");

        let opt = OptionSpec::alias_only('D', OptionKind::KeyValue).with_variable_name("k=v");
        assert_eq!(option_text(&opt), "-D <k=v>");
    }

    #[test]
    fn test_single_usage_line() {
        let mut parser = Parser::new();
        parser
            .option(OptionSpec::new("token", OptionKind::String).with_alias('t').required())
            .unwrap()
            .argument(ArgumentSpec::new("file").required())
            .unwrap()
            .argument(ArgumentSpec::new("rest").allow_multiple())
            .unwrap();
        assert_eq!(
            usage_lines(&parser),
            vec!["(--token|-t) <string> [options] <file> [<rest>...]"]
        );
    }

    #[test]
    fn test_command_placeholder() {
        let mut parser = Parser::new();
        parser.command(CommandSpec::new("add")).unwrap();
        assert_eq!(usage_lines(&parser), vec!["<command> [options]"]);
    }

    #[test]
    fn test_usage_line_per_command() {
        let mut parser = Parser::new();
        parser
            .command(CommandSpec::new("add"))
            .unwrap()
            .command(CommandSpec::new("remove"))
            .unwrap()
            .argument(ArgumentSpec::new("file").for_command("add").required())
            .unwrap()
            .argument(ArgumentSpec::new("id").for_command("remove").required())
            .unwrap();

        assert_eq!(
            usage_lines(&parser),
            vec!["[options]", "add [options] <file>", "remove [options] <id>"]
        );
    }

    #[test]
    fn test_option_groups() {
        let mut parser = Parser::new();
        parser
            .command(CommandSpec::new("add"))
            .unwrap()
            .option(OptionSpec::flag("force").for_command("add"))
            .unwrap()
            .option(OptionSpec::new("host", OptionKind::String).in_group("Network"))
            .unwrap()
            .option(OptionSpec::new("port", OptionKind::Int).in_group("Network"))
            .unwrap();

        let blocks = option_blocks(&parser);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].starts_with("Options:\n"));
        assert!(blocks[1].starts_with("add Options:\n"));
        assert!(blocks[2].starts_with("Network Options:\n"));
        assert_eq!(blocks[2].lines().count(), 3);
    }

    #[test]
    fn test_usage_override() {
        let mut parser = Parser::new();
        parser.set_usage("tool [flags] FILE");
        assert_eq!(render_usage(&parser), "Usage:\n  tool [flags] FILE\n");
    }
}
