mod error;
mod schema;

use std::io::{self, Write};
use std::path::PathBuf;

use argspec_help::{Processed, process, write_help};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::error::{CliError, Result};
use crate::schema::{collect_schema_paths, load_parser};

/// Output format for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argspec", version, disable_help_subcommand = true)]
#[command(about = "Parse command-line arguments against declarative schema documents")]
struct Cli {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse arguments given after `--` and print the result.
    Parse(ParseArgs),
    /// Print the help text a schema produces.
    Help(HelpArgs),
    /// Build one or more schema documents and report problems.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema document (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: PathBuf,
    /// Output format for the parsed result.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to parse.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Schema document (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files and/or directories containing schema files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        if err.needs_report() {
            eprintln!("error: {err}");
        }
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

fn run_parse(args: ParseArgs) -> Result<()> {
    let parser = load_parser(&args.schema)?;
    debug!(tokens = args.args.len(), "parsing arguments against schema");

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let outcome = process(&parser, args.args, &mut out, &mut stderr.lock())?;

    match outcome {
        Processed::Parsed(result) => {
            let value = result.to_json();
            let raw = match args.format {
                CliOutputFormat::Json => serde_json::to_string_pretty(&value)
                    .map_err(|err| CliError::Output(err.to_string()))?,
                CliOutputFormat::Yaml => serde_yaml::to_string(&value)
                    .map_err(|err| CliError::Output(err.to_string()))?,
            };
            writeln!(out, "{}", raw.trim_end())?;
            Ok(())
        }
        Processed::Help | Processed::Version => Ok(()),
        Processed::Failed(err) => Err(CliError::Rejected(err)),
    }
}

fn run_help(args: HelpArgs) -> Result<()> {
    let parser = load_parser(&args.schema)?;
    let stdout = io::stdout();
    write_help(&parser, &mut stdout.lock())?;
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let paths = collect_schema_paths(&args.inputs)?;

    let mut failed = 0usize;
    for path in &paths {
        match load_parser(path) {
            Ok(parser) => debug!(
                path = %path.display(),
                options = parser.options().len(),
                "schema is valid"
            ),
            Err(err) => {
                warn!(path = %path.display(), "schema failed validation");
                eprintln!("{err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::InvalidSchemas(failed));
    }
    println!("Validated {} schema file(s).", paths.len());
    Ok(())
}
