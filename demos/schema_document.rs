//! Schema document example.
//!
//! Describes a parser in YAML, builds it, prints its help and parses a fixed
//! set of arguments.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argspec-demos --example schema_document
//! ```

use argspec_core::SchemaDocument;
use argspec_help::render_help;

const SCHEMA: &str = r#"
name: serve
version: 0.4.0
description: Serve a directory over HTTP.
config:
  allow_trailing_options: true
options:
  - name: port
    alias: p
    type: int
    default: 8080
    description: Port to listen on
  - name: bind
    type: string
    default: 127.0.0.1
    group: Network
    description: Address to bind
  - name: header
    alias: H
    type: keyValue
    multiple: true
    variable_name: name=value
    group: Network
    description: Extra response header
  - name: since
    type: date
    format: "%Y-%m-%d"
    description: Only serve files modified after this date
arguments:
  - name: root
    default: "."
    description: Directory to serve
sections:
  - name: Notes
    text: Files starting with a dot are never served.
"#;

fn main() {
    let document: SchemaDocument = match serde_yaml::from_str(SCHEMA) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("invalid YAML: {err}");
            std::process::exit(1);
        }
    };
    let parser = match document.build() {
        Ok(parser) => parser,
        Err(err) => {
            eprintln!("invalid schema: {err}");
            std::process::exit(1);
        }
    };

    print!("{}", render_help(&parser));
    println!();

    let args = ["public", "-p", "9000", "-H", "Cache-Control=no-store", "--since", "2024-01-31"];
    println!("$ serve {}", args.join(" "));
    match parser.parse(args) {
        Ok(result) => match serde_json::to_string_pretty(&result.to_json()) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("failed to serialize result: {err}"),
        },
        Err(err) => eprintln!("error: {err}"),
    }
}
