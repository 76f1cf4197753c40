//! Schema document loading.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use argspec_core::{Parser, SchemaDocument};
use tracing::debug;

use crate::error::{CliError, Result};

const SCHEMA_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Loads a schema document, choosing the format from the file extension.
///
/// `.json` files are read as JSON; everything else as YAML.
pub fn load_document(path: &Path) -> Result<SchemaDocument> {
    let file = fs::File::open(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let document = if is_json {
        serde_json::from_reader(reader).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_reader(reader).map_err(|source| CliError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };
    debug!(path = %path.display(), json = is_json, "loaded schema document");
    Ok(document)
}

/// Loads a schema document and builds its parser.
///
/// A document without a `name` takes the file stem as program name.
pub fn load_parser(path: &Path) -> Result<Parser> {
    let mut document = load_document(path)?;
    if document.name.is_none() {
        document.name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(String::from);
    }
    document.build().map_err(|source| CliError::Schema {
        path: path.to_path_buf(),
        source,
    })
}

/// Expands the inputs into schema file paths.
///
/// Files are taken as given; directories contribute their `.yaml`, `.yml`
/// and `.json` entries in name order.
pub fn collect_schema_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }

        let entries = fs::read_dir(input).map_err(|source| CliError::Read {
            path: input.clone(),
            source,
        })?;
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_schema_extension(path))
            .collect();
        if found.is_empty() {
            return Err(CliError::NoSchemas(input.clone()));
        }
        found.sort();
        paths.extend(found);
    }
    Ok(paths)
}

fn has_schema_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SCHEMA_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_defaults_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");
        fs::write(&path, "options:\n  - name: env\n    type: string\n").unwrap();

        let parser = load_parser(&path).unwrap();
        assert_eq!(parser.name(), Some("deploy"));
    }

    #[test]
    fn test_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.json");
        fs::write(&path, r#"{"name": "tool", "commands": [{"name": "run"}]}"#).unwrap();

        let parser = load_parser(&path).unwrap();
        assert_eq!(parser.commands().len(), 1);
    }

    #[test]
    fn test_schema_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "options:\n  - name: x\n    type: moment\n").unwrap();

        let err = load_parser(&path).unwrap_err();
        assert!(matches!(err, CliError::Schema { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_collect_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.yaml", "a.json", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let paths = collect_schema_paths(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml"]);
    }
}
