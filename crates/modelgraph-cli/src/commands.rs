//! Subcommand implementations.
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

use crate::formatter::Formatter;
use crate::summary::SchemaSummary;
use modelgraph_core::{assemble, print_schema, AdminMeta, Registry, SchemaFile};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The schema file could not be read or failed to assemble.
    #[error("{path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: modelgraph_core::Error,
    },

    /// Rendering the assembled schema failed.
    #[error(transparent)]
    Render(#[from] modelgraph_core::Error),

    /// The SDL could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load and assemble a schema file.
pub fn load(path: &Path) -> Result<Registry, CommandError> {
    let wrap = |source| CommandError::Schema {
        path: path.to_path_buf(),
        source,
    };
    let config = SchemaFile::load(path).map_err(wrap)?;
    let registry = assemble(&config).map_err(wrap)?;
    tracing::info!(path = %path.display(), "schema loaded");
    Ok(registry)
}

/// Summarize models and relations.
pub fn check(path: &Path, formatter: &dyn Formatter) -> Result<String, CommandError> {
    let registry = load(path)?;
    Ok(formatter.format_summary(&SchemaSummary::from_registry(&registry)))
}

/// Print the SDL, or write it to `output`.
pub fn schema(
    path: &Path,
    output: Option<&Path>,
    formatter: &dyn Formatter,
) -> Result<String, CommandError> {
    let registry = load(path)?;
    let sdl = print_schema(&registry)?;

    match output {
        Some(target) => {
            std::fs::write(target, &sdl).map_err(|source| CommandError::Write {
                path: target.to_path_buf(),
                source,
            })?;
            Ok(formatter.format_message(&format!("Wrote {}", target.display())))
        }
        None => Ok(sdl),
    }
}

/// Build Admin UI metadata.
pub fn admin_meta(path: &Path, formatter: &dyn Formatter) -> Result<String, CommandError> {
    let registry = load(path)?;
    let meta = AdminMeta::build(&registry)?;
    Ok(formatter.format_admin_meta(&meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{create_formatter, OutputFormat};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BLOG: &str = r#"{
        "db": { "provider": "sqlite" },
        "models": {
            "Post": {
                "fields": {
                    "title": { "type": "text" },
                    "author": { "type": "relationship", "ref": "User.posts" }
                }
            },
            "User": {
                "fields": {
                    "name": { "type": "text" },
                    "posts": { "type": "relationship", "ref": "Post.author", "many": true }
                }
            }
        }
    }"#;

    fn schema_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_check_json() {
        let file = schema_file(BLOG);
        let formatter = create_formatter(OutputFormat::Json);
        let output = check(file.path(), &*formatter).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["models"].as_array().unwrap().len(), 2);
        assert_eq!(value["relations"][0]["name"], "Post_author");
        assert_eq!(value["relations"][0]["storage"], "fk Post.author");
    }

    #[test]
    fn test_schema_to_file() {
        let file = schema_file(BLOG);
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("schema.graphql");
        let formatter = create_formatter(OutputFormat::Table);

        let message = schema(file.path(), Some(&target), &*formatter).unwrap();
        assert!(message.starts_with("Wrote "));
        let sdl = std::fs::read_to_string(&target).unwrap();
        assert!(sdl.contains("type Post {"));
        assert!(sdl.contains("type Query {"));
    }

    #[test]
    fn test_admin_meta_csv() {
        let file = schema_file(BLOG);
        let formatter = create_formatter(OutputFormat::Csv);
        let output = admin_meta(file.path(), &*formatter).unwrap();
        assert!(output.contains("\"Post\",\"title\",\"Title\""));
    }

    #[test]
    fn test_error_names_path() {
        let file = schema_file(r#"{ "db": { "provider": "sqlite" }, "models": { "Post": { "fields": { "title": { "type": "nope" } } } } }"#);
        let formatter = create_formatter(OutputFormat::Table);
        let err = check(file.path(), &*formatter).unwrap_err();
        assert!(matches!(err, CommandError::Schema { .. }));
        assert!(err.to_string().starts_with(&file.path().display().to_string()));
    }
}
