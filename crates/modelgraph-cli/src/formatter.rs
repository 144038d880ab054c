//! Output formatters for schema reports.

use crate::summary::SchemaSummary;
use clap::ValueEnum;
use comfy_table::Table;
use modelgraph_core::schema::FieldAdminMeta;
use modelgraph_core::AdminMeta;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format the models and relations of an assembled schema.
    fn format_summary(&self, summary: &SchemaSummary) -> String;

    /// Format Admin UI metadata.
    fn format_admin_meta(&self, meta: &AdminMeta) -> String;

    /// Format a simple message.
    fn format_message(&self, message: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_summary(&self, summary: &SchemaSummary) -> String {
        let mut models = Table::new();
        models.set_header(vec![
            "Model", "Table", "Fields", "Label", "Query", "Create", "Update", "Delete",
        ]);
        for model in &summary.models {
            models.add_row(vec![
                model.key.clone(),
                model.table.clone(),
                model.fields.to_string(),
                model.label_field.clone(),
                yes_no(model.query),
                yes_no(model.create),
                yes_no(model.update),
                yes_no(model.delete),
            ]);
        }

        if summary.relations.is_empty() {
            return format!("{models}\n\nNo relations");
        }

        let mut relations = Table::new();
        relations.set_header(vec!["Relation", "Cardinality", "From", "To", "Storage"]);
        for rel in &summary.relations {
            relations.add_row(vec![
                rel.name.as_str(),
                rel.cardinality.as_str(),
                rel.from.as_str(),
                rel.to.as_str(),
                rel.storage.as_str(),
            ]);
        }

        format!("{models}\n\n{relations}")
    }

    fn format_admin_meta(&self, meta: &AdminMeta) -> String {
        let mut table = Table::new();
        table.set_header(vec![
            "Model", "Field", "Label", "View", "Filterable", "Orderable",
        ]);
        for (model, field) in admin_rows(meta) {
            table.add_row(vec![
                model.to_string(),
                field.path.clone(),
                field.label.clone(),
                field.view.clone(),
                yes_no(field.is_filterable),
                yes_no(field.is_orderable),
            ]);
        }

        if meta.models.is_empty() {
            "No queryable models".to_string()
        } else {
            table.to_string()
        }
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_summary(&self, summary: &SchemaSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_admin_meta(&self, meta: &AdminMeta) -> String {
        serde_json::to_string_pretty(meta).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({
            "message": message
        })
        .to_string()
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    // Relations are left out; CSV carries a single table.
    fn format_summary(&self, summary: &SchemaSummary) -> String {
        let mut output =
            String::from("model,table,fields,label_field,query,create,update,delete\n");
        for model in &summary.models {
            output.push_str(&format!(
                "\"{}\",\"{}\",{},\"{}\",{},{},{},{}\n",
                escape_csv(&model.key),
                escape_csv(&model.table),
                model.fields,
                escape_csv(&model.label_field),
                model.query,
                model.create,
                model.update,
                model.delete,
            ));
        }
        output
    }

    fn format_admin_meta(&self, meta: &AdminMeta) -> String {
        let mut output = String::from("model,field,label,view,is_filterable,is_orderable\n");
        for (model, field) in admin_rows(meta) {
            output.push_str(&format!(
                "\"{}\",\"{}\",\"{}\",\"{}\",{},{}\n",
                escape_csv(model),
                escape_csv(&field.path),
                escape_csv(&field.label),
                escape_csv(&field.view),
                field.is_filterable,
                field.is_orderable,
            ));
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// Every field of every model, in declaration order.
fn admin_rows(meta: &AdminMeta) -> impl Iterator<Item = (&str, &FieldAdminMeta)> {
    meta.models.values().flat_map(|model| {
        model
            .fields
            .values()
            .map(move |field| (model.key.as_str(), field))
    })
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

/// Escape a string for CSV.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{ModelSummary, RelationSummary};

    fn summary() -> SchemaSummary {
        SchemaSummary {
            models: vec![ModelSummary {
                key: "Post".to_string(),
                table: "posts".to_string(),
                fields: 3,
                label_field: "title".to_string(),
                query: true,
                create: true,
                update: false,
                delete: true,
            }],
            relations: vec![RelationSummary {
                name: "Post_tags".to_string(),
                cardinality: "many-to-many".to_string(),
                from: "Post.tags".to_string(),
                to: "Tag.from_Post_tags".to_string(),
                storage: "join _Post_tags".to_string(),
            }],
        }
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("hello"), "hello");
        assert_eq!(escape_csv("hello, world"), "hello, world");
        assert_eq!(escape_csv("say \"hi\""), "say \"\"hi\"\"");
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_table_summary() {
        let output = TableFormatter.format_summary(&summary());
        assert!(output.contains("posts"));
        assert!(output.contains("join _Post_tags"));
    }

    #[test]
    fn test_csv_summary() {
        let output = CsvFormatter.format_summary(&summary());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "\"Post\",\"posts\",3,\"title\",true,true,false,true");
    }

    #[test]
    fn test_json_summary() {
        let output = JsonFormatter.format_summary(&summary());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["models"][0]["labelField"], "title");
        assert_eq!(value["relations"][0]["cardinality"], "many-to-many");
    }

    #[test]
    fn test_empty_admin_meta() {
        let meta = AdminMeta {
            models: Default::default(),
        };
        assert_eq!(TableFormatter.format_admin_meta(&meta), "No queryable models");
        assert_eq!(
            CsvFormatter.format_admin_meta(&meta),
            "model,field,label,view,is_filterable,is_orderable\n"
        );
    }
}
