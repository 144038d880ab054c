//! Flat summaries of an assembled registry, for display.

use modelgraph_core::schema::{Cardinality, RelationStorage};
use modelgraph_core::Registry;
use serde::Serialize;

/// One row per model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub key: String,
    pub table: String,
    pub fields: usize,
    pub label_field: String,
    pub query: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

/// One row per relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationSummary {
    pub name: String,
    pub cardinality: String,
    pub from: String,
    pub to: String,
    pub storage: String,
}

/// What `check` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub models: Vec<ModelSummary>,
    pub relations: Vec<RelationSummary>,
}

impl SchemaSummary {
    /// Summarize a registry.
    pub fn from_registry(registry: &Registry) -> Self {
        let models = registry
            .models()
            .values()
            .map(|model| ModelSummary {
                key: model.key.clone(),
                table: model.table_name().to_string(),
                fields: model.fields.len(),
                label_field: model.label_field.clone(),
                query: model.is_enabled.query,
                create: model.is_enabled.create,
                update: model.is_enabled.update,
                delete: model.is_enabled.delete,
            })
            .collect();

        let relations = registry
            .relations()
            .iter()
            .map(|rel| RelationSummary {
                name: rel.name.clone(),
                cardinality: cardinality_label(rel.cardinality).to_string(),
                from: format!("{}.{}", rel.from_model, rel.from_field),
                to: format!("{}.{}", rel.to_model, rel.to_field),
                storage: match &rel.storage {
                    RelationStorage::ForeignKey {
                        model,
                        column,
                        unique: true,
                    } => format!("unique fk {model}.{column}"),
                    RelationStorage::ForeignKey { model, column, .. } => {
                        format!("fk {model}.{column}")
                    }
                    RelationStorage::JoinTable { table } => format!("join {table}"),
                },
            })
            .collect();

        Self { models, relations }
    }
}

fn cardinality_label(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::OneToOne => "one-to-one",
        Cardinality::OneToMany => "one-to-many",
        Cardinality::ManyToMany => "many-to-many",
    }
}
