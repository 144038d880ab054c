//! Schema assembly.
//!
//! Turns a [`SchemaConfig`] into a published [`Registry`]. Phases run
//! strictly in order and the first failure aborts the whole assembly:
//!
//! 1. model enablement and names
//! 2. registry cell allocation
//! 3. GraphQL type synthesis (closing over a view of the empty cell)
//! 4. field resolution, with `id` injected first
//! 5. relationship resolution
//! 6. the create/update cascade
//! 7. global validation
//! 8. publishing

use super::assertions::{assert_field_keys_allowed, assert_fields_valid};
use super::enablement::{cascade, model_enablement, IsEnabled};
use super::field::{resolve_field, InitialisedField};
use super::model::{label_field, InitialisedModel};
use super::names::ModelNames;
use super::registry::{Registry, RegistryCell, RegistryData};
use super::relationship::resolve_relationships;
use super::types::ModelTypes;
use crate::config::{DbField, FieldConfig, FieldMeta, ResolvedModelAccess, SchemaConfig};
use crate::error::Result;
use crate::fields::{id, IdFieldConfig};
use indexmap::IndexMap;
use std::sync::Arc;

/// Assemble a schema.
pub fn assemble(config: &SchemaConfig) -> Result<Registry> {
    tracing::info!(models = config.models.len(), "assembling schema");

    let mut first_pass: IndexMap<String, (IsEnabled, ModelNames)> = IndexMap::new();
    for (key, model) in &config.models {
        let enabled = model_enablement(key, model)?;
        let names = ModelNames::from_config(key, model)?;
        first_pass.insert(key.clone(), (enabled, names));
    }
    tracing::debug!(phase = 1, "model enablement computed");

    let cell = RegistryCell::new();
    let view = cell.view();
    tracing::debug!(phase = 2, "registry allocated");

    let types: IndexMap<String, ModelTypes> = first_pass
        .iter()
        .map(|(key, (enabled, names))| {
            let description = config.models[key].graphql.description.clone();
            let types = ModelTypes::build(key, &names.gql, enabled, description, &view);
            (key.clone(), types)
        })
        .collect();
    tracing::debug!(phase = 3, "graphql types synthesized");

    let mut fields: IndexMap<String, IndexMap<String, InitialisedField>> = IndexMap::new();
    let mut db_fields: IndexMap<String, IndexMap<String, DbField>> = IndexMap::new();
    for (model_key, model) in &config.models {
        assert_field_keys_allowed(model_key, &model.fields)?;
        let (enabled, _) = &first_pass[model_key];
        let id_field = FieldConfig::Factory(id(IdFieldConfig {
            kind: model.db.id_field.unwrap_or(config.db.id_field),
            ..Default::default()
        }));

        let mut model_fields = IndexMap::new();
        let mut model_db_fields = IndexMap::new();
        for (field_key, field_config) in std::iter::once(("id", &id_field))
            .chain(model.fields.iter().map(|(k, v)| (k.as_str(), v)))
        {
            let meta = FieldMeta {
                field_key,
                model_key,
                types: &types,
                registry: &view,
                provider: config.db.provider,
                storage: &config.storage,
            };
            let (field, db_field) = resolve_field(field_config, &meta, enabled)?;
            model_fields.insert(field_key.to_string(), field);
            model_db_fields.insert(field_key.to_string(), db_field);
        }
        fields.insert(model_key.clone(), model_fields);
        db_fields.insert(model_key.clone(), model_db_fields);
    }
    tracing::debug!(phase = 4, "fields resolved");

    let mut resolved = resolve_relationships(&db_fields)?;
    for (model_key, model_fields) in &mut fields {
        let Some(model_db_fields) = resolved.db_fields.get(model_key) else {
            continue;
        };
        for (field_key, field) in model_fields.iter_mut() {
            if let Some(db_field) = model_db_fields.get(field_key) {
                field.db_field = db_field.clone();
            }
        }
    }
    tracing::debug!(
        phase = 5,
        relations = resolved.relations.len(),
        "relationships resolved"
    );

    let mut enablement: IndexMap<String, IsEnabled> = IndexMap::new();
    for (model_key, (enabled, _)) in &first_pass {
        let mut enabled = enabled.clone();
        cascade(model_key, &mut enabled, fields[model_key].values());
        enablement.insert(model_key.clone(), enabled);
    }
    tracing::debug!(phase = 6, "operation cascade applied");

    let mut types = types;
    let mut models: IndexMap<String, InitialisedModel> = IndexMap::new();
    for ((model_key, model), (_, (_, names))) in config.models.iter().zip(first_pass) {
        let model_fields = fields.shift_remove(model_key).unwrap_or_default();
        let label_field = label_field(model_key, model.ui.label_field.as_deref(), &model_fields)?;
        let (Some(types), Some(is_enabled)) =
            (types.shift_remove(model_key), enablement.shift_remove(model_key))
        else {
            continue;
        };
        models.insert(
            model_key.clone(),
            InitialisedModel {
                key: model_key.clone(),
                resolved_db_fields: resolved.db_fields.shift_remove(model_key).unwrap_or_default(),
                fields: model_fields,
                access: ResolvedModelAccess::parse(&model.access),
                hooks: model.hooks.clone(),
                cache_hint: model.graphql.cache_hint.clone().map(|policy| policy.into_fn()),
                max_results: model.graphql.max_results,
                names,
                label_field,
                description: model.ui.description.clone(),
                db_map: model.db.map.clone(),
                id_field: model.db.id_field.unwrap_or(config.db.id_field),
                is_enabled,
                types,
                registry: view.clone(),
            },
        );
    }
    for model in models.values() {
        assert_fields_valid(model, &models)?;
    }
    tracing::debug!(phase = 7, "models validated");

    let registry = cell.publish(RegistryData {
        models: models
            .into_iter()
            .map(|(key, model)| (key, Arc::new(model)))
            .collect(),
        relations: resolved.relations,
    });
    tracing::info!(
        models = registry.models().len(),
        relations = registry.relations().len(),
        "schema assembled"
    );
    Ok(registry)
}
