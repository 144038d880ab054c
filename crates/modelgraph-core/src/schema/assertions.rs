//! Global checks run once relationships are resolved.

use super::model::InitialisedModel;
use crate::config::FieldConfig;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Keys that collide with the where-input combinators.
const COMBINATOR_KEYS: [&str; 3] = ["AND", "OR", "NOT"];

/// Reject declared field keys that collide with generated names.
pub(crate) fn assert_field_keys_allowed(
    model_key: &str,
    fields: &IndexMap<String, FieldConfig>,
) -> Result<()> {
    for key in fields.keys() {
        if COMBINATOR_KEYS.contains(&key.as_str()) {
            return Err(Error::ReservedFieldKey {
                model: model_key.to_string(),
                field: key.clone(),
                reason: "it is used to combine where filters".to_string(),
            });
        }
        if key == "id" {
            return Err(Error::ReservedFieldKey {
                model: model_key.to_string(),
                field: key.clone(),
                reason: "an id field is added to every model, configure it with db.idField"
                    .to_string(),
            });
        }
    }
    Ok(())
}

/// Validate a model against the set of models being assembled.
pub(crate) fn assert_fields_valid(
    model: &InitialisedModel,
    models: &IndexMap<String, InitialisedModel>,
) -> Result<()> {
    assert_relations_resolve(model, models)?;
    assert_no_output_conflicts(model)?;
    assert_access_valid(model)
}

fn assert_relations_resolve(
    model: &InitialisedModel,
    models: &IndexMap<String, InitialisedModel>,
) -> Result<()> {
    for field in model.fields.values() {
        if let Some(rel) = field.db_field.as_relation() {
            if !models.contains_key(rel.model()) {
                return Err(Error::UnknownRefModel {
                    model: model.key.clone(),
                    field: field.key.clone(),
                    target: rel.model().to_string(),
                });
            }
        }
    }
    Ok(())
}

fn assert_no_output_conflicts(model: &InitialisedModel) -> Result<()> {
    let mut owners: HashMap<&str, &str> = model
        .fields
        .keys()
        .map(|key| (key.as_str(), key.as_str()))
        .collect();

    for field in model.fields.values() {
        for output in field.extra_output_fields.keys() {
            if let Some(existing) = owners.insert(output, &field.key) {
                return Err(Error::ConflictingOutputField {
                    model: model.key.clone(),
                    field: field.key.clone(),
                    output: output.clone(),
                    existing: existing.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn assert_access_valid(model: &InitialisedModel) -> Result<()> {
    for (option, rule) in model.access.rules() {
        rule.validate(&model.key, option)?;
    }
    for field in model.fields.values() {
        let target = format!("{}.{}", model.key, field.key);
        for (option, rule) in field.access.rules() {
            rule.validate(&target, option)?;
        }
    }
    Ok(())
}
