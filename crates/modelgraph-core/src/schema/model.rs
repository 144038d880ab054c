//! Model descriptors.

use super::enablement::IsEnabled;
use super::field::InitialisedField;
use super::names::ModelNames;
use super::registry::RegistryView;
use super::relationship::ResolvedDbField;
use super::types::ModelTypes;
use crate::config::{CacheHintFn, Hooks, IdFieldKind, ResolvedModelAccess};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;

/// Fields tried, in order, when no label field is configured.
const LABEL_FIELD_CANDIDATES: [&str; 3] = ["label", "name", "title"];

/// A fully assembled model.
pub struct InitialisedModel {
    /// Model key.
    pub key: String,
    /// Declared fields, with the injected `id` first.
    pub fields: IndexMap<String, InitialisedField>,
    /// Every stored field, including implicit relation inverses.
    pub resolved_db_fields: IndexMap<String, ResolvedDbField>,
    /// Access control.
    pub access: ResolvedModelAccess,
    /// Hooks.
    pub hooks: Hooks,
    /// Cache hint for queries returning this model.
    pub cache_hint: Option<CacheHintFn>,
    /// Maximum list query results.
    pub max_results: Option<usize>,
    /// Derived names.
    pub names: ModelNames,
    /// Field used to label items.
    pub label_field: String,
    /// Admin UI description.
    pub description: Option<String>,
    /// Table name override.
    pub db_map: Option<String>,
    /// How `id` values are generated.
    pub id_field: IdFieldKind,
    /// GraphQL enablement after the create/update cascade.
    pub is_enabled: IsEnabled,
    /// Synthesized GraphQL types.
    pub types: ModelTypes,
    /// Read view of the registry this model belongs to.
    pub registry: RegistryView,
}

impl InitialisedModel {
    /// A declared field by key.
    pub fn field(&self, key: &str) -> Option<&InitialisedField> {
        self.fields.get(key)
    }

    /// Name of the table backing the model.
    pub fn table_name(&self) -> &str {
        self.db_map.as_deref().unwrap_or(&self.key)
    }
}

impl fmt::Debug for InitialisedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitialisedModel")
            .field("key", &self.key)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("resolved_db_fields", &self.resolved_db_fields)
            .field("is_enabled", &self.is_enabled)
            .field("label_field", &self.label_field)
            .field("db_map", &self.db_map)
            .field("max_results", &self.max_results)
            .field("cache_hint", &self.cache_hint.is_some())
            .finish()
    }
}

/// Pick the label field, validating an explicit choice.
pub(crate) fn label_field<V>(
    model_key: &str,
    configured: Option<&str>,
    fields: &IndexMap<String, V>,
) -> Result<String> {
    if let Some(label_field) = configured {
        if !fields.contains_key(label_field) {
            return Err(Error::UnknownLabelField {
                model: model_key.to_string(),
                label_field: label_field.to_string(),
            });
        }
        return Ok(label_field.to_string());
    }
    Ok(LABEL_FIELD_CANDIDATES
        .into_iter()
        .find(|candidate| fields.contains_key(*candidate))
        .unwrap_or("id")
        .to_string())
}
