//! Field descriptors and the resolver that builds them from factories.

use super::enablement::{field_enablement, FieldEnablement, IsEnabled};
use super::relationship::ResolvedDbField;
use crate::config::{
    CacheHint, DbField, FieldConfig, FieldInputs, FieldMeta, FieldUi, Hooks, ResolvedFieldAccess,
};
use crate::error::{Error, Result};
use crate::graphql::OutputField;
use indexmap::IndexMap;

/// A fully resolved field.
#[derive(Debug, Clone)]
pub struct InitialisedField {
    /// Field key.
    pub key: String,
    /// Owning model.
    pub model_key: String,
    /// Storage shape after relationship resolution.
    pub db_field: ResolvedDbField,
    /// Access control.
    pub access: ResolvedFieldAccess,
    /// Hooks.
    pub hooks: Hooks,
    /// GraphQL inputs.
    pub input: FieldInputs,
    /// Output field.
    pub output: Option<OutputField>,
    /// Additional output fields.
    pub extra_output_fields: IndexMap<String, OutputField>,
    /// Enablement.
    pub is_enabled: FieldEnablement,
    /// Cache hint for the output.
    pub cache_hint: Option<CacheHint>,
    /// Admin UI options.
    pub ui: FieldUi,
}

impl InitialisedField {
    /// Whether the field is a relationship.
    pub fn is_relation(&self) -> bool {
        matches!(self.db_field, ResolvedDbField::Relation(_))
    }
}

/// Run a field's factory and derive its enablement.
///
/// Returns the field together with the storage shape it declared; the
/// resolved shape is filled in once relationships are paired up.
pub(crate) fn resolve_field(
    config: &FieldConfig,
    meta: &FieldMeta<'_>,
    model_enabled: &IsEnabled,
) -> Result<(InitialisedField, DbField)> {
    let factory = match config {
        FieldConfig::Factory(factory) => factory,
        FieldConfig::Invalid(_) => {
            return Err(Error::MissingFieldFactory {
                model: meta.model_key.to_string(),
                field: meta.field_key.to_string(),
            })
        }
    };
    let spec = factory(meta)?;
    let is_enabled = field_enablement(meta.model_key, meta.field_key, &spec, model_enabled)?;

    let field = InitialisedField {
        key: meta.field_key.to_string(),
        model_key: meta.model_key.to_string(),
        db_field: ResolvedDbField::None,
        access: ResolvedFieldAccess::parse(&spec.access),
        hooks: spec.hooks,
        input: spec.input,
        output: spec.output,
        extra_output_fields: spec.extra_output_fields,
        is_enabled,
        cache_hint: spec.graphql.cache_hint,
        ui: spec.ui,
    };
    Ok((field, spec.db_field))
}
