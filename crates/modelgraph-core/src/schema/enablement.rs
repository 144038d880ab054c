//! Which GraphQL capabilities a model and its fields expose.

use crate::config::{
    FieldOperation, FieldSpec, FilterOption, ModelConfig, ModelOmit, ModelOperation, Toggle,
};
use crate::error::{Error, Result};

/// Model-level enablement.
#[derive(Debug, Clone, PartialEq)]
pub struct IsEnabled {
    /// Whether the model has a GraphQL output type at all.
    pub r#type: bool,
    /// Item and list queries.
    pub query: bool,
    /// Create mutations.
    pub create: bool,
    /// Update mutations.
    pub update: bool,
    /// Delete mutations.
    pub delete: bool,
    /// Default filterability of fields.
    pub filter: Toggle,
    /// Default orderability of fields.
    pub order_by: Toggle,
}

impl IsEnabled {
    /// Everything off.
    pub fn disabled() -> Self {
        Self {
            r#type: false,
            query: false,
            create: false,
            update: false,
            delete: false,
            filter: Toggle::Static(false),
            order_by: Toggle::Static(false),
        }
    }

    /// Whether a model operation is enabled.
    pub fn operation(&self, operation: ModelOperation) -> bool {
        match operation {
            ModelOperation::Query => self.query,
            ModelOperation::Create => self.create,
            ModelOperation::Update => self.update,
            ModelOperation::Delete => self.delete,
        }
    }
}

/// Field-level enablement.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEnablement {
    /// Readable through the output type.
    pub read: bool,
    /// Settable on create.
    pub create: bool,
    /// Settable on update.
    pub update: bool,
    /// Usable in where inputs.
    pub filter: Toggle,
    /// Usable in orderBy inputs.
    pub order_by: Toggle,
}

fn default_toggle(model_key: &str, option: &str, value: Option<&FilterOption>) -> Result<Toggle> {
    match value {
        Some(value) => value.to_toggle(model_key, option),
        None => Ok(Toggle::Static(true)),
    }
}

/// First pass: enablement from the model's own config.
pub(crate) fn model_enablement(model_key: &str, config: &ModelConfig) -> Result<IsEnabled> {
    let omitted = match &config.graphql.omit {
        ModelOmit::All => return Ok(IsEnabled::disabled()),
        ModelOmit::None => Vec::new(),
        ModelOmit::Operations(ops) => ops.clone(),
        ModelOmit::Invalid(value) => {
            return Err(Error::InvalidOmit {
                model: model_key.to_string(),
                received: value.to_string(),
            })
        }
    };

    Ok(IsEnabled {
        r#type: true,
        query: !omitted.contains(&ModelOperation::Query),
        create: !omitted.contains(&ModelOperation::Create),
        update: !omitted.contains(&ModelOperation::Update),
        delete: !omitted.contains(&ModelOperation::Delete),
        filter: default_toggle(
            model_key,
            "defaultIsFilterable",
            config.default_is_filterable.as_ref(),
        )?,
        order_by: default_toggle(
            model_key,
            "defaultIsOrderable",
            config.default_is_orderable.as_ref(),
        )?,
    })
}

/// Enablement of one field, given its model's first-pass enablement.
pub(crate) fn field_enablement(
    model_key: &str,
    field_key: &str,
    spec: &FieldSpec,
    model: &IsEnabled,
) -> Result<FieldEnablement> {
    let omit = &spec.graphql.omit;
    let read = !omit.omits(FieldOperation::Read);

    let filter = match &spec.is_filterable {
        Some(option) => option.to_toggle(model_key, &format!("{field_key}.isFilterable"))?,
        None => model.filter.clone(),
    };
    let order_by = match &spec.is_orderable {
        Some(option) => option.to_toggle(model_key, &format!("{field_key}.isOrderable"))?,
        None => model.order_by.clone(),
    };

    Ok(FieldEnablement {
        read,
        create: !omit.omits(FieldOperation::Create) && model.create,
        update: !omit.omits(FieldOperation::Update) && model.update,
        filter: if read { filter } else { Toggle::Static(false) },
        order_by: if read { order_by } else { Toggle::Static(false) },
    })
}

/// Second pass: turn off create/update when no field can take part.
pub(crate) fn cascade<'a, I>(model_key: &str, enabled: &mut IsEnabled, fields: I)
where
    I: IntoIterator<Item = &'a super::field::InitialisedField>,
{
    let (mut any_create, mut any_update) = (false, false);
    for field in fields {
        any_create |= field.is_enabled.create && field.input.create.is_some();
        any_update |= field.is_enabled.update && field.input.update.is_some();
    }

    if enabled.create && !any_create {
        tracing::debug!(
            model = model_key,
            operation = "create",
            "no fields can be set, disabling operation"
        );
        enabled.create = false;
    }
    if enabled.update && !any_update {
        tracing::debug!(
            model = model_key,
            operation = "update",
            "no fields can be set, disabling operation"
        );
        enabled.update = false;
    }
}
