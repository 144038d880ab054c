//! Built-in field types.
//!
//! Each constructor takes a config struct and returns a [`FieldFactory`]
//! for use with [`ModelConfig::with_field`](crate::config::ModelConfig::with_field).

pub mod checkbox;
pub mod id;
pub mod integer;
pub mod json;
pub mod relationship;
pub mod text;
pub mod timestamp;

pub use checkbox::{checkbox, CheckboxFieldConfig};
pub use id::{id, IdFieldConfig};
pub use integer::{integer, IntegerFieldConfig};
pub use json::{json, JsonFieldConfig};
pub use relationship::{
    relationship, DisplayMode, InlineFields, RelationshipDbConfig, RelationshipFieldConfig,
    RelationshipUi, RemoveMode,
};
pub use text::{text, TextFieldConfig};
pub use timestamp::{timestamp, TimestampDefault, TimestampFieldConfig};

use crate::config::{
    FieldAccessConfig, FieldGraphqlConfig, FieldMeta, FieldSpec, FilterOption, Hooks,
};
use crate::error::Error;

/// Options every field type accepts.
#[derive(Debug, Clone, Default)]
pub struct CommonFieldConfig {
    /// Access control.
    pub access: FieldAccessConfig,
    /// Hooks.
    pub hooks: Hooks,
    /// GraphQL options.
    pub graphql: FieldGraphqlConfig,
    /// Filterability, overriding the model default.
    pub is_filterable: Option<FilterOption>,
    /// Orderability, overriding the model default.
    pub is_orderable: Option<FilterOption>,
    /// Admin UI label.
    pub label: Option<String>,
    /// Admin UI description.
    pub description: Option<String>,
}

impl CommonFieldConfig {
    /// Copy the shared options onto a field spec.
    pub(crate) fn apply(&self, mut spec: FieldSpec, view: &str) -> FieldSpec {
        spec.access = self.access.clone();
        spec.hooks = self.hooks.clone();
        spec.graphql = self.graphql.clone();
        spec.is_filterable = self.is_filterable.clone();
        spec.is_orderable = self.is_orderable.clone();
        spec.ui.view = view.to_string();
        spec.ui.label = self.label.clone();
        spec.ui.description = self.description.clone();
        spec
    }
}

pub(crate) fn invalid_config(meta: &FieldMeta<'_>, message: impl Into<String>) -> Error {
    Error::InvalidFieldConfig {
        model: meta.model_key.to_string(),
        field: meta.field_key.to_string(),
        message: message.into(),
    }
}
