//! Checkbox (boolean) fields.

use super::{invalid_config, CommonFieldConfig};
use crate::config::{
    DbField, FieldFactory, FieldInputs, FieldMeta, FieldSpec, IndexKind, ScalarDbField,
    ScalarDefault, ScalarKind, ScalarMode,
};
use crate::error::Result;
use crate::graphql::{filters, Arg, OutputField, ScalarType};
use serde_json::json;
use std::sync::Arc;

/// Configuration of a checkbox field.
#[derive(Debug, Clone, Default)]
pub struct CheckboxFieldConfig {
    /// Shared options.
    pub common: CommonFieldConfig,
    /// Default value.
    pub default_value: bool,
    /// Index on the column. Unique indexes are rejected.
    pub is_indexed: Option<IndexKind>,
    /// Column name override.
    pub map: Option<String>,
}

/// A checkbox field.
pub fn checkbox(config: CheckboxFieldConfig) -> FieldFactory {
    Arc::new(move |meta: &FieldMeta<'_>| -> Result<FieldSpec> {
        if config.is_indexed == Some(IndexKind::Unique) {
            return Err(invalid_config(meta, "checkbox fields cannot be unique"));
        }
        let spec = FieldSpec {
            db_field: DbField::Scalar(
                ScalarDbField::new(ScalarKind::Boolean)
                    .with_mode(ScalarMode::Required)
                    .with_default(Some(ScalarDefault::Literal(json!(config.default_value))))
                    .with_index(config.is_indexed)
                    .with_map(config.map.clone()),
            ),
            input: FieldInputs {
                where_: Some(Arg::new(filters::boolean_filter())),
                unique_where: None,
                create: Some(
                    Arg::new(ScalarType::Boolean).with_default(json!(config.default_value)),
                ),
                update: Some(Arg::new(ScalarType::Boolean)),
                order_by: Some(Arg::new(filters::order_direction())),
            },
            output: Some(OutputField::new(ScalarType::Boolean)),
            ..Default::default()
        };
        Ok(config.common.apply(spec, "checkbox"))
    })
}
