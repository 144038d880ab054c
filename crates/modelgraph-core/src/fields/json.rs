//! JSON fields. They can be written and read but not filtered or ordered.

use super::CommonFieldConfig;
use crate::config::{
    DbField, FieldFactory, FieldInputs, FieldMeta, FieldSpec, ScalarDbField, ScalarDefault,
    ScalarKind,
};
use crate::error::Result;
use crate::graphql::{Arg, OutputField, ScalarType};
use std::sync::Arc;

/// Configuration of a JSON field.
#[derive(Debug, Clone, Default)]
pub struct JsonFieldConfig {
    /// Shared options.
    pub common: CommonFieldConfig,
    /// Default value.
    pub default_value: Option<serde_json::Value>,
    /// Column name override.
    pub map: Option<String>,
}

/// A JSON field.
pub fn json(config: JsonFieldConfig) -> FieldFactory {
    Arc::new(move |_meta: &FieldMeta<'_>| -> Result<FieldSpec> {
        let create = match &config.default_value {
            Some(default) => Arg::new(ScalarType::Json).with_default(default.clone()),
            None => Arg::new(ScalarType::Json),
        };
        let spec = FieldSpec {
            db_field: DbField::Scalar(
                ScalarDbField::new(ScalarKind::Json)
                    .with_default(config.default_value.clone().map(ScalarDefault::Literal))
                    .with_map(config.map.clone()),
            ),
            input: FieldInputs {
                create: Some(create),
                update: Some(Arg::new(ScalarType::Json)),
                ..Default::default()
            },
            output: Some(OutputField::new(ScalarType::Json)),
            ..Default::default()
        };
        Ok(config.common.apply(spec, "json"))
    })
}
