//! Integer fields.

use super::CommonFieldConfig;
use crate::config::{
    DbField, FieldFactory, FieldInputs, FieldMeta, FieldSpec, IndexKind, ScalarDbField,
    ScalarDefault, ScalarKind, ScalarMode,
};
use crate::error::Result;
use crate::graphql::{filters, Arg, OutputField, ScalarType};
use serde_json::json;
use std::sync::Arc;

/// Configuration of an integer field.
#[derive(Debug, Clone, Default)]
pub struct IntegerFieldConfig {
    /// Shared options.
    pub common: CommonFieldConfig,
    /// Default value.
    pub default_value: Option<i64>,
    /// Index on the column.
    pub is_indexed: Option<IndexKind>,
    /// Whether the column accepts null.
    pub is_nullable: bool,
    /// Column name override.
    pub map: Option<String>,
}

/// An integer field.
pub fn integer(config: IntegerFieldConfig) -> FieldFactory {
    Arc::new(move |_meta: &FieldMeta<'_>| -> Result<FieldSpec> {
        let mode = if config.is_nullable {
            ScalarMode::Optional
        } else {
            ScalarMode::Required
        };
        let create = match config.default_value {
            Some(default) => Arg::new(ScalarType::Int).with_default(json!(default)),
            None => Arg::new(ScalarType::Int),
        };

        let spec = FieldSpec {
            db_field: DbField::Scalar(
                ScalarDbField::new(ScalarKind::Int)
                    .with_mode(mode)
                    .with_default(config.default_value.map(|v| ScalarDefault::Literal(json!(v))))
                    .with_index(config.is_indexed)
                    .with_map(config.map.clone()),
            ),
            input: FieldInputs {
                where_: Some(Arg::new(filters::int_filter(config.is_nullable))),
                unique_where: (config.is_indexed == Some(IndexKind::Unique))
                    .then(|| Arg::new(ScalarType::Int)),
                create: Some(create),
                update: Some(Arg::new(ScalarType::Int)),
                order_by: Some(Arg::new(filters::order_direction())),
            },
            output: Some(OutputField::new(ScalarType::Int)),
            ..Default::default()
        };
        Ok(config.common.apply(spec, "integer"))
    })
}
