//! Text fields.

use super::CommonFieldConfig;
use crate::config::{
    DbField, FieldFactory, FieldInputs, FieldMeta, FieldSpec, IndexKind, ScalarDbField,
    ScalarDefault, ScalarKind, ScalarMode,
};
use crate::error::Result;
use crate::graphql::{filters, Arg, OutputField, ScalarType};
use serde_json::json;
use std::sync::Arc;

/// Configuration of a text field.
#[derive(Debug, Clone, Default)]
pub struct TextFieldConfig {
    /// Shared options.
    pub common: CommonFieldConfig,
    /// Default value.
    pub default_value: Option<String>,
    /// Index on the column.
    pub is_indexed: Option<IndexKind>,
    /// Whether the column accepts null.
    pub is_nullable: bool,
    /// Column name override.
    pub map: Option<String>,
}

/// A text field.
pub fn text(config: TextFieldConfig) -> FieldFactory {
    Arc::new(move |_meta: &FieldMeta<'_>| -> Result<FieldSpec> {
        let mode = if config.is_nullable {
            ScalarMode::Optional
        } else {
            ScalarMode::Required
        };
        let mut create = Arg::new(ScalarType::String);
        if let Some(default) = &config.default_value {
            create = create.with_default(json!(default));
        }

        let spec = FieldSpec {
            db_field: DbField::Scalar(
                ScalarDbField::new(ScalarKind::String)
                    .with_mode(mode)
                    .with_default(
                        config
                            .default_value
                            .as_ref()
                            .map(|value| ScalarDefault::Literal(json!(value))),
                    )
                    .with_index(config.is_indexed)
                    .with_map(config.map.clone()),
            ),
            input: FieldInputs {
                where_: Some(Arg::new(filters::string_filter(config.is_nullable))),
                unique_where: (config.is_indexed == Some(IndexKind::Unique))
                    .then(|| Arg::new(ScalarType::String)),
                create: Some(create),
                update: Some(Arg::new(ScalarType::String)),
                order_by: Some(Arg::new(filters::order_direction())),
            },
            output: Some(OutputField::new(ScalarType::String)),
            ..Default::default()
        };
        Ok(config.common.apply(spec, "text"))
    })
}
