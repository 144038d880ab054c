//! Timestamp fields.

use super::CommonFieldConfig;
use crate::config::{
    DbField, FieldFactory, FieldInputs, FieldMeta, FieldSpec, IndexKind, ScalarDbField,
    ScalarDefault, ScalarKind, ScalarMode,
};
use crate::error::Result;
use crate::graphql::{filters, Arg, OutputField, ScalarType};
use serde_json::json;
use std::sync::Arc;

/// Default value of a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampDefault {
    /// The time of insertion.
    Now,
    /// An RFC 3339 literal.
    Literal(String),
}

/// Configuration of a timestamp field.
#[derive(Debug, Clone)]
pub struct TimestampFieldConfig {
    /// Shared options.
    pub common: CommonFieldConfig,
    /// Default value.
    pub default_value: Option<TimestampDefault>,
    /// Refresh the value on every update.
    pub updated_at: bool,
    /// Index on the column.
    pub is_indexed: Option<IndexKind>,
    /// Whether the column accepts null.
    pub is_nullable: bool,
    /// Column name override.
    pub map: Option<String>,
}

impl Default for TimestampFieldConfig {
    fn default() -> Self {
        Self {
            common: CommonFieldConfig::default(),
            default_value: None,
            updated_at: false,
            is_indexed: None,
            is_nullable: true,
            map: None,
        }
    }
}

/// A timestamp field.
pub fn timestamp(config: TimestampFieldConfig) -> FieldFactory {
    Arc::new(move |_meta: &FieldMeta<'_>| -> Result<FieldSpec> {
        let mode = if config.is_nullable {
            ScalarMode::Optional
        } else {
            ScalarMode::Required
        };
        let (db_default, create) = match &config.default_value {
            Some(TimestampDefault::Now) => {
                (Some(ScalarDefault::Now), Arg::new(ScalarType::DateTime))
            }
            Some(TimestampDefault::Literal(value)) => (
                Some(ScalarDefault::Literal(json!(value))),
                Arg::new(ScalarType::DateTime).with_default(json!(value)),
            ),
            None => (None, Arg::new(ScalarType::DateTime)),
        };

        let mut db_field = ScalarDbField::new(ScalarKind::DateTime)
            .with_mode(mode)
            .with_default(db_default)
            .with_index(config.is_indexed)
            .with_map(config.map.clone());
        db_field.updated_at = config.updated_at;

        let spec = FieldSpec {
            db_field: DbField::Scalar(db_field),
            input: FieldInputs {
                where_: Some(Arg::new(filters::datetime_filter())),
                unique_where: (config.is_indexed == Some(IndexKind::Unique))
                    .then(|| Arg::new(ScalarType::DateTime)),
                create: Some(create),
                update: Some(Arg::new(ScalarType::DateTime)),
                order_by: Some(Arg::new(filters::order_direction())),
            },
            output: Some(OutputField::new(ScalarType::DateTime)),
            ..Default::default()
        };
        Ok(config.common.apply(spec, "timestamp"))
    })
}
