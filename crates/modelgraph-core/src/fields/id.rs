//! The `id` field injected into every model.

use super::CommonFieldConfig;
use crate::config::{
    DbField, FieldFactory, FieldInputs, FieldMeta, FieldSpec, IdFieldKind, ScalarDbField,
    ScalarDefault, ScalarKind, ScalarMode,
};
use crate::error::Result;
use crate::graphql::{filters, Arg, OutputField, ScalarType, TypeRef};
use std::sync::Arc;

/// Configuration of the `id` field.
#[derive(Debug, Clone, Default)]
pub struct IdFieldConfig {
    /// How values are generated.
    pub kind: IdFieldKind,
    /// Shared options.
    pub common: CommonFieldConfig,
}

/// An `id` field.
pub fn id(config: IdFieldConfig) -> FieldFactory {
    Arc::new(move |_meta: &FieldMeta<'_>| -> Result<FieldSpec> {
        let (kind, default) = match config.kind {
            IdFieldKind::Autoincrement => (ScalarKind::Int, ScalarDefault::Autoincrement),
            IdFieldKind::Cuid => (ScalarKind::String, ScalarDefault::Cuid),
            IdFieldKind::Uuid => (ScalarKind::String, ScalarDefault::Uuid),
        };
        let spec = FieldSpec {
            db_field: DbField::Scalar(
                ScalarDbField::new(kind)
                    .with_mode(ScalarMode::Required)
                    .with_default(Some(default)),
            ),
            input: FieldInputs {
                where_: Some(Arg::new(filters::id_filter())),
                unique_where: Some(Arg::new(ScalarType::Id)),
                order_by: Some(Arg::new(filters::order_direction())),
                create: None,
                update: None,
            },
            output: Some(OutputField::new(TypeRef::from(ScalarType::Id).non_null())),
            ..Default::default()
        };
        Ok(config.common.apply(spec, "id"))
    })
}
