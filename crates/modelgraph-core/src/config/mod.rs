//! Declarative schema configuration.
//!
//! This is the surface the config-loading layer hands to assembly: models,
//! their field factories, access control, hooks, and GraphQL options. Values
//! that can take several shapes are tagged enums with an `Invalid` arm so a
//! loosely typed source can be validated instead of coerced.

mod access;
mod field;
pub mod file;
mod hooks;
mod model;

pub use access::{
    AccessArgs, AccessPredicate, AccessRule, FieldAccessConfig, FieldOperation,
    FilterAccessConfig, FilterRules, ItemAccessConfig, ItemRules, ModelAccessConfig,
    ModelOperation, OperationAccess, OperationAccessConfig, OperationRules, ResolvedFieldAccess,
    ResolvedModelAccess,
};
pub use field::{
    AdminMetaFn, DbField, FieldConfig, FieldFactory, FieldGraphqlConfig, FieldInputs, FieldMeta,
    FieldOmit, FieldSpec, FieldUi, FilterOption, FilterOrderArgs, FilterPredicate,
    ForeignKeyConfig, IndexKind, RelationDbField, RelationMode, ScalarDbField, ScalarDefault,
    ScalarKind, ScalarMode, Toggle,
};
pub use file::SchemaFile;
pub use hooks::{HookArgs, HookError, HookFn, Hooks};
pub use model::{
    CacheHint, CacheHintArgs, CacheHintFn, CacheHintPolicy, CacheScope, DatabaseProvider,
    DbConfig, IdFieldKind, ModelConfig, ModelDbConfig, ModelGraphqlConfig, ModelOmit,
    ModelUiConfig, SchemaConfig, StorageConfig,
};
