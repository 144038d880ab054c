//! Schema assembly and the structures it produces.
//!
//! [`assemble`] is the entry point. It returns a [`Registry`] of
//! [`InitialisedModel`]s, each carrying its resolved fields, enablement and
//! synthesized [`ModelTypes`].

mod admin_meta;
mod assembly;
mod assertions;
mod enablement;
mod field;
mod model;
mod names;
pub(crate) mod registry;
mod relationship;
mod root;
mod types;

pub use admin_meta::{AdminMeta, AdminMetaRoot, FieldAdminMeta, ModelAdminMeta};
pub use assembly::assemble;
pub use enablement::{FieldEnablement, IsEnabled};
pub use field::InitialisedField;
pub use model::InitialisedModel;
pub use names::{AdminUiLabels, GqlNames, ModelNames};
pub use registry::{Registry, RegistryView};
pub use relationship::{
    Cardinality, ForeignIdField, RelationDef, RelationStorage, ResolvedDbField, ResolvedRelation,
};
pub use root::RootOperations;
pub use types::{ModelTypes, RelateTo, RelateToMany, RelateToOne};
