//! modelgraph core - schema assembly, relationship resolution, and GraphQL
//! type synthesis.
//!
//! This crate turns a declarative set of model definitions into a validated,
//! cross-linked model registry together with the GraphQL types derived from
//! it.

pub mod config;
pub mod error;
pub mod fields;
pub mod graphql;
pub mod schema;

pub use config::{ModelConfig, SchemaConfig, SchemaFile};
pub use error::{Error, Result};
pub use graphql::print_schema;
pub use schema::{
    assemble, AdminMeta, InitialisedField, InitialisedModel, ModelTypes, Registry, RegistryView,
    RelationDef, RootOperations,
};
