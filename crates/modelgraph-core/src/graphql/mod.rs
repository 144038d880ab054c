//! The GraphQL type model.
//!
//! A small, engine-agnostic description of GraphQL types: scalars, enums,
//! object and input object types with (possibly deferred) field lists, plus
//! an SDL printer. A serving layer maps these onto its own type system.

pub mod filters;
mod printer;
mod types;

pub use printer::{graphql_literal, print_schema};
pub use types::{
    Arg, EnumType, FieldOrigin, Fields, InputObjectType, ObjectType, OutputField, ScalarType,
    TypeHandle, TypeRef,
};
