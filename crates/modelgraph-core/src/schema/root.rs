//! Root query and mutation fields.

use super::model::InitialisedModel;
use super::registry::Registry;
use crate::graphql::{Arg, Fields, ObjectType, OutputField, TypeRef};
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

/// The root operation types of a registry.
#[derive(Debug, Clone)]
pub struct RootOperations {
    /// `Query`
    pub query: Arc<ObjectType>,
    /// `Mutation`, absent when no model exposes a mutation.
    pub mutation: Option<Arc<ObjectType>>,
}

impl RootOperations {
    /// Derive root fields from model enablement.
    pub fn build(registry: &Registry) -> Self {
        let mut query = IndexMap::new();
        let mut mutation = IndexMap::new();

        for model in registry.models().values() {
            if model.is_enabled.query {
                query_fields(model, &mut query);
            }
            if model.is_enabled.r#type {
                mutation_fields(model, &mut mutation);
            }
        }

        Self {
            query: Arc::new(ObjectType::new("Query", Fields::fixed(query))),
            mutation: (!mutation.is_empty())
                .then(|| Arc::new(ObjectType::new("Mutation", Fields::fixed(mutation)))),
        }
    }
}

fn query_fields(model: &InitialisedModel, out: &mut IndexMap<String, OutputField>) {
    let names = &model.names.gql;
    let types = &model.types;

    out.insert(
        names.item_query_name.clone(),
        OutputField::new(&types.output).with_arg(
            "where",
            Arg::new(TypeRef::from(&types.unique_where).non_null()),
        ),
    );
    out.insert(
        names.list_query_name.clone(),
        OutputField::new(TypeRef::from(&types.output).list_of_non_null())
            .with_args(types.find_many_args.clone()),
    );
    out.insert(
        names.list_query_count_name.clone(),
        OutputField::new(crate::graphql::ScalarType::Int).with_arg(
            "where",
            Arg::new(TypeRef::from(&types.where_).non_null()).with_default(json!({})),
        ),
    );
}

fn mutation_fields(model: &InitialisedModel, out: &mut IndexMap<String, OutputField>) {
    let names = &model.names.gql;
    let types = &model.types;
    let output = || TypeRef::from(&types.output);
    let unique_where = || TypeRef::from(&types.unique_where).non_null();

    if model.is_enabled.create {
        let data = TypeRef::from(&types.create).non_null();
        out.insert(
            names.create_mutation_name.clone(),
            OutputField::new(output()).with_arg("data", Arg::new(data.clone())),
        );
        out.insert(
            names.create_many_mutation_name.clone(),
            OutputField::new(output().list())
                .with_arg("data", Arg::new(data.list().non_null())),
        );
    }
    if model.is_enabled.update {
        out.insert(
            names.update_mutation_name.clone(),
            OutputField::new(output())
                .with_arg("where", Arg::new(unique_where()))
                .with_arg("data", Arg::new(TypeRef::from(&types.update).non_null())),
        );
        out.insert(
            names.update_many_mutation_name.clone(),
            OutputField::new(output().list()).with_arg(
                "data",
                Arg::new(
                    TypeRef::from(&types.update_many_args)
                        .list_of_non_null()
                        .non_null(),
                ),
            ),
        );
    }
    if model.is_enabled.delete {
        out.insert(
            names.delete_mutation_name.clone(),
            OutputField::new(output()).with_arg("where", Arg::new(unique_where())),
        );
        out.insert(
            names.delete_many_mutation_name.clone(),
            OutputField::new(output().list())
                .with_arg("where", Arg::new(unique_where().list().non_null())),
        );
    }
}
