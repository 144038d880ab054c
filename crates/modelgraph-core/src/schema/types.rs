//! Per-model GraphQL types.
//!
//! Every field list here is deferred and reads the finished model through a
//! [`RegistryView`], so models can reference each other (and themselves) in
//! any order. Nothing may enumerate these lists before assembly publishes the
//! registry.

use super::enablement::IsEnabled;
use super::model::InitialisedModel;
use super::names::GqlNames;
use super::registry::RegistryView;
use crate::error::Result;
use crate::graphql::{Arg, Fields, InputObjectType, ObjectType, OutputField, ScalarType, TypeRef};
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

/// Nested inputs used by to-many relationship fields pointing at a model.
#[derive(Debug, Clone)]
pub struct RelateToMany {
    /// `<Key>ManyRelationFilter`.
    pub where_: Arc<InputObjectType>,
    /// `<Key>RelateToManyForCreateInput`, absent when the model has no type.
    pub create: Option<Arc<InputObjectType>>,
    /// `<Key>RelateToManyForUpdateInput`, absent when the model has no type.
    pub update: Option<Arc<InputObjectType>>,
}

/// Nested inputs used by to-one relationship fields pointing at a model.
#[derive(Debug, Clone)]
pub struct RelateToOne {
    /// `<Key>RelateToOneForCreateInput`, absent when the model has no type.
    pub create: Option<Arc<InputObjectType>>,
    /// `<Key>RelateToOneForUpdateInput`, absent when the model has no type.
    pub update: Option<Arc<InputObjectType>>,
}

/// Relationship inputs targeting a model.
#[derive(Debug, Clone)]
pub struct RelateTo {
    /// To-many inputs.
    pub many: RelateToMany,
    /// To-one inputs.
    pub one: RelateToOne,
}

/// The GraphQL types synthesized for one model.
#[derive(Debug, Clone)]
pub struct ModelTypes {
    /// `<Key>`
    pub output: Arc<ObjectType>,
    /// `<Key>WhereUniqueInput`
    pub unique_where: Arc<InputObjectType>,
    /// `<Key>WhereInput`
    pub where_: Arc<InputObjectType>,
    /// `<Key>CreateInput`
    pub create: Arc<InputObjectType>,
    /// `<Key>UpdateInput`
    pub update: Arc<InputObjectType>,
    /// `<Key>OrderByInput`
    pub order_by: Arc<InputObjectType>,
    /// `<Key>UpdateArgs`, one element of an update-many mutation.
    pub update_many_args: Arc<InputObjectType>,
    /// Arguments of the list query and of to-many output fields.
    pub find_many_args: IndexMap<String, Arg>,
    /// Relationship inputs.
    pub relate_to: RelateTo,
}

fn deferred<T, F>(view: &RegistryView, model_key: &str, build: F) -> Fields<T>
where
    T: 'static,
    F: Fn(&InitialisedModel, &RegistryView) -> Result<IndexMap<String, T>> + Send + Sync + 'static,
{
    let view = view.clone();
    let model_key = model_key.to_string();
    Fields::deferred(move || {
        let model = view.model(&model_key)?;
        build(&model, &view)
    })
}

fn input(name: &str, fields: Fields<Arg>) -> Arc<InputObjectType> {
    Arc::new(InputObjectType::new(name, fields))
}

fn fixed_args(args: impl IntoIterator<Item = (&'static str, Arg)>) -> Fields<Arg> {
    Fields::fixed(args.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

impl ModelTypes {
    /// Build the types of one model. Nothing is enumerated here.
    pub(crate) fn build(
        model_key: &str,
        names: &GqlNames,
        enabled: &IsEnabled,
        description: Option<String>,
        view: &RegistryView,
    ) -> Self {
        let output = Arc::new(
            ObjectType::new(&names.output_type_name, deferred(view, model_key, output_fields))
                .with_description(description),
        );

        let unique_where = input(
            &names.where_unique_input_name,
            deferred(view, model_key, |model, _| {
                Ok(model
                    .fields
                    .values()
                    .filter(|f| f.is_enabled.read && !f.is_enabled.filter.is_off())
                    .filter_map(|f| Some((f.key.clone(), f.input.unique_where.clone()?)))
                    .collect())
            }),
        );

        let where_ = input(
            &names.where_input_name,
            deferred(view, model_key, |model, _| {
                let combinator = Arg::new(TypeRef::from(&model.types.where_).list_of_non_null());
                let mut fields: IndexMap<String, Arg> = ["AND", "OR", "NOT"]
                    .into_iter()
                    .map(|name| (name.to_string(), combinator.clone()))
                    .collect();
                fields.extend(
                    model
                        .fields
                        .values()
                        .filter(|f| f.is_enabled.read && !f.is_enabled.filter.is_off())
                        .filter_map(|f| Some((f.key.clone(), f.input.where_.clone()?))),
                );
                Ok(fields)
            }),
        );

        let create = input(
            &names.create_input_name,
            deferred(view, model_key, |model, _| {
                Ok(model
                    .fields
                    .values()
                    .filter(|f| f.is_enabled.create)
                    .filter_map(|f| Some((f.key.clone(), f.input.create.clone()?)))
                    .collect())
            }),
        );

        let update = input(
            &names.update_input_name,
            deferred(view, model_key, |model, _| {
                Ok(model
                    .fields
                    .values()
                    .filter(|f| f.is_enabled.update)
                    .filter_map(|f| Some((f.key.clone(), f.input.update.clone()?)))
                    .collect())
            }),
        );

        let order_by = input(
            &names.list_order_name,
            deferred(view, model_key, |model, _| {
                Ok(model
                    .fields
                    .values()
                    .filter(|f| f.is_enabled.read && !f.is_enabled.order_by.is_off())
                    .filter_map(|f| Some((f.key.clone(), f.input.order_by.clone()?)))
                    .collect())
            }),
        );

        let update_many_args = input(
            &names.update_many_input_name,
            fixed_args([
                ("where", Arg::new(TypeRef::from(&unique_where).non_null())),
                ("data", Arg::new(TypeRef::from(&update).non_null())),
            ]),
        );

        let find_many_args: IndexMap<String, Arg> = [
            (
                "where",
                Arg::new(TypeRef::from(&where_).non_null()).with_default(json!({})),
            ),
            (
                "orderBy",
                Arg::new(TypeRef::from(&order_by).list_of_non_null().non_null())
                    .with_default(json!([])),
            ),
            ("take", Arg::new(ScalarType::Int)),
            (
                "skip",
                Arg::new(TypeRef::from(ScalarType::Int).non_null()).with_default(json!(0)),
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let many_relation_filter = input(
            &names.many_relation_filter_name,
            fixed_args(
                ["every", "some", "none"].map(|name| (name, Arg::new(&where_))),
            ),
        );

        let relate_to = if enabled.r#type {
            RelateTo {
                many: RelateToMany {
                    where_: many_relation_filter,
                    create: Some(input(
                        &names.relate_to_many_for_create_input_name,
                        deferred(view, model_key, |model, _| {
                            let mut fields = IndexMap::new();
                            insert_nested_create(&mut fields, model, true);
                            fields.insert("connect".to_string(), unique_list(model));
                            Ok(fields)
                        }),
                    )),
                    update: Some(input(
                        &names.relate_to_many_for_update_input_name,
                        deferred(view, model_key, |model, _| {
                            let mut fields = IndexMap::new();
                            fields.insert("disconnect".to_string(), unique_list(model));
                            fields.insert("set".to_string(), unique_list(model));
                            insert_nested_create(&mut fields, model, true);
                            fields.insert("connect".to_string(), unique_list(model));
                            Ok(fields)
                        }),
                    )),
                },
                one: RelateToOne {
                    create: Some(input(
                        &names.relate_to_one_for_create_input_name,
                        deferred(view, model_key, |model, _| {
                            let mut fields = IndexMap::new();
                            insert_nested_create(&mut fields, model, false);
                            fields.insert(
                                "connect".to_string(),
                                Arg::new(&model.types.unique_where),
                            );
                            Ok(fields)
                        }),
                    )),
                    update: Some(input(
                        &names.relate_to_one_for_update_input_name,
                        deferred(view, model_key, |model, _| {
                            let mut fields = IndexMap::new();
                            insert_nested_create(&mut fields, model, false);
                            fields.insert(
                                "connect".to_string(),
                                Arg::new(&model.types.unique_where),
                            );
                            fields.insert("disconnect".to_string(), Arg::new(ScalarType::Boolean));
                            Ok(fields)
                        }),
                    )),
                },
            }
        } else {
            RelateTo {
                many: RelateToMany {
                    where_: many_relation_filter,
                    create: None,
                    update: None,
                },
                one: RelateToOne {
                    create: None,
                    update: None,
                },
            }
        };

        Self {
            output,
            unique_where,
            where_,
            create,
            update,
            order_by,
            update_many_args,
            find_many_args,
            relate_to,
        }
    }
}

fn unique_list(model: &InitialisedModel) -> Arg {
    Arg::new(TypeRef::from(&model.types.unique_where).list_of_non_null())
}

/// Nested create is only offered when the target model can be created.
fn insert_nested_create(fields: &mut IndexMap<String, Arg>, model: &InitialisedModel, many: bool) {
    if !model.is_enabled.create {
        return;
    }
    let ty = TypeRef::from(&model.types.create);
    let ty = if many { ty.list_of_non_null() } else { ty };
    fields.insert("create".to_string(), Arg::new(ty));
}

fn output_fields(
    model: &InitialisedModel,
    view: &RegistryView,
) -> Result<IndexMap<String, OutputField>> {
    let mut fields = IndexMap::new();
    for field in model.fields.values() {
        let Some(output) = &field.output else {
            continue;
        };
        if !field.is_enabled.read {
            continue;
        }
        let gate = |out: &OutputField| {
            out.clone().gated(
                &model.key,
                &field.key,
                field.access.read.clone(),
                field.cache_hint,
            )
        };

        let target_queryable = match field.db_field.as_relation() {
            Some(rel) => view.model(rel.model())?.is_enabled.query,
            None => true,
        };
        if target_queryable {
            fields.insert(field.key.clone(), gate(output));
        }
        for (name, extra) in &field.extra_output_fields {
            fields.insert(name.clone(), gate(extra));
        }
    }
    Ok(fields)
}
