//! Relationship fields.
//!
//! A relationship declares one side of a relation. The target is given as
//! `Model` (one-sided) or `Model.field` (two-sided); pairing happens later,
//! once every model's fields exist.

use super::{invalid_config, CommonFieldConfig};
use crate::config::{
    DbField, FieldFactory, FieldInputs, FieldMeta, FieldSpec, ForeignKeyConfig, RelationDbField,
    RelationMode,
};
use crate::error::{Error, Result};
use crate::graphql::{Arg, OutputField, ScalarType, TypeRef};
use crate::schema::AdminMetaRoot;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// How the Admin UI renders the relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    /// A select box.
    #[default]
    Select,
    /// Cards showing fields of the related items.
    Cards,
    /// Only the number of related items.
    Count,
}

/// What removing a card does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoveMode {
    /// Disconnect the related item.
    #[default]
    Disconnect,
    /// Removing is not offered.
    None,
}

/// Fields shown in an inline create or edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InlineFields {
    /// Field keys on the related model.
    pub fields: Vec<String>,
}

/// Admin UI options of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipUi {
    /// Display mode.
    pub display_mode: DisplayMode,
    /// Hide the create button.
    pub hide_create: bool,
    /// Label field of related items, for `select`.
    pub label_field: Option<String>,
    /// Fields shown on each card, for `cards`.
    pub card_fields: Vec<String>,
    /// Link cards to the related item.
    pub link_to_item: bool,
    /// What removing a card does.
    pub remove_mode: RemoveMode,
    /// Inline create form.
    pub inline_create: Option<InlineFields>,
    /// Inline edit form.
    pub inline_edit: Option<InlineFields>,
    /// Allow connecting existing items from the cards view.
    pub inline_connect: bool,
}

/// Storage options of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationshipDbConfig {
    /// Claim the foreign key (to-one only).
    pub foreign_key: Option<ForeignKeyConfig>,
    /// Join table name (to-many only).
    pub relation_name: Option<String>,
}

/// Configuration of a relationship field.
#[derive(Debug, Clone, Default)]
pub struct RelationshipFieldConfig {
    /// Shared options.
    pub common: CommonFieldConfig,
    /// `Model` or `Model.field`.
    pub ref_: String,
    /// To-many.
    pub many: bool,
    /// Storage options.
    pub db: RelationshipDbConfig,
    /// Admin UI options.
    pub ui: RelationshipUi,
}

impl RelationshipFieldConfig {
    /// A to-one relationship.
    pub fn one(ref_: impl Into<String>) -> Self {
        Self {
            ref_: ref_.into(),
            ..Default::default()
        }
    }

    /// A to-many relationship.
    pub fn many(ref_: impl Into<String>) -> Self {
        Self {
            ref_: ref_.into(),
            many: true,
            ..Default::default()
        }
    }

    /// Set the Admin UI options.
    pub fn with_ui(mut self, ui: RelationshipUi) -> Self {
        self.ui = ui;
        self
    }

    /// Set the storage options.
    pub fn with_db(mut self, db: RelationshipDbConfig) -> Self {
        self.db = db;
        self
    }
}

fn parse_ref<'a>(meta: &FieldMeta<'_>, ref_: &'a str) -> Result<(&'a str, Option<&'a str>)> {
    let mut parts = ref_.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(model), field, None) if !model.is_empty() && field != Some("") => Ok((model, field)),
        _ => Err(invalid_config(
            meta,
            format!("ref must be 'Model' or 'Model.field', received '{ref_}'"),
        )),
    }
}

fn validate(meta: &FieldMeta<'_>, config: &RelationshipFieldConfig) -> Result<()> {
    if config.ui.display_mode == DisplayMode::Count && !config.many {
        return Err(invalid_config(
            meta,
            "displayMode: 'count' can only be used with many: true",
        ));
    }
    if config.many && config.db.foreign_key.is_some() {
        return Err(invalid_config(
            meta,
            "db.foreignKey can only be used on relationships with many: false",
        ));
    }
    if !config.many && config.db.relation_name.is_some() {
        return Err(invalid_config(
            meta,
            "db.relationName can only be used on relationships with many: true",
        ));
    }
    Ok(())
}

/// A relationship field.
pub fn relationship(config: RelationshipFieldConfig) -> FieldFactory {
    let config = Arc::new(config);
    Arc::new(move |meta: &FieldMeta<'_>| -> Result<FieldSpec> {
        validate(meta, &config)?;
        let (ref_model, ref_field) = parse_ref(meta, &config.ref_)?;
        let target = meta.model_types(ref_model).ok_or_else(|| Error::UnknownRefModel {
            model: meta.model_key.to_string(),
            field: meta.field_key.to_string(),
            target: ref_model.to_string(),
        })?;

        let (mode, input, output, extra_output_fields) = if config.many {
            let count = OutputField::new(ScalarType::Int).with_arg(
                "where",
                Arg::new(TypeRef::from(&target.where_).non_null()).with_default(json!({})),
            );
            let mut extra = IndexMap::new();
            extra.insert(format!("{}Count", meta.field_key), count);
            (
                RelationMode::Many {
                    relation_name: config.db.relation_name.clone(),
                },
                FieldInputs {
                    where_: Some(Arg::new(&target.relate_to.many.where_)),
                    create: target.relate_to.many.create.as_ref().map(Arg::new),
                    update: target.relate_to.many.update.as_ref().map(Arg::new),
                    ..Default::default()
                },
                OutputField::new(TypeRef::from(&target.output).list_of_non_null())
                    .with_args(target.find_many_args.clone()),
                extra,
            )
        } else {
            (
                RelationMode::One {
                    foreign_key: config.db.foreign_key.clone(),
                },
                FieldInputs {
                    where_: Some(Arg::new(&target.where_)),
                    create: target.relate_to.one.create.as_ref().map(Arg::new),
                    update: target.relate_to.one.update.as_ref().map(Arg::new),
                    ..Default::default()
                },
                OutputField::new(&target.output),
                IndexMap::new(),
            )
        };

        let mut spec = config.common.apply(
            FieldSpec {
                db_field: DbField::Relation(RelationDbField {
                    mode,
                    model: ref_model.to_string(),
                    field: ref_field.map(str::to_string),
                }),
                input,
                output: Some(output),
                extra_output_fields,
                ..Default::default()
            },
            "relationship",
        );

        let model_key = meta.model_key.to_string();
        let field_key = meta.field_key.to_string();
        let config = config.clone();
        spec.ui.admin_meta = Some(Arc::new(move |root: &AdminMetaRoot| {
            admin_meta(root, &model_key, &field_key, &config)
        }));
        Ok(spec)
    })
}

fn admin_meta(
    root: &AdminMetaRoot,
    model_key: &str,
    field_key: &str,
    config: &RelationshipFieldConfig,
) -> Result<serde_json::Value> {
    let (ref_model, ref_field) = match config.ref_.split_once('.') {
        Some((model, field)) => (model, Some(field)),
        None => (config.ref_.as_str(), None),
    };
    let target = root.model(ref_model).ok_or_else(|| Error::InvalidRef {
        model: model_key.to_string(),
        field: field_key.to_string(),
        reference: config.ref_.clone(),
    })?;

    let ui = &config.ui;
    let mut meta = json!({
        "refModelKey": ref_model,
        "refFieldKey": ref_field,
        "many": config.many,
        "hideCreate": ui.hide_create,
        "displayMode": ui.display_mode,
    });

    match ui.display_mode {
        DisplayMode::Select => {
            meta["refLabelField"] = json!(ui.label_field.as_deref().unwrap_or(&target.label_field));
        }
        DisplayMode::Cards => {
            let inline_create = ui
                .inline_create
                .as_ref()
                .map(|i| i.fields.as_slice())
                .unwrap_or_default();
            let inline_edit = ui
                .inline_edit
                .as_ref()
                .map(|i| i.fields.as_slice())
                .unwrap_or_default();
            for (option, fields) in [
                ("ui.cardFields", ui.card_fields.as_slice()),
                ("ui.inlineCreate.fields", inline_create),
                ("ui.inlineEdit.fields", inline_edit),
            ] {
                if let Some(missing) = fields.iter().find(|f| !target.fields.contains_key(*f)) {
                    return Err(Error::AdminMetaUnknownField {
                        option: option.to_string(),
                        model: model_key.to_string(),
                        field: field_key.to_string(),
                        target_field: missing.clone(),
                        target_model: ref_model.to_string(),
                    });
                }
            }
            meta["cardFields"] = json!(ui.card_fields);
            meta["linkToItem"] = json!(ui.link_to_item);
            meta["removeMode"] = json!(ui.remove_mode);
            meta["inlineCreate"] = json!(ui.inline_create);
            meta["inlineEdit"] = json!(ui.inline_edit);
            meta["inlineConnect"] = json!(ui.inline_connect);
            meta["refLabelField"] = json!(target.label_field);
        }
        DisplayMode::Count => {}
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseProvider, ModelConfig, SchemaConfig};
    use crate::schema::assemble;

    fn blog(post_author: RelationshipFieldConfig) -> SchemaConfig {
        SchemaConfig::new(DatabaseProvider::Sqlite)
            .with_model(
                "Post",
                ModelConfig::new()
                    .with_field("title", crate::fields::text(Default::default()))
                    .with_field("author", relationship(post_author)),
            )
            .with_model(
                "User",
                ModelConfig::new()
                    .with_field("name", crate::fields::text(Default::default()))
                    .with_field(
                        "posts",
                        relationship(RelationshipFieldConfig::many("Post.author")),
                    ),
            )
    }

    #[test]
    fn test_count_requires_many() {
        let config = RelationshipFieldConfig::one("User.posts").with_ui(RelationshipUi {
            display_mode: DisplayMode::Count,
            ..Default::default()
        });
        let err = assemble(&blog(config)).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldConfig { ref field, .. } if field == "author"));
    }

    #[test]
    fn test_relation_name_requires_many() {
        let config = RelationshipFieldConfig::one("User.posts").with_db(RelationshipDbConfig {
            relation_name: Some("Authored".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            assemble(&blog(config)).unwrap_err(),
            Error::InvalidFieldConfig { .. }
        ));
    }

    #[test]
    fn test_unknown_ref_model() {
        let schema = SchemaConfig::new(DatabaseProvider::Sqlite).with_model(
            "Post",
            ModelConfig::new()
                .with_field("author", relationship(RelationshipFieldConfig::one("Person"))),
        );
        let err = assemble(&schema).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to resolve related model 'Person' from Post.author"
        );
    }

    #[test]
    fn test_many_adds_count_output() {
        let registry = assemble(&blog(RelationshipFieldConfig::one("User.posts"))).unwrap();
        let user = registry.model("User").unwrap();
        let posts = user.field("posts").unwrap();
        assert!(posts.extra_output_fields.contains_key("postsCount"));
        assert_eq!(posts.output.as_ref().unwrap().ty.to_string(), "[Post!]");
        assert_eq!(
            posts.input.update.as_ref().unwrap().ty.named(),
            "PostRelateToManyForUpdateInput"
        );
    }
}
