//! Metadata consumed by the Admin UI.

use super::registry::Registry;
use crate::error::Result;
use heck::ToTitleCase;
use indexmap::IndexMap;
use serde::Serialize;

/// Admin UI view of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAdminMeta {
    /// Field key.
    pub path: String,
    /// Display label.
    pub label: String,
    /// Description.
    pub description: Option<String>,
    /// View identifier.
    pub view: String,
    /// Whether the field can be filtered on. Predicates count as `true`.
    pub is_filterable: bool,
    /// Whether the field can be ordered by. Predicates count as `true`.
    pub is_orderable: bool,
    /// Field-specific metadata.
    pub field_meta: Option<serde_json::Value>,
}

/// Admin UI view of one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAdminMeta {
    /// Model key.
    pub key: String,
    /// URL path segment.
    pub path: String,
    /// Main label.
    pub label: String,
    /// Singular label.
    pub singular: String,
    /// Plural label.
    pub plural: String,
    /// Field used to label items.
    pub label_field: String,
    /// Description.
    pub description: Option<String>,
    /// Name of the item query.
    pub item_query_name: String,
    /// Name of the list query.
    pub list_query_name: String,
    /// Whether the create UI is hidden.
    pub hide_create: bool,
    /// Whether the delete UI is hidden.
    pub hide_delete: bool,
    /// Readable fields, in declaration order.
    pub fields: IndexMap<String, FieldAdminMeta>,
}

/// Admin metadata for every queryable model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMeta {
    /// Models keyed by model key.
    pub models: IndexMap<String, ModelAdminMeta>,
}

/// What field admin-meta functions see: the complete metadata minus every
/// field's `field_meta`.
pub type AdminMetaRoot = AdminMeta;

impl AdminMeta {
    /// A model by key.
    pub fn model(&self, key: &str) -> Option<&ModelAdminMeta> {
        self.models.get(key)
    }

    /// Build admin metadata for a registry.
    ///
    /// Field metadata functions run after every model's field list exists,
    /// so they can validate references to other models.
    pub fn build(registry: &Registry) -> Result<Self> {
        let mut meta = AdminMeta {
            models: IndexMap::new(),
        };

        for model in registry.models().values() {
            if !model.is_enabled.query {
                continue;
            }
            let mut fields = IndexMap::new();
            for field in model.fields.values() {
                if !field.is_enabled.read {
                    continue;
                }
                if let Some(rel) = field.db_field.as_relation() {
                    let target_queryable = registry
                        .get(rel.model())
                        .is_some_and(|target| target.is_enabled.query);
                    if !target_queryable {
                        continue;
                    }
                }
                fields.insert(
                    field.key.clone(),
                    FieldAdminMeta {
                        path: field.key.clone(),
                        label: field.ui.label.clone().unwrap_or_else(|| field.key.to_title_case()),
                        description: field.ui.description.clone(),
                        view: field.ui.view.clone(),
                        is_filterable: field.is_enabled.filter.as_static(),
                        is_orderable: field.is_enabled.order_by.as_static(),
                        field_meta: None,
                    },
                );
            }

            let labels = &model.names.admin_ui_labels;
            meta.models.insert(
                model.key.clone(),
                ModelAdminMeta {
                    key: model.key.clone(),
                    path: labels.path.clone(),
                    label: labels.label.clone(),
                    singular: labels.singular.clone(),
                    plural: labels.plural.clone(),
                    label_field: model.label_field.clone(),
                    description: model.description.clone(),
                    item_query_name: model.names.gql.item_query_name.clone(),
                    list_query_name: model.names.gql.list_query_name.clone(),
                    hide_create: !model.is_enabled.create,
                    hide_delete: !model.is_enabled.delete,
                    fields,
                },
            );
        }

        let mut field_metas = Vec::new();
        for (model_key, model_meta) in &meta.models {
            let model = registry.model(model_key)?;
            for field_key in model_meta.fields.keys() {
                let admin_meta = model
                    .field(field_key)
                    .and_then(|field| field.ui.admin_meta.as_ref());
                if let Some(admin_meta) = admin_meta {
                    field_metas.push((model_key.clone(), field_key.clone(), admin_meta(&meta)?));
                }
            }
        }
        for (model_key, field_key, value) in field_metas {
            if let Some(field) = meta
                .models
                .get_mut(&model_key)
                .and_then(|model| model.fields.get_mut(&field_key))
            {
                field.field_meta = Some(value);
            }
        }

        tracing::debug!(models = meta.models.len(), "admin metadata built");
        Ok(meta)
    }
}
