//! Model and schema configuration.

use super::access::{ModelAccessConfig, ModelOperation};
use super::field::{FieldConfig, FilterOption};
use super::hooks::Hooks;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Database backing the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    /// SQLite.
    #[default]
    Sqlite,
    /// PostgreSQL.
    Postgresql,
    /// MySQL.
    Mysql,
}

/// How `id` values are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdFieldKind {
    /// Integer sequence.
    #[default]
    Autoincrement,
    /// cuid string.
    Cuid,
    /// uuid string.
    Uuid,
}

/// Database options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DbConfig {
    /// Provider.
    pub provider: DatabaseProvider,
    /// Default id generation for every model.
    pub id_field: IdFieldKind,
}

/// Where a storage backend keeps files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum StorageConfig {
    /// Local filesystem.
    Local {
        /// Directory files are written to.
        storage_path: String,
        /// Public URL prefix.
        base_url: String,
    },
    /// S3-compatible bucket.
    S3 {
        /// Bucket name.
        bucket_name: String,
        /// Region.
        region: String,
    },
}

/// Cache scope of a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheScope {
    /// Shared caches may store the response.
    #[default]
    Public,
    /// Only the requesting client may store the response.
    Private,
}

/// A response cache hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheHint {
    /// Seconds the response may be cached for.
    pub max_age: Option<u32>,
    /// Cache scope.
    pub scope: CacheScope,
}

/// Arguments for a dynamic cache hint.
#[derive(Debug, Clone, Copy)]
pub struct CacheHintArgs<'a> {
    /// Number of results returned.
    pub result_count: usize,
    /// Operation name.
    pub operation_name: Option<&'a str>,
}

/// Computes a cache hint per request.
pub type CacheHintFn = Arc<dyn Fn(&CacheHintArgs<'_>) -> CacheHint + Send + Sync>;

/// Model-level cache hint config.
#[derive(Clone)]
pub enum CacheHintPolicy {
    /// Same hint for every request.
    Static(CacheHint),
    /// Hint computed per request.
    Dynamic(CacheHintFn),
}

impl CacheHintPolicy {
    /// Normalize to a function.
    pub fn into_fn(self) -> CacheHintFn {
        match self {
            CacheHintPolicy::Static(hint) => Arc::new(move |_| hint),
            CacheHintPolicy::Dynamic(f) => f,
        }
    }
}

impl fmt::Debug for CacheHintPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheHintPolicy::Static(hint) => write!(f, "Static({hint:?})"),
            CacheHintPolicy::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Model-level `graphql.omit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModelOmit {
    /// Nothing omitted.
    #[default]
    None,
    /// The model is left out of the GraphQL API.
    All,
    /// Listed operations omitted.
    Operations(Vec<ModelOperation>),
    /// A value that is neither `true` nor a list of operations.
    Invalid(serde_json::Value),
}

impl ModelOmit {
    /// Interpret a loosely typed config value.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null | serde_json::Value::Bool(false) => ModelOmit::None,
            serde_json::Value::Bool(true) => ModelOmit::All,
            serde_json::Value::Array(items) => {
                let parsed: Option<Vec<ModelOperation>> = items
                    .iter()
                    .map(|item| serde_json::from_value(item.clone()).ok())
                    .collect();
                match parsed {
                    Some(ops) => ModelOmit::Operations(ops),
                    None => ModelOmit::Invalid(serde_json::Value::Array(items)),
                }
            }
            other => ModelOmit::Invalid(other),
        }
    }
}

/// Model-level GraphQL options.
#[derive(Debug, Clone, Default)]
pub struct ModelGraphqlConfig {
    /// Omitted operations.
    pub omit: ModelOmit,
    /// Cache hint policy.
    pub cache_hint: Option<CacheHintPolicy>,
    /// Maximum number of results a list query may return.
    pub max_results: Option<usize>,
    /// Plural name override for GraphQL.
    pub plural: Option<String>,
    /// Description of the output type.
    pub description: Option<String>,
}

/// Storage mapping of a model.
#[derive(Debug, Clone, Default)]
pub struct ModelDbConfig {
    /// Table name override.
    pub map: Option<String>,
    /// Id generation override.
    pub id_field: Option<IdFieldKind>,
}

/// Admin UI options of a model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ModelUiConfig {
    /// Label override.
    pub label: Option<String>,
    /// Singular label override.
    pub singular: Option<String>,
    /// Plural label override.
    pub plural: Option<String>,
    /// URL path override.
    pub path: Option<String>,
    /// Field used to label items.
    pub label_field: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Configuration of one model.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    /// Fields in declaration order.
    pub fields: IndexMap<String, FieldConfig>,
    /// Access control.
    pub access: ModelAccessConfig,
    /// Hooks.
    pub hooks: Hooks,
    /// GraphQL options.
    pub graphql: ModelGraphqlConfig,
    /// Default filterability of fields.
    pub default_is_filterable: Option<FilterOption>,
    /// Default orderability of fields.
    pub default_is_orderable: Option<FilterOption>,
    /// Storage mapping.
    pub db: ModelDbConfig,
    /// Admin UI options.
    pub ui: ModelUiConfig,
}

impl ModelConfig {
    /// Create an empty model config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn with_field(mut self, key: impl Into<String>, field: impl Into<FieldConfig>) -> Self {
        self.fields.insert(key.into(), field.into());
        self
    }

    /// Set access control.
    pub fn with_access(mut self, access: ModelAccessConfig) -> Self {
        self.access = access;
        self
    }

    /// Set hooks.
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Set `graphql.omit`.
    pub fn with_omit(mut self, omit: ModelOmit) -> Self {
        self.graphql.omit = omit;
        self
    }

    /// Omit the given operations.
    pub fn omitting(self, ops: impl IntoIterator<Item = ModelOperation>) -> Self {
        self.with_omit(ModelOmit::Operations(ops.into_iter().collect()))
    }

    /// Set the default filterability.
    pub fn with_default_filterable(mut self, option: impl Into<FilterOption>) -> Self {
        self.default_is_filterable = Some(option.into());
        self
    }

    /// Set the default orderability.
    pub fn with_default_orderable(mut self, option: impl Into<FilterOption>) -> Self {
        self.default_is_orderable = Some(option.into());
        self
    }

    /// Set the cache hint policy.
    pub fn with_cache_hint(mut self, policy: CacheHintPolicy) -> Self {
        self.graphql.cache_hint = Some(policy);
        self
    }

    /// Limit list query results.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.graphql.max_results = Some(max_results);
        self
    }

    /// Set the table name.
    pub fn with_db_map(mut self, map: impl Into<String>) -> Self {
        self.db.map = Some(map.into());
        self
    }

    /// Set Admin UI options.
    pub fn with_ui(mut self, ui: ModelUiConfig) -> Self {
        self.ui = ui;
        self
    }
}

/// Configuration of a whole schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaConfig {
    /// Models in declaration order.
    pub models: IndexMap<String, ModelConfig>,
    /// Database options.
    pub db: DbConfig,
    /// Named storage backends.
    pub storage: IndexMap<String, StorageConfig>,
}

impl SchemaConfig {
    /// Create an empty schema for the given provider.
    pub fn new(provider: DatabaseProvider) -> Self {
        Self {
            models: IndexMap::new(),
            db: DbConfig {
                provider,
                id_field: IdFieldKind::default(),
            },
            storage: IndexMap::new(),
        }
    }

    /// Add a model.
    pub fn with_model(mut self, key: impl Into<String>, model: ModelConfig) -> Self {
        self.models.insert(key.into(), model);
        self
    }

    /// Set the default id generation.
    pub fn with_id_field(mut self, kind: IdFieldKind) -> Self {
        self.db.id_field = kind;
        self
    }

    /// Register a storage backend.
    pub fn with_storage(mut self, name: impl Into<String>, storage: StorageConfig) -> Self {
        self.storage.insert(name.into(), storage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omit_from_json() {
        assert_eq!(ModelOmit::from_json(serde_json::json!(true)), ModelOmit::All);
        assert_eq!(ModelOmit::from_json(serde_json::Value::Null), ModelOmit::None);
        assert_eq!(
            ModelOmit::from_json(serde_json::json!(["update", "delete"])),
            ModelOmit::Operations(vec![ModelOperation::Update, ModelOperation::Delete])
        );
        assert!(matches!(
            ModelOmit::from_json(serde_json::json!(["archive"])),
            ModelOmit::Invalid(_)
        ));
        assert!(matches!(
            ModelOmit::from_json(serde_json::json!("update")),
            ModelOmit::Invalid(_)
        ));
    }

    #[test]
    fn test_static_cache_hint_fn() {
        let hint = CacheHint {
            max_age: Some(60),
            scope: CacheScope::Private,
        };
        let f = CacheHintPolicy::Static(hint).into_fn();
        let args = CacheHintArgs {
            result_count: 3,
            operation_name: None,
        };
        assert_eq!(f(&args), hint);
    }

    #[test]
    fn test_schema_builder() {
        let schema = SchemaConfig::new(DatabaseProvider::Postgresql)
            .with_model("User", ModelConfig::new().with_max_results(50))
            .with_id_field(IdFieldKind::Uuid);

        assert_eq!(schema.models.len(), 1);
        assert_eq!(schema.db.id_field, IdFieldKind::Uuid);
        assert_eq!(schema.models["User"].graphql.max_results, Some(50));
    }
}
