//! JSON schema files.
//!
//! A schema file describes models with declarative field types. Values that
//! can take several shapes (`omit`, filter defaults, access rules, field
//! `type`) are read as raw JSON and mapped onto the config enums, so an
//! unexpected shape reaches assembly as an `Invalid` value and is reported
//! there with the usual message.

use super::access::{
    AccessRule, FieldAccessConfig, FilterAccessConfig, ItemAccessConfig, ModelAccessConfig,
    OperationAccess, OperationAccessConfig,
};
use super::field::{
    FieldConfig, FieldGraphqlConfig, FieldOmit, FilterOption, ForeignKeyConfig, IndexKind,
};
use super::model::{
    CacheHint, CacheHintPolicy, DbConfig, IdFieldKind, ModelConfig, ModelDbConfig,
    ModelGraphqlConfig, ModelOmit, ModelUiConfig, SchemaConfig, StorageConfig,
};
use crate::error::{Error, Result};
use crate::fields::{
    checkbox, integer, json, relationship, text, timestamp, CheckboxFieldConfig,
    CommonFieldConfig, IntegerFieldConfig, JsonFieldConfig, RelationshipDbConfig,
    RelationshipFieldConfig, RelationshipUi, TextFieldConfig, TimestampDefault,
    TimestampFieldConfig,
};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

/// A schema loaded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SchemaFile {
    /// Database options.
    pub db: DbConfig,
    /// Named storage backends.
    pub storage: IndexMap<String, StorageConfig>,
    /// Models in declaration order.
    pub models: IndexMap<String, ModelFile>,
}

/// One model of a schema file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ModelFile {
    /// Raw field declarations.
    pub fields: IndexMap<String, Value>,
    /// Raw access config.
    pub access: Option<Value>,
    /// GraphQL options.
    pub graphql: ModelGraphqlFile,
    /// Raw default filterability.
    pub default_is_filterable: Option<Value>,
    /// Raw default orderability.
    pub default_is_orderable: Option<Value>,
    /// Storage mapping.
    pub db: ModelDbFile,
    /// Admin UI options.
    pub ui: ModelUiConfig,
}

/// `graphql` options of a model in a schema file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ModelGraphqlFile {
    /// Raw `omit`.
    pub omit: Option<Value>,
    /// Maximum list query results.
    pub max_results: Option<usize>,
    /// Static cache hint.
    pub cache_hint: Option<CacheHint>,
    /// Plural name override.
    pub plural: Option<String>,
    /// Output type description.
    pub description: Option<String>,
}

/// `db` options of a model in a schema file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ModelDbFile {
    /// Table name override.
    pub map: Option<String>,
    /// Id generation override.
    pub id_field: Option<IdFieldKind>,
}

impl SchemaFile {
    /// Read and parse a schema file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), bytes = content.len(), "schema file read");
        content.parse()
    }

    /// Read a schema file and convert it in one step.
    pub fn load(path: impl AsRef<Path>) -> Result<SchemaConfig> {
        Self::from_path(path)?.into_config()
    }

    /// Convert to a [`SchemaConfig`] with field factories.
    pub fn into_config(self) -> Result<SchemaConfig> {
        let mut config = SchemaConfig {
            models: IndexMap::new(),
            db: self.db,
            storage: self.storage,
        };
        for (key, model) in self.models {
            let model = model_config(&key, model)?;
            config.models.insert(key, model);
        }
        Ok(config)
    }
}

impl FromStr for SchemaFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

fn model_config(key: &str, file: ModelFile) -> Result<ModelConfig> {
    let mut fields = IndexMap::new();
    for (field_key, value) in file.fields {
        let field = field_config(key, &field_key, value)?;
        fields.insert(field_key, field);
    }

    Ok(ModelConfig {
        fields,
        access: file.access.map(model_access).unwrap_or_default(),
        hooks: Default::default(),
        graphql: ModelGraphqlConfig {
            omit: file.graphql.omit.map(ModelOmit::from_json).unwrap_or_default(),
            cache_hint: file.graphql.cache_hint.map(CacheHintPolicy::Static),
            max_results: file.graphql.max_results,
            plural: file.graphql.plural,
            description: file.graphql.description,
        },
        default_is_filterable: file.default_is_filterable.map(FilterOption::from_json),
        default_is_orderable: file.default_is_orderable.map(FilterOption::from_json),
        db: ModelDbConfig {
            map: file.db.map,
            id_field: file.db.id_field,
        },
        ui: file.ui,
    })
}

fn model_access(value: Value) -> ModelAccessConfig {
    let Value::Object(mut map) = value else {
        return ModelAccessConfig::Rule(AccessRule::from_json(value));
    };
    let operation = match map.remove("operation") {
        None => OperationAccess::default(),
        Some(Value::Object(mut ops)) => OperationAccess::PerOperation(OperationAccessConfig {
            query: take(&mut ops, "query"),
            create: take(&mut ops, "create"),
            update: take(&mut ops, "update"),
            delete: take(&mut ops, "delete"),
        }),
        Some(other) => OperationAccess::All(AccessRule::from_json(other)),
    };
    let mut filter = match map.remove("filter") {
        Some(Value::Object(filter)) => filter,
        Some(other) => single("query", other),
        None => Default::default(),
    };
    let mut item = match map.remove("item") {
        Some(Value::Object(item)) => item,
        Some(other) => single("create", other),
        None => Default::default(),
    };

    ModelAccessConfig::Detailed {
        operation,
        filter: FilterAccessConfig {
            query: take(&mut filter, "query"),
            update: take(&mut filter, "update"),
            delete: take(&mut filter, "delete"),
        },
        item: ItemAccessConfig {
            create: take(&mut item, "create"),
            update: take(&mut item, "update"),
            delete: take(&mut item, "delete"),
        },
    }
}

fn take(map: &mut serde_json::Map<String, Value>, key: &str) -> Option<AccessRule> {
    map.remove(key).map(AccessRule::from_json)
}

/// A non-object value where an object of rules was expected; kept under one
/// key so it surfaces as an invalid rule.
fn single(key: &str, value: Value) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), value);
    map
}

fn field_access(value: Value) -> FieldAccessConfig {
    match value {
        Value::Object(mut map) => FieldAccessConfig::PerOperation {
            read: map.remove("read").map(AccessRule::from_json),
            create: map.remove("create").map(AccessRule::from_json),
            update: map.remove("update").map(AccessRule::from_json),
        },
        other => FieldAccessConfig::Rule(AccessRule::from_json(other)),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FieldGraphqlFile {
    omit: Option<Value>,
    cache_hint: Option<CacheHint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CommonFile {
    access: Option<Value>,
    graphql: FieldGraphqlFile,
    is_filterable: Option<Value>,
    is_orderable: Option<Value>,
    label: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ScalarDbFile {
    map: Option<String>,
    is_nullable: Option<bool>,
    updated_at: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ScalarFile<D> {
    #[serde(flatten)]
    common: CommonFile,
    default_value: Option<D>,
    is_indexed: Option<Value>,
    db: ScalarDbFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RelationshipDbFile {
    foreign_key: Option<Value>,
    relation_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RelationshipFile {
    #[serde(flatten)]
    common: CommonFile,
    #[serde(rename = "ref")]
    ref_: String,
    many: bool,
    db: RelationshipDbFile,
    ui: RelationshipUi,
}

/// Where a field option sits, for error messages.
struct FieldPath<'a> {
    model: &'a str,
    field: &'a str,
}

impl FieldPath<'_> {
    fn invalid(&self, message: impl Into<String>) -> Error {
        Error::InvalidFieldConfig {
            model: self.model.to_string(),
            field: self.field.to_string(),
            message: message.into(),
        }
    }

    fn parse<T: DeserializeOwned>(&self, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| self.invalid(e.to_string()))
    }

    fn common(&self, file: CommonFile) -> Result<CommonFieldConfig> {
        let omit = match file.graphql.omit {
            None | Some(Value::Bool(false)) => FieldOmit::None,
            Some(Value::Bool(true)) => FieldOmit::All,
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(ops) => FieldOmit::Operations(ops),
                Err(_) => {
                    return Err(Error::InvalidOmit {
                        model: format!("{}.{}", self.model, self.field),
                        received: value.to_string(),
                    })
                }
            },
        };
        Ok(CommonFieldConfig {
            access: file.access.map(field_access).unwrap_or_default(),
            hooks: Default::default(),
            graphql: FieldGraphqlConfig {
                omit,
                cache_hint: file.graphql.cache_hint,
            },
            is_filterable: file.is_filterable.map(FilterOption::from_json),
            is_orderable: file.is_orderable.map(FilterOption::from_json),
            label: file.label,
            description: file.description,
        })
    }

    fn index(&self, value: Option<Value>) -> Result<Option<IndexKind>> {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
            Some(Value::Bool(true)) => Ok(Some(IndexKind::Index)),
            Some(value) => self
                .parse(value)
                .map(Some)
                .map_err(|_| self.invalid("isIndexed must be true, 'index' or 'unique'")),
        }
    }

    fn foreign_key(&self, value: Option<Value>) -> Result<Option<ForeignKeyConfig>> {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
            Some(Value::Bool(true)) => Ok(Some(ForeignKeyConfig::Owned)),
            Some(Value::Object(map)) => match map.get("map").and_then(Value::as_str) {
                Some(column) => Ok(Some(ForeignKeyConfig::Mapped(column.to_string()))),
                None => Err(self.invalid("db.foreignKey.map must be a string")),
            },
            Some(_) => Err(self.invalid("db.foreignKey must be true or { map }")),
        }
    }
}

fn field_config(model: &str, field: &str, value: Value) -> Result<FieldConfig> {
    let path = FieldPath { model, field };
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return Ok(FieldConfig::Invalid(value));
    };

    let factory = match kind {
        "text" => {
            let file: ScalarFile<String> = path.parse(value)?;
            text(TextFieldConfig {
                is_indexed: path.index(file.is_indexed)?,
                is_nullable: file.db.is_nullable.unwrap_or(false),
                default_value: file.default_value,
                map: file.db.map,
                common: path.common(file.common)?,
            })
        }
        "integer" => {
            let file: ScalarFile<i64> = path.parse(value)?;
            integer(IntegerFieldConfig {
                is_indexed: path.index(file.is_indexed)?,
                is_nullable: file.db.is_nullable.unwrap_or(true),
                default_value: file.default_value,
                map: file.db.map,
                common: path.common(file.common)?,
            })
        }
        "checkbox" => {
            let file: ScalarFile<bool> = path.parse(value)?;
            checkbox(CheckboxFieldConfig {
                is_indexed: path.index(file.is_indexed)?,
                default_value: file.default_value.unwrap_or(false),
                map: file.db.map,
                common: path.common(file.common)?,
            })
        }
        "timestamp" => {
            let file: ScalarFile<Value> = path.parse(value)?;
            let default_value = match file.default_value {
                None | Some(Value::Null) => None,
                Some(Value::String(literal)) => Some(TimestampDefault::Literal(literal)),
                Some(Value::Object(map))
                    if map.get("kind").and_then(Value::as_str) == Some("now") =>
                {
                    Some(TimestampDefault::Now)
                }
                Some(_) => {
                    return Err(path.invalid(
                        "defaultValue must be an RFC 3339 string or { kind: 'now' }",
                    ))
                }
            };
            timestamp(TimestampFieldConfig {
                default_value,
                updated_at: file.db.updated_at,
                is_indexed: path.index(file.is_indexed)?,
                is_nullable: file.db.is_nullable.unwrap_or(true),
                map: file.db.map,
                common: path.common(file.common)?,
            })
        }
        "json" => {
            let file: ScalarFile<Value> = path.parse(value)?;
            json(JsonFieldConfig {
                default_value: file.default_value,
                map: file.db.map,
                common: path.common(file.common)?,
            })
        }
        "relationship" => {
            let file: RelationshipFile = path.parse(value)?;
            relationship(RelationshipFieldConfig {
                ref_: file.ref_,
                many: file.many,
                db: RelationshipDbConfig {
                    foreign_key: path.foreign_key(file.db.foreign_key)?,
                    relation_name: file.db.relation_name,
                },
                ui: file.ui,
                common: path.common(file.common)?,
            })
        }
        _ => return Ok(FieldConfig::Invalid(value)),
    };
    Ok(FieldConfig::Factory(factory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseProvider;
    use serde_json::json;
    use std::io::Write;

    fn parse(value: Value) -> Result<SchemaConfig> {
        value.to_string().parse::<SchemaFile>()?.into_config()
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({
                "db": { "provider": "postgresql", "idField": "uuid" },
                "models": {
                    "Post": {
                        "fields": {
                            "title": { "type": "text", "isIndexed": "unique" },
                            "published": { "type": "checkbox", "defaultValue": true }
                        },
                        "graphql": { "omit": ["delete"], "maxResults": 20 }
                    }
                }
            })
        )
        .unwrap();

        let config = SchemaFile::load(file.path()).unwrap();
        assert_eq!(config.db.provider, DatabaseProvider::Postgresql);
        assert_eq!(config.db.id_field, IdFieldKind::Uuid);
        let post = &config.models["Post"];
        assert_eq!(post.graphql.max_results, Some(20));
        assert!(matches!(post.fields["title"], FieldConfig::Factory(_)));
        assert_eq!(
            post.graphql.omit,
            ModelOmit::Operations(vec![crate::config::ModelOperation::Delete])
        );
    }

    #[test]
    fn test_unknown_type_is_not_a_factory() {
        let config = parse(json!({
            "models": { "Post": { "fields": { "title": { "type": "nope" }, "body": {} } } }
        }))
        .unwrap();
        assert!(matches!(config.models["Post"].fields["title"], FieldConfig::Invalid(_)));
        assert!(matches!(config.models["Post"].fields["body"], FieldConfig::Invalid(_)));
    }

    #[test]
    fn test_access_shapes() {
        assert!(matches!(
            model_access(json!(1)),
            ModelAccessConfig::Rule(AccessRule::Invalid(_))
        ));
        let detailed = model_access(json!({ "operation": { "delete": false }, "filter": 3 }));
        let ModelAccessConfig::Detailed { operation, filter, .. } = detailed else {
            panic!("expected detailed access");
        };
        assert!(matches!(
            operation,
            OperationAccess::PerOperation(OperationAccessConfig {
                delete: Some(AccessRule::Allow(false)),
                ..
            })
        ));
        assert!(matches!(filter.query, Some(AccessRule::Invalid(_))));
        assert!(matches!(
            field_access(json!({ "read": true })),
            FieldAccessConfig::PerOperation {
                read: Some(AccessRule::Allow(true)),
                create: None,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_field_options() {
        let err = parse(json!({
            "models": { "Post": { "fields": { "title": { "type": "text", "isIndexed": "sometimes" } } } }
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidFieldConfig { ref field, .. } if field == "title"));

        let err = parse(json!({
            "models": { "Post": { "fields": { "title": { "type": "text", "graphql": { "omit": "read" } } } } }
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The graphql.omit option on Post.title must be true or a list of operations. Received '\"read\"'."
        );
    }

    #[test]
    fn test_relationship_options() {
        let config = parse(json!({
            "models": {
                "Post": { "fields": { "author": {
                    "type": "relationship",
                    "ref": "User.posts",
                    "db": { "foreignKey": { "map": "author_id" } },
                    "ui": { "displayMode": "cards", "cardFields": ["name"] }
                } } },
                "User": { "fields": {
                    "name": { "type": "text" },
                    "posts": { "type": "relationship", "ref": "Post.author", "many": true }
                } }
            }
        }))
        .unwrap();
        let registry = crate::schema::assemble(&config).unwrap();
        let post = registry.model("Post").unwrap();
        assert!(matches!(
            post.resolved_db_fields["author"],
            crate::schema::ResolvedDbField::Relation(crate::schema::ResolvedRelation::One {
                foreign_id: crate::schema::ForeignIdField::Owned { ref map },
                ..
            }) if map == "author_id"
        ));
    }

    #[test]
    fn test_misspelled_model_key() {
        let err = parse(json!({
            "models": { "Post": { "defaultIsFilterabel": false, "fields": {} } }
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("defaultIsFilterabel"));

        let err = parse(json!({
            "models": { "Post": { "graphql": { "maxResult": 5 }, "fields": {} } }
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        let err = parse(json!({ "modles": {} })).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = "{ models: ".parse::<SchemaFile>().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
