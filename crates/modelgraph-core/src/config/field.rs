//! Field factories and the raw [`FieldSpec`] they produce.

use super::access::FieldAccessConfig;
use super::hooks::Hooks;
use super::model::{CacheHint, DatabaseProvider, StorageConfig};
use crate::error::{Error, Result};
use crate::graphql::{Arg, OutputField};
use crate::schema::{AdminMetaRoot, ModelTypes, RegistryView};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Everything a field factory can see while building its field.
pub struct FieldMeta<'a> {
    /// Key of the field being built.
    pub field_key: &'a str,
    /// Model the field belongs to.
    pub model_key: &'a str,
    /// Synthesized GraphQL types of every model.
    pub types: &'a IndexMap<String, ModelTypes>,
    /// Read view of the registry. It is not populated until assembly ends.
    pub registry: &'a RegistryView,
    /// Database provider.
    pub provider: DatabaseProvider,
    pub(crate) storage: &'a IndexMap<String, StorageConfig>,
}

impl<'a> FieldMeta<'a> {
    /// Look up a named storage configuration.
    pub fn storage(&self, name: &str) -> Option<&'a StorageConfig> {
        self.storage.get(name)
    }

    /// Synthesized types for a model.
    pub fn model_types(&self, model_key: &str) -> Option<&'a ModelTypes> {
        self.types.get(model_key)
    }
}

/// Builds a field spec. Called once per field during assembly.
pub type FieldFactory = Arc<dyn Fn(&FieldMeta<'_>) -> Result<FieldSpec> + Send + Sync>;

/// A field entry in a model config.
#[derive(Clone)]
pub enum FieldConfig {
    /// A field factory.
    Factory(FieldFactory),
    /// Something that is not a factory, kept so assembly can report it.
    Invalid(serde_json::Value),
}

impl From<FieldFactory> for FieldConfig {
    fn from(factory: FieldFactory) -> Self {
        FieldConfig::Factory(factory)
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldConfig::Factory(_) => f.write_str("Factory(..)"),
            FieldConfig::Invalid(v) => write!(f, "Invalid({v})"),
        }
    }
}

/// Request-time arguments for filter/orderBy predicates.
#[derive(Debug, Clone, Copy)]
pub struct FilterOrderArgs<'a> {
    /// Session data of the current request, if any.
    pub session: Option<&'a serde_json::Value>,
    /// Model being filtered or ordered.
    pub model_key: &'a str,
    /// Field being filtered or ordered.
    pub field_key: &'a str,
}

/// A request-time filter/orderBy check.
pub type FilterPredicate = Arc<dyn Fn(&FilterOrderArgs<'_>) -> bool + Send + Sync>;

/// Configured filterability/orderability.
#[derive(Clone)]
pub enum FilterOption {
    /// Fixed.
    Allow(bool),
    /// Decided per request.
    Predicate(FilterPredicate),
    /// Neither a boolean nor a function.
    Invalid(serde_json::Value),
}

impl FilterOption {
    /// Wrap a predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&FilterOrderArgs<'_>) -> bool + Send + Sync + 'static,
    {
        FilterOption::Predicate(Arc::new(f))
    }

    /// Interpret a loosely typed config value.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => FilterOption::Allow(b),
            other => FilterOption::Invalid(other),
        }
    }

    /// Validate the shape, naming `model.option` on failure.
    pub fn to_toggle(&self, model: &str, option: &str) -> Result<Toggle> {
        match self {
            FilterOption::Allow(b) => Ok(Toggle::Static(*b)),
            FilterOption::Predicate(f) => Ok(Toggle::Dynamic(f.clone())),
            FilterOption::Invalid(value) => Err(Error::InvalidFilterOption {
                model: model.to_string(),
                option: option.to_string(),
                received: value.to_string(),
            }),
        }
    }
}

impl From<bool> for FilterOption {
    fn from(b: bool) -> Self {
        FilterOption::Allow(b)
    }
}

impl fmt::Debug for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOption::Allow(b) => write!(f, "Allow({b})"),
            FilterOption::Predicate(_) => f.write_str("Predicate(..)"),
            FilterOption::Invalid(v) => write!(f, "Invalid({v})"),
        }
    }
}

/// Resolved filter/orderBy enablement.
#[derive(Clone)]
pub enum Toggle {
    /// Fixed.
    Static(bool),
    /// Decided per request.
    Dynamic(FilterPredicate),
}

impl Toggle {
    /// Whether the capability is statically off.
    pub fn is_off(&self) -> bool {
        matches!(self, Toggle::Static(false))
    }

    /// Value shown to consumers that cannot run predicates.
    pub fn as_static(&self) -> bool {
        !self.is_off()
    }

    /// Evaluate for a request.
    pub fn evaluate(&self, args: &FilterOrderArgs<'_>) -> bool {
        match self {
            Toggle::Static(b) => *b,
            Toggle::Dynamic(f) => f(args),
        }
    }
}

impl PartialEq for Toggle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Toggle::Static(a), Toggle::Static(b)) => a == b,
            (Toggle::Dynamic(a), Toggle::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toggle::Static(b) => write!(f, "Static({b})"),
            Toggle::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Field-level `graphql.omit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldOmit {
    /// Nothing omitted.
    #[default]
    None,
    /// Field hidden from every operation.
    All,
    /// Listed operations omitted.
    Operations(Vec<super::access::FieldOperation>),
}

impl FieldOmit {
    /// Whether `operation` is omitted.
    pub fn omits(&self, operation: super::access::FieldOperation) -> bool {
        match self {
            FieldOmit::None => false,
            FieldOmit::All => true,
            FieldOmit::Operations(ops) => ops.contains(&operation),
        }
    }
}

/// Field-level GraphQL options.
#[derive(Debug, Clone, Default)]
pub struct FieldGraphqlConfig {
    /// Omitted operations.
    pub omit: FieldOmit,
    /// Cache hint for the output field.
    pub cache_hint: Option<CacheHint>,
}

/// Native scalar storage kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Text.
    String,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Floating point.
    Float,
    /// Fixed precision decimal.
    Decimal,
    /// Boolean.
    Boolean,
    /// Timestamp.
    DateTime,
    /// JSON document.
    Json,
}

/// Nullability/arity of a scalar column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarMode {
    /// Not null.
    Required,
    /// Nullable.
    #[default]
    Optional,
    /// Array of values.
    Many,
}

/// Default value of a scalar column.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarDefault {
    /// A literal.
    Literal(serde_json::Value),
    /// Database sequence.
    Autoincrement,
    /// Generated cuid.
    Cuid,
    /// Generated uuid.
    Uuid,
    /// Current time.
    Now,
}

/// Index on a scalar column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexKind {
    /// Non-unique index.
    Index,
    /// Unique index.
    Unique,
}

/// A scalar database field.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarDbField {
    /// Storage kind.
    pub kind: ScalarKind,
    /// Nullability/arity.
    pub mode: ScalarMode,
    /// Default value.
    pub default: Option<ScalarDefault>,
    /// Index.
    pub index: Option<IndexKind>,
    /// Column name override.
    pub map: Option<String>,
    /// Refreshed on every update.
    pub updated_at: bool,
}

impl ScalarDbField {
    /// Create an optional scalar with no default or index.
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            mode: ScalarMode::Optional,
            default: None,
            index: None,
            map: None,
            updated_at: false,
        }
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: ScalarMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the default.
    pub fn with_default(mut self, default: Option<ScalarDefault>) -> Self {
        self.default = default;
        self
    }

    /// Set the index.
    pub fn with_index(mut self, index: Option<IndexKind>) -> Self {
        self.index = index;
        self
    }

    /// Set the column name override.
    pub fn with_map(mut self, map: Option<String>) -> Self {
        self.map = map;
        self
    }
}

/// `db.foreignKey` of a to-one relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyConfig {
    /// This side owns the foreign key; column named after the field.
    Owned,
    /// This side owns the foreign key in the named column.
    Mapped(String),
}

/// Arity of a relationship side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationMode {
    /// To-one.
    One {
        /// Foreign key ownership claim.
        foreign_key: Option<ForeignKeyConfig>,
    },
    /// To-many.
    Many {
        /// Join table name override.
        relation_name: Option<String>,
    },
}

/// A relationship as declared by one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDbField {
    /// Arity and storage claims.
    pub mode: RelationMode,
    /// Target model.
    pub model: String,
    /// Target field, when the relationship is two-sided.
    pub field: Option<String>,
}

impl RelationDbField {
    /// Whether this side is to-many.
    pub fn is_many(&self) -> bool {
        matches!(self.mode, RelationMode::Many { .. })
    }
}

/// Storage shape a field declares before relationships resolve.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DbField {
    /// Not stored (virtual).
    #[default]
    None,
    /// A scalar column.
    Scalar(ScalarDbField),
    /// A relationship.
    Relation(RelationDbField),
}

/// GraphQL inputs a field accepts.
#[derive(Debug, Clone, Default)]
pub struct FieldInputs {
    /// Argument in the model's where input.
    pub where_: Option<Arg>,
    /// Argument in the model's unique-where input.
    pub unique_where: Option<Arg>,
    /// Argument in the model's create input.
    pub create: Option<Arg>,
    /// Argument in the model's update input.
    pub update: Option<Arg>,
    /// Argument in the model's orderBy input.
    pub order_by: Option<Arg>,
}

/// Produces field-specific admin metadata.
pub type AdminMetaFn = Arc<dyn Fn(&AdminMetaRoot) -> Result<serde_json::Value> + Send + Sync>;

/// Admin UI options of a field.
#[derive(Clone, Default)]
pub struct FieldUi {
    /// View identifier used by the Admin UI.
    pub view: String,
    /// Label override.
    pub label: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Field-specific admin metadata.
    pub admin_meta: Option<AdminMetaFn>,
}

impl fmt::Debug for FieldUi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldUi")
            .field("view", &self.view)
            .field("label", &self.label)
            .field("admin_meta", &self.admin_meta.is_some())
            .finish()
    }
}

/// What a field factory returns.
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    /// Storage shape.
    pub db_field: DbField,
    /// Access control.
    pub access: FieldAccessConfig,
    /// Hooks.
    pub hooks: Hooks,
    /// GraphQL inputs.
    pub input: FieldInputs,
    /// Output field on the model type.
    pub output: Option<OutputField>,
    /// Additional output fields contributed by this field.
    pub extra_output_fields: IndexMap<String, OutputField>,
    /// GraphQL options.
    pub graphql: FieldGraphqlConfig,
    /// Field-level filterability.
    pub is_filterable: Option<FilterOption>,
    /// Field-level orderability.
    pub is_orderable: Option<FilterOption>,
    /// Admin UI options.
    pub ui: FieldUi,
}
