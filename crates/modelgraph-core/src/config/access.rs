//! Access-control configuration and its resolved form.
//!
//! A rule is a boolean, a predicate, or a value of some other shape that came
//! from a loosely typed config source. The last kind is never coerced; field
//! assertions reject it during assembly.

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Operations guarded at the model level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelOperation {
    /// Reading items.
    Query,
    /// Creating items.
    Create,
    /// Updating items.
    Update,
    /// Deleting items.
    Delete,
}

impl ModelOperation {
    /// All model operations.
    pub const ALL: [ModelOperation; 4] = [
        ModelOperation::Query,
        ModelOperation::Create,
        ModelOperation::Update,
        ModelOperation::Delete,
    ];

    /// Operation name as used in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelOperation::Query => "query",
            ModelOperation::Create => "create",
            ModelOperation::Update => "update",
            ModelOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for ModelOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations guarded at the field level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldOperation {
    /// Reading the field.
    Read,
    /// Setting the field on create.
    Create,
    /// Setting the field on update.
    Update,
}

/// Request-time arguments handed to access predicates.
#[derive(Debug, Clone, Copy)]
pub struct AccessArgs<'a> {
    /// Session data of the current request, if any.
    pub session: Option<&'a serde_json::Value>,
    /// Model being accessed.
    pub model_key: &'a str,
    /// Field being accessed, for field-level rules.
    pub field_key: Option<&'a str>,
    /// Operation name (`query`, `read`, `create`, ...).
    pub operation: &'a str,
}

/// A request-time access check.
pub type AccessPredicate = Arc<dyn Fn(&AccessArgs<'_>) -> bool + Send + Sync>;

/// One access rule.
#[derive(Clone)]
pub enum AccessRule {
    /// A fixed decision.
    Allow(bool),
    /// A decision made per request.
    Predicate(AccessPredicate),
    /// A value that is neither a boolean nor a function.
    Invalid(serde_json::Value),
}

impl AccessRule {
    /// Always allow.
    pub fn allow_all() -> Self {
        AccessRule::Allow(true)
    }

    /// Always deny.
    pub fn deny_all() -> Self {
        AccessRule::Allow(false)
    }

    /// Wrap a predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&AccessArgs<'_>) -> bool + Send + Sync + 'static,
    {
        AccessRule::Predicate(Arc::new(f))
    }

    /// Evaluate the rule. Invalid rules deny.
    pub fn evaluate(&self, args: &AccessArgs<'_>) -> bool {
        match self {
            AccessRule::Allow(allowed) => *allowed,
            AccessRule::Predicate(f) => f(args),
            AccessRule::Invalid(_) => false,
        }
    }

    /// Reject invalid shapes.
    pub fn validate(&self, target: &str, option: &str) -> Result<()> {
        match self {
            AccessRule::Allow(_) | AccessRule::Predicate(_) => Ok(()),
            AccessRule::Invalid(value) => Err(Error::InvalidAccessControl {
                target: target.to_string(),
                option: option.to_string(),
                received: value.to_string(),
            }),
        }
    }

    /// Interpret a loosely typed config value.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => AccessRule::Allow(b),
            other => AccessRule::Invalid(other),
        }
    }
}

impl Default for AccessRule {
    fn default() -> Self {
        AccessRule::allow_all()
    }
}

impl From<bool> for AccessRule {
    fn from(allowed: bool) -> Self {
        AccessRule::Allow(allowed)
    }
}

impl fmt::Debug for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRule::Allow(b) => write!(f, "Allow({b})"),
            AccessRule::Predicate(_) => f.write_str("Predicate(..)"),
            AccessRule::Invalid(v) => write!(f, "Invalid({v})"),
        }
    }
}

/// Per-operation rules for the `operation` key of model access.
#[derive(Debug, Clone, Default)]
pub struct OperationAccessConfig {
    /// Query rule.
    pub query: Option<AccessRule>,
    /// Create rule.
    pub create: Option<AccessRule>,
    /// Update rule.
    pub update: Option<AccessRule>,
    /// Delete rule.
    pub delete: Option<AccessRule>,
}

/// Filter rules of model access.
#[derive(Debug, Clone, Default)]
pub struct FilterAccessConfig {
    /// Query filter rule.
    pub query: Option<AccessRule>,
    /// Update filter rule.
    pub update: Option<AccessRule>,
    /// Delete filter rule.
    pub delete: Option<AccessRule>,
}

/// Item rules of model access.
#[derive(Debug, Clone, Default)]
pub struct ItemAccessConfig {
    /// Create item rule.
    pub create: Option<AccessRule>,
    /// Update item rule.
    pub update: Option<AccessRule>,
    /// Delete item rule.
    pub delete: Option<AccessRule>,
}

/// The `operation` key: a single rule or per-operation rules.
#[derive(Debug, Clone)]
pub enum OperationAccess {
    /// One rule for every operation.
    All(AccessRule),
    /// Individual rules.
    PerOperation(OperationAccessConfig),
}

impl Default for OperationAccess {
    fn default() -> Self {
        OperationAccess::PerOperation(OperationAccessConfig::default())
    }
}

/// Model-level access configuration.
#[derive(Debug, Clone)]
pub enum ModelAccessConfig {
    /// One rule applied to every operation.
    Rule(AccessRule),
    /// Operation, filter, and item rules.
    Detailed {
        /// Operation rules.
        operation: OperationAccess,
        /// Filter rules.
        filter: FilterAccessConfig,
        /// Item rules.
        item: ItemAccessConfig,
    },
}

impl Default for ModelAccessConfig {
    fn default() -> Self {
        ModelAccessConfig::Rule(AccessRule::allow_all())
    }
}

/// Resolved operation rules.
#[derive(Debug, Clone, Default)]
pub struct OperationRules {
    /// Query rule.
    pub query: AccessRule,
    /// Create rule.
    pub create: AccessRule,
    /// Update rule.
    pub update: AccessRule,
    /// Delete rule.
    pub delete: AccessRule,
}

/// Resolved filter rules.
#[derive(Debug, Clone, Default)]
pub struct FilterRules {
    /// Query filter rule.
    pub query: AccessRule,
    /// Update filter rule.
    pub update: AccessRule,
    /// Delete filter rule.
    pub delete: AccessRule,
}

/// Resolved item rules.
#[derive(Debug, Clone, Default)]
pub struct ItemRules {
    /// Create item rule.
    pub create: AccessRule,
    /// Update item rule.
    pub update: AccessRule,
    /// Delete item rule.
    pub delete: AccessRule,
}

/// Fully populated model access control.
#[derive(Debug, Clone, Default)]
pub struct ResolvedModelAccess {
    /// Operation rules.
    pub operation: OperationRules,
    /// Filter rules.
    pub filter: FilterRules,
    /// Item rules.
    pub item: ItemRules,
}

impl ResolvedModelAccess {
    /// Normalize model access config, filling missing rules with allow.
    pub fn parse(config: &ModelAccessConfig) -> Self {
        match config {
            ModelAccessConfig::Rule(rule) => Self {
                operation: OperationRules {
                    query: rule.clone(),
                    create: rule.clone(),
                    update: rule.clone(),
                    delete: rule.clone(),
                },
                filter: FilterRules::default(),
                item: ItemRules::default(),
            },
            ModelAccessConfig::Detailed {
                operation,
                filter,
                item,
            } => {
                let operation = match operation {
                    OperationAccess::All(rule) => OperationRules {
                        query: rule.clone(),
                        create: rule.clone(),
                        update: rule.clone(),
                        delete: rule.clone(),
                    },
                    OperationAccess::PerOperation(ops) => OperationRules {
                        query: ops.query.clone().unwrap_or_default(),
                        create: ops.create.clone().unwrap_or_default(),
                        update: ops.update.clone().unwrap_or_default(),
                        delete: ops.delete.clone().unwrap_or_default(),
                    },
                };
                Self {
                    operation,
                    filter: FilterRules {
                        query: filter.query.clone().unwrap_or_default(),
                        update: filter.update.clone().unwrap_or_default(),
                        delete: filter.delete.clone().unwrap_or_default(),
                    },
                    item: ItemRules {
                        create: item.create.clone().unwrap_or_default(),
                        update: item.update.clone().unwrap_or_default(),
                        delete: item.delete.clone().unwrap_or_default(),
                    },
                }
            }
        }
    }

    /// Every rule with its option path.
    pub fn rules(&self) -> [(&'static str, &AccessRule); 10] {
        [
            ("operation.query", &self.operation.query),
            ("operation.create", &self.operation.create),
            ("operation.update", &self.operation.update),
            ("operation.delete", &self.operation.delete),
            ("filter.query", &self.filter.query),
            ("filter.update", &self.filter.update),
            ("filter.delete", &self.filter.delete),
            ("item.create", &self.item.create),
            ("item.update", &self.item.update),
            ("item.delete", &self.item.delete),
        ]
    }

    /// Rule guarding a model operation.
    pub fn for_operation(&self, operation: ModelOperation) -> &AccessRule {
        match operation {
            ModelOperation::Query => &self.operation.query,
            ModelOperation::Create => &self.operation.create,
            ModelOperation::Update => &self.operation.update,
            ModelOperation::Delete => &self.operation.delete,
        }
    }
}

/// Field-level access configuration.
#[derive(Debug, Clone)]
pub enum FieldAccessConfig {
    /// One rule for read, create, and update.
    Rule(AccessRule),
    /// Individual rules.
    PerOperation {
        /// Read rule.
        read: Option<AccessRule>,
        /// Create rule.
        create: Option<AccessRule>,
        /// Update rule.
        update: Option<AccessRule>,
    },
}

impl Default for FieldAccessConfig {
    fn default() -> Self {
        FieldAccessConfig::Rule(AccessRule::allow_all())
    }
}

/// Fully populated field access control.
#[derive(Debug, Clone, Default)]
pub struct ResolvedFieldAccess {
    /// Read rule.
    pub read: AccessRule,
    /// Create rule.
    pub create: AccessRule,
    /// Update rule.
    pub update: AccessRule,
}

impl ResolvedFieldAccess {
    /// Normalize field access config, filling missing rules with allow.
    pub fn parse(config: &FieldAccessConfig) -> Self {
        match config {
            FieldAccessConfig::Rule(rule) => Self {
                read: rule.clone(),
                create: rule.clone(),
                update: rule.clone(),
            },
            FieldAccessConfig::PerOperation {
                read,
                create,
                update,
            } => Self {
                read: read.clone().unwrap_or_default(),
                create: create.clone().unwrap_or_default(),
                update: update.clone().unwrap_or_default(),
            },
        }
    }

    /// Every rule with its option path.
    pub fn rules(&self) -> [(&'static str, &AccessRule); 3] {
        [
            ("read", &self.read),
            ("create", &self.create),
            ("update", &self.update),
        ]
    }

    /// Rule guarding a field operation.
    pub fn for_operation(&self, operation: FieldOperation) -> &AccessRule {
        match operation {
            FieldOperation::Read => &self.read,
            FieldOperation::Create => &self.create,
            FieldOperation::Update => &self.update,
        }
    }
}
