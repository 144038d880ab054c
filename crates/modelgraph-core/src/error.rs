//! Core error types.

use thiserror::Error;

/// Errors raised while assembling or inspecting a schema.
///
/// Every configuration variant names the offending model and, where one is
/// involved, the field, so a startup failure points straight at the config.
#[derive(Debug, Error)]
pub enum Error {
    /// A field entry is not a field factory.
    #[error("The field at {model}.{field} does not provide a function")]
    MissingFieldFactory {
        /// Model declaring the field.
        model: String,
        /// Field key.
        field: String,
    },

    /// A filterability/orderability option has the wrong shape.
    #[error(
        "Configuration option '{model}.{option}' must be either a boolean value or a function. Received '{received}'."
    )]
    InvalidFilterOption {
        /// Model the option belongs to.
        model: String,
        /// Option name (`isFilterable`, `defaultIsOrderable`, ...).
        option: String,
        /// The rejected value.
        received: String,
    },

    /// A `graphql.omit` value has the wrong shape.
    #[error(
        "The graphql.omit option on {model} must be true or a list of operations. Received '{received}'."
    )]
    InvalidOmit {
        /// Model (or `Model.field`) the option belongs to.
        model: String,
        /// The rejected value.
        received: String,
    },

    /// An access rule is neither a boolean nor a function.
    #[error(
        "The access control option '{option}' on {target} must be either a boolean value or a function. Received '{received}'."
    )]
    InvalidAccessControl {
        /// `Model` or `Model.field`.
        target: String,
        /// Option path, e.g. `operation.query` or `read`.
        option: String,
        /// The rejected value.
        received: String,
    },

    /// A relationship points at a model that does not exist.
    #[error("Unable to resolve related model '{target}' from {model}.{field}")]
    UnknownRefModel {
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
        /// The unresolved target model.
        target: String,
    },

    /// A relationship names a field that does not exist on the target model.
    #[error(
        "The relationship field at {model}.{field} points to {target_model}.{target_field} but no field at {target_model}.{target_field} exists"
    )]
    UnknownRefField {
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
        /// Target model.
        target_model: String,
        /// The missing target field.
        target_field: String,
    },

    /// A relationship names a target field that is not a relationship.
    #[error(
        "The relationship field at {model}.{field} points to {target_model}.{target_field} but {target_model}.{target_field} is not a relationship field"
    )]
    RefFieldNotRelation {
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
        /// Target model.
        target_model: String,
        /// Target field.
        target_field: String,
    },

    /// The two sides of a relationship do not point at each other.
    #[error(
        "The relationship field at {model}.{field} points to {target_model}.{target_field}, but {target_model}.{target_field} points to {actual}"
    )]
    MismatchedRelation {
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
        /// Target model.
        target_model: String,
        /// Target field.
        target_field: String,
        /// What the target field points at instead.
        actual: String,
    },

    /// Both sides of a one-to-one relationship claim the foreign key.
    #[error(
        "The relationship fields {model}.{field} and {target_model}.{target_field} both declare db.foreignKey, only one side of a one to one relationship can own the foreign key"
    )]
    ForeignKeyConflict {
        /// First side model.
        model: String,
        /// First side field.
        field: String,
        /// Second side model.
        target_model: String,
        /// Second side field.
        target_field: String,
    },

    /// Both sides of a many-to-many relationship declare different relation names.
    #[error(
        "The relationship fields {model}.{field} and {target_model}.{target_field} declare different db.relationName values ('{name}' and '{target_name}')"
    )]
    RelationNameConflict {
        /// First side model.
        model: String,
        /// First side field.
        field: String,
        /// Second side model.
        target_model: String,
        /// Second side field.
        target_field: String,
        /// Name declared on the first side.
        name: String,
        /// Name declared on the second side.
        target_name: String,
    },

    /// `db.relationName` was used outside a many-to-many relationship.
    #[error(
        "The relationship field at {model}.{field} declares db.relationName but relation names are only supported on many to many relationships"
    )]
    RelationNameNotAllowed {
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
    },

    /// A one-sided relationship's implicit inverse collides with a declared field.
    #[error(
        "The relationship field at {model}.{field} needs the implicit field {target_model}.{inverse} but {target_model} already declares a field with that key"
    )]
    ImplicitInverseConflict {
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
        /// Target model.
        target_model: String,
        /// Key of the implicit inverse field.
        inverse: String,
    },

    /// A field key collides with a reserved name.
    #[error("The field key '{field}' on {model} is reserved: {reason}")]
    ReservedFieldKey {
        /// Model declaring the field.
        model: String,
        /// Field key.
        field: String,
        /// Why the key is reserved.
        reason: String,
    },

    /// An extra output field collides with another output field.
    #[error(
        "The field {model}.{field} adds the output field '{output}' which conflicts with {model}.{existing}"
    )]
    ConflictingOutputField {
        /// Model declaring the field.
        model: String,
        /// Field contributing the extra output field.
        field: String,
        /// The conflicting output field name.
        output: String,
        /// The field already using that name.
        existing: String,
    },

    /// A field factory rejected its own configuration.
    #[error("The field at {model}.{field} is misconfigured: {message}")]
    InvalidFieldConfig {
        /// Model declaring the field.
        model: String,
        /// Field key.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// Names derived for a model are invalid.
    #[error("Invalid naming for model {model}: {message}")]
    InvalidNaming {
        /// Model key.
        model: String,
        /// Description of the problem.
        message: String,
    },

    /// The configured label field does not exist.
    #[error("The ui.labelField option for the model {model} is '{label_field}' but no such field exists")]
    UnknownLabelField {
        /// Model key.
        model: String,
        /// The configured label field.
        label_field: String,
    },

    /// A relationship's ref is missing from the admin metadata.
    #[error("The ref [{reference}] on relationship [{model}.{field}] is invalid")]
    InvalidRef {
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
        /// The configured ref.
        reference: String,
    },

    /// Admin UI config references a field that does not exist.
    #[error(
        "The {option} option on the relationship field at {model}.{field} includes the \"{target_field}\" field but that field does not exist on the \"{target_model}\" model"
    )]
    AdminMetaUnknownField {
        /// Option path, e.g. `ui.cardFields`.
        option: String,
        /// Model declaring the relationship.
        model: String,
        /// Relationship field key.
        field: String,
        /// The missing field.
        target_field: String,
        /// Target model.
        target_model: String,
    },

    /// A deferred field list was read before the registry was populated.
    #[error("the model registry has not been populated yet")]
    RegistryNotReady,

    /// The registry backing a type was dropped.
    #[error("the model registry is no longer available")]
    RegistryUnavailable,

    /// A lookup named a model that is not in the registry.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ref_field_names_both_sides() {
        let err = Error::UnknownRefField {
            model: "Post".to_string(),
            field: "author".to_string(),
            target_model: "User".to_string(),
            target_field: "posts".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Post.author"));
        assert!(message.contains("User.posts"));
    }

    #[test]
    fn test_filter_option_message() {
        let err = Error::InvalidFilterOption {
            model: "Post".to_string(),
            option: "isFilterable".to_string(),
            received: "\"yes\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration option 'Post.isFilterable' must be either a boolean value or a function. Received '\"yes\"'."
        );
    }
}
