//! Relationship resolution.
//!
//! Each relationship field declares only its own side. Resolution pairs the
//! two sides up, decides where the foreign key or join table lives, and
//! synthesizes an inverse for one-sided declarations.

use crate::config::{DbField, ForeignKeyConfig, RelationDbField, RelationMode, ScalarDbField};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    /// One-to-one relation (unique foreign key).
    OneToOne,
    /// One-to-many relation (foreign key on the to-one side).
    OneToMany,
    /// Many-to-many relation (join table).
    ManyToMany,
}

/// Where a relation is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RelationStorage {
    /// A foreign key column on one model.
    ForeignKey {
        /// Model owning the column.
        model: String,
        /// Column name.
        column: String,
        /// Whether the column carries a unique constraint.
        unique: bool,
    },
    /// A join table.
    JoinTable {
        /// Table name.
        table: String,
    },
}

/// A resolved relation between two model fields.
///
/// `from` is the side that owns the foreign key, or the side that sorts
/// first for many-to-many relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDef {
    /// Relation name (unique within the schema).
    pub name: String,
    /// Source model.
    pub from_model: String,
    /// Field on the source model.
    pub from_field: String,
    /// Target model.
    pub to_model: String,
    /// Field on the target model. Synthesized for one-sided relations.
    pub to_field: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
    /// Storage decision.
    pub storage: RelationStorage,
    /// Whether only the source side was declared.
    pub one_sided: bool,
}

impl RelationDef {
    /// Create a one-to-one relation with the foreign key on `from_model`.
    pub fn one_to_one(
        from_model: impl Into<String>,
        from_field: impl Into<String>,
        to_model: impl Into<String>,
        to_field: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::foreign_key(Cardinality::OneToOne, from_model, from_field, to_model, to_field, column)
    }

    /// Create a one-to-many relation with the foreign key on `from_model`.
    pub fn one_to_many(
        from_model: impl Into<String>,
        from_field: impl Into<String>,
        to_model: impl Into<String>,
        to_field: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::foreign_key(
            Cardinality::OneToMany,
            from_model,
            from_field,
            to_model,
            to_field,
            column,
        )
    }

    /// Create a many-to-many relation stored in `_<name>`.
    pub fn many_to_many(
        name: impl Into<String>,
        from_model: impl Into<String>,
        from_field: impl Into<String>,
        to_model: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            storage: RelationStorage::JoinTable {
                table: format!("_{name}"),
            },
            name,
            from_model: from_model.into(),
            from_field: from_field.into(),
            to_model: to_model.into(),
            to_field: to_field.into(),
            cardinality: Cardinality::ManyToMany,
            one_sided: false,
        }
    }

    fn foreign_key(
        cardinality: Cardinality,
        from_model: impl Into<String>,
        from_field: impl Into<String>,
        to_model: impl Into<String>,
        to_field: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        let from_model = from_model.into();
        let from_field = from_field.into();
        Self {
            name: format!("{from_model}_{from_field}"),
            storage: RelationStorage::ForeignKey {
                model: from_model.clone(),
                column: column.into(),
                unique: cardinality == Cardinality::OneToOne,
            },
            from_model,
            from_field,
            to_model: to_model.into(),
            to_field: to_field.into(),
            cardinality,
            one_sided: false,
        }
    }

    /// Mark the relation as declared on the source side only.
    pub fn with_one_sided(mut self) -> Self {
        self.one_sided = true;
        self
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.cardinality == Cardinality::ManyToMany
    }

    /// Whether `model.field` is either side of this relation.
    pub fn involves(&self, model: &str, field: &str) -> bool {
        (self.from_model == model && self.from_field == field)
            || (self.to_model == model && self.to_field == field)
    }
}

/// Foreign key placement for a to-one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignIdField {
    /// The other side holds the key.
    None,
    /// This side holds a plain foreign key column.
    Owned {
        /// Column name.
        map: String,
    },
    /// This side holds a unique foreign key column.
    OwnedUnique {
        /// Column name.
        map: String,
    },
}

/// One side of a resolved relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRelation {
    /// To-one.
    One {
        /// Target model.
        model: String,
        /// Field on the target model.
        field: String,
        /// Foreign key placement.
        foreign_id: ForeignIdField,
    },
    /// To-many.
    Many {
        /// Target model.
        model: String,
        /// Field on the target model.
        field: String,
        /// Join relation name, for many-to-many relations.
        relation_name: Option<String>,
    },
}

impl ResolvedRelation {
    /// Target model.
    pub fn model(&self) -> &str {
        match self {
            ResolvedRelation::One { model, .. } | ResolvedRelation::Many { model, .. } => model,
        }
    }

    /// Field on the target model.
    pub fn field(&self) -> &str {
        match self {
            ResolvedRelation::One { field, .. } | ResolvedRelation::Many { field, .. } => field,
        }
    }

    /// Whether this side is to-many.
    pub fn is_many(&self) -> bool {
        matches!(self, ResolvedRelation::Many { .. })
    }
}

/// Storage shape of a field after relationships resolve.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResolvedDbField {
    /// Not stored.
    #[default]
    None,
    /// A scalar column.
    Scalar(ScalarDbField),
    /// A relation.
    Relation(ResolvedRelation),
}

impl ResolvedDbField {
    /// The relation, if this is one.
    pub fn as_relation(&self) -> Option<&ResolvedRelation> {
        match self {
            ResolvedDbField::Relation(rel) => Some(rel),
            _ => None,
        }
    }
}

/// Output of relationship resolution.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolvedRelationships {
    /// Per model, every stored field including implicit inverses.
    pub(crate) db_fields: IndexMap<String, IndexMap<String, ResolvedDbField>>,
    /// Every relation, in discovery order.
    pub(crate) relations: Vec<RelationDef>,
}

#[derive(Clone, Copy)]
struct Side<'a> {
    model: &'a str,
    field: &'a str,
    rel: &'a RelationDbField,
}

impl Side<'_> {
    fn path(&self) -> String {
        format!("{}.{}", self.model, self.field)
    }

    fn foreign_key(&self) -> Option<&ForeignKeyConfig> {
        match &self.rel.mode {
            RelationMode::One { foreign_key } => foreign_key.as_ref(),
            RelationMode::Many { .. } => None,
        }
    }

    fn relation_name(&self) -> Option<&str> {
        match &self.rel.mode {
            RelationMode::Many { relation_name } => relation_name.as_deref(),
            RelationMode::One { .. } => None,
        }
    }

    fn column(&self) -> String {
        match self.foreign_key() {
            Some(ForeignKeyConfig::Mapped(map)) => map.clone(),
            _ => self.field.to_string(),
        }
    }

    fn is_same_field(&self, other: &Side<'_>) -> bool {
        self.model == other.model && self.field == other.field
    }
}

/// Pair up relationship fields across all models.
pub(crate) fn resolve_relationships(
    models: &IndexMap<String, IndexMap<String, DbField>>,
) -> Result<ResolvedRelationships> {
    let mut out = ResolvedRelationships {
        db_fields: models
            .iter()
            .map(|(model_key, fields)| {
                let fields = fields
                    .iter()
                    .map(|(field_key, db_field)| {
                        let resolved = match db_field {
                            DbField::Scalar(scalar) => ResolvedDbField::Scalar(scalar.clone()),
                            DbField::None | DbField::Relation(_) => ResolvedDbField::None,
                        };
                        (field_key.clone(), resolved)
                    })
                    .collect();
                (model_key.clone(), fields)
            })
            .collect(),
        relations: Vec::new(),
    };
    let mut visited: HashSet<(&str, &str)> = HashSet::new();

    for (model_key, fields) in models {
        for (field_key, db_field) in fields {
            let DbField::Relation(rel) = db_field else {
                continue;
            };
            if visited.contains(&(model_key.as_str(), field_key.as_str())) {
                continue;
            }
            let side = Side {
                model: model_key,
                field: field_key,
                rel,
            };
            let target_fields = models.get(&rel.model).ok_or_else(|| Error::UnknownRefModel {
                model: model_key.clone(),
                field: field_key.clone(),
                target: rel.model.clone(),
            })?;

            let Some(target_field) = &rel.field else {
                out.resolve_one_sided(side)?;
                continue;
            };
            let target_rel = match target_fields.get(target_field) {
                Some(DbField::Relation(target_rel)) => target_rel,
                Some(_) => {
                    return Err(Error::RefFieldNotRelation {
                        model: model_key.clone(),
                        field: field_key.clone(),
                        target_model: rel.model.clone(),
                        target_field: target_field.clone(),
                    })
                }
                None => {
                    return Err(Error::UnknownRefField {
                        model: model_key.clone(),
                        field: field_key.clone(),
                        target_model: rel.model.clone(),
                        target_field: target_field.clone(),
                    })
                }
            };
            if target_rel.model != *model_key || target_rel.field.as_deref() != Some(field_key) {
                let actual = match &target_rel.field {
                    Some(field) => format!("{}.{}", target_rel.model, field),
                    None => target_rel.model.clone(),
                };
                return Err(Error::MismatchedRelation {
                    model: model_key.clone(),
                    field: field_key.clone(),
                    target_model: rel.model.clone(),
                    target_field: target_field.clone(),
                    actual,
                });
            }

            let other = Side {
                model: &rel.model,
                field: target_field,
                rel: target_rel,
            };
            visited.insert((other.model, other.field));
            out.resolve_two_sided(side, other)?;
        }
    }

    Ok(out)
}

impl ResolvedRelationships {
    fn set(&mut self, model: &str, field: &str, resolved: ResolvedRelation) {
        if let Some(fields) = self.db_fields.get_mut(model) {
            fields.insert(field.to_string(), ResolvedDbField::Relation(resolved));
        }
    }

    fn resolve_one_sided(&mut self, side: Side<'_>) -> Result<()> {
        let target = side.rel.model.as_str();
        let inverse = format!("from_{}_{}", side.model, side.field);
        if self.db_fields.get(target).is_some_and(|fields| fields.contains_key(&inverse)) {
            return Err(Error::ImplicitInverseConflict {
                model: side.model.to_string(),
                field: side.field.to_string(),
                target_model: target.to_string(),
                inverse,
            });
        }

        let relation = if side.rel.is_many() {
            let name = side
                .relation_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}_{}", side.model, side.field));
            self.set(
                side.model,
                side.field,
                ResolvedRelation::Many {
                    model: target.to_string(),
                    field: inverse.clone(),
                    relation_name: Some(name.clone()),
                },
            );
            self.set(
                target,
                &inverse,
                ResolvedRelation::Many {
                    model: side.model.to_string(),
                    field: side.field.to_string(),
                    relation_name: Some(name.clone()),
                },
            );
            RelationDef::many_to_many(name, side.model, side.field, target, &inverse)
        } else {
            let column = side.column();
            self.set(
                side.model,
                side.field,
                ResolvedRelation::One {
                    model: target.to_string(),
                    field: inverse.clone(),
                    foreign_id: ForeignIdField::Owned { map: column.clone() },
                },
            );
            self.set(
                target,
                &inverse,
                ResolvedRelation::Many {
                    model: side.model.to_string(),
                    field: side.field.to_string(),
                    relation_name: None,
                },
            );
            RelationDef::one_to_many(side.model, side.field, target, &inverse, column)
        };

        tracing::trace!(
            model = side.model,
            field = side.field,
            inverse = %inverse,
            "synthesized implicit inverse"
        );
        self.relations.push(relation.with_one_sided());
        Ok(())
    }

    fn resolve_two_sided(&mut self, a: Side<'_>, b: Side<'_>) -> Result<()> {
        let (first, second) = if a.path() <= b.path() { (a, b) } else { (b, a) };

        match (first.rel.is_many(), second.rel.is_many()) {
            (false, false) => {
                let (owner, other) = match (first.foreign_key(), second.foreign_key()) {
                    (Some(_), Some(_)) if !first.is_same_field(&second) => {
                        return Err(Error::ForeignKeyConflict {
                            model: first.model.to_string(),
                            field: first.field.to_string(),
                            target_model: second.model.to_string(),
                            target_field: second.field.to_string(),
                        })
                    }
                    (None, Some(_)) => (second, first),
                    _ => (first, second),
                };
                let column = owner.column();
                self.set(
                    other.model,
                    other.field,
                    ResolvedRelation::One {
                        model: owner.model.to_string(),
                        field: owner.field.to_string(),
                        foreign_id: ForeignIdField::None,
                    },
                );
                // a self-paired field ends up as the owner
                self.set(
                    owner.model,
                    owner.field,
                    ResolvedRelation::One {
                        model: other.model.to_string(),
                        field: other.field.to_string(),
                        foreign_id: ForeignIdField::OwnedUnique { map: column.clone() },
                    },
                );
                self.relations.push(RelationDef::one_to_one(
                    owner.model,
                    owner.field,
                    other.model,
                    other.field,
                    column,
                ));
            }
            (true, true) => {
                let name = match (first.relation_name(), second.relation_name()) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(Error::RelationNameConflict {
                            model: first.model.to_string(),
                            field: first.field.to_string(),
                            target_model: second.model.to_string(),
                            target_field: second.field.to_string(),
                            name: a.to_string(),
                            target_name: b.to_string(),
                        })
                    }
                    (Some(name), _) | (None, Some(name)) => name.to_string(),
                    (None, None) => format!("{}_{}", first.model, first.field),
                };
                for (this, that) in [(first, second), (second, first)] {
                    self.set(
                        this.model,
                        this.field,
                        ResolvedRelation::Many {
                            model: that.model.to_string(),
                            field: that.field.to_string(),
                            relation_name: Some(name.clone()),
                        },
                    );
                }
                self.relations.push(RelationDef::many_to_many(
                    name,
                    first.model,
                    first.field,
                    second.model,
                    second.field,
                ));
            }
            _ => {
                let (one, many) = if first.rel.is_many() {
                    (second, first)
                } else {
                    (first, second)
                };
                if many.relation_name().is_some() {
                    return Err(Error::RelationNameNotAllowed {
                        model: many.model.to_string(),
                        field: many.field.to_string(),
                    });
                }
                let column = one.column();
                self.set(
                    one.model,
                    one.field,
                    ResolvedRelation::One {
                        model: many.model.to_string(),
                        field: many.field.to_string(),
                        foreign_id: ForeignIdField::Owned { map: column.clone() },
                    },
                );
                self.set(
                    many.model,
                    many.field,
                    ResolvedRelation::Many {
                        model: one.model.to_string(),
                        field: one.field.to_string(),
                        relation_name: None,
                    },
                );
                self.relations.push(RelationDef::one_to_many(
                    one.model, one.field, many.model, many.field, column,
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScalarKind;

    fn one(model: &str, field: Option<&str>, foreign_key: Option<ForeignKeyConfig>) -> DbField {
        DbField::Relation(RelationDbField {
            mode: RelationMode::One { foreign_key },
            model: model.to_string(),
            field: field.map(str::to_string),
        })
    }

    fn many(model: &str, field: Option<&str>, relation_name: Option<&str>) -> DbField {
        DbField::Relation(RelationDbField {
            mode: RelationMode::Many {
                relation_name: relation_name.map(str::to_string),
            },
            model: model.to_string(),
            field: field.map(str::to_string),
        })
    }

    fn schema(
        models: Vec<(&str, Vec<(&str, DbField)>)>,
    ) -> IndexMap<String, IndexMap<String, DbField>> {
        models
            .into_iter()
            .map(|(key, fields)| {
                let fields = fields
                    .into_iter()
                    .map(|(field, db)| (field.to_string(), db))
                    .collect();
                (key.to_string(), fields)
            })
            .collect()
    }

    fn relation<'a>(
        resolved: &'a ResolvedRelationships,
        model: &str,
        field: &str,
    ) -> &'a ResolvedRelation {
        resolved.db_fields[model][field].as_relation().unwrap()
    }

    #[test]
    fn test_one_to_many_puts_key_on_one_side() {
        let models = schema(vec![
            ("Post", vec![("author", one("User", Some("posts"), None))]),
            ("User", vec![("posts", many("Post", Some("author"), None))]),
        ]);
        let resolved = resolve_relationships(&models).unwrap();

        assert_eq!(
            relation(&resolved, "Post", "author"),
            &ResolvedRelation::One {
                model: "User".to_string(),
                field: "posts".to_string(),
                foreign_id: ForeignIdField::Owned {
                    map: "author".to_string()
                },
            }
        );
        assert!(relation(&resolved, "User", "posts").is_many());
        assert_eq!(resolved.relations.len(), 1);
        assert_eq!(resolved.relations[0].cardinality, Cardinality::OneToMany);
        assert_eq!(resolved.relations[0].from_model, "Post");
    }

    #[test]
    fn test_one_to_one_default_owner_sorts_first() {
        let models = schema(vec![
            ("User", vec![("profile", one("Profile", Some("user"), None))]),
            ("Profile", vec![("user", one("User", Some("profile"), None))]),
        ]);
        let resolved = resolve_relationships(&models).unwrap();

        assert_eq!(
            relation(&resolved, "Profile", "user"),
            &ResolvedRelation::One {
                model: "User".to_string(),
                field: "profile".to_string(),
                foreign_id: ForeignIdField::OwnedUnique {
                    map: "user".to_string()
                },
            }
        );
        assert!(matches!(
            relation(&resolved, "User", "profile"),
            ResolvedRelation::One {
                foreign_id: ForeignIdField::None,
                ..
            }
        ));
    }

    #[test]
    fn test_one_to_one_declared_owner_and_map() {
        let models = schema(vec![
            (
                "User",
                vec![(
                    "profile",
                    one(
                        "Profile",
                        Some("user"),
                        Some(ForeignKeyConfig::Mapped("profile_id".to_string())),
                    ),
                )],
            ),
            ("Profile", vec![("user", one("User", Some("profile"), None))]),
        ]);
        let resolved = resolve_relationships(&models).unwrap();

        assert!(matches!(
            relation(&resolved, "User", "profile"),
            ResolvedRelation::One { foreign_id: ForeignIdField::OwnedUnique { map }, .. }
                if map == "profile_id"
        ));
        assert_eq!(
            resolved.relations[0].storage,
            RelationStorage::ForeignKey {
                model: "User".to_string(),
                column: "profile_id".to_string(),
                unique: true,
            }
        );
    }

    #[test]
    fn test_both_sides_claiming_foreign_key() {
        let models = schema(vec![
            (
                "User",
                vec![("profile", one("Profile", Some("user"), Some(ForeignKeyConfig::Owned)))],
            ),
            (
                "Profile",
                vec![("user", one("User", Some("profile"), Some(ForeignKeyConfig::Owned)))],
            ),
        ]);
        let err = resolve_relationships(&models).unwrap_err();
        assert!(matches!(err, Error::ForeignKeyConflict { .. }));
    }

    #[test]
    fn test_many_to_many_relation_names() {
        let models = schema(vec![
            ("Post", vec![("tags", many("Tag", Some("posts"), None))]),
            ("Tag", vec![("posts", many("Post", Some("tags"), Some("PostTags")))]),
        ]);
        let resolved = resolve_relationships(&models).unwrap();
        assert!(matches!(
            relation(&resolved, "Post", "tags"),
            ResolvedRelation::Many { relation_name: Some(name), .. } if name == "PostTags"
        ));
        assert_eq!(
            resolved.relations[0].storage,
            RelationStorage::JoinTable {
                table: "_PostTags".to_string()
            }
        );

        let models = schema(vec![
            ("Post", vec![("tags", many("Tag", Some("posts"), Some("A")))]),
            ("Tag", vec![("posts", many("Post", Some("tags"), Some("B")))]),
        ]);
        assert!(matches!(
            resolve_relationships(&models).unwrap_err(),
            Error::RelationNameConflict { .. }
        ));
    }

    #[test]
    fn test_relation_name_rejected_on_one_to_many() {
        let models = schema(vec![
            ("Post", vec![("author", one("User", Some("posts"), None))]),
            ("User", vec![("posts", many("Post", Some("author"), Some("Authored")))]),
        ]);
        let err = resolve_relationships(&models).unwrap_err();
        assert!(matches!(err, Error::RelationNameNotAllowed { ref model, .. } if model == "User"));
    }

    #[test]
    fn test_one_sided_many_gets_implicit_inverse() {
        let models = schema(vec![
            ("Tag", vec![("posts", many("Post", None, None))]),
            ("Post", vec![("title", DbField::Scalar(ScalarDbField::new(ScalarKind::String)))]),
        ]);
        let resolved = resolve_relationships(&models).unwrap();

        let post_fields: Vec<_> = resolved.db_fields["Post"].keys().cloned().collect();
        assert_eq!(post_fields, vec!["title", "from_Tag_posts"]);
        assert_eq!(
            relation(&resolved, "Post", "from_Tag_posts"),
            &ResolvedRelation::Many {
                model: "Tag".to_string(),
                field: "posts".to_string(),
                relation_name: Some("Tag_posts".to_string()),
            }
        );
        assert!(resolved.relations[0].one_sided);
        assert!(resolved.relations[0].is_many_to_many());
    }

    #[test]
    fn test_implicit_inverse_cannot_replace_declared_field() {
        let models = schema(vec![
            ("Tag", vec![("posts", many("Post", None, None))]),
            (
                "Post",
                vec![(
                    "from_Tag_posts",
                    DbField::Scalar(ScalarDbField::new(ScalarKind::String)),
                )],
            ),
        ]);
        let err = resolve_relationships(&models).unwrap_err();
        assert!(matches!(
            &err,
            Error::ImplicitInverseConflict { model, field, target_model, inverse }
                if model == "Tag"
                    && field == "posts"
                    && target_model == "Post"
                    && inverse == "from_Tag_posts"
        ));
        assert_eq!(
            err.to_string(),
            "The relationship field at Tag.posts needs the implicit field Post.from_Tag_posts \
             but Post already declares a field with that key"
        );

        let models = schema(vec![
            ("Post", vec![("author", one("User", None, None))]),
            ("User", vec![("from_Post_author", many("Post", None, None))]),
        ]);
        assert!(matches!(
            resolve_relationships(&models),
            Err(Error::ImplicitInverseConflict { .. })
        ));
    }

    #[test]
    fn test_one_sided_one_owns_key() {
        let models = schema(vec![
            ("Post", vec![("author", one("User", None, None))]),
            ("User", vec![]),
        ]);
        let resolved = resolve_relationships(&models).unwrap();
        assert!(matches!(
            relation(&resolved, "Post", "author"),
            ResolvedRelation::One { foreign_id: ForeignIdField::Owned { .. }, field, .. }
                if field == "from_Post_author"
        ));
        assert!(relation(&resolved, "User", "from_Post_author").is_many());
    }

    #[test]
    fn test_self_reference() {
        let models = schema(vec![(
            "User",
            vec![
                ("friends", many("User", Some("friends"), None)),
                ("manager", one("User", Some("reports"), None)),
                ("reports", many("User", Some("manager"), None)),
            ],
        )]);
        let resolved = resolve_relationships(&models).unwrap();
        assert_eq!(resolved.relations.len(), 2);
        assert!(matches!(
            relation(&resolved, "User", "friends"),
            ResolvedRelation::Many { relation_name: Some(name), .. } if name == "User_friends"
        ));
        assert!(matches!(
            relation(&resolved, "User", "manager"),
            ResolvedRelation::One { foreign_id: ForeignIdField::Owned { .. }, .. }
        ));
    }

    #[test]
    fn test_ref_errors() {
        let models = schema(vec![("Post", vec![("author", one("Nobody", None, None))])]);
        assert!(matches!(
            resolve_relationships(&models).unwrap_err(),
            Error::UnknownRefModel { .. }
        ));

        let models = schema(vec![
            ("Post", vec![("author", one("User", Some("posts"), None))]),
            ("User", vec![]),
        ]);
        let err = resolve_relationships(&models).unwrap_err();
        assert!(matches!(err, Error::UnknownRefField { .. }));
        assert!(err.to_string().contains("Post.author"));
        assert!(err.to_string().contains("User.posts"));

        let models = schema(vec![
            ("Post", vec![("author", one("User", Some("name"), None))]),
            ("User", vec![("name", DbField::Scalar(ScalarDbField::new(ScalarKind::String)))]),
        ]);
        assert!(matches!(
            resolve_relationships(&models).unwrap_err(),
            Error::RefFieldNotRelation { .. }
        ));

        let models = schema(vec![
            ("Post", vec![("author", one("User", Some("posts"), None))]),
            ("User", vec![("posts", many("Post", None, None))]),
        ]);
        assert!(matches!(
            resolve_relationships(&models).unwrap_err(),
            Error::MismatchedRelation { ref actual, .. } if actual == "Post"
        ));
    }
}
