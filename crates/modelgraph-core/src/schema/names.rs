//! Display and GraphQL names derived from model keys.

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use heck::{ToKebabCase, ToTitleCase, ToUpperCamelCase};
use serde::Serialize;

const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "fish",
    "information",
    "media",
    "metadata",
    "news",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("woman", "women"),
];

/// Labels shown in the Admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUiLabels {
    /// Main label.
    pub label: String,
    /// Singular label.
    pub singular: String,
    /// Plural label.
    pub plural: String,
    /// URL path segment.
    pub path: String,
}

/// Names of the GraphQL types and operations generated for a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlNames {
    /// Output type.
    pub output_type_name: String,
    /// Single item query.
    pub item_query_name: String,
    /// List query.
    pub list_query_name: String,
    /// Count query.
    pub list_query_count_name: String,
    /// Order-by input.
    pub list_order_name: String,
    /// Create mutation.
    pub create_mutation_name: String,
    /// Create-many mutation.
    pub create_many_mutation_name: String,
    /// Update mutation.
    pub update_mutation_name: String,
    /// Update-many mutation.
    pub update_many_mutation_name: String,
    /// Delete mutation.
    pub delete_mutation_name: String,
    /// Delete-many mutation.
    pub delete_many_mutation_name: String,
    /// Where input.
    pub where_input_name: String,
    /// Unique-where input.
    pub where_unique_input_name: String,
    /// Create input.
    pub create_input_name: String,
    /// Update input.
    pub update_input_name: String,
    /// Update-many element input.
    pub update_many_input_name: String,
    /// Many relation filter.
    pub many_relation_filter_name: String,
    /// To-many create input.
    pub relate_to_many_for_create_input_name: String,
    /// To-many update input.
    pub relate_to_many_for_update_input_name: String,
    /// To-one create input.
    pub relate_to_one_for_create_input_name: String,
    /// To-one update input.
    pub relate_to_one_for_update_input_name: String,
}

impl GqlNames {
    /// Derive names from the model key and its plural GraphQL name.
    pub fn new(model_key: &str, plural: &str) -> Self {
        let list_query_name = lower_first(plural);
        Self {
            output_type_name: model_key.to_string(),
            item_query_name: lower_first(model_key),
            list_query_count_name: format!("{list_query_name}Count"),
            list_query_name,
            list_order_name: format!("{model_key}OrderByInput"),
            create_mutation_name: format!("create{model_key}"),
            create_many_mutation_name: format!("create{plural}"),
            update_mutation_name: format!("update{model_key}"),
            update_many_mutation_name: format!("update{plural}"),
            delete_mutation_name: format!("delete{model_key}"),
            delete_many_mutation_name: format!("delete{plural}"),
            where_input_name: format!("{model_key}WhereInput"),
            where_unique_input_name: format!("{model_key}WhereUniqueInput"),
            create_input_name: format!("{model_key}CreateInput"),
            update_input_name: format!("{model_key}UpdateInput"),
            update_many_input_name: format!("{model_key}UpdateArgs"),
            many_relation_filter_name: format!("{model_key}ManyRelationFilter"),
            relate_to_many_for_create_input_name: format!("{model_key}RelateToManyForCreateInput"),
            relate_to_many_for_update_input_name: format!("{model_key}RelateToManyForUpdateInput"),
            relate_to_one_for_create_input_name: format!("{model_key}RelateToOneForCreateInput"),
            relate_to_one_for_update_input_name: format!("{model_key}RelateToOneForUpdateInput"),
        }
    }
}

/// All names derived for a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNames {
    /// Plural name used in GraphQL operation names.
    pub plural_graphql_name: String,
    /// Admin UI labels.
    pub admin_ui_labels: AdminUiLabels,
    /// GraphQL type and operation names.
    pub gql: GqlNames,
}

impl ModelNames {
    /// Derive names for a model, applying overrides from its config.
    pub fn from_config(model_key: &str, config: &ModelConfig) -> Result<Self> {
        let ui = &config.ui;
        if ui.label.as_deref() == Some("") {
            return Err(Error::InvalidNaming {
                model: model_key.to_string(),
                message: "the ui.label option cannot be an empty string".to_string(),
            });
        }
        if let Some(path) = &ui.path {
            if !is_valid_path(path) {
                return Err(Error::InvalidNaming {
                    model: model_key.to_string(),
                    message: format!(
                        "ui.path is '{path}' but it must only contain lowercase letters, numbers, dashes, and underscores and not start with a number"
                    ),
                });
            }
        }

        let computed_singular = model_key.to_title_case();
        let computed_plural = pluralize(&computed_singular);
        let admin_ui_labels = AdminUiLabels {
            label: ui.label.clone().unwrap_or_else(|| computed_plural.clone()),
            singular: ui.singular.clone().unwrap_or_else(|| computed_singular.clone()),
            plural: ui.plural.clone().unwrap_or_else(|| computed_plural.clone()),
            path: ui
                .path
                .clone()
                .unwrap_or_else(|| computed_plural.to_kebab_case()),
        };

        let plural_graphql_name = config
            .graphql
            .plural
            .clone()
            .unwrap_or_else(|| computed_plural.to_upper_camel_case());
        if plural_graphql_name == model_key {
            return Err(Error::InvalidNaming {
                model: model_key.to_string(),
                message: format!(
                    "the model key and the plural name used in GraphQL must be different but both are '{model_key}', please specify graphql.plural"
                ),
            });
        }

        Ok(Self {
            gql: GqlNames::new(model_key, &plural_graphql_name),
            plural_graphql_name,
            admin_ui_labels,
        })
    }
}

fn is_valid_path(path: &str) -> bool {
    let mut chars = path.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '-' || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Lowercase only the first character.
pub(crate) fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pluralize the last word of a label.
pub(crate) fn pluralize(label: &str) -> String {
    let (head, word) = match label.rfind(' ') {
        Some(idx) => label.split_at(idx + 1),
        None => ("", label),
    };
    format!("{head}{}", pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    let ends_with_consonant_y = lower.ends_with('y')
        && lower
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| !"aeiou".contains(c));
    if ends_with_consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.starts_with(|c: char| c.is_uppercase()) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelUiConfig;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Post"), "Posts");
        assert_eq!(pluralize("Blog Post"), "Blog Posts");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("News"), "News");
    }

    #[test]
    fn test_default_names() {
        let names = ModelNames::from_config("BlogPost", &ModelConfig::new()).unwrap();
        assert_eq!(names.plural_graphql_name, "BlogPosts");
        assert_eq!(names.admin_ui_labels.label, "Blog Posts");
        assert_eq!(names.admin_ui_labels.singular, "Blog Post");
        assert_eq!(names.admin_ui_labels.path, "blog-posts");
        assert_eq!(names.gql.item_query_name, "blogPost");
        assert_eq!(names.gql.list_query_name, "blogPosts");
        assert_eq!(names.gql.list_query_count_name, "blogPostsCount");
        assert_eq!(names.gql.where_unique_input_name, "BlogPostWhereUniqueInput");
        assert_eq!(names.gql.update_many_input_name, "BlogPostUpdateArgs");
    }

    #[test]
    fn test_uncountable_key_needs_plural_override() {
        let err = ModelNames::from_config("News", &ModelConfig::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidNaming { .. }));

        let mut config = ModelConfig::new();
        config.graphql.plural = Some("NewsItems".to_string());
        let names = ModelNames::from_config("News", &config).unwrap();
        assert_eq!(names.gql.list_query_name, "newsItems");
    }

    #[test]
    fn test_ui_overrides_validated() {
        let config = ModelConfig::new().with_ui(ModelUiConfig {
            path: Some("1posts".to_string()),
            ..Default::default()
        });
        assert!(ModelNames::from_config("Post", &config).is_err());

        let config = ModelConfig::new().with_ui(ModelUiConfig {
            label: Some(String::new()),
            ..Default::default()
        });
        assert!(ModelNames::from_config("Post", &config).is_err());

        let config = ModelConfig::new().with_ui(ModelUiConfig {
            label: Some("Articles".to_string()),
            path: Some("articles".to_string()),
            ..Default::default()
        });
        let names = ModelNames::from_config("Post", &config).unwrap();
        assert_eq!(names.admin_ui_labels.label, "Articles");
        assert_eq!(names.admin_ui_labels.path, "articles");
        assert_eq!(names.admin_ui_labels.plural, "Posts");
    }
}
