//! End-to-end assembly tests.

use modelgraph_core::config::{
    AccessRule, DatabaseProvider, FieldOmit, FieldOperation, HookArgs, HookError, HookFn, Hooks,
    ModelConfig, ModelOperation, SchemaConfig,
};
use modelgraph_core::fields::{
    relationship, text, CommonFieldConfig, DisplayMode, RelationshipFieldConfig, RelationshipUi,
    TextFieldConfig,
};
use modelgraph_core::schema::{
    AdminMeta, Cardinality, ForeignIdField, RelationStorage, ResolvedDbField, ResolvedRelation,
};
use modelgraph_core::{assemble, print_schema, Error, SchemaFile};
use futures::FutureExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn title() -> modelgraph_core::config::FieldFactory {
    text(TextFieldConfig::default())
}

fn keys<T>(map: &indexmap::IndexMap<String, T>) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

fn blog(posts: RelationshipFieldConfig, post: ModelConfig) -> SchemaConfig {
    SchemaConfig::new(DatabaseProvider::Postgresql)
        .with_model(
            "Post",
            post.with_field("title", title())
                .with_field("author", relationship(RelationshipFieldConfig::one("User.posts"))),
        )
        .with_model(
            "User",
            ModelConfig::new()
                .with_field("name", title())
                .with_field("posts", relationship(posts)),
        )
}

#[test]
fn test_one_to_many_foreign_key_on_to_one_side() {
    let registry =
        assemble(&blog(RelationshipFieldConfig::many("Post.author"), ModelConfig::new())).unwrap();

    assert_eq!(registry.relations().len(), 1);
    let relation = &registry.relations()[0];
    assert_eq!(relation.cardinality, Cardinality::OneToMany);
    assert_eq!(
        relation.storage,
        RelationStorage::ForeignKey {
            model: "Post".to_string(),
            column: "author".to_string(),
            unique: false,
        }
    );

    let post = registry.model("Post").unwrap();
    assert_eq!(
        post.field("author").unwrap().db_field,
        ResolvedDbField::Relation(ResolvedRelation::One {
            model: "User".to_string(),
            field: "posts".to_string(),
            foreign_id: ForeignIdField::Owned {
                map: "author".to_string()
            },
        })
    );
    let user = registry.model("User").unwrap();
    assert!(user.field("posts").unwrap().db_field.as_relation().unwrap().is_many());
}

#[test]
fn test_unknown_ref_field_names_both_models() {
    let schema = SchemaConfig::new(DatabaseProvider::Sqlite)
        .with_model(
            "Post",
            ModelConfig::new()
                .with_field("author", relationship(RelationshipFieldConfig::one("User.writer"))),
        )
        .with_model("User", ModelConfig::new().with_field("name", title()));

    let err = assemble(&schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The relationship field at Post.author points to User.writer but no field at User.writer exists"
    );
}

#[test]
fn test_one_sided_many_gets_hidden_inverse() {
    let schema = SchemaConfig::new(DatabaseProvider::Sqlite)
        .with_model("Post", ModelConfig::new().with_field("title", title()))
        .with_model(
            "Tag",
            ModelConfig::new()
                .with_field("name", title())
                .with_field("posts", relationship(RelationshipFieldConfig::many("Post"))),
        );
    let registry = assemble(&schema).unwrap();

    let post = registry.model("Post").unwrap();
    assert_eq!(keys(&post.fields), vec!["id", "title"]);
    assert_eq!(keys(&post.resolved_db_fields), vec!["id", "title", "from_Tag_posts"]);

    let relation = &registry.relations()[0];
    assert!(relation.one_sided);
    assert_eq!(relation.cardinality, Cardinality::ManyToMany);
    assert_eq!(
        relation.storage,
        RelationStorage::JoinTable {
            table: "_Tag_posts".to_string()
        }
    );

    let output = post.types.output.fields.get().unwrap();
    assert!(!output.contains_key("from_Tag_posts"));
}

#[test]
fn test_declared_field_blocks_implicit_inverse() {
    let schema = SchemaConfig::new(DatabaseProvider::Sqlite)
        .with_model(
            "Post",
            ModelConfig::new()
                .with_field("title", title())
                .with_field("from_Tag_posts", title()),
        )
        .with_model(
            "Tag",
            ModelConfig::new()
                .with_field("posts", relationship(RelationshipFieldConfig::many("Post"))),
        );
    let err = assemble(&schema).unwrap_err();
    assert!(matches!(
        err,
        Error::ImplicitInverseConflict { ref target_model, ref inverse, .. }
            if target_model == "Post" && inverse == "from_Tag_posts"
    ));
}

#[test]
fn test_self_referencing_many_to_many() {
    let schema = SchemaConfig::new(DatabaseProvider::Sqlite).with_model(
        "User",
        ModelConfig::new()
            .with_field("name", title())
            .with_field("friends", relationship(RelationshipFieldConfig::many("User.friends"))),
    );
    let registry = assemble(&schema).unwrap();
    assert_eq!(registry.relations().len(), 1);
    assert_eq!(registry.relations()[0].name, "User_friends");

    let user = registry.model("User").unwrap();
    let output = user.types.output.fields.get().unwrap();
    assert_eq!(output["friends"].ty.to_string(), "[User!]");
}

#[test]
fn test_create_disabled_when_no_field_can_be_created() {
    let omit_create = TextFieldConfig {
        common: CommonFieldConfig {
            graphql: modelgraph_core::config::FieldGraphqlConfig {
                omit: FieldOmit::Operations(vec![FieldOperation::Create]),
                cache_hint: None,
            },
            ..Default::default()
        },
        ..Default::default()
    };
    let schema = SchemaConfig::new(DatabaseProvider::Sqlite)
        .with_model("Note", ModelConfig::new().with_field("body", text(omit_create)));
    let registry = assemble(&schema).unwrap();
    let note = registry.model("Note").unwrap();

    assert!(!note.is_enabled.create);
    assert!(note.is_enabled.update);
    assert!(note.types.create.fields.get().unwrap().is_empty());
}

#[test]
fn test_count_output_independent_of_display_mode() {
    for display_mode in [DisplayMode::Select, DisplayMode::Cards, DisplayMode::Count] {
        let posts = RelationshipFieldConfig::many("Post.author").with_ui(RelationshipUi {
            display_mode,
            ..Default::default()
        });
        let registry = assemble(&blog(posts, ModelConfig::new())).unwrap();
        let user = registry.model("User").unwrap();
        let output = user.types.output.fields.get().unwrap();
        assert_eq!(keys(output), vec!["id", "name", "posts", "postsCount"]);
        assert_eq!(
            output["postsCount"].args["where"].ty.to_string(),
            "PostWhereInput!"
        );
    }
}

#[test]
fn test_count_output_kept_when_target_not_queryable() {
    let registry = assemble(&blog(
        RelationshipFieldConfig::many("Post.author"),
        ModelConfig::new().omitting([ModelOperation::Query]),
    ))
    .unwrap();
    let user = registry.model("User").unwrap();
    let output = user.types.output.fields.get().unwrap();
    assert_eq!(keys(output), vec!["id", "name", "postsCount"]);
}

#[test]
fn test_relate_to_many_update_order() {
    let registry =
        assemble(&blog(RelationshipFieldConfig::many("Post.author"), ModelConfig::new())).unwrap();
    let post = registry.model("Post").unwrap();
    let update = post.types.relate_to.many.update.as_ref().unwrap();
    assert_eq!(
        keys(update.fields.get().unwrap()),
        vec!["disconnect", "set", "create", "connect"]
    );

    let registry = assemble(&blog(
        RelationshipFieldConfig::many("Post.author"),
        ModelConfig::new().omitting([ModelOperation::Create]),
    ))
    .unwrap();
    let post = registry.model("Post").unwrap();
    let update = post.types.relate_to.many.update.as_ref().unwrap();
    assert_eq!(keys(update.fields.get().unwrap()), vec!["disconnect", "set", "connect"]);
}

fn author_schema(user: ModelConfig) -> SchemaConfig {
    SchemaConfig::new(DatabaseProvider::Sqlite)
        .with_model(
            "Post",
            ModelConfig::new()
                .with_field("title", title())
                .with_field("author", relationship(RelationshipFieldConfig::one("User.posts"))),
        )
        .with_model(
            "User",
            user.with_field("name", title())
                .with_field("posts", relationship(RelationshipFieldConfig::many("Post.author"))),
        )
}

#[test]
fn test_relate_to_one_order() {
    let registry = assemble(&author_schema(ModelConfig::new())).unwrap();
    let user = registry.model("User").unwrap();

    let create = user.types.relate_to.one.create.as_ref().unwrap();
    let create_fields = create.fields.get().unwrap();
    assert_eq!(create.name, "UserRelateToOneForCreateInput");
    assert_eq!(keys(create_fields), vec!["create", "connect"]);
    assert_eq!(create_fields["create"].ty.to_string(), "UserCreateInput");
    assert_eq!(create_fields["connect"].ty.to_string(), "UserWhereUniqueInput");

    let update = user.types.relate_to.one.update.as_ref().unwrap();
    let update_fields = update.fields.get().unwrap();
    assert_eq!(update.name, "UserRelateToOneForUpdateInput");
    assert_eq!(keys(update_fields), vec!["create", "connect", "disconnect"]);
    assert_eq!(update_fields["disconnect"].ty.to_string(), "Boolean");

    let post = registry.model("Post").unwrap();
    let author = &post.field("author").unwrap().input;
    assert_eq!(
        author.create.as_ref().unwrap().ty.to_string(),
        "UserRelateToOneForCreateInput"
    );
    assert_eq!(
        author.update.as_ref().unwrap().ty.to_string(),
        "UserRelateToOneForUpdateInput"
    );

    let registry =
        assemble(&author_schema(ModelConfig::new().omitting([ModelOperation::Create]))).unwrap();
    let user = registry.model("User").unwrap();
    let create = user.types.relate_to.one.create.as_ref().unwrap();
    assert_eq!(keys(create.fields.get().unwrap()), vec!["connect"]);
    let update = user.types.relate_to.one.update.as_ref().unwrap();
    assert_eq!(keys(update.fields.get().unwrap()), vec!["connect", "disconnect"]);
}

#[test]
fn test_types_freed_with_registry() {
    let registry =
        assemble(&blog(RelationshipFieldConfig::many("Post.author"), ModelConfig::new())).unwrap();
    assert!(print_schema(&registry).is_ok());

    let post = registry.model("Post").unwrap();
    assert!(post.types.where_.fields.is_resolved());
    let where_ = Arc::downgrade(&post.types.where_);
    let output = Arc::downgrade(&post.types.output);
    let user_where = Arc::downgrade(&registry.model("User").unwrap().types.where_);

    drop(registry);
    assert!(where_.upgrade().is_none());
    assert!(output.upgrade().is_none());
    assert!(user_where.upgrade().is_none());
}

#[test]
fn test_assembly_is_idempotent() {
    let schema = blog(RelationshipFieldConfig::many("Post.author"), ModelConfig::new());
    let first = assemble(&schema).unwrap();
    let second = assemble(&schema).unwrap();

    assert_eq!(first.relations(), second.relations());
    for (key, model) in first.models() {
        let other = second.model(key).unwrap();
        assert_eq!(model.is_enabled, other.is_enabled);
        assert_eq!(model.resolved_db_fields, other.resolved_db_fields);
        assert_eq!(model.names, other.names);
    }
    assert_eq!(print_schema(&first).unwrap(), print_schema(&second).unwrap());
}

#[test]
fn test_omit_update_removes_update_input() {
    let schema = SchemaConfig::new(DatabaseProvider::Sqlite).with_model(
        "Post",
        ModelConfig::new()
            .with_field("title", title())
            .omitting([ModelOperation::Update]),
    );
    let registry = assemble(&schema).unwrap();
    let post = registry.model("Post").unwrap();
    assert!(post.is_enabled.create);
    assert!(!post.is_enabled.update);
    assert!(post.fields.values().all(|field| !field.is_enabled.update));

    let sdl = print_schema(&registry).unwrap();
    assert!(sdl.contains("input PostCreateInput {"));
    assert!(!sdl.contains("PostUpdateInput"));
    assert!(!sdl.contains("updatePost"));
    assert!(sdl.contains("  posts(where: PostWhereInput! = {}, orderBy: [PostOrderByInput!]! = [], take: Int, skip: Int! = 0): [Post!]"));
}

#[test]
fn test_admin_meta() {
    let posts = RelationshipFieldConfig::many("Post.author").with_ui(RelationshipUi {
        display_mode: DisplayMode::Cards,
        card_fields: vec!["title".to_string()],
        ..Default::default()
    });
    let registry = assemble(&blog(posts, ModelConfig::new())).unwrap();
    let meta = AdminMeta::build(&registry).unwrap();

    let user = meta.model("User").unwrap();
    assert_eq!(user.label, "Users");
    assert_eq!(user.path, "users");
    assert_eq!(user.label_field, "name");
    assert_eq!(keys(&user.fields), vec!["id", "name", "posts"]);
    assert_eq!(
        user.fields["posts"].field_meta,
        Some(json!({
            "refModelKey": "Post",
            "refFieldKey": "author",
            "many": true,
            "hideCreate": false,
            "displayMode": "cards",
            "cardFields": ["title"],
            "linkToItem": false,
            "removeMode": "disconnect",
            "inlineCreate": null,
            "inlineEdit": null,
            "inlineConnect": false,
            "refLabelField": "title"
        }))
    );

    let post = meta.model("Post").unwrap();
    assert_eq!(
        post.fields["author"].field_meta.as_ref().unwrap()["refLabelField"],
        json!("name")
    );
    let serialized = serde_json::to_value(&meta).unwrap();
    assert_eq!(serialized["models"]["Post"]["itemQueryName"], json!("post"));
}

#[test]
fn test_admin_meta_unknown_card_field() {
    let posts = RelationshipFieldConfig::many("Post.author").with_ui(RelationshipUi {
        display_mode: DisplayMode::Cards,
        card_fields: vec!["subtitle".to_string()],
        ..Default::default()
    });
    let registry = assemble(&blog(posts, ModelConfig::new())).unwrap();
    let err = AdminMeta::build(&registry).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The ui.cardFields option on the relationship field at User.posts includes the \"subtitle\" field but that field does not exist on the \"Post\" model"
    );
}

#[test]
fn test_admin_meta_skips_unqueryable_models() {
    let registry = assemble(&blog(
        RelationshipFieldConfig::many("Post.author"),
        ModelConfig::new().omitting([ModelOperation::Query]),
    ))
    .unwrap();
    let meta = AdminMeta::build(&registry).unwrap();
    assert!(meta.model("Post").is_none());
    assert_eq!(keys(&meta.model("User").unwrap().fields), vec!["id", "name"]);
}

#[test]
fn test_invalid_shapes_from_json() {
    let cases = [
        (
            json!({ "models": { "Post": { "fields": { "title": { "type": "text", "isFilterable": "yes" } } } } }),
            "Configuration option 'Post.title.isFilterable' must be either a boolean value or a function. Received '\"yes\"'.",
        ),
        (
            json!({ "models": { "Post": { "access": 1, "fields": { "title": { "type": "text" } } } } }),
            "The access control option 'operation.query' on Post must be either a boolean value or a function. Received '1'.",
        ),
        (
            json!({ "models": { "Post": { "fields": { "title": { "type": "nope" } } } } }),
            "The field at Post.title does not provide a function",
        ),
        (
            json!({ "models": { "Post": { "defaultIsOrderable": 0, "fields": {} } } }),
            "Configuration option 'Post.defaultIsOrderable' must be either a boolean value or a function. Received '0'.",
        ),
        (
            json!({ "models": { "Post": { "graphql": { "omit": "update" }, "fields": {} } } }),
            "The graphql.omit option on Post must be true or a list of operations. Received '\"update\"'.",
        ),
    ];

    for (document, expected) in cases {
        let config = document
            .to_string()
            .parse::<SchemaFile>()
            .unwrap()
            .into_config()
            .unwrap();
        let err = assemble(&config).unwrap_err();
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn test_access_predicates_and_hooks_are_stored() {
    let hook: HookFn = Arc::new(|args: HookArgs| {
        async move {
            match args.input {
                Some(_) => Ok(()),
                None => Err(HookError("no input".to_string())),
            }
        }
        .boxed()
    });
    let schema = SchemaConfig::new(DatabaseProvider::Sqlite).with_model(
        "Post",
        ModelConfig::new()
            .with_field("title", title())
            .with_access(modelgraph_core::config::ModelAccessConfig::Rule(
                AccessRule::predicate(|args| args.session.is_some()),
            ))
            .with_hooks(Hooks::new().with_before_operation(hook)),
    );
    let registry = assemble(&schema).unwrap();
    let post = registry.model("Post").unwrap();

    let args = modelgraph_core::config::AccessArgs {
        session: None,
        model_key: "Post",
        field_key: None,
        operation: "query",
    };
    assert!(!post.access.for_operation(ModelOperation::Query).evaluate(&args));

    let before = post.hooks.before_operation.clone().unwrap();
    let result = futures::executor::block_on(before(HookArgs {
        model_key: "Post".to_string(),
        field_key: None,
        operation: "create".to_string(),
        item: None,
        input: Some(json!({ "title": "hello" })),
    }));
    assert_eq!(result, Ok(()));
}

#[test]
fn test_registry_errors_after_drop() {
    let registry =
        assemble(&blog(RelationshipFieldConfig::many("Post.author"), ModelConfig::new())).unwrap();
    let post = Arc::clone(registry.model("Post").unwrap());
    drop(registry);
    assert!(matches!(
        post.types.output.fields.get(),
        Err(Error::RegistryUnavailable)
    ));
}
