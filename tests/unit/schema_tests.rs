//! Schema Loader Tests

use pretty_assertions::assert_eq;
use rust_sqlblueprint::{BlueprintError, CatalogQuery, CatalogScope, KeyKind, Schema, SchemaConfig, TableRef};

use crate::common::{blog_connection, column_row, foreign_row, primary_row, FakeConnection, TableFixture};

fn app_config() -> SchemaConfig {
    SchemaConfig::new(Some("App".to_string()))
}

fn load_blog() -> Schema<FakeConnection> {
    Schema::new("app", blog_connection(), &app_config()).unwrap()
}

// ============================================================================
// Loading Tests
// ============================================================================

#[test]
fn test_tables_in_catalog_order() {
    let schema = load_blog();
    let names: Vec<&str> = schema.tables().iter().map(|t| t.table()).collect();
    assert_eq!(names, vec!["orgs", "users", "posts"]);
    assert_eq!(schema.len(), 3);
    assert_eq!(schema.schema(), "app");
    assert_eq!(schema.database(), Some("App"));
    assert_eq!(schema.table_schema(), "dbo");
}

#[test]
fn test_blueprints_are_tagged() {
    let schema = Schema::new("app", blog_connection().named("reporting"), &app_config()).unwrap();
    let users = schema.table("users").unwrap();
    assert_eq!(users.connection(), "reporting");
    assert_eq!(users.schema(), "app");
    assert_eq!(users.table(), "users");
    assert_eq!(schema.connection_name(), "reporting");
}

#[test]
fn test_columns_attached_in_row_order() {
    let schema = load_blog();
    let users = schema.table("users").unwrap();
    let names: Vec<&str> = users.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "org_id", "email", "active"]);

    let active = users.column("active").unwrap();
    assert_eq!(active.type_name, "bool");
    assert_eq!(active.default.as_deref(), Some("1"));
}

#[test]
fn test_query_sequence() {
    let schema = load_blog();
    let queries = &schema.connection().queries;

    assert_eq!(queries.len(), 1 + 3 * 3);
    assert_eq!(
        queries[0],
        CatalogQuery::Tables {
            scope: CatalogScope::new(Some("App"), "dbo")
        }
    );
    let kinds: Vec<&str> = queries[1..4].iter().map(|q| q.kind()).collect();
    assert_eq!(kinds, vec!["columns", "constraints", "indexes"]);
    assert!(queries[1..4].iter().all(|q| q.table() == Some("orgs")));
    assert!(queries[1..].iter().all(|q| q.params()[1] == "dbo"));
}

#[test]
fn test_unconfigured_load_reads_dbo_of_current_database() {
    let schema = Schema::new("app", FakeConnection::new(), &SchemaConfig::default()).unwrap();
    assert_eq!(schema.database(), None);
    assert_eq!(schema.table_schema(), "dbo");
    assert!(schema.is_empty());

    let tables = &schema.connection().queries[0];
    assert_eq!(
        *tables,
        CatalogQuery::Tables {
            scope: CatalogScope::new(None, "dbo")
        }
    );
    let sql = tables.sql();
    assert!(sql.contains("FROM INFORMATION_SCHEMA.TABLES"));
    assert!(!sql.contains("[dbo]"));
    assert!(sql.contains("TABLE_SCHEMA = @P1"));
    assert_eq!(tables.params(), vec!["dbo".to_string()]);
}

#[test]
fn test_same_name_in_another_schema_is_not_merged() {
    let dbo_users = TableFixture {
        columns: vec![column_row("users", "id", "int"), column_row("users", "email", "varchar")],
        constraints: vec![primary_row("id", "pk_users")],
        indexes: vec![],
    };
    let audit_users = TableFixture {
        columns: vec![column_row("users", "id", "bigint"), column_row("users", "changed_at", "datetime2")],
        constraints: vec![primary_row("id", "pk_audit_users")],
        indexes: vec![],
    };
    let connection = || {
        FakeConnection::new()
            .with_schema_table("dbo", "users", dbo_users.clone())
            .with_schema_table("audit", "users", audit_users.clone())
    };

    let schema = Schema::new("app", connection(), &SchemaConfig::default()).unwrap();
    assert_eq!(schema.len(), 1);
    let users = schema.table("users").unwrap();
    let names: Vec<&str> = users.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email"]);
    assert_eq!(users.primary_key().unwrap().columns, vec!["id"]);

    let config = SchemaConfig::default().with_table_schema("audit");
    let schema = Schema::new("audit", connection(), &config).unwrap();
    let users = schema.table("users").unwrap();
    let names: Vec<&str> = users.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "changed_at"]);
    assert_eq!(users.primary_key().unwrap().columns, vec!["id"]);
    assert!(schema
        .connection()
        .queries
        .iter()
        .all(|q| q.scope().map(|scope| scope.table_schema.as_str()) == Some("audit")));
}

#[test]
fn test_duplicate_table_name_last_write_wins() {
    let first = TableFixture {
        columns: vec![column_row("dup", "first", "int")],
        ..Default::default()
    };
    let second = TableFixture {
        columns: vec![column_row("dup", "second", "int")],
        ..Default::default()
    };
    let connection = FakeConnection::new()
        .with_table("dup", first)
        .with_table("other", TableFixture::default())
        .with_table("dup", second);

    let schema = Schema::new("app", connection, &app_config()).unwrap();
    let names: Vec<&str> = schema.tables().iter().map(|t| t.table()).collect();
    assert_eq!(names, vec!["dup", "other"]);
    assert_eq!(schema.table("dup").unwrap().columns()[0].name, "second");
}

// ============================================================================
// Key Tests
// ============================================================================

#[test]
fn test_composite_primary_key_order() {
    let members = TableFixture {
        columns: vec![column_row("members", "id", "int"), column_row("members", "org_id", "int")],
        constraints: vec![primary_row("id", "pk_members"), primary_row("org_id", "pk_members")],
        indexes: vec![],
    };
    let schema = Schema::new("app", FakeConnection::new().with_table("members", members), &app_config()).unwrap();

    let key = schema.table("members").unwrap().primary_key().unwrap();
    assert_eq!(key.kind, KeyKind::Primary);
    assert_eq!(key.index, None);
    assert_eq!(key.columns, vec!["id", "org_id"]);
}

#[test]
fn test_table_without_primary_key() {
    let log = TableFixture {
        columns: vec![column_row("log", "message", "nvarchar")],
        ..Default::default()
    };
    let schema = Schema::new("app", FakeConnection::new().with_table("log", log), &app_config()).unwrap();
    assert!(schema.table("log").unwrap().primary_key().is_none());
}

#[test]
fn test_relations_per_constraint() {
    let schema = load_blog();
    let posts = schema.table("posts").unwrap();
    let relations = posts.relations();

    assert_eq!(relations.len(), 3);
    assert_eq!(relations[0].index.as_deref(), Some("fk_posts_author"));
    assert_eq!(relations[0].on, Some(TableRef::new("app", "users")));
    assert_eq!(relations[1].on, Some(TableRef::new("app", "orgs")));
    assert_eq!(relations[2].columns, vec!["reviewer_org_id"]);
    assert_eq!(relations[2].references, vec!["id"]);
}

#[test]
fn test_two_foreign_keys_two_relations() {
    let links = TableFixture {
        constraints: vec![
            foreign_row("a_id", "fk_a", "a", "id"),
            foreign_row("b_id", "fk_b", "b", "id"),
            foreign_row("b_region", "fk_b", "b", "region"),
        ],
        ..Default::default()
    };
    let schema = Schema::new("app", FakeConnection::new().with_table("links", links), &app_config()).unwrap();
    let relations = schema.table("links").unwrap().relations();

    assert_eq!(relations.len(), 2);
    assert_eq!(relations[0].on.as_ref().unwrap().table, "a");
    assert_eq!(relations[1].on.as_ref().unwrap().table, "b");
    assert_eq!(relations[1].columns, vec!["b_id", "b_region"]);
    assert_eq!(relations[1].references, vec!["id", "region"]);
}

#[test]
fn test_indexes_split_by_uniqueness() {
    let schema = load_blog();

    let orgs = schema.table("orgs").unwrap();
    assert_eq!(orgs.unique_keys().len(), 1);
    assert_eq!(orgs.unique_keys()[0].kind, KeyKind::Unique);
    assert!(orgs.is_unique_key(&["name"]));

    let users = schema.table("users").unwrap();
    assert!(users.unique_keys().is_empty());
    assert_eq!(users.indexes().len(), 2);
    assert_eq!(users.indexes()[1].index.as_deref(), Some("ix_users_org_email"));
    assert_eq!(users.indexes()[1].columns, vec!["org_id", "email"]);
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_has() {
    let schema = load_blog();
    assert!(schema.has("users"));
    assert!(!schema.has("unknown"));
}

#[test]
fn test_unknown_table_is_not_found() {
    let schema = load_blog();
    let err = schema.table("unknown").unwrap_err();

    match err.downcast_ref::<BlueprintError>() {
        Some(BlueprintError::TableNotFound { schema, table }) => {
            assert_eq!(schema, "app");
            assert_eq!(table, "unknown");
        }
        other => panic!("expected TableNotFound, got {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("unknown"));
    assert!(message.contains("app"));
}

// ============================================================================
// Referencing Tests
// ============================================================================

#[test]
fn test_referencing_in_table_then_relation_order() {
    let schema = load_blog();
    let orgs = schema.table("orgs").unwrap();
    let incoming = schema.referencing(orgs);

    let found: Vec<(&str, &str)> = incoming
        .iter()
        .map(|(blueprint, key)| (blueprint.table(), key.columns[0].as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("users", "org_id"),
            ("posts", "org_id"),
            ("posts", "reviewer_org_id"),
        ]
    );
}

#[test]
fn test_referencing_nothing() {
    let schema = load_blog();
    let posts = schema.table("posts").unwrap();
    assert!(schema.referencing(posts).is_empty());
}

#[test]
fn test_referencing_respects_schema() {
    let schema = load_blog();
    let stranger = rust_sqlblueprint::Blueprint::new("sqlsrv", "other", "orgs");
    assert!(schema.referencing(&stranger).is_empty());
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_query_failure_aborts_load() {
    for kind in ["tables", "columns", "constraints", "indexes"] {
        let result = Schema::new("app", blog_connection().failing_on(kind), &app_config());
        let err = result.unwrap_err();
        assert!(err.to_string().contains(kind), "{}", err);
    }
}

// ============================================================================
// Database Listing Tests
// ============================================================================

#[test]
fn test_schemas_excludes_system_databases() {
    let mut connection = FakeConnection::new().with_databases(&["master", "tempdb", "model", "msdb", "App", "Reporting"]);
    let names = Schema::schemas(&mut connection).unwrap();
    assert_eq!(names, vec!["App", "Reporting"]);
}

#[test]
fn test_schemas_excludes_system_databases_any_case() {
    let mut connection = FakeConnection::new().with_databases(&["MASTER", "TempDB", "App"]);
    let names = Schema::schemas(&mut connection).unwrap();
    assert_eq!(names, vec!["App"]);
}

#[test]
fn test_into_connection_returns_connection() {
    let schema = load_blog();
    let connection = schema.into_connection();
    assert_eq!(connection.queries.len(), 10);
}
