//! End-to-end runs against a real SQLite file
//!
//! The database is created in a temp directory with `sqlx`, then read back
//! through the default registry exactly as the CLI would.

use std::path::Path;

use schemagen_codegen::{
    CollectingSink, DiagnosticKind, GenerateCommand, Generator, PropertyType, ScalarType,
};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE categories (
        id INTEGER PRIMARY KEY,
        name VARCHAR(80) NOT NULL,
        parent_id INTEGER
    )"#,
    r#"CREATE TABLE order_lines (
        order_id INTEGER NOT NULL,
        line_no INTEGER NOT NULL,
        price DECIMAL(10,2),
        shipped_at DATETIME,
        Delete_Flag BOOLEAN NOT NULL DEFAULT 0,
        PRIMARY KEY (order_id, line_no)
    )"#,
    r#"CREATE TABLE tmp_import (payload BLOB)"#,
    r#"CREATE VIEW category_names AS SELECT name FROM categories"#,
];

fn database_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

async fn create_database() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir.path().join("shop.db"));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .unwrap();
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool.close().await;

    (dir, url)
}

#[tokio::test]
async fn test_read_sqlite_file() {
    let (_dir, url) = create_database().await;

    let mut command = GenerateCommand::new("sqlite", &url);
    command.exclude_prefix = vec!["tmp_".into()];

    let mut sink = CollectingSink::new();
    let outcome = Generator::new().generate(&command, &mut sink).await;
    assert!(outcome.succeeded(), "{:?}", sink.diagnostics());

    let names: Vec<_> = outcome.schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["categories", "order_lines"]);

    let categories = outcome.schema.table("main", "categories").unwrap();
    assert_eq!(categories.class_name, "category");
    assert_eq!(categories.primary_key.as_deref(), Some("id"));

    let id = categories.column("id").unwrap();
    assert!(id.is_auto_increment);
    assert_eq!(id.property_type, PropertyType::required(ScalarType::I64));

    let name = categories.column("name").unwrap();
    assert_eq!(name.property_type, PropertyType::required(ScalarType::String));
    assert_eq!(name.length, Some(80));

    let parent = categories.column("parent_id").unwrap();
    assert_eq!(parent.property_type, PropertyType::optional(ScalarType::I64));

    let lines = outcome.schema.table("main", "order_lines").unwrap();
    assert_eq!(lines.primary_key, None);
    assert_eq!(lines.primary_key_columns, vec!["order_id", "line_no"]);
    assert!(lines.columns.iter().all(|c| !c.is_auto_increment));
    assert_eq!(
        lines.column("shipped_at").unwrap().property_type.scalar,
        ScalarType::DateTime
    );

    let delete_flag = lines.column("Delete_Flag").unwrap();
    assert_eq!(delete_flag.property_name, "Delete_Flag");
    assert!(sink.of_kind(DiagnosticKind::NamingCollision).next().is_none());
}

#[tokio::test]
async fn test_views_on_request() {
    let (_dir, url) = create_database().await;

    let mut command = GenerateCommand::new("System.Data.SQLite", &url);
    command.include_views = true;

    let mut sink = CollectingSink::new();
    let outcome = Generator::new().generate(&command, &mut sink).await;

    let view = outcome.schema.table("main", "category_names").unwrap();
    assert!(view.is_view);
    assert_eq!(view.primary_key, None);
    assert_eq!(outcome.schema.len(), 4);
}

#[tokio::test]
async fn test_missing_file_is_connection_failure() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("absent.db").display());

    let mut sink = CollectingSink::new();
    let outcome = Generator::new()
        .generate(&GenerateCommand::new("sqlite", &url), &mut sink)
        .await;

    assert!(outcome.schema.is_empty());
    assert_eq!(sink.diagnostics().len(), 1);
    assert_eq!(sink.diagnostics()[0].kind, DiagnosticKind::ConnectionFailure);
}
