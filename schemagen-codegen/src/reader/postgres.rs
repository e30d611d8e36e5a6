//! PostgreSQL schema reader

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use schemagen::{FromRow, MetadataSource, Query};
use tracing::debug;

use super::{
    non_empty, positive_length, resolve_column, KeyColumnRow, SchemaReader, TableRow,
};
use crate::error::Result;
use crate::model::{Column, Table};
use crate::provider::Provider;

static NEXTVAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^nextval\('([^']+)'").expect("nextval pattern is valid")
});

// information_schema uses domain types; cast everything to plain types
const TABLE_SQL: &str = r#"
SELECT t.table_schema::text AS table_schema,
       t.table_name::text AS table_name,
       t.table_type::text AS table_type,
       obj_description(format('%I.%I', t.table_schema, t.table_name)::regclass, 'pg_class') AS table_comment
FROM information_schema.tables t
WHERE t.table_type IN ('BASE TABLE', 'VIEW')
  AND t.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY t.table_schema, t.table_name"#;

const COLUMN_SQL: &str = r#"
SELECT c.column_name::text AS column_name,
       c.data_type::text AS data_type,
       c.udt_name::text AS udt_name,
       c.is_nullable::text AS is_nullable,
       c.column_default::text AS column_default,
       c.is_identity::text AS is_identity,
       c.character_maximum_length::int8 AS character_maximum_length,
       pg_get_serial_sequence(format('%I.%I', c.table_schema, c.table_name), c.column_name::text) AS serial_sequence,
       col_description(format('%I.%I', c.table_schema, c.table_name)::regclass, c.ordinal_position::int) AS column_comment
FROM information_schema.columns c
WHERE c.table_schema = $1 AND c.table_name = $2
ORDER BY c.ordinal_position"#;

const PRIMARY_KEY_SQL: &str = r#"
SELECT kcu.column_name::text AS column_name
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON tc.constraint_name = kcu.constraint_name
 AND tc.table_schema = kcu.table_schema
 AND tc.table_name = kcu.table_name
WHERE tc.constraint_type = 'PRIMARY KEY'
  AND tc.table_schema = $1 AND tc.table_name = $2
ORDER BY kcu.ordinal_position"#;

#[derive(Debug, Clone, FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    #[schemagen(default)]
    udt_name: String,
    is_nullable: bool,
    #[schemagen(default)]
    column_default: Option<String>,
    #[schemagen(default)]
    is_identity: Option<bool>,
    #[schemagen(default)]
    character_maximum_length: Option<i64>,
    #[schemagen(default)]
    serial_sequence: Option<String>,
    #[schemagen(default)]
    column_comment: Option<String>,
}

impl ColumnRow {
    /// The sequence feeding this column, if any
    fn sequence(&self) -> Option<String> {
        non_empty(self.serial_sequence.clone()).or_else(|| {
            self.column_default
                .as_deref()
                .and_then(|d| NEXTVAL.captures(d.trim()))
                .map(|caps| caps[1].to_string())
        })
    }

    fn into_column(self) -> (Column, Option<String>) {
        let sequence = self.sequence();
        let auto_increment = self.is_identity == Some(true) || sequence.is_some();

        // Domains and user-defined types report their real name in udt_name
        let descriptor = match self.data_type.as_str() {
            "USER-DEFINED" | "ARRAY" if !self.udt_name.is_empty() => self.udt_name.as_str(),
            other => other,
        };
        let mut column = resolve_column(
            Provider::Postgres,
            self.column_name,
            descriptor,
            false,
            self.is_nullable,
        );
        column.is_auto_increment = auto_increment;
        column.comment = non_empty(self.column_comment);
        column.length = positive_length(self.character_maximum_length);
        (column, sequence)
    }
}

/// Reads `information_schema` and `pg_catalog` descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresReader;

#[async_trait]
impl SchemaReader for PostgresReader {
    fn provider(&self) -> Provider {
        Provider::Postgres
    }

    async fn read_schema(&self, source: &dyn MetadataSource) -> Result<Vec<Table>> {
        let table_rows: Vec<TableRow> = Query::new(TABLE_SQL).fetch_all(source).await?;
        debug!("Found {} tables and views", table_rows.len());

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in table_rows {
            let mut table = row.into_table();

            let column_rows: Vec<ColumnRow> = Query::new(COLUMN_SQL)
                .bind(table.schema.as_str())
                .bind(table.name.as_str())
                .fetch_all(source)
                .await?;
            let mut sequences = Vec::new();
            for column_row in column_rows {
                let (column, sequence) = column_row.into_column();
                if let Some(sequence) = sequence {
                    sequences.push((column.name.clone(), sequence));
                }
                table.columns.push(column);
            }

            let keys: Vec<KeyColumnRow> = Query::new(PRIMARY_KEY_SQL)
                .bind(table.schema.as_str())
                .bind(table.name.as_str())
                .fetch_all(source)
                .await?;
            table.assign_primary_key(keys.into_iter().map(|k| k.column_name).collect());

            // Only the key's sequence is interesting to the data-access layer
            table.sequence_name = table.primary_key.as_ref().and_then(|pk| {
                sequences
                    .iter()
                    .find(|(column, _)| column == pk)
                    .map(|(_, sequence)| sequence.clone())
            });

            tables.push(table);
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::fixtures::{key, row, table};
    use crate::types::ScalarType;
    use schemagen::{CannedSource, MetadataRow, Value};

    fn column(name: &str, data_type: &str, nullable: &str, default: Option<&str>) -> MetadataRow {
        row(&[
            ("column_name", name.into()),
            ("data_type", data_type.into()),
            ("udt_name", data_type.into()),
            ("is_nullable", nullable.into()),
            ("column_default", default.into()),
            ("is_identity", "NO".into()),
            ("character_maximum_length", Value::Null),
            ("serial_sequence", Value::Null),
            ("column_comment", Value::Null),
        ])
    }

    #[test]
    fn test_sequence_from_nextval_default() {
        let row = ColumnRow {
            column_name: "id".into(),
            data_type: "integer".into(),
            udt_name: "int4".into(),
            is_nullable: false,
            column_default: Some("nextval('users_id_seq'::regclass)".into()),
            is_identity: Some(false),
            character_maximum_length: None,
            serial_sequence: None,
            column_comment: None,
        };
        assert_eq!(row.sequence().as_deref(), Some("users_id_seq"));
        let (column, _) = row.into_column();
        assert!(column.is_auto_increment);
    }

    #[tokio::test]
    async fn test_read_schema() {
        let mut status = column("status", "USER-DEFINED", "NO", None);
        status.insert("udt_name", "order_status");
        let mut uuid = column("uuid", "uuid", "YES", Some("gen_random_uuid()"));
        uuid.insert("column_comment", "public id");

        let users = vec![Value::from("public"), Value::from("users")];
        let source = CannedSource::new()
            .respond(
                "information_schema.tables",
                vec![
                    table("public", "users", "BASE TABLE"),
                    table("public", "users_view", "VIEW"),
                ],
            )
            .respond_to(
                "information_schema.columns",
                users.clone(),
                vec![
                    column("id", "bigint", "NO", Some("nextval('users_id_seq'::regclass)")),
                    column("created_at", "timestamp with time zone", "NO", Some("now()")),
                    uuid,
                    status,
                ],
            )
            .respond_to("PRIMARY KEY", users, vec![key("id")]);

        let tables = PostgresReader.read_schema(&source).await.unwrap();
        assert_eq!(tables.len(), 2);

        let users = &tables[0];
        assert_eq!(users.primary_key.as_deref(), Some("id"));
        assert_eq!(users.sequence_name.as_deref(), Some("users_id_seq"));

        let id = users.column("id").unwrap();
        assert!(id.is_pk && id.is_auto_increment);
        assert_eq!(id.property_type.scalar, ScalarType::I64);

        let created = users.column("created_at").unwrap();
        assert_eq!(created.property_type.scalar, ScalarType::DateTime);
        assert!(!created.is_auto_increment);

        let uuid = users.column("uuid").unwrap();
        assert_eq!(uuid.property_type.scalar, ScalarType::Guid);
        assert!(uuid.is_nullable);
        assert_eq!(uuid.comment.as_deref(), Some("public id"));

        // enum types fall back to string
        assert_eq!(
            users.column("status").unwrap().property_type.scalar,
            ScalarType::String
        );

        let view = &tables[1];
        assert!(view.is_view);
        assert!(view.columns.is_empty());
        assert_eq!(view.primary_key, None);
    }
}
