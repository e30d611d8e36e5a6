//! MySQL / MariaDB schema reader

use std::collections::HashMap;

use async_trait::async_trait;
use schemagen::{FromRow, MetadataSource, Query};
use tracing::debug;

use super::{non_empty, positive_length, resolve_column, SchemaReader, TableRow};
use crate::error::Result;
use crate::model::{Column, Table};
use crate::provider::Provider;

const TABLE_SQL: &str = r#"
SELECT TABLE_SCHEMA AS table_schema,
       TABLE_NAME AS table_name,
       TABLE_TYPE AS table_type,
       TABLE_COMMENT AS table_comment
FROM information_schema.tables
WHERE (TABLE_TYPE = 'BASE TABLE' OR TABLE_TYPE = 'VIEW')
  AND TABLE_SCHEMA = DATABASE()
ORDER BY TABLE_NAME"#;

// One pass over the whole database, grouped by table afterwards
const COLUMN_SQL: &str = r#"
SELECT TABLE_NAME AS table_name,
       COLUMN_NAME AS column_name,
       DATA_TYPE AS data_type,
       COLUMN_TYPE AS column_type,
       IS_NULLABLE AS is_nullable,
       COLUMN_KEY AS column_key,
       EXTRA AS extra,
       COLUMN_COMMENT AS column_comment,
       CHARACTER_MAXIMUM_LENGTH AS character_maximum_length
FROM information_schema.columns
WHERE TABLE_SCHEMA = DATABASE()
ORDER BY TABLE_NAME, ORDINAL_POSITION"#;

// COLUMN_KEY = 'PRI' carries no key position; the key order lives here
const PRIMARY_KEY_SQL: &str = r#"
SELECT TABLE_NAME AS table_name,
       COLUMN_NAME AS column_name
FROM information_schema.key_column_usage
WHERE TABLE_SCHEMA = DATABASE()
  AND CONSTRAINT_NAME = 'PRIMARY'
ORDER BY TABLE_NAME, ORDINAL_POSITION"#;

#[derive(Debug, Clone, FromRow)]
struct KeyUsageRow {
    table_name: String,
    column_name: String,
}

#[derive(Debug, Clone, FromRow)]
struct ColumnRow {
    table_name: String,
    column_name: String,
    data_type: String,
    #[schemagen(default)]
    column_type: String,
    is_nullable: bool,
    #[schemagen(default)]
    column_key: String,
    #[schemagen(default)]
    extra: String,
    #[schemagen(default)]
    column_comment: Option<String>,
    #[schemagen(default)]
    character_maximum_length: Option<i64>,
}

impl ColumnRow {
    fn into_column(self) -> Column {
        // COLUMN_TYPE keeps the display width (tinyint(1)) and the unsigned flag
        let descriptor = if self.column_type.trim().is_empty() {
            self.data_type.as_str()
        } else {
            self.column_type.as_str()
        };
        let unsigned = descriptor.to_ascii_lowercase().contains("unsigned");

        let mut column = resolve_column(
            Provider::MySql,
            self.column_name,
            descriptor,
            unsigned,
            self.is_nullable,
        );
        column.is_pk = self.column_key.eq_ignore_ascii_case("PRI");
        column.is_auto_increment = self.extra.to_ascii_lowercase().contains("auto_increment");
        column.comment = non_empty(self.column_comment);
        column.length = positive_length(self.character_maximum_length);
        column
    }
}

/// Reads `information_schema` of the connection's current database.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlReader;

#[async_trait]
impl SchemaReader for MySqlReader {
    fn provider(&self) -> Provider {
        Provider::MySql
    }

    async fn read_schema(&self, source: &dyn MetadataSource) -> Result<Vec<Table>> {
        let table_rows: Vec<TableRow> = Query::new(TABLE_SQL).fetch_all(source).await?;
        debug!("Found {} tables and views", table_rows.len());

        let column_rows: Vec<ColumnRow> = Query::new(COLUMN_SQL).fetch_all(source).await?;
        let mut columns_by_table: HashMap<String, Vec<Column>> = HashMap::new();
        for row in column_rows {
            columns_by_table
                .entry(row.table_name.clone())
                .or_default()
                .push(row.into_column());
        }

        let key_rows: Vec<KeyUsageRow> = Query::new(PRIMARY_KEY_SQL).fetch_all(source).await?;
        let mut keys_by_table: HashMap<String, Vec<String>> = HashMap::new();
        for row in key_rows {
            keys_by_table.entry(row.table_name).or_default().push(row.column_name);
        }

        let tables = table_rows
            .into_iter()
            .map(|row| {
                let mut table = row.into_table();
                // MySQL fills TABLE_COMMENT with "VIEW" for views
                if table.is_view && table.comment.as_deref() == Some("VIEW") {
                    table.comment = None;
                }
                table.columns = columns_by_table.remove(&table.name).unwrap_or_default();

                // Without key usage rows, fall back to the PRI flag in ordinal order
                let keys = keys_by_table.remove(&table.name).unwrap_or_else(|| {
                    table
                        .columns
                        .iter()
                        .filter(|c| c.is_pk)
                        .map(|c| c.name.clone())
                        .collect()
                });
                table.assign_primary_key(keys);
                table
            })
            .collect();

        Ok(tables)
    }
}
