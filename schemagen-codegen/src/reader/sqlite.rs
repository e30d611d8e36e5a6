//! SQLite schema reader

use async_trait::async_trait;
use schemagen::{FromRow, MetadataSource, Query};
use tracing::debug;

use super::{resolve_column, SchemaReader, TableRow};
use crate::error::Result;
use crate::model::{Column, Table};
use crate::provider::Provider;

const TABLE_SQL: &str = r#"
SELECT 'main' AS table_schema,
       name AS table_name,
       type AS table_type
FROM sqlite_master
WHERE type IN ('table', 'view')
  AND name NOT LIKE 'sqlite_%'
ORDER BY name"#;

const COLUMN_SQL: &str = r#"
SELECT cid, name, type, "notnull", pk
FROM pragma_table_info(?)
ORDER BY cid"#;

#[derive(Debug, Clone, FromRow)]
struct ColumnRow {
    name: String,
    #[schemagen(rename = "type", default)]
    declared_type: String,
    #[schemagen(rename = "notnull")]
    not_null: bool,
    /// 1-based position in the primary key, 0 when not a key column
    pk: i64,
}

/// Declared length of `varchar(40)`-style types
fn declared_length(declared_type: &str) -> Option<u64> {
    let (_, rest) = declared_type.split_once('(')?;
    rest.split([',', ')']).next()?.trim().parse().ok()
}

/// Reads `sqlite_master` and `pragma_table_info` of the main database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteReader;

#[async_trait]
impl SchemaReader for SqliteReader {
    fn provider(&self) -> Provider {
        Provider::Sqlite
    }

    async fn read_schema(&self, source: &dyn MetadataSource) -> Result<Vec<Table>> {
        let table_rows: Vec<TableRow> = Query::new(TABLE_SQL).fetch_all(source).await?;
        debug!("Found {} tables and views", table_rows.len());

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in table_rows {
            let mut table = row.into_table();

            let rows: Vec<ColumnRow> = Query::new(COLUMN_SQL)
                .bind(table.name.as_str())
                .fetch_all(source)
                .await?;

            let mut keys: Vec<(i64, String)> = rows
                .iter()
                .filter(|r| r.pk > 0)
                .map(|r| (r.pk, r.name.clone()))
                .collect();
            keys.sort();

            // A lone INTEGER PRIMARY KEY aliases the rowid
            let rowid_alias = match keys.as_slice() {
                [(_, name)] => rows
                    .iter()
                    .find(|r| &r.name == name)
                    .filter(|r| r.declared_type.trim().eq_ignore_ascii_case("INTEGER"))
                    .map(|r| r.name.clone()),
                _ => None,
            };

            table.columns = rows
                .into_iter()
                .map(|r| {
                    let is_rowid = rowid_alias.as_deref() == Some(r.name.as_str());
                    let nullable = !r.not_null && !is_rowid;
                    let length = declared_length(&r.declared_type);
                    let mut column: Column = resolve_column(
                        Provider::Sqlite,
                        r.name,
                        &r.declared_type,
                        false,
                        nullable,
                    );
                    column.is_auto_increment = is_rowid;
                    column.length = length;
                    column
                })
                .collect();

            table.assign_primary_key(keys.into_iter().map(|(_, name)| name).collect());
            tables.push(table);
        }

        Ok(tables)
    }
}
