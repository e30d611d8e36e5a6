//! SQL Server schema reader

use async_trait::async_trait;
use schemagen::{FromRow, MetadataSource, Query};
use tracing::debug;

use super::{
    non_empty, positive_length, resolve_column, KeyColumnRow, SchemaReader, TableRow,
};
use crate::error::Result;
use crate::model::{Column, Table};
use crate::provider::Provider;

const TABLE_SQL: &str = r#"
SELECT t.TABLE_SCHEMA AS table_schema,
       t.TABLE_NAME AS table_name,
       t.TABLE_TYPE AS table_type,
       CAST(ep.value AS NVARCHAR(4000)) AS table_comment
FROM INFORMATION_SCHEMA.TABLES t
LEFT JOIN sys.extended_properties ep
       ON ep.major_id = OBJECT_ID(QUOTENAME(t.TABLE_SCHEMA) + '.' + QUOTENAME(t.TABLE_NAME))
      AND ep.minor_id = 0
      AND ep.class = 1
      AND ep.name = 'MS_Description'
WHERE t.TABLE_TYPE IN ('BASE TABLE', 'VIEW')
ORDER BY t.TABLE_SCHEMA, t.TABLE_NAME"#;

const COLUMN_SQL: &str = r#"
SELECT c.COLUMN_NAME AS column_name,
       c.DATA_TYPE AS data_type,
       c.IS_NULLABLE AS is_nullable,
       CAST(c.CHARACTER_MAXIMUM_LENGTH AS BIGINT) AS character_maximum_length,
       COLUMNPROPERTY(OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + QUOTENAME(c.TABLE_NAME)),
                      c.COLUMN_NAME, 'IsIdentity') AS is_identity,
       CAST(ep.value AS NVARCHAR(4000)) AS column_comment
FROM INFORMATION_SCHEMA.COLUMNS c
LEFT JOIN sys.extended_properties ep
       ON ep.major_id = OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + QUOTENAME(c.TABLE_NAME))
      AND ep.minor_id = COLUMNPROPERTY(OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + QUOTENAME(c.TABLE_NAME)),
                                       c.COLUMN_NAME, 'ColumnId')
      AND ep.class = 1
      AND ep.name = 'MS_Description'
WHERE c.TABLE_SCHEMA = @P1 AND c.TABLE_NAME = @P2
ORDER BY c.ORDINAL_POSITION"#;

const PRIMARY_KEY_SQL: &str = r#"
SELECT kcu.COLUMN_NAME AS column_name
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
  ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
 AND tc.TABLE_SCHEMA = kcu.TABLE_SCHEMA
 AND tc.TABLE_NAME = kcu.TABLE_NAME
WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY'
  AND tc.TABLE_SCHEMA = @P1 AND tc.TABLE_NAME = @P2
ORDER BY kcu.ORDINAL_POSITION"#;

#[derive(Debug, Clone, FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    is_nullable: bool,
    #[schemagen(default)]
    character_maximum_length: Option<i64>,
    #[schemagen(default)]
    is_identity: Option<i64>,
    #[schemagen(default)]
    column_comment: Option<String>,
}

impl ColumnRow {
    fn into_column(self) -> Column {
        let mut column = resolve_column(
            Provider::SqlServer,
            self.column_name,
            &self.data_type,
            false,
            self.is_nullable,
        );
        column.is_auto_increment = self.is_identity == Some(1);
        column.comment = non_empty(self.column_comment);
        // -1 means (max)
        column.length = positive_length(self.character_maximum_length);
        column
    }
}

/// Reads `INFORMATION_SCHEMA` plus `MS_Description` extended properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerReader;

#[async_trait]
impl SchemaReader for SqlServerReader {
    fn provider(&self) -> Provider {
        Provider::SqlServer
    }

    async fn read_schema(&self, source: &dyn MetadataSource) -> Result<Vec<Table>> {
        let table_rows: Vec<TableRow> = Query::new(TABLE_SQL).fetch_all(source).await?;
        debug!("Found {} tables and views", table_rows.len());

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in table_rows {
            let mut table = row.into_table();

            let columns: Vec<ColumnRow> = Query::new(COLUMN_SQL)
                .bind(table.schema.as_str())
                .bind(table.name.as_str())
                .fetch_all(source)
                .await?;
            table.columns = columns.into_iter().map(ColumnRow::into_column).collect();

            let keys: Vec<KeyColumnRow> = Query::new(PRIMARY_KEY_SQL)
                .bind(table.schema.as_str())
                .bind(table.name.as_str())
                .fetch_all(source)
                .await?;
            table.assign_primary_key(keys.into_iter().map(|k| k.column_name).collect());

            tables.push(table);
        }

        Ok(tables)
    }
}
