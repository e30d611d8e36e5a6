//! Oracle schema reader

use async_trait::async_trait;
use schemagen::{FromRow, MetadataSource, Query};
use tracing::debug;

use super::{
    non_empty, positive_length, resolve_column, KeyColumnRow, SchemaReader, TableRow,
};
use crate::error::Result;
use crate::model::{Column, Table};
use crate::provider::Provider;

// Unquoted aliases come back upper-cased; row lookup ignores case
const TABLE_SQL: &str = r#"
SELECT USER AS table_schema,
       o.object_name AS table_name,
       o.object_type AS table_type,
       c.comments AS table_comment
FROM user_objects o
LEFT JOIN user_tab_comments c ON c.table_name = o.object_name
WHERE o.object_type IN ('TABLE', 'VIEW')
  AND o.object_name NOT LIKE 'BIN$%'
ORDER BY o.object_name"#;

const COLUMN_SQL: &str = r#"
SELECT c.column_name AS column_name,
       c.data_type AS data_type,
       c.data_precision AS data_precision,
       c.data_scale AS data_scale,
       c.data_length AS data_length,
       c.char_length AS char_length,
       c.nullable AS nullable,
       c.identity_column AS identity_column,
       cc.comments AS column_comment
FROM user_tab_columns c
LEFT JOIN user_col_comments cc
       ON cc.table_name = c.table_name AND cc.column_name = c.column_name
WHERE c.table_name = :1
ORDER BY c.column_id"#;

const PRIMARY_KEY_SQL: &str = r#"
SELECT cols.column_name AS column_name
FROM user_constraints cons
JOIN user_cons_columns cols ON cons.constraint_name = cols.constraint_name
WHERE cons.constraint_type = 'P' AND cons.table_name = :1
ORDER BY cols.position"#;

const IDENTITY_SQL: &str = r#"
SELECT column_name AS column_name, sequence_name AS sequence_name
FROM user_tab_identity_cols
WHERE table_name = :1"#;

#[derive(Debug, Clone, FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    #[schemagen(default)]
    data_precision: Option<i64>,
    #[schemagen(default)]
    data_scale: Option<i64>,
    #[schemagen(default)]
    data_length: Option<i64>,
    #[schemagen(default)]
    char_length: Option<i64>,
    nullable: bool,
    #[schemagen(default)]
    identity_column: Option<bool>,
    #[schemagen(default)]
    column_comment: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct IdentityRow {
    column_name: String,
    sequence_name: String,
}

impl ColumnRow {
    /// Oracle reports precision and scale apart from the type name.
    /// RAW has neither; its size is the byte length.
    fn descriptor(&self) -> String {
        if self.data_type.eq_ignore_ascii_case("RAW") {
            return match self.data_length {
                Some(len) => format!("{}({})", self.data_type, len),
                None => self.data_type.clone(),
            };
        }
        match (self.data_precision, self.data_scale) {
            (Some(p), Some(s)) => format!("{}({},{})", self.data_type, p, s),
            (Some(p), None) => format!("{}({})", self.data_type, p),
            // INTEGER columns are NUMBER with scale 0 and no precision
            (None, Some(0)) if self.data_type.eq_ignore_ascii_case("NUMBER") => {
                "integer".to_string()
            }
            _ => self.data_type.clone(),
        }
    }

    fn into_column(self) -> Column {
        let descriptor = self.descriptor();
        let mut column = resolve_column(
            Provider::Oracle,
            self.column_name,
            &descriptor,
            false,
            self.nullable,
        );
        column.is_auto_increment = self.identity_column == Some(true);
        column.comment = non_empty(self.column_comment);
        column.length = positive_length(self.char_length);
        column
    }
}

/// Reads the `USER_*` dictionary views of the connected schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleReader;

#[async_trait]
impl SchemaReader for OracleReader {
    fn provider(&self) -> Provider {
        Provider::Oracle
    }

    async fn read_schema(&self, source: &dyn MetadataSource) -> Result<Vec<Table>> {
        let table_rows: Vec<TableRow> = Query::new(TABLE_SQL).fetch_all(source).await?;
        debug!("Found {} tables and views", table_rows.len());

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in table_rows {
            let mut table = row.into_table();

            let columns: Vec<ColumnRow> = Query::new(COLUMN_SQL)
                .bind(table.name.as_str())
                .fetch_all(source)
                .await?;
            table.columns = columns.into_iter().map(ColumnRow::into_column).collect();

            let keys: Vec<KeyColumnRow> = Query::new(PRIMARY_KEY_SQL)
                .bind(table.name.as_str())
                .fetch_all(source)
                .await?;
            table.assign_primary_key(keys.into_iter().map(|k| k.column_name).collect());

            if !table.is_view && table.columns.iter().any(|c| c.is_auto_increment) {
                let identities: Vec<IdentityRow> = Query::new(IDENTITY_SQL)
                    .bind(table.name.as_str())
                    .fetch_all(source)
                    .await?;
                table.sequence_name = table.primary_key.as_ref().and_then(|pk| {
                    identities
                        .iter()
                        .find(|i| i.column_name.eq_ignore_ascii_case(pk))
                        .map(|i| i.sequence_name.clone())
                });
            }

            tables.push(table);
        }

        Ok(tables)
    }
}
