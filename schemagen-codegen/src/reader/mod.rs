//! Schema readers: one per engine, all behind [`SchemaReader`]
//!
//! A reader only needs a [`MetadataSource`]. It lists base tables and views,
//! reads each table's columns and key, and resolves names and types through
//! the naming engine and [`map_type`](crate::types::map_type). Any failed
//! query ends the read with [`CodegenError::SchemaRead`]; nothing partial is
//! returned.

mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

use async_trait::async_trait;
use schemagen::{FromRow, MetadataSource};

use crate::error::Result;
use crate::model::{Column, Table};
use crate::provider::Provider;
use crate::types::{map_type, PropertyType};

pub use mysql::MySqlReader;
pub use oracle::OracleReader;
pub use postgres::PostgresReader;
pub use sqlite::SqliteReader;
pub use sqlserver::SqlServerReader;

/// Reads the raw schema of one engine.
#[async_trait]
pub trait SchemaReader: Send + Sync {
    /// The engine this reader understands
    fn provider(&self) -> Provider;

    /// Read every base table and view visible through `source`.
    ///
    /// Only catalog queries are issued. The caller owns the connection and
    /// closes it afterwards.
    async fn read_schema(&self, source: &dyn MetadataSource) -> Result<Vec<Table>>;
}

/// Select the reader for a provider.
pub fn reader_for(provider: Provider) -> Box<dyn SchemaReader> {
    match provider {
        Provider::MySql => Box::new(MySqlReader),
        Provider::SqlServer => Box::new(SqlServerReader),
        Provider::Postgres => Box::new(PostgresReader),
        Provider::Oracle => Box::new(OracleReader),
        Provider::Sqlite => Box::new(SqliteReader),
    }
}

/// One row of a table listing; every reader aliases its query to this shape.
#[derive(Debug, Clone, FromRow)]
struct TableRow {
    table_schema: String,
    table_name: String,
    table_type: String,
    #[schemagen(default)]
    table_comment: Option<String>,
}

impl TableRow {
    fn into_table(self) -> Table {
        let mut table = Table::new(self.table_schema, self.table_name);
        table.is_view = self.table_type.trim().eq_ignore_ascii_case("VIEW");
        table.comment = non_empty(self.table_comment);
        table
    }
}

/// One row of a primary key listing
#[derive(Debug, Clone, FromRow)]
struct KeyColumnRow {
    column_name: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Catalogs report "no limit" as 0, -1 or huge values depending on engine.
fn positive_length(value: Option<i64>) -> Option<u64> {
    value.filter(|v| *v > 0).map(|v| v as u64)
}

/// A column with its canonical type resolved.
fn resolve_column(
    provider: Provider,
    name: String,
    descriptor: &str,
    unsigned: bool,
    nullable: bool,
) -> Column {
    let scalar = map_type(provider, descriptor, unsigned);
    Column::new(name, PropertyType::new(scalar, nullable))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_for_every_provider() {
        for provider in Provider::ALL {
            assert_eq!(reader_for(provider).provider(), provider);
        }
    }

    #[test]
    fn test_table_row_into_table() {
        let row = TableRow {
            table_schema: "shop".into(),
            table_name: "order_items".into(),
            table_type: "VIEW".into(),
            table_comment: Some("  ".into()),
        };
        let table = row.into_table();
        assert!(table.is_view);
        assert_eq!(table.class_name, "order_item");
        assert_eq!(table.comment, None);
    }

    #[test]
    fn test_positive_length() {
        assert_eq!(positive_length(Some(255)), Some(255));
        assert_eq!(positive_length(Some(-1)), None);
        assert_eq!(positive_length(Some(0)), None);
        assert_eq!(positive_length(None), None);
    }
}
