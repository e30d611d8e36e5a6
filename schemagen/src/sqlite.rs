//! SQLite metadata source built on sqlx

use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{MetadataRow, MetadataSource};
use crate::value::Value;

/// A read-only SQLite metadata source.
///
/// Accepts any sqlx SQLite URL (`sqlite://path/to/file.db`,
/// `sqlite::memory:`). The pool is limited to one connection, which also
/// keeps an in-memory database alive for the source's lifetime.
#[derive(Clone)]
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    /// Open `url`, waiting at most `timeout` for the connection.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(timeout)
            .connect(url)
            .await?;
        debug!("SQLite metadata connection established");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl MetadataSource for SqliteSource {
    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<MetadataRow>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<String>),
                Value::Bool(v) => query.bind(v),
                Value::I64(v) => query.bind(v),
                Value::U64(v) => query.bind(i64::try_from(v).map_err(|_| {
                    Error::TypeConversion {
                        expected: "i64",
                        actual: format!("u64({}) out of range", v),
                    }
                })?),
                Value::F64(v) => query.bind(v),
                Value::String(v) => query.bind(v),
                Value::Bytes(v) => query.bind(v),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(into_metadata_row).collect()
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn into_metadata_row(row: &SqliteRow) -> Result<MetadataRow> {
    let mut values = MetadataRow::new();

    for column in row.columns() {
        let i = column.ordinal();
        let raw = row.try_get_raw(i)?;
        // Storage class of the value itself; pragma results carry no declared type
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => Value::I64(row.try_get(i)?),
                "REAL" => Value::F64(row.try_get(i)?),
                "BLOB" => Value::Bytes(row.try_get(i)?),
                _ => Value::String(row.try_get(i)?),
            }
        };
        values.insert(column.name(), value);
    }

    Ok(values)
}
