//! PostgreSQL metadata source built on sqlx

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Oid;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{MetadataRow, MetadataSource};
use crate::value::Value;

/// A read-only PostgreSQL metadata source.
///
/// Holds a sqlx pool limited to one connection.
#[derive(Clone)]
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    /// Connect to `url`, waiting at most `timeout` for the connection.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(timeout)
            .connect(url)
            .await?;
        debug!("PostgreSQL metadata connection established");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MetadataSource for PgSource {
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

fn into_metadata_row(row: &PgRow) -> Result<MetadataRow> {
    let mut values = MetadataRow::new();

    for column in row.columns() {
        let i = column.ordinal();
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "BOOL" => Value::Bool(row.try_get(i)?),
                "INT2" => Value::I64(row.try_get::<i16, _>(i)?.into()),
                "INT4" => Value::I64(row.try_get::<i32, _>(i)?.into()),
                "INT8" => Value::I64(row.try_get(i)?),
                "OID" => Value::U64(row.try_get::<Oid, _>(i)?.0.into()),
                "FLOAT4" => Value::F64(row.try_get::<f32, _>(i)?.into()),
                "FLOAT8" => Value::F64(row.try_get(i)?),
                "BYTEA" => Value::Bytes(row.try_get(i)?),
                "TEXT" | "VARCHAR" | "NAME" | "BPCHAR" | "UNKNOWN" => {
                    Value::String(row.try_get(i)?)
                }
                other => {
                    return Err(Error::RowDecode(format!(
                        "column `{}` has unsupported catalog type {}; cast it to text",
                        column.name(),
                        other
                    )))
                }
            }
        };
        values.insert(column.name(), value);
    }

    Ok(values)
}
