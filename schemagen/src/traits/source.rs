//! MetadataSource trait for read-only catalog access

use crate::error::{Error, Result};
use crate::traits::{FromRow, FromValue, MetadataRow};
use crate::value::Value;
use async_trait::async_trait;

/// A read-only handle on a database's catalog.
///
/// This is the only capability schema readers depend on: run a query, get
/// rows back. There is deliberately no `execute`; a source cannot mutate
/// application data. The trait is object-safe so a reader selected at run
/// time can take `&dyn MetadataSource`.
///
/// Placeholders are passed through to the driver untouched, so SQL written
/// for a source must use that engine's placeholder syntax (`?`, `$1`, `@P1`,
/// `:1`).
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Run a catalog query and return every row.
    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<MetadataRow>>;

    /// Release the underlying connection. The default does nothing.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Typed helpers on top of [`MetadataSource`].
///
/// Implemented for every source, including `dyn MetadataSource`.
#[async_trait]
pub trait MetadataSourceExt: MetadataSource {
    /// Fetch all rows and map each one with [`FromRow`].
    async fn fetch_all<T: FromRow + Send>(&self, sql: &str, params: Vec<Value>) -> Result<Vec<T>> {
        let rows = self.fetch_rows(sql, params).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Fetch a single optional row.
    async fn fetch_optional<T: FromRow + Send>(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Option<T>> {
        let rows = self.fetch_rows(sql, params).await?;
        rows.first().map(T::from_row).transpose()
    }

    /// Fetch a scalar value (first column of first row).
    async fn fetch_scalar<T: FromValue + Send>(&self, sql: &str, params: Vec<Value>) -> Result<T> {
        let rows = self.fetch_rows(sql, params).await?;
        let value = rows
            .first()
            .ok_or_else(|| Error::Query("Expected one row, found none".to_string()))?
            .first()
            .cloned()
            .ok_or_else(|| Error::Query("Expected at least one column".to_string()))?;
        T::from_value(value)
    }
}

impl<S: MetadataSource + ?Sized> MetadataSourceExt for S {}

#[async_trait]
impl<S: MetadataSource + ?Sized> MetadataSource for &S {
    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<MetadataRow>> {
        (**self).fetch_rows(sql, params).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

#[async_trait]
impl<S: MetadataSource + ?Sized> MetadataSource for Box<S> {
    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<MetadataRow>> {
        (**self).fetch_rows(sql, params).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
