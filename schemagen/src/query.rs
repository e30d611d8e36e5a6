//! Query builder for schemagen

use crate::error::Result;
use crate::traits::{FromRow, FromValue, MetadataRow, MetadataSource, MetadataSourceExt};
use crate::value::Value;

/// A catalog query builder that supports fluent parameter binding.
///
/// # Example
///
/// ```ignore
/// use schemagen::{MetadataSource, Query};
///
/// async fn columns(source: &dyn MetadataSource, table: &str) -> schemagen::Result<Vec<ColumnRow>> {
///     Query::new("SELECT column_name FROM information_schema.columns WHERE table_name = ?")
///         .bind(table)
///         .fetch_all(source)
///         .await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Query<'q> {
    sql: &'q str,
    params: Vec<Value>,
}

impl<'q> Query<'q> {
    /// Create a new query with the given SQL.
    pub fn new(sql: &'q str) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Bind a single value to the query.
    ///
    /// Values are bound in order, replacing the driver's placeholders.
    pub fn bind<T: Into<Value>>(mut self, value: T) -> Self {
        self.params.push(value.into());
        self
    }

    /// Get the SQL string.
    pub fn sql(&self) -> &str {
        self.sql
    }

    /// Get the bound parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Fetch all rows without mapping them.
    pub async fn fetch_rows<S: MetadataSource + ?Sized>(
        self,
        source: &S,
    ) -> Result<Vec<MetadataRow>> {
        source.fetch_rows(self.sql, self.params).await
    }

    /// Fetch all matching rows.
    pub async fn fetch_all<T: FromRow + Send, S: MetadataSource + ?Sized>(
        self,
        source: &S,
    ) -> Result<Vec<T>> {
        source.fetch_all(self.sql, self.params).await
    }

    /// Fetch a single optional row.
    pub async fn fetch_optional<T: FromRow + Send, S: MetadataSource + ?Sized>(
        self,
        source: &S,
    ) -> Result<Option<T>> {
        source.fetch_optional(self.sql, self.params).await
    }

    /// Fetch a scalar value (first column of first row).
    pub async fn fetch_scalar<T: FromValue + Send, S: MetadataSource + ?Sized>(
        self,
        source: &S,
    ) -> Result<T> {
        source.fetch_scalar(self.sql, self.params).await
    }
}
