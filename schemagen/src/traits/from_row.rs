//! FromRow trait and the driver-neutral metadata row

use crate::error::{Error, Result};
use crate::value::Value;

/// A database row that can be queried by column name.
///
/// This trait abstracts over different row representations, allowing the
/// same `FromRow` implementations to work with every metadata source.
pub trait Row {
    /// Get a value from the row by column name as a dynamic Value.
    ///
    /// Returns an error if the column doesn't exist.
    fn get_value(&self, column: &str) -> Result<Value>;
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value from the row by column name.
    fn get<T: crate::FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_value(column)?;
        T::from_value(value).map_err(|e| match e {
            Error::UnexpectedNull(_) => Error::UnexpectedNull(column.to_string()),
            other => other,
        })
    }
}

// Implement RowExt for all Row types
impl<R: Row> RowExt for R {}

/// Trait for types that can be constructed from a database row.
///
/// This trait is typically implemented via the `#[derive(FromRow)]` macro,
/// which generates the implementation automatically based on struct fields.
///
/// # Manual Implementation
///
/// ```ignore
/// use schemagen::{FromRow, Row, RowExt, Result};
///
/// pub struct ColumnRow {
///     pub column_name: String,
///     pub is_nullable: bool,
/// }
///
/// impl FromRow for ColumnRow {
///     fn from_row<R: Row>(row: &R) -> Result<Self> {
///         Ok(Self {
///             column_name: row.get("column_name")?,
///             is_nullable: row.get("is_nullable")?,
///         })
///     }
///
///     fn column_names() -> &'static [&'static str] {
///         &["column_name", "is_nullable"]
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Construct an instance of this type from a database row.
    fn from_row<R: Row>(row: &R) -> Result<Self>;

    /// Get the column names that this type reads from.
    fn column_names() -> &'static [&'static str];
}

/// A driver-neutral catalog row.
///
/// Every metadata source converts its native rows into this shape. Column
/// lookup is case-insensitive: Oracle upper-cases unquoted aliases and
/// MySQL 8 reports `information_schema` headers in upper case, so readers
/// cannot rely on the casing they wrote in their SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRow {
    /// Column values in select-list order
    values: Vec<(String, Value)>,
}

impl MetadataRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.insert(column.as_ref(), value);
        }
        row
    }

    /// Set a column value, replacing any previous value for that column.
    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self
            .values
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
        {
            Some(slot) => slot.1 = value,
            None => self.values.push((column.to_string(), value)),
        }
    }

    /// The value of the first column, if any.
    pub fn first(&self) -> Option<&Value> {
        self.values.first().map(|(_, value)| value)
    }

    /// Column names in select-list order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Row for MetadataRow {
    fn get_value(&self, column: &str) -> Result<Value> {
        self.values
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }
}

impl Row for &MetadataRow {
    fn get_value(&self, column: &str) -> Result<Value> {
        (*self).get_value(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let row = MetadataRow::from_pairs([("TABLE_NAME", "users")]);
        assert_eq!(row.get::<String>("table_name").unwrap(), "users");
        assert_eq!(row.get::<String>("Table_Name").unwrap(), "users");
    }

    #[test]
    fn test_insert_replaces_and_keeps_order() {
        let mut row = MetadataRow::from_pairs([("b", 1i64), ("a", 2i64)]);
        row.insert("B", 3i64);
        assert_eq!(row.len(), 2);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(row.first(), Some(&Value::I64(3)));
    }

    #[test]
    fn test_missing_column() {
        let row = MetadataRow::new();
        let err = row.get::<String>("column_name").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(c) if c == "column_name"));
    }

    #[test]
    fn test_null_names_column() {
        let row = MetadataRow::from_pairs([("comment", Value::Null)]);
        let err = row.get::<String>("comment").unwrap_err();
        assert!(matches!(err, Error::UnexpectedNull(c) if c == "comment"));
        assert_eq!(row.get::<Option<String>>("comment").unwrap(), None);
    }
}
