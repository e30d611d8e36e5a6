//! MySQL row conversion

use crate::error::{Error, Result};
use crate::traits::MetadataRow;
use mysql_async::Row as MySqlAsyncRow;

use super::types::from_mysql_value;

/// Convert a mysql_async row into a [`MetadataRow`].
///
/// Column names are taken as the server reports them; lookups on the
/// resulting row are case-insensitive.
pub fn into_metadata_row(row: MySqlAsyncRow) -> Result<MetadataRow> {
    let columns = row.columns_ref();
    let mut values = MetadataRow::new();

    for (i, column) in columns.iter().enumerate() {
        let column_name = column.name_str().to_string();
        let mysql_value = row
            .as_ref(i)
            .ok_or_else(|| Error::ColumnNotFound(column_name.clone()))?
            .clone();
        values.insert(&column_name, from_mysql_value(mysql_value)?);
    }

    Ok(values)
}
