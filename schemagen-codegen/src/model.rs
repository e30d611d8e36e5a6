//! Provider-neutral schema model

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::naming::{clean_identifier, singularize};
use crate::types::PropertyType;

/// A table or view and the class generated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Name as stored in the catalog
    pub name: String,

    /// Owning schema (database name on MySQL, owner on Oracle, `main` on SQLite)
    pub schema: String,

    /// `name` made safe as an identifier
    pub clean_name: String,

    /// Name of the generated class
    pub class_name: String,

    pub is_view: bool,

    /// The key column, set only when the key has exactly one column
    pub primary_key: Option<String>,

    /// Every key column in key order; more than one means a composite key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key_columns: Vec<String>,

    /// Sequence feeding the key column, when it is not an identity column
    pub sequence_name: Option<String>,

    /// Excluded from generation but kept in the model
    pub ignore: bool,

    pub comment: Option<String>,

    /// Columns in ordinal order
    pub columns: Vec<Column>,
}

/// A column and the property generated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Name as stored in the catalog
    pub name: String,

    /// Name of the generated property
    pub property_name: String,

    pub property_type: PropertyType,

    pub is_nullable: bool,

    pub is_pk: bool,

    pub is_auto_increment: bool,

    /// Date/time values are read and written as UTC
    pub force_to_utc: bool,

    /// Raw expression spliced into INSERT statements in place of a parameter
    pub insert_template: Option<String>,

    /// Raw expression spliced into UPDATE statements in place of a parameter
    pub update_template: Option<String>,

    pub ignore: bool,

    pub comment: Option<String>,

    /// Maximum character length, where the engine reports one
    pub length: Option<u64>,
}

impl Table {
    /// A freshly read table: the clean name comes from `name` and the class
    /// name is its singular form.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let clean_name = clean_identifier(&name);
        let class_name = singularize(&clean_name);
        Self {
            name,
            schema: schema.into(),
            clean_name,
            class_name,
            is_view: false,
            primary_key: None,
            primary_key_columns: Vec::new(),
            sequence_name: None,
            ignore: false,
            comment: None,
            columns: Vec::new(),
        }
    }

    /// The `schema.table` key overrides are matched against.
    pub fn qualified_key(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Get a column by catalog name, ignoring case
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Columns that take part in generation
    pub fn active_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.ignore)
    }

    /// Check if the table has a multi-column primary key
    pub fn has_composite_key(&self) -> bool {
        self.primary_key_columns.len() > 1
    }

    /// Record the key columns found by a reader.
    ///
    /// Every listed column is flagged `is_pk`. `primary_key` is only filled
    /// for a single-column key; a composite key stays in
    /// `primary_key_columns` alone.
    pub fn assign_primary_key(&mut self, key_columns: Vec<String>) {
        for column in &mut self.columns {
            if key_columns
                .iter()
                .any(|k| k.eq_ignore_ascii_case(&column.name))
            {
                column.is_pk = true;
            }
        }

        self.primary_key = match key_columns.as_slice() {
            [single] => Some(single.clone()),
            [] => None,
            _ => {
                warn!(
                    "Table {} has a composite primary key ({}); primary_key left unset",
                    self.qualified_key(),
                    key_columns.join(", ")
                );
                None
            }
        };
        self.primary_key_columns = key_columns;
    }
}

impl Column {
    /// A freshly read column: the property name is the cleaned catalog name.
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        let name = name.into();
        let property_name = clean_identifier(&name);
        Self {
            name,
            property_name,
            is_nullable: property_type.nullable,
            property_type,
            is_pk: false,
            is_auto_increment: false,
            force_to_utc: false,
            insert_template: None,
            update_template: None,
            ignore: false,
            comment: None,
            length: None,
        }
    }
}

/// The finalized model handed to emitters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchema {
    pub tables: Vec<Table>,
}

impl GeneratedSchema {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Tables that take part in generation
    pub fn active_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| !t.ignore)
    }

    /// Find a table by schema and name, ignoring case
    pub fn table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.schema.eq_ignore_ascii_case(schema) && t.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarType;

    fn table_with(columns: &[&str]) -> Table {
        let mut table = Table::new("shop", "order_lines");
        table.columns = columns
            .iter()
            .map(|c| Column::new(*c, PropertyType::required(ScalarType::I64)))
            .collect();
        table
    }

    #[test]
    fn test_new_table_names() {
        let table = Table::new("shop", "order lines");
        assert_eq!(table.clean_name, "order_lines");
        assert_eq!(table.class_name, "order_line");
        assert_eq!(table.qualified_key(), "shop.order lines");
    }

    #[test]
    fn test_single_primary_key() {
        let mut table = table_with(&["id", "total"]);
        table.assign_primary_key(vec!["ID".to_string()]);
        assert_eq!(table.primary_key.as_deref(), Some("ID"));
        assert!(table.columns[0].is_pk);
        assert!(!table.columns[1].is_pk);
        assert!(!table.has_composite_key());
    }

    #[test]
    fn test_composite_primary_key_is_reported_not_assigned() {
        let mut table = table_with(&["order_id", "line_no", "qty"]);
        table.assign_primary_key(vec!["order_id".to_string(), "line_no".to_string()]);
        assert_eq!(table.primary_key, None);
        assert!(table.has_composite_key());
        assert_eq!(table.primary_key_columns, vec!["order_id", "line_no"]);
        assert!(table.columns[0].is_pk && table.columns[1].is_pk);
    }

    #[test]
    fn test_active_filters() {
        let mut table = table_with(&["a", "b"]);
        table.columns[1].ignore = true;
        assert_eq!(table.active_columns().count(), 1);

        let mut hidden = Table::new("shop", "audit");
        hidden.ignore = true;
        let schema = GeneratedSchema::new(vec![table, hidden]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.active_tables().count(), 1);
        assert!(schema.table("SHOP", "AUDIT").is_some());
    }
}
