//! Applying user overrides to the normalized model

use tracing::debug;

use crate::config::{ColumnOverride, GenerateCommand, TableOverride};
use crate::model::{Column, Table};

/// Apply the command's table and column overrides.
///
/// Tables are matched on `schema.table` ignoring case; override entries
/// that match nothing are ignored. An ignored table or column stays in the
/// model with its `ignore` flag set. Applying the same overrides twice
/// gives the same result as applying them once.
pub fn apply_overrides(tables: Vec<Table>, command: &GenerateCommand) -> Vec<Table> {
    let mut applied = 0usize;
    let tables: Vec<Table> = tables
        .into_iter()
        .map(|table| match command.table_override(&table.schema, &table.name) {
            Some(table_override) => {
                applied += 1;
                apply_table(table, table_override)
            }
            None => table,
        })
        .collect();

    debug!(
        "Applied {} of {} table overrides",
        applied,
        command.tables.len()
    );
    tables
}

fn apply_table(mut table: Table, table_override: &TableOverride) -> Table {
    table.ignore |= table_override.ignore;
    if let Some(class_name) = table_override.class_name() {
        table.class_name = class_name.to_string();
    }

    for column in &mut table.columns {
        if let Some(column_override) = table_override.column(&column.name) {
            apply_column(column, column_override);
        }
    }
    table
}

fn apply_column(column: &mut Column, column_override: &ColumnOverride) {
    column.ignore |= column_override.ignore;

    if let Some(property_name) = column_override.property_name() {
        column.property_name = property_name.to_string();
    }

    // Unparseable types are rejected by validation before the run starts
    if let Ok(Some(property_type)) = column_override.property_type() {
        column.is_nullable = property_type.nullable;
        column.property_type = property_type;
    }

    column.force_to_utc =
        column_override.force_to_utc && column.property_type.scalar.is_datetime();

    if let Some(template) = column_override.insert_template() {
        column.insert_template = Some(template.to_string());
    }
    if let Some(template) = column_override.update_template() {
        column.update_template = Some(template.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropertyType, ScalarType};

    fn users() -> Table {
        let mut table = Table::new("shop", "users");
        table.columns = vec![
            Column::new("id", PropertyType::required(ScalarType::I64)),
            Column::new("created_at", PropertyType::required(ScalarType::DateTime)),
            Column::new("nickname", PropertyType::optional(ScalarType::String)),
            Column::new("password_hash", PropertyType::required(ScalarType::Bytes)),
        ];
        table
    }

    fn command() -> GenerateCommand {
        let toml_content = r#"
            provider_name = "mysql"
            connection_string = "mysql://root@localhost/shop"

            [tables."SHOP.Users"]
            class_name = "Customer"

            [tables."SHOP.Users".columns.CREATED_AT]
            force_to_utc = true
            insert_template = "UTC_TIMESTAMP()"

            [tables."SHOP.Users".columns.nickname]
            property_name = "DisplayName"
            property_type = "string"
            force_to_utc = true

            [tables."SHOP.Users".columns.password_hash]
            ignore = true
            update_template = "  "

            [tables."shop.missing"]
            ignore = true
        "#;
        toml::from_str(toml_content).unwrap()
    }

    #[test]
    fn test_table_and_column_overrides() {
        let tables = apply_overrides(vec![users(), Table::new("shop", "orders")], &command());
        let users = &tables[0];

        assert_eq!(users.class_name, "Customer");
        assert!(!users.ignore);

        let created = users.column("created_at").unwrap();
        assert!(created.force_to_utc);
        assert_eq!(created.insert_template.as_deref(), Some("UTC_TIMESTAMP()"));

        let nickname = users.column("nickname").unwrap();
        assert_eq!(nickname.property_name, "DisplayName");
        assert_eq!(nickname.property_type, PropertyType::required(ScalarType::String));
        assert!(!nickname.is_nullable);
        assert!(!nickname.force_to_utc, "utc only applies to date/time");

        let hash = users.column("password_hash").unwrap();
        assert!(hash.ignore);
        assert_eq!(hash.update_template, None);
        assert_eq!(users.active_columns().count(), 3);

        assert_eq!(tables[1].class_name, "order");
        assert!(!tables[1].ignore);
    }

    #[test]
    fn test_table_ignore_keeps_table() {
        let tables = apply_overrides(vec![Table::new("shop", "missing")], &command());
        assert_eq!(tables.len(), 1);
        assert!(tables[0].ignore);
    }

    #[test]
    fn test_applying_twice_is_idempotent() {
        let command = command();
        let once = apply_overrides(vec![users()], &command);
        let twice = apply_overrides(once.clone(), &command);
        assert_eq!(once, twice);
    }
}
