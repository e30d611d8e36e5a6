//! Schema normalization and finalization
//!
//! [`normalize`] runs between reading and overrides: it filters the raw
//! tables and settles class and property names. [`finalize`] runs after
//! overrides and makes the model deterministic before it is handed out.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::GenerateCommand;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::model::Table;
use crate::naming::escape_member_name;

/// Filter and name freshly read tables.
///
/// Steps run in a fixed order: schema filter, view filter, excluded-prefix
/// filter, class naming (style, then prefix and suffix), then the
/// reserved-member rewrite of every property name.
pub fn normalize(
    tables: Vec<Table>,
    command: &GenerateCommand,
    sink: &mut dyn DiagnosticSink,
) -> Vec<Table> {
    let read = tables.len();

    let schema_name = command
        .schema_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let tables: Vec<Table> = match schema_name {
        Some(schema) => tables
            .into_iter()
            .filter(|t| t.schema.eq_ignore_ascii_case(schema))
            .collect(),
        None => tables,
    };
    debug!("Schema filter ({:?}): {} of {} tables kept", schema_name, tables.len(), read);

    let tables: Vec<Table> = if command.include_views {
        tables
    } else {
        tables.into_iter().filter(|t| !t.is_view).collect()
    };
    debug!("View filter (include_views={}): {} tables kept", command.include_views, tables.len());

    let prefixes: Vec<&str> = command
        .exclude_prefix
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    let tables: Vec<Table> = tables
        .into_iter()
        .filter(|t| !prefixes.iter().any(|p| t.class_name.starts_with(p)))
        .collect();
    debug!("Prefix filter ({:?}): {} tables kept", prefixes, tables.len());

    tables
        .into_iter()
        .map(|mut table| {
            table.class_name = format!(
                "{}{}{}",
                command.class_prefix,
                command.name_style.apply(&table.class_name),
                command.class_suffix
            );
            for column in &mut table.columns {
                column.property_name = command.name_style.apply(&column.property_name);
            }
            enforce_member_names(&mut table, sink);
            table
        })
        .collect()
}

/// Settle the model after overrides.
///
/// Re-applies the reserved-member rewrite (an override may have renamed a
/// class or property into a clash), sorts tables by schema and name, and
/// reports class names shared by more than one active table.
pub fn finalize(tables: Vec<Table>, sink: &mut dyn DiagnosticSink) -> Vec<Table> {
    let mut tables = tables;
    for table in &mut tables {
        enforce_member_names(table, sink);
    }

    tables.sort_by(|a, b| (&a.schema, &a.name).cmp(&(&b.schema, &b.name)));

    let mut by_class: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for table in tables.iter().filter(|t| !t.ignore) {
        by_class
            .entry(table.class_name.as_str())
            .or_default()
            .push(table.qualified_key());
    }
    for (class_name, owners) in by_class.into_iter().filter(|(_, o)| o.len() > 1) {
        sink.emit(Diagnostic::warning(
            DiagnosticKind::DuplicateClassName,
            format!(
                "Class name '{}' is generated for {} tables: {}",
                class_name,
                owners.len(),
                owners.join(", ")
            ),
        ));
    }

    debug!("Finalized {} tables", tables.len());
    tables
}

fn enforce_member_names(table: &mut Table, sink: &mut dyn DiagnosticSink) {
    for column in &mut table.columns {
        let escaped = escape_member_name(&column.property_name, &table.class_name);
        if escaped != column.property_name {
            sink.emit(Diagnostic::warning(
                DiagnosticKind::NamingCollision,
                format!(
                    "Property '{}' on {} renamed to '{}'",
                    column.property_name, table.class_name, escaped
                ),
            ));
            column.property_name = escaped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::model::Column;
    use crate::naming::NameStyle;
    use crate::types::{PropertyType, ScalarType};

    fn table(schema: &str, name: &str, is_view: bool, columns: &[&str]) -> Table {
        let mut table = Table::new(schema, name);
        table.is_view = is_view;
        table.columns = columns
            .iter()
            .map(|c| Column::new(*c, PropertyType::required(ScalarType::String)))
            .collect();
        table
    }

    fn command() -> GenerateCommand {
        GenerateCommand::new("postgres", "postgres://localhost/app")
    }

    #[test]
    fn test_schema_and_view_filters() {
        let tables = vec![
            table("public", "users", false, &["id"]),
            table("public", "users_view", true, &["id"]),
            table("dbo", "orders", false, &["id"]),
        ];
        let mut command = command();
        command.schema_name = Some("PUBLIC".into());
        command.include_views = false;

        let mut sink = CollectingSink::new();
        let tables = normalize(tables, &command, &mut sink);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].qualified_key(), "public.users");
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_blank_schema_name_keeps_every_schema() {
        for blank in ["", "   "] {
            let tables = vec![
                table("public", "users", false, &[]),
                table("dbo", "orders", false, &[]),
            ];
            let mut command = command();
            command.schema_name = Some(blank.into());

            let tables = normalize(tables, &command, &mut CollectingSink::new());
            assert_eq!(tables.len(), 2, "schema_name = {:?}", blank);
        }
    }

    #[test]
    fn test_views_kept_on_request() {
        let tables = vec![
            table("public", "users", false, &[]),
            table("public", "users_view", true, &[]),
        ];
        let mut command = command();
        command.include_views = true;

        let tables = normalize(tables, &command, &mut CollectingSink::new());
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_exclude_prefix_uses_class_name() {
        let tables = vec![
            table("public", "tmp_imports", false, &[]),
            table("public", "audit_entries", false, &[]),
            table("public", "customers", false, &[]),
        ];
        let mut command = command();
        command.exclude_prefix = vec!["tmp_".into(), "".into(), "audit_entry".into()];

        let tables = normalize(tables, &command, &mut CollectingSink::new());
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["customers"]);
    }

    #[test]
    fn test_class_prefix_suffix_and_style() {
        let mut command = command();
        command.class_prefix = "Db".into();
        command.class_suffix = "Row".into();
        command.name_style = NameStyle::Pascal;

        let tables = normalize(
            vec![table("public", "order_items", false, &["unit_price"])],
            &command,
            &mut CollectingSink::new(),
        );
        assert_eq!(tables[0].class_name, "DbOrderItemRow");
        assert_eq!(tables[0].columns[0].property_name, "UnitPrice");
    }

    #[test]
    fn test_reserved_and_class_name_collisions() {
        let mut command = command();
        command.class_prefix = "Foo".into();

        let mut sink = CollectingSink::new();
        let tables = normalize(
            vec![table("public", "s", false, &["Save", "Foos", "id"])],
            &command,
            &mut sink,
        );
        assert_eq!(tables[0].class_name, "Foos");
        let names: Vec<_> = tables[0]
            .columns
            .iter()
            .map(|c| c.property_name.as_str())
            .collect();
        assert_eq!(names, vec!["_Save", "_Foos", "id"]);
        assert_eq!(sink.of_kind(DiagnosticKind::NamingCollision).count(), 2);
    }

    #[test]
    fn test_finalize_sorts_and_reports_duplicates() {
        let mut users = table("public", "users", false, &[]);
        let admin_users = table("admin", "users", false, &[]);
        let mut ignored = table("public", "user", false, &[]);
        ignored.ignore = true;
        users.class_name = "user".into();

        let mut sink = CollectingSink::new();
        let tables = finalize(vec![users, ignored, admin_users], &mut sink);

        let keys: Vec<_> = tables.iter().map(Table::qualified_key).collect();
        assert_eq!(keys, vec!["admin.users", "public.user", "public.users"]);

        let duplicates: Vec<_> = sink.of_kind(DiagnosticKind::DuplicateClassName).collect();
        assert_eq!(duplicates.len(), 1);
        assert!(duplicates[0].message.contains("admin.users, public.users"));
    }

    #[test]
    fn test_finalize_catches_override_clash() {
        let mut orders = table("shop", "orders", false, &["Invoice"]);
        orders.class_name = "Invoice".into();

        let mut sink = CollectingSink::new();
        let tables = finalize(vec![orders], &mut sink);
        assert_eq!(tables[0].columns[0].property_name, "_Invoice");
        assert_eq!(sink.warnings().count(), 1);
    }
}
