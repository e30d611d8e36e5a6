//! Emitter boundary
//!
//! Emitters turn the finalized model into output. The only one bundled is
//! [`JsonEmitter`]; class and script templates live outside this crate.

use std::io::Write;

use serde::Serialize;

use crate::context::{GenerationContext, IdentifierEscaping};
use crate::error::Result;
use crate::model::{Column, GeneratedSchema, Table};
use crate::provider::Provider;

/// Receives the finalized model of a successful run.
pub trait ModelEmitter {
    fn emit(&mut self, context: &GenerationContext, schema: &GeneratedSchema) -> Result<()>;
}

#[derive(Serialize)]
struct Document<'a> {
    provider: Provider,
    namespace: &'a str,
    escaping: IdentifierEscaping,
    explicit_columns: bool,
    track_modified_columns: bool,
    tables: Vec<TableEntry<'a>>,
}

#[derive(Serialize)]
struct TableEntry<'a> {
    qualified_name: String,
    #[serde(flatten)]
    table: TableView<'a>,
}

/// A table with its ignored columns left out
#[derive(Serialize)]
struct TableView<'a> {
    name: &'a str,
    schema: &'a str,
    clean_name: &'a str,
    class_name: &'a str,
    is_view: bool,
    primary_key: Option<&'a str>,
    primary_key_columns: &'a [String],
    sequence_name: Option<&'a str>,
    comment: Option<&'a str>,
    columns: Vec<&'a Column>,
}

impl<'a> From<&'a Table> for TableView<'a> {
    fn from(table: &'a Table) -> Self {
        Self {
            name: &table.name,
            schema: &table.schema,
            clean_name: &table.clean_name,
            class_name: &table.class_name,
            is_view: table.is_view,
            primary_key: table.primary_key.as_deref(),
            primary_key_columns: &table.primary_key_columns,
            sequence_name: table.sequence_name.as_deref(),
            comment: table.comment.as_deref(),
            columns: table.active_columns().collect(),
        }
    }
}

/// Writes the active part of the model as one JSON document.
pub struct JsonEmitter<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Indent the output
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ModelEmitter for JsonEmitter<W> {
    fn emit(&mut self, context: &GenerationContext, schema: &GeneratedSchema) -> Result<()> {
        let command = context.command();
        let document = Document {
            provider: context.provider(),
            namespace: context.namespace(),
            escaping: context.escaping(),
            explicit_columns: command.explicit_columns,
            track_modified_columns: command.track_modified_columns,
            tables: schema
                .active_tables()
                .map(|table| TableEntry {
                    qualified_name: context.qualified_name(table),
                    table: TableView::from(table),
                })
                .collect(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &document)?;
        } else {
            serde_json::to_writer(&mut self.writer, &document)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerateCommand;
    use crate::types::{PropertyType, ScalarType};

    #[test]
    fn test_json_skips_ignored_entities() {
        let mut users = Table::new("public", "users");
        users.columns = vec![
            Column::new("id", PropertyType::required(ScalarType::I64)),
            Column::new("secret", PropertyType::optional(ScalarType::String)),
        ];
        users.columns[1].ignore = true;
        users.assign_primary_key(vec!["id".to_string()]);

        let mut audit = Table::new("public", "audit");
        audit.ignore = true;

        let context = GenerationContext::new(
            GenerateCommand::new("postgres", "postgres://localhost/app"),
            Provider::Postgres,
        );
        let mut emitter = JsonEmitter::new(Vec::new());
        emitter
            .emit(&context, &GeneratedSchema::new(vec![users, audit]))
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&emitter.into_inner()).unwrap();
        assert_eq!(json["provider"], "postgres");
        assert_eq!(json["namespace"], "Models");
        assert_eq!(json["escaping"], "double_quote");

        let tables = json["tables"].as_array().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0]["qualified_name"], "\"public\".\"users\"");
        assert_eq!(tables[0]["class_name"], "user");
        assert_eq!(tables[0]["primary_key"], "id");
        assert!(tables[0].get("primary_key_columns").is_some());

        let columns = tables[0]["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0]["property_type"], "i64");
    }
}
