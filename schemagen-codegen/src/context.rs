//! Per-run generation context

use serde::Serialize;

use crate::config::GenerateCommand;
use crate::model::Table;
use crate::provider::Provider;

/// How a provider quotes identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierEscaping {
    /// `` `name` `` (MySQL)
    Backtick,
    /// `[name]` (SQL Server)
    Bracket,
    /// `"name"` (PostgreSQL, SQLite)
    DoubleQuote,
    /// `"NAME"` (Oracle folds unquoted names to upper case)
    UpperDoubleQuote,
}

impl IdentifierEscaping {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::MySql => IdentifierEscaping::Backtick,
            Provider::SqlServer => IdentifierEscaping::Bracket,
            Provider::Postgres | Provider::Sqlite => IdentifierEscaping::DoubleQuote,
            Provider::Oracle => IdentifierEscaping::UpperDoubleQuote,
        }
    }

    /// Quote one identifier, doubling any embedded closing quote.
    pub fn escape(&self, identifier: &str) -> String {
        match self {
            IdentifierEscaping::Backtick => format!("`{}`", identifier.replace('`', "``")),
            IdentifierEscaping::Bracket => format!("[{}]", identifier.replace(']', "]]")),
            IdentifierEscaping::DoubleQuote => {
                format!("\"{}\"", identifier.replace('"', "\"\""))
            }
            IdentifierEscaping::UpperDoubleQuote => {
                format!("\"{}\"", identifier.to_uppercase().replace('"', "\"\""))
            }
        }
    }
}

/// State for one generation run: the command and what was resolved from it.
///
/// Built once the provider is known and dropped with the run's outcome.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    command: GenerateCommand,
    provider: Provider,
    escaping: IdentifierEscaping,
}

impl GenerationContext {
    pub fn new(command: GenerateCommand, provider: Provider) -> Self {
        Self {
            command,
            provider,
            escaping: IdentifierEscaping::for_provider(provider),
        }
    }

    pub fn command(&self) -> &GenerateCommand {
        &self.command
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn escaping(&self) -> IdentifierEscaping {
        self.escaping
    }

    pub fn namespace(&self) -> &str {
        &self.command.namespace
    }

    /// Quote an identifier for this run's provider
    pub fn escape_identifier(&self, identifier: &str) -> String {
        self.escaping.escape(identifier)
    }

    /// The quoted, schema-qualified table reference emitters should use.
    ///
    /// SQLite tables live in `main` and are referenced unqualified.
    pub fn qualified_name(&self, table: &Table) -> String {
        if self.provider == Provider::Sqlite || table.schema.is_empty() {
            self.escape_identifier(&table.name)
        } else {
            format!(
                "{}.{}",
                self.escape_identifier(&table.schema),
                self.escape_identifier(&table.name)
            )
        }
    }
}
