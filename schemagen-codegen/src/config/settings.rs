//! The generate command: everything one run needs to know

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use super::defaults;
use super::overrides::TableOverride;
use crate::error::{CodegenError, Result};
use crate::naming::NameStyle;

/// Read-only run parameters for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateCommand {
    /// Provider name (`mysql`, `postgres`, `Npgsql`, ...)
    #[serde(default)]
    pub provider_name: String,

    /// Driver connection string or URL
    #[serde(default)]
    pub connection_string: String,

    /// Bound on connecting and on the schema read, in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Namespace handed to emitters
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Only keep tables in this schema (case-insensitive).
    ///
    /// Missing, empty or whitespace-only means no schema filter.
    #[serde(default)]
    pub schema_name: Option<String>,

    #[serde(default = "default_include_views")]
    pub include_views: bool,

    /// Drop tables whose class name starts with any of these
    #[serde(default)]
    pub exclude_prefix: Vec<String>,

    #[serde(default)]
    pub class_prefix: String,

    #[serde(default)]
    pub class_suffix: String,

    /// Casing applied to class and property names
    #[serde(default)]
    pub name_style: NameStyle,

    #[serde(default = "default_explicit_columns")]
    pub explicit_columns: bool,

    #[serde(default = "default_track_modified_columns")]
    pub track_modified_columns: bool,

    /// Table overrides keyed by `schema.table`
    #[serde(default)]
    pub tables: BTreeMap<String, TableOverride>,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_command_timeout_secs() -> u64 {
    defaults::COMMAND_TIMEOUT_SECS
}
fn default_namespace() -> String {
    defaults::NAMESPACE.to_string()
}
fn default_include_views() -> bool {
    defaults::INCLUDE_VIEWS
}
fn default_explicit_columns() -> bool {
    defaults::EXPLICIT_COLUMNS
}
fn default_track_modified_columns() -> bool {
    defaults::TRACK_MODIFIED_COLUMNS
}

impl Default for GenerateCommand {
    fn default() -> Self {
        Self {
            provider_name: String::new(),
            connection_string: String::new(),
            command_timeout_secs: default_command_timeout_secs(),
            namespace: default_namespace(),
            schema_name: None,
            include_views: default_include_views(),
            exclude_prefix: Vec::new(),
            class_prefix: String::new(),
            class_suffix: String::new(),
            name_style: NameStyle::default(),
            explicit_columns: default_explicit_columns(),
            track_modified_columns: default_track_modified_columns(),
            tables: BTreeMap::new(),
            log_level: None,
        }
    }
}

impl GenerateCommand {
    /// Create a command for the given provider and connection string
    pub fn new(provider_name: impl Into<String>, connection_string: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            connection_string: connection_string.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let command: GenerateCommand = toml::from_str(&content).map_err(|e| {
            CodegenError::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(command)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // Override with environment variables (SCHEMAGEN__*)
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator(defaults::ENV_SEPARATOR)
                .separator(defaults::ENV_SEPARATOR)
                .list_separator(",")
                .with_list_parse_key("exclude_prefix")
                .try_parsing(true),
        );

        let command: GenerateCommand = builder.build()?.try_deserialize()?;
        Ok(command)
    }

    /// Check the command before any I/O happens
    pub fn validate(&self) -> Result<()> {
        if self.provider_name.trim().is_empty() {
            return Err(CodegenError::Configuration(
                "provider_name is required".into(),
            ));
        }

        if self.connection_string.trim().is_empty() {
            return Err(CodegenError::Configuration(
                "connection_string is required".into(),
            ));
        }

        if self.command_timeout_secs == 0 {
            return Err(CodegenError::Configuration(
                "command_timeout_secs must be greater than zero".into(),
            ));
        }

        for (table_key, table) in &self.tables {
            for (column_key, column) in &table.columns {
                column.property_type().map_err(|e| {
                    CodegenError::Configuration(format!(
                        "tables.\"{}\".columns.{}: {}",
                        table_key, column_key, e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// The configured timeout as a duration
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Find the override for `schema.table`, ignoring case
    pub fn table_override(&self, schema: &str, table: &str) -> Option<&TableOverride> {
        let key = format!("{}.{}", schema, table);
        self.tables
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
            .map(|(_, v)| v)
    }
}
