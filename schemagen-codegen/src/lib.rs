//! schemagen-codegen: introspect a live database into a class model
//!
//! This crate provides both a CLI tool and a library. It reads tables,
//! views, columns and keys from a database catalog through the read-only
//! [`schemagen::MetadataSource`] capability and turns them into a
//! provider-neutral, override-aware model:
//!
//! - Canonical property types mapped per provider (MySQL, SQL Server,
//!   PostgreSQL, Oracle, SQLite)
//! - Class names singularized from table names, property names checked
//!   against reserved member names
//! - User overrides per `schema.table` and column, loaded from TOML
//!
//! The pipeline runs in a fixed order: validate the command, resolve the
//! provider, connect, read, close, normalize, apply overrides, finalize.
//! A failed run yields one error diagnostic and an empty model; it never
//! hands a partial model to an emitter.
//!
//! # Library Usage
//!
//! ```rust,ignore
//! use schemagen_codegen::{CollectingSink, GenerateCommand, Generator};
//!
//! let command = GenerateCommand::new("sqlite", "sqlite://app.db");
//! let mut sink = CollectingSink::new();
//! let outcome = Generator::new().generate_blocking(&command, &mut sink);
//! for table in outcome.schema.active_tables() {
//!     println!("{} -> {}", table.name, table.class_name);
//! }
//! ```
//!
//! # Builder
//!
//! ```rust,ignore
//! let schema = schemagen_codegen::SchemaGen::new("mysql", "mysql://root@localhost/shop")
//!     .include_views(true)
//!     .exclude_prefix(&["tmp_"])
//!     .class_suffix("Entity")
//!     .generate()?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! schemagen --provider sqlite --connection sqlite://app.db json --pretty
//! ```

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod model;
pub mod naming;
pub mod normalizer;
pub mod overrides;
pub mod provider;
pub mod reader;
pub mod registry;
pub mod types;

use std::time::Duration;

use tracing::{debug, info, warn};

pub use config::{ColumnOverride, GenerateCommand, TableOverride};
pub use context::{GenerationContext, IdentifierEscaping};
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, Severity, TracingSink,
};
pub use emit::{JsonEmitter, ModelEmitter};
pub use error::{CodegenError, Result};
pub use model::{Column, GeneratedSchema, Table};
pub use naming::NameStyle;
pub use provider::Provider;
pub use reader::SchemaReader;
pub use registry::{Connector, ProviderRegistry};
pub use types::{PropertyType, ScalarType};

/// What a run hands back.
///
/// A failed run has no context and an empty schema.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    pub context: Option<GenerationContext>,
    pub schema: GeneratedSchema,
}

impl GenerationOutcome {
    fn failed() -> Self {
        Self::default()
    }

    /// Whether the run got as far as producing a model
    pub fn succeeded(&self) -> bool {
        self.context.is_some()
    }
}

/// Runs the generation pipeline against a provider registry.
#[derive(Debug, Clone)]
pub struct Generator {
    registry: ProviderRegistry,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// A generator with every compiled-in driver registered
    pub fn new() -> Self {
        Self::with_registry(ProviderRegistry::with_defaults())
    }

    pub fn with_registry(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.registry
    }

    /// Run the pipeline, returning the first error instead of reporting it.
    ///
    /// Warnings raised along the way still go to `sink`.
    pub async fn try_generate(
        &self,
        command: &GenerateCommand,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<GenerationOutcome> {
        command.validate()?;
        let (provider, connector) = self.registry.resolve(&command.provider_name)?;
        let context = GenerationContext::new(command.clone(), provider);
        let command = context.command();
        info!("Reading {} schema", provider);

        let timeout = command.command_timeout();
        let source = tokio::time::timeout(
            timeout,
            connector.connect(&command.connection_string, timeout),
        )
        .await
        .map_err(|_| {
            CodegenError::Connection(format!("timed out after {}", describe(timeout)))
        })?
        .map_err(|e| CodegenError::Connection(e.to_string()))?;

        let reader = reader::reader_for(provider);
        let read = tokio::time::timeout(timeout, reader.read_schema(&*source)).await;

        // The connection is released before any model work starts
        if let Err(e) = source.close().await {
            warn!("Failed to close metadata connection: {}", e);
        }

        let tables = read.map_err(|_| {
            CodegenError::SchemaRead(format!("timed out after {}", describe(timeout)))
        })??;
        info!("Read {} tables and views", tables.len());

        let tables = normalizer::normalize(tables, command, sink);
        let tables = overrides::apply_overrides(tables, command);
        let tables = normalizer::finalize(tables, sink);
        debug!(
            "Model has {} tables, {} active",
            tables.len(),
            tables.iter().filter(|t| !t.ignore).count()
        );

        Ok(GenerationOutcome {
            context: Some(context),
            schema: GeneratedSchema::new(tables),
        })
    }

    /// Run the pipeline. Never fails: an error becomes exactly one error
    /// diagnostic and an empty outcome.
    pub async fn generate(
        &self,
        command: &GenerateCommand,
        sink: &mut dyn DiagnosticSink,
    ) -> GenerationOutcome {
        match self.try_generate(command, sink).await {
            Ok(outcome) => outcome,
            Err(e) => {
                sink.emit(Diagnostic::from_error(&e));
                GenerationOutcome::failed()
            }
        }
    }

    /// [`Generator::generate`] on a private current-thread runtime.
    pub fn generate_blocking(
        &self,
        command: &GenerateCommand,
        sink: &mut dyn DiagnosticSink,
    ) -> GenerationOutcome {
        match runtime() {
            Ok(runtime) => runtime.block_on(self.generate(command, sink)),
            Err(e) => {
                sink.emit(Diagnostic::from_error(&e));
                GenerationOutcome::failed()
            }
        }
    }

    /// Run the pipeline and hand a non-empty model to `emitter`.
    ///
    /// The emitter is not called when the run fails or finds no active
    /// tables. Only emitter errors are returned; run errors go to `sink`.
    pub async fn generate_into(
        &self,
        command: &GenerateCommand,
        sink: &mut dyn DiagnosticSink,
        emitter: &mut dyn ModelEmitter,
    ) -> Result<GenerationOutcome> {
        let outcome = self.generate(command, sink).await;
        match &outcome.context {
            Some(context) if outcome.schema.active_tables().next().is_some() => {
                emitter.emit(context, &outcome.schema)?;
            }
            Some(_) => info!("No tables left to emit"),
            None => {}
        }
        Ok(outcome)
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime)
}

fn describe(timeout: Duration) -> String {
    format!("{}s", timeout.as_secs())
}

/// Builder pattern for one-off runs
pub struct SchemaGen {
    command: GenerateCommand,
    generator: Generator,
}

impl SchemaGen {
    /// Create a new builder for the given provider and connection string
    pub fn new(provider_name: &str, connection_string: &str) -> Self {
        Self {
            command: GenerateCommand::new(provider_name, connection_string),
            generator: Generator::new(),
        }
    }

    /// Start from an existing command, e.g. one loaded from a file
    pub fn from_command(command: GenerateCommand) -> Self {
        Self {
            command,
            generator: Generator::new(),
        }
    }

    /// Use a different provider registry
    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.generator = Generator::with_registry(registry);
        self
    }

    /// Only keep tables in this schema
    pub fn schema(mut self, schema_name: &str) -> Self {
        self.command.schema_name = Some(schema_name.to_string());
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.command.namespace = namespace.to_string();
        self
    }

    pub fn include_views(mut self, include: bool) -> Self {
        self.command.include_views = include;
        self
    }

    /// Drop tables whose class name starts with any of these
    pub fn exclude_prefix(mut self, prefixes: &[&str]) -> Self {
        self.command.exclude_prefix = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn class_prefix(mut self, prefix: &str) -> Self {
        self.command.class_prefix = prefix.to_string();
        self
    }

    pub fn class_suffix(mut self, suffix: &str) -> Self {
        self.command.class_suffix = suffix.to_string();
        self
    }

    pub fn name_style(mut self, style: NameStyle) -> Self {
        self.command.name_style = style;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command.command_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Add or replace the override for `schema.table`
    pub fn table_override(mut self, key: &str, table_override: TableOverride) -> Self {
        self.command.tables.insert(key.to_string(), table_override);
        self
    }

    /// The command built so far
    pub fn command(&self) -> &GenerateCommand {
        &self.command
    }

    /// Run the pipeline, logging diagnostics through `tracing`
    pub fn generate(self) -> Result<GeneratedSchema> {
        let runtime = runtime()?;
        let mut sink = TracingSink::new();
        let outcome =
            runtime.block_on(self.generator.try_generate(&self.command, &mut sink))?;
        Ok(outcome.schema)
    }
}
