//! CLI entry point for schemagen

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use schemagen_codegen::{
    GenerateCommand, GeneratedSchema, Generator, JsonEmitter, ModelEmitter, TracingSink,
};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Introspect a database schema into a provider-neutral class model")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Provider name, e.g. mysql, postgres, sqlite (overrides config)
    #[arg(short, long)]
    provider: Option<String>,

    /// Connection string (overrides config)
    #[arg(long)]
    connection: Option<String>,

    /// Only keep tables in this schema (overrides config)
    #[arg(short, long)]
    schema: Option<String>,

    /// Include views
    #[arg(long)]
    include_views: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of the finalized model
    Inspect,
    /// Write the finalized model as JSON
    Json {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use log_level)
    let mut command = GenerateCommand::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = command.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(provider) = cli.provider {
        command.provider_name = provider;
    }
    if let Some(connection) = cli.connection {
        command.connection_string = connection;
    }
    if let Some(schema) = cli.schema {
        command.schema_name = Some(schema);
    }
    if cli.include_views {
        command.include_views = true;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let generator = Generator::new();
    let mut sink = TracingSink::new();
    let outcome = runtime.block_on(generator.generate(&command, &mut sink));

    let Some(context) = outcome.context else {
        bail!("Schema generation failed ({} errors)", sink.error_count());
    };
    info!(
        "Finalized {} tables with {} warnings",
        outcome.schema.len(),
        sink.warning_count()
    );

    match cli.command.unwrap_or(Commands::Inspect) {
        Commands::Inspect => inspect_schema(&outcome.schema),
        Commands::Json { output, pretty } => {
            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(io::stdout().lock()),
            };
            let mut emitter = JsonEmitter::new(writer);
            if pretty {
                emitter = emitter.pretty();
            }
            emitter.emit(&context, &outcome.schema)?;
            if let Some(path) = output {
                info!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn inspect_schema(schema: &GeneratedSchema) -> Result<()> {
    println!("Finalized {} tables:\n", schema.len());
    for table in &schema.tables {
        let kind = if table.is_view { "View" } else { "Table" };
        let ignored = if table.ignore { " (ignored)" } else { "" };
        println!(
            "{}: {}.{} -> {}{}",
            kind, table.schema, table.name, table.class_name, ignored
        );
        if let Some(comment) = &table.comment {
            println!("  Comment: {}", comment);
        }
        println!("  Columns:");
        for col in &table.columns {
            let pk = if col.is_pk { " PK" } else { "" };
            let auto_inc = if col.is_auto_increment {
                " AUTO_INCREMENT"
            } else {
                ""
            };
            let ignored = if col.ignore { " (ignored)" } else { "" };
            println!(
                "    - {} {}: {}{}{}{}",
                col.name, col.property_name, col.property_type, pk, auto_inc, ignored
            );
        }
        if table.has_composite_key() {
            println!("  Composite Key: {:?}", table.primary_key_columns);
        }
        if let Some(sequence) = &table.sequence_name {
            println!("  Sequence: {}", sequence);
        }
        println!();
    }

    Ok(())
}
