//! Structured diagnostics reported by a generation run
//!
//! The library never prints. Errors and warnings go to a [`DiagnosticSink`]
//! chosen by the caller: [`TracingSink`] forwards them to `tracing`,
//! [`CollectingSink`] keeps them for inspection.

use std::fmt;

use serde::Serialize;
use tracing::{error, warn};

use crate::error::CodegenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ConfigurationError,
    ProviderLoadFailure,
    ConnectionFailure,
    SchemaReadFailure,
    IoFailure,
    /// A generated member name was rewritten to avoid a clash
    NamingCollision,
    /// Two generated classes share a name
    DuplicateClassName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    /// The single diagnostic a failed run reports.
    pub fn from_error(err: &CodegenError) -> Self {
        let kind = match err {
            CodegenError::Configuration(_) => DiagnosticKind::ConfigurationError,
            CodegenError::ProviderLoad { .. } => DiagnosticKind::ProviderLoadFailure,
            CodegenError::Connection(_) => DiagnosticKind::ConnectionFailure,
            CodegenError::SchemaRead(_) => DiagnosticKind::SchemaReadFailure,
            CodegenError::Io(_) => DiagnosticKind::IoFailure,
        };
        Self::error(kind, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Receives diagnostics from a run.
pub trait DiagnosticSink: Send {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` and counts them.
#[derive(Debug, Default)]
pub struct TracingSink {
    errors: usize,
    warnings: usize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => {
                self.errors += 1;
                error!(kind = ?diagnostic.kind, "{}", diagnostic.message);
            }
            Severity::Warning => {
                self.warnings += 1;
                warn!(kind = ?diagnostic.kind, "{}", diagnostic.message);
            }
        }
    }
}

/// Keeps every diagnostic in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Diagnostics of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
