//! Best-effort diagnostics.
//!
//! Nodes the slurper cannot interpret are reported to a [`DiagnosticSink`]
//! and replaced by a placeholder; the pass itself keeps going.

use std::fmt;

use crate::tree::SourceLoc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A node that was skipped or replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Description of the offending node.
    pub node: String,
    /// Description of its parent, when known.
    pub parent: Option<String>,
    pub location: SourceLoc,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.message, self.node)?;
        if let Some(parent) = &self.parent {
            write!(f, " (parent: {parent})")?;
        }
        Ok(())
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink {
    errors: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of error-level diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }
}

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Info => log::info!("{diagnostic}"),
            DiagnosticLevel::Error => {
                self.errors += 1;
                log::error!("{diagnostic}");
            }
        }
    }
}
