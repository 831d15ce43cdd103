//! glslang frontend for Komi.
//!
//! Reads the intermediate tree printed by `glslangValidator -i` into a
//! [`tree::Node`] and slurps it into an interned [`komi_ir::Komi`] graph.
//! Nodes that cannot be interpreted are reported through a
//! [`DiagnosticSink`] and skipped, so a pass always yields a graph.

mod classify;
mod diag;
mod reader;
mod slurp;
pub mod tree;

pub use classify::{base_kind, branch_operator, rvalue_operator};
pub use diag::{Diagnostic, DiagnosticLevel, DiagnosticSink, LogSink};
pub use reader::read_tree;
pub use slurp::slurp;

use tree::SourceLoc;

/// Read `glslangValidator -i` output and slurp its first tree.
pub fn slurp_text(
    text: &str,
    diag: &mut dyn DiagnosticSink,
) -> Result<komi_ir::Komi, SlurpError> {
    let root = read_tree(text)?;
    slurp(&root, diag)
}

#[derive(Debug, thiserror::Error)]
pub enum SlurpError {
    #[error("line {line}: {message}")]
    Read { line: usize, message: String },
    #[error("no intermediate tree found")]
    EmptyTree,
    #[error("{location}: root is not a sequence: {node}")]
    RootNotSequence { node: String, location: SourceLoc },
    #[error("{location}: function '{name}' has {children} children, expected 1 or 2")]
    MalformedFunction {
        name: String,
        children: usize,
        location: SourceLoc,
    },
}
