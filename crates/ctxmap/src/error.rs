//! Error types for context map operations.
//!
//! This module provides the main error type [`ContextMapError`] and the
//! [`LayoutError`] reported by the layout stages.

use std::io;

use thiserror::Error;

use ctxmap_parser::error::ParseError;

/// The main error type for context map operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured
/// diagnostics so that callers can render snippets.
#[derive(Debug, Error)]
pub enum ContextMapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("{} relationship(s) could not be routed", .0.len())]
    UnresolvedReferences(Vec<LayoutError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for ContextMapError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ContextMapError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// Failures of the layout stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A relationship names a bounded context that is not on the map.
    #[error("relationship #{edge_index} references unknown bounded context `{id}`")]
    UnresolvedReference { edge_index: usize, id: String },

    /// A bounded context exists but has not been placed on the canvas.
    #[error("bounded context `{id}` has no position")]
    Unpositioned { id: String },

    /// The canvas, margins or node sizes make distribution impossible.
    #[error("degenerate layout configuration: {0}")]
    DegenerateConfiguration(String),
}
