//! # Ctxmap Parser
//!
//! Parser for the context map language: a `ContextMap` block declaring
//! bounded contexts with `contains` and relating them with typed arrows.
//!
//! ```text
//! ContextMap DDDSample {
//!     contains CargoBookingContext, VoyagePlanningContext
//!
//!     /* shared model between booking and planning */
//!     CargoBookingContext [SK] <-> [SK] VoyagePlanningContext
//! }
//! ```
//!
//! ## Usage
//!
//! ```
//! # use ctxmap_parser::{parse, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let graph = parse("ContextMap Demo { contains A, B  A [U] -> [D] B }")?;
//!
//!     assert_eq!(graph.context_map(), Some("Demo"));
//!     assert_eq!(graph.nodes().len(), 2);
//!     assert_eq!(graph.edges().len(), 1);
//!     Ok(())
//! }
//! ```

mod builder;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;
mod validate;

pub use builder::GraphBuilder;
pub use span::{Span, Spanned};

use ctxmap_core::graph::ContextMapGraph;
use log::{debug, trace};

use error::{Diagnostic, ParseError};

/// Parse source text into a context map graph.
///
/// The pipeline is:
///
/// 1. **Tokenize** - Convert source text to tokens, reporting every lexical error
/// 2. **Parse** - Build the syntax tree from tokens
/// 3. **Build** - Feed each statement, in order, to a fresh [`GraphBuilder`]
///
/// Relationships may reference contexts that are never declared; see
/// [`parse_with_warnings`] to get those reported.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one or more diagnostics when the source
/// is not a valid context map. No partial graph is produced.
pub fn parse(source: &str) -> Result<ContextMapGraph, ParseError> {
    parse_with_warnings(source).map(|(graph, _)| graph)
}

/// Like [`parse`], also returning warnings about relationships that
/// reference undeclared bounded contexts (`E200`).
pub fn parse_with_warnings(
    source: &str,
) -> Result<(ContextMapGraph, Vec<Diagnostic>), ParseError> {
    let tokens = lexer::tokenize(source)?;
    trace!(tokens = tokens.len(); "Tokenized source");

    let document = parser::build_document(&tokens)?;

    let mut builder = GraphBuilder::new();
    builder.add_document(&document);

    let warnings = validate::check_references(&document).into_warnings()?;
    debug!(warnings = warnings.len(); "Parsed context map");

    Ok((builder.into_graph(), warnings))
}
