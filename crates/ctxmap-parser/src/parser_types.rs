//! Syntax tree produced by [`parser`](super::parser).
//!
//! The tree keeps the source spans of every identifier, type tag and arrow so
//! later phases can point diagnostics at the exact text.

use ctxmap_core::graph::ArrowDirection;

use crate::span::{Span, Spanned};

/// A whole source file. `context_map` is `None` when the file holds only
/// trivia.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'src> {
    pub context_map: Option<Spanned<ContextMapBlock<'src>>>,
}

/// `ContextMap Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMapBlock<'src> {
    pub name: Option<Spanned<&'src str>>,
    pub statements: Vec<Statement<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'src> {
    /// `contains A, B, C`
    Contains(Vec<Spanned<&'src str>>),
    Relationship(Relationship<'src>),
}

/// `[T] A [T] <-> [T] B`
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship<'src> {
    pub source: Endpoint<'src>,
    pub arrow: Spanned<ArrowDirection>,
    pub target: Endpoint<'src>,
}

impl Relationship<'_> {
    /// Span from the source identifier to the target identifier.
    pub fn span(&self) -> Span {
        self.source.id.span().union(self.target.id.span())
    }
}

/// A context reference with the type tags written next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint<'src> {
    pub id: Spanned<&'src str>,
    pub types: Vec<Spanned<&'src str>>,
}
