//! Export of drawable documents.
//!
//! This module provides the [`Exporter`] trait that defines the interface
//! for converting a [`DrawableDocument`] into an output format. It is the
//! final stage of the pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! ContextMapGraph
//!     ↓ layout
//! ContextMapLayout
//!     ↓ document
//! DrawableDocument
//!     ↓ export (this module)
//! Output
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgExporter`]

/// SVG export backend.
pub mod svg;

use thiserror::Error;

use crate::document::DrawableDocument;

/// Abstraction for export backends.
pub trait Exporter {
    /// The rendered form of a document.
    type Output;

    /// Renders `document`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the document cannot be converted to the
    /// target format.
    fn export_document(&self, document: &DrawableDocument) -> Result<Self::Output, Error>;
}

/// Errors raised by export backends.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),
}
