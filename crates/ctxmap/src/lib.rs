//! Ctxmap - parsing, layout and rendering of Domain-Driven-Design context maps.
//!
//! A context map lists bounded contexts and the relationships between them:
//!
//! ```text
//! ContextMap InsuranceContextMap {
//!     contains CustomerManagementContext, PrintingContext
//!
//!     CustomerManagementContext [D,ACL] <- [U,OHS,PL] PrintingContext
//! }
//! ```
//!
//! [`DiagramBuilder`] runs the whole pipeline: the source is parsed into a
//! [`ContextMapGraph`], every bounded context is sized and distributed on
//! the canvas, relationships are routed between the ellipses and the result
//! is emitted as a [`DrawableDocument`] or an SVG string.

pub mod config;
pub mod document;
pub mod export;
pub mod layout;

mod error;

pub use ctxmap_core::{color, geometry, graph, text};

pub use error::{ContextMapError, LayoutError};

use log::{debug, info, trace, warn};

use ctxmap_core::{
    graph::ContextMapGraph,
    text::{CosmicTextMeasure, TextMeasure},
};

use config::AppConfig;
use document::DrawableDocument;
use layout::{Configuration, ContextMapLayout};

/// Builder for parsing and rendering context maps.
///
/// # Examples
///
/// ```rust,no_run
/// use ctxmap::{DiagramBuilder, config::AppConfig};
///
/// let source = "ContextMap Shop { contains Orders, Billing  Orders [U] -> [D] Billing }";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Parse source to the context map graph
/// let graph = builder.parse(source).expect("Failed to parse");
///
/// // Lay out and render it
/// let svg = builder.render_svg(&graph).expect("Failed to render");
/// assert!(svg.contains("<svg"));
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    measure: Box<dyn TextMeasure>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// Labels are measured with a [`CosmicTextMeasure`]; use
    /// [`with_text_measure`](Self::with_text_measure) to plug in another
    /// measurer.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            measure: Box::new(CosmicTextMeasure::new()),
        }
    }

    /// Replace the text measurer.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxmap::{DiagramBuilder, text::{FnMeasure, FontDefinition}};
    ///
    /// let builder = DiagramBuilder::default().with_text_measure(FnMeasure::new(
    ///     |text: &str, _: &FontDefinition| text.len() as f32 * 7.0,
    ///     |_: &str, font: &FontDefinition| font.size(),
    /// ));
    ///
    /// let graph = builder.parse("ContextMap { contains A }").unwrap();
    /// let layout = builder.layout(&graph).unwrap();
    /// assert_eq!(layout.nodes()[0].size().width(), 100.0 + 7.0);
    /// ```
    pub fn with_text_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source code into a context map graph.
    ///
    /// Relationships that reference undeclared bounded contexts are accepted
    /// and logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns [`ContextMapError::Parse`] for lexical and syntax errors.
    pub fn parse(&self, source: &str) -> Result<ContextMapGraph, ContextMapError> {
        info!("Parsing context map");

        let (graph, warnings) = ctxmap_parser::parse_with_warnings(source)
            .map_err(|err| ContextMapError::new_parse_error(err, source))?;

        for warning in &warnings {
            warn!(warning:%; "Context map warning");
        }

        debug!(
            name:? = graph.context_map(),
            nodes = graph.nodes().len(),
            edges = graph.edges().len();
            "Context map parsed successfully"
        );
        trace!(graph:?; "Parsed graph");

        Ok(graph)
    }

    /// Compute the layout of `graph`.
    ///
    /// Relationships that could not be routed are reported through
    /// [`ContextMapLayout::errors`] rather than failing the call.
    ///
    /// # Errors
    ///
    /// Returns [`ContextMapError::Layout`] when the configuration leaves no
    /// valid placement.
    pub fn layout(&self, graph: &ContextMapGraph) -> Result<ContextMapLayout, ContextMapError> {
        let configuration = Configuration::from_app_config(&self.config, self.measure.as_ref());
        let layout = layout::compute(graph, &configuration)?;

        info!(
            nodes = layout.nodes().len(),
            links = layout.links().len(),
            errors = layout.errors().len();
            "Layout calculated"
        );
        Ok(layout)
    }

    /// Lay out `graph` and collect its drawable shapes.
    ///
    /// # Errors
    ///
    /// Fails like [`layout`](Self::layout), and with
    /// [`ContextMapError::UnresolvedReferences`] when any relationship could
    /// not be routed.
    pub fn render_document(
        &self,
        graph: &ContextMapGraph,
    ) -> Result<DrawableDocument, ContextMapError> {
        let layout = self.layout(graph)?;
        if layout.has_errors() {
            return Err(ContextMapError::UnresolvedReferences(layout.into_errors()));
        }

        Ok(DrawableDocument::from_layout(&layout, self.config.font()))
    }

    /// Render `graph` to an SVG string.
    ///
    /// # Errors
    ///
    /// Fails like [`render_document`](Self::render_document), and with
    /// [`ContextMapError::Export`] when the configured style is invalid.
    pub fn render_svg(&self, graph: &ContextMapGraph) -> Result<String, ContextMapError> {
        let document = self.render_document(graph)?;
        let svg = export::svg::render(&document, self.config.style())?;

        info!("SVG rendered successfully");
        Ok(svg)
    }
}
