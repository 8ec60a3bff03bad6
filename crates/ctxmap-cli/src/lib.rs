//! CLI logic for the ctxmap tool.
//!
//! Reads a context map file, renders it and writes the SVG output.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use ctxmap::{ContextMapError, DiagramBuilder};

/// Run the ctxmap CLI application
///
/// # Errors
///
/// Returns [`ContextMapError`] for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors and unroutable relationships
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), ContextMapError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing context map"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let graph = builder.parse(&source)?;
    let svg = builder.render_svg(&graph)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
