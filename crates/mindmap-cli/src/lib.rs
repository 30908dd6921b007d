//! CLI logic for the mind map tool.
//!
//! Reads a JSON file in any supported shape, optionally lays it out again,
//! and writes the canonical JSON document.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use mindmap::{MindMapBuilder, MindMapError};

/// Run the mind map CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `MindMapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Import errors
/// - Layout errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), MindMapError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        relayout = args.relayout;
        "Processing mind map"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = MindMapBuilder::new(app_config);
    let mut map = builder.import(&source)?;
    if args.relayout {
        builder.relayout(&mut map)?;
    }

    builder.write_json(&map, &args.output)?;

    info!(output_file = args.output; "Mind map exported successfully");

    Ok(())
}
