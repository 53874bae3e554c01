#![forbid(unsafe_code)]

//! SVG sink for `feynmark-core` decoration plans.
//!
//! Shared definitions from a [`feynmark_core::DefsStore`] become `<defs>` entries; each planned
//! edge becomes a main path plus optional ghost, flow and label elements.

pub mod model;
pub mod svg;
pub mod text;

pub use svg::{SvgRenderOptions, render_annotation_svg, render_diagram_svg};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("plan references unknown definition: {id}")]
    MissingDefinition { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
