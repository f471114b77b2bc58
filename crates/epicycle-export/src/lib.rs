//! epicycle-export: Pure format serializers (sans-IO)
//!
//! Converts input paths and their Fourier reconstructions into output
//! formats. Currently supports SVG.

pub mod svg;

pub use svg::{SvgMetadata, build_path_data, to_svg};
