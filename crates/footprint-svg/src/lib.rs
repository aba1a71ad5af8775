pub mod document;
pub mod element;
pub mod error;
pub mod extents;
pub mod geometry;
pub mod layers;
pub mod parsers;
pub mod render;
pub mod svg;
pub mod types;

pub use document::{to_svg_tree, RenderOptions};
pub use element::{AttrValue, Element};
pub use error::ConvertError;
pub use types::{Module, Side};

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    KiCad,
    Json,
}

/// Detect format from file extension.
pub fn detect_format(path: &Path) -> Option<InputFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("kicad_mod") => Some(InputFormat::KiCad),
        Some("json") => Some(InputFormat::Json),
        _ => None,
    }
}

/// Auto-detect format from extension and load the footprint.
pub fn load(path: &Path) -> Result<Module, ConvertError> {
    let format = detect_format(path).ok_or_else(|| {
        ConvertError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        )
    })?;
    let data = std::fs::read(path)?;
    load_bytes(&data, format)
}

/// Parse a footprint from bytes with explicit format.
pub fn load_bytes(data: &[u8], format: InputFormat) -> Result<Module, ConvertError> {
    match format {
        InputFormat::KiCad => parsers::kicad_mod::parse(data),
        InputFormat::Json => Ok(serde_json::from_slice(data)?),
    }
}

/// Render a footprint straight to SVG markup.
pub fn to_svg(module: &Module, opts: &RenderOptions) -> Result<String, ConvertError> {
    let tree = to_svg_tree(module, opts)?;
    Ok(svg::to_svg_string(&tree))
}
