//! Artwork Extraction
//!
//! Locates the artwork layer and its plate, and turns every rectangle on the
//! plate into an icon region. Missing layers mean "nothing to render";
//! malformed rectangles abort the whole document.

use serde::{Deserialize, Serialize};

use crate::document::{parse_length, Node, NodeKind, ParseError, RawRect, SvgDocument};

pub const ARTWORK_PREFIX: &str = "artwork:";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentSize {
    pub width: f64,
    pub height: f64,
}

/// One plate rectangle, in document units with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IconRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub name: String,
    pub size: DocumentSize,
    /// Document order, not sorted
    pub regions: Vec<IconRegion>,
}

/// First direct child carrying the layer marker
pub fn first_layer(nodes: &[Node]) -> Option<&Node> {
    nodes.iter().find(|node| node.is_layer())
}

pub fn extract(document: &SvgDocument) -> Result<Option<Artwork>, ParseError> {
    let Some(layer) = first_layer(&document.children) else {
        log::info!("no layer at document root, nothing to render");
        return Ok(None);
    };

    let label = layer.label().unwrap_or_default();
    let Some(name) = label.strip_prefix(ARTWORK_PREFIX) else {
        log::info!("first layer {:?} is not an artwork layer, nothing to render", label);
        return Ok(None);
    };
    if !is_safe_file_stem(name) {
        return Err(ParseError::InvalidArtworkName(name.to_string()));
    }

    let ignored = document
        .children
        .iter()
        .filter(|node| node.label().is_some_and(|l| l.starts_with(ARTWORK_PREFIX)))
        .skip(1)
        .count();
    if ignored > 0 {
        log::warn!(
            "only artwork {:?} is rendered, {} further artwork layer(s) ignored",
            name,
            ignored
        );
    }

    let Some(plate) = first_layer(&layer.children) else {
        log::info!("artwork {:?} has no plate layer, nothing to render", name);
        return Ok(None);
    };
    log::debug!("artwork {:?} uses plate {:?}", name, plate.label().unwrap_or_default());

    let regions = plate
        .children
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Rect(rect) => Some(region_from(rect)),
            _ => None,
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Artwork {
        name: name.to_string(),
        size: DocumentSize {
            width: document.width,
            height: document.height,
        },
        regions,
    }))
}

/// The name becomes the file stem in every resolution folder
fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains(['/', '\\', '\0'])
}

fn region_from(rect: &RawRect) -> Result<IconRegion, ParseError> {
    Ok(IconRegion {
        x: rect_attribute(&rect.x, "x")?,
        y: rect_attribute(&rect.y, "y")?,
        width: rect_attribute(&rect.width, "width")?,
        height: rect_attribute(&rect.height, "height")?,
    })
}

fn rect_attribute(value: &Option<String>, attribute: &'static str) -> Result<f64, ParseError> {
    let raw = value.as_deref().ok_or_else(|| ParseError::MissingAttribute {
        element: "rect".to_string(),
        attribute,
    })?;
    parse_length(attribute, raw)
}
