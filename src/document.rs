//! Document Model - SVG source parsed into a typed node tree
//!
//! Only the structure the icon plates need is kept: layers, rectangles,
//! and everything else as opaque nodes. Built once per source file.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed markup: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("Artwork name {0:?} cannot be used as a file name")]
    InvalidArtworkName(String),

    #[error("Attribute '{attribute}' is not a number: {value:?}")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Group carrying the layer marker
    Layer { label: String },
    Rect(RawRect),
    Other,
}

/// Rectangle attributes as authored; converted to numbers during extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRect {
    pub x: Option<String>,
    pub y: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub id: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_layer(&self) -> bool {
        matches!(self.kind, NodeKind::Layer { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Layer { label } => Some(label),
            _ => None,
        }
    }
}

/// Root of a parsed source document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: f64,
    pub height: f64,
    pub children: Vec<Node>,
}

impl SvgDocument {
    /// Read and parse a document from disk
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&text)
    }

    pub fn parse_str(text: &str) -> Result<Self, ParseError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, options)?;
        let root = xml.root_element();

        let width = required_length(&root, "width")?;
        let height = required_length(&root, "height")?;

        Ok(Self {
            width,
            height,
            children: convert_children(&root),
        })
    }
}

fn required_length(node: &roxmltree::Node, attribute: &'static str) -> Result<f64, ParseError> {
    let raw = node
        .attribute(attribute)
        .ok_or_else(|| ParseError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute,
        })?;
    parse_length(attribute, raw)
}

/// Parse a length attribute; a bare number or one with a `px` suffix.
pub fn parse_length(attribute: &'static str, raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            attribute,
            value: raw.to_string(),
        })
}

fn convert_children(node: &roxmltree::Node) -> Vec<Node> {
    node.children()
        .filter(|child| child.is_element())
        .map(|child| convert(&child))
        .collect()
}

fn convert(node: &roxmltree::Node) -> Node {
    let kind = match node.tag_name().name() {
        "g" if node.attribute((INKSCAPE_NS, "groupmode")) == Some("layer") => NodeKind::Layer {
            label: node
                .attribute((INKSCAPE_NS, "label"))
                .unwrap_or_default()
                .to_string(),
        },
        "rect" => NodeKind::Rect(RawRect {
            x: node.attribute("x").map(str::to_string),
            y: node.attribute("y").map(str::to_string),
            width: node.attribute("width").map(str::to_string),
            height: node.attribute("height").map(str::to_string),
        }),
        _ => NodeKind::Other,
    };

    Node {
        kind,
        id: node.attribute("id").map(str::to_string),
        children: convert_children(node),
    }
}
