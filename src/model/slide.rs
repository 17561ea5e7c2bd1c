//! Slide and shape structures.

use super::{Rect, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a shape on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeKind {
    /// Layout placeholder (title, body, subtitle, ...)
    Placeholder,
    /// Free-standing text box
    TextBox,
    /// Preset geometry shape (rectangle, ellipse, ...)
    AutoShape,
    /// Custom geometry shape
    Freeform,
    /// Picture
    Picture,
    /// Table inside a graphic frame
    Table,
    /// Chart inside a graphic frame
    Chart,
    /// Other graphic frame content (SmartArt, OLE objects)
    GraphicFrame,
    /// Connector or line
    Line,
    /// Group of shapes
    Group,
    /// Anything else (content parts, alternate content)
    Other,
}

impl ShapeKind {
    /// Label used in inspection summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Placeholder => "PLACEHOLDER",
            ShapeKind::TextBox => "TEXT_BOX",
            ShapeKind::AutoShape => "AUTO_SHAPE",
            ShapeKind::Freeform => "FREEFORM",
            ShapeKind::Picture => "PICTURE",
            ShapeKind::Table => "TABLE",
            ShapeKind::Chart => "CHART",
            ShapeKind::GraphicFrame => "GRAPHIC_FRAME",
            ShapeKind::Line => "LINE",
            ShapeKind::Group => "GROUP",
            ShapeKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Placeholder information from `p:ph`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Placeholder type (`title`, `ctrTitle`, `body`, ...); absent means `obj`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph_type: Option<String>,
    /// Placeholder index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx: Option<u32>,
}

impl Placeholder {
    /// Whether this placeholder holds the slide title.
    pub fn is_title(&self) -> bool {
        matches!(self.ph_type.as_deref(), Some("title") | Some("ctrTitle"))
    }

    /// Whether this placeholder holds body text.
    pub fn is_body(&self) -> bool {
        match self.ph_type.as_deref() {
            None | Some("body") | Some("obj") | Some("subTitle") => true,
            _ => false,
        }
    }
}

/// A top-level shape on a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Shape id (`cNvPr/@id`), unique within the slide
    pub id: u32,
    /// Shape name (`cNvPr/@name`)
    pub name: String,
    /// Shape kind
    pub kind: ShapeKind,
    /// Placeholder info, if the shape is a placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
    /// Position and size; absent when inherited from the layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    /// Solid fill color, when given as an explicit RGB value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgb>,
    /// Preset geometry name (`rect`, `roundRect`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Paragraph texts; empty when the shape has no text body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,
    /// Whether the shape has a text body at all
    #[serde(default)]
    pub has_text_frame: bool,
}

impl Shape {
    /// Text of the shape, paragraphs joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    /// Whether this shape is the slide title placeholder.
    pub fn is_title(&self) -> bool {
        self.placeholder.as_ref().is_some_and(Placeholder::is_title)
    }

    /// Whether this shape is a connector or a line.
    pub fn is_line(&self) -> bool {
        self.kind == ShapeKind::Line
    }
}

/// A slide snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// Slide number (1-based, presentation order)
    pub number: usize,
    /// Name of the slide layout
    pub layout: String,
    /// Top-level shapes in document order
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// The title placeholder, if the slide has one.
    pub fn title_shape(&self) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.is_title())
    }

    /// Title text; `None` when there is no title or it is empty.
    pub fn title(&self) -> Option<String> {
        self.title_shape()
            .map(Shape::text)
            .filter(|text| !text.is_empty())
    }

    /// Find a shape by id.
    pub fn shape(&self, id: u32) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }
}

/// A presentation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Slide width in EMU
    pub slide_width: i64,
    /// Slide height in EMU
    pub slide_height: i64,
    /// Slides in presentation order
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(id: u32, ph_type: Option<&str>, text: &[&str]) -> Shape {
        Shape {
            id,
            name: format!("Shape {}", id),
            kind: if ph_type.is_some() {
                ShapeKind::Placeholder
            } else {
                ShapeKind::TextBox
            },
            placeholder: ph_type.map(|t| Placeholder {
                ph_type: Some(t.to_string()),
                idx: None,
            }),
            rect: None,
            fill: None,
            preset: None,
            paragraphs: text.iter().map(|t| t.to_string()).collect(),
            has_text_frame: true,
        }
    }

    #[test]
    fn test_title_lookup() {
        let slide = Slide {
            number: 1,
            layout: "Title Only".to_string(),
            shapes: vec![shape(3, None, &["note"]), shape(2, Some("ctrTitle"), &["Q3", "Results"])],
        };
        assert_eq!(slide.title_shape().map(|s| s.id), Some(2));
        assert_eq!(slide.title().as_deref(), Some("Q3\nResults"));
        assert!(slide.shape(3).is_some());
        assert!(slide.shape(9).is_none());
    }

    #[test]
    fn test_empty_title_is_none() {
        let slide = Slide {
            number: 1,
            layout: "Blank".to_string(),
            shapes: vec![shape(2, Some("title"), &[""])],
        };
        assert!(slide.title_shape().is_some());
        assert_eq!(slide.title(), None);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ShapeKind::TextBox.to_string(), "TEXT_BOX");
        assert_eq!(
            serde_json::to_string(&ShapeKind::AutoShape).unwrap(),
            "\"AUTO_SHAPE\""
        );
    }
}
