//! Textual and visual snapshots of a presentation.

use crate::convert::{Converter, Visual};
use crate::deck::Deck;
use crate::error::Result;
use crate::model::{emu_to_points, Presentation, Shape};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthChar;

/// Default directory for rendered PDFs.
pub const DEFAULT_VISUALS_DIR: &str = "./temp_visuals";

/// Summary line for a file that does not exist.
pub const FILE_NOT_FOUND: &str = "File not found.";

const TEXT_COLUMNS: usize = 50;

/// Snapshot of a presentation at one point in time.
#[derive(Debug, Clone)]
pub struct Inspection {
    /// Deterministic text summary
    pub summary: String,
    /// PDF rendering, when an engine produced one
    pub visual: Visual,
}

/// Produces summaries and renderings.
#[derive(Debug)]
pub struct Inspector {
    converter: Converter,
    visuals_dir: PathBuf,
}

impl Inspector {
    /// Create an inspector writing PDFs into `visuals_dir`.
    pub fn new(converter: Converter, visuals_dir: impl Into<PathBuf>) -> Self {
        Self {
            converter,
            visuals_dir: visuals_dir.into(),
        }
    }

    /// The converter in use.
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Directory receiving PDFs.
    pub fn visuals_dir(&self) -> &Path {
        &self.visuals_dir
    }

    /// Summarize `path` and render it once.
    pub fn inspect(&self, path: &Path) -> Result<Inspection> {
        if !path.exists() {
            return Ok(Inspection {
                summary: FILE_NOT_FOUND.to_string(),
                visual: Visual::Unavailable("file not found".to_string()),
            });
        }

        let deck = Deck::open(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let summary = summarize(&deck.snapshot()?, &file_name);

        let visual = self.converter.convert_to_pdf(path, &self.visuals_dir);
        tracing::info!(slides = deck.slide_count(), visual = %visual, "inspected presentation");

        Ok(Inspection { summary, visual })
    }
}

/// Render the text summary of a presentation.
///
/// Slides follow presentation order and shapes follow document order, so
/// unchanged content always yields the same text.
pub fn summarize(presentation: &Presentation, file_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Presentation: {}", file_name);
    let _ = write!(out, "Total Slides: {}", presentation.slide_count());

    for slide in &presentation.slides {
        let _ = write!(out, "\n\n--- Slide {} ---", slide.number);
        let _ = write!(out, "\nLayout: {}", slide.layout);
        if let Some(title) = slide.title() {
            let _ = write!(out, "\nTitle: '{}'", title);
        }

        let title_id = slide.title_shape().map(|s| s.id);
        let elements: Vec<String> = slide
            .shapes
            .iter()
            .filter(|s| Some(s.id) != title_id)
            .map(describe_shape)
            .collect();

        if elements.is_empty() {
            out.push_str("\nElements: (None)");
        } else {
            out.push_str("\nElements:");
            for element in elements {
                out.push('\n');
                out.push_str(&element);
            }
        }
    }

    out
}

fn describe_shape(shape: &Shape) -> String {
    let mut line = format!("- Type: {}, Id: {}", shape.kind, shape.id);

    let text = shape.text();
    if shape.has_text_frame && !text.trim().is_empty() {
        let _ = write!(line, ", Text: '{}'", truncate_columns(&text.replace('\n', " "), TEXT_COLUMNS));
    }

    match shape.rect {
        Some(rect) => {
            let _ = write!(
                line,
                ", Pos: ({}, {}), Size: {}x{}",
                emu_to_points(rect.left),
                emu_to_points(rect.top),
                emu_to_points(rect.width),
                emu_to_points(rect.height)
            );
        }
        None => line.push_str(", Pos/Size: (unreadable)"),
    }

    if let Some(fill) = shape.fill {
        let _ = write!(line, ", Fill: {}", fill);
    }

    line
}

/// Cut `text` to at most `columns` display columns, marking the cut.
fn truncate_columns(text: &str, columns: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > columns {
            out.push_str("...");
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Placeholder, Rect, Rgb, ShapeKind, Slide};

    fn shape(id: u32, kind: ShapeKind, text: &str) -> Shape {
        Shape {
            id,
            name: format!("Shape {}", id),
            kind,
            placeholder: None,
            rect: None,
            fill: None,
            preset: None,
            paragraphs: if text.is_empty() { Vec::new() } else { text.split('\n').map(str::to_string).collect() },
            has_text_frame: !text.is_empty(),
        }
    }

    #[test]
    fn test_truncate_columns() {
        assert_eq!(truncate_columns("short", 50), "short");
        let long = "a".repeat(60);
        assert_eq!(truncate_columns(&long, 50), format!("{}...", "a".repeat(50)));
        // wide characters take two columns each
        assert_eq!(truncate_columns("項目項目", 5), "項目...");
    }

    #[test]
    fn test_summary_format() {
        let mut title = shape(2, ShapeKind::Placeholder, "Agenda");
        title.placeholder = Some(Placeholder {
            ph_type: Some("title".into()),
            idx: None,
        });

        let mut boxed = shape(4, ShapeKind::AutoShape, "Step one\nStep two");
        boxed.rect = Some(Rect::from_points(72.0, 144.0, 216.0, 108.0));
        boxed.fill = Some(Rgb(232, 244, 248));

        let presentation = Presentation {
            slide_width: 9_144_000,
            slide_height: 6_858_000,
            slides: vec![
                Slide {
                    number: 1,
                    layout: "Title Only".into(),
                    shapes: vec![title, boxed, shape(5, ShapeKind::Line, "")],
                },
                Slide {
                    number: 2,
                    layout: "Blank".into(),
                    shapes: Vec::new(),
                },
            ],
        };

        let expected = "Presentation: deck.pptx\n\
Total Slides: 2\n\
\n\
--- Slide 1 ---\n\
Layout: Title Only\n\
Title: 'Agenda'\n\
Elements:\n\
- Type: AUTO_SHAPE, Id: 4, Text: 'Step one Step two', Pos: (72, 144), Size: 216x108, Fill: #E8F4F8\n\
- Type: LINE, Id: 5, Pos/Size: (unreadable)\n\
\n\
--- Slide 2 ---\n\
Layout: Blank\n\
Elements: (None)";
        assert_eq!(summarize(&presentation, "deck.pptx"), expected);
    }

    #[test]
    fn test_inspect_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let inspector = Inspector::new(Converter::with_engines(Vec::new(), crate::convert::DEFAULT_TIMEOUT), dir.path());
        let inspection = inspector.inspect(&dir.path().join("missing.pptx")).unwrap();
        assert_eq!(inspection.summary, FILE_NOT_FOUND);
        assert!(!inspection.visual.is_available());
    }
}
