//! Edit plans.
//!
//! The model answers an instruction with a JSON edit plan: an ordered list
//! of operations drawn from a fixed catalog, each one a Document Helper
//! call. Plans are parsed, checked against the presentation, and applied
//! to an in-memory [`Deck`]; the caller saves only if every operation
//! succeeded.
//!
//! Slides are addressed by 1-based number (as in the inspection summary)
//! or `"last"`. Geometry is in points. Shapes are addressed by id, or by a
//! label that an earlier operation in the same plan attached to a shape it
//! created.

use crate::deck::{distribute_horizontally, Deck, ImagePlacement, RoundedBox, MAX_LINE_WIDTH_PT};
use crate::error::{Error, Result};
use crate::model::{points_to_emu, Rect, Rgb, MAX_COORDINATE_PT};
use crate::pptx::shapes::{ShapePreset, TextStyle};
use crate::pptx::SlideLayout;
use serde::{Deserialize, Serialize};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

/// A slide reference: 1-based number or `"last"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlideTarget {
    /// Slide number, starting at 1
    Number(usize),
    /// Keyword (`"last"`)
    Keyword(String),
}

impl SlideTarget {
    /// Resolve to a 0-based index given the current slide count.
    pub fn resolve(&self, count: usize) -> Result<usize> {
        match self {
            SlideTarget::Number(0) => Err(Error::Plan("slide numbers start at 1".to_string())),
            SlideTarget::Number(n) if *n > count => Err(Error::SlideOutOfRange {
                index: n - 1,
                count,
            }),
            SlideTarget::Number(n) => Ok(n - 1),
            SlideTarget::Keyword(k) if k.eq_ignore_ascii_case("last") => {
                count.checked_sub(1).ok_or(Error::SlideOutOfRange { index: 0, count })
            }
            SlideTarget::Keyword(k) => Err(Error::Plan(format!("unknown slide reference '{}'", k))),
        }
    }
}

/// A shape reference: id from the summary, or a label from this plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeRef {
    /// Shape id
    Id(u32),
    /// Label given to a shape created earlier in the plan
    Label(String),
}

impl std::fmt::Display for ShapeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeRef::Id(id) => write!(f, "{}", id),
            ShapeRef::Label(label) => write!(f, "'{}'", label),
        }
    }
}

/// Largest font size accepted in a plan, in points.
pub const MAX_FONT_SIZE_PT: f64 = 4000.0;

fn default_layout() -> SlideLayout {
    SlideLayout::TitleAndContent
}

fn default_gap() -> f64 {
    36.0
}

/// One operation of an edit plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Append a slide.
    AddSlide {
        #[serde(default = "default_layout")]
        layout: SlideLayout,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        body: Vec<String>,
    },
    /// Delete a slide.
    DeleteSlide { slide: SlideTarget },
    /// Set the title placeholder text.
    SetTitle { slide: SlideTarget, text: String },
    /// Replace the body placeholder paragraphs.
    SetBodyText {
        slide: SlideTarget,
        paragraphs: Vec<String>,
    },
    /// Replace the text of a shape.
    SetText {
        slide: SlideTarget,
        shape: ShapeRef,
        text: String,
        #[serde(default)]
        style: Option<TextStyle>,
    },
    /// Add a plain text box.
    AddTextBox {
        slide: SlideTarget,
        text: String,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        style: TextStyle,
        #[serde(default)]
        label: Option<String>,
    },
    /// Add a rounded rectangle with centered text.
    AddRoundedTextBox {
        slide: SlideTarget,
        text: String,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        fill: Option<Rgb>,
        #[serde(default)]
        text_color: Option<Rgb>,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        label: Option<String>,
    },
    /// Add a rectangle, rounded rectangle or ellipse.
    AddShape {
        slide: SlideTarget,
        shape: ShapePreset,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        fill: Option<Rgb>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        style: TextStyle,
        #[serde(default)]
        label: Option<String>,
    },
    /// Connect two shapes with an arrow (right-middle to left-middle).
    AddArrow {
        slide: SlideTarget,
        from: ShapeRef,
        to: ShapeRef,
        #[serde(default)]
        color: Option<Rgb>,
        #[serde(default)]
        width_pt: Option<f64>,
        #[serde(default)]
        label: Option<String>,
    },
    /// Insert an image file.
    AddImage {
        slide: SlideTarget,
        path: PathBuf,
        left: f64,
        top: f64,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
        #[serde(default)]
        label: Option<String>,
    },
    /// Delete every shape except the listed ones.
    DeleteShapesExcept {
        slide: SlideTarget,
        #[serde(default)]
        keep: Vec<ShapeRef>,
        #[serde(default)]
        keep_title: bool,
    },
    /// Remove all connectors and lines.
    RemoveConnectors { slide: SlideTarget },
    /// A horizontally centered row of rounded text boxes, optionally
    /// chained with arrows.
    AddBoxRow {
        slide: SlideTarget,
        texts: Vec<String>,
        top: f64,
        box_width: f64,
        box_height: f64,
        #[serde(default = "default_gap")]
        gap: f64,
        #[serde(default)]
        connect: bool,
        #[serde(default)]
        fill: Option<Rgb>,
        #[serde(default)]
        text_color: Option<Rgb>,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        labels: Vec<String>,
    },
}

impl EditOp {
    /// Operation name as written in plans.
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::AddSlide { .. } => "add_slide",
            EditOp::DeleteSlide { .. } => "delete_slide",
            EditOp::SetTitle { .. } => "set_title",
            EditOp::SetBodyText { .. } => "set_body_text",
            EditOp::SetText { .. } => "set_text",
            EditOp::AddTextBox { .. } => "add_text_box",
            EditOp::AddRoundedTextBox { .. } => "add_rounded_text_box",
            EditOp::AddShape { .. } => "add_shape",
            EditOp::AddArrow { .. } => "add_arrow",
            EditOp::AddImage { .. } => "add_image",
            EditOp::DeleteShapesExcept { .. } => "delete_shapes_except",
            EditOp::RemoveConnectors { .. } => "remove_connectors",
            EditOp::AddBoxRow { .. } => "add_box_row",
        }
    }

    fn slide(&self) -> Option<&SlideTarget> {
        match self {
            EditOp::AddSlide { .. } => None,
            EditOp::DeleteSlide { slide }
            | EditOp::SetTitle { slide, .. }
            | EditOp::SetBodyText { slide, .. }
            | EditOp::SetText { slide, .. }
            | EditOp::AddTextBox { slide, .. }
            | EditOp::AddRoundedTextBox { slide, .. }
            | EditOp::AddShape { slide, .. }
            | EditOp::AddArrow { slide, .. }
            | EditOp::AddImage { slide, .. }
            | EditOp::DeleteShapesExcept { slide, .. }
            | EditOp::RemoveConnectors { slide }
            | EditOp::AddBoxRow { slide, .. } => Some(slide),
        }
    }

    fn new_labels(&self) -> Vec<&str> {
        match self {
            EditOp::AddTextBox { label, .. }
            | EditOp::AddRoundedTextBox { label, .. }
            | EditOp::AddShape { label, .. }
            | EditOp::AddArrow { label, .. }
            | EditOp::AddImage { label, .. } => label.iter().map(String::as_str).collect(),
            EditOp::AddBoxRow { labels, .. } => labels.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn shape_refs(&self) -> Vec<&ShapeRef> {
        match self {
            EditOp::SetText { shape, .. } => vec![shape],
            EditOp::AddArrow { from, to, .. } => vec![from, to],
            EditOp::DeleteShapesExcept { keep, .. } => keep.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn check_values(&self) -> std::result::Result<(), String> {
        let position = |what: &str, v: f64| {
            if v.is_finite() && v.abs() <= MAX_COORDINATE_PT {
                Ok(())
            } else {
                Err(format!("{} must be within ±{} pt, got {}", what, MAX_COORDINATE_PT, v))
            }
        };
        let size = |what: &str, v: f64| {
            if v.is_finite() && (0.0..=MAX_COORDINATE_PT).contains(&v) {
                Ok(())
            } else {
                Err(format!("{} must be between 0 and {} pt, got {}", what, MAX_COORDINATE_PT, v))
            }
        };
        let rect = |left: f64, top: f64, width: f64, height: f64| {
            position("left", left)?;
            position("top", top)?;
            size("width", width)?;
            size("height", height)
        };
        let font = |font_size: Option<f64>| match font_size {
            Some(s) if !(s.is_finite() && s > 0.0 && s <= MAX_FONT_SIZE_PT) => Err(format!(
                "font size must be between 0 and {} pt, got {}",
                MAX_FONT_SIZE_PT, s
            )),
            _ => Ok(()),
        };

        match self {
            EditOp::AddTextBox { left, top, width, height, style, .. } => {
                rect(*left, *top, *width, *height)?;
                font(style.font_size)
            }
            EditOp::AddRoundedTextBox { left, top, width, height, font_size, .. } => {
                rect(*left, *top, *width, *height)?;
                font(*font_size)
            }
            EditOp::AddShape { left, top, width, height, style, .. } => {
                rect(*left, *top, *width, *height)?;
                font(style.font_size)
            }
            EditOp::SetText { style: Some(style), .. } => font(style.font_size),
            EditOp::AddArrow { width_pt: Some(w), .. } => {
                if w.is_finite() && (0.0..=MAX_LINE_WIDTH_PT).contains(w) {
                    Ok(())
                } else {
                    Err(format!("width_pt must be between 0 and {} pt, got {}", MAX_LINE_WIDTH_PT, w))
                }
            }
            EditOp::AddImage { path, left, top, width, height, .. } => {
                position("left", *left)?;
                position("top", *top)?;
                if let Some(w) = width {
                    size("width", *w)?;
                }
                if let Some(h) = height {
                    size("height", *h)?;
                }
                if !path.is_file() {
                    return Err(format!("image file {} does not exist", path.display()));
                }
                Ok(())
            }
            EditOp::AddBoxRow { texts, top, box_width, box_height, gap, labels, font_size, .. } => {
                if texts.is_empty() {
                    return Err("texts must not be empty".to_string());
                }
                if labels.len() > texts.len() {
                    return Err("more labels than boxes".to_string());
                }
                position("top", *top)?;
                size("box_width", *box_width)?;
                size("box_height", *box_height)?;
                size("gap", *gap)?;
                font(*font_size)
            }
            _ => Ok(()),
        }
    }
}

/// A shape created while applying a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedShape {
    /// Slide number (1-based)
    pub slide: usize,
    /// Shape id
    pub id: u32,
    /// Label from the plan, if any
    pub label: Option<String>,
}

/// Result of applying a plan.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Number of operations applied
    pub applied: usize,
    /// Slides added
    pub slides_added: usize,
    /// Slides deleted
    pub slides_deleted: usize,
    /// Shapes created
    pub created: Vec<CreatedShape>,
}

/// A structured edit plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    /// One-line description of the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operations, applied in order
    pub operations: Vec<EditOp>,
}

/// Labels seen so far, mapped to the 0-based slide they live on.
#[derive(Debug, Default)]
struct LabelSlides(HashMap<String, usize>);

impl LabelSlides {
    fn define(&mut self, label: &str, slide: usize) -> std::result::Result<(), String> {
        if self.0.insert(label.to_string(), slide).is_some() {
            return Err(format!("label '{}' is defined twice", label));
        }
        Ok(())
    }

    fn slide_deleted(&mut self, slide: usize) {
        self.0.retain(|_, s| *s != slide);
        for s in self.0.values_mut() {
            if *s > slide {
                *s -= 1;
            }
        }
    }
}

fn op_error(position: usize, op: &EditOp, err: impl std::fmt::Display) -> Error {
    Error::Plan(format!("operation {} ({}): {}", position + 1, op.name(), err))
}

impl EditPlan {
    /// Parse a plan from model output.
    ///
    /// Accepts raw JSON, a fenced ```json block, or the largest balanced
    /// `{...}` object embedded in prose. A bare array is taken as the
    /// operation list.
    pub fn parse(raw: &str) -> Result<Self> {
        let value = extract_json(raw)
            .ok_or_else(|| Error::Plan("response contains no JSON edit plan".to_string()))?;

        let value = match value {
            serde_json::Value::Array(ops) => serde_json::json!({ "operations": ops }),
            other => other,
        };

        serde_json::from_value(value).map_err(|e| Error::Plan(format!("invalid edit plan: {}", e)))
    }

    /// Pretty JSON, for debug output.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    /// Check the plan against a presentation with `slide_count` slides.
    ///
    /// Slide numbers are tracked through added and deleted slides, labels
    /// must be defined before use and on the slide they are used with,
    /// sizes must be non-negative, and image files must exist. Shape ids
    /// are checked when the plan is applied.
    pub fn validate(&self, slide_count: usize) -> Result<()> {
        if self.operations.is_empty() {
            return Err(Error::Plan("plan contains no operations".to_string()));
        }

        let mut count = slide_count;
        let mut labels = LabelSlides::default();

        for (i, op) in self.operations.iter().enumerate() {
            op.check_values().map_err(|e| op_error(i, op, e))?;

            let slide = match op.slide() {
                Some(target) => Some(target.resolve(count).map_err(|e| op_error(i, op, e))?),
                None => None,
            };

            for shape in op.shape_refs() {
                if let ShapeRef::Label(label) = shape {
                    match labels.0.get(label) {
                        Some(s) if Some(*s) != slide => {
                            return Err(op_error(
                                i,
                                op,
                                format!("label '{}' belongs to slide {}", label, s + 1),
                            ))
                        }
                        Some(_) => {}
                        None if label.parse::<u32>().is_ok() => {}
                        None => {
                            return Err(op_error(i, op, format!("unknown shape label '{}'", label)))
                        }
                    }
                }
            }

            match op {
                EditOp::AddSlide { .. } => count += 1,
                EditOp::DeleteSlide { .. } => {
                    if let Some(s) = slide {
                        labels.slide_deleted(s);
                    }
                    count -= 1;
                }
                _ => {}
            }

            if let Some(s) = slide {
                for label in op.new_labels() {
                    labels.define(label, s).map_err(|e| op_error(i, op, e))?;
                }
            }
        }

        Ok(())
    }

    /// Apply every operation in order.
    ///
    /// The deck may be partially modified when an error is returned; the
    /// caller discards it in that case.
    pub fn apply(&self, deck: &mut Deck) -> Result<ApplyReport> {
        let mut applier = Applier {
            deck,
            labels: HashMap::new(),
            report: ApplyReport::default(),
        };

        for (i, op) in self.operations.iter().enumerate() {
            applier.apply(op).map_err(|e| {
                tracing::warn!(operation = i + 1, op = op.name(), error = %e, "edit operation failed");
                op_error(i, op, e)
            })?;
            applier.report.applied += 1;
        }

        Ok(applier.report)
    }
}

struct Applier<'a> {
    deck: &'a mut Deck,
    labels: HashMap<String, (usize, u32)>,
    report: ApplyReport,
}

impl Applier<'_> {
    fn slide(&self, target: &SlideTarget) -> Result<usize> {
        target.resolve(self.deck.slide_count())
    }

    fn shape(&self, slide: usize, shape: &ShapeRef) -> Result<u32> {
        match shape {
            ShapeRef::Id(id) => Ok(*id),
            ShapeRef::Label(label) => match self.labels.get(label) {
                Some((s, id)) if *s == slide => Ok(*id),
                Some((s, _)) => Err(Error::Plan(format!(
                    "label '{}' belongs to slide {}",
                    label,
                    s + 1
                ))),
                None => label
                    .parse::<u32>()
                    .map_err(|_| Error::Plan(format!("unknown shape label '{}'", label))),
            },
        }
    }

    fn created(&mut self, slide: usize, id: u32, label: Option<&String>) {
        if let Some(label) = label {
            self.labels.insert(label.clone(), (slide, id));
        }
        self.report.created.push(CreatedShape {
            slide: slide + 1,
            id,
            label: label.cloned(),
        });
    }

    fn rounded_look(fill: &Option<Rgb>, text_color: &Option<Rgb>, font_size: &Option<f64>) -> RoundedBox {
        let defaults = RoundedBox::default();
        RoundedBox {
            fill: fill.unwrap_or(defaults.fill),
            text_color: text_color.unwrap_or(defaults.text_color),
            font_size: font_size.unwrap_or(defaults.font_size),
        }
    }

    fn apply(&mut self, op: &EditOp) -> Result<()> {
        match op {
            EditOp::AddSlide { layout, title, body } => {
                let index = self.deck.add_slide(*layout, title.as_deref())?;
                if !body.is_empty() {
                    self.deck.set_body_text(index, body)?;
                }
                self.report.slides_added += 1;
            }
            EditOp::DeleteSlide { slide } => {
                let index = self.slide(slide)?;
                self.deck.delete_slide(index)?;
                self.labels.retain(|_, (s, _)| *s != index);
                for (s, _) in self.labels.values_mut() {
                    if *s > index {
                        *s -= 1;
                    }
                }
                self.report.slides_deleted += 1;
            }
            EditOp::SetTitle { slide, text } => {
                let index = self.slide(slide)?;
                self.deck.set_title(index, text)?;
            }
            EditOp::SetBodyText { slide, paragraphs } => {
                let index = self.slide(slide)?;
                self.deck.set_body_text(index, paragraphs)?;
            }
            EditOp::SetText { slide, shape, text, style } => {
                let index = self.slide(slide)?;
                let id = self.shape(index, shape)?;
                let paragraphs: Vec<String> = text.split('\n').map(str::to_string).collect();
                self.deck.set_shape_text(index, id, &paragraphs, style.as_ref())?;
            }
            EditOp::AddTextBox { slide, text, left, top, width, height, style, label } => {
                let index = self.slide(slide)?;
                let rect = Rect::from_points(*left, *top, *width, *height);
                let id = self.deck.add_text_box(index, text, rect, style)?;
                self.created(index, id, label.as_ref());
            }
            EditOp::AddRoundedTextBox { slide, text, left, top, width, height, fill, text_color, font_size, label } => {
                let index = self.slide(slide)?;
                let rect = Rect::from_points(*left, *top, *width, *height);
                let look = Self::rounded_look(fill, text_color, font_size);
                let id = self.deck.add_rounded_text_box(index, text, rect, &look)?;
                self.created(index, id, label.as_ref());
            }
            EditOp::AddShape { slide, shape, left, top, width, height, fill, text, style, label } => {
                let index = self.slide(slide)?;
                let rect = Rect::from_points(*left, *top, *width, *height);
                let id = self.deck.add_shape(index, *shape, rect, *fill, text.as_deref(), style)?;
                self.created(index, id, label.as_ref());
            }
            EditOp::AddArrow { slide, from, to, color, width_pt, label } => {
                let index = self.slide(slide)?;
                let from = self.shape(index, from)?;
                let to = self.shape(index, to)?;
                let id = self.deck.add_arrow_between(index, from, to, *color, *width_pt)?;
                self.created(index, id, label.as_ref());
            }
            EditOp::AddImage { slide, path, left, top, width, height, label } => {
                let index = self.slide(slide)?;
                let placement = ImagePlacement {
                    left: points_to_emu(*left),
                    top: points_to_emu(*top),
                    width: width.map(points_to_emu),
                    height: height.map(points_to_emu),
                };
                let id = self.deck.add_image(index, path, placement)?;
                self.created(index, id, label.as_ref());
            }
            EditOp::DeleteShapesExcept { slide, keep, keep_title } => {
                let index = self.slide(slide)?;
                let keep = keep
                    .iter()
                    .map(|s| self.shape(index, s))
                    .collect::<Result<Vec<_>>>()?;
                self.deck.delete_shapes_except(index, &keep, *keep_title)?;
            }
            EditOp::RemoveConnectors { slide } => {
                let index = self.slide(slide)?;
                self.deck.remove_connectors_and_lines(index)?;
            }
            EditOp::AddBoxRow { slide, texts, top, box_width, box_height, gap, connect, fill, text_color, font_size, labels } => {
                let index = self.slide(slide)?;
                let look = Self::rounded_look(fill, text_color, font_size);
                let (slide_width, _) = self.deck.slide_size();
                let width = points_to_emu(*box_width);
                let lefts = distribute_horizontally(slide_width, texts.len(), width, points_to_emu(*gap));

                let mut previous: Option<u32> = None;
                for (n, (text, left)) in texts.iter().zip(lefts).enumerate() {
                    let rect = Rect::new(left, points_to_emu(*top), width, points_to_emu(*box_height));
                    let id = self.deck.add_rounded_text_box(index, text, rect, &look)?;
                    self.created(index, id, labels.get(n));
                    if *connect {
                        if let Some(prev) = previous {
                            let arrow = self.deck.add_arrow_between(index, prev, id, None, None)?;
                            self.created(index, arrow, None);
                        }
                    }
                    previous = Some(id);
                }
            }
        }
        Ok(())
    }
}

static JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("valid regex"));
static ANY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:\w*)\s*([\s\S]*?)\s*```").expect("valid regex"));

/// Find a JSON value in model output.
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return Some(value);
    }

    if let Some(block) = extract_from_code_block(text) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&block) {
            return Some(value);
        }
    }

    find_json_object(text).and_then(|candidate| serde_json::from_str(candidate).ok())
}

fn extract_from_code_block(text: &str) -> Option<String> {
    if let Some(caps) = JSON_BLOCK.captures(text) {
        return caps.get(1).map(|m| m.as_str().trim().to_string());
    }

    ANY_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|content| {
            (content.starts_with('{') && content.ends_with('}'))
                || (content.starts_with('[') && content.ends_with(']'))
        })
        .map(str::to_string)
}

/// The largest balanced `{...}` span, ignoring braces inside strings.
fn find_json_object(text: &str) -> Option<&str> {
    let mut best: Option<&str> = None;
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        let candidate = &text[s..=i];
                        if best.is_none_or(|b| candidate.len() > b.len()) {
                            best = Some(candidate);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    best
}
