//! Slide XML reader.
//!
//! Slides are read in two passes: the first locates the top-level children
//! of `p:spTree` and their byte spans, the second parses each shape on its
//! own. The spans let the deck splice edits into the original markup.

use super::xml::{attr, int_attr, rel_attr};
use crate::error::{Error, Result};
use crate::model::{Placeholder, Rect, Rgb, Shape, ShapeKind, Slide};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ops::Range;

/// A shape together with its location in the slide part.
#[derive(Debug, Clone)]
pub struct ShapeEntry {
    /// Parsed shape
    pub shape: Shape,
    /// Byte span of the whole shape element
    pub span: Range<usize>,
    /// Byte span of `p:txBody`, when present
    pub text_body: Option<Range<usize>>,
    /// Start of the shape's closing tag
    pub close_tag: usize,
}

/// A parsed slide part.
#[derive(Debug, Clone)]
pub struct SlideDoc {
    /// Top-level shapes in document order
    pub shapes: Vec<ShapeEntry>,
    /// Start of `</p:spTree>`; new shapes are inserted here
    pub tree_end: usize,
    /// Largest shape id used anywhere on the slide
    pub max_id: u32,
}

impl SlideDoc {
    /// Find a shape entry by id.
    pub fn find(&self, id: u32) -> Option<&ShapeEntry> {
        self.shapes.iter().find(|s| s.shape.id == id)
    }

    /// Build the read model for this slide.
    pub fn to_slide(&self, number: usize, layout: impl Into<String>) -> Slide {
        Slide {
            number,
            layout: layout.into(),
            shapes: self.shapes.iter().map(|e| e.shape.clone()).collect(),
        }
    }
}

/// A `p:sldId` entry from presentation.xml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    /// Slide id (256 and above)
    pub id: u32,
    /// Relationship id in presentation.xml.rels
    pub rel_id: String,
}

/// Information read from presentation.xml.
#[derive(Debug, Clone)]
pub struct PresentationInfo {
    /// Slides in presentation order
    pub slide_ids: Vec<SlideId>,
    /// Slide width in EMU
    pub slide_width: i64,
    /// Slide height in EMU
    pub slide_height: i64,
}

/// Default slide size (4:3, 10in x 7.5in).
pub const DEFAULT_SLIDE_SIZE: (i64, i64) = (9_144_000, 6_858_000);

/// Parse presentation.xml.
pub fn parse_presentation(xml: &str) -> Result<PresentationInfo> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut info = PresentationInfo {
        slide_ids: Vec::new(),
        slide_width: DEFAULT_SLIDE_SIZE.0,
        slide_height: DEFAULT_SLIDE_SIZE.1,
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sldId" => {
                    let id = int_attr(&e, b"id").unwrap_or(0) as u32;
                    if let Some(rel_id) = rel_attr(&e, b"id") {
                        info.slide_ids.push(SlideId { id, rel_id });
                    }
                }
                b"sldSz" => {
                    if let Some(cx) = int_attr(&e, b"cx") {
                        info.slide_width = cx;
                    }
                    if let Some(cy) = int_attr(&e, b"cy") {
                        info.slide_height = cy;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(info)
}

fn is_shape_element(local: &[u8]) -> bool {
    matches!(
        local,
        b"sp" | b"pic" | b"graphicFrame" | b"cxnSp" | b"grpSp" | b"contentPart" | b"AlternateContent"
    )
}

fn cnvpr_id(e: &BytesStart<'_>) -> u32 {
    int_attr(e, b"id").unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}

/// Parse a slide part into shapes with byte spans.
pub fn parse_slide(xml: &str) -> Result<SlideDoc> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut tree_end: Option<usize> = None;
    let mut open: Option<(Vec<u8>, usize)> = None;
    let mut spans: Vec<(Vec<u8>, Range<usize>)> = Vec::new();
    let mut max_id = 0u32;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let local = e.local_name().as_ref().to_vec();
                if local == b"cNvPr" {
                    max_id = max_id.max(cnvpr_id(&e));
                }
                match tree_depth {
                    None if local == b"spTree" => tree_depth = Some(depth),
                    Some(t) if tree_end.is_none() && depth == t + 1 && is_shape_element(&local) => {
                        open = Some((local, before));
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let local = e.local_name().as_ref().to_vec();
                if local == b"cNvPr" {
                    max_id = max_id.max(cnvpr_id(&e));
                }
                if let Some(t) = tree_depth {
                    if tree_end.is_none() && depth == t && is_shape_element(&local) {
                        spans.push((local, before..reader.buffer_position() as usize));
                    }
                }
            }
            Event::End(_) => {
                if let (Some(t), None) = (tree_depth, tree_end) {
                    if depth == t + 1 {
                        if let Some((local, start)) = open.take() {
                            spans.push((local, start..reader.buffer_position() as usize));
                        }
                    } else if depth == t {
                        tree_end = Some(before);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let tree_end =
        tree_end.ok_or_else(|| Error::InvalidData("slide has no shape tree".to_string()))?;

    let shapes = spans
        .into_iter()
        .map(|(local, span)| parse_shape(&xml[span.clone()], span.start, &local))
        .collect::<Result<Vec<_>>>()?;

    Ok(SlideDoc {
        shapes,
        tree_end,
        max_id,
    })
}

/// Whether `path` (element names from the shape root down) is inside the
/// shape's own transform: `spPr/xfrm`, `grpSpPr/xfrm`, or a frame's `xfrm`.
fn in_own_xfrm(path: &[Vec<u8>]) -> bool {
    match path {
        [_, x] => x.as_slice() == b"xfrm",
        [_, props, x] => {
            matches!(props.as_slice(), b"spPr" | b"grpSpPr") && x.as_slice() == b"xfrm"
        }
        _ => false,
    }
}

fn under(path: &[Vec<u8>], names: &[&[u8]]) -> bool {
    path.len() == names.len() + 1 && path[1..].iter().zip(names).all(|(a, b)| a.as_slice() == *b)
}

#[derive(Default)]
struct ShapeScan {
    id: Option<u32>,
    name: String,
    placeholder: Option<Placeholder>,
    text_box: bool,
    custom_geometry: bool,
    preset: Option<String>,
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
    fill: Option<Rgb>,
    paragraphs: Vec<String>,
    has_text_frame: bool,
    text_body_start: Option<usize>,
    text_body: Option<Range<usize>>,
    frame_kind: Option<ShapeKind>,
}

impl ShapeScan {
    fn visit(&mut self, path: &[Vec<u8>], local: &[u8], e: &BytesStart<'_>) {
        match local {
            b"cNvPr" if self.id.is_none() => {
                self.id = Some(cnvpr_id(e));
                self.name = attr(e, b"name").unwrap_or_default();
            }
            b"cNvSpPr" if path.len() == 2 => {
                self.text_box = attr(e, b"txBox").is_some_and(|v| v == "1" || v == "true");
            }
            b"ph" if self.placeholder.is_none() && path.len() == 3 => {
                self.placeholder = Some(Placeholder {
                    ph_type: attr(e, b"type"),
                    idx: int_attr(e, b"idx").map(|i| i as u32),
                });
            }
            b"off" if self.offset.is_none() && in_own_xfrm(path) => {
                self.offset = Some((int_attr(e, b"x").unwrap_or(0), int_attr(e, b"y").unwrap_or(0)));
            }
            b"ext" if self.extent.is_none() && in_own_xfrm(path) => {
                self.extent = Some((
                    int_attr(e, b"cx").unwrap_or(0),
                    int_attr(e, b"cy").unwrap_or(0),
                ));
            }
            b"prstGeom" if under(path, &[b"spPr"]) => self.preset = attr(e, b"prst"),
            b"custGeom" if under(path, &[b"spPr"]) => self.custom_geometry = true,
            b"srgbClr" if self.fill.is_none() && under(path, &[b"spPr", b"solidFill"]) => {
                self.fill = attr(e, b"val").and_then(|v| Rgb::from_hex(&v));
            }
            b"p" if under(path, &[b"txBody"]) => self.paragraphs.push(String::new()),
            b"br" if under(path, &[b"txBody", b"p"]) => {
                if let Some(last) = self.paragraphs.last_mut() {
                    last.push('\n');
                }
            }
            b"tbl" => self.frame_kind = Some(ShapeKind::Table),
            b"chart" => self.frame_kind = Some(ShapeKind::Chart),
            _ => {}
        }
    }

    fn kind(&self, root: &[u8]) -> ShapeKind {
        match root {
            b"sp" if self.placeholder.is_some() => ShapeKind::Placeholder,
            b"sp" if self.text_box => ShapeKind::TextBox,
            b"sp" if matches!(
                self.preset.as_deref(),
                Some("line") | Some("straightConnector1")
            ) =>
            {
                ShapeKind::Line
            }
            b"sp" if self.custom_geometry => ShapeKind::Freeform,
            b"sp" => ShapeKind::AutoShape,
            b"pic" => ShapeKind::Picture,
            b"cxnSp" => ShapeKind::Line,
            b"grpSp" => ShapeKind::Group,
            b"graphicFrame" => self.frame_kind.unwrap_or(ShapeKind::GraphicFrame),
            _ => ShapeKind::Other,
        }
    }
}

fn parse_shape(xml: &str, offset: usize, root: &[u8]) -> Result<ShapeEntry> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut scan = ShapeScan::default();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut close_tag = xml.len();

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name().as_ref().to_vec();
                if local == b"txBody" && path.len() == 1 {
                    scan.has_text_frame = true;
                    scan.text_body_start = Some(before);
                }
                scan.visit(&path, &local, &e);
                path.push(local);
            }
            Event::Empty(e) => {
                let local = e.local_name().as_ref().to_vec();
                if local == b"txBody" && path.len() == 1 {
                    scan.has_text_frame = true;
                    scan.text_body = Some(before..reader.buffer_position() as usize);
                }
                scan.visit(&path, &local, &e);
            }
            Event::Text(t) => {
                let in_run_text = path.len() >= 4
                    && path[1].as_slice() == b"txBody"
                    && path.last().is_some_and(|l| l.as_slice() == b"t");
                if in_run_text {
                    let text = t.unescape().unwrap_or_default();
                    if let Some(last) = scan.paragraphs.last_mut() {
                        last.push_str(&text);
                    }
                }
            }
            Event::End(_) => {
                let closed = path.pop();
                if path.len() == 1 && closed.as_deref() == Some(b"txBody".as_slice()) {
                    if let Some(start) = scan.text_body_start.take() {
                        scan.text_body = Some(start..reader.buffer_position() as usize);
                    }
                }
                if path.is_empty() {
                    close_tag = before;
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let kind = scan.kind(root);
    let rect = match (scan.offset, scan.extent) {
        (Some((x, y)), Some((cx, cy))) => Some(Rect::new(x, y, cx, cy)),
        _ => None,
    };

    let shape = Shape {
        id: scan.id.unwrap_or(0),
        name: scan.name,
        kind,
        placeholder: scan.placeholder,
        rect,
        fill: scan.fill,
        preset: scan.preset,
        paragraphs: scan.paragraphs,
        has_text_frame: scan.has_text_frame,
    };

    Ok(ShapeEntry {
        shape,
        span: offset..offset + xml.len(),
        text_body: scan.text_body.map(|r| offset + r.start..offset + r.end),
        close_tag: offset + close_tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
<p:grpSpPr/>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>Q3 &amp; Q4</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="5" name="TextBox 4"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="914400" y="1270000"/><a:ext cx="2540000" cy="635000"/></a:xfrm><a:prstGeom prst="roundRect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="E8F4F8"/></a:solidFill><a:ln><a:solidFill><a:srgbClr val="B4B4B4"/></a:solidFill></a:ln></p:spPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>First</a:t></a:r></a:p><a:p><a:r><a:t>Second</a:t></a:r></a:p></p:txBody></p:sp>
<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="7" name="Arrow 6"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="0"/></a:xfrm><a:prstGeom prst="straightConnector1"><a:avLst/></a:prstGeom><a:ln><a:solidFill><a:srgbClr val="464646"/></a:solidFill></a:ln></p:spPr></p:cxnSp>
<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="9" name="Table 8"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="12700" y="25400"/><a:ext cx="127000" cy="254000"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl/></a:graphicData></a:graphic></p:graphicFrame>
<p:grpSp><p:nvGrpSpPr><p:cNvPr id="10" name="Group 9"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="12" name="Inner"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp></p:grpSp>
</p:spTree></p:cSld>
</p:sld>"#;

    #[test]
    fn test_parse_slide_shapes() {
        let doc = parse_slide(SLIDE).unwrap();
        let ids: Vec<u32> = doc.shapes.iter().map(|s| s.shape.id).collect();
        assert_eq!(ids, [2, 5, 7, 9, 10]);
        assert_eq!(doc.max_id, 12);
        assert!(SLIDE[doc.tree_end..].starts_with("</p:spTree>"));
    }

    #[test]
    fn test_title_placeholder() {
        let doc = parse_slide(SLIDE).unwrap();
        let title = &doc.shapes[0].shape;
        assert_eq!(title.kind, ShapeKind::Placeholder);
        assert!(title.is_title());
        assert_eq!(title.text(), "Q3 & Q4");
        assert!(title.rect.is_none());
    }

    #[test]
    fn test_text_box_geometry_and_fill() {
        let doc = parse_slide(SLIDE).unwrap();
        let entry = &doc.shapes[1];
        let shape = &entry.shape;
        assert_eq!(shape.kind, ShapeKind::TextBox);
        assert_eq!(shape.rect, Some(Rect::new(914_400, 1_270_000, 2_540_000, 635_000)));
        assert_eq!(shape.fill, Some(Rgb(0xE8, 0xF4, 0xF8)));
        assert_eq!(shape.preset.as_deref(), Some("roundRect"));
        assert_eq!(shape.paragraphs, ["First", "Second"]);

        let body = entry.text_body.clone().unwrap();
        assert!(SLIDE[body.clone()].starts_with("<p:txBody>"));
        assert!(SLIDE[body].ends_with("</p:txBody>"));
        assert!(SLIDE[entry.close_tag..].starts_with("</p:sp>"));
    }

    #[test]
    fn test_connector_table_and_group() {
        let doc = parse_slide(SLIDE).unwrap();
        assert_eq!(doc.shapes[2].shape.kind, ShapeKind::Line);
        assert_eq!(doc.shapes[2].shape.fill, None);
        assert_eq!(doc.shapes[3].shape.kind, ShapeKind::Table);
        assert_eq!(doc.shapes[3].shape.rect, Some(Rect::new(12_700, 25_400, 127_000, 254_000)));
        assert_eq!(doc.shapes[4].shape.kind, ShapeKind::Group);
        assert_eq!(doc.shapes[4].shape.name, "Group 9");
    }

    #[test]
    fn test_spans_cover_whole_elements() {
        let doc = parse_slide(SLIDE).unwrap();
        for entry in &doc.shapes {
            let text = &SLIDE[entry.span.clone()];
            assert!(text.starts_with("<p:"));
            assert!(text.ends_with('>'));
        }
    }

    #[test]
    fn test_parse_presentation() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="300" r:id="rId7"/></p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#;
        let info = parse_presentation(xml).unwrap();
        assert_eq!(
            info.slide_ids,
            [
                SlideId { id: 256, rel_id: "rId2".into() },
                SlideId { id: 300, rel_id: "rId7".into() }
            ]
        );
        assert_eq!(info.slide_width, 12_192_000);
    }

    #[test]
    fn test_missing_shape_tree() {
        assert!(matches!(parse_slide("<p:sld/>"), Err(Error::InvalidData(_))));
    }
}
