//! Document Helper API.
//!
//! [`Deck`] is an editable presentation held in memory. Each operation
//! rewrites one or a few package parts and checks only the obvious
//! preconditions: the slide index is in range, referenced shapes exist,
//! sizes are not negative, images are readable. Nothing reaches the disk
//! until [`Deck::save`].
//!
//! ```no_run
//! use deckwright::deck::{Deck, RoundedBox};
//! use deckwright::model::Rect;
//! use deckwright::pptx::SlideLayout;
//!
//! let mut deck = Deck::create()?;
//! let slide = deck.add_slide(SlideLayout::TitleOnly, Some("Pipeline"))?;
//! let a = deck.add_rounded_text_box(slide, "Parse", Rect::from_points(60.0, 200.0, 160.0, 80.0), &RoundedBox::default())?;
//! let b = deck.add_rounded_text_box(slide, "Apply", Rect::from_points(300.0, 200.0, 160.0, 80.0), &RoundedBox::default())?;
//! deck.add_arrow_between(slide, a, b, None, None)?;
//! deck.save("pipeline.pptx")?;
//! # Ok::<(), deckwright::Error>(())
//! ```

use crate::container::{rel_types, OoxmlContainer, Relationships};
use crate::detect::detect_presentation_from_bytes;
use crate::error::{Error, Result};
use crate::model::{points_to_emu, Presentation, Rect, Rgb, ShapeKind, Slide};
use crate::pptx::reader::{parse_presentation, parse_slide, ShapeEntry, SlideDoc, SlideId};
use crate::pptx::shapes::{
    connector_xml, paragraphs_xml, picture_xml, placeholder_xml, Align, BodyLayout, Outline,
    ShapeMarkup, ShapePreset, TextStyle,
};
use crate::pptx::template::{self, content_types, SlideLayout, NS_R};
use crate::pptx::xml::{common_slide_name, ensure_namespace, find_element, root_attr, splice};
use std::path::Path;

const FIRST_SLIDE_ID: u32 = 256;

/// EMU per pixel at 96 dpi.
const EMU_PER_PIXEL: i64 = 9_525;

/// Default arrow color (dark gray).
pub const DEFAULT_ARROW_COLOR: Rgb = Rgb(70, 70, 70);

/// Default arrow width in points.
pub const DEFAULT_ARROW_WIDTH_PT: f64 = 2.5;

/// Widest line an outline may have, in points.
pub const MAX_LINE_WIDTH_PT: f64 = 1584.0;

/// Styling of a rounded text box.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedBox {
    /// Fill color
    pub fill: Rgb,
    /// Text color
    pub text_color: Rgb,
    /// Font size in points
    pub font_size: f64,
}

impl Default for RoundedBox {
    fn default() -> Self {
        Self {
            fill: Rgb(232, 244, 248),
            text_color: Rgb(50, 50, 50),
            font_size: 20.0,
        }
    }
}

/// Where to place an inserted picture.
///
/// Missing dimensions are derived from the image's pixel size at 96 dpi,
/// keeping the aspect ratio when only one of them is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImagePlacement {
    /// Left edge in EMU
    pub left: i64,
    /// Top edge in EMU
    pub top: i64,
    /// Width in EMU
    pub width: Option<i64>,
    /// Height in EMU
    pub height: Option<i64>,
}

#[derive(Debug, Clone)]
struct SlideRef {
    id: u32,
    rel_id: String,
    part: String,
}

/// An editable presentation.
#[derive(Debug, Clone)]
pub struct Deck {
    package: OoxmlContainer,
    presentation_part: String,
    slides: Vec<SlideRef>,
    slide_width: i64,
    slide_height: i64,
}

impl Deck {
    /// Create an empty 4:3 presentation with the standard layouts.
    pub fn create() -> Result<Self> {
        Self::from_package(template::blank_presentation())
    }

    /// Open a presentation file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Open a presentation from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect_presentation_from_bytes(&data)?;
        Self::from_package(OoxmlContainer::from_bytes(data)?)
    }

    fn from_package(package: OoxmlContainer) -> Result<Self> {
        let presentation_part = package
            .read_package_relationships()?
            .first_of_type(rel_types::OFFICE_DOCUMENT)
            .map(|r| OoxmlContainer::resolve_path("", &r.target))
            .unwrap_or_else(|| "ppt/presentation.xml".to_string());

        let info = parse_presentation(&package.read_xml(&presentation_part)?)?;
        let rels = package.read_relationships(&presentation_part)?;

        let mut slides = Vec::with_capacity(info.slide_ids.len());
        for SlideId { id, rel_id } in info.slide_ids {
            let rel = rels.get(&rel_id).ok_or_else(|| {
                Error::MissingComponent(format!("relationship {} for slide {}", rel_id, id))
            })?;
            let part = OoxmlContainer::resolve_path(&presentation_part, &rel.target);
            slides.push(SlideRef { id, rel_id, part });
        }

        tracing::debug!(slides = slides.len(), part = %presentation_part, "presentation loaded");

        Ok(Self {
            package,
            presentation_part,
            slides,
            slide_width: info.slide_width,
            slide_height: info.slide_height,
        })
    }

    /// Save to `path`, atomically replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.package.save(path)
    }

    /// Serialize the presentation to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide size in EMU as `(width, height)`.
    pub fn slide_size(&self) -> (i64, i64) {
        (self.slide_width, self.slide_height)
    }

    fn slide_ref(&self, index: usize) -> Result<&SlideRef> {
        self.slides.get(index).ok_or(Error::SlideOutOfRange {
            index,
            count: self.slides.len(),
        })
    }

    fn read_slide_doc(&self, index: usize) -> Result<(String, SlideDoc)> {
        let part = &self.slide_ref(index)?.part;
        let xml = self.package.read_xml(part)?;
        let doc = parse_slide(&xml)?;
        Ok((xml, doc))
    }

    fn layout_part_of(&self, slide_part: &str) -> Result<Option<String>> {
        Ok(self
            .package
            .read_relationships(slide_part)?
            .first_of_type(rel_types::SLIDE_LAYOUT)
            .map(|r| OoxmlContainer::resolve_path(slide_part, &r.target)))
    }

    /// Read one slide (0-based index).
    pub fn slide(&self, index: usize) -> Result<Slide> {
        let (_, doc) = self.read_slide_doc(index)?;
        let part = &self.slide_ref(index)?.part;
        let layout = match self.layout_part_of(part)? {
            Some(layout_part) => self
                .package
                .read_xml(&layout_part)
                .ok()
                .and_then(|xml| common_slide_name(&xml).ok().flatten())
                .unwrap_or_default(),
            None => String::new(),
        };
        Ok(doc.to_slide(index + 1, layout))
    }

    /// Read all slides in presentation order.
    pub fn slides(&self) -> Result<Vec<Slide>> {
        (0..self.slides.len()).map(|i| self.slide(i)).collect()
    }

    /// Snapshot of the whole presentation.
    pub fn snapshot(&self) -> Result<Presentation> {
        Ok(Presentation {
            slide_width: self.slide_width,
            slide_height: self.slide_height,
            slides: self.slides()?,
        })
    }

    /// Apply an edit to a slide part. The closure returns the new XML.
    fn edit_slide<T>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&str, &SlideDoc) -> Result<(String, T)>,
    ) -> Result<T> {
        let (xml, doc) = self.read_slide_doc(index)?;
        let (updated, value) = edit(&xml, &doc)?;
        let part = self.slide_ref(index)?.part.clone();
        self.package.put_xml(part, updated);
        Ok(value)
    }

    fn find_shape<'a>(doc: &'a SlideDoc, index: usize, id: u32) -> Result<&'a ShapeEntry> {
        doc.find(id).ok_or_else(|| Error::ShapeNotFound {
            slide: index + 1,
            shape: id.to_string(),
        })
    }

    fn insert_shape(xml: &str, doc: &SlideDoc, markup: &str) -> String {
        splice(xml, doc.tree_end..doc.tree_end, markup)
    }

    fn rewrite_slide_list(&mut self) -> Result<()> {
        let xml = self.package.read_xml(&self.presentation_part)?;

        let list = if self.slides.is_empty() {
            String::new()
        } else {
            let entries: String = self
                .slides
                .iter()
                .map(|s| format!(r#"<p:sldId id="{}" r:id="{}"/>"#, s.id, s.rel_id))
                .collect();
            format!("<p:sldIdLst>{}</p:sldIdLst>", entries)
        };

        let updated = match find_element(&xml, "sldIdLst")? {
            Some(span) => splice(&xml, span.outer, &list),
            None => {
                let anchor = find_element(&xml, "sldMasterIdLst")?.ok_or_else(|| {
                    Error::InvalidData("presentation has no slide master list".to_string())
                })?;
                let at = anchor.outer.end;
                splice(&xml, at..at, &list)
            }
        };

        self.package.put_xml(self.presentation_part.clone(), updated);
        Ok(())
    }

    fn available_layouts(&self) -> Result<Vec<(String, String, Option<String>)>> {
        let mut layouts = Vec::new();
        for part in self.package.list_files_with_prefix("ppt/slideLayouts/") {
            if part.contains("/_rels/") || !part.ends_with(".xml") {
                continue;
            }
            let xml = self.package.read_xml(&part)?;
            let name = common_slide_name(&xml)?.unwrap_or_default();
            let kind = root_attr(&xml, "type")?;
            layouts.push((part, name, kind));
        }
        layouts.sort_by_key(|(part, _, _)| trailing_number(part));
        Ok(layouts)
    }

    fn pick_layout(&self, layout: SlideLayout) -> Result<String> {
        let layouts = self.available_layouts()?;
        layouts
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(layout.display_name()))
            .or_else(|| {
                layouts
                    .iter()
                    .find(|(_, _, kind)| kind.as_deref() == Some(layout.layout_type()))
            })
            .or_else(|| layouts.first())
            .map(|(part, _, _)| part.clone())
            .ok_or_else(|| Error::MissingComponent("slide layouts".to_string()))
    }

    fn next_part_name(&self, dir: &str, stem: &str, ext: &str) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("{}/{}{}.{}", dir, stem, n, ext);
            if !self.package.exists(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Append a slide using `layout` and return its index.
    ///
    /// The slide receives the layout's title and content placeholders.
    /// When `title` is given the layout must have a title placeholder.
    pub fn add_slide(&mut self, layout: SlideLayout, title: Option<&str>) -> Result<usize> {
        let layout_part = self.pick_layout(layout)?;
        let layout_doc = parse_slide(&self.package.read_xml(&layout_part)?)?;

        let mut shapes = String::new();
        let mut next_id = 2u32;
        let mut title_placed = false;
        for entry in &layout_doc.shapes {
            let Some(ph) = &entry.shape.placeholder else {
                continue;
            };
            if matches!(ph.ph_type.as_deref(), Some("dt") | Some("ftr") | Some("sldNum") | Some("hdr")) {
                continue;
            }
            let base = match ph.ph_type.as_deref() {
                Some("title") | Some("ctrTitle") => "Title",
                Some("subTitle") => "Subtitle",
                Some("body") => "Text Placeholder",
                Some("pic") => "Picture Placeholder",
                None | Some("obj") => "Content Placeholder",
                Some(_) => "Placeholder",
            };
            let text: Vec<String> = match title {
                Some(t) if ph.is_title() && !title_placed => {
                    title_placed = true;
                    vec![t.to_string()]
                }
                _ => Vec::new(),
            };
            shapes.push_str(&placeholder_xml(
                next_id,
                &format!("{} {}", base, next_id - 1),
                ph.ph_type.as_deref(),
                ph.idx,
                &text,
            ));
            next_id += 1;
        }

        if title.is_some() && !title_placed {
            return Err(Error::InvalidData(format!(
                "layout '{}' has no title placeholder",
                layout.display_name()
            )));
        }

        let part = self.next_part_name("ppt/slides", "slide", "xml");
        self.package.put_xml(part.clone(), template::slide_xml(&shapes));

        let mut slide_rels = Relationships::new();
        slide_rels.add_internal(
            rel_types::SLIDE_LAYOUT,
            OoxmlContainer::relative_target(&part, &layout_part),
        );
        self.package.write_relationships(&part, &slide_rels);

        let mut types = self.package.content_types()?;
        types.add_override(&part, content_types::SLIDE);
        self.package.set_content_types(&types);

        let mut pres_rels = self.package.read_relationships(&self.presentation_part)?;
        let rel_id = pres_rels.add_internal(
            rel_types::SLIDE,
            OoxmlContainer::relative_target(&self.presentation_part, &part),
        );
        self.package.write_relationships(&self.presentation_part, &pres_rels);

        let id = self
            .slides
            .iter()
            .map(|s| s.id + 1)
            .max()
            .unwrap_or(FIRST_SLIDE_ID)
            .max(FIRST_SLIDE_ID);
        self.slides.push(SlideRef { id, rel_id, part: part.clone() });
        self.rewrite_slide_list()?;

        tracing::debug!(part = %part, layout = layout.display_name(), "slide added");
        Ok(self.slides.len() - 1)
    }

    /// Delete a slide and its parts.
    pub fn delete_slide(&mut self, index: usize) -> Result<()> {
        let slide = self.slide_ref(index)?.clone();

        let slide_rels = self.package.read_relationships(&slide.part)?;
        let mut types = self.package.content_types()?;
        for notes in slide_rels.get_by_type(rel_types::NOTES_SLIDE) {
            let notes_part = OoxmlContainer::resolve_path(&slide.part, &notes.target);
            self.package.remove_part(&notes_part);
            self.package.remove_part(&OoxmlContainer::rels_path(&notes_part));
            types.remove_override(&notes_part);
        }
        self.package.remove_part(&slide.part);
        self.package.remove_part(&OoxmlContainer::rels_path(&slide.part));
        types.remove_override(&slide.part);
        self.package.set_content_types(&types);

        let mut pres_rels = self.package.read_relationships(&self.presentation_part)?;
        pres_rels.remove(&slide.rel_id);
        self.package.write_relationships(&self.presentation_part, &pres_rels);

        self.slides.remove(index);
        self.rewrite_slide_list()?;
        tracing::debug!(part = %slide.part, "slide deleted");
        Ok(())
    }

    fn replace_text(
        xml: &str,
        entry: &ShapeEntry,
        paragraphs: &[String],
        style: Option<&TextStyle>,
    ) -> Result<String> {
        let default_style = TextStyle::default();
        let body_paragraphs = paragraphs_xml(paragraphs, style.unwrap_or(&default_style));

        match &entry.text_body {
            Some(range) => {
                let body = &xml[range.clone()];
                let body_pr = match find_element(body, "bodyPr")? {
                    Some(span) => body[span.outer].to_string(),
                    None => "<a:bodyPr/>".to_string(),
                };
                let lst_style = match find_element(body, "lstStyle")? {
                    Some(span) => body[span.outer].to_string(),
                    None => "<a:lstStyle/>".to_string(),
                };
                let replacement = format!(
                    "<p:txBody>{}{}{}</p:txBody>",
                    body_pr, lst_style, body_paragraphs
                );
                Ok(splice(xml, range.clone(), &replacement))
            }
            None => {
                let body = format!(
                    "<p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody>",
                    body_paragraphs
                );
                Ok(splice(xml, entry.close_tag..entry.close_tag, &body))
            }
        }
    }

    /// Set the title of a slide.
    pub fn set_title(&mut self, index: usize, text: &str) -> Result<()> {
        self.edit_slide(index, |xml, doc| {
            let entry = doc
                .shapes
                .iter()
                .find(|e| e.shape.is_title())
                .ok_or_else(|| {
                    Error::InvalidData(format!("slide {} has no title placeholder", index + 1))
                })?;
            Ok((Self::replace_text(xml, entry, &[text.to_string()], None)?, ()))
        })
    }

    /// Replace the paragraphs of the slide's first body placeholder.
    pub fn set_body_text(&mut self, index: usize, paragraphs: &[String]) -> Result<()> {
        self.edit_slide(index, |xml, doc| {
            let entry = doc
                .shapes
                .iter()
                .find(|e| {
                    !e.shape.is_title()
                        && e.shape.placeholder.as_ref().is_some_and(|p| p.is_body())
                })
                .ok_or_else(|| {
                    Error::InvalidData(format!("slide {} has no body placeholder", index + 1))
                })?;
            Ok((Self::replace_text(xml, entry, paragraphs, None)?, ()))
        })
    }

    /// Replace the text of any shape that can hold text.
    pub fn set_shape_text(
        &mut self,
        index: usize,
        shape_id: u32,
        paragraphs: &[String],
        style: Option<&TextStyle>,
    ) -> Result<()> {
        self.edit_slide(index, |xml, doc| {
            let entry = Self::find_shape(doc, index, shape_id)?;
            let can_hold_text = matches!(
                entry.shape.kind,
                ShapeKind::Placeholder | ShapeKind::TextBox | ShapeKind::AutoShape | ShapeKind::Freeform
            );
            if !can_hold_text {
                return Err(Error::InvalidData(format!(
                    "shape {} ({}) cannot hold text",
                    shape_id, entry.shape.kind
                )));
            }
            Ok((Self::replace_text(xml, entry, paragraphs, style)?, ()))
        })
    }

    fn check_rect(rect: &Rect) -> Result<()> {
        if rect.width < 0 || rect.height < 0 {
            return Err(Error::InvalidData(format!(
                "negative size {}x{}",
                rect.width, rect.height
            )));
        }
        if !rect.is_in_bounds() {
            return Err(Error::InvalidData(format!(
                "shape geometry out of range: {:?}",
                rect
            )));
        }
        Ok(())
    }

    /// Add a text box and return its shape id.
    pub fn add_text_box(
        &mut self,
        index: usize,
        text: &str,
        rect: Rect,
        style: &TextStyle,
    ) -> Result<u32> {
        Self::check_rect(&rect)?;
        let paragraphs = split_paragraphs(text);
        self.edit_slide(index, |xml, doc| {
            let id = doc.max_id + 1;
            let markup = ShapeMarkup {
                id,
                name: format!("TextBox {}", id - 1),
                rect,
                preset: "rect",
                text_box: true,
                fill: None,
                outline: None,
                adjust: None,
                shadow: false,
                paragraphs: &paragraphs,
                style,
                body: BodyLayout {
                    wrap: true,
                    auto_fit: true,
                    ..Default::default()
                },
            };
            Ok((Self::insert_shape(xml, doc, &markup.to_xml()), id))
        })
    }

    /// Add a rounded rectangle with centered text, a light outline and a
    /// soft shadow. Returns the shape id.
    pub fn add_rounded_text_box(
        &mut self,
        index: usize,
        text: &str,
        rect: Rect,
        look: &RoundedBox,
    ) -> Result<u32> {
        Self::check_rect(&rect)?;
        let paragraphs = split_paragraphs(text);
        let style = TextStyle {
            font_size: Some(look.font_size),
            color: Some(look.text_color),
            align: Some(Align::Center),
            ..Default::default()
        };
        self.edit_slide(index, |xml, doc| {
            let id = doc.max_id + 1;
            let markup = ShapeMarkup {
                id,
                name: format!("Rounded Rectangle {}", id - 1),
                rect,
                preset: ShapePreset::RoundedRectangle.prst(),
                text_box: false,
                fill: Some(look.fill),
                outline: Some(Outline {
                    color: Rgb(180, 180, 180),
                    width: points_to_emu(1.0),
                    arrow_head: false,
                }),
                adjust: Some(15_000),
                shadow: true,
                paragraphs: &paragraphs,
                style: &style,
                body: BodyLayout {
                    wrap: true,
                    anchor_middle: true,
                    inset: Some(91_440),
                    auto_fit: false,
                },
            };
            Ok((Self::insert_shape(xml, doc, &markup.to_xml()), id))
        })
    }

    /// Add a preset auto shape, optionally filled and with text. Returns the shape id.
    pub fn add_shape(
        &mut self,
        index: usize,
        preset: ShapePreset,
        rect: Rect,
        fill: Option<Rgb>,
        text: Option<&str>,
        style: &TextStyle,
    ) -> Result<u32> {
        Self::check_rect(&rect)?;
        let paragraphs = text.map(split_paragraphs).unwrap_or_default();
        self.edit_slide(index, |xml, doc| {
            let id = doc.max_id + 1;
            let markup = ShapeMarkup {
                id,
                name: format!("{} {}", preset.name_prefix(), id - 1),
                rect,
                preset: preset.prst(),
                text_box: false,
                fill,
                outline: None,
                adjust: None,
                shadow: false,
                paragraphs: &paragraphs,
                style,
                body: BodyLayout {
                    wrap: true,
                    anchor_middle: true,
                    ..Default::default()
                },
            };
            Ok((Self::insert_shape(xml, doc, &markup.to_xml()), id))
        })
    }

    /// Connect the right-middle of one shape to the left-middle of another
    /// with an arrow. Returns the connector id.
    pub fn add_arrow_between(
        &mut self,
        index: usize,
        from: u32,
        to: u32,
        color: Option<Rgb>,
        width_pt: Option<f64>,
    ) -> Result<u32> {
        let width_pt = width_pt.unwrap_or(DEFAULT_ARROW_WIDTH_PT);
        if !(0.0..=MAX_LINE_WIDTH_PT).contains(&width_pt) {
            return Err(Error::InvalidData(format!("line width {} pt out of range", width_pt)));
        }
        self.edit_slide(index, |xml, doc| {
            let geometry = |id: u32| -> Result<Rect> {
                let entry = Self::find_shape(doc, index, id)?;
                entry.shape.rect.ok_or_else(|| {
                    Error::InvalidData(format!("shape {} has no explicit position", id))
                })
            };
            let source = geometry(from)?;
            let target = geometry(to)?;
            Self::check_rect(&source)?;
            Self::check_rect(&target)?;

            let id = doc.max_id + 1;
            let outline = Outline {
                color: color.unwrap_or(DEFAULT_ARROW_COLOR),
                width: points_to_emu(width_pt),
                arrow_head: true,
            };
            let markup = connector_xml(
                id,
                (source.right(), source.center_y()),
                (target.left, target.center_y()),
                Some((from, to)),
                outline,
            );
            Ok((Self::insert_shape(xml, doc, &markup), id))
        })
    }

    /// Insert a PNG, JPEG or GIF image. Returns the picture id.
    pub fn add_image(
        &mut self,
        index: usize,
        image_path: impl AsRef<Path>,
        placement: ImagePlacement,
    ) -> Result<u32> {
        let image_path = image_path.as_ref();
        let part = self.slide_ref(index)?.part.clone();

        let data = std::fs::read(image_path)
            .map_err(|e| Error::Image(format!("{}: {}", image_path.display(), e)))?;
        let reader = image::ImageReader::new(std::io::Cursor::new(&data)).with_guessed_format()?;
        let (ext, mime) = match reader.format() {
            Some(image::ImageFormat::Png) => ("png", "image/png"),
            Some(image::ImageFormat::Jpeg) => ("jpeg", "image/jpeg"),
            Some(image::ImageFormat::Gif) => ("gif", "image/gif"),
            _ => {
                return Err(Error::Image(format!(
                    "{}: unsupported image format",
                    image_path.display()
                )))
            }
        };
        let (px_w, px_h) = reader.into_dimensions()?;
        let native_w = i64::from(px_w) * EMU_PER_PIXEL;
        let native_h = i64::from(px_h) * EMU_PER_PIXEL;

        let (width, height) = match (placement.width, placement.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) if native_w > 0 => (w, scale(w, native_h, native_w)),
            (None, Some(h)) if native_h > 0 => (scale(h, native_w, native_h), h),
            _ => (native_w, native_h),
        };
        let rect = Rect::new(placement.left, placement.top, width, height);
        Self::check_rect(&rect)?;

        let media = self.next_part_name("ppt/media", "image", ext);
        self.package.put_part(media.clone(), data);

        let mut types = self.package.content_types()?;
        types.add_default(ext, mime);
        self.package.set_content_types(&types);

        let mut rels = self.package.read_relationships(&part)?;
        let rel_id = rels.add_internal(rel_types::IMAGE, OoxmlContainer::relative_target(&part, &media));
        self.package.write_relationships(&part, &rels);

        let description = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.edit_slide(index, |xml, _| {
            let xml = ensure_namespace(xml, "r", NS_R)?;
            let doc = parse_slide(&xml)?;
            let id = doc.max_id + 1;
            let markup = picture_xml(id, &format!("Picture {}", id - 1), &description, &rel_id, rect);
            Ok((Self::insert_shape(&xml, &doc, &markup), id))
        })
    }

    fn remove_shapes(xml: &str, doc: &SlideDoc, remove: impl Fn(&ShapeEntry) -> bool) -> (String, usize) {
        let mut updated = xml.to_string();
        let mut removed = 0;
        for entry in doc.shapes.iter().rev() {
            if remove(entry) {
                updated = splice(&updated, entry.span.clone(), "");
                removed += 1;
            }
        }
        (updated, removed)
    }

    /// Delete every top-level shape except `keep` (and the title when
    /// `keep_title` is set). Returns the number of shapes removed.
    pub fn delete_shapes_except(
        &mut self,
        index: usize,
        keep: &[u32],
        keep_title: bool,
    ) -> Result<usize> {
        self.edit_slide(index, |xml, doc| {
            for id in keep {
                Self::find_shape(doc, index, *id)?;
            }
            Ok(Self::remove_shapes(xml, doc, |e| {
                !(keep.contains(&e.shape.id) || (keep_title && e.shape.is_title()))
            }))
        })
    }

    /// Remove connectors and lines. Returns the number of shapes removed.
    pub fn remove_connectors_and_lines(&mut self, index: usize) -> Result<usize> {
        self.edit_slide(index, |xml, doc| {
            Ok(Self::remove_shapes(xml, doc, |e| e.shape.is_line()))
        })
    }
}

/// Left positions that center `count` boxes of `box_width` separated by
/// `gap` across a slide of `slide_width`.
pub fn distribute_horizontally(slide_width: i64, count: usize, box_width: i64, gap: i64) -> Vec<i64> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as i64;
    let step = box_width.saturating_add(gap);
    let total = n.saturating_mul(step).saturating_sub(gap);
    let start = slide_width.saturating_sub(total).div_euclid(2);
    (0..n)
        .map(|i| start.saturating_add(i.saturating_mul(step)))
        .collect()
}

/// `value * numerator / denominator` without intermediate overflow.
fn scale(value: i64, numerator: i64, denominator: i64) -> i64 {
    let scaled = i128::from(value) * i128::from(numerator) / i128::from(denominator);
    i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX })
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

fn trailing_number(part: &str) -> u32 {
    let stem = part.trim_end_matches(".xml");
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().unwrap_or(u32::MAX)
}
