//! Markup for shapes inserted into slides.

use super::xml::escape_text;
use crate::model::{Rect, Rgb};
use serde::{Deserialize, Serialize};

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Left aligned
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
}

impl Align {
    fn attr(&self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Character and paragraph formatting applied to every run of a text body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Text color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Latin typeface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Paragraph alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

/// Preset geometries available for new auto shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePreset {
    /// Rectangle
    Rectangle,
    /// Rectangle with rounded corners
    RoundedRectangle,
    /// Ellipse
    Ellipse,
}

impl ShapePreset {
    /// DrawingML preset name.
    pub fn prst(&self) -> &'static str {
        match self {
            ShapePreset::Rectangle => "rect",
            ShapePreset::RoundedRectangle => "roundRect",
            ShapePreset::Ellipse => "ellipse",
        }
    }

    /// Name prefix PowerPoint gives shapes of this preset.
    pub fn name_prefix(&self) -> &'static str {
        match self {
            ShapePreset::Rectangle => "Rectangle",
            ShapePreset::RoundedRectangle => "Rounded Rectangle",
            ShapePreset::Ellipse => "Oval",
        }
    }
}

/// Outline of a shape or connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    /// Line color
    pub color: Rgb,
    /// Line width in EMU
    pub width: i64,
    /// Arrowhead at the end of the line
    pub arrow_head: bool,
}

impl Outline {
    fn to_xml(self) -> String {
        let tail = if self.arrow_head {
            r#"<a:tailEnd type="triangle"/>"#
        } else {
            ""
        };
        format!(
            r#"<a:ln w="{}"><a:solidFill><a:srgbClr val="{}"/></a:solidFill>{}</a:ln>"#,
            self.width,
            self.color.hex(),
            tail
        )
    }
}

/// Text body layout options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyLayout {
    /// Wrap text at the shape edge
    pub wrap: bool,
    /// Vertically center the text
    pub anchor_middle: bool,
    /// Inset on all four sides, in EMU
    pub inset: Option<i64>,
    /// Grow the shape to fit its text
    pub auto_fit: bool,
}

impl BodyLayout {
    fn to_xml(self) -> String {
        let mut attrs = String::new();
        if self.wrap {
            attrs.push_str(r#" wrap="square""#);
        }
        if let Some(inset) = self.inset {
            attrs.push_str(&format!(
                r#" lIns="{0}" tIns="{0}" rIns="{0}" bIns="{0}""#,
                inset
            ));
        }
        if self.anchor_middle {
            attrs.push_str(r#" anchor="ctr""#);
        }
        attrs.push_str(r#" rtlCol="0""#);
        if self.auto_fit {
            format!("<a:bodyPr{}><a:spAutoFit/></a:bodyPr>", attrs)
        } else {
            format!("<a:bodyPr{}/>", attrs)
        }
    }
}

fn run_properties(style: &TextStyle) -> String {
    let mut attrs = String::from(r#" lang="en-US""#);
    if let Some(size) = style.font_size {
        attrs.push_str(&format!(r#" sz="{}""#, (size * 100.0).round() as i64));
    }
    if style.bold {
        attrs.push_str(r#" b="1""#);
    }
    if style.italic {
        attrs.push_str(r#" i="1""#);
    }
    attrs.push_str(r#" dirty="0""#);

    let mut children = String::new();
    if let Some(color) = style.color {
        children.push_str(&format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.hex()
        ));
    }
    if let Some(font) = &style.font {
        let face = escape_text(font);
        children.push_str(&format!(
            r#"<a:latin typeface="{0}"/><a:ea typeface="{0}"/>"#,
            face
        ));
    }

    if children.is_empty() {
        format!("<a:rPr{}/>", attrs)
    } else {
        format!("<a:rPr{}>{}</a:rPr>", attrs, children)
    }
}

/// Paragraph markup for a list of paragraph texts.
///
/// Line breaks inside a paragraph become `a:br`. An empty list still
/// yields one empty paragraph, as a text body requires.
pub fn paragraphs_xml(paragraphs: &[String], style: &TextStyle) -> String {
    let ppr = match style.align {
        Some(align) => format!(r#"<a:pPr algn="{}"/>"#, align.attr()),
        None => String::new(),
    };
    let rpr = run_properties(style);

    let single_empty = [String::new()];
    let paragraphs = if paragraphs.is_empty() {
        &single_empty[..]
    } else {
        paragraphs
    };

    let mut xml = String::new();
    for paragraph in paragraphs {
        xml.push_str("<a:p>");
        xml.push_str(&ppr);
        for (i, line) in paragraph.split('\n').map(|l| l.trim_end_matches('\r')).enumerate() {
            if i > 0 {
                xml.push_str(&format!("<a:br>{}</a:br>", rpr));
            }
            if !line.is_empty() {
                xml.push_str(&format!("<a:r>{}<a:t>{}</a:t></a:r>", rpr, escape_text(line)));
            }
        }
        xml.push_str(&format!(
            "{}</a:p>",
            rpr.replacen("<a:rPr", "<a:endParaRPr", 1)
                .replace("</a:rPr>", "</a:endParaRPr>")
        ));
    }
    xml
}

/// A complete `p:txBody`.
pub fn text_body_xml(paragraphs: &[String], style: &TextStyle, layout: BodyLayout) -> String {
    format!(
        "<p:txBody>{}<a:lstStyle/>{}</p:txBody>",
        layout.to_xml(),
        paragraphs_xml(paragraphs, style)
    )
}

fn xfrm(rect: Rect, flip_h: bool, flip_v: bool) -> String {
    let mut flips = String::new();
    if flip_h {
        flips.push_str(r#" flipH="1""#);
    }
    if flip_v {
        flips.push_str(r#" flipV="1""#);
    }
    format!(
        r#"<a:xfrm{}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        flips, rect.left, rect.top, rect.width, rect.height
    )
}

/// Outer shadow used for rounded text boxes: 3pt at 45 degrees, 4pt blur, 50% opacity.
const SOFT_SHADOW: &str = concat!(
    r#"<a:effectLst><a:outerShdw blurRad="50800" dist="38100" dir="2700000" algn="tl" rotWithShape="0">"#,
    r#"<a:srgbClr val="000000"><a:alpha val="50000"/></a:srgbClr></a:outerShdw></a:effectLst>"#
);

/// Builder for a `p:sp` auto shape or text box.
#[derive(Debug, Clone)]
pub struct ShapeMarkup<'a> {
    /// Shape id
    pub id: u32,
    /// Shape name
    pub name: String,
    /// Position and size
    pub rect: Rect,
    /// Preset geometry name
    pub preset: &'a str,
    /// Mark as a text box (`txBox="1"`)
    pub text_box: bool,
    /// Solid fill
    pub fill: Option<Rgb>,
    /// Outline
    pub outline: Option<Outline>,
    /// First adjustment value (e.g. corner radius), in 1/100000
    pub adjust: Option<i64>,
    /// Soft outer shadow
    pub shadow: bool,
    /// Paragraph texts
    pub paragraphs: &'a [String],
    /// Text formatting
    pub style: &'a TextStyle,
    /// Text body layout
    pub body: BodyLayout,
}

impl ShapeMarkup<'_> {
    /// Render the shape element.
    pub fn to_xml(&self) -> String {
        let cnv_sp_pr = if self.text_box {
            r#"<p:cNvSpPr txBox="1"/>"#
        } else {
            "<p:cNvSpPr/>"
        };
        let av_list = match self.adjust {
            Some(adj) => format!(r#"<a:avLst><a:gd name="adj" fmla="val {}"/></a:avLst>"#, adj),
            None => "<a:avLst/>".to_string(),
        };
        let fill = match self.fill {
            Some(color) => format!(r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.hex()),
            None if self.text_box => "<a:noFill/>".to_string(),
            None => String::new(),
        };
        let outline = self.outline.map(Outline::to_xml).unwrap_or_default();
        let effects = if self.shadow { SOFT_SHADOW } else { "" };

        format!(
            concat!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/>{cnv}<p:nvPr/></p:nvSpPr>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="{prst}">{av}</a:prstGeom>{fill}{ln}{fx}</p:spPr>"#,
                "{body}</p:sp>"
            ),
            id = self.id,
            name = escape_text(&self.name),
            cnv = cnv_sp_pr,
            xfrm = xfrm(self.rect, false, false),
            prst = self.preset,
            av = av_list,
            fill = fill,
            ln = outline,
            fx = effects,
            body = text_body_xml(self.paragraphs, self.style, self.body),
        )
    }
}

/// A straight connector from `start` to `end`, optionally glued to shapes.
pub fn connector_xml(
    id: u32,
    start: (i64, i64),
    end: (i64, i64),
    glue: Option<(u32, u32)>,
    outline: Outline,
) -> String {
    let rect = Rect::new(
        start.0.min(end.0),
        start.1.min(end.1),
        end.0.saturating_sub(start.0).saturating_abs(),
        end.1.saturating_sub(start.1).saturating_abs(),
    );
    // Connection sites 3 and 1 are the right and left midpoints of a rectangle.
    let connections = match glue {
        Some((from, to)) => format!(
            r#"<a:stCxn id="{}" idx="3"/><a:endCxn id="{}" idx="1"/>"#,
            from, to
        ),
        None => String::new(),
    };

    format!(
        concat!(
            r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="Straight Arrow Connector {n}"/>"#,
            r#"<p:cNvCxnSpPr>{cxn}</p:cNvCxnSpPr><p:nvPr/></p:nvCxnSpPr>"#,
            r#"<p:spPr>{xfrm}<a:prstGeom prst="straightConnector1"><a:avLst/></a:prstGeom>{ln}</p:spPr>"#,
            "</p:cxnSp>"
        ),
        id = id,
        n = id.saturating_sub(1),
        cxn = connections,
        xfrm = xfrm(rect, end.0 < start.0, end.1 < start.1),
        ln = outline.to_xml(),
    )
}

/// A picture referencing an image relationship.
pub fn picture_xml(id: u32, name: &str, description: &str, rel_id: &str, rect: Rect) -> String {
    format!(
        concat!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}" descr="{descr}"/>"#,
            r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            r#"<p:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
        ),
        id = id,
        name = escape_text(name),
        descr = escape_text(description),
        rid = rel_id,
        xfrm = xfrm(rect, false, false),
    )
}

/// A slide placeholder that inherits its geometry from the layout.
pub fn placeholder_xml(id: u32, name: &str, ph_type: Option<&str>, idx: Option<u32>, paragraphs: &[String]) -> String {
    let mut ph = String::from("<p:ph");
    if let Some(t) = ph_type {
        ph.push_str(&format!(r#" type="{}""#, t));
    }
    if let Some(i) = idx {
        ph.push_str(&format!(r#" idx="{}""#, i));
    }
    ph.push_str("/>");

    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr>"#,
            "<p:spPr/>{body}</p:sp>"
        ),
        id = id,
        name = escape_text(name),
        ph = ph,
        body = text_body_xml(paragraphs, &TextStyle::default(), BodyLayout::default()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::reader::parse_slide;
    use crate::pptx::template::slide_xml;
    use crate::model::ShapeKind;

    #[test]
    fn test_paragraphs_with_breaks() {
        let xml = paragraphs_xml(&["a\nb".to_string()], &TextStyle::default());
        assert_eq!(xml.matches("<a:p>").count(), 1);
        assert_eq!(xml.matches("<a:br>").count(), 1);
        assert!(xml.contains("<a:endParaRPr"));
    }

    #[test]
    fn test_empty_paragraph_list_yields_one_paragraph() {
        let xml = paragraphs_xml(&[], &TextStyle::default());
        assert_eq!(xml.matches("<a:p>").count(), 1);
        assert!(!xml.contains("<a:r>"));
    }

    #[test]
    fn test_run_properties() {
        let style = TextStyle {
            font_size: Some(20.0),
            color: Some(Rgb(50, 50, 50)),
            bold: true,
            ..Default::default()
        };
        let xml = paragraphs_xml(&["x".to_string()], &style);
        assert!(xml.contains(r#"sz="2000""#));
        assert!(xml.contains(r#"b="1""#));
        assert!(xml.contains(r#"<a:srgbClr val="323232"/>"#));
    }

    #[test]
    fn test_shape_markup_reads_back() {
        let paragraphs = vec!["Step 1".to_string()];
        let style = TextStyle::default();
        let shape = ShapeMarkup {
            id: 4,
            name: "Rounded Rectangle 3".to_string(),
            rect: Rect::new(100, 200, 300, 400),
            preset: "roundRect",
            text_box: false,
            fill: Some(Rgb(232, 244, 248)),
            outline: Some(Outline {
                color: Rgb(180, 180, 180),
                width: 12_700,
                arrow_head: false,
            }),
            adjust: Some(15_000),
            shadow: true,
            paragraphs: &paragraphs,
            style: &style,
            body: BodyLayout::default(),
        };

        let doc = parse_slide(&slide_xml(&shape.to_xml())).unwrap();
        let parsed = &doc.shapes[0].shape;
        assert_eq!(parsed.id, 4);
        assert_eq!(parsed.kind, ShapeKind::AutoShape);
        assert_eq!(parsed.fill, Some(Rgb(232, 244, 248)));
        assert_eq!(parsed.rect, Some(Rect::new(100, 200, 300, 400)));
        assert_eq!(parsed.text(), "Step 1");
    }

    #[test]
    fn test_connector_flips_backwards_arrow() {
        let outline = Outline {
            color: Rgb(70, 70, 70),
            width: 31_750,
            arrow_head: true,
        };
        let xml = connector_xml(9, (500, 100), (100, 300), Some((2, 3)), outline);
        assert!(xml.contains(r#"flipH="1""#));
        assert!(!xml.contains("flipV"));
        assert!(xml.contains(r#"<a:tailEnd type="triangle"/>"#));

        let doc = parse_slide(&slide_xml(&xml)).unwrap();
        assert_eq!(doc.shapes[0].shape.kind, ShapeKind::Line);
        assert_eq!(doc.shapes[0].shape.rect, Some(Rect::new(100, 100, 400, 200)));
    }
}
