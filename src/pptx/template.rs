//! Blank presentation template.
//!
//! Builds a minimal but complete 4:3 package: one master, four layouts
//! (Title Slide, Title and Content, Title Only, Blank), a theme, and no
//! slides. PowerPoint and LibreOffice both open the result.

use crate::container::{rel_types, ContentTypes, OoxmlContainer, Relationships};
use crate::pptx::reader::DEFAULT_SLIDE_SIZE;
use serde::{Deserialize, Serialize};

/// PresentationML namespace.
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
/// DrawingML namespace.
pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// Relationships namespace used in part markup.
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Content types of presentation parts.
pub mod content_types {
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}

/// Slide layouts offered when adding slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideLayout {
    /// Centered title and subtitle
    Title,
    /// Title and a body placeholder
    TitleAndContent,
    /// Title placeholder only
    TitleOnly,
    /// No placeholders
    Blank,
}

impl SlideLayout {
    /// All layouts in template order.
    pub const ALL: [SlideLayout; 4] = [
        SlideLayout::Title,
        SlideLayout::TitleAndContent,
        SlideLayout::TitleOnly,
        SlideLayout::Blank,
    ];

    /// Layout name as shown by PowerPoint.
    pub fn display_name(&self) -> &'static str {
        match self {
            SlideLayout::Title => "Title Slide",
            SlideLayout::TitleAndContent => "Title and Content",
            SlideLayout::TitleOnly => "Title Only",
            SlideLayout::Blank => "Blank",
        }
    }

    /// Value of `p:sldLayout/@type`.
    pub fn layout_type(&self) -> &'static str {
        match self {
            SlideLayout::Title => "title",
            SlideLayout::TitleAndContent => "obj",
            SlideLayout::TitleOnly => "titleOnly",
            SlideLayout::Blank => "blank",
        }
    }
}

const TITLE_RECT: (i64, i64, i64, i64) = (457_200, 274_638, 8_229_600, 1_143_000);
const BODY_RECT: (i64, i64, i64, i64) = (457_200, 1_600_200, 8_229_600, 4_525_963);
const CENTER_TITLE_RECT: (i64, i64, i64, i64) = (685_800, 2_130_425, 7_772_400, 1_470_025);
const SUBTITLE_RECT: (i64, i64, i64, i64) = (1_371_600, 3_886_200, 6_400_800, 1_752_600);

fn xml_header() -> &'static str {
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n"
}

fn xfrm((x, y, cx, cy): (i64, i64, i64, i64)) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        x, y, cx, cy
    )
}

/// A placeholder `p:sp` for masters and layouts.
fn placeholder_sp(
    id: u32,
    name: &str,
    ph: &str,
    rect: Option<(i64, i64, i64, i64)>,
    prompt: &str,
) -> String {
    let sp_pr = match rect {
        Some(r) => format!("<p:spPr>{}</p:spPr>", xfrm(r)),
        None => "<p:spPr/>".to_string(),
    };
    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr>"#,
            r#"{sp_pr}<p:txBody><a:bodyPr/><a:lstStyle/>"#,
            r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{prompt}</a:t></a:r></a:p></p:txBody></p:sp>"#
        ),
        id = id,
        name = name,
        ph = ph,
        sp_pr = sp_pr,
        prompt = prompt,
    )
}

fn shape_tree(shapes: &str) -> String {
    format!(
        concat!(
            r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
            r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{}</p:spTree>"#
        ),
        shapes
    )
}

/// presentation.xml for the given slide id list markup (may be empty).
pub fn presentation_xml(slide_id_list: &str, width: i64, height: i64) -> String {
    format!(
        concat!(
            "{header}",
            r#"<p:presentation xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" saveSubsetFonts="1">"#,
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            "{slides}",
            r#"<p:sldSz cx="{cx}" cy="{cy}" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/>"#,
            r#"<p:defaultTextStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr>"#,
            r#"<a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
            r#"<a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
            r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr>"#,
            r#"</p:defaultTextStyle></p:presentation>"#
        ),
        header = xml_header(),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        slides = slide_id_list,
        cx = width,
        cy = height,
    )
}

fn slide_master_xml() -> String {
    let shapes = [
        placeholder_sp(2, "Title Placeholder 1", r#"<p:ph type="title"/>"#, Some(TITLE_RECT), "Click to edit Master title style"),
        placeholder_sp(3, "Text Placeholder 2", r#"<p:ph type="body" idx="1"/>"#, Some(BODY_RECT), "Click to edit Master text styles"),
    ]
    .concat();

    let layout_ids: String = (0..SlideLayout::ALL.len())
        .map(|i| {
            format!(
                r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
                2_147_483_649u32 + i as u32,
                i + 1
            )
        })
        .collect();

    format!(
        concat!(
            "{header}",
            r#"<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{tree}</p:cSld>"#,
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
            r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst>{layouts}</p:sldLayoutIdLst>"#,
            r#"<p:txStyles>"#,
            r#"<p:titleStyle><a:lvl1pPr algn="ctr" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
            r#"<a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/><a:defRPr sz="4400" kern="1200">"#,
            r#"<a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/>"#,
            r#"<a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
            r#"<p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
            r#"<a:spcBef><a:spcPct val="20000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#,
            r#"<a:defRPr sz="3200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
            r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr>"#,
            r#"<a:lvl2pPr marL="742950" indent="-285750" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
            r#"<a:spcBef><a:spcPct val="20000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8211;"/>"#,
            r#"<a:defRPr sz="2800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
            r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl2pPr>"#,
            r#"</p:bodyStyle>"#,
            r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr>"#,
            r#"<a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
            r#"<a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
            r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr>"#,
            r#"</p:otherStyle></p:txStyles></p:sldMaster>"#
        ),
        header = xml_header(),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        tree = shape_tree(&shapes),
        layouts = layout_ids,
    )
}

fn slide_layout_xml(layout: SlideLayout) -> String {
    let shapes = match layout {
        SlideLayout::Title => [
            placeholder_sp(2, "Title 1", r#"<p:ph type="ctrTitle"/>"#, Some(CENTER_TITLE_RECT), "Click to edit Master title style"),
            placeholder_sp(3, "Subtitle 2", r#"<p:ph type="subTitle" idx="1"/>"#, Some(SUBTITLE_RECT), "Click to edit Master subtitle style"),
        ]
        .concat(),
        SlideLayout::TitleAndContent => [
            placeholder_sp(2, "Title 1", r#"<p:ph type="title"/>"#, None, "Click to edit Master title style"),
            placeholder_sp(3, "Content Placeholder 2", r#"<p:ph idx="1"/>"#, None, "Click to edit Master text styles"),
        ]
        .concat(),
        SlideLayout::TitleOnly => {
            placeholder_sp(2, "Title 1", r#"<p:ph type="title"/>"#, None, "Click to edit Master title style")
        }
        SlideLayout::Blank => String::new(),
    };

    format!(
        concat!(
            "{header}",
            r#"<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="{kind}" preserve="1">"#,
            r#"<p:cSld name="{name}">{tree}</p:cSld>"#,
            r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
        ),
        header = xml_header(),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        kind = layout.layout_type(),
        name = layout.display_name(),
        tree = shape_tree(&shapes),
    )
}

/// An empty slide with the given shape markup.
pub fn slide_xml(shapes: &str) -> String {
    format!(
        concat!(
            "{header}",
            r#"<p:sld xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            r#"<p:cSld>{tree}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
        ),
        header = xml_header(),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        tree = shape_tree(shapes),
    )
}

fn solid_scheme(val: &str) -> String {
    format!(r#"<a:solidFill><a:schemeClr val="{}"/></a:solidFill>"#, val)
}

fn theme_xml() -> String {
    let colors = [
        ("dk1", r#"<a:sysClr val="windowText" lastClr="000000"/>"#),
        ("lt1", r#"<a:sysClr val="window" lastClr="FFFFFF"/>"#),
        ("dk2", r#"<a:srgbClr val="1F497D"/>"#),
        ("lt2", r#"<a:srgbClr val="EEECE1"/>"#),
        ("accent1", r#"<a:srgbClr val="4F81BD"/>"#),
        ("accent2", r#"<a:srgbClr val="C0504D"/>"#),
        ("accent3", r#"<a:srgbClr val="9BBB59"/>"#),
        ("accent4", r#"<a:srgbClr val="8064A2"/>"#),
        ("accent5", r#"<a:srgbClr val="4BACC6"/>"#),
        ("accent6", r#"<a:srgbClr val="F79646"/>"#),
        ("hlink", r#"<a:srgbClr val="0000FF"/>"#),
        ("folHlink", r#"<a:srgbClr val="800080"/>"#),
    ]
    .iter()
    .map(|(name, value)| format!("<a:{name}>{value}</a:{name}>", name = name, value = value))
    .collect::<String>();

    let phclr = solid_scheme("phClr");
    let fills = phclr.repeat(3);
    let lines = [9525, 25400, 38100]
        .iter()
        .map(|w| {
            format!(
                r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr">{}<a:prstDash val="solid"/></a:ln>"#,
                w, phclr
            )
        })
        .collect::<String>();
    let effects = "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3);

    format!(
        concat!(
            "{header}",
            r#"<a:theme xmlns:a="{a}" name="Office Theme"><a:themeElements>"#,
            r#"<a:clrScheme name="Office">{colors}</a:clrScheme>"#,
            r#"<a:fontScheme name="Office">"#,
            r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            r#"</a:fontScheme><a:fmtScheme name="Office">"#,
            r#"<a:fillStyleLst>{fills}</a:fillStyleLst>"#,
            r#"<a:lnStyleLst>{lines}</a:lnStyleLst>"#,
            r#"<a:effectStyleLst>{effects}</a:effectStyleLst>"#,
            r#"<a:bgFillStyleLst>{fills}</a:bgFillStyleLst>"#,
            r#"</a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
        ),
        header = xml_header(),
        a = NS_A,
        colors = colors,
        fills = fills,
        lines = lines,
        effects = effects,
    )
}

fn core_props_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dc:title>Presentation</dc:title><dc:creator>deckwright</dc:creator></cp:coreProperties>"#
        ),
        xml_header()
    )
}

fn app_props_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            r#"<Application>deckwright</Application><PresentationFormat>On-screen Show (4:3)</PresentationFormat>"#,
            r#"<Slides>0</Slides></Properties>"#
        ),
        xml_header()
    )
}

fn pres_props_xml() -> String {
    format!(
        r#"{}<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"/>"#,
        xml_header(),
        NS_A,
        NS_R,
        NS_P
    )
}

/// Part name of a template layout.
pub fn layout_part(index: usize) -> String {
    format!("ppt/slideLayouts/slideLayout{}.xml", index + 1)
}

/// Build a blank presentation package with no slides.
pub fn blank_presentation() -> OoxmlContainer {
    let mut package = OoxmlContainer::new();
    let mut types = ContentTypes::default();
    types.add_default("rels", content_types::RELATIONSHIPS);
    types.add_default("xml", "application/xml");

    let mut root_rels = Relationships::new();
    root_rels.add_internal(rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml");
    root_rels.add_internal(rel_types::CORE_PROPERTIES, "docProps/core.xml");
    root_rels.add_internal(rel_types::EXTENDED_PROPERTIES, "docProps/app.xml");
    package.write_relationships("", &root_rels);

    package.put_xml("docProps/core.xml", core_props_xml());
    types.add_override("docProps/core.xml", content_types::CORE_PROPERTIES);
    package.put_xml("docProps/app.xml", app_props_xml());
    types.add_override("docProps/app.xml", content_types::EXTENDED_PROPERTIES);

    let (width, height) = DEFAULT_SLIDE_SIZE;
    package.put_xml("ppt/presentation.xml", presentation_xml("", width, height));
    types.add_override("ppt/presentation.xml", content_types::PRESENTATION);

    let mut pres_rels = Relationships::new();
    pres_rels.add_internal(rel_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    pres_rels.add_internal(rel_types::PRES_PROPS, "presProps.xml");
    pres_rels.add_internal(rel_types::THEME, "theme/theme1.xml");
    package.write_relationships("ppt/presentation.xml", &pres_rels);

    package.put_xml("ppt/presProps.xml", pres_props_xml());
    types.add_override("ppt/presProps.xml", content_types::PRES_PROPS);

    package.put_xml("ppt/theme/theme1.xml", theme_xml());
    types.add_override("ppt/theme/theme1.xml", content_types::THEME);

    let master = "ppt/slideMasters/slideMaster1.xml";
    package.put_xml(master, slide_master_xml());
    types.add_override(master, content_types::SLIDE_MASTER);

    let mut master_rels = Relationships::new();
    for (i, layout) in SlideLayout::ALL.iter().enumerate() {
        let part = layout_part(i);
        package.put_xml(part.clone(), slide_layout_xml(*layout));
        types.add_override(&part, content_types::SLIDE_LAYOUT);

        let mut layout_rels = Relationships::new();
        layout_rels.add_internal(rel_types::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        package.write_relationships(&part, &layout_rels);

        master_rels.add_internal(rel_types::SLIDE_LAYOUT, format!("../slideLayouts/slideLayout{}.xml", i + 1));
    }
    master_rels.add_internal(rel_types::THEME, "../theme/theme1.xml");
    package.write_relationships(master, &master_rels);

    package.set_content_types(&types);
    package
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::reader::{parse_presentation, parse_slide};
    use crate::pptx::xml::common_slide_name;

    #[test]
    fn test_blank_presentation_parts() {
        let package = blank_presentation();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            "ppt/slideLayouts/slideLayout4.xml",
            "ppt/theme/theme1.xml",
        ] {
            assert!(package.exists(part), "missing {}", part);
        }

        let info = parse_presentation(&package.read_xml("ppt/presentation.xml").unwrap()).unwrap();
        assert!(info.slide_ids.is_empty());
        assert_eq!((info.slide_width, info.slide_height), DEFAULT_SLIDE_SIZE);
    }

    #[test]
    fn test_layout_names_and_placeholders() {
        let package = blank_presentation();
        for (i, layout) in SlideLayout::ALL.iter().enumerate() {
            let xml = package.read_xml(&layout_part(i)).unwrap();
            assert_eq!(common_slide_name(&xml).unwrap().as_deref(), Some(layout.display_name()));
        }

        let title_only = parse_slide(&package.read_xml(&layout_part(2)).unwrap()).unwrap();
        assert_eq!(title_only.shapes.len(), 1);
        assert!(title_only.shapes[0].shape.is_title());

        let blank = parse_slide(&package.read_xml(&layout_part(3)).unwrap()).unwrap();
        assert!(blank.shapes.is_empty());
    }

    #[test]
    fn test_content_types_registered() {
        let types = blank_presentation().content_types().unwrap();
        assert_eq!(
            types.content_type_of("ppt/presentation.xml"),
            Some(content_types::PRESENTATION)
        );
        assert_eq!(
            types.content_type_of("ppt/slideLayouts/_rels/slideLayout1.xml.rels"),
            Some(content_types::RELATIONSHIPS)
        );
    }

    #[test]
    fn test_layout_serde_names() {
        let layout: SlideLayout = serde_json::from_str("\"title_only\"").unwrap();
        assert_eq!(layout, SlideLayout::TitleOnly);
    }
}
