//! Document Helper API tests against saved and reopened files.

use deckwright::{
    distribute_horizontally, Deck, Error, ImagePlacement, OoxmlContainer, Rect, Rgb, RoundedBox,
    ShapeKind, ShapePreset, SlideLayout, TextStyle,
};
use std::path::{Path, PathBuf};

const INCH: i64 = 914_400;

fn single_slide(dir: &Path, title: &str) -> PathBuf {
    let path = dir.join(format!("{}.pptx", title));
    let mut deck = Deck::create().unwrap();
    deck.add_slide(SlideLayout::Title, Some(title)).unwrap();
    deck.save(&path).unwrap();
    path
}

fn inches(l: f64, t: f64, w: f64, h: f64) -> Rect {
    let emu = |v: f64| (v * INCH as f64) as i64;
    Rect::new(emu(l), emu(t), emu(w), emu(h))
}

fn slide_xml(path: &Path, n: usize) -> String {
    OoxmlContainer::open(path)
        .unwrap()
        .read_xml(&format!("ppt/slides/slide{}.xml", n))
        .unwrap()
}

#[test]
fn test_load_and_get_slide() {
    let dir = tempfile::tempdir().unwrap();
    let path = single_slide(dir.path(), "load_and_get_slide");

    let deck = Deck::open(&path).unwrap();
    assert_eq!(deck.slide_count(), 1);
    let slide = deck.slide(0).unwrap();
    assert_eq!(slide.title().as_deref(), Some("load_and_get_slide"));
    assert_eq!(slide.layout, "Title Slide");

    assert!(matches!(
        deck.slide(1),
        Err(Error::SlideOutOfRange { index: 1, count: 1 })
    ));
}

#[test]
fn test_delete_shapes_except_title() {
    let dir = tempfile::tempdir().unwrap();
    let path = single_slide(dir.path(), "delete_shapes_except");

    let mut deck = Deck::open(&path).unwrap();
    deck.add_text_box(0, "temp", inches(1.0, 3.0, 2.0, 1.0), &TextStyle::default())
        .unwrap();
    let removed = deck.delete_shapes_except(0, &[], true).unwrap();
    assert!(removed >= 1);
    deck.save(&path).unwrap();

    let slide = Deck::open(&path).unwrap().slide(0).unwrap();
    let texts: Vec<String> = slide
        .shapes
        .iter()
        .filter(|s| s.has_text_frame)
        .map(|s| s.text())
        .collect();
    assert_eq!(texts, ["delete_shapes_except"]);
}

#[test]
fn test_delete_shapes_except_unknown_id() {
    let mut deck = Deck::create().unwrap();
    deck.add_slide(SlideLayout::Blank, None).unwrap();
    assert!(matches!(
        deck.delete_shapes_except(0, &[42], false),
        Err(Error::ShapeNotFound { slide: 1, .. })
    ));
}

#[test]
fn test_remove_connectors_and_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = single_slide(dir.path(), "remove_connectors_and_lines");

    let mut deck = Deck::open(&path).unwrap();
    let look = RoundedBox::default();
    let a = deck.add_rounded_text_box(0, "A", inches(1.0, 3.0, 2.0, 1.0), &look).unwrap();
    let b = deck.add_rounded_text_box(0, "B", inches(4.0, 3.0, 2.0, 1.0), &look).unwrap();
    deck.add_arrow_between(0, a, b, None, None).unwrap();
    assert_eq!(deck.remove_connectors_and_lines(0).unwrap(), 1);
    deck.save(&path).unwrap();

    let slide = Deck::open(&path).unwrap().slide(0).unwrap();
    assert!(slide.shapes.iter().all(|s| !s.is_line()));
    assert!(slide.shape(a).is_some());
    assert!(slide.shape(b).is_some());
}

#[test]
fn test_add_rounded_text_box() {
    let dir = tempfile::tempdir().unwrap();
    let path = single_slide(dir.path(), "add_rounded_textbox");

    let mut deck = Deck::open(&path).unwrap();
    let id = deck
        .add_rounded_text_box(0, "Hello", inches(1.0, 3.0, 3.0, 1.5), &RoundedBox::default())
        .unwrap();
    deck.save(&path).unwrap();

    let slide = Deck::open(&path).unwrap().slide(0).unwrap();
    let shape = slide.shape(id).unwrap();
    assert!(shape.has_text_frame);
    assert_eq!(shape.text(), "Hello");
    assert_eq!(shape.kind, ShapeKind::AutoShape);
    assert_eq!(shape.preset.as_deref(), Some("roundRect"));
    assert_eq!(shape.fill, Some(Rgb(232, 244, 248)));

    let xml = slide_xml(&path, 1);
    assert!(xml.contains(r#"wrap="square""#));
    assert!(xml.contains(r#"anchor="ctr""#));
    assert!(xml.contains("<a:outerShdw"));
}

#[test]
fn test_add_arrow_between() {
    let dir = tempfile::tempdir().unwrap();
    let path = single_slide(dir.path(), "add_arrow_between");

    let mut deck = Deck::open(&path).unwrap();
    let (slide_width, _) = deck.slide_size();
    let lefts = distribute_horizontally(slide_width, 2, 2 * INCH, INCH);
    let look = RoundedBox::default();
    let left = deck
        .add_rounded_text_box(0, "Left", Rect::new(lefts[0], 3 * INCH, 2 * INCH, 3 * INCH / 2), &look)
        .unwrap();
    let right = deck
        .add_rounded_text_box(0, "Right", Rect::new(lefts[1], 3 * INCH, 2 * INCH, 3 * INCH / 2), &look)
        .unwrap();

    let before = deck.slide(0).unwrap().shapes.len();
    let arrow = deck
        .add_arrow_between(0, left, right, Some(Rgb(10, 20, 30)), Some(3.0))
        .unwrap();
    deck.save(&path).unwrap();

    let slide = Deck::open(&path).unwrap().slide(0).unwrap();
    assert_eq!(slide.shapes.len(), before + 1);
    let connector = slide.shape(arrow).unwrap();
    assert_eq!(connector.kind, ShapeKind::Line);
    let rect = connector.rect.unwrap();
    assert_eq!(rect.left, lefts[0] + 2 * INCH);
    assert_eq!(rect.left + rect.width, lefts[1]);

    let xml = slide_xml(&path, 1);
    assert!(xml.contains(r#"<a:srgbClr val="0A141E"/>"#));
    assert!(xml.contains(r#"<a:tailEnd type="triangle"/>"#));
    assert!(xml.contains(r#"w="38100""#));
}

#[test]
fn test_arrow_to_missing_shape_fails() {
    let mut deck = Deck::create().unwrap();
    deck.add_slide(SlideLayout::Blank, None).unwrap();
    let a = deck
        .add_shape(0, ShapePreset::Ellipse, inches(1.0, 1.0, 1.0, 1.0), None, None, &TextStyle::default())
        .unwrap();
    assert!(matches!(
        deck.add_arrow_between(0, a, 77, None, None),
        Err(Error::ShapeNotFound { .. })
    ));
}

#[test]
fn test_distribute_horizontally() {
    let deck = Deck::create().unwrap();
    let (slide_width, _) = deck.slide_size();
    let positions = distribute_horizontally(slide_width, 3, 2 * INCH, INCH / 2);
    assert_eq!(positions.len(), 3);
    assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    assert!(positions[2] + 2 * INCH - positions[0] <= slide_width);
}

#[test]
fn test_add_title_and_content_slide_with_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("body.pptx");

    let mut deck = Deck::create().unwrap();
    let index = deck.add_slide(SlideLayout::TitleAndContent, Some("Agenda")).unwrap();
    deck.set_body_text(index, &["First".to_string(), "Second".to_string()])
        .unwrap();
    deck.save(&path).unwrap();

    let slide = Deck::open(&path).unwrap().slide(0).unwrap();
    assert_eq!(slide.title().as_deref(), Some("Agenda"));
    let body = slide
        .shapes
        .iter()
        .find(|s| !s.is_title() && s.kind == ShapeKind::Placeholder)
        .unwrap();
    assert_eq!(body.paragraphs, ["First", "Second"]);
}

#[test]
fn test_delete_slide_keeps_order() {
    let mut deck = Deck::create().unwrap();
    for title in ["One", "Two", "Three"] {
        deck.add_slide(SlideLayout::TitleOnly, Some(title)).unwrap();
    }
    deck.delete_slide(1).unwrap();

    let bytes = deck.to_bytes().unwrap();
    let reopened = Deck::from_bytes(bytes).unwrap();
    let titles: Vec<Option<String>> = reopened.slides().unwrap().iter().map(|s| s.title()).collect();
    assert_eq!(titles, [Some("One".to_string()), Some("Three".to_string())]);
}

#[test]
fn test_add_image_scales_to_width() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("logo.png");
    image::RgbImage::new(40, 20).save(&image_path).unwrap();

    let mut deck = Deck::create().unwrap();
    deck.add_slide(SlideLayout::Blank, None).unwrap();
    let id = deck
        .add_image(
            0,
            &image_path,
            ImagePlacement {
                left: INCH,
                top: INCH,
                width: Some(2 * INCH),
                height: None,
            },
        )
        .unwrap();

    let path = dir.path().join("image.pptx");
    deck.save(&path).unwrap();

    let slide = Deck::open(&path).unwrap().slide(0).unwrap();
    let picture = slide.shape(id).unwrap();
    assert_eq!(picture.kind, ShapeKind::Picture);
    assert_eq!(picture.rect.unwrap().height, INCH);

    let package = OoxmlContainer::open(&path).unwrap();
    assert!(package.exists("ppt/media/image1.png"));
    assert_eq!(
        package.content_types().unwrap().content_type_of("ppt/media/image1.png"),
        Some("image/png")
    );
}

#[test]
fn test_add_image_rejects_non_images() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("notes.png");
    std::fs::write(&bogus, b"plain text").unwrap();

    let mut deck = Deck::create().unwrap();
    deck.add_slide(SlideLayout::Blank, None).unwrap();
    let result = deck.add_image(0, &bogus, ImagePlacement { left: 0, top: 0, width: None, height: None });
    assert!(matches!(result, Err(Error::Image(_))));
}
