//! Format detection for presentation packages.
//!
//! Edits are only attempted on real PowerPoint packages. Other Office Open
//! XML documents (Word, Excel) are rejected with a clear message instead of
//! failing later on a missing `ppt/presentation.xml`.

use crate::container::{decode_xml_bytes, CONTENT_TYPES_PART};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const MACRO_PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml";
const SLIDESHOW_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml";
const TEMPLATE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";

/// Kind of PowerPoint package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationKind {
    /// Regular presentation (.pptx)
    Presentation,
    /// Macro-enabled presentation (.pptm)
    MacroEnabled,
    /// Slide show (.ppsx)
    Slideshow,
    /// Template (.potx)
    Template,
}

impl PresentationKind {
    /// Returns the usual file extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            PresentationKind::Presentation => "pptx",
            PresentationKind::MacroEnabled => "pptm",
            PresentationKind::Slideshow => "ppsx",
            PresentationKind::Template => "potx",
        }
    }
}

impl std::fmt::Display for PresentationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PresentationKind::Presentation => "PowerPoint Presentation",
            PresentationKind::MacroEnabled => "PowerPoint Macro-Enabled Presentation",
            PresentationKind::Slideshow => "PowerPoint Slide Show",
            PresentationKind::Template => "PowerPoint Template",
        };
        f.write_str(name)
    }
}

/// Detect the presentation kind of a file.
///
/// # Example
///
/// ```no_run
/// use deckwright::detect::detect_presentation_from_path;
///
/// let kind = detect_presentation_from_path("slides.pptx")?;
/// println!("Detected: {}", kind);
/// # Ok::<(), deckwright::Error>(())
/// ```
pub fn detect_presentation_from_path(path: impl AsRef<Path>) -> Result<PresentationKind> {
    let file = File::open(path.as_ref())?;
    detect_presentation_from_reader(BufReader::new(file))
}

/// Detect the presentation kind of an in-memory package.
pub fn detect_presentation_from_bytes(data: &[u8]) -> Result<PresentationKind> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    detect_presentation_from_reader(std::io::Cursor::new(data))
}

/// Detect the presentation kind from a reader.
pub fn detect_presentation_from_reader<R: Read + Seek>(reader: R) -> Result<PresentationKind> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name(CONTENT_TYPES_PART) {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => return Err(Error::MissingComponent(CONTENT_TYPES_PART.to_string())),
    };

    if content_types.contains(PRESENTATION_CONTENT_TYPE) {
        return Ok(PresentationKind::Presentation);
    }
    if content_types.contains(MACRO_PRESENTATION_CONTENT_TYPE) {
        return Ok(PresentationKind::MacroEnabled);
    }
    if content_types.contains(SLIDESHOW_CONTENT_TYPE) {
        return Ok(PresentationKind::Slideshow);
    }
    if content_types.contains(TEMPLATE_CONTENT_TYPE) {
        return Ok(PresentationKind::Template);
    }

    detect_by_folder_structure(&mut archive)
}

/// Fallback for packages with unusual content types.
fn detect_by_folder_structure<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<PresentationKind> {
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    if names.iter().any(|n| n == "ppt/presentation.xml") {
        Ok(PresentationKind::Presentation)
    } else if names.iter().any(|n| n.starts_with("word/")) {
        Err(Error::UnsupportedFormat("Word document".to_string()))
    } else if names.iter().any(|n| n.starts_with("xl/")) {
        Err(Error::UnsupportedFormat("Excel workbook".to_string()))
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_presentation_from_bytes(b"not a zip");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_presentation_content_type() {
        let types = format!(r#"<Types><Override ContentType="{}"/></Types>"#, PRESENTATION_CONTENT_TYPE);
        let data = package(&[(CONTENT_TYPES_PART, &types)]);
        assert_eq!(
            detect_presentation_from_bytes(&data).unwrap(),
            PresentationKind::Presentation
        );
    }

    #[test]
    fn test_word_document_is_rejected() {
        let data = package(&[
            (CONTENT_TYPES_PART, "<Types/>"),
            ("word/document.xml", "<w:document/>"),
        ]);
        assert!(matches!(
            detect_presentation_from_bytes(&data),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_content_types() {
        let data = package(&[("ppt/presentation.xml", "<p:presentation/>")]);
        assert!(matches!(
            detect_presentation_from_bytes(&data),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PresentationKind::Presentation.to_string(), "PowerPoint Presentation");
        assert_eq!(PresentationKind::MacroEnabled.extension(), "pptm");
    }
}
