//! ZIP container abstraction for OOXML packages.
//!
//! The whole package is held in memory as a map of part names to bytes.
//! Edits replace parts in the map; nothing touches the file on disk until
//! [`OoxmlContainer::save`] writes a complete new archive and renames it
//! over the target.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Name of the content types part at the package root.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const RELS_NAMESPACE: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship type URIs used by presentations.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
}

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Ordered collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a .rels part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Relationships::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        external: false,
                    };
                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"TargetMode" => rel.external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }
                    if !rel.id.is_empty() {
                        rels.add(rel);
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Get relationships by type, in document order.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.entries.iter().filter(|r| r.rel_type == rel_type).collect()
    }

    /// First relationship of the given type.
    pub fn first_of_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.entries.push(rel);
    }

    /// Add an internal relationship under a fresh ID and return that ID.
    pub fn add_internal(&mut self, rel_type: &str, target: impl Into<String>) -> String {
        let id = self.next_id();
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        });
        id
    }

    /// Remove a relationship by ID.
    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.entries.iter().position(|r| r.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// The smallest unused `rIdN`.
    pub fn next_id(&self) -> String {
        let max = self
            .entries
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Iterate relationships in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize back to a .rels part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELS_NAMESPACE));
        for rel in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                quick_xml::escape::escape(rel.id.as_str()),
                quick_xml::escape::escape(rel.rel_type.as_str()),
                quick_xml::escape::escape(rel.target.as_str()),
            ));
            if rel.external {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// The `[Content_Types].xml` part: extension defaults and per-part overrides.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Parse a content types part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = ContentTypes::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e)) => {
                    let local = e.name().local_name().as_ref().to_vec();
                    let mut key = String::new();
                    let mut content_type = String::new();
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = value,
                            b"ContentType" => content_type = value,
                            _ => {}
                        }
                    }
                    match local.as_slice() {
                        b"Default" if !key.is_empty() => {
                            types.defaults.push((key.to_ascii_lowercase(), content_type))
                        }
                        b"Override" if !key.is_empty() => types.overrides.push((key, content_type)),
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Register a default content type for an extension, if not present.
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        let ext = extension.to_ascii_lowercase();
        if !self.defaults.iter().any(|(e, _)| *e == ext) {
            self.defaults.push((ext, content_type.to_string()));
        }
    }

    /// Register or replace the override for a part (`part` without leading slash).
    pub fn add_override(&mut self, part: &str, content_type: &str) {
        let name = format!("/{}", part.trim_start_matches('/'));
        self.overrides.retain(|(p, _)| *p != name);
        self.overrides.push((name, content_type.to_string()));
    }

    /// Remove the override for a part.
    pub fn remove_override(&mut self, part: &str) {
        let name = format!("/{}", part.trim_start_matches('/'));
        self.overrides.retain(|(p, _)| *p != name);
    }

    /// Resolve the content type of a part through overrides, then defaults.
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        let name = format!("/{}", part.trim_start_matches('/'));
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| *p == name) {
            return Some(ct);
        }
        let ext = part.rsplit('.').next()?.to_ascii_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    /// Serialize back to XML.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.overrides.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, CONTENT_TYPES_NAMESPACE));
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                quick_xml::escape::escape(ext.as_str()),
                quick_xml::escape::escape(ct.as_str())
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                quick_xml::escape::escape(part.as_str()),
                quick_xml::escape::escape(ct.as_str())
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// OOXML parts are normally UTF-8, but some producers write UTF-16 with a
/// byte order mark. The XML declaration is rewritten to UTF-8 after
/// decoding so quick-xml does not try to re-decode the string.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let invalid = |e: std::string::FromUtf16Error| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    };

    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => Ok(String::from_utf8_lossy(rest).into_owned()),
        [0xFF, 0xFE, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect();
            Ok(fix_encoding_declaration(String::from_utf16(&units).map_err(invalid)?))
        }
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            Ok(fix_encoding_declaration(String::from_utf16(&units).map_err(invalid)?))
        }
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn fix_encoding_declaration(content: String) -> String {
    if !content.starts_with("<?xml") {
        return content;
    }
    match content.find("?>") {
        Some(end) => {
            let decl = content[..end + 2]
                .replace("UTF-16", "UTF-8")
                .replace("utf-16", "UTF-8");
            format!("{}{}", decl, &content[end + 2..])
        }
        None => content,
    }
}

/// OOXML package held in memory.
///
/// Provides methods to read and replace XML parts, binary parts,
/// relationships, and content types, and to write the package back out.
#[derive(Clone, Default)]
pub struct OoxmlContainer {
    parts: BTreeMap<String, Vec<u8>>,
}

impl OoxmlContainer {
    /// Create an empty package with no parts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an OOXML package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deckwright::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("slides.pptx")?;
    /// assert!(container.exists("ppt/presentation.xml"));
    /// # Ok::<(), deckwright::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Create an OOXML package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut parts = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            parts.insert(name, bytes);
        }

        Ok(Self { parts })
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self
            .parts
            .get(path)
            .ok_or_else(|| Error::MissingComponent(path.to_string()))?;
        decode_xml_bytes(bytes)
    }

    /// Read a binary part.
    pub fn read_binary(&self, path: &str) -> Result<&[u8]> {
        self.parts
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingComponent(path.to_string()))
    }

    /// Check if a part exists.
    pub fn exists(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    /// List all part names.
    pub fn list_files(&self) -> Vec<String> {
        self.parts.keys().cloned().collect()
    }

    /// List part names matching a prefix.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.parts
            .keys()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Insert or replace a part.
    pub fn put_part(&mut self, path: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(path.into(), data);
    }

    /// Insert or replace an XML part.
    pub fn put_xml(&mut self, path: impl Into<String>, xml: String) {
        self.parts.insert(path.into(), xml.into_bytes());
    }

    /// Remove a part, returning its bytes.
    pub fn remove_part(&mut self, path: &str) -> Option<Vec<u8>> {
        self.parts.remove(path)
    }

    /// Read the relationships of a part; a missing .rels part yields an empty set.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        match self.read_xml(&Self::rels_path(part_path)) {
            Ok(xml) => Relationships::parse(&xml),
            Err(Error::MissingComponent(_)) => Ok(Relationships::new()),
            Err(e) => Err(e),
        }
    }

    /// Read package-level relationships (_rels/.rels).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.read_relationships("")
    }

    /// Replace the relationships of a part.
    pub fn write_relationships(&mut self, part_path: &str, rels: &Relationships) {
        self.put_xml(Self::rels_path(part_path), rels.to_xml());
    }

    /// Read `[Content_Types].xml`.
    pub fn content_types(&self) -> Result<ContentTypes> {
        ContentTypes::parse(&self.read_xml(CONTENT_TYPES_PART)?)
    }

    /// Replace `[Content_Types].xml`.
    pub fn set_content_types(&mut self, types: &ContentTypes) {
        self.put_xml(CONTENT_TYPES_PART, types.to_xml());
    }

    /// Serialize the package to ZIP bytes, content types first.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        if let Some(types) = self.parts.get(CONTENT_TYPES_PART) {
            writer.start_file(CONTENT_TYPES_PART, options)?;
            writer.write_all(types)?;
        }
        for (name, data) in &self.parts {
            if name == CONTENT_TYPES_PART {
                continue;
            }
            writer.start_file(name.as_str(), options)?;
            writer.write_all(data)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package to `path` atomically.
    ///
    /// The archive is written to a temporary file in the target directory
    /// and renamed over the target, so a failure never leaves a partial file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        // The replacement keeps the mode of the file it replaces.
        if let Ok(existing) = fs::metadata(path) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "package saved");
        Ok(())
    }

    /// The .rels part that belongs to `part_path` (`""` for the package root).
    pub fn rels_path(part_path: &str) -> String {
        if part_path.is_empty() || part_path == "/" {
            return "_rels/.rels".to_string();
        }
        match part_path.rfind('/') {
            Some(idx) => format!("{}/_rels/{}.rels", &part_path[..idx], &part_path[idx + 1..]),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Resolve a relationship target relative to the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut segments: Vec<&str> = base.split('/').collect();
        segments.pop();
        for component in relative.split('/') {
            match component {
                ".." => {
                    segments.pop();
                }
                "." | "" => {}
                c => segments.push(c),
            }
        }
        segments.join("/")
    }

    /// Relationship target that points from `from_part` to `to_part`.
    pub fn relative_target(from_part: &str, to_part: &str) -> String {
        let mut from_dir: Vec<&str> = from_part.split('/').collect();
        from_dir.pop();
        let to: Vec<&str> = to_part.split('/').collect();
        let to_dir = &to[..to.len().saturating_sub(1)];

        let common = from_dir
            .iter()
            .zip(to_dir.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut target = "../".repeat(from_dir.len() - common);
        target.push_str(&to[common..].join("/"));
        target
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("parts", &self.parts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/presentation.xml", "slides/slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(
            OoxmlContainer::relative_target(
                "ppt/slides/slide1.xml",
                "ppt/slideLayouts/slideLayout2.xml"
            ),
            "../slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            OoxmlContainer::relative_target("ppt/presentation.xml", "ppt/slides/slide3.xml"),
            "slides/slide3.xml"
        );
        assert_eq!(
            OoxmlContainer::relative_target("", "ppt/presentation.xml"),
            "ppt/presentation.xml"
        );
    }

    #[test]
    fn test_rels_path() {
        assert_eq!(OoxmlContainer::rels_path(""), "_rels/.rels");
        assert_eq!(
            OoxmlContainer::rels_path("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
    }

    #[test]
    fn test_relationships_roundtrip_keeps_order() {
        let mut rels = Relationships::new();
        let first = rels.add_internal(rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        let second = rels.add_internal(rel_types::IMAGE, "../media/image1.png");
        assert_eq!(first, "rId1");
        assert_eq!(second, "rId2");

        let parsed = Relationships::parse(&rels.to_xml()).unwrap();
        let ids: Vec<&str> = parsed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["rId1", "rId2"]);
        assert_eq!(parsed.get_by_type(rel_types::IMAGE).len(), 1);
        assert_eq!(parsed.next_id(), "rId3");
    }

    #[test]
    fn test_content_types_lookup() {
        let mut types = ContentTypes::default();
        types.add_default("PNG", "image/png");
        types.add_override("ppt/slides/slide1.xml", "application/slide+xml");

        assert_eq!(types.content_type_of("ppt/media/image1.png"), Some("image/png"));
        assert_eq!(
            types.content_type_of("ppt/slides/slide1.xml"),
            Some("application/slide+xml")
        );

        types.remove_override("ppt/slides/slide1.xml");
        let reparsed = ContentTypes::parse(&types.to_xml()).unwrap();
        assert_eq!(reparsed.content_type_of("ppt/slides/slide1.xml"), None);
        assert_eq!(reparsed.content_type_of("a/b.png"), Some("image/png"));
    }

    #[test]
    fn test_package_bytes_roundtrip() {
        let mut container = OoxmlContainer::new();
        container.put_xml(CONTENT_TYPES_PART, ContentTypes::default().to_xml());
        container.put_xml("ppt/presentation.xml", "<p:presentation/>".to_string());

        let reopened = OoxmlContainer::from_bytes(container.to_bytes().unwrap()).unwrap();
        assert!(reopened.exists(CONTENT_TYPES_PART));
        assert_eq!(
            reopened.read_xml("ppt/presentation.xml").unwrap(),
            "<p:presentation/>"
        );
        assert!(matches!(
            reopened.read_xml("ppt/missing.xml"),
            Err(Error::MissingComponent(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.pptx");
        let mut container = OoxmlContainer::new();
        container.put_xml(CONTENT_TYPES_PART, ContentTypes::default().to_xml());
        container.save(&path).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        container.put_xml("ppt/presentation.xml", "<p:presentation/>".to_string());
        container.save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert!(OoxmlContainer::open(&path).unwrap().exists("ppt/presentation.xml"));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");
    }
}
