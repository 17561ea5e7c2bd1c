//! Byte-span helpers for editing XML parts in place.
//!
//! Parts are edited by splicing new markup into the original text, so
//! anything the reader does not understand survives untouched.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ops::Range;
use unicode_normalization::UnicodeNormalization;

/// Location of an element inside a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    /// From `<` of the start tag to after `>` of the end tag
    pub outer: Range<usize>,
    /// Content between the tags; `None` for empty elements
    pub inner: Option<Range<usize>>,
}

/// Escape text for use in element content or attribute values.
///
/// Text is normalized to NFC first so composed and decomposed input
/// produce the same slide content.
pub fn escape_text(text: &str) -> String {
    let normalized: String = text.nfc().collect();
    quick_xml::escape::escape(normalized.as_str()).into_owned()
}

/// Value of an attribute matched by its exact (possibly prefixed) key.
pub fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| {
            a.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned())
        })
}

/// Value of a prefixed relationship id attribute (`r:id`, `r:embed`, ...).
pub fn rel_attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == local)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Parse an integer attribute.
pub fn int_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// Find the first element with the given local name.
pub fn find_element(xml: &str, local: &str) -> Result<Option<ElementSpan>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut depth = 0usize;
    let mut open: Option<(usize, usize, usize)> = None;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if open.is_none() && e.local_name().as_ref() == local.as_bytes() {
                    open = Some((before, reader.buffer_position() as usize, depth));
                }
            }
            Event::Empty(e) => {
                if open.is_none() && e.local_name().as_ref() == local.as_bytes() {
                    return Ok(Some(ElementSpan {
                        outer: before..reader.buffer_position() as usize,
                        inner: None,
                    }));
                }
            }
            Event::End(_) => {
                if let Some((start, inner_start, open_depth)) = open {
                    if depth == open_depth {
                        return Ok(Some(ElementSpan {
                            outer: start..reader.buffer_position() as usize,
                            inner: Some(inner_start..before),
                        }));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Replace a byte range of `xml`.
pub fn splice(xml: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(xml.len() + replacement.len());
    out.push_str(&xml[..range.start]);
    out.push_str(replacement);
    out.push_str(&xml[range.end..]);
    out
}

/// Make sure the root element declares `xmlns:<prefix>`.
pub fn ensure_namespace(xml: &str, prefix: &str, uri: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let declared = format!("xmlns:{}", prefix);
                if attr(&e, declared.as_bytes()).is_some() {
                    return Ok(xml.to_string());
                }
                let close = reader.buffer_position() as usize - 1;
                return Ok(splice(
                    xml,
                    close..close,
                    &format!(r#" {}="{}""#, declared, uri),
                ));
            }
            Event::Eof => return Err(Error::InvalidData("part has no root element".into())),
            _ => {}
        }
    }
}

/// Attribute of the root element.
pub fn root_attr(xml: &str, key: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => return Ok(attr(&e, key.as_bytes())),
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Display name of a slide, layout or master (`p:cSld/@name`).
pub fn common_slide_name(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"cSld" => {
                return Ok(attr(&e, b"name"));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
