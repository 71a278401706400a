//! Event-level XML helpers shared by the docx and pptx renderers.
//!
//! Parts are loaded into an owned event list so renderers can patch text
//! events in place and write the part back without touching anything else.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::ExportError;

pub(crate) fn parse_events(xml: &str) -> Result<Vec<Event<'static>>, ExportError> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => events.push(event.into_owned()),
            Err(e) => {
                return Err(ExportError::Render(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }
    Ok(events)
}

pub(crate) fn write_events(events: &[Event<'static>]) -> Result<String, ExportError> {
    let mut writer = Writer::new(Vec::new());
    for event in events {
        writer
            .write_event(event.clone())
            .map_err(|e| ExportError::Render(e.to_string()))?;
    }
    String::from_utf8(writer.into_inner()).map_err(|e| ExportError::Render(e.to_string()))
}

pub(crate) fn text_of(text: &BytesText<'_>) -> Result<String, ExportError> {
    text.unescape()
        .map(|t| t.into_owned())
        .map_err(|e| ExportError::Render(e.to_string()))
}

pub(crate) fn text_event(text: &str) -> Event<'static> {
    Event::Text(BytesText::new(text).into_owned())
}

/// Local element name without namespace prefix, e.g. `t` for `w:t`.
pub(crate) fn local_name(start: &BytesStart<'_>) -> Vec<u8> {
    start.local_name().as_ref().to_vec()
}

/// Ensure leading/trailing whitespace in a text element survives.
pub(crate) fn preserve_space(start: &BytesStart<'static>) -> BytesStart<'static> {
    let has_space = start
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"xml:space");
    let mut patched = start.clone();
    if !has_space {
        patched.push_attribute(("xml:space", "preserve"));
    }
    patched
}

/// Value of the first attribute whose qualified name ends with `suffix`.
pub(crate) fn attribute_ending_with(start: &BytesStart<'_>, suffix: &[u8]) -> Option<String> {
    start
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref().ends_with(suffix))
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

pub(crate) fn attribute(start: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    start
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
