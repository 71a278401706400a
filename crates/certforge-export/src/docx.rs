//! Word-processing templates.
//!
//! Substitution works on the logical text of each paragraph rather than on
//! individual runs: Word routinely splits `{{name}}` into several `w:r`
//! elements (spell-check marks, revision ids, partial formatting), so the
//! text of all `w:t` nodes in a paragraph is stitched together, placeholders
//! are located in that string, and the edits are mapped back onto the nodes.

use std::collections::BTreeMap;
use std::path::Path;

use certforge_core::models::context::RenderContext;
use quick_xml::events::Event;
use tracing::debug;

use crate::error::ExportError;
use crate::package::Package;
use crate::placeholders::find_placeholders;
use crate::xml;

const DOCUMENT_PART: &str = "word/document.xml";

/// Text of every top-level body paragraph, one paragraph per line.
///
/// Runs inside hyperlinks and other inline wrappers count; paragraphs nested
/// in text boxes and table cells do not.
pub fn document_text(package: &mut Package) -> Result<String, ExportError> {
    let xml = package.require_part(DOCUMENT_PART)?;
    let mut reader = quick_xml::Reader::from_str(&xml);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExportError::invalid_template(package.path(), e))?;
        match event {
            Event::Start(e) => {
                let name = xml::local_name(&e);
                if name == b"p" && is_body_paragraph(&stack) {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                if let Some(text) = current.as_mut() {
                    if in_own_run(&stack) {
                        match e.local_name().as_ref() {
                            b"tab" => text.push('\t'),
                            b"br" | b"cr" => text.push('\n'),
                            _ => {}
                        }
                    }
                }
            }
            Event::Text(t) => {
                if let Some(text) = current.as_mut() {
                    let in_text = stack.last().is_some_and(|n| n == b"t");
                    if in_text && in_own_run(&stack[..stack.len() - 1]) {
                        text.push_str(&xml::text_of(&t)?);
                    }
                }
            }
            Event::End(_) => {
                let name = stack.pop();
                if name.as_deref() == Some(b"p".as_slice()) && is_body_paragraph(&stack) {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Inside `document/body`, so the next `p` opened here is a top-level paragraph.
fn is_body_paragraph(stack: &[Vec<u8>]) -> bool {
    stack.len() == 2 && stack[1] == b"body"
}

/// The innermost open element is a run belonging to the top-level paragraph
/// (no nested paragraph between them).
fn in_own_run(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|n| n == b"r")
        && stack.iter().rposition(|n| n == b"p") == Some(2)
}

/// Parts whose paragraphs are rendered: the body plus headers and footers.
fn renderable_parts(package: &Package) -> Vec<String> {
    package
        .part_names()
        .into_iter()
        .filter(|name| {
            name == DOCUMENT_PART
                || (name.starts_with("word/header") || name.starts_with("word/footer"))
                    && name.ends_with(".xml")
                    && !name.contains("/_rels/")
        })
        .collect()
}

/// Render a `.docx` template for one row, writing the result to `dest`.
pub fn render_docx(
    template: &Path,
    context: &RenderContext,
    dest: &Path,
) -> Result<(), ExportError> {
    let mut package = Package::open(template)?;
    if !package.has_part(DOCUMENT_PART) {
        return Err(ExportError::invalid_template(
            template,
            format!("missing part {DOCUMENT_PART}"),
        ));
    }

    let mut replacements = BTreeMap::new();
    for part in renderable_parts(&package) {
        let Some(original) = package.read_part(&part)? else {
            continue;
        };
        if let Some(rendered) = render_part(&original, context)? {
            debug!(part = %part, "substituted placeholders");
            replacements.insert(part, rendered);
        }
    }

    package.write_with_parts(dest, &replacements)
}

/// A `w:t` text event and the start tag that owns it.
struct TextSlot {
    start_index: usize,
    text_index: usize,
    text: String,
}

/// Substitute placeholders in one XML part. `None` when nothing changed.
fn render_part(original: &str, context: &RenderContext) -> Result<Option<String>, ExportError> {
    let mut events = xml::parse_events(original)?;
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut open_paragraphs: Vec<Vec<TextSlot>> = Vec::new();
    let mut open_text: Option<usize> = None;
    let mut changed = false;

    for index in 0..events.len() {
        let mut finished = None;
        match &events[index] {
            Event::Start(e) => {
                let name = xml::local_name(e);
                if name == b"p" {
                    open_paragraphs.push(Vec::new());
                } else if name == b"t" {
                    open_text = Some(index);
                }
                stack.push(name);
            }
            Event::Text(t) => {
                if let (Some(start_index), Some(slots)) = (open_text, open_paragraphs.last_mut())
                {
                    if stack.last().is_some_and(|n| n == b"t") {
                        slots.push(TextSlot {
                            start_index,
                            text_index: index,
                            text: xml::text_of(t)?,
                        });
                    }
                }
            }
            Event::End(_) => {
                let name = stack.pop();
                match name.as_deref() {
                    Some(b"t") => open_text = None,
                    Some(b"p") => finished = open_paragraphs.pop(),
                    _ => {}
                }
            }
            _ => {}
        }
        if let Some(slots) = finished {
            changed |= substitute_paragraph(&mut events, &slots, context);
        }
    }

    if !changed {
        return Ok(None);
    }
    xml::write_events(&events).map(Some)
}

/// Apply context values to one paragraph's text slots. Returns whether any
/// event was rewritten.
fn substitute_paragraph(
    events: &mut [Event<'static>],
    slots: &[TextSlot],
    context: &RenderContext,
) -> bool {
    if slots.is_empty() {
        return false;
    }

    let segments: Vec<&str> = slots.iter().map(|s| s.text.as_str()).collect();
    let joined = segments.concat();
    let edits: Vec<(usize, usize, &str)> = find_placeholders(&joined)
        .into_iter()
        .filter_map(|p| context.get(&p.name).map(|value| (p.start, p.end, value)))
        .collect();
    if edits.is_empty() {
        return false;
    }

    let rewritten = splice_segments(&segments, &edits);
    let mut changed = false;
    for (slot, text) in slots.iter().zip(rewritten) {
        if text == slot.text {
            continue;
        }
        events[slot.text_index] = xml::text_event(&text);
        let patched = match &events[slot.start_index] {
            Event::Start(start) => Some(xml::preserve_space(start)),
            _ => None,
        };
        if let Some(start) = patched {
            events[slot.start_index] = Event::Start(start);
        }
        changed = true;
    }
    changed
}

/// Map edits expressed as byte ranges over the concatenation of `segments`
/// back onto the individual segments.
///
/// Each edit's value is written into the segment holding the edit's first
/// byte; the remainder of the range is deleted from whichever segments it
/// covers. Edits must be sorted and non-overlapping.
pub fn splice_segments(segments: &[&str], edits: &[(usize, usize, &str)]) -> Vec<String> {
    let mut out = Vec::with_capacity(segments.len());
    let mut offset = 0;

    for segment in segments {
        let seg_start = offset;
        let seg_end = offset + segment.len();
        offset = seg_end;

        let mut text = String::with_capacity(segment.len());
        let mut cursor = seg_start;
        for &(start, end, value) in edits {
            if end <= seg_start || start >= seg_end {
                continue;
            }
            if start > cursor {
                text.push_str(&segment[cursor - seg_start..start - seg_start]);
            }
            if start >= seg_start {
                text.push_str(value);
            }
            cursor = cursor.max(end.min(seg_end));
        }
        if cursor < seg_end {
            text.push_str(&segment[cursor - seg_start..]);
        }
        out.push(text);
    }

    out
}
