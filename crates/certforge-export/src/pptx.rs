//! Presentation templates.
//!
//! Only top-level shapes on each slide are considered (`p:sld/p:cSld/p:spTree/p:sp`).
//! Substitution is run-local: each `a:r` keeps its own properties, and a
//! placeholder whose `{{` and `}}` fall in different runs is left as-is.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use certforge_core::models::context::RenderContext;
use quick_xml::events::Event;
use tracing::debug;

use crate::error::ExportError;
use crate::package::Package;
use crate::xml;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Element path of a top-level shape, by local name.
const SHAPE_PATH: [&[u8]; 4] = [b"sld", b"cSld", b"spTree", b"sp"];

/// Element path of a paragraph inside a top-level shape.
const PARAGRAPH_PATH: [&[u8]; 6] = [b"sld", b"cSld", b"spTree", b"sp", b"txBody", b"p"];

/// Element path of field text (slide numbers, dates) inside a paragraph.
const FIELD_TEXT_PATH: [&[u8]; 8] = [b"sld", b"cSld", b"spTree", b"sp", b"txBody", b"p", b"fld", b"t"];

/// Element path of run text inside a top-level shape.
const RUN_TEXT_PATH: [&[u8]; 8] = [b"sld", b"cSld", b"spTree", b"sp", b"txBody", b"p", b"r", b"t"];

/// Slide part names in presentation order.
///
/// The order comes from the slide id list in `ppt/presentation.xml`, resolved
/// through its relationships. Falls back to numeric part order when that
/// list cannot be resolved.
pub fn slide_parts(package: &mut Package) -> Result<Vec<String>, ExportError> {
    let ordered = ordered_slide_parts(package)?;
    if !ordered.is_empty() {
        return Ok(ordered);
    }

    let mut numbered: Vec<(u32, String)> = package
        .part_names()
        .into_iter()
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name))
        })
        .collect();
    numbered.sort();
    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

fn ordered_slide_parts(package: &mut Package) -> Result<Vec<String>, ExportError> {
    let (Some(presentation), Some(rels)) = (
        package.read_part(PRESENTATION_PART)?,
        package.read_part(PRESENTATION_RELS)?,
    ) else {
        return Ok(Vec::new());
    };

    let mut targets = HashMap::new();
    for event in xml::parse_events(&rels)? {
        if let Event::Start(e) | Event::Empty(e) = &event {
            if e.local_name().as_ref() == b"Relationship" {
                if let (Some(id), Some(target)) =
                    (xml::attribute(e, b"Id"), xml::attribute(e, b"Target"))
                {
                    targets.insert(id, resolve_target(&target));
                }
            }
        }
    }

    let mut parts = Vec::new();
    for event in xml::parse_events(&presentation)? {
        if let Event::Start(e) | Event::Empty(e) = &event {
            if e.local_name().as_ref() == b"sldId" {
                let part = xml::attribute_ending_with(e, b":id").and_then(|id| targets.get(&id));
                if let Some(part) = part {
                    if package.has_part(part) {
                        parts.push(part.clone());
                    }
                }
            }
        }
    }
    Ok(parts)
}

/// Relationship targets are relative to `ppt/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target.trim_start_matches("./")),
    }
}

/// Text of every top-level shape on every slide, each shape followed by a
/// newline. Paragraphs inside a shape are separated by `\n`; line breaks
/// inside a paragraph become a vertical tab.
pub fn deck_text(package: &mut Package) -> Result<String, ExportError> {
    let mut text = String::new();
    for part in slide_parts(package)? {
        let xml = package.require_part(&part)?;
        for shape in shape_texts(&xml)? {
            text.push_str(&shape);
            text.push('\n');
        }
    }
    Ok(text)
}

fn shape_texts(slide_xml: &str) -> Result<Vec<String>, ExportError> {
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut shapes = Vec::new();
    let mut paragraphs: Option<Vec<String>> = None;

    for event in xml::parse_events(slide_xml)? {
        match &event {
            Event::Start(e) => {
                stack.push(xml::local_name(e));
                if path_is(&stack, &SHAPE_PATH) {
                    paragraphs = Some(Vec::new());
                } else if path_is(&stack, &PARAGRAPH_PATH) {
                    if let Some(paragraphs) = paragraphs.as_mut() {
                        paragraphs.push(String::new());
                    }
                }
            }
            Event::Empty(e) => {
                let is_break = e.local_name().as_ref() == b"br"
                    && path_is(&stack, &PARAGRAPH_PATH);
                if is_break {
                    if let Some(current) = paragraphs.as_mut().and_then(|p| p.last_mut()) {
                        current.push('\u{b}');
                    }
                }
            }
            Event::Text(t) => {
                let in_run =
                    path_is(&stack, &RUN_TEXT_PATH) || path_is(&stack, &FIELD_TEXT_PATH);
                if in_run {
                    if let Some(current) = paragraphs.as_mut().and_then(|p| p.last_mut()) {
                        current.push_str(&xml::text_of(t)?);
                    }
                }
            }
            Event::End(_) => {
                if path_is(&stack, &SHAPE_PATH) {
                    if let Some(done) = paragraphs.take() {
                        shapes.push(done.join("\n"));
                    }
                }
                stack.pop();
            }
            _ => {}
        }
    }

    Ok(shapes)
}

fn path_is(stack: &[Vec<u8>], path: &[&[u8]]) -> bool {
    stack.len() == path.len() && stack.iter().zip(path).all(|(a, b)| a.as_slice() == *b)
}

/// Render a `.pptx` template for one row, writing the result to `dest`.
pub fn render_pptx(
    template: &Path,
    context: &RenderContext,
    dest: &Path,
) -> Result<(), ExportError> {
    let mut package = Package::open(template)?;

    let mut replacements = BTreeMap::new();
    for part in slide_parts(&mut package)? {
        let original = package.require_part(&part)?;
        if let Some(rendered) = render_slide(&original, context)? {
            debug!(part = %part, "substituted placeholders");
            replacements.insert(part, rendered);
        }
    }

    package.write_with_parts(dest, &replacements)
}

/// Replace placeholders run by run. `None` when the slide is unchanged.
fn render_slide(original: &str, context: &RenderContext) -> Result<Option<String>, ExportError> {
    let mut events = xml::parse_events(original)?;
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut changed = false;

    for index in 0..events.len() {
        let replacement = match &events[index] {
            Event::Start(e) => {
                stack.push(xml::local_name(e));
                None
            }
            Event::End(_) => {
                stack.pop();
                None
            }
            Event::Text(t) if path_is(&stack, &RUN_TEXT_PATH) => {
                let text = xml::text_of(t)?;
                let rendered = substitute_run(&text, context);
                (rendered != text).then_some(rendered)
            }
            _ => None,
        };
        if let Some(text) = replacement {
            events[index] = xml::text_event(&text);
            changed = true;
        }
    }

    if !changed {
        return Ok(None);
    }
    xml::write_events(&events).map(Some)
}

/// Replace every literal `{{variable}}` in a single run's text.
pub fn substitute_run(text: &str, context: &RenderContext) -> String {
    let mut out = text.to_string();
    for (variable, value) in context.iter() {
        let placeholder = format!("{{{{{variable}}}}}");
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, value);
        }
    }
    out
}
