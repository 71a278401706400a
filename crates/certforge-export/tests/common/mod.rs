#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use docx_rs::{Docx, Paragraph, Run};
use zip::write::SimpleFileOptions;

pub const SLIDE_NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// Write a `.docx` whose paragraphs are given as lists of runs.
/// A run prefixed with `*` is bold.
pub fn write_docx(dir: &Path, name: &str, paragraphs: &[&[&str]]) -> PathBuf {
    let mut docx = Docx::new();
    for runs in paragraphs {
        let mut para = Paragraph::new();
        for text in *runs {
            let run = match text.strip_prefix('*') {
                Some(bold) => Run::new().add_text(bold).bold(),
                None => Run::new().add_text(*text),
            };
            para = para.add_run(run);
        }
        docx = docx.add_paragraph(para);
    }
    save_docx(dir, name, docx)
}

pub fn save_docx(dir: &Path, name: &str, docx: Docx) -> PathBuf {
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, buf.into_inner()).unwrap();
    path
}

/// One text shape whose paragraphs are lists of `(run properties, text)`.
pub fn text_shape(id: u32, paragraphs: &[&[(&str, &str)]]) -> String {
    let mut body = String::new();
    for runs in paragraphs {
        body.push_str("<a:p>");
        for (props, text) in *runs {
            body.push_str(&format!("<a:r>{props}<a:t>{text}</a:t></a:r>"));
        }
        body.push_str("</a:p>");
    }
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#
    )
}

pub fn slide(shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {SLIDE_NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
        shapes.concat()
    )
}

/// Write a `.pptx` with the given slides. `order` lists slide numbers
/// (1-based) in presentation order.
pub fn write_pptx(dir: &Path, name: &str, slides: &[String], order: &[usize]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for n in 1..=slides.len() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{n}.xml"/>"#,
            n + 1
        ));
    }
    rels.push_str("</Relationships>");

    let mut ids = String::new();
    for (i, n) in order.iter().enumerate() {
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, n + 1));
    }
    let presentation = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {SLIDE_NS}><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#
    );

    let mut parts = vec![
        (
            "[Content_Types].xml".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#
                .to_string(),
        ),
        ("ppt/presentation.xml".to_string(), presentation),
        ("ppt/_rels/presentation.xml.rels".to_string(), rels),
    ];
    for (i, slide) in slides.iter().enumerate() {
        parts.push((format!("ppt/slides/slide{}.xml", i + 1), slide.clone()));
    }

    for (name, body) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}

pub fn read_part(path: &Path, part: &str) -> String {
    let mut package = certforge_export::package::Package::open(path).unwrap();
    package.require_part(part).unwrap()
}
