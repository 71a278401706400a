mod common;

use certforge_core::models::context::RenderContext;
use certforge_core::models::format::Template;
use certforge_export::docx::document_text;
use certforge_export::error::ExportError;
use certforge_export::package::Package;
use certforge_export::placeholders::extract_variables;
use certforge_export::render::render;
use docx_rs::{
    Docx, Footer, Header, Hyperlink, HyperlinkType, Paragraph, Run, Table, TableCell, TableRow,
};

fn context(pairs: &[(&str, &str)]) -> RenderContext {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn rendered_text(path: &std::path::Path) -> String {
    let mut package = Package::open(path).unwrap();
    document_text(&mut package).unwrap()
}

#[test]
fn extracts_variables_from_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_docx(
        dir.path(),
        "award.docx",
        &[
            &["Certificate of Completion"],
            &["Awarded to {{name}} ({{reg-id}})"],
            &["for {{course}}, again {{name}}"],
        ],
    );

    let names: Vec<String> = extract_variables(&path).unwrap().into_iter().collect();
    assert_eq!(names, vec!["course", "name", "reg-id"]);
}

#[test]
fn extraction_sees_placeholders_split_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_docx(dir.path(), "split.docx", &[&["Score: {{", "*x", "}}"]]);

    let names: Vec<String> = extract_variables(&path).unwrap().into_iter().collect();
    assert_eq!(names, vec!["x"]);
}

#[test]
fn renders_every_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    let template = common::write_docx(
        dir.path(),
        "award.docx",
        &[&["{{x}} and {{x}}"], &["again {{ x }}"]],
    );
    let dest = dir.path().join("out.docx");

    render(
        &Template::from_path(&template).unwrap(),
        &context(&[("x", "5")]),
        &dest,
    )
    .unwrap();

    assert_eq!(rendered_text(&dest), "5 and 5\nagain 5");
}

#[test]
fn renders_placeholders_split_across_formatting_runs() {
    let dir = tempfile::tempdir().unwrap();
    let template = common::write_docx(dir.path(), "split.docx", &[&["Score: {{", "*x", "}} points"]]);
    let dest = dir.path().join("out.docx");

    render(
        &Template::from_path(&template).unwrap(),
        &context(&[("x", "5")]),
        &dest,
    )
    .unwrap();

    assert_eq!(rendered_text(&dest), "Score: 5 points");
    let xml = common::read_part(&dest, "word/document.xml");
    assert!(!xml.contains("{{"));
    assert!(!xml.contains("}}"));
}

#[test]
fn unknown_placeholders_are_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let template = common::write_docx(dir.path(), "award.docx", &[&["{{name}} / {{other}}"]]);
    let dest = dir.path().join("out.docx");

    render(
        &Template::from_path(&template).unwrap(),
        &context(&[("name", "Jane & Co <3>")]),
        &dest,
    )
    .unwrap();

    assert_eq!(rendered_text(&dest), "Jane & Co <3> / {{other}}");
    let xml = common::read_part(&dest, "word/document.xml");
    assert!(xml.contains("Jane &amp; Co &lt;3&gt;"));
}

#[test]
fn template_file_is_never_modified() {
    let dir = tempfile::tempdir().unwrap();
    let template = common::write_docx(dir.path(), "award.docx", &[&["Hello {{name}}"]]);
    let before = std::fs::read(&template).unwrap();
    let dest = dir.path().join("out.docx");

    render(
        &Template::from_path(&template).unwrap(),
        &context(&[("name", "Jane")]),
        &dest,
    )
    .unwrap();

    assert_eq!(std::fs::read(&template).unwrap(), before);
    assert_eq!(rendered_text(&template), "Hello {{name}}");
}

#[test]
fn non_zip_template_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.docx");
    std::fs::write(&path, "plain text, not a package").unwrap();

    assert!(matches!(
        extract_variables(&path),
        Err(ExportError::InvalidTemplate { .. })
    ));

    let dest = dir.path().join("out.docx");
    let err = render(&Template::from_path(&path).unwrap(), &context(&[]), &dest).unwrap_err();
    assert!(matches!(err, ExportError::Render(_)));
    assert!(!dest.exists());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("award.odt");
    std::fs::write(&path, "x").unwrap();

    assert!(matches!(
        extract_variables(&path),
        Err(ExportError::UnsupportedFormat(ext)) if ext == ".odt"
    ));
}

fn paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn render_to(
    dir: &std::path::Path,
    template: &std::path::Path,
    pairs: &[(&str, &str)],
) -> std::path::PathBuf {
    let dest = dir.join("out.docx");
    render(&Template::from_path(template).unwrap(), &context(pairs), &dest).unwrap();
    dest
}

#[test]
fn renders_headers_and_footers() {
    let dir = tempfile::tempdir().unwrap();
    let docx = Docx::new()
        .header(Header::new().add_paragraph(paragraph("Issued to {{name}}")))
        .footer(Footer::new().add_paragraph(paragraph("Reg. {{reg-id}}")))
        .add_paragraph(paragraph("Body for {{name}}"));
    let template = common::save_docx(dir.path(), "award.docx", docx);

    let dest = render_to(dir.path(), &template, &[("name", "Jane"), ("reg-id", "R-7")]);

    let package = Package::open(&dest).unwrap();
    let headers: Vec<String> = package
        .part_names()
        .into_iter()
        .filter(|n| n.starts_with("word/header") && n.ends_with(".xml"))
        .collect();
    let footers: Vec<String> = package
        .part_names()
        .into_iter()
        .filter(|n| n.starts_with("word/footer") && n.ends_with(".xml"))
        .collect();
    assert!(!headers.is_empty());
    assert!(!footers.is_empty());

    for part in &headers {
        let xml = common::read_part(&dest, part);
        assert!(xml.contains("Issued to Jane"));
        assert!(!xml.contains("{{"));
    }
    for part in &footers {
        let xml = common::read_part(&dest, part);
        assert!(xml.contains("Reg. R-7"));
        assert!(!xml.contains("{{"));
    }
    assert_eq!(rendered_text(&dest), "Body for Jane");
}

#[test]
fn renders_placeholders_in_table_cells() {
    let dir = tempfile::tempdir().unwrap();
    let cell = TableCell::new().add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text("Course: {{"))
            .add_run(Run::new().add_text("course}}").bold()),
    );
    let docx = Docx::new()
        .add_paragraph(paragraph("Results"))
        .add_table(Table::new(vec![TableRow::new(vec![cell])]));
    let template = common::save_docx(dir.path(), "award.docx", docx);

    let dest = render_to(dir.path(), &template, &[("course", "Rust 101")]);

    let xml = common::read_part(&dest, "word/document.xml");
    assert!(xml.contains("Course: Rust 101"));
    assert!(!xml.contains("{{"));
    assert!(!xml.contains("}}"));
}

#[test]
fn renders_placeholders_split_into_a_hyperlink() {
    let dir = tempfile::tempdir().unwrap();
    let link = Hyperlink::new("https://example.com/verify", HyperlinkType::External)
        .add_run(Run::new().add_text("reg-id}}"));
    let docx = Docx::new().add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text("Verify {{"))
            .add_hyperlink(link),
    );
    let template = common::save_docx(dir.path(), "award.docx", docx);

    let dest = render_to(dir.path(), &template, &[("reg-id", "R-42")]);

    assert_eq!(rendered_text(&dest), "Verify R-42");
    let xml = common::read_part(&dest, "word/document.xml");
    assert!(!xml.contains("{{"));
    assert!(xml.contains("hyperlink"));
}

#[test]
fn failed_cleanup_of_destination_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let template = common::write_docx(dir.path(), "award.docx", &[&["Hello {{name}}"]]);
    let dest = dir.path().join("occupied.docx");
    std::fs::create_dir(&dest).unwrap();

    let err = render(
        &Template::from_path(&template).unwrap(),
        &context(&[("name", "Jane")]),
        &dest,
    )
    .unwrap_err();

    assert!(matches!(err, ExportError::Render(_)));
    assert!(dest.is_dir());
}
