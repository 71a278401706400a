mod common;

use certforge_core::models::context::RenderContext;
use certforge_core::models::format::Template;
use certforge_export::package::Package;
use certforge_export::placeholders::extract_variables;
use certforge_export::pptx::{deck_text, slide_parts, substitute_run};
use certforge_export::render::render;

const BOLD_RED: &str = r#"<a:rPr lang="en-US" sz="3200" b="1"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:rPr>"#;
const ITALIC: &str = r#"<a:rPr lang="en-US" sz="1800" i="1"/>"#;

fn context(pairs: &[(&str, &str)]) -> RenderContext {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn award_deck(dir: &std::path::Path) -> std::path::PathBuf {
    let first = common::slide(&[
        common::text_shape(2, &[&[(BOLD_RED, "Certificate for {{name}}")]]),
        common::text_shape(3, &[&[(ITALIC, "Registration "), (ITALIC, "{{reg-id}}")], &[("", "Course: {{course}}")]]),
    ]);
    let second = common::slide(&[common::text_shape(2, &[&[("", "Signed, {{signer}}")]])]);
    common::write_pptx(dir, "award.pptx", &[first, second], &[1, 2])
}

#[test]
fn extracts_variables_from_all_slides() {
    let dir = tempfile::tempdir().unwrap();
    let path = award_deck(dir.path());

    let names: Vec<String> = extract_variables(&path).unwrap().into_iter().collect();
    assert_eq!(names, vec!["course", "name", "reg-id", "signer"]);
}

#[test]
fn slides_follow_presentation_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = common::slide(&[common::text_shape(2, &[&[("", "one")]])]);
    let second = common::slide(&[common::text_shape(2, &[&[("", "two")]])]);
    let path = common::write_pptx(dir.path(), "deck.pptx", &[first, second], &[2, 1]);

    let mut package = Package::open(&path).unwrap();
    assert_eq!(
        slide_parts(&mut package).unwrap(),
        vec!["ppt/slides/slide2.xml", "ppt/slides/slide1.xml"]
    );
    assert_eq!(deck_text(&mut package).unwrap(), "two\none\n");
}

#[test]
fn shape_text_joins_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let path = award_deck(dir.path());

    let mut package = Package::open(&path).unwrap();
    assert_eq!(
        deck_text(&mut package).unwrap(),
        "Certificate for {{name}}\nRegistration {{reg-id}}\nCourse: {{course}}\nSigned, {{signer}}\n"
    );
}

#[test]
fn renders_run_by_run_keeping_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let template = award_deck(dir.path());
    let dest = dir.path().join("out.pptx");

    render(
        &Template::from_path(&template).unwrap(),
        &context(&[
            ("name", "Jane O'Brien"),
            ("reg-id", "A-1"),
            ("course", "Rust"),
            ("signer", "Dean"),
        ]),
        &dest,
    )
    .unwrap();

    let before = common::read_part(&template, "ppt/slides/slide1.xml");
    let after = common::read_part(&dest, "ppt/slides/slide1.xml");
    assert_eq!(before.matches("<a:r>").count(), after.matches("<a:r>").count());
    assert_eq!(after.matches(BOLD_RED).count(), 1);
    assert_eq!(after.matches(ITALIC).count(), 2);

    let mut package = Package::open(&dest).unwrap();
    assert_eq!(
        deck_text(&mut package).unwrap(),
        "Certificate for Jane O'Brien\nRegistration A-1\nCourse: Rust\nSigned, Dean\n"
    );
}

#[test]
fn placeholder_split_across_runs_is_not_substituted() {
    let dir = tempfile::tempdir().unwrap();
    let slide = common::slide(&[common::text_shape(2, &[&[("", "Hello {{na"), (ITALIC, "me}}")]])]);
    let template = common::write_pptx(dir.path(), "split.pptx", &[slide], &[1]);
    let dest = dir.path().join("out.pptx");

    let names: Vec<String> = extract_variables(&template).unwrap().into_iter().collect();
    assert_eq!(names, vec!["name"]);

    render(
        &Template::from_path(&template).unwrap(),
        &context(&[("name", "Jane")]),
        &dest,
    )
    .unwrap();

    let mut package = Package::open(&dest).unwrap();
    assert_eq!(deck_text(&mut package).unwrap(), "Hello {{name}}\n");
}

#[test]
fn untouched_parts_are_copied() {
    let dir = tempfile::tempdir().unwrap();
    let template = award_deck(dir.path());
    let dest = dir.path().join("out.pptx");

    render(
        &Template::from_path(&template).unwrap(),
        &context(&[("name", "Jane")]),
        &dest,
    )
    .unwrap();

    let original = Package::open(&template).unwrap();
    let rendered = Package::open(&dest).unwrap();
    assert_eq!(original.part_names(), rendered.part_names());
    assert_eq!(
        common::read_part(&template, "ppt/presentation.xml"),
        common::read_part(&dest, "ppt/presentation.xml")
    );
    assert_eq!(
        common::read_part(&template, "ppt/slides/slide2.xml"),
        common::read_part(&dest, "ppt/slides/slide2.xml")
    );
}

#[test]
fn run_substitution_uses_literal_markers() {
    let ctx = context(&[("name", "Jane"), ("id", "7")]);
    assert_eq!(substitute_run("{{name}}-{{id}}-{{name}}", &ctx), "Jane-7-Jane");
    assert_eq!(substitute_run("{{ name }}", &ctx), "{{ name }}");
    assert_eq!(substitute_run("{{unknown}}", &ctx), "{{unknown}}");
}
