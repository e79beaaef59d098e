use screenwright::{
    generate_fdx, generate_html, generate_pdf, parse, HtmlOptions,
};

const SCRIPT: &str = "\
Title: Night Errand
Author: Anna Example

INT. HOUSE - NIGHT

The hallway lies in darkness.

ANNA
(whispering)
Is anyone there?

BOB ^
Nobody here but us.

CUT TO:

===

EXT. GARDEN - NIGHT

Anna crosses the grass, torch beam swinging **wildly**.
";

#[test]
fn html_export_produces_a_complete_document() {
    let screenplay = parse(SCRIPT);
    let mut out = Vec::new();
    generate_html(&screenplay, &mut out, &HtmlOptions::default()).unwrap();
    let html = String::from_utf8(out).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"), "full document shell");
    assert!(html.contains("<h6>INT. HOUSE - NIGHT</h6>"));
    assert!(html.contains("<p class=\"character\">ANNA</p>"));
    assert!(html.contains("<div class=\"dual\">"));
    assert!(html.contains("<div class=\"transition\">CUT TO:</div>"));
    assert!(
        html.contains("<h6 class=\"page-break\">EXT. GARDEN - NIGHT</h6>"),
        "the paragraph after a page break carries the marker class"
    );
    assert!(html.contains("<strong>wildly</strong>"));
}

#[test]
fn html_fragment_skips_the_document_shell() {
    let screenplay = parse(SCRIPT);
    let mut out = Vec::new();
    generate_html(&screenplay, &mut out, &HtmlOptions { bare: true }).unwrap();
    let html = String::from_utf8(out).unwrap();

    assert!(html.starts_with("<h6>INT. HOUSE - NIGHT</h6>"));
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(!html.contains("<style"));
}

#[test]
fn fdx_export_produces_interchange_paragraphs() {
    let screenplay = parse(SCRIPT);
    let mut out = Vec::new();
    generate_fdx(&screenplay, &mut out).unwrap();
    let fdx = String::from_utf8(out).unwrap();

    assert!(fdx.contains("<FinalDraft DocumentType=\"Script\""));
    assert!(fdx.contains("<Paragraph Type=\"Scene Heading\">"));
    assert!(fdx.contains("<DualDialogue>"));
    assert!(fdx.contains("<Text Style=\"Bold\">wildly</Text>"));
    assert!(fdx.contains("<Paragraph Type=\"Transition\">"));
}

#[test]
fn pdf_export_produces_a_paginated_document() {
    let screenplay = parse(SCRIPT);
    let mut out = Vec::new();
    generate_pdf(&screenplay, &mut out).unwrap();

    assert!(out.starts_with(b"%PDF-"), "pdf header");
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("Courier"), "courier family fonts");
    // Content streams are uncompressed, so body text from both sides of
    // the forced page break is visible in the output.
    assert!(text.contains("INT. HOUSE - NIGHT"));
    assert!(text.contains("EXT. GARDEN - NIGHT"));
    assert!(text.contains("Night Errand"), "synthesized title page");
}

#[test]
fn exporters_are_independent_and_repeatable() {
    let screenplay = parse(SCRIPT);

    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut scratch: Vec<u8> = Vec::new();
    generate_html(&screenplay, &mut first, &HtmlOptions { bare: true }).unwrap();
    generate_fdx(&screenplay, &mut scratch).unwrap();
    generate_html(&screenplay, &mut second, &HtmlOptions { bare: true }).unwrap();

    assert_eq!(first, second, "renderers hold no state between calls");
}
