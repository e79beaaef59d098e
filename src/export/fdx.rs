use std::io::Write;

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::models::{Dialog, Paragraph, RichText, Screenplay};

use super::ExportResult;

/// Renders the screenplay as an FDX interchange document into `out`.
pub fn generate_fdx<W: Write>(screenplay: &Screenplay, out: &mut W) -> ExportResult<()> {
    debug!(
        "rendering {} paragraph(s) as fdx",
        screenplay.paragraphs.len()
    );
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

    let mut root = BytesStart::new("FinalDraft");
    root.push_attribute(("DocumentType", "Script"));
    root.push_attribute(("Template", "No"));
    root.push_attribute(("Version", "1"));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("Content")))?;

    for paragraph in screenplay {
        #[allow(unreachable_patterns)]
        match paragraph {
            Paragraph::Dialog(dialog) => write_dialog(&mut writer, dialog)?,
            Paragraph::DualDialog { left, right } => {
                writer.write_event(Event::Start(BytesStart::new("Paragraph")))?;
                writer.write_event(Event::Start(BytesStart::new("DualDialogue")))?;
                write_dialog(&mut writer, left)?;
                write_dialog(&mut writer, right)?;
                writer.write_event(Event::End(BytesEnd::new("DualDialogue")))?;
                writer.write_event(Event::End(BytesEnd::new("Paragraph")))?;
            }
            Paragraph::Action { lines, centered } => {
                write_paragraph(&mut writer, "Action", lines, *centered)?;
            }
            Paragraph::Slug { line, .. } => {
                write_paragraph(&mut writer, "Scene Heading", std::slice::from_ref(line), false)?;
            }
            Paragraph::Transition { line } => {
                write_paragraph(&mut writer, "Transition", std::slice::from_ref(line), false)?;
            }
            // Outline structure and page breaks are not part of the
            // interchange vocabulary; unknown kinds are skipped too.
            Paragraph::Section { .. } | Paragraph::PageBreak => {}
            _ => {}
        }
    }

    writer.write_event(Event::End(BytesEnd::new("Content")))?;
    writer.write_event(Event::End(BytesEnd::new("FinalDraft")))?;
    Ok(())
}

fn write_dialog<W: Write>(writer: &mut Writer<&mut W>, dialog: &Dialog) -> ExportResult<()> {
    write_paragraph(
        writer,
        "Character",
        std::slice::from_ref(&dialog.character),
        false,
    )?;
    for (parenthetical, line) in &dialog.blocks {
        let paragraph_type = if *parenthetical {
            "Parenthetical"
        } else {
            "Dialogue"
        };
        write_paragraph(writer, paragraph_type, std::slice::from_ref(line), false)?;
    }
    Ok(())
}

fn write_paragraph<W: Write>(
    writer: &mut Writer<&mut W>,
    paragraph_type: &str,
    lines: &[RichText],
    centered: bool,
) -> ExportResult<()> {
    let mut start = BytesStart::new("Paragraph");
    if centered {
        start.push_attribute(("Alignment", "Center"));
    }
    start.push_attribute(("Type", paragraph_type));
    writer.write_event(Event::Start(start))?;

    let last_line = lines.len().saturating_sub(1);
    for (line_number, line) in lines.iter().enumerate() {
        write_text(writer, line, line_number != last_line)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Paragraph")))?;
    Ok(())
}

/// Writes one `<Text>` run per segment. Inside a multi-line paragraph,
/// every line but the last carries a trailing newline in its final run.
fn write_text<W: Write>(
    writer: &mut Writer<&mut W>,
    line: &RichText,
    trailing_linebreak: bool,
) -> ExportResult<()> {
    let last_segment = line.segments.len().saturating_sub(1);
    for (segment_number, segment) in line.segments.iter().enumerate() {
        let style_value = segment
            .styles
            .iter()
            .map(|style| style.name())
            .collect::<Vec<_>>()
            .join("+");

        let mut element = BytesStart::new("Text");
        if !style_value.is_empty() {
            element.push_attribute(("Style", style_value.as_str()));
        }
        writer.write_event(Event::Start(element))?;

        if trailing_linebreak && segment_number == last_segment {
            let text = format!("{}\n", segment.text);
            writer.write_event(Event::Text(BytesText::new(&text)))?;
        } else {
            writer.write_event(Event::Text(BytesText::new(&segment.text)))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Text")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render(source: &str) -> String {
        let screenplay = parse(source);
        let mut out = Vec::new();
        generate_fdx(&screenplay, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn document_has_the_final_draft_shell() {
        let fdx = render("INT. HOUSE - DAY");
        assert!(fdx.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
        assert!(fdx.contains("<FinalDraft DocumentType=\"Script\" Template=\"No\" Version=\"1\">"));
        assert!(fdx.contains("<Content>"));
        assert!(fdx.trim_end().ends_with("</FinalDraft>"));
    }

    #[test]
    fn paragraph_types_match_their_kinds() {
        let fdx = render("INT. HOUSE - DAY\n\nBOB\n(softly)\nHello.\n\nCUT TO:");
        assert!(fdx.contains("<Paragraph Type=\"Scene Heading\">"));
        assert!(fdx.contains("<Paragraph Type=\"Character\">"));
        assert!(fdx.contains("<Paragraph Type=\"Parenthetical\">"));
        assert!(fdx.contains("<Paragraph Type=\"Dialogue\">"));
        assert!(fdx.contains("<Paragraph Type=\"Transition\">"));
    }

    #[test]
    fn centered_action_is_center_aligned() {
        let fdx = render("> THE END <");
        assert!(fdx.contains("<Paragraph Alignment=\"Center\" Type=\"Action\">"));
    }

    #[test]
    fn styles_join_in_canonical_order() {
        let fdx = render("BOB\n_**both styles**_ here.");
        assert!(fdx.contains("<Text Style=\"Bold+Underline\">both styles</Text>"));
    }

    #[test]
    fn dual_dialog_nests_in_a_dual_dialogue_container() {
        let fdx = render("BOB\nHi.\n\nALICE ^\nHi yourself.");
        assert!(fdx.contains("<DualDialogue>"));
        let bob = fdx.find("<Text>BOB</Text>").unwrap();
        let alice = fdx.find("<Text>ALICE</Text>").unwrap();
        assert!(bob < alice);
        assert!(fdx.contains("</DualDialogue>"));
    }

    #[test]
    fn multi_line_action_keeps_inner_linebreaks() {
        let fdx = render("One.\nTwo.");
        assert!(fdx.contains("<Text>One.\n</Text>"));
        assert!(fdx.contains("<Text>Two.</Text>"));
    }

    #[test]
    fn text_content_is_escaped() {
        let fdx = render("Rock & roll < and > the rest.");
        assert!(fdx.contains("Rock &amp; roll &lt; and &gt; the rest."));
    }

    #[test]
    fn page_breaks_and_sections_are_skipped() {
        let fdx = render("# Act One\n\n===\n\nAction.");
        assert!(!fdx.contains("Act One"));
        assert!(fdx.contains("<Paragraph Type=\"Action\">"));
    }
}
