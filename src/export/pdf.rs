use std::io::Write;

use chrono::Utc;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Screenplay, Segment, Style};

use super::liner::{self, PositionedLine, PrintPage};
use super::ExportResult;

// Courier at 12 pt prints 10 characters per inch.
const POINTS_PER_CHAR: f32 = 7.2;
const FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 12.0;

// US Letter with a 1.5 inch left margin and 1 inch top margin; the other
// margins fall out of the frame size.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const LEFT_MARGIN: f32 = 108.0;
const TOP_MARGIN: f32 = 72.0;
const FRAME_WIDTH: f32 = liner::CHARACTERS_PER_LINE as f32 * POINTS_PER_CHAR;

// Baseline sits slightly above the bottom of its 12 pt slot.
const BASELINE_RISE: f32 = 3.0;
const FOOTER_Y: f32 = 30.0;

/// Renders the screenplay as a paginated PDF into `out`.
///
/// The layout comes from [`liner::lay_out`]; this backend only turns
/// positioned lines into content streams over the base-14 Courier family.
pub fn generate_pdf<W: Write>(screenplay: &Screenplay, out: &mut W) -> ExportResult<()> {
    let layout = liner::lay_out(screenplay);
    debug!("rendering {} pdf page(s)", layout.pages.len());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font_dict = lopdf::Dictionary::new();
    for (resource_name, base_font) in [
        ("F1", "Courier"),
        ("F2", "Courier-Bold"),
        ("F3", "Courier-Oblique"),
        ("F4", "Courier-BoldOblique"),
    ] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(resource_name, font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => Object::Dictionary(font_dict),
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in &layout.pages {
        let content = page_content(page);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                PAGE_WIDTH.into(),
                PAGE_HEIGHT.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal("screenwright"),
        "CreationDate" => Object::string_literal(
            format!("D:{}Z", Utc::now().format("%Y%m%d%H%M%S"))
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    doc.save_to(out)?;
    Ok(())
}

fn page_content(page: &PrintPage) -> Content {
    let mut operations: Vec<Operation> = Vec::new();
    for positioned in &page.lines {
        emit_line(&mut operations, positioned);
    }
    if let Some(number) = page.number {
        let label = format!("{}.", number);
        let x = LEFT_MARGIN + FRAME_WIDTH - label.len() as f32 * POINTS_PER_CHAR;
        emit_text(&mut operations, "F1", x, FOOTER_Y, &label);
    }
    Content { operations }
}

fn emit_line(operations: &mut Vec<Operation>, positioned: &PositionedLine) {
    let line = &positioned.line;
    let baseline =
        PAGE_HEIGHT - TOP_MARGIN - (positioned.row as f32 + 1.0) * LINE_HEIGHT + BASELINE_RISE;

    let mut x = if line.centered {
        let width = liner::display_width(&line.text) as f32 * POINTS_PER_CHAR;
        LEFT_MARGIN + (FRAME_WIDTH - width) / 2.0
    } else {
        LEFT_MARGIN + line.indent as f32 * POINTS_PER_CHAR
    };

    for segment in &line.text.segments {
        let cells = segment.text.graphemes(true).count() as f32;
        emit_text(operations, font_for(segment), x, baseline, &segment.text);
        if segment.styles.contains(&Style::Underline) {
            let width = cells * POINTS_PER_CHAR;
            operations.push(Operation::new("w", vec![0.5_f32.into()]));
            operations.push(Operation::new("m", vec![x.into(), (baseline - 1.5).into()]));
            operations.push(Operation::new(
                "l",
                vec![(x + width).into(), (baseline - 1.5).into()],
            ));
            operations.push(Operation::new("S", vec![]));
        }
        x += cells * POINTS_PER_CHAR;
    }
}

fn emit_text(operations: &mut Vec<Operation>, font: &str, x: f32, y: f32, text: &str) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![font.into(), FONT_SIZE.into()]));
    operations.push(Operation::new("Td", vec![x.into(), y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(text), StringFormat::Literal)],
    ));
    operations.push(Operation::new("ET", vec![]));
}

fn font_for(segment: &Segment) -> &'static str {
    let bold = segment.styles.contains(&Style::Bold);
    let italic = segment.styles.contains(&Style::Italic);
    match (bold, italic) {
        (true, true) => "F4",
        (true, false) => "F2",
        (false, true) => "F3",
        (false, false) => "F1",
    }
}

/// Converts text to WinAnsi (CP1252) bytes. Characters outside the
/// encoding print as `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match c {
            '\u{20ac}' => 0x80, // €
            '\u{2026}' => 0x85, // …
            '\u{2018}' => 0x91, // '
            '\u{2019}' => 0x92, // '
            '\u{201c}' => 0x93, // "
            '\u{201d}' => 0x94, // "
            '\u{2022}' => 0x95, // •
            '\u{2013}' => 0x96, // –
            '\u{2014}' => 0x97, // —
            '\u{2122}' => 0x99, // ™
            c if (c as u32) < 0x100 => c as u8,
            _ => b'?',
        };
        bytes.push(byte);
    }
    bytes
}
