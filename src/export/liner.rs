use log::debug;
use unicode_segmentation::UnicodeSegmentation;

use std::collections::BTreeSet;

use crate::models::rich_text::{RichText, Segment, Style};
use crate::models::{Dialog, Paragraph, Screenplay};

/// Frame metrics for a monospaced 12-point face on US Letter with a
/// 1.5 inch left margin.
pub const LINES_PER_PAGE: usize = 55;
pub const CHARACTERS_PER_LINE: usize = 61;

/// Indents in character cells, measured from the frame's left edge.
pub const CHARACTER_INDENT: usize = 19;
pub const PARENTHETICAL_INDENT: usize = 13;
pub const DIALOG_INDENT: usize = 9;
/// Dialogue wraps at cell 45, so 36 usable cells.
pub const DIALOG_WIDTH: usize = 36;
/// Contact block indent on the title page (3.9 inch at 10 cpi).
pub const CONTACT_INDENT: usize = 39;

/// One laid-out line: indent in character cells, or centered in the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintLine {
    pub indent: usize,
    pub text: RichText,
    pub centered: bool,
}

/// A wrapped paragraph with its vertical spacing rules, in line units.
#[derive(Debug, Clone)]
struct PrintBlock {
    space_before: usize,
    space_after: usize,
    keep_with_next: bool,
    lines: Vec<PrintLine>,
}

impl PrintBlock {
    fn new(
        space_before: usize,
        space_after: usize,
        keep_with_next: bool,
        lines: Vec<PrintLine>,
    ) -> Self {
        PrintBlock {
            space_before,
            space_after,
            keep_with_next,
            lines,
        }
    }
}

enum Flow {
    Block(PrintBlock),
    Break,
}

enum Unit {
    Group(Vec<PrintBlock>),
    Break,
}

/// A line fixed to a row (0-based, top of the frame) on its page.
#[derive(Debug, Clone)]
pub struct PositionedLine {
    pub row: usize,
    pub line: PrintLine,
}

#[derive(Debug, Clone, Default)]
pub struct PrintPage {
    pub lines: Vec<PositionedLine>,
    /// Footer page number, when one is printed on this page.
    pub number: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PrintLayout {
    pub pages: Vec<PrintPage>,
    pub has_title_page: bool,
}

/// Lays the screenplay out into pages: a synthesized title page when the
/// metadata calls for one, then the body. Page numbers count body pages
/// only, and the first body page stays unnumbered.
pub fn lay_out(screenplay: &Screenplay) -> PrintLayout {
    let title = title_page(screenplay);
    let has_title_page = title.is_some();

    let mut flows: Vec<Flow> = Vec::new();
    for paragraph in screenplay {
        paragraph_flows(paragraph, &mut flows);
    }

    let mut body = paginate(flows);
    for (index, page) in body.iter_mut().enumerate() {
        if index + 1 >= 2 {
            page.number = Some(index + 1);
        }
    }

    let mut pages = Vec::new();
    pages.extend(title);
    pages.extend(body);
    debug!(
        "print layout: {} page(s), title page: {}",
        pages.len(),
        has_title_page
    );
    PrintLayout {
        pages,
        has_title_page,
    }
}

/// Number of character cells a rich line occupies.
pub fn display_width(text: &RichText) -> usize {
    text.segments
        .iter()
        .map(|segment| segment.text.graphemes(true).count())
        .sum()
}

/// Wraps a rich line to `width` cells, breaking at spaces where possible
/// and hard-breaking words longer than a full line. Styles survive the
/// wrap untouched.
pub fn wrap(text: &RichText, width: usize) -> Vec<RichText> {
    let graphemes = styled_graphemes(text);
    let mut lines = Vec::new();
    let mut start = 0;

    while graphemes.len() - start > width {
        // A space right after the window still breaks cleanly.
        let window_end = start + width;
        let break_at = (start..=window_end)
            .rev()
            .find(|&i| graphemes[i].0 == " ");
        match break_at {
            Some(at) if at > start => {
                lines.push(graphemes_to_rich(&graphemes[start..at]));
                start = at + 1;
            }
            _ => {
                lines.push(graphemes_to_rich(&graphemes[start..window_end]));
                start = window_end;
            }
        }
    }
    lines.push(graphemes_to_rich(&graphemes[start..]));
    lines
}

type StyledGrapheme<'a> = (&'a str, &'a BTreeSet<Style>);

fn styled_graphemes(text: &RichText) -> Vec<StyledGrapheme<'_>> {
    let mut graphemes = Vec::new();
    for segment in &text.segments {
        for grapheme in segment.text.graphemes(true) {
            graphemes.push((grapheme, &segment.styles));
        }
    }
    graphemes
}

fn graphemes_to_rich(graphemes: &[StyledGrapheme<'_>]) -> RichText {
    let mut segments: Vec<Segment> = Vec::new();
    for (grapheme, styles) in graphemes {
        match segments.last_mut() {
            Some(last) if &last.styles == *styles => last.text.push_str(grapheme),
            _ => segments.push(Segment {
                text: (*grapheme).to_string(),
                styles: (*styles).clone(),
            }),
        }
    }
    RichText::new(segments)
}

fn lines_at(indent: usize, wrapped: Vec<RichText>) -> Vec<PrintLine> {
    wrapped
        .into_iter()
        .map(|text| PrintLine {
            indent,
            text,
            centered: false,
        })
        .collect()
}

fn centered_lines(wrapped: Vec<RichText>) -> Vec<PrintLine> {
    wrapped
        .into_iter()
        .map(|text| PrintLine {
            indent: 0,
            text,
            centered: true,
        })
        .collect()
}

fn paragraph_flows(paragraph: &Paragraph, flows: &mut Vec<Flow>) {
    #[allow(unreachable_patterns)]
    match paragraph {
        Paragraph::Slug { line, .. } => flows.push(Flow::Block(PrintBlock::new(
            1,
            1,
            true,
            lines_at(0, wrap(line, CHARACTERS_PER_LINE)),
        ))),
        Paragraph::Action { lines, centered } => {
            let mut print_lines = Vec::new();
            for line in lines {
                let wrapped = wrap(line, CHARACTERS_PER_LINE);
                if *centered {
                    print_lines.extend(centered_lines(wrapped));
                } else {
                    print_lines.extend(lines_at(0, wrapped));
                }
            }
            flows.push(Flow::Block(PrintBlock::new(1, 0, false, print_lines)));
        }
        Paragraph::Dialog(dialog) => dialog_flows(dialog, flows),
        Paragraph::DualDialog { left, right } => {
            dialog_flows(left, flows);
            dialog_flows(right, flows);
        }
        Paragraph::Transition { line } => flows.push(Flow::Block(PrintBlock::new(
            1,
            1,
            false,
            lines_at(0, wrap(line, CHARACTERS_PER_LINE)),
        ))),
        Paragraph::PageBreak => flows.push(Flow::Break),
        // Outline headings and synopses have no print representation.
        Paragraph::Section { .. } => {}
        // Unknown paragraph kinds are skipped.
        _ => {}
    }
}

fn dialog_flows(dialog: &Dialog, flows: &mut Vec<Flow>) {
    flows.push(Flow::Block(PrintBlock::new(
        1,
        0,
        true,
        lines_at(
            CHARACTER_INDENT,
            wrap(&dialog.character, CHARACTERS_PER_LINE - CHARACTER_INDENT),
        ),
    )));
    for (parenthetical, text) in &dialog.blocks {
        if *parenthetical {
            flows.push(Flow::Block(PrintBlock::new(
                0,
                0,
                true,
                lines_at(
                    PARENTHETICAL_INDENT,
                    wrap(text, CHARACTERS_PER_LINE - PARENTHETICAL_INDENT),
                ),
            )));
        } else {
            flows.push(Flow::Block(PrintBlock::new(
                0,
                0,
                false,
                lines_at(DIALOG_INDENT, wrap(text, DIALOG_WIDTH)),
            )));
        }
    }
}

/// Fills pages with flow rows. Keep-with-next chains move to a fresh page
/// as one group when they would straddle the page edge; a chain taller
/// than a whole page spills line by line instead.
fn paginate(flows: Vec<Flow>) -> Vec<PrintPage> {
    let mut units: Vec<Unit> = Vec::new();
    let mut group: Vec<PrintBlock> = Vec::new();
    for flow in flows {
        match flow {
            Flow::Break => {
                if !group.is_empty() {
                    units.push(Unit::Group(std::mem::take(&mut group)));
                }
                units.push(Unit::Break);
            }
            Flow::Block(block) => {
                let keep = block.keep_with_next;
                group.push(block);
                if !keep {
                    units.push(Unit::Group(std::mem::take(&mut group)));
                }
            }
        }
    }
    if !group.is_empty() {
        units.push(Unit::Group(group));
    }

    let mut pages: Vec<PrintPage> = Vec::new();
    let mut page = PrintPage::default();
    let mut cursor = 0usize;
    let mut trailing_space = 0usize;

    for unit in units {
        match unit {
            Unit::Break => {
                pages.push(std::mem::take(&mut page));
                cursor = 0;
                trailing_space = 0;
            }
            Unit::Group(blocks) => {
                let rows = group_rows(&blocks, cursor == 0, trailing_space);
                if cursor > 0 && cursor + rows.len() > LINES_PER_PAGE {
                    let fresh = group_rows(&blocks, true, 0);
                    if fresh.len() <= LINES_PER_PAGE {
                        pages.push(std::mem::take(&mut page));
                        cursor = 0;
                        place(&mut pages, &mut page, &mut cursor, fresh);
                    } else {
                        place(&mut pages, &mut page, &mut cursor, rows);
                    }
                } else {
                    place(&mut pages, &mut page, &mut cursor, rows);
                }
                trailing_space = blocks.last().map_or(0, |block| block.space_after);
            }
        }
    }
    if !page.lines.is_empty() {
        pages.push(page);
    }
    if pages.is_empty() {
        pages.push(PrintPage::default());
    }
    pages
}

/// Flattens a group into rows; `None` is a blank spacing row.
fn group_rows(
    blocks: &[PrintBlock],
    at_page_top: bool,
    leading_space: usize,
) -> Vec<Option<PrintLine>> {
    let mut rows = Vec::new();
    let mut previous_after = 0;
    for (index, block) in blocks.iter().enumerate() {
        let gap = if index == 0 {
            if at_page_top {
                0
            } else {
                leading_space + block.space_before
            }
        } else {
            previous_after + block.space_before
        };
        for _ in 0..gap {
            rows.push(None);
        }
        rows.extend(block.lines.iter().cloned().map(Some));
        previous_after = block.space_after;
    }
    rows
}

fn place(
    pages: &mut Vec<PrintPage>,
    page: &mut PrintPage,
    cursor: &mut usize,
    rows: Vec<Option<PrintLine>>,
) {
    for row in rows {
        if *cursor >= LINES_PER_PAGE {
            pages.push(std::mem::take(page));
            *cursor = 0;
        }
        match row {
            // Blank spacing rows vanish at the top of a page.
            None => {
                if *cursor > 0 {
                    *cursor += 1;
                }
            }
            Some(line) => {
                page.lines.push(PositionedLine { row: *cursor, line });
                *cursor += 1;
            }
        }
    }
}

/// Builds the synthesized title page, or `None` when no title-page key
/// that prints is present. The upper block is centered and starts at one
/// third of the frame, pushed up when the content needs the room; the
/// lower block sits against the bottom of the frame.
fn title_page(screenplay: &Screenplay) -> Option<PrintPage> {
    let mut upper: Vec<Option<PrintLine>> = Vec::new();
    add_title_lines(screenplay, "Title", Placement::Centered, 0, &mut upper);
    add_title_lines(screenplay, "Credit", Placement::Centered, 1, &mut upper);
    add_title_lines(screenplay, "Author", Placement::Centered, 0, &mut upper);
    add_title_lines(screenplay, "Authors", Placement::Centered, 0, &mut upper);
    add_title_lines(screenplay, "Source", Placement::Centered, 0, &mut upper);

    let mut lower: Vec<Option<PrintLine>> = Vec::new();
    add_title_lines(screenplay, "Draft date", Placement::Left, 0, &mut lower);
    add_title_lines(
        screenplay,
        "Contact",
        Placement::Indented(CONTACT_INDENT),
        1,
        &mut lower,
    );
    add_title_lines(screenplay, "Copyright", Placement::Centered, 1, &mut lower);

    if upper.is_empty() && lower.is_empty() {
        return None;
    }

    let top_space = (LINES_PER_PAGE / 3)
        .min(LINES_PER_PAGE.saturating_sub(upper.len() + lower.len()));

    let mut page = PrintPage::default();
    let mut row = top_space;
    for line in upper {
        if let Some(line) = line {
            page.lines.push(PositionedLine { row, line });
        }
        row += 1;
    }

    let lower_start = LINES_PER_PAGE.saturating_sub(lower.len()).max(row);
    let mut row = lower_start;
    for line in lower {
        if row >= LINES_PER_PAGE {
            break;
        }
        if let Some(line) = line {
            page.lines.push(PositionedLine { row, line });
        }
        row += 1;
    }

    Some(page)
}

enum Placement {
    Centered,
    Left,
    Indented(usize),
}

fn add_title_lines(
    screenplay: &Screenplay,
    key: &str,
    placement: Placement,
    space_before: usize,
    rows: &mut Vec<Option<PrintLine>>,
) {
    let lines = screenplay.get_rich_attribute(key);
    if lines.is_empty() {
        return;
    }
    for _ in 0..space_before {
        rows.push(None);
    }
    for line in lines {
        for text in wrap(&line, CHARACTERS_PER_LINE) {
            rows.push(Some(match placement {
                Placement::Centered => PrintLine {
                    indent: 0,
                    text,
                    centered: true,
                },
                Placement::Left => PrintLine {
                    indent: 0,
                    text,
                    centered: false,
                },
                Placement::Indented(indent) => PrintLine {
                    indent,
                    text,
                    centered: false,
                },
            }));
        }
    }
}
