use std::collections::BTreeSet;

use crate::models::rich_text::{RichText, Segment, Style};
use crate::utils::fountain_constants::{
    BOLD_END, BOLD_RE, BOLD_START, BOLD_SUB, ITALIC_END, ITALIC_RE, ITALIC_START, ITALIC_SUB,
    LITERAL_STAR, UNDERLINE_END, UNDERLINE_RE, UNDERLINE_START, UNDERLINE_SUB,
};

/// Parses `*italic*`, `**bold**` and `_underline_` markers in one line of
/// text and returns the styled segments.
///
/// Runs three substitution passes in fixed order (bold, italic,
/// underline) that replace each delimiter pair with sentinel start/end
/// markers, then scans the sentinels left to right while tracking the
/// active style set. Unmatched delimiters stay in the text untouched, so
/// the function cannot fail.
pub fn parse_emphasis(source: &str) -> RichText {
    // Hide escaped asterisks from the passes; they come back as literal
    // stars after the delimiters have been consumed.
    let source = source.replace("\\*", &LITERAL_STAR.to_string());

    let source = BOLD_RE.replace_all(&source, BOLD_SUB);
    let source = ITALIC_RE.replace_all(&source, ITALIC_SUB);
    let source = UNDERLINE_RE.replace_all(&source, UNDERLINE_SUB);

    let source = source.replace(LITERAL_STAR, "*");

    let mut styles: BTreeSet<Style> = BTreeSet::new();
    let mut segments: Vec<Segment> = Vec::new();
    let mut buffer = String::new();

    let flush = |buffer: &mut String, styles: &BTreeSet<Style>, segments: &mut Vec<Segment>| {
        if !buffer.is_empty() {
            segments.push(Segment::new(std::mem::take(buffer), styles.iter().copied()));
        }
    };

    for c in source.chars() {
        match sentinel_style(c) {
            Some((style, true)) => {
                flush(&mut buffer, &styles, &mut segments);
                styles.insert(style);
            }
            Some((style, false)) => {
                flush(&mut buffer, &styles, &mut segments);
                styles.remove(&style);
            }
            None => buffer.push(c),
        }
    }
    flush(&mut buffer, &styles, &mut segments);

    RichText::new(segments)
}

fn sentinel_style(c: char) -> Option<(Style, bool)> {
    match c {
        c if c == BOLD_START => Some((Style::Bold, true)),
        c if c == BOLD_END => Some((Style::Bold, false)),
        c if c == ITALIC_START => Some((Style::Italic, true)),
        c if c == ITALIC_END => Some((Style::Italic, false)),
        c if c == UNDERLINE_START => Some((Style::Underline, true)),
        c if c == UNDERLINE_END => Some((Style::Underline, false)),
        _ => None,
    }
}
