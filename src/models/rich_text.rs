use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Add;

/// Inline style of a text segment.
///
/// The derived ordering is the canonical rendering order: Bold, then
/// Italic, then Underline. Renderers nest their tags in this order no
/// matter which delimiter was opened first in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Style {
    Bold,
    Italic,
    Underline,
}

impl Style {
    /// Interchange name of the style, as used in FDX `Style` attributes.
    pub fn name(self) -> &'static str {
        match self {
            Style::Bold => "Bold",
            Style::Italic => "Italic",
            Style::Underline => "Underline",
        }
    }

    fn start_html(self) -> &'static str {
        match self {
            Style::Bold => "<strong>",
            Style::Italic => "<em>",
            Style::Underline => "<u>",
        }
    }

    fn end_html(self) -> &'static str {
        match self {
            Style::Bold => "</strong>",
            Style::Italic => "</em>",
            Style::Underline => "</u>",
        }
    }
}

/// One run of text with a fixed set of styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub styles: BTreeSet<Style>,
}

impl Segment {
    pub fn new(text: impl Into<String>, styles: impl IntoIterator<Item = Style>) -> Self {
        Segment {
            text: text.into(),
            styles: styles.into_iter().collect(),
        }
    }

    /// Renders the segment as HTML: start tags in canonical order, the
    /// escaped text, end tags in reverse order.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for style in &self.styles {
            out.push_str(style.start_html());
        }
        out.push_str(&escape_html(&self.text));
        for style in self.styles.iter().rev() {
            out.push_str(style.end_html());
        }
        out
    }
}

/// An ordered sequence of styled segments making up one line of text.
///
/// Segment boundaries occur only where the active style set changes;
/// joining the segment texts reconstructs the line with all markup
/// delimiters removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RichText {
    pub segments: Vec<Segment>,
}

impl RichText {
    pub fn new(segments: Vec<Segment>) -> Self {
        RichText { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The text with all styling dropped.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn to_html(&self) -> String {
        self.segments.iter().map(Segment::to_html).collect()
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

impl Add for RichText {
    type Output = RichText;

    fn add(mut self, other: RichText) -> RichText {
        self.segments.extend(other.segments);
        self
    }
}

fn styled(text: &str, styles: impl IntoIterator<Item = Style>) -> RichText {
    RichText::new(vec![Segment::new(text, styles)])
}

/// A single unstyled segment.
pub fn plain(text: &str) -> RichText {
    styled(text, [])
}

pub fn bold(text: &str) -> RichText {
    styled(text, [Style::Bold])
}

pub fn italic(text: &str) -> RichText {
    styled(text, [Style::Italic])
}

pub fn underline(text: &str) -> RichText {
    styled(text, [Style::Underline])
}

/// Escapes text for HTML/XML output. Non-ASCII characters become numeric
/// character references so the output stays pure ASCII.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if (c as u32) > 127 => {
                out.push_str(&format!("&#{};", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}
