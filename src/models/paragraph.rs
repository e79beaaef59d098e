use serde::Serialize;
use std::collections::HashMap;

use crate::models::rich_text::RichText;
use crate::parser::emphasis::parse_emphasis;

/// A block of speech: the character cue plus the spoken lines.
///
/// Each block is `(is_parenthetical, text)`. A line opening with `(`
/// switches into parenthetical mode, which persists until a line closing
/// with `)` has been consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dialog {
    pub character: RichText,
    pub blocks: Vec<(bool, RichText)>,
}

impl Dialog {
    pub fn new(character: RichText) -> Self {
        Dialog {
            character,
            blocks: Vec::new(),
        }
    }

    /// Builds a dialog from a cue and its raw (already trimmed) lines.
    pub fn from_lines<'a>(
        character: RichText,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut dialog = Dialog::new(character);
        let mut inside_parenthesis = false;
        for line in lines {
            if line.starts_with('(') {
                inside_parenthesis = true;
            }
            dialog.blocks.push((inside_parenthesis, parse_emphasis(line)));
            if line.ends_with(')') {
                inside_parenthesis = false;
            }
        }
        dialog
    }
}

/// One classified paragraph of the screenplay body.
///
/// The enum is closed for this crate but marked non-exhaustive so that
/// renderers keep their skip-unknown default arm meaningful for future
/// variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub enum Paragraph {
    /// A scene heading, e.g. "INT. HOUSE - DAY".
    Slug {
        line: RichText,
        scene_number: Option<RichText>,
        synopsis: Option<String>,
    },
    /// An outline heading; `level` is the number of leading `#` (1..=6).
    Section {
        text: RichText,
        level: usize,
        synopsis: Option<String>,
    },
    Dialog(Dialog),
    DualDialog {
        left: Dialog,
        right: Dialog,
    },
    Action {
        lines: Vec<RichText>,
        centered: bool,
    },
    Transition {
        line: RichText,
    },
    PageBreak,
}

impl Paragraph {
    /// Attaches a synopsis to this paragraph if its kind carries one.
    /// Returns false (and leaves the paragraph untouched) otherwise.
    pub fn set_synopsis(&mut self, text: &str) -> bool {
        match self {
            Paragraph::Slug { synopsis, .. } | Paragraph::Section { synopsis, .. } => {
                *synopsis = Some(text.to_string());
                true
            }
            _ => false,
        }
    }
}

/// The parsed document: title-page metadata plus the paragraph sequence,
/// in source order. Read-only once `parse` has returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Screenplay {
    /// Raw title-page values, keyed by the key exactly as written.
    pub title_page: HashMap<String, Vec<String>>,
    pub paragraphs: Vec<Paragraph>,
}

impl Screenplay {
    pub fn new(title_page: HashMap<String, Vec<String>>, paragraphs: Vec<Paragraph>) -> Self {
        Screenplay {
            title_page,
            paragraphs,
        }
    }

    /// Looks up a title-page value and parses each of its lines through
    /// the emphasis engine. Missing keys yield an empty list.
    pub fn get_rich_attribute(&self, name: &str) -> Vec<RichText> {
        self.title_page
            .get(name)
            .map(|lines| lines.iter().map(|line| parse_emphasis(line)).collect())
            .unwrap_or_default()
    }

    /// Appends a paragraph. Used during construction only.
    pub fn append(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Paragraph> {
        self.paragraphs.iter()
    }
}

impl<'a> IntoIterator for &'a Screenplay {
    type Item = &'a Paragraph;
    type IntoIter = std::slice::Iter<'a, Paragraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.paragraphs.iter()
    }
}
