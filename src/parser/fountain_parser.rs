use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::models::rich_text::plain;
use crate::models::{Dialog, Paragraph, Screenplay};
use crate::parser::emphasis::parse_emphasis;
use crate::parser::title_page::parse_title_page;
use crate::utils::fountain_constants::{
    BONEYARD_RE, CENTERED_RE, DUAL_CUE_RE, LINEBREAK_RE, PAGE_BREAK_RE, SCENE_NUMBER_RE,
    SECTION_RE, SLUG_PREFIXES, TRANSITION_RE,
};
use crate::utils::{expand_tabs, is_all_caps};

/// Parses Fountain source text into a [`Screenplay`].
///
/// Boneyard comments (`/* ... */`) are stripped first, then the text is
/// split on any line-ending style and handed to [`parse_lines`].
pub fn parse(source: &str) -> Screenplay {
    let content = BONEYARD_RE.replace_all(source, "");
    parse_lines(LINEBREAK_RE.split(&content))
}

/// Parses an already-split stream of Fountain lines.
///
/// The lines before the first blank line are offered to the title-page
/// parser; if they do not form a title page they are pushed back and
/// classified as body content instead.
pub fn parse_lines<I>(lines: I) -> Screenplay
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut source = PushbackLines::new(
        lines
            .into_iter()
            .map(|line| preprocess_line(line.as_ref())),
    );

    let mut candidate: Vec<String> = Vec::new();
    while let Some(line) = source.next() {
        if line.is_empty() {
            break;
        }
        candidate.push(line);
    }

    match parse_title_page(&candidate) {
        Some(title_page) if !title_page.is_empty() => {
            debug!("title page with {} key(s)", title_page.len());
            Screenplay::new(title_page, parse_body(source))
        }
        _ => {
            // Not a title page: the candidate block belongs to the body,
            // separated from the rest by a synthetic blank line.
            debug!("no title page, reclassifying leading block as body");
            candidate.push(String::new());
            source.push_back(candidate);
            Screenplay::new(HashMap::new(), parse_body(source))
        }
    }
}

/// Normalizes one raw line: strips trailing line-ending characters and
/// expands tabs to 4-column stops.
fn preprocess_line(raw: &str) -> String {
    expand_tabs(raw.trim_end_matches(['\r', '\n']))
}

/// A line stream with bounded lookahead: lines can be pushed back to the
/// front after the title-page probe has consumed them.
struct PushbackLines<I: Iterator<Item = String>> {
    inner: I,
    buffered: VecDeque<String>,
}

impl<I: Iterator<Item = String>> PushbackLines<I> {
    fn new(inner: I) -> Self {
        PushbackLines {
            inner,
            buffered: VecDeque::new(),
        }
    }

    /// Reinserts lines in front of the stream, keeping their order.
    fn push_back(&mut self, lines: Vec<String>) {
        for line in lines.into_iter().rev() {
            self.buffered.push_front(line);
        }
    }
}

impl<I: Iterator<Item = String>> Iterator for PushbackLines<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.buffered.pop_front().or_else(|| self.inner.next())
    }
}

/// Folds the body line stream into paragraphs, one blank-line-delimited
/// chunk at a time.
fn parse_body(lines: impl Iterator<Item = String>) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut chunk: Vec<String> = Vec::new();

    for line in lines {
        if line.is_empty() {
            if !chunk.is_empty() {
                InputChunk::new(std::mem::take(&mut chunk)).append_to(&mut paragraphs);
            }
        } else {
            chunk.push(line);
        }
    }
    if !chunk.is_empty() {
        InputChunk::new(chunk).append_to(&mut paragraphs);
    }

    paragraphs
}

/// One maximal run of non-blank lines, waiting to be classified.
struct InputChunk {
    lines: Vec<String>,
}

impl InputChunk {
    fn new(lines: Vec<String>) -> Self {
        InputChunk { lines }
    }

    /// Classifies the chunk and appends the result to `paragraphs`.
    ///
    /// The recognizers run in a fixed priority order and the first match
    /// wins; the final action recognizer matches unconditionally, so
    /// classification is total.
    fn append_to(&self, paragraphs: &mut Vec<Paragraph>) {
        let _ = self.try_page_break(paragraphs)
            || self.try_synopsis(paragraphs)
            || self.try_sections(paragraphs)
            || self.try_slug(paragraphs)
            || self.try_centered_action(paragraphs)
            || self.try_dialog(paragraphs)
            || self.try_transition(paragraphs)
            || self.append_action(paragraphs);
    }

    fn try_page_break(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        if self.lines.len() == 1 && PAGE_BREAK_RE.is_match(&self.lines[0]) {
            paragraphs.push(Paragraph::PageBreak);
            true
        } else {
            false
        }
    }

    /// A lone `= ...` line attaches to the previous paragraph when that
    /// paragraph is of a kind that carries a synopsis.
    fn try_synopsis(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        if self.lines.len() != 1 || !self.lines[0].starts_with('=') {
            return false;
        }
        let text = self.lines[0][1..].trim_start();
        match paragraphs.last_mut() {
            Some(last) => last.set_synopsis(text),
            None => false,
        }
    }

    /// A chunk made up entirely of `#` headings and `=` synopsis lines.
    /// All-or-nothing: one non-matching line rejects the whole chunk.
    fn try_sections(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        let mut new_paragraphs: Vec<Paragraph> = Vec::new();

        for line in &self.lines {
            if let Some(caps) = SECTION_RE.captures(line) {
                new_paragraphs.push(Paragraph::Section {
                    text: parse_emphasis(&caps[2]),
                    level: caps[1].len(),
                    synopsis: None,
                });
            } else if line.starts_with('=') {
                // Attach to the most recent heading in this same chunk.
                match new_paragraphs.last_mut() {
                    Some(section) => {
                        section.set_synopsis(line[1..].trim_start());
                    }
                    None => return false,
                }
            } else {
                return false;
            }
        }

        paragraphs.extend(new_paragraphs);
        true
    }

    fn try_slug(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        if self.lines.len() != 1 {
            return false;
        }

        let line = self.lines[0].trim_end();
        // A leading period forces a scene heading, unless it starts an
        // ellipsis or floats in front of whitespace.
        let (forced, text) = match line.strip_prefix('.') {
            Some(rest) if rest.starts_with(|c: char| c != '.' && !c.is_whitespace()) => {
                (true, rest)
            }
            _ => (false, line),
        };
        if text.is_empty() || text.starts_with(char::is_whitespace) {
            return false;
        }

        let text = text.to_uppercase();
        if !forced && !SLUG_PREFIXES.iter().any(|re| re.is_match(&text)) {
            return false;
        }

        if let Some(caps) = SCENE_NUMBER_RE.captures(&text) {
            paragraphs.push(Paragraph::Slug {
                line: parse_emphasis(&caps[1]),
                scene_number: Some(plain(&caps[2])),
                synopsis: None,
            });
        } else {
            paragraphs.push(Paragraph::Slug {
                line: parse_emphasis(&text),
                scene_number: None,
                synopsis: None,
            });
        }
        true
    }

    fn try_centered_action(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        let mut inner = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            match CENTERED_RE.captures(line) {
                Some(caps) => inner.push(parse_emphasis(&caps[1])),
                None => return false,
            }
        }
        paragraphs.push(Paragraph::Action {
            lines: inner,
            centered: true,
        });
        true
    }

    fn try_dialog(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        if self.lines.len() < 2 {
            return false;
        }

        let character = &self.lines[0];
        // Two trailing spaces force the chunk away from dialog.
        if !is_all_caps(character) || character.ends_with("  ") {
            return false;
        }

        if matches!(paragraphs.last(), Some(Paragraph::Dialog(_))) {
            if let Some(caps) = DUAL_CUE_RE.captures(character) {
                if let Some(Paragraph::Dialog(left)) = paragraphs.pop() {
                    paragraphs.push(Paragraph::DualDialog {
                        left,
                        right: self.create_dialog(&caps[1]),
                    });
                    return true;
                }
            }
        }

        paragraphs.push(Paragraph::Dialog(self.create_dialog(character)));
        true
    }

    fn create_dialog(&self, character: &str) -> Dialog {
        Dialog::from_lines(
            parse_emphasis(character.trim()),
            self.lines[1..].iter().map(|line| line.trim()),
        )
    }

    fn try_transition(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        if self.lines.len() != 1 {
            return false;
        }
        let caps = match TRANSITION_RE.captures(&self.lines[0]) {
            Some(caps) => caps,
            None => return false,
        };

        let text = &caps[2];
        let to_colon = caps.get(3).map_or("", |m| m.as_str());

        if !caps[1].is_empty() {
            // Forced with `>`: upper-case, keeping a trailing TO: as-is.
            paragraphs.push(Paragraph::Transition {
                line: parse_emphasis(&format!("{}{}", text.to_uppercase(), to_colon)),
            });
            return true;
        }

        if is_all_caps(text) && !to_colon.is_empty() {
            paragraphs.push(Paragraph::Transition {
                line: parse_emphasis(&format!("{}{}", text, to_colon)),
            });
            return true;
        }

        false
    }

    /// Unconditional fallback: the chunk is an action paragraph.
    fn append_action(&self, paragraphs: &mut Vec<Paragraph>) -> bool {
        paragraphs.push(Paragraph::Action {
            lines: self
                .lines
                .iter()
                .map(|line| parse_emphasis(line.trim_end()))
                .collect(),
            centered: false,
        });
        true
    }
}
