use lazy_static::lazy_static;
use regex::Regex;

// Private-use sentinels inserted by the emphasis passes. Markup delimiters
// are rewritten into these before segmentation so that nested and escaped
// markers cannot interfere with each other.
pub const ITALIC_START: char = '\u{e700}';
pub const ITALIC_END: char = '\u{e701}';
pub const BOLD_START: char = '\u{e702}';
pub const BOLD_END: char = '\u{e703}';
pub const UNDERLINE_START: char = '\u{e704}';
pub const UNDERLINE_END: char = '\u{e705}';

// Stand-in for a backslash-escaped asterisk while the style passes run.
pub const LITERAL_STAR: char = '\u{e706}';

lazy_static! {
    // Preprocessing
    pub static ref BONEYARD_RE: Regex = Regex::new(r"(?s)/\*.*?\*/").unwrap();
    pub static ref LINEBREAK_RE: Regex = Regex::new(r"\r\n|\n|\r").unwrap();

    // Title page
    pub static ref TITLE_KEY_RE: Regex = Regex::new(r"^([^:]+):\s*(.*)$").unwrap();
    pub static ref TITLE_VALUE_RE: Regex = Regex::new(r"^(?:\s{3,}|\t)(.+)$").unwrap();

    // Block recognizers, in classifier priority order
    pub static ref PAGE_BREAK_RE: Regex = Regex::new(r"^={3,}$").unwrap();
    pub static ref SECTION_RE: Regex = Regex::new(r"^(#{1,6})\s*([^#].*)$").unwrap();
    pub static ref CENTERED_RE: Regex = Regex::new(r"^\s*>\s*(.*?)\s*<\s*$").unwrap();
    pub static ref DUAL_CUE_RE: Regex = Regex::new(r"^(.+?)\s*\^$").unwrap();
    pub static ref SCENE_NUMBER_RE: Regex = Regex::new(r"^(.*?)\s*#([\w\-.]+)#\s*$").unwrap();
    pub static ref TRANSITION_RE: Regex = Regex::new(r"^(>?)\s*(.+?)(TO:)?$").unwrap();

    // Matched against the already upper-cased heading text.
    pub static ref SLUG_PREFIXES: Vec<Regex> = vec![
        Regex::new(r"^(INT|EXT|EST)[ .]").unwrap(),
        Regex::new(r"^INT\.?/EXT\.?[ .]").unwrap(),
        Regex::new(r"^I/E[ .]").unwrap(),
    ];

    // Emphasis passes. The `regex` crate has no lookaround, so the closing
    // conditions are encoded structurally: the italic closer "not followed
    // by another asterisk" consumes a guard character that the substitution
    // template re-emits, and the underline pattern forbids `_` inside the
    // span while requiring non-whitespace on both edges.
    pub static ref BOLD_RE: Regex = Regex::new(r"\*\*(\S.*?)\*\*").unwrap();
    pub static ref ITALIC_RE: Regex = Regex::new(r"\*([^\s*].*?)\*([^*]|$)").unwrap();
    pub static ref UNDERLINE_RE: Regex = Regex::new(r"_([^\s_](?:[^_]*[^\s_])?)_").unwrap();
}

// Substitution templates matching the passes above.
pub const BOLD_SUB: &str = "\u{e702}${1}\u{e703}";
pub const ITALIC_SUB: &str = "\u{e700}${1}\u{e701}${2}";
pub const UNDERLINE_SUB: &str = "\u{e704}${1}\u{e705}";
