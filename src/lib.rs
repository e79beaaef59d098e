pub mod export;
pub mod models;
pub mod parser;
pub mod utils;

pub use models::{
    bold, italic, plain, underline, Dialog, Paragraph, RichText, Screenplay, Segment, Style,
};

pub use parser::{parse_emphasis, parse_lines, parse_title_page};

pub use export::{
    generate_fdx, generate_html, generate_pdf, ExportError, ExportResult, HtmlOptions,
};

/// Parses Fountain screenplay text into a [`Screenplay`].
///
/// # Arguments
///
/// * `source` - the Fountain source text
///
/// # Returns
///
/// The parsed document model; parsing cannot fail.
pub fn parse(source: &str) -> Screenplay {
    parser::parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let result = parse("INT. ROOM - DAY\n\nHello, world!");
        assert_eq!(result.paragraphs.len(), 2);
    }
}
