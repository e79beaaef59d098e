use std::io::{self, Write};

use log::debug;

use crate::models::rich_text::{plain, RichText};
use crate::models::{Dialog, Paragraph, Screenplay};

use super::ExportResult;

/// Options for the HTML renderer.
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Emit only the paragraph fragment instead of a full document with
    /// the embedded default stylesheet.
    pub bare: bool,
}

/// Renders the screenplay as HTML into `out`.
pub fn generate_html<W: Write>(
    screenplay: &Screenplay,
    out: &mut W,
    options: &HtmlOptions,
) -> ExportResult<()> {
    debug!(
        "rendering {} paragraph(s) as html (bare: {})",
        screenplay.paragraphs.len(),
        options.bare
    );
    if options.bare {
        convert_bare(screenplay, out)?;
    } else {
        convert_full(screenplay, out)?;
    }
    Ok(())
}

/// Wraps the fragment in a complete document with the default stylesheet.
fn convert_full<W: Write>(screenplay: &Screenplay, out: &mut W) -> io::Result<()> {
    out.write_all(
        b"<!DOCTYPE html>\n<html><head><title>Screenplay</title>\
          <style type=\"text/css\">",
    )?;
    out.write_all(include_bytes!("default.css"))?;
    out.write_all(b"</style></head><body><div id=\"wrapper\" class=\"screenplay\">\n")?;
    convert_bare(screenplay, out)?;
    out.write_all(b"</div></body></html>\n")?;
    Ok(())
}

fn convert_bare<W: Write>(screenplay: &Screenplay, out: &mut W) -> io::Result<()> {
    let mut formatter = Formatter::new(out);
    formatter.convert(screenplay)
}

/// Escaped rich text ready for element content. Empty lines keep their
/// height with a non-breaking space, and double spaces survive collapsing.
fn to_html(text: &RichText) -> String {
    let html = text.to_html();
    if html.is_empty() {
        "&nbsp;".to_string()
    } else {
        html.replace("  ", "&nbsp; ")
    }
}

/// Writes paragraphs as HTML elements, carrying the page-break flag from
/// one paragraph to the next rendered element.
struct Formatter<'a, W: Write> {
    out: &'a mut W,
    page_break_before_next: bool,
}

impl<'a, W: Write> Formatter<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Formatter {
            out,
            page_break_before_next: false,
        }
    }

    fn convert(&mut self, screenplay: &Screenplay) -> io::Result<()> {
        self.page_break_before_next = false;
        for paragraph in screenplay {
            #[allow(unreachable_patterns)]
            match paragraph {
                Paragraph::Slug {
                    line,
                    scene_number,
                    synopsis,
                } => self.format_slug(line, scene_number.as_ref(), synopsis.as_deref())?,
                Paragraph::Section {
                    text,
                    level,
                    synopsis,
                } => self.format_section(text, *level, synopsis.as_deref())?,
                Paragraph::Dialog(dialog) => self.format_dialog(dialog)?,
                Paragraph::DualDialog { left, right } => self.format_dual(left, right)?,
                Paragraph::Action { lines, centered } => self.format_action(lines, *centered)?,
                Paragraph::Transition { line } => self.format_transition(line)?,
                Paragraph::PageBreak => {
                    // Renders nothing itself; the next element picks up a
                    // page-break class.
                    self.page_break_before_next = true;
                }
                // Unknown paragraph kinds are skipped, not errors.
                _ => continue,
            }
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn format_slug(
        &mut self,
        line: &RichText,
        scene_number: Option<&RichText>,
        synopsis: Option<&str>,
    ) -> io::Result<()> {
        let line_html = to_html(line);
        self.tag("h6", &[], |f| {
            if let Some(number) = scene_number {
                let number_html = to_html(number);
                f.tag("span", &["scnuml"], |f| f.write(&number_html))?;
                f.write(&line_html)?;
                f.tag("span", &["scnumr"], |f| f.write(&number_html))
            } else {
                f.write(&line_html)
            }
        })?;
        if let Some(synopsis) = synopsis {
            let synopsis_html = to_html(&plain(synopsis));
            self.tag("span", &["h6-synopsis"], |f| f.write(&synopsis_html))?;
        }
        Ok(())
    }

    fn format_section(
        &mut self,
        text: &RichText,
        level: usize,
        synopsis: Option<&str>,
    ) -> io::Result<()> {
        let heading = format!("h{}", level);
        let text_html = to_html(text);
        self.tag(&heading, &[], |f| f.write(&text_html))?;
        if let Some(synopsis) = synopsis {
            let class = format!("h{}-synopsis", level);
            let synopsis_html = to_html(&plain(synopsis));
            self.tag("span", &[&class], |f| f.write(&synopsis_html))?;
        }
        Ok(())
    }

    fn format_dialog(&mut self, dialog: &Dialog) -> io::Result<()> {
        self.tag("div", &["dialog"], |f| f.write_dialog_block(dialog))
    }

    fn format_dual(&mut self, left: &Dialog, right: &Dialog) -> io::Result<()> {
        self.tag("div", &["dual"], |f| {
            f.tag("div", &["left"], |f| f.write_dialog_block(left))?;
            f.tag("div", &["right"], |f| f.write_dialog_block(right))?;
            f.write("<br />")
        })
    }

    fn write_dialog_block(&mut self, dialog: &Dialog) -> io::Result<()> {
        let character_html = to_html(&dialog.character);
        self.tag("p", &["character"], |f| f.write(&character_html))?;
        for (parenthetical, text) in &dialog.blocks {
            let classes: &[&str] = if *parenthetical {
                &["parenthetical"]
            } else {
                &[]
            };
            let text_html = to_html(text);
            self.tag("p", classes, |f| f.write(&text_html))?;
        }
        Ok(())
    }

    fn format_action(&mut self, lines: &[RichText], centered: bool) -> io::Result<()> {
        let classes: &[&str] = if centered {
            &["action", "centered"]
        } else {
            &["action"]
        };
        self.tag("div", classes, |f| {
            f.tag("p", &[], |f| {
                for (number, line) in lines.iter().enumerate() {
                    if number != 0 {
                        f.write("<br/>")?;
                    }
                    f.write(&to_html(line))?;
                }
                Ok(())
            })
        })
    }

    fn format_transition(&mut self, line: &RichText) -> io::Result<()> {
        let line_html = to_html(line);
        self.tag("div", &["transition"], |f| f.write(&line_html))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Opens a tag, runs `body`, closes the tag. A pending page break is
    /// consumed by the first tag opened after it.
    fn tag<F>(&mut self, name: &str, classes: &[&str], body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        let mut classes = classes.to_vec();
        if self.page_break_before_next {
            self.page_break_before_next = false;
            classes.push("page-break");
        }
        if classes.is_empty() {
            write!(self.out, "<{}>", name)?;
        } else {
            write!(self.out, "<{} class=\"{}\">", name, classes.join(" "))?;
        }
        body(self)?;
        write!(self.out, "</{}>", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render(source: &str) -> String {
        let screenplay = parse(source);
        let mut out = Vec::new();
        generate_html(&screenplay, &mut out, &HtmlOptions { bare: true }).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn slug_renders_as_h6_with_scene_numbers() {
        let html = render("INT. HOUSE #1A#");
        assert_eq!(
            html,
            "<h6><span class=\"scnuml\">1A</span>INT. HOUSE\
             <span class=\"scnumr\">1A</span></h6>\n"
        );
    }

    #[test]
    fn dialog_renders_character_and_blocks() {
        let html = render("BOB\n(soft)\nGood morning.");
        assert_eq!(
            html,
            "<div class=\"dialog\"><p class=\"character\">BOB</p>\
             <p class=\"parenthetical\">(soft)</p>\
             <p>Good morning.</p></div>\n"
        );
    }

    #[test]
    fn dual_dialog_renders_left_and_right() {
        let html = render("BOB\nHi.\n\nALICE ^\nHi yourself.");
        assert!(html.starts_with("<div class=\"dual\"><div class=\"left\">"));
        assert!(html.contains("<div class=\"right\"><p class=\"character\">ALICE</p>"));
        assert!(html.ends_with("<br /></div>\n"));
    }

    #[test]
    fn centered_action_gets_the_modifier_class() {
        let html = render("> THE END <");
        assert_eq!(
            html,
            "<div class=\"action centered\"><p>THE END</p></div>\n"
        );
    }

    #[test]
    fn multi_line_action_joins_lines_with_breaks() {
        let html = render("One.\nTwo.");
        assert_eq!(html, "<div class=\"action\"><p>One.<br/>Two.</p></div>\n");
    }

    #[test]
    fn page_break_marks_the_next_element() {
        let html = render("One.\n\n===\n\nTwo.");
        assert_eq!(
            html,
            "<div class=\"action\"><p>One.</p></div>\n\
             \n\
             <div class=\"action page-break\"><p>Two.</p></div>\n"
        );
    }

    #[test]
    fn synopsis_follows_its_heading() {
        let html = render("# Act One\n= It begins.");
        assert_eq!(
            html,
            "<h1>Act One</h1><span class=\"h1-synopsis\">It begins.</span>\n"
        );
    }

    #[test]
    fn emphasis_reaches_the_markup() {
        let html = render("He was **very** sure.");
        assert!(html.contains("He was <strong>very</strong> sure."));
    }

    #[test]
    fn double_spaces_are_preserved() {
        let html = render("One.  Two.");
        assert!(html.contains("One.&nbsp; Two."));
    }

    #[test]
    fn full_document_embeds_the_stylesheet() {
        let screenplay = parse("INT. HOUSE - DAY");
        let mut out = Vec::new();
        generate_html(&screenplay, &mut out, &HtmlOptions::default()).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("class=\"screenplay\""));
        assert!(html.contains(".page-break"));
        assert!(html.ends_with("</html>\n"));
    }
}
