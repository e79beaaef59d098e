use screenwright::{parse, Paragraph, Style};

const SCRIPT: &str = "\
Title:
    _**A Night Errand**_
Credit: Written by
Author: Anna Example
Draft date: 2026-08-06
Contact:
    anna@example.com

# Act One

= Anna sets out after dark.

INT. HOUSE - NIGHT #1#

The hallway lies in darkness. A clock ticks somewhere out of sight.

ANNA
(whispering)
Is anyone there?

BOB ^
Nobody here but us.

They stand still, listening.

> THE LIGHTS GO OUT <

CUT TO:

EXT. GARDEN - NIGHT

/* The garden scene still needs
   a proper rewrite. */
Anna crosses the wet grass, her torch beam swinging **wildly**.

> FADE OUT

===

.EPILOGUE

The house is quiet again.
";

#[test]
fn full_script_parses_into_the_expected_paragraph_sequence() {
    let screenplay = parse(SCRIPT);

    assert_eq!(
        screenplay.title_page["Title"],
        vec!["_**A Night Errand**_"],
        "title values stay raw in the title page"
    );
    assert_eq!(screenplay.title_page["Credit"], vec!["Written by"]);
    assert_eq!(screenplay.title_page["Author"], vec!["Anna Example"]);
    assert_eq!(screenplay.title_page["Contact"], vec!["anna@example.com"]);

    let title = screenplay.get_rich_attribute("Title");
    assert_eq!(title.len(), 1);
    assert_eq!(title[0].plain_text(), "A Night Errand");
    assert!(title[0].segments[0].styles.contains(&Style::Bold));
    assert!(title[0].segments[0].styles.contains(&Style::Underline));

    let kinds: Vec<&str> = screenplay
        .paragraphs
        .iter()
        .map(|p| match p {
            Paragraph::Slug { .. } => "slug",
            Paragraph::Section { .. } => "section",
            Paragraph::Dialog(_) => "dialog",
            Paragraph::DualDialog { .. } => "dual",
            Paragraph::Action { centered: true, .. } => "centered",
            Paragraph::Action { .. } => "action",
            Paragraph::Transition { .. } => "transition",
            Paragraph::PageBreak => "page_break",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "section",
            "slug",
            "action",
            "dual",
            "action",
            "centered",
            "transition",
            "slug",
            "action",
            "transition",
            "page_break",
            "slug",
            "action",
        ],
        "paragraph order must match source order"
    );
}

#[test]
fn section_synopsis_and_scene_number_land_on_their_paragraphs() {
    let screenplay = parse(SCRIPT);

    match &screenplay.paragraphs[0] {
        Paragraph::Section {
            text,
            level,
            synopsis,
        } => {
            assert_eq!(text.plain_text(), "Act One");
            assert_eq!(*level, 1);
            assert_eq!(synopsis.as_deref(), Some("Anna sets out after dark."));
        }
        other => panic!("expected section first, got {:?}", other),
    }

    match &screenplay.paragraphs[1] {
        Paragraph::Slug {
            line, scene_number, ..
        } => {
            assert_eq!(line.plain_text(), "INT. HOUSE - NIGHT");
            assert_eq!(
                scene_number.as_ref().map(|n| n.plain_text()),
                Some("1".to_string())
            );
        }
        other => panic!("expected slug, got {:?}", other),
    }
}

#[test]
fn dual_dialog_merges_and_strips_the_caret() {
    let screenplay = parse(SCRIPT);

    match &screenplay.paragraphs[3] {
        Paragraph::DualDialog { left, right } => {
            assert_eq!(left.character.plain_text(), "ANNA");
            assert_eq!(right.character.plain_text(), "BOB");
            assert!(
                !right.character.plain_text().contains('^'),
                "merge marker must not leak into the right cue"
            );
            assert_eq!(left.blocks[0], (true, screenwright::plain("(whispering)")));
            assert_eq!(left.blocks[1].0, false);
        }
        other => panic!("expected dual dialog, got {:?}", other),
    }
}

#[test]
fn boneyard_and_forced_markers_resolve() {
    let screenplay = parse(SCRIPT);

    // The boneyard comment disappeared from the garden action.
    match &screenplay.paragraphs[8] {
        Paragraph::Action { lines, .. } => {
            assert_eq!(lines.len(), 1);
            assert!(lines[0].plain_text().starts_with("Anna crosses"));
        }
        other => panic!("expected action, got {:?}", other),
    }

    // "> FADE OUT" has no closing bracket, so it forces a transition.
    match &screenplay.paragraphs[9] {
        Paragraph::Transition { line } => assert_eq!(line.plain_text(), "FADE OUT"),
        other => panic!("expected transition, got {:?}", other),
    }

    // ".EPILOGUE" forces a slug past the page break.
    assert_eq!(screenplay.paragraphs[10], Paragraph::PageBreak);
    match &screenplay.paragraphs[11] {
        Paragraph::Slug { line, .. } => assert_eq!(line.plain_text(), "EPILOGUE"),
        other => panic!("expected slug, got {:?}", other),
    }
}

#[test]
fn markup_free_lines_survive_a_round_trip() {
    let line = "The hallway lies in darkness. A clock ticks somewhere out of sight.";
    let screenplay = parse(line);
    match &screenplay.paragraphs[0] {
        Paragraph::Action { lines, .. } => {
            assert_eq!(lines[0].plain_text(), line);
            assert_eq!(lines[0].to_html(), line);
        }
        other => panic!("expected action, got {:?}", other),
    }
}
