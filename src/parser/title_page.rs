use std::collections::HashMap;

use crate::utils::fountain_constants::{TITLE_KEY_RE, TITLE_VALUE_RE};

/// Parses the leading title-page block.
///
/// Each key line is `key: value`. A key with an inline value is complete
/// on its own line; a key with an empty value collects the following
/// lines as long as each is indented by at least three spaces or a tab.
/// Keys keep their original casing, duplicate keys append to the same
/// entry, and value lines are stored raw.
///
/// Returns `None` as soon as a line fails to parse as a key where a key
/// is expected; the caller then treats the whole candidate block as body
/// content.
pub fn parse_title_page(lines: &[String]) -> Option<HashMap<String, Vec<String>>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();

    let mut it = lines.iter();
    let mut current = it.next();
    while let Some(line) = current {
        let caps = TITLE_KEY_RE.captures(line)?;
        let key = caps[1].to_string();
        let value = &caps[2];
        if !value.is_empty() {
            // Single-line key/value.
            result.entry(key).or_default().push(value.to_string());
            current = it.next();
        } else {
            // Indented continuation values until the next key line.
            loop {
                match it.next() {
                    Some(next) => {
                        if let Some(value_caps) = TITLE_VALUE_RE.captures(next) {
                            result
                                .entry(key.clone())
                                .or_default()
                                .push(value_caps[1].to_string());
                        } else {
                            current = Some(next);
                            break;
                        }
                    }
                    None => {
                        current = None;
                        break;
                    }
                }
            }
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &[&str]) -> Vec<String> {
        source.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_single_line_values() {
        let result = parse_title_page(&lines(&[
            "Title: The Long Goodbye",
            "Draft date: 2026-08-06",
        ]))
        .unwrap();
        assert_eq!(result["Title"], vec!["The Long Goodbye"]);
        assert_eq!(result["Draft date"], vec!["2026-08-06"]);
    }

    #[test]
    fn collects_indented_continuation_values() {
        let result = parse_title_page(&lines(&[
            "Title:",
            "    The Long",
            "    Goodbye",
            "Author: Anna",
        ]))
        .unwrap();
        assert_eq!(result["Title"], vec!["The Long", "Goodbye"]);
        assert_eq!(result["Author"], vec!["Anna"]);
    }

    #[test]
    fn duplicate_keys_append() {
        let result = parse_title_page(&lines(&["Author: Anna", "Author: Ben"])).unwrap();
        assert_eq!(result["Author"], vec!["Anna", "Ben"]);
    }

    #[test]
    fn keys_keep_their_casing() {
        let result = parse_title_page(&lines(&["dRaFt DATE: yesterday"])).unwrap();
        assert!(result.contains_key("dRaFt DATE"));
    }

    #[test]
    fn rejects_non_key_lines() {
        assert!(parse_title_page(&lines(&["INT. HOUSE - DAY"])).is_none());
        assert!(parse_title_page(&lines(&["Title: ok", "not a key line"])).is_none());
    }

    #[test]
    fn unindented_line_after_empty_value_must_be_a_key() {
        assert!(parse_title_page(&lines(&["Title:", "no indent here"])).is_none());
    }
}
