//! check::verses
//!
//! Checks on verse text in corpus order.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

use super::{report, AllowList, Violations};
use crate::core::types::SegmentId;
use crate::core::verse::Verse;

/// `( )`, a single whitespace character, or nothing at all.
static BLANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\(\s\)|\s?$)").expect("valid regex"));

static HEADING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<h\d").expect("valid regex"));

/// Entries whose text repeats the closest preceding non-blank text.
///
/// Blank entries are skipped and do not reset the comparison.
pub fn adjacent_duplicates<'a>(
    label: &str,
    entries: impl IntoIterator<Item = (&'a SegmentId, &'a Verse)>,
    allow: &AllowList,
) -> Violations {
    let mut found = Violations::new();
    let mut previous = "";
    for (id, verse) in entries {
        let text = verse.text().trim();
        if text.is_empty() {
            continue;
        }
        if text == previous && !allow.contains(id) {
            error!("[{}] Same verses next to each other. '{}': '{}'", label, id, text);
            found.insert(id.clone());
        }
        previous = text;
    }
    report(label, "duplicated verses", &found);
    found
}

/// Entries whose text is effectively empty.
pub fn blank_verses<'a>(
    label: &str,
    entries: impl IntoIterator<Item = (&'a SegmentId, &'a Verse)>,
) -> Violations {
    let found: Violations = entries
        .into_iter()
        .filter(|(_, verse)| BLANK.is_match(verse.text()))
        .map(|(id, _)| id.clone())
        .collect();
    report(label, "blank verses", &found);
    found
}

/// Heading markup at an id that does not end in `0`.
pub fn misplaced_headers<'a>(
    label: &str,
    entries: impl IntoIterator<Item = (&'a SegmentId, &'a Verse)>,
    allow: &AllowList,
) -> Violations {
    let mut found = Violations::new();
    for (id, verse) in entries {
        if allow.contains(id) || id.is_heading() {
            continue;
        }
        if HEADING_TAG.is_match(verse.text()) {
            error!("[{}] Possible header not starting the section: '{}'", label, id);
            found.insert(id.clone());
        }
    }
    report(label, "headers that don't start a new section", &found);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: &[(&str, &str)]) -> Vec<(SegmentId, Verse)> {
        raw.iter()
            .map(|(k, v)| (SegmentId::parse(*k).unwrap(), Verse::new(*v)))
            .collect()
    }

    fn refs(entries: &[(SegmentId, Verse)]) -> impl Iterator<Item = (&SegmentId, &Verse)> {
        entries.iter().map(|(id, verse)| (id, verse))
    }

    fn id(raw: &str) -> SegmentId {
        SegmentId::parse(raw).unwrap()
    }

    #[test]
    fn adjacent_duplicate_flags_second() {
        let data = entries(&[("k:1", "hello"), ("k:2", "hello"), ("k:3", "world")]);
        let found = adjacent_duplicates("test", refs(&data), &AllowList::default());
        assert_eq!(found, Violations::from([id("k:2")]));
    }

    #[test]
    fn duplicates_compare_trimmed_and_skip_blanks() {
        let data = entries(&[("k:1", "hello "), ("k:2", "  "), ("k:3", " hello")]);
        let found = adjacent_duplicates("test", refs(&data), &AllowList::default());
        assert_eq!(found, Violations::from([id("k:3")]));
    }

    #[test]
    fn non_adjacent_repeat_ignored() {
        let data = entries(&[("k:1", "a"), ("k:2", "b"), ("k:3", "a")]);
        assert!(adjacent_duplicates("test", refs(&data), &AllowList::default()).is_empty());
    }

    #[test]
    fn duplicate_allow_list() {
        let data = entries(&[("k:1", "a"), ("k:2", "a")]);
        let allow = AllowList::new([id("k:2")]);
        assert!(adjacent_duplicates("test", refs(&data), &allow).is_empty());
    }

    #[test]
    fn blank_patterns() {
        let data = entries(&[
            ("k:1", "( )"),
            ("k:2", " "),
            ("k:3", ""),
            ("k:4", "text"),
            ("k:5", "(text)"),
            ("k:6", "  two spaces"),
        ]);
        let found = blank_verses("test", refs(&data));
        assert_eq!(found, Violations::from([id("k:1"), id("k:2"), id("k:3")]));
    }

    #[test]
    fn headers_need_zero() {
        let data = entries(&[
            ("k:1.0", "<h1 class='sutta-title'>{}</h1>"),
            ("k:1.1", "<p>{}"),
            ("k:1.2", "<h2>{}</h2>"),
            ("k:1.3", "<p><h2>{}</h2>"),
        ]);
        let found = misplaced_headers("test", refs(&data), &AllowList::default());
        assert_eq!(found, Violations::from([id("k:1.2")]));
    }

    #[test]
    fn header_allow_list() {
        let data = entries(&[("dhp416:5", "<h3>{}</h3>")]);
        let allow = AllowList::new([id("dhp416:5")]);
        assert!(misplaced_headers("test", refs(&data), &allow).is_empty());
    }
}
