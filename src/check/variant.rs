//! check::variant
//!
//! Variant readings are written as `word → reading`. The word must be found
//! in the root verse at the same id.

use tracing::error;

use super::{report, AllowList, Violations};
use crate::corpus::CorpusIndex;

const ARROW: char = '→';
const ELLIPSIS: char = '…';

/// Trim, drop straight and curly double quotes, lowercase.
fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '“' | '”'))
        .collect::<String>()
        .to_lowercase()
}

/// The normalized word before the arrow, or `None` for an entry without one.
///
/// Only the part before an ellipsis counts, so `evaṁ…sutaṁ → x` looks for
/// `evaṁ`.
pub fn variant_word(text: &str) -> Option<String> {
    let (word, _) = text.split_once(ARROW)?;
    let word = word.split(ELLIPSIS).next().unwrap_or(word);
    Some(normalize(word))
}

/// Variant entries whose word is absent from the root verse, or whose id
/// has no root verse at all.
pub fn arrow_mismatches(
    variant: &CorpusIndex,
    root: &CorpusIndex,
    allow: &AllowList,
) -> Violations {
    let mut found = Violations::new();
    for (id, verse) in variant.iter() {
        let Some(word) = variant_word(verse.text()) else {
            continue;
        };
        if allow.contains(id) {
            continue;
        }
        match root.get(id) {
            None => {
                error!("[{}] Key '{}' was not found in '{}'", variant.name(), id, root.name());
                found.insert(id.clone());
            }
            Some(base) if !normalize(base.text()).contains(&word) => {
                error!(
                    "[{}] Word '{}' not found in the base verse: '{}': '{}'",
                    variant.name(),
                    word,
                    id,
                    base.text()
                );
                found.insert(id.clone());
            }
            Some(_) => {}
        }
    }
    report(variant.name(), "variants that don't match the root text", &found);
    found
}

/// Variant entries without an arrow.
pub fn unknown_variants(variant: &CorpusIndex, allow: &AllowList) -> Violations {
    let found: Violations = variant
        .iter()
        .filter(|(id, verse)| !verse.text().contains(ARROW) && !allow.contains(id))
        .map(|(id, _)| id.clone())
        .collect();
    report(variant.name(), "variants that are not validated", &found);
    found
}
