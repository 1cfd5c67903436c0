//! check::segments
//!
//! Set differences between a checked layer and the layer it is based on.

use std::collections::BTreeMap;

use super::{report, AllowList, Violations};
use crate::core::types::SegmentId;
use crate::corpus::{CorpusIndex, LanguageCorpus};

fn difference<'a>(
    ids: impl Iterator<Item = &'a SegmentId>,
    other: &CorpusIndex,
    allow: &AllowList,
) -> Violations {
    ids.filter(|id| !other.contains(id) && !allow.contains(id))
        .cloned()
        .collect()
}

/// Ids of `candidate` that `base` does not have.
///
/// With `suppress_headings`, ids ending in `0` are dropped from the result:
/// a heading added by a later layer is not surplus.
pub fn surplus_ids(
    candidate: &CorpusIndex,
    base: &CorpusIndex,
    allow: &AllowList,
    suppress_headings: bool,
) -> Violations {
    let mut surplus = difference(candidate.ids(), base, allow);
    if suppress_headings {
        surplus.retain(|id| !id.is_heading());
    }
    surplus
}

/// [`surplus_ids`], logged.
pub fn surplus(
    candidate: &CorpusIndex,
    base: &CorpusIndex,
    allow: &AllowList,
    suppress_headings: bool,
) -> Violations {
    let found = surplus_ids(candidate, base, allow, suppress_headings);
    report(
        candidate.name(),
        &format!("uids that are not in the '{}' data", base.name()),
        &found,
    );
    found
}

/// Ids of `base` that `candidate` does not have. Logged.
pub fn missing(candidate: &CorpusIndex, base: &CorpusIndex, allow: &AllowList) -> Violations {
    let found = difference(base.ids(), candidate, allow);
    report(
        candidate.name(),
        &format!("uids from '{}' missing here", base.name()),
        &found,
    );
    found
}

/// [`surplus`] for every language of a multi-language layer.
///
/// Languages with nothing to report are left out.
pub fn surplus_per_language(
    candidate: &LanguageCorpus,
    base: &CorpusIndex,
    allow: &AllowList,
    suppress_headings: bool,
) -> BTreeMap<String, Violations> {
    candidate
        .iter()
        .filter_map(|(lang, corpus)| {
            let found = surplus(corpus, base, allow, suppress_headings);
            (!found.is_empty()).then(|| (lang.to_string(), found))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FileIndex;
    use serde_json::{json, Value};

    fn corpus(name: &str, value: Value) -> CorpusIndex {
        let Value::Object(map) = value else {
            panic!("not an object")
        };
        let file = FileIndex::from_map(map, format!("{name}.json"));
        CorpusIndex::from_files(name, vec![file]).unwrap()
    }

    fn id(raw: &str) -> SegmentId {
        SegmentId::parse(raw).unwrap()
    }

    #[test]
    fn heading_suppression() {
        let base = corpus("root", json!({}));
        let candidate = corpus("html", json!({"a:1.0": "<h1>{}</h1>"}));
        let allow = AllowList::default();
        assert!(surplus(&candidate, &base, &allow, true).is_empty());
        assert_eq!(
            surplus(&candidate, &base, &allow, false),
            Violations::from([id("a:1.0")])
        );
    }

    #[test]
    fn surplus_respects_allow_list() {
        let base = corpus("root", json!({"a:1.1": "x"}));
        let candidate = corpus("comment", json!({"a:1.1": "c", "a:1.2": "c", "a:1.3": "c"}));
        let allow = AllowList::new([id("a:1.3")]);
        assert_eq!(
            surplus(&candidate, &base, &allow, false),
            Violations::from([id("a:1.2")])
        );
    }

    #[test]
    fn missing_is_base_minus_candidate() {
        let base = corpus("root", json!({"a:1.1": "x", "a:1.2": "y", "a:1.3": "z"}));
        let candidate = corpus("html", json!({"a:1.1": "{}"}));
        let allow = AllowList::new([id("a:1.2")]);
        assert_eq!(
            missing(&candidate, &base, &allow),
            Violations::from([id("a:1.3")])
        );
    }

    #[test]
    fn per_language() {
        let base = corpus("html", json!({"a:1.1": "{}"}));
        let en = corpus("translation/en", json!({"a:1.1": "x", "a:1.9": "y"}));
        let de = corpus("translation/de", json!({"a:1.1": "x"}));
        let langs = LanguageCorpus::from_languages(
            "translation",
            BTreeMap::from([("en".to_string(), en), ("de".to_string(), de)]),
        );
        let found = surplus_per_language(&langs, &base, &AllowList::default(), false);
        assert_eq!(found.len(), 1);
        assert_eq!(found["en"], Violations::from([id("a:1.9")]));
    }
}
