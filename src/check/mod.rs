//! check
//!
//! Consistency checks over loaded indices.
//!
//! # Modules
//!
//! - [`sequence`] - Segment ordering within a stream of ids
//! - [`segments`] - Missing and surplus segments between two layers
//! - [`verses`] - Duplicate, blank and misplaced-header verses
//! - [`variant`] - Variant readings against the root text
//!
//! # Invariants
//!
//! - Checks never mutate their inputs
//! - Every check returns the complete, sorted violation set; nothing is
//!   raised
//! - A non-empty result is logged at ERROR as a count followed by the sorted
//!   membership, which is what drives the exit status

pub mod segments;
pub mod sequence;
pub mod variant;
pub mod verses;

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, error};

use crate::core::types::{SegmentId, TypeError};

/// A sorted set of offending segment ids.
pub type Violations = BTreeSet<SegmentId>;

/// Segment ids a check must not report.
#[derive(Debug, Clone, Default)]
pub struct AllowList(HashSet<SegmentId>);

impl AllowList {
    pub fn new(ids: impl IntoIterator<Item = SegmentId>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Parse a raw allow-list from configuration.
    ///
    /// # Errors
    ///
    /// Returns the first entry that is not a valid segment id.
    pub fn from_config(raw: &[String]) -> Result<Self, TypeError> {
        raw.iter()
            .map(|s| SegmentId::parse(s.as_str()))
            .collect::<Result<HashSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, id: &SegmentId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Render ids as a bracketed, comma-separated list.
pub(crate) fn format_ids<'a>(ids: impl IntoIterator<Item = &'a SegmentId>) -> String {
    let joined: Vec<&str> = ids.into_iter().map(SegmentId::as_str).collect();
    format!("[{}]", joined.join(", "))
}

/// Log a violation set: a count line and the sorted membership.
pub(crate) fn report(check: &str, what: &str, ids: &Violations) {
    if ids.is_empty() {
        debug!("[{}] No {}", check, what);
        return;
    }
    error!("[{}] There are '{}' {}", check, ids.len(), what);
    error!("[{}] {}: {}", check, what, format_ids(ids));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_from_config() {
        let allow = AllowList::from_config(&["mn1:1.1".into(), "dhp416:5".into()]).unwrap();
        assert_eq!(allow.len(), 2);
        assert!(allow.contains(&SegmentId::parse("dhp416:5").unwrap()));
        assert!(!allow.contains(&SegmentId::parse("mn1:1.2").unwrap()));
    }

    #[test]
    fn allow_list_rejects_bad_entry() {
        assert!(AllowList::from_config(&["not valid".into()]).is_err());
    }

    #[test]
    fn format_ids_in_given_order() {
        let ids: Violations = ["b:1", "a:1"]
            .into_iter()
            .map(|s| SegmentId::parse(s).unwrap())
            .collect();
        assert_eq!(format_ids(&ids), "[a:1, b:1]");
    }
}
