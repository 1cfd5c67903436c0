//! xref
//!
//! Cross-reference engine between segment ids and external manuscript ids.
//!
//! # Indices
//!
//! - **forward**: segment id to its single manuscript id. A cell naming more
//!   than one manuscript id is ambiguous and left out.
//! - **inverse**: manuscript id to every segment id that names it. Buckets
//!   with more than one member are conflicts; they are logged and kept.
//!
//! # Example
//!
//! ```
//! use bilara_check::corpus::ReferenceTable;
//! use bilara_check::xref::CrossReferenceIndex;
//!
//! let table = ReferenceTable::from_entries(
//!     "mem",
//!     vec![
//!         ("w:1.1".into(), "sc2, pts-cs1.1, ms1V_2".into()),
//!         ("w:1.2".into(), "ms1, ms2".into()),
//!     ],
//! )
//! .unwrap();
//! let xref = CrossReferenceIndex::build(&table);
//! assert_eq!(xref.forward().len(), 1);
//! assert_eq!(xref.ambiguous().len(), 1);
//! ```

pub mod audit;
pub mod manuscript;

pub use manuscript::ManuscriptCorpus;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, error, info, warn};

use crate::check::format_ids;
use crate::core::external::{ExternalId, References};
use crate::core::types::SegmentId;
use crate::corpus::ReferenceTable;

/// Forward and inverse indices over a reference table.
#[derive(Debug, Clone, Default)]
pub struct CrossReferenceIndex {
    forward: BTreeMap<SegmentId, ExternalId>,
    inverse: BTreeMap<ExternalId, BTreeSet<SegmentId>>,
    /// Every valid row, classified, in table order
    references: Vec<(SegmentId, References)>,
    ambiguous: BTreeSet<SegmentId>,
    invalid_keys: Vec<String>,
}

impl CrossReferenceIndex {
    /// Classify every cell of `table` and build both indices.
    pub fn build(table: &ReferenceTable) -> Self {
        let mut index = Self::default();

        for (raw, cell) in table.iter() {
            let id = match SegmentId::parse(raw) {
                Ok(id) => id,
                Err(e) => {
                    error!("[xref] Skipping reference row: {}", e);
                    index.invalid_keys.push(raw.to_string());
                    continue;
                }
            };
            let refs = References::parse(cell);
            let mut manuscripts = refs.manuscripts().iter();
            match (manuscripts.next(), manuscripts.next()) {
                (Some(ms), None) => {
                    index.forward.insert(id.clone(), ms.clone());
                }
                (Some(_), Some(_)) => {
                    error!(
                        "[xref] Segment '{}' is referencing several manuscript ids: {}",
                        id, cell
                    );
                    index.ambiguous.insert(id.clone());
                }
                (None, _) => {}
            }
            index.references.push((id, refs));
        }

        for (id, ms) in &index.forward {
            index
                .inverse
                .entry(ms.clone())
                .or_default()
                .insert(id.clone());
        }
        for (ms, ids) in index.conflicts() {
            error!(
                "[xref] Manuscript id '{}' is referencing several segments: {}",
                ms,
                format_ids(ids)
            );
        }

        if index.forward.len() != index.inverse.len() {
            warn!(
                "[xref] segment->manuscript and manuscript->segment indexes are different lengths. '{}' vs '{}'",
                index.forward.len(),
                index.inverse.len()
            );
        }
        info!(
            "[xref] Indexed '{}' segments, '{}' manuscript ids, '{}' ambiguous",
            index.forward.len(),
            index.inverse.len(),
            index.ambiguous.len()
        );
        index
    }

    pub fn forward(&self) -> &BTreeMap<SegmentId, ExternalId> {
        &self.forward
    }

    pub fn inverse(&self) -> &BTreeMap<ExternalId, BTreeSet<SegmentId>> {
        &self.inverse
    }

    /// Manuscript id of a segment, if unambiguous.
    pub fn manuscript_of(&self, id: &SegmentId) -> Option<&ExternalId> {
        self.forward.get(id)
    }

    /// Segments naming a manuscript id.
    pub fn segments_of(&self, ms: &ExternalId) -> Option<&BTreeSet<SegmentId>> {
        self.inverse.get(ms)
    }

    /// Inverse buckets with more than one segment.
    pub fn conflicts(&self) -> impl Iterator<Item = (&ExternalId, &BTreeSet<SegmentId>)> {
        self.inverse.iter().filter(|(_, ids)| ids.len() > 1)
    }

    /// Segments whose cell named several manuscript ids.
    pub fn ambiguous(&self) -> &BTreeSet<SegmentId> {
        &self.ambiguous
    }

    /// Raw table keys that are not valid segment ids.
    pub fn invalid_keys(&self) -> &[String] {
        &self.invalid_keys
    }

    /// Every valid row, classified, in table order.
    pub fn references(&self) -> &[(SegmentId, References)] {
        &self.references
    }

    /// Compare the inverse index with the ids of a manuscript corpus.
    pub fn reconcile(&self, external: &BTreeSet<ExternalId>) -> Reconciliation {
        let unplaceable = external
            .iter()
            .filter(|ms| !self.inverse.contains_key(*ms))
            .cloned()
            .collect();
        let dangling = self
            .inverse
            .keys()
            .filter(|ms| !external.contains(*ms))
            .cloned()
            .collect();
        Reconciliation {
            unplaceable,
            dangling,
        }
    }
}

/// Result of [`CrossReferenceIndex::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// External ids no segment refers to.
    pub unplaceable: BTreeSet<ExternalId>,
    /// Referenced ids the external corpus does not have.
    pub dangling: BTreeSet<ExternalId>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.unplaceable.is_empty() && self.dangling.is_empty()
    }

    pub fn log(&self) {
        log_ids(
            "manuscript ids that are not found in the reference data",
            &self.unplaceable,
        );
        log_ids(
            "wrong manuscript ids in the reference data",
            &self.dangling,
        );
    }
}

fn log_ids(what: &str, ids: &BTreeSet<ExternalId>) {
    if ids.is_empty() {
        debug!("[xref] No {}", what);
        return;
    }
    let joined: Vec<&str> = ids.iter().map(ExternalId::as_str).collect();
    error!("[xref] There are '{}' {}", ids.len(), what);
    error!("[xref] {}: [{}]", what, joined.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> ReferenceTable {
        ReferenceTable::from_entries(
            "mem",
            rows.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
        .unwrap()
    }

    fn id(raw: &str) -> SegmentId {
        SegmentId::parse(raw).unwrap()
    }

    fn ms(raw: &str) -> ExternalId {
        ExternalId::manuscript(raw).unwrap()
    }

    #[test]
    fn single_manuscript_maps_forward() {
        let xref = CrossReferenceIndex::build(&table(&[("w:1.1", "sc2, pts-cs1.1, ms1V_2")]));
        assert_eq!(xref.manuscript_of(&id("w:1.1")), Some(&ms("ms1V_2")));
        assert_eq!(
            xref.segments_of(&ms("ms1V_2")),
            Some(&BTreeSet::from([id("w:1.1")]))
        );
    }

    #[test]
    fn several_manuscripts_are_ambiguous() {
        let xref = CrossReferenceIndex::build(&table(&[("w:1.1", "ms1,ms2")]));
        assert!(xref.forward().is_empty());
        assert!(xref.ambiguous().contains(&id("w:1.1")));
    }

    #[test]
    fn repeated_manuscript_in_one_cell_is_not_ambiguous() {
        let xref = CrossReferenceIndex::build(&table(&[("w:1.1", "ms1V_2, ms1V_2")]));
        assert_eq!(xref.forward().len(), 1);
        assert!(xref.ambiguous().is_empty());
    }

    #[test]
    fn rows_without_manuscript_are_skipped() {
        let xref = CrossReferenceIndex::build(&table(&[("w:1.1", "sc1, msdiv3")]));
        assert!(xref.forward().is_empty());
        assert!(xref.ambiguous().is_empty());
        assert_eq!(xref.references().len(), 1);
    }

    #[test]
    fn invalid_keys_recorded() {
        let xref = CrossReferenceIndex::build(&table(&[("bad key", "ms1"), ("w:1", "ms2")]));
        assert_eq!(xref.invalid_keys(), &["bad key".to_string()]);
        assert_eq!(xref.forward().len(), 1);
    }

    #[test]
    fn conflicts_are_retained() {
        let xref = CrossReferenceIndex::build(&table(&[("w:1.1", "ms1"), ("w:1.2", "ms1")]));
        assert_eq!(xref.forward().len(), 2);
        assert_eq!(xref.inverse().len(), 1);
        let conflicts: Vec<_> = xref.conflicts().collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].1.len(), 2);
    }

    #[test]
    fn reconcile_both_directions() {
        let xref = CrossReferenceIndex::build(&table(&[("w:1.1", "ms1"), ("w:1.2", "ms2")]));
        let external = BTreeSet::from([ms("ms2"), ms("ms3")]);
        let result = xref.reconcile(&external);
        assert_eq!(result.unplaceable, BTreeSet::from([ms("ms3")]));
        assert_eq!(result.dangling, BTreeSet::from([ms("ms1")]));
        assert!(!result.is_empty());
    }
}
