//! xref::audit
//!
//! Consistency audits of the reference layer itself.

use std::collections::{BTreeMap, BTreeSet};

use tracing::error;

use super::CrossReferenceIndex;
use crate::check::{report, Violations};
use crate::core::external::ExternalId;
use crate::corpus::CorpusIndex;

/// Forward keys that the root text does not have.
pub fn unknown_segments(xref: &CrossReferenceIndex, root: &CorpusIndex) -> Violations {
    let found: Violations = xref
        .forward()
        .keys()
        .filter(|id| !root.contains(id))
        .cloned()
        .collect();
    report("xref", "wrong segment ids in the reference data", &found);
    found
}

/// Manuscript ids named by more than one reference cell, grouped by how many
/// cells name them.
pub fn duplicated_manuscript_ids(
    xref: &CrossReferenceIndex,
) -> BTreeMap<usize, BTreeSet<ExternalId>> {
    let mut counts: BTreeMap<&ExternalId, usize> = BTreeMap::new();
    for (_, refs) in xref.references() {
        for ms in refs.manuscripts() {
            *counts.entry(ms).or_default() += 1;
        }
    }

    let mut grouped: BTreeMap<usize, BTreeSet<ExternalId>> = BTreeMap::new();
    for (ms, count) in counts {
        if count > 1 {
            grouped.entry(count).or_default().insert(ms.clone());
        }
    }

    for (count, ids) in &grouped {
        let joined: Vec<&str> = ids.iter().map(ExternalId::as_str).collect();
        error!(
            "[xref] There are '{}' manuscript ids used {} times in the references: [{}]",
            ids.len(),
            count,
            joined.join(", ")
        );
    }
    grouped
}

/// Rows whose alternate-edition id is not `nya<head of sequence>`.
pub fn misaligned_alternate_edition(xref: &CrossReferenceIndex) -> Violations {
    let found: Violations = xref
        .references()
        .iter()
        .filter(|(id, refs)| {
            refs.alternate_edition()
                .is_some_and(|nya| nya.as_str() != format!("nya{}", id.seq().head()))
        })
        .map(|(id, _)| id.clone())
        .collect();
    report("xref", "alternate edition refs not aligned with segment ids", &found);
    found
}

/// Rows under text keys starting with `prefix` whose PTS cross number is not
/// a prefix of the sequence.
///
/// PTS cross ids listed in `ignore` are skipped.
pub fn misaligned_pts_cross(
    xref: &CrossReferenceIndex,
    prefix: &str,
    ignore: &[String],
) -> Violations {
    let mut found = Violations::new();
    for (id, refs) in xref.references() {
        if !id.key().as_str().starts_with(prefix) {
            continue;
        }
        let Some(pts) = refs.pts_cross() else {
            continue;
        };
        if ignore.iter().any(|skip| skip == pts.as_str()) {
            continue;
        }
        let Some(number) = pts.pts_no() else {
            continue;
        };
        if !id.raw_seq().starts_with(number) {
            error!("[xref] Wrong segment id '{}' for pts cross number: {}", id, pts);
            found.insert(id.clone());
        }
    }
    report("xref", "segments misaligned with their pts cross number", &found);
    found
}
