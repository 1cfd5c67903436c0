//! check::sequence
//!
//! Decides whether one segment id validly follows another in corpus order.
//!
//! # Rules
//!
//! Evaluated in order; the first rule that holds accepts the pair.
//!
//! 1. A new text key starts a new document.
//! 2. Same depth:
//!    - the last component is one more than before,
//!    - the second-to-last component is one more than before,
//!    - the first differing component is one more than before.
//! 3. Different depth:
//!    - the first differing component is one more than before,
//!    - the id got shorter and its last component is lower.
//! 4. The head, read as a range (`23-28` ends at 28, `33-35` starts at 33),
//!    continues the previous head.
//!
//! A baked range where a rule needs a number makes that rule inconclusive,
//! never true.
//!
//! # Alternate ordering
//!
//! Older tooling accepted any increase instead of an increase by one. Every
//! id rejected by [`is_successor`] is an ERROR; those the older reading
//! would accept are also listed in [`OrderReport::alternate_only`] with a
//! WARN note.

use tracing::{error, warn};

use super::{format_ids, report, AllowList, Violations};
use crate::core::types::{SegmentId, SeqPart, Sequence};
use crate::corpus::CorpusIndex;

/// `cur == prev + 1` for two plain numbers.
fn is_next(prev: SeqPart, cur: SeqPart) -> bool {
    match (prev.as_num(), cur.as_num()) {
        (Some(p), Some(c)) => p.checked_add(1) == Some(c),
        _ => false,
    }
}

fn is_last_next(prev: &Sequence, cur: &Sequence) -> bool {
    is_next(prev.last(), cur.last())
}

fn is_second_to_last_next(prev: &Sequence, cur: &Sequence) -> bool {
    match (prev.second_to_last(), cur.second_to_last()) {
        (Some(p), Some(c)) => is_next(p, c),
        _ => false,
    }
}

/// First component where the two differ, with the values on each side.
///
/// A side that ran out of components is `None`.
fn first_difference(
    prev: &Sequence,
    cur: &Sequence,
) -> Option<(Option<SeqPart>, Option<SeqPart>)> {
    let depth = prev.len().max(cur.len());
    (0..depth).find_map(|i| {
        let p = prev.parts().get(i).copied();
        let c = cur.parts().get(i).copied();
        (p != c).then_some((p, c))
    })
}

fn is_elementwise_next(prev: &Sequence, cur: &Sequence) -> bool {
    match first_difference(prev, cur) {
        Some((Some(p), Some(c))) => is_next(p, c),
        _ => false,
    }
}

fn is_shorter_and_lower(prev: &Sequence, cur: &Sequence) -> bool {
    if cur.len() >= prev.len() {
        return false;
    }
    match (prev.last().as_num(), cur.last().as_num()) {
        (Some(p), Some(c)) => c < p,
        _ => false,
    }
}

fn is_head_range_next(prev: &Sequence, cur: &Sequence) -> bool {
    prev.head().upper().checked_add(1) == Some(cur.head().lower())
}

/// Whether `current` may directly follow `previous`.
///
/// # Example
///
/// ```
/// use bilara_check::check::sequence::is_successor;
/// use bilara_check::core::types::SegmentId;
///
/// let id = |s: &str| SegmentId::parse(s).unwrap();
/// assert!(is_successor(&id("a:1.1"), &id("a:1.2")));
/// assert!(is_successor(&id("a:9.9"), &id("b:1.1")));
/// assert!(is_successor(&id("mn13:23-28.6"), &id("mn13:29.1")));
/// assert!(!is_successor(&id("a:1.1"), &id("a:1.1")));
/// ```
pub fn is_successor(previous: &SegmentId, current: &SegmentId) -> bool {
    if current.key() != previous.key() {
        return true;
    }
    let (prev, cur) = (previous.seq(), current.seq());

    let matched = if cur.len() == prev.len() {
        is_last_next(prev, cur)
            || is_second_to_last_next(prev, cur)
            || is_elementwise_next(prev, cur)
    } else {
        is_elementwise_next(prev, cur) || is_shorter_and_lower(prev, cur)
    };
    matched || is_head_range_next(prev, cur)
}

/// The historical, permissive ordering: any increase of the last component,
/// or any increase at some position of the element-wise scan.
pub fn is_successor_permissive(previous: &SegmentId, current: &SegmentId) -> bool {
    if current.key() != previous.key() {
        return true;
    }
    let (prev, cur) = (previous.seq(), current.seq());

    let last_greater = match (prev.last().as_num(), cur.last().as_num()) {
        (Some(p), Some(c)) => c > p,
        _ => false,
    };
    let matched = if cur.len() == prev.len() {
        last_greater || is_second_to_last_next(prev, cur) || is_elementwise_greater(prev, cur)
    } else {
        is_elementwise_greater(prev, cur) || is_shorter_and_lower(prev, cur)
    };
    matched || is_head_range_next(prev, cur)
}

/// Scan left to right; true at the first position where `cur` is greater.
/// Equal and smaller positions are passed over. Stops false at a baked or
/// missing component.
fn is_elementwise_greater(prev: &Sequence, cur: &Sequence) -> bool {
    let depth = prev.len().max(cur.len());
    for i in 0..depth {
        let (Some(p), Some(c)) = (prev.parts().get(i), cur.parts().get(i)) else {
            return false;
        };
        let (Some(p), Some(c)) = (p.as_num(), c.as_num()) else {
            return false;
        };
        if c > p {
            return true;
        }
    }
    false
}

/// One id that does not follow its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    pub previous: SegmentId,
    pub current: SegmentId,
    /// Accepted by [`is_successor_permissive`].
    pub alternate_ok: bool,
}

/// Result of scanning one stream of ids.
#[derive(Debug, Clone, Default)]
pub struct OrderReport {
    /// Violations in stream order.
    pub entries: Vec<OrderViolation>,
}

impl OrderReport {
    /// Every id rejected by [`is_successor`].
    pub fn violations(&self) -> Violations {
        self.entries.iter().map(|v| v.current.clone()).collect()
    }

    /// Ids rejected by [`is_successor`] but accepted by the permissive rules.
    pub fn alternate_only(&self) -> Violations {
        self.entries
            .iter()
            .filter(|v| v.alternate_ok)
            .map(|v| v.current.clone())
            .collect()
    }

    /// Ids rejected under both readings.
    pub fn hard(&self) -> Violations {
        self.entries
            .iter()
            .filter(|v| !v.alternate_ok)
            .map(|v| v.current.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Log each violation at ERROR, then the summaries.
    ///
    /// Ids the alternate rules would accept get an extra WARN note; they are
    /// still violations.
    pub fn log(&self, label: &str) {
        for v in &self.entries {
            error!(
                "[{}] Sequence error. Previous: '{}' current: '{}'",
                label, v.previous, v.current
            );
            if v.alternate_ok {
                warn!(
                    "[{}] '{}' would pass under the alternate ordering rules",
                    label, v.current
                );
            }
        }

        report(label, "unordered segments", &self.violations());
        let alternate = self.alternate_only();
        if !alternate.is_empty() {
            warn!(
                "[{}] There are '{}' unordered segments the alternate rules would accept: {}",
                label,
                alternate.len(),
                format_ids(&alternate)
            );
        }
    }
}

/// Scan ids in order, starting from the `:0-0` sentinel.
///
/// Allowed ids are not checked but still become the new predecessor.
pub fn check_stream<'a>(
    ids: impl IntoIterator<Item = &'a SegmentId>,
    allow: &AllowList,
) -> OrderReport {
    let mut report = OrderReport::default();
    let mut previous = SegmentId::start();

    for current in ids {
        if !allow.contains(current) && !is_successor(&previous, current) {
            report.entries.push(OrderViolation {
                previous: previous.clone(),
                current: current.clone(),
                alternate_ok: is_successor_permissive(&previous, current),
            });
        }
        previous = current.clone();
    }
    report
}

/// Check the ordering of a whole corpus and log the result.
pub fn check_order(corpus: &CorpusIndex, allow: &AllowList) -> OrderReport {
    let report = check_stream(corpus.ids(), allow);
    report.log(corpus.name());
    report
}
