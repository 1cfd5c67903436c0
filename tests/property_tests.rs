//! Property-based tests for segment ids and ordering.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use bilara_check::check::sequence::{check_stream, is_successor, is_successor_permissive};
use bilara_check::check::AllowList;
use bilara_check::core::types::SegmentId;

/// Strategy for generating valid text keys.
fn text_key() -> impl Strategy<Value = String> {
    "[a-z]{1,5}[0-9]{0,3}(-[a-z0-9]{1,4})?"
}

/// Strategy for generating a sequence component: a number or a baked range.
fn seq_part() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0u32..500).prop_map(|n| n.to_string()),
        1 => (0u32..500, 1u32..10).prop_map(|(a, d)| format!("{}-{}", a, a + d)),
    ]
}

/// Strategy for generating valid raw segment ids. The final component is
/// always a plain number.
fn valid_segment_id() -> impl Strategy<Value = String> {
    (
        text_key(),
        prop::collection::vec(seq_part(), 0..4),
        any::<u64>(),
    )
        .prop_map(|(key, mut parts, last)| {
            parts.push(last.to_string());
            format!("{}:{}", key, parts.join("."))
        })
}

/// Strategy for a numeric prefix shared by consecutive ids.
fn numeric_prefix() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..100, 0..4)
}

fn join(prefix: &[u32], last: u32) -> String {
    let mut parts: Vec<String> = prefix.iter().map(u32::to_string).collect();
    parts.push(last.to_string());
    parts.join(".")
}

proptest! {
    /// Any valid id keeps its spelling.
    #[test]
    fn segment_id_display_roundtrip(raw in valid_segment_id()) {
        let id = SegmentId::parse(raw.as_str()).unwrap();
        prop_assert_eq!(id.to_string(), raw);
    }

    /// A baked range is never accepted as the final component.
    #[test]
    fn baked_final_component_rejected(
        raw in valid_segment_id(),
        start in 0u64..500,
        width in 1u64..10,
    ) {
        let baked = format!("{}.{}-{}", raw, start, start + width);
        prop_assert!(SegmentId::parse(baked).is_err());
    }

    /// Any valid id round-trips through serde.
    #[test]
    fn segment_id_serde_roundtrip(raw in valid_segment_id()) {
        let id = SegmentId::parse(raw.as_str()).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: SegmentId = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(id, parsed);
    }

    /// Whitespace anywhere makes an id invalid.
    #[test]
    fn whitespace_rejected(raw in valid_segment_id(), at in any::<prop::sample::Index>()) {
        let pos = at.index(raw.len() + 1);
        let mut spaced = raw.clone();
        spaced.insert(pos, ' ');
        prop_assert!(SegmentId::parse(spaced).is_err());
    }

    /// An id never follows itself.
    #[test]
    fn id_does_not_follow_itself(raw in valid_segment_id()) {
        let id = SegmentId::parse(raw.as_str()).unwrap();
        prop_assert!(!is_successor(&id, &id));
    }

    /// Incrementing the last component is always a valid step.
    #[test]
    fn last_component_increment_follows(
        key in text_key(),
        prefix in numeric_prefix(),
        start in 0u32..1000,
    ) {
        let prev = SegmentId::parse(format!("{}:{}", key, join(&prefix, start))).unwrap();
        let cur = SegmentId::parse(format!("{}:{}", key, join(&prefix, start + 1))).unwrap();
        prop_assert!(is_successor(&prev, &cur));
        prop_assert!(is_successor_permissive(&prev, &cur));
    }

    /// A run of consecutive ids produces an empty report.
    #[test]
    fn consecutive_run_is_ordered(
        key in text_key(),
        prefix in numeric_prefix(),
        start in 0u32..1000,
        len in 1usize..40,
    ) {
        let ids: Vec<SegmentId> = (0..len as u32)
            .map(|i| SegmentId::parse(format!("{}:{}", key, join(&prefix, start + i))).unwrap())
            .collect();
        let report = check_stream(&ids, &AllowList::default());
        prop_assert!(report.is_empty(), "unexpected: {:?}", report.entries);
    }

    /// Skipping ahead in the last component is rejected canonically but
    /// accepted by the permissive reading.
    #[test]
    fn gap_is_alternate_only(
        key in text_key(),
        start in 1u32..1000,
        gap in 2u32..50,
    ) {
        let prev = SegmentId::parse(format!("{}:{}.{}", key, start, start)).unwrap();
        let cur = SegmentId::parse(format!("{}:{}.{}", key, start, start + gap)).unwrap();
        prop_assert!(!is_successor(&prev, &cur));
        prop_assert!(is_successor_permissive(&prev, &cur));
    }

    /// An allowed id is never reported, and the scan continues from it.
    #[test]
    fn allowed_gap_not_reported(
        key in text_key(),
        start in 1u32..1000,
        gap in 2u32..50,
    ) {
        let ids = vec![
            SegmentId::parse(format!("{}:{}", key, start)).unwrap(),
            SegmentId::parse(format!("{}:{}", key, start + gap)).unwrap(),
            SegmentId::parse(format!("{}:{}", key, start + gap + 1)).unwrap(),
        ];
        let allow = AllowList::new([ids[1].clone()]);
        prop_assert!(check_stream(&ids, &allow).is_empty());
        prop_assert_eq!(check_stream(&ids, &AllowList::default()).entries.len(), 1);
    }
}
