//! Property tests for change batch folding.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use kiln::domain::value_objects::{ChangeBatch, ChangeKind};

fn change() -> impl Strategy<Value = (PathBuf, ChangeKind)> {
    (
        proptest::sample::select(vec!["a.css", "b.js", "c.png"]),
        proptest::sample::select(vec![ChangeKind::Added, ChangeKind::Modified, ChangeKind::Removed]),
    )
        .prop_map(|(name, kind)| (PathBuf::from(name), kind))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every path lands in exactly one category, however events interleave.
    #[test]
    fn property_each_path_has_one_kind(
        changes in proptest::collection::vec(change(), 0..16)
    ) {
        let mut batch = ChangeBatch::new();
        for (path, kind) in &changes {
            batch.record(path.clone(), *kind);
        }

        let listed: Vec<&Path> = batch.paths().collect();
        let distinct: BTreeSet<&Path> = listed.iter().copied().collect();
        prop_assert_eq!(listed.len(), distinct.len());
        prop_assert_eq!(batch.len(), distinct.len());
        for path in distinct {
            prop_assert!(batch.kind_of(path).is_some());
        }
    }

    /// PROPERTY: The last event for a path decides whether it still exists.
    #[test]
    fn property_last_event_decides_existence(
        changes in proptest::collection::vec(change(), 1..16)
    ) {
        let mut batch = ChangeBatch::new();
        for (path, kind) in &changes {
            batch.record(path.clone(), *kind);
        }

        let (path, last) = changes.last().cloned().unwrap();
        let kind = batch.kind_of(&path);
        if last == ChangeKind::Removed {
            prop_assert!(kind.is_none() || kind == Some(ChangeKind::Removed));
        } else {
            prop_assert!(kind.is_some() && kind != Some(ChangeKind::Removed));
        }
    }
}
