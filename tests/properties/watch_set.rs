//! Property tests for watch set reconciliation.

use std::collections::BTreeSet;
use std::path::PathBuf;

use proptest::prelude::*;

use kiln::domain::value_objects::WatchSet;

fn path() -> impl Strategy<Value = PathBuf> {
    proptest::sample::select(vec!["a", "b", "c", "d", "e", "f", "pkg.json", "lock.yaml"])
        .prop_map(|name| PathBuf::from("/ws").join(name))
}

fn report() -> impl Strategy<Value = Vec<PathBuf>> {
    proptest::collection::vec(path(), 0..6)
}

fn pinned() -> Vec<PathBuf> {
    vec![PathBuf::from("/ws/pkg.json"), PathBuf::from("/ws/lock.yaml")]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A failed build never unwatches anything.
    #[test]
    fn property_failed_rebuild_never_prunes(
        initial in report(),
        rebuilds in proptest::collection::vec(report(), 1..5)
    ) {
        let mut set = WatchSet::new(pinned());
        set.seed(&initial);

        for reported in rebuilds {
            let before: BTreeSet<PathBuf> = set.tracked().map(PathBuf::from).collect();
            let delta = set.reconcile(&reported, false);

            prop_assert!(delta.removed.is_empty());
            for path in before.iter().chain(reported.iter()) {
                prop_assert!(set.is_watched(path));
            }
        }
    }

    /// PROPERTY: Pinned paths are never added or removed by a reconcile.
    #[test]
    fn property_pinned_paths_survive(
        initial in report(),
        rebuilds in proptest::collection::vec((report(), any::<bool>()), 1..5)
    ) {
        let mut set = WatchSet::new(pinned());
        set.seed(&initial);

        for (reported, success) in rebuilds {
            let delta = set.reconcile(&reported, success);

            for pin in pinned() {
                prop_assert!(!delta.removed.contains(&pin));
                prop_assert!(!delta.added.contains(&pin));
                prop_assert!(set.is_watched(&pin));
            }
        }
    }

    /// PROPERTY: After a successful build the tracked set is exactly the report.
    #[test]
    fn property_success_mirrors_report(
        initial in report(),
        history in proptest::collection::vec((report(), any::<bool>()), 0..4),
        last in report()
    ) {
        let mut set = WatchSet::new(pinned());
        set.seed(&initial);
        for (reported, success) in history {
            set.reconcile(&reported, success);
        }

        set.reconcile(&last, true);

        let tracked: BTreeSet<PathBuf> = set.tracked().map(PathBuf::from).collect();
        let expected: BTreeSet<PathBuf> = last.into_iter().collect();
        prop_assert_eq!(tracked, expected);
    }

    /// PROPERTY: The delta never lists a path twice or on both sides.
    #[test]
    fn property_delta_is_disjoint(
        initial in report(),
        reported in report(),
        success in any::<bool>()
    ) {
        let mut set = WatchSet::new(pinned());
        set.seed(&initial);

        let delta = set.reconcile(&reported, success);

        let added: BTreeSet<&PathBuf> = delta.added.iter().collect();
        let removed: BTreeSet<&PathBuf> = delta.removed.iter().collect();
        prop_assert_eq!(added.len(), delta.added.len());
        prop_assert_eq!(removed.len(), delta.removed.len());
        prop_assert!(added.is_disjoint(&removed));
    }
}
