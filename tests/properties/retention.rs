//! Property tests for release retention and rollback selection.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use relink::domain::entities::{sort_newest_first, Release};
use relink::domain::services::{releases_to_prune, select_rollback_target};

/// Releases R0..Rn with distinct ages, newest first, at most one current
fn releases() -> impl Strategy<Value = Vec<Release>> {
    (1usize..12).prop_flat_map(|n| {
        (Just(n), proptest::option::of(0..n)).prop_map(|(n, current)| {
            let mut releases: Vec<Release> = (0..n)
                .map(|i| {
                    Release::new(
                        format!("R{:02}", i),
                        format!("/srv/site/releases/R{:02}", i),
                        Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap(),
                        current == Some(i),
                    )
                })
                .collect();
            sort_newest_first(&mut releases);
            releases
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: pruning never removes the live release.
    #[test]
    fn property_prune_spares_current(releases in releases(), keep_n in 1usize..6) {
        let doomed = releases_to_prune(&releases, keep_n);

        prop_assert!(doomed.iter().all(|r| !r.current));
    }

    /// PROPERTY: the newest `keep_n` releases survive.
    #[test]
    fn property_prune_keeps_newest(releases in releases(), keep_n in 1usize..6) {
        let doomed = releases_to_prune(&releases, keep_n);

        for kept in releases.iter().take(keep_n) {
            prop_assert!(doomed.iter().all(|r| r.id != kept.id));
        }
        let survivors = releases.len() - doomed.len();
        prop_assert!(survivors >= keep_n.min(releases.len()));
    }

    /// PROPERTY: rollback never selects the live release.
    #[test]
    fn property_rollback_target_is_not_current(releases in releases()) {
        match select_rollback_target(&releases) {
            Ok(target) => {
                let chosen = releases.iter().find(|r| r.id == target.as_str());
                prop_assert!(chosen.is_some_and(|r| !r.current));
            }
            Err(_) => prop_assert!(releases.iter().all(|r| r.current)),
        }
    }
}
