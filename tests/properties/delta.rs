//! Property tests for the delta calculation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use proptest::prelude::*;

use relink::domain::entities::{FileInfo, Manifest};
use relink::domain::services::compute_delta;
use relink::domain::value_objects::ContentHash;

fn file_key() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z0-9_-]{1,8}").unwrap();
    proptest::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"))
}

/// Small content alphabet so local and remote digests collide often
fn files() -> impl Strategy<Value = BTreeMap<String, FileInfo>> {
    proptest::collection::btree_map(file_key(), 0u8..4, 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, content)| {
                let info = FileInfo::new(ContentHash::from_bytes(&[content]), 1);
                (key, info)
            })
            .collect()
    })
}

fn manifest(files: BTreeMap<String, FileInfo>) -> Manifest {
    Manifest::new("R", Utc::now(), files)
}

fn is_sorted(paths: &[String]) -> bool {
    paths.windows(2).all(|w| w[0] < w[1])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: changed and unchanged partition the local key set.
    #[test]
    fn property_delta_partitions_local_keys(local in files(), remote in files()) {
        let local = manifest(local);
        let remote = manifest(remote);

        let delta = compute_delta(&local, &remote);

        let changed: BTreeSet<&String> = delta.changed.iter().collect();
        let unchanged: BTreeSet<&String> = delta.unchanged.iter().collect();
        prop_assert!(changed.is_disjoint(&unchanged));

        let union: BTreeSet<&String> = changed.union(&unchanged).copied().collect();
        let keys: BTreeSet<&String> = local.files().keys().collect();
        prop_assert_eq!(union, keys);
    }

    /// PROPERTY: deleted is exactly the remote keys missing locally.
    #[test]
    fn property_delta_deleted_is_remote_minus_local(local in files(), remote in files()) {
        let local = manifest(local);
        let remote = manifest(remote);

        let delta = compute_delta(&local, &remote);

        let expected: Vec<String> = remote
            .files()
            .keys()
            .filter(|k| !local.contains(k))
            .cloned()
            .collect();
        prop_assert_eq!(delta.deleted, expected);
    }

    /// PROPERTY: every output list is sorted and free of duplicates.
    #[test]
    fn property_delta_outputs_sorted(local in files(), remote in files()) {
        let delta = compute_delta(&manifest(local), &manifest(remote));

        prop_assert!(is_sorted(&delta.changed));
        prop_assert!(is_sorted(&delta.unchanged));
        prop_assert!(is_sorted(&delta.deleted));
    }

    /// PROPERTY: a manifest compared with itself has nothing to upload.
    #[test]
    fn property_delta_against_self_is_noop(local in files()) {
        let local = manifest(local);

        let delta = compute_delta(&local, &local);

        prop_assert!(delta.is_noop());
        prop_assert!(delta.deleted.is_empty());
        prop_assert_eq!(delta.unchanged.len(), local.len());
    }

    /// PROPERTY: against an empty remote every local file is changed.
    #[test]
    fn property_delta_first_deploy_changes_everything(local in files()) {
        let local = manifest(local);

        let delta = compute_delta(&local, &Manifest::empty());

        prop_assert_eq!(delta.changed.len(), local.len());
        prop_assert!(delta.unchanged.is_empty());
        prop_assert!(delta.deleted.is_empty());
    }
}
