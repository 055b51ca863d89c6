//! Property tests for manifest serialization and parsing.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use relink::domain::entities::{FileInfo, Manifest};
use relink::domain::value_objects::ContentHash;
use relink::infrastructure::manifest::{parse_manifest, to_json};

fn file_key() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9 ._-]{1,12}").unwrap();
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| segments.join("/"))
}

fn manifest() -> impl Strategy<Value = Manifest> {
    let files = proptest::collection::btree_map(
        file_key(),
        (proptest::collection::vec(any::<u8>(), 0..32), any::<u32>()),
        0..16,
    );
    (files, 0i64..4_000_000_000).prop_map(|(files, secs)| {
        let files: BTreeMap<String, FileInfo> = files
            .into_iter()
            .map(|(key, (content, size))| {
                (key, FileInfo::new(ContentHash::from_bytes(&content), size as u64))
            })
            .collect();
        let build_time = Utc.timestamp_opt(secs, 0).unwrap();
        Manifest::new("20250101-120000-abc1234", build_time, files)
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a written manifest parses back to the same value.
    #[test]
    fn property_manifest_json_round_trip(manifest in manifest()) {
        let json = to_json(&manifest).unwrap();

        let parsed = parse_manifest(json.as_bytes(), "test").unwrap();

        prop_assert_eq!(parsed, manifest);
    }

    /// PROPERTY: parsing arbitrary bytes never panics.
    #[test]
    fn property_parse_manifest_never_panics(
        bytes in proptest::collection::vec(any::<u8>(), 0..256)
    ) {
        let _ = parse_manifest(&bytes, "test");
    }
}
