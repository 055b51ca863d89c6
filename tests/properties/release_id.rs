//! Property tests for release ID validation.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use relink::domain::value_objects::ReleaseId;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: validation never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,64}") {
        let _ = ReleaseId::parse(&s);
    }

    /// PROPERTY: an accepted ID is a single safe path component.
    #[test]
    fn property_accepted_ids_are_path_safe(s in "(?s).{0,64}") {
        if let Ok(id) = ReleaseId::parse(&s) {
            prop_assert!(!id.as_str().is_empty());
            prop_assert!(!id.as_str().contains('/'));
            prop_assert!(!id.as_str().chars().any(char::is_whitespace));
            prop_assert!(id.as_str() != "." && id.as_str() != "..");
            prop_assert!(!id.as_str().starts_with('-'));
        }
    }

    /// PROPERTY: generated IDs always validate and sort by time.
    #[test]
    fn property_generated_ids_sort_by_time(
        a in 0i64..4_000_000_000,
        b in 0i64..4_000_000_000,
        revision in proptest::option::of("(?s).{0,12}")
    ) {
        let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
        let first = ReleaseId::generate(at(a.min(b)), revision.as_deref());
        let second = ReleaseId::generate(at(a.max(b)), revision.as_deref());

        prop_assert!(ReleaseId::parse(first.as_str()).is_ok());
        prop_assert!(first.as_str()[..15] <= second.as_str()[..15]);
    }
}
