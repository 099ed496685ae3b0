//! Property tests for value normalization.

use proptest::prelude::*;
use ranktab_normalization::{is_estimated, normalize, split_values};

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (0u32..1000, 0u32..100).prop_map(|(i, f)| format!("{i}.{f:02}")),
        "[a-zA-Z]{1,6}",
    ]
}

fn marked_segment() -> impl Strategy<Value = String> {
    (segment(), any::<bool>()).prop_map(|(s, estimated)| if estimated { format!("{s}?") } else { s })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn normalize_never_keeps_separators_or_markers(parts in prop::collection::vec(marked_segment(), 1..5)) {
        let raw = parts.join("/");
        let shown = normalize(&raw);
        prop_assert!(!shown.contains('/'));
        prop_assert!(!shown.contains('?'));
    }

    #[test]
    fn integer_segments_average_within_bounds(values in prop::collection::vec(0u32..1000, 2..6)) {
        let raw = values.iter().map(u32::to_string).collect::<Vec<_>>().join("/");
        let shown: f64 = normalize(&raw).parse().unwrap();
        let min = f64::from(*values.iter().min().unwrap());
        let max = f64::from(*values.iter().max().unwrap());
        prop_assert!(shown >= min && shown <= max);
    }

    #[test]
    fn estimated_iff_marker_present(parts in prop::collection::vec(marked_segment(), 1..5)) {
        let raw = parts.join("/");
        prop_assert_eq!(is_estimated(&raw), parts.iter().any(|p| p.ends_with('?')));
    }

    #[test]
    fn split_values_drops_blank_segments(parts in prop::collection::vec(segment(), 0..5)) {
        let raw = format!(" / {} / ", parts.join(" / "));
        prop_assert_eq!(split_values(&raw), parts);
    }
}

#[test]
fn documented_examples() {
    assert_eq!(normalize("82.1/79.4"), "80.8");
    assert_eq!(normalize("90%/80%"), "85.0%");
    assert_eq!(normalize("82.1/unknown"), "82.1");
    assert_eq!(normalize("75.5?"), "75.5");
    assert!(is_estimated("75.5?/80"));
}
