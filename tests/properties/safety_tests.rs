use proptest::prelude::*;

use hm::config::SearchConfig;
use hm::search::{MarketerSearchParams, PageWindow, TextQuery, sanitize_term, search_marketers};
use hm::seo::{MAX_DESCRIPTION_CHARS, truncate_chars};
use hm::test_utils::fixtures::seeded_database;

proptest! {
    // =========================================================================
    // Free-text sanitizing
    // =========================================================================

    #[test]
    fn test_sanitize_term_is_clean_and_idempotent(input in ".*") {
        let clean = sanitize_term(&input);
        prop_assert_eq!(sanitize_term(&clean), clean.clone());
        prop_assert!(!clean.starts_with(' ') && !clean.ends_with(' '));
        prop_assert!(!clean.contains("  "));
        prop_assert!(clean.chars().all(|c| c == '_' || !c.is_ascii_punctuation()));
    }

    #[test]
    fn test_punctuation_only_is_no_query(input in r#"[-!?.,;:'"()/&*+#@ ]{0,40}"#) {
        prop_assert!(TextQuery::parse(&input).is_none());
    }

    #[test]
    fn test_text_query_matches_sanitized(input in ".*") {
        let parsed = TextQuery::parse(&input);
        prop_assert_eq!(parsed.is_some(), !sanitize_term(&input).is_empty());
    }

    // =========================================================================
    // Pagination clamping
    // =========================================================================

    #[test]
    fn test_page_window_always_in_range(
        page in proptest::option::of(any::<i64>()),
        per_page in proptest::option::of(any::<i64>()),
        default in 1u32..100,
        max in 1u32..100,
    ) {
        let window = PageWindow::clamp(page, per_page, default, max);
        prop_assert!(window.page >= 1);
        prop_assert!(window.per_page >= 1);
        prop_assert!(window.per_page <= max);
        prop_assert!(window.offset() >= 0);
    }

    #[test]
    fn test_truncate_chars_bounded(input in ".{0,400}") {
        let out = truncate_chars(&input, MAX_DESCRIPTION_CHARS);
        prop_assert!(out.chars().count() <= MAX_DESCRIPTION_CHARS);
        if input.chars().count() <= MAX_DESCRIPTION_CHARS {
            prop_assert_eq!(out, input);
        } else {
            prop_assert!(out.ends_with("..."));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_total_count_invariant_to_window(page in 1i64..8, per_page in 1i64..6) {
        let db = seeded_database().unwrap();
        let settings = SearchConfig::default();
        let results = search_marketers(
            &db,
            &MarketerSearchParams {
                page: Some(page),
                per_page: Some(per_page),
                ..MarketerSearchParams::default()
            },
            &settings,
        )
        .unwrap();

        prop_assert_eq!(results.total_count, 4);
        let offset = usize::try_from((page - 1) * per_page).unwrap();
        let expected = 4usize.saturating_sub(offset).min(usize::try_from(per_page).unwrap());
        prop_assert_eq!(results.items.len(), expected);
    }
}
