use proptest::prelude::*;

use hm::config::DEFAULT_RESERVED_PATHS;
use hm::facets::{DimensionRegistry, FacetKind};
use hm::routing::{InvalidPath, ReservedPaths, SlugResolution, SlugResolver};
use hm::test_utils::fixtures::{MemoryFacetStore, STANDARD_FACETS};

fn slugs_of(kind: FacetKind) -> Vec<&'static str> {
    STANDARD_FACETS
        .iter()
        .filter(|(facet_kind, ..)| *facet_kind == kind)
        .map(|(_, _, slug, _)| *slug)
        .collect()
}

/// One facet slug for each of a random set of distinct kinds, shuffled.
fn arb_path(kinds: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<(FacetKind, &'static str)>> {
    prop::sample::subsequence(FacetKind::ALL.to_vec(), kinds).prop_flat_map(|kinds| {
        kinds
            .into_iter()
            .map(|kind| prop::sample::select(slugs_of(kind)).prop_map(move |slug| (kind, slug)))
            .collect::<Vec<_>>()
            .prop_shuffle()
    })
}

fn resolve(segments: &[&str]) -> SlugResolution {
    let registry = DimensionRegistry::new(MemoryFacetStore::standard());
    let reserved = ReservedPaths::default();
    SlugResolver::new(&registry, &reserved)
        .resolve_slug_path(segments)
        .unwrap()
}

proptest! {
    #[test]
    fn test_distinct_kinds_resolve_in_any_order(path in arb_path(1..=4)) {
        let segments: Vec<&str> = path.iter().map(|(_, slug)| *slug).collect();
        let mut canonical = path.clone();
        canonical.sort_by_key(|(kind, _)| *kind);
        let canonical_segments: Vec<&str> = canonical.iter().map(|(_, slug)| *slug).collect();

        let resolution = resolve(&segments);
        prop_assert_eq!(&resolution, &resolve(&canonical_segments));

        let dims = resolution.into_dimensions();
        prop_assert!(dims.is_some());
        let dims = dims.unwrap();
        prop_assert_eq!(dims.len(), path.len());
        for (kind, slug) in &path {
            prop_assert_eq!(dims.get(*kind).map(|facet| facet.slug.as_str()), Some(*slug));
        }
    }

    #[test]
    fn test_reserved_segment_always_invalid(
        path in arb_path(1..=3),
        reserved in prop::sample::select(DEFAULT_RESERVED_PATHS.to_vec()),
        position in 0usize..4,
    ) {
        let mut segments: Vec<&str> = path.iter().map(|(_, slug)| *slug).collect();
        segments.insert(position.min(segments.len()), reserved);

        prop_assert_eq!(
            resolve(&segments),
            SlugResolution::Invalid(InvalidPath::Reserved { segment: reserved.to_string() })
        );
    }

    #[test]
    fn test_same_kind_twice_invalid(
        (kind, pair) in prop::sample::select(FacetKind::ALL.to_vec())
            .prop_flat_map(|kind| (Just(kind), prop::sample::subsequence(slugs_of(kind), 2)))
    ) {
        prop_assert!(slugs_of(kind).len() >= 2);
        prop_assert_eq!(resolve(&pair), SlugResolution::Invalid(InvalidPath::Unresolved));
    }
}
