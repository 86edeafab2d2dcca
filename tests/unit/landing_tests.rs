use hm::config::SearchConfig;
use hm::facets::{DimensionRegistry, FacetKind};
use hm::routing::{
    InvalidPath, ProfileSlugPolicy, ReservedPaths, SlugAvailability, SlugResolution, SlugResolver,
};
use hm::search::{MarketerSearchParams, search_marketers};
use hm::seo::{
    RelatedKind, SeoMetadataBuilder, build_seo_metadata, related_pages, seo_path_for,
};
use hm::test_utils::fixtures::seeded_database;

#[test]
fn seo_remote_landing_page() {
    let db = seeded_database().unwrap();
    let registry = DimensionRegistry::new(&db);
    let reserved = ReservedPaths::default();
    let resolver = SlugResolver::new(&registry, &reserved);

    let dims = resolver
        .resolve_slug_path(&["seo", "remote"])
        .unwrap()
        .into_dimensions()
        .unwrap();
    assert_eq!(dims.skill.as_ref().unwrap().name, "SEO");
    assert_eq!(dims.location.as_ref().unwrap().name, "Remote");

    let meta = build_seo_metadata(&dims);
    assert!(meta.title.ends_with("Specialists Remote - HeyMarketers"));
    assert!(!meta.title.contains("in Remote"));

    let settings = SearchConfig::default();
    let page = search_marketers(
        &db,
        &MarketerSearchParams::for_dimensions(&dims, &settings),
        &settings,
    )
    .unwrap();
    assert_eq!(page.per_page, settings.landing_per_page);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Jane Doe");
}

#[test]
fn segment_order_is_irrelevant_against_sqlite() {
    let db = seeded_database().unwrap();
    let registry = DimensionRegistry::new(&db);
    let reserved = ReservedPaths::default();
    let resolver = SlugResolver::new(&registry, &reserved);

    let a = resolver
        .resolve_slug_path(&["semrush", "consulting", "remote", "seo"])
        .unwrap();
    let b = resolver
        .resolve_slug_path(&["seo", "remote", "consulting", "semrush"])
        .unwrap();
    assert_eq!(a, b);

    let dims = a.into_dimensions().unwrap();
    assert_eq!(seo_path_for(&dims), "/seo/remote/consulting/semrush");
}

#[test]
fn invalid_paths_are_outcomes_not_errors() {
    let db = seeded_database().unwrap();
    let registry = DimensionRegistry::new(&db);
    let reserved = ReservedPaths::default();
    let resolver = SlugResolver::new(&registry, &reserved);

    assert_eq!(
        resolver.resolve_slug_path(&["remote", "jobs"]).unwrap(),
        SlugResolution::Invalid(InvalidPath::Reserved {
            segment: "jobs".to_string()
        })
    );
    assert_eq!(
        resolver.resolve_slug_path(&["seo", "ppc"]).unwrap(),
        SlugResolution::Invalid(InvalidPath::Unresolved)
    );
    assert_eq!(
        resolver.resolve_slug_path(&["jane-doe"]).unwrap(),
        SlugResolution::Invalid(InvalidPath::Unresolved)
    );
}

#[test]
fn cached_and_live_registry_agree() {
    let db = seeded_database().unwrap();
    let cached = DimensionRegistry::new(&db);
    let live = DimensionRegistry::uncached(&db);
    let reserved = ReservedPaths::default();

    for path in [
        vec!["seo"],
        vec!["london", "ppc"],
        vec!["hubspot", "full-service"],
        vec!["seo", "london", "nowhere"],
    ] {
        let from_cache = SlugResolver::new(&cached, &reserved)
            .is_valid_slug_path(&path)
            .unwrap();
        let from_store = SlugResolver::new(&live, &reserved)
            .is_valid_slug_path(&path)
            .unwrap();
        assert_eq!(from_cache, from_store, "{path:?}");
    }
    assert!(cached.cache().unwrap().stats().hits > 0);
}

#[test]
fn structured_data_and_related_links() {
    let db = seeded_database().unwrap();
    let registry = DimensionRegistry::new(&db);
    let reserved = ReservedPaths::default();
    let dims = SlugResolver::new(&registry, &reserved)
        .resolve_slug_path(&["new-york"])
        .unwrap()
        .into_dimensions()
        .unwrap();

    let meta = SeoMetadataBuilder::new()
        .base_url("https://heymarketers.com")
        .total_count(1)
        .build(&dims);
    assert_eq!(meta.title, "Specialists in New York - HeyMarketers");
    assert_eq!(meta.structured_data["url"], "https://heymarketers.com/new-york");
    assert_eq!(meta.structured_data["spatialCoverage"]["name"], "New York");

    let related = related_pages(&dims, &registry).unwrap();
    assert_eq!(related.len(), 8);
    assert_eq!(related[0].path, "/content-marketing");
    assert_eq!(related[1].path, "/google-ads");
    assert_eq!(related[2].path, "/content-marketing/new-york");
    assert_eq!(related[2].kind, RelatedKind::Combination);
    assert!(related.iter().all(|page| page.path != "/new-york"));
}

#[test]
fn profile_slugs_share_the_namespace() {
    let db = seeded_database().unwrap();
    let registry = DimensionRegistry::new(&db);
    let reserved = ReservedPaths::default();
    let policy = ProfileSlugPolicy::new(&registry, &reserved, &db);

    assert_eq!(
        policy.check_profile_slug("jane-doe", None).unwrap(),
        SlugAvailability::Taken
    );
    assert_eq!(
        policy.check_profile_slug("hubspot", None).unwrap(),
        SlugAvailability::FacetConflict(FacetKind::Tool)
    );
    assert_eq!(
        policy.check_profile_slug("dashboard", None).unwrap(),
        SlugAvailability::Reserved
    );
    assert_eq!(
        policy.check_profile_slug("Jane_Doe", None).unwrap(),
        SlugAvailability::InvalidFormat
    );
    assert!(policy.check_profile_slug("jane-smith", None).unwrap().is_available());
    assert_eq!(policy.generate_profile_slug("Jane Doe", None).unwrap(), "jane-doe-1");
    assert_eq!(policy.generate_profile_slug("SEO", None).unwrap(), "seo-1");
}
