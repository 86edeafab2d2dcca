use hm::config::Config;
use hm::facets::DimensionRegistry;
use hm::routing::{InvalidPath, ReservedPaths, SlugResolution, SlugResolver};
use hm::search::{MarketerSearchParams, plan_marketer_search};
use hm::test_utils::fixtures::MemoryFacetStore;
use hm::test_utils::{TestCase, run_table_tests};

#[test]
fn search_settings_from_toml() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "empty file keeps defaults",
            input: "",
            expected: (15u32, 12u32, 20u32, 50u32),
        },
        TestCase {
            name: "partial section",
            input: "[search]\nmarketer_per_page = 24\n",
            expected: (15, 24, 20, 50),
        },
        TestCase {
            name: "every field",
            input: "[search]\njob_per_page = 10\nmarketer_per_page = 9\nlanding_per_page = 30\nmax_per_page = 100\n",
            expected: (10, 9, 30, 100),
        },
    ];

    run_table_tests(cases, |raw| {
        let config = Config::from_toml_str(raw).expect("parse config");
        (
            config.search.job_per_page,
            config.search.marketer_per_page,
            config.search.landing_per_page,
            config.search.max_per_page,
        )
    })
}

#[test]
fn configured_max_per_page_caps_requests() {
    let config = Config::from_toml_str("[search]\nmax_per_page = 25\n").unwrap();
    let spec = plan_marketer_search(
        &MarketerSearchParams {
            per_page: Some(1000),
            ..MarketerSearchParams::default()
        },
        &config.search,
    );
    assert_eq!(spec.window.per_page, 25);
}

#[test]
fn configured_reserved_paths_block_resolution() {
    let config = Config::from_toml_str("[routing]\nreserved_paths = [\"remote\"]\n").unwrap();
    let reserved = ReservedPaths::from_config(&config.routing);
    assert!(reserved.contains("remote"));
    assert!(reserved.contains("jobs"));

    let registry = DimensionRegistry::new(MemoryFacetStore::standard());
    let resolver = SlugResolver::new(&registry, &reserved);
    assert_eq!(
        resolver.resolve_slug_path(&["seo", "remote"]).unwrap(),
        SlugResolution::Invalid(InvalidPath::Reserved {
            segment: "remote".to_string()
        })
    );
}

#[test]
fn rendered_default_config_loads_back() {
    let rendered = toml::to_string_pretty(&Config::default()).unwrap();
    let config = Config::from_toml_str(&rendered).unwrap();
    assert_eq!(config.search.max_per_page, 50);
    assert_eq!(config.routing.site_name, "HeyMarketers");
    assert_eq!(
        config.routing.reserved_paths,
        Config::default().routing.reserved_paths
    );
    assert!(config.routing.base_url.is_none());
}
