use chrono::Duration;
use hm::clock::FixedClock;
use hm::config::SearchConfig;
use hm::model::{EmploymentType, JobListing, JobStatus, MarketerProfile};
use hm::routing::ReservedPaths;
use hm::search::{
    JobSearchParams, MarketerSearchParams, SearchPage, search_jobs, search_marketers,
};
use hm::storage::{Database, NewJob, NewMarketer};
use hm::test_utils::fixtures::{fixture_now, seeded_database};

fn db() -> Database {
    seeded_database().expect("seed fixture")
}

fn jobs(db: &Database, params: &JobSearchParams) -> SearchPage<JobListing> {
    search_jobs(db, params, &SearchConfig::default(), &FixedClock(fixture_now()))
        .expect("job search")
}

fn marketers(db: &Database, params: &MarketerSearchParams) -> SearchPage<MarketerProfile> {
    search_marketers(db, params, &SearchConfig::default()).expect("marketer search")
}

fn job_titles(page: &SearchPage<JobListing>) -> Vec<String> {
    page.items.iter().map(|job| job.title.clone()).collect()
}

fn names(page: &SearchPage<MarketerProfile>) -> Vec<String> {
    page.items.iter().map(|profile| profile.name.clone()).collect()
}

#[test]
fn growth_query_ranks_only_matching_job() {
    let db = db();
    let page = jobs(
        &db,
        &JobSearchParams {
            query: Some("growth".to_string()),
            sort: Some("relevance".to_string()),
            ..JobSearchParams::default()
        },
    );
    assert_eq!(page.total_count, 1);
    assert_eq!(job_titles(&page), vec!["Growth Marketing Manager"]);
    assert!(page.items[0].relevance.unwrap() > 0.0);
}

#[test]
fn rate_range_returns_middle_marketers() {
    let db = db();
    let page = marketers(
        &db,
        &MarketerSearchParams {
            min_rate: Some(80),
            max_rate: Some(100),
            ..MarketerSearchParams::default()
        },
    );
    assert_eq!(page.total_count, 2);
    let mut rates: Vec<i64> = page.items.iter().filter_map(|p| p.hourly_rate).collect();
    rates.sort_unstable();
    assert_eq!(rates, vec![85, 95]);
}

#[test]
fn punctuation_only_query_is_ignored() {
    let db = db();
    let unfiltered = jobs(&db, &JobSearchParams::default());
    let punctuated = jobs(
        &db,
        &JobSearchParams {
            query: Some("?!... --".to_string()),
            ..JobSearchParams::default()
        },
    );
    assert_eq!(job_titles(&punctuated), job_titles(&unfiltered));
    assert_eq!(punctuated.total_count, unfiltered.total_count);
    assert!(punctuated.items.iter().all(|job| job.relevance.is_none()));
}

#[test]
fn relevance_without_term_uses_default_order() {
    let db = db();
    let by_relevance = jobs(
        &db,
        &JobSearchParams {
            sort: Some("relevance".to_string()),
            ..JobSearchParams::default()
        },
    );
    let by_date = jobs(
        &db,
        &JobSearchParams {
            sort: Some("date_desc".to_string()),
            ..JobSearchParams::default()
        },
    );
    assert_eq!(job_titles(&by_relevance), job_titles(&by_date));

    let profiles = marketers(
        &db,
        &MarketerSearchParams {
            sort: Some("relevance".to_string()),
            ..MarketerSearchParams::default()
        },
    );
    assert_eq!(
        names(&profiles),
        vec!["Jane Doe", "Sam Lee", "Ana Souza", "Max Power"]
    );
}

#[test]
fn unknown_values_degrade_to_broad_results() {
    let db = db();
    let page = jobs(
        &db,
        &JobSearchParams {
            employment_type: Some("gig".to_string()),
            company_size: Some("huge".to_string()),
            posted_within: Some("decade".to_string()),
            sort: Some("sideways".to_string()),
            page: Some(-3),
            per_page: Some(0),
            ..JobSearchParams::default()
        },
    );
    assert_eq!(page.total_count, 4);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 15);
}

#[test]
fn page_size_is_capped() {
    let db = db();
    let page = marketers(
        &db,
        &MarketerSearchParams {
            per_page: Some(1000),
            ..MarketerSearchParams::default()
        },
    );
    assert_eq!(page.per_page, 50);
    assert_eq!(page.items.len(), 4);
}

#[test]
fn total_count_ignores_window() {
    let db = db();
    let window = |page, per_page| MarketerSearchParams {
        page: Some(page),
        per_page: Some(per_page),
        ..MarketerSearchParams::default()
    };
    let first = marketers(&db, &window(1, 1));
    let second = marketers(&db, &window(2, 1));
    let past_end = marketers(&db, &window(9, 10));

    assert_eq!(first.total_count, 4);
    assert_eq!(second.total_count, 4);
    assert_eq!(past_end.total_count, 4);
    assert_eq!(names(&first), vec!["Jane Doe"]);
    assert_eq!(names(&second), vec!["Sam Lee"]);
    assert!(past_end.is_empty());
    assert_eq!(first.total_pages(), 4);
}

#[test]
fn text_and_facets_combine() {
    let db = db();
    let content = db
        .facet_id(hm::facets::FacetKind::Skill, "content-marketing")
        .unwrap()
        .unwrap();
    let page = marketers(
        &db,
        &MarketerSearchParams {
            query: Some("articles".to_string()),
            skill_ids: vec![content],
            ..MarketerSearchParams::default()
        },
    );
    assert_eq!(names(&page), vec!["Ana Souza"]);
    assert_eq!(page.items[0].skills, vec!["Content Marketing", "Social Media"]);
    assert_eq!(page.items[0].display_rate(), "$50/hr");
}

#[test]
fn salary_display_on_results() {
    let db = db();
    let page = jobs(&db, &JobSearchParams::default());
    let salaries: Vec<(String, String)> = page
        .items
        .iter()
        .map(|job| (job.title.clone(), job.display_salary()))
        .collect();
    assert!(salaries.contains(&(
        "Growth Marketing Manager".to_string(),
        "$90,000 - $120,000".to_string()
    )));
    assert!(salaries.contains(&("Office Assistant".to_string(), "$30,000+".to_string())));
    assert!(salaries.contains(&(
        "SEO Content Strategist".to_string(),
        "Up to $70,000".to_string()
    )));
    assert!(salaries.contains(&(
        "PPC Campaign Specialist".to_string(),
        "Competitive".to_string()
    )));
}

fn attribution_job(posted_at: chrono::DateTime<chrono::Utc>) -> NewJob {
    NewJob {
        company: "acme".to_string(),
        title: "Attribution Analyst".to_string(),
        description: "Model multi touch attribution for paid channels.".to_string(),
        employment_type: EmploymentType::Contract,
        salary_min: None,
        salary_max: None,
        remote_ok: true,
        status: JobStatus::Active,
        location: None,
        posted_at,
        expires_at: None,
        slug: None,
    }
}

#[test]
fn equal_relevance_falls_back_to_date_then_id() {
    let db = db();
    let older = fixture_now() - Duration::days(5);
    let first_older = db.insert_job(&attribution_job(older)).unwrap();
    let second_older = db.insert_job(&attribution_job(older)).unwrap();
    let newest = db.insert_job(&attribution_job(fixture_now() - Duration::days(2))).unwrap();

    let page = |number| {
        jobs(
            &db,
            &JobSearchParams {
                query: Some("attribution".to_string()),
                sort: Some("relevance".to_string()),
                page: Some(number),
                per_page: Some(2),
                ..JobSearchParams::default()
            },
        )
    };
    let first = page(1);
    let second = page(2);

    assert_eq!(first.total_count, 3);
    assert_eq!(second.total_count, 3);
    let relevances: Vec<f64> = first
        .items
        .iter()
        .chain(&second.items)
        .filter_map(|job| job.relevance)
        .collect();
    assert_eq!(relevances.len(), 3);
    assert!(relevances.iter().all(|score| (score - relevances[0]).abs() < 1e-9));

    let ids: Vec<i64> = first.items.iter().chain(&second.items).map(|job| job.id).collect();
    assert_eq!(ids, vec![newest, first_older, second_older]);
}

#[test]
fn equal_relevance_marketers_order_by_id() {
    let db = db();
    let reserved = ReservedPaths::default();
    let twin = |name: &str| NewMarketer {
        name: name.to_string(),
        title: "Attribution Modeler".to_string(),
        bio: "Multi touch attribution audits.".to_string(),
        hourly_rate: Some(70),
        location: None,
        service_type: None,
        availability: None,
        experience_level: None,
        slug: None,
        skills: Vec::new(),
        tools: Vec::new(),
        created_at: fixture_now(),
        updated_at: fixture_now(),
    };
    let first_id = db.insert_marketer(&twin("Ivy Moss"), &reserved).unwrap();
    let second_id = db.insert_marketer(&twin("Kai Ross"), &reserved).unwrap();

    for number in [1, 2] {
        let page = marketers(
            &db,
            &MarketerSearchParams {
                query: Some("attribution".to_string()),
                sort: Some("relevance".to_string()),
                page: Some(number),
                per_page: Some(1),
                ..MarketerSearchParams::default()
            },
        );
        assert_eq!(page.total_count, 2);
        let expected = if number == 1 { first_id } else { second_id };
        assert_eq!(page.items[0].id, expected);
    }
}
