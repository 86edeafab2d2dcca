//! A small, fully known marketplace used by unit, integration and bench code.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::Result;
use crate::facets::{Facet, FacetKind, FacetStore};
use crate::model::{Availability, CompanySize, EmploymentType, ExperienceLevel, JobStatus};
use crate::routing::{ProfileSlugStore, ReservedPaths};
use crate::storage::{Database, NewCompany, NewJob, NewMarketer, SeedData, SeedFacet, load_seed};

/// Facets shared by the in-memory store and the SQLite seed:
/// kind, name, slug, category.
pub const STANDARD_FACETS: &[(FacetKind, &str, &str, Option<&str>)] = &[
    (FacetKind::Skill, "Content Marketing", "content-marketing", None),
    (FacetKind::Skill, "Email Marketing", "email-marketing", None),
    (FacetKind::Skill, "PPC", "ppc", None),
    (FacetKind::Skill, "SEO", "seo", None),
    (FacetKind::Skill, "Social Media", "social-media", None),
    (FacetKind::Location, "London", "london", None),
    (FacetKind::Location, "New York", "new-york", None),
    (FacetKind::Location, "Remote", "remote", None),
    (FacetKind::ServiceType, "Consulting", "consulting", None),
    (FacetKind::ServiceType, "Full Service", "full-service", None),
    (FacetKind::Tool, "Google Ads", "google-ads", Some("Advertising")),
    (FacetKind::Tool, "HubSpot", "hubspot", Some("CRM")),
    (FacetKind::Tool, "Semrush", "semrush", Some("SEO")),
];

/// Instant the fixture's relative timestamps hang off.
#[must_use]
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn days_ago(days: i64) -> DateTime<Utc> {
    fixture_now() - Duration::days(days)
}

/// Facet store backed by a vector, counting lookups.
#[derive(Debug, Default)]
pub struct MemoryFacetStore {
    facets: Vec<Facet>,
    lookups: AtomicUsize,
}

impl MemoryFacetStore {
    #[must_use]
    pub fn new(facets: Vec<Facet>) -> Self {
        Self {
            facets,
            lookups: AtomicUsize::new(0),
        }
    }

    /// [`STANDARD_FACETS`], with ids numbered per kind as SQLite would.
    #[must_use]
    pub fn standard() -> Self {
        let mut facets: Vec<Facet> = Vec::with_capacity(STANDARD_FACETS.len());
        for (kind, name, slug, category) in STANDARD_FACETS {
            let id = facets.iter().filter(|facet| facet.kind == *kind).count() + 1;
            facets.push(Facet {
                id: i64::try_from(id).unwrap_or(i64::MAX),
                kind: *kind,
                name: (*name).to_string(),
                slug: (*slug).to_string(),
                category: category.map(str::to_string),
            });
        }
        Self::new(facets)
    }

    /// The facet of `kind` with `slug`.
    ///
    /// # Panics
    ///
    /// Panics when the fixture has no such facet.
    #[must_use]
    pub fn facet(&self, kind: FacetKind, slug: &str) -> Facet {
        self.facets
            .iter()
            .find(|facet| facet.kind == kind && facet.slug == slug)
            .cloned()
            .unwrap_or_else(|| panic!("fixture has no {kind} '{slug}'"))
    }

    /// Store lookups served so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl FacetStore for MemoryFacetStore {
    fn find_facet(&self, kind: FacetKind, slug: &str) -> Result<Option<Facet>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .facets
            .iter()
            .find(|facet| facet.kind == kind && facet.slug == slug)
            .cloned())
    }

    fn list_facets(&self, kind: FacetKind, limit: usize) -> Result<Vec<Facet>> {
        let mut facets: Vec<Facet> = self
            .facets
            .iter()
            .filter(|facet| facet.kind == kind)
            .cloned()
            .collect();
        facets.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        facets.truncate(limit);
        Ok(facets)
    }
}

/// Profile slugs by owning profile id.
#[derive(Debug, Default)]
pub struct MemoryProfiles {
    slugs: Vec<(i64, String)>,
}

impl MemoryProfiles {
    pub fn new<'a>(slugs: impl IntoIterator<Item = (i64, &'a str)>) -> Self {
        Self {
            slugs: slugs
                .into_iter()
                .map(|(id, slug)| (id, slug.to_string()))
                .collect(),
        }
    }
}

impl ProfileSlugStore for MemoryProfiles {
    fn profile_slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        Ok(self
            .slugs
            .iter()
            .any(|(id, taken)| taken == slug && Some(*id) != exclude_id))
    }
}

fn seed_facets(kind: FacetKind) -> Vec<SeedFacet> {
    STANDARD_FACETS
        .iter()
        .filter(|(facet_kind, ..)| *facet_kind == kind)
        .map(|(_, name, slug, category)| SeedFacet {
            name: (*name).to_string(),
            slug: Some((*slug).to_string()),
            category: category.map(str::to_string),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn job(
    company: &str,
    title: &str,
    description: &str,
    employment_type: EmploymentType,
    salary: (Option<i64>, Option<i64>),
    remote_ok: bool,
    location: Option<&str>,
    posted_days_ago: i64,
) -> NewJob {
    NewJob {
        company: company.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        employment_type,
        salary_min: salary.0,
        salary_max: salary.1,
        remote_ok,
        status: JobStatus::Active,
        location: location.map(str::to_string),
        posted_at: days_ago(posted_days_ago),
        expires_at: None,
        slug: None,
    }
}

struct MarketerSketch<'a> {
    name: &'a str,
    title: &'a str,
    bio: &'a str,
    rate: i64,
    location: &'a str,
    service_type: Option<&'a str>,
    availability: Availability,
    level: ExperienceLevel,
    skills: &'a [&'a str],
    tools: &'a [&'a str],
    created_days_ago: i64,
    updated_days_ago: i64,
}

impl MarketerSketch<'_> {
    fn build(&self) -> NewMarketer {
        NewMarketer {
            name: self.name.to_string(),
            title: self.title.to_string(),
            bio: self.bio.to_string(),
            hourly_rate: Some(self.rate),
            location: Some(self.location.to_string()),
            service_type: self.service_type.map(str::to_string),
            availability: Some(self.availability),
            experience_level: Some(self.level),
            slug: None,
            skills: self.skills.iter().map(|s| (*s).to_string()).collect(),
            tools: self.tools.iter().map(|s| (*s).to_string()).collect(),
            created_at: days_ago(self.created_days_ago),
            updated_at: days_ago(self.updated_days_ago),
        }
    }
}

/// Two companies, six jobs (four searchable), four marketers rated
/// 85, 95, 50 and 150.
#[must_use]
pub fn marketplace_seed() -> SeedData {
    let jobs = vec![
        job(
            "acme",
            "Growth Marketing Manager",
            "Lead growth experiments across paid and lifecycle channels for a fast moving SaaS team.",
            EmploymentType::FullTime,
            (Some(90_000), Some(120_000)),
            true,
            Some("remote"),
            2,
        ),
        job(
            "globex",
            "Office Assistant",
            "Keep the office running smoothly with scheduling, supplies and front desk support.",
            EmploymentType::PartTime,
            (Some(30_000), None),
            false,
            Some("new-york"),
            10,
        ),
        job(
            "acme",
            "SEO Content Strategist",
            "Own keyword research and on-page optimization for our content marketing program.",
            EmploymentType::Contract,
            (None, Some(70_000)),
            true,
            Some("remote"),
            40,
        ),
        job(
            "globex",
            "PPC Campaign Specialist",
            "Manage Google Ads budgets and improve paid search performance for enterprise clients.",
            EmploymentType::Freelance,
            (None, None),
            false,
            Some("london"),
            1,
        ),
        NewJob {
            expires_at: Some(days_ago(1)),
            ..job(
                "acme",
                "Expired Email Marketer",
                "Write newsletters and nurture sequences.",
                EmploymentType::FullTime,
                (Some(60_000), Some(80_000)),
                true,
                None,
                20,
            )
        },
        NewJob {
            status: JobStatus::Inactive,
            ..job(
                "globex",
                "Paused Social Media Lead",
                "Plan and publish social campaigns.",
                EmploymentType::PartTime,
                (Some(40_000), None),
                false,
                Some("new-york"),
                3,
            )
        },
    ];

    let marketers = [
        MarketerSketch {
            name: "Jane Doe",
            title: "SEO Consultant",
            bio: "Technical audits and link building for B2B software companies.",
            rate: 85,
            location: "remote",
            service_type: Some("consulting"),
            availability: Availability::Available,
            level: ExperienceLevel::Senior,
            skills: &["seo", "content-marketing"],
            tools: &["semrush"],
            created_days_ago: 100,
            updated_days_ago: 1,
        },
        MarketerSketch {
            name: "Sam Lee",
            title: "PPC Specialist",
            bio: "Paid search and shopping campaigns with a focus on return on ad spend.",
            rate: 95,
            location: "london",
            service_type: Some("full-service"),
            availability: Availability::Busy,
            level: ExperienceLevel::Mid,
            skills: &["ppc"],
            tools: &["google-ads"],
            created_days_ago: 50,
            updated_days_ago: 5,
        },
        MarketerSketch {
            name: "Ana Souza",
            title: "Content Writer",
            bio: "Long form articles and social posts for consumer brands.",
            rate: 50,
            location: "remote",
            service_type: None,
            availability: Availability::Available,
            level: ExperienceLevel::Junior,
            skills: &["content-marketing", "social-media"],
            tools: &[],
            created_days_ago: 20,
            updated_days_ago: 20,
        },
        MarketerSketch {
            name: "Max Power",
            title: "Fractional CMO",
            bio: "Builds marketing teams and lifecycle programs from zero.",
            rate: 150,
            location: "new-york",
            service_type: Some("consulting"),
            availability: Availability::PartTime,
            level: ExperienceLevel::Expert,
            skills: &["seo", "email-marketing", "ppc"],
            tools: &["hubspot"],
            created_days_ago: 200,
            updated_days_ago: 2,
        },
    ]
    .iter()
    .map(MarketerSketch::build)
    .collect();

    SeedData {
        skills: seed_facets(FacetKind::Skill),
        locations: seed_facets(FacetKind::Location),
        service_types: seed_facets(FacetKind::ServiceType),
        tools: seed_facets(FacetKind::Tool),
        companies: vec![
            NewCompany {
                name: "Acme Labs".to_string(),
                slug: Some("acme".to_string()),
                company_size: Some(CompanySize::Startup),
                location: Some("remote".to_string()),
            },
            NewCompany {
                name: "Globex Corporation".to_string(),
                slug: Some("globex".to_string()),
                company_size: Some(CompanySize::Enterprise),
                location: Some("new-york".to_string()),
            },
        ],
        jobs,
        marketers,
    }
}

/// In-memory database loaded with [`marketplace_seed`].
pub fn seeded_database() -> Result<Database> {
    let db = Database::open_in_memory()?;
    load_seed(&db, &marketplace_seed(), &ReservedPaths::default(), fixture_now())?;
    Ok(db)
}
