//! JSON fixture loading.
//!
//! A seed file lists facets first, then companies, jobs and marketers that
//! reference facets and companies by slug.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HmError, Result};
use crate::facets::FacetKind;
use crate::routing::ReservedPaths;
use crate::storage::{Database, NewCompany, NewFacet, NewJob, NewMarketer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFacet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub skills: Vec<SeedFacet>,
    pub locations: Vec<SeedFacet>,
    pub service_types: Vec<SeedFacet>,
    pub tools: Vec<SeedFacet>,
    pub companies: Vec<NewCompany>,
    pub jobs: Vec<NewJob>,
    pub marketers: Vec<NewMarketer>,
}

impl SeedData {
    fn facets(&self) -> impl Iterator<Item = NewFacet> + '_ {
        [
            (FacetKind::Skill, &self.skills),
            (FacetKind::Location, &self.locations),
            (FacetKind::ServiceType, &self.service_types),
            (FacetKind::Tool, &self.tools),
        ]
        .into_iter()
        .flat_map(|(kind, facets)| {
            facets.iter().map(move |facet| NewFacet {
                kind,
                name: facet.name.clone(),
                slug: facet.slug.clone(),
                category: facet.category.clone(),
            })
        })
    }
}

/// Row counts written by one seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub facets: usize,
    pub companies: usize,
    pub jobs: usize,
    pub marketers: usize,
}

/// Load `data` atomically; any failure leaves the database untouched.
pub fn load_seed(
    db: &Database,
    data: &SeedData,
    reserved: &ReservedPaths,
    now: DateTime<Utc>,
) -> Result<SeedReport> {
    let report = db.in_savepoint("seed", || {
        let mut report = SeedReport::default();
        for facet in data.facets() {
            db.insert_facet(&facet, reserved)?;
            report.facets += 1;
        }
        for company in &data.companies {
            db.insert_company(company, now)?;
            report.companies += 1;
        }
        for job in &data.jobs {
            db.insert_job(job)?;
            report.jobs += 1;
        }
        for marketer in &data.marketers {
            db.insert_marketer(marketer, reserved)?;
            report.marketers += 1;
        }
        Ok(report)
    })?;

    info!(
        target: "storage",
        facets = report.facets,
        companies = report.companies,
        jobs = report.jobs,
        marketers = report.marketers,
        "seed loaded"
    );
    Ok(report)
}

pub fn load_seed_file(
    db: &Database,
    path: &Path,
    reserved: &ReservedPaths,
    now: DateTime<Utc>,
) -> Result<SeedReport> {
    let raw = std::fs::read_to_string(path)?;
    let data: SeedData = serde_json::from_str(&raw)
        .map_err(|err| HmError::Serialization(format!("{}: {err}", path.display())))?;
    load_seed(db, &data, reserved, now)
}
