//! Write helpers for seeding and administration.
//!
//! The search core only reads; these keep the slug namespace and the FTS
//! tables consistent when data is loaded.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HmError, Result, SlugOwner};
use crate::facets::{
    DimensionRegistry, Facet, FacetKind, FacetStore, is_valid_slug, slugify, unique_slug,
};
use crate::model::{Availability, CompanySize, EmploymentType, ExperienceLevel, JobStatus};
use crate::routing::{ProfileSlugPolicy, ProfileSlugStore, ReservedPaths, SlugAvailability};
use crate::storage::{Database, to_timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFacet {
    pub kind: FacetKind,
    pub name: String,
    /// Derived from `name` when absent.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub company_size: Option<CompanySize>,
    /// Location slug.
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    /// Company slug.
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub remote_ok: bool,
    #[serde(default = "default_status")]
    pub status: JobStatus,
    /// Location slug.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "Utc::now")]
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub slug: Option<String>,
}

const fn default_status() -> JobStatus {
    JobStatus::Active
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMarketer {
    /// Account display name.
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub hourly_rate: Option<i64>,
    /// Location slug.
    #[serde(default)]
    pub location: Option<String>,
    /// Service type slug.
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    /// Generated from `name` when absent.
    #[serde(default)]
    pub slug: Option<String>,
    /// Skill slugs.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Tool slugs.
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Database {
    /// Insert a facet. Its slug must be free across every facet kind,
    /// marketer profiles, and reserved paths.
    pub fn insert_facet(&self, facet: &NewFacet, reserved: &ReservedPaths) -> Result<Facet> {
        let slug = facet.slug.clone().unwrap_or_else(|| slugify(&facet.name));
        if !is_valid_slug(&slug) {
            return Err(HmError::ValidationFailed(format!(
                "invalid {} slug '{slug}'",
                facet.kind.label()
            )));
        }
        if reserved.contains(&slug) {
            return Err(HmError::SlugConflict {
                slug,
                owner: SlugOwner::Reserved,
            });
        }
        if let Some(kind) = self.facet_kinds_for_slug(&slug)?.into_iter().next() {
            return Err(HmError::SlugConflict {
                slug,
                owner: SlugOwner::Facet(kind),
            });
        }
        if self.profile_slug_taken(&slug, None)? {
            return Err(HmError::SlugConflict {
                slug,
                owner: SlugOwner::Profile,
            });
        }

        let table = facet.kind.table();
        if facet.kind == FacetKind::Tool {
            self.conn().execute(
                "INSERT INTO tools (name, slug, category) VALUES (?1, ?2, ?3)",
                params![facet.name, slug, facet.category],
            )?;
        } else {
            self.conn().execute(
                &format!("INSERT INTO {table} (name, slug) VALUES (?1, ?2)"),
                params![facet.name, slug],
            )?;
        }
        let id = self.conn().last_insert_rowid();
        debug!(target: "storage", kind = %facet.kind, %slug, id, "facet inserted");

        Ok(Facet {
            id,
            kind: facet.kind,
            name: facet.name.clone(),
            slug,
            category: if facet.kind == FacetKind::Tool {
                facet.category.clone()
            } else {
                None
            },
        })
    }

    pub fn insert_account(&self, name: &str, created_at: DateTime<Utc>) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO accounts (name, created_at) VALUES (?1, ?2)",
            params![name, to_timestamp(created_at)],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Insert a company with its own owning account.
    pub fn insert_company(&self, company: &NewCompany, created_at: DateTime<Utc>) -> Result<i64> {
        let location_id = self.optional_facet_id(FacetKind::Location, company.location.as_deref())?;
        let base = slug_base(company.slug.as_deref(), &company.name, "company");
        let slug = unique_slug(&base, |candidate| {
            self.slug_exists_in("company_profiles", candidate)
        })?;

        let account_id = self.insert_account(&company.name, created_at)?;
        self.conn().execute(
            "INSERT INTO company_profiles (account_id, name, slug, company_size, location_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![account_id, company.name, slug, company.company_size, location_id],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn insert_job(&self, job: &NewJob) -> Result<i64> {
        let company_id: i64 = self
            .conn()
            .query_row(
                "SELECT id FROM company_profiles WHERE slug = ?1",
                [&job.company],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| HmError::NotFound(format!("company '{}'", job.company)))?;
        let location_id = self.optional_facet_id(FacetKind::Location, job.location.as_deref())?;
        let base = slug_base(job.slug.as_deref(), &job.title, "job");
        let slug = unique_slug(&base, |candidate| self.slug_exists_in("job_listings", candidate))?;

        let id = self.in_savepoint("insert_job", || {
            self.conn().execute(
                "INSERT INTO job_listings (
                    company_profile_id, location_id, title, description, employment_type,
                    salary_min, salary_max, remote_ok, status, posted_at, expires_at, slug
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    company_id,
                    location_id,
                    job.title,
                    job.description,
                    job.employment_type,
                    job.salary_min,
                    job.salary_max,
                    job.remote_ok,
                    job.status,
                    to_timestamp(job.posted_at),
                    job.expires_at.map(to_timestamp),
                    slug,
                ],
            )?;
            let id = self.conn().last_insert_rowid();
            self.refresh_job_search_text(id)?;
            Ok(id)
        })?;
        debug!(target: "storage", id, %slug, "job inserted");
        Ok(id)
    }

    /// Insert a marketer profile with its account, skills and tools.
    ///
    /// An explicit slug must be available; otherwise one is generated from
    /// the account name.
    pub fn insert_marketer(&self, marketer: &NewMarketer, reserved: &ReservedPaths) -> Result<i64> {
        let location_id = self.optional_facet_id(FacetKind::Location, marketer.location.as_deref())?;
        let service_type_id =
            self.optional_facet_id(FacetKind::ServiceType, marketer.service_type.as_deref())?;
        let skill_ids = self.required_facet_ids(FacetKind::Skill, &marketer.skills)?;
        let tool_ids = self.required_facet_ids(FacetKind::Tool, &marketer.tools)?;

        let registry = DimensionRegistry::uncached(self);
        let policy = ProfileSlugPolicy::new(&registry, reserved, self);
        let slug = match &marketer.slug {
            Some(slug) => {
                ensure_available(slug, policy.check_profile_slug(slug, None)?)?;
                slug.clone()
            }
            None => policy.generate_profile_slug(&marketer.name, None)?,
        };

        let id = self.in_savepoint("insert_marketer", || {
            let account_id = self.insert_account(&marketer.name, marketer.created_at)?;
            self.conn().execute(
                "INSERT INTO marketer_profiles (
                    account_id, title, bio, hourly_rate, location_id, service_type_id,
                    availability, experience_level, slug, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    account_id,
                    marketer.title,
                    marketer.bio,
                    marketer.hourly_rate,
                    location_id,
                    service_type_id,
                    marketer.availability,
                    marketer.experience_level,
                    slug,
                    to_timestamp(marketer.created_at),
                    to_timestamp(marketer.updated_at),
                ],
            )?;
            let id = self.conn().last_insert_rowid();
            for skill_id in &skill_ids {
                self.conn().execute(
                    "INSERT OR IGNORE INTO marketer_skills (marketer_profile_id, skill_id) VALUES (?1, ?2)",
                    params![id, skill_id],
                )?;
            }
            for tool_id in &tool_ids {
                self.conn().execute(
                    "INSERT OR IGNORE INTO marketer_tools (marketer_profile_id, tool_id) VALUES (?1, ?2)",
                    params![id, tool_id],
                )?;
            }
            self.refresh_marketer_search_text(id)?;
            Ok(id)
        })?;
        debug!(target: "storage", id, %slug, "marketer inserted");
        Ok(id)
    }

    /// Rewrite a job's searchable text: title, description, company name,
    /// employment type.
    pub fn refresh_job_search_text(&self, job_id: i64) -> Result<()> {
        let text: Option<String> = self
            .conn()
            .query_row(
                "SELECT j.title || ' ' || j.description || ' ' || c.name || ' ' || j.employment_type
                 FROM job_listings j
                 JOIN company_profiles c ON c.id = j.company_profile_id
                 WHERE j.id = ?1",
                [job_id],
                |row| row.get(0),
            )
            .optional()?;
        self.replace_search_text("job_listings_fts", job_id, text.as_deref())
    }

    /// Rewrite a marketer's searchable text: account name, title, bio,
    /// skill names.
    pub fn refresh_marketer_search_text(&self, marketer_id: i64) -> Result<()> {
        let text: Option<String> = self
            .conn()
            .query_row(
                "SELECT a.name || ' ' || m.title || ' ' || m.bio || ' ' || COALESCE(
                    (SELECT group_concat(s.name, ' ')
                     FROM marketer_skills msk JOIN skills s ON s.id = msk.skill_id
                     WHERE msk.marketer_profile_id = m.id),
                    '')
                 FROM marketer_profiles m
                 JOIN accounts a ON a.id = m.account_id
                 WHERE m.id = ?1",
                [marketer_id],
                |row| row.get(0),
            )
            .optional()?;
        self.replace_search_text("marketer_profiles_fts", marketer_id, text.as_deref())
    }

    /// Run `body` inside a named savepoint. Savepoints nest, so a seed run
    /// can wrap many inserts in one outer savepoint.
    pub(crate) fn in_savepoint<T>(&self, name: &str, body: impl FnOnce() -> Result<T>) -> Result<T> {
        self.conn().execute_batch(&format!("SAVEPOINT {name}"))?;
        match body() {
            Ok(value) => {
                self.conn().execute_batch(&format!("RELEASE {name}"))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self
                    .conn()
                    .execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"))
                {
                    warn!(target: "storage", savepoint = name, error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    fn replace_search_text(&self, table: &str, rowid: i64, text: Option<&str>) -> Result<()> {
        self.conn()
            .execute(&format!("DELETE FROM {table} WHERE rowid = ?1"), [rowid])?;
        if let Some(text) = text {
            self.conn().execute(
                &format!("INSERT INTO {table} (rowid, searchable_text) VALUES (?1, ?2)"),
                params![rowid, text],
            )?;
        }
        Ok(())
    }

    fn slug_exists_in(&self, table: &str, slug: &str) -> Result<bool> {
        let exists: bool = self.conn().query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE slug = ?1)"),
            [slug],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn optional_facet_id(&self, kind: FacetKind, slug: Option<&str>) -> Result<Option<i64>> {
        slug.map(|slug| self.required_facet_id(kind, slug)).transpose()
    }

    fn required_facet_id(&self, kind: FacetKind, slug: &str) -> Result<i64> {
        self.facet_id(kind, slug)?
            .ok_or_else(|| HmError::NotFound(format!("{} '{slug}'", kind.label())))
    }

    fn required_facet_ids(&self, kind: FacetKind, slugs: &[String]) -> Result<Vec<i64>> {
        slugs
            .iter()
            .map(|slug| self.required_facet_id(kind, slug))
            .collect()
    }
}

/// Explicit slug, else one derived from `source`, else `fallback` when
/// `source` has no slug-able characters.
fn slug_base(explicit: Option<&str>, source: &str, fallback: &str) -> String {
    let base = explicit.map_or_else(|| slugify(source), str::to_string);
    if base.is_empty() { fallback.to_string() } else { base }
}

fn ensure_available(slug: &str, availability: SlugAvailability) -> Result<()> {
    let owner = match availability {
        SlugAvailability::Available => return Ok(()),
        SlugAvailability::InvalidFormat => {
            return Err(HmError::ValidationFailed(format!(
                "invalid profile slug '{slug}'"
            )));
        }
        SlugAvailability::Reserved => SlugOwner::Reserved,
        SlugAvailability::FacetConflict(kind) => SlugOwner::Facet(kind),
        SlugAvailability::Taken => SlugOwner::Profile,
    };
    Err(HmError::SlugConflict {
        slug: slug.to_string(),
        owner,
    })
}
