//! Compiles search plans to SQL and executes them.
//!
//! Each plan runs as one COUNT over the filtered set plus one page query
//! with identical WHERE clauses, so the total never depends on the window.

use std::collections::HashMap;

use itertools::Itertools;
use rusqlite::types::Value;
use rusqlite::{Row, params_from_iter};
use tracing::trace;

use crate::error::Result;
use crate::model::{JobListing, MarketerProfile};
use crate::routing::ProfileSlugStore;
use crate::search::{
    JobCollection, JobFilter, JobOrder, JobQuerySpec, MarketerCollection, MarketerFilter,
    MarketerOrder, MarketerQuerySpec, PageWindow, SearchPage, TextQuery,
};
use crate::storage::{Database, from_timestamp, to_timestamp};

const JOB_FROM: &str = "FROM job_listings j
     JOIN company_profiles c ON c.id = j.company_profile_id
     LEFT JOIN locations l ON l.id = j.location_id";

const JOB_FTS_JOIN: &str = " JOIN job_listings_fts ON job_listings_fts.rowid = j.id";

const JOB_COLUMNS: &str = "j.id, j.company_profile_id, c.name, c.company_size, j.location_id, l.name,
     j.title, j.description, j.employment_type, j.salary_min, j.salary_max, j.remote_ok,
     j.status, j.posted_at, j.expires_at, j.slug";

const MARKETER_FROM: &str = "FROM marketer_profiles m
     JOIN accounts a ON a.id = m.account_id
     LEFT JOIN locations l ON l.id = m.location_id
     LEFT JOIN service_types st ON st.id = m.service_type_id";

const MARKETER_FTS_JOIN: &str =
    " JOIN marketer_profiles_fts ON marketer_profiles_fts.rowid = m.id";

const MARKETER_COLUMNS: &str = "m.id, m.account_id, a.name, m.title, m.bio, m.hourly_rate,
     m.location_id, l.name, m.service_type_id, st.name, m.availability, m.experience_level,
     m.slug, m.created_at, m.updated_at";

/// WHERE clauses with their positional parameters.
#[derive(Debug, Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn push(&mut self, clause: impl Into<String>, params: impl IntoIterator<Item = Value>) {
        self.clauses.push(clause.into());
        self.params.extend(params);
    }

    fn push_in(&mut self, column: &str, ids: &[i64]) {
        self.push(
            format!("{column} IN ({})", placeholders(ids.len())),
            ids.iter().copied().map(Value::Integer),
        );
    }

    fn push_text(&mut self, fts_table: &str, text: &TextQuery) {
        self.push(
            format!("{fts_table} MATCH ?"),
            [Value::Text(text.match_expression())],
        );
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn job_conditions(spec: &JobQuerySpec) -> Conditions {
    let mut conditions = Conditions::default();
    for filter in &spec.filters {
        match filter {
            JobFilter::Active(now) => conditions.push(
                "j.status = 'active' AND (j.expires_at IS NULL OR j.expires_at > ?)",
                [Value::Integer(to_timestamp(*now))],
            ),
            JobFilter::Locations(ids) => conditions.push_in("j.location_id", ids),
            JobFilter::EmploymentTypes(kinds) => conditions.push(
                format!("j.employment_type IN ({})", placeholders(kinds.len())),
                kinds.iter().map(|kind| Value::Text(kind.as_str().to_string())),
            ),
            JobFilter::RemoteOnly => conditions.push("j.remote_ok = 1", []),
            JobFilter::SalaryAtLeast(bound) => conditions.push(
                "(j.salary_min >= ? OR j.salary_max >= ?)",
                [Value::Integer(*bound), Value::Integer(*bound)],
            ),
            JobFilter::SalaryAtMost(bound) => conditions.push(
                "(j.salary_max <= ? OR (j.salary_min <= ? AND j.salary_max IS NULL))",
                [Value::Integer(*bound), Value::Integer(*bound)],
            ),
            JobFilter::PostedSince(cutoff) => conditions.push(
                "j.posted_at >= ?",
                [Value::Integer(to_timestamp(*cutoff))],
            ),
            JobFilter::CompanySize(size) => conditions.push(
                "c.company_size = ?",
                [Value::Text(size.as_str().to_string())],
            ),
        }
    }
    if let Some(text) = &spec.text {
        conditions.push_text("job_listings_fts", text);
    }
    conditions
}

fn job_order_sql(order: JobOrder, ranked: bool) -> &'static str {
    match order {
        JobOrder::Relevance if ranked => {
            "bm25(job_listings_fts) ASC, j.posted_at DESC, j.id ASC"
        }
        JobOrder::Relevance | JobOrder::DateDesc => "j.posted_at DESC, j.id ASC",
        JobOrder::DateAsc => "j.posted_at ASC, j.id ASC",
        JobOrder::SalaryDesc => {
            "COALESCE(j.salary_max, j.salary_min, 0) DESC, j.posted_at DESC, j.id ASC"
        }
        JobOrder::SalaryAsc => {
            "COALESCE(j.salary_min, j.salary_max, 999999) ASC, j.posted_at DESC, j.id ASC"
        }
    }
}

fn marketer_conditions(spec: &MarketerQuerySpec) -> Conditions {
    let mut conditions = Conditions::default();
    for filter in &spec.filters {
        match filter {
            MarketerFilter::Skills(ids) => conditions.push(
                format!(
                    "EXISTS (SELECT 1 FROM marketer_skills msk
                     WHERE msk.marketer_profile_id = m.id AND msk.skill_id IN ({}))",
                    placeholders(ids.len())
                ),
                ids.iter().copied().map(Value::Integer),
            ),
            MarketerFilter::Tools(ids) => conditions.push(
                format!(
                    "EXISTS (SELECT 1 FROM marketer_tools mt
                     WHERE mt.marketer_profile_id = m.id AND mt.tool_id IN ({}))",
                    placeholders(ids.len())
                ),
                ids.iter().copied().map(Value::Integer),
            ),
            MarketerFilter::Locations(ids) => conditions.push_in("m.location_id", ids),
            MarketerFilter::ServiceTypes(ids) => conditions.push_in("m.service_type_id", ids),
            MarketerFilter::RateAtLeast(bound) => {
                conditions.push("m.hourly_rate >= ?", [Value::Integer(*bound)]);
            }
            MarketerFilter::RateAtMost(bound) => {
                conditions.push("m.hourly_rate <= ?", [Value::Integer(*bound)]);
            }
            MarketerFilter::Availability(availability) => conditions.push(
                "m.availability = ?",
                [Value::Text(availability.as_str().to_string())],
            ),
            MarketerFilter::ExperienceLevel(level) => conditions.push(
                "m.experience_level = ?",
                [Value::Text(level.as_str().to_string())],
            ),
        }
    }
    if let Some(text) = &spec.text {
        conditions.push_text("marketer_profiles_fts", text);
    }
    conditions
}

fn marketer_order_sql(order: MarketerOrder, ranked: bool) -> &'static str {
    match order {
        MarketerOrder::Relevance if ranked => "bm25(marketer_profiles_fts) ASC, m.id ASC",
        MarketerOrder::Relevance | MarketerOrder::Id => "m.id ASC",
        MarketerOrder::RateAsc => "m.hourly_rate IS NULL, m.hourly_rate ASC, m.id ASC",
        MarketerOrder::RateDesc => "m.hourly_rate DESC, m.id ASC",
        MarketerOrder::Recent => "m.created_at DESC, m.id ASC",
        MarketerOrder::Activity => "m.updated_at DESC, m.id ASC",
    }
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<JobListing> {
    Ok(JobListing {
        id: row.get(0)?,
        company_id: row.get(1)?,
        company_name: row.get(2)?,
        company_size: row.get(3)?,
        location_id: row.get(4)?,
        location_name: row.get(5)?,
        title: row.get(6)?,
        description: row.get(7)?,
        employment_type: row.get(8)?,
        salary_min: row.get(9)?,
        salary_max: row.get(10)?,
        remote_ok: row.get(11)?,
        status: row.get(12)?,
        posted_at: from_timestamp(13, row.get(13)?)?,
        expires_at: row
            .get::<_, Option<i64>>(14)?
            .map(|secs| from_timestamp(14, secs))
            .transpose()?,
        slug: row.get(15)?,
        relevance: row.get(16)?,
    })
}

fn marketer_from_row(row: &Row<'_>) -> rusqlite::Result<MarketerProfile> {
    Ok(MarketerProfile {
        id: row.get(0)?,
        account_id: row.get(1)?,
        name: row.get(2)?,
        title: row.get(3)?,
        bio: row.get(4)?,
        hourly_rate: row.get(5)?,
        location_id: row.get(6)?,
        location_name: row.get(7)?,
        service_type_id: row.get(8)?,
        service_type_name: row.get(9)?,
        availability: row.get(10)?,
        experience_level: row.get(11)?,
        slug: row.get(12)?,
        skills: Vec::new(),
        tools: Vec::new(),
        created_at: from_timestamp(13, row.get(13)?)?,
        updated_at: from_timestamp(14, row.get(14)?)?,
        relevance: row.get(15)?,
    })
}

impl Database {
    fn count(&self, from: &str, conditions: &Conditions) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) {from}{}", conditions.where_sql());
        trace!(target: "storage", %sql, "count query");
        let total: i64 = self
            .conn()
            .prepare_cached(&sql)?
            .query_row(params_from_iter(conditions.params.iter()), |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    fn page<T>(
        &self,
        select: &str,
        conditions: &Conditions,
        order: &str,
        window: PageWindow,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let sql = format!(
            "{select}{} ORDER BY {order} LIMIT ? OFFSET ?",
            conditions.where_sql()
        );
        trace!(target: "storage", %sql, "page query");
        let params = conditions
            .params
            .iter()
            .cloned()
            .chain([Value::Integer(window.limit()), Value::Integer(window.offset())]);
        let mut stmt = self.conn().prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Facet names linked to each of `marketer_ids`, alphabetical, in one
    /// query.
    fn facet_names_by_marketer(
        &self,
        link_table: &str,
        facet_table: &str,
        facet_column: &str,
        marketer_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<String>>> {
        if marketer_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT link.marketer_profile_id, f.name FROM {link_table} link
             JOIN {facet_table} f ON f.id = link.{facet_column}
             WHERE link.marketer_profile_id IN ({})
             ORDER BY link.marketer_profile_id ASC, f.name ASC",
            placeholders(marketer_ids.len())
        );
        let mut stmt = self.conn().prepare_cached(&sql)?;
        let pairs = stmt
            .query_map(params_from_iter(marketer_ids), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pairs.into_iter().into_group_map())
    }
}

impl JobCollection for Database {
    fn query_jobs(&self, spec: &JobQuerySpec) -> Result<SearchPage<JobListing>> {
        let ranked = spec.text.is_some();
        let from = if ranked {
            format!("{JOB_FROM}{JOB_FTS_JOIN}")
        } else {
            JOB_FROM.to_string()
        };
        let relevance = if ranked { "-bm25(job_listings_fts)" } else { "NULL" };
        let conditions = job_conditions(spec);

        let total_count = self.count(&from, &conditions)?;
        let items = self.page(
            &format!("SELECT {JOB_COLUMNS}, {relevance} {from}"),
            &conditions,
            job_order_sql(spec.order, ranked),
            spec.window,
            job_from_row,
        )?;

        Ok(SearchPage {
            items,
            total_count,
            page: spec.window.page,
            per_page: spec.window.per_page,
        })
    }
}

impl MarketerCollection for Database {
    fn query_marketers(&self, spec: &MarketerQuerySpec) -> Result<SearchPage<MarketerProfile>> {
        let ranked = spec.text.is_some();
        let from = if ranked {
            format!("{MARKETER_FROM}{MARKETER_FTS_JOIN}")
        } else {
            MARKETER_FROM.to_string()
        };
        let relevance = if ranked {
            "-bm25(marketer_profiles_fts)"
        } else {
            "NULL"
        };
        let conditions = marketer_conditions(spec);

        let total_count = self.count(&from, &conditions)?;
        let mut items = self.page(
            &format!("SELECT {MARKETER_COLUMNS}, {relevance} {from}"),
            &conditions,
            marketer_order_sql(spec.order, ranked),
            spec.window,
            marketer_from_row,
        )?;
        let ids: Vec<i64> = items.iter().map(|profile| profile.id).collect();
        let mut skills = self.facet_names_by_marketer("marketer_skills", "skills", "skill_id", &ids)?;
        let mut tools = self.facet_names_by_marketer("marketer_tools", "tools", "tool_id", &ids)?;
        for profile in &mut items {
            profile.skills = skills.remove(&profile.id).unwrap_or_default();
            profile.tools = tools.remove(&profile.id).unwrap_or_default();
        }

        Ok(SearchPage {
            items,
            total_count,
            page: spec.window.page,
            per_page: spec.window.per_page,
        })
    }
}

impl ProfileSlugStore for Database {
    fn profile_slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let taken: bool = self
            .conn()
            .prepare_cached(
                "SELECT EXISTS(
                    SELECT 1 FROM marketer_profiles
                    WHERE slug = ?1 AND (?2 IS NULL OR id != ?2)
                 )",
            )?
            .query_row(rusqlite::params![slug, exclude_id], |row| row.get(0))?;
        Ok(taken)
    }
}
