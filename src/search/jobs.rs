//! Job listing search plans.

use chrono::{DateTime, Days, Months, Utc};
use serde::{Deserialize, Serialize};

use super::paging::PageWindow;
use super::text::TextQuery;
use crate::config::SearchConfig;
use crate::model::{CompanySize, EmploymentType};

/// Raw job search parameters as they arrive from a request.
///
/// Everything is optional and loosely typed; planning normalizes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSearchParams {
    pub query: Option<String>,
    pub location_ids: Vec<i64>,
    pub employment_type: Option<String>,
    /// Takes precedence over `employment_type` when non-empty.
    pub employment_types: Vec<String>,
    pub remote_ok: Option<bool>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub posted_within: Option<String>,
    pub company_size: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    Relevance,
    DateDesc,
    DateAsc,
    SalaryDesc,
    SalaryAsc,
}

impl JobSort {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "relevance" => Some(Self::Relevance),
            "date_desc" => Some(Self::DateDesc),
            "date_asc" => Some(Self::DateAsc),
            "salary_desc" => Some(Self::SalaryDesc),
            "salary_asc" => Some(Self::SalaryAsc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::DateDesc => "date_desc",
            Self::DateAsc => "date_asc",
            Self::SalaryDesc => "salary_desc",
            Self::SalaryAsc => "salary_asc",
        }
    }
}

/// Recency window for `posted_within`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyWindow {
    Day,
    Week,
    Month,
}

impl RecencyWindow {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    /// Earliest `posted_at` inside the window ending at `now`.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let shifted = match self {
            Self::Day => now.checked_sub_days(Days::new(1)),
            Self::Week => now.checked_sub_days(Days::new(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
        };
        shifted.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// One AND-ed predicate over job listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "filter", content = "value", rename_all = "snake_case")]
pub enum JobFilter {
    /// `status = active` and not expired at the given instant.
    Active(DateTime<Utc>),
    Locations(Vec<i64>),
    EmploymentTypes(Vec<EmploymentType>),
    RemoteOnly,
    /// Either bound at or above the value.
    SalaryAtLeast(i64),
    /// Max at or below the value, or min at or below it with no max.
    SalaryAtMost(i64),
    PostedSince(DateTime<Utc>),
    CompanySize(CompanySize),
}

/// Effective ordering after fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOrder {
    Relevance,
    DateDesc,
    DateAsc,
    SalaryDesc,
    SalaryAsc,
}

/// An immutable job search plan. Executed once by a [`super::JobCollection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobQuerySpec {
    pub filters: Vec<JobFilter>,
    pub text: Option<TextQuery>,
    pub order: JobOrder,
    pub window: PageWindow,
}

/// Normalize request parameters into a plan. Never fails: unknown values
/// drop their filter and unknown sorts fall back.
#[must_use]
pub fn plan_job_search(
    params: &JobSearchParams,
    settings: &SearchConfig,
    now: DateTime<Utc>,
) -> JobQuerySpec {
    let mut filters = vec![JobFilter::Active(now)];

    if !params.location_ids.is_empty() {
        filters.push(JobFilter::Locations(params.location_ids.clone()));
    }

    let requested_types: Vec<&str> = params
        .employment_types
        .iter()
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
        .collect();
    let employment_types: Vec<EmploymentType> = if requested_types.is_empty() {
        params
            .employment_type
            .as_deref()
            .and_then(EmploymentType::parse)
            .into_iter()
            .collect()
    } else {
        let mut parsed: Vec<EmploymentType> = Vec::new();
        for value in requested_types {
            if let Some(kind) = EmploymentType::parse(value) {
                if !parsed.contains(&kind) {
                    parsed.push(kind);
                }
            }
        }
        parsed
    };
    if !employment_types.is_empty() {
        filters.push(JobFilter::EmploymentTypes(employment_types));
    }

    if params.remote_ok == Some(true) {
        filters.push(JobFilter::RemoteOnly);
    }
    if let Some(min) = params.min_salary {
        filters.push(JobFilter::SalaryAtLeast(min));
    }
    if let Some(max) = params.max_salary {
        filters.push(JobFilter::SalaryAtMost(max));
    }
    if let Some(window) = params.posted_within.as_deref().and_then(RecencyWindow::parse) {
        filters.push(JobFilter::PostedSince(window.cutoff(now)));
    }
    if let Some(size) = params.company_size.as_deref().and_then(CompanySize::parse) {
        filters.push(JobFilter::CompanySize(size));
    }

    let text = params.query.as_deref().and_then(TextQuery::parse);
    let order = match params.sort.as_deref() {
        None => default_order(text.as_ref()),
        Some(value) => match JobSort::parse(value) {
            Some(JobSort::Relevance) => default_order(text.as_ref()),
            Some(JobSort::DateDesc) | None => JobOrder::DateDesc,
            Some(JobSort::DateAsc) => JobOrder::DateAsc,
            Some(JobSort::SalaryDesc) => JobOrder::SalaryDesc,
            Some(JobSort::SalaryAsc) => JobOrder::SalaryAsc,
        },
    };

    JobQuerySpec {
        filters,
        text,
        order,
        window: PageWindow::clamp(
            params.page,
            params.per_page,
            settings.job_per_page,
            settings.max_per_page,
        ),
    }
}

const fn default_order(text: Option<&TextQuery>) -> JobOrder {
    if text.is_some() {
        JobOrder::Relevance
    } else {
        JobOrder::DateDesc
    }
}
