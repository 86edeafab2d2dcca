//! hm jobs - Search active job listings

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::facet_ids;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::Result;
use crate::facets::FacetKind;
use crate::model::JobListing;
use crate::search::{JobSearchParams, SearchPage, search_jobs};

#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Free-text query over title, description, company and type
    pub query: Option<String>,

    /// Location slug (repeatable)
    #[arg(long = "location", short = 'l')]
    pub locations: Vec<String>,

    /// Employment type: full_time, part_time, contract, freelance, internship
    /// (repeatable)
    #[arg(long = "employment-type", short = 't')]
    pub employment_types: Vec<String>,

    /// Only listings open to remote candidates
    #[arg(long)]
    pub remote: bool,

    #[arg(long)]
    pub min_salary: Option<i64>,

    #[arg(long)]
    pub max_salary: Option<i64>,

    /// Posted within: day, week, month
    #[arg(long)]
    pub posted_within: Option<String>,

    /// Company size: startup, small, medium, large, enterprise
    #[arg(long)]
    pub company_size: Option<String>,

    /// Sort by: relevance, date_desc, date_asc, salary_desc, salary_asc
    #[arg(long, short)]
    pub sort: Option<String>,

    #[arg(long, short)]
    pub page: Option<i64>,

    #[arg(long)]
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
struct JobsReport<'a> {
    #[serde(flatten)]
    results: &'a SearchPage<JobListing>,
    total_pages: u64,
}

impl JobsArgs {
    fn to_params(&self, ctx: &AppContext) -> Result<JobSearchParams> {
        Ok(JobSearchParams {
            query: self.query.clone(),
            location_ids: facet_ids(&ctx.registry, FacetKind::Location, &self.locations)?,
            employment_types: self.employment_types.clone(),
            remote_ok: self.remote.then_some(true),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            posted_within: self.posted_within.clone(),
            company_size: self.company_size.clone(),
            sort: self.sort.clone(),
            page: self.page,
            per_page: self.per_page,
            ..JobSearchParams::default()
        })
    }
}

pub fn run(ctx: &AppContext, args: &JobsArgs) -> Result<()> {
    let params = args.to_params(ctx)?;
    let results = search_jobs(ctx.db.as_ref(), &params, &ctx.config.search, ctx.clock.as_ref())?;

    if ctx.is_robot() {
        return emit_robot(
            ctx.output_format,
            JobsReport {
                results: &results,
                total_pages: results.total_pages(),
            },
        );
    }

    let mut layout = HumanLayout::new();
    layout.title(&format!(
        "{} job{} (page {} of {})",
        results.total_count,
        if results.total_count == 1 { "" } else { "s" },
        results.page,
        results.total_pages().max(1)
    ));
    if results.is_empty() {
        layout.push_line("No matching jobs");
    }
    for job in &results.items {
        layout.section(&job.title);
        layout.kv("Company", &job.company_name);
        layout.kv(
            "Location",
            job.location_name.as_deref().unwrap_or("Unspecified"),
        );
        layout.kv("Type", &job.employment_type.humanize());
        layout.kv("Salary", &job.display_salary());
        layout.kv("Remote", if job.remote_ok { "yes" } else { "no" });
        layout.kv("Posted", &job.posted_at.format("%Y-%m-%d").to_string());
        if let Some(score) = job.relevance {
            layout.kv("Relevance", &format!("{score:.3}"));
        }
    }
    emit_human(layout);
    Ok(())
}
