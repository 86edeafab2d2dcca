//! hm marketers - Search marketer profiles

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::facet_ids;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::Result;
use crate::facets::FacetKind;
use crate::model::MarketerProfile;
use crate::search::{MarketerSearchParams, SearchPage, search_marketers};

#[derive(Args, Debug)]
pub struct MarketersArgs {
    /// Free-text query over name, title, bio and skills
    pub query: Option<String>,

    /// Skill slug (repeatable)
    #[arg(long = "skill")]
    pub skills: Vec<String>,

    /// Location slug (repeatable)
    #[arg(long = "location", short = 'l')]
    pub locations: Vec<String>,

    /// Service type slug (repeatable)
    #[arg(long = "service-type")]
    pub service_types: Vec<String>,

    /// Tool slug (repeatable)
    #[arg(long = "tool")]
    pub tools: Vec<String>,

    #[arg(long)]
    pub min_rate: Option<i64>,

    #[arg(long)]
    pub max_rate: Option<i64>,

    /// Availability: available, part_time, busy, unavailable
    #[arg(long)]
    pub availability: Option<String>,

    /// Experience level: junior, mid, senior, expert
    #[arg(long)]
    pub experience_level: Option<String>,

    /// Sort by: relevance, rate_asc, rate_desc, recent, activity
    #[arg(long, short)]
    pub sort: Option<String>,

    #[arg(long, short)]
    pub page: Option<i64>,

    #[arg(long)]
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub(crate) struct MarketersReport<'a> {
    #[serde(flatten)]
    pub results: &'a SearchPage<MarketerProfile>,
    pub total_pages: u64,
}

impl MarketersArgs {
    fn to_params(&self, ctx: &AppContext) -> Result<MarketerSearchParams> {
        Ok(MarketerSearchParams {
            query: self.query.clone(),
            skill_ids: facet_ids(&ctx.registry, FacetKind::Skill, &self.skills)?,
            location_ids: facet_ids(&ctx.registry, FacetKind::Location, &self.locations)?,
            service_type_ids: facet_ids(&ctx.registry, FacetKind::ServiceType, &self.service_types)?,
            tool_ids: facet_ids(&ctx.registry, FacetKind::Tool, &self.tools)?,
            min_rate: self.min_rate,
            max_rate: self.max_rate,
            availability: self.availability.clone(),
            experience_level: self.experience_level.clone(),
            sort: self.sort.clone(),
            page: self.page,
            per_page: self.per_page,
        })
    }
}

pub fn run(ctx: &AppContext, args: &MarketersArgs) -> Result<()> {
    let params = args.to_params(ctx)?;
    let results = search_marketers(ctx.db.as_ref(), &params, &ctx.config.search)?;

    if ctx.is_robot() {
        return emit_robot(
            ctx.output_format,
            MarketersReport {
                results: &results,
                total_pages: results.total_pages(),
            },
        );
    }

    let mut layout = HumanLayout::new();
    layout.title(&format!(
        "{} marketer{} (page {} of {})",
        results.total_count,
        if results.total_count == 1 { "" } else { "s" },
        results.page,
        results.total_pages().max(1)
    ));
    if results.is_empty() {
        layout.push_line("No matching marketers");
    }
    render_profiles(&mut layout, &results.items);
    emit_human(layout);
    Ok(())
}

pub(crate) fn render_profiles(layout: &mut HumanLayout, profiles: &[MarketerProfile]) {
    for profile in profiles {
        layout.section(&format!("{} - {}", profile.name, profile.title));
        layout.kv("Rate", &profile.display_rate());
        layout.kv(
            "Location",
            profile.location_name.as_deref().unwrap_or("Unspecified"),
        );
        if let Some(service_type) = &profile.service_type_name {
            layout.kv("Service type", service_type);
        }
        layout.kv("Experience", &profile.experience_level_display());
        if let Some(availability) = profile.availability {
            layout.kv("Availability", &availability.humanize());
        }
        if !profile.skills.is_empty() {
            layout.kv("Skills", &profile.skills.join(", "));
        }
        if !profile.tools.is_empty() {
            layout.kv("Tools", &profile.tools.join(", "));
        }
        layout.kv("Profile", &format!("/{}", profile.slug));
    }
}
