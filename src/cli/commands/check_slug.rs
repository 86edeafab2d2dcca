//! hm check-slug - Check whether a marketer profile slug is available

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::Result;
use crate::routing::{ProfileSlugPolicy, SlugAvailability};

#[derive(Args, Debug)]
pub struct CheckSlugArgs {
    /// Candidate slug
    pub slug: String,

    /// Profile being edited; its own current slug counts as available
    #[arg(long)]
    pub profile_id: Option<i64>,

    /// Also suggest a free slug derived from this name
    #[arg(long)]
    pub suggest_from: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckSlugReport {
    slug: String,
    available: bool,
    availability: SlugAvailability,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

pub fn run(ctx: &AppContext, args: &CheckSlugArgs) -> Result<()> {
    let policy = ProfileSlugPolicy::new(&ctx.registry, &ctx.reserved, ctx.db.as_ref());
    let availability = policy.check_profile_slug(&args.slug, args.profile_id)?;
    let suggestion = args
        .suggest_from
        .as_deref()
        .map(|name| policy.generate_profile_slug(name, args.profile_id))
        .transpose()?;

    let report = CheckSlugReport {
        slug: args.slug.clone(),
        available: availability.is_available(),
        availability,
        message: availability.message(),
        suggestion,
    };

    if ctx.is_robot() {
        return emit_robot(ctx.output_format, report);
    }

    let mut layout = HumanLayout::new();
    layout.title(&format!("'{}' {}", report.slug, report.message));
    if let Some(suggestion) = &report.suggestion {
        layout.kv("Suggestion", suggestion);
    }
    emit_human(layout);
    Ok(())
}
