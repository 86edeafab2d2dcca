//! hm seed - Load a JSON fixture into the database

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::Result;
use crate::storage::load_seed_file;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Seed file (JSON with skills, locations, service_types, tools,
    /// companies, jobs, marketers)
    pub file: PathBuf,
}

pub fn run(ctx: &AppContext, args: &SeedArgs) -> Result<()> {
    let report = load_seed_file(&ctx.db, &args.file, &ctx.reserved, ctx.clock.now())?;
    if let Some(cache) = ctx.registry.cache() {
        cache.clear();
    }

    if ctx.is_robot() {
        return emit_robot(ctx.output_format, report);
    }

    let mut layout = HumanLayout::new();
    layout.title(&format!("Seeded from {}", args.file.display()));
    layout.kv("Facets", &report.facets.to_string());
    layout.kv("Companies", &report.companies.to_string());
    layout.kv("Jobs", &report.jobs.to_string());
    layout.kv("Marketers", &report.marketers.to_string());
    emit_human(layout);
    Ok(())
}
