//! hm resolve - Resolve an SEO landing-page path
//!
//! Prints what the landing page would render: the resolved facets, page
//! metadata, cross-links and the first page of matching marketers.

use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::commands::marketers::{MarketersReport, render_profiles};
use crate::cli::output::{HumanLayout, emit_human, emit_robot};
use crate::error::Result;
use crate::routing::SlugResolution;
use crate::search::{MarketerSearchParams, search_marketers};
use crate::seo::{RelatedPage, SeoMetadata, SeoMetadataBuilder, related_pages, seo_path_for};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path segments, either separately (`seo remote`) or as a path
    /// (`/seo/remote`)
    pub segments: Vec<String>,

    /// Page of landing-page results
    #[arg(long, short)]
    pub page: Option<i64>,
}

impl ResolveArgs {
    fn split_segments(&self) -> Vec<String> {
        self.segments
            .iter()
            .flat_map(|segment| segment.split('/'))
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Serialize)]
struct LandingPage<'a> {
    canonical_path: String,
    seo: SeoMetadata,
    related: Vec<RelatedPage>,
    marketers: MarketersReport<'a>,
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    segments: Vec<String>,
    resolution: &'a SlugResolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    landing: Option<LandingPage<'a>>,
}

pub fn run(ctx: &AppContext, args: &ResolveArgs) -> Result<()> {
    let segments = args.split_segments();
    let resolution = ctx.resolver().resolve_slug_path(&segments)?;
    debug!(target: "routing", ?segments, resolved = resolution.is_resolved(), "resolve command");

    let results = match &resolution {
        SlugResolution::Resolved(dims) => {
            let params = MarketerSearchParams {
                page: args.page,
                ..MarketerSearchParams::for_dimensions(dims, &ctx.config.search)
            };
            Some(search_marketers(ctx.db.as_ref(), &params, &ctx.config.search)?)
        }
        SlugResolution::Invalid(_) => None,
    };

    let landing = match (&resolution, &results) {
        (SlugResolution::Resolved(dims), Some(results)) => Some(LandingPage {
            canonical_path: seo_path_for(dims),
            seo: SeoMetadataBuilder::from_config(&ctx.config.routing)
                .total_count(results.total_count)
                .build(dims),
            related: related_pages(dims, &ctx.registry)?,
            marketers: MarketersReport {
                results,
                total_pages: results.total_pages(),
            },
        }),
        _ => None,
    };

    let report = ResolveReport {
        segments,
        resolution: &resolution,
        landing,
    };

    if ctx.is_robot() {
        return emit_robot(ctx.output_format, report);
    }

    let requested = format!("/{}", report.segments.join("/"));
    let mut layout = HumanLayout::new();
    let Some(landing) = &report.landing else {
        layout.title(&format!("{requested} is not a landing page"));
        if let SlugResolution::Invalid(reason) = &resolution {
            layout.kv("Reason", &reason.to_string());
        }
        emit_human(layout);
        return Ok(());
    };

    layout.title(&landing.seo.title);
    layout.kv("Description", &landing.seo.description);
    layout.kv("Canonical path", &landing.canonical_path);
    if landing.canonical_path != requested {
        layout.kv("Requested", &requested);
    }
    if let SlugResolution::Resolved(dims) = &resolution {
        for facet in dims.iter() {
            layout.kv(facet.kind.label(), &facet.name);
        }
    }

    if !landing.related.is_empty() {
        layout.section("Related pages");
        for page in &landing.related {
            layout.bullet(&format!("{} ({})", page.title, page.path));
        }
    }

    let results = landing.marketers.results;
    layout.section(&format!(
        "Marketers: {} (page {} of {})",
        results.total_count,
        results.page,
        landing.marketers.total_pages.max(1)
    ));
    render_profiles(&mut layout, &results.items);
    emit_human(layout);
    Ok(())
}
