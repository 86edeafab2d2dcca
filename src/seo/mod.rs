//! Metadata and cross-links for programmatic SEO landing pages.

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::RoutingConfig;
use crate::error::Result;
use crate::facets::{DimensionRegistry, Facet, FacetKind, FacetStore};
use crate::routing::ResolvedDimensionSet;

pub const DEFAULT_SITE_NAME: &str = "HeyMarketers";

/// Longest meta description, ellipsis included.
pub const MAX_DESCRIPTION_CHARS: usize = 155;

const ELLIPSIS: &str = "...";

/// Most related links rendered on one landing page.
pub const MAX_RELATED_PAGES: usize = 8;

const RELATED_SINGLES_PER_KIND: usize = 5;
const RELATED_COMBINATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    /// JSON-LD `CollectionPage`.
    pub structured_data: Value,
}

/// Builds landing-page metadata. Defaults match the production site.
#[derive(Debug, Clone)]
pub struct SeoMetadataBuilder {
    site_name: String,
    base_url: Option<String>,
    total_count: u64,
}

impl Default for SeoMetadataBuilder {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            base_url: None,
            total_count: 0,
        }
    }
}

impl SeoMetadataBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            site_name: config.site_name.clone(),
            base_url: config.base_url.clone(),
            total_count: 0,
        }
    }

    #[must_use]
    pub fn site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Number of marketers on the landing page, for `numberOfItems`.
    #[must_use]
    pub const fn total_count(mut self, total_count: u64) -> Self {
        self.total_count = total_count;
        self
    }

    /// Metadata for a non-empty dimension set.
    #[must_use]
    pub fn build(&self, dims: &ResolvedDimensionSet) -> SeoMetadata {
        let title = self.title(dims);
        let description = description(dims);
        let structured_data = self.structured_data(dims, &title, &description);
        SeoMetadata {
            title,
            description,
            structured_data,
        }
    }

    fn title(&self, dims: &ResolvedDimensionSet) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(skill) = &dims.skill {
            parts.push(skill.name.clone());
        }
        if let Some(tool) = &dims.tool {
            parts.push(format!("{} Expert", tool.name));
        }
        parts.push("Specialists".to_string());
        if let Some(location) = &dims.location {
            if location.is_remote_location() {
                parts.push(location.name.clone());
            } else {
                parts.push(format!("in {}", location.name));
            }
        }
        if let Some(service_type) = &dims.service_type {
            parts.push(format!("({})", service_type.name));
        }
        format!("{} - {}", parts.join(" "), self.site_name)
    }

    fn structured_data(&self, dims: &ResolvedDimensionSet, title: &str, description: &str) -> Value {
        let mut data = json!({
            "@context": "https://schema.org",
            "@type": "CollectionPage",
            "name": title,
            "description": description,
            "mainEntity": {
                "@type": "ItemList",
                "numberOfItems": self.total_count,
                "itemListElement": [],
            },
        });
        if let Some(base_url) = &self.base_url {
            data["url"] = json!(format!("{}{}", base_url.trim_end_matches('/'), seo_path_for(dims)));
        }
        if let Some(skill) = &dims.skill {
            data["about"] = json!({
                "@type": "Thing",
                "name": skill.name,
                "description": "Marketing skill specialization",
            });
        }
        if let Some(location) = &dims.location {
            data["spatialCoverage"] = json!({
                "@type": "Place",
                "name": location.name,
            });
        }
        data
    }
}

/// Metadata with the default site name and no page URL.
#[must_use]
pub fn build_seo_metadata(dims: &ResolvedDimensionSet) -> SeoMetadata {
    SeoMetadataBuilder::default().build(dims)
}

fn description(dims: &ResolvedDimensionSet) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(skill) = &dims.skill {
        parts.push(skill.name.to_lowercase());
    }
    if let Some(tool) = &dims.tool {
        parts.push(tool.name.to_lowercase());
    }
    if let Some(location) = &dims.location {
        if location.is_remote_location() {
            parts.push("remote".to_string());
        } else {
            parts.push(format!("in {}", location.name.to_lowercase()));
        }
    }
    if let Some(service_type) = &dims.service_type {
        parts.push(format!("for {} work", service_type.name.to_lowercase()));
    }
    let sentence = format!(
        "Find expert {} specialists. Browse verified profiles, rates, and portfolios of marketing professionals available for hire.",
        parts.join(" and ")
    );
    truncate_chars(&sentence, MAX_DESCRIPTION_CHARS)
}

/// Cut to `max` characters, the trailing ellipsis counting toward `max`.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Canonical landing-page path: skill, location, service type, tool.
#[must_use]
pub fn seo_path_for(dims: &ResolvedDimensionSet) -> String {
    let slugs: Vec<&str> = dims.iter().map(|facet| facet.slug.as_str()).collect();
    if slugs.is_empty() {
        "/directory".to_string()
    } else {
        format!("/{}", slugs.join("/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    Skill,
    Location,
    Tool,
    Combination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedPage {
    pub title: String,
    pub path: String,
    pub kind: RelatedKind,
}

/// Cross-links for a landing page, in a stable order, at most
/// [`MAX_RELATED_PAGES`].
///
/// Single-dimension pages are offered for skill, location and tool when the
/// current page lacks that kind; skill and location pages also link to
/// their skill-by-location combinations. The groups are taken round-robin so
/// every kind of link gets a slot before any kind gets a second one.
pub fn related_pages<S: FacetStore>(
    dims: &ResolvedDimensionSet,
    registry: &DimensionRegistry<S>,
) -> Result<Vec<RelatedPage>> {
    let mut groups = Vec::new();

    if dims.skill.is_none() {
        groups.push(
            registry
                .list(FacetKind::Skill, RELATED_SINGLES_PER_KIND)?
                .into_iter()
                .map(|skill| RelatedPage {
                    title: format!("{} Specialists", skill.name),
                    path: single_path(&skill),
                    kind: RelatedKind::Skill,
                })
                .collect::<Vec<_>>(),
        );
    }
    if dims.location.is_none() {
        groups.push(
            registry
                .list(FacetKind::Location, RELATED_SINGLES_PER_KIND)?
                .into_iter()
                .map(|location| RelatedPage {
                    title: format!("Specialists in {}", location.name),
                    path: single_path(&location),
                    kind: RelatedKind::Location,
                })
                .collect(),
        );
    }
    if dims.tool.is_none() {
        groups.push(
            registry
                .list(FacetKind::Tool, RELATED_SINGLES_PER_KIND)?
                .into_iter()
                .map(|tool| RelatedPage {
                    title: format!("{} Experts", tool.name),
                    path: single_path(&tool),
                    kind: RelatedKind::Tool,
                })
                .collect(),
        );
    }

    match (&dims.skill, &dims.location) {
        (Some(skill), None) => groups.push(
            registry
                .list(FacetKind::Location, RELATED_COMBINATIONS)?
                .iter()
                .map(|location| combination(skill, location))
                .collect(),
        ),
        (None, Some(location)) => groups.push(
            registry
                .list(FacetKind::Skill, RELATED_COMBINATIONS)?
                .iter()
                .map(|skill| combination(skill, location))
                .collect(),
        ),
        _ => {}
    }

    Ok(round_robin(groups, MAX_RELATED_PAGES))
}

fn round_robin(groups: Vec<Vec<RelatedPage>>, limit: usize) -> Vec<RelatedPage> {
    let mut sources: Vec<_> = groups.into_iter().map(Vec::into_iter).collect();
    let mut picked = Vec::with_capacity(limit);
    while picked.len() < limit {
        let before = picked.len();
        for source in &mut sources {
            if picked.len() == limit {
                break;
            }
            if let Some(page) = source.next() {
                picked.push(page);
            }
        }
        if picked.len() == before {
            break;
        }
    }
    picked
}

fn single_path(facet: &Facet) -> String {
    format!("/{}", facet.slug)
}

fn combination(skill: &Facet, location: &Facet) -> RelatedPage {
    RelatedPage {
        title: format!("{} Specialists in {}", skill.name, location.name),
        path: format!("/{}/{}", skill.slug, location.slug),
        kind: RelatedKind::Combination,
    }
}
