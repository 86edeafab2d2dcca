//! Marketer profile search plans.

use serde::{Deserialize, Serialize};

use super::paging::PageWindow;
use super::text::TextQuery;
use crate::config::SearchConfig;
use crate::facets::Facet;
use crate::model::{Availability, ExperienceLevel};
use crate::routing::ResolvedDimensionSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketerSearchParams {
    pub query: Option<String>,
    pub skill_ids: Vec<i64>,
    pub location_ids: Vec<i64>,
    pub service_type_ids: Vec<i64>,
    pub tool_ids: Vec<i64>,
    pub min_rate: Option<i64>,
    pub max_rate: Option<i64>,
    pub availability: Option<String>,
    pub experience_level: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl MarketerSearchParams {
    /// Facet filters for an SEO landing page, sized for landing pages.
    #[must_use]
    pub fn for_dimensions(dims: &ResolvedDimensionSet, settings: &SearchConfig) -> Self {
        let ids = |facet: Option<&Facet>| -> Vec<i64> { facet.map(|f| f.id).into_iter().collect() };
        Self {
            skill_ids: ids(dims.skill.as_ref()),
            location_ids: ids(dims.location.as_ref()),
            service_type_ids: ids(dims.service_type.as_ref()),
            tool_ids: ids(dims.tool.as_ref()),
            per_page: Some(i64::from(settings.landing_per_page)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketerSort {
    Relevance,
    RateAsc,
    RateDesc,
    Recent,
    Activity,
}

impl MarketerSort {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "relevance" => Some(Self::Relevance),
            "rate_asc" => Some(Self::RateAsc),
            "rate_desc" => Some(Self::RateDesc),
            "recent" => Some(Self::Recent),
            "activity" => Some(Self::Activity),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::RateAsc => "rate_asc",
            Self::RateDesc => "rate_desc",
            Self::Recent => "recent",
            Self::Activity => "activity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "filter", content = "value", rename_all = "snake_case")]
pub enum MarketerFilter {
    /// Has at least one of the skills.
    Skills(Vec<i64>),
    Locations(Vec<i64>),
    ServiceTypes(Vec<i64>),
    /// Uses at least one of the tools.
    Tools(Vec<i64>),
    RateAtLeast(i64),
    RateAtMost(i64),
    Availability(Availability),
    ExperienceLevel(ExperienceLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketerOrder {
    Relevance,
    RateAsc,
    RateDesc,
    Recent,
    Activity,
    /// Identity order, the fallback when nothing ranks.
    Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketerQuerySpec {
    pub filters: Vec<MarketerFilter>,
    pub text: Option<TextQuery>,
    pub order: MarketerOrder,
    pub window: PageWindow,
}

#[must_use]
pub fn plan_marketer_search(
    params: &MarketerSearchParams,
    settings: &SearchConfig,
) -> MarketerQuerySpec {
    let mut filters = Vec::new();

    if !params.skill_ids.is_empty() {
        filters.push(MarketerFilter::Skills(params.skill_ids.clone()));
    }
    if !params.location_ids.is_empty() {
        filters.push(MarketerFilter::Locations(params.location_ids.clone()));
    }
    if !params.service_type_ids.is_empty() {
        filters.push(MarketerFilter::ServiceTypes(params.service_type_ids.clone()));
    }
    if !params.tool_ids.is_empty() {
        filters.push(MarketerFilter::Tools(params.tool_ids.clone()));
    }

    if let Some(min) = params.min_rate {
        filters.push(MarketerFilter::RateAtLeast(min));
    }
    if let Some(max) = params.max_rate {
        filters.push(MarketerFilter::RateAtMost(max));
    }
    if let Some(availability) = params.availability.as_deref().and_then(Availability::parse) {
        filters.push(MarketerFilter::Availability(availability));
    }
    if let Some(level) = params
        .experience_level
        .as_deref()
        .and_then(ExperienceLevel::parse)
    {
        filters.push(MarketerFilter::ExperienceLevel(level));
    }

    let text = params.query.as_deref().and_then(TextQuery::parse);
    let order = match params.sort.as_deref().map(MarketerSort::parse) {
        None | Some(Some(MarketerSort::Relevance)) if text.is_some() => MarketerOrder::Relevance,
        Some(Some(MarketerSort::RateAsc)) => MarketerOrder::RateAsc,
        Some(Some(MarketerSort::RateDesc)) => MarketerOrder::RateDesc,
        Some(Some(MarketerSort::Recent)) => MarketerOrder::Recent,
        Some(Some(MarketerSort::Activity)) => MarketerOrder::Activity,
        _ => MarketerOrder::Id,
    };

    MarketerQuerySpec {
        filters,
        text,
        order,
        window: PageWindow::clamp(
            params.page,
            params.per_page,
            settings.marketer_per_page,
            settings.max_per_page,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::FacetKind;
    use crate::test_utils::fixtures::MemoryFacetStore;

    fn plan(params: &MarketerSearchParams) -> MarketerQuerySpec {
        plan_marketer_search(params, &SearchConfig::default())
    }

    #[test]
    fn test_empty_params_plan() {
        let spec = plan(&MarketerSearchParams::default());
        assert!(spec.filters.is_empty());
        assert_eq!(spec.order, MarketerOrder::Id);
        assert_eq!(spec.window.per_page, 12);
    }

    #[test]
    fn test_order_fallbacks() {
        let cases = [
            (None, None, MarketerOrder::Id),
            (Some("seo"), None, MarketerOrder::Relevance),
            (Some("seo"), Some("relevance"), MarketerOrder::Relevance),
            (None, Some("relevance"), MarketerOrder::Id),
            (Some("seo"), Some("rate_desc"), MarketerOrder::RateDesc),
            (None, Some("recent"), MarketerOrder::Recent),
            (Some("seo"), Some("cheapest"), MarketerOrder::Id),
        ];
        for (query, sort, expected) in cases {
            let spec = plan(&MarketerSearchParams {
                query: query.map(str::to_string),
                sort: sort.map(str::to_string),
                ..MarketerSearchParams::default()
            });
            assert_eq!(spec.order, expected, "query {query:?} sort {sort:?}");
        }
    }

    #[test]
    fn test_rate_and_enum_filters() {
        let spec = plan(&MarketerSearchParams {
            min_rate: Some(80),
            max_rate: Some(100),
            availability: Some("available".to_string()),
            experience_level: Some("guru".to_string()),
            ..MarketerSearchParams::default()
        });
        assert_eq!(
            spec.filters,
            vec![
                MarketerFilter::RateAtLeast(80),
                MarketerFilter::RateAtMost(100),
                MarketerFilter::Availability(Availability::Available),
            ]
        );
    }

    #[test]
    fn test_for_dimensions() {
        let store = MemoryFacetStore::standard();
        let dims: ResolvedDimensionSet = [
            store.facet(FacetKind::Skill, "seo"),
            store.facet(FacetKind::Tool, "hubspot"),
        ]
        .into_iter()
        .collect();

        let params = MarketerSearchParams::for_dimensions(&dims, &SearchConfig::default());
        assert_eq!(params.skill_ids, vec![store.facet(FacetKind::Skill, "seo").id]);
        assert_eq!(params.tool_ids, vec![store.facet(FacetKind::Tool, "hubspot").id]);
        assert!(params.location_ids.is_empty());
        assert_eq!(params.per_page, Some(20));

        let spec = plan(&params);
        assert_eq!(spec.window.per_page, 20);
        assert_eq!(spec.filters.len(), 2);
    }
}
