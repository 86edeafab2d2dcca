//! Facet dimensions: the four classification axes shared by search
//! filtering and SEO path construction.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

pub mod cache;
pub mod registry;

pub use cache::{ExistenceCache, ExistenceCacheStats};
pub use registry::{DimensionRegistry, FacetStore};

static SLUG_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("static slug pattern"));

/// One of the four orthogonal facet kinds.
///
/// The declaration order is the canonical order used for SEO paths and
/// titles: skill, location, service type, tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Skill,
    Location,
    ServiceType,
    Tool,
}

impl FacetKind {
    pub const ALL: [Self; 4] = [Self::Skill, Self::Location, Self::ServiceType, Self::Tool];

    /// Backing table for this kind.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Skill => "skills",
            Self::Location => "locations",
            Self::ServiceType => "service_types",
            Self::Tool => "tools",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Location => "location",
            Self::ServiceType => "service_type",
            Self::Tool => "tool",
        }
    }

    /// Human readable label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Location => "location",
            Self::ServiceType => "service type",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "skill" | "skills" => Ok(Self::Skill),
            "location" | "locations" => Ok(Self::Location),
            "service_type" | "service-type" | "service_types" => Ok(Self::ServiceType),
            "tool" | "tools" => Ok(Self::Tool),
            other => Err(format!(
                "unknown facet kind {other} (expected skill|location|service_type|tool)"
            )),
        }
    }
}

/// A concrete facet entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub id: i64,
    pub kind: FacetKind,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Facet {
    /// True for the location rendered verbatim in titles.
    #[must_use]
    pub fn is_remote_location(&self) -> bool {
        self.kind == FacetKind::Location && self.name == "Remote"
    }
}

/// Whether `slug` is lowercase ASCII alphanumerics and hyphens.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_FORMAT.is_match(slug)
}

/// Derive a URL slug from a display name.
///
/// Accents are folded, everything outside `[a-z0-9]` collapses into a single
/// hyphen, and leading/trailing hyphens are dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    let folded: String = name.nfkd().filter(char::is_ascii).collect();
    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Pick the first candidate `base`, `base-1`, `base-2`, ... that `taken`
/// rejects.
pub fn unique_slug<F>(base: &str, mut taken: F) -> crate::error::Result<String>
where
    F: FnMut(&str) -> crate::error::Result<bool>,
{
    if !taken(base)? {
        return Ok(base.to_string());
    }
    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken(&candidate)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Search Engine Optimization"), "search-engine-optimization");
        assert_eq!(slugify("  PPC & Advertising  "), "ppc-advertising");
        assert_eq!(slugify("São Paulo"), "sao-paulo");
        assert_eq!(slugify("HubSpot"), "hubspot");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("seo"));
        assert!(is_valid_slug("new-york-2"));
        assert!(!is_valid_slug("SEO"));
        assert!(!is_valid_slug("seo marketing"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("seo_marketing"));
    }

    #[test]
    fn test_unique_slug_appends_counter() {
        let existing = ["acme", "acme-1"];
        let slug = unique_slug("acme", |candidate| Ok(existing.contains(&candidate))).unwrap();
        assert_eq!(slug, "acme-2");

        let slug = unique_slug("fresh", |candidate| Ok(existing.contains(&candidate))).unwrap();
        assert_eq!(slug, "fresh");
    }

    #[test]
    fn test_facet_kind_parse_and_order() {
        assert_eq!("service-type".parse::<FacetKind>().unwrap(), FacetKind::ServiceType);
        assert!("industry".parse::<FacetKind>().is_err());

        let mut kinds = vec![FacetKind::Tool, FacetKind::Skill, FacetKind::ServiceType, FacetKind::Location];
        kinds.sort();
        assert_eq!(kinds, FacetKind::ALL.to_vec());
    }

    #[test]
    fn test_facet_kind_serialization() {
        let json = serde_json::to_string(&FacetKind::ServiceType).unwrap();
        assert_eq!(json, "\"service_type\"");
    }

    #[test]
    fn test_remote_location_is_exact_match() {
        let remote = Facet {
            id: 1,
            kind: FacetKind::Location,
            name: "Remote".to_string(),
            slug: "remote".to_string(),
            category: None,
        };
        assert!(remote.is_remote_location());

        let remote_ish = Facet {
            name: "Remote (US)".to_string(),
            ..remote.clone()
        };
        assert!(!remote_ish.is_remote_location());

        let skill = Facet {
            kind: FacetKind::Skill,
            ..remote
        };
        assert!(!skill.is_remote_location());
    }
}
