//! Marketer profile slugs share the top-level URL namespace with facet
//! landing pages, so a profile slug must dodge reserved paths and every
//! facet slug as well as other profiles.

use serde::Serialize;

use super::reserved::ReservedPaths;
use crate::error::Result;
use crate::facets::{DimensionRegistry, FacetKind, FacetStore, is_valid_slug, slugify, unique_slug};

/// Fallback base when a name slugifies to nothing.
const FALLBACK_BASE: &str = "marketer";

pub trait ProfileSlugStore {
    /// Whether a profile other than `exclude_id` already owns `slug`.
    fn profile_slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;
}

impl<T: ProfileSlugStore + ?Sized> ProfileSlugStore for &T {
    fn profile_slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        (**self).profile_slug_taken(slug, exclude_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "kind", rename_all = "snake_case")]
pub enum SlugAvailability {
    Available,
    InvalidFormat,
    Reserved,
    FacetConflict(FacetKind),
    Taken,
}

impl SlugAvailability {
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    /// Message shown next to the slug field.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::Available => "available".to_string(),
            Self::InvalidFormat => {
                "can only contain lowercase letters, numbers, and hyphens".to_string()
            }
            Self::Reserved => "is reserved and cannot be used".to_string(),
            Self::FacetConflict(kind) => format!("conflicts with an existing {}", kind.label()),
            Self::Taken => "is already taken".to_string(),
        }
    }
}

/// Checks and generates profile slugs against every namespace owner.
pub struct ProfileSlugPolicy<'a, S, P: ?Sized> {
    registry: &'a DimensionRegistry<S>,
    reserved: &'a ReservedPaths,
    profiles: &'a P,
}

impl<'a, S: FacetStore, P: ProfileSlugStore + ?Sized> ProfileSlugPolicy<'a, S, P> {
    pub const fn new(
        registry: &'a DimensionRegistry<S>,
        reserved: &'a ReservedPaths,
        profiles: &'a P,
    ) -> Self {
        Self {
            registry,
            reserved,
            profiles,
        }
    }

    /// Availability of `slug` for the profile `profile_id` (`None` for a
    /// profile not yet saved). Facet checks are live, not cached.
    pub fn check_profile_slug(&self, slug: &str, profile_id: Option<i64>) -> Result<SlugAvailability> {
        if !is_valid_slug(slug) {
            return Ok(SlugAvailability::InvalidFormat);
        }
        if self.reserved.contains(slug) {
            return Ok(SlugAvailability::Reserved);
        }
        for kind in FacetKind::ALL {
            if self.registry.find(kind, slug)?.is_some() {
                return Ok(SlugAvailability::FacetConflict(kind));
            }
        }
        if self.profiles.profile_slug_taken(slug, profile_id)? {
            return Ok(SlugAvailability::Taken);
        }
        Ok(SlugAvailability::Available)
    }

    /// First free slug derived from `name`: `name`, `name-1`, `name-2`, ...
    pub fn generate_profile_slug(&self, name: &str, profile_id: Option<i64>) -> Result<String> {
        let base = slugify(name);
        let base = if base.is_empty() { FALLBACK_BASE } else { base.as_str() };
        unique_slug(base, |candidate| {
            Ok(!self.check_profile_slug(candidate, profile_id)?.is_available())
        })
    }
}
