//! Programmatic SEO path resolution.
//!
//! A path of 1-4 segments is a landing page when the segments can be bound
//! to *distinct* facet kinds such that every segment exists as its kind.
//! Segment order never decides the kind: `/seo/remote` and `/remote/seo`
//! resolve identically.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::reserved::ReservedPaths;
use crate::error::Result;
use crate::facets::{DimensionRegistry, Facet, FacetKind, FacetStore, is_valid_slug};

use FacetKind::{Location, ServiceType, Skill, Tool};

/// Longest path the resolver accepts.
pub const MAX_SEGMENTS: usize = 4;

/// Legal kind combinations, by arity. Adding a dimension means adding rows
/// here; the search below is generic over the table.
pub const COMBINATIONS: &[&[FacetKind]] = &[
    &[Skill],
    &[Location],
    &[ServiceType],
    &[Tool],
    &[Skill, Location],
    &[Skill, ServiceType],
    &[Skill, Tool],
    &[Location, ServiceType],
    &[Location, Tool],
    &[ServiceType, Tool],
    &[Skill, Location, ServiceType],
    &[Skill, Location, Tool],
    &[Skill, ServiceType, Tool],
    &[Location, ServiceType, Tool],
    &[Skill, Location, ServiceType, Tool],
];

/// Combinations with exactly `arity` kinds.
pub fn combinations_for(arity: usize) -> impl Iterator<Item = &'static [FacetKind]> {
    COMBINATIONS
        .iter()
        .copied()
        .filter(move |combo| combo.len() == arity)
}

/// At most one facet per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDimensionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<Facet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Facet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<Facet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<Facet>,
}

impl ResolvedDimensionSet {
    #[must_use]
    pub const fn get(&self, kind: FacetKind) -> Option<&Facet> {
        match kind {
            Skill => self.skill.as_ref(),
            Location => self.location.as_ref(),
            ServiceType => self.service_type.as_ref(),
            Tool => self.tool.as_ref(),
        }
    }

    const fn slot(&mut self, kind: FacetKind) -> &mut Option<Facet> {
        match kind {
            Skill => &mut self.skill,
            Location => &mut self.location,
            ServiceType => &mut self.service_type,
            Tool => &mut self.tool,
        }
    }

    /// Insert a facet under its own kind. Returns the facet back when that
    /// kind is already occupied.
    pub fn insert(&mut self, facet: Facet) -> std::result::Result<(), Facet> {
        let slot = self.slot(facet.kind);
        if slot.is_some() {
            return Err(facet);
        }
        *slot = Some(facet);
        Ok(())
    }

    /// Facets in canonical kind order.
    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        FacetKind::ALL.into_iter().filter_map(|kind| self.get(kind))
    }

    pub fn kinds(&self) -> impl Iterator<Item = FacetKind> + '_ {
        self.iter().map(|facet| facet.kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Facet> for ResolvedDimensionSet {
    /// Later facets of an already present kind are dropped.
    fn from_iter<I: IntoIterator<Item = Facet>>(iter: I) -> Self {
        let mut set = Self::default();
        for facet in iter {
            let _ = set.insert(facet);
        }
        set
    }
}

/// Why a path is not a landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidPath {
    Empty,
    TooManySegments { count: usize },
    Reserved { segment: String },
    Malformed { segment: String },
    Unresolved,
}

impl std::fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("no path segments"),
            Self::TooManySegments { count } => {
                write!(f, "{count} segments (at most {MAX_SEGMENTS} allowed)")
            }
            Self::Reserved { segment } => write!(f, "'{segment}' is a reserved path"),
            Self::Malformed { segment } => write!(f, "'{segment}' is not a valid slug"),
            Self::Unresolved => f.write_str("segments do not form a valid facet combination"),
        }
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SlugResolution {
    Resolved(ResolvedDimensionSet),
    Invalid(InvalidPath),
}

impl SlugResolution {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub fn into_dimensions(self) -> Option<ResolvedDimensionSet> {
        match self {
            Self::Resolved(dims) => Some(dims),
            Self::Invalid(_) => None,
        }
    }
}

/// Maps URL path segments onto facet kinds.
pub struct SlugResolver<'a, S> {
    registry: &'a DimensionRegistry<S>,
    reserved: &'a ReservedPaths,
}

impl<'a, S: FacetStore> SlugResolver<'a, S> {
    pub const fn new(registry: &'a DimensionRegistry<S>, reserved: &'a ReservedPaths) -> Self {
        Self { registry, reserved }
    }

    /// Cheap dispatch-time check: cached existence lookups only.
    pub fn is_valid_slug_path<T: AsRef<str>>(&self, segments: &[T]) -> Result<bool> {
        let segments = as_strs(segments);
        if self.precheck(&segments).is_some() {
            return Ok(false);
        }
        Ok(self.assign_kinds(&segments)?.is_some())
    }

    /// Full resolution, returning live facet entities on success.
    pub fn resolve_slug_path<T: AsRef<str>>(&self, segments: &[T]) -> Result<SlugResolution> {
        let segments = as_strs(segments);
        if let Some(invalid) = self.precheck(&segments) {
            debug!(target: "routing", ?segments, %invalid, "path rejected");
            return Ok(SlugResolution::Invalid(invalid));
        }

        let Some(kinds) = self.assign_kinds(&segments)? else {
            debug!(target: "routing", ?segments, "no kind assignment");
            return Ok(SlugResolution::Invalid(InvalidPath::Unresolved));
        };

        let mut dims = ResolvedDimensionSet::default();
        for (segment, kind) in segments.iter().zip(kinds) {
            // The cache may be stale; a facet removed since it was cached
            // makes the path unresolvable.
            let Some(facet) = self.registry.find(kind, segment)? else {
                return Ok(SlugResolution::Invalid(InvalidPath::Unresolved));
            };
            if dims.insert(facet).is_err() {
                return Ok(SlugResolution::Invalid(InvalidPath::Unresolved));
            }
        }

        debug!(target: "routing", ?segments, dimensions = dims.len(), "path resolved");
        Ok(SlugResolution::Resolved(dims))
    }

    fn precheck(&self, segments: &[&str]) -> Option<InvalidPath> {
        if segments.is_empty() {
            return Some(InvalidPath::Empty);
        }
        if segments.len() > MAX_SEGMENTS {
            return Some(InvalidPath::TooManySegments {
                count: segments.len(),
            });
        }
        if let Some(segment) = self.reserved.first_reserved(segments) {
            return Some(InvalidPath::Reserved {
                segment: segment.to_string(),
            });
        }
        segments
            .iter()
            .find(|segment| !is_valid_slug(segment))
            .map(|segment| InvalidPath::Malformed {
                segment: (*segment).to_string(),
            })
    }

    /// Find a kind for each segment, all distinct, from a legal combination.
    fn assign_kinds(&self, segments: &[&str]) -> Result<Option<Vec<FacetKind>>> {
        let mut memo: HashMap<(usize, FacetKind), bool> = HashMap::new();
        let mut exists = |index: usize, kind: FacetKind| -> Result<bool> {
            if let Some(&known) = memo.get(&(index, kind)) {
                return Ok(known);
            }
            let found = self.registry.exists(kind, segments[index])?;
            memo.insert((index, kind), found);
            Ok(found)
        };

        for combo in combinations_for(segments.len()) {
            'assignment: for assignment in combo.iter().copied().permutations(combo.len()) {
                for (index, kind) in assignment.iter().enumerate() {
                    if !exists(index, *kind)? {
                        continue 'assignment;
                    }
                }
                return Ok(Some(assignment));
            }
        }
        Ok(None)
    }
}

fn as_strs<T: AsRef<str>>(segments: &[T]) -> Vec<&str> {
    segments.iter().map(AsRef::as_ref).collect()
}
