//! Reserved top-level path segments.

use std::collections::HashSet;

use crate::config::{DEFAULT_RESERVED_PATHS, RoutingConfig};

/// Immutable set of system route segments, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedPaths {
    paths: HashSet<String>,
}

impl Default for ReservedPaths {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_PATHS.iter().copied())
    }
}

impl ReservedPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.reserved_paths.iter().cloned())
    }

    #[must_use]
    pub fn contains(&self, segment: &str) -> bool {
        self.paths.contains(segment)
    }

    /// First reserved segment in `segments`, if any.
    pub fn first_reserved<'a, S: AsRef<str>>(&self, segments: &'a [S]) -> Option<&'a str> {
        segments
            .iter()
            .map(AsRef::as_ref)
            .find(|segment| self.contains(segment))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
