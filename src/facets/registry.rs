//! Dimension registry: cached existence checks and live facet lookups.

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use super::cache::ExistenceCache;
use super::{Facet, FacetKind};
use crate::config::RegistryConfig;
use crate::error::Result;

/// Read access to the facet tables.
///
/// Absence is a normal answer (`Ok(None)` / `Ok(false)`); errors are
/// reserved for the store itself failing.
pub trait FacetStore {
    fn find_facet(&self, kind: FacetKind, slug: &str) -> Result<Option<Facet>>;

    fn facet_exists(&self, kind: FacetKind, slug: &str) -> Result<bool> {
        Ok(self.find_facet(kind, slug)?.is_some())
    }

    /// Facets of one kind ordered by name.
    fn list_facets(&self, kind: FacetKind, limit: usize) -> Result<Vec<Facet>>;
}

impl<T: FacetStore + ?Sized> FacetStore for &T {
    fn find_facet(&self, kind: FacetKind, slug: &str) -> Result<Option<Facet>> {
        (**self).find_facet(kind, slug)
    }

    fn facet_exists(&self, kind: FacetKind, slug: &str) -> Result<bool> {
        (**self).facet_exists(kind, slug)
    }

    fn list_facets(&self, kind: FacetKind, limit: usize) -> Result<Vec<Facet>> {
        (**self).list_facets(kind, limit)
    }
}

impl<T: FacetStore + ?Sized> FacetStore for Arc<T> {
    fn find_facet(&self, kind: FacetKind, slug: &str) -> Result<Option<Facet>> {
        (**self).find_facet(kind, slug)
    }

    fn facet_exists(&self, kind: FacetKind, slug: &str) -> Result<bool> {
        (**self).facet_exists(kind, slug)
    }

    fn list_facets(&self, kind: FacetKind, limit: usize) -> Result<Vec<Facet>> {
        (**self).list_facets(kind, limit)
    }
}

/// Facet lookups with a read-through existence cache.
pub struct DimensionRegistry<S> {
    store: S,
    cache: Option<ExistenceCache>,
}

impl<S: FacetStore> DimensionRegistry<S> {
    /// Registry with the default one-hour existence cache.
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: Some(ExistenceCache::default()),
        }
    }

    pub fn from_config(store: S, config: &RegistryConfig) -> Self {
        let cache = config.cache_enabled.then(|| {
            ExistenceCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_seconds),
            )
        });
        Self { store, cache }
    }

    /// Registry that always asks the store.
    pub fn uncached(store: S) -> Self {
        Self { store, cache: None }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn cache(&self) -> Option<&ExistenceCache> {
        self.cache.as_ref()
    }

    /// Whether a facet of `kind` with `slug` exists. Cached.
    pub fn exists(&self, kind: FacetKind, slug: &str) -> Result<bool> {
        if let Some(cache) = &self.cache {
            if let Some(exists) = cache.get(kind, slug) {
                return Ok(exists);
            }
        }
        let exists = self.store.facet_exists(kind, slug)?;
        trace!(target: "registry", %kind, slug, exists, "existence check");
        if let Some(cache) = &self.cache {
            cache.put(kind, slug, exists);
        }
        Ok(exists)
    }

    /// Live lookup of a facet. Never cached.
    pub fn find(&self, kind: FacetKind, slug: &str) -> Result<Option<Facet>> {
        self.store.find_facet(kind, slug)
    }

    /// Which kind, if any, owns `slug`.
    pub fn kind_of(&self, slug: &str) -> Result<Option<FacetKind>> {
        for kind in FacetKind::ALL {
            if self.exists(kind, slug)? {
                return Ok(Some(kind));
            }
        }
        Ok(None)
    }

    pub fn list(&self, kind: FacetKind, limit: usize) -> Result<Vec<Facet>> {
        self.store.list_facets(kind, limit)
    }
}
