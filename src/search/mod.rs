//! Faceted search over job listings and marketer profiles.
//!
//! Searching is two steps: a pure planning function turns loosely typed
//! request parameters into an immutable query spec, and a collection
//! executes that spec once, returning one page plus the filtered total.

pub mod jobs;
pub mod marketers;
pub mod paging;
pub mod text;

use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::model::{JobListing, MarketerProfile};

pub use jobs::{
    JobFilter, JobOrder, JobQuerySpec, JobSearchParams, JobSort, RecencyWindow, plan_job_search,
};
pub use marketers::{
    MarketerFilter, MarketerOrder, MarketerQuerySpec, MarketerSearchParams, MarketerSort,
    plan_marketer_search,
};
pub use paging::{PageWindow, total_pages};
pub use text::{TextQuery, sanitize_term};

/// One page of results. `total_count` counts the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> SearchPage<T> {
    #[must_use]
    pub const fn empty(window: PageWindow) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page: window.page,
            per_page: window.per_page,
        }
    }

    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        total_pages(self.total_count, self.per_page)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchPage<U> {
        SearchPage {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Storage that can execute a job plan.
pub trait JobCollection {
    fn query_jobs(&self, spec: &JobQuerySpec) -> Result<SearchPage<JobListing>>;
}

/// Storage that can execute a marketer plan.
pub trait MarketerCollection {
    fn query_marketers(&self, spec: &MarketerQuerySpec) -> Result<SearchPage<MarketerProfile>>;
}

impl<T: JobCollection + ?Sized> JobCollection for &T {
    fn query_jobs(&self, spec: &JobQuerySpec) -> Result<SearchPage<JobListing>> {
        (**self).query_jobs(spec)
    }
}

impl<T: MarketerCollection + ?Sized> MarketerCollection for &T {
    fn query_marketers(&self, spec: &MarketerQuerySpec) -> Result<SearchPage<MarketerProfile>> {
        (**self).query_marketers(spec)
    }
}

/// Search active job listings.
pub fn search_jobs<C: JobCollection + ?Sized>(
    collection: &C,
    params: &JobSearchParams,
    settings: &SearchConfig,
    clock: &dyn Clock,
) -> Result<SearchPage<JobListing>> {
    let spec = plan_job_search(params, settings, clock.now());
    debug!(
        target: "search",
        filters = spec.filters.len(),
        text = spec.text.as_ref().map(TextQuery::term),
        order = ?spec.order,
        page = spec.window.page,
        per_page = spec.window.per_page,
        "job search planned"
    );
    let page = collection.query_jobs(&spec)?;
    debug!(target: "search", total = page.total_count, returned = page.items.len(), "job search done");
    Ok(page)
}

/// Search marketer profiles.
pub fn search_marketers<C: MarketerCollection + ?Sized>(
    collection: &C,
    params: &MarketerSearchParams,
    settings: &SearchConfig,
) -> Result<SearchPage<MarketerProfile>> {
    let spec = plan_marketer_search(params, settings);
    debug!(
        target: "search",
        filters = spec.filters.len(),
        text = spec.text.as_ref().map(TextQuery::term),
        order = ?spec.order,
        page = spec.window.page,
        per_page = spec.window.per_page,
        "marketer search planned"
    );
    let page = collection.query_marketers(&spec)?;
    debug!(target: "search", total = page.total_count, returned = page.items.len(), "marketer search done");
    Ok(page)
}
