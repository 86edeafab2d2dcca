//! hm - HeyMarketers search core
//!
//! Faceted, paginated search over job listings and marketer profiles, the
//! slug-path resolver behind programmatic SEO landing pages, and the
//! metadata those pages render.

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod facets;
pub mod model;
pub mod routing;
pub mod search;
pub mod seo;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{HmError, Result};
