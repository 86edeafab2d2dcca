//! Top-level URL namespace: SEO landing-page resolution, reserved system
//! routes and marketer profile slugs.

pub mod profile_slug;
pub mod reserved;
pub mod resolver;

pub use profile_slug::{ProfileSlugPolicy, ProfileSlugStore, SlugAvailability};
pub use reserved::ReservedPaths;
pub use resolver::{
    COMBINATIONS, InvalidPath, MAX_SEGMENTS, ResolvedDimensionSet, SlugResolution, SlugResolver,
};
