//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

pub mod check_slug;
pub mod init;
pub mod jobs;
pub mod marketers;
pub mod resolve;
pub mod seed;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::{HmError, Result};
use crate::facets::{DimensionRegistry, FacetKind, FacetStore};

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Seed(args) => seed::run(ctx, args),
        Commands::Jobs(args) => jobs::run(ctx, args),
        Commands::Marketers(args) => marketers::run(ctx, args),
        Commands::Resolve(args) => resolve::run(ctx, args),
        Commands::CheckSlug(args) => check_slug::run(ctx, args),
    }
}

/// Facet ids for slugs given on the command line. Unknown slugs are errors
/// rather than silently dropped filters.
pub(crate) fn facet_ids<S: FacetStore>(
    registry: &DimensionRegistry<S>,
    kind: FacetKind,
    slugs: &[String],
) -> Result<Vec<i64>> {
    slugs
        .iter()
        .map(|slug| {
            registry
                .find(kind, slug)?
                .map(|facet| facet.id)
                .ok_or_else(|| HmError::NotFound(format!("{} '{slug}'", kind.label())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::MemoryFacetStore;

    #[test]
    fn test_facet_ids_resolve_slugs() {
        let registry = DimensionRegistry::new(MemoryFacetStore::standard());
        let ids = facet_ids(
            &registry,
            FacetKind::Location,
            &["remote".to_string(), "london".to_string()],
        )
        .unwrap();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_facet_ids_unknown_slug() {
        let registry = DimensionRegistry::new(MemoryFacetStore::standard());
        let err = facet_ids(&registry, FacetKind::Skill, &["remote".to_string()]).unwrap_err();
        assert!(matches!(err, HmError::NotFound(_)));
    }
}
