//! Facet table reads.

use rusqlite::{OptionalExtension, Row, params};

use crate::error::Result;
use crate::facets::{Facet, FacetKind, FacetStore};
use crate::storage::Database;

/// Only tools carry a category column.
const fn category_column(kind: FacetKind) -> &'static str {
    match kind {
        FacetKind::Tool => "category",
        FacetKind::Skill | FacetKind::Location | FacetKind::ServiceType => "NULL",
    }
}

fn facet_from_row(kind: FacetKind, row: &Row<'_>) -> rusqlite::Result<Facet> {
    Ok(Facet {
        id: row.get(0)?,
        kind,
        name: row.get(1)?,
        slug: row.get(2)?,
        category: row.get(3)?,
    })
}

impl FacetStore for Database {
    fn find_facet(&self, kind: FacetKind, slug: &str) -> Result<Option<Facet>> {
        let sql = format!(
            "SELECT id, name, slug, {} FROM {} WHERE slug = ?1",
            category_column(kind),
            kind.table()
        );
        let facet = self
            .conn()
            .prepare_cached(&sql)?
            .query_row([slug], |row| facet_from_row(kind, row))
            .optional()?;
        Ok(facet)
    }

    fn facet_exists(&self, kind: FacetKind, slug: &str) -> Result<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE slug = ?1)", kind.table());
        let exists: bool = self
            .conn()
            .prepare_cached(&sql)?
            .query_row([slug], |row| row.get(0))?;
        Ok(exists)
    }

    fn list_facets(&self, kind: FacetKind, limit: usize) -> Result<Vec<Facet>> {
        let sql = format!(
            "SELECT id, name, slug, {} FROM {} ORDER BY name ASC, id ASC LIMIT ?1",
            category_column(kind),
            kind.table()
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn().prepare_cached(&sql)?;
        let facets = stmt
            .query_map(params![limit], |row| facet_from_row(kind, row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(facets)
    }
}

impl Database {
    /// Id of the facet with `slug`, if it exists.
    pub fn facet_id(&self, kind: FacetKind, slug: &str) -> Result<Option<i64>> {
        Ok(self.find_facet(kind, slug)?.map(|facet| facet.id))
    }

    /// Every kind that currently owns `slug`. Normally zero or one.
    pub fn facet_kinds_for_slug(&self, slug: &str) -> Result<Vec<FacetKind>> {
        let mut kinds = Vec::new();
        for kind in FacetKind::ALL {
            if self.facet_exists(kind, slug)? {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}
