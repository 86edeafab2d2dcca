//! Error types for hm

use thiserror::Error;

use crate::facets::FacetKind;

/// Who already owns a slug that a write tried to claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugOwner {
    Facet(FacetKind),
    Profile,
    Reserved,
}

impl std::fmt::Display for SlugOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Facet(kind) => write!(f, "{}", kind.label()),
            Self::Profile => f.write_str("marketer profile"),
            Self::Reserved => f.write_str("reserved path"),
        }
    }
}

#[derive(Error, Debug)]
pub enum HmError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("slug '{slug}' is already used by a {owner}")]
    SlugConflict { slug: String, owner: SlugOwner },

    #[error("not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for HmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HmError>;
