//! Free-text term handling.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static punctuation pattern"));

/// Replace punctuation with spaces, trim, and collapse whitespace runs.
#[must_use]
pub fn sanitize_term(raw: &str) -> String {
    let spaced = NON_WORD.replace_all(raw, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A sanitized, non-empty free-text term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextQuery {
    term: String,
}

impl TextQuery {
    /// `None` when nothing searchable survives sanitizing.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let term = sanitize_term(raw);
        (!term.is_empty()).then_some(Self { term })
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.term.split(' ')
    }

    /// FTS5 MATCH expression requiring every token.
    ///
    /// Each token is quoted so words like `AND` or `NEAR` are matched
    /// literally rather than parsed as operators.
    #[must_use]
    pub fn match_expression(&self) -> String {
        self.tokens()
            .map(|token| format!("\"{token}\""))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
