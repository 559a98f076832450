//! Listing, filtering and search vocabulary.
//!
//! This module lives in `core` (no database dependency) so the repository
//! layer and the HTTP layer share one definition of pages, filter
//! predicates and search scopes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Fixed page size for every listing.
pub const PAGE_SIZE: i64 = 20;

/// Per-kind cap on rows returned by a fan-out search.
pub const SEARCH_MAX_RESULTS: i64 = 100;

/// Clamp a user-provided 1-based page number. Missing or `< 1` becomes 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset of a 1-based page.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page)
}

/// Number of pages needed to show `total` rows. Zero rows means zero pages.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        0
    } else {
        (total + per_page - 1) / per_page
    }
}

// ---------------------------------------------------------------------------
// Search token
// ---------------------------------------------------------------------------

/// Normalize a free-text search token.
///
/// Missing and empty tokens disable search entirely. Any other token,
/// whitespace included, is returned untouched: matching is case-sensitive
/// substring containment.
///
/// ```
/// use mycotheca_core::search::normalize_search;
/// assert_eq!(normalize_search(Some("Pleurotus")), Some("Pleurotus"));
/// assert_eq!(normalize_search(Some(" ")), Some(" "));
/// assert_eq!(normalize_search(Some("")), None);
/// assert_eq!(normalize_search(None), None);
/// ```
pub fn normalize_search(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// How a filter value is compared against a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Equals,
    Contains,
    Prefix,
}

/// A typed filter operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

/// One predicate on a named field. Predicates combine with logical AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl FieldFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Equals,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Contains,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Prefix,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn equals_id(field: impl Into<String>, id: DbId) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Equals,
            value: FilterValue::Integer(id),
        }
    }

    /// Reject operators that make no sense for the operand type.
    pub fn validate(&self) -> Result<(), CoreError> {
        match (&self.value, self.op) {
            (FilterValue::Integer(_), FilterOp::Contains | FilterOp::Prefix) => Err(
                CoreError::validation(&self.field, "integer filters only support equality"),
            ),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Search scope
// ---------------------------------------------------------------------------

/// Which entity kinds a fan-out search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    All,
    Collections,
    Isolates,
    Experiments,
}

impl SearchScope {
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(Self::All),
            Some("collections") => Ok(Self::Collections),
            Some("isolates") => Ok(Self::Isolates),
            Some("experiments") => Ok(Self::Experiments),
            Some(other) => Err(CoreError::validation(
                "kind",
                format!("unknown kind '{other}' (expected all, collections, isolates or experiments)"),
            )),
        }
    }

    pub fn includes_collections(self) -> bool {
        matches!(self, Self::All | Self::Collections)
    }

    pub fn includes_isolates(self) -> bool {
        matches!(self, Self::All | Self::Isolates)
    }

    pub fn includes_experiments(self) -> bool {
        matches!(self, Self::All | Self::Experiments)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- pagination ----------------------------------------------------------

    #[test]
    fn page_defaults_and_clamps_to_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(4)), 4);
    }

    #[test]
    fn offsets_are_one_based() {
        assert_eq!(page_offset(1, PAGE_SIZE), 0);
        assert_eq!(page_offset(2, PAGE_SIZE), 20);
        assert_eq!(page_offset(3, PAGE_SIZE), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(45, 20), 3);
    }

    // -- search token --------------------------------------------------------

    #[test]
    fn search_token_is_not_trimmed_or_lowercased() {
        assert_eq!(normalize_search(Some(" Pleu")), Some(" Pleu"));
        assert_eq!(normalize_search(Some("   ")), Some("   "));
        assert_eq!(normalize_search(Some("")), None);
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn integer_contains_is_rejected() {
        let mut f = FieldFilter::equals_id("collection_id", 3);
        assert!(f.validate().is_ok());
        f.op = FilterOp::Contains;
        assert!(f.validate().is_err());
    }

    // -- scope ---------------------------------------------------------------

    #[test]
    fn scope_parses_known_kinds() {
        assert_eq!(SearchScope::parse(None).unwrap(), SearchScope::All);
        assert_eq!(
            SearchScope::parse(Some("isolates")).unwrap(),
            SearchScope::Isolates
        );
        assert!(SearchScope::parse(Some("subcultures")).is_err());
    }

    #[test]
    fn all_scope_includes_every_kind() {
        let s = SearchScope::All;
        assert!(s.includes_collections() && s.includes_isolates() && s.includes_experiments());
        let s = SearchScope::Experiments;
        assert!(!s.includes_collections() && s.includes_experiments());
    }
}
