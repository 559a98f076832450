//! Listing request and page envelope.

use mycotheca_core::search::{clamp_page, total_pages, FieldFilter, PAGE_SIZE};
use serde::Serialize;

/// What a caller asks of a paginated listing.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// 1-based page number. Values below 1 are clamped.
    pub page: i64,
    /// Predicates combined with AND.
    pub filters: Vec<FieldFilter>,
    /// Free-text token matched against the kind's search fields.
    pub search: Option<String>,
}

impl ListParams {
    pub fn page(page: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, page: i64, total_count: i64) -> Self {
        let total_pages = total_pages(total_count, PAGE_SIZE);
        Self {
            data,
            page,
            per_page: PAGE_SIZE,
            total_count,
            total_pages,
            has_next: page < total_pages,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
