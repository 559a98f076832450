//! Query string types for list and search endpoints.
//!
//! Each listing query turns into a `ListParams`: `page` and `search` map
//! directly, the remaining keys become field filters.

use mycotheca_core::search::FieldFilter;
use mycotheca_core::types::DbId;
use mycotheca_db::models::listing::ListParams;
use serde::Deserialize;

/// `GET /collections?page&search&substrate&collector`
#[derive(Debug, Default, Deserialize)]
pub struct CollectionListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
    /// Exact match.
    pub substrate: Option<String>,
    /// Substring match.
    pub collector: Option<String>,
}

impl CollectionListQuery {
    pub fn into_params(self) -> ListParams {
        let mut params = ListParams::page(self.page).with_search(self.search);
        if let Some(substrate) = non_blank(self.substrate) {
            params = params.with_filter(FieldFilter::equals("substrate", substrate));
        }
        if let Some(collector) = non_blank(self.collector) {
            params = params.with_filter(FieldFilter::contains("collector", collector));
        }
        params
    }
}

/// `GET /isolates?page&search&collection_id&culture_medium`
#[derive(Debug, Default, Deserialize)]
pub struct IsolateListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
    pub collection_id: Option<DbId>,
    pub culture_medium: Option<String>,
}

impl IsolateListQuery {
    pub fn into_params(self) -> ListParams {
        let mut params = ListParams::page(self.page).with_search(self.search);
        if let Some(id) = self.collection_id {
            params = params.with_filter(FieldFilter::equals_id("collection_id", id));
        }
        if let Some(medium) = non_blank(self.culture_medium) {
            params = params.with_filter(FieldFilter::equals("culture_medium", medium));
        }
        params
    }
}

/// `GET /experiments?page&search&status&collection_id&isolate_id`
#[derive(Debug, Default, Deserialize)]
pub struct ExperimentListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub collection_id: Option<DbId>,
    pub isolate_id: Option<DbId>,
}

impl ExperimentListQuery {
    pub fn into_params(self) -> ListParams {
        let mut params = ListParams::page(self.page).with_search(self.search);
        if let Some(status) = non_blank(self.status) {
            params = params.with_filter(FieldFilter::equals("status", status));
        }
        if let Some(id) = self.collection_id {
            params = params.with_filter(FieldFilter::equals_id("collection_id", id));
        }
        if let Some(id) = self.isolate_id {
            params = params.with_filter(FieldFilter::equals_id("isolate_id", id));
        }
        params
    }
}

/// `GET /search?q&kind`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub kind: Option<String>,
}

/// Empty query values (`?substrate=`) mean "no filter".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        let params = CollectionListQuery {
            page: Some(2),
            search: None,
            substrate: Some(String::new()),
            collector: Some("Silva".into()),
        }
        .into_params();

        assert_eq!(params.page, 2);
        assert_eq!(params.filters, vec![FieldFilter::contains("collector", "Silva")]);
    }

    #[test]
    fn ids_become_integer_filters() {
        let params = ExperimentListQuery {
            isolate_id: Some(4),
            ..Default::default()
        }
        .into_params();
        assert_eq!(params.filters, vec![FieldFilter::equals_id("isolate_id", 4)]);
        assert_eq!(params.page, 1);
    }
}
