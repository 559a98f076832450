//! Query engine: paginated listings with AND-combined field filters and an
//! OR-combined free-text search, plus the cross-kind search fan-out.
//!
//! Every listing orders by `created_at DESC, id DESC` so pages are stable
//! even when several rows share a creation timestamp. Search and filters
//! compose with AND. Matching uses `instr`, which is case-sensitive.

use mycotheca_core::error::CoreError;
use mycotheca_core::search::{
    normalize_search, page_offset, FieldFilter, FilterOp, FilterValue, SearchScope, PAGE_SIZE,
    SEARCH_MAX_RESULTS,
};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

use crate::error::StoreResult;
use crate::models::collection::Collection;
use crate::models::experiment::Experiment;
use crate::models::isolate::Isolate;
use crate::models::listing::{ListParams, Page};
use crate::models::search::SearchResults;
use crate::DbPool;

/// Ordering shared by every listing.
pub(crate) const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// An entity kind that can be listed, filtered and searched.
pub trait Listable: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// Entity name used in error messages.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Comma-separated column list selected into the row struct.
    const COLUMNS: &'static str;
    /// Text columns a search token is matched against (OR-combined).
    const SEARCH_FIELDS: &'static [&'static str];
    /// Columns a caller may filter on.
    const FILTER_FIELDS: &'static [&'static str];
}

impl Listable for Collection {
    const ENTITY: &'static str = "Collection";
    const TABLE: &'static str = "collections";
    const COLUMNS: &'static str = crate::repositories::collection_repo::COLUMNS;
    const SEARCH_FIELDS: &'static [&'static str] =
        &["code", "scientific_name", "common_name", "location"];
    const FILTER_FIELDS: &'static [&'static str] = &[
        "code",
        "scientific_name",
        "common_name",
        "location",
        "substrate",
        "collector",
    ];
}

impl Listable for Isolate {
    const ENTITY: &'static str = "Isolate";
    const TABLE: &'static str = "isolates";
    const COLUMNS: &'static str = crate::repositories::isolate_repo::COLUMNS;
    const SEARCH_FIELDS: &'static [&'static str] = &["code", "culture_medium"];
    const FILTER_FIELDS: &'static [&'static str] = &["code", "collection_id", "culture_medium"];
}

impl Listable for Experiment {
    const ENTITY: &'static str = "Experiment";
    const TABLE: &'static str = "experiments";
    const COLUMNS: &'static str = crate::repositories::experiment_repo::COLUMNS;
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "objective"];
    const FILTER_FIELDS: &'static [&'static str] =
        &["title", "status", "collection_id", "isolate_id"];
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Fetch one page of `T`.
///
/// A page past the last one is returned empty, not as an error.
pub async fn list<T: Listable>(pool: &DbPool, params: &ListParams) -> StoreResult<Page<T>> {
    let page = params.page.max(1);
    let filter = build_filter::<T>(&params.filters, params.search.as_deref())?;

    let count_query = format!("SELECT COUNT(*) FROM {} {}", T::TABLE, filter.where_clause);
    let total: i64 = bind_scalar(sqlx::query_scalar(&count_query), &filter.binds)
        .fetch_one(pool)
        .await?;

    let query = format!(
        "SELECT {} FROM {} {} {NEWEST_FIRST} LIMIT ? OFFSET ?",
        T::COLUMNS,
        T::TABLE,
        filter.where_clause
    );
    let rows = bind_values(sqlx::query_as::<_, T>(&query), &filter.binds)
        .bind(PAGE_SIZE)
        .bind(page_offset(page, PAGE_SIZE))
        .fetch_all(pool)
        .await?;

    Ok(Page::new(rows, page, total))
}

/// Rows of `T` matching `token`, newest first, capped at `limit`.
pub async fn search<T: Listable>(
    pool: &DbPool,
    token: Option<&str>,
    limit: i64,
) -> StoreResult<Vec<T>> {
    let filter = build_filter::<T>(&[], token)?;
    let query = format!(
        "SELECT {} FROM {} {} {NEWEST_FIRST} LIMIT ?",
        T::COLUMNS,
        T::TABLE,
        filter.where_clause
    );
    let rows = bind_values(sqlx::query_as::<_, T>(&query), &filter.binds)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Run one search token against every kind in `scope`.
///
/// Each kind in scope yields its own (possibly empty) list; kinds outside
/// it stay `None`. Without a token every kind returns its newest rows.
pub async fn search_all(
    pool: &DbPool,
    token: Option<&str>,
    scope: SearchScope,
) -> StoreResult<SearchResults> {
    let token = normalize_search(token);
    let mut results = SearchResults::default();

    if scope.includes_collections() {
        results.collections = Some(search::<Collection>(pool, token, SEARCH_MAX_RESULTS).await?);
    }
    if scope.includes_isolates() {
        results.isolates = Some(search::<Isolate>(pool, token, SEARCH_MAX_RESULTS).await?);
    }
    if scope.includes_experiments() {
        results.experiments = Some(search::<Experiment>(pool, token, SEARCH_MAX_RESULTS).await?);
    }

    tracing::debug!(
        token = token.unwrap_or_default(),
        ?scope,
        "Search fan-out complete"
    );
    Ok(results)
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// A WHERE clause (empty, or starting with `WHERE `) and its bind values
/// in placeholder order.
#[derive(Debug, Default)]
struct Filter {
    where_clause: String,
    binds: Vec<FilterValue>,
}

/// Compose filters (AND) and the search token (OR across search fields).
///
/// Column names come only from the kind's whitelists; values are always
/// bound, never spliced into the SQL text.
fn build_filter<T: Listable>(filters: &[FieldFilter], search: Option<&str>) -> Result<Filter, CoreError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<FilterValue> = Vec::new();

    for filter in filters {
        let column = T::FILTER_FIELDS
            .iter()
            .find(|c| **c == filter.field)
            .ok_or_else(|| {
                CoreError::validation(
                    &filter.field,
                    format!("{} cannot be filtered on this field", T::ENTITY),
                )
            })?;
        filter.validate()?;

        conditions.push(match filter.op {
            FilterOp::Equals => format!("{column} = ?"),
            FilterOp::Contains => format!("instr({column}, ?) > 0"),
            FilterOp::Prefix => format!("instr({column}, ?) = 1"),
        });
        binds.push(filter.value.clone());
    }

    if let Some(token) = normalize_search(search) {
        let any_field = T::SEARCH_FIELDS
            .iter()
            .map(|c| format!("instr({c}, ?) > 0"))
            .collect::<Vec<_>>()
            .join(" OR ");
        conditions.push(format!("({any_field})"));
        binds.extend(T::SEARCH_FIELDS.iter().map(|_| FilterValue::Text(token.to_string())));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    Ok(Filter {
        where_clause,
        binds,
    })
}

/// Bind a slice of `FilterValue` to a sqlx `QueryAs`.
fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    binds: &'q [FilterValue],
) -> sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for val in binds {
        match val {
            FilterValue::Integer(v) => q = q.bind(*v),
            FilterValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `FilterValue` to a sqlx `QueryScalar`.
fn bind_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>>,
    binds: &'q [FilterValue],
) -> sqlx::query::QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>> {
    for val in binds {
        match val {
            FilterValue::Integer(v) => q = q.bind(*v),
            FilterValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
