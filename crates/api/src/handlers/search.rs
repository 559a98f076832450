use axum::extract::{Query, State};
use axum::Json;
use mycotheca_core::search::SearchScope;
use mycotheca_db::models::search::SearchResults;
use mycotheca_db::query::search_all;

use crate::error::AppResult;
use crate::query::SearchQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/search?q=&kind=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<SearchResults>>> {
    let scope = SearchScope::parse(params.kind.as_deref())?;
    let data = search_all(&state.pool, params.q.as_deref(), scope).await?;
    Ok(Json(DataResponse { data }))
}
