//! Handlers for the `/isolates` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mycotheca_core::types::DbId;
use mycotheca_db::cascade::CascadeReport;
use mycotheca_db::models::isolate::{
    CreateIsolate, Isolate, IsolateDetail, IsolateSummary, UpdateIsolate,
};
use mycotheca_db::models::listing::Page;
use mycotheca_db::repositories::IsolateRepo;

use crate::error::AppResult;
use crate::form::json_fields;
use crate::query::IsolateListQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/isolates
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Isolate>>)> {
    let input = CreateIsolate::from_form(&json_fields(&body)?)?;
    let isolate = IsolateRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: isolate })))
}

/// GET /api/v1/isolates
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IsolateListQuery>,
) -> AppResult<Json<Page<Isolate>>> {
    let page = IsolateRepo::list(&state.pool, &params.into_params()).await?;
    Ok(Json(page))
}

/// GET /api/v1/isolates/summary
pub async fn summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<IsolateSummary>>>> {
    let data = IsolateRepo::summaries(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/isolates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<IsolateDetail>>> {
    let data = IsolateRepo::get_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/isolates/{id}
///
/// `collection_id` is not accepted here; an isolate never changes parent.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<Isolate>>> {
    let input = UpdateIsolate::from_form(&json_fields(&body)?)?;
    let data = IsolateRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/isolates/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeReport>>> {
    let data = IsolateRepo::delete(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}
