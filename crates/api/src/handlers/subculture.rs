//! Handlers for subcultures, both isolate-scoped and by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mycotheca_core::types::DbId;
use mycotheca_db::models::subculture::{CreateSubculture, Subculture, UpdateSubculture};
use mycotheca_db::repositories::{IsolateRepo, SubcultureRepo};

use crate::error::AppResult;
use crate::form::json_fields;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/isolates/{isolate_id}/subcultures
pub async fn create(
    State(state): State<AppState>,
    Path(isolate_id): Path<DbId>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Subculture>>)> {
    let input = CreateSubculture::from_form(isolate_id, &json_fields(&body)?)?;
    let subculture = SubcultureRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: subculture })))
}

/// GET /api/v1/isolates/{isolate_id}/subcultures
pub async fn list_by_isolate(
    State(state): State<AppState>,
    Path(isolate_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Subculture>>>> {
    IsolateRepo::get(&state.pool, isolate_id).await?;
    let data = SubcultureRepo::list_by_isolate(&state.pool, isolate_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/subcultures/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subculture>>> {
    let data = SubcultureRepo::get(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/subcultures/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<Subculture>>> {
    let input = UpdateSubculture::from_form(&json_fields(&body)?)?;
    let data = SubcultureRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/subcultures/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    SubcultureRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
