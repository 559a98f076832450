//! Handlers for the `/experiments` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mycotheca_core::types::DbId;
use mycotheca_db::models::experiment::{CreateExperiment, Experiment, UpdateExperiment};
use mycotheca_db::models::listing::Page;
use mycotheca_db::repositories::ExperimentRepo;

use crate::error::AppResult;
use crate::form::json_fields;
use crate::query::ExperimentListQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/experiments
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Experiment>>)> {
    let input = CreateExperiment::from_form(&json_fields(&body)?)?;
    let experiment = ExperimentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: experiment })))
}

/// GET /api/v1/experiments
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ExperimentListQuery>,
) -> AppResult<Json<Page<Experiment>>> {
    let page = ExperimentRepo::list(&state.pool, &params.into_params()).await?;
    Ok(Json(page))
}

/// GET /api/v1/experiments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Experiment>>> {
    let data = ExperimentRepo::get(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/experiments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<Experiment>>> {
    let input = UpdateExperiment::from_form(&json_fields(&body)?)?;
    let data = ExperimentRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/experiments/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    ExperimentRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
