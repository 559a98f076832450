//! Handlers for the `/images` resource.

use axum::extract::{Path, State};
use axum::Json;
use mycotheca_core::types::DbId;
use mycotheca_db::models::image::Image;
use mycotheca_db::repositories::ImageRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// DELETE /api/v1/images/{id}
///
/// Returns the deleted row. The stored bytes are removed as well.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Image>>> {
    let data = ImageRepo::delete(&state.pool, state.store.as_ref(), id).await?;
    Ok(Json(DataResponse { data }))
}
