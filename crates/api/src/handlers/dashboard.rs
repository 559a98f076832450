use axum::extract::State;
use axum::Json;
use mycotheca_db::models::dashboard::DashboardStats;
use mycotheca_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let data = DashboardRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}
