use axum::routing::get;
use axum::Router;

use crate::handlers::experiment;
use crate::state::AppState;

/// Routes mounted at `/experiments`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(experiment::list).post(experiment::create))
        .route(
            "/{id}",
            get(experiment::get_by_id)
                .put(experiment::update)
                .delete(experiment::delete),
        )
}
