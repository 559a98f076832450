use axum::routing::get;
use axum::Router;

use crate::handlers::subculture;
use crate::state::AppState;

/// Routes mounted at `/subcultures`. Creation lives under `/isolates/{id}`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(subculture::get_by_id)
            .put(subculture::update)
            .delete(subculture::delete),
    )
}
