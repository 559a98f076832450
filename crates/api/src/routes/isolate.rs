use axum::routing::get;
use axum::Router;

use crate::handlers::{isolate, subculture};
use crate::state::AppState;

/// Routes mounted at `/isolates`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /summary               -> summary
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// GET    /{id}/subcultures      -> subculture::list_by_isolate
/// POST   /{id}/subcultures      -> subculture::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(isolate::list).post(isolate::create))
        .route("/summary", get(isolate::summary))
        .route(
            "/{id}",
            get(isolate::get_by_id)
                .put(isolate::update)
                .delete(isolate::delete),
        )
        .route(
            "/{id}/subcultures",
            get(subculture::list_by_isolate).post(subculture::create),
        )
}
