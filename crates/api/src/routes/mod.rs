pub mod collection;
pub mod experiment;
pub mod health;
pub mod isolate;
pub mod subculture;

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard                                       totals and recent rows
///
/// /collections                                     list, create (multipart)
/// /collections/summary                             flat projection
/// /collections/{id}                                get, update (multipart), delete (cascade)
/// /collections/{id}/images                         images of a collection
///
/// /images/{id}                                     delete
///
/// /isolates                                        list, create
/// /isolates/summary                                flat projection
/// /isolates/{id}                                   get, update, delete (cascade)
/// /isolates/{id}/subcultures                       list, create
///
/// /subcultures/{id}                                get, update, delete
///
/// /experiments                                     list, create
/// /experiments/{id}                                get, update, delete
///
/// /search                                          fan-out search (?q, ?kind)
///
/// /uploads/{filename}                              stored image bytes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard::stats))
        .nest("/collections", collection::router())
        .route("/images/{id}", delete(handlers::image::delete))
        .nest("/isolates", isolate::router())
        .nest("/subcultures", subculture::router())
        .nest("/experiments", experiment::router())
        .route("/search", get(handlers::search::search))
        .route("/uploads/{filename}", get(handlers::uploads::serve))
}
