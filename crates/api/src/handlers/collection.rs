//! Handlers for the `/collections` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mycotheca_core::types::DbId;
use mycotheca_db::cascade::CascadeReport;
use mycotheca_db::models::collection::{
    Collection, CollectionDetail, CollectionSummary, CreateCollection, UpdateCollection,
};
use mycotheca_db::models::image::Image;
use mycotheca_db::models::listing::Page;
use mycotheca_db::repositories::{CollectionRepo, ImageRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::form::read_collection_form;
use crate::query::CollectionListQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// A collection together with the images created by the same request.
#[derive(Debug, Serialize)]
pub struct CollectionWithImages {
    #[serde(flatten)]
    pub collection: Collection,
    pub images: Vec<Image>,
}

/// POST /api/v1/collections
///
/// Multipart form: collection text fields, any number of `images` file
/// parts and one optional `image_description`.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CollectionWithImages>>)> {
    let (fields, batch) = read_collection_form(multipart).await?;
    let input = CreateCollection::from_form(&fields)?;

    let (collection, images) =
        CollectionRepo::create_with_images(&state.pool, state.store.as_ref(), &input, &batch)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CollectionWithImages { collection, images },
        }),
    ))
}

/// GET /api/v1/collections
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CollectionListQuery>,
) -> AppResult<Json<Page<Collection>>> {
    let page = CollectionRepo::list(&state.pool, &params.into_params()).await?;
    Ok(Json(page))
}

/// GET /api/v1/collections/summary
pub async fn summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CollectionSummary>>>> {
    let data = CollectionRepo::summaries(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/collections/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CollectionDetail>>> {
    let data = CollectionRepo::get_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/collections/{id}
///
/// Same multipart shape as create. Only supplied text fields change; new
/// files are added next to the existing images.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<CollectionWithImages>>> {
    let (fields, batch) = read_collection_form(multipart).await?;
    let input = UpdateCollection::from_form(&fields)?;

    let (collection, images) =
        CollectionRepo::update_with_images(&state.pool, state.store.as_ref(), id, &input, &batch)
            .await?;

    Ok(Json(DataResponse {
        data: CollectionWithImages { collection, images },
    }))
}

/// DELETE /api/v1/collections/{id}
///
/// Removes the collection with its images, isolates, subcultures and every
/// experiment linked to it or to one of its isolates.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CascadeReport>>> {
    let data = CollectionRepo::delete(&state.pool, state.store.as_ref(), id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/collections/{id}/images
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Image>>>> {
    CollectionRepo::get(&state.pool, id).await?;
    let data = ImageRepo::list_by_collection(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}
