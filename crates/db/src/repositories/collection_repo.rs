//! Repository for the `collections` table.
//!
//! Collections are the root of the ownership graph. Create and update can
//! carry an upload batch, which becomes image rows inside the same
//! transaction; delete runs the full cascade.

use chrono::Utc;
use mycotheca_core::error::CoreError;
use mycotheca_core::types::{DbId, Timestamp};
use mycotheca_core::uploads::{ContentStore, UploadBatch};
use sqlx::SqliteConnection;

use crate::cascade::{self, CascadeReport};
use crate::error::{map_unique_code, StoreResult};
use crate::models::collection::{
    Collection, CollectionDetail, CollectionSummary, CreateCollection, UpdateCollection,
};
use crate::models::image::Image;
use crate::models::listing::{ListParams, Page};
use crate::query::{self, NEWEST_FIRST};
use crate::repositories::{
    ensure_code_free, ensure_present, ExperimentRepo, ImageRepo, IsolateRepo,
};
use crate::uploads::{attach_images, discard_files};
use crate::DbPool;

/// Column list for the `collections` table.
pub(crate) const COLUMNS: &str = "id, code, scientific_name, common_name, collection_date, \
    location, coordinates, substrate, collector, notes, created_at";

const ENTITY: &str = "Collection";

/// Provides CRUD operations for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection without images.
    pub async fn create(pool: &DbPool, input: &CreateCollection) -> StoreResult<Collection> {
        let mut tx = pool.begin().await?;
        let collection = Self::insert(&mut tx, input, Utc::now()).await?;
        tx.commit().await?;

        tracing::info!(collection_id = collection.id, code = %collection.code, "Collection created");
        Ok(collection)
    }

    /// Insert a new collection and attach every selected file of `batch`.
    ///
    /// Either the collection and all its images are committed, or nothing
    /// is and no file written for the batch is left in `store`.
    pub async fn create_with_images(
        pool: &DbPool,
        store: &dyn ContentStore,
        input: &CreateCollection,
        batch: &UploadBatch,
    ) -> StoreResult<(Collection, Vec<Image>)> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let collection = Self::insert(&mut tx, input, now).await?;
        let images = attach_images(&mut tx, store, collection.id, batch, now).await?;
        commit_or_discard(tx, store, &images).await?;

        tracing::info!(
            collection_id = collection.id,
            code = %collection.code,
            images = images.len(),
            "Collection created"
        );
        Ok((collection, images))
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> StoreResult<Option<Collection>> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = ?");
        let collection = sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(collection)
    }

    /// Like [`Self::find_by_id`], but an unknown id is a `NotFound` error.
    pub async fn get(pool: &DbPool, id: DbId) -> StoreResult<Collection> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: ENTITY, id }.into())
    }

    /// A collection with its images, isolates and linked experiments.
    pub async fn get_detail(pool: &DbPool, id: DbId) -> StoreResult<CollectionDetail> {
        let collection = Self::get(pool, id).await?;
        let images = ImageRepo::list_by_collection(pool, id).await?;
        let isolates = IsolateRepo::list_by_collection(pool, id).await?;
        let experiments = ExperimentRepo::list_by_collection(pool, id).await?;

        Ok(CollectionDetail {
            collection,
            images,
            isolates,
            experiments,
        })
    }

    /// Apply the supplied fields. Unsupplied fields keep their values.
    pub async fn update(pool: &DbPool, id: DbId, input: &UpdateCollection) -> StoreResult<Collection> {
        let mut tx = pool.begin().await?;
        let collection = Self::update_in(&mut tx, id, input).await?;
        tx.commit().await?;

        tracing::info!(collection_id = id, "Collection updated");
        Ok(collection)
    }

    /// Apply the supplied fields and attach new images from `batch`, all in
    /// one transaction. Existing images are kept.
    pub async fn update_with_images(
        pool: &DbPool,
        store: &dyn ContentStore,
        id: DbId,
        input: &UpdateCollection,
        batch: &UploadBatch,
    ) -> StoreResult<(Collection, Vec<Image>)> {
        let mut tx = pool.begin().await?;

        let collection = Self::update_in(&mut tx, id, input).await?;
        let images = attach_images(&mut tx, store, id, batch, Utc::now()).await?;
        commit_or_discard(tx, store, &images).await?;

        tracing::info!(collection_id = id, images = images.len(), "Collection updated");
        Ok((collection, images))
    }

    /// Delete a collection and everything that depends on it.
    ///
    /// Stored image bytes are removed after the commit.
    pub async fn delete(
        pool: &DbPool,
        store: &dyn ContentStore,
        id: DbId,
    ) -> StoreResult<CascadeReport> {
        let mut tx = pool.begin().await?;
        let report = cascade::delete_collection(&mut tx, id).await?;
        tx.commit().await?;

        discard_files(store, &report.removed_files).await;
        tracing::info!(
            collection_id = id,
            images = report.images,
            isolates = report.isolates,
            subcultures = report.subcultures,
            experiments = report.experiments,
            "Collection deleted"
        );
        Ok(report)
    }

    /// One page of collections, newest first, filtered and searched.
    pub async fn list(pool: &DbPool, params: &ListParams) -> StoreResult<Page<Collection>> {
        query::list::<Collection>(pool, params).await
    }

    /// Flat projection of every collection, newest first.
    pub async fn summaries(pool: &DbPool) -> StoreResult<Vec<CollectionSummary>> {
        let query = format!(
            "SELECT id, code, scientific_name, common_name, collection_date, location \
             FROM collections {NEWEST_FIRST}"
        );
        let rows = sqlx::query_as::<_, CollectionSummary>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Most recently created collections.
    pub async fn recent(pool: &DbPool, limit: i64) -> StoreResult<Vec<Collection>> {
        let query = format!("SELECT {COLUMNS} FROM collections {NEWEST_FIRST} LIMIT ?");
        let rows = sqlx::query_as::<_, Collection>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(pool: &DbPool) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM collections")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers
    // -----------------------------------------------------------------------

    async fn insert(
        conn: &mut SqliteConnection,
        input: &CreateCollection,
        now: Timestamp,
    ) -> StoreResult<Collection> {
        ensure_present("code", &input.code)?;
        ensure_code_free(conn, "collections", ENTITY, &input.code, None).await?;

        let query = format!(
            "INSERT INTO collections \
                (code, scientific_name, common_name, collection_date, location, \
                 coordinates, substrate, collector, notes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(&input.code)
            .bind(&input.scientific_name)
            .bind(&input.common_name)
            .bind(input.collection_date)
            .bind(&input.location)
            .bind(&input.coordinates)
            .bind(&input.substrate)
            .bind(&input.collector)
            .bind(&input.notes)
            .bind(now)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| map_unique_code(e, ENTITY, &input.code))
    }

    async fn update_in(
        conn: &mut SqliteConnection,
        id: DbId,
        input: &UpdateCollection,
    ) -> StoreResult<Collection> {
        let select = format!("SELECT {COLUMNS} FROM collections WHERE id = ?");
        let mut collection = sqlx::query_as::<_, Collection>(&select)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        input.apply(&mut collection);
        if input.code.is_some() {
            ensure_present("code", &collection.code)?;
            ensure_code_free(conn, "collections", ENTITY, &collection.code, Some(id)).await?;
        }

        let query = format!(
            "UPDATE collections SET \
                code = ?, scientific_name = ?, common_name = ?, collection_date = ?, \
                location = ?, coordinates = ?, substrate = ?, collector = ?, notes = ? \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(&collection.code)
            .bind(&collection.scientific_name)
            .bind(&collection.common_name)
            .bind(collection.collection_date)
            .bind(&collection.location)
            .bind(&collection.coordinates)
            .bind(&collection.substrate)
            .bind(&collection.collector)
            .bind(&collection.notes)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| map_unique_code(e, ENTITY, &collection.code))
    }
}

/// Commit `tx`; if that fails, remove the files written for `images`.
async fn commit_or_discard(
    tx: sqlx::Transaction<'_, sqlx::Sqlite>,
    store: &dyn ContentStore,
    images: &[Image],
) -> StoreResult<()> {
    if let Err(err) = tx.commit().await {
        let written: Vec<String> = images.iter().map(|i| i.filename.clone()).collect();
        tracing::warn!(files = written.len(), error = %err, "Commit failed, removing uploaded files");
        discard_files(store, &written).await;
        return Err(err.into());
    }
    Ok(())
}
