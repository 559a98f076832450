//! Repository for the `isolates` table.

use chrono::Utc;
use mycotheca_core::error::CoreError;
use mycotheca_core::types::DbId;

use crate::cascade::{self, CascadeReport};
use crate::error::{map_unique_code, StoreResult};
use crate::models::isolate::{CreateIsolate, Isolate, IsolateDetail, IsolateSummary, UpdateIsolate};
use crate::models::listing::{ListParams, Page};
use crate::query::{self, NEWEST_FIRST};
use crate::repositories::{
    ensure_code_free, ensure_present, ensure_reference, ExperimentRepo, SubcultureRepo,
};
use crate::DbPool;

/// Column list for the `isolates` table.
pub(crate) const COLUMNS: &str = "id, code, collection_id, isolation_date, culture_medium, \
    incubation_temperature, notes, created_at";

const ENTITY: &str = "Isolate";

/// Provides CRUD operations for isolates.
pub struct IsolateRepo;

impl IsolateRepo {
    /// Insert a new isolate under an existing collection.
    pub async fn create(pool: &DbPool, input: &CreateIsolate) -> StoreResult<Isolate> {
        ensure_present("code", &input.code)?;
        let mut tx = pool.begin().await?;

        ensure_reference(&mut tx, "collections", "collection_id", input.collection_id).await?;
        ensure_code_free(&mut tx, "isolates", ENTITY, &input.code, None).await?;

        let query = format!(
            "INSERT INTO isolates \
                (code, collection_id, isolation_date, culture_medium, \
                 incubation_temperature, notes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let isolate = sqlx::query_as::<_, Isolate>(&query)
            .bind(&input.code)
            .bind(input.collection_id)
            .bind(input.isolation_date)
            .bind(&input.culture_medium)
            .bind(input.incubation_temperature)
            .bind(&input.notes)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_code(e, ENTITY, &input.code))?;

        tx.commit().await?;

        tracing::info!(
            isolate_id = isolate.id,
            collection_id = isolate.collection_id,
            code = %isolate.code,
            "Isolate created"
        );
        Ok(isolate)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> StoreResult<Option<Isolate>> {
        let query = format!("SELECT {COLUMNS} FROM isolates WHERE id = ?");
        let isolate = sqlx::query_as::<_, Isolate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(isolate)
    }

    pub async fn get(pool: &DbPool, id: DbId) -> StoreResult<Isolate> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: ENTITY, id }.into())
    }

    /// An isolate with its collection code, subcultures and experiments.
    pub async fn get_detail(pool: &DbPool, id: DbId) -> StoreResult<IsolateDetail> {
        let isolate = Self::get(pool, id).await?;
        let collection_code: String =
            sqlx::query_scalar("SELECT code FROM collections WHERE id = ?")
                .bind(isolate.collection_id)
                .fetch_one(pool)
                .await?;
        let subcultures = SubcultureRepo::list_by_isolate(pool, id).await?;
        let experiments = ExperimentRepo::list_by_isolate(pool, id).await?;

        Ok(IsolateDetail {
            isolate,
            collection_code,
            subcultures,
            experiments,
        })
    }

    /// Apply the supplied fields. The owning collection never changes.
    pub async fn update(pool: &DbPool, id: DbId, input: &UpdateIsolate) -> StoreResult<Isolate> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM isolates WHERE id = ?");
        let mut isolate = sqlx::query_as::<_, Isolate>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        input.apply(&mut isolate);
        if input.code.is_some() {
            ensure_present("code", &isolate.code)?;
            ensure_code_free(&mut tx, "isolates", ENTITY, &isolate.code, Some(id)).await?;
        }

        let query = format!(
            "UPDATE isolates SET \
                code = ?, isolation_date = ?, culture_medium = ?, \
                incubation_temperature = ?, notes = ? \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        let isolate = sqlx::query_as::<_, Isolate>(&query)
            .bind(&isolate.code)
            .bind(isolate.isolation_date)
            .bind(&isolate.culture_medium)
            .bind(isolate.incubation_temperature)
            .bind(&isolate.notes)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_code(e, ENTITY, &isolate.code))?;

        tx.commit().await?;

        tracing::info!(isolate_id = id, "Isolate updated");
        Ok(isolate)
    }

    /// Delete an isolate, its subcultures and every experiment linked to it.
    pub async fn delete(pool: &DbPool, id: DbId) -> StoreResult<CascadeReport> {
        let mut tx = pool.begin().await?;
        let report = cascade::delete_isolate(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(
            isolate_id = id,
            subcultures = report.subcultures,
            experiments = report.experiments,
            "Isolate deleted"
        );
        Ok(report)
    }

    pub async fn list(pool: &DbPool, params: &ListParams) -> StoreResult<Page<Isolate>> {
        query::list::<Isolate>(pool, params).await
    }

    pub async fn list_by_collection(pool: &DbPool, collection_id: DbId) -> StoreResult<Vec<Isolate>> {
        let query = format!("SELECT {COLUMNS} FROM isolates WHERE collection_id = ? {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, Isolate>(&query)
            .bind(collection_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Flat projection of every isolate, exposing the owning collection's
    /// code instead of its id.
    pub async fn summaries(pool: &DbPool) -> StoreResult<Vec<IsolateSummary>> {
        let rows = sqlx::query_as::<_, IsolateSummary>(
            "SELECT i.id, i.code, c.code AS collection_code, i.isolation_date, i.culture_medium \
             FROM isolates i \
             JOIN collections c ON c.id = i.collection_id \
             ORDER BY i.created_at DESC, i.id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn recent(pool: &DbPool, limit: i64) -> StoreResult<Vec<Isolate>> {
        let query = format!("SELECT {COLUMNS} FROM isolates {NEWEST_FIRST} LIMIT ?");
        let rows = sqlx::query_as::<_, Isolate>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(pool: &DbPool) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM isolates")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
