//! Repository for the `experiments` table.
//!
//! Both links are optional and independent. A supplied link must point at
//! an existing row, on create and on update alike.

use chrono::Utc;
use mycotheca_core::error::CoreError;
use mycotheca_core::types::DbId;
use sqlx::SqliteConnection;

use crate::error::StoreResult;
use crate::models::experiment::{CreateExperiment, Experiment, UpdateExperiment};
use crate::models::listing::{ListParams, Page};
use crate::query::{self, NEWEST_FIRST};
use crate::repositories::{ensure_present, ensure_reference};
use crate::DbPool;

/// Column list for the `experiments` table.
pub(crate) const COLUMNS: &str = "id, title, collection_id, isolate_id, start_date, end_date, \
    objective, methods, results, discussion, conclusions, status, created_at";

const ENTITY: &str = "Experiment";

/// Provides CRUD operations for experiments.
pub struct ExperimentRepo;

impl ExperimentRepo {
    pub async fn create(pool: &DbPool, input: &CreateExperiment) -> StoreResult<Experiment> {
        ensure_present("title", &input.title)?;
        let mut tx = pool.begin().await?;

        ensure_links(&mut tx, input.collection_id, input.isolate_id).await?;

        let query = format!(
            "INSERT INTO experiments \
                (title, collection_id, isolate_id, start_date, end_date, objective, \
                 methods, results, discussion, conclusions, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let experiment = sqlx::query_as::<_, Experiment>(&query)
            .bind(&input.title)
            .bind(input.collection_id)
            .bind(input.isolate_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.objective)
            .bind(&input.methods)
            .bind(&input.results)
            .bind(&input.discussion)
            .bind(&input.conclusions)
            .bind(input.status.as_str())
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            experiment_id = experiment.id,
            collection_id = ?experiment.collection_id,
            isolate_id = ?experiment.isolate_id,
            "Experiment created"
        );
        Ok(experiment)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> StoreResult<Option<Experiment>> {
        let query = format!("SELECT {COLUMNS} FROM experiments WHERE id = ?");
        let experiment = sqlx::query_as::<_, Experiment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(experiment)
    }

    pub async fn get(pool: &DbPool, id: DbId) -> StoreResult<Experiment> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: ENTITY, id }.into())
    }

    /// Apply the supplied fields. Links may be re-pointed or cleared.
    pub async fn update(pool: &DbPool, id: DbId, input: &UpdateExperiment) -> StoreResult<Experiment> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM experiments WHERE id = ?");
        let mut experiment = sqlx::query_as::<_, Experiment>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        input.apply(&mut experiment);
        ensure_present("title", &experiment.title)?;
        ensure_links(
            &mut tx,
            input.collection_id.flatten(),
            input.isolate_id.flatten(),
        )
        .await?;

        let query = format!(
            "UPDATE experiments SET \
                title = ?, collection_id = ?, isolate_id = ?, start_date = ?, end_date = ?, \
                objective = ?, methods = ?, results = ?, discussion = ?, conclusions = ?, \
                status = ? \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        let experiment = sqlx::query_as::<_, Experiment>(&query)
            .bind(&experiment.title)
            .bind(experiment.collection_id)
            .bind(experiment.isolate_id)
            .bind(experiment.start_date)
            .bind(experiment.end_date)
            .bind(&experiment.objective)
            .bind(&experiment.methods)
            .bind(&experiment.results)
            .bind(&experiment.discussion)
            .bind(&experiment.conclusions)
            .bind(experiment.status.as_str())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(experiment_id = id, "Experiment updated");
        Ok(experiment)
    }

    /// Experiments have no dependents, so deletion removes exactly one row.
    pub async fn delete(pool: &DbPool, id: DbId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM experiments WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound { entity: ENTITY, id }.into());
        }

        tracing::info!(experiment_id = id, "Experiment deleted");
        Ok(())
    }

    pub async fn list(pool: &DbPool, params: &ListParams) -> StoreResult<Page<Experiment>> {
        query::list::<Experiment>(pool, params).await
    }

    pub async fn list_by_collection(
        pool: &DbPool,
        collection_id: DbId,
    ) -> StoreResult<Vec<Experiment>> {
        let query =
            format!("SELECT {COLUMNS} FROM experiments WHERE collection_id = ? {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, Experiment>(&query)
            .bind(collection_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_by_isolate(pool: &DbPool, isolate_id: DbId) -> StoreResult<Vec<Experiment>> {
        let query = format!("SELECT {COLUMNS} FROM experiments WHERE isolate_id = ? {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, Experiment>(&query)
            .bind(isolate_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(pool: &DbPool) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM experiments")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// Check the links that are set. Unknown targets are a validation error on
/// the link field, not a `NotFound` for the experiment.
async fn ensure_links(
    conn: &mut SqliteConnection,
    collection_id: Option<DbId>,
    isolate_id: Option<DbId>,
) -> StoreResult<()> {
    if let Some(id) = collection_id {
        ensure_reference(conn, "collections", "collection_id", id).await?;
    }
    if let Some(id) = isolate_id {
        ensure_reference(conn, "isolates", "isolate_id", id).await?;
    }
    Ok(())
}
