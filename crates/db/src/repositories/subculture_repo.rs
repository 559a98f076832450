//! Repository for the `subcultures` table.

use chrono::Utc;
use mycotheca_core::error::CoreError;
use mycotheca_core::types::DbId;

use crate::error::StoreResult;
use crate::models::subculture::{CreateSubculture, Subculture, UpdateSubculture, DEFAULT_PLATE_COUNT};
use crate::query::NEWEST_FIRST;
use crate::repositories::ensure_reference;
use crate::DbPool;

/// Column list for the `subcultures` table.
pub(crate) const COLUMNS: &str =
    "id, isolate_id, subculture_date, plate_count, culture_medium, notes, created_at";

const ENTITY: &str = "Subculture";

/// Provides CRUD operations for subcultures.
pub struct SubcultureRepo;

impl SubcultureRepo {
    pub async fn create(pool: &DbPool, input: &CreateSubculture) -> StoreResult<Subculture> {
        let mut tx = pool.begin().await?;

        ensure_reference(&mut tx, "isolates", "isolate_id", input.isolate_id).await?;

        let query = format!(
            "INSERT INTO subcultures \
                (isolate_id, subculture_date, plate_count, culture_medium, notes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let subculture = sqlx::query_as::<_, Subculture>(&query)
            .bind(input.isolate_id)
            .bind(input.subculture_date)
            .bind(input.plate_count.unwrap_or(DEFAULT_PLATE_COUNT))
            .bind(&input.culture_medium)
            .bind(&input.notes)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            subculture_id = subculture.id,
            isolate_id = subculture.isolate_id,
            "Subculture created"
        );
        Ok(subculture)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> StoreResult<Option<Subculture>> {
        let query = format!("SELECT {COLUMNS} FROM subcultures WHERE id = ?");
        let subculture = sqlx::query_as::<_, Subculture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(subculture)
    }

    pub async fn get(pool: &DbPool, id: DbId) -> StoreResult<Subculture> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: ENTITY, id }.into())
    }

    pub async fn update(pool: &DbPool, id: DbId, input: &UpdateSubculture) -> StoreResult<Subculture> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM subcultures WHERE id = ?");
        let mut subculture = sqlx::query_as::<_, Subculture>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        input.apply(&mut subculture);

        let query = format!(
            "UPDATE subcultures SET \
                subculture_date = ?, plate_count = ?, culture_medium = ?, notes = ? \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        let subculture = sqlx::query_as::<_, Subculture>(&query)
            .bind(subculture.subculture_date)
            .bind(subculture.plate_count)
            .bind(&subculture.culture_medium)
            .bind(&subculture.notes)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(subculture_id = id, "Subculture updated");
        Ok(subculture)
    }

    /// Subcultures are leaves, so deletion removes exactly one row.
    pub async fn delete(pool: &DbPool, id: DbId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM subcultures WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound { entity: ENTITY, id }.into());
        }

        tracing::info!(subculture_id = id, "Subculture deleted");
        Ok(())
    }

    pub async fn list_by_isolate(pool: &DbPool, isolate_id: DbId) -> StoreResult<Vec<Subculture>> {
        let query = format!("SELECT {COLUMNS} FROM subcultures WHERE isolate_id = ? {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, Subculture>(&query)
            .bind(isolate_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}
