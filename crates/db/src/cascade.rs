//! Cascade engine: removal of an owning row and its full dependent closure.
//!
//! Both entry points work on an already-open transaction so the caller
//! decides when the removal becomes visible. Removal is leaves-first:
//!
//! ```text
//! experiments (linked by either edge) -> subcultures -> isolates -> images -> root
//! ```
//!
//! The foreign keys carry no `ON DELETE` action, so any dependent this
//! module failed to remove makes the final root delete fail instead of
//! leaving a dangling reference.

use mycotheca_core::error::CoreError;
use mycotheca_core::types::DbId;
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::error::StoreResult;

/// What a cascade removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub images: u64,
    pub isolates: u64,
    pub subcultures: u64,
    pub experiments: u64,
    /// Stored filenames of the removed images. The bytes are still on disk
    /// until the caller removes them after commit.
    pub removed_files: Vec<String>,
}

/// Delete a collection with its images, isolates (and their subcultures)
/// and every experiment linked to the collection or to one of its isolates.
pub async fn delete_collection(conn: &mut SqliteConnection, id: DbId) -> StoreResult<CascadeReport> {
    ensure_exists(conn, "collections", "Collection", id).await?;

    let experiments = sqlx::query(
        "DELETE FROM experiments \
         WHERE collection_id = ? \
            OR isolate_id IN (SELECT id FROM isolates WHERE collection_id = ?)",
    )
    .bind(id)
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    let subcultures = sqlx::query(
        "DELETE FROM subcultures \
         WHERE isolate_id IN (SELECT id FROM isolates WHERE collection_id = ?)",
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    let isolates = sqlx::query("DELETE FROM isolates WHERE collection_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let removed_files: Vec<String> =
        sqlx::query_scalar("DELETE FROM images WHERE collection_id = ? RETURNING filename")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;

    sqlx::query("DELETE FROM collections WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(CascadeReport {
        images: removed_files.len() as u64,
        isolates,
        subcultures,
        experiments,
        removed_files,
    })
}

/// Delete an isolate with its subcultures and every experiment linked to it,
/// whether or not that experiment is also linked to a collection.
pub async fn delete_isolate(conn: &mut SqliteConnection, id: DbId) -> StoreResult<CascadeReport> {
    ensure_exists(conn, "isolates", "Isolate", id).await?;

    let experiments = sqlx::query("DELETE FROM experiments WHERE isolate_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let subcultures = sqlx::query("DELETE FROM subcultures WHERE isolate_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM isolates WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(CascadeReport {
        isolates: 1,
        subcultures,
        experiments,
        ..CascadeReport::default()
    })
}

/// Signal `NotFound` before any row is touched.
async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &'static str,
    entity: &'static str,
    id: DbId,
) -> StoreResult<()> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)");
    let exists: bool = sqlx::query_scalar(&query)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(CoreError::NotFound { entity, id }.into())
    }
}
