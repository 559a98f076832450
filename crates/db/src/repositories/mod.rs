//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&DbPool` as the first argument. Every mutation runs in its own
//! transaction; an early return drops the transaction, which rolls it back.

use mycotheca_core::error::CoreError;
use mycotheca_core::types::DbId;
use sqlx::SqliteConnection;

use crate::error::StoreResult;

pub mod collection_repo;
pub mod dashboard_repo;
pub mod experiment_repo;
pub mod image_repo;
pub mod isolate_repo;
pub mod subculture_repo;

pub use collection_repo::CollectionRepo;
pub use dashboard_repo::DashboardRepo;
pub use experiment_repo::ExperimentRepo;
pub use image_repo::ImageRepo;
pub use isolate_repo::IsolateRepo;
pub use subculture_repo::SubcultureRepo;

/// Fail with `Validation` on `field` when `value` is empty or blank.
pub(crate) fn ensure_present(field: &'static str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        Err(CoreError::validation(field, "is required").into())
    } else {
        Ok(())
    }
}

/// Fail with `DuplicateKey` if another row of `table` already uses `code`.
///
/// `exclude` is the id of the row being updated, so it does not collide
/// with itself.
pub(crate) async fn ensure_code_free(
    conn: &mut SqliteConnection,
    table: &'static str,
    entity: &'static str,
    code: &str,
    exclude: Option<DbId>,
) -> StoreResult<()> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE code = ? AND id IS NOT ?)");
    let taken: bool = sqlx::query_scalar(&query)
        .bind(code)
        .bind(exclude)
        .fetch_one(&mut *conn)
        .await?;
    if taken {
        Err(CoreError::duplicate(entity, "code", code).into())
    } else {
        Ok(())
    }
}

/// Fail with `Validation` on `field` unless `table` has a row with `id`.
pub(crate) async fn ensure_reference(
    conn: &mut SqliteConnection,
    table: &'static str,
    field: &'static str,
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
        Err(CoreError::validation(field, format!("no record with id {id}")).into())
    }
}
