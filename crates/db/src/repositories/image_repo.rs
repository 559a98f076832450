//! Repository for the `images` table.
//!
//! Image rows are created by [`crate::uploads::attach_images`]; this module
//! covers lookup and single-image removal.

use mycotheca_core::error::CoreError;
use mycotheca_core::types::DbId;
use mycotheca_core::uploads::ContentStore;

use crate::error::StoreResult;
use crate::models::image::Image;
use crate::uploads::discard_files;
use crate::DbPool;

/// Column list for the `images` table.
pub(crate) const COLUMNS: &str = "id, collection_id, filename, description, uploaded_at";

/// Provides lookup and delete for collection images.
pub struct ImageRepo;

impl ImageRepo {
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> StoreResult<Option<Image>> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = ?");
        let image = sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(image)
    }

    /// Images of one collection in upload order.
    pub async fn list_by_collection(pool: &DbPool, collection_id: DbId) -> StoreResult<Vec<Image>> {
        let query = format!(
            "SELECT {COLUMNS} FROM images WHERE collection_id = ? ORDER BY uploaded_at, id"
        );
        let images = sqlx::query_as::<_, Image>(&query)
            .bind(collection_id)
            .fetch_all(pool)
            .await?;
        Ok(images)
    }

    /// Delete one image row. The stored bytes are removed once the row is
    /// gone; failing to remove them only leaves an orphaned file.
    pub async fn delete(pool: &DbPool, store: &dyn ContentStore, id: DbId) -> StoreResult<Image> {
        let query = format!("DELETE FROM images WHERE id = ? RETURNING {COLUMNS}");
        let image = sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound { entity: "Image", id })?;

        discard_files(store, std::slice::from_ref(&image.filename)).await;
        tracing::info!(image_id = id, collection_id = image.collection_id, "Image deleted");
        Ok(image)
    }
}
