//! Upload association protocol: turn a batch of uploaded files into
//! `images` rows owned by one collection.
//!
//! Bytes are written to the [`ContentStore`] first, then the row is
//! inserted on the caller's transaction. If any write fails, the files this
//! batch already wrote are removed and the error is returned; the caller
//! drops its transaction, so no image row from the batch survives. The
//! remaining gap (commit failing after every write succeeded) is closed by
//! [`discard_files`].

use mycotheca_core::types::{DbId, Timestamp};
use mycotheca_core::uploads::{stored_name, ContentStore, UploadBatch};
use sqlx::SqliteConnection;

use crate::error::StoreResult;
use crate::models::image::Image;
use crate::repositories::image_repo::COLUMNS;

/// Store every selected file of `batch` and create its image row.
///
/// Returns the created images in batch order. Entries without a filename
/// are skipped. On error, nothing written by this call is left behind.
pub async fn attach_images(
    conn: &mut SqliteConnection,
    store: &dyn ContentStore,
    collection_id: DbId,
    batch: &UploadBatch,
    now: Timestamp,
) -> StoreResult<Vec<Image>> {
    let mut written: Vec<String> = Vec::new();

    match write_batch(conn, store, collection_id, batch, now, &mut written).await {
        Ok(images) => Ok(images),
        Err(err) => {
            tracing::warn!(
                collection_id,
                files = written.len(),
                error = %err,
                "Upload batch aborted, removing written files"
            );
            discard_files(store, &written).await;
            Err(err)
        }
    }
}

async fn write_batch(
    conn: &mut SqliteConnection,
    store: &dyn ContentStore,
    collection_id: DbId,
    batch: &UploadBatch,
    now: Timestamp,
    written: &mut Vec<String>,
) -> StoreResult<Vec<Image>> {
    let insert = format!(
        "INSERT INTO images (collection_id, filename, description, uploaded_at) \
         VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let mut images = Vec::new();

    for (index, file) in batch.selected().enumerate() {
        let name = stored_name(now, index, &file.original_name);
        store.put(&name, &file.bytes).await?;
        written.push(name.clone());

        let image = sqlx::query_as::<_, Image>(&insert)
            .bind(collection_id)
            .bind(&name)
            .bind(batch.description.as_deref())
            .bind(now)
            .fetch_one(&mut *conn)
            .await?;
        images.push(image);
    }

    Ok(images)
}

/// Best-effort removal of stored files. Failures are logged, not returned:
/// an orphaned file is acceptable, a row pointing at missing bytes is not.
pub async fn discard_files(store: &dyn ContentStore, names: &[String]) {
    for name in names {
        if let Err(err) = store.remove(name).await {
            tracing::warn!(file = %name, error = %err, "Failed to remove stored file");
        }
    }
}
