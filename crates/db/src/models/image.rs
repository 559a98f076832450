//! Image entity model.
//!
//! Images are only ever created through the upload association protocol
//! (see [`crate::uploads`]), so there is no public create DTO.

use mycotheca_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub collection_id: DbId,
    /// Stored filename inside the content area.
    pub filename: String,
    pub description: Option<String>,
    pub uploaded_at: Timestamp,
}
