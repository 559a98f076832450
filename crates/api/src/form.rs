//! Request body intake.
//!
//! Create and update endpoints accept loosely typed text fields. Collections
//! arrive as `multipart/form-data` (text parts plus `images` file parts and an
//! `image_description`); everything else arrives as a flat JSON object. Both
//! end up as [`FormFields`] before the repositories see them.

use axum::extract::Multipart;
use mycotheca_core::form::FormFields;
use mycotheca_core::uploads::{UploadBatch, UploadedFile};

use crate::error::{AppError, AppResult};

/// Multipart part carrying image files. May repeat.
pub const IMAGES_PART: &str = "images";

/// Multipart part with the description shared by every image in the batch.
pub const IMAGE_DESCRIPTION_PART: &str = "image_description";

/// Drain a collection form into its text fields and upload batch.
///
/// File parts without a filename are kept in the batch and skipped later,
/// which is how browsers submit an untouched file input.
pub async fn read_collection_form(mut multipart: Multipart) -> AppResult<(FormFields, UploadBatch)> {
    let mut fields = FormFields::new();
    let mut batch = UploadBatch::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "" => {}
            IMAGES_PART => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                batch.files.push(UploadedFile::new(file_name, data.to_vec()));
            }
            IMAGE_DESCRIPTION_PART => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                batch.description = (!text.trim().is_empty()).then_some(text);
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                fields.insert(name, text);
            }
        }
    }

    Ok((fields, batch))
}

/// Convert a JSON request body into form fields.
pub fn json_fields(body: &serde_json::Value) -> AppResult<FormFields> {
    Ok(FormFields::from_json(body)?)
}
