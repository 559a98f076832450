//! Subculture entity model and DTOs.

use mycotheca_core::error::CoreError;
use mycotheca_core::form::FormFields;
use mycotheca_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::isolate::OTHER_MEDIUM_FIELD;
use crate::models::{patch, patch_required};

/// Plate count used when none is given.
pub const DEFAULT_PLATE_COUNT: i32 = 1;

/// A row from the `subcultures` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Subculture {
    pub id: DbId,
    pub isolate_id: DbId,
    pub subculture_date: CalendarDate,
    pub plate_count: i32,
    pub culture_medium: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new subculture.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubculture {
    pub isolate_id: DbId,
    pub subculture_date: CalendarDate,
    /// Defaults to [`DEFAULT_PLATE_COUNT`] if omitted.
    pub plate_count: Option<i32>,
    pub culture_medium: Option<String>,
    pub notes: Option<String>,
}

impl CreateSubculture {
    /// The owning isolate comes from the request path, not the form.
    pub fn from_form(isolate_id: DbId, form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            isolate_id,
            subculture_date: form.required_date("subculture_date")?,
            plate_count: form.optional_i32("plate_count")?,
            culture_medium: form.culture_medium("culture_medium", OTHER_MEDIUM_FIELD),
            notes: form.text("notes"),
        })
    }
}

/// DTO for updating a subculture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubculture {
    pub subculture_date: Option<CalendarDate>,
    pub plate_count: Option<i32>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub culture_medium: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateSubculture {
    pub fn from_form(form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            subculture_date: form
                .has("subculture_date")
                .then(|| form.required_date("subculture_date"))
                .transpose()?,
            plate_count: form.optional_i32("plate_count")?,
            culture_medium: form
                .has("culture_medium")
                .then(|| form.culture_medium("culture_medium", OTHER_MEDIUM_FIELD)),
            notes: form.text_patch("notes"),
        })
    }

    pub fn apply(&self, target: &mut Subculture) {
        patch_required(&mut target.subculture_date, &self.subculture_date);
        patch_required(&mut target.plate_count, &self.plate_count);
        patch(&mut target.culture_medium, &self.culture_medium);
        patch(&mut target.notes, &self.notes);
    }
}
