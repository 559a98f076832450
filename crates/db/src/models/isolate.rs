//! Isolate entity model and DTOs.

use mycotheca_core::error::CoreError;
use mycotheca_core::form::FormFields;
use mycotheca_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::experiment::Experiment;
use crate::models::subculture::Subculture;
use crate::models::{patch, patch_required};

/// Form field holding the free-text medium when `culture_medium` is "other".
pub const OTHER_MEDIUM_FIELD: &str = "other_medium";

/// A row from the `isolates` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Isolate {
    pub id: DbId,
    pub code: String,
    pub collection_id: DbId,
    pub isolation_date: CalendarDate,
    pub culture_medium: Option<String>,
    pub incubation_temperature: Option<f64>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new isolate.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIsolate {
    pub code: String,
    pub collection_id: DbId,
    pub isolation_date: CalendarDate,
    pub culture_medium: Option<String>,
    pub incubation_temperature: Option<f64>,
    pub notes: Option<String>,
}

impl CreateIsolate {
    pub fn from_form(form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            code: form.required_text("code")?,
            collection_id: form.required_id("collection_id")?,
            isolation_date: form.required_date("isolation_date")?,
            culture_medium: form.culture_medium("culture_medium", OTHER_MEDIUM_FIELD),
            incubation_temperature: form.optional_f64("incubation_temperature")?,
            notes: form.text("notes"),
        })
    }
}

/// DTO for updating an isolate.
///
/// No `collection_id`: editing never re-parents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIsolate {
    pub code: Option<String>,
    pub isolation_date: Option<CalendarDate>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub culture_medium: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub incubation_temperature: Option<Option<f64>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateIsolate {
    pub fn from_form(form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            code: form
                .has("code")
                .then(|| form.required_text("code"))
                .transpose()?,
            isolation_date: form
                .has("isolation_date")
                .then(|| form.required_date("isolation_date"))
                .transpose()?,
            culture_medium: form
                .has("culture_medium")
                .then(|| form.culture_medium("culture_medium", OTHER_MEDIUM_FIELD)),
            incubation_temperature: form.f64_patch("incubation_temperature")?,
            notes: form.text_patch("notes"),
        })
    }

    pub fn apply(&self, target: &mut Isolate) {
        patch_required(&mut target.code, &self.code);
        patch_required(&mut target.isolation_date, &self.isolation_date);
        patch(&mut target.culture_medium, &self.culture_medium);
        patch(&mut target.incubation_temperature, &self.incubation_temperature);
        patch(&mut target.notes, &self.notes);
    }
}

/// Flat machine-readable projection of an isolate. The owning collection is
/// identified by its code, not its numeric id.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct IsolateSummary {
    pub id: DbId,
    pub code: String,
    pub collection_code: String,
    pub isolation_date: CalendarDate,
    pub culture_medium: Option<String>,
}

/// An isolate with its lineage.
#[derive(Debug, Clone, Serialize)]
pub struct IsolateDetail {
    #[serde(flatten)]
    pub isolate: Isolate,
    pub collection_code: String,
    pub subcultures: Vec<Subculture>,
    pub experiments: Vec<Experiment>,
}
