//! Experiment entity model and DTOs.
//!
//! An experiment may reference a collection, an isolate, both, or neither.
//! The two links are independent: removing either target removes the
//! experiment (see [`crate::cascade`]).

use mycotheca_core::error::CoreError;
use mycotheca_core::experiment::ExperimentStatus;
use mycotheca_core::form::FormFields;
use mycotheca_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{patch, patch_required};

/// A row from the `experiments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Experiment {
    pub id: DbId,
    pub title: String,
    pub collection_id: Option<DbId>,
    pub isolate_id: Option<DbId>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub objective: Option<String>,
    pub methods: Option<String>,
    pub results: Option<String>,
    pub discussion: Option<String>,
    pub conclusions: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ExperimentStatus,
    pub created_at: Timestamp,
}

/// DTO for creating a new experiment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperiment {
    pub title: String,
    pub collection_id: Option<DbId>,
    pub isolate_id: Option<DbId>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub objective: Option<String>,
    pub methods: Option<String>,
    pub results: Option<String>,
    pub discussion: Option<String>,
    pub conclusions: Option<String>,
    #[serde(default)]
    pub status: ExperimentStatus,
}

impl CreateExperiment {
    pub fn from_form(form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            title: form.required_text("title")?,
            collection_id: form.optional_id("collection_id")?,
            isolate_id: form.optional_id("isolate_id")?,
            start_date: form.optional_date("start_date")?,
            end_date: form.optional_date("end_date")?,
            objective: form.text("objective"),
            methods: form.text("methods"),
            results: form.text("results"),
            discussion: form.text("discussion"),
            conclusions: form.text("conclusions"),
            status: ExperimentStatus::from_form(form.text("status").as_deref()),
        })
    }
}

/// DTO for updating an experiment. Either link may be changed or cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExperiment {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub collection_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub isolate_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub start_date: Option<Option<CalendarDate>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub end_date: Option<Option<CalendarDate>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub objective: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub methods: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub results: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub discussion: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub conclusions: Option<Option<String>>,
    pub status: Option<ExperimentStatus>,
}

impl UpdateExperiment {
    pub fn from_form(form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            title: form
                .has("title")
                .then(|| form.required_text("title"))
                .transpose()?,
            collection_id: form.id_patch("collection_id")?,
            isolate_id: form.id_patch("isolate_id")?,
            start_date: form.date_patch("start_date")?,
            end_date: form.date_patch("end_date")?,
            objective: form.text_patch("objective"),
            methods: form.text_patch("methods"),
            results: form.text_patch("results"),
            discussion: form.text_patch("discussion"),
            conclusions: form.text_patch("conclusions"),
            status: form
                .has("status")
                .then(|| ExperimentStatus::from_form(form.text("status").as_deref())),
        })
    }

    pub fn apply(&self, target: &mut Experiment) {
        patch_required(&mut target.title, &self.title);
        patch(&mut target.collection_id, &self.collection_id);
        patch(&mut target.isolate_id, &self.isolate_id);
        patch(&mut target.start_date, &self.start_date);
        patch(&mut target.end_date, &self.end_date);
        patch(&mut target.objective, &self.objective);
        patch(&mut target.methods, &self.methods);
        patch(&mut target.results, &self.results);
        patch(&mut target.discussion, &self.discussion);
        patch(&mut target.conclusions, &self.conclusions);
        patch_required(&mut target.status, &self.status);
    }
}
