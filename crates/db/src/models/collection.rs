//! Collection entity model and DTOs.

use mycotheca_core::error::CoreError;
use mycotheca_core::form::FormFields;
use mycotheca_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::experiment::Experiment;
use crate::models::image::Image;
use crate::models::isolate::Isolate;
use crate::models::{patch, patch_required};

/// A row from the `collections` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub code: String,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub collection_date: CalendarDate,
    pub location: Option<String>,
    pub coordinates: Option<String>,
    pub substrate: Option<String>,
    pub collector: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollection {
    pub code: String,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub collection_date: CalendarDate,
    pub location: Option<String>,
    pub coordinates: Option<String>,
    pub substrate: Option<String>,
    pub collector: Option<String>,
    pub notes: Option<String>,
}

impl CreateCollection {
    pub fn from_form(form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            code: form.required_text("code")?,
            scientific_name: form.text("scientific_name"),
            common_name: form.text("common_name"),
            collection_date: form.required_date("collection_date")?,
            location: form.text("location"),
            coordinates: form.text("coordinates"),
            substrate: form.text("substrate"),
            collector: form.text("collector"),
            notes: form.text("notes"),
        })
    }
}

/// DTO for updating a collection. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollection {
    pub code: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub scientific_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub common_name: Option<Option<String>>,
    pub collection_date: Option<CalendarDate>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub coordinates: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub substrate: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub collector: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateCollection {
    pub fn from_form(form: &FormFields) -> Result<Self, CoreError> {
        Ok(Self {
            code: form
                .has("code")
                .then(|| form.required_text("code"))
                .transpose()?,
            scientific_name: form.text_patch("scientific_name"),
            common_name: form.text_patch("common_name"),
            collection_date: form
                .has("collection_date")
                .then(|| form.required_date("collection_date"))
                .transpose()?,
            location: form.text_patch("location"),
            coordinates: form.text_patch("coordinates"),
            substrate: form.text_patch("substrate"),
            collector: form.text_patch("collector"),
            notes: form.text_patch("notes"),
        })
    }

    /// Apply the supplied fields to `target`.
    pub fn apply(&self, target: &mut Collection) {
        patch_required(&mut target.code, &self.code);
        patch(&mut target.scientific_name, &self.scientific_name);
        patch(&mut target.common_name, &self.common_name);
        patch_required(&mut target.collection_date, &self.collection_date);
        patch(&mut target.location, &self.location);
        patch(&mut target.coordinates, &self.coordinates);
        patch(&mut target.substrate, &self.substrate);
        patch(&mut target.collector, &self.collector);
        patch(&mut target.notes, &self.notes);
    }
}

/// Flat machine-readable projection of a collection.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CollectionSummary {
    pub id: DbId,
    pub code: String,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub collection_date: CalendarDate,
    pub location: Option<String>,
}

/// A collection with everything it owns or is linked to.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetail {
    #[serde(flatten)]
    pub collection: Collection,
    pub images: Vec<Image>,
    pub isolates: Vec<Isolate>,
    pub experiments: Vec<Experiment>,
}
