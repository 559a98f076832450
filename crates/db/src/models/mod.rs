//! Domain model structs and DTOs.
//!
//! Each entity submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO, with a `from_form` constructor for loosely typed input
//! - An update DTO (all `Option` fields) for patches; nullable columns use
//!   `Option<Option<T>>` so "supplied empty" clears while "not supplied"
//!   keeps the stored value

use serde::{Deserialize, Deserializer};

pub mod collection;
pub mod dashboard;
pub mod experiment;
pub mod image;
pub mod isolate;
pub mod listing;
pub mod search;
pub mod subculture;

/// Deserialize a present field (including `null`) as `Some(..)`, so that a
/// missing field stays `None` via `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Apply a nullable-column patch.
pub(crate) fn patch<T: Clone>(target: &mut Option<T>, value: &Option<Option<T>>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}

/// Apply a required-column patch.
pub(crate) fn patch_required<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}
