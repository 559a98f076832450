//! Fan-out search result set.

use serde::Serialize;

use crate::models::collection::Collection;
use crate::models::experiment::Experiment;
use crate::models::isolate::Isolate;

/// Per-kind search results. Kinds outside the requested scope are `None`
/// and omitted from the JSON; kinds inside it are always present, possibly
/// empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<Collection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolates: Option<Vec<Isolate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiments: Option<Vec<Experiment>>,
}
