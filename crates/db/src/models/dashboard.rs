//! Home-page statistics.

use serde::Serialize;

use crate::models::collection::Collection;
use crate::models::isolate::Isolate;

/// How many recent rows of each kind the dashboard shows.
pub const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_collections: i64,
    pub total_isolates: i64,
    pub total_experiments: i64,
    pub recent_collections: Vec<Collection>,
    pub recent_isolates: Vec<Isolate>,
}
