//! Home-page statistics.

use crate::error::StoreResult;
use crate::models::dashboard::{DashboardStats, RECENT_LIMIT};
use crate::repositories::{CollectionRepo, ExperimentRepo, IsolateRepo};
use crate::DbPool;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Totals per kind and the most recent collections and isolates.
    pub async fn stats(pool: &DbPool) -> StoreResult<DashboardStats> {
        Ok(DashboardStats {
            total_collections: CollectionRepo::count(pool).await?,
            total_isolates: IsolateRepo::count(pool).await?,
            total_experiments: ExperimentRepo::count(pool).await?,
            recent_collections: CollectionRepo::recent(pool, RECENT_LIMIT).await?,
            recent_isolates: IsolateRepo::recent(pool, RECENT_LIMIT).await?,
        })
    }
}
