//! Shared response envelope types for API handlers.
//!
//! Single-object responses use a `{ "data": ... }` envelope. Listings return
//! `mycotheca_db::models::listing::Page`, which already carries `data`
//! alongside its paging fields.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
