//! Response bodies returned by the API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::JsonRecord;

/// Body of `/api/tables`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TablesResponse {
    /// Sample rows from the primary store.
    #[schema(value_type = Vec<Object>)]
    pub tables: Vec<JsonRecord>,
}

/// Body of the secondary-store endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsResponse {
    /// Rows produced by the statement, in order.
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<JsonRecord>,
}

/// Body of `/api/ping`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub ping: String,
}

impl PingResponse {
    pub fn for_version(version: &str) -> Self {
        Self {
            ping: format!("pong from Version {}", version),
        }
    }
}

/// Client error body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Human-readable error text.
    pub detail: String,
}
