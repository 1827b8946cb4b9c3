//! SQL query models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for ad hoc SQL execution.
///
/// The statement is passed to the secondary store verbatim.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SqlQuery {
    /// SQL statement to execute.
    pub query: String,
}
